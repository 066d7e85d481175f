use {
    crate::error::{Error, Result},
    alloy_primitives::{
        U256,
        utils::{format_units, parse_units},
    },
    std::fmt::Display,
};

/// An amount in a chain's smallest unit together with the precision it was
/// parsed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amount {
    pub units: U256,
    pub decimals: u8,
}

impl Amount {
    /// Parses a positive decimal string such as `"0.1"` into atomic units.
    ///
    /// More fractional digits than `decimals` is an error rather than a silent
    /// truncation, as is zero.
    pub fn parse(amount: &str, decimals: u8) -> Result<Self> {
        let trimmed = amount.trim();
        let invalid = |reason: &str| Error::InvalidAmount {
            amount: amount.to_string(),
            reason: reason.to_string(),
        };

        if trimmed.is_empty() {
            return Err(invalid("empty"));
        }
        if trimmed.starts_with('-') {
            return Err(invalid("must be positive"));
        }
        let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("no digits"));
        }
        if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid("not a decimal number"));
        }
        if fraction.len() > usize::from(decimals) {
            return Err(invalid(&format!("more than {decimals} decimal places")));
        }

        let units = parse_units(trimmed, decimals)?.get_absolute();
        if units.is_zero() {
            return Err(invalid("must be positive"));
        }
        Ok(Self { units, decimals })
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match format_units(self.units, self.decimals) {
            Ok(s) => f.write_str(&s),
            Err(_) => write!(f, "{} (1e-{})", self.units, self.decimals),
        }
    }
}
