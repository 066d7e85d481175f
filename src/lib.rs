//! Native token transfers between chains over the Wormhole token bridge.
//!
//! [`Bridge`] drives one transfer: send on the source chain, wait for the
//! guardians to sign the message, redeem on the destination chain. Chain RPC,
//! transaction building and signing are plugged in through [`ChainContext`],
//! [`TokenBridge`] and [`SignerFactory`]. [`TransferForm`] holds the state of
//! the transfer form in front of it.
mod address;
mod amount;
mod attestation;
mod bridge;
mod chain;
mod config;
mod error;
mod network;
mod signer;
mod ui;

pub use {
    address::*,
    amount::*,
    attestation::*,
    bridge::*,
    chain::*,
    config::*,
    error::*,
    network::*,
    signer::*,
    ui::*,
};
