//! Services module
//!
//! Collaborator implementations that ship with the crate. The simulated ones
//! answer after a fixed delay and back the `batchpay` CLI.

pub mod simulated;

pub use simulated::{SimulatedChain, SimulatedPrivacy, SimulatedWallet, simulated_collaborators};
