//! Core traits module
//!
//! Contracts of the external collaborators the orchestrator depends on:
//! the multisig wallet, the privacy layer and the chain. Implementations live
//! outside this crate, apart from the simulated ones in `services`.

pub mod broadcast;
pub mod privacy;
pub mod wallet;

pub use broadcast::*;
pub use privacy::*;
pub use wallet::*;

use std::sync::Arc;
use thiserror::Error;

/// Failure reported by a collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The collaborator refused the request
    #[error("rejected: {0}")]
    Rejected(String),

    /// The collaborator gave up waiting, e.g. for a confirmation
    #[error("timed out: {0}")]
    Timeout(String),

    /// The collaborator could not be reached
    #[error("unavailable: {0}")]
    Unavailable(String),
}

/// The set of collaborators one pipeline run talks to
#[derive(Clone)]
pub struct Collaborators {
    pub wallet: Arc<dyn WalletService>,
    pub privacy: Arc<dyn PrivacyService>,
    pub chain: Arc<dyn BroadcastService>,
}

impl Collaborators {
    pub fn new(
        wallet: Arc<dyn WalletService>,
        privacy: Arc<dyn PrivacyService>,
        chain: Arc<dyn BroadcastService>,
    ) -> Self {
        Self {
            wallet,
            privacy,
            chain,
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
