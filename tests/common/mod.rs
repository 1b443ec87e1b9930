//! Common test utilities for treasury-batch
//!
//! - Test fixtures and data factories
//! - Scripted collaborators with a shared call log

pub mod fixtures;

// Re-export commonly used items
pub use fixtures::{ALICE, BOB, CAROL, TableFactory, fast_config, treasury};
pub use services::ScriptedServices;
