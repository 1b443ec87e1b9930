//! Utility modules
//!
//! - **error**: Crate-wide error type and result alias
//! - **logging**: Subscriber setup for `tracing`

pub mod error; // Error handling
pub mod logging; // Logging
