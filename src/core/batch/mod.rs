//! Batch aggregation and the batch transaction record
//!
//! This module provides the aggregated view of a recipient list and the
//! transaction record whose status the execution pipeline drives.

mod summary;
mod transaction;


// Re-export all public types
pub use summary::BatchSummary;
pub use transaction::{BatchId, BatchStatus, BatchTransaction, TxHash};
