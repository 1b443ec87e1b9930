//! Batch payment orchestrator
//!
//! Owns the `BatchTransaction` lifecycle: drafts, approval submission,
//! privacy selection, execution, cancellation and observation.

#[allow(clippy::module_inception)]
mod orchestrator;
mod progress;


pub use orchestrator::{BatchOrchestrator, DraftReport};
pub use progress::ProgressSnapshot;
