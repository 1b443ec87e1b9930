//! Execution pipeline
//!
//! A sequential, non-skippable staged state machine that drives a submitted
//! batch through signature collection, optional shielding, transfer and
//! confirmation.

mod executor;
mod stage;


pub use executor::{ExecutionPipeline, StageEffect, StageObserver};
pub use stage::{FailureCause, FailureReason, Stage, StageProfile};
