//! Orchestration core: release context, stage executor, pipeline.

pub mod context;
pub mod executor;
pub mod pipeline;

pub use context::ReleaseContext;
pub use executor::{ItemFailure, Stage, StageFailures, StageItem};
pub use pipeline::Pipeline;
