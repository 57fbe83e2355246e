//! Shared release context.
//!
//! Constructed once per invocation by the front end and read-only for the
//! duration of a pipeline run. Channels and processors receive it by
//! shared reference and must not mutate the model.

use std::path::PathBuf;

use crate::model::Model;

/// Everything a pipeline run needs: the immutable model, the output
/// directory for produced files, and the dry-run flag.
#[derive(Debug)]
pub struct ReleaseContext {
    pub model: Model,
    pub output_dir: PathBuf,
    /// When set, all resolution and validation still runs but the final
    /// external side effect (network call, file write) is elided.
    pub dry_run: bool,
}

impl ReleaseContext {
    pub fn new(model: Model, output_dir: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            model,
            output_dir: output_dir.into(),
            dry_run,
        }
    }
}
