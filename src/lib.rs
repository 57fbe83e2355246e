//! shipwright - release pipeline orchestrator
//!
//! Coordinates the post-build lifecycle of a software release: checksums,
//! preparing and packaging distributable artifacts, and announcing the
//! release across independent channels.
//!
//! # Architecture
//!
//! The pipeline runs four stages in a fixed order, strictly sequentially:
//! Checksum, Prepare, Package, Announce. The first three delegate each
//! distribution to a `DistributionProcessor`; the announce stage asks
//! each enabled, applicable `Channel` to execute. A single failure policy
//! governs every stage: fail fast on the first item, or attempt all items
//! and report one aggregate error.
//!
//! # Modules
//!
//! - `model`: the immutable release model (project, distributions,
//!   artifacts, announce configuration) and property resolution
//! - `core`: release context, stage executor, pipeline
//! - `announce`: channel contract, platform classification, artifact
//!   selection, concrete channels (sdkman, zulip, mastodon)
//! - `template`: `{{key}}` template rendering
//! - `tools`: distribution processing (checksum/prepare/package)
//! - `config`: release file discovery
//! - `cli`: command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Checksum, prepare and package all distributions
//! shipwright package
//!
//! # Announce on every configured channel, without side effects
//! shipwright announce --dry-run
//! ```

pub mod announce;
pub mod cli;
pub mod config;
pub mod core;
pub mod model;
pub mod template;
pub mod tools;
pub mod util;

// Re-export main types at crate root for convenience
pub use crate::announce::{AnnounceError, Channel, ChannelConfigError};
pub use crate::core::{ItemFailure, Pipeline, ReleaseContext, Stage, StageFailures};
pub use crate::model::Model;
pub use crate::tools::{DistributionProcessor, FileSystemProcessor};
