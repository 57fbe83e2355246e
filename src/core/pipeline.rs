//! Pipeline sequencing.
//!
//! Orders the four stages (checksum, prepare, package, announce) over a
//! [`ReleaseContext`]. Stages run strictly sequentially; items within a
//! stage run in model order. Skips are decided by the caller before
//! execution, never inside a stage.

use std::collections::BTreeSet;

use anyhow::Result;
use tracing::{debug, info};

use crate::announce;
use crate::tools::DistributionProcessor;

use super::executor::{self, Stage};
use super::ReleaseContext;

/// The single entry point front ends invoke to run a release.
pub struct Pipeline<P> {
    processor: P,
    fail_fast: bool,
    skips: BTreeSet<Stage>,
}

impl<P: DistributionProcessor> Pipeline<P> {
    /// A pipeline with all stages active and fail-fast disabled.
    pub fn new(processor: P) -> Self {
        Self {
            processor,
            fail_fast: false,
            skips: BTreeSet::new(),
        }
    }

    /// Abort a stage on its first item failure instead of aggregating.
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Mark a stage as skipped.
    pub fn skip(mut self, stage: Stage) -> Self {
        self.skips.insert(stage);
        self
    }

    fn active(&self, stage: Stage) -> bool {
        !self.skips.contains(&stage)
    }

    /// Run the active stages in order. Returns the first fail-fast error,
    /// an aggregate [`executor::StageFailures`], or a channel
    /// configuration error.
    pub async fn run(&self, context: &ReleaseContext) -> Result<()> {
        let distributions = || context.model.distributions.values();

        if self.active(Stage::Checksum) {
            info!("Calculating checksums");
            executor::run(Stage::Checksum, distributions(), self.fail_fast, |d| {
                self.processor.checksum(context, d)
            })
            .await?;
        } else {
            debug!("Checksum stage skipped");
        }

        if self.active(Stage::Prepare) {
            info!("Preparing distributions");
            executor::run(Stage::Prepare, distributions(), self.fail_fast, |d| {
                self.processor.prepare(context, d)
            })
            .await?;
        } else {
            debug!("Prepare stage skipped");
        }

        if self.active(Stage::Package) {
            info!("Packaging distributions");
            executor::run(Stage::Package, distributions(), self.fail_fast, |d| {
                self.processor.package(context, d)
            })
            .await?;
        } else {
            debug!("Package stage skipped");
        }

        if self.active(Stage::Announce) {
            self.announce(context).await?;
        } else {
            debug!("Announce stage skipped");
        }

        Ok(())
    }

    async fn announce(&self, context: &ReleaseContext) -> Result<()> {
        let snapshot = context.model.project.is_snapshot();
        let mut active = Vec::new();

        for channel in announce::channels(&context.model) {
            if !channel.is_enabled() {
                debug!(channel = channel.name(), "Channel is disabled. Skipping");
                continue;
            }
            if snapshot && !channel.is_snapshot_supported() {
                debug!(
                    channel = channel.name(),
                    "Channel does not support snapshots. Skipping"
                );
                continue;
            }
            // Configuration failures surface before the item set runs
            channel.validate()?;
            active.push(channel);
        }

        if active.is_empty() {
            info!("No channels to announce");
            return Ok(());
        }

        info!("Announcing release");
        executor::run(
            Stage::Announce,
            active.iter(),
            self.fail_fast,
            |channel| async move { channel.execute(context).await.map_err(anyhow::Error::from) },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model;
    use crate::model::Distribution;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records which operations ran, in order.
    struct RecordingProcessor {
        calls: Mutex<Vec<String>>,
    }

    impl RecordingProcessor {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }

        fn record(&self, op: &str, distribution: &Distribution) {
            self.calls
                .lock()
                .unwrap()
                .push(format!("{}:{}", op, distribution.name));
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DistributionProcessor for RecordingProcessor {
        async fn checksum(&self, _: &ReleaseContext, d: &Distribution) -> Result<()> {
            self.record("checksum", d);
            Ok(())
        }

        async fn prepare(&self, _: &ReleaseContext, d: &Distribution) -> Result<()> {
            self.record("prepare", d);
            Ok(())
        }

        async fn package(&self, _: &ReleaseContext, d: &Distribution) -> Result<()> {
            self.record("package", d);
            Ok(())
        }
    }

    fn context() -> ReleaseContext {
        let yaml = r#"
project:
  name: duke
  version: 1.2.3
release:
  release_notes_url: x
  download_url: y
distributions:
  duke:
    name: duke
    type: BINARY
    artifacts:
      - path: dist/duke.zip
"#;
        ReleaseContext::new(model::from_yaml(yaml).unwrap(), "out", true)
    }

    #[tokio::test]
    async fn test_stages_run_in_order() {
        let pipeline = Pipeline::new(RecordingProcessor::new());
        pipeline.run(&context()).await.unwrap();

        assert_eq!(
            pipeline.processor.calls(),
            vec!["checksum:duke", "prepare:duke", "package:duke"]
        );
    }

    #[tokio::test]
    async fn test_skipped_stages_do_not_run() {
        let pipeline = Pipeline::new(RecordingProcessor::new())
            .skip(Stage::Checksum)
            .skip(Stage::Package);
        pipeline.run(&context()).await.unwrap();

        assert_eq!(pipeline.processor.calls(), vec!["prepare:duke"]);
    }

    #[tokio::test]
    async fn test_announce_with_no_channels_is_success() {
        let pipeline = Pipeline::new(RecordingProcessor::new())
            .skip(Stage::Checksum)
            .skip(Stage::Prepare)
            .skip(Stage::Package);
        assert!(pipeline.run(&context()).await.is_ok());
    }
}
