//! Command-line interface for shipwright.
//!
//! One subcommand per pipeline entry point. Commands compose stages the
//! way a release flows: `prepare` implies checksums, `package` implies
//! both, `announce` runs alone, and `full-release` runs everything.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::config;
use crate::core::{Pipeline, ReleaseContext, Stage};
use crate::model::Model;
use crate::tools::FileSystemProcessor;

/// shipwright - release pipeline orchestrator
#[derive(Parser, Debug)]
#[command(name = "shipwright")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the release file (searches for shipwright.yaml if omitted)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for produced files (checksums, staging, manifests)
    #[arg(short, long, global = true, default_value = "out")]
    pub output_dir: PathBuf,

    /// Resolve and validate everything but skip external side effects
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Abort a stage on its first failure instead of aggregating
    #[arg(long, global = true)]
    pub fail_fast: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Calculate checksums for all distributions
    Checksum,

    /// Prepare all distributions (runs checksums first)
    Prepare,

    /// Package all distributions (runs checksums and prepare first)
    Package,

    /// Announce the release on all configured channels
    Announce,

    /// Run the full pipeline: checksum, prepare, package, announce
    FullRelease {
        /// Skip the checksum stage
        #[arg(long)]
        skip_checksum: bool,

        /// Skip the prepare stage
        #[arg(long)]
        skip_prepare: bool,

        /// Skip the package stage
        #[arg(long)]
        skip_package: bool,

        /// Skip the announce stage
        #[arg(long)]
        skip_announce: bool,
    },

    /// Show the resolved configuration with secrets masked
    Config,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let model = config::load(self.config.as_deref())?;

        if let Commands::Config = self.command {
            return show_config(&model);
        }

        let context = ReleaseContext::new(model, self.output_dir, self.dry_run);
        info!("dry_run set to {}", context.dry_run);

        let pipeline = Pipeline::new(FileSystemProcessor).fail_fast(self.fail_fast);
        let pipeline = match &self.command {
            Commands::Checksum => pipeline
                .skip(Stage::Prepare)
                .skip(Stage::Package)
                .skip(Stage::Announce),
            Commands::Prepare => pipeline.skip(Stage::Package).skip(Stage::Announce),
            Commands::Package => pipeline.skip(Stage::Announce),
            Commands::Announce => pipeline
                .skip(Stage::Checksum)
                .skip(Stage::Prepare)
                .skip(Stage::Package),
            Commands::FullRelease {
                skip_checksum,
                skip_prepare,
                skip_package,
                skip_announce,
            } => {
                let mut pipeline = pipeline;
                if *skip_checksum {
                    pipeline = pipeline.skip(Stage::Checksum);
                }
                if *skip_prepare {
                    pipeline = pipeline.skip(Stage::Prepare);
                }
                if *skip_package {
                    pipeline = pipeline.skip(Stage::Package);
                }
                if *skip_announce {
                    pipeline = pipeline.skip(Stage::Announce);
                }
                pipeline
            }
            Commands::Config => unreachable!("handled above"),
        };

        pipeline.run(&context).await
    }
}

/// Print the model summary with every secret masked.
fn show_config(model: &Model) -> Result<()> {
    println!("project:");
    println!("  name: {}", model.project.name);
    println!("  version: {}", model.project.version);
    println!("  snapshot: {}", model.project.is_snapshot());

    println!("distributions:");
    for (name, distribution) in &model.distributions {
        println!("  {}: {} artifact(s)", name, distribution.artifacts.len());
    }

    println!("announce:");
    if let Some(sdkman) = &model.announce.sdkman {
        print_channel("sdkman", sdkman.masked());
    }
    if let Some(zulip) = &model.announce.zulip {
        print_channel("zulip", zulip.masked());
    }
    if let Some(mastodon) = &model.announce.mastodon {
        print_channel("mastodon", mastodon.masked());
    }

    Ok(())
}

fn print_channel(name: &str, masked: std::collections::BTreeMap<&'static str, String>) {
    println!("  {}:", name);
    for (key, value) in masked {
        println!("    {}: {}", key, value);
    }
}
