//! Announcement channels.
//!
//! Every integration (chat, package index, social) implements the same
//! [`Channel`] contract and is composed into the announce stage by
//! configuration presence: an absent configuration block means the
//! channel does not exist for this run.

pub mod mastodon;
pub mod platform;
pub mod sdkman;
pub mod select;
pub mod zulip;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::ReleaseContext;
use crate::model::Model;

pub use mastodon::MastodonChannel;
pub use sdkman::SdkmanChannel;
pub use zulip::ZulipChannel;

/// Failure of a channel's external side effect, wrapping the lower-level
/// cause.
#[derive(Debug, Error)]
#[error("announcement via '{channel}' failed: {cause}")]
pub struct AnnounceError {
    pub channel: &'static str,
    pub cause: anyhow::Error,
}

impl AnnounceError {
    pub fn new(channel: &'static str, cause: impl Into<anyhow::Error>) -> Self {
        Self {
            channel,
            cause: cause.into(),
        }
    }
}

/// Invalid channel configuration, detected before the channel enters the
/// announce stage's item set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelConfigError {
    #[error("channel '{channel}' is missing required credential (set {env_key} or configure it)")]
    MissingCredential {
        channel: &'static str,
        env_key: &'static str,
    },

    #[error("channel '{channel}' requires '{field}' to be set")]
    MissingField {
        channel: &'static str,
        field: &'static str,
    },
}

/// Uniform contract every announcement integration implements.
///
/// `execute` performs the channel-specific side effect. Implementations
/// must honor `context.dry_run` themselves: all resolution and validation
/// still runs, only the outbound call is elided.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Stable identifier used in log lines and aggregate reporting.
    fn name(&self) -> &'static str;

    /// Read from the channel's own configuration block.
    fn is_enabled(&self) -> bool;

    /// Static per-variant capability; channels returning false are
    /// silently skipped for snapshot releases.
    fn is_snapshot_supported(&self) -> bool {
        true
    }

    /// Validate configuration (credentials, required fields) before the
    /// channel enters the announce item set.
    fn validate(&self) -> Result<(), ChannelConfigError>;

    /// Perform the announcement.
    async fn execute(&self, context: &ReleaseContext) -> Result<(), AnnounceError>;
}

/// Build the channel set for a model, keyed by configuration presence.
/// Channels are returned in a fixed order so announce runs are
/// deterministic.
pub fn channels(model: &Model) -> Vec<Box<dyn Channel>> {
    let mut list: Vec<Box<dyn Channel>> = Vec::new();

    if let Some(config) = &model.announce.sdkman {
        list.push(Box::new(SdkmanChannel::new(config.clone())));
    }
    if let Some(config) = &model.announce.zulip {
        list.push(Box::new(ZulipChannel::new(config.clone())));
    }
    if let Some(config) = &model.announce.mastodon {
        list.push(Box::new(MastodonChannel::new(config.clone())));
    }

    list
}
