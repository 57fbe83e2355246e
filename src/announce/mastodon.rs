//! Mastodon channel (social).
//!
//! Posts a rendered status to a Mastodon instance with a bearer access
//! token.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use crate::core::ReleaseContext;
use crate::model::announce::MASTODON_ACCESS_TOKEN;
use crate::model::MastodonConfig;
use crate::template;
use crate::util;

use super::{AnnounceError, Channel, ChannelConfigError};

const NAME: &str = "mastodon";

pub struct MastodonChannel {
    config: MastodonConfig,
    client: reqwest::Client,
}

impl MastodonChannel {
    pub fn new(config: MastodonConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    async fn post_status(&self, status: &str) -> Result<()> {
        let url = format!("{}/api/v1/statuses", self.config.host);
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.config.resolved_access_token())
            .json(&json!({ "status": status }))
            .send()
            .await
            .with_context(|| format!("Failed to reach Mastodon at {}", url))?;

        let status_code = response.status();
        if !status_code.is_success() {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!("Mastodon returned {}: {}", status_code, detail.trim());
        }

        Ok(())
    }
}

#[async_trait]
impl Channel for MastodonChannel {
    fn name(&self) -> &'static str {
        NAME
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn validate(&self) -> Result<(), ChannelConfigError> {
        if util::is_blank(&self.config.host) {
            return Err(ChannelConfigError::MissingField {
                channel: NAME,
                field: "host",
            });
        }
        if util::is_blank(&self.config.resolved_access_token()) {
            return Err(ChannelConfigError::MissingCredential {
                channel: NAME,
                env_key: MASTODON_ACCESS_TOKEN,
            });
        }
        Ok(())
    }

    async fn execute(&self, context: &ReleaseContext) -> Result<(), AnnounceError> {
        let props = context.model.props();
        let status = template::render(&self.config.status, &props);

        if context.dry_run {
            debug!(status = %status, "dry-run: skipping Mastodon status");
            return Ok(());
        }

        info!(host = %self.config.host, "Posting release status to Mastodon");
        self.post_status(&status)
            .await
            .map_err(|e| AnnounceError::new(NAME, e))
    }
}
