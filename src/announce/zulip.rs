//! Zulip channel (chat).
//!
//! Posts a rendered release message to a Zulip stream via the messages
//! API, authenticating with the bot account and its API key.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::core::ReleaseContext;
use crate::model::announce::ZULIP_API_KEY;
use crate::model::ZulipConfig;
use crate::template;
use crate::util;

use super::{AnnounceError, Channel, ChannelConfigError};

const NAME: &str = "zulip";

pub struct ZulipChannel {
    config: ZulipConfig,
    client: reqwest::Client,
}

impl ZulipChannel {
    pub fn new(config: ZulipConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    async fn send(&self, subject: &str, content: &str) -> Result<()> {
        let url = format!("{}/api/v1/messages", self.config.api_host);
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.account, Some(self.config.resolved_api_key()))
            .form(&[
                ("type", "stream"),
                ("to", self.config.channel.as_str()),
                ("subject", subject),
                ("content", content),
            ])
            .send()
            .await
            .with_context(|| format!("Failed to reach Zulip at {}", url))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!("Zulip returned {}: {}", status, detail.trim());
        }

        Ok(())
    }
}

#[async_trait]
impl Channel for ZulipChannel {
    fn name(&self) -> &'static str {
        NAME
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn validate(&self) -> Result<(), ChannelConfigError> {
        if util::is_blank(&self.config.account) {
            return Err(ChannelConfigError::MissingField {
                channel: NAME,
                field: "account",
            });
        }
        if util::is_blank(&self.config.api_host) {
            return Err(ChannelConfigError::MissingField {
                channel: NAME,
                field: "api_host",
            });
        }
        if util::is_blank(&self.config.resolved_api_key()) {
            return Err(ChannelConfigError::MissingCredential {
                channel: NAME,
                env_key: ZULIP_API_KEY,
            });
        }
        Ok(())
    }

    async fn execute(&self, context: &ReleaseContext) -> Result<(), AnnounceError> {
        let props = context.model.props();
        let subject = template::render(&self.config.subject, &props);
        let content = template::render(&self.config.message, &props);

        if context.dry_run {
            debug!(subject = %subject, "dry-run: skipping Zulip message");
            return Ok(());
        }

        info!(channel = %self.config.channel, "Posting release message to Zulip");
        self.send(&subject, &content)
            .await
            .map_err(|e| AnnounceError::new(NAME, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model;

    fn config() -> ZulipConfig {
        serde_yaml::from_str(
            r#"
enabled: true
account: bot@example.org
api_key: secret
api_host: https://chat.example.org
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_default_templates_render() {
        let yaml = r#"
project:
  name: duke
  version: 1.2.3
release:
  release_notes_url: "https://acme.org/duke/v{{projectVersion}}"
  download_url: y
"#;
        let model = model::from_yaml(yaml).unwrap();
        let props = model.props();
        let config = config();

        assert_eq!(
            template::render(&config.subject, &props),
            "Duke 1.2.3 released!"
        );
        assert_eq!(
            template::render(&config.message, &props),
            "\u{1F680} Duke 1.2.3 has been released! https://acme.org/duke/v1.2.3"
        );
    }

    #[test]
    fn test_validation_requires_account() {
        let mut cfg = config();
        cfg.account = String::new();
        let channel = ZulipChannel::new(cfg);

        assert_eq!(
            channel.validate(),
            Err(ChannelConfigError::MissingField {
                channel: "zulip",
                field: "account",
            })
        );
    }

    #[test]
    fn test_snapshots_supported() {
        let channel = ZulipChannel::new(config());
        assert!(channel.is_snapshot_supported());
    }
}
