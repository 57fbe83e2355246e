//! SDKMAN vendor API channel (package index).
//!
//! Collects `.zip` artifacts from BINARY distributions, grouped by
//! canonical platform key, and publishes a release per platform through
//! the vendor API. Major releases additionally move the candidate's
//! default version. Not supported for snapshot releases.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::core::ReleaseContext;
use crate::model::announce::{SDKMAN_CONSUMER_KEY, SDKMAN_CONSUMER_TOKEN};
use crate::model::{DistributionType, SdkmanConfig};
use crate::util;

use super::{select, AnnounceError, Channel, ChannelConfigError};

const NAME: &str = "sdkman";

pub struct SdkmanChannel {
    config: SdkmanConfig,
    client: reqwest::Client,
}

impl SdkmanChannel {
    pub fn new(config: SdkmanConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Candidate identifier: explicit configuration wins, otherwise the
    /// project name.
    fn candidate(&self, context: &ReleaseContext) -> String {
        self.config
            .candidate
            .as_deref()
            .map(str::trim)
            .filter(|candidate| !candidate.is_empty())
            .unwrap_or(&context.model.project.name)
            .to_string()
    }

    async fn call(&self, method: reqwest::Method, path: &str, body: Value) -> Result<()> {
        let url = format!("{}{}", self.config.api_host, path);
        let response = self
            .client
            .request(method, &url)
            .header("Consumer-Key", self.config.resolved_consumer_key())
            .header("Consumer-Token", self.config.resolved_consumer_token())
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to reach SDKMAN vendor API at {}", url))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "SDKMAN vendor API returned {} for {}: {}",
                status,
                path,
                detail.trim()
            );
        }

        Ok(())
    }

    /// Publish one platform-specific release.
    async fn release(
        &self,
        candidate: &str,
        version: &str,
        platform: &str,
        url: &str,
    ) -> Result<()> {
        self.call(
            reqwest::Method::POST,
            "/release",
            json!({
                "candidate": candidate,
                "version": version,
                "platform": platform,
                "url": url,
            }),
        )
        .await
    }

    /// Move the candidate's default version (major releases only).
    async fn set_default(&self, candidate: &str, version: &str) -> Result<()> {
        self.call(
            reqwest::Method::PUT,
            "/default",
            json!({
                "candidate": candidate,
                "version": version,
            }),
        )
        .await
    }

    /// Broadcast the release with its notes URL.
    async fn broadcast(&self, candidate: &str, version: &str, release_notes_url: &str) -> Result<()> {
        self.call(
            reqwest::Method::POST,
            "/announce/struct",
            json!({
                "candidate": candidate,
                "version": version,
                "url": release_notes_url,
            }),
        )
        .await
    }
}

#[async_trait]
impl Channel for SdkmanChannel {
    fn name(&self) -> &'static str {
        NAME
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn is_snapshot_supported(&self) -> bool {
        false
    }

    fn validate(&self) -> Result<(), ChannelConfigError> {
        if util::is_blank(&self.config.resolved_consumer_key()) {
            return Err(ChannelConfigError::MissingCredential {
                channel: NAME,
                env_key: SDKMAN_CONSUMER_KEY,
            });
        }
        if util::is_blank(&self.config.resolved_consumer_token()) {
            return Err(ChannelConfigError::MissingCredential {
                channel: NAME,
                env_key: SDKMAN_CONSUMER_TOKEN,
            });
        }
        Ok(())
    }

    async fn execute(&self, context: &ReleaseContext) -> Result<(), AnnounceError> {
        let model = &context.model;

        // Only zips from BINARY distributions are supported
        let platforms = select::select_artifacts(model, &[DistributionType::Binary], |artifact| {
            artifact.has_extension("zip")
        })
        .map_err(|e| AnnounceError::new(NAME, e))?;

        if platforms.is_empty() {
            warn!("No suitable artifacts were found. Skipping");
            return Ok(());
        }

        let candidate = self.candidate(context);
        let version = model.project.version.clone();
        let props = model.props();
        let release_notes_url = props
            .get("releaseNotesUrl")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        if self.config.major {
            info!(candidate = %candidate, "Announcing major release");
        } else {
            info!(candidate = %candidate, "Announcing minor release");
        }

        if context.dry_run {
            for (platform, url) in &platforms {
                debug!(platform, url = %url, "dry-run: skipping SDKMAN release");
            }
            return Ok(());
        }

        for (platform, url) in &platforms {
            self.release(&candidate, &version, platform, url)
                .await
                .map_err(|e| AnnounceError::new(NAME, e))?;
        }

        if self.config.major {
            self.set_default(&candidate, &version)
                .await
                .map_err(|e| AnnounceError::new(NAME, e))?;
        }

        self.broadcast(&candidate, &version, &release_notes_url)
            .await
            .map_err(|e| AnnounceError::new(NAME, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model;

    fn config(candidate: Option<&str>) -> SdkmanConfig {
        SdkmanConfig {
            enabled: true,
            candidate: candidate.map(String::from),
            consumer_key: "key".to_string(),
            consumer_token: "token".to_string(),
            major: false,
            api_host: "https://vendors.sdkman.io".to_string(),
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
"#;
        ReleaseContext::new(model::from_yaml(yaml).unwrap(), "out", true)
    }

    #[test]
    fn test_candidate_defaults_to_project_name() {
        let channel = SdkmanChannel::new(config(None));
        assert_eq!(channel.candidate(&context()), "duke");

        let channel = SdkmanChannel::new(config(Some("  ")));
        assert_eq!(channel.candidate(&context()), "duke");

        let channel = SdkmanChannel::new(config(Some("java")));
        assert_eq!(channel.candidate(&context()), "java");
    }

    #[test]
    fn test_snapshots_not_supported() {
        let channel = SdkmanChannel::new(config(None));
        assert!(!channel.is_snapshot_supported());
    }

    #[test]
    fn test_validation_requires_credentials() {
        let mut cfg = config(None);
        cfg.consumer_key = String::new();
        let channel = SdkmanChannel::new(cfg);

        if std::env::var(SDKMAN_CONSUMER_KEY).is_err() {
            assert_eq!(
                channel.validate(),
                Err(ChannelConfigError::MissingCredential {
                    channel: "sdkman",
                    env_key: SDKMAN_CONSUMER_KEY,
                })
            );
        }
    }
}
