//! Per-channel announce configuration.
//!
//! Each channel owns exactly one optional configuration block; an absent
//! block means the channel is disabled and never enters the announce
//! stage. Diagnostic views replace resolved secrets with masked markers
//! and never reveal length or content.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::util;

/// Environment variable consulted for the SDKMAN consumer key.
pub const SDKMAN_CONSUMER_KEY: &str = "SDKMAN_CONSUMER_KEY";
/// Environment variable consulted for the SDKMAN consumer token.
pub const SDKMAN_CONSUMER_TOKEN: &str = "SDKMAN_CONSUMER_TOKEN";
/// Environment variable consulted for the Zulip API key.
pub const ZULIP_API_KEY: &str = "ZULIP_API_KEY";
/// Environment variable consulted for the Mastodon access token.
pub const MASTODON_ACCESS_TOKEN: &str = "MASTODON_ACCESS_TOKEN";

/// The set of configured announce channels.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Announce {
    #[serde(default)]
    pub sdkman: Option<SdkmanConfig>,
    #[serde(default)]
    pub zulip: Option<ZulipConfig>,
    #[serde(default)]
    pub mastodon: Option<MastodonConfig>,
}

/// SDKMAN vendor API configuration (package-index channel).
#[derive(Debug, Clone, Deserialize)]
pub struct SdkmanConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Candidate identifier; defaults to the project name.
    #[serde(default)]
    pub candidate: Option<String>,
    #[serde(default)]
    pub consumer_key: String,
    #[serde(default)]
    pub consumer_token: String,
    /// Major releases also move the default version for the candidate.
    #[serde(default)]
    pub major: bool,
    /// Vendor API host; overridable for testing.
    #[serde(default = "default_sdkman_host")]
    pub api_host: String,
}

fn default_sdkman_host() -> String {
    "https://vendors.sdkman.io".to_string()
}

impl SdkmanConfig {
    pub fn resolved_consumer_key(&self) -> String {
        util::resolve(SDKMAN_CONSUMER_KEY, &self.consumer_key)
    }

    pub fn resolved_consumer_token(&self) -> String {
        util::resolve(SDKMAN_CONSUMER_TOKEN, &self.consumer_token)
    }

    /// Diagnostic view with secrets masked.
    pub fn masked(&self) -> BTreeMap<&'static str, String> {
        let mut map = BTreeMap::new();
        map.insert("enabled", self.enabled.to_string());
        map.insert("candidate", self.candidate.clone().unwrap_or_default());
        map.insert(
            "consumerKey",
            util::mask(&self.resolved_consumer_key()).to_string(),
        );
        map.insert(
            "consumerToken",
            util::mask(&self.resolved_consumer_token()).to_string(),
        );
        map.insert("major", self.major.to_string());
        map.insert("apiHost", self.api_host.clone());
        map
    }
}

/// Zulip configuration (chat channel).
#[derive(Debug, Clone, Deserialize)]
pub struct ZulipConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Bot account email used for basic auth.
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub api_key: String,
    /// Zulip site, e.g. `https://yourzulip.zulipchat.com`.
    #[serde(default)]
    pub api_host: String,
    #[serde(default = "default_channel")]
    pub channel: String,
    #[serde(default = "default_subject")]
    pub subject: String,
    /// Message template rendered against the model properties.
    #[serde(default = "default_message")]
    pub message: String,
}

fn default_channel() -> String {
    "announce".to_string()
}

fn default_subject() -> String {
    "{{projectNameCapitalized}} {{projectVersion}} released!".to_string()
}

fn default_message() -> String {
    "\u{1F680} {{projectNameCapitalized}} {{projectVersion}} has been released! {{releaseNotesUrl}}"
        .to_string()
}

impl ZulipConfig {
    pub fn resolved_api_key(&self) -> String {
        util::resolve(ZULIP_API_KEY, &self.api_key)
    }

    /// Diagnostic view with secrets masked.
    pub fn masked(&self) -> BTreeMap<&'static str, String> {
        let mut map = BTreeMap::new();
        map.insert("enabled", self.enabled.to_string());
        map.insert("account", self.account.clone());
        map.insert("apiKey", util::mask(&self.resolved_api_key()).to_string());
        map.insert("apiHost", self.api_host.clone());
        map.insert("channel", self.channel.clone());
        map.insert("subject", self.subject.clone());
        map.insert("message", self.message.clone());
        map
    }
}

/// Mastodon configuration (social channel).
#[derive(Debug, Clone, Deserialize)]
pub struct MastodonConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Instance host, e.g. `https://fosstodon.org`.
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub access_token: String,
    /// Status template rendered against the model properties.
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "\u{1F680} {{projectNameCapitalized}} {{projectVersion}} has been released! {{releaseNotesUrl}}"
        .to_string()
}

impl MastodonConfig {
    pub fn resolved_access_token(&self) -> String {
        util::resolve(MASTODON_ACCESS_TOKEN, &self.access_token)
    }

    /// Diagnostic view with secrets masked.
    pub fn masked(&self) -> BTreeMap<&'static str, String> {
        let mut map = BTreeMap::new();
        map.insert("enabled", self.enabled.to_string());
        map.insert("host", self.host.clone());
        map.insert(
            "accessToken",
            util::mask(&self.resolved_access_token()).to_string(),
        );
        map.insert("status", self.status.clone());
        map
    }
}
