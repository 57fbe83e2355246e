//! The release model: project metadata, distributions, artifacts, and
//! announce configuration.
//!
//! The model is deserialized once from YAML and treated as immutable for
//! the duration of a pipeline run. No stage mutates a distribution's
//! artifact list.

pub mod announce;
pub mod props;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

pub use announce::{Announce, MastodonConfig, SdkmanConfig, ZulipConfig};

/// Root of the release model.
#[derive(Debug, Clone, Deserialize)]
pub struct Model {
    pub project: Project,
    pub release: Release,
    /// Distributions keyed by name. Iteration order is the key order,
    /// which keeps stage execution deterministic.
    #[serde(default)]
    pub distributions: BTreeMap<String, Distribution>,
    #[serde(default)]
    pub announce: Announce,
}

impl Model {
    /// Validate the model before any stage runs.
    pub fn validate(&self) -> Result<()> {
        if self.project.name.trim().is_empty() {
            anyhow::bail!("project name cannot be empty");
        }
        if self.project.version.trim().is_empty() {
            anyhow::bail!("project version cannot be empty");
        }

        for (name, distribution) in &self.distributions {
            if distribution.artifacts.is_empty() {
                anyhow::bail!("distribution '{}' has no artifacts", name);
            }
        }

        Ok(())
    }
}

/// Project metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub name: String,
    pub version: String,
}

impl Project {
    /// Snapshot (pre-release) versions end with `-SNAPSHOT`.
    pub fn is_snapshot(&self) -> bool {
        self.version.ends_with("-SNAPSHOT")
    }
}

/// Source-host release descriptor. Both fields are `{{key}}` templates
/// rendered against the model's property map.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// Template for the published release-notes page.
    pub release_notes_url: String,
    /// Template for a single artifact download. May reference
    /// `{{artifactFileName}}` in addition to the model properties.
    pub download_url: String,
}

/// A named, typed bundle of release artifacts.
#[derive(Debug, Clone, Deserialize)]
pub struct Distribution {
    pub name: String,
    #[serde(rename = "type")]
    pub dtype: DistributionType,
    pub artifacts: Vec<Artifact>,
}

/// Closed set of distribution types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DistributionType {
    Binary,
    JavaBinary,
    NativeImage,
    NativePackage,
}

/// A single packaged file belonging to a distribution.
#[derive(Debug, Clone, Deserialize)]
pub struct Artifact {
    pub path: PathBuf,
    /// Free-form build platform tag; may be empty for universal artifacts.
    #[serde(default)]
    pub platform: String,
    /// Checksum computed by the build, if any. The pipeline only reads it.
    #[serde(default)]
    pub checksum: Option<String>,
}

impl Artifact {
    /// The artifact's file name, used for download-URL templating.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// File extension check used by channel eligibility predicates.
    pub fn has_extension(&self, extension: &str) -> bool {
        self.path.extension().and_then(|ext| ext.to_str()) == Some(extension)
    }
}

/// Parse a model from YAML content.
pub fn from_yaml(content: &str) -> Result<Model> {
    let model: Model = serde_yaml::from_str(content)?;
    model.validate()?;
    Ok(model)
}

/// Load a model from a YAML file.
pub fn from_file(path: &Path) -> Result<Model> {
    use anyhow::Context;

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read release file: {}", path.display()))?;
    from_yaml(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
