//! Distribution processing: checksum, prepare, package.
//!
//! The pipeline delegates per-distribution work to a
//! [`DistributionProcessor`]. The default implementation works against
//! the local filesystem: SHA-256 checksums, a staging directory, and a
//! JSON manifest per distribution.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::core::ReleaseContext;
use crate::model::{Artifact, Distribution, DistributionType};

/// Per-distribution operations consumed by the checksum, prepare and
/// package stages.
#[async_trait]
pub trait DistributionProcessor: Send + Sync {
    async fn checksum(&self, context: &ReleaseContext, distribution: &Distribution) -> Result<()>;
    async fn prepare(&self, context: &ReleaseContext, distribution: &Distribution) -> Result<()>;
    async fn package(&self, context: &ReleaseContext, distribution: &Distribution) -> Result<()>;
}

/// Default processor backed by the local filesystem.
///
/// Layout under the context's output directory:
/// - `checksums/<distribution>/<file>.sha256`
/// - `prepare/<distribution>/<file>`
/// - `package/<distribution>/manifest.json`
pub struct FileSystemProcessor;

impl FileSystemProcessor {
    fn checksum_path(&self, context: &ReleaseContext, distribution: &Distribution, artifact: &Artifact) -> PathBuf {
        context
            .output_dir
            .join("checksums")
            .join(&distribution.name)
            .join(format!("{}.sha256", artifact.file_name()))
    }

    async fn read_artifact(&self, artifact: &Artifact) -> Result<Vec<u8>> {
        tokio::fs::read(&artifact.path)
            .await
            .with_context(|| format!("Failed to read artifact: {}", artifact.path.display()))
    }

    /// Checksum for the manifest: the modeled value when the build
    /// supplied one, otherwise the file written by the checksum stage.
    async fn resolved_checksum(
        &self,
        context: &ReleaseContext,
        distribution: &Distribution,
        artifact: &Artifact,
    ) -> Option<String> {
        if let Some(checksum) = &artifact.checksum {
            return Some(checksum.clone());
        }

        let path = self.checksum_path(context, distribution, artifact);
        let content = tokio::fs::read_to_string(&path).await.ok()?;
        content.split_whitespace().next().map(String::from)
    }
}

#[async_trait]
impl DistributionProcessor for FileSystemProcessor {
    async fn checksum(&self, context: &ReleaseContext, distribution: &Distribution) -> Result<()> {
        for artifact in &distribution.artifacts {
            let bytes = self.read_artifact(artifact).await?;
            let digest = hex::encode(Sha256::digest(&bytes));

            if context.dry_run {
                debug!(artifact = %artifact.file_name(), sha256 = %digest, "dry-run: skipping checksum file");
                continue;
            }

            let path = self.checksum_path(context, distribution, artifact);
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&path, format!("{}  {}\n", digest, artifact.file_name()))
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;

            info!(artifact = %artifact.file_name(), "Checksum written");
        }

        Ok(())
    }

    async fn prepare(&self, context: &ReleaseContext, distribution: &Distribution) -> Result<()> {
        let staging = context.output_dir.join("prepare").join(&distribution.name);

        for artifact in &distribution.artifacts {
            // Validate the artifact exists even in dry-run mode
            tokio::fs::metadata(&artifact.path)
                .await
                .with_context(|| format!("Missing artifact: {}", artifact.path.display()))?;

            if context.dry_run {
                debug!(artifact = %artifact.file_name(), "dry-run: skipping staging copy");
                continue;
            }

            tokio::fs::create_dir_all(&staging).await?;
            let target = staging.join(artifact.file_name());
            tokio::fs::copy(&artifact.path, &target)
                .await
                .with_context(|| format!("Failed to stage {}", artifact.path.display()))?;
        }

        info!(distribution = %distribution.name, "Prepared");
        Ok(())
    }

    async fn package(&self, context: &ReleaseContext, distribution: &Distribution) -> Result<()> {
        let mut artifacts = Vec::new();
        for artifact in &distribution.artifacts {
            artifacts.push(json!({
                "file": artifact.file_name(),
                "platform": artifact.platform,
                "checksum": self.resolved_checksum(context, distribution, artifact).await,
            }));
        }

        let manifest = json!({
            "name": distribution.name,
            "type": type_name(distribution.dtype),
            "version": context.model.project.version,
            "artifacts": artifacts,
        });

        if context.dry_run {
            debug!(distribution = %distribution.name, "dry-run: skipping manifest");
            return Ok(());
        }

        let dir = context.output_dir.join("package").join(&distribution.name);
        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join("manifest.json");
        tokio::fs::write(&path, serde_json::to_vec_pretty(&manifest)?)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!(distribution = %distribution.name, "Packaged");
        Ok(())
    }
}

fn type_name(dtype: DistributionType) -> &'static str {
    match dtype {
        DistributionType::Binary => "BINARY",
        DistributionType::JavaBinary => "JAVA_BINARY",
        DistributionType::NativeImage => "NATIVE_IMAGE",
        DistributionType::NativePackage => "NATIVE_PACKAGE",
    }
}
