//! Artifact selection for channel publication.
//!
//! Filters a model's distributions down to the artifacts a channel can
//! publish, grouped by canonical platform key, each resolved to a
//! download URL.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::model::{Artifact, DistributionType, Model};
use crate::template::{self, TemplateError};

use super::platform;

/// Collect eligible artifacts as a canonical-platform-key to download-URL
/// mapping.
///
/// Distributions are visited in model order; those whose type is not in
/// `supported` are skipped entirely. Artifacts failing the eligibility
/// predicate or platform classification are skipped with a note. When two
/// artifacts classify to the same key the later one wins and a warning
/// names both values. An empty result means "nothing to announce" and is
/// the caller's decision to report, not an error.
pub fn select_artifacts<F>(
    model: &Model,
    supported: &[DistributionType],
    eligible: F,
) -> Result<BTreeMap<&'static str, String>, TemplateError>
where
    F: Fn(&Artifact) -> bool,
{
    let mut selected = BTreeMap::new();

    for distribution in model.distributions.values() {
        if !supported.contains(&distribution.dtype) {
            continue;
        }

        for artifact in &distribution.artifacts {
            if !eligible(artifact) {
                debug!(
                    artifact = %artifact.file_name(),
                    "Artifact is not suitable for publication. Skipping"
                );
                continue;
            }

            let Some(key) = platform::classify(&artifact.platform) else {
                warn!(
                    artifact = %artifact.file_name(),
                    platform = %artifact.platform,
                    "Unsupported platform. Skipping"
                );
                continue;
            };

            let props = model.artifact_props(&artifact.file_name());
            let url = template::try_render(&model.release.download_url, &props, "downloadUrl")?;

            if let Some(discarded) = selected.insert(key, url.clone()) {
                warn!(
                    platform = key,
                    kept = %url,
                    discarded = %discarded,
                    "Platform already mapped, replacing"
                );
            }
        }
    }

    Ok(selected)
}
