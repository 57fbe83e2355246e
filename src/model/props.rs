//! Property resolution for template interpolation.
//!
//! Builds the flattened key/value map every channel renders its templates
//! against. Flat camelCase keys are provided for the common cases, plus a
//! nested `project` group resolvable through dotted template keys.

use chrono::Utc;
use serde_json::{json, Value};

use crate::template::{self, Props};
use crate::util;

use super::Model;

impl Model {
    /// Build the property map for this model. The release-notes URL is
    /// rendered eagerly since channels only ever need its final form; the
    /// download URL stays a template because it depends on the artifact.
    pub fn props(&self) -> Props {
        let mut props = Props::new();

        props.insert("projectName".to_string(), json!(self.project.name));
        props.insert(
            "projectNameCapitalized".to_string(),
            json!(util::capitalize(&self.project.name)),
        );
        props.insert("projectVersion".to_string(), json!(self.project.version));
        props.insert(
            "projectSnapshot".to_string(),
            json!(self.project.is_snapshot()),
        );
        props.insert(
            "timestamp".to_string(),
            json!(Utc::now().to_rfc3339()),
        );
        props.insert(
            "project".to_string(),
            json!({
                "name": self.project.name,
                "version": self.project.version,
                "snapshot": self.project.is_snapshot(),
            }),
        );

        let release_notes_url = template::render(&self.release.release_notes_url, &props);
        props.insert("releaseNotesUrl".to_string(), json!(release_notes_url));

        props
    }

    /// Property map extended with an artifact file name, as used when
    /// resolving per-artifact download URLs.
    pub fn artifact_props(&self, file_name: &str) -> Props {
        let mut props = self.props();
        props.insert("artifactFileName".to_string(), Value::String(file_name.to_string()));
        props
    }
}
