//! Minimal `{{key}}` template rendering against a property map.
//!
//! Placeholders are interpolated from a [`Props`] map. Dotted keys
//! (`{{project.name}}`) descend into nested object values. Rendering is a
//! pure function of its inputs: no caching, no side effects.

use serde_json::Value;
use thiserror::Error;

/// Property map used for interpolation. Values may be scalars or nested
/// objects (resolved through dotted keys).
pub type Props = serde_json::Map<String, Value>;

/// A placeholder that could not be resolved while rendering a labeled
/// template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not resolve '{key}' while rendering '{label}'")]
pub struct TemplateError {
    /// Diagnostic label naming the template being rendered.
    pub label: String,
    /// The placeholder key that failed to resolve.
    pub key: String,
}

/// Render a template, replacing unresolved placeholders with the empty
/// string.
pub fn render(template: &str, props: &Props) -> String {
    interpolate(template, props, None).unwrap_or_default()
}

/// Render a template, failing on the first unresolved placeholder. The
/// `label` names the template in the resulting error.
pub fn try_render(template: &str, props: &Props, label: &str) -> Result<String, TemplateError> {
    interpolate(template, props, Some(label))
}

fn interpolate(template: &str, props: &Props, label: Option<&str>) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        match after.find("}}") {
            Some(end) => {
                let key = after[..end].trim();
                match lookup(props, key) {
                    Some(value) => out.push_str(&coerce(value)),
                    None => {
                        if let Some(label) = label {
                            return Err(TemplateError {
                                label: label.to_string(),
                                key: key.to_string(),
                            });
                        }
                        // Missing keys render as empty
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                // Unterminated placeholder: emit verbatim
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    Ok(out)
}

/// Resolve a key against the map: direct (flat) keys first, then dotted
/// descent into nested objects.
fn lookup<'a>(props: &'a Props, key: &str) -> Option<&'a Value> {
    if let Some(value) = props.get(key) {
        return Some(value);
    }

    let mut parts = key.split('.');
    let mut current = props.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// Coerce a property value to its textual form. Strings render without
/// quotes; null renders empty.
fn coerce(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
