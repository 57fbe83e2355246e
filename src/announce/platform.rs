//! Platform classification for channel publication.
//!
//! Maps a free-form build platform tag to the fixed identifier a channel
//! backend expects. The cascade is an ordered table of (predicate, key)
//! pairs evaluated top to bottom over the lower-cased tag; the first match
//! wins and downstream consumers key off these exact literals, so the
//! order must not change.

/// Fallback key for artifacts with no platform tag.
pub const UNIVERSAL: &str = "UNIVERSAL";
pub const MAC_OSX: &str = "MAC_OSX";
pub const MAC_ARM64: &str = "MAC_ARM64";
pub const WINDOWS_64: &str = "WINDOWS_64";
pub const LINUX_64: &str = "LINUX_64";
pub const LINUX_32: &str = "LINUX_32";
pub const LINUX_ARM32: &str = "LINUX_ARM32";

type Predicate = fn(&str) -> bool;

static RULES: &[(Predicate, &str)] = &[
    (
        |tag| (tag.contains("mac") || tag.contains("osx")) && tag.contains("arm"),
        MAC_ARM64,
    ),
    (|tag| tag.contains("mac") || tag.contains("osx"), MAC_OSX),
    (|tag| tag.contains("win"), WINDOWS_64),
    (|tag| tag.contains("linux") && tag.contains("x86_64"), LINUX_64),
    (|tag| tag.contains("linux") && tag.contains("x86_32"), LINUX_32),
    // arm32 vs arm64 cannot be told apart from the tag alone; all ARM
    // Linux artifacts map to the 32-bit key
    (|tag| tag.contains("linux") && tag.contains("arm"), LINUX_ARM32),
    (|tag| tag.contains("linux"), LINUX_32),
];

/// Classify a platform tag. Blank tags map to [`UNIVERSAL`]; a tag that
/// matches no rule returns `None`, meaning the artifact is unsupported and
/// must be skipped (not an error).
pub fn classify(tag: &str) -> Option<&'static str> {
    let tag = tag.trim().to_lowercase();
    if tag.is_empty() {
        return Some(UNIVERSAL);
    }

    RULES
        .iter()
        .find(|(matches, _)| matches(&tag))
        .map(|&(_, key)| key)
}
