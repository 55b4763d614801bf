//! YAML frontmatter extraction.
//!
//! Frontmatter is metadata at the start of a script, delimited by `---`
//! lines:
//!
//! ```markdown
//! ---
//! title: Morning routine
//! bgm: assets/loop.mp3
//! ---
//!
//! # Morning routine
//!
//! - Wake at the same time
//! ```
//!
//! Scripts are required to open with frontmatter; a file without it (or
//! with an unterminated block) is rejected.

use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::ScriptError;

/// Typed frontmatter keys, with everything else collected into `extra`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Frontmatter {
    /// Optional project title; the rendered title comes from the body H1.
    pub title: Option<String>,

    /// Background music file mixed under the video.
    pub bgm: Option<PathBuf>,

    /// Remaining keys, kept so scripts can carry their own metadata.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Split a script into parsed frontmatter and the remaining body.
pub fn extract_frontmatter(content: &str) -> Result<(Frontmatter, &str), ScriptError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let after_open = content
        .strip_prefix("---")
        .ok_or(ScriptError::MissingFrontmatter)?;
    let after_open = after_open
        .strip_prefix("\r\n")
        .or_else(|| after_open.strip_prefix('\n'))
        .ok_or(ScriptError::MissingFrontmatter)?;

    let mut offset = 0usize;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let raw = &after_open[..offset];
            let body = &after_open[offset + line.len()..];
            let frontmatter = if raw.trim().is_empty() {
                Frontmatter::default()
            } else {
                serde_yaml::from_str(raw)?
            };
            return Ok((frontmatter, body));
        }
        offset += line.len();
    }

    Err(ScriptError::MissingFrontmatter)
}
