//! Font resolution and loading.
//!
//! The configured face is used when it loads; otherwise a small set of
//! common system faces is searched and the substitution is logged. There
//! is no bundled fallback face, so an empty search is a hard error that
//! names the style keys to set.

use ab_glyph::FontVec;
use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::RenderError;
use crate::style::FontStyle;

/// Common system font locations probed when no usable face is configured.
static SYSTEM_FONT_CANDIDATES: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
        "/System/Library/Fonts/Helvetica.ttc",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/Library/Fonts/Arial.ttf",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect()
});

/// Loaded faces for the title and body blocks.
pub struct Fonts {
    pub title: FontVec,
    pub body: FontVec,
}

impl Fonts {
    /// Resolve both faces from the style configuration.
    pub fn load(fonts: &FontStyle) -> Result<Self, RenderError> {
        let title = load_font(fonts.title.as_deref())?;
        let body = load_font(fonts.body.as_deref())?;
        Ok(Self { title, body })
    }
}

/// Load the configured face, falling back to a system search.
pub fn load_font(configured: Option<&Path>) -> Result<FontVec, RenderError> {
    if let Some(path) = configured {
        match read_font(path) {
            Ok(font) => {
                debug!(path = %path.display(), "loaded configured font");
                return Ok(font);
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "configured font unusable, searching system fonts"
                );
            }
        }
    }

    for candidate in SYSTEM_FONT_CANDIDATES.iter() {
        if !candidate.exists() {
            continue;
        }
        if let Ok(font) = read_font(candidate) {
            debug!(path = %candidate.display(), "using system font");
            return Ok(font);
        }
    }

    Err(RenderError::NoFont)
}

fn read_font(path: &Path) -> Result<FontVec, RenderError> {
    let data = std::fs::read(path).map_err(|source| RenderError::FontRead {
        path: path.to_path_buf(),
        source,
    })?;
    // Index 0 also covers .ttc collections.
    FontVec::try_from_vec_and_index(data, 0)
        .map_err(|_| RenderError::InvalidFont(path.to_path_buf()))
}
