//! Style configuration for slide composition and encoding.
//!
//! Styling is stored in YAML, `config/style.yaml` by default:
//!
//! ```yaml
//! size:
//!   width: 1080
//!   height: 1920
//! layout:
//!   safe_padding_px: 72
//!   max_chars_per_line: 22
//!   line_spacing: 1.15
//!   slide_sec: 7.0
//! background:
//!   image: assets/background.png
//!   color: "#ffffff"
//! fonts:
//!   title: assets/NotoSansJP-Bold.otf
//!   body: assets/NotoSansJP-Regular.otf
//!   title_size: 72.0
//!   body_size: 56.0
//! colors:
//!   fg_title: "#111111"
//!   fg_body: "#111111"
//! video:
//!   fps: 30
//! ```
//!
//! Every field has a default, so a partial file only overrides what it
//! names.

use image::Rgb;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or validating a style file.
#[derive(Error, Debug)]
pub enum StyleError {
    #[error("Config not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Root style document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub size: CanvasSize,
    pub layout: Layout,
    pub background: Background,
    pub fonts: FontStyle,
    pub colors: Colors,
    pub video: Video,
}

/// Output canvas dimensions in pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
        }
    }
}

/// Text placement and timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Margin from the canvas edge, in pixels.
    pub safe_padding_px: u32,
    /// Wrap width, in characters.
    pub max_chars_per_line: usize,
    /// Line advance as a multiple of the font size.
    pub line_spacing: f32,
    /// Seconds each slide is held.
    pub slide_sec: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            safe_padding_px: 72,
            max_chars_per_line: 22,
            line_spacing: 1.15,
            slide_sec: 7.0,
        }
    }
}

/// Slide background: an image resized to the canvas, or a solid fill.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Background {
    pub image: Option<PathBuf>,
    pub color: String,
}

impl Default for Background {
    fn default() -> Self {
        Self {
            image: None,
            color: "#ffffff".into(),
        }
    }
}

/// Font faces and sizes for the title and body blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontStyle {
    pub title: Option<PathBuf>,
    pub body: Option<PathBuf>,
    pub title_size: f32,
    pub body_size: f32,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            title: None,
            body: None,
            title_size: 72.0,
            body_size: 56.0,
        }
    }
}

/// Text colors as `#rrggbb` hex strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Colors {
    pub fg_title: String,
    pub fg_body: String,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            fg_title: "#111111".into(),
            fg_body: "#111111".into(),
        }
    }
}

/// Encoder parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Video {
    pub fps: u32,
}

impl Default for Video {
    fn default() -> Self {
        Self { fps: 30 }
    }
}

impl Style {
    /// Load and validate a style file. A missing file is an error naming
    /// the path so the remediation is obvious.
    pub fn load(path: &Path) -> Result<Self, StyleError> {
        if !path.exists() {
            return Err(StyleError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let style: Self = serde_yaml::from_str(&content)?;
        style.validate()?;
        Ok(style)
    }

    /// Validate the style document.
    pub fn validate(&self) -> Result<(), StyleError> {
        if self.size.width == 0 || self.size.height == 0 {
            return Err(StyleError::Validation(
                "canvas dimensions must be positive".into(),
            ));
        }
        if self.size.width % 2 != 0 || self.size.height % 2 != 0 {
            return Err(StyleError::Validation(
                "canvas dimensions must be even for H.264 output".into(),
            ));
        }
        if self.layout.slide_sec <= 0.0 {
            return Err(StyleError::Validation("slide_sec must be positive".into()));
        }
        if self.layout.max_chars_per_line == 0 {
            return Err(StyleError::Validation(
                "max_chars_per_line must be positive".into(),
            ));
        }
        if self.layout.line_spacing <= 0.0 {
            return Err(StyleError::Validation(
                "line_spacing must be positive".into(),
            ));
        }
        if self.fonts.title_size <= 0.0 || self.fonts.body_size <= 0.0 {
            return Err(StyleError::Validation("font sizes must be positive".into()));
        }
        if !(1..=120).contains(&self.video.fps) {
            return Err(StyleError::Validation(
                "fps must be between 1 and 120".into(),
            ));
        }
        parse_hex_color(&self.background.color)?;
        parse_hex_color(&self.colors.fg_title)?;
        parse_hex_color(&self.colors.fg_body)?;
        Ok(())
    }
}

/// Parse a `#rgb` or `#rrggbb` hex color, case-insensitive.
pub fn parse_hex_color(value: &str) -> Result<Rgb<u8>, StyleError> {
    let invalid = || StyleError::Validation(format!("invalid color: {value:?}"));

    let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
    let digits: Vec<u32> = hex
        .chars()
        .map(|c| c.to_digit(16))
        .collect::<Option<_>>()
        .ok_or_else(invalid)?;

    match digits.len() {
        3 => Ok(Rgb([
            (digits[0] * 17) as u8,
            (digits[1] * 17) as u8,
            (digits[2] * 17) as u8,
        ])),
        6 => Ok(Rgb([
            (digits[0] * 16 + digits[1]) as u8,
            (digits[2] * 16 + digits[3]) as u8,
            (digits[4] * 16 + digits[5]) as u8,
        ])),
        _ => Err(invalid()),
    }
}
