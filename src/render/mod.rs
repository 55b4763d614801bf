//! Slide composition: layout planning, fonts, and rasterized text.

pub mod font;
pub mod layout;
pub mod slide;

pub use font::Fonts;
pub use slide::{compose_slide, render_background};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while composing slides.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No usable font found; set fonts.title and fonts.body in the style file")]
    NoFont,

    #[error("Invalid font file: {0}")]
    InvalidFont(PathBuf),

    #[error("Failed to read font {path}: {source}")]
    FontRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to open background image {path}: {source}")]
    Background {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error(transparent)]
    Color(#[from] crate::style::StyleError),
}
