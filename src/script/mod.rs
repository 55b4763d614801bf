//! Markdown script model and parsing.
//!
//! A script is a markdown file that opens with YAML frontmatter, then
//! carries one H1 title and a bullet list in the body. Every bullet
//! becomes a slide.

pub mod frontmatter;
pub mod parser;

pub use frontmatter::{Frontmatter, extract_frontmatter};
pub use parser::parse_body;

use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading or parsing a script.
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Failed to read script: {0}")]
    Read(#[from] std::io::Error),

    #[error("Markdown missing frontmatter")]
    MissingFrontmatter,

    #[error("Invalid frontmatter YAML: {0}")]
    Frontmatter(#[from] serde_yaml::Error),

    #[error("Title (H1) missing in markdown body")]
    MissingTitle,

    #[error("No bullet points found in markdown body")]
    NoBullets,
}

/// A fully parsed script, ready for layout planning.
#[derive(Debug, Clone)]
pub struct Script {
    /// Frontmatter metadata (bgm path and free-form keys).
    pub frontmatter: Frontmatter,
    /// Slide title, from the body's first H1.
    pub title: String,
    /// One entry per slide, from the body's top-level list items.
    pub bullets: Vec<String>,
}

impl Script {
    /// Read and parse a script file.
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse script content.
    pub fn parse(content: &str) -> Result<Self, ScriptError> {
        let (frontmatter, body) = extract_frontmatter(content)?;
        let (title, bullets) = parse_body(body)?;
        Ok(Self {
            frontmatter,
            title,
            bullets,
        })
    }
}
