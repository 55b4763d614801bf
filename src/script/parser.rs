//! Body parsing via a pulldown-cmark event walk.
//!
//! The first H1 heading becomes the slide title and every top-level list
//! item becomes a bullet. Inline emphasis and code are flattened to plain
//! text; nested list items fold into their parent's text.

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

use super::ScriptError;

/// Extract `(title, bullets)` from a script body.
pub fn parse_body(body: &str) -> Result<(String, Vec<String>), ScriptError> {
    let mut title: Option<String> = None;
    let mut bullets: Vec<String> = Vec::new();

    let mut in_h1 = false;
    let mut heading_buf = String::new();
    let mut item_depth = 0usize;
    let mut item_buf = String::new();

    for event in Parser::new(body) {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) if title.is_none() => {
                in_h1 = true;
                heading_buf.clear();
            }
            Event::End(TagEnd::Heading(HeadingLevel::H1)) if in_h1 => {
                in_h1 = false;
                let text = heading_buf.trim().to_string();
                if !text.is_empty() {
                    title = Some(text);
                }
            }
            Event::Start(Tag::Item) => {
                item_depth += 1;
                if item_depth == 1 {
                    item_buf.clear();
                } else if !item_buf.ends_with(' ') && !item_buf.is_empty() {
                    item_buf.push(' ');
                }
            }
            Event::End(TagEnd::Item) => {
                if item_depth == 1 {
                    let text = item_buf.trim().to_string();
                    if !text.is_empty() {
                        bullets.push(text);
                    }
                }
                item_depth = item_depth.saturating_sub(1);
            }
            Event::Text(text) | Event::Code(text) => {
                if in_h1 {
                    heading_buf.push_str(&text);
                } else if item_depth > 0 {
                    item_buf.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if in_h1 {
                    heading_buf.push(' ');
                } else if item_depth > 0 {
                    item_buf.push(' ');
                }
            }
            _ => {}
        }
    }

    let title = title.ok_or(ScriptError::MissingTitle)?;
    if bullets.is_empty() {
        return Err(ScriptError::NoBullets);
    }
    Ok((title, bullets))
}
