//! Text layout planning.
//!
//! Wrapping and positioning are computed before any rasterization so that
//! `check` can report a full plan without touching fonts or canvases.

use serde::Serialize;
use textwrap::{Options, WrapAlgorithm};

use crate::style::Style;

/// Maximum rendered lines for the title block and for a bullet block.
pub const MAX_BLOCK_LINES: usize = 2;

const ELLIPSIS: char = '…';

/// Greedy-wrap `text` at `max_chars` characters, capping the result at
/// `max_lines`. When the cap truncates, the last kept line is shortened
/// and terminated with an ellipsis so it still fits.
pub fn wrap_lines(text: &str, max_chars: usize, max_lines: usize) -> Vec<String> {
    let options = Options::new(max_chars)
        .break_words(true)
        .wrap_algorithm(WrapAlgorithm::FirstFit);
    let mut lines: Vec<String> = textwrap::wrap(text, options)
        .into_iter()
        .map(|line| line.into_owned())
        .collect();
    if lines.is_empty() {
        lines.push(text.to_string());
    }
    if lines.len() <= max_lines {
        return lines;
    }

    lines.truncate(max_lines);
    if let Some(last) = lines.last_mut() {
        let kept: String = last.chars().take(max_chars.saturating_sub(1)).collect();
        *last = kept;
        last.push(ELLIPSIS);
    }
    lines
}

/// Whether a planned line belongs to the title or the bullet body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextRole {
    Title,
    Body,
}

/// One positioned line of text.
#[derive(Debug, Clone, Serialize)]
pub struct TextLine {
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub size: f32,
    pub role: TextRole,
}

/// All positioned lines for a single slide.
#[derive(Debug, Clone, Serialize)]
pub struct SlidePlan {
    pub lines: Vec<TextLine>,
}

/// Plan one slide: title block at the safe padding, a gap of three quarters
/// of the title size, then the bullet block. Each line advances by
/// `font size * line_spacing`, truncated to whole pixels.
pub fn plan_slide(title: &str, bullet: &str, style: &Style) -> SlidePlan {
    let padding = style.layout.safe_padding_px as i32;
    let max_chars = style.layout.max_chars_per_line;
    let spacing = style.layout.line_spacing;
    let title_size = style.fonts.title_size;
    let body_size = style.fonts.body_size;

    let mut lines = Vec::new();
    let mut y = padding;

    for text in wrap_lines(title, max_chars, MAX_BLOCK_LINES) {
        lines.push(TextLine {
            text,
            x: padding,
            y,
            size: title_size,
            role: TextRole::Title,
        });
        y += (title_size * spacing) as i32;
    }

    y += (title_size * 0.75) as i32;

    for text in wrap_lines(bullet, max_chars, MAX_BLOCK_LINES) {
        lines.push(TextLine {
            text,
            x: padding,
            y,
            size: body_size,
            role: TextRole::Body,
        });
        y += (body_size * spacing) as i32;
    }

    SlidePlan { lines }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn short_text_stays_on_one_line() {
        assert_eq!(wrap_lines("hello", 22, 2), vec!["hello"]);
    }

    #[test]
    fn empty_text_is_preserved() {
        assert_eq!(wrap_lines("", 22, 2), vec![""]);
    }

    #[test]
    fn wraps_at_word_boundaries() {
        let lines = wrap_lines("tie the habit to a daily anchor", 16, 4);
        assert!(lines.len() >= 2);
        for line in &lines {
            assert!(line.chars().count() <= 16);
        }
    }

    #[test]
    fn truncation_appends_an_ellipsis() {
        let lines = wrap_lines(
            "a very long sentence that cannot possibly fit into two short lines of text",
            10,
            2,
        );
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with('…'));
        assert!(lines[1].chars().count() <= 10);
    }

    #[test]
    fn breaks_words_longer_than_the_width() {
        let lines = wrap_lines("antidisestablishmentarianism", 8, 4);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.chars().count() <= 8);
        }
    }

    #[test]
    fn ellipsis_counts_characters_not_bytes() {
        let lines = wrap_lines("ありがとうございました今日も一日", 4, 2);
        for line in &lines {
            assert!(line.chars().count() <= 4 * 2); // wide chars occupy two columns
        }
    }

    #[test]
    fn plan_positions_follow_the_spacing_arithmetic() {
        let style = Style::default();
        let plan = plan_slide("Title", "Bullet", &style);

        assert_eq!(plan.lines.len(), 2);
        let title = &plan.lines[0];
        let body = &plan.lines[1];

        assert_eq!(title.role, TextRole::Title);
        assert_eq!((title.x, title.y), (72, 72));

        // 72 + int(72 * 1.15) + int(72 * 0.75)
        assert_eq!(body.role, TextRole::Body);
        assert_eq!((body.x, body.y), (72, 72 + 82 + 54));
    }

    #[test]
    fn wrapped_title_pushes_the_body_down() {
        let style = Style::default();
        let one = plan_slide("Short", "Bullet", &style);
        let two = plan_slide("A title long enough to wrap over the cap", "Bullet", &style);

        let body_y = |plan: &SlidePlan| {
            plan.lines
                .iter()
                .find(|l| l.role == TextRole::Body)
                .map(|l| l.y)
                .unwrap()
        };
        assert!(body_y(&two) > body_y(&one));
    }

    #[test]
    fn every_block_respects_the_line_cap() {
        let style = Style::default();
        let plan = plan_slide(
            "an extremely long title which wraps and wraps and wraps and wraps",
            "an equally long bullet which also wraps and wraps and wraps forever",
            &style,
        );
        let titles = plan
            .lines
            .iter()
            .filter(|l| l.role == TextRole::Title)
            .count();
        let bodies = plan
            .lines
            .iter()
            .filter(|l| l.role == TextRole::Body)
            .count();
        assert!(titles <= MAX_BLOCK_LINES);
        assert!(bodies <= MAX_BLOCK_LINES);
    }

    proptest! {
        #[test]
        fn wrapped_lines_respect_width_and_cap(
            text in "[a-zA-Z0-9 ]{0,200}",
            max_chars in 1usize..80,
        ) {
            let lines = wrap_lines(&text, max_chars, MAX_BLOCK_LINES);
            prop_assert!(lines.len() <= MAX_BLOCK_LINES);
            for line in &lines {
                prop_assert!(line.chars().count() <= max_chars);
            }
        }

        #[test]
        fn planning_never_panics(
            title in "\\PC{0,120}",
            bullet in "\\PC{0,120}",
            max_chars in 1usize..60,
        ) {
            let mut style = Style::default();
            style.layout.max_chars_per_line = max_chars;
            let plan = plan_slide(&title, &bullet, &style);
            prop_assert!(!plan.lines.is_empty());
        }
    }
}
