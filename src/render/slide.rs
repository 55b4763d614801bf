//! Rasterize one slide: background plus planned text lines.

use ab_glyph::PxScale;
use image::{RgbImage, imageops::FilterType};
use imageproc::drawing::draw_text_mut;
use tracing::warn;

use super::layout::{SlidePlan, TextRole};
use super::{Fonts, RenderError};
use crate::style::{Style, parse_hex_color};

/// Build the shared background canvas for a render.
///
/// A configured image is resized to the canvas; a configured-but-missing
/// image falls back to the fill color with a warning.
pub fn render_background(style: &Style) -> Result<RgbImage, RenderError> {
    let width = style.size.width;
    let height = style.size.height;

    if let Some(path) = &style.background.image {
        if path.exists() {
            let img = image::open(path)
                .map_err(|source| RenderError::Background {
                    path: path.clone(),
                    source,
                })?
                .to_rgb8();
            return Ok(image::imageops::resize(
                &img,
                width,
                height,
                FilterType::Lanczos3,
            ));
        }
        warn!(path = %path.display(), "background image not found, using fill color");
    }

    let fill = parse_hex_color(&style.background.color)?;
    Ok(RgbImage::from_pixel(width, height, fill))
}

/// Draw a planned slide over a copy of the shared background.
pub fn compose_slide(
    plan: &SlidePlan,
    style: &Style,
    fonts: &Fonts,
    background: &RgbImage,
) -> Result<RgbImage, RenderError> {
    let title_color = parse_hex_color(&style.colors.fg_title)?;
    let body_color = parse_hex_color(&style.colors.fg_body)?;

    let mut canvas = background.clone();
    for line in &plan.lines {
        let (font, color) = match line.role {
            TextRole::Title => (&fonts.title, title_color),
            TextRole::Body => (&fonts.body, body_color),
        };
        draw_text_mut(
            &mut canvas,
            color,
            line.x,
            line.y,
            PxScale::from(line.size),
            font,
            &line.text,
        );
    }
    Ok(canvas)
}
