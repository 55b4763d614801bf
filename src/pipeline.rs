//! End-to-end render pipeline: parse → style → plan → compose → encode.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use console::style as paint;
use image::RgbImage;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::render::layout::{SlidePlan, plan_slide};
use crate::render::{Fonts, compose_slide, render_background};
use crate::script::Script;
use crate::style::Style;
use crate::video::{EncodeJob, Encoder};

/// Overrides applied on top of the style file for one render.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub config: PathBuf,
    pub output: Option<PathBuf>,
    pub fps: Option<u32>,
    pub frames_dir: Option<PathBuf>,
}

/// What a completed render produced.
#[derive(Debug, Clone, Serialize)]
pub struct RenderReport {
    pub output: PathBuf,
    pub slides: usize,
    pub slide_sec: f64,
    pub total_sec: f64,
    pub generated_at: DateTime<Utc>,
}

/// Render a script to a video.
pub fn render(input: &Path, opts: &RenderOptions) -> Result<RenderReport> {
    let script = Script::load(input)
        .with_context(|| format!("failed to load script {}", input.display()))?;
    let mut style = Style::load(&opts.config)
        .with_context(|| format!("failed to load style {}", opts.config.display()))?;
    if let Some(fps) = opts.fps {
        style.video.fps = fps;
        style.validate().context("invalid fps override")?;
    }

    // Fail fast on a missing encoder before any composition work.
    let encoder = Encoder::locate()?;

    let slides = compose_all(&script, &style)?;
    if let Some(dir) = &opts.frames_dir {
        write_frames(&slides, dir)?;
    }

    let output = opts
        .output
        .clone()
        .unwrap_or_else(|| input.with_extension("mp4"));
    let (frames_per_slide, slide_sec) = slide_timing(&style);
    let job = EncodeJob {
        width: style.size.width,
        height: style.size.height,
        fps: style.video.fps,
        frames_per_slide,
        audio: resolve_bgm(&script, input),
        output: output.clone(),
    };
    encoder.encode(&job, &slides)?;

    Ok(RenderReport {
        output,
        slides: slides.len(),
        slide_sec,
        total_sec: slide_sec * slides.len() as f64,
        generated_at: Utc::now(),
    })
}

/// Compose slides and write them as PNGs, skipping the encoder entirely.
pub fn export_slides(input: &Path, config: &Path, out_dir: Option<&Path>) -> Result<Vec<PathBuf>> {
    let script = Script::load(input)
        .with_context(|| format!("failed to load script {}", input.display()))?;
    let style = Style::load(config)
        .with_context(|| format!("failed to load style {}", config.display()))?;

    let slides = compose_all(&script, &style)?;
    let dir = out_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_slides_dir(input));
    write_frames(&slides, &dir)
}

/// Compose one slide per bullet, sharing fonts and the background canvas.
pub fn compose_all(script: &Script, style: &Style) -> Result<Vec<RgbImage>> {
    let fonts = Fonts::load(&style.fonts)?;
    let background = render_background(style)?;
    let plans: Vec<SlidePlan> = script
        .bullets
        .iter()
        .map(|bullet| plan_slide(&script.title, bullet, style))
        .collect();

    let slides = plans
        .par_iter()
        .map(|plan| compose_slide(plan, style, &fonts, &background))
        .collect::<Result<Vec<_>, _>>()?;
    info!(slides = slides.len(), "composed slides");
    Ok(slides)
}

/// Validation summary for `check`.
#[derive(Debug, Clone, Serialize)]
pub struct PlanSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub title: String,
    pub slides: usize,
    pub slide_sec: f64,
    pub total_sec: f64,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub bgm: Option<PathBuf>,
    pub bgm_found: bool,
}

/// Parse and validate without composing or encoding.
pub fn check(input: &Path, config: &Path) -> Result<PlanSummary> {
    let script = Script::load(input)
        .with_context(|| format!("failed to load script {}", input.display()))?;
    let style = Style::load(config)
        .with_context(|| format!("failed to load style {}", config.display()))?;

    let (_, slide_sec) = slide_timing(&style);
    let bgm_found = resolve_bgm(&script, input).is_some();
    Ok(PlanSummary {
        input: input.to_path_buf(),
        output: input.with_extension("mp4"),
        title: script.title.clone(),
        slides: script.bullets.len(),
        slide_sec,
        total_sec: slide_sec * script.bullets.len() as f64,
        width: style.size.width,
        height: style.size.height,
        fps: style.video.fps,
        bgm: script.frontmatter.bgm.clone(),
        bgm_found,
    })
}

impl PlanSummary {
    /// Print a human-readable plan.
    pub fn display(&self) {
        println!("{}", paint(&self.title).bold());
        println!("  {} {}", paint("input:").dim(), self.input.display());
        println!("  {} {}", paint("output:").dim(), self.output.display());
        println!(
            "  {} {}x{} @ {} fps",
            paint("canvas:").dim(),
            self.width,
            self.height,
            self.fps
        );
        println!(
            "  {} {} slides x {:.2}s = {:.2}s",
            paint("timing:").dim(),
            self.slides,
            self.slide_sec,
            self.total_sec
        );
        match (&self.bgm, self.bgm_found) {
            (Some(path), true) => println!("  {} {}", paint("bgm:").dim(), path.display()),
            (Some(path), false) => println!(
                "  {} {} {}",
                paint("bgm:").dim(),
                path.display(),
                paint("(missing)").yellow()
            ),
            (None, _) => println!("  {} none", paint("bgm:").dim()),
        }
    }
}

/// Frames each slide is held for, and the resulting exact hold duration.
fn slide_timing(style: &Style) -> (u32, f64) {
    let fps = style.video.fps;
    let frames = (style.layout.slide_sec * f64::from(fps)).round().max(1.0) as u32;
    (frames, f64::from(frames) / f64::from(fps))
}

/// Resolve the frontmatter bgm path: as given first, then relative to the
/// script's directory. A dangling path downgrades to a silent encode.
fn resolve_bgm(script: &Script, input: &Path) -> Option<PathBuf> {
    let bgm = script.frontmatter.bgm.as_ref()?;
    if bgm.exists() {
        return Some(bgm.clone());
    }
    if bgm.is_relative()
        && let Some(parent) = input.parent()
    {
        let sibling = parent.join(bgm);
        if sibling.exists() {
            info!(path = %sibling.display(), "resolved bgm relative to the script");
            return Some(sibling);
        }
    }
    warn!(path = %bgm.display(), "bgm file not found, encoding without audio");
    None
}

fn default_slides_dir(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{stem}_slides"))
}

fn write_frames(slides: &[RgbImage], dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let mut written = Vec::with_capacity(slides.len());
    for (index, slide) in slides.iter().enumerate() {
        let path = dir.join(format!("slide_{:03}.png", index + 1));
        slide
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path);
    }
    info!(count = written.len(), dir = %dir.display(), "slides written");
    Ok(written)
}
