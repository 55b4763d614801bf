//! End-to-end composition tests: markdown in, PNG slides (and, when an
//! encoder is present, a video) out. Hosts without a usable system font
//! or without ffmpeg skip the corresponding tests.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn slidecast() -> Command {
    Command::new(env!("CARGO_BIN_EXE_slidecast"))
}

fn have_fonts() -> bool {
    slidecast::render::font::load_font(None).is_ok()
}

fn have_ffmpeg() -> bool {
    slidecast::video::Encoder::locate().is_ok()
}

const SCRIPT: &str = "---\n---\n\n# Better sleep\n\n- Dim the lights after nine\n- Keep the phone outside\n";

const STYLE: &str = "size:\n  width: 320\n  height: 480\nlayout:\n  safe_padding_px: 24\n  slide_sec: 0.5\nfonts:\n  title_size: 28.0\n  body_size: 20.0\nvideo:\n  fps: 12\n";

fn write_fixture(dir: &Path) -> (PathBuf, PathBuf) {
    let script = dir.join("episode.md");
    let style = dir.join("style.yaml");
    std::fs::write(&script, SCRIPT).unwrap();
    std::fs::write(&style, STYLE).unwrap();
    (script, style)
}

#[test]
fn slides_writes_one_png_per_bullet() {
    if !have_fonts() {
        eprintln!("no system font available, skipping");
        return;
    }

    let dir = TempDir::new().unwrap();
    let (script, style) = write_fixture(dir.path());
    let out_dir = dir.path().join("frames");

    slidecast()
        .arg("slides")
        .arg(&script)
        .arg("--config")
        .arg(&style)
        .arg("--out-dir")
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: 2 slides"));

    let first = out_dir.join("slide_001.png");
    let second = out_dir.join("slide_002.png");
    assert!(first.exists());
    assert!(second.exists());

    let png = image::open(&first).unwrap().to_rgb8();
    assert_eq!(png.dimensions(), (320, 480));
}

#[test]
fn slides_defaults_to_a_directory_next_to_the_script() {
    if !have_fonts() {
        eprintln!("no system font available, skipping");
        return;
    }

    let dir = TempDir::new().unwrap();
    let (script, style) = write_fixture(dir.path());

    slidecast()
        .arg("slides")
        .arg(&script)
        .arg("--config")
        .arg(&style)
        .assert()
        .success();

    assert!(dir.path().join("episode_slides/slide_001.png").exists());
}

#[test]
fn slides_differ_from_the_bare_background() {
    if !have_fonts() {
        eprintln!("no system font available, skipping");
        return;
    }

    let dir = TempDir::new().unwrap();
    let (script, style) = write_fixture(dir.path());
    let out_dir = dir.path().join("frames");

    slidecast()
        .arg("slides")
        .arg(&script)
        .arg("--config")
        .arg(&style)
        .arg("--out-dir")
        .arg(&out_dir)
        .assert()
        .success();

    let png = image::open(out_dir.join("slide_001.png")).unwrap().to_rgb8();
    let non_white = png
        .pixels()
        .filter(|p| p.0 != [255, 255, 255])
        .count();
    assert!(non_white > 0, "rendered text should darken some pixels");
}

#[test]
fn render_writes_a_video() {
    if !have_fonts() {
        eprintln!("no system font available, skipping");
        return;
    }
    if !have_ffmpeg() {
        eprintln!("ffmpeg not available, skipping");
        return;
    }

    let dir = TempDir::new().unwrap();
    let (script, style) = write_fixture(dir.path());
    let frames_dir = dir.path().join("frames");

    slidecast()
        .arg("render")
        .arg(&script)
        .arg("--config")
        .arg(&style)
        .arg("--frames-dir")
        .arg(&frames_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("OK:"));

    let video = dir.path().join("episode.mp4");
    assert!(video.exists());
    assert!(std::fs::metadata(&video).unwrap().len() > 0);

    // The debug frames were exported alongside the encode.
    assert!(frames_dir.join("slide_001.png").exists());
    assert!(frames_dir.join("slide_002.png").exists());
}

#[test]
fn render_respects_an_explicit_output_path() {
    if !have_fonts() {
        eprintln!("no system font available, skipping");
        return;
    }
    if !have_ffmpeg() {
        eprintln!("ffmpeg not available, skipping");
        return;
    }

    let dir = TempDir::new().unwrap();
    let (script, style) = write_fixture(dir.path());
    let output = dir.path().join("out/final.mp4");

    slidecast()
        .arg("render")
        .arg(&script)
        .arg("--config")
        .arg(&style)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("final.mp4"));

    assert!(output.exists());
}

#[test]
fn render_without_ffmpeg_mentions_the_remedy() {
    let dir = TempDir::new().unwrap();
    let (script, style) = write_fixture(dir.path());

    // An empty PATH hides any installed ffmpeg.
    slidecast()
        .arg("render")
        .arg(&script)
        .arg("--config")
        .arg(&style)
        .env("PATH", "")
        .assert()
        .failure()
        .stderr(predicate::str::contains("install ffmpeg"));
}
