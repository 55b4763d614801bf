//! Video assembly via an external ffmpeg binary.
//!
//! Slides are streamed to ffmpeg stdin as raw rgb24 frames; each slide is
//! repeated for its hold duration. Audio, when present, is mixed from the
//! script's `bgm` file at reduced volume and truncated to the video
//! length. The output is written to a temporary file beside the
//! destination and renamed into place only after ffmpeg exits cleanly.

use image::RgbImage;
use indicatif::{ProgressBar, ProgressStyle};
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while encoding.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("ffmpeg not found on PATH; install ffmpeg to render videos")]
    FfmpegNotFound,

    #[error("Failed to spawn ffmpeg: {0}")]
    Spawn(std::io::Error),

    #[error("Failed to stream frames to ffmpeg: {0}")]
    Stream(std::io::Error),

    #[error("ffmpeg exited with {status}: {stderr}")]
    Ffmpeg {
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("Failed to write output {path}: {source}")]
    Output {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Encode parameters for one render.
#[derive(Debug, Clone)]
pub struct EncodeJob {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Frames each slide is held for.
    pub frames_per_slide: u32,
    /// Background music, already resolved to an existing file.
    pub audio: Option<PathBuf>,
    pub output: PathBuf,
}

/// Handle to a located ffmpeg binary.
pub struct Encoder {
    ffmpeg: PathBuf,
}

impl Encoder {
    /// Locate ffmpeg on PATH.
    pub fn locate() -> Result<Self, EncodeError> {
        let ffmpeg = which::which("ffmpeg").map_err(|_| EncodeError::FfmpegNotFound)?;
        debug!(path = %ffmpeg.display(), "found ffmpeg");
        Ok(Self { ffmpeg })
    }

    /// Encode the slides into `job.output`.
    pub fn encode(&self, job: &EncodeJob, slides: &[RgbImage]) -> Result<(), EncodeError> {
        let parent = job
            .output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let to_output_err = |source: std::io::Error| EncodeError::Output {
            path: job.output.clone(),
            source,
        };
        std::fs::create_dir_all(parent).map_err(to_output_err)?;
        let tmp = tempfile::Builder::new()
            .prefix(".slidecast-")
            .suffix(".mp4")
            .tempfile_in(parent)
            .map_err(to_output_err)?;

        let args = build_args(job, tmp.path());
        debug!(?args, "invoking ffmpeg");

        let mut child = Command::new(&self.ffmpeg)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(EncodeError::Spawn)?;

        let stream_result = stream_frames(&mut child, job, slides);

        let output = child.wait_with_output().map_err(EncodeError::Spawn)?;
        if !output.status.success() {
            return Err(EncodeError::Ffmpeg {
                status: output.status,
                stderr: stderr_tail(&output.stderr),
            });
        }
        // ffmpeg exited cleanly; surface any stream failure it swallowed.
        stream_result?;

        tmp.persist(&job.output).map_err(|err| EncodeError::Output {
            path: job.output.clone(),
            source: err.error,
        })?;
        info!(output = %job.output.display(), "video written");
        Ok(())
    }
}

fn stream_frames(
    child: &mut Child,
    job: &EncodeJob,
    slides: &[RgbImage],
) -> Result<(), EncodeError> {
    let Some(stdin) = child.stdin.take() else {
        return Ok(());
    };

    let total = slides.len() as u64 * u64::from(job.frames_per_slide);
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} frames ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut writer = std::io::BufWriter::new(stdin);
    for slide in slides {
        let raw = slide.as_raw();
        for _ in 0..job.frames_per_slide {
            if let Err(err) = writer.write_all(raw) {
                bar.abandon();
                return Err(EncodeError::Stream(err));
            }
            bar.inc(1);
        }
    }
    let result = writer.flush().map_err(EncodeError::Stream);
    drop(writer);
    bar.finish_and_clear();
    result
}

fn build_args(job: &EncodeJob, tmp_out: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-hide_banner".into(),
        "-loglevel".into(),
        "error".into(),
        "-y".into(),
        "-f".into(),
        "rawvideo".into(),
        "-pix_fmt".into(),
        "rgb24".into(),
        "-s".into(),
        format!("{}x{}", job.width, job.height).into(),
        "-r".into(),
        job.fps.to_string().into(),
        "-i".into(),
        "-".into(),
    ];
    if let Some(audio) = &job.audio {
        args.push("-i".into());
        args.push(audio.clone().into_os_string());
    }
    args.extend::<[OsString; 6]>([
        "-c:v".into(),
        "libx264".into(),
        "-pix_fmt".into(),
        "yuv420p".into(),
        "-movflags".into(),
        "+faststart".into(),
    ]);
    match &job.audio {
        Some(_) => args.extend::<[OsString; 5]>([
            "-c:a".into(),
            "aac".into(),
            "-filter:a".into(),
            "volume=0.25".into(),
            "-shortest".into(),
        ]),
        None => args.push("-an".into()),
    }
    args.push(tmp_out.as_os_str().to_os_string());
    args
}

fn stderr_tail(bytes: &[u8]) -> String {
    const MAX: usize = 800;

    let text = String::from_utf8_lossy(bytes);
    let trimmed = text.trim();
    if trimmed.len() <= MAX {
        return trimmed.to_string();
    }
    let mut start = trimmed.len() - MAX;
    while !trimmed.is_char_boundary(start) {
        start += 1;
    }
    format!("…{}", &trimmed[start..])
}
