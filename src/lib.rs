//! slidecast — render vertical slide videos from markdown scripts.
//!
//! A script is a markdown file with YAML frontmatter, a single H1 title,
//! and a bullet list. Each bullet becomes one styled slide; slides are held
//! for a configurable duration and encoded into an H.264/AAC MP4 via an
//! external ffmpeg, optionally mixed with background music named in the
//! frontmatter. Styling comes from a YAML file (`config/style.yaml` by
//! default).

pub mod cli;
pub mod pipeline;
pub mod render;
pub mod script;
pub mod style;
pub mod video;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};

/// Entry point for the `slidecast` binary.
///
/// Parses the CLI, installs the tracing subscriber, and dispatches the
/// selected subcommand. Failures print `ERROR: <message>` on stderr and
/// exit 1 so the tool stays predictable under scripting.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = dispatch(cli) {
        eprintln!("ERROR: {err:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("slidecast={default_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Render {
            markdown,
            config,
            output,
            fps,
            frames_dir,
        } => {
            let opts = pipeline::RenderOptions {
                config,
                output,
                fps,
                frames_dir,
            };
            let report = pipeline::render(&markdown, &opts)?;
            println!("OK: {}", report.output.display());
            Ok(())
        }
        Command::Slides {
            markdown,
            config,
            out_dir,
        } => {
            let written = pipeline::export_slides(&markdown, &config, out_dir.as_deref())?;
            println!("OK: {} slides", written.len());
            Ok(())
        }
        Command::Check {
            markdown,
            config,
            json,
        } => {
            let summary = pipeline::check(&markdown, &config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                summary.display();
            }
            Ok(())
        }
        Command::Init { dir } => cli::init_scaffold(&dir),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "slidecast", &mut std::io::stdout());
            Ok(())
        }
    }
}
