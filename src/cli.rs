//! Command-line interface definitions and the `init` scaffold.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use console::style;
use std::path::{Path, PathBuf};

/// Default style configuration path, relative to the working directory.
pub const DEFAULT_CONFIG: &str = "config/style.yaml";

#[derive(Parser)]
#[command(
    name = "slidecast",
    about = "Render vertical slide videos from markdown scripts",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render a markdown script to an MP4 video
    Render {
        /// Markdown script with frontmatter, an H1 title, and bullets
        markdown: PathBuf,

        /// Style configuration file
        #[arg(long, env = "SLIDECAST_CONFIG", default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Output video path (defaults to the input with an .mp4 extension)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Frames per second (overrides the style file)
        #[arg(long)]
        fps: Option<u32>,

        /// Also write each composed slide as a PNG into this directory
        #[arg(long)]
        frames_dir: Option<PathBuf>,
    },

    /// Compose slides and write them as PNGs without encoding a video
    Slides {
        /// Markdown script with frontmatter, an H1 title, and bullets
        markdown: PathBuf,

        /// Style configuration file
        #[arg(long, env = "SLIDECAST_CONFIG", default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Output directory (defaults to `<input stem>_slides/`)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Validate a script and style file and print the render plan
    Check {
        /// Markdown script to validate
        markdown: PathBuf,

        /// Style configuration file
        #[arg(long, env = "SLIDECAST_CONFIG", default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Emit the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Scaffold a starter style file and example script
    Init {
        /// Directory to scaffold into
        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

const STYLE_TEMPLATE: &str = r##"# slidecast style configuration.
# Every key is optional; omitted keys use the defaults shown here.

size:
  width: 1080
  height: 1920

layout:
  safe_padding_px: 72
  max_chars_per_line: 22
  line_spacing: 1.15
  slide_sec: 7.0

background:
  # image: assets/background.png
  color: "#ffffff"

fonts:
  # title: assets/NotoSansJP-Bold.otf
  # body: assets/NotoSansJP-Regular.otf
  title_size: 72.0
  body_size: 56.0

colors:
  fg_title: "#111111"
  fg_body: "#111111"

video:
  fps: 30
"##;

const EXAMPLE_SCRIPT: &str = r#"---
title: Example short
# bgm: assets/bgm.mp3
---

# Five habits that stick

- Start with one small change
- Tie the habit to a daily anchor
- Track streaks where you can see them
- Forgive the missed day, keep the week
- Review what worked every Sunday
"#;

/// Write starter files into `dir`, refusing to clobber anything existing.
pub fn init_scaffold(dir: &Path) -> Result<()> {
    let config_path = dir.join(DEFAULT_CONFIG);
    let script_path = dir.join("scripts").join("example.md");

    for path in [&config_path, &script_path] {
        if path.exists() {
            bail!("refusing to overwrite existing file: {}", path.display());
        }
    }

    write_scaffold_file(&config_path, STYLE_TEMPLATE)?;
    write_scaffold_file(&script_path, EXAMPLE_SCRIPT)?;

    println!("{}", style("Scaffolded:").bold());
    println!("  {}", config_path.display());
    println!("  {}", script_path.display());
    println!();
    println!(
        "Try: {}",
        style(format!("slidecast check {}", script_path.display())).cyan()
    );
    Ok(())
}

fn write_scaffold_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn scaffold_writes_starter_files() {
        let dir = tempfile::tempdir().unwrap();
        init_scaffold(dir.path()).unwrap();

        assert!(dir.path().join(DEFAULT_CONFIG).exists());
        assert!(dir.path().join("scripts/example.md").exists());
    }

    #[test]
    fn scaffold_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        init_scaffold(dir.path()).unwrap();

        let err = init_scaffold(dir.path()).unwrap_err();
        assert!(err.to_string().contains("refusing to overwrite"));
    }

    #[test]
    fn scaffold_template_parses_as_style() {
        let parsed: crate::style::Style = serde_yaml::from_str(STYLE_TEMPLATE).unwrap();
        parsed.validate().unwrap();
        assert_eq!(parsed.size.width, 1080);
    }

    #[test]
    fn scaffold_example_parses_as_script() {
        let script = crate::script::Script::parse(EXAMPLE_SCRIPT).unwrap();
        assert_eq!(script.title, "Five habits that stick");
        assert_eq!(script.bullets.len(), 5);
    }
}
