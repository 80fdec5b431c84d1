//! Command-line interface for bbcode
//! Reads a BBCode document and prints its tree or its rendered output.
//!
//! Usage:
//!   bbcode `<path>` [--format `<format>`] [--config `<file>`]   - Render a file
//!   bbcode - [--format `<format>`]                              - Render stdin
//!
//! Diagnostics go to stderr; set `RUST_LOG=bbcode=debug` for more.

mod transforms;

use anyhow::{Context, Result};
use bbcode_config::Loader;
use bbcode_parser::bbcode::{BBArgs, ImageLoader};
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use transforms::Format;

#[derive(Parser, Debug)]
#[command(
    name = "bbcode",
    version,
    about = "A tool for inspecting and rendering BBCode documents"
)]
struct Cli {
    /// Path to the BBCode file, `-` reads stdin
    path: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Treeviz)]
    format: Format,

    /// Configuration file layered over the built-in defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Detect emoticons in plain text
    #[arg(long)]
    emoticons: bool,

    /// Id of the viewing user, passed through to the renderer
    #[arg(long)]
    user_id: Option<String>,

    /// Show byte spans in treeviz output
    #[arg(long)]
    spans: bool,
}

/// Image loader for the CLI: references are printed as given.
#[derive(Debug)]
struct PassthroughImageLoader;

impl ImageLoader for PassthroughImageLoader {
    fn resolve(&self, reference: &str) -> Option<String> {
        Some(reference.to_string())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("bbcode=warn".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let mut loader = Loader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    if cli.emoticons {
        loader = loader.set_override("emoticons.enabled", true)?;
    }
    let config = loader.build().context("failed to load configuration")?;
    let renderer = config
        .renderer()
        .context("failed to build tag registry")?;

    let mut args = BBArgs::new()
        .with_image_loader(Arc::new(PassthroughImageLoader))
        .with_emoticons(config.emoticons.enabled);
    if let Some(user_id) = cli.user_id {
        args = args.with_user_id(user_id);
    }

    let source = read_source(&cli.path)?;
    info!(path = %cli.path, bytes = source.len(), "read document");

    let output = transforms::execute(&source, cli.format, &renderer, &args, cli.spans)?;
    for error in &output.errors {
        warn!(%error, "node rendered as plain text");
    }

    print!("{}", output.text);
    if !output.text.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn read_source(path: &str) -> Result<String> {
    if path == "-" {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("failed to read stdin")?;
        Ok(source)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
    }
}
