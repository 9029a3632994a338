//! lingolens - recognize and translate text in images
//!
//! Validates an untrusted image (local file or remote URL), letterboxes
//! it onto a fixed canvas, sends it to a text-recognition service, draws
//! the recognized-region polygons over the rendered image, and
//! translates the recognized text.

mod config;
mod decode;
mod error;
mod fetch;
mod geometry;
mod render;
mod services;
mod session;
mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::Config;
use crate::session::{CycleOutcome, TranslateSession};
use crate::validate::Candidate;

/// lingolens - image text recognition and translation
#[derive(Parser, Debug)]
#[command(name = "lingolens")]
#[command(about = "Recognize and translate text in an image, rendering the regions onto a canvas")]
struct Args {
    /// Image to process: a local file path or an http(s) URL
    input: String,

    /// Target language code(s); extra languages reuse the stored recognition result
    #[arg(short, long, default_value = "en")]
    lang: Vec<String>,

    /// Canvas size as WIDTHxHEIGHT (defaults to the configured canvas)
    #[arg(long)]
    canvas: Option<String>,

    /// Where to write the annotated canvas
    #[arg(short, long, default_value = "overlay.png")]
    output: PathBuf,

    /// Recognition service URL (overrides the config file)
    #[arg(long)]
    recognition_endpoint: Option<String>,

    /// Translation service URL (overrides the config file)
    #[arg(long)]
    translation_endpoint: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = load_or_create_config();
    apply_overrides(&mut config, &args)?;

    let mut session = TranslateSession::new(config.clone());
    let token = session.begin_cycle();

    let candidate = load_candidate(&args.input, &config).await?;

    let (first_lang, extra_langs) = args
        .lang
        .split_first()
        .context("at least one target language is required")?;

    match session.process(token, candidate, first_lang).await? {
        CycleOutcome::Completed {
            region_count,
            translations,
        } => {
            info!("Recognized {} text regions", region_count);
            println!("[{}]", first_lang);
            println!("{}", translations.join("\n"));
        }
        CycleOutcome::NoText => {
            warn!("No text was found in the image");
        }
        // A single-cycle run is never superseded
        CycleOutcome::Superseded => {}
    }

    for lang in extra_langs {
        match session.retranslate(lang).await? {
            Some(translations) => {
                println!("[{}]", lang);
                println!("{}", translations.join("\n"));
            }
            None => break,
        }
    }

    if let Some(surface) = session.surface() {
        surface.save(&args.output)?;
        info!("Annotated canvas written to {:?}", args.output);
    }

    Ok(())
}

/// Load configuration from file or create default
fn load_or_create_config() -> Config {
    if let Ok(config_dir) = config::get_config_dir() {
        let config_path = config_dir.join("config.toml");
        if config_path.exists() {
            if let Ok(config) = config::load_config(&config_path) {
                info!("Loaded configuration from {:?}", config_path);
                return config;
            }
        }
    }
    info!("Using default configuration");
    Config::default()
}

/// Fold command-line overrides into the configuration
fn apply_overrides(config: &mut Config, args: &Args) -> Result<()> {
    if let Some(endpoint) = &args.recognition_endpoint {
        config.endpoints.recognition = endpoint.clone();
    }
    if let Some(endpoint) = &args.translation_endpoint {
        config.endpoints.translation = endpoint.clone();
    }
    if let Some(spec) = &args.canvas {
        let (width, height) = parse_canvas(spec)?;
        config.render.canvas_width = width;
        config.render.canvas_height = height;
    }
    Ok(())
}

/// Parse a WIDTHxHEIGHT canvas spec
fn parse_canvas(spec: &str) -> Result<(u32, u32)> {
    let (w, h) = spec
        .split_once('x')
        .context("canvas must be WIDTHxHEIGHT, e.g. 900x900")?;
    let width: u32 = w.trim().parse().context("invalid canvas width")?;
    let height: u32 = h.trim().parse().context("invalid canvas height")?;
    if width == 0 || height == 0 {
        anyhow::bail!("canvas dimensions must be positive");
    }
    Ok((width, height))
}

/// Build a candidate from a local path or a remote URL. Remote inputs go
/// through the URL guard before any request is issued.
async fn load_candidate(input: &str, config: &Config) -> Result<Candidate> {
    if input.contains("://") {
        let candidate = fetch::fetch_candidate(input, &config.limits).await?;
        return Ok(candidate);
    }

    let content = tokio::fs::read(input)
        .await
        .map_err(|e| error::PipelineError::decode(format!("failed to read {}: {e}", input)))?;
    let filename = Path::new(input)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(input)
        .to_string();
    Ok(Candidate::new(content, filename, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canvas() {
        assert_eq!(parse_canvas("900x900").unwrap(), (900, 900));
        assert_eq!(parse_canvas("1280x720").unwrap(), (1280, 720));
        assert!(parse_canvas("900").is_err());
        assert!(parse_canvas("0x900").is_err());
        assert!(parse_canvas("axb").is_err());
    }
}
