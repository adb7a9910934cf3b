//! Command-line front end for slidesplit-core
//!
//! Reads the input PDF, runs the split, and only then touches the output
//! path, so a failed detection never leaves a partial file behind.

use anyhow::{Context, Result};
use clap::Parser;
use slidesplit_core::{
    split_slides, LayoutFormat, PageRasterizer, PdftoppmRasterizer, PixelClassifier,
    SplitOptions,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "slidesplit")]
#[command(version, about = "Split N-up lecture handout PDFs into one page per slide")]
pub struct Args {
    /// Input PDF file
    pub input: PathBuf,

    /// Output PDF file
    pub output: PathBuf,

    /// Slide layout: "2" (two stacked) or "4sidebyside" (two rows of two)
    #[arg(short, long, default_value = "2", value_parser = parse_layout)]
    pub format: LayoutFormat,

    /// Rasterization resolution used for boundary detection
    #[arg(long, default_value_t = slidesplit_core::rasterizer::DEFAULT_DPI)]
    pub dpi: u32,

    /// How far below white (per channel) a pixel may be and still count as background
    #[arg(long, default_value_t = 0)]
    pub tolerance: u8,

    /// Path to the pdftoppm executable
    #[arg(long, env = "SLIDESPLIT_PDFTOPPM", default_value = "pdftoppm")]
    pub pdftoppm: PathBuf,

    /// Write the detected crop boxes and run metrics as JSON
    #[arg(long)]
    pub report: Option<PathBuf>,
}

fn parse_layout(s: &str) -> Result<LayoutFormat, String> {
    s.parse::<LayoutFormat>().map_err(|e| e.to_string())
}

/// Run with the `pdftoppm` rasterizer configured by `args`.
pub fn run(args: &Args) -> Result<()> {
    let rasterizer = PdftoppmRasterizer::new(&args.pdftoppm, args.dpi);
    run_with(args, &rasterizer)
}

/// Run with an arbitrary rasterizer.
pub fn run_with<R: PageRasterizer>(args: &Args, rasterizer: &R) -> Result<()> {
    let input = std::fs::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let options = SplitOptions {
        classifier: PixelClassifier::new(args.tolerance),
    };
    tracing::info!(
        input = %args.input.display(),
        format = %args.format,
        "splitting slides"
    );

    let output = split_slides(&input, args.format, rasterizer, &options)
        .with_context(|| format!("Failed to split {}", args.input.display()))?;

    // Serialize the report up front so neither file is written if it fails
    let report = match &args.report {
        Some(path) => {
            let report = serde_json::json!({
                "plan": output.plan,
                "metrics": output.metrics,
            });
            Some((path, serde_json::to_string_pretty(&report)?))
        }
        None => None,
    };

    if let Some((path, json)) = &report {
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    if let Err(e) = std::fs::write(&args.output, &output.bytes) {
        if let Some((path, _)) = &report {
            let _ = std::fs::remove_file(path);
        }
        return Err(e).with_context(|| format!("Failed to write {}", args.output.display()));
    }
    tracing::info!(
        output = %args.output.display(),
        pages = output.metrics.output_page_count,
        "wrote output"
    );

    Ok(())
}
