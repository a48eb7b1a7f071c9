//! Social Charts - render the boxplot, bar and line charts from CSV data
//!
//! Reads `socialMedia.csv`, `socialMediaAvg.csv` and `socialMediaTime.csv`
//! from the data directory and writes the charts plus `index.html`.

use anyhow::{bail, Context, Result};
use clap::Parser;
use social_charts::config::OutputFormat;
use social_charts::{ChartPipeline, Settings};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "social_charts", version, about = "Static charts from social media CSV data")]
struct Args {
    /// JSON settings file; missing fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the input CSV files
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Directory for charts, index.html and summary.json
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Chart image format
    #[arg(short, long, value_parser = parse_format)]
    format: Option<OutputFormat>,

    /// Skip writing summary.json
    #[arg(long)]
    no_summary: bool,
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    match s.to_ascii_lowercase().as_str() {
        "svg" => Ok(OutputFormat::Svg),
        "png" => Ok(OutputFormat::Png),
        other => Err(format!("unsupported format '{other}' (expected svg or png)")),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(dir) = args.data_dir {
        settings.data_dir = dir;
    }
    if let Some(dir) = args.out_dir {
        settings.output_dir = dir;
    }
    if let Some(format) = args.format {
        settings.format = format;
    }
    if args.no_summary {
        settings.write_summary = false;
    }

    let pipeline = ChartPipeline::new(settings);
    log::info!(
        "rendering charts from {} into {} ({})",
        pipeline.settings().data_dir.display(),
        pipeline.settings().output_dir.display(),
        pipeline.settings().format.extension()
    );

    let summary = pipeline.run().context("writing report")?;

    if summary.rendered.is_empty() {
        bail!("no chart could be rendered ({} failed)", summary.failed.len());
    }
    log::info!(
        "done: {} rendered, {} failed",
        summary.rendered.len(),
        summary.failed.len()
    );
    Ok(())
}
