mod api;
mod catalog;
mod charts;
mod config;
mod error;
mod logging;
mod models;
mod prepare;
mod stats;
mod tui;
mod utils;
mod viz;

use anyhow::{Context, Result};
use clap::Parser;
use dotenvy::dotenv;
use std::{env, path::PathBuf};
use tracing::info;

use crate::api::{CategoryFile, CategorySource, YouTubeClient};
use crate::catalog::CATALOG;
use crate::config::Config;
use crate::logging::LoggingConfig;
use crate::models::TrendTable;
use crate::viz::RenderOptions;

/// Charts for a YouTube trending videos dataset
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Trending videos CSV, overrides data_path
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Render one chart by label or slug and exit
    #[arg(long)]
    chart: Option<String>,

    /// SVG file to write, overrides output_path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the available charts and exit
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    if args.list {
        for spec in CATALOG.iter() {
            println!("{:<45} {}", spec.label, spec.slug());
        }
        return Ok(());
    }

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(config::DEFAULT_CONFIG_PATH));
    let mut config = config::load_config(&config_path, args.config.is_some())?;
    if let Some(data) = args.data {
        config.data_path = data;
    }
    if let Some(output) = args.output {
        config.output_path = output;
    }

    let interactive = args.chart.is_none();
    logging::init_logging(&LoggingConfig::resolve(
        &config.logging,
        interactive,
        &config.output_path,
    ))?;
    info!(config = %config_path.display(), interactive, "Starting trend tracker");

    let table = load_table(&config).await?;
    let options = RenderOptions {
        output_path: config.output_path.clone(),
        width: config.width,
        height: config.height,
    };

    match args.chart {
        Some(name) => {
            let path = render(&name, &table, &options)?;
            println!("✅ Chart written to: {}", path.display());
        }
        None => {
            tui::start_tui(catalog::labels(), |label| {
                let path = render(label, &table, &options)?;
                Ok(format!("✅ {} written to {}", label, path.display()))
            })?;
            println!("Exiting...");
        }
    }

    Ok(())
}

/// Read the CSV and join it with the category lookup
async fn load_table(config: &Config) -> Result<TrendTable> {
    println!("Loading trending videos from {} ⌛️", config.data_path.display());
    let raw = prepare::load_trending_videos(&config.data_path)?;

    let source = category_source(config)?;
    let categories = api::load_categories(source.as_ref()).await?;

    let table = prepare::prepare(&raw, &categories)?;
    println!(
        "✅ Prepared {} videos across {} categories",
        table.records.len(),
        categories.len()
    );
    Ok(table)
}

fn category_source(config: &Config) -> Result<Box<dyn CategorySource>> {
    match &config.category_file {
        Some(path) => {
            info!(path = %path.display(), "Reading categories from file");
            Ok(Box::new(CategoryFile::new(path)))
        }
        None => {
            let api_key = env::var("YOUTUBE_API_KEY")
                .context("YOUTUBE_API_KEY must be set when no category_file is configured")?;
            Ok(Box::new(YouTubeClient::new(api_key, config.region_code.clone())))
        }
    }
}

fn render(name: &str, table: &TrendTable, options: &RenderOptions) -> Result<PathBuf> {
    let spec = catalog::find_chart(name)?;
    let chart = charts::build_chart(spec, table)?;
    viz::render_chart(&chart, options)
}
