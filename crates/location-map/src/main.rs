//! Location Map CLI
//!
//! Renders the contextual location map of the avocado field.
//!
//! Usage:
//!   location-map --config config.json \
//!                --output results/visualizations/location_map.png

use anyhow::Result;
use clap::Parser;
use field_survey::config::DEFAULT_CONFIG_PATH;
use field_survey::SiteConfig;
use location_map::DEFAULT_OUTPUT;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "location-map",
    about = "Render the contextual location map of the avocado field"
)]
struct Args {
    /// Path to the field configuration JSON file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Output PNG file
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = SiteConfig::load(&args.config)?;
    let field = config.field;

    location_map::render_to_file(&field, &args.output)?;

    info!("{}", "=".repeat(60));
    info!("LOCATION MAP GENERATED");
    info!("{}", "=".repeat(60));
    info!(
        "Field: {:.1} hectares ({}m × {}m)",
        field.hectares(),
        field_survey::format::metres(field.dimension_x_m),
        field_survey::format::metres(field.dimension_y_m)
    );
    info!("File: {}", args.output.display());
    info!("{}", "=".repeat(60));

    Ok(())
}
