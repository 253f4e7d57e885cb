//! Deployment Planning CLI
//!
//! Plans the soil moisture sensor grid and LoRa gateway assignment for the
//! avocado field, then writes the coverage map and deployment guide.
//!
//! Usage:
//!   plan-deployment --config config.json \
//!                   --map results/visualizations/two_tier_architecture.png \
//!                   --report results/reports/deployment_guide.txt \
//!                   --layout results/deployment_layout.json

use anyhow::Result;
use clap::Parser;
use field_survey::config::DEFAULT_CONFIG_PATH;
use field_survey::format::thousands;
use sensor_planner::{
    coverage, export, DeploymentPlan, DeploymentReport, PlannerConfig, DEFAULT_MAP_OUTPUT,
    DEFAULT_REPORT_OUTPUT,
};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "plan-deployment",
    about = "Plan the two-tier soil moisture sensor deployment"
)]
struct Args {
    /// Path to the field configuration JSON file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Coverage map PNG
    #[arg(long, default_value = DEFAULT_MAP_OUTPUT)]
    map: PathBuf,

    /// Deployment guide text file
    #[arg(long, default_value = DEFAULT_REPORT_OUTPUT)]
    report: PathBuf,

    /// Also write the layout as JSON
    #[arg(long)]
    layout: Option<PathBuf>,

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

    info!("{}", "=".repeat(80));
    info!("SOIL MOISTURE SENSOR DEPLOYMENT PLANNER");
    info!("{}", "=".repeat(80));

    let config = PlannerConfig::load(&args.config)?;
    let plan = DeploymentPlan::from_config(&config)?;

    info!("\nRendering coverage map...");
    coverage::render_to_file(&plan, &args.map)?;

    info!("Writing deployment guide...");
    let generated_at = chrono::Local::now().naive_local();
    DeploymentReport::new(&plan, generated_at).write_to(&args.report)?;

    if let Some(layout) = &args.layout {
        export::write_layout(&plan, layout)?;
    }

    // Summary
    let strategy = plan.strategy();
    info!("\n{}", "=".repeat(80));
    info!("SUMMARY - TWO-TIER ARCHITECTURE");
    info!("{}", "=".repeat(80));
    info!("TIER 1 - LORA GATEWAYS");
    info!("  Count: {}", plan.gateways.len());
    info!("  Locations: see {}", args.report.display());
    info!("  Role: receive sensor data and forward it to the cloud");
    info!("TIER 2 - SOIL MOISTURE SENSORS");
    info!("  Count: {}", plan.sensors.len());
    info!("  Density: {:.2} sensors/ha", strategy.density_per_ha);
    info!("  Spacing: {} m", strategy.spacing_m);
    info!("  Role: measure soil moisture and transmit over LoRa");
    info!("ASSIGNMENT");
    for (idx, gw) in plan.gateways.iter().enumerate() {
        info!(
            "  {} -> {} sensors",
            gw.label(),
            plan.assignments.assigned_to(idx).len()
        );
    }
    if !plan.assignments.all_covered() {
        info!(
            "  Out of range: {} sensors",
            plan.assignments.out_of_range.len()
        );
    }
    info!("ESTIMATED COST: ${}", thousands(plan.cost.total_usd as f64));
    info!("GENERATED FILES");
    info!("  {}", args.map.display());
    info!("  {}", args.report.display());
    if let Some(layout) = &args.layout {
        info!("  {}", layout.display());
    }
    info!("{}", "=".repeat(80));

    Ok(())
}
