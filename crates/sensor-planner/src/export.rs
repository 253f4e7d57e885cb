//! Machine-readable deployment layout (JSON)

use crate::assign::Assignment;
use crate::cost::CostEstimate;
use crate::plan::DeploymentPlan;
use crate::strategy::DeploymentStrategy;
use crate::{Gateway, Result};
use field_survey::FieldConfig;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct DeploymentLayout<'a> {
    pub field: &'a FieldConfig,
    pub strategy: &'a DeploymentStrategy,
    pub gateways: &'a [Gateway],
    pub sensors: &'a [Assignment],
    pub cost: &'a CostEstimate,
    pub metadata: LayoutMetadata,
}

#[derive(Debug, Serialize)]
pub struct LayoutMetadata {
    pub total_sensors: usize,
    pub in_range: usize,
    pub out_of_range: usize,
    pub effective_range_m: f64,
    pub generated_at: String,
}

impl<'a> DeploymentLayout<'a> {
    pub fn new(plan: &'a DeploymentPlan) -> Self {
        Self {
            field: &plan.field,
            strategy: plan.strategy(),
            gateways: &plan.gateways,
            sensors: &plan.assignments.assignments,
            cost: &plan.cost,
            metadata: LayoutMetadata {
                total_sensors: plan.sensors.len(),
                in_range: plan.assignments.in_range_count(),
                out_of_range: plan.assignments.out_of_range.len(),
                effective_range_m: plan.range_m(),
                generated_at: chrono::Utc::now().to_rfc3339(),
            },
        }
    }
}

/// Write the layout of `plan` to `path` as pretty-printed JSON
pub fn write_layout(plan: &DeploymentPlan, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &DeploymentLayout::new(plan))?;

    info!("Deployment layout saved to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::tests::field_plan;
    use tempfile::NamedTempFile;

    #[test]
    fn test_layout_document() {
        let plan = field_plan();
        let file = NamedTempFile::new().unwrap();
        write_layout(&plan, file.path()).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(file.path()).unwrap()).unwrap();

        assert_eq!(json["metadata"]["total_sensors"], 91);
        assert_eq!(json["metadata"]["in_range"], 88);
        assert_eq!(json["metadata"]["out_of_range"], 3);
        assert_eq!(json["metadata"]["effective_range_m"], 750.0);
        assert!(json["metadata"]["generated_at"].as_str().unwrap().contains('T'));

        assert_eq!(json["strategy"]["tier"], "Medium");
        assert_eq!(json["cost"]["total_usd"], 5705);
        assert_eq!(json["gateways"].as_array().unwrap().len(), 2);

        let sensors = json["sensors"].as_array().unwrap();
        assert_eq!(sensors.len(), 91);
        assert_eq!(sensors[5]["in_range"], false);
        assert_eq!(sensors[8]["gateway"], 0);
        assert_eq!(sensors[0]["position"][0], 60.0);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results/layout/deployment.json");
        write_layout(&field_plan(), &path).unwrap();
        assert!(path.exists());
    }
}
