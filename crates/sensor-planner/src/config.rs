//! Planner configuration: the shared `field` section plus optional overrides

use crate::{gateways_from, Gateway, Result, DEFAULT_GATEWAYS, EFFECTIVE_RANGE_M};
use field_survey::FieldConfig;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Deserialize)]
pub struct PlannerConfig {
    pub field: FieldConfig,
    #[serde(default)]
    pub deployment: DeploymentOverrides,
}

/// Optional `deployment` section. Absent keys fall back to the surveyed
/// gateway positions and range.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DeploymentOverrides {
    pub gateways: Option<Vec<[f64; 2]>>,
    pub effective_range_m: Option<f64>,
}

impl PlannerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config: PlannerConfig = field_survey::load_json(path)?;
        info!(
            "Field: {}m x {}m ({:.1} ha)",
            config.field.dimension_x_m,
            config.field.dimension_y_m,
            config.field.hectares()
        );
        if config.deployment != DeploymentOverrides::default() {
            debug!("Deployment overrides: {:?}", config.deployment);
        }
        Ok(config)
    }

    pub fn effective_range_m(&self) -> f64 {
        self.deployment
            .effective_range_m
            .unwrap_or(EFFECTIVE_RANGE_M)
    }

    /// Gateways for this run, numbered from 1 in list order.
    ///
    /// An explicitly empty override list yields no gateways; planning then
    /// fails with [`crate::PlanError::NoGateways`].
    pub fn gateways(&self) -> Vec<Gateway> {
        let range = self.effective_range_m();
        match &self.deployment.gateways {
            Some(list) => {
                let pairs: Vec<(f64, f64)> = list.iter().map(|[x, y]| (*x, *y)).collect();
                gateways_from(&pairs, range)
            }
            None => gateways_from(&DEFAULT_GATEWAYS, range),
        }
    }
}
