//! Full deployment plan: strategy, grid, assignment and cost in one value

use crate::assign::{assign_sensors, AssignmentPlan};
use crate::config::PlannerConfig;
use crate::cost::CostEstimate;
use crate::grid::{generate_grid, grid_shape};
use crate::strategy::{select_strategy, AgronomicProfile, DeploymentStrategy, StrategySelection};
use crate::{Gateway, PlanError, Result, Sensor};
use field_survey::format::metres;
use field_survey::FieldConfig;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentPlan {
    pub field: FieldConfig,
    pub agronomy: AgronomicProfile,
    pub strategies: StrategySelection,
    pub gateways: Vec<Gateway>,
    pub sensors: Vec<Sensor>,
    /// `(rows, columns)` of the sensor grid
    pub grid_shape: (usize, usize),
    pub assignments: AssignmentPlan,
    pub cost: CostEstimate,
}

impl DeploymentPlan {
    pub fn from_config(config: &PlannerConfig) -> Result<Self> {
        Self::build(config.field, config.gateways())
    }

    /// Run the planning steps in order: strategy, grid, assignment, cost
    pub fn build(field: FieldConfig, gateways: Vec<Gateway>) -> Result<Self> {
        if gateways.is_empty() {
            return Err(PlanError::NoGateways);
        }

        info!("Gateways ({}):", gateways.len());
        for gw in &gateways {
            info!(
                "  {}: ({:.1}, {:.1}), range {}m",
                gw.label(),
                gw.position.x,
                gw.position.y,
                gw.range_m
            );
        }

        let agronomy = AgronomicProfile::for_field(&field);
        info!(
            "Orchard: {}m x {}m planting, {:.0} trees/ha, ~{} trees",
            agronomy.tree_spacing_m, agronomy.tree_spacing_m, agronomy.trees_per_ha, agronomy.estimated_trees
        );

        info!("Evaluating sensor density strategies:");
        let strategies = select_strategy(&field);
        let spacing = strategies.selected.spacing_m;

        let sensors = generate_grid(field.dimension_x_m, field.dimension_y_m, spacing)?;
        let grid_shape = grid_shape(field.dimension_x_m, field.dimension_y_m, spacing)?;
        info!(
            "Sensor grid: {} x {} = {} sensors ({}m spacing)",
            grid_shape.1,
            grid_shape.0,
            sensors.len(),
            spacing
        );

        info!("Assigning sensors to nearest gateway:");
        let assignments = assign_sensors(&sensors, &gateways)?;
        let cost = CostEstimate::new(gateways.len(), sensors.len(), field.hectares());

        let plan = Self {
            field,
            agronomy,
            strategies,
            gateways,
            sensors,
            grid_shape,
            assignments,
            cost,
        };
        match plan.coverage_warning() {
            Some(message) => {
                warn!("{}", message);
                warn!("Consider raising LoRa TX power or adding a gateway");
            }
            None => info!("All sensors are within gateway range"),
        }
        Ok(plan)
    }

    /// Console warning for sensors beyond every gateway's range, `None` when all are covered
    pub fn coverage_warning(&self) -> Option<String> {
        let out = &self.assignments.out_of_range;
        if out.is_empty() {
            return None;
        }
        let indices: Vec<String> = out.iter().map(|i| i.to_string()).collect();
        Some(format!(
            "{} sensors outside the {}m range (sensors {})",
            out.len(),
            metres(self.range_m()),
            indices.join(", ")
        ))
    }

    pub fn strategy(&self) -> &DeploymentStrategy {
        &self.strategies.selected
    }

    /// Effective range shared by the gateways (the first one's, when they differ)
    pub fn range_m(&self) -> f64 {
        self.gateways.first().map_or(0.0, |g| g.range_m)
    }

    /// Deployed sensors per hectare
    pub fn density_per_ha(&self) -> f64 {
        self.sensors.len() as f64 / self.field.hectares()
    }
}
