//! Sensor density strategies and the agronomic profile of the orchard

use field_survey::{FieldConfig, M2_PER_HECTARE};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Tier deployed by default; the others are costed for comparison
pub const RECOMMENDED_TIER: Tier = Tier::Medium;

/// Avocado planting grid (metres between trees, both directions)
pub const TREE_SPACING_M: f64 = 6.0;

/// Sensor density tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    High,
    Medium,
    Basic,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::High, Tier::Medium, Tier::Basic];

    pub fn name(&self) -> &'static str {
        match self {
            Tier::High => "High Precision",
            Tier::Medium => "Medium Precision",
            Tier::Basic => "Basic Coverage",
        }
    }

    /// Sensors per hectare
    pub fn density_per_ha(&self) -> f64 {
        match self {
            Tier::High => 1.0,
            Tier::Medium => 0.67,
            Tier::Basic => 0.5,
        }
    }

    /// Grid spacing in metres
    pub fn spacing_m(&self) -> f64 {
        match self {
            Tier::High => 100.0,
            Tier::Medium => 120.0,
            Tier::Basic => 140.0,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Tier::High => "1 sensor per hectare - maximum precision",
            Tier::Medium => "1 sensor per 1.5 hectares - cost/precision balance",
            Tier::Basic => "1 sensor per 2 hectares - minimum viable",
        }
    }
}

/// A tier evaluated against a concrete field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentStrategy {
    pub tier: Tier,
    pub name: &'static str,
    pub density_per_ha: f64,
    pub spacing_m: f64,
    pub description: &'static str,
    pub sensor_count: usize,
}

impl DeploymentStrategy {
    pub fn for_tier(tier: Tier, field: &FieldConfig) -> Self {
        let density = tier.density_per_ha();
        Self {
            tier,
            name: tier.name(),
            density_per_ha: density,
            spacing_m: tier.spacing_m(),
            description: tier.description(),
            sensor_count: (density * field.total_area_m2 / M2_PER_HECTARE) as usize,
        }
    }

    /// `$$$`, `$$` or `$` by density
    pub fn relative_cost(&self) -> &'static str {
        if self.density_per_ha >= 1.0 {
            "$$$"
        } else if self.density_per_ha >= 0.6 {
            "$$"
        } else {
            "$"
        }
    }
}

/// All evaluated tiers plus the one to deploy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategySelection {
    pub candidates: Vec<DeploymentStrategy>,
    pub selected: DeploymentStrategy,
}

/// Evaluate every tier for `field` and select [`RECOMMENDED_TIER`]
pub fn select_strategy(field: &FieldConfig) -> StrategySelection {
    let candidates: Vec<DeploymentStrategy> = Tier::ALL
        .iter()
        .map(|&tier| DeploymentStrategy::for_tier(tier, field))
        .collect();

    for s in &candidates {
        info!(
            "  {:<17} {:<50} {:.2}/ha  {:>3.0}m  {:>4} sensors  {}",
            s.name,
            s.description,
            s.density_per_ha,
            s.spacing_m,
            s.sensor_count,
            s.relative_cost()
        );
    }

    let selected = DeploymentStrategy::for_tier(RECOMMENDED_TIER, field);
    info!(
        "Selected strategy: {} ({} m spacing)",
        selected.name, selected.spacing_m
    );

    StrategySelection {
        candidates,
        selected,
    }
}

/// Orchard facts reported alongside the plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgronomicProfile {
    pub tree_spacing_m: f64,
    pub trees_per_ha: f64,
    pub estimated_trees: u64,
}

impl AgronomicProfile {
    pub fn for_field(field: &FieldConfig) -> Self {
        let trees_per_ha = M2_PER_HECTARE / (TREE_SPACING_M * TREE_SPACING_M);
        Self {
            tree_spacing_m: TREE_SPACING_M,
            trees_per_ha,
            estimated_trees: (trees_per_ha * field.hectares()) as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> FieldConfig {
        FieldConfig {
            dimension_x_m: 1600.0,
            dimension_y_m: 900.0,
            total_area_m2: 1_440_000.0,
            elevation_min_m: 412.3,
            elevation_max_m: 468.9,
            elevation_median_m: 437.0,
        }
    }

    #[test]
    fn test_sensor_counts_per_tier() {
        let f = field();
        assert_eq!(DeploymentStrategy::for_tier(Tier::High, &f).sensor_count, 144);
        // 0.67 * 144 ha = 96.48
        assert_eq!(DeploymentStrategy::for_tier(Tier::Medium, &f).sensor_count, 96);
        assert_eq!(DeploymentStrategy::for_tier(Tier::Basic, &f).sensor_count, 72);
    }

    #[test]
    fn test_relative_cost() {
        let f = field();
        let cost = |t| DeploymentStrategy::for_tier(t, &f).relative_cost();
        assert_eq!(cost(Tier::High), "$$$");
        assert_eq!(cost(Tier::Medium), "$$");
        assert_eq!(cost(Tier::Basic), "$");
    }

    #[test]
    fn test_medium_tier_always_selected() {
        let selection = select_strategy(&field());
        assert_eq!(selection.candidates.len(), 3);
        assert_eq!(selection.selected.tier, Tier::Medium);
        assert_eq!(selection.selected.spacing_m, 120.0);
        assert_eq!(selection.selected.name, "Medium Precision");

        // Independent of field size
        let tiny = FieldConfig {
            total_area_m2: 5_000.0,
            ..field()
        };
        assert_eq!(select_strategy(&tiny).selected.tier, Tier::Medium);
    }

    #[test]
    fn test_agronomic_profile() {
        let profile = AgronomicProfile::for_field(&field());
        assert_eq!(profile.tree_spacing_m, 6.0);
        assert!((profile.trees_per_ha - 277.78).abs() < 0.01);
        assert_eq!(profile.estimated_trees, 40_000);
    }
}
