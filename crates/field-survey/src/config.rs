//! Field configuration loading from JSON

use crate::{Result, M2_PER_HECTARE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

/// Default configuration path, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Physical description of the field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// East-west extent in metres
    pub dimension_x_m: f64,
    /// North-south extent in metres
    pub dimension_y_m: f64,
    /// Surveyed area in m² (not necessarily x·y)
    pub total_area_m2: f64,
    pub elevation_min_m: f64,
    pub elevation_max_m: f64,
    pub elevation_median_m: f64,
}

impl FieldConfig {
    pub fn hectares(&self) -> f64 {
        self.total_area_m2 / M2_PER_HECTARE
    }

    pub fn perimeter_m(&self) -> f64 {
        2.0 * (self.dimension_x_m + self.dimension_y_m)
    }
}

/// Minimal configuration document: just the `field` section
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub field: FieldConfig,
}

impl SiteConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config: SiteConfig = load_json(path)?;
        info!(
            "Field: {}m x {}m ({:.1} ha)",
            config.field.dimension_x_m,
            config.field.dimension_y_m,
            config.field.hectares()
        );
        Ok(config)
    }
}

/// Load any JSON configuration document.
///
/// Each tool declares its own document type so unknown sections written for
/// the other tool are ignored.
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    info!("Loading configuration from {:?}", path);

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let parsed = serde_json::from_reader(reader)?;

    debug!("Configuration parsed");
    Ok(parsed)
}
