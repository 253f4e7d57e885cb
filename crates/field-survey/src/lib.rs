//! Field Survey Library
//!
//! Shared pieces of the avocado field planning tools:
//!
//! - [`config`]: JSON field configuration (dimensions, area, elevation)
//! - [`render`]: raster canvas, world-to-pixel viewport and map shapes
//! - [`format`]: number formatting used by maps and reports
//!
//! Both binaries read the same configuration file independently; nothing
//! here keeps state between runs.

use std::convert::Infallible;
use thiserror::Error;

pub mod config;
pub mod format;
pub mod render;

pub use config::{load_json, FieldConfig, SiteConfig};

/// Square metres per hectare
pub const M2_PER_HECTARE: f64 = 10_000.0;

#[derive(Error, Debug)]
pub enum SurveyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

// Drawing onto the canvas never fails; this lets `?` cross that boundary.
impl From<Infallible> for SurveyError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

pub type Result<T> = std::result::Result<T, SurveyError>;
