//! Avocado Field Location Map
//!
//! Draws the field rectangle centred in a 3 km × 3 km context window with
//! dimension arrows, a north arrow, a 500 m scale bar and descriptive text.
//!
//! ```text
//!   -500 m ────────────────────────────── context ── 2500 m
//!     │   title / subtitle                                 │
//!     │        ┌───────────────┐   N                       │
//!     │   ↕ Ly │  field label  │   ↑    ┌ info box ┐        │
//!     │        └───────────────┘        └──────────┘        │
//!     │          ↔ Lx                                        │
//!     │        |── 500 m ──|                                 │
//! ```
//!
//! [`layout`] holds every position and caption as plain data so it can be
//! checked without decoding pixels; [`map`] turns it into a PNG.

pub mod layout;
pub mod map;

pub use layout::MapLayout;
pub use map::{render, render_to_file};

/// Side of the square context area around the field (metres)
pub const CONTEXT_SIZE_M: f64 = 3000.0;

/// The view starts this far before the context origin on both axes
pub const CONTEXT_MARGIN_M: f64 = 500.0;

/// Length of the scale bar (metres)
pub const SCALE_BAR_M: f64 = 500.0;

/// Default output path for the rendered map
pub const DEFAULT_OUTPUT: &str = "results/visualizations/location_map.png";
