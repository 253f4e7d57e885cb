//! Positions and captions of every element on the location map

use crate::{CONTEXT_MARGIN_M, CONTEXT_SIZE_M, SCALE_BAR_M};
use field_survey::format::{metres, thousands};
use field_survey::render::WorldRect;
use field_survey::FieldConfig;
use nalgebra::{Point2, Vector2};

/// Gap between the field and each dimension arrow
const DIMENSION_OFFSET_M: f64 = 150.0;
/// Drop shadow offset (right, down)
const SHADOW_OFFSET_M: f64 = 20.0;
/// Room reserved right of the field for the compass and information box
const RIGHT_PANEL_M: f64 = 900.0;

#[derive(Debug, Clone, PartialEq)]
pub struct MapLayout {
    pub field: FieldConfig,
    /// Lower-left corner of the field inside the context area
    pub field_origin: Point2<f64>,
    pub shadow_origin: Point2<f64>,
    pub field_center: Point2<f64>,
    pub horizontal_arrow: (Point2<f64>, Point2<f64>),
    pub horizontal_label: Point2<f64>,
    pub vertical_arrow: (Point2<f64>, Point2<f64>),
    pub vertical_label: Point2<f64>,
    pub compass_base: Point2<f64>,
    pub compass_tip: Point2<f64>,
    pub compass_label: Point2<f64>,
    pub scale_bar: (Point2<f64>, Point2<f64>),
    pub scale_label: Point2<f64>,
    /// Bottom-left corner of the information box
    pub info_anchor: Point2<f64>,
    pub title_anchor: Point2<f64>,
    pub subtitle_anchor: Point2<f64>,
}

impl MapLayout {
    pub fn new(field: FieldConfig) -> Self {
        let (lx, ly) = (field.dimension_x_m, field.dimension_y_m);
        let origin = Point2::new((CONTEXT_SIZE_M - lx) / 2.0, (CONTEXT_SIZE_M - ly) / 2.0);

        let below = origin.y - DIMENSION_OFFSET_M;
        let left = origin.x - DIMENSION_OFFSET_M;
        let compass_base = Point2::new(origin.x + lx + 300.0, origin.y + ly - 200.0);
        let scale_y = origin.y - 350.0;

        Self {
            field,
            field_origin: origin,
            shadow_origin: origin + Vector2::new(SHADOW_OFFSET_M, -SHADOW_OFFSET_M),
            field_center: origin + Vector2::new(lx / 2.0, ly / 2.0),
            horizontal_arrow: (Point2::new(origin.x, below), Point2::new(origin.x + lx, below)),
            horizontal_label: Point2::new(origin.x + lx / 2.0, origin.y - 200.0),
            vertical_arrow: (Point2::new(left, origin.y), Point2::new(left, origin.y + ly)),
            vertical_label: Point2::new(origin.x - 250.0, origin.y + ly / 2.0),
            compass_base,
            compass_tip: compass_base + Vector2::new(0.0, 130.0),
            compass_label: compass_base + Vector2::new(0.0, 150.0),
            scale_bar: (
                Point2::new(origin.x, scale_y),
                Point2::new(origin.x + SCALE_BAR_M, scale_y),
            ),
            scale_label: Point2::new(origin.x + SCALE_BAR_M / 2.0, scale_y - 60.0),
            info_anchor: Point2::new(origin.x + lx + 100.0, origin.y + 100.0),
            title_anchor: Point2::new(CONTEXT_SIZE_M / 2.0, CONTEXT_SIZE_M - 150.0),
            subtitle_anchor: Point2::new(CONTEXT_SIZE_M / 2.0, CONTEXT_SIZE_M - 250.0),
        }
    }

    /// The context area itself, in world coordinates
    pub fn context(&self) -> WorldRect {
        WorldRect::new(0.0, CONTEXT_SIZE_M, 0.0, CONTEXT_SIZE_M)
    }

    /// Visible window: the context plus margin, widened so the side panel fits
    pub fn world(&self) -> WorldRect {
        let start = -CONTEXT_MARGIN_M;
        let end = CONTEXT_SIZE_M - CONTEXT_MARGIN_M;
        let panel_edge = self.field_origin.x + self.field.dimension_x_m + RIGHT_PANEL_M;
        WorldRect::new(start, end.max(panel_edge), start, end)
    }

    pub fn field_caption(&self) -> String {
        format!(
            "Avocado Field\n{:.1} hectares\n{}m × {}m",
            self.field.hectares(),
            metres(self.field.dimension_x_m),
            metres(self.field.dimension_y_m)
        )
    }

    pub fn horizontal_caption(&self) -> String {
        format!("{} m", metres(self.field.dimension_x_m))
    }

    pub fn vertical_caption(&self) -> String {
        format!("{} m", metres(self.field.dimension_y_m))
    }

    pub fn scale_caption(&self) -> String {
        format!("{} m", metres(SCALE_BAR_M))
    }

    pub fn info_caption(&self) -> String {
        let f = &self.field;
        [
            format!(
                "Area: {} m² ({:.2} ha)",
                thousands(f.total_area_m2),
                f.hectares()
            ),
            format!("Perimeter: ~{:.0} m", f.perimeter_m()),
            format!(
                "Elevation: {:.1}-{:.1} m",
                f.elevation_min_m, f.elevation_max_m
            ),
            format!("(median: {:.0} m)", f.elevation_median_m),
            String::new(),
            "Zone: Populated rural area".to_string(),
            "Crop: Avocado (Persea americana)".to_string(),
        ]
        .join("\n")
    }

    pub fn title(&self) -> &'static str {
        "Location Map - Avocado Field"
    }

    pub fn subtitle(&self) -> &'static str {
        "Soil Moisture IoT Monitoring System - Two-Tier Architecture"
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
            elevation_min_m: 412.34,
            elevation_max_m: 468.91,
            elevation_median_m: 437.2,
        }
    }

    #[test]
    fn test_field_centred_in_context() {
        let layout = MapLayout::new(field());
        assert_eq!(layout.field_origin, Point2::new(700.0, 1050.0));
        assert_eq!(layout.field_center, Point2::new(1500.0, 1500.0));
        assert_eq!(layout.shadow_origin, Point2::new(720.0, 1030.0));
    }

    #[test]
    fn test_annotation_positions() {
        let layout = MapLayout::new(field());
        assert_eq!(layout.horizontal_arrow.0, Point2::new(700.0, 900.0));
        assert_eq!(layout.horizontal_arrow.1, Point2::new(2300.0, 900.0));
        assert_eq!(layout.vertical_arrow.0, Point2::new(550.0, 1050.0));
        assert_eq!(layout.vertical_arrow.1, Point2::new(550.0, 1950.0));
        assert_eq!(layout.compass_base, Point2::new(2600.0, 1750.0));
        assert_eq!(layout.scale_bar.1.x - layout.scale_bar.0.x, SCALE_BAR_M);
        assert_eq!(layout.scale_bar.0.y, 700.0);
        assert_eq!(layout.info_anchor, Point2::new(2400.0, 1150.0));
    }

    #[test]
    fn test_world_widens_for_side_panel() {
        let layout = MapLayout::new(field());
        let world = layout.world();
        assert_eq!(world.x_min, -500.0);
        assert_eq!(world.y_min, -500.0);
        assert_eq!(world.y_max, 2500.0);
        assert_eq!(world.x_max, 3200.0);

        // A narrow field needs no extra room
        let narrow = MapLayout::new(FieldConfig {
            dimension_x_m: 200.0,
            ..field()
        });
        assert_eq!(narrow.world().x_max, 2500.0);
    }

    #[test]
    fn test_captions() {
        let layout = MapLayout::new(field());
        assert_eq!(
            layout.field_caption(),
            "Avocado Field\n144.0 hectares\n1600m × 900m"
        );
        assert_eq!(layout.horizontal_caption(), "1600 m");
        assert_eq!(layout.vertical_caption(), "900 m");

        let info = layout.info_caption();
        assert!(info.starts_with("Area: 1,440,000 m² (144.00 ha)\n"));
        assert!(info.contains("Perimeter: ~5000 m"));
        assert!(info.contains("Elevation: 412.3-468.9 m"));
        assert!(info.contains("(median: 437 m)"));
        assert!(info.ends_with("Crop: Avocado (Persea americana)"));
    }
}
