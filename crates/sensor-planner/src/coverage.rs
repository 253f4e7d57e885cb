//! Two-tier coverage map: gateway ranges, sensor grid and assignments

use crate::plan::DeploymentPlan;
use crate::Result;
use embedded_graphics::{
    mono_font::iso_8859_1::{FONT_10X20, FONT_9X15, FONT_9X15_BOLD},
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{PrimitiveStyle, PrimitiveStyleBuilder, Rectangle},
};
use field_survey::format::metres;
use field_survey::render::{
    draw_axes, draw_cross, draw_dot, draw_grid, draw_label, draw_star, palette, text_block_size,
    Anchor, Canvas, LabelStyle, Viewport, WorldRect,
};
use std::path::Path;
use tracing::{debug, info};

/// Bounding box of the plotted window; the world is fitted inside it
const PLOT_MAX_PX: Size = Size::new(2400, 1000);
const MARGIN_LEFT_PX: u32 = 70;
const MARGIN_RIGHT_PX: u32 = 30;
const MARGIN_TOP_PX: u32 = 110;
const MARGIN_BOTTOM_PX: u32 = 80;
/// View padding around the field (metres)
const PADDING_M: f64 = 50.0;
const TICK_STEP_M: f64 = 200.0;

const COVERAGE_OPACITY: f32 = 0.08;
/// Width of the range outline, drawn inside the disc edge
const COVERAGE_RING_PX: f64 = 2.0;
const SENSOR_DOT_PX: u32 = 9;
const GATEWAY_STAR_PX: u32 = 22;

/// Marker drawn in front of a legend entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LegendMarker {
    Gateway,
    Sensor(Rgb888),
    Coverage,
    OutOfRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub marker: LegendMarker,
    pub text: String,
}

/// Visible window: the field plus a small margin
pub fn world(plan: &DeploymentPlan) -> WorldRect {
    WorldRect::new(
        -PADDING_M,
        plan.field.dimension_x_m + PADDING_M,
        -PADDING_M,
        plan.field.dimension_y_m + PADDING_M,
    )
}

pub fn title(plan: &DeploymentPlan) -> String {
    format!(
        "Two-Tier Architecture: {} LoRa Gateways + {} Soil Moisture Sensors\n\
         Field: {}m × {}m ({:.1} ha) | Density: {:.2} sensors/ha",
        plan.gateways.len(),
        plan.sensors.len(),
        metres(plan.field.dimension_x_m),
        metres(plan.field.dimension_y_m),
        plan.field.hectares(),
        plan.density_per_ha()
    )
}

pub fn legend_entries(plan: &DeploymentPlan) -> Vec<LegendEntry> {
    let mut entries = vec![LegendEntry {
        marker: LegendMarker::Gateway,
        text: format!("LoRa gateways (N={})", plan.gateways.len()),
    }];
    for (idx, gw) in plan.gateways.iter().enumerate() {
        entries.push(LegendEntry {
            marker: LegendMarker::Sensor(palette::gateway_color(idx)),
            text: format!(
                "Sensors {} ({})",
                gw.label(),
                plan.assignments.assigned_to(idx).len()
            ),
        });
    }
    entries.push(LegendEntry {
        marker: LegendMarker::Coverage,
        text: format!("LoRa coverage ({}m)", metres(plan.range_m())),
    });
    let out = plan.assignments.out_of_range.len();
    if out > 0 {
        entries.push(LegendEntry {
            marker: LegendMarker::OutOfRange,
            text: format!("Out of range ({})", out),
        });
    }
    entries
}

/// Render the coverage map for `plan`
pub fn render(plan: &DeploymentPlan) -> Result<Canvas> {
    let world = world(plan);
    let plot = world.fit_into(PLOT_MAX_PX);
    let vp = Viewport::fit(
        world,
        Rectangle::new(Point::new(MARGIN_LEFT_PX as i32, MARGIN_TOP_PX as i32), plot),
    );
    let mut canvas = Canvas::new(
        MARGIN_LEFT_PX + plot.width + MARGIN_RIGHT_PX,
        MARGIN_TOP_PX + plot.height + MARGIN_BOTTOM_PX,
        palette::WHITE,
    );
    debug!(
        "Coverage map canvas {}x{} px, {:.3} px/m",
        canvas.width(),
        canvas.height(),
        vp.scale()
    );

    draw_field(&mut canvas, &vp, plan)?;
    draw_coverage(&mut canvas, &vp, plan)?;
    draw_sensors(&mut canvas, &vp, plan)?;
    draw_gateways(&mut canvas, &vp, plan)?;
    draw_title(&mut canvas, &vp, plan)?;
    draw_legend(&mut canvas, &vp, &legend_entries(plan))?;
    draw_axes(&mut canvas, &vp, TICK_STEP_M, "X (metres)", "Y (metres)")?;

    Ok(canvas)
}

/// Render and write the coverage map as PNG, overwriting `path`
pub fn render_to_file(plan: &DeploymentPlan, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    render(plan)?.save_png(path)?;
    info!("Coverage map saved to {:?}", path);
    Ok(())
}

fn draw_field(canvas: &mut Canvas, vp: &Viewport, plan: &DeploymentPlan) -> Result<()> {
    draw_grid(canvas, vp, TICK_STEP_M, palette::GRID)?;

    let field = vp.rect_px(0.0, 0.0, plan.field.dimension_x_m, plan.field.dimension_y_m);
    canvas.with_opacity(0.15, |c| {
        field
            .into_styled(PrimitiveStyle::with_fill(palette::FIELD_GREEN))
            .draw(c)
    })?;
    field
        .into_styled(PrimitiveStyle::with_stroke(palette::BLACK, 3))
        .draw(canvas)?;
    Ok(())
}

fn draw_coverage(canvas: &mut Canvas, vp: &Viewport, plan: &DeploymentPlan) -> Result<()> {
    let bounds = vp.plot_area();
    for (idx, gw) in plan.gateways.iter().enumerate() {
        let color = palette::gateway_color(idx);
        let Some(disc) = CoverageDisc::clipped(vp, gw.position.x, gw.position.y, gw.range_m, bounds)
        else {
            continue;
        };
        canvas.with_opacity(COVERAGE_OPACITY, |c| {
            c.draw_iter(disc.points().map(|p| Pixel(p, color)))
        })?;
        canvas.with_opacity(0.5, |c| {
            c.draw_iter(disc.ring_points(COVERAGE_RING_PX).map(|p| Pixel(p, color)))
        })?;
    }
    Ok(())
}

/// A range disc in pixel space, restricted to the part inside the plot area.
///
/// Only pixels inside `window` are visited, whatever the range.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CoverageDisc {
    centre: (f64, f64),
    radius: f64,
    window: Rectangle,
}

impl CoverageDisc {
    /// Disc of `range_m` around `(x, y)`, or `None` when it misses `bounds`
    fn clipped(vp: &Viewport, x: f64, y: f64, range_m: f64, bounds: Rectangle) -> Option<Self> {
        let radius = range_m.abs() * vp.scale();
        if radius.is_nan() {
            return None;
        }
        let centre = vp.project(x, y);
        let br = bounds.bottom_right()?;
        let x0 = (centre.0 - radius).floor().max(f64::from(bounds.top_left.x));
        let x1 = (centre.0 + radius).ceil().min(f64::from(br.x));
        let y0 = (centre.1 - radius).floor().max(f64::from(bounds.top_left.y));
        let y1 = (centre.1 + radius).ceil().min(f64::from(br.y));
        if x0 > x1 || y0 > y1 {
            return None;
        }
        let window = Rectangle::with_corners(
            Point::new(x0 as i32, y0 as i32),
            Point::new(x1 as i32, y1 as i32),
        );
        Some(Self {
            centre,
            radius,
            window,
        })
    }

    fn distance(&self, p: Point) -> f64 {
        (f64::from(p.x) - self.centre.0).hypot(f64::from(p.y) - self.centre.1)
    }

    fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.window
            .points()
            .filter(move |&p| self.distance(p) <= self.radius)
    }

    /// Pixels within `width` of the edge, inside the disc
    fn ring_points(&self, width: f64) -> impl Iterator<Item = Point> + '_ {
        self.window.points().filter(move |&p| {
            let d = self.distance(p);
            d <= self.radius && d > self.radius - width
        })
    }
}

fn draw_sensors(canvas: &mut Canvas, vp: &Viewport, plan: &DeploymentPlan) -> Result<()> {
    for a in &plan.assignments.assignments {
        let at = vp.to_px(a.position.x, a.position.y);
        if a.in_range {
            let color = palette::gateway_color(a.gateway);
            canvas.with_opacity(0.8, |c| draw_dot(c, at, SENSOR_DOT_PX, color))?;
        } else {
            canvas.with_opacity(0.6, |c| draw_cross(c, at, 12, palette::GRAY, 2))?;
        }
    }
    Ok(())
}

fn draw_gateways(canvas: &mut Canvas, vp: &Viewport, plan: &DeploymentPlan) -> Result<()> {
    for (idx, gw) in plan.gateways.iter().enumerate() {
        let color = palette::gateway_color(idx);
        let at = vp.to_px(gw.position.x, gw.position.y);
        draw_star(canvas, at, GATEWAY_STAR_PX, color, palette::DARK_RED)?;

        let tag = LabelStyle::boxed(&FONT_9X15_BOLD, palette::BLACK, palette::WHITE, Some(color))
            .padded(4);
        draw_label(
            canvas,
            &gw.label(),
            at + Point::new(0, GATEWAY_STAR_PX as i32 + 6),
            Anchor::TopCenter,
            &tag,
        )?;
    }
    Ok(())
}

fn draw_title(canvas: &mut Canvas, vp: &Viewport, plan: &DeploymentPlan) -> Result<()> {
    let area = vp.plot_area();
    let style = LabelStyle::plain(&FONT_10X20, palette::BLACK);
    draw_label(
        canvas,
        &title(plan),
        Point::new(area.top_left.x + area.size.width as i32 / 2, area.top_left.y - 24),
        Anchor::BottomCenter,
        &style,
    )?;
    Ok(())
}

fn draw_legend(canvas: &mut Canvas, vp: &Viewport, entries: &[LegendEntry]) -> Result<()> {
    const ROW_PX: i32 = 26;
    const MARKER_COLUMN_PX: i32 = 34;
    const PADDING_PX: i32 = 10;

    let text_width = entries
        .iter()
        .map(|e| text_block_size(&FONT_9X15, &e.text, 1).width)
        .max()
        .unwrap_or(0) as i32;
    let size = Size::new(
        (2 * PADDING_PX + MARKER_COLUMN_PX + text_width) as u32,
        (2 * PADDING_PX + ROW_PX * entries.len() as i32) as u32,
    );

    let area = vp.plot_area();
    let top_left = Point::new(
        area.top_left.x + area.size.width as i32 - size.width as i32 - 12,
        area.top_left.y + 12,
    );
    Rectangle::new(top_left, size)
        .into_styled(
            PrimitiveStyleBuilder::new()
                .fill_color(palette::WHITE)
                .stroke_color(palette::GRAY)
                .stroke_width(1)
                .build(),
        )
        .draw(canvas)?;

    let text = LabelStyle::plain(&FONT_9X15, palette::BLACK);
    for (row, entry) in entries.iter().enumerate() {
        let y = top_left.y + PADDING_PX + row as i32 * ROW_PX + ROW_PX / 2;
        let marker = Point::new(top_left.x + PADDING_PX + MARKER_COLUMN_PX / 2, y);
        match entry.marker {
            LegendMarker::Gateway => {
                draw_star(canvas, marker, 10, palette::gateway_color(0), palette::DARK_RED)?
            }
            LegendMarker::Sensor(color) => draw_dot(canvas, marker, SENSOR_DOT_PX, color)?,
            LegendMarker::Coverage => {
                let swatch = Rectangle::with_center(marker, Size::new(24, 14));
                canvas.with_opacity(0.3, |c| {
                    swatch
                        .into_styled(PrimitiveStyle::with_fill(palette::GRAY))
                        .draw(c)
                })?;
            }
            LegendMarker::OutOfRange => draw_cross(canvas, marker, 12, palette::GRAY, 2)?,
        }
        draw_label(
            canvas,
            &entry.text,
            Point::new(top_left.x + PADDING_PX + MARKER_COLUMN_PX, y),
            Anchor::CenterLeft,
            &text,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::tests::{field, field_plan};
    use crate::gateways_from;
    use field_survey::FieldConfig;

    fn viewport_for(plan: &DeploymentPlan) -> Viewport {
        let world = world(plan);
        Viewport::fit(
            world,
            Rectangle::new(
                Point::new(MARGIN_LEFT_PX as i32, MARGIN_TOP_PX as i32),
                world.fit_into(PLOT_MAX_PX),
            ),
        )
    }

    fn strip_plan() -> DeploymentPlan {
        let strip = FieldConfig {
            dimension_x_m: 8000.0,
            dimension_y_m: 20.0,
            total_area_m2: 160_000.0,
            ..field()
        };
        DeploymentPlan::build(strip, gateways_from(&[(4000.0, 10.0)], 750.0)).unwrap()
    }

    #[test]
    fn test_world_pads_field() {
        let w = world(&field_plan());
        assert_eq!((w.x_min, w.x_max), (-50.0, 1650.0));
        assert_eq!((w.y_min, w.y_max), (-50.0, 950.0));
    }

    #[test]
    fn test_legend_entries() {
        let entries = legend_entries(&field_plan());
        let texts: Vec<&str> = entries.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "LoRa gateways (N=2)",
                "Sensors GW1 (41)",
                "Sensors GW2 (47)",
                "LoRa coverage (750m)",
                "Out of range (3)",
            ]
        );
        assert_eq!(entries[1].marker, LegendMarker::Sensor(palette::GATEWAY_COLORS[0]));
        assert_eq!(entries[4].marker, LegendMarker::OutOfRange);
    }

    #[test]
    fn test_legend_omits_out_of_range_when_covered() {
        let gateways = gateways_from(&[(1525.0, 525.0), (225.0, 675.0), (700.0, 200.0)], 750.0);
        let plan = DeploymentPlan::build(field(), gateways).unwrap();
        let entries = legend_entries(&plan);
        assert_eq!(entries.len(), 5);
        assert!(entries.iter().all(|e| e.marker != LegendMarker::OutOfRange));
    }

    #[test]
    fn test_title() {
        let text = title(&field_plan());
        assert!(text.starts_with("Two-Tier Architecture: 2 LoRa Gateways + 91 Soil Moisture Sensors\n"));
        assert!(text.contains("Field: 1600m × 900m (144.0 ha) | Density: 0.63 sensors/ha"));
    }

    #[test]
    fn test_sensor_dots_take_gateway_colour() {
        let plan = field_plan();
        let canvas = render(&plan).unwrap();
        let vp = viewport_for(&plan);

        // Sensor 0 belongs to GW2; its dot centre is opaque enough to be dominated by that colour
        let p = vp.to_px(60.0, 60.0);
        let pixel = canvas.pixel(p.x as u32, p.y as u32).unwrap();
        let gw2 = palette::GATEWAY_COLORS[1];
        assert!(pixel.g() > pixel.r(), "got {:?}, expected tint of {:?}", pixel, gw2);
    }

    #[test]
    fn test_out_of_range_sensor_is_gray() {
        let plan = field_plan();
        let canvas = render(&plan).unwrap();
        let vp = viewport_for(&plan);

        // Cross centre of sensor 6 at (780, 60)
        let p = vp.to_px(780.0, 60.0);
        let pixel = canvas.pixel(p.x as u32, p.y as u32).unwrap();
        let spread = pixel.r().max(pixel.g()).max(pixel.b()) - pixel.r().min(pixel.g()).min(pixel.b());
        assert!(spread < 40, "got {:?}", pixel);
        assert!(pixel.r() < 200);
    }

    #[test]
    fn test_canvas_size_for_field() {
        let canvas = render(&field_plan()).unwrap();
        // 1700m x 1000m window, height-limited at 1000px
        assert_eq!(canvas.width(), MARGIN_LEFT_PX + 1700 + MARGIN_RIGHT_PX);
        assert_eq!(canvas.height(), MARGIN_TOP_PX + 1000 + MARGIN_BOTTOM_PX);
    }

    #[test]
    fn test_long_narrow_field_stays_within_plot_box() {
        let canvas = render(&strip_plan()).unwrap();
        assert!(canvas.width() <= MARGIN_LEFT_PX + PLOT_MAX_PX.width + MARGIN_RIGHT_PX);
        assert!(canvas.height() <= MARGIN_TOP_PX + PLOT_MAX_PX.height + MARGIN_BOTTOM_PX);
    }

    #[test]
    fn test_coverage_disc_is_clipped_to_bounds() {
        let plan = field_plan();
        let vp = viewport_for(&plan);
        let bounds = Rectangle::new(Point::zero(), Size::new(1800, 1190));

        let huge = CoverageDisc::clipped(&vp, 800.0, 450.0, 1e12, bounds).unwrap();
        assert_eq!(huge.window, bounds);
        assert_eq!(huge.points().count(), 1800 * 1190);
        assert!(huge.ring_points(COVERAGE_RING_PX).next().is_none());

        let far = CoverageDisc::clipped(&vp, 1e9, 1e9, 750.0, bounds);
        assert!(far.is_none());

        let nan = CoverageDisc::clipped(&vp, 800.0, 450.0, f64::NAN, bounds);
        assert!(nan.is_none());
    }

    #[test]
    fn test_huge_range_tints_whole_plot() {
        let plan = DeploymentPlan::build(field(), gateways_from(&[(800.0, 450.0)], 1e12)).unwrap();
        let canvas = render(&plan).unwrap();
        assert!(plan.assignments.all_covered());

        // Padding corner of the plot, away from grid lines and markers
        let p = viewport_for(&plan).to_px(-40.0, -40.0);
        let pixel = canvas.pixel(p.x as u32, p.y as u32).unwrap();
        assert_ne!(pixel, palette::WHITE);
        // Margins stay clear
        assert_eq!(canvas.pixel(5, canvas.height() / 2), Some(palette::WHITE));
    }

    #[test]
    fn test_render_to_file_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("visualizations/two_tier_architecture.png");
        render_to_file(&field_plan(), &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
