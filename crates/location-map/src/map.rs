//! Raster rendering of the location map

use crate::layout::MapLayout;
use embedded_graphics::{
    mono_font::iso_8859_1::{FONT_10X20, FONT_9X15, FONT_9X15_BOLD},
    prelude::*,
    primitives::{Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, RoundedRectangle},
};
use field_survey::render::{
    draw_arrow, draw_axes, draw_double_arrow, draw_grid, draw_label, palette, Anchor, Canvas, LabelStyle,
    Viewport,
};
use field_survey::{FieldConfig, Result};
use nalgebra::Point2;
use std::path::Path;
use tracing::{debug, info};

/// Bounding box of the plotted window; the world is fitted inside it
const PLOT_MAX_PX: Size = Size::new(2400, 1500);
const MARGIN_LEFT_PX: u32 = 70;
const MARGIN_RIGHT_PX: u32 = 30;
const MARGIN_TOP_PX: u32 = 30;
const MARGIN_BOTTOM_PX: u32 = 80;
/// Grid and tick label spacing (metres)
const GRID_STEP_M: f64 = 500.0;

/// Render the location map for `field`
pub fn render(field: &FieldConfig) -> Result<Canvas> {
    let layout = MapLayout::new(*field);
    let world = layout.world();

    let plot = world.fit_into(PLOT_MAX_PX);
    let plot_area = Rectangle::new(Point::new(MARGIN_LEFT_PX as i32, MARGIN_TOP_PX as i32), plot);
    let vp = Viewport::fit(world, plot_area);
    let mut canvas = Canvas::new(
        MARGIN_LEFT_PX + plot.width + MARGIN_RIGHT_PX,
        MARGIN_TOP_PX + plot.height + MARGIN_BOTTOM_PX,
        palette::WHITE,
    );
    debug!(
        "Location map canvas {}x{} px, {:.3} px/m",
        canvas.width(),
        canvas.height(),
        vp.scale()
    );

    draw_background(&mut canvas, &vp, &layout)?;
    draw_field(&mut canvas, &vp, &layout)?;
    draw_dimensions(&mut canvas, &vp, &layout)?;
    draw_compass(&mut canvas, &vp, &layout)?;
    draw_scale_bar(&mut canvas, &vp, &layout)?;
    draw_text_blocks(&mut canvas, &vp, &layout)?;
    draw_axes(
        &mut canvas,
        &vp,
        GRID_STEP_M,
        "Distance (metres)",
        "Distance (metres)",
    )?;

    Ok(canvas)
}

/// Render and write the map as PNG, overwriting `path`
pub fn render_to_file(field: &FieldConfig, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let canvas = render(field)?;
    canvas.save_png(path)?;
    info!("Location map saved to {:?}", path);
    Ok(())
}

fn px(vp: &Viewport, p: Point2<f64>) -> Point {
    vp.to_px(p.x, p.y)
}

fn draw_background(canvas: &mut Canvas, vp: &Viewport, layout: &MapLayout) -> Result<()> {
    vp.plot_area()
        .into_styled(PrimitiveStyle::with_fill(palette::BEIGE))
        .draw(canvas)?;
    draw_grid(canvas, vp, GRID_STEP_M, palette::GRID)?;

    let context = layout.context();
    canvas.with_opacity(0.3, |c| {
        vp.rect_px(context.x_min, context.y_min, context.width(), context.height())
            .into_styled(PrimitiveStyle::with_fill(palette::MINT))
            .draw(c)
    })?;
    Ok(())
}

fn draw_field(canvas: &mut Canvas, vp: &Viewport, layout: &MapLayout) -> Result<()> {
    let (lx, ly) = (layout.field.dimension_x_m, layout.field.dimension_y_m);

    let shadow = vp.rect_px(layout.shadow_origin.x, layout.shadow_origin.y, lx, ly);
    canvas.with_opacity(0.2, |c| {
        shadow
            .into_styled(PrimitiveStyle::with_fill(palette::GRAY))
            .draw(c)
    })?;

    let corner = Size::new(vp.len_px(10.0).max(4), vp.len_px(10.0).max(4));
    let body = RoundedRectangle::with_equal_corners(
        vp.rect_px(layout.field_origin.x, layout.field_origin.y, lx, ly),
        corner,
    );
    canvas.with_opacity(0.6, |c| {
        body.into_styled(PrimitiveStyle::with_fill(palette::FIELD_GREEN))
            .draw(c)
    })?;
    body.into_styled(
        PrimitiveStyleBuilder::new()
            .stroke_color(palette::FIELD_EDGE)
            .stroke_width(4)
            .build(),
    )
    .draw(canvas)?;

    let caption = LabelStyle::boxed(
        &FONT_10X20,
        palette::BLACK,
        palette::WHITE,
        Some(palette::FIELD_EDGE),
    )
    .scaled(2)
    .padded(16);
    draw_label(
        canvas,
        &layout.field_caption(),
        px(vp, layout.field_center),
        Anchor::Center,
        &caption,
    )?;
    Ok(())
}

fn draw_dimensions(canvas: &mut Canvas, vp: &Viewport, layout: &MapLayout) -> Result<()> {
    let (a, b) = layout.horizontal_arrow;
    draw_double_arrow(canvas, px(vp, a), px(vp, b), palette::BLACK, 2, 12)?;
    let (a, b) = layout.vertical_arrow;
    draw_double_arrow(canvas, px(vp, a), px(vp, b), palette::BLACK, 2, 12)?;

    let tag = LabelStyle::boxed(&FONT_9X15_BOLD, palette::BLACK, palette::WHITE, None).padded(6);
    draw_label(
        canvas,
        &layout.horizontal_caption(),
        px(vp, layout.horizontal_label),
        Anchor::TopCenter,
        &tag,
    )?;
    draw_label(
        canvas,
        &layout.vertical_caption(),
        px(vp, layout.vertical_label),
        Anchor::Center,
        &tag,
    )?;
    Ok(())
}

fn draw_compass(canvas: &mut Canvas, vp: &Viewport, layout: &MapLayout) -> Result<()> {
    draw_arrow(
        canvas,
        px(vp, layout.compass_base),
        px(vp, layout.compass_tip),
        palette::RED,
        3,
        vp.len_px(30.0).max(8) * 2,
    )?;
    let north = LabelStyle::plain(&FONT_10X20, palette::DARK_RED).scaled(2);
    draw_label(
        canvas,
        "N",
        px(vp, layout.compass_label),
        Anchor::BottomCenter,
        &north,
    )?;
    Ok(())
}

fn draw_scale_bar(canvas: &mut Canvas, vp: &Viewport, layout: &MapLayout) -> Result<()> {
    let (start, end) = layout.scale_bar;
    let (a, b) = (px(vp, start), px(vp, end));
    Line::new(a, b)
        .into_styled(PrimitiveStyle::with_stroke(palette::BLACK, 4))
        .draw(canvas)?;

    let tick = vp.len_px(20.0).max(4) as i32;
    let tick_style = PrimitiveStyle::with_stroke(palette::BLACK, 2);
    for end_point in [a, b] {
        Line::new(
            end_point - Point::new(0, tick),
            end_point + Point::new(0, tick),
        )
        .into_styled(tick_style)
        .draw(canvas)?;
    }

    let tag = LabelStyle::boxed(&FONT_9X15_BOLD, palette::BLACK, palette::WHITE, None).padded(6);
    draw_label(
        canvas,
        &layout.scale_caption(),
        px(vp, layout.scale_label),
        Anchor::TopCenter,
        &tag,
    )?;
    Ok(())
}

fn draw_text_blocks(canvas: &mut Canvas, vp: &Viewport, layout: &MapLayout) -> Result<()> {
    let info = LabelStyle::boxed(
        &FONT_9X15,
        palette::BLACK,
        palette::LIGHT_YELLOW,
        Some(palette::ORANGE),
    )
    .padded(12);
    draw_label(
        canvas,
        &layout.info_caption(),
        px(vp, layout.info_anchor),
        Anchor::BottomLeft,
        &info,
    )?;

    let title = LabelStyle::boxed(&FONT_10X20, palette::BLACK, palette::WHITE, Some(palette::BLACK))
        .scaled(2)
        .padded(14);
    draw_label(
        canvas,
        layout.title(),
        px(vp, layout.title_anchor),
        Anchor::Center,
        &title,
    )?;

    let subtitle =
        LabelStyle::boxed(&FONT_9X15, palette::BLACK, palette::LIGHT_BLUE, None).padded(8);
    draw_label(
        canvas,
        layout.subtitle(),
        px(vp, layout.subtitle_anchor),
        Anchor::Center,
        &subtitle,
    )?;
    Ok(())
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
    fn test_canvas_follows_world_aspect() {
        let canvas = render(&field()).unwrap();
        // World is 3700m x 3000m, height-limited at 1500px
        assert_eq!(canvas.width(), MARGIN_LEFT_PX + 1850 + MARGIN_RIGHT_PX);
        assert_eq!(canvas.height(), MARGIN_TOP_PX + 1500 + MARGIN_BOTTOM_PX);
    }

    #[test]
    fn test_long_narrow_field_stays_within_plot_box() {
        let strip = FieldConfig {
            dimension_x_m: 8000.0,
            dimension_y_m: 20.0,
            total_area_m2: 160_000.0,
            ..field()
        };
        let canvas = render(&strip).unwrap();
        assert!(canvas.width() <= MARGIN_LEFT_PX + PLOT_MAX_PX.width + MARGIN_RIGHT_PX);
        assert!(canvas.height() <= MARGIN_TOP_PX + PLOT_MAX_PX.height + MARGIN_BOTTOM_PX);
    }

    #[test]
    fn test_field_interior_is_green() {
        let canvas = render(&field()).unwrap();
        let layout = MapLayout::new(field());
        let world = layout.world();
        let vp = Viewport::fit(
            world,
            Rectangle::new(
                Point::new(MARGIN_LEFT_PX as i32, MARGIN_TOP_PX as i32),
                world.fit_into(PLOT_MAX_PX),
            ),
        );

        // Inside the field, away from the centred caption
        let p = vp.to_px(layout.field_origin.x + 100.0, layout.field_origin.y + 100.0);
        let pixel = canvas.pixel(p.x as u32, p.y as u32).unwrap();
        assert!(pixel.g() > pixel.r() && pixel.g() > pixel.b(), "got {:?}", pixel);

        // Outside the context window stays white
        assert_eq!(canvas.pixel(1, 1), Some(palette::WHITE));
    }

    #[test]
    fn test_render_to_file_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("visualizations/location_map.png");
        render_to_file(&field(), &path).unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
