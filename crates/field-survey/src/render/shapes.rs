//! Map furniture: labels, arrows, markers and grid lines
//!
//! All helpers are generic over any `DrawTarget<Color = Rgb888>` and work in
//! pixel coordinates; callers project world positions with a
//! [`Viewport`](super::Viewport) first.

use super::canvas::Zoom;
use super::viewport::Viewport;
use embedded_graphics::{
    mono_font::{
        iso_8859_1::{FONT_6X10, FONT_9X15_BOLD},
        MonoFont, MonoTextStyle,
    },
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{
        Circle, Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, RoundedRectangle,
        Triangle,
    },
    text::{Baseline, Text},
};
use std::f64::consts::PI;

/// Extra pixels between lines of a multi-line label (before scaling)
const LINE_GAP: u32 = 2;

/// Left edge of the y tick labels, measured from the plot area
const Y_TICK_INSET_PX: i32 = 36;

/// Where a label's bounding box sits relative to its anchor point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Center,
    CenterLeft,
    TopCenter,
    BottomLeft,
    BottomCenter,
}

impl Anchor {
    fn top_left(self, at: Point, size: Size) -> Point {
        let (w, h) = (size.width as i32, size.height as i32);
        match self {
            Anchor::Center => at - Point::new(w / 2, h / 2),
            Anchor::CenterLeft => at - Point::new(0, h / 2),
            Anchor::TopCenter => at - Point::new(w / 2, 0),
            Anchor::BottomLeft => at - Point::new(0, h),
            Anchor::BottomCenter => at - Point::new(w / 2, h),
        }
    }

    /// Centred anchors also centre each line inside the block
    fn centres_lines(self) -> bool {
        matches!(self, Anchor::Center | Anchor::TopCenter | Anchor::BottomCenter)
    }
}

#[derive(Clone, Copy)]
pub struct LabelStyle {
    pub font: &'static MonoFont<'static>,
    /// Integer magnification of the font
    pub scale: u32,
    pub text_color: Rgb888,
    pub background: Option<Rgb888>,
    pub border: Option<Rgb888>,
    pub padding: u32,
}

impl LabelStyle {
    pub fn plain(font: &'static MonoFont<'static>, text_color: Rgb888) -> Self {
        Self {
            font,
            scale: 1,
            text_color,
            background: None,
            border: None,
            padding: 0,
        }
    }

    pub fn boxed(
        font: &'static MonoFont<'static>,
        text_color: Rgb888,
        background: Rgb888,
        border: Option<Rgb888>,
    ) -> Self {
        Self {
            font,
            scale: 1,
            text_color,
            background: Some(background),
            border,
            padding: 8,
        }
    }

    pub fn scaled(mut self, scale: u32) -> Self {
        self.scale = scale.max(1);
        self
    }

    pub fn padded(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }
}

/// Pixel size of `text` set in `font` at `scale`, without padding
pub fn text_block_size(font: &MonoFont<'_>, text: &str, scale: u32) -> Size {
    let advance = font.character_size.width + font.character_spacing;
    let columns = text.lines().map(|l| l.chars().count()).max().unwrap_or(0) as u32;
    let rows = text.lines().count().max(1) as u32;

    let width = (columns * advance).saturating_sub(font.character_spacing);
    let height = rows * font.character_size.height + (rows - 1) * LINE_GAP;
    Size::new(width * scale, height * scale)
}

/// Draw a label, optionally inside a rounded box; returns the occupied frame
pub fn draw_label<D>(
    target: &mut D,
    text: &str,
    at: Point,
    anchor: Anchor,
    style: &LabelStyle,
) -> Result<Rectangle, D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let block = text_block_size(style.font, text, style.scale);
    let pad = style.padding;
    let outer = Size::new(block.width + 2 * pad, block.height + 2 * pad);
    let frame = Rectangle::new(anchor.top_left(at, outer), outer);

    if style.background.is_some() || style.border.is_some() {
        let mut builder = PrimitiveStyleBuilder::new();
        if let Some(fill) = style.background {
            builder = builder.fill_color(fill);
        }
        if let Some(border) = style.border {
            builder = builder.stroke_color(border).stroke_width(2);
        }
        RoundedRectangle::with_equal_corners(frame, Size::new(6, 6))
            .into_styled(builder.build())
            .draw(target)?;
    }

    let character_style = MonoTextStyle::new(style.font, style.text_color);
    let line_step = (style.font.character_size.height + LINE_GAP) as i32;
    let origin = frame.top_left + Point::new(pad as i32, pad as i32);

    let mut zoom = Zoom::new(target, style.scale);
    for (row, line) in text.lines().enumerate() {
        let shift = if anchor.centres_lines() {
            let line_width = text_block_size(style.font, line, style.scale).width;
            (block.width - line_width) as i32 / 2
        } else {
            0
        };
        let position =
            zoom.to_zoomed(origin + Point::new(shift, 0)) + Point::new(0, row as i32 * line_step);
        Text::with_baseline(line, position, character_style, Baseline::Top).draw(&mut zoom)?;
    }

    Ok(frame)
}

/// Straight shaft from `from` with a filled triangular head at `to`
pub fn draw_arrow<D>(
    target: &mut D,
    from: Point,
    to: Point,
    color: Rgb888,
    width: u32,
    head: u32,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let dx = f64::from(to.x - from.x);
    let dy = f64::from(to.y - from.y);
    let length = dx.hypot(dy);
    if length == 0.0 {
        return Ok(());
    }

    let (ux, uy) = (dx / length, dy / length);
    let head = f64::from(head).min(length);
    let half = head * 0.5;
    let base_x = f64::from(to.x) - ux * head;
    let base_y = f64::from(to.y) - uy * head;

    let base = Point::new(base_x.round() as i32, base_y.round() as i32);
    let left = Point::new(
        (base_x - uy * half).round() as i32,
        (base_y + ux * half).round() as i32,
    );
    let right = Point::new(
        (base_x + uy * half).round() as i32,
        (base_y - ux * half).round() as i32,
    );

    Line::new(from, base)
        .into_styled(PrimitiveStyle::with_stroke(color, width))
        .draw(target)?;
    Triangle::new(to, left, right)
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(target)
}

/// Dimension arrow with heads at both ends
pub fn draw_double_arrow<D>(
    target: &mut D,
    a: Point,
    b: Point,
    color: Rgb888,
    width: u32,
    head: u32,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let mid = Point::new((a.x + b.x) / 2, (a.y + b.y) / 2);
    draw_arrow(target, mid, a, color, width, head)?;
    draw_arrow(target, mid, b, color, width, head)
}

/// Filled disc of the given diameter
pub fn draw_dot<D>(target: &mut D, center: Point, diameter: u32, color: Rgb888) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    Circle::with_center(center, diameter)
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(target)
}

/// "x" marker spanning `size` pixels
pub fn draw_cross<D>(
    target: &mut D,
    center: Point,
    size: u32,
    color: Rgb888,
    width: u32,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let h = (size / 2) as i32;
    let style = PrimitiveStyle::with_stroke(color, width);
    Line::new(center + Point::new(-h, -h), center + Point::new(h, h))
        .into_styled(style)
        .draw(target)?;
    Line::new(center + Point::new(-h, h), center + Point::new(h, -h))
        .into_styled(style)
        .draw(target)
}

/// Five-pointed star with outline, pointing up
pub fn draw_star<D>(
    target: &mut D,
    center: Point,
    radius: u32,
    fill: Rgb888,
    outline: Rgb888,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let outer = f64::from(radius);
    let inner = outer * 0.4;
    let vertices: Vec<Point> = (0..10)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let angle = -PI / 2.0 + f64::from(i) * PI / 5.0;
            Point::new(
                center.x + (r * angle.cos()).round() as i32,
                center.y + (r * angle.sin()).round() as i32,
            )
        })
        .collect();

    let fill_style = PrimitiveStyle::with_fill(fill);
    for (i, v) in vertices.iter().enumerate() {
        let next = vertices[(i + 1) % vertices.len()];
        Triangle::new(center, *v, next)
            .into_styled(fill_style)
            .draw(target)?;
    }

    let edge_style = PrimitiveStyle::with_stroke(outline, 2);
    for (i, v) in vertices.iter().enumerate() {
        let next = vertices[(i + 1) % vertices.len()];
        Line::new(*v, next).into_styled(edge_style).draw(target)?;
    }
    Ok(())
}

/// Faint grid lines at every multiple of `step` metres inside the viewport
pub fn draw_grid<D>(target: &mut D, viewport: &Viewport, step: f64, color: Rgb888) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let world = viewport.world();
    let style = PrimitiveStyle::with_stroke(color, 1);

    let mut x = (world.x_min / step).ceil() * step;
    while x <= world.x_max {
        Line::new(viewport.to_px(x, world.y_min), viewport.to_px(x, world.y_max))
            .into_styled(style)
            .draw(target)?;
        x += step;
    }

    let mut y = (world.y_min / step).ceil() * step;
    while y <= world.y_max {
        Line::new(viewport.to_px(world.x_min, y), viewport.to_px(world.x_max, y))
            .into_styled(style)
            .draw(target)?;
        y += step;
    }
    Ok(())
}

/// Tick labels every `step` metres along the bottom and left edges, the x-axis
/// title centred below and the y-axis title above the left tick column
pub fn draw_axes<D>(
    target: &mut D,
    viewport: &Viewport,
    step: f64,
    x_title: &str,
    y_title: &str,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let world = viewport.world();
    let area = viewport.plot_area();
    let bottom = area.top_left.y + area.size.height as i32;
    let tick = LabelStyle::plain(&FONT_6X10, Rgb888::BLACK);

    let mut x = (world.x_min / step).ceil() * step;
    while x <= world.x_max {
        let at = Point::new(viewport.to_px(x, world.y_min).x, bottom + 4);
        draw_label(target, &format!("{:.0}", x), at, Anchor::TopCenter, &tick)?;
        x += step;
    }

    let mut y = (world.y_min / step).ceil() * step;
    while y <= world.y_max {
        let at = Point::new(area.top_left.x - Y_TICK_INSET_PX, viewport.to_px(world.x_min, y).y);
        draw_label(target, &format!("{:>5.0}", y), at, Anchor::CenterLeft, &tick)?;
        y += step;
    }

    let heading = LabelStyle::plain(&FONT_9X15_BOLD, Rgb888::BLACK);
    let centre_x = area.top_left.x + area.size.width as i32 / 2;
    draw_label(
        target,
        x_title,
        Point::new(centre_x, bottom + 24),
        Anchor::TopCenter,
        &heading,
    )?;
    draw_label(
        target,
        y_title,
        Point::new(area.top_left.x - Y_TICK_INSET_PX, area.top_left.y - 4),
        Anchor::BottomLeft,
        &heading,
    )?;
    Ok(())
}
