//! World (metres, y up) to pixel (y down) mapping

use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;

/// Axis-aligned window in world coordinates (metres)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldRect {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl WorldRect {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Largest pixel size with this window's aspect ratio that fits in `max`
    pub fn fit_into(&self, max: Size) -> Size {
        let scale = (f64::from(max.width) / self.width()).min(f64::from(max.height) / self.height());
        if !(scale.is_finite() && scale > 0.0) {
            return max;
        }
        let side = |metres: f64, limit: u32| ((metres * scale).round() as u32).clamp(1, limit);
        Size::new(side(self.width(), max.width), side(self.height(), max.height))
    }
}

/// Equal-aspect projection of a [`WorldRect`] into a pixel rectangle
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    world: WorldRect,
    /// Pixels per metre
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Viewport {
    /// Fit `world` inside `area`, centred, preserving aspect ratio
    pub fn fit(world: WorldRect, area: Rectangle) -> Self {
        let area_w = f64::from(area.size.width);
        let area_h = f64::from(area.size.height);
        let scale = (area_w / world.width()).min(area_h / world.height());

        Self {
            world,
            scale,
            offset_x: f64::from(area.top_left.x) + (area_w - world.width() * scale) / 2.0,
            offset_y: f64::from(area.top_left.y) + (area_h - world.height() * scale) / 2.0,
        }
    }

    pub fn world(&self) -> WorldRect {
        self.world
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Unrounded pixel position of a world point
    pub fn project(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.offset_x + (x - self.world.x_min) * self.scale,
            self.offset_y + (self.world.y_max - y) * self.scale,
        )
    }

    pub fn to_px(&self, x: f64, y: f64) -> Point {
        let (px, py) = self.project(x, y);
        Point::new(px.round() as i32, py.round() as i32)
    }

    pub fn len_px(&self, metres: f64) -> u32 {
        (metres.abs() * self.scale).round() as u32
    }

    /// Pixel rectangle covering the world rectangle with lower-left corner (x, y)
    pub fn rect_px(&self, x: f64, y: f64, width: f64, height: f64) -> Rectangle {
        let top_left = self.to_px(x, y + height);
        Rectangle::new(top_left, Size::new(self.len_px(width), self.len_px(height)))
    }

    /// Pixel rectangle covered by the whole world window
    pub fn plot_area(&self) -> Rectangle {
        self.rect_px(
            self.world.x_min,
            self.world.y_min,
            self.world.width(),
            self.world.height(),
        )
    }
}
