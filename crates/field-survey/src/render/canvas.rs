//! In-memory RGB canvas implementing `DrawTarget`
//!
//! Every embedded-graphics primitive draws straight into an `image::RgbImage`.
//! Translucency is a canvas-wide setting applied while a closure runs
//! ([`Canvas::with_opacity`]), so any primitive can be drawn see-through.

use crate::Result;
use embedded_graphics::{pixelcolor::Rgb888, prelude::*};
use image::{ImageFormat, Rgb, RgbImage};
use std::convert::Infallible;
use std::fs;
use std::path::Path;
use tracing::debug;

pub struct Canvas {
    image: RgbImage,
    opacity: f32,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgb888) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, to_rgb(background)),
            opacity: 1.0,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Run `draw` with every pixel blended at `opacity` (0 = invisible, 1 = opaque)
    pub fn with_opacity<R>(&mut self, opacity: f32, draw: impl FnOnce(&mut Self) -> R) -> R {
        let previous = self.opacity;
        self.opacity = opacity.clamp(0.0, 1.0);
        let out = draw(self);
        self.opacity = previous;
        out
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        self.image
            .get_pixel_checked(x, y)
            .map(|p| Rgb888::new(p[0], p[1], p[2]))
    }

    /// Encode as PNG, creating parent directories and overwriting any existing file
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        self.image.save_with_format(path, ImageFormat::Png)?;
        debug!(
            "Wrote {}x{} PNG to {:?}",
            self.image.width(),
            self.image.height(),
            path
        );
        Ok(())
    }

    fn blend(&mut self, x: u32, y: u32, color: Rgb888) {
        let alpha = self.opacity;
        let pixel = self.image.get_pixel_mut(x, y);
        if alpha >= 1.0 {
            *pixel = to_rgb(color);
            return;
        }
        let src = [color.r(), color.g(), color.b()];
        for (dst, s) in pixel.0.iter_mut().zip(src) {
            let mixed = f32::from(s) * alpha + f32::from(*dst) * (1.0 - alpha);
            *dst = mixed.round() as u8;
        }
    }
}

fn to_rgb(color: Rgb888) -> Rgb<u8> {
    Rgb([color.r(), color.g(), color.b()])
}

impl DrawTarget for Canvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> std::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (width, height) = self.image.dimensions();
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as u32, point.y as u32);
            if x < width && y < height {
                self.blend(x, y, color);
            }
        }
        Ok(())
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }
}

/// Draw target adapter that magnifies every pixel into a `factor`×`factor` block.
///
/// Used to render the small built-in mono fonts at readable sizes on large maps.
pub struct Zoom<'a, D> {
    target: &'a mut D,
    factor: u32,
}

impl<'a, D> Zoom<'a, D>
where
    D: DrawTarget<Color = Rgb888>,
{
    pub fn new(target: &'a mut D, factor: u32) -> Self {
        Self {
            target,
            factor: factor.max(1),
        }
    }

    /// Convert a target-space point into the zoomed coordinate space
    pub fn to_zoomed(&self, point: Point) -> Point {
        let f = self.factor as i32;
        Point::new(point.x.div_euclid(f), point.y.div_euclid(f))
    }
}

impl<D> DrawTarget for Zoom<'_, D>
where
    D: DrawTarget<Color = Rgb888>,
{
    type Color = Rgb888;
    type Error = D::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> std::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let f = self.factor as i32;
        let blocks = pixels.into_iter().flat_map(move |Pixel(point, color)| {
            (0..f).flat_map(move |dy| {
                (0..f).map(move |dx| Pixel(Point::new(point.x * f + dx, point.y * f + dy), color))
            })
        });
        self.target.draw_iter(blocks)
    }
}

impl<D> OriginDimensions for Zoom<'_, D>
where
    D: DrawTarget<Color = Rgb888>,
{
    fn size(&self) -> Size {
        let size = self.target.bounding_box().size;
        Size::new(size.width / self.factor, size.height / self.factor)
    }
}
