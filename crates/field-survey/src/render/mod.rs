//! Raster rendering for field maps
//!
//! embedded-graphics primitives and mono fonts drawn onto an in-memory
//! [`Canvas`], projected from field metres through a [`Viewport`], and
//! encoded as PNG.

mod canvas;
mod shapes;
mod viewport;

pub use canvas::{Canvas, Zoom};
pub use shapes::{
    draw_arrow, draw_axes, draw_cross, draw_dot, draw_double_arrow, draw_grid, draw_label, draw_star,
    text_block_size, Anchor, LabelStyle,
};
pub use viewport::{Viewport, WorldRect};

/// Shared colours (hex values from the field survey style sheet)
pub mod palette {
    use embedded_graphics::pixelcolor::Rgb888;

    pub const WHITE: Rgb888 = Rgb888::new(0xFF, 0xFF, 0xFF);
    pub const BLACK: Rgb888 = Rgb888::new(0x00, 0x00, 0x00);
    pub const GRAY: Rgb888 = Rgb888::new(0x80, 0x80, 0x80);
    pub const GRID: Rgb888 = Rgb888::new(0xD0, 0xD0, 0xD0);
    pub const BEIGE: Rgb888 = Rgb888::new(0xF5, 0xF5, 0xDC);
    pub const MINT: Rgb888 = Rgb888::new(0xE8, 0xF5, 0xE9);
    pub const FIELD_GREEN: Rgb888 = Rgb888::new(0x4C, 0xAF, 0x50);
    pub const FIELD_EDGE: Rgb888 = Rgb888::new(0x2E, 0x7D, 0x32);
    pub const LIGHT_YELLOW: Rgb888 = Rgb888::new(0xFF, 0xFF, 0xE0);
    pub const ORANGE: Rgb888 = Rgb888::new(0xF5, 0x7C, 0x00);
    pub const LIGHT_BLUE: Rgb888 = Rgb888::new(0xAD, 0xD8, 0xE6);
    pub const RED: Rgb888 = Rgb888::new(0xFF, 0x00, 0x00);
    pub const DARK_RED: Rgb888 = Rgb888::new(0x8B, 0x00, 0x00);

    /// Per-gateway colours, cycled when there are more gateways than entries
    pub const GATEWAY_COLORS: [Rgb888; 6] = [
        Rgb888::new(0xFF, 0x6B, 0x6B),
        Rgb888::new(0x4E, 0xCD, 0xC4),
        Rgb888::new(0xFF, 0xB3, 0x47),
        Rgb888::new(0x6C, 0x5C, 0xE7),
        Rgb888::new(0x2E, 0xCC, 0x71),
        Rgb888::new(0xE8, 0x43, 0x93),
    ];

    pub fn gateway_color(index: usize) -> Rgb888 {
        GATEWAY_COLORS[index % GATEWAY_COLORS.len()]
    }
}
