//! Rasterization of overlay draw instructions.
//!
//! The analyzer and skeleton builders only *describe* what to draw as a list
//! of [`DrawCommand`]s; this module turns them into pixels. No decision logic
//! lives here.
//!
//! # Algorithms
//!
//! - **Bresenham's Line**: one-pixel and disc-stamped thick lines
//! - **Wu's Anti-aliased Line**: reference guides
//! - **Midpoint Circle**: filled joint markers
//! - **5x7 bitmap font**: panel labels
//!
//! # References
//!
//! - Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.
//! - Bresenham, J. E. (1965). "Algorithm for computer control of a digital plotter."

mod primitives;
mod text;

pub use primitives::{draw_circle, draw_line, draw_line_aa, draw_rect, draw_thick_line};
pub use text::{draw_text, text_height, text_width, GLYPH_ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH};

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;
use crate::geometry::{PixelPoint, PixelRect};

/// Something that can rasterize itself into a framebuffer.
pub trait Drawable {
    /// Draw into `fb`, clipping at its edges.
    fn draw(&self, fb: &mut Framebuffer);
}

/// One overlay drawing instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Solid line, `thickness` pixels wide.
    Line {
        /// Start point.
        from: PixelPoint,
        /// End point.
        to: PixelPoint,
        /// Stroke color.
        color: Rgba,
        /// Stroke width in pixels.
        thickness: u32,
    },
    /// One-pixel anti-aliased line.
    AaLine {
        /// Start point.
        from: PixelPoint,
        /// End point.
        to: PixelPoint,
        /// Stroke color.
        color: Rgba,
    },
    /// Filled circle.
    Circle {
        /// Center.
        center: PixelPoint,
        /// Radius in pixels.
        radius: u32,
        /// Fill color.
        color: Rgba,
    },
    /// Filled axis-aligned rectangle.
    FillRect {
        /// Covered area.
        rect: PixelRect,
        /// Fill color.
        color: Rgba,
    },
    /// Text with its baseline-left corner at `origin`.
    Text {
        /// Baseline-left corner.
        origin: PixelPoint,
        /// Printable ASCII; other characters render as `?`.
        text: String,
        /// Glyph color.
        color: Rgba,
        /// Integer glyph scale.
        scale: u32,
    },
}

impl Drawable for DrawCommand {
    fn draw(&self, fb: &mut Framebuffer) {
        match self {
            Self::Line {
                from,
                to,
                color,
                thickness,
            } => draw_thick_line(fb, *from, *to, *thickness, *color),
            Self::AaLine { from, to, color } => draw_line_aa(fb, *from, *to, *color),
            Self::Circle {
                center,
                radius,
                color,
            } => draw_circle(fb, *center, (*radius).min(i32::MAX as u32) as i32, *color),
            Self::FillRect { rect, color } => draw_rect(fb, *rect, *color),
            Self::Text {
                origin,
                text,
                color,
                scale,
            } => draw_text(fb, origin.x, origin.y, text, *scale, *color),
        }
    }
}

/// Execute draw commands in order; later commands paint over earlier ones.
pub fn render(fb: &mut Framebuffer, commands: &[DrawCommand]) {
    for command in commands {
        command.draw(fb);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::palette;

    #[test]
    fn test_empty_command_list_is_noop() {
        let mut fb = Framebuffer::new(32, 32).unwrap();
        fb.clear(Rgba::BLACK);
        let before = fb.pixels().to_vec();
        render(&mut fb, &[]);
        assert_eq!(fb.pixels(), &before[..]);
    }

    #[test]
    fn test_later_commands_paint_over_earlier() {
        let mut fb = Framebuffer::new(32, 32).unwrap();
        let commands = vec![
            DrawCommand::FillRect {
                rect: PixelRect::new(0, 0, 32, 32),
                color: palette::PANEL,
            },
            DrawCommand::Circle {
                center: PixelPoint::new(16, 16),
                radius: 3,
                color: palette::POOR,
            },
        ];
        render(&mut fb, &commands);

        assert_eq!(fb.get_pixel(16, 16), Some(palette::POOR));
        assert_eq!(fb.get_pixel(1, 1), Some(palette::PANEL));
    }

    #[test]
    fn test_zero_area_rect_renders_nothing() {
        let mut fb = Framebuffer::new(16, 16).unwrap();
        DrawCommand::FillRect {
            rect: PixelRect::new(4, 4, 0, 10),
            color: Rgba::WHITE,
        }
        .draw(&mut fb);
        assert!(fb.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_text_command_draws_glyphs() {
        let mut fb = Framebuffer::new(64, 32).unwrap();
        DrawCommand::Text {
            origin: PixelPoint::new(2, 20),
            text: "Neck".to_string(),
            color: palette::LABEL,
            scale: 2,
        }
        .draw(&mut fb);

        let lit = (0..64u32)
            .flat_map(|x| (0..32u32).map(move |y| (x, y)))
            .filter(|&(x, y)| fb.get_pixel(x, y) == Some(palette::LABEL))
            .count();
        assert!(lit > 0);
        assert_eq!(fb.get_pixel(2, 25), Some(Rgba::TRANSPARENT));
    }
}
