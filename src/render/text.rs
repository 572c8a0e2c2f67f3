//! Bitmap text rendering.
//!
//! A 5x7 column-encoded font covering printable ASCII. Each glyph is five
//! columns; bit 0 is the top row. Glyphs are scaled by integer factors and
//! advance by six columns, so one blank column separates characters.
//! Characters outside the table render as `?`.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;

/// Glyph width in font units.
pub const GLYPH_WIDTH: u32 = 5;
/// Glyph height in font units.
pub const GLYPH_HEIGHT: u32 = 7;
/// Horizontal advance per character in font units.
pub const GLYPH_ADVANCE: u32 = 6;

const FIRST_CHAR: u8 = b' ';

#[rustfmt::skip]
const FONT: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // #
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x55, 0x22, 0x50], // &
    [0x00, 0x05, 0x03, 0x00, 0x00], // '
    [0x00, 0x1C, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1C, 0x00], // )
    [0x08, 0x2A, 0x1C, 0x2A, 0x08], // *
    [0x08, 0x08, 0x3E, 0x08, 0x08], // +
    [0x00, 0x50, 0x30, 0x00, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4B, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1E], // 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x00, 0x56, 0x36, 0x00, 0x00], // ;
    [0x08, 0x14, 0x22, 0x41, 0x00], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x00, 0x41, 0x22, 0x14, 0x08], // >
    [0x02, 0x01, 0x51, 0x09, 0x06], // ?
    [0x32, 0x49, 0x79, 0x41, 0x3E], // @
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x09, 0x01], // F
    [0x3E, 0x41, 0x49, 0x49, 0x7A], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x46, 0x49, 0x49, 0x49, 0x31], // S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // V
    [0x3F, 0x40, 0x38, 0x40, 0x3F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x07, 0x08, 0x70, 0x08, 0x07], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x7F, 0x41, 0x41, 0x00], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // backslash
    [0x00, 0x41, 0x41, 0x7F, 0x00], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
    [0x00, 0x01, 0x02, 0x04, 0x00], // `
    [0x20, 0x54, 0x54, 0x54, 0x78], // a
    [0x7F, 0x48, 0x44, 0x44, 0x38], // b
    [0x38, 0x44, 0x44, 0x44, 0x20], // c
    [0x38, 0x44, 0x44, 0x48, 0x7F], // d
    [0x38, 0x54, 0x54, 0x54, 0x18], // e
    [0x08, 0x7E, 0x09, 0x01, 0x02], // f
    [0x0C, 0x52, 0x52, 0x52, 0x3E], // g
    [0x7F, 0x08, 0x04, 0x04, 0x78], // h
    [0x00, 0x44, 0x7D, 0x40, 0x00], // i
    [0x20, 0x40, 0x44, 0x3D, 0x00], // j
    [0x7F, 0x10, 0x28, 0x44, 0x00], // k
    [0x00, 0x41, 0x7F, 0x40, 0x00], // l
    [0x7C, 0x04, 0x18, 0x04, 0x78], // m
    [0x7C, 0x08, 0x04, 0x04, 0x78], // n
    [0x38, 0x44, 0x44, 0x44, 0x38], // o
    [0x7C, 0x14, 0x14, 0x14, 0x08], // p
    [0x08, 0x14, 0x14, 0x18, 0x7C], // q
    [0x7C, 0x08, 0x04, 0x04, 0x08], // r
    [0x48, 0x54, 0x54, 0x54, 0x20], // s
    [0x04, 0x3F, 0x44, 0x40, 0x20], // t
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // u
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // v
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // w
    [0x44, 0x28, 0x10, 0x28, 0x44], // x
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // y
    [0x44, 0x64, 0x54, 0x4C, 0x44], // z
    [0x00, 0x08, 0x36, 0x41, 0x00], // {
    [0x00, 0x00, 0x7F, 0x00, 0x00], // |
    [0x00, 0x41, 0x36, 0x08, 0x00], // }
    [0x08, 0x04, 0x08, 0x10, 0x08], // ~
];

fn glyph(c: char) -> &'static [u8; 5] {
    let index = u32::from(c)
        .checked_sub(u32::from(FIRST_CHAR))
        .filter(|i| (*i as usize) < FONT.len())
        .unwrap_or(u32::from(b'?' - FIRST_CHAR));
    &FONT[index as usize]
}

/// Width in pixels of `text` rendered at `scale`, without trailing spacing.
#[must_use]
pub fn text_width(text: &str, scale: u32) -> u32 {
    let chars = text.chars().count() as u32;
    if chars == 0 {
        return 0;
    }
    ((chars - 1) * GLYPH_ADVANCE + GLYPH_WIDTH) * scale.max(1)
}

/// Height in pixels of one text line at `scale`.
#[must_use]
pub const fn text_height(scale: u32) -> u32 {
    GLYPH_HEIGHT * if scale == 0 { 1 } else { scale }
}

/// Draw `text` with its baseline-left corner at `(x, y)`.
///
/// The glyph cell occupies rows `y - height .. y`, the way a typographic
/// origin sits under the text. Pixels outside the frame are clipped.
pub fn draw_text(fb: &mut Framebuffer, x: i32, y: i32, text: &str, scale: u32, color: Rgba) {
    let scale = scale.max(1);
    let top = y - text_height(scale) as i32;
    let mut pen_x = x;

    for c in text.chars() {
        for (col, bits) in glyph(c).iter().enumerate() {
            for row in 0..GLYPH_HEIGHT {
                if bits & (1 << row) == 0 {
                    continue;
                }
                let px = pen_x + (col as u32 * scale) as i32;
                let py = top + (row * scale) as i32;
                fill_cell(fb, px, py, scale, color);
            }
        }
        pen_x += (GLYPH_ADVANCE * scale) as i32;
        if pen_x >= fb.width() as i32 {
            break;
        }
    }
}

#[inline]
fn fill_cell(fb: &mut Framebuffer, x: i32, y: i32, size: u32, color: Rgba) {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = x + size as i32;
    let y1 = y + size as i32;
    if x1 <= x0 || y1 <= y0 {
        return;
    }
    fb.fill_rect(x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32, color);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(fb: &Framebuffer, color: Rgba) -> usize {
        (0..fb.height())
            .flat_map(|y| (0..fb.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| fb.get_pixel(x, y) == Some(color))
            .count()
    }

    #[test]
    fn test_font_table_is_complete() {
        assert_eq!(FONT.len(), usize::from(b'~' - b' ') + 1);
        assert_eq!(glyph(' '), &[0; 5]);
        assert_ne!(glyph('A'), glyph('B'));
    }

    #[test]
    fn test_unknown_char_falls_back() {
        assert_eq!(glyph('é'), glyph('?'));
        assert_eq!(glyph('\n'), glyph('?'));
    }

    #[test]
    fn test_text_width() {
        assert_eq!(text_width("", 2), 0);
        assert_eq!(text_width("A", 1), 5);
        assert_eq!(text_width("AB", 2), 22);
    }

    #[test]
    fn test_draw_text_sits_on_baseline() {
        let mut fb = Framebuffer::new(40, 40).unwrap();
        fb.clear(Rgba::BLACK);
        draw_text(&mut fb, 2, 20, "I", 1, Rgba::WHITE);

        // 'I' has a full-height stem in column 2
        assert_eq!(fb.get_pixel(4, 13), Some(Rgba::WHITE));
        assert_eq!(fb.get_pixel(4, 19), Some(Rgba::WHITE));
        assert_eq!(fb.get_pixel(4, 20), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(4, 12), Some(Rgba::BLACK));
    }

    #[test]
    fn test_scale_multiplies_coverage() {
        let mut small = Framebuffer::new(64, 64).unwrap();
        let mut large = Framebuffer::new(64, 64).unwrap();
        draw_text(&mut small, 1, 30, "Hi", 1, Rgba::WHITE);
        draw_text(&mut large, 1, 30, "Hi", 3, Rgba::WHITE);

        assert_eq!(count(&large, Rgba::WHITE), count(&small, Rgba::WHITE) * 9);
    }

    #[test]
    fn test_clipped_text_does_not_panic() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        draw_text(&mut fb, -30, 3, "Shoulders 12 %", 2, Rgba::WHITE);
        draw_text(&mut fb, 8, 200, "-> advice", 2, Rgba::WHITE);
        draw_text(&mut fb, 0, 0, "", 2, Rgba::WHITE);
    }
}
