//! Frame buffer the overlay is drawn into.
//!
//! Wraps one video frame as a row-major RGBA pixel buffer. Rows are padded to
//! a 64-byte stride so row-wise fills stay aligned.

use crate::color::Rgba;
use crate::error::{Error, Result};

/// Row alignment in bytes.
const ROW_ALIGNMENT: usize = 64;

/// RGBA frame buffer with padded rows.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    /// Width in pixels.
    width: u32,
    /// Height in pixels.
    height: u32,
    /// RGBA pixels in row-major order, `stride` bytes per row.
    pixels: Vec<u8>,
    /// Stride in bytes (includes alignment padding).
    stride: usize,
}

impl Framebuffer {
    /// Create a blank (transparent black) frame.
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use posture_viz::framebuffer::Framebuffer;
    ///
    /// let fb = Framebuffer::new(640, 480).unwrap();
    /// assert_eq!(fb.width(), 640);
    /// assert_eq!(fb.height(), 480);
    /// ```
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }

        let row_bytes = (width as usize) * 4;
        let stride = (row_bytes + ROW_ALIGNMENT - 1) & !(ROW_ALIGNMENT - 1);
        let pixels = vec![0; stride * (height as usize)];

        Ok(Self {
            width,
            height,
            pixels,
            stride,
        })
    }

    /// Wrap tightly packed RGBA bytes (`width * height * 4`).
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are zero or the payload length does
    /// not match them.
    pub fn from_rgba(width: u32, height: u32, data: &[u8]) -> Result<Self> {
        Self::from_packed(width, height, data, 4)
    }

    /// Wrap tightly packed RGB bytes (`width * height * 3`); alpha is set opaque.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are zero or the payload length does
    /// not match them.
    pub fn from_rgb(width: u32, height: u32, data: &[u8]) -> Result<Self> {
        Self::from_packed(width, height, data, 3)
    }

    fn from_packed(width: u32, height: u32, data: &[u8], channels: usize) -> Result<Self> {
        let mut fb = Self::new(width, height)?;
        let row_len = (width as usize) * channels;
        if data.len() != row_len * (height as usize) {
            return Err(Error::InvalidDimensions { width, height });
        }

        for (y, src) in data.chunks_exact(row_len).enumerate() {
            let start = y * fb.stride;
            let dst = &mut fb.pixels[start..start + (width as usize) * 4];
            for (out, px) in dst.chunks_exact_mut(4).zip(src.chunks_exact(channels)) {
                out[..3].copy_from_slice(&px[..3]);
                out[3] = if channels == 4 { px[3] } else { 255 };
            }
        }

        Ok(fb)
    }

    /// Get the width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Get the height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Get the stride (row width in bytes, including any padding).
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.stride
    }

    /// Get the raw pixel data as a slice, padding included.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Get a row of pixels as a slice.
    #[must_use]
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = (y as usize) * self.stride;
        let end = start + (self.width as usize) * 4;
        Some(&self.pixels[start..end])
    }

    /// Clear the frame to a solid color.
    pub fn clear(&mut self, color: Rgba) {
        let [r, g, b, a] = color.to_array();
        for y in 0..self.height as usize {
            let row_start = y * self.stride;
            let row = &mut self.pixels[row_start..row_start + (self.width as usize) * 4];
            for chunk in row.chunks_exact_mut(4) {
                chunk.copy_from_slice(&[r, g, b, a]);
            }
        }
    }

    /// Fill a rectangular region with a solid color.
    ///
    /// Coordinates are clamped to frame bounds; an empty or fully clipped
    /// region is a no-op.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba) {
        let x1 = x.min(self.width);
        let y1 = y.min(self.height);
        let x2 = x.saturating_add(w).min(self.width);
        let y2 = y.saturating_add(h).min(self.height);

        if x1 >= x2 || y1 >= y2 {
            return;
        }

        let [r, g, b, a] = color.to_array();
        let rect_width = (x2 - x1) as usize;

        for row_y in y1..y2 {
            let row_start = (row_y as usize) * self.stride + (x1 as usize) * 4;
            let row = &mut self.pixels[row_start..row_start + rect_width * 4];
            for chunk in row.chunks_exact_mut(4) {
                chunk.copy_from_slice(&[r, g, b, a]);
            }
        }
    }

    /// Get the color at a pixel, or `None` when out of bounds.
    #[must_use]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let idx = self.pixel_index(x, y);
        Some(Rgba::from_array([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]))
    }

    /// Set the color at a pixel. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if x >= self.width || y >= self.height {
            return;
        }

        let idx = self.pixel_index(x, y);
        self.pixels[idx..idx + 4].copy_from_slice(&color.to_array());
    }

    /// Blend a color over a pixel using the "over" operator.
    ///
    /// `out = src * src_alpha + dst * dst_alpha * (1 - src_alpha)`
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if x >= self.width || y >= self.height {
            return;
        }

        let idx = self.pixel_index(x, y);
        let src_a = f32::from(color.a) / 255.0;
        let dst_a = f32::from(self.pixels[idx + 3]) / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);

        if out_a > 0.0 {
            let blend = |src: u8, dst: u8| -> u8 {
                let src_f = f32::from(src) / 255.0;
                let dst_f = f32::from(dst) / 255.0;
                let out = (src_f * src_a + dst_f * dst_a * (1.0 - src_a)) / out_a;
                (out * 255.0).round().clamp(0.0, 255.0) as u8
            };

            self.pixels[idx] = blend(color.r, self.pixels[idx]);
            self.pixels[idx + 1] = blend(color.g, self.pixels[idx + 1]);
            self.pixels[idx + 2] = blend(color.b, self.pixels[idx + 2]);
            self.pixels[idx + 3] = (out_a * 255.0).round() as u8;
        }
    }

    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        (y as usize) * self.stride + (x as usize) * 4
    }

    /// Get pixel data as tightly packed RGBA without stride padding.
    #[must_use]
    pub fn to_compact_pixels(&self) -> Vec<u8> {
        let row_bytes = (self.width as usize) * 4;
        if self.stride == row_bytes {
            return self.pixels.clone();
        }

        let mut compact = Vec::with_capacity(row_bytes * (self.height as usize));
        for y in 0..self.height as usize {
            let start = y * self.stride;
            compact.extend_from_slice(&self.pixels[start..start + row_bytes]);
        }
        compact
    }

    /// Get pixel data as tightly packed RGB, dropping alpha.
    #[must_use]
    pub fn to_rgb_pixels(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity((self.width as usize) * (self.height as usize) * 3);
        for y in 0..self.height {
            if let Some(row) = self.row(y) {
                for px in row.chunks_exact(4) {
                    rgb.extend_from_slice(&px[..3]);
                }
            }
        }
        rgb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::palette;

    #[test]
    fn test_new_framebuffer() {
        let fb = Framebuffer::new(100, 50).unwrap();
        assert_eq!(fb.width(), 100);
        assert_eq!(fb.height(), 50);
        assert!(fb.stride() >= 400);
        assert_eq!(fb.stride() % ROW_ALIGNMENT, 0);
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(Framebuffer::new(0, 100).is_err());
        assert!(Framebuffer::new(100, 0).is_err());
        assert!(Framebuffer::new(0, 0).is_err());
    }

    #[test]
    fn test_from_rgb_sets_opaque_alpha() {
        let data: Vec<u8> = (0..4 * 3 * 3).map(|i| i as u8).collect();
        let fb = Framebuffer::from_rgb(4, 3, &data).unwrap();

        assert_eq!(fb.get_pixel(0, 0), Some(Rgba::new(0, 1, 2, 255)));
        assert_eq!(fb.get_pixel(1, 0), Some(Rgba::new(3, 4, 5, 255)));
        assert_eq!(fb.get_pixel(0, 1), Some(Rgba::new(12, 13, 14, 255)));
        assert_eq!(fb.to_rgb_pixels(), data);
    }

    #[test]
    fn test_from_rgba_round_trips_compact_pixels() {
        let data: Vec<u8> = (0..5 * 2 * 4).map(|i| (i * 7) as u8).collect();
        let fb = Framebuffer::from_rgba(5, 2, &data).unwrap();
        assert_eq!(fb.to_compact_pixels(), data);
    }

    #[test]
    fn test_from_rgba_rejects_wrong_length() {
        assert!(Framebuffer::from_rgba(4, 4, &[0; 10]).is_err());
        assert!(Framebuffer::from_rgb(4, 4, &[0; 4 * 4 * 4]).is_err());
    }

    #[test]
    fn test_clear() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        fb.clear(palette::POOR);

        for y in 0..10 {
            for x in 0..10 {
                assert_eq!(fb.get_pixel(x, y), Some(palette::POOR));
            }
        }
    }

    #[test]
    fn test_fill_rect_clips_to_bounds() {
        let mut fb = Framebuffer::new(100, 100).unwrap();
        fb.clear(Rgba::WHITE);
        fb.fill_rect(90, 90, 50, 50, palette::GOOD);

        assert_eq!(fb.get_pixel(95, 95), Some(palette::GOOD));
        assert_eq!(fb.get_pixel(99, 99), Some(palette::GOOD));
        assert_eq!(fb.get_pixel(85, 85), Some(Rgba::WHITE));
    }

    #[test]
    fn test_fill_rect_zero_area_is_noop() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        fb.clear(Rgba::WHITE);
        fb.fill_rect(2, 2, 0, 5, Rgba::BLACK);
        fb.fill_rect(2, 2, 5, 0, Rgba::BLACK);
        fb.fill_rect(u32::MAX, u32::MAX, u32::MAX, u32::MAX, Rgba::BLACK);

        assert_eq!(fb.get_pixel(2, 2), Some(Rgba::WHITE));
    }

    #[test]
    fn test_set_get_pixel() {
        let mut fb = Framebuffer::new(10, 10).unwrap();

        fb.set_pixel(5, 5, palette::NECK);
        assert_eq!(fb.get_pixel(5, 5), Some(palette::NECK));

        fb.set_pixel(100, 100, palette::NECK);
        assert_eq!(fb.get_pixel(100, 100), None);
    }

    #[test]
    fn test_blend_pixel() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        fb.clear(Rgba::WHITE);

        fb.blend_pixel(5, 5, Rgba::new(255, 0, 0, 128));

        let result = fb.get_pixel(5, 5).unwrap();
        assert_eq!(result.r, 255);
        assert!(result.g > 100 && result.g < 150);
        assert_eq!(result.a, 255);
    }
}
