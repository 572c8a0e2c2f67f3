//! Primitive rasterization: lines, circles, rectangles.
//!
//! All functions clip against the frame; coordinates may lie anywhere in
//! `i32` space.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;
use crate::geometry::{PixelPoint, PixelRect};

// ============================================================================
// Line Drawing
// ============================================================================

/// Draw a one-pixel line using Bresenham's algorithm.
pub fn draw_line(fb: &mut Framebuffer, from: PixelPoint, to: PixelPoint, color: Rgba) {
    let Some((from, to)) = clip_segment(from, to, frame_bounds(fb, 0)) else {
        return;
    };
    walk_line(from, to, |x, y| {
        if x >= 0 && y >= 0 {
            fb.set_pixel(x as u32, y as u32, color);
        }
    });
}

/// Draw a line `thickness` pixels wide by stamping a filled disc at every
/// Bresenham step. A thickness of 0 or 1 falls back to [`draw_line`].
pub fn draw_thick_line(
    fb: &mut Framebuffer,
    from: PixelPoint,
    to: PixelPoint,
    thickness: u32,
    color: Rgba,
) {
    if thickness <= 1 {
        draw_line(fb, from, to, color);
        return;
    }

    let radius = (thickness / 2).min(i32::MAX as u32) as i32;
    let (w, h) = (fb.width() as i32, fb.height() as i32);
    let Some((from, to)) = clip_segment(from, to, frame_bounds(fb, radius)) else {
        return;
    };
    walk_line(from, to, |x, y| {
        if x.saturating_add(radius) >= 0
            && y.saturating_add(radius) >= 0
            && x.saturating_sub(radius) < w
            && y.saturating_sub(radius) < h
        {
            draw_circle(fb, PixelPoint::new(x, y), radius, color);
        }
    });
}

/// Inclusive clip box: the frame grown by `margin` pixels on every side.
#[derive(Debug, Clone, Copy)]
struct ClipBox {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

fn frame_bounds(fb: &Framebuffer, margin: i32) -> ClipBox {
    let margin = f64::from(margin);
    ClipBox {
        min_x: -margin,
        min_y: -margin,
        max_x: f64::from(fb.width()) - 1.0 + margin,
        max_y: f64::from(fb.height()) - 1.0 + margin,
    }
}

/// Liang-Barsky clip of a segment against `bounds`.
///
/// Segments with both ends inside come back unchanged so their pixels do
/// not shift; `None` when nothing of the segment is inside.
fn clip_segment(
    from: PixelPoint,
    to: PixelPoint,
    bounds: ClipBox,
) -> Option<(PixelPoint, PixelPoint)> {
    let inside = |p: PixelPoint| {
        let (x, y) = (f64::from(p.x), f64::from(p.y));
        x >= bounds.min_x && x <= bounds.max_x && y >= bounds.min_y && y <= bounds.max_y
    };
    if inside(from) && inside(to) {
        return Some((from, to));
    }

    let (x0, y0) = (f64::from(from.x), f64::from(from.y));
    let (dx, dy) = (f64::from(to.x) - x0, f64::from(to.y) - y0);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);

    for (p, q) in [
        (-dx, x0 - bounds.min_x),
        (dx, bounds.max_x - x0),
        (-dy, y0 - bounds.min_y),
        (dy, bounds.max_y - y0),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else if p < 0.0 {
            t0 = t0.max(q / p);
        } else {
            t1 = t1.min(q / p);
        }
    }
    if t0 > t1 {
        return None;
    }

    let at = |t: f64| PixelPoint::new((x0 + t * dx).round() as i32, (y0 + t * dy).round() as i32);
    Some((at(t0), at(t1)))
}

/// Visit every pixel of the Bresenham line from `from` to `to`.
fn walk_line(from: PixelPoint, to: PixelPoint, mut visit: impl FnMut(i32, i32)) {
    let (x0, y0, x1, y1) = (
        i64::from(from.x),
        i64::from(from.y),
        i64::from(to.x),
        i64::from(to.y),
    );
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        visit(x as i32, y as i32);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Draw an anti-aliased one-pixel line using Wu's algorithm.
///
/// Two pixels are blended per step along the major axis, weighted by the
/// fractional distance to the ideal line.
///
/// # References
///
/// Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.
pub fn draw_line_aa(fb: &mut Framebuffer, from: PixelPoint, to: PixelPoint, color: Rgba) {
    let Some((from, to)) = clip_segment(from, to, frame_bounds(fb, 1)) else {
        return;
    };
    let (x0, y0, x1, y1) = (from.x as f32, from.y as f32, to.x as f32, to.y as f32);
    let steep = (y1 - y0).abs() > (x1 - x0).abs();

    let (x0, y0, x1, y1) = if steep { (y0, x0, y1, x1) } else { (x0, y0, x1, y1) };
    let (x0, y0, x1, y1) = if x0 > x1 { (x1, y1, x0, y0) } else { (x0, y0, x1, y1) };

    let dx = x1 - x0;
    let dy = y1 - y0;
    let gradient = if dx.abs() < f32::EPSILON { 1.0 } else { dy / dx };

    let mut plot_pair = |major: i32, minor: f32, weight: f32| {
        let base = minor.floor() as i32;
        let (a, b) = (rfpart(minor) * weight, fpart(minor) * weight);
        if steep {
            plot(fb, base, major, color, a);
            plot(fb, base + 1, major, color, b);
        } else {
            plot(fb, major, base, color, a);
            plot(fb, major, base + 1, color, b);
        }
    };

    // First endpoint
    let xend = x0.round();
    let yend = y0 + gradient * (xend - x0);
    let xpxl1 = xend as i32;
    plot_pair(xpxl1, yend, rfpart(x0 + 0.5));
    let mut intery = yend + gradient;

    // Second endpoint
    let xend = x1.round();
    let yend = y1 + gradient * (xend - x1);
    let xpxl2 = xend as i32;
    plot_pair(xpxl2, yend, fpart(x1 + 0.5));

    for x in (xpxl1 + 1)..xpxl2 {
        plot_pair(x, intery, 1.0);
        intery += gradient;
    }
}

/// Plot a pixel with partial intensity (for anti-aliased drawing).
#[inline]
fn plot(fb: &mut Framebuffer, x: i32, y: i32, color: Rgba, intensity: f32) {
    if x >= 0 && y >= 0 && x < fb.width() as i32 && y < fb.height() as i32 {
        let alpha = (f32::from(color.a) * intensity.clamp(0.0, 1.0)) as u8;
        fb.blend_pixel(x as u32, y as u32, color.with_alpha(alpha));
    }
}

#[inline]
fn fpart(x: f32) -> f32 {
    x - x.floor()
}

#[inline]
fn rfpart(x: f32) -> f32 {
    1.0 - fpart(x)
}

// ============================================================================
// Rectangle Drawing
// ============================================================================

/// Draw a filled rectangle; the part outside the frame is clipped.
pub fn draw_rect(fb: &mut Framebuffer, rect: PixelRect, color: Rgba) {
    if rect.is_empty() {
        return;
    }

    let x0 = i64::from(rect.x).max(0);
    let y0 = i64::from(rect.y).max(0);
    let x1 = i64::from(rect.x) + i64::from(rect.width);
    let y1 = i64::from(rect.y) + i64::from(rect.height);
    if x1 <= x0 || y1 <= y0 {
        return;
    }

    let clamp = |v: i64| v.min(i64::from(u32::MAX)) as u32;
    fb.fill_rect(clamp(x0), clamp(y0), clamp(x1 - x0), clamp(y1 - y0), color);
}

// ============================================================================
// Circle Drawing
// ============================================================================

/// Draw a filled circle using the midpoint algorithm.
pub fn draw_circle(fb: &mut Framebuffer, center: PixelPoint, radius: i32, color: Rgba) {
    let (cx, cy) = (center.x, center.y);
    let (w, h) = (i64::from(fb.width()), i64::from(fb.height()));
    let (cx64, cy64, r) = (i64::from(cx), i64::from(cy), i64::from(radius.max(0)));
    if cx64 + r < 0 || cy64 + r < 0 || cx64 - r >= w || cy64 - r >= h {
        return;
    }
    if radius <= 0 {
        if radius == 0 && cx >= 0 && cy >= 0 {
            fb.set_pixel(cx as u32, cy as u32, color);
        }
        return;
    }

    let mut x = radius;
    let mut y = 0;
    let mut err = 1 - radius;

    while x >= y {
        let (left, right) = (cx.saturating_sub(x), cx.saturating_add(x));
        draw_span(fb, left, right, cy.saturating_add(y), color);
        draw_span(fb, left, right, cy.saturating_sub(y), color);
        let (left, right) = (cx.saturating_sub(y), cx.saturating_add(y));
        draw_span(fb, left, right, cy.saturating_add(x), color);
        draw_span(fb, left, right, cy.saturating_sub(x), color);

        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

/// Horizontal run from `x1` to `x2` inclusive, clipped.
#[inline]
fn draw_span(fb: &mut Framebuffer, x1: i32, x2: i32, y: i32, color: Rgba) {
    if y < 0 || y >= fb.height() as i32 {
        return;
    }

    let x_start = x1.max(0) as u32;
    let x_end = x2.saturating_add(1).clamp(0, fb.width() as i32) as u32;

    if x_start < x_end {
        fb.fill_rect(x_start, y as u32, x_end - x_start, 1, color);
    }
}

// ============================================================================
// Tests
// ============================================================================
