//! Geometry kernel: pixel points, joint angles, midpoints.
//!
//! Everything here is pure. Degenerate input (a zero-length edge) is a
//! defined case with a 0° result, not an error.

/// An integer pixel coordinate in image space (origin top-left, y down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelPoint {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
}

impl PixelPoint {
    /// Create a new pixel point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// This point shifted by `(dx, dy)`, saturating at the `i32` limits.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// Vector from `origin` to this point.
    fn minus(self, origin: Self) -> (f64, f64) {
        (
            f64::from(self.x) - f64::from(origin.x),
            f64::from(self.y) - f64::from(origin.y),
        )
    }
}

/// Angle in degrees at `vertex` between the rays towards `a` and `b`.
///
/// Uses the dot-product formula with the cosine clamped to `[-1, 1]`, so the
/// result is always in `[0, 180]`. Returns `0.0` when either edge has zero
/// length or both rays point at the same pixel.
///
/// # Example
///
/// ```
/// use posture_viz::geometry::{angle, PixelPoint};
///
/// let vertex = PixelPoint::new(0, 0);
/// let right = angle(PixelPoint::new(10, 0), PixelPoint::new(0, 10), vertex);
/// assert!((right - 90.0).abs() < 1e-4);
/// ```
#[must_use]
pub fn angle(a: PixelPoint, b: PixelPoint, vertex: PixelPoint) -> f32 {
    if a == b {
        return 0.0;
    }

    let (ax, ay) = a.minus(vertex);
    let (bx, by) = b.minus(vertex);

    if (ax == 0.0 && ay == 0.0) || (bx == 0.0 && by == 0.0) {
        return 0.0;
    }

    let cosine = (ax * bx + ay * by) / (ax.hypot(ay) * bx.hypot(by));
    cosine.clamp(-1.0, 1.0).acos().to_degrees() as f32
}

/// Integer midpoint of two pixel points, floor-divided per axis.
#[must_use]
pub fn midpoint(p1: PixelPoint, p2: PixelPoint) -> PixelPoint {
    // The mean of two i32 values always fits back into i32.
    let mid = |a: i32, b: i32| (i64::from(a) + i64::from(b)).div_euclid(2) as i32;
    PixelPoint::new(mid(p1.x, p2.x), mid(p1.y, p2.y))
}

/// An axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    /// X coordinate of the top-left corner.
    pub x: i32,
    /// Y coordinate of the top-left corner.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle spanning two inclusive corners, in either order.
    #[must_use]
    pub fn from_corners(a: PixelPoint, b: PixelPoint) -> Self {
        let (x0, x1) = (a.x.min(b.x), a.x.max(b.x));
        let (y0, y1) = (a.y.min(b.y), a.y.max(b.y));
        Self::new(x0, y0, x1.abs_diff(x0) + 1, y1.abs_diff(y0) + 1)
    }

    /// True when the rectangle covers no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check whether a point lies inside the rectangle.
    #[must_use]
    pub fn contains(&self, p: PixelPoint) -> bool {
        i64::from(p.x) >= i64::from(self.x)
            && i64::from(p.x) < i64::from(self.x) + i64::from(self.width)
            && i64::from(p.y) >= i64::from(self.y)
            && i64::from(p.y) < i64::from(self.y) + i64::from(self.height)
    }
}
