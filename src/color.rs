//! Color types and the overlay palette.
//!
//! All colors are RGBA with 8-bit channels in RGB order, matching the
//! [`Framebuffer`](crate::framebuffer::Framebuffer) pixel layout.

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255, 255 = fully opaque).
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 255).
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create a color with modified alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Convert to array representation.
    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Create from array representation.
    #[must_use]
    pub const fn from_array(arr: [u8; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }
}

/// Fixed colors used by the posture overlay.
pub mod palette {
    use super::Rgba;

    /// Good tier, neck point.
    pub const GOOD: Rgba = Rgba::rgb(50, 205, 50);
    /// Warning tier, ear guide, advice text.
    pub const WARNING: Rgba = Rgba::rgb(255, 165, 0);
    /// Poor tier, hip point.
    pub const POOR: Rgba = Rgba::rgb(220, 50, 50);
    /// Panel labels.
    pub const LABEL: Rgba = Rgba::rgb(240, 240, 240);
    /// Vertical reference guides.
    pub const GUIDE: Rgba = Rgba::rgb(128, 128, 128);
    /// Neck-to-nose segment.
    pub const NECK: Rgba = Rgba::rgb(0, 0, 255);
    /// Hip line and hip-to-neck segment.
    pub const BODY: Rgba = Rgba::rgb(255, 255, 0);
    /// Shoulder line.
    pub const SHOULDER: Rgba = Rgba::rgb(0, 255, 0);
    /// Hip-to-knee segment.
    pub const LEG: Rgba = Rgba::rgb(255, 0, 255);
    /// Metrics panel background.
    pub const PANEL: Rgba = Rgba::rgb(20, 20, 20);
    /// Detector skeleton connections.
    pub const SKELETON: Rgba = Rgba::rgb(0, 200, 255);
    /// Detector skeleton joints.
    pub const JOINT: Rgba = Rgba::rgb(255, 255, 255);
}
