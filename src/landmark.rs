//! Pose landmarks as delivered by the external detector.
//!
//! A [`Pose`] is an ordered landmark sequence using the 33-point BlazePose
//! numbering. The analyzer addresses it through [`LandmarkKind`] instead of
//! raw indices.

use crate::error::{Error, Result};
use crate::geometry::PixelPoint;
use serde::{Deserialize, Serialize};

/// Minimum number of landmarks a pose must carry to be analyzed.
pub const MIN_POSE_LANDMARKS: usize = 27;

/// Default visibility below which a landmark counts as absent.
pub const DEFAULT_VISIBILITY_FLOOR: f32 = 0.05;

/// Accepted band for normalized coordinates. Detectors overshoot the frame
/// edges slightly for limbs leaving the picture; anything past this band is
/// treated as garbage.
pub const COORDINATE_RANGE: std::ops::RangeInclusive<f32> = -1.0..=2.0;

/// One detected keypoint in normalized image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position, 0.0 = left edge, 1.0 = right edge.
    pub x: f32,
    /// Vertical position, 0.0 = top edge, 1.0 = bottom edge.
    pub y: f32,
    /// Detector confidence that the point is visible (0.0-1.0).
    #[serde(default = "default_visibility")]
    pub visibility: f32,
}

fn default_visibility() -> f32 {
    1.0
}

impl Landmark {
    /// Create a new landmark.
    #[must_use]
    pub const fn new(x: f32, y: f32, visibility: f32) -> Self {
        Self { x, y, visibility }
    }

    /// Project into pixel space for a `width` x `height` frame.
    ///
    /// Returns `None` when the visibility is below `floor`. Coordinates are
    /// truncated toward zero.
    #[must_use]
    pub fn to_pixel(&self, width: u32, height: u32, floor: f32) -> Option<PixelPoint> {
        if self.visibility < floor {
            return None;
        }
        Some(PixelPoint::new(
            (self.x * width as f32) as i32,
            (self.y * height as f32) as i32,
        ))
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.visibility.is_finite()
    }

    /// True when both coordinates are finite and inside [`COORDINATE_RANGE`].
    #[must_use]
    pub fn in_range(&self) -> bool {
        COORDINATE_RANGE.contains(&self.x) && COORDINATE_RANGE.contains(&self.y)
    }
}

/// Anatomical landmark names, valued by their detector index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum LandmarkKind {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl LandmarkKind {
    /// Position of this landmark in a detector pose.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One detected pose: an ordered landmark sequence.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pose {
    landmarks: Vec<Landmark>,
}

impl Pose {
    /// Wrap a landmark sequence as delivered by the detector.
    #[must_use]
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    /// Number of landmarks in the pose.
    #[must_use]
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    /// True when the pose carries no landmarks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// All landmarks in detector order.
    #[must_use]
    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    /// Landmark at a raw detector index.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }

    /// Landmark by anatomical name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LandmarkOutOfRange`] if the pose is too short, or
    /// [`Error::InvalidLandmark`] if the landmark is not finite or lies
    /// outside [`COORDINATE_RANGE`].
    pub fn get(&self, kind: LandmarkKind) -> Result<&Landmark> {
        let index = kind.index();
        let landmark = self.landmarks.get(index).ok_or(Error::LandmarkOutOfRange {
            index,
            len: self.landmarks.len(),
        })?;
        if !landmark.is_finite() {
            return Err(Error::InvalidLandmark {
                index,
                message: format!("non-finite value {landmark:?}"),
            });
        }
        if !landmark.in_range() {
            return Err(Error::InvalidLandmark {
                index,
                message: format!(
                    "({}, {}) outside {COORDINATE_RANGE:?}",
                    landmark.x, landmark.y
                ),
            });
        }
        Ok(landmark)
    }

    /// Visibility-gated pixel projection of a named landmark.
    ///
    /// `Ok(None)` means the landmark is present in the pose but below the
    /// visibility floor.
    pub fn project(
        &self,
        kind: LandmarkKind,
        width: u32,
        height: u32,
        floor: f32,
    ) -> Result<Option<PixelPoint>> {
        Ok(self.get(kind)?.to_pixel(width, height, floor))
    }
}

impl From<Vec<Landmark>> for Pose {
    fn from(landmarks: Vec<Landmark>) -> Self {
        Self::new(landmarks)
    }
}
