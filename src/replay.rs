//! Recorded detection streams.
//!
//! A recording is a JSON document holding the detector output of a captured
//! session, one entry per frame:
//!
//! ```json
//! {
//!   "width": 1280,
//!   "height": 720,
//!   "frames": [
//!     { "timestamp_ms": 0, "poses": [[{ "x": 0.5, "y": 0.1, "visibility": 0.98 }]] },
//!     { "timestamp_ms": 33, "error": "camera dropped frame" }
//!   ]
//! }
//! ```
//!
//! [`ReplayDetector`] plays it back through the [`PoseDetector`] seam so the
//! whole pipeline runs without a live model.

use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::landmark::Pose;
use crate::pipeline::{Detection, PoseDetector};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One recorded frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    /// Capture time; absent entries are stamped by the pipeline clock.
    #[serde(default)]
    pub timestamp_ms: Option<u64>,

    /// Poses the detector returned, most confident first.
    #[serde(default)]
    pub poses: Vec<Pose>,

    /// Detector failure for this frame, replayed as an error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A captured detection stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    /// Capture width in pixels, if known.
    #[serde(default)]
    pub width: Option<u32>,

    /// Capture height in pixels, if known.
    #[serde(default)]
    pub height: Option<u32>,

    /// Frames in capture order.
    pub frames: Vec<RecordedFrame>,
}

impl Recording {
    /// Reads a recording from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Recording(format!("{}: {e}", path.display())))?;
        Self::parse(&content).map_err(|e| match e {
            Error::Recording(msg) => Error::Recording(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Parses a recording from a JSON string.
    pub fn parse(json: &str) -> Result<Self> {
        let recording: Self = serde_json::from_str(json)
            .map_err(|e| Error::Recording(format!("line {}: {e}", e.line())))?;
        if recording.width == Some(0) || recording.height == Some(0) {
            return Err(Error::Recording("frame dimensions must be non-zero".to_string()));
        }
        Ok(recording)
    }

    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True when the recording has no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Plays a [`Recording`] back one frame per `detect` call.
#[derive(Debug, Clone)]
pub struct ReplayDetector {
    frames: std::vec::IntoIter<RecordedFrame>,
}

impl ReplayDetector {
    /// Plays back `recording` from its first frame.
    #[must_use]
    pub fn new(recording: Recording) -> Self {
        Self {
            frames: recording.frames.into_iter(),
        }
    }

    /// Frames not yet played.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl PoseDetector for ReplayDetector {
    fn detect(&mut self, _frame: &Framebuffer, _timestamp_ms: u64) -> Result<Detection> {
        let frame = self
            .frames
            .next()
            .ok_or_else(|| Error::Recording("recording exhausted".to_string()))?;

        match frame.error {
            Some(message) => Err(Error::Detection(message)),
            None => Ok(Detection { poses: frame.poses }),
        }
    }
}
