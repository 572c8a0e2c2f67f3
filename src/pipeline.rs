//! Per-frame pipeline: detect, draw skeletons, analyze the primary pose.

use crate::analyzer::{Analysis, PostureAnalyzer, SkipReason};
use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::landmark::Pose;
use crate::render::render;
use crate::skeleton::{skeleton_commands, SkeletonStyle};
use std::time::{SystemTime, UNIX_EPOCH};

/// Poses found in one frame, most confident first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detection {
    /// Detected poses.
    pub poses: Vec<Pose>,
}

impl Detection {
    /// The pose that gets analyzed.
    #[must_use]
    pub fn primary(&self) -> Option<&Pose> {
        self.poses.first()
    }
}

/// An external pose-estimation engine.
pub trait PoseDetector {
    /// Detect poses in `frame`. Timestamps passed by the pipeline are
    /// strictly increasing.
    ///
    /// # Errors
    ///
    /// Any failure of the underlying engine. The pipeline recovers by
    /// passing the frame through unchanged.
    fn detect(&mut self, frame: &Framebuffer, timestamp_ms: u64) -> Result<Detection>;
}

/// Issues strictly increasing millisecond timestamps.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock {
    last_ms: u64,
}

impl MonotonicClock {
    /// Creates a clock that has issued nothing yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { last_ms: 0 }
    }

    /// Turns a raw reading into the next timestamp: readings at or before
    /// the previous one are bumped to `previous + 1`.
    pub fn stamp(&mut self, reading_ms: u64) -> u64 {
        let ts = if reading_ms <= self.last_ms {
            self.last_ms + 1
        } else {
            reading_ms
        };
        self.last_ms = ts;
        ts
    }

    /// Stamps the current wall-clock time.
    pub fn now(&mut self) -> u64 {
        let reading = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));
        self.stamp(reading)
    }

    /// Last timestamp issued, 0 before the first.
    #[must_use]
    pub const fn last(&self) -> u64 {
        self.last_ms
    }
}

/// Result of one pipeline step.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    /// Timestamp handed to the detector.
    pub timestamp_ms: u64,
    /// Number of poses drawn, 0 when detection failed.
    pub poses: usize,
    /// Analysis of the primary pose.
    pub analysis: Analysis,
}

/// Couples a detector with a per-session analyzer.
pub struct FramePipeline<D> {
    detector: D,
    analyzer: PostureAnalyzer,
    skeleton: SkeletonStyle,
    clock: MonotonicClock,
}

impl<D: PoseDetector> FramePipeline<D> {
    /// Creates a pipeline with the default skeleton style.
    pub fn new(detector: D, analyzer: PostureAnalyzer) -> Self {
        Self {
            detector,
            analyzer,
            skeleton: SkeletonStyle::default(),
            clock: MonotonicClock::new(),
        }
    }

    /// Replaces the skeleton style.
    #[must_use]
    pub fn with_skeleton_style(mut self, style: SkeletonStyle) -> Self {
        self.skeleton = style;
        self
    }

    /// The session analyzer.
    pub fn analyzer(&self) -> &PostureAnalyzer {
        &self.analyzer
    }

    /// The wrapped detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Processes a frame stamped with the wall clock.
    pub fn process_frame(&mut self, frame: &mut Framebuffer) -> FrameOutcome {
        let ts = self.clock.now();
        self.process_at(frame, ts)
    }

    /// Processes a frame with a caller-supplied clock reading, which is still
    /// made monotonic.
    ///
    /// On detector failure the frame is left untouched. Otherwise every
    /// pose gets its skeleton and the first pose is analyzed on top.
    pub fn process_at(&mut self, frame: &mut Framebuffer, reading_ms: u64) -> FrameOutcome {
        let timestamp_ms = self.clock.stamp(reading_ms);

        let detection = match self.detector.detect(frame, timestamp_ms) {
            Ok(detection) => detection,
            Err(err) => {
                tracing::warn!(%err, timestamp_ms, "pose detection failed");
                return FrameOutcome {
                    timestamp_ms,
                    poses: 0,
                    analysis: Analysis::Skipped(SkipReason::DetectionFailed(err.to_string())),
                };
            }
        };

        if detection.poses.is_empty() {
            tracing::warn!(timestamp_ms, "no pose detected");
        }

        let (width, height) = (frame.width(), frame.height());
        for pose in &detection.poses {
            render(frame, &skeleton_commands(pose, width, height, &self.skeleton));
        }

        let analysis = self.analyzer.analyze_and_render(frame, detection.primary());
        FrameOutcome {
            timestamp_ms,
            poses: detection.poses.len(),
            analysis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::palette;
    use crate::config::Config;
    use crate::error::Error;

    struct Scripted {
        results: Vec<Result<Detection>>,
        seen: Vec<u64>,
    }

    impl PoseDetector for Scripted {
        fn detect(&mut self, _frame: &Framebuffer, timestamp_ms: u64) -> Result<Detection> {
            self.seen.push(timestamp_ms);
            if self.results.is_empty() {
                Ok(Detection::default())
            } else {
                self.results.remove(0)
            }
        }
    }

    fn pipeline(results: Vec<Result<Detection>>) -> FramePipeline<Scripted> {
        let analyzer = PostureAnalyzer::new(&Config::default()).unwrap();
        FramePipeline::new(
            Scripted {
                results,
                seen: Vec::new(),
            },
            analyzer,
        )
    }

    #[test]
    fn test_clock_bumps_stale_readings() {
        let mut clock = MonotonicClock::new();
        assert_eq!(clock.stamp(100), 100);
        assert_eq!(clock.stamp(100), 101);
        assert_eq!(clock.stamp(50), 102);
        assert_eq!(clock.stamp(500), 500);
        assert_eq!(clock.last(), 500);
    }

    #[test]
    fn test_clock_starts_above_zero() {
        let mut clock = MonotonicClock::new();
        assert_eq!(clock.stamp(0), 1);
    }

    #[test]
    fn test_wall_clock_is_monotonic() {
        let mut clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b > a);
    }

    #[test]
    fn test_detector_error_passes_frame_through() {
        let mut p = pipeline(vec![Err(Error::Detection("model crashed".to_string()))]);
        let mut frame = Framebuffer::new(32, 32).unwrap();

        let outcome = p.process_at(&mut frame, 10);
        assert_eq!(outcome.poses, 0);
        assert!(matches!(
            outcome.analysis,
            Analysis::Skipped(SkipReason::DetectionFailed(_))
        ));
        assert!(frame.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_no_pose_is_skipped() {
        let mut p = pipeline(Vec::new());
        let mut frame = Framebuffer::new(32, 32).unwrap();
        let outcome = p.process_at(&mut frame, 10);
        assert_eq!(outcome.analysis, Analysis::Skipped(SkipReason::NoPose));
    }

    #[test]
    fn test_detector_sees_increasing_timestamps() {
        let mut p = pipeline(Vec::new());
        let mut frame = Framebuffer::new(8, 8).unwrap();
        for reading in [5, 5, 3, 9] {
            p.process_at(&mut frame, reading);
        }
        assert_eq!(p.detector().seen, vec![5, 6, 7, 9]);
    }

    #[test]
    fn test_skeleton_drawn_even_without_anchors() {
        // Every landmark invisible: analysis is skipped, skeleton still drawn.
        let pose = Pose::new(vec![crate::landmark::Landmark::new(0.5, 0.5, 0.0); 33]);
        let mut p = pipeline(vec![Ok(Detection { poses: vec![pose] })]);
        let mut frame = Framebuffer::new(64, 64).unwrap();

        let outcome = p.process_at(&mut frame, 1);
        assert_eq!(outcome.poses, 1);
        assert!(matches!(
            outcome.analysis,
            Analysis::Skipped(SkipReason::MissingAnchors(_))
        ));
        assert_eq!(frame.get_pixel(32, 32), Some(palette::JOINT));
    }
}
