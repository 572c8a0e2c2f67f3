//! Posture analysis for one pose per frame.
//!
//! [`PostureAnalyzer`] owns the smoothing state of one session. Each call to
//! [`PostureAnalyzer::analyze`] projects the anchor landmarks, derives the raw
//! metrics that the visible landmarks allow, smooths and classifies them, and
//! describes the guide lines and metrics panel to draw.
//!
//! Metrics whose inputs are missing are skipped entirely: they are neither
//! pushed into their smoothing window nor displayed.
//!
//! # Example
//!
//! ```
//! use posture_viz::analyzer::{Analysis, PostureAnalyzer};
//! use posture_viz::config::Config;
//! use posture_viz::landmark::Pose;
//!
//! let mut analyzer = PostureAnalyzer::new(&Config::default()).unwrap();
//! let outcome = analyzer.analyze(&Pose::default(), 640, 480);
//! assert!(outcome.is_err()); // an empty pose is a fault
//! ```

use crate::classify::{Classification, Classifier};
use crate::color::{palette, Rgba};
use crate::config::{AnalysisConfig, Config};
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::geometry::{angle, midpoint, PixelPoint};
use crate::landmark::{LandmarkKind, Pose, MIN_POSE_LANDMARKS};
use crate::metric::Metric;
use crate::overlay::{PanelLayout, PanelRow, PanelStyle};
use crate::render::{render, DrawCommand};
use crate::smoothing::SmoothingState;

/// One computed metric of a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricReading {
    /// Which metric.
    pub metric: Metric,
    /// This frame's unsmoothed value.
    pub raw: f32,
    /// Rolling mean including this frame.
    pub value: f32,
    /// Tier, color and advice for `value`.
    pub classification: Classification,
}

/// Per-frame metrics record.
#[derive(Debug, Clone, PartialEq)]
pub struct PostureMetrics {
    readings: Vec<MetricReading>,
    /// Whether the leg angle indicates a standing subject.
    pub is_standing: bool,
    /// Raw hip-to-knee angle, 0 when hips or knees are not visible.
    pub leg_angle: f32,
}

impl PostureMetrics {
    /// Readings in display order; skipped metrics are absent.
    #[must_use]
    pub fn readings(&self) -> &[MetricReading] {
        &self.readings
    }

    /// Reading for a metric, `None` if it was skipped this frame.
    #[must_use]
    pub fn get(&self, metric: Metric) -> Option<&MetricReading> {
        self.readings.iter().find(|r| r.metric == metric)
    }

    /// Smoothed value of a metric, `None` if it was skipped this frame.
    #[must_use]
    pub fn value(&self, metric: Metric) -> Option<f32> {
        self.get(metric).map(|r| r.value)
    }
}

/// Everything the analyzer produced for a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PostureReport {
    /// Metric values and classifications.
    pub metrics: PostureMetrics,
    /// Guide lines and joint markers.
    pub guides: Vec<DrawCommand>,
    /// Metrics panel.
    pub panel: PanelLayout,
}

impl PostureReport {
    /// Guides followed by the panel, in paint order.
    #[must_use]
    pub fn commands(&self) -> Vec<DrawCommand> {
        let mut commands = self.guides.clone();
        commands.extend(self.panel.commands());
        commands
    }
}

/// Why no posture overlay was produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The detector found no pose.
    NoPose,
    /// The detector itself failed.
    DetectionFailed(String),
    /// Nose or a shoulder fell below the visibility floor.
    MissingAnchors(Vec<LandmarkKind>),
    /// The pose could not be analyzed (short pose, non-finite coordinate,
    /// zero frame dimension).
    Fault(String),
}

/// Outcome of analyzing one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Analysis {
    /// Every metric computed.
    Full(PostureReport),
    /// Hips not visible: torso lean and neck flexion skipped.
    Partial(PostureReport),
    /// No overlay; the frame keeps only the detector skeleton.
    Skipped(SkipReason),
}

/// What the frame should show for an [`Analysis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPlan {
    /// Guides and metrics panel on top of the skeleton.
    Overlay,
    /// Detector skeleton only.
    SkeletonOnly,
}

impl Analysis {
    /// Degradation policy for this outcome.
    #[must_use]
    pub const fn render_plan(&self) -> RenderPlan {
        match self {
            Self::Full(_) | Self::Partial(_) => RenderPlan::Overlay,
            Self::Skipped(_) => RenderPlan::SkeletonOnly,
        }
    }

    /// The report, unless analysis was skipped.
    #[must_use]
    pub const fn report(&self) -> Option<&PostureReport> {
        match self {
            Self::Full(report) | Self::Partial(report) => Some(report),
            Self::Skipped(_) => None,
        }
    }

    /// The metrics record, unless analysis was skipped.
    #[must_use]
    pub fn metrics(&self) -> Option<&PostureMetrics> {
        self.report().map(|r| &r.metrics)
    }

    /// True for [`Analysis::Skipped`].
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}

/// Landmarks the analyzer reads, projected to pixels.
struct Keypoints {
    nose: Option<PixelPoint>,
    left_ear: Option<PixelPoint>,
    right_ear: Option<PixelPoint>,
    left_shoulder: Option<PixelPoint>,
    right_shoulder: Option<PixelPoint>,
    left_hip: Option<PixelPoint>,
    right_hip: Option<PixelPoint>,
    left_knee: Option<PixelPoint>,
    right_knee: Option<PixelPoint>,
}

impl Keypoints {
    fn project(pose: &Pose, width: u32, height: u32, floor: f32) -> Result<Self> {
        let px = |kind| pose.project(kind, width, height, floor);
        Ok(Self {
            nose: px(LandmarkKind::Nose)?,
            left_ear: px(LandmarkKind::LeftEar)?,
            right_ear: px(LandmarkKind::RightEar)?,
            left_shoulder: px(LandmarkKind::LeftShoulder)?,
            right_shoulder: px(LandmarkKind::RightShoulder)?,
            left_hip: px(LandmarkKind::LeftHip)?,
            right_hip: px(LandmarkKind::RightHip)?,
            left_knee: px(LandmarkKind::LeftKnee)?,
            right_knee: px(LandmarkKind::RightKnee)?,
        })
    }

    fn missing_anchors(&self) -> Vec<LandmarkKind> {
        [
            (LandmarkKind::Nose, self.nose),
            (LandmarkKind::LeftShoulder, self.left_shoulder),
            (LandmarkKind::RightShoulder, self.right_shoulder),
        ]
        .into_iter()
        .filter_map(|(kind, p)| p.is_none().then_some(kind))
        .collect()
    }
}

fn both(a: Option<PixelPoint>, b: Option<PixelPoint>) -> Option<(PixelPoint, PixelPoint)> {
    a.zip(b)
}

fn line(from: PixelPoint, to: PixelPoint, color: Rgba) -> DrawCommand {
    DrawCommand::Line {
        from,
        to,
        color,
        thickness: 2,
    }
}

fn dot(center: PixelPoint, color: Rgba) -> DrawCommand {
    DrawCommand::Circle {
        center,
        radius: 5,
        color,
    }
}

/// Posture analyzer for one video session.
#[derive(Debug, Clone)]
pub struct PostureAnalyzer {
    config: AnalysisConfig,
    classifier: Classifier,
    smoothing: SmoothingState,
    panel_style: PanelStyle,
}

impl PostureAnalyzer {
    /// Builds an analyzer with fresh smoothing windows.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid or a metric lacks a threshold
    /// or advice entry.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: config.analysis,
            classifier: Classifier::from_config(config)?,
            smoothing: SmoothingState::new(config.analysis.smoothing_window),
            panel_style: PanelStyle::default(),
        })
    }

    /// Replaces the panel style.
    #[must_use]
    pub fn with_panel_style(mut self, style: PanelStyle) -> Self {
        self.panel_style = style;
        self
    }

    /// Analyzer tunables.
    #[must_use]
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Classifier in use.
    #[must_use]
    pub const fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Smoothing windows of this session.
    #[must_use]
    pub const fn smoothing(&self) -> &SmoothingState {
        &self.smoothing
    }

    /// Forgets all smoothing history.
    pub fn reset(&mut self) {
        self.smoothing.reset();
    }

    /// Analyzes one pose for a `width` x `height` frame.
    ///
    /// Missing anchors give `Ok(Analysis::Skipped(..))`.
    ///
    /// # Errors
    ///
    /// Fails on a zero frame dimension, a pose shorter than
    /// [`MIN_POSE_LANDMARKS`], or a non-finite landmark among those read.
    /// Smoothing state is untouched on failure.
    pub fn analyze(&mut self, pose: &Pose, width: u32, height: u32) -> Result<Analysis> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        if pose.len() < MIN_POSE_LANDMARKS {
            return Err(Error::LandmarkOutOfRange {
                index: MIN_POSE_LANDMARKS - 1,
                len: pose.len(),
            });
        }

        let kp = Keypoints::project(pose, width, height, self.config.visibility_floor)?;

        let missing = kp.missing_anchors();
        let (Some(nose), Some(ls), Some(rs)) = (kp.nose, kp.left_shoulder, kp.right_shoulder)
        else {
            return Ok(Analysis::Skipped(SkipReason::MissingAnchors(missing)));
        };

        let offset = self.config.reference_offset_px;
        let neck_mid = midpoint(ls, rs);
        let ears = both(kp.left_ear, kp.right_ear);
        let ear_mid = ears.map_or(neck_mid, |(l, r)| midpoint(l, r));
        let neck_up = neck_mid.offset(0, -offset);

        let hip_mid = both(kp.left_hip, kp.right_hip).map(|(l, r)| midpoint(l, r));
        let knee_mid = both(kp.left_knee, kp.right_knee).map(|(l, r)| midpoint(l, r));

        let mut raws: Vec<(Metric, f32)> = Vec::with_capacity(Metric::COUNT);
        let mut leg_angle = 0.0;
        let mut is_standing = false;

        if let Some(hip_mid) = hip_mid {
            let hip_up = hip_mid.offset(0, -offset);
            raws.push((Metric::TorsoLean, angle(hip_up, neck_mid, hip_mid)));

            if let Some(knee_mid) = knee_mid {
                let hip_down = hip_mid.offset(0, offset);
                leg_angle = angle(hip_down, knee_mid, hip_mid);
                is_standing = leg_angle < self.config.standing_leg_angle;
            }

            let neck_angle = angle(nose, hip_mid, neck_mid);
            raws.push((Metric::NeckFlex, (180.0 - neck_angle).max(0.0)));
        } else {
            tracing::debug!("hips not visible, skipping torso lean and neck flexion");
        }

        raws.push((Metric::HeadForward, angle(neck_up, nose, neck_mid)));
        raws.push((
            Metric::ShoulderSym,
            ls.y.abs_diff(rs.y) as f32 / height as f32 * 100.0,
        ));
        raws.push((
            Metric::EarOffset,
            ear_mid.x.abs_diff(neck_mid.x) as f32 / width as f32 * 100.0,
        ));

        let mut readings: Vec<MetricReading> = raws
            .into_iter()
            .map(|(metric, raw)| {
                let value = self.smoothing.smooth(metric, raw);
                MetricReading {
                    metric,
                    raw,
                    value,
                    classification: self.classifier.classify(metric, value),
                }
            })
            .collect();
        readings.sort_by_key(|r| display_rank(r.metric));

        let mut guides = vec![
            line(ls, rs, palette::SHOULDER),
            DrawCommand::AaLine {
                from: neck_mid,
                to: neck_up,
                color: palette::GUIDE,
            },
            line(neck_mid, nose, palette::NECK),
            dot(neck_mid, palette::GOOD),
        ];
        if let (Some(hip_mid), Some((lh, rh))) = (hip_mid, both(kp.left_hip, kp.right_hip)) {
            guides.push(line(lh, rh, palette::BODY));
            guides.push(line(hip_mid, neck_mid, palette::BODY));
            guides.push(DrawCommand::AaLine {
                from: hip_mid,
                to: hip_mid.offset(0, -offset),
                color: palette::GUIDE,
            });
            guides.push(dot(hip_mid, palette::POOR));
            if let Some(knee_mid) = knee_mid {
                guides.push(line(hip_mid, knee_mid, palette::LEG));
            }
        }
        if ears.is_some() {
            guides.push(line(neck_mid, ear_mid, palette::WARNING));
        }

        let rows = readings
            .iter()
            .map(|r| PanelRow {
                label: r.metric.label().to_string(),
                value: r.metric.format_value(r.value),
                color: r.classification.color,
                advice: r.classification.advice.clone(),
            })
            .collect();

        let report = PostureReport {
            metrics: PostureMetrics {
                readings,
                is_standing,
                leg_angle,
            },
            guides,
            panel: PanelLayout::new(width, rows, self.panel_style),
        };

        Ok(if hip_mid.is_some() {
            Analysis::Full(report)
        } else {
            Analysis::Partial(report)
        })
    }

    /// Analyzes `pose` and draws the overlay into `frame`.
    ///
    /// Never fails: faults are logged and reported as
    /// [`SkipReason::Fault`], leaving the frame untouched.
    pub fn analyze_and_render(&mut self, frame: &mut Framebuffer, pose: Option<&Pose>) -> Analysis {
        let Some(pose) = pose else {
            return Analysis::Skipped(SkipReason::NoPose);
        };

        let analysis = match self.analyze(pose, frame.width(), frame.height()) {
            Ok(analysis) => analysis,
            Err(err) => {
                tracing::error!(
                    %err,
                    landmarks = pose.len(),
                    width = frame.width(),
                    height = frame.height(),
                    "posture analysis failed"
                );
                return Analysis::Skipped(SkipReason::Fault(err.to_string()));
            }
        };

        if let Some(report) = analysis.report() {
            render(frame, &report.commands());
        } else if let Analysis::Skipped(SkipReason::MissingAnchors(missing)) = &analysis {
            tracing::debug!(?missing, "anchor landmarks not visible");
        }

        analysis
    }
}

fn display_rank(metric: Metric) -> usize {
    Metric::DISPLAY_ORDER
        .iter()
        .position(|m| *m == metric)
        .unwrap_or(Metric::COUNT)
}
