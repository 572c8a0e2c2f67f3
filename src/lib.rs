//! # Posture-Viz
//!
//! Real-time posture metrics and annotated overlays from human-pose landmark
//! streams.
//!
//! An external pose estimator locates body landmarks in each video frame.
//! posture-viz turns them into five temporally smoothed posture metrics,
//! classifies each against configurable thresholds, and paints guide lines
//! plus a color-coded metrics panel onto the frame.
//!
//! ## Features
//!
//! - **Pure Rust**: software rasterizer, bitmap font, PNG I/O
//! - **Per-session state**: every [`PostureAnalyzer`](analyzer::PostureAnalyzer) owns its smoothing windows
//! - **Graceful degradation**: missing landmarks skip metrics, never panic the frame loop
//! - **Pluggable detector**: any engine behind the [`PoseDetector`](pipeline::PoseDetector) trait
//!
//! ## Quick Start
//!
//! ```rust
//! use posture_viz::prelude::*;
//!
//! let mut analyzer = PostureAnalyzer::new(&Config::default())?;
//! let mut frame = Framebuffer::new(1280, 720)?;
//!
//! let mut landmarks = vec![Landmark::new(0.0, 0.0, 0.0); 33];
//! landmarks[LandmarkKind::Nose.index()] = Landmark::new(0.50, 0.20, 0.99);
//! landmarks[LandmarkKind::LeftShoulder.index()] = Landmark::new(0.45, 0.35, 0.99);
//! landmarks[LandmarkKind::RightShoulder.index()] = Landmark::new(0.55, 0.35, 0.99);
//!
//! let outcome = analyzer.analyze_and_render(&mut frame, Some(&Pose::new(landmarks)));
//! assert_eq!(outcome.render_plan(), RenderPlan::Overlay);
//! # Ok::<(), posture_viz::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli`: the `posture-replay` binary (clap, tracing-subscriber)
//!
//! ## References
//!
//! - Bazarevsky, V. et al. (2020). "BlazePose: On-device Real-time Body Pose tracking."
//! - Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Colors and the overlay palette.
pub mod color;

/// RGBA frame buffer.
pub mod framebuffer;

/// Pixel points, angles, midpoints.
pub mod geometry;

/// Detector landmarks and poses.
pub mod landmark;

/// Metric, unit and tier vocabulary.
pub mod metric;

// ============================================================================
// Analysis Modules
// ============================================================================

/// Threshold, advice and analyzer configuration.
pub mod config;

/// Rolling-mean smoothing windows.
pub mod smoothing;

/// Threshold classification.
pub mod classify;

/// Per-frame posture analysis.
pub mod analyzer;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Rasterization of draw commands.
pub mod render;

/// Metrics panel layout.
pub mod overlay;

/// Detector skeleton overlay.
pub mod skeleton;

/// PNG frame I/O.
pub mod output;

// ============================================================================
// Pipeline Modules
// ============================================================================

/// Detector-driven frame pipeline.
pub mod pipeline;

/// Recorded detection streams.
pub mod replay;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for posture-viz operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust
/// use posture_viz::prelude::*;
/// ```
pub mod prelude {
    pub use crate::analyzer::{Analysis, PostureAnalyzer, PostureMetrics, RenderPlan, SkipReason};
    pub use crate::classify::{Classification, Classifier};
    pub use crate::color::{palette, Rgba};
    pub use crate::config::{AdviceSpec, AnalysisConfig, Config, ThresholdSpec};
    pub use crate::error::{Error, Result};
    pub use crate::framebuffer::Framebuffer;
    pub use crate::geometry::{angle, midpoint, PixelPoint, PixelRect};
    pub use crate::landmark::{Landmark, LandmarkKind, Pose};
    pub use crate::metric::{Metric, Tier, Unit};
    pub use crate::output::{PngDecoder, PngEncoder};
    pub use crate::pipeline::{Detection, FramePipeline, PoseDetector};
    pub use crate::render::{render, DrawCommand, Drawable};
    pub use crate::replay::{Recording, ReplayDetector};
}
