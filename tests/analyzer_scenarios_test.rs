//! End-to-end posture scenarios through the public API.
//!
//! Run: cargo test --test analyzer_scenarios_test

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use approx::assert_abs_diff_eq;
use posture_viz::prelude::*;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

const W: u32 = 1280;
const H: u32 = 720;

/// Landmark centred on pixel `(x, y)` of a `W` x `H` frame.
fn at(x: i32, y: i32) -> Landmark {
    Landmark::new(
        (x as f32 + 0.5) / W as f32,
        (y as f32 + 0.5) / H as f32,
        0.97,
    )
}

fn pose(points: &[(LandmarkKind, i32, i32)]) -> Pose {
    let mut landmarks = vec![Landmark::new(0.0, 0.0, 0.01); 33];
    for &(kind, x, y) in points {
        landmarks[kind.index()] = at(x, y);
    }
    Pose::new(landmarks)
}

/// Seated subject facing the camera side-on, torso leaning forward.
fn leaning() -> Pose {
    pose(&[
        (LandmarkKind::Nose, 700, 150),
        (LandmarkKind::LeftEar, 650, 140),
        (LandmarkKind::RightEar, 670, 140),
        (LandmarkKind::LeftShoulder, 580, 250),
        (LandmarkKind::RightShoulder, 640, 250),
        (LandmarkKind::LeftHip, 520, 500),
        (LandmarkKind::RightHip, 560, 500),
        (LandmarkKind::LeftKnee, 700, 500),
        (LandmarkKind::RightKnee, 740, 500),
    ])
}

#[test]
fn test_leaning_torso_warns_with_config_advice() {
    let yaml = r"
version: 1
thresholds:
  torso_lean: { good: 10, warn: 20 }
  head_forward: { good: 15, warn: 25 }
  neck_flex: { good: 20, warn: 35 }
  shoulder_sym: { good: 2, warn: 4 }
  ear_offset: { good: 3, warn: 6 }
advice:
  torso_lean: { warn: 'Lean back a little', poor: 'Sit upright' }
  head_forward: { warn: 'Chin in', poor: 'Head back' }
  neck_flex: { warn: 'Look up', poor: 'Raise the screen' }
  shoulder_sym: { warn: 'Relax shoulders', poor: 'Level shoulders' }
  ear_offset: { warn: 'Center head', poor: 'Stop tilting' }
";
    let config = Config::parse_yaml(yaml).unwrap();
    let mut analyzer = PostureAnalyzer::new(&config).unwrap();

    let outcome = analyzer.analyze(&leaning(), W, H).unwrap();
    let torso = outcome.metrics().unwrap().get(Metric::TorsoLean).unwrap();

    // hip_mid (540, 500) to neck_mid (610, 250): atan(70 / 250) ~ 15.6 degrees.
    assert_abs_diff_eq!(torso.raw, 15.64, epsilon = 0.05);
    assert_eq!(torso.classification.tier, Tier::Warning);
    assert_eq!(torso.classification.advice.as_deref(), Some("Lean back a little"));

    let m = outcome.metrics().unwrap();
    assert!(!m.is_standing);
    assert_abs_diff_eq!(m.leg_angle, 90.0, epsilon = 0.01);
}

#[test]
fn test_smoothing_lags_then_settles() {
    let mut analyzer = PostureAnalyzer::new(&Config::default()).unwrap();
    let upright = pose(&[
        (LandmarkKind::Nose, 610, 150),
        (LandmarkKind::LeftShoulder, 580, 250),
        (LandmarkKind::RightShoulder, 640, 250),
        (LandmarkKind::LeftHip, 590, 500),
        (LandmarkKind::RightHip, 630, 500),
    ]);

    let first = analyzer.analyze(&upright, W, H).unwrap();
    assert_abs_diff_eq!(
        first.metrics().unwrap().value(Metric::TorsoLean).unwrap(),
        0.0,
        epsilon = 1e-3
    );

    let lean_raw = analyzer
        .analyze(&leaning(), W, H)
        .unwrap()
        .metrics()
        .unwrap()
        .get(Metric::TorsoLean)
        .unwrap()
        .raw;

    let mut values = Vec::new();
    for _ in 0..5 {
        let outcome = analyzer.analyze(&leaning(), W, H).unwrap();
        values.push(outcome.metrics().unwrap().value(Metric::TorsoLean).unwrap());
    }

    assert!(values.windows(2).all(|w| w[1] >= w[0] - 1e-4));
    assert!(values[0] < lean_raw);
    assert_abs_diff_eq!(values[4], lean_raw, epsilon = 1e-3);
}

#[test]
fn test_invisible_nose_renders_nothing() {
    let mut analyzer = PostureAnalyzer::new(&Config::default()).unwrap();
    let mut landmarks = leaning().landmarks().to_vec();
    landmarks[LandmarkKind::Nose.index()].visibility = 0.04;

    let mut frame = Framebuffer::new(W, H).unwrap();
    let outcome = analyzer.analyze_and_render(&mut frame, Some(&Pose::new(landmarks)));

    assert_eq!(
        outcome,
        Analysis::Skipped(SkipReason::MissingAnchors(vec![LandmarkKind::Nose]))
    );
    assert!(frame.pixels().iter().all(|&b| b == 0));
}

#[test]
fn test_visibility_floor_is_inclusive() {
    let mut analyzer = PostureAnalyzer::new(&Config::default()).unwrap();
    let mut landmarks = leaning().landmarks().to_vec();
    landmarks[LandmarkKind::Nose.index()].visibility = 0.05;

    let outcome = analyzer.analyze(&Pose::new(landmarks), W, H).unwrap();
    assert!(matches!(outcome, Analysis::Full(_)));
}

#[test]
fn test_table_files_drive_classification() {
    let mut thresholds = NamedTempFile::new().unwrap();
    write!(
        thresholds,
        r#"{{
            "torso_lean": {{"good": 30, "warn": 40}},
            "head_forward": {{"good": 15, "warn": 25}},
            "neck_flex": {{"good": 20, "warn": 35}},
            "shoulder_sym": {{"good": 2, "warn": 4}},
            "ear_offset": {{"good": 3, "warn": 6}}
        }}"#
    )
    .unwrap();

    let mut advice = NamedTempFile::new().unwrap();
    let entries: Vec<String> = Metric::ALL
        .iter()
        .map(|m| format!(r#""{m}": {{"warn": "w", "poor": "p"}}"#))
        .collect();
    write!(advice, "{{{}}}", entries.join(",")).unwrap();

    let config = Config::from_table_files(thresholds.path(), advice.path()).unwrap();
    let mut analyzer = PostureAnalyzer::new(&config).unwrap();
    let outcome = analyzer.analyze(&leaning(), W, H).unwrap();
    let torso = outcome.metrics().unwrap().get(Metric::TorsoLean).unwrap();
    assert_eq!(torso.classification.tier, Tier::Good);
}

#[test]
fn test_incomplete_tables_fail_at_startup() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"thresholds": {"torso_lean": {"good": 1, "warn": 2}}, "advice": {}}"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert!(matches!(
        PostureAnalyzer::new(&config),
        Err(Error::MissingConfigKey { .. })
    ));
}

#[test]
fn test_panel_painted_top_right() {
    let mut analyzer = PostureAnalyzer::new(&Config::default()).unwrap();
    let mut frame = Framebuffer::new(W, H).unwrap();
    frame.clear(Rgba::WHITE);

    let outcome = analyzer.analyze_and_render(&mut frame, Some(&leaning()));
    let panel = &outcome.report().unwrap().panel;
    assert_eq!(panel.rows().len(), 5);

    // Background right edge sits 10px from the frame edge.
    assert_eq!(frame.get_pixel(W - 11, 21), Some(palette::PANEL));
    assert_eq!(frame.get_pixel(W - 5, 21), Some(Rgba::WHITE));
    // First row's status bar carries the torso tier color.
    let torso_color = outcome
        .metrics()
        .unwrap()
        .get(Metric::TorsoLean)
        .unwrap()
        .classification
        .color;
    assert_eq!(frame.get_pixel(W - 480 - 10, 60), Some(torso_color));
}
