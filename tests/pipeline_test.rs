//! Replay a recorded detection stream through the full frame pipeline.
//!
//! Run: cargo test --test pipeline_test

#![allow(clippy::unwrap_used)]

use posture_viz::prelude::*;
use posture_viz::skeleton::SkeletonStyle;
use tempfile::TempDir;

const W: u32 = 1280;
const H: u32 = 720;

fn seated_pose_json(shift: f32) -> String {
    let mut landmarks = vec![(0.5, 0.5, 0.9); 33];
    let mut set = |kind: LandmarkKind, x: f32, y: f32| {
        landmarks[kind.index()] = (x + shift, y, 0.95);
    };
    set(LandmarkKind::Nose, 0.40, 0.20);
    set(LandmarkKind::LeftEar, 0.38, 0.18);
    set(LandmarkKind::RightEar, 0.42, 0.18);
    set(LandmarkKind::LeftShoulder, 0.35, 0.35);
    set(LandmarkKind::RightShoulder, 0.45, 0.35);
    set(LandmarkKind::LeftHip, 0.36, 0.70);
    set(LandmarkKind::RightHip, 0.44, 0.70);

    let points: Vec<String> = landmarks
        .iter()
        .map(|(x, y, v)| format!(r#"{{"x": {x}, "y": {y}, "visibility": {v}}}"#))
        .collect();
    format!("[{}]", points.join(", "))
}

fn recording() -> Recording {
    let json = format!(
        r#"{{
            "width": {W},
            "height": {H},
            "frames": [
                {{ "timestamp_ms": 1000, "poses": [{a}] }},
                {{ "timestamp_ms": 1000, "poses": [{b}, {a}] }},
                {{ "timestamp_ms": 1040, "error": "inference timeout" }},
                {{ "timestamp_ms": 1080, "poses": [] }}
            ]
        }}"#,
        a = seated_pose_json(0.0),
        b = seated_pose_json(0.02),
    );
    Recording::parse(&json).unwrap()
}

fn canvas() -> Framebuffer {
    let mut fb = Framebuffer::new(W, H).unwrap();
    fb.clear(Rgba::BLACK);
    fb
}

#[test]
fn test_replay_outcomes_in_order() {
    let analyzer = PostureAnalyzer::new(&Config::default()).unwrap();
    let rec = recording();
    let stamps: Vec<u64> = rec.frames.iter().map(|f| f.timestamp_ms.unwrap()).collect();
    let mut pipeline = FramePipeline::new(ReplayDetector::new(rec), analyzer);

    let outcomes: Vec<_> = stamps
        .into_iter()
        .map(|ts| {
            let mut frame = canvas();
            let outcome = pipeline.process_at(&mut frame, ts);
            (outcome, frame)
        })
        .collect();

    // Duplicate clock reading is bumped.
    let times: Vec<u64> = outcomes.iter().map(|(o, _)| o.timestamp_ms).collect();
    assert_eq!(times, vec![1000, 1001, 1040, 1080]);

    assert!(matches!(outcomes[0].0.analysis, Analysis::Full(_)));
    assert_eq!(outcomes[1].0.poses, 2);
    assert!(matches!(
        outcomes[2].0.analysis,
        Analysis::Skipped(SkipReason::DetectionFailed(_))
    ));
    assert_eq!(outcomes[3].0.analysis, Analysis::Skipped(SkipReason::NoPose));

    // Failed detection and empty detection leave the canvas as it was.
    let blank = canvas();
    assert_eq!(outcomes[2].1.pixels(), blank.pixels());
    assert_eq!(outcomes[3].1.pixels(), blank.pixels());

    // Unplaced landmarks sit at the frame centre and get joint markers.
    assert_eq!(
        outcomes[0].1.get_pixel(W / 2 + 6, H / 2),
        Some(palette::JOINT)
    );

    // Only the two analyzed frames fed the smoothing windows.
    assert_eq!(
        pipeline.analyzer().smoothing().window(Metric::TorsoLean).len(),
        2
    );
}

#[test]
fn test_custom_skeleton_style() {
    let analyzer = PostureAnalyzer::new(&Config::default()).unwrap();
    let style = SkeletonStyle {
        joint_color: palette::POOR,
        joint_radius: 2,
        ..SkeletonStyle::default()
    };
    let mut pipeline =
        FramePipeline::new(ReplayDetector::new(recording()), analyzer).with_skeleton_style(style);

    let mut frame = canvas();
    pipeline.process_at(&mut frame, 1);

    // Joint markers at the frame centre, clear of the hip-to-knee guide.
    assert_eq!(frame.get_pixel(W / 2 + 2, H / 2 - 1), Some(palette::POOR));
    assert_eq!(frame.get_pixel(W / 2 + 6, H / 2), Some(Rgba::BLACK));
}

#[test]
fn test_rendered_frames_written_as_png() {
    let dir = TempDir::new().unwrap();
    let analyzer = PostureAnalyzer::new(&Config::default()).unwrap();
    let mut pipeline = FramePipeline::new(ReplayDetector::new(recording()), analyzer);

    for i in 0..4u64 {
        let mut frame = canvas();
        pipeline.process_at(&mut frame, i * 40);
        PngEncoder::write_to_file(&frame, dir.path().join(format!("frame_{i:05}.png"))).unwrap();
    }

    let first = PngDecoder::read_file(dir.path().join("frame_00000.png")).unwrap();
    assert_eq!((first.width(), first.height()), (W, H));
    let last = PngDecoder::read_file(dir.path().join("frame_00003.png")).unwrap();
    assert_eq!(last.pixels(), canvas().pixels());
}
