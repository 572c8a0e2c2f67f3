//! The shipped demo configuration and recording stay loadable and consistent.
//!
//! Run: cargo test --test demo_files_test

#![allow(clippy::unwrap_used)]

use posture_viz::prelude::*;
use std::path::PathBuf;

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}

#[test]
fn test_demo_yaml_matches_builtin_tables() {
    let config = Config::load(demo("config.yaml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_demo_table_files_match_builtin_tables() {
    let config =
        Config::from_table_files(demo("thresholds.json"), demo("advice.json")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_demo_recording_replays() {
    let recording = Recording::load(demo("recording.json")).unwrap();
    let (width, height) = (recording.width.unwrap(), recording.height.unwrap());
    let stamps: Vec<u64> = recording
        .frames
        .iter()
        .map(|f| f.timestamp_ms.unwrap())
        .collect();

    let analyzer = PostureAnalyzer::new(&Config::default()).unwrap();
    let mut pipeline = FramePipeline::new(ReplayDetector::new(recording), analyzer);

    let mut kinds = Vec::new();
    for ts in stamps {
        let mut frame = Framebuffer::new(width, height).unwrap();
        let outcome = pipeline.process_at(&mut frame, ts);
        kinds.push(match outcome.analysis {
            Analysis::Full(_) => 'F',
            Analysis::Partial(_) => 'P',
            Analysis::Skipped(SkipReason::DetectionFailed(_)) => 'E',
            Analysis::Skipped(SkipReason::NoPose) => '-',
            Analysis::Skipped(_) => '?',
        });
    }

    assert_eq!(kinds.iter().collect::<String>(), "FFFFFFFFFFFFE-PPPP");
}
