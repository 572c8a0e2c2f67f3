//! Detector skeleton overlay.
//!
//! Drawn for every detected pose, independent of posture analysis.

use crate::color::{palette, Rgba};
use crate::landmark::{LandmarkKind, Pose, COORDINATE_RANGE};
use crate::render::DrawCommand;

/// Landmark pairs joined by a bone: arms, torso, legs.
pub const POSE_CONNECTIONS: [(LandmarkKind, LandmarkKind); 12] = {
    use LandmarkKind::{
        LeftAnkle, LeftElbow, LeftHip, LeftKnee, LeftShoulder, LeftWrist, RightAnkle,
        RightElbow, RightHip, RightKnee, RightShoulder, RightWrist,
    };
    [
        (LeftShoulder, RightShoulder),
        (LeftShoulder, LeftElbow),
        (LeftElbow, LeftWrist),
        (RightShoulder, RightElbow),
        (RightElbow, RightWrist),
        (LeftShoulder, LeftHip),
        (RightShoulder, RightHip),
        (LeftHip, RightHip),
        (LeftHip, LeftKnee),
        (LeftKnee, LeftAnkle),
        (RightHip, RightKnee),
        (RightKnee, RightAnkle),
    ]
};

/// Stroke and marker settings for the skeleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkeletonStyle {
    /// Bone color.
    pub bone_color: Rgba,
    /// Bone width in pixels.
    pub bone_thickness: u32,
    /// Joint marker color.
    pub joint_color: Rgba,
    /// Joint marker radius in pixels.
    pub joint_radius: u32,
}

impl Default for SkeletonStyle {
    fn default() -> Self {
        Self {
            bone_color: palette::SKELETON,
            bone_thickness: 5,
            joint_color: palette::JOINT,
            joint_radius: 8,
        }
    }
}

/// Bones then joint markers for one pose.
///
/// Landmarks are projected without a visibility gate. Non-finite landmarks
/// and those outside [`COORDINATE_RANGE`] are dropped. Connections
/// referring past the end of the pose are skipped.
#[must_use]
pub fn skeleton_commands(
    pose: &Pose,
    width: u32,
    height: u32,
    style: &SkeletonStyle,
) -> Vec<DrawCommand> {
    let points: Vec<_> = pose
        .landmarks()
        .iter()
        .map(|lm| {
            if lm.in_range() {
                lm.to_pixel(width, height, f32::NEG_INFINITY)
            } else {
                None
            }
        })
        .collect();

    let mut commands = Vec::with_capacity(POSE_CONNECTIONS.len() + points.len());

    for (a, b) in POSE_CONNECTIONS {
        let (Some(Some(from)), Some(Some(to))) = (points.get(a.index()), points.get(b.index()))
        else {
            continue;
        };
        commands.push(DrawCommand::Line {
            from: *from,
            to: *to,
            color: style.bone_color,
            thickness: style.bone_thickness,
        });
    }

    commands.extend(points.iter().flatten().map(|center| DrawCommand::Circle {
        center: *center,
        radius: style.joint_radius,
        color: style.joint_color,
    }));

    commands
}
