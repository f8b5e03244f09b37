//! Pose synthesizer
//!
//! Builds landmark sets whose governing joint angles are exactly the ones
//! asked for, so exercise state machines can be driven frame by frame
//! without a camera.

use rand::Rng;
use replicai_core::{BodyJoint, Landmark, LandmarkSet, Point2};

/// Point `c` such that the angle at `vertex` between `toward` and `c` is
/// `angle_deg`, at distance `length` from `vertex`
pub fn at_angle(vertex: Point2, toward: Point2, angle_deg: f32, length: f32) -> Point2 {
    let dx = toward.x - vertex.x;
    let dy = toward.y - vertex.y;
    let norm = (dx * dx + dy * dy).sqrt().max(f32::EPSILON);
    let (ux, uy) = (dx / norm, dy / norm);

    let (sin, cos) = angle_deg.to_radians().sin_cos();
    Point2::new(
        vertex.x + length * (ux * cos - uy * sin),
        vertex.y + length * (ux * sin + uy * cos),
    )
}

/// Synthesizes single-frame poses for every supported exercise
#[derive(Debug, Clone, Copy)]
pub struct PoseSynth {
    visibility: f32,
}

impl Default for PoseSynth {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseSynth {
    pub fn new() -> Self {
        Self { visibility: 0.95 }
    }

    /// Visibility assigned to every placed joint
    pub fn with_visibility(visibility: f32) -> Self {
        Self { visibility }
    }

    pub fn visibility(&self) -> f32 {
        self.visibility
    }

    fn place(&self, set: &mut LandmarkSet, joint: BodyJoint, p: Point2) {
        set.insert(joint, Landmark::new(p.x, p.y, self.visibility));
    }

    /// Side-on squat: knee angle at the left knee, back angle at the left hip
    pub fn squat(&self, knee_angle: f32, back_angle: f32) -> LandmarkSet {
        let mut set = LandmarkSet::new();
        let hip = Point2::new(0.5, 0.45);
        let knee = Point2::new(0.5, 0.65);
        let ankle = at_angle(knee, hip, knee_angle, 0.2);
        let shoulder = at_angle(hip, knee, back_angle, 0.25);

        self.place(&mut set, BodyJoint::LeftHip, hip);
        self.place(&mut set, BodyJoint::LeftKnee, knee);
        self.place(&mut set, BodyJoint::LeftAnkle, ankle);
        self.place(&mut set, BodyJoint::LeftShoulder, shoulder);
        set
    }

    /// Side-on push-up; `hips_sag` drops the hip below the shoulder line
    pub fn push_up(&self, elbow_angle: f32, hips_sag: bool) -> LandmarkSet {
        let mut set = LandmarkSet::new();
        let shoulder = Point2::new(0.3, 0.5);
        let elbow = Point2::new(0.32, 0.62);
        let wrist = at_angle(elbow, shoulder, elbow_angle, 0.12);
        let hip = if hips_sag {
            Point2::new(0.6, 0.58)
        } else {
            Point2::new(0.6, 0.47)
        };

        self.place(&mut set, BodyJoint::LeftShoulder, shoulder);
        self.place(&mut set, BodyJoint::LeftElbow, elbow);
        self.place(&mut set, BodyJoint::LeftWrist, wrist);
        self.place(&mut set, BodyJoint::LeftHip, hip);
        set
    }

    pub fn bicep_curl(&self, elbow_angle: f32) -> LandmarkSet {
        let mut set = LandmarkSet::new();
        let shoulder = Point2::new(0.5, 0.3);
        let elbow = Point2::new(0.5, 0.5);
        let wrist = at_angle(elbow, shoulder, elbow_angle, 0.18);

        self.place(&mut set, BodyJoint::LeftShoulder, shoulder);
        self.place(&mut set, BodyJoint::LeftElbow, elbow);
        self.place(&mut set, BodyJoint::LeftWrist, wrist);
        set
    }

    /// Front-on jumping jack with feet `ankle_separation` apart
    pub fn jumping_jack(&self, ankle_separation: f32, arms_up: bool) -> LandmarkSet {
        let mut set = LandmarkSet::new();
        let half = ankle_separation / 2.0;

        for (sign, shoulder_j, elbow_j, wrist_j, hip_j, ankle_j) in [
            (
                -1.0_f32,
                BodyJoint::LeftShoulder,
                BodyJoint::LeftElbow,
                BodyJoint::LeftWrist,
                BodyJoint::LeftHip,
                BodyJoint::LeftAnkle,
            ),
            (
                1.0_f32,
                BodyJoint::RightShoulder,
                BodyJoint::RightElbow,
                BodyJoint::RightWrist,
                BodyJoint::RightHip,
                BodyJoint::RightAnkle,
            ),
        ] {
            let shoulder = Point2::new(0.5 + sign * 0.05, 0.3);
            let hip = Point2::new(0.5 + sign * 0.04, 0.55);
            let (elbow, wrist) = if arms_up {
                (
                    Point2::new(0.5 + sign * 0.15, 0.18),
                    Point2::new(0.5 + sign * 0.17, 0.08),
                )
            } else {
                (
                    Point2::new(0.5 + sign * 0.08, 0.42),
                    Point2::new(0.5 + sign * 0.08, 0.52),
                )
            };

            self.place(&mut set, shoulder_j, shoulder);
            self.place(&mut set, elbow_j, elbow);
            self.place(&mut set, wrist_j, wrist);
            self.place(&mut set, hip_j, hip);
            self.place(&mut set, ankle_j, Point2::new(0.5 + sign * half, 0.9));
        }
        set
    }

    pub fn lunge(&self, left_knee_angle: f32, right_knee_angle: f32) -> LandmarkSet {
        let mut set = LandmarkSet::new();
        for (x, angle, hip_j, knee_j, ankle_j) in [
            (
                0.45,
                left_knee_angle,
                BodyJoint::LeftHip,
                BodyJoint::LeftKnee,
                BodyJoint::LeftAnkle,
            ),
            (
                0.55,
                right_knee_angle,
                BodyJoint::RightHip,
                BodyJoint::RightKnee,
                BodyJoint::RightAnkle,
            ),
        ] {
            let hip = Point2::new(x, 0.45);
            let knee = Point2::new(x, 0.65);
            self.place(&mut set, hip_j, hip);
            self.place(&mut set, knee_j, knee);
            self.place(&mut set, ankle_j, at_angle(knee, hip, angle, 0.2));
        }
        set
    }
}

/// Copy of `set` with every coordinate nudged by up to `amplitude`
pub fn jitter<R: Rng>(set: &LandmarkSet, amplitude: f32, rng: &mut R) -> LandmarkSet {
    LandmarkSet::from_pairs(set.iter().map(|(joint, l)| {
        let dx = rng.gen_range(-amplitude..=amplitude);
        let dy = rng.gen_range(-amplitude..=amplitude);
        (joint, Landmark::new(l.x + dx, l.y + dy, l.visibility))
    }))
}
