//! Body joint vocabulary
//!
//! The fixed set of named joints the rep engine can ask the detector for.
//! Anything the detector reports beyond these (eyes, fingers, heels) is
//! dropped at the boundary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Joint identifier for the tracked skeleton
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyJoint {
    Nose,

    // Arms
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,

    // Legs
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl BodyJoint {
    pub const COUNT: usize = 13;

    /// All joints in index order
    pub fn all() -> &'static [BodyJoint] {
        &[
            BodyJoint::Nose,
            BodyJoint::LeftShoulder,
            BodyJoint::RightShoulder,
            BodyJoint::LeftElbow,
            BodyJoint::RightElbow,
            BodyJoint::LeftWrist,
            BodyJoint::RightWrist,
            BodyJoint::LeftHip,
            BodyJoint::RightHip,
            BodyJoint::LeftKnee,
            BodyJoint::RightKnee,
            BodyJoint::LeftAnkle,
            BodyJoint::RightAnkle,
        ]
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Map a MediaPipe BlazePose landmark index (33-point topology)
    pub fn from_mediapipe_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Nose),
            11 => Some(Self::LeftShoulder),
            12 => Some(Self::RightShoulder),
            13 => Some(Self::LeftElbow),
            14 => Some(Self::RightElbow),
            15 => Some(Self::LeftWrist),
            16 => Some(Self::RightWrist),
            23 => Some(Self::LeftHip),
            24 => Some(Self::RightHip),
            25 => Some(Self::LeftKnee),
            26 => Some(Self::RightKnee),
            27 => Some(Self::LeftAnkle),
            28 => Some(Self::RightAnkle),
            _ => None,
        }
    }

    /// Snake-case name, as used by detectors that address joints by name
    pub fn as_str(self) -> &'static str {
        match self {
            BodyJoint::Nose => "nose",
            BodyJoint::LeftShoulder => "left_shoulder",
            BodyJoint::RightShoulder => "right_shoulder",
            BodyJoint::LeftElbow => "left_elbow",
            BodyJoint::RightElbow => "right_elbow",
            BodyJoint::LeftWrist => "left_wrist",
            BodyJoint::RightWrist => "right_wrist",
            BodyJoint::LeftHip => "left_hip",
            BodyJoint::RightHip => "right_hip",
            BodyJoint::LeftKnee => "left_knee",
            BodyJoint::RightKnee => "right_knee",
            BodyJoint::LeftAnkle => "left_ankle",
            BodyJoint::RightAnkle => "right_ankle",
        }
    }
}

impl fmt::Display for BodyJoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BodyJoint {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        BodyJoint::all()
            .iter()
            .copied()
            .find(|joint| joint.as_str() == normalized)
            .ok_or_else(|| CoreError::UnknownJoint(s.to_string()))
    }
}
