//! Exercise kinds
//!
//! The exercise is always supplied by the caller; there is no auto-detection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Supported exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    Squat,
    PushUp,
    BicepCurl,
    JumpingJack,
    Lunge,
}

impl ExerciseKind {
    pub const COUNT: usize = 5;

    pub fn all() -> &'static [ExerciseKind] {
        &[
            ExerciseKind::Squat,
            ExerciseKind::PushUp,
            ExerciseKind::BicepCurl,
            ExerciseKind::JumpingJack,
            ExerciseKind::Lunge,
        ]
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Canonical wire name
    pub fn as_str(self) -> &'static str {
        match self {
            ExerciseKind::Squat => "squat",
            ExerciseKind::PushUp => "pushup",
            ExerciseKind::BicepCurl => "bicep_curl",
            ExerciseKind::JumpingJack => "jumping_jack",
            ExerciseKind::Lunge => "lunge",
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "squat" | "squats" => Ok(ExerciseKind::Squat),
            "pushup" | "push_up" | "pushups" | "push_ups" => Ok(ExerciseKind::PushUp),
            "bicep_curl" | "biceps_curl" | "curl" | "bicep_curls" => Ok(ExerciseKind::BicepCurl),
            "jumping_jack" | "jumpingjack" | "jumping_jacks" => Ok(ExerciseKind::JumpingJack),
            "lunge" | "lunges" => Ok(ExerciseKind::Lunge),
            _ => Err(CoreError::UnknownExercise(s.to_string())),
        }
    }
}
