//! Completed-workout summary

use std::time::Duration;

use replicai_core::ExerciseKind;
use serde::Serialize;
use tokio::time::Instant;

use crate::SessionEntry;

/// What a finished workout reports to whoever persists it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutSummary {
    /// Exercise of the last recognised frame, if any
    pub exercise: Option<ExerciseKind>,
    pub good_reps: u32,
    pub bad_reps: u32,
    pub uncertain_reps: u32,
    pub total_reps: u32,
    pub duration_seconds: u64,
    /// Mean accuracy over rep-completing frames, rounded to 1 decimal
    pub average_accuracy: f32,
}

impl WorkoutSummary {
    pub fn from_session(session: &SessionEntry, now: Instant) -> Self {
        let tracker = session.tracker();
        Self {
            exercise: session.exercise(),
            good_reps: tracker.good_reps(),
            bad_reps: tracker.bad_reps(),
            uncertain_reps: tracker.uncertain_reps(),
            total_reps: tracker.total_reps(),
            duration_seconds: now.saturating_duration_since(session.started_at()).as_secs(),
            average_accuracy: average_accuracy(session.accuracy_samples()),
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_seconds)
    }
}

fn average_accuracy(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let mean = samples.iter().sum::<f32>() / samples.len() as f32;
    (mean * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_accuracy() {
        assert_eq!(average_accuracy(&[]), 0.0);
        assert_eq!(average_accuracy(&[100.0, 50.0]), 75.0);
        assert_eq!(average_accuracy(&[100.0, 50.0, 66.666_67]), 72.2);
    }
}
