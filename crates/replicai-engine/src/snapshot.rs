//! Result snapshot returned for every processed frame

use serde::Serialize;

use crate::Tracker;

/// Immutable view of a tracker's externally relevant fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSnapshot {
    pub good_reps: u32,
    pub bad_reps: u32,
    pub uncertain_reps: u32,
    pub feedback: String,
    /// Degrees, rounded to 2 decimals
    pub angle: f32,
    /// Percent, rounded to 1 decimal
    pub accuracy: f32,
    pub advisory_text: String,
    pub is_new_rep: bool,
}

impl ResultSnapshot {
    pub fn of(tracker: &Tracker) -> Self {
        Self {
            good_reps: tracker.good_reps(),
            bad_reps: tracker.bad_reps(),
            uncertain_reps: tracker.uncertain_reps(),
            feedback: tracker.feedback().to_string(),
            angle: round_to(tracker.angle(), 2),
            accuracy: round_to(tracker.accuracy(), 1),
            advisory_text: tracker.advisory().text().to_string(),
            is_new_rep: tracker.is_new_rep(),
        }
    }

    pub fn total_reps(&self) -> u32 {
        self.good_reps + self.bad_reps + self.uncertain_reps
    }
}

impl From<&Tracker> for ResultSnapshot {
    fn from(tracker: &Tracker) -> Self {
        Self::of(tracker)
    }
}

pub(crate) fn round_to(value: f32, decimals: i32) -> f32 {
    let scale = 10f32.powi(decimals);
    (value * scale).round() / scale
}
