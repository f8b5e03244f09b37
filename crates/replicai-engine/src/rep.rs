//! Generic peak/return repetition state machine

use replicai_core::{visibility_confidence, CoreResult, LandmarkSet};
use tracing::debug;

use crate::feedback;
use crate::profile::{ExerciseProfile, FormVerdict};
use crate::tracker::{RepVerdict, Stage, Tracker};

/// What one frame did to the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepOutcome {
    /// Set on the frame that completed a repetition
    pub completed: Option<RepVerdict>,
    /// Set when the peak was entered with faulty form and the exercise
    /// asks for coaching
    pub coaching_prompt: Option<&'static str>,
}

/// Advance `tracker` by one frame of `landmarks` under `profile`
///
/// Every landmark the profile needs is read before the tracker is touched,
/// so an `Err` leaves the tracker exactly as it was.
pub fn advance(
    profile: &ExerciseProfile,
    tracker: &mut Tracker,
    landmarks: &LandmarkSet,
) -> CoreResult<StepOutcome> {
    let thresholds = &profile.thresholds;
    let measurement = (profile.measure)(landmarks, thresholds)?;
    let waiting_for_peak = matches!(tracker.stage, Stage::Idle | Stage::Return);

    if waiting_for_peak && measurement.at_peak {
        let verdict = (profile.form)(landmarks, thresholds)?;
        let confidence = visibility_confidence(landmarks, profile.key_joints);

        tracker.angle = measurement.angle;
        tracker.stage = Stage::Peak;
        tracker.last_rep_confidence = confidence;
        tracker.is_new_rep = false;

        return Ok(match verdict {
            FormVerdict::Sound => {
                tracker.last_rep_form_ok = true;
                tracker.form_issue = None;
                tracker.set_feedback(profile.cues.peak);
                StepOutcome::default()
            }
            FormVerdict::Fault(issue) => {
                tracker.last_rep_form_ok = false;
                tracker.form_issue = Some(issue);
                tracker.set_feedback(issue);
                StepOutcome {
                    completed: None,
                    coaching_prompt: profile.coaching_prompt,
                }
            }
        });
    }

    tracker.angle = measurement.angle;

    if tracker.stage == Stage::Peak && measurement.at_return {
        let confidence = tracker.last_rep_confidence;
        let verdict = if confidence < thresholds.confidence {
            tracker.set_feedback(feedback::UNCERTAIN_REP);
            RepVerdict::Uncertain
        } else if tracker.last_rep_form_ok {
            tracker.set_feedback(profile.cues.good_rep);
            RepVerdict::Good
        } else {
            let text = tracker.form_issue.unwrap_or(profile.cues.bad_rep);
            tracker.set_feedback(text);
            RepVerdict::Bad
        };

        tracker.record(verdict);
        tracker.stage = Stage::Return;
        tracker.is_new_rep = true;
        tracker.last_rep_form_ok = false;
        tracker.last_rep_confidence = 1.0;
        tracker.form_issue = None;

        debug!(
            exercise = profile.kind.as_str(),
            ?verdict,
            confidence,
            total = tracker.total_reps(),
            "repetition completed"
        );
        return Ok(StepOutcome {
            completed: Some(verdict),
            coaching_prompt: None,
        });
    }

    let cue = match tracker.stage {
        Stage::Idle => profile.cues.start,
        Stage::Peak => profile.cues.hold_peak,
        Stage::Return => profile.cues.hold_return,
    };
    tracker.set_feedback(cue);
    tracker.is_new_rep = false;
    Ok(StepOutcome::default())
}
