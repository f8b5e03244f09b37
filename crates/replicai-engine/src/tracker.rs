//! Tracker - per-session repetition state

use replicai_coach::AdvisorySlot;

use crate::feedback;

/// Phase of the movement cycle
///
/// `Idle` is only the initial value; for transitions it behaves like `Return`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Idle,
    Peak,
    Return,
}

/// How a completed repetition was judged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepVerdict {
    Good,
    Bad,
    Uncertain,
}

/// Repetition state for one session
#[derive(Debug)]
pub struct Tracker {
    pub(crate) stage: Stage,
    pub(crate) angle: f32,
    pub(crate) good_reps: u32,
    pub(crate) bad_reps: u32,
    pub(crate) uncertain_reps: u32,
    pub(crate) feedback: String,
    /// Carried from the peak frame to the rep's completion
    pub(crate) last_rep_confidence: f32,
    pub(crate) last_rep_form_ok: bool,
    pub(crate) form_issue: Option<&'static str>,
    pub(crate) is_new_rep: bool,
    pub(crate) advisory: AdvisorySlot,
}

impl Tracker {
    pub fn new() -> Self {
        Self::with_advisory(AdvisorySlot::default())
    }

    /// Fresh tracker whose advisory text starts as `default_text`
    pub fn with_advisory_text(default_text: impl Into<String>) -> Self {
        Self::with_advisory(AdvisorySlot::new(default_text))
    }

    fn with_advisory(advisory: AdvisorySlot) -> Self {
        Tracker {
            stage: Stage::Idle,
            angle: 0.0,
            good_reps: 0,
            bad_reps: 0,
            uncertain_reps: 0,
            feedback: feedback::READY.to_string(),
            last_rep_confidence: 1.0,
            last_rep_form_ok: false,
            form_issue: None,
            is_new_rep: false,
            advisory,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Most recently computed primary angle, degrees
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn good_reps(&self) -> u32 {
        self.good_reps
    }

    pub fn bad_reps(&self) -> u32 {
        self.bad_reps
    }

    pub fn uncertain_reps(&self) -> u32 {
        self.uncertain_reps
    }

    pub fn total_reps(&self) -> u32 {
        self.good_reps + self.bad_reps + self.uncertain_reps
    }

    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    pub fn last_rep_confidence(&self) -> f32 {
        self.last_rep_confidence
    }

    pub fn last_rep_form_ok(&self) -> bool {
        self.last_rep_form_ok
    }

    pub fn form_issue(&self) -> Option<&'static str> {
        self.form_issue
    }

    /// True only on the frame that completed a repetition
    pub fn is_new_rep(&self) -> bool {
        self.is_new_rep
    }

    /// Good reps as a percentage of judged reps; uncertain reps are excluded
    pub fn accuracy(&self) -> f32 {
        accuracy(self.good_reps, self.bad_reps)
    }

    pub fn advisory(&self) -> &AdvisorySlot {
        &self.advisory
    }

    pub fn advisory_mut(&mut self) -> &mut AdvisorySlot {
        &mut self.advisory
    }

    pub(crate) fn set_feedback(&mut self, text: &str) {
        self.feedback.clear();
        self.feedback.push_str(text);
    }

    /// Frame had no usable person: no transition, counters untouched
    pub(crate) fn no_detection(&mut self) {
        self.is_new_rep = false;
        self.set_feedback(feedback::NO_PERSON);
    }

    pub(crate) fn record(&mut self, verdict: RepVerdict) {
        match verdict {
            RepVerdict::Good => self.good_reps += 1,
            RepVerdict::Bad => self.bad_reps += 1,
            RepVerdict::Uncertain => self.uncertain_reps += 1,
        }
    }
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new()
    }
}

/// `good / (good + bad) * 100`, 0 when nothing has been judged
pub fn accuracy(good: u32, bad: u32) -> f32 {
    let judged = good + bad;
    if judged == 0 {
        0.0
    } else {
        good as f32 / judged as f32 * 100.0
    }
}
