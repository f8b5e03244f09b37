//! Frame dispatch
//!
//! Routes one frame to the right exercise profile. Absent landmarks and
//! unknown exercise names never reach the state machine; they are absorbed
//! into feedback text and leave the counters untouched.

use replicai_coach::{TipDecision, TipRequester};
use replicai_core::{CoreError, ExerciseKind, LandmarkSet};
use tracing::{debug, warn};

use crate::{advance, ExerciseProfile, ResultSnapshot, Tracker};

/// Profiles for every exercise plus the coaching requester
#[derive(Debug, Clone)]
pub struct Dispatcher {
    profiles: [ExerciseProfile; ExerciseKind::COUNT],
    requester: TipRequester,
}

impl Dispatcher {
    pub fn new(requester: TipRequester) -> Self {
        Self {
            profiles: [
                ExerciseProfile::squat(),
                ExerciseProfile::push_up(),
                ExerciseProfile::bicep_curl(),
                ExerciseProfile::jumping_jack(),
                ExerciseProfile::lunge(),
            ],
            requester,
        }
    }

    /// Replace the built-in profile for `profile.kind`
    pub fn with_profile(mut self, profile: ExerciseProfile) -> Self {
        self.profiles[profile.kind.index()] = profile;
        self
    }

    pub fn profile(&self, kind: ExerciseKind) -> &ExerciseProfile {
        &self.profiles[kind.index()]
    }

    pub fn requester(&self) -> &TipRequester {
        &self.requester
    }

    /// Process one frame for an exercise named by the caller
    pub fn dispatch(
        &self,
        tracker: &mut Tracker,
        exercise: &str,
        landmarks: Option<&LandmarkSet>,
        image: &[u8],
    ) -> ResultSnapshot {
        match exercise.parse::<ExerciseKind>() {
            Ok(kind) => self.dispatch_kind(tracker, kind, landmarks, image),
            Err(e) => {
                debug!(exercise, "unknown exercise requested");
                tracker.advisory_mut().poll();
                tracker.is_new_rep = false;
                tracker.set_feedback(&e.to_string());
                ResultSnapshot::of(tracker)
            }
        }
    }

    /// Process one frame for a known exercise
    pub fn dispatch_kind(
        &self,
        tracker: &mut Tracker,
        kind: ExerciseKind,
        landmarks: Option<&LandmarkSet>,
        image: &[u8],
    ) -> ResultSnapshot {
        tracker.advisory_mut().poll();

        let Some(landmarks) = landmarks else {
            tracker.no_detection();
            return ResultSnapshot::of(tracker);
        };

        let profile = self.profile(kind);
        match advance(profile, tracker, landmarks) {
            Ok(outcome) => {
                if let Some(prompt) = outcome.coaching_prompt {
                    let slot = tracker.advisory_mut();
                    let decision = self.requester.request_tip(slot, image, prompt);
                    if decision == TipDecision::Issued {
                        debug!(exercise = kind.as_str(), "coaching tip requested");
                    }
                }
            }
            Err(CoreError::MalformedLandmark(joint)) => {
                warn!(
                    exercise = kind.as_str(),
                    %joint,
                    "malformed landmark treated as no detection"
                );
                tracker.no_detection();
            }
            Err(e) if e.is_detection_gap() => {
                debug!(exercise = kind.as_str(), error = %e, "frame without a usable person");
                tracker.no_detection();
            }
            Err(e) => {
                warn!(exercise = kind.as_str(), error = %e, "frame rejected");
                tracker.no_detection();
            }
        }

        ResultSnapshot::of(tracker)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(TipRequester::disabled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{feedback, Stage};
    use futures::future::{BoxFuture, FutureExt};
    use replicai_coach::{AdvisoryResult, AdvisoryService, CoachConfig};
    use replicai_core::ExerciseKind::{BicepCurl, Squat};
    use replicai_core::{BodyJoint, Landmark};
    use replicai_test::PoseSynth;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingService {
        calls: AtomicUsize,
    }

    impl AdvisoryService for CountingService {
        fn generate(
            &self,
            _image: Vec<u8>,
            _prompt: String,
        ) -> BoxFuture<'static, AdvisoryResult<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            async { Ok("Brace your core".to_string()) }.boxed()
        }
    }

    #[test]
    fn test_unknown_exercise() {
        let dispatcher = Dispatcher::default();
        let mut tracker = Tracker::new();

        let snapshot = dispatcher.dispatch(&mut tracker, "burpee", None, b"");
        assert_eq!(snapshot.feedback, "Unknown exercise: burpee");
        assert_eq!(snapshot.total_reps(), 0);
        assert_eq!(tracker.stage(), Stage::Idle);
    }

    #[test]
    fn test_aliases_route() {
        let dispatcher = Dispatcher::default();
        let mut tracker = Tracker::new();
        let frame = PoseSynth::new().push_up(170.0, false);

        let snapshot = dispatcher.dispatch(&mut tracker, "push-up", Some(&frame), b"");
        assert_eq!(snapshot.feedback, ExerciseProfile::push_up().cues.start);
    }

    #[test]
    fn test_absent_landmarks() {
        let dispatcher = Dispatcher::default();
        let mut tracker = Tracker::new();
        let synth = PoseSynth::new();
        dispatcher.dispatch_kind(&mut tracker, Squat, Some(&synth.squat(95.0, 80.0)), b"");

        for _ in 0..5 {
            let snapshot = dispatcher.dispatch_kind(&mut tracker, Squat, None, b"");
            assert_eq!(snapshot.feedback, feedback::NO_PERSON);
            assert_eq!(snapshot.total_reps(), 0);
            assert!((snapshot.angle - 95.0).abs() < 0.01);
        }
        assert_eq!(tracker.stage(), Stage::Peak);

        let snapshot =
            dispatcher.dispatch_kind(&mut tracker, Squat, Some(&synth.squat(170.0, 170.0)), b"");
        assert_eq!(snapshot.good_reps, 1);
        assert!(snapshot.is_new_rep);
    }

    #[test]
    fn test_malformed_landmark_is_no_detection() {
        let dispatcher = Dispatcher::default();
        let mut tracker = Tracker::new();
        let mut frame = PoseSynth::new().bicep_curl(35.0);
        frame.insert(BodyJoint::LeftElbow, Landmark::new(f32::NAN, 0.5, 0.9));

        let snapshot = dispatcher.dispatch_kind(&mut tracker, BicepCurl, Some(&frame), b"");
        assert_eq!(snapshot.feedback, feedback::NO_PERSON);
        assert_eq!(tracker.stage(), Stage::Idle);
    }

    #[test]
    fn test_with_profile_overrides() {
        let mut strict = ExerciseProfile::bicep_curl();
        strict.thresholds.confidence = 0.99;
        let dispatcher = Dispatcher::default().with_profile(strict);
        assert_eq!(dispatcher.profile(BicepCurl).thresholds.confidence, 0.99);
        assert_eq!(dispatcher.profile(Squat).thresholds.confidence, 0.75);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bad_form_requests_one_tip() {
        let service = Arc::new(CountingService {
            calls: AtomicUsize::new(0),
        });
        let requester = TipRequester::new(service.clone(), CoachConfig::default());
        let dispatcher = Dispatcher::new(requester);
        let synth = PoseSynth::new();
        let mut tracker = Tracker::new();

        for _ in 0..3 {
            dispatcher.dispatch_kind(&mut tracker, Squat, Some(&synth.squat(170.0, 170.0)), b"img");
            dispatcher.dispatch_kind(&mut tracker, Squat, Some(&synth.squat(95.0, 50.0)), b"img");
        }
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.bad_reps(), 2);

        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
        let snapshot = dispatcher.dispatch_kind(&mut tracker, Squat, None, b"");
        assert_eq!(snapshot.advisory_text, "Brace your core");
    }

    #[tokio::test(start_paused = true)]
    async fn test_good_form_requests_nothing() {
        let service = Arc::new(CountingService {
            calls: AtomicUsize::new(0),
        });
        let requester = TipRequester::new(service.clone(), CoachConfig::default());
        let dispatcher = Dispatcher::new(requester);
        let synth = PoseSynth::new();
        let mut tracker = Tracker::new();

        dispatcher.dispatch_kind(&mut tracker, Squat, Some(&synth.squat(95.0, 80.0)), b"img");
        dispatcher.dispatch_kind(&mut tracker, BicepCurl, Some(&synth.bicep_curl(30.0)), b"img");
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    }
}
