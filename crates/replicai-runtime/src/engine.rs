//! Workout engine - the frame entry point

use std::sync::{Arc, Weak};
use std::time::Duration;

use replicai_coach::{AdvisoryService, TipRequester};
use replicai_core::{ExerciseKind, LandmarkSet, PoseDetector, SessionId};
use replicai_engine::{Dispatcher, ResultSnapshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::{RuntimeConfig, SessionRegistry, WorkoutSummary};

/// Multi-session rep counting service
pub struct WorkoutEngine {
    config: RuntimeConfig,
    registry: SessionRegistry,
    dispatcher: Dispatcher,
    detector: Option<Arc<dyn PoseDetector>>,
}

impl WorkoutEngine {
    /// Engine without an advisory service; coaching requests are no-ops
    pub fn new(config: RuntimeConfig) -> Self {
        Self::with_dispatcher(config, Dispatcher::default())
    }

    /// Engine that sends bad-form coaching requests to `service`
    pub fn with_advisory(config: RuntimeConfig, service: Arc<dyn AdvisoryService>) -> Self {
        let requester = TipRequester::new(service, config.coach.clone());
        Self::with_dispatcher(config, Dispatcher::new(requester))
    }

    pub fn with_dispatcher(config: RuntimeConfig, dispatcher: Dispatcher) -> Self {
        Self {
            registry: SessionRegistry::new(config.coach.default_text.clone()),
            config,
            dispatcher,
            detector: None,
        }
    }

    /// Attach the pose detector used by [`WorkoutEngine::process_image`]
    pub fn with_detector(mut self, detector: Arc<dyn PoseDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Classify one frame for `session_id`
    ///
    /// `landmarks` is `None` when the detector found nobody. `image` is the
    /// raw frame, only forwarded to the advisory service.
    pub fn process_frame(
        &self,
        session_id: &SessionId,
        exercise: &str,
        landmarks: Option<&LandmarkSet>,
        image: &[u8],
    ) -> ResultSnapshot {
        let entry = self.registry.get_or_create(session_id);
        let mut session = entry.lock();

        let snapshot = self
            .dispatcher
            .dispatch(session.tracker_mut(), exercise, landmarks, image);
        session.observe(exercise.parse::<ExerciseKind>().ok(), &snapshot);
        snapshot
    }

    /// Run the attached detector on `image`, then classify the result
    ///
    /// A detector error or a missing detector counts as a frame without a
    /// person.
    pub fn process_image(
        &self,
        session_id: &SessionId,
        exercise: &str,
        image: &[u8],
    ) -> ResultSnapshot {
        let landmarks = match &self.detector {
            Some(detector) => match detector.detect(image) {
                Ok(landmarks) => landmarks,
                Err(e) => {
                    warn!(session = %session_id, error = %e, "pose detection failed");
                    None
                }
            },
            None => {
                warn!("process_image called without a pose detector");
                None
            }
        };
        self.process_frame(session_id, exercise, landmarks.as_ref(), image)
    }

    /// Current snapshot without processing a frame
    pub fn snapshot(&self, session_id: &SessionId) -> Option<ResultSnapshot> {
        let entry = self.registry.get(session_id)?;
        let mut session = entry.lock();
        session.tracker_mut().advisory_mut().poll();
        Some(ResultSnapshot::of(session.tracker()))
    }

    /// Fresh tracker for `session_id`; false if the session is unknown
    pub fn reset(&self, session_id: &SessionId) -> bool {
        self.registry.reset(session_id)
    }

    /// Summarise the session's workout, then reset it
    pub fn save_workout(&self, session_id: &SessionId) -> Option<WorkoutSummary> {
        let entry = self.registry.get(session_id)?;
        let summary = WorkoutSummary::from_session(&entry.lock(), Instant::now());
        self.registry.reset(session_id);

        info!(
            session = %session_id,
            exercise = ?summary.exercise,
            total_reps = summary.total_reps,
            average_accuracy = summary.average_accuracy,
            "workout saved"
        );
        Some(summary)
    }

    pub fn evict(&self, session_id: &SessionId) -> bool {
        self.registry.evict(session_id)
    }

    /// Evict sessions idle longer than the configured timeout
    pub fn sweep_idle(&self) -> usize {
        self.registry
            .sweep_idle(self.config.idle_timeout, Instant::now())
            .len()
    }

    /// Run [`WorkoutEngine::sweep_idle`] every `sweep_interval` on the
    /// current tokio runtime until the engine is dropped
    pub fn spawn_idle_sweeper(self: &Arc<Self>) -> JoinHandle<()> {
        let engine: Weak<Self> = Arc::downgrade(self);
        let period = self.config.sweep_interval.max(Duration::from_millis(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(engine) = engine.upgrade() else {
                    break; // Engine dropped
                };
                let evicted = engine.sweep_idle();
                if evicted > 0 {
                    debug!(evicted, remaining = engine.registry.len(), "idle sweep");
                }
            }
        })
    }
}

impl std::fmt::Debug for WorkoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkoutEngine")
            .field("config", &self.config)
            .field("sessions", &self.registry.len())
            .field("has_detector", &self.detector.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::{BoxFuture, FutureExt};
    use replicai_coach::AdvisoryResult;
    use replicai_core::CoreError;
    use replicai_engine::feedback;
    use replicai_test::PoseSynth;

    struct EchoService;

    impl AdvisoryService for EchoService {
        fn generate(
            &self,
            _image: Vec<u8>,
            prompt: String,
        ) -> BoxFuture<'static, AdvisoryResult<String>> {
            async move { Ok(format!("tip for {} chars", prompt.len())) }.boxed()
        }
    }

    fn squat_cycle(engine: &WorkoutEngine, id: &SessionId, back: f32) -> ResultSnapshot {
        let synth = PoseSynth::new();
        engine.process_frame(id, "squat", Some(&synth.squat(95.0, back)), b"jpeg");
        engine.process_frame(id, "squat", Some(&synth.squat(170.0, 170.0)), b"jpeg")
    }

    #[test]
    fn test_process_frame_creates_session() {
        let engine = WorkoutEngine::new(RuntimeConfig::default());
        let id = SessionId::new("alice");
        assert!(engine.snapshot(&id).is_none());

        let snapshot = squat_cycle(&engine, &id, 80.0);
        assert_eq!(snapshot.good_reps, 1);
        assert!(snapshot.is_new_rep);
        assert_eq!(engine.registry().len(), 1);
        assert_eq!(engine.snapshot(&id), Some(snapshot));
    }

    #[test]
    fn test_sessions_do_not_interfere() {
        let engine = WorkoutEngine::new(RuntimeConfig::default());
        let alice = SessionId::new("alice");
        let bob = SessionId::new("bob");

        squat_cycle(&engine, &alice, 80.0);
        squat_cycle(&engine, &alice, 50.0);
        let bob_snapshot = engine.process_frame(&bob, "squat", None, b"");

        assert_eq!(bob_snapshot.total_reps(), 0);
        let alice_snapshot = engine.snapshot(&alice).unwrap();
        assert_eq!((alice_snapshot.good_reps, alice_snapshot.bad_reps), (1, 1));
        assert_eq!(alice_snapshot.accuracy, 50.0);
    }

    #[test]
    fn test_save_workout_resets() {
        let engine = WorkoutEngine::new(RuntimeConfig::default());
        let id = SessionId::new("alice");
        assert!(engine.save_workout(&id).is_none());

        squat_cycle(&engine, &id, 80.0);
        squat_cycle(&engine, &id, 50.0);
        let summary = engine.save_workout(&id).unwrap();

        assert_eq!(summary.exercise, Some(ExerciseKind::Squat));
        assert_eq!(summary.total_reps, 2);
        assert_eq!((summary.good_reps, summary.bad_reps), (1, 1));
        // 100 after the first rep, 50 after the second
        assert_eq!(summary.average_accuracy, 75.0);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["exercise"], "squat");
        assert_eq!(json["total_reps"], 2);

        let after = engine.snapshot(&id).unwrap();
        assert_eq!(after.total_reps(), 0);
        assert_eq!(after.feedback, feedback::READY);
    }

    #[test]
    fn test_process_image_uses_detector() {
        let detector = |image: &[u8]| -> replicai_core::CoreResult<Option<LandmarkSet>> {
            match image {
                b"down" => Ok(Some(PoseSynth::new().bicep_curl(30.0))),
                b"up" => Ok(Some(PoseSynth::new().bicep_curl(160.0))),
                b"empty" => Ok(None),
                _ => Err(CoreError::Detector("decode failed".into())),
            }
        };
        let engine = WorkoutEngine::new(RuntimeConfig::default()).with_detector(Arc::new(detector));
        let id = SessionId::new("curler");

        engine.process_image(&id, "bicep_curl", b"down");
        let gap = engine.process_image(&id, "bicep_curl", b"garbage");
        assert_eq!(gap.feedback, feedback::NO_PERSON);
        let gap = engine.process_image(&id, "bicep_curl", b"empty");
        assert_eq!(gap.feedback, feedback::NO_PERSON);

        let done = engine.process_image(&id, "bicep_curl", b"up");
        assert_eq!(done.good_reps, 1);
    }

    #[test]
    fn test_process_image_without_detector() {
        let engine = WorkoutEngine::new(RuntimeConfig::default());
        let snapshot = engine.process_image(&SessionId::new("x"), "squat", b"frame");
        assert_eq!(snapshot.feedback, feedback::NO_PERSON);
    }

    #[tokio::test(start_paused = true)]
    async fn test_advisory_reaches_snapshot() {
        let engine = WorkoutEngine::with_advisory(RuntimeConfig::default(), Arc::new(EchoService));
        let id = SessionId::new("alice");

        squat_cycle(&engine, &id, 50.0);
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
        let snapshot = engine.snapshot(&id).unwrap();
        assert!(snapshot.advisory_text.starts_with("tip for"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sweeper() {
        let config = RuntimeConfig {
            idle_timeout: Duration::from_secs(30 * 60),
            sweep_interval: Duration::from_secs(60),
            ..RuntimeConfig::default()
        };
        let engine = Arc::new(WorkoutEngine::new(config));
        let sweeper = engine.spawn_idle_sweeper();

        engine.process_frame(&SessionId::new("stale"), "squat", None, b"");
        tokio::time::sleep(Duration::from_secs(20 * 60)).await;
        engine.process_frame(&SessionId::new("fresh"), "squat", None, b"");

        tokio::time::sleep(Duration::from_secs(11 * 60)).await;
        assert!(!engine.registry().contains(&SessionId::new("stale")));
        assert!(engine.registry().contains(&SessionId::new("fresh")));

        drop(engine);
        sweeper.await.unwrap();
    }
}
