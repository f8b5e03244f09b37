//! Session registry - one tracker per session id

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use replicai_core::{ExerciseKind, SessionId};
use replicai_engine::{ResultSnapshot, Tracker};
use tokio::time::Instant;
use tracing::info;

/// Everything kept for one session
#[derive(Debug)]
pub struct SessionEntry {
    tracker: Tracker,
    /// Exercise of the most recent recognised frame
    exercise: Option<ExerciseKind>,
    started_at: Instant,
    last_activity: Instant,
    /// Accuracy seen on each rep-completing frame since the last reset
    accuracy_samples: Vec<f32>,
}

impl SessionEntry {
    pub fn new(tracker: Tracker) -> Self {
        let now = Instant::now();
        Self {
            tracker,
            exercise: None,
            started_at: now,
            last_activity: now,
            accuracy_samples: Vec::new(),
        }
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut Tracker {
        &mut self.tracker
    }

    pub fn exercise(&self) -> Option<ExerciseKind> {
        self.exercise
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    pub fn accuracy_samples(&self) -> &[f32] {
        &self.accuracy_samples
    }

    /// Note a processed frame and its outcome
    pub(crate) fn observe(&mut self, exercise: Option<ExerciseKind>, snapshot: &ResultSnapshot) {
        self.touch();
        if exercise.is_some() {
            self.exercise = exercise;
        }
        if snapshot.is_new_rep {
            self.accuracy_samples.push(self.tracker.accuracy());
        }
    }

    pub(crate) fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_activity)
    }
}

pub type SharedSession = Arc<Mutex<SessionEntry>>;

/// Registry of live sessions
///
/// The map lock is only held long enough to find or insert an entry; all
/// per-frame work happens under the session's own lock.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, SharedSession>>,
    default_text: String,
}

impl SessionRegistry {
    /// Registry whose fresh trackers start with `default_text` as advisory text
    pub fn new(default_text: impl Into<String>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            default_text: default_text.into(),
        }
    }

    fn fresh_entry(&self) -> SessionEntry {
        SessionEntry::new(Tracker::with_advisory_text(self.default_text.clone()))
    }

    /// Session for `id`, created on first access
    pub fn get_or_create(&self, id: &SessionId) -> SharedSession {
        if let Some(entry) = self.sessions.read().get(id) {
            return Arc::clone(entry);
        }

        let mut sessions = self.sessions.write();
        let entry = sessions.entry(id.clone()).or_insert_with(|| {
            info!(session = %id, "session created");
            Arc::new(Mutex::new(self.fresh_entry()))
        });
        Arc::clone(entry)
    }

    pub fn get(&self, id: &SessionId) -> Option<SharedSession> {
        self.sessions.read().get(id).cloned()
    }

    /// Replace the session's tracker with a fresh one; false if absent
    ///
    /// The coaching cooldown survives, so a reset never opens a second
    /// advisory call while the first may still be running.
    pub fn reset(&self, id: &SessionId) -> bool {
        let Some(entry) = self.get(id) else {
            return false;
        };
        let mut session = entry.lock();
        let mut fresh = self.fresh_entry();
        fresh
            .tracker_mut()
            .advisory_mut()
            .inherit_cooldown(session.tracker().advisory());
        *session = fresh;
        drop(session);
        info!(session = %id, "session reset");
        true
    }

    /// Drop the session; false if absent
    pub fn evict(&self, id: &SessionId) -> bool {
        let removed = self.sessions.write().remove(id).is_some();
        if removed {
            info!(session = %id, "session evicted");
        }
        removed
    }

    /// Evict sessions idle for at least `idle_timeout` as of `now`
    ///
    /// A session whose lock is held is mid-frame and therefore not idle.
    pub fn sweep_idle(&self, idle_timeout: Duration, now: Instant) -> Vec<SessionId> {
        let mut evicted = Vec::new();
        self.sessions.write().retain(|id, entry| {
            let stale = entry
                .try_lock()
                .is_some_and(|session| session.idle_for(now) >= idle_timeout);
            if stale {
                evicted.push(id.clone());
            }
            !stale
        });

        for id in &evicted {
            info!(session = %id, "idle session evicted");
        }
        evicted
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.sessions.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(replicai_coach::DEFAULT_ADVISORY_TEXT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use replicai_engine::{Dispatcher, Stage};
    use replicai_test::PoseSynth;

    #[test]
    fn test_get_or_create_is_stable() {
        let registry = SessionRegistry::default();
        let id = SessionId::new("alice");

        let a = registry.get_or_create(&id);
        let b = registry.get_or_create(&id);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_sessions_are_independent() {
        let registry = SessionRegistry::default();
        let alice = registry.get_or_create(&SessionId::new("alice"));
        let bob = registry.get_or_create(&SessionId::new("bob"));

        let _held = alice.lock();
        assert!(bob.try_lock().is_some());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_reset_and_evict() {
        let registry = SessionRegistry::new("hello");
        let id = SessionId::new("alice");
        assert!(!registry.reset(&id));
        assert!(!registry.evict(&id));

        let entry = registry.get_or_create(&id);
        let dispatcher = Dispatcher::default();
        let synth = PoseSynth::new();
        for knee in [95.0, 170.0, 95.0] {
            let frame = synth.squat(knee, 80.0);
            dispatcher.dispatch_kind(
                entry.lock().tracker_mut(),
                ExerciseKind::Squat,
                Some(&frame),
                b"",
            );
        }
        assert_eq!(entry.lock().tracker().good_reps(), 1);

        assert!(registry.reset(&id));
        {
            let session = entry.lock();
            assert_eq!(session.tracker().stage(), Stage::Idle);
            assert_eq!(session.tracker().total_reps(), 0);
            assert_eq!(session.tracker().advisory().text(), "hello");
        }

        assert!(registry.evict(&id));
        assert!(!registry.contains(&id));
        assert!(registry.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_idle() {
        let registry = SessionRegistry::default();
        let idle = SessionId::new("idle");
        let active = SessionId::new("active");
        let busy = SessionId::new("busy");

        registry.get_or_create(&idle);
        registry.get_or_create(&busy);
        tokio::time::advance(Duration::from_secs(100)).await;
        registry.get_or_create(&active).lock().touch();

        let busy_entry = registry.get(&busy).unwrap();
        let _guard = busy_entry.lock();

        let evicted = registry.sweep_idle(Duration::from_secs(60), Instant::now());
        assert_eq!(evicted, vec![idle.clone()]);
        assert!(registry.contains(&active));
        assert!(registry.contains(&busy));
    }
}
