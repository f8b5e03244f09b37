//! Advisory slot - the per-tracker half of a coaching request
//!
//! The slot owns the receiving end of the request's channel. The background
//! task never touches tracker memory; it only sends the finished text, and
//! the slot applies it the next time the owning session polls.

use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::time::Instant;

use crate::{DEFAULT_ADVISORY_TEXT, FALLBACK_TIP};

struct PendingTip {
    rx: oneshot::Receiver<String>,
    fallback: String,
}

/// Advisory state carried by a tracker
pub struct AdvisorySlot {
    text: String,
    pending: Option<PendingTip>,
    last_request: Option<Instant>,
}

impl AdvisorySlot {
    pub fn new(default_text: impl Into<String>) -> Self {
        Self {
            text: default_text.into(),
            pending: None,
            last_request: None,
        }
    }

    /// Last received (or default) advisory text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// A request has been issued and its result not yet applied
    pub fn in_flight(&self) -> bool {
        self.pending.is_some()
    }

    /// When the most recent request was issued
    pub fn last_request(&self) -> Option<Instant> {
        self.last_request
    }

    /// Apply a finished request, if any. Returns true when the text changed hands.
    ///
    /// A sender dropped without answering (task panicked, runtime shut down)
    /// counts as a failed request.
    pub fn poll(&mut self) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };

        let text = match pending.rx.try_recv() {
            Ok(text) => text,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Closed) => pending.fallback.clone(),
        };

        self.text = text;
        self.pending = None;
        true
    }

    /// Keep `previous`'s cooldown on a replacement slot
    ///
    /// A reset drops the pending receiver, but the call it belonged to may
    /// still be running against the service.
    pub fn inherit_cooldown(&mut self, previous: &AdvisorySlot) {
        self.last_request = previous.last_request;
    }

    pub(crate) fn begin(
        &mut self,
        rx: oneshot::Receiver<String>,
        fallback: String,
        now: Instant,
    ) {
        self.pending = Some(PendingTip { rx, fallback });
        self.last_request = Some(now);
    }
}

impl Default for AdvisorySlot {
    fn default() -> Self {
        Self::new(DEFAULT_ADVISORY_TEXT)
    }
}

impl std::fmt::Debug for AdvisorySlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvisorySlot")
            .field("text", &self.text)
            .field("in_flight", &self.in_flight())
            .field("last_request", &self.last_request)
            .finish()
    }
}
