//! Tip requester - cooldown-limited, fire-and-forget advisory calls

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::{AdvisoryService, AdvisorySlot, CoachConfig};

/// Outcome of a tip request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipDecision {
    /// A request is now running in the background
    Issued,
    /// The slot already has a request outstanding
    InFlight,
    /// The slot's last request is younger than the cooldown
    CoolingDown,
    /// Coaching disabled, service unconfigured, or no runtime to run on
    Unavailable,
}

/// Issues advisory requests on behalf of trackers
#[derive(Clone)]
pub struct TipRequester {
    service: Option<Arc<dyn AdvisoryService>>,
    config: CoachConfig,
}

impl TipRequester {
    pub fn new(service: Arc<dyn AdvisoryService>, config: CoachConfig) -> Self {
        Self {
            service: Some(service),
            config,
        }
    }

    /// A requester with no service behind it; every request is a no-op
    pub fn disabled() -> Self {
        Self {
            service: None,
            config: CoachConfig::disabled(),
        }
    }

    pub fn config(&self) -> &CoachConfig {
        &self.config
    }

    /// Whether a request could be issued at all
    pub fn is_available(&self) -> bool {
        self.config.enabled && self.service.as_ref().is_some_and(|s| s.is_available())
    }

    /// Request a coaching tip for `slot`
    ///
    /// Never blocks: the service call runs on the current tokio runtime and
    /// its result is delivered through the slot.
    pub fn request_tip(&self, slot: &mut AdvisorySlot, image: &[u8], prompt: &str) -> TipDecision {
        slot.poll();
        if slot.in_flight() {
            debug!("tip request skipped: already in flight");
            return TipDecision::InFlight;
        }

        let service = match &self.service {
            Some(service) if self.config.enabled && service.is_available() => Arc::clone(service),
            _ => {
                debug!("tip request skipped: advisory service unavailable");
                return TipDecision::Unavailable;
            }
        };

        let now = Instant::now();
        if let Some(last) = slot.last_request() {
            if now.saturating_duration_since(last) < self.config.cooldown {
                debug!("tip request skipped: cooling down");
                return TipDecision::CoolingDown;
            }
        }

        let Ok(handle) = Handle::try_current() else {
            warn!("tip request skipped: no tokio runtime available");
            return TipDecision::Unavailable;
        };

        let (tx, rx) = oneshot::channel();
        let fallback = self.config.fallback_tip.clone();
        slot.begin(rx, fallback.clone(), now);

        let call = service.generate(image.to_vec(), prompt.to_string());
        handle.spawn(async move {
            let text = match call.await {
                Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
                Ok(_) => {
                    warn!("advisory service returned an empty tip");
                    fallback
                }
                Err(e) => {
                    warn!(error = %e, "advisory request failed");
                    fallback
                }
            };
            // The slot is gone if its session was reset or evicted meanwhile
            let _ = tx.send(text);
        });

        debug!(prompt_len = prompt.len(), image_len = image.len(), "tip request issued");
        TipDecision::Issued
    }
}

impl std::fmt::Debug for TipRequester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TipRequester")
            .field("has_service", &self.service.is_some())
            .field("config", &self.config)
            .finish()
    }
}
