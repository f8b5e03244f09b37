//! Coaching configuration

use std::time::Duration;

/// Advisory text shown before any tip has arrived
pub const DEFAULT_ADVISORY_TEXT: &str = "Your AI coach is watching. Tips will appear here.";

/// Tip used when the advisory service fails or answers with nothing
pub const FALLBACK_TIP: &str = "Slow down, brace your core and control every rep.";

/// Minimum time between two requests for the same tracker
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct CoachConfig {
    /// Master switch; a disabled coach never issues requests
    pub enabled: bool,
    /// Per-tracker cooldown between requests
    pub cooldown: Duration,
    /// Initial advisory text for a fresh tracker
    pub default_text: String,
    /// Tip written when a request fails or comes back empty
    pub fallback_tip: String,
}

impl Default for CoachConfig {
    fn default() -> Self {
        CoachConfig {
            enabled: true,
            cooldown: DEFAULT_COOLDOWN,
            default_text: DEFAULT_ADVISORY_TEXT.to_string(),
            fallback_tip: FALLBACK_TIP.to_string(),
        }
    }
}

impl CoachConfig {
    /// Configuration that never contacts the advisory service
    pub fn disabled() -> Self {
        CoachConfig {
            enabled: false,
            ..CoachConfig::default()
        }
    }
}
