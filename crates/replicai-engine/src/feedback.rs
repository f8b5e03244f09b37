//! Feedback strings shared by every exercise

/// Fresh tracker, nothing measured yet
pub const READY: &str = "Ready";

/// Frame without a usable person
pub const NO_PERSON: &str = "No person detected - make sure your whole body is in frame";

/// Rep completed but the peak frame was too poorly visible to judge
pub const UNCERTAIN_REP: &str = "Rep not judged - low visibility, adjust your camera";
