//! ReplicAI Engine - Repetition classification
//!
//! One generic two-state machine (peak / return) drives every exercise.
//! An exercise is a configuration value, an [`ExerciseProfile`], supplying:
//! 1. Which landmarks it reads and how it measures the governing angle
//! 2. When the peak and return positions are reached
//! 3. The secondary form check and confidence threshold
//! 4. Its feedback cues and coaching prompt
//!
//! The [`Dispatcher`] picks the profile for a frame, absorbs missing
//! detections and unknown exercises into feedback text, and returns a
//! [`ResultSnapshot`].

pub mod dispatch;
pub mod feedback;
pub mod profile;
pub mod rep;
pub mod snapshot;
pub mod tracker;

pub use dispatch::*;
pub use profile::*;
pub use rep::*;
pub use snapshot::*;
pub use tracker::*;
