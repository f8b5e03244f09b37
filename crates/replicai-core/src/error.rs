//! Error types for the ReplicAI core

use thiserror::Error;

use crate::BodyJoint;

/// Core ReplicAI errors
///
/// None of these are fatal to a session: the dispatcher folds every one of
/// them into feedback text for the frame that produced it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    // Landmark errors
    #[error("Landmark missing: {0}")]
    MissingLandmark(BodyJoint),

    #[error("Landmark malformed: {0}")]
    MalformedLandmark(BodyJoint),

    #[error("Unknown body joint: {0}")]
    UnknownJoint(String),

    // Exercise errors
    #[error("Unknown exercise: {0}")]
    UnknownExercise(String),

    // Collaborator errors
    #[error("Pose detector failed: {0}")]
    Detector(String),
}

impl CoreError {
    /// True for errors that mean "no usable person in this frame"
    pub fn is_detection_gap(&self) -> bool {
        matches!(
            self,
            CoreError::MissingLandmark(_) | CoreError::MalformedLandmark(_) | CoreError::Detector(_)
        )
    }
}

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;
