//! Pose detector contract
//!
//! The pose-estimation model lives outside this workspace. The engine only
//! needs a way to turn one encoded frame into a landmark set, or nothing.

use crate::{CoreResult, LandmarkSet};

/// External pose detector
///
/// `Ok(None)` means no person was found. `Err` is reserved for the detector
/// itself failing (bad image, model error); callers treat both the same way
/// for the frame in question.
pub trait PoseDetector: Send + Sync {
    fn detect(&self, image: &[u8]) -> CoreResult<Option<LandmarkSet>>;
}

impl<F> PoseDetector for F
where
    F: Fn(&[u8]) -> CoreResult<Option<LandmarkSet>> + Send + Sync,
{
    fn detect(&self, image: &[u8]) -> CoreResult<Option<LandmarkSet>> {
        self(image)
    }
}
