//! Landmark sets - one detector result per frame
//!
//! A landmark is a 2D joint position in normalized frame coordinates
//! (x to the right, y downward, both in [0, 1]) with the detector's
//! visibility score. A set may hold any subset of the joint vocabulary.

use serde::{Deserialize, Serialize};

use crate::{BodyJoint, CoreError, CoreResult, Point2};

/// Single landmark
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Normalized X coordinate (0.0 - 1.0)
    pub x: f32,
    /// Normalized Y coordinate (0.0 - 1.0), grows downward
    pub y: f32,
    /// Visibility score (0.0 - 1.0)
    pub visibility: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, visibility: f32) -> Self {
        Self { x, y, visibility }
    }

    #[inline]
    pub fn point(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// Coordinates and visibility are all finite numbers
    pub fn is_well_formed(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.visibility.is_finite()
    }
}

/// The landmarks detected for one person in one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkSet {
    landmarks: [Option<Landmark>; BodyJoint::COUNT],
}

impl LandmarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(joint, landmark)` pairs; later pairs win
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (BodyJoint, Landmark)>,
    {
        let mut set = Self::new();
        for (joint, landmark) in pairs {
            set.insert(joint, landmark);
        }
        set
    }

    /// Build from a detector's full landmark list in MediaPipe index order
    ///
    /// Indices outside the tracked vocabulary are ignored.
    pub fn from_mediapipe(landmarks: &[Landmark]) -> Self {
        let mut set = Self::new();
        for (index, landmark) in landmarks.iter().enumerate() {
            if let Some(joint) = BodyJoint::from_mediapipe_index(index) {
                set.insert(joint, *landmark);
            }
        }
        set
    }

    pub fn insert(&mut self, joint: BodyJoint, landmark: Landmark) {
        self.landmarks[joint.index()] = Some(landmark);
    }

    pub fn remove(&mut self, joint: BodyJoint) -> Option<Landmark> {
        self.landmarks[joint.index()].take()
    }

    #[inline]
    pub fn get(&self, joint: BodyJoint) -> Option<&Landmark> {
        self.landmarks[joint.index()].as_ref()
    }

    /// Get a landmark the caller cannot proceed without
    pub fn require(&self, joint: BodyJoint) -> CoreResult<Landmark> {
        let landmark = self.get(joint).ok_or(CoreError::MissingLandmark(joint))?;
        if !landmark.is_well_formed() {
            return Err(CoreError::MalformedLandmark(joint));
        }
        Ok(*landmark)
    }

    /// Position of a required landmark
    pub fn point(&self, joint: BodyJoint) -> CoreResult<Point2> {
        self.require(joint).map(|l| l.point())
    }

    /// Visibility of a joint, 0.0 when absent or malformed
    pub fn visibility(&self, joint: BodyJoint) -> f32 {
        match self.get(joint) {
            Some(l) if l.is_well_formed() => l.visibility.clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.landmarks.iter().filter(|l| l.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyJoint, &Landmark)> + '_ {
        BodyJoint::all()
            .iter()
            .filter_map(|joint| self.get(*joint).map(|l| (*joint, l)))
    }
}
