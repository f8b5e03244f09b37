//! Geometry - joint angles and visibility confidence
//!
//! Pure functions, no state. Angles are in degrees.

use crate::{BodyJoint, LandmarkSet};

/// 2D point in normalized frame coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Bearing from this point to `other`, in radians
    #[inline]
    pub fn bearing_to(&self, other: &Point2) -> f32 {
        (other.y - self.y).atan2(other.x - self.x)
    }
}

/// Angle at vertex `b` formed by `a` and `c`, always within [0, 180]
///
/// Difference of the bearings b→c and b→a; results past 180 are reflected
/// to `360 - angle`.
pub fn joint_angle(a: Point2, b: Point2, c: Point2) -> f32 {
    let radians = b.bearing_to(&c) - b.bearing_to(&a);
    let angle = radians.to_degrees().abs();
    if angle > 180.0 {
        360.0 - angle
    } else {
        angle
    }
}

/// Worst-joint visibility over `joints`
///
/// A single occluded joint is enough to distrust a rep, so this is the
/// minimum, not an average. Absent joints count as 0.0; an empty list is 1.0.
pub fn visibility_confidence(landmarks: &LandmarkSet, joints: &[BodyJoint]) -> f32 {
    joints
        .iter()
        .map(|joint| landmarks.visibility(*joint))
        .fold(1.0_f32, f32::min)
}

/// Horizontal distance between two points as a fraction of frame width
#[inline]
pub fn horizontal_separation(a: Point2, b: Point2) -> f32 {
    (a.x - b.x).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Landmark;
    use proptest::prelude::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_right_angle() {
        let angle = joint_angle(
            Point2::new(0.5, 0.2),
            Point2::new(0.5, 0.5),
            Point2::new(0.8, 0.5),
        );
        assert!(approx(angle, 90.0), "got {}", angle);
    }

    #[test]
    fn test_straight_and_folded() {
        let straight = joint_angle(
            Point2::new(0.5, 0.2),
            Point2::new(0.5, 0.5),
            Point2::new(0.5, 0.8),
        );
        assert!(approx(straight, 180.0));

        let folded = joint_angle(
            Point2::new(0.5, 0.2),
            Point2::new(0.5, 0.5),
            Point2::new(0.5, 0.3),
        );
        assert!(approx(folded, 0.0));
    }

    #[test]
    fn test_reflex_bearing_difference_is_reflected() {
        // bearings of roughly +170 and -170 degrees differ by 340; the joint angle is 20
        let b = Point2::new(0.5, 0.5);
        let a = Point2::new(0.5 - 0.3 * 0.985, 0.5 - 0.3 * 0.174);
        let c = Point2::new(0.5 - 0.3 * 0.985, 0.5 + 0.3 * 0.174);
        let angle = joint_angle(a, b, c);
        assert!(approx(angle, 20.0), "got {}", angle);
    }

    #[test]
    fn test_visibility_confidence_is_minimum() {
        let set = LandmarkSet::from_pairs([
            (BodyJoint::LeftHip, Landmark::new(0.5, 0.5, 0.9)),
            (BodyJoint::LeftKnee, Landmark::new(0.5, 0.7, 0.4)),
            (BodyJoint::LeftAnkle, Landmark::new(0.5, 0.9, 0.8)),
        ]);
        let conf = visibility_confidence(
            &set,
            &[BodyJoint::LeftHip, BodyJoint::LeftKnee, BodyJoint::LeftAnkle],
        );
        assert!(approx(conf, 0.4));
    }

    #[test]
    fn test_visibility_confidence_absent_joint() {
        let set = LandmarkSet::from_pairs([(BodyJoint::LeftHip, Landmark::new(0.5, 0.5, 0.9))]);
        assert_eq!(
            visibility_confidence(&set, &[BodyJoint::LeftHip, BodyJoint::LeftKnee]),
            0.0
        );
        assert_eq!(visibility_confidence(&set, &[]), 1.0);
    }

    #[test]
    fn test_horizontal_separation() {
        let sep = horizontal_separation(Point2::new(0.3, 0.9), Point2::new(0.6, 0.8));
        assert!(approx(sep, 0.3));
    }

    proptest! {
        #[test]
        fn prop_joint_angle_in_range(
            ax in 0.0f32..1.0, ay in 0.0f32..1.0,
            bx in 0.0f32..1.0, by in 0.0f32..1.0,
            cx in 0.0f32..1.0, cy in 0.0f32..1.0,
        ) {
            let angle = joint_angle(Point2::new(ax, ay), Point2::new(bx, by), Point2::new(cx, cy));
            prop_assert!((0.0..=180.0).contains(&angle));
        }

        #[test]
        fn prop_joint_angle_symmetric(
            ax in 0.0f32..1.0, ay in 0.0f32..1.0,
            cx in 0.0f32..1.0, cy in 0.0f32..1.0,
        ) {
            let b = Point2::new(0.5, 0.5);
            let forward = joint_angle(Point2::new(ax, ay), b, Point2::new(cx, cy));
            let backward = joint_angle(Point2::new(cx, cy), b, Point2::new(ax, ay));
            prop_assert!((forward - backward).abs() < 0.01);
        }
    }
}
