//! Exercise profiles
//!
//! Each supported exercise is one `ExerciseProfile` value. The rep engine
//! never branches on the exercise kind; everything exercise-specific is
//! reached through the profile's fields.

use replicai_core::{
    horizontal_separation, joint_angle, BodyJoint, CoreResult, ExerciseKind, LandmarkSet,
};

/// Numeric design parameters of an exercise
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Peak position is reached past this value (degrees, or frame-width fraction)
    pub peak: f32,
    /// Return position is reached past this value
    pub ret: f32,
    /// Exercise-specific form limit; meaning depends on the form check
    pub form: f32,
    /// Peak-frame confidence below this makes the rep uncertain
    pub confidence: f32,
}

/// One frame's reading of the governing geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Primary joint angle, degrees
    pub angle: f32,
    pub at_peak: bool,
    pub at_return: bool,
}

/// Result of the secondary form check at the peak
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormVerdict {
    Sound,
    Fault(&'static str),
}

impl FormVerdict {
    pub fn is_sound(&self) -> bool {
        matches!(self, FormVerdict::Sound)
    }
}

/// Feedback text for each situation an exercise can be in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cues {
    /// Held in the initial state
    pub start: &'static str,
    /// Held at the peak position
    pub hold_peak: &'static str,
    /// Held at the return position
    pub hold_return: &'static str,
    /// Just reached the peak with sound form
    pub peak: &'static str,
    /// Completed a good rep
    pub good_rep: &'static str,
    /// Completed a bad rep with no specific issue recorded
    pub bad_rep: &'static str,
}

pub type MeasureFn = fn(&LandmarkSet, &Thresholds) -> CoreResult<Measurement>;
pub type FormFn = fn(&LandmarkSet, &Thresholds) -> CoreResult<FormVerdict>;

/// Everything the rep engine needs to know about one exercise
#[derive(Debug, Clone, Copy)]
pub struct ExerciseProfile {
    pub kind: ExerciseKind,
    /// Landmarks whose worst visibility is the rep's confidence
    pub key_joints: &'static [BodyJoint],
    pub thresholds: Thresholds,
    pub measure: MeasureFn,
    pub form: FormFn,
    pub cues: Cues,
    /// Prompt sent to the advisory service when the form check fails
    pub coaching_prompt: Option<&'static str>,
}

impl ExerciseProfile {
    /// Built-in profile for `kind`
    pub fn for_kind(kind: ExerciseKind) -> Self {
        match kind {
            ExerciseKind::Squat => Self::squat(),
            ExerciseKind::PushUp => Self::push_up(),
            ExerciseKind::BicepCurl => Self::bicep_curl(),
            ExerciseKind::JumpingJack => Self::jumping_jack(),
            ExerciseKind::Lunge => Self::lunge(),
        }
    }

    pub fn squat() -> Self {
        ExerciseProfile {
            kind: ExerciseKind::Squat,
            key_joints: &[
                BodyJoint::LeftShoulder,
                BodyJoint::LeftHip,
                BodyJoint::LeftKnee,
                BodyJoint::LeftAnkle,
            ],
            thresholds: Thresholds {
                peak: 110.0,
                ret: 160.0,
                form: 70.0,
                confidence: 0.75,
            },
            measure: measure_squat,
            form: form_squat,
            cues: Cues {
                start: "Stand tall, then begin your squat",
                hold_peak: "Drive up through your heels",
                hold_return: "Squat down for the next rep",
                peak: "Good depth! Now push up",
                good_rep: "Great squat!",
                bad_rep: "Keep your chest up and back straight",
            },
            coaching_prompt: Some(
                "This person is at the bottom of a squat and their torso is leaning too far \
                 forward. Give one short, specific cue to fix their squat form.",
            ),
        }
    }

    pub fn push_up() -> Self {
        ExerciseProfile {
            kind: ExerciseKind::PushUp,
            key_joints: &[
                BodyJoint::LeftShoulder,
                BodyJoint::LeftElbow,
                BodyJoint::LeftWrist,
                BodyJoint::LeftHip,
            ],
            thresholds: Thresholds {
                peak: 90.0,
                ret: 160.0,
                // tolerated hip drop below the shoulder, frame-height fraction
                form: 0.0,
                confidence: 0.70,
            },
            measure: measure_push_up,
            form: form_push_up,
            cues: Cues {
                start: "Get into plank position and lower yourself",
                hold_peak: "Push the floor away",
                hold_return: "Lower your chest for the next rep",
                peak: "Nice and low! Now push up",
                good_rep: "Great push-up!",
                bad_rep: "Keep your body in a straight line",
            },
            coaching_prompt: Some(
                "This person is at the bottom of a push-up and their hips are sagging. \
                 Give one short, specific cue to fix their push-up form.",
            ),
        }
    }

    pub fn bicep_curl() -> Self {
        ExerciseProfile {
            kind: ExerciseKind::BicepCurl,
            key_joints: &[
                BodyJoint::LeftShoulder,
                BodyJoint::LeftElbow,
                BodyJoint::LeftWrist,
            ],
            thresholds: Thresholds {
                peak: 40.0,
                ret: 150.0,
                form: 0.0,
                confidence: 0.75,
            },
            measure: measure_bicep_curl,
            form: sound_form,
            cues: Cues {
                start: "Arms extended, begin curling",
                hold_peak: "Lower the weight slowly",
                hold_return: "Curl up for the next rep",
                peak: "Squeeze at the top!",
                good_rep: "Great curl!",
                bad_rep: "Control the weight through the full range",
            },
            coaching_prompt: None,
        }
    }

    pub fn jumping_jack() -> Self {
        ExerciseProfile {
            kind: ExerciseKind::JumpingJack,
            key_joints: &[
                BodyJoint::LeftHip,
                BodyJoint::LeftShoulder,
                BodyJoint::LeftElbow,
                BodyJoint::LeftWrist,
                BodyJoint::LeftAnkle,
                BodyJoint::RightAnkle,
            ],
            thresholds: Thresholds {
                peak: 0.25,
                ret: 0.15,
                form: 0.0,
                confidence: 0.70,
            },
            measure: measure_jumping_jack,
            form: sound_form,
            cues: Cues {
                start: "Feet together, arms down - start jumping",
                hold_peak: "Jump back in",
                hold_return: "Jump out, arms overhead",
                peak: "Arms up, feet wide!",
                good_rep: "Great jumping jack!",
                bad_rep: "Get your arms fully overhead",
            },
            coaching_prompt: None,
        }
    }

    pub fn lunge() -> Self {
        ExerciseProfile {
            kind: ExerciseKind::Lunge,
            key_joints: &[
                BodyJoint::LeftHip,
                BodyJoint::RightHip,
                BodyJoint::LeftKnee,
                BodyJoint::RightKnee,
                BodyJoint::LeftAnkle,
                BodyJoint::RightAnkle,
            ],
            thresholds: Thresholds {
                peak: 110.0,
                ret: 160.0,
                form: 0.0,
                confidence: 0.70,
            },
            measure: measure_lunge,
            form: sound_form,
            cues: Cues {
                start: "Stand tall, then step into a lunge",
                hold_peak: "Push back up to standing",
                hold_return: "Lunge down for the next rep",
                peak: "Good depth! Now stand up",
                good_rep: "Great lunge!",
                bad_rep: "Keep your torso upright",
            },
            coaching_prompt: None,
        }
    }
}

fn angle_at(
    landmarks: &LandmarkSet,
    a: BodyJoint,
    vertex: BodyJoint,
    c: BodyJoint,
) -> CoreResult<f32> {
    Ok(joint_angle(
        landmarks.point(a)?,
        landmarks.point(vertex)?,
        landmarks.point(c)?,
    ))
}

fn flexion(angle: f32, t: &Thresholds) -> Measurement {
    Measurement {
        angle,
        at_peak: angle < t.peak,
        at_return: angle > t.ret,
    }
}

fn measure_squat(landmarks: &LandmarkSet, t: &Thresholds) -> CoreResult<Measurement> {
    let knee = angle_at(
        landmarks,
        BodyJoint::LeftHip,
        BodyJoint::LeftKnee,
        BodyJoint::LeftAnkle,
    )?;
    Ok(flexion(knee, t))
}

fn form_squat(landmarks: &LandmarkSet, t: &Thresholds) -> CoreResult<FormVerdict> {
    let back = angle_at(
        landmarks,
        BodyJoint::LeftShoulder,
        BodyJoint::LeftHip,
        BodyJoint::LeftKnee,
    )?;
    if back > t.form {
        Ok(FormVerdict::Sound)
    } else {
        Ok(FormVerdict::Fault("Leaning too far forward - keep your chest up"))
    }
}

fn measure_push_up(landmarks: &LandmarkSet, t: &Thresholds) -> CoreResult<Measurement> {
    let elbow = angle_at(
        landmarks,
        BodyJoint::LeftShoulder,
        BodyJoint::LeftElbow,
        BodyJoint::LeftWrist,
    )?;
    Ok(flexion(elbow, t))
}

fn form_push_up(landmarks: &LandmarkSet, t: &Thresholds) -> CoreResult<FormVerdict> {
    let hip = landmarks.point(BodyJoint::LeftHip)?;
    let shoulder = landmarks.point(BodyJoint::LeftShoulder)?;
    // y grows downward: a hip lower in frame than the shoulder is sagging
    if hip.y <= shoulder.y + t.form {
        Ok(FormVerdict::Sound)
    } else {
        Ok(FormVerdict::Fault("Hips are sagging - keep your body in a straight line"))
    }
}

fn measure_bicep_curl(landmarks: &LandmarkSet, t: &Thresholds) -> CoreResult<Measurement> {
    let elbow = angle_at(
        landmarks,
        BodyJoint::LeftShoulder,
        BodyJoint::LeftElbow,
        BodyJoint::LeftWrist,
    )?;
    Ok(flexion(elbow, t))
}

fn measure_jumping_jack(landmarks: &LandmarkSet, t: &Thresholds) -> CoreResult<Measurement> {
    let shoulder_angle = angle_at(
        landmarks,
        BodyJoint::LeftHip,
        BodyJoint::LeftShoulder,
        BodyJoint::LeftElbow,
    )?;
    let separation = horizontal_separation(
        landmarks.point(BodyJoint::LeftAnkle)?,
        landmarks.point(BodyJoint::RightAnkle)?,
    );
    let wrist = landmarks.point(BodyJoint::LeftWrist)?;
    let shoulder = landmarks.point(BodyJoint::LeftShoulder)?;
    let wrist_up = wrist.y < shoulder.y;

    Ok(Measurement {
        angle: shoulder_angle,
        at_peak: separation > t.peak && wrist_up,
        at_return: separation < t.ret,
    })
}

fn measure_lunge(landmarks: &LandmarkSet, t: &Thresholds) -> CoreResult<Measurement> {
    let left = angle_at(
        landmarks,
        BodyJoint::LeftHip,
        BodyJoint::LeftKnee,
        BodyJoint::LeftAnkle,
    )?;
    let right = angle_at(
        landmarks,
        BodyJoint::RightHip,
        BodyJoint::RightKnee,
        BodyJoint::RightAnkle,
    )?;

    Ok(Measurement {
        angle: (left + right) / 2.0,
        at_peak: left < t.peak && right < t.peak,
        at_return: left > t.ret && right > t.ret,
    })
}

/// Form check for exercises judged on confidence alone
fn sound_form(_landmarks: &LandmarkSet, _t: &Thresholds) -> CoreResult<FormVerdict> {
    Ok(FormVerdict::Sound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use replicai_core::CoreError;
    use replicai_test::PoseSynth;

    #[test]
    fn test_for_kind_matches() {
        for kind in ExerciseKind::all() {
            assert_eq!(ExerciseProfile::for_kind(*kind).kind, *kind);
        }
    }

    #[test]
    fn test_confidence_thresholds() {
        assert_eq!(ExerciseProfile::squat().thresholds.confidence, 0.75);
        assert_eq!(ExerciseProfile::bicep_curl().thresholds.confidence, 0.75);
        assert_eq!(ExerciseProfile::push_up().thresholds.confidence, 0.70);
        assert_eq!(ExerciseProfile::jumping_jack().thresholds.confidence, 0.70);
        assert_eq!(ExerciseProfile::lunge().thresholds.confidence, 0.70);
    }

    #[test]
    fn test_squat_measure_and_form() {
        let p = ExerciseProfile::squat();
        let synth = PoseSynth::new();

        let deep = (p.measure)(&synth.squat(95.0, 80.0), &p.thresholds).unwrap();
        assert!(deep.at_peak && !deep.at_return);
        assert!((deep.angle - 95.0).abs() < 0.05);

        let standing = (p.measure)(&synth.squat(170.0, 170.0), &p.thresholds).unwrap();
        assert!(!standing.at_peak && standing.at_return);

        let between = (p.measure)(&synth.squat(135.0, 120.0), &p.thresholds).unwrap();
        assert!(!between.at_peak && !between.at_return);

        assert!((p.form)(&synth.squat(95.0, 80.0), &p.thresholds).unwrap().is_sound());
        assert!(!(p.form)(&synth.squat(95.0, 60.0), &p.thresholds).unwrap().is_sound());
    }

    #[test]
    fn test_push_up_sag() {
        let p = ExerciseProfile::push_up();
        let synth = PoseSynth::new();
        assert_eq!(
            (p.form)(&synth.push_up(85.0, false), &p.thresholds).unwrap(),
            FormVerdict::Sound
        );
        assert!(matches!(
            (p.form)(&synth.push_up(85.0, true), &p.thresholds).unwrap(),
            FormVerdict::Fault(_)
        ));
    }

    #[test]
    fn test_jumping_jack_needs_arms_and_feet() {
        let p = ExerciseProfile::jumping_jack();
        let synth = PoseSynth::new();

        let spread = (p.measure)(&synth.jumping_jack(0.3, true), &p.thresholds).unwrap();
        assert!(spread.at_peak && !spread.at_return);

        let arms_down = (p.measure)(&synth.jumping_jack(0.3, false), &p.thresholds).unwrap();
        assert!(!arms_down.at_peak);

        let together = (p.measure)(&synth.jumping_jack(0.1, false), &p.thresholds).unwrap();
        assert!(together.at_return);
    }

    #[test]
    fn test_lunge_needs_both_knees() {
        let p = ExerciseProfile::lunge();
        let synth = PoseSynth::new();

        let both = (p.measure)(&synth.lunge(100.0, 90.0), &p.thresholds).unwrap();
        assert!(both.at_peak);
        assert!((both.angle - 95.0).abs() < 0.05);

        let one = (p.measure)(&synth.lunge(100.0, 150.0), &p.thresholds).unwrap();
        assert!(!one.at_peak && !one.at_return);
    }

    #[test]
    fn test_missing_landmark_propagates() {
        let p = ExerciseProfile::squat();
        let mut set = PoseSynth::new().squat(95.0, 80.0);
        set.remove(BodyJoint::LeftAnkle);
        assert_eq!(
            (p.measure)(&set, &p.thresholds),
            Err(CoreError::MissingLandmark(BodyJoint::LeftAnkle))
        );
    }
}
