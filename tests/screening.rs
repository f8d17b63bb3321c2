//! End-to-end movement-screen tests: deep-squat rule scoring over
//! synthetic captures, including dropped and partially tracked frames.

use motion_screen::{
    evaluate_rule, evaluate_test, Axis, Extremum, FrameSelector, FrameTracking, Joint,
    JointConfidence, JointGeometryEngine, Measurement, PoseSequence, Rule, ScreenConfig,
    ScreenTest, SkeletonFrame, JOINT_COUNT,
};
use nalgebra::Point3;

// =============================================================================
// CAPTURE GENERATORS
// =============================================================================

/// Neutral standing pose about 2.5 m from the sensor, y up.
fn standing_pose() -> [Point3<f64>; JOINT_COUNT] {
    let mut p = [Point3::origin(); JOINT_COUNT];
    let z = 2.5;

    p[Joint::HipCenter.index()] = Point3::new(0.0, 0.9, z);
    p[Joint::Spine.index()] = Point3::new(0.0, 1.1, z);
    p[Joint::ShoulderCenter.index()] = Point3::new(0.0, 1.3, z);
    p[Joint::Head.index()] = Point3::new(0.0, 1.5, z);

    p[Joint::ShoulderLeft.index()] = Point3::new(-0.2, 1.3, z);
    p[Joint::ElbowLeft.index()] = Point3::new(-0.25, 1.05, z);
    p[Joint::WristLeft.index()] = Point3::new(-0.25, 0.85, z);
    p[Joint::HandLeft.index()] = Point3::new(-0.25, 0.75, z);

    p[Joint::ShoulderRight.index()] = Point3::new(0.2, 1.3, z);
    p[Joint::ElbowRight.index()] = Point3::new(0.25, 1.05, z);
    p[Joint::WristRight.index()] = Point3::new(0.25, 0.85, z);
    p[Joint::HandRight.index()] = Point3::new(0.25, 0.75, z);

    p[Joint::HipLeft.index()] = Point3::new(-0.1, 0.9, z);
    p[Joint::KneeLeft.index()] = Point3::new(-0.1, 0.5, z);
    p[Joint::AnkleLeft.index()] = Point3::new(-0.1, 0.1, z);
    p[Joint::FootLeft.index()] = Point3::new(-0.1, 0.0, z + 0.1);

    p[Joint::HipRight.index()] = Point3::new(0.1, 0.9, z);
    p[Joint::KneeRight.index()] = Point3::new(0.1, 0.5, z);
    p[Joint::AnkleRight.index()] = Point3::new(0.1, 0.1, z);
    p[Joint::FootRight.index()] = Point3::new(0.1, 0.0, z + 0.1);

    p
}

/// Pose at squat depth `t` in `[0, 1]`: hips sink below the knees and
/// the knees travel toward the sensor.
fn squat_pose(t: f64) -> [Point3<f64>; JOINT_COUNT] {
    let mut p = standing_pose();
    let drop = 0.45 * t;
    let forward = 0.15 * t;

    for joint in [
        Joint::HipCenter,
        Joint::HipLeft,
        Joint::HipRight,
        Joint::Spine,
        Joint::ShoulderCenter,
        Joint::Head,
        Joint::ShoulderLeft,
        Joint::ShoulderRight,
    ] {
        p[joint.index()].y -= drop;
    }
    p[Joint::KneeLeft.index()].z -= forward;
    p[Joint::KneeRight.index()].z -= forward;

    p
}

/// Full squat: descend to depth `max_t` at mid-capture and recover.
fn squat_capture(n: usize, max_t: f64) -> PoseSequence {
    let mut seq = PoseSequence::new("Deep Squat");
    for i in 0..n {
        let phase = i as f64 / (n - 1) as f64;
        let t = max_t * (1.0 - (2.0 * phase - 1.0).abs());
        seq.push(Some(SkeletonFrame::new(squat_pose(t))));
    }
    seq
}

// =============================================================================
// DEEP SQUAT
// =============================================================================

#[test]
fn full_depth_squat_scores_both_rules() {
    let evaluation = evaluate_test(&squat_capture(21, 1.0), &ScreenTest::deep_squat());
    assert_eq!(evaluation.score, 2);
    assert!(evaluation.rules.iter().all(|r| r.feedback.is_none()));
}

#[test]
fn shallow_squat_fails_depth_with_feedback() {
    let evaluation = evaluate_test(&squat_capture(21, 0.4), &ScreenTest::deep_squat());
    assert_eq!(evaluation.score, 1);

    let depth = &evaluation.rules[0];
    assert_eq!(depth.score, 0);
    assert!(depth.feedback.as_deref().unwrap().contains("deeper"));
}

#[test]
fn dropped_frames_do_not_affect_scoring() {
    let mut seq = squat_capture(21, 1.0);
    seq.push(None);
    seq.push(None);

    let evaluation = evaluate_test(&seq, &ScreenTest::deep_squat());
    assert_eq!(evaluation.score, 2);
}

#[test]
fn untracked_frames_are_skipped() {
    let mut seq = PoseSequence::new("Deep Squat");
    for (i, frame) in squat_capture(21, 1.0).tracked_frames().enumerate() {
        if i % 3 == 0 {
            let mut positions = [Point3::origin(); JOINT_COUNT];
            for j in Joint::ALL {
                positions[j.index()] = frame.position(j);
            }
            seq.push(Some(SkeletonFrame::with_tracking(
                positions,
                [JointConfidence::Tracked; JOINT_COUNT],
                FrameTracking::PositionOnly,
            )));
        } else {
            seq.push(Some(frame.clone()));
        }
    }

    // The bottom frame is at index 10, which survives the ghosting.
    let evaluation = evaluate_test(&seq, &ScreenTest::deep_squat());
    assert_eq!(evaluation.score, 2);
}

// =============================================================================
// RULE MECHANICS
// =============================================================================

#[test]
fn unmeasurable_rule_scores_zero() {
    // The head has no two-neighbor angle definition.
    let rule = Rule {
        id: 9,
        name: "head angle".to_string(),
        measurement: Measurement::JointAngle { joint: Joint::Head },
        selector: FrameSelector::MaxOverAll,
        standard: 90.0,
        tolerance: 45.0,
        feedback: None,
    };

    let mut seq = PoseSequence::new("");
    seq.push(Some(SkeletonFrame::new(standing_pose())));
    assert_eq!(evaluate_rule(&seq, &rule).score, 0);
}

#[test]
fn extremum_selector_measures_the_bottom_frame() {
    // Knee height minus hip height flips sign only at full depth.
    let rule = Rule {
        id: 1,
        name: "depth at bottom".to_string(),
        measurement: Measurement::AxisDifference {
            upper: Joint::KneeRight,
            lower: Joint::HipRight,
            axis: Axis::Y,
        },
        selector: FrameSelector::ExtremumOf {
            joint: Joint::HipCenter,
            axis: Axis::Y,
            extremum: Extremum::Min,
        },
        standard: 0.05,
        tolerance: 0.02,
        feedback: None,
    };

    assert_eq!(evaluate_rule(&squat_capture(21, 1.0), &rule).score, 1);
    assert_eq!(evaluate_rule(&squat_capture(21, 0.5), &rule).score, 0);
}

#[test]
fn rule_sets_load_from_json() {
    let json = r#"{
        "id": 3,
        "name": "Hurdle Step",
        "rules": [{
            "id": 1,
            "name": "knee flexion",
            "measurement": { "JointAngle": { "joint": "KneeRight" } },
            "selector": "MinOverAll",
            "standard": 90.0,
            "tolerance": 30.0,
            "feedback": "Lift the knee higher."
        }]
    }"#;

    let test: ScreenTest = serde_json::from_str(json).unwrap();
    assert_eq!(test.rules.len(), 1);

    let mut seq = PoseSequence::new("");
    seq.push(Some(SkeletonFrame::new(standing_pose())));
    // A straight standing knee reads near 180 degrees and fails.
    let evaluation = evaluate_test(&seq, &test);
    assert_eq!(evaluation.score, 0);
    assert_eq!(
        evaluation.rules[0].feedback.as_deref(),
        Some("Lift the knee higher.")
    );
}

// =============================================================================
// LIVE FEEDBACK
// =============================================================================

#[test]
fn live_feedback_flags_a_leaning_back() {
    let config = ScreenConfig::default();
    let mut engine = JointGeometryEngine::new(&config);

    engine.update(Some(&SkeletonFrame::new(standing_pose())));
    assert_eq!(engine.feedback_for_current_status(), "You are doing fine.");

    // Push the spine joint forward so the torso bends at the spine.
    let mut bent = standing_pose();
    bent[Joint::Spine.index()].z -= 0.2;
    engine.update(Some(&SkeletonFrame::new(bent)));
    assert_eq!(
        engine.feedback_for_current_status(),
        "Keep your back straight."
    );
}
