//! Declarative movement-screen scoring.
//!
//! A screen test (e.g. the deep squat) is an ordered list of rules.
//! Each rule names one geometric quantity to measure (a joint angle, a
//! bone-vs-plane angle, or a signed position difference along an axis)
//! together with a frame-selection policy, a standard value, and a
//! tolerance. A rule passes when the measured value falls strictly
//! inside the tolerance band; the test score is the sum of passing
//! rules.
//!
//! Rules are plain data with serde derives, so rule sets can be
//! authored in configuration and loaded by the persistence layer.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::{plane_angle, Axis, JointGeometryEngine, Plane};
use crate::skeleton::{Joint, PoseSequence, SkeletonFrame};

/// One geometric quantity to measure on a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Measurement {
    /// Angle at `joint` between its two table-defined neighbor bones.
    JointAngle { joint: Joint },
    /// Angle between the bone `from`→`to` and its orthogonal
    /// projection onto `plane`, in `[0, 90]` degrees.
    PlaneAngle { from: Joint, to: Joint, plane: Plane },
    /// Signed coordinate difference `upper - lower` along `axis`,
    /// meters.
    AxisDifference { upper: Joint, lower: Joint, axis: Axis },
}

impl Measurement {
    /// Evaluate this measurement on one frame.
    ///
    /// `None` when the quantity is undefined there: a joint without a
    /// two-neighbor angle definition, or a degenerate (zero-length)
    /// bone.
    #[must_use]
    pub fn measure(&self, frame: &SkeletonFrame) -> Option<f64> {
        match *self {
            Self::JointAngle { joint } => JointGeometryEngine::compute_joint_angle(frame, joint),
            Self::PlaneAngle { from, to, plane } => {
                plane_angle(&(frame.position(to) - frame.position(from)), plane)
            }
            Self::AxisDifference { upper, lower, axis } => Some(
                axis.component(&frame.position(upper)) - axis.component(&frame.position(lower)),
            ),
        }
    }
}

/// Which end of a coordinate range selects the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Extremum {
    Min,
    Max,
}

/// Per-rule policy for turning a sequence into one measured value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FrameSelector {
    /// Measure the single frame where `joint`'s coordinate along
    /// `axis` is globally minimal/maximal (e.g. the squat bottom as
    /// the frame of minimum hip height).
    ExtremumOf {
        joint: Joint,
        axis: Axis,
        extremum: Extremum,
    },
    /// Measure every frame and keep the maximum observed value.
    MaxOverAll,
    /// Measure every frame and keep the minimum observed value.
    MinOverAll,
}

/// One scorable rule of a screen test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Identifier unique within the owning test.
    pub id: u32,
    /// Human-readable rule name.
    pub name: String,
    /// Quantity to measure.
    pub measurement: Measurement,
    /// How to pick the measured value from the sequence.
    pub selector: FrameSelector,
    /// Expected value of the measurement.
    pub standard: f64,
    /// Accepted deviation; the pass band is open:
    /// `|measured - standard| < tolerance`.
    pub tolerance: f64,
    /// Feedback surfaced to the subject when the rule fails.
    pub feedback: Option<String>,
}

impl Rule {
    /// Whether a measured value passes this rule. The band is strict:
    /// a measurement exactly at `standard ± tolerance` fails.
    #[must_use]
    pub fn passes(&self, measured: f64) -> bool {
        (measured - self.standard).abs() < self.tolerance
    }
}

/// Score of one rule: 1 for pass, 0 for fail or unmeasurable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEvaluation {
    /// Rule identifier.
    pub rule_id: u32,
    /// Binary score.
    pub score: u32,
    /// Rule feedback, present only when the rule failed.
    pub feedback: Option<String>,
}

/// A named movement-screen test: an ordered list of rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenTest {
    /// Test identifier.
    pub id: u32,
    /// Test name, e.g. "Deep Squat".
    pub name: String,
    /// Rules in scoring order.
    pub rules: Vec<Rule>,
}

/// Aggregate result of one test over one capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestEvaluation {
    /// Test identifier.
    pub test_id: u32,
    /// Sum of rule scores, in `0..=rules.len()`.
    pub score: u32,
    /// Per-rule outcomes in rule order.
    pub rules: Vec<RuleEvaluation>,
}

/// Evaluate one rule against a trimmed capture.
///
/// A rule with no measurable frame (empty sequence, nothing tracked,
/// or geometry undefined on every selected frame) scores 0 rather
/// than failing the evaluation.
#[must_use]
pub fn evaluate_rule(sequence: &PoseSequence, rule: &Rule) -> RuleEvaluation {
    let measured = select_measurement(sequence, rule);

    let score = match measured {
        Some(value) => u32::from(rule.passes(value)),
        None => {
            debug!(rule = rule.id, "rule has no measurable frame, scoring 0");
            0
        }
    };

    RuleEvaluation {
        rule_id: rule.id,
        score,
        feedback: (score == 0).then(|| rule.feedback.clone()).flatten(),
    }
}

/// Evaluate a whole test; the test score is the sum of rule scores.
#[must_use]
pub fn evaluate_test(sequence: &PoseSequence, test: &ScreenTest) -> TestEvaluation {
    let rules: Vec<RuleEvaluation> = test
        .rules
        .iter()
        .map(|rule| evaluate_rule(sequence, rule))
        .collect();
    let score = rules.iter().map(|r| r.score).sum();

    TestEvaluation {
        test_id: test.id,
        score,
        rules,
    }
}

/// Apply the rule's frame-selection policy to produce one value.
fn select_measurement(sequence: &PoseSequence, rule: &Rule) -> Option<f64> {
    match rule.selector {
        FrameSelector::ExtremumOf {
            joint,
            axis,
            extremum,
        } => {
            let key = |frame: &&SkeletonFrame| axis.component(&frame.position(joint));
            let frame = match extremum {
                Extremum::Min => sequence
                    .tracked_frames()
                    .min_by(|a, b| key(a).total_cmp(&key(b))),
                Extremum::Max => sequence
                    .tracked_frames()
                    .max_by(|a, b| key(a).total_cmp(&key(b))),
            }?;
            rule.measurement.measure(frame)
        }
        FrameSelector::MaxOverAll => sequence
            .tracked_frames()
            .filter_map(|frame| rule.measurement.measure(frame))
            .max_by(f64::total_cmp),
        FrameSelector::MinOverAll => sequence
            .tracked_frames()
            .filter_map(|frame| rule.measurement.measure(frame))
            .min_by(f64::total_cmp),
    }
}

impl ScreenTest {
    /// The deep-squat screen: femur depth plus shin inclination at the
    /// lowest point of the squat.
    #[must_use]
    pub fn deep_squat() -> Self {
        Self {
            id: 1,
            name: "Deep Squat".to_string(),
            rules: vec![
                Rule {
                    id: 1,
                    name: "Femur below horizontal".to_string(),
                    measurement: Measurement::AxisDifference {
                        upper: Joint::KneeRight,
                        lower: Joint::HipRight,
                        axis: Axis::Y,
                    },
                    selector: FrameSelector::MaxOverAll,
                    standard: 0.05,
                    tolerance: 0.10,
                    feedback: Some("Squat deeper: hips must drop below the knees.".to_string()),
                },
                Rule {
                    id: 2,
                    name: "Tibia near vertical at squat bottom".to_string(),
                    measurement: Measurement::PlaneAngle {
                        from: Joint::KneeRight,
                        to: Joint::AnkleRight,
                        plane: Plane::Xz,
                    },
                    selector: FrameSelector::ExtremumOf {
                        joint: Joint::HipCenter,
                        axis: Axis::Y,
                        extremum: Extremum::Min,
                    },
                    standard: 90.0,
                    tolerance: 30.0,
                    feedback: Some("Keep your shins closer to vertical at the bottom.".to_string()),
                },
            ],
        }
    }
}
