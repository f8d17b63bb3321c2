//! Shared pose builders for unit tests.

use nalgebra::{Point3, Vector3};

use crate::skeleton::{Joint, SkeletonFrame, JOINT_COUNT};

/// Joint positions for a neutral standing pose, about 2.5 m from the
/// sensor, y up, subject facing the sensor.
pub fn standing_pose() -> [Point3<f64>; JOINT_COUNT] {
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

/// A fully-tracked neutral standing frame.
pub fn standing_frame() -> SkeletonFrame {
    SkeletonFrame::new(standing_pose())
}

/// Copy of `frame` with one joint translated by `delta`.
pub fn translate_joint(frame: &SkeletonFrame, joint: Joint, delta: Vector3<f64>) -> SkeletonFrame {
    let mut positions = [Point3::origin(); JOINT_COUNT];
    for j in Joint::ALL {
        positions[j.index()] = frame.position(j);
    }
    positions[joint.index()] += delta;
    SkeletonFrame::new(positions)
}

/// Deep-squat bottom position: hips just below the knees, knees
/// traveled forward so the shanks incline toward the sensor.
pub fn squat_bottom_frame() -> SkeletonFrame {
    let mut p = standing_pose();
    let z = 2.5;

    p[Joint::HipCenter.index()] = Point3::new(0.0, 0.45, z);
    p[Joint::HipLeft.index()] = Point3::new(-0.1, 0.45, z);
    p[Joint::HipRight.index()] = Point3::new(0.1, 0.45, z);
    p[Joint::Spine.index()] = Point3::new(0.0, 0.65, z);
    p[Joint::ShoulderCenter.index()] = Point3::new(0.0, 0.85, z);
    p[Joint::Head.index()] = Point3::new(0.0, 1.05, z);
    p[Joint::ShoulderLeft.index()] = Point3::new(-0.2, 0.85, z);
    p[Joint::ShoulderRight.index()] = Point3::new(0.2, 0.85, z);
    p[Joint::KneeLeft.index()] = Point3::new(-0.1, 0.5, z - 0.15);
    p[Joint::KneeRight.index()] = Point3::new(0.1, 0.5, z - 0.15);

    SkeletonFrame::new(p)
}

/// Copy of `frame` with every joint scaled by `k` about the origin.
pub fn scale_frame(frame: &SkeletonFrame, k: f64) -> SkeletonFrame {
    let mut positions = [Point3::origin(); JOINT_COUNT];
    for j in Joint::ALL {
        positions[j.index()] = Point3::from(frame.position(j).coords * k);
    }
    SkeletonFrame::new(positions)
}
