//! Per-joint geometry: angles, axis/plane projections, and velocity.
//!
//! [`JointGeometryEngine`] consumes one skeleton frame per capture tick
//! and derives a [`JointStatus`] for every joint: the angle subtended at
//! the joint by its two defining neighbors, the angles of each neighbor
//! bone against the coordinate axes and planes, and a finite-difference
//! velocity against the previous retained frame.
//!
//! Statuses are held in a bounded sliding window so overlay consumers
//! can read a short history without the engine growing with session
//! length. Dropped frames decay the window by one entry instead of
//! clearing it, which avoids visual snapping when tracking is briefly
//! lost.

use std::collections::VecDeque;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ScreenConfig;
use crate::skeleton::{Joint, SkeletonFrame, JOINT_COUNT};

/// Coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Axis {
    /// All axes in index order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Ordinal, valid as an index into `[T; 3]` tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Unit vector along this axis.
    #[must_use]
    pub fn unit(self) -> Vector3<f64> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        }
    }

    /// Component of a point along this axis.
    #[must_use]
    pub fn component(self, p: &Point3<f64>) -> f64 {
        p.coords[self.index()]
    }
}

/// Coordinate plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum Plane {
    Xy = 0,
    Yz = 1,
    Xz = 2,
}

impl Plane {
    /// All planes in index order.
    pub const ALL: [Plane; 3] = [Plane::Xy, Plane::Yz, Plane::Xz];

    /// Ordinal, valid as an index into `[T; 3]` tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Orthogonal projection of a vector onto this plane.
    #[must_use]
    pub fn project(self, v: &Vector3<f64>) -> Vector3<f64> {
        match self {
            Plane::Xy => Vector3::new(v.x, v.y, 0.0),
            Plane::Yz => Vector3::new(0.0, v.y, v.z),
            Plane::Xz => Vector3::new(v.x, 0.0, v.z),
        }
    }
}

/// The two neighbor joints that define the angle at a joint.
///
/// Joints without exactly two defined neighbors are not eligible for
/// single-joint angle computation.
#[must_use]
pub const fn neighbor_joints(joint: Joint) -> Option<(Joint, Joint)> {
    match joint {
        Joint::ElbowLeft => Some((Joint::WristLeft, Joint::ShoulderLeft)),
        Joint::ElbowRight => Some((Joint::WristRight, Joint::ShoulderRight)),
        Joint::KneeLeft => Some((Joint::HipLeft, Joint::AnkleLeft)),
        Joint::KneeRight => Some((Joint::HipRight, Joint::AnkleRight)),
        Joint::ShoulderLeft => Some((Joint::HipLeft, Joint::ElbowLeft)),
        Joint::ShoulderRight => Some((Joint::HipRight, Joint::ElbowRight)),
        Joint::HipCenter => Some((Joint::HipRight, Joint::ShoulderCenter)),
        Joint::Spine => Some((Joint::ShoulderCenter, Joint::HipCenter)),
        _ => None,
    }
}

/// Angle between two vectors in degrees, in `[0, 180]`.
///
/// The cosine is clamped to `[-1, 1]` before `acos` so floating rounding
/// can never produce NaN. Returns `None` when either vector has
/// (near-)zero length, which makes the angle undefined.
#[must_use]
pub fn vector_angle(v1: &Vector3<f64>, v2: &Vector3<f64>) -> Option<f64> {
    let n1 = v1.norm();
    let n2 = v2.norm();
    if n1 < 1e-12 || n2 < 1e-12 {
        return None;
    }
    let cos = (v1.dot(v2) / (n1 * n2)).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Angle between a bone and a coordinate plane in degrees, in
/// `[0, 90]`.
///
/// Computed against the bone's projection onto the plane; a bone
/// perpendicular to the plane reads 90 rather than being undefined.
/// `None` only for a (near-)zero-length bone.
#[must_use]
pub fn plane_angle(bone: &Vector3<f64>, plane: Plane) -> Option<f64> {
    if bone.norm() < 1e-12 {
        return None;
    }
    let projection = plane.project(bone);
    if projection.norm() < 1e-12 {
        return Some(90.0);
    }
    vector_angle(bone, &projection)
}

/// Angles of one neighbor bone against the coordinate axes and planes.
///
/// The bone is the vector from the status joint to `neighbor`. Axis and
/// plane slots are indexed by [`Axis::index`] / [`Plane::index`]; a
/// degenerate bone leaves `None` in every slot.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborAngles {
    /// Neighbor joint the bone points at.
    pub neighbor: Joint,
    /// Angle against each unit axis, degrees.
    pub axis: [Option<f64>; 3],
    /// Angle between the bone and its projection onto each plane, degrees.
    pub plane: [Option<f64>; 3],
}

impl NeighborAngles {
    fn compute(neighbor: Joint, bone: &Vector3<f64>) -> Self {
        let mut axis = [None; 3];
        for a in Axis::ALL {
            axis[a.index()] = vector_angle(bone, &a.unit());
        }
        let mut plane = [None; 3];
        for p in Plane::ALL {
            plane[p.index()] = plane_angle(bone, p);
        }
        Self {
            neighbor,
            axis,
            plane,
        }
    }
}

/// Derived state for one joint in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct JointStatus {
    /// Sensor-space position, meters.
    pub position: Point3<f64>,
    /// Componentwise displacement against the previous retained frame.
    pub velocity: Vector3<f64>,
    /// Speed in m/s: `frame_rate * |velocity|`. Zero until a previous
    /// window entry exists for this joint.
    pub abs_speed: f64,
    /// Angle at this joint between its two neighbor bones, degrees.
    /// `None` for joints with no two-neighbor definition or when the
    /// pose is degenerate at this joint.
    pub angle: Option<f64>,
    /// Axis/plane angle tables for the up-to-two neighbor bones.
    pub neighbors: [Option<NeighborAngles>; 2],
}

impl JointStatus {
    fn at(position: Point3<f64>) -> Self {
        Self {
            position,
            velocity: Vector3::zeros(),
            abs_speed: 0.0,
            angle: None,
            neighbors: [None, None],
        }
    }

    /// Angle of the bone toward `neighbor` against `axis`, if computed.
    #[must_use]
    pub fn axis_angle(&self, neighbor: Joint, axis: Axis) -> Option<f64> {
        self.neighbors
            .iter()
            .flatten()
            .find(|n| n.neighbor == neighbor)
            .and_then(|n| n.axis[axis.index()])
    }

    /// Angle of the bone toward `neighbor` against its projection on
    /// `plane`, if computed.
    #[must_use]
    pub fn plane_angle(&self, neighbor: Joint, plane: Plane) -> Option<f64> {
        self.neighbors
            .iter()
            .flatten()
            .find(|n| n.neighbor == neighbor)
            .and_then(|n| n.plane[plane.index()])
    }
}

/// Per-joint status for one processed frame, indexed by [`Joint::index`].
pub type JointStatusMap = [Option<JointStatus>; JOINT_COUNT];

/// Computes joint status from raw frames and keeps a bounded history.
#[derive(Debug)]
pub struct JointGeometryEngine {
    frame_rate: f64,
    capacity: usize,
    window: VecDeque<JointStatusMap>,
}

impl JointGeometryEngine {
    /// Create an engine from configuration.
    #[must_use]
    pub fn new(config: &ScreenConfig) -> Self {
        Self {
            frame_rate: config.frame_rate,
            capacity: config.window_capacity,
            window: VecDeque::with_capacity(config.window_capacity),
        }
    }

    /// Angle at `joint` between its two neighbor bones, degrees.
    ///
    /// `None` when the joint has no two-neighbor definition or the pose
    /// is degenerate there.
    #[must_use]
    pub fn compute_joint_angle(frame: &SkeletonFrame, joint: Joint) -> Option<f64> {
        let (n1, n2) = neighbor_joints(joint)?;
        let center = frame.position(joint);
        let v1 = frame.position(n1) - center;
        let v2 = frame.position(n2) - center;
        vector_angle(&v1, &v2)
    }

    /// Process one capture tick.
    ///
    /// A `None` frame (capture drop) pops the oldest window entry so
    /// stale state decays instead of lingering. An untracked frame
    /// updates nothing. A tracked frame produces a full status map and
    /// evicts the oldest entry once the window is at capacity.
    pub fn update(&mut self, frame: Option<&SkeletonFrame>) {
        let Some(frame) = frame else {
            self.window.pop_front();
            return;
        };

        if !frame.is_tracked() {
            debug!("input skeleton not tracked, status window unchanged");
            return;
        }

        let previous = self.window.back();
        let mut statuses: JointStatusMap = std::array::from_fn(|_| None);

        for joint in Joint::ALL {
            let mut status = JointStatus::at(frame.position(joint));

            if let Some((n1, n2)) = neighbor_joints(joint) {
                let center = status.position;
                let bone1 = frame.position(n1) - center;
                let bone2 = frame.position(n2) - center;

                status.angle = vector_angle(&bone1, &bone2);
                status.neighbors = [
                    Some(NeighborAngles::compute(n1, &bone1)),
                    Some(NeighborAngles::compute(n2, &bone2)),
                ];
            }

            if let Some(prev) = previous.and_then(|map| map[joint.index()].as_ref()) {
                status.velocity = status.position - prev.position;
                status.abs_speed = self.frame_rate * status.velocity.norm();
            }

            statuses[joint.index()] = Some(status);
        }

        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(statuses);
    }

    /// Status map from the most recent processed frame.
    #[must_use]
    pub fn current(&self) -> Option<&JointStatusMap> {
        self.window.back()
    }

    /// Status of one joint in the most recent processed frame.
    #[must_use]
    pub fn current_joint(&self, joint: Joint) -> Option<&JointStatus> {
        self.current().and_then(|map| map[joint.index()].as_ref())
    }

    /// Number of frames currently retained.
    #[must_use]
    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// Drop all retained state.
    pub fn reset(&mut self) {
        self.window.clear();
    }

    /// Coarse posture feedback from the latest status: flags a bent
    /// back when the spine angle strays more than 10 degrees from
    /// straight.
    #[must_use]
    pub fn feedback_for_current_status(&self) -> &'static str {
        if let Some(angle) = self.current_joint(Joint::Spine).and_then(|s| s.angle) {
            if (angle - 180.0).abs() > 10.0 {
                return "Keep your back straight.";
            }
        }
        "You are doing fine."
    }
}
