//! Fillet transition geometry
//!
//! Plans the circular arc that joins two consecutive straight segments.
//! Given the current waypoint, the target, and the waypoint after the
//! target, the planner derives the half-plane at which the follower hands
//! off from straight tracking to the fillet turn, and the center of that
//! turn.
//!
//! The turn-center denominator uses a componentwise-signed Euclidean norm
//! (each component's sign multiplied into the length). The flight-tested
//! behaviour is preserved as-is; collinear segments make it vanish, which
//! is detected before the division and skips the orbit entirely.

use libm::{acosf, sqrtf, tanf};
use nalgebra::Vector3;

use super::types::TurnDirection;

/// Unit vector from `from` to `to`, or `None` when the points coincide
pub fn unit_direction(from: &Vector3<f32>, to: &Vector3<f32>) -> Option<Vector3<f32>> {
    let delta = to - from;
    let norm = delta.norm();
    if norm == 0.0 {
        return None;
    }
    Some(delta / norm)
}

/// Euclidean length carrying the sign of every component
pub fn signed_norm(v: &Vector3<f32>) -> f32 {
    let length = sqrtf(v.x * v.x + v.y * v.y + v.z * v.z);
    let sign = |c: f32| if c < 0.0 { -1.0 } else { 1.0 };
    length * sign(v.x) * sign(v.y) * sign(v.z)
}

/// Geometry of the fillet joining two segments at a target waypoint
#[derive(Debug, Clone, Copy)]
pub struct FilletPlan {
    /// Unit direction of the incoming segment (current -> target)
    pub inbound: Vector3<f32>,
    /// Unit direction of the outgoing segment (target -> after)
    pub outbound: Vector3<f32>,
    /// Target waypoint in the local frame
    pub target: Vector3<f32>,
    /// Distance from the target back to the fillet tangent point
    pub tangent_factor: f32,
    /// Point on the half-plane switch line
    pub half_plane: Vector3<f32>,
}

/// Plan the fillet between the segments `w0 -> w1` and `w1 -> w2`
///
/// Returns `None` when either segment is degenerate (coincident points).
pub fn fillet_between(
    w0: &Vector3<f32>,
    w1: &Vector3<f32>,
    w2: &Vector3<f32>,
    turn_radius: f32,
) -> Option<FilletPlan> {
    let inbound = unit_direction(w0, w1)?;
    let outbound = unit_direction(w1, w2)?;

    let dot = (-inbound.dot(&outbound)).clamp(-1.0, 1.0);
    let turning_angle = acosf(dot);
    let tangent_factor = turn_radius / tanf(turning_angle / 2.0);
    let half_plane = w1 - inbound * tangent_factor;

    Some(FilletPlan {
        inbound,
        outbound,
        target: *w1,
        tangent_factor,
        half_plane,
    })
}

impl FilletPlan {
    /// Has the aircraft crossed the half-plane along the incoming segment?
    pub fn crossed_inbound(&self, position: &Vector3<f32>) -> bool {
        self.inbound.dot(&(position - self.half_plane)) > 0.0
    }

    /// Has the aircraft crossed the half-plane along the outgoing segment?
    pub fn crossed_outbound(&self, position: &Vector3<f32>) -> bool {
        self.outbound.dot(&(position - self.half_plane)) > 0.0
    }

    /// Direction of the fillet turn, from the segment cross product
    pub fn turn_direction(&self) -> TurnDirection {
        if self.inbound.x * self.outbound.y - self.inbound.y * self.outbound.x > 0.0 {
            TurnDirection::CounterClockwise
        } else {
            TurnDirection::Clockwise
        }
    }

    /// Center of the fillet turn
    ///
    /// `None` when the segments are collinear (the signed norm of the bend
    /// vanishes); the caller stays in straight tracking in that case.
    pub fn turn_center(&self) -> Option<Vector3<f32>> {
        let bend = self.outbound - self.inbound;
        let denominator = signed_norm(&bend);
        if denominator == 0.0 {
            return None;
        }
        Some(self.target + bend * (self.tangent_factor / denominator))
    }
}
