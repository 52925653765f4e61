//! Steering laws
//!
//! Pure functions converting local-frame geometry into commanded magnetic
//! headings. Two laws are provided: straight-segment tracking driven by
//! cross-track error, and orbit tracking driven by radial error. Both work
//! in the Cartesian course convention (`course = 90 deg - heading`) and
//! convert back to magnetic degrees on the way out.

use libm::{atan2f, atanf, cosf, roundf, sinf, sqrtf};
use nalgebra::Vector3;

use super::geo::{wrap_360, wrap_about};
use super::types::TurnDirection;

/// Proportional gain on cross-track error for straight segments
pub const K_PATH: f32 = 0.01;

/// Proportional gain on relative radial error for orbits
pub const K_ORBIT: f32 = 1.0;

/// Maximum angle at which a segment is approached
pub const MAX_PATH_APPROACH_ANGLE: f32 = core::f32::consts::FRAC_PI_2;

const DEG_TO_RAD: f32 = core::f32::consts::PI / 180.0;
const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;

/// Magnetic heading (degrees) to Cartesian course (radians)
fn course_from_heading(heading_deg: f32) -> f32 {
    (90.0 - heading_deg) * DEG_TO_RAD
}

/// Commanded heading to track a straight segment
///
/// # Arguments
///
/// * `direction` - Unit vector of the segment, pointing at the target
/// * `target` - Target point of the segment in the local frame
/// * `position` - Aircraft position in the local frame
/// * `heading_deg` - Current magnetic heading
///
/// # Returns
///
/// Commanded magnetic heading in `[0, 360)` degrees. The approach angle is
/// bounded by [`MAX_PATH_APPROACH_ANGLE`] as the cross-track error grows.
pub fn steer_along_segment(
    direction: &Vector3<f32>,
    target: &Vector3<f32>,
    position: &Vector3<f32>,
    heading_deg: f32,
) -> f32 {
    let course = course_from_heading(heading_deg);
    let path_course = wrap_about(atan2f(direction.y, direction.x), course);

    let cross_track = -sinf(path_course) * (position.x - target.x)
        + cosf(path_course) * (position.y - target.y);

    let commanded = path_course
        - MAX_PATH_APPROACH_ANGLE * (2.0 / core::f32::consts::PI) * atanf(K_PATH * cross_track);

    wrap_360(90.0 - commanded * RAD_TO_DEG)
}

/// Commanded heading to track a circular orbit
///
/// # Arguments
///
/// * `position` - Aircraft position in the local frame
/// * `center` - Orbit center in the local frame
/// * `radius` - Orbit radius in meters, positive
/// * `direction` - Orbit direction
/// * `heading_deg` - Current magnetic heading
///
/// # Returns
///
/// Commanded magnetic heading in `[0, 360)` degrees, rounded to the
/// nearest integer value.
pub fn steer_around_orbit(
    position: &Vector3<f32>,
    center: &Vector3<f32>,
    radius: f32,
    direction: TurnDirection,
    heading_deg: f32,
) -> f32 {
    let course = course_from_heading(heading_deg);

    let dx = position.x - center.x;
    let dy = position.y - center.y;
    let radial_distance = sqrtf(dx * dx + dy * dy);
    let course_to_radial = wrap_about(atan2f(dy, dx), course);

    let commanded = course_to_radial
        + direction.factor()
            * (core::f32::consts::FRAC_PI_2 + atanf(K_ORBIT * (radial_distance - radius) / radius));

    wrap_360(roundf(90.0 - commanded * RAD_TO_DEG))
}
