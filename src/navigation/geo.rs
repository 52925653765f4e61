//! Geographic projection and angle utilities
//!
//! Converts `(lat, lon)` pairs into a local planar frame anchored at a fixed
//! reference point. The Haversine scalar is signed so a single distance
//! function doubles as an axis projection: callers recovering a direction
//! pass the reference point first. Accuracy is acceptable for the
//! tens-of-kilometres radius a small UAV mission covers around its anchor.

use libm::{asin, atan2, cos, floorf, sin, sqrt};

/// Spherical Earth radius used by the projection, in kilometres
pub const EARTH_RADIUS_KM: f64 = 6378.137;

const DEG_TO_RAD: f64 = core::f64::consts::PI / 180.0;
const RAD_TO_DEG: f64 = 180.0 / core::f64::consts::PI;

/// Planar projection anchored at a fixed reference point
#[derive(Debug, Clone, Copy)]
pub struct GeoProjection {
    reference_latitude: f64,
    reference_longitude: f64,
}

impl GeoProjection {
    /// Create a projection anchored at the given reference point (degrees)
    pub const fn new(reference_latitude: f64, reference_longitude: f64) -> Self {
        Self {
            reference_latitude,
            reference_longitude,
        }
    }

    /// Anchor of the projection as `(latitude, longitude)` in degrees
    pub fn reference(&self) -> (f64, f64) {
        (self.reference_latitude, self.reference_longitude)
    }

    /// Signed Haversine distance in metres
    ///
    /// Positive when the latitude and longitude deltas share a sign,
    /// negative otherwise. This is what lets [`Self::to_local`] recover an
    /// axis direction from a scalar; callers relying on the sign must pass
    /// the reference point as `(lat1, lon1)`.
    pub fn signed_distance(&self, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f32 {
        let delta_lat = (lat2 - lat1) * DEG_TO_RAD;
        let delta_lon = (lon2 - lon1) * DEG_TO_RAD;

        let sin_dlat = sin(delta_lat / 2.0);
        let sin_dlon = sin(delta_lon / 2.0);
        let a = sin_dlat * sin_dlat
            + cos(lat1 * DEG_TO_RAD) * cos(lat2 * DEG_TO_RAD) * sin_dlon * sin_dlon;
        let arc = 2.0 * atan2(sqrt(a), sqrt(1.0 - a));
        let metres = EARTH_RADIUS_KM * arc * 1000.0;

        if (delta_lat >= 0.0 && delta_lon >= 0.0) || (delta_lat < 0.0 && delta_lon < 0.0) {
            metres as f32
        } else {
            -metres as f32
        }
    }

    /// Project geographic coordinates into the local frame
    ///
    /// Returns `(x, y)` in metres: `x` east of the anchor, `y` north of it.
    /// Altitude is carried through by the caller untouched.
    pub fn to_local(&self, latitude: f64, longitude: f64) -> (f32, f32) {
        let x = self.signed_distance(
            self.reference_latitude,
            self.reference_longitude,
            self.reference_latitude,
            longitude,
        );
        let y = self.signed_distance(
            self.reference_latitude,
            self.reference_longitude,
            latitude,
            self.reference_longitude,
        );
        (x, y)
    }
}

/// Normalize a heading into `[0, 360)` degrees
pub fn wrap_360(degrees: f32) -> f32 {
    let wrapped = degrees % 360.0;
    if wrapped < 0.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Wrap an angle into `[reference - pi, reference + pi]` radians
pub fn wrap_about(angle: f32, reference: f32) -> f32 {
    const TWO_PI: f32 = 2.0 * core::f32::consts::PI;
    let delta = angle - reference;
    reference + delta - TWO_PI * floorf((delta + core::f32::consts::PI) / TWO_PI)
}

/// Destination point along a great circle
///
/// Starting at `(latitude, longitude)` degrees, travel `distance_m` metres
/// on the initial bearing `bearing_deg` (magnetic degrees clockwise from
/// north). Returns the destination `(latitude, longitude)` in degrees.
pub fn destination_point(
    latitude: f64,
    longitude: f64,
    bearing_deg: f64,
    distance_m: f64,
) -> (f64, f64) {
    let angular = distance_m / (EARTH_RADIUS_KM * 1000.0);
    let bearing = bearing_deg * DEG_TO_RAD;
    let lat1 = latitude * DEG_TO_RAD;
    let lon1 = longitude * DEG_TO_RAD;

    let lat2 = asin(sin(lat1) * cos(angular) + cos(lat1) * sin(angular) * cos(bearing));
    let lon2 = lon1
        + atan2(
            sin(bearing) * sin(angular) * cos(lat1),
            cos(angular) - sin(lat1) * sin(lat2),
        );

    (lat2 * RAD_TO_DEG, lon2 * RAD_TO_DEG)
}
