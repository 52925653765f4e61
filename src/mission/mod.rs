//! Mission data model
//!
//! Pure data structures for flight-path waypoint storage and management.
//!
//! # Waypoint Format
//!
//! - Geographic coordinates in degrees (double precision)
//! - Altitude in meters, carried as `f32` end-to-end
//! - Follow kind (path follow, orbit follow, hold)
//! - Optional fillet turn radius for transitions between segments
//!
//! # Storage
//!
//! - Fixed-size waypoint buffer (max [`PATH_BUFFER_SIZE`] waypoints)
//! - In-memory storage, no persistence
//! - Id-stable neighbour links maintained through every mutation

mod buffer;
mod error;

pub use buffer::{SlotStatus, WaypointBuffer};
pub use error::WaypointError;

/// Maximum number of waypoints in the flight-path buffer
pub const PATH_BUFFER_SIZE: usize = 100;

/// Hold radius in meters engaged automatically at the end of a mission
pub const DEFAULT_HOLD_RADIUS_M: f32 = 50.0;

/// Stable waypoint identifier, assigned by [`WaypointFactory`]
pub type WaypointId = u16;

/// How the aircraft should treat a waypoint once it becomes the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaypointKind {
    /// Straight-line segment tracking between consecutive waypoints
    #[default]
    PathFollow,
    /// Circular tracking around a computed or specified center
    OrbitFollow,
    /// An orbit of indefinite duration, cancelled by external command
    Hold,
}

/// Mission waypoint
///
/// A geographic target with altitude, a follow kind, and id links to its
/// buffer neighbours. Links refer to waypoint ids rather than slot indices
/// so they survive the compaction shifts performed by insert and delete.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    /// Stable id, unique within the buffer until `clear`
    pub id: WaypointId,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Altitude in meters
    pub altitude: f32,
    /// Follow kind
    pub kind: WaypointKind,
    /// Fillet turn radius in meters (`None` = unset)
    pub turn_radius: Option<f32>,
    /// Id of the preceding waypoint in the buffer
    pub previous: Option<WaypointId>,
    /// Id of the following waypoint in the buffer
    pub next: Option<WaypointId>,
}

/// Waypoint factory
///
/// Stamps each new record with the next monotonically increasing id and
/// returns it unattached (both links empty). Records live unattached until
/// the buffer takes ownership of them.
#[derive(Debug)]
pub struct WaypointFactory {
    next_assigned_id: WaypointId,
}

impl WaypointFactory {
    /// Create a factory starting at id 0
    pub const fn new() -> Self {
        Self { next_assigned_id: 0 }
    }

    /// Restart the id sequence (invoked when the flight path is cleared)
    pub fn reset(&mut self) {
        self.next_assigned_id = 0;
    }

    fn assign_id(&mut self) -> WaypointId {
        let id = self.next_assigned_id;
        self.next_assigned_id += 1;
        id
    }

    /// Create a placeholder waypoint with sentinel coordinates
    pub fn blank(&mut self) -> Waypoint {
        Waypoint {
            id: self.assign_id(),
            latitude: -1.0,
            longitude: -1.0,
            altitude: -1.0,
            kind: WaypointKind::PathFollow,
            turn_radius: None,
            previous: None,
            next: None,
        }
    }

    /// Create a waypoint without a fillet turn radius
    pub fn waypoint(
        &mut self,
        latitude: f64,
        longitude: f64,
        altitude: f32,
        kind: WaypointKind,
    ) -> Waypoint {
        Waypoint {
            id: self.assign_id(),
            latitude,
            longitude,
            altitude,
            kind,
            turn_radius: None,
            previous: None,
            next: None,
        }
    }

    /// Create a waypoint with every field set
    pub fn waypoint_with_radius(
        &mut self,
        latitude: f64,
        longitude: f64,
        altitude: f32,
        kind: WaypointKind,
        turn_radius: f32,
    ) -> Waypoint {
        Waypoint {
            turn_radius: Some(turn_radius),
            ..self.waypoint(latitude, longitude, altitude, kind)
        }
    }
}

impl Default for WaypointFactory {
    fn default() -> Self {
        Self::new()
    }
}
