//! Navigation type definitions
//!
//! This module contains the records exchanged with the outer control loop:
//! - `NavInput`: current telemetry fed into the manager each tick
//! - `NavOutput`: steering commands produced by the active follower
//! - `OutputKind`: follow-mode tag attached to every output
//! - `TurnDirection`: orbit direction with its course-law factor

/// Telemetry fed into the waypoint manager each control tick
#[derive(Debug, Clone, Copy, Default)]
pub struct NavInput {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Altitude in meters
    pub altitude: f32,
    /// Magnetic heading in degrees, `[0, 360)`
    pub heading: f32,
}

impl NavInput {
    /// Create a telemetry record
    pub fn new(latitude: f64, longitude: f64, altitude: f32, heading: f32) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
            heading,
        }
    }
}

/// Which follower produced an output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputKind {
    /// Straight-segment tracking
    #[default]
    PathFollow,
    /// Circular tracking around a turn center
    OrbitFollow,
}

/// Direction of an orbit or fillet turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnDirection {
    /// Clockwise seen from above (factor -1)
    Clockwise,
    /// Counter-clockwise seen from above (factor +1)
    CounterClockwise,
}

impl TurnDirection {
    /// Multiplier applied in the orbit course law
    pub fn factor(&self) -> f32 {
        match self {
            TurnDirection::Clockwise => -1.0,
            TurnDirection::CounterClockwise => 1.0,
        }
    }

    /// Signed integer form used in the output record
    pub fn as_i8(&self) -> i8 {
        match self {
            TurnDirection::Clockwise => -1,
            TurnDirection::CounterClockwise => 1,
        }
    }
}

/// Steering commands handed back to the outer control loop
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NavOutput {
    /// Commanded magnetic heading in degrees, `[0, 360)`
    pub desired_heading: f32,
    /// Commanded altitude in meters
    pub desired_altitude: f32,
    /// Distance to the target waypoint in meters (0 during an orbit)
    pub distance_to_next_waypoint: f32,
    /// Turn radius in meters (0 on straight segments outside a hold)
    pub radius: f32,
    /// Turn direction: -1 (CW), 0 (none), +1 (CCW)
    pub turn_direction: i8,
    /// True when the output was produced this tick
    pub is_data_new: bool,
    /// Reserved timestamp field, always 0
    pub time_of_data: u32,
    /// Which follower produced this output
    pub kind: OutputKind,
}
