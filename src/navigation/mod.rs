//! Navigation subsystem
//!
//! Geometry and steering laws consumed by the waypoint manager:
//! - Geographic projection into the local planar frame
//! - Straight-segment and orbit followers
//! - Fillet transition planning between consecutive segments
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      WaypointManager                        │
//! │              next_directions() called per tick              │
//! └──────────────┬───────────────────────────┬──────────────────┘
//!                │                           │
//!                ▼                           ▼
//! ┌──────────────────────────┐ ┌──────────────────────────────┐
//! │   transition::FilletPlan │ │   geo::GeoProjection         │
//! │   (half-plane, center)   │ │   (lat/lon -> local x/y)     │
//! └──────────────┬───────────┘ └──────────────────────────────┘
//!                │
//!                ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │ follower::steer_along_segment / follower::steer_around_orbit │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod follower;
pub mod geo;
pub mod transition;
pub mod types;

pub use geo::GeoProjection;
pub use types::{NavInput, NavOutput, OutputKind, TurnDirection};
