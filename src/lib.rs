//! wing_trail - Waypoint management core for a fixed-wing UAV autopilot
//!
//! This crate contains the in-flight waypoint manager: a bounded flight-path
//! buffer and the navigation computer that turns current telemetry into
//! steering commands (desired heading, desired altitude, turn radius and
//! direction) on every control tick.
//!
//! # Design Principles
//!
//! - **Pure no_std**: no std library dependencies, no allocation, no I/O
//! - **Single-threaded**: every operation completes within a control tick;
//!   callers sharing a manager across threads wrap it in a mutex
//! - **Errors are values**: fallible operations return
//!   [`mission::WaypointError`] and never partially mutate state
//!
//! # Modules
//!
//! - [`mission`]: waypoint records, the id-stamping factory, and the
//!   bounded flight-path buffer
//! - [`navigation`]: geographic projection, steering laws, and fillet
//!   transition geometry
//! - [`manager`]: the per-tick mode controller tying it all together
//! - [`logging`]: logging macro facade (defmt on embedded targets)

#![no_std]

pub mod logging;
pub mod manager;
pub mod mission;
pub mod navigation;
