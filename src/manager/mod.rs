//! Waypoint manager
//!
//! Top-level mode controller of the navigation computer. Each control tick
//! it converts current telemetry into steering commands by selecting a
//! follower: straight-segment tracking, the fillet turn joining two
//! segments, an indefinite hold orbit, or the home-return path.
//!
//! Mode priority per tick:
//!
//! 1. **Hold** — orbit the stored center until cancelled
//! 2. **Home return** — fly the synthesized segment to the home position,
//!    then hold there
//! 3. **Mission** — follow the flight path from the current waypoint, with
//!    fillet transitions where a two-waypoint look-ahead exists
//!
//! The manager never advances the current waypoint on capture; that policy
//! belongs to the collaborator driving [`WaypointManager::change_current_index`].

use nalgebra::Vector3;

use crate::mission::{
    Waypoint, WaypointBuffer, WaypointError, WaypointFactory, WaypointId, WaypointKind,
    DEFAULT_HOLD_RADIUS_M,
};
use crate::navigation::follower::{steer_along_segment, steer_around_orbit};
use crate::navigation::geo::{destination_point, wrap_360, GeoProjection};
use crate::navigation::transition::{fillet_between, unit_direction};
use crate::navigation::types::{NavInput, NavOutput, OutputKind, TurnDirection};

/// A single flight-path edit, dispatched through
/// [`WaypointManager::update_path_nodes`]
#[derive(Debug, Clone, Copy)]
pub enum PathUpdate {
    /// Append a waypoint to the end of the flight path
    Append(Waypoint),
    /// Insert a waypoint between two adjacent waypoints
    Insert {
        /// The waypoint to insert
        waypoint: Waypoint,
        /// Id of the waypoint that will precede the new one
        previous_id: WaypointId,
        /// Id of the waypoint that will follow the new one
        next_id: WaypointId,
    },
    /// Replace the waypoint with the given id in place
    Update {
        /// The replacement waypoint
        waypoint: Waypoint,
        /// Id of the waypoint being replaced
        id: WaypointId,
    },
    /// Remove the waypoint with the given id
    Delete {
        /// Id of the waypoint to remove
        id: WaypointId,
    },
}

/// In-flight waypoint manager
///
/// Owns the flight-path buffer, the optional home position, and the orbit
/// state shared by holds and fillet turns. All operations complete
/// synchronously within a control tick; the manager performs no I/O and no
/// allocation.
pub struct WaypointManager {
    projection: GeoProjection,
    factory: WaypointFactory,
    buffer: WaypointBuffer,
    home: Option<Waypoint>,

    /// Fillet sub-mode: straight leg or turning between legs
    follow_mode: OutputKind,
    in_hold: bool,
    going_home: bool,
    data_is_new: bool,

    /// Orbit center in the local frame (z carries the orbit altitude)
    turn_center: Vector3<f32>,
    turn_radius: f32,
    turn_direction: Option<TurnDirection>,
    turn_desired_altitude: f32,

    desired_heading: f32,
    desired_altitude: f32,
    distance_to_next: f32,
    output_kind: OutputKind,
}

impl WaypointManager {
    /// Create a manager with its projection anchored at the given
    /// reference point (degrees)
    pub fn new(reference_latitude: f64, reference_longitude: f64) -> Self {
        Self {
            projection: GeoProjection::new(reference_latitude, reference_longitude),
            factory: WaypointFactory::new(),
            buffer: WaypointBuffer::new(),
            home: None,
            follow_mode: OutputKind::PathFollow,
            in_hold: false,
            going_home: false,
            data_is_new: false,
            turn_center: Vector3::zeros(),
            turn_radius: 0.0,
            turn_direction: None,
            turn_desired_altitude: 0.0,
            desired_heading: 0.0,
            desired_altitude: 0.0,
            distance_to_next: 0.0,
            output_kind: OutputKind::PathFollow,
        }
    }

    // ========================================================================
    // Waypoint factory
    // ========================================================================

    /// Create a placeholder waypoint with sentinel coordinates
    pub fn create_blank_waypoint(&mut self) -> Waypoint {
        self.factory.blank()
    }

    /// Create a waypoint without a fillet turn radius
    pub fn create_waypoint(
        &mut self,
        latitude: f64,
        longitude: f64,
        altitude: f32,
        kind: WaypointKind,
    ) -> Waypoint {
        self.factory.waypoint(latitude, longitude, altitude, kind)
    }

    /// Create a waypoint with every field set
    pub fn create_waypoint_with_radius(
        &mut self,
        latitude: f64,
        longitude: f64,
        altitude: f32,
        kind: WaypointKind,
        turn_radius: f32,
    ) -> Waypoint {
        self.factory
            .waypoint_with_radius(latitude, longitude, altitude, kind, turn_radius)
    }

    // ========================================================================
    // Flight path management
    // ========================================================================

    /// Install an initial flight path, optionally recording the current
    /// location as the home position
    pub fn initialize_flight_path(
        &mut self,
        initial: &[Waypoint],
        current_location: Option<Waypoint>,
    ) -> Result<(), WaypointError> {
        self.buffer.initialize(initial)?;
        if let Some(mut home) = current_location {
            home.previous = None;
            home.next = None;
            self.home = Some(home);
        }
        crate::log_info!("flight path initialized: {} waypoints", initial.len());
        Ok(())
    }

    /// Apply a single flight-path edit
    pub fn update_path_nodes(&mut self, update: PathUpdate) -> Result<(), WaypointError> {
        if self.buffer.is_full()
            && matches!(update, PathUpdate::Append(_) | PathUpdate::Insert { .. })
        {
            return Err(WaypointError::InvalidParameters);
        }

        match update {
            PathUpdate::Append(waypoint) => self.buffer.append(waypoint),
            PathUpdate::Insert {
                waypoint,
                previous_id,
                next_id,
            } => self.buffer.insert(waypoint, previous_id, next_id),
            PathUpdate::Update { waypoint, id } => self.buffer.update(waypoint, id),
            PathUpdate::Delete { id } => self.buffer.delete(id),
        }
    }

    /// Destroy the flight path and restart the id sequence
    pub fn clear_path_nodes(&mut self) {
        self.buffer.clear();
        self.factory.reset();
    }

    /// Move the current waypoint to the one with the given id
    ///
    /// Requires the two-waypoint look-ahead of the transition planner; the
    /// collaborator calls this to advance the mission on waypoint capture.
    pub fn change_current_index(&mut self, id: WaypointId) -> Result<(), WaypointError> {
        self.buffer.change_current_index(id)
    }

    // ========================================================================
    // Mode commands
    // ========================================================================

    /// Toggle the home-return state
    ///
    /// Returns `false` when no home position is set. On the rising edge the
    /// flight path is cleared so a post-return mission can be loaded, and
    /// the call returns `true`; calling again cancels the return.
    pub fn head_home(&mut self) -> bool {
        if self.home.is_none() {
            return false;
        }

        if !self.going_home {
            self.clear_path_nodes();
            self.going_home = true;
            crate::log_info!("heading home: flight path cleared");
            true
        } else {
            self.going_home = false;
            false
        }
    }

    /// Start or cancel an indefinite hold at the current position
    ///
    /// The orbit center is placed one radius abeam of the aircraft: to the
    /// right for a clockwise hold, to the left for counter-clockwise.
    pub fn start_circling(
        &mut self,
        current: &NavInput,
        radius: f32,
        direction: TurnDirection,
        altitude: f32,
        cancel: bool,
    ) {
        if cancel {
            self.in_hold = false;
            crate::log_info!("hold cancelled");
            return;
        }

        self.turn_desired_altitude = altitude;
        self.turn_radius = radius;
        self.turn_direction = Some(direction);

        let center_bearing = wrap_360(match direction {
            TurnDirection::Clockwise => current.heading + 90.0,
            TurnDirection::CounterClockwise => current.heading - 90.0,
        });
        let (center_lat, center_lon) = destination_point(
            current.latitude,
            current.longitude,
            center_bearing as f64,
            radius as f64,
        );
        let (x, y) = self.projection.to_local(center_lat, center_lon);
        self.turn_center = Vector3::new(x, y, altitude);

        self.in_hold = true;
        crate::log_info!("hold engaged: radius {} m", radius);
    }

    // ========================================================================
    // Navigation tick
    // ========================================================================

    /// Compute steering commands for the current telemetry
    ///
    /// Pure function of the telemetry and the manager state as of tick
    /// entry; never blocks and performs no I/O.
    pub fn next_directions(&mut self, current: &NavInput) -> Result<NavOutput, WaypointError> {
        // Holding has priority over heading home
        if self.in_hold {
            if !(self.turn_radius > 0.0) || !self.turn_radius.is_finite() {
                return Err(WaypointError::InvalidParameters);
            }
            let direction = self
                .turn_direction
                .ok_or(WaypointError::InvalidParameters)?;

            let position = self.local_position(current);
            self.follow_orbit(&position, current.heading, direction);

            self.data_is_new = true;
            return Ok(self.read_output());
        }

        let position = self.local_position(current);

        if self.going_home {
            // The segment to home is synthesized from the current position;
            // no transient waypoint record is allocated
            let home = self.home.ok_or(WaypointError::UndefinedParameter)?;
            let hold_radius = home.turn_radius.unwrap_or(DEFAULT_HOLD_RADIUS_M);
            self.follow_last_segment(&home, hold_radius, &position, current.heading);

            self.data_is_new = true;
            return Ok(self.read_output());
        }

        if self.buffer.current_index() >= self.buffer.len() {
            return Err(WaypointError::CurrentIndexInvalid);
        }

        self.follow_waypoints(&position, current.heading);

        self.data_is_new = true;
        Ok(self.read_output())
    }

    // ========================================================================
    // Followers
    // ========================================================================

    /// Dispatch on the two-waypoint look-ahead from the current waypoint
    fn follow_waypoints(&mut self, position: &Vector3<f32>, heading: f32) {
        // Copies: the borrow of the buffer must end before state changes
        let current = match self.buffer.current_waypoint() {
            Some(wp) => *wp,
            None => return,
        };
        let target = match self.buffer.next_of(&current) {
            Some(wp) => *wp,
            None => {
                // Off the end of the path: synthesize the last segment and
                // hold at the final waypoint once captured
                self.follow_last_segment(&current, DEFAULT_HOLD_RADIUS_M, position, heading);
                return;
            }
        };
        let after = self.buffer.next_of(&target).copied();

        match after {
            None => self.follow_line_segment(&current, &target, position, heading),
            Some(after) => self.follow_transition(&current, &target, &after, position, heading),
        }
    }

    /// Straight tracking of the segment `current -> target`, no transition
    /// planning
    fn follow_line_segment(
        &mut self,
        current: &Waypoint,
        target: &Waypoint,
        position: &Vector3<f32>,
        heading: f32,
    ) {
        let from = self.local_waypoint(current);
        let to = self.local_waypoint(target);
        self.distance_to_next = (to - position).norm();

        let direction = match unit_direction(&from, &to).or_else(|| unit_direction(position, &to))
        {
            Some(direction) => direction,
            None => {
                self.hold_position_output(&to, heading);
                return;
            }
        };
        self.follow_straight(&direction, &to, position, heading);
    }

    /// Last-segment tracking toward a lone target, engaging a hold once
    /// the target is captured
    fn follow_last_segment(
        &mut self,
        target: &Waypoint,
        hold_radius: f32,
        position: &Vector3<f32>,
        heading: f32,
    ) {
        let to = self.local_waypoint(target);
        let distance = (to - position).norm();
        self.distance_to_next = distance;

        if distance <= hold_radius {
            self.in_hold = true;
            self.turn_direction = Some(TurnDirection::CounterClockwise);
            self.turn_radius = hold_radius;
            self.turn_desired_altitude = target.altitude;
            self.turn_center = to;
            crate::log_info!("target captured: holding at waypoint {}", target.id);
        }

        let direction = match unit_direction(position, &to) {
            Some(direction) => direction,
            None => {
                self.hold_position_output(&to, heading);
                return;
            }
        };
        self.follow_straight(&direction, &to, position, heading);
    }

    /// Fillet transition between `current -> target` and `target -> after`
    fn follow_transition(
        &mut self,
        current: &Waypoint,
        target: &Waypoint,
        after: &Waypoint,
        position: &Vector3<f32>,
        heading: f32,
    ) {
        // A target without a turn radius gets no fillet
        let radius = match target.turn_radius {
            Some(radius) => radius,
            None => {
                self.follow_line_segment(current, target, position, heading);
                return;
            }
        };

        let w0 = self.local_waypoint(current);
        let w1 = self.local_waypoint(target);
        let w2 = self.local_waypoint(after);
        let plan = match fillet_between(&w0, &w1, &w2, radius) {
            Some(plan) => plan,
            None => {
                self.follow_line_segment(current, target, position, heading);
                return;
            }
        };

        self.distance_to_next = (w1 - position).norm();

        match self.follow_mode {
            OutputKind::PathFollow => {
                if plan.crossed_inbound(position) {
                    self.follow_mode = OutputKind::OrbitFollow;
                    crate::log_debug!("half-plane crossed: entering fillet turn");

                    if target.kind == WaypointKind::Hold {
                        self.in_hold = true;
                        self.turn_direction = Some(TurnDirection::CounterClockwise);
                        self.turn_radius = radius;
                        self.turn_desired_altitude = target.altitude;
                        self.turn_center = w1;
                    }
                }
                self.follow_straight(&plan.inbound, &w1, position, heading);
            }
            OutputKind::OrbitFollow => {
                let center = match plan.turn_center() {
                    Some(center) => center,
                    None => {
                        // Collinear segments: skip the orbit entirely
                        self.follow_mode = OutputKind::PathFollow;
                        self.follow_straight(&plan.inbound, &w1, position, heading);
                        return;
                    }
                };

                let direction = plan.turn_direction();
                self.turn_direction = Some(direction);
                self.turn_radius = radius;
                self.turn_desired_altitude = target.altitude;
                self.turn_center = center;

                if plan.crossed_outbound(position) {
                    self.follow_mode = OutputKind::PathFollow;
                    crate::log_debug!("half-plane crossed: leaving fillet turn");
                }
                self.follow_orbit(position, heading, direction);
            }
        }
    }

    /// Straight steering law plus output bookkeeping
    fn follow_straight(
        &mut self,
        direction: &Vector3<f32>,
        target: &Vector3<f32>,
        position: &Vector3<f32>,
        heading: f32,
    ) {
        self.desired_heading = steer_along_segment(direction, target, position, heading);
        self.desired_altitude = target.z;
        self.output_kind = OutputKind::PathFollow;

        if !self.in_hold {
            self.turn_radius = 0.0;
            self.turn_direction = None;
        }
    }

    /// Orbit steering law plus output bookkeeping
    fn follow_orbit(&mut self, position: &Vector3<f32>, heading: f32, direction: TurnDirection) {
        self.desired_heading = steer_around_orbit(
            position,
            &self.turn_center,
            self.turn_radius,
            direction,
            heading,
        );
        self.desired_altitude = self.turn_desired_altitude;
        self.distance_to_next = 0.0;
        self.output_kind = OutputKind::OrbitFollow;
    }

    /// Degenerate geometry (aircraft exactly on its target): keep the
    /// current course and report arrival
    fn hold_position_output(&mut self, target: &Vector3<f32>, heading: f32) {
        self.desired_heading = wrap_360(heading);
        self.desired_altitude = target.z;
        self.distance_to_next = 0.0;
        self.output_kind = OutputKind::PathFollow;

        if !self.in_hold {
            self.turn_radius = 0.0;
            self.turn_direction = None;
        }
    }

    // ========================================================================
    // Helpers and accessors
    // ========================================================================

    fn local_position(&self, current: &NavInput) -> Vector3<f32> {
        let (x, y) = self.projection.to_local(current.latitude, current.longitude);
        Vector3::new(x, y, current.altitude)
    }

    fn local_waypoint(&self, waypoint: &Waypoint) -> Vector3<f32> {
        let (x, y) = self
            .projection
            .to_local(waypoint.latitude, waypoint.longitude);
        Vector3::new(x, y, waypoint.altitude)
    }

    /// Assemble the output record and clear the freshness flag
    fn read_output(&mut self) -> NavOutput {
        let output = NavOutput {
            desired_heading: self.desired_heading,
            desired_altitude: self.desired_altitude,
            distance_to_next_waypoint: self.distance_to_next,
            radius: self.turn_radius,
            turn_direction: self.turn_direction.map(|d| d.as_i8()).unwrap_or(0),
            is_data_new: self.data_is_new,
            time_of_data: 0,
            kind: self.output_kind,
        };
        self.data_is_new = false;
        output
    }

    /// The flight-path buffer
    pub fn buffer(&self) -> &WaypointBuffer {
        &self.buffer
    }

    /// The home position, if one has been recorded
    pub fn home(&self) -> Option<&Waypoint> {
        self.home.as_ref()
    }

    /// True while an indefinite hold is active
    pub fn is_holding(&self) -> bool {
        self.in_hold
    }

    /// True while a home return is in progress
    pub fn is_going_home(&self) -> bool {
        self.going_home
    }
}
