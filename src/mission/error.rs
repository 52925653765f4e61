//! Waypoint error types
//!
//! Provides the error taxonomy shared by the flight-path buffer and the
//! waypoint manager. Errors are values; every fallible operation returns
//! `Result<_, WaypointError>` and leaves the buffer untouched on failure.

/// Errors from flight-path and navigation operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaypointError {
    /// Invalid request (buffer full, duplicate of predecessor, unresolved id,
    /// non-adjacent insert anchors, or invalid hold parameters)
    InvalidParameters,
    /// A home position was required but none is set
    UndefinedParameter,
    /// The current index points past the occupied prefix of the buffer
    CurrentIndexInvalid,
    /// The buffer was expected to be empty (flight-path initialization)
    UndefinedFailure,
}

impl core::fmt::Display for WaypointError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            WaypointError::InvalidParameters => write!(f, "invalid parameters"),
            WaypointError::UndefinedParameter => write!(f, "home position not set"),
            WaypointError::CurrentIndexInvalid => write!(f, "current waypoint index invalid"),
            WaypointError::UndefinedFailure => write!(f, "flight path already initialized"),
        }
    }
}
