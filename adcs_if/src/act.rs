//! # Actuation Port
//!
//! The actuation port wraps the single-axis attitude controllers provided by
//! the ADCS unit. The hardware exposes no simultaneous 3-axis control, only
//! one rotational axis at a time may be commanded with either an angle step
//! or an angular velocity demand.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Serialize, Deserialize};
use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An actuation port behind a shared mutex.
///
/// The port is shared between the attitude manager and whichever controller
/// it has spawned. The system invariant that at most one control loop writes
/// to the port at a time is upheld by the manager, not by this type.
pub type SharedActuationPort = Arc<Mutex<dyn ActuationPort + Send>>;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The body axes addressable by the single-axis controllers.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Copy, Clone)]
pub enum Axis {
    X,
    Y,
    Z
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Commands to the single-axis attitude actuators.
///
/// All calls are fire-and-forget, the hardware does not report back through
/// this interface. Calls must be executed in the order they are issued.
pub trait ActuationPort {
    /// Command a single-axis rotation of `angle_rad` radians about `axis`.
    fn step_axis(&mut self, axis: Axis, angle_rad: f64);

    /// Command the angular velocity controller for `axis` to the given rate.
    fn set_axis_ang_vel(&mut self, axis: Axis, rate_radps: f64);

    /// Stop the velocity controller for `axis`.
    fn stop_axis(&mut self, axis: Axis);
}
