//! # Vector pointing controller module
//!
//! This module aligns a body-fixed reference axis with a target direction in
//! the inertial frame and holds it there, using only the single-axis
//! actuation primitives exposed by the [`adcs_if::act::ActuationPort`].
//!
//! The controller runs as a background task: [`start`] validates its inputs,
//! spawns the control loop and returns a [`VecPointHandle`]. The loop samples
//! the attitude once per tick, decomposes the pointing error into per-axis
//! angles and corrects one axis at a time, X then Y then Z, before settling
//! into a station-keeping hold. [`VecPointHandle::stop`] cancels the run and
//! blocks until the loop has stopped all actuators and exited.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod ctrl;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// Internal
pub use ctrl::*;
pub use state::AlignState;

use adcs_if::tm::TmError;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// The body-fixed reference axis to be pointed at the target. This is the
/// boresight of the optical payload, which looks out along body -Z.
pub const REF_AXIS_BF: [f64; 3] = [0.0, 0.0, -1.0];

/// Widening applied to the convergence margin on the Y and Z axes.
///
/// The X axis converges on the margin itself while Y and Z get this extra
/// allowance. Inherited from the flight-proven tuning, see DESIGN.md.
pub const YZ_MARGIN_BIAS_DEG: f64 = 0.01;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Vector pointing controller parameters
#[derive(Clone, Deserialize)]
pub struct Params {
    /// Minimum period of one control loop tick in seconds.
    pub tick_period_s: f64
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during vector pointing operation.
#[derive(Debug, thiserror::Error)]
pub enum VecPointError {
    #[error("The target vector {0:?} is not unit length")]
    InvalidTarget([f64; 3]),

    #[error("The pointing margin must be non-negative, got {0} deg")]
    NegativeMargin(f64),

    #[error("Attitude telemetry is unavailable: {0}")]
    Telemetry(#[from] TmError),

    #[error("The control loop panicked")]
    LoopPanicked
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Params {
            tick_period_s: 0.1
        }
    }
}
