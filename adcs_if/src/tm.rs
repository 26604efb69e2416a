//! # Telemetry Source
//!
//! The telemetry source reports the current attitude of the spacecraft as a
//! unit quaternion. Reads go out to the ADCS unit and may take time to
//! complete, implementations are expected to bound the read and report
//! [`TmError::Timeout`] rather than block their caller indefinitely.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Serialize, Deserialize};
use std::sync::{Arc, Mutex};
use thiserror::Error;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A telemetry source behind a shared mutex.
pub type SharedTelemetrySource = Arc<Mutex<dyn TelemetrySource + Send>>;

/// A snapshot of the spacecraft attitude.
///
/// The quaternion rotates vectors from the body frame into the inertial
/// frame. Components are scalar first, i.e. `[w, x, y, z]`.
#[derive(Serialize, Deserialize, Debug, Copy, Clone)]
pub struct AttQuat {
    pub q: [f64; 4]
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors on a telemetry read.
#[derive(Debug, Error)]
pub enum TmError {
    #[error("Attitude telemetry read timed out after {0} s")]
    Timeout(f64),

    #[error("Attitude telemetry read failed: {0}")]
    ReadFailed(String)
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Provider of attitude telemetry.
pub trait TelemetrySource {
    /// Read the current attitude quaternion of the spacecraft.
    fn attitude_quat_bf(&mut self) -> Result<AttQuat, TmError>;
}
