//! # Attitude manager module
//!
//! The attitude manager selects which attitude controller is active and
//! guarantees that at most one controller is commanding the actuators at any
//! time. Desired attitude modes form a closed set, dispatch over them is an
//! exhaustive match so adding a mode is a compile-time checked change.
//!
//! Only the vector pointing mode is implemented in this software, the
//! remaining modes are marshalled into the ADCS unit's own onboard
//! controllers by a separate service and are rejected here.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::info;
use serde::{Deserialize, Serialize};

// Internal
use crate::vec_point::{self, VecPointError, VecPointHandle};
use adcs_if::act::{Axis, SharedActuationPort};
use adcs_if::tm::SharedTelemetrySource;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Attitude manager state
pub struct AttMgr {
    vec_point_params: vec_point::Params,

    port: SharedActuationPort,
    tm: SharedTelemetrySource,

    active: Option<ActiveCtrl>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The desired attitude modes which can be requested of the manager.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub enum AttitudeMode {
    /// Point the payload boresight at a fixed direction in the inertial
    /// frame and hold it within the given margin.
    VectorPointing {
        target_in: [f64; 3],
        margin_deg: f64
    },

    /// Point the payload boresight at the sub-satellite point.
    NadirPointing,

    /// Keep the solar panels facing the sun.
    SunPointing,

    /// Reduce the body rates after deployment or an upset.
    Detumbling,

    /// Track a fixed target on the ground.
    TargetTracking
}

/// Controllers which the manager can have running.
enum ActiveCtrl {
    VecPoint(VecPointHandle)
}

/// Possible errors that can occur during attitude manager operation.
#[derive(Debug, thiserror::Error)]
pub enum AttMgrError {
    #[error("Attitude mode not supported by this software: {0:?}")]
    NotSupported(AttitudeMode),

    #[error("Vector pointing error: {0}")]
    VecPoint(#[from] VecPointError)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl AttMgr {
    /// Create a new attitude manager commanding the given equipment.
    ///
    /// No controller is active until `set_desired_attitude` is called.
    pub fn new(
        vec_point_params: vec_point::Params,
        port: SharedActuationPort,
        tm: SharedTelemetrySource
    ) -> Self {
        AttMgr {
            vec_point_params,
            port,
            tm,
            active: None
        }
    }

    /// Activate the controller for the given desired attitude mode.
    ///
    /// Any currently active controller is stopped first, so at most one
    /// controller ever writes to the actuation port. Modes other than
    /// vector pointing are rejected with `AttMgrError::NotSupported`.
    pub fn set_desired_attitude(
        &mut self,
        mode: AttitudeMode
    ) -> Result<(), AttMgrError> {
        if self.active.is_some() {
            info!("A controller is already active, deactivating it first");
            self.unset()?;
        }

        match mode {
            AttitudeMode::VectorPointing {
                target_in,
                margin_deg
            } => {
                let handle = vec_point::start(
                    target_in,
                    margin_deg,
                    &self.vec_point_params,
                    self.port.clone(),
                    self.tm.clone()
                )?;

                self.active = Some(ActiveCtrl::VecPoint(handle));

                Ok(())
            }

            AttitudeMode::NadirPointing
            | AttitudeMode::SunPointing
            | AttitudeMode::Detumbling
            | AttitudeMode::TargetTracking => {
                Err(AttMgrError::NotSupported(mode))
            }
        }
    }

    /// Deactivate the active controller, if any.
    ///
    /// Blocks until the controller has fully quiesced, then commands the
    /// actuators to the idle/safe state. A terminal error from the
    /// controller's loop is reported only after the actuators are safe.
    pub fn unset(&mut self) -> Result<(), AttMgrError> {
        if let Some(ctrl) = self.active.take() {
            let ctrl_result = match ctrl {
                ActiveCtrl::VecPoint(mut handle) => handle.stop()
            };

            // Actuators to the idle/safe state regardless of how the
            // controller's loop ended
            {
                let mut port = self.port.lock()
                    .expect("AttMgr: actuation port mutex poisoned");
                port.stop_axis(Axis::X);
                port.stop_axis(Axis::Y);
                port.stop_axis(Axis::Z);
            }

            info!("Attitude mode deactivated");

            ctrl_result?;
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use adcs_if::act::ActuationPort;
    use adcs_if::tm::{AttQuat, TelemetrySource, TmError};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct CountingPort {
        n_steps: usize,
        n_stops: usize
    }

    impl ActuationPort for CountingPort {
        fn step_axis(&mut self, _axis: Axis, _angle_rad: f64) {
            self.n_steps += 1;
        }

        fn set_axis_ang_vel(&mut self, _axis: Axis, _rate_radps: f64) {}

        fn stop_axis(&mut self, _axis: Axis) {
            self.n_stops += 1;
        }
    }

    struct IdentityTm;

    impl TelemetrySource for IdentityTm {
        fn attitude_quat_bf(&mut self) -> Result<AttQuat, TmError> {
            Ok(AttQuat {
                q: [1.0, 0.0, 0.0, 0.0]
            })
        }
    }

    fn test_mgr(port: Arc<Mutex<CountingPort>>) -> AttMgr {
        let params = vec_point::Params {
            tick_period_s: 0.001
        };

        AttMgr::new(params, port, Arc::new(Mutex::new(IdentityTm)))
    }

    #[test]
    fn test_unsupported_modes_rejected() {
        let port = Arc::new(Mutex::new(CountingPort::default()));
        let mut mgr = test_mgr(port.clone());

        for mode in vec![
            AttitudeMode::NadirPointing,
            AttitudeMode::SunPointing,
            AttitudeMode::Detumbling,
            AttitudeMode::TargetTracking
        ] {
            let res = mgr.set_desired_attitude(mode);
            assert!(matches!(res, Err(AttMgrError::NotSupported(_))));
        }

        // Rejected modes never touch the actuators
        assert_eq!(port.lock().unwrap().n_steps, 0);
        assert_eq!(port.lock().unwrap().n_stops, 0);
    }

    #[test]
    fn test_invalid_target_rejected() {
        let port = Arc::new(Mutex::new(CountingPort::default()));
        let mut mgr = test_mgr(port);

        let res = mgr.set_desired_attitude(AttitudeMode::VectorPointing {
            target_in: [0.5, 0.5, 0.5],
            margin_deg: 5.0
        });

        assert!(matches!(
            res,
            Err(AttMgrError::VecPoint(VecPointError::InvalidTarget(_)))
        ));
    }

    #[test]
    fn test_set_then_unset_quiesces() {
        let port = Arc::new(Mutex::new(CountingPort::default()));
        let mut mgr = test_mgr(port.clone());

        mgr.set_desired_attitude(AttitudeMode::VectorPointing {
            target_in: [0.0, 0.0, -1.0],
            margin_deg: 5.0
        })
        .unwrap();

        std::thread::sleep(std::time::Duration::from_millis(10));

        mgr.unset().unwrap();
        let n_stops = port.lock().unwrap().n_stops;

        // The controller's cleanup plus the manager's safe-state command
        // both stopped all three axes
        assert!(n_stops >= 6);

        // No further writes after unset has returned
        std::thread::sleep(std::time::Duration::from_millis(20));
        assert_eq!(port.lock().unwrap().n_stops, n_stops);

        // Unset with nothing active is a no-op
        mgr.unset().unwrap();
        assert_eq!(port.lock().unwrap().n_stops, n_stops);
    }

    #[test]
    fn test_at_most_one_controller() {
        let port = Arc::new(Mutex::new(CountingPort::default()));
        let mut mgr = test_mgr(port);

        mgr.set_desired_attitude(AttitudeMode::VectorPointing {
            target_in: [0.0, 0.0, -1.0],
            margin_deg: 5.0
        })
        .unwrap();

        // A second request deactivates the first controller before
        // starting its own
        mgr.set_desired_attitude(AttitudeMode::VectorPointing {
            target_in: [0.0, 0.0, 1.0],
            margin_deg: 2.0
        })
        .unwrap();

        mgr.unset().unwrap();
    }
}
