//! # Simulated ADCS equipment
//!
//! Kinematic stand-in for the ADCS hardware layer, implementing both
//! capability interfaces against a single shared attitude state. Angle steps
//! are applied instantly, which is ideal for development and testing of the
//! controllers but is no model of the real actuator dynamics.
//!
//! Cloning a `SimAdcs` yields a second front end onto the same simulated
//! unit, so one clone can serve as the actuation port and another as the
//! telemetry source.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use nalgebra::{Quaternion, Unit, UnitQuaternion, Vector3};
use std::sync::{Arc, Mutex};

// Internal
use adcs_if::act::{ActuationPort, Axis};
use adcs_if::tm::{AttQuat, TelemetrySource, TmError};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Simulated ADCS unit.
#[derive(Clone)]
pub struct SimAdcs {
    state: Arc<Mutex<SimState>>
}

/// Internal state of the simulated unit.
struct SimState {
    /// Current attitude, rotating body frame vectors into the inertial
    /// frame.
    att_q_bf: UnitQuaternion<f64>,

    /// Last angular velocity demand per axis. The kinematic model does not
    /// integrate these, they are recorded so tests and the demo can see
    /// what was commanded.
    rate_dems_radps: [f64; 3]
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimAdcs {
    /// Create a new simulated unit with the given initial attitude
    /// quaternion (scalar first). The quaternion is normalised.
    pub fn new(init_att_q_bf: [f64; 4]) -> Self {
        let q = UnitQuaternion::from_quaternion(Quaternion::new(
            init_att_q_bf[0],
            init_att_q_bf[1],
            init_att_q_bf[2],
            init_att_q_bf[3]
        ));

        SimAdcs {
            state: Arc::new(Mutex::new(SimState {
                att_q_bf: q,
                rate_dems_radps: [0.0; 3]
            }))
        }
    }

    /// Get the current simulated attitude.
    pub fn attitude(&self) -> UnitQuaternion<f64> {
        self.state.lock().expect("SimAdcs: state mutex poisoned").att_q_bf
    }
}

impl ActuationPort for SimAdcs {
    fn step_axis(&mut self, axis: Axis, angle_rad: f64) {
        let mut state = self.state.lock().expect("SimAdcs: state mutex poisoned");

        // A body-axis rotation composes on the right of the attitude
        let step = UnitQuaternion::from_axis_angle(&axis_unit(axis), angle_rad);
        state.att_q_bf = state.att_q_bf * step;
    }

    fn set_axis_ang_vel(&mut self, axis: Axis, rate_radps: f64) {
        let mut state = self.state.lock().expect("SimAdcs: state mutex poisoned");
        state.rate_dems_radps[axis_index(axis)] = rate_radps;
    }

    fn stop_axis(&mut self, axis: Axis) {
        let mut state = self.state.lock().expect("SimAdcs: state mutex poisoned");
        state.rate_dems_radps[axis_index(axis)] = 0.0;
    }
}

impl TelemetrySource for SimAdcs {
    fn attitude_quat_bf(&mut self) -> Result<AttQuat, TmError> {
        let state = self.state.lock().expect("SimAdcs: state mutex poisoned");
        let q = state.att_q_bf.into_inner();

        Ok(AttQuat {
            q: [q.w, q.i, q.j, q.k]
        })
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn axis_unit(axis: Axis) -> Unit<Vector3<f64>> {
    match axis {
        Axis::X => Vector3::x_axis(),
        Axis::Y => Vector3::y_axis(),
        Axis::Z => Vector3::z_axis()
    }
}

fn axis_index(axis: Axis) -> usize {
    match axis {
        Axis::X => 0,
        Axis::Y => 1,
        Axis::Z => 2
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::vec_point::{self, Params};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_step_axis_rotates_attitude() {
        let mut sim = SimAdcs::new([1.0, 0.0, 0.0, 0.0]);

        sim.step_axis(Axis::X, 0.5);

        let expected = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.5);
        assert!(sim.attitude().angle_to(&expected) < 1e-9);
    }

    #[test]
    fn test_closed_loop_convergence() {
        // Start rolled 0.5 rad off the target, the controller must bring
        // the boresight back within the margin and settle in Holding
        let sim = SimAdcs::new([
            (0.25f64).cos(),
            (0.25f64).sin(),
            0.0,
            0.0
        ]);

        let params = Params {
            tick_period_s: 0.001
        };

        let mut handle = vec_point::start(
            [0.0, 0.0, -1.0],
            1.0,
            &params,
            Arc::new(Mutex::new(sim.clone())),
            Arc::new(Mutex::new(sim.clone()))
        )
        .unwrap();

        thread::sleep(Duration::from_millis(50));
        handle.stop().unwrap();

        // The boresight now points at the target to within the margin
        let boresight_in = sim
            .attitude()
            .transform_vector(&Vector3::new(0.0, 0.0, -1.0));
        let err_deg = boresight_in
            .dot(&Vector3::new(0.0, 0.0, -1.0))
            .clamp(-1.0, 1.0)
            .acos()
            .to_degrees();

        assert!(err_deg <= 1.0 + 0.01, "pointing error {} deg", err_deg);
    }
}
