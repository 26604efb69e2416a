//! Vector pointing controller lifecycle and control loop

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, warn};
use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

// Internal
use super::state::{stop_all_axes, AlignStateMachine};
use super::{Params, VecPointError, REF_AXIS_BF};
use crate::rot_math;
use adcs_if::act::SharedActuationPort;
use adcs_if::tm::SharedTelemetrySource;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Handle to a running vector pointing controller.
///
/// The handle does not own the control loop's data, it only carries the
/// cancellation flag and the join handle needed to stop the loop. Dropping
/// the handle without calling [`VecPointHandle::stop`] signals the loop to
/// exit but does not wait for it.
pub struct VecPointHandle {
    run: Arc<AtomicBool>,
    jh: Option<JoinHandle<Result<(), VecPointError>>>
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Start a new vector pointing run.
///
/// The target vector is validated before any actuator interaction, a target
/// which is not unit length within [`rot_math::UNIT_NORM_EPSILON`] is
/// rejected, as is a negative margin.
///
/// On success the control loop is running in a background thread and the
/// returned handle must be used to stop it.
pub fn start(
    target_in: [f64; 3],
    margin_deg: f64,
    params: &Params,
    port: SharedActuationPort,
    tm: SharedTelemetrySource
) -> Result<VecPointHandle, VecPointError> {
    if !rot_math::is_unit_vector(&target_in, rot_math::UNIT_NORM_EPSILON) {
        return Err(VecPointError::InvalidTarget(target_in));
    }

    if margin_deg < 0.0 {
        return Err(VecPointError::NegativeMargin(margin_deg));
    }

    let run = Arc::new(AtomicBool::new(true));
    let run_clone = run.clone();
    let tick_period = Duration::from_secs_f64(params.tick_period_s);

    info!(
        "Vector pointing initiated: target {:?}, margin {} deg",
        target_in, margin_deg
    );

    let jh = thread::spawn(move || {
        ctrl_loop(target_in, margin_deg, tick_period, run_clone, port, tm)
    });

    Ok(VecPointHandle {
        run,
        jh: Some(jh)
    })
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl VecPointHandle {
    /// Stop the vector pointing run.
    ///
    /// Blocks until the control loop has observed the cancellation, stopped
    /// all three axes and exited, so no further actuation port writes occur
    /// once this returns. A second call on the same handle returns `Ok(())`
    /// immediately.
    ///
    /// If the loop terminated on its own (for example on a telemetry
    /// failure) the terminal error is returned here.
    pub fn stop(&mut self) -> Result<(), VecPointError> {
        let jh = match self.jh.take() {
            Some(jh) => jh,
            None => return Ok(())
        };

        self.run.store(false, Ordering::Relaxed);

        match jh.join() {
            Ok(res) => res,
            Err(_) => Err(VecPointError::LoopPanicked)
        }
    }
}

impl Drop for VecPointHandle {
    fn drop(&mut self) {
        self.run.store(false, Ordering::Relaxed);
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// The control loop run by the background thread.
///
/// Cancellation is checked once per tick, never inside one, so an in-flight
/// tick always completes its axis command sequence before the loop exits.
/// Whatever way the loop ends it stops all three axes on the way out.
fn ctrl_loop(
    target_in: [f64; 3],
    margin_deg: f64,
    tick_period: Duration,
    run: Arc<AtomicBool>,
    port: SharedActuationPort,
    tm: SharedTelemetrySource
) -> Result<(), VecPointError> {
    let target = Vector3::from(target_in);
    let ref_axis = Vector3::from(REF_AXIS_BF);
    let mut sm = AlignStateMachine::new(margin_deg);

    while run.load(Ordering::Relaxed) {
        thread::sleep(tick_period);

        // Attitude telemetry read. A failed read is fatal to the run: the
        // actuators are made safe and the error is reported through the
        // handle.
        let att = {
            let mut tm = tm.lock()
                .expect("VecPoint: telemetry source mutex poisoned");
            tm.attitude_quat_bf()
        };

        let att = match att {
            Ok(a) => a,
            Err(e) => {
                warn!("Attitude telemetry failed, stopping vector pointing: {}", e);

                let mut port = port.lock()
                    .expect("VecPoint: actuation port mutex poisoned");
                stop_all_axes(&mut *port);

                return Err(VecPointError::Telemetry(e));
            }
        };

        if !rot_math::is_unit_quat(&att.q, rot_math::UNIT_NORM_EPSILON) {
            warn!("Attitude quaternion is not unit length, renormalising");
        }

        let q = UnitQuaternion::from_quaternion(
            Quaternion::new(att.q[0], att.q[1], att.q[2], att.q[3])
        );

        let angles = rot_math::rotation_error_angles(&q, &target, &ref_axis);

        let mut port = port.lock()
            .expect("VecPoint: actuation port mutex poisoned");
        sm.step(angles, &mut *port);
    }

    // Cancelled: stop every controller that could possibly be running
    {
        let mut port = port.lock()
            .expect("VecPoint: actuation port mutex poisoned");
        stop_all_axes(&mut *port);
    }

    info!("Vector pointing stopped");

    Ok(())
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
