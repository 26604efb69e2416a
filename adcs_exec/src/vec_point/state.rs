//! Implementations for the alignment state machine

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;

// Internal
use super::YZ_MARGIN_BIAS_DEG;
use adcs_if::act::{ActuationPort, Axis};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Alignment progress of a vector pointing run.
///
/// The controller corrects one axis at a time, in X, Y, Z order, and then
/// holds. `Holding` is not terminal: drift beyond the margin sends the
/// machine back to `AligningX`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AlignState {
    AligningX,
    AligningY,
    AligningZ,
    Holding
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// State machine for one vector pointing run.
pub(crate) struct AlignStateMachine {
    margin_deg: f64,
    state: AlignState
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl AlignStateMachine {
    pub(crate) fn new(margin_deg: f64) -> Self {
        AlignStateMachine {
            margin_deg,
            state: AlignState::AligningX
        }
    }

    pub(crate) fn state(&self) -> AlignState {
        self.state
    }

    /// Advance the machine by one tick.
    ///
    /// `angles_rad` is the X-then-Y-then-Z decomposition of the current
    /// pointing error. Exactly one axis receives a positioning command per
    /// tick; axis stops and state transitions follow in the same tick.
    pub(crate) fn step(
        &mut self,
        angles_rad: (f64, f64, f64),
        port: &mut dyn ActuationPort
    ) {
        let (x, y, z) = angles_rad;

        trace!(
            "VecPoint [{:?}] error deg: x {:.4}, y {:.4}, z {:.4}",
            self.state,
            x.to_degrees(),
            y.to_degrees(),
            z.to_degrees()
        );

        match self.state {
            AlignState::AligningX => port.step_axis(Axis::X, x),
            AlignState::AligningY => port.step_axis(Axis::Y, y),
            AlignState::AligningZ => port.step_axis(Axis::Z, z),
            AlignState::Holding => {
                if x.to_degrees().abs() > self.margin_deg {
                    // Drifted out of tolerance, restart the alignment
                    // sequence from the X axis
                    stop_all_axes(port);
                    self.state = AlignState::AligningX;
                }
                else {
                    // Within tolerance, hold zero rate on all axes
                    port.set_axis_ang_vel(Axis::X, 0.0);
                    port.set_axis_ang_vel(Axis::Y, 0.0);
                    port.set_axis_ang_vel(Axis::Z, 0.0);
                }

                return
            }
        }

        // Convergence checks are evaluated in sequence so that a tick which
        // finds several axes already within tolerance advances through all
        // of them at once.
        if self.state == AlignState::AligningX
            && x.to_degrees().abs() <= self.margin_deg
        {
            port.stop_axis(Axis::X);
            self.state = AlignState::AligningY;
        }

        if self.state == AlignState::AligningY
            && y.to_degrees().abs() <= self.margin_deg + YZ_MARGIN_BIAS_DEG
        {
            port.stop_axis(Axis::Y);
            self.state = AlignState::AligningZ;
        }

        if self.state == AlignState::AligningZ
            && z.to_degrees().abs() <= self.margin_deg + YZ_MARGIN_BIAS_DEG
        {
            port.stop_axis(Axis::Z);
            self.state = AlignState::Holding;
        }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Stop the velocity controllers on all three axes, in X, Y, Z order.
pub(crate) fn stop_all_axes(port: &mut dyn ActuationPort) {
    port.stop_axis(Axis::X);
    port.stop_axis(Axis::Y);
    port.stop_axis(Axis::Z);
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    /// Port calls recorded by the mock port.
    #[derive(Debug, PartialEq)]
    enum PortCall {
        Step(Axis, f64),
        SetVel(Axis, f64),
        Stop(Axis)
    }

    #[derive(Default)]
    struct MockPort {
        calls: Vec<PortCall>
    }

    impl ActuationPort for MockPort {
        fn step_axis(&mut self, axis: Axis, angle_rad: f64) {
            self.calls.push(PortCall::Step(axis, angle_rad));
        }

        fn set_axis_ang_vel(&mut self, axis: Axis, rate_radps: f64) {
            self.calls.push(PortCall::SetVel(axis, rate_radps));
        }

        fn stop_axis(&mut self, axis: Axis) {
            self.calls.push(PortCall::Stop(axis));
        }
    }

    /// Convert per-axis errors in degrees to the radian triple fed to the
    /// state machine.
    fn angles(x_deg: f64, y_deg: f64, z_deg: f64) -> (f64, f64, f64) {
        (x_deg.to_radians(), y_deg.to_radians(), z_deg.to_radians())
    }

    #[test]
    fn test_convergence_sequence() {
        let mut port = MockPort::default();
        let mut sm = AlignStateMachine::new(5.0);

        // X error decreasing by 10 deg/tick from 30 deg, Y converging later,
        // Z already within tolerance
        let x_seq = [30.0, 20.0, 10.0, 0.0, 0.0];
        let y_seq = [10.0, 10.0, 10.0, 10.0, 5.0];
        let z_seq = [2.0, 2.0, 2.0, 2.0, 2.0];

        for i in 0..3 {
            sm.step(angles(x_seq[i], y_seq[i], z_seq[i]), &mut port);
            assert_eq!(sm.state(), AlignState::AligningX);
        }

        // Tick 4: X first within margin, expect the stop and the transition
        sm.step(angles(x_seq[3], y_seq[3], z_seq[3]), &mut port);
        assert_eq!(sm.state(), AlignState::AligningY);

        // Tick 5: Y converges, and since Z is already within tolerance the
        // machine cascades straight through AligningZ into Holding
        sm.step(angles(x_seq[4], y_seq[4], z_seq[4]), &mut port);
        assert_eq!(sm.state(), AlignState::Holding);

        // Exactly one stop per axis over the whole run
        for axis in &[Axis::X, Axis::Y, Axis::Z] {
            let n_stops = port.calls.iter()
                .filter(|c| **c == PortCall::Stop(*axis))
                .count();
            assert_eq!(n_stops, 1, "expected exactly one stop on {:?}", axis);
        }

        // Each of the first four ticks stepped the X axis, nothing else
        // received a positioning command
        let n_x_steps = port.calls.iter()
            .filter(|c| matches!(c, PortCall::Step(Axis::X, _)))
            .count();
        assert_eq!(n_x_steps, 4);
    }

    #[test]
    fn test_margin_asymmetry() {
        // X must meet the margin exactly, Y and Z get the 0.01 deg widening
        let mut port = MockPort::default();
        let mut sm = AlignStateMachine::new(5.0);

        // 5.005 deg is outside the X threshold
        sm.step(angles(5.005, 0.0, 0.0), &mut port);
        assert_eq!(sm.state(), AlignState::AligningX);

        // But within the widened Y/Z thresholds
        sm.step(angles(5.0, 5.005, 5.005), &mut port);
        assert_eq!(sm.state(), AlignState::Holding);
    }

    #[test]
    fn test_drift_reacquisition() {
        let mut port = MockPort::default();
        let mut sm = AlignStateMachine::new(5.0);

        // Zero error cascades straight to Holding on the first tick
        sm.step(angles(0.0, 0.0, 0.0), &mut port);
        assert_eq!(sm.state(), AlignState::Holding);

        // Drift beyond the margin on X: all three axes stopped, back to
        // AligningX
        port.calls.clear();
        sm.step(angles(10.0, 0.0, 0.0), &mut port);
        assert_eq!(sm.state(), AlignState::AligningX);
        assert_eq!(
            port.calls,
            vec![
                PortCall::Stop(Axis::X),
                PortCall::Stop(Axis::Y),
                PortCall::Stop(Axis::Z)
            ]
        );
    }

    #[test]
    fn test_station_keeping() {
        let mut port = MockPort::default();
        let mut sm = AlignStateMachine::new(5.0);

        sm.step(angles(0.0, 0.0, 0.0), &mut port);
        assert_eq!(sm.state(), AlignState::Holding);

        // While within tolerance every tick commands zero rate on all axes
        port.calls.clear();
        sm.step(angles(1.0, 0.5, -0.5), &mut port);
        assert_eq!(sm.state(), AlignState::Holding);
        assert_eq!(
            port.calls,
            vec![
                PortCall::SetVel(Axis::X, 0.0),
                PortCall::SetVel(Axis::Y, 0.0),
                PortCall::SetVel(Axis::Z, 0.0)
            ]
        );
    }
}
