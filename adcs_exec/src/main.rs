//! Main ADCS executable entry point.
//!
//! Runs a single vector pointing scenario against the simulated ADCS unit:
//! initialises the session and logger, loads the controller parameters and a
//! scenario file, activates vector pointing through the attitude manager,
//! waits out the scenario duration while logging the pointing error, then
//! deactivates and exits.
//!
//! An optional single CLI argument names the scenario file to load from the
//! params directory, defaulting to `scenario.toml`.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report
};
use log::{debug, info};
use nalgebra::Vector3;
use serde::Deserialize;
use std::env;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

// Internal
use adcs_lib::att_mgr::{AttMgr, AttitudeMode};
use adcs_lib::sim_adcs::SimAdcs;
use adcs_lib::vec_point;
use util::{
    logger::{logger_init, LevelFilter},
    session::Session
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A vector pointing scenario to run against the simulated unit.
#[derive(Deserialize)]
struct Scenario {
    /// Target direction in the inertial frame, must be unit length.
    target_in: [f64; 3],

    /// Pointing margin in degrees.
    margin_deg: f64,

    /// Initial attitude quaternion (scalar first) of the simulated unit.
    init_att_q_bf: [f64; 4],

    /// How long to leave the controller running, in seconds.
    duration_s: f64
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("adcs_exec", "sessions")
        .wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("ADCS Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let vec_point_params: vec_point::Params = util::params::load("vec_point.toml")
        .wrap_err("Could not load vector pointing params")?;

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    let scenario_file = match args.len() {
        1 => "scenario.toml",
        2 => args[1].as_str(),
        _ => {
            return Err(eyre!(
                "Expected either zero or one argument, found {}",
                args.len() - 1
            ))
        }
    };

    info!("Loading scenario from \"{}\"", scenario_file);

    let scenario: Scenario = util::params::load(scenario_file)
        .wrap_err("Could not load the scenario")?;

    info!(
        "Scenario: target {:?}, margin {} deg, duration {} s\n",
        scenario.target_in, scenario.margin_deg, scenario.duration_s
    );

    // ---- INITIALISE EQUIPMENT ----

    // The simulated unit serves as both the actuation port and the telemetry
    // source, one clone for each role.
    let sim = SimAdcs::new(scenario.init_att_q_bf);

    let mut att_mgr = AttMgr::new(
        vec_point_params,
        Arc::new(Mutex::new(sim.clone())),
        Arc::new(Mutex::new(sim.clone()))
    );

    info!("Attitude manager initialised");

    // ---- RUN SCENARIO ----

    att_mgr
        .set_desired_attitude(AttitudeMode::VectorPointing {
            target_in: scenario.target_in,
            margin_deg: scenario.margin_deg
        })
        .wrap_err("Failed to activate vector pointing")?;

    let target = Vector3::from(scenario.target_in);
    let mut elapsed_s = 0.0;

    while elapsed_s < scenario.duration_s {
        thread::sleep(Duration::from_secs(1));
        elapsed_s += 1.0;

        // Angle between the boresight and the target, straight from the
        // simulated attitude
        let boresight_in = sim
            .attitude()
            .transform_vector(&Vector3::new(0.0, 0.0, -1.0));
        let err_deg = boresight_in
            .dot(&target)
            .clamp(-1.0, 1.0)
            .acos()
            .to_degrees();

        info!("t = {:3.0} s: pointing error {:.4} deg", elapsed_s, err_deg);
    }

    att_mgr
        .unset()
        .wrap_err("Failed to deactivate vector pointing")?;

    info!("Scenario complete");

    Ok(())
}
