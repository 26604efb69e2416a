//! # ADCS library.
//!
//! This library allows other crates in the workspace (and the integration
//! tests) to access the attitude control modules defined inside the ADCS
//! executable crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Attitude manager - selects which attitude controller is active
pub mod att_mgr;

/// Rotation maths - quaternion/vector algebra for the pointing controllers
pub mod rot_math;

/// Simulated ADCS equipment - kinematic stand-in for the hardware layer
pub mod sim_adcs;

/// Vector pointing controller - aligns a body axis with an inertial target
pub mod vec_point;
