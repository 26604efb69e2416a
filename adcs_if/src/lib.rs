//! # ADCS Equipment Interface
//!
//! This library defines the two capability interfaces which sit between the
//! attitude control software and the ADCS hardware binding layer:
//!
//! - [`act::ActuationPort`] - commands the single-axis actuation controllers
//! - [`tm::TelemetrySource`] - reports the current attitude of the spacecraft
//!
//! The controllers in `adcs_exec` are written purely against these traits, so
//! the hardware layer can be substituted with simulated equipment for testing.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod act;
pub mod tm;
