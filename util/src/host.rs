//! Host platform utility functions

use std::path::PathBuf;

/// Get the root directory of the ADCS software from the `ADCS_SW_ROOT`
/// environment variable.
///
/// The root is used to resolve the `params` and `sessions` directories so
/// that executables can be run from anywhere in the tree.
pub fn get_adcs_sw_root() -> Result<PathBuf, std::env::VarError> {
    std::env::var("ADCS_SW_ROOT").map(PathBuf::from)
}
