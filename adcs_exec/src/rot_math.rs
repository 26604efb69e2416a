//! # Rotation maths
//!
//! Quaternion/vector algebra used by the pointing controllers. The central
//! operation is [`rotation_error_angles`], which expresses the rotation
//! between a body-fixed reference axis and an inertial target direction as a
//! sequence of single-axis angles matching the order in which the actuators
//! are commanded.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use nalgebra::{UnitQuaternion, Vector3};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Tolerance on the euclidean norm of vectors and quaternions which are
/// required to be unit length.
pub const UNIT_NORM_EPSILON: f64 = 1e-5;

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// True iff the euclidean norm of `v` is within `epsilon` of 1.
pub fn is_unit_vector(v: &[f64; 3], epsilon: f64) -> bool {
    let norm = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    (norm - 1.0).abs() <= epsilon
}

/// True iff the euclidean norm of the quaternion `q` is within `epsilon` of 1.
pub fn is_unit_quat(q: &[f64; 4], epsilon: f64) -> bool {
    let norm = (q[0] * q[0] + q[1] * q[1] + q[2] * q[2] + q[3] * q[3]).sqrt();
    (norm - 1.0).abs() <= epsilon
}

/// Get the per-axis rotation errors between a body-fixed reference axis and
/// an inertial target direction.
///
/// The target is first rotated into the body frame by applying the inverse of
/// the current attitude. The rotation mapping `ref_axis_bf` onto that vector
/// is then decomposed into an X-then-Y-then-Z sequence of angles about the
/// fixed body axes, returned in radians.
///
/// Two degenerate configurations are tolerated rather than reported:
///
/// - If the target is antiparallel to the reference axis there is no unique
///   rotation between them, and a half turn about X is used.
/// - Gimbal lock in the fixed-order decomposition yields whatever angles the
///   extraction produces.
pub fn rotation_error_angles(
    att_q_bf: &UnitQuaternion<f64>,
    target_in: &Vector3<f64>,
    ref_axis_bf: &Vector3<f64>
) -> (f64, f64, f64) {
    // Target direction as seen from the body frame
    let target_bf = att_q_bf.inverse_transform_vector(target_in);

    // Rotation taking the reference axis onto the target
    let err_rot = match UnitQuaternion::rotation_between(ref_axis_bf, &target_bf) {
        Some(r) => r,
        None => UnitQuaternion::from_axis_angle(
            &Vector3::x_axis(),
            std::f64::consts::PI
        )
    };

    // nalgebra's euler angles are exactly the extrinsic XYZ decomposition:
    // R = Rz(yaw) * Ry(pitch) * Rx(roll)
    err_rot.euler_angles()
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
