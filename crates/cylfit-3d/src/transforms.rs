use glam::DVec3;

use crate::error::Error3d;

/// Cross-product magnitude below which a direction is treated as parallel to +Z.
pub const PARALLEL_EPSILON: f64 = 1e-6;

/// Compute the rotation matrix from an axis and angle.
///
/// # Arguments
///
/// * `axis` - The axis of rotation. It does not need to be normalized.
/// * `angle` - The angle of rotation in radians.
///
/// # Returns
///
/// The rotation matrix (row major).
///
/// Example:
///
/// ```
/// use cylfit_3d::transforms::axis_angle_to_rotation_matrix;
///
/// let axis = [1.0, 0.0, 0.0];
/// let angle = std::f64::consts::PI / 2.0;
/// let rotation = axis_angle_to_rotation_matrix(&axis, angle).unwrap();
/// assert!((rotation[1][2] + 1.0).abs() < 1e-12);
/// ```
pub fn axis_angle_to_rotation_matrix(axis: &[f64; 3], angle: f64) -> Result<[[f64; 3]; 3], Error3d> {
    // normalize the vector
    let axis = DVec3::from_array(*axis);
    let magnitude = axis.length();
    if magnitude < 1e-10 {
        return Err(Error3d::ZeroVector);
    }
    let DVec3 { x, y, z } = axis / magnitude;

    let c = angle.cos();
    let s = angle.sin();
    let t = 1.0 - c;

    let m00 = c + x * x * t;
    let m11 = c + y * y * t;
    let m22 = c + z * z * t;

    let tmp1 = x * y * t;
    let tmp2 = z * s;

    let m10 = tmp1 + tmp2;
    let m01 = tmp1 - tmp2;

    let tmp3 = x * z * t;
    let tmp4 = y * s;

    let m20 = tmp3 - tmp4;
    let m02 = tmp3 + tmp4;

    let tmp5 = y * z * t;
    let tmp6 = x * s;

    let m12 = tmp5 - tmp6;
    let m21 = tmp5 + tmp6;

    Ok([[m00, m01, m02], [m10, m11, m12], [m20, m21, m22]])
}

/// Rotation that maps the local +Z axis onto `direction`.
///
/// The rotation axis is `z × direction` and the angle is the arc cosine of
/// their normalized dot product. When the cross product is shorter than
/// [`PARALLEL_EPSILON`] the identity is returned. This also happens when
/// `direction` points along -Z, in which case the result does not flip the axis.
pub fn rotation_from_z_to(direction: &[f64; 3]) -> [[f64; 3]; 3] {
    let direction = DVec3::from_array(*direction);
    let axis = DVec3::Z.cross(direction);

    if axis.length() <= PARALLEL_EPSILON {
        log::debug!("direction {direction} is parallel to +Z, using identity rotation");
        return IDENTITY3;
    }

    let cos_angle = (DVec3::Z.dot(direction) / direction.length()).clamp(-1.0, 1.0);
    let angle = cos_angle.acos();

    // axis is non-zero here, normalization cannot fail
    axis_angle_to_rotation_matrix(&axis.to_array(), angle).unwrap_or(IDENTITY3)
}

/// The 3x3 identity matrix.
pub const IDENTITY3: [[f64; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Apply a row-major 3x3 matrix to a vector.
pub fn mat3_mul_vec(m: &[[f64; 3]; 3], v: &[f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}
