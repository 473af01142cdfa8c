// PRECONDITION: both buffers have the same length.
fn matmul_points(
    src_points: &[[f64; 3]],
    dst_r_src: &[[f64; 3]; 3],
    dst_t_src: &[f64; 3],
    dst_points: &mut [[f64; 3]],
) {
    if src_points.is_empty() {
        return;
    }

    let dst_r_src_mat = faer::mat::from_row_major_slice(dst_r_src.as_flattened(), 3, 3);

    // Nx3 view of the source points, one point per row
    let points_in_src = faer::mat::from_row_major_slice(src_points.as_flattened(), src_points.len(), 3);

    {
        // 3xN view of the destination, one point per column
        let mut points_in_dst =
            faer::mat::from_column_major_slice_mut(dst_points.as_flattened_mut(), 3, src_points.len());

        faer::linalg::matmul::matmul(
            &mut points_in_dst,
            dst_r_src_mat,
            points_in_src.transpose(),
            None,
            1.0,
            faer::Parallelism::None,
        );
    }

    for p in dst_points.iter_mut() {
        p[0] += dst_t_src[0];
        p[1] += dst_t_src[1];
        p[2] += dst_t_src[2];
    }
}

/// Apply a 4x4 homogeneous transform to a set of points.
///
/// Each point is lifted to `[x, y, z, 1]`, multiplied by `pose` and the
/// homogeneous coordinate is dropped. No perspective division is done, so the
/// bottom row of `pose` is ignored.
///
/// Example:
///
/// ```
/// use cylfit_3d::linalg::transform_points_homogeneous;
///
/// let pose = [
///     [1.0, 0.0, 0.0, 1.0],
///     [0.0, 1.0, 0.0, 2.0],
///     [0.0, 0.0, 1.0, 3.0],
///     [0.0, 0.0, 0.0, 1.0],
/// ];
/// let points = transform_points_homogeneous(&[[1.0, 1.0, 1.0]], &pose);
/// assert_eq!(points, vec![[2.0, 3.0, 4.0]]);
/// ```
pub fn transform_points_homogeneous(points: &[[f64; 3]], pose: &[[f64; 4]; 4]) -> Vec<[f64; 3]> {
    let rotation = pose_rotation(pose);
    let translation = pose_translation(pose);
    let mut dst_points = vec![[0.0; 3]; points.len()];
    matmul_points(points, &rotation, &translation, &mut dst_points);
    dst_points
}

/// Extract the upper-left 3x3 block of a homogeneous transform.
pub fn pose_rotation(pose: &[[f64; 4]; 4]) -> [[f64; 3]; 3] {
    let mut rotation = [[0.0; 3]; 3];
    for (dst_row, src_row) in rotation.iter_mut().zip(pose.iter()) {
        dst_row.copy_from_slice(&src_row[..3]);
    }
    rotation
}

/// Extract the translation column of a homogeneous transform.
pub fn pose_translation(pose: &[[f64; 4]; 4]) -> [f64; 3] {
    [pose[0][3], pose[1][3], pose[2][3]]
}

/// Build a homogeneous transform from a rotation and a translation.
pub fn pose_from_parts(rotation: &[[f64; 3]; 3], translation: &[f64; 3]) -> [[f64; 4]; 4] {
    let mut pose = [[0.0; 4]; 4];
    for i in 0..3 {
        pose[i][..3].copy_from_slice(&rotation[i]);
        pose[i][3] = translation[i];
    }
    pose[3][3] = 1.0;
    pose
}

/// Invert a rigid homogeneous transform.
///
/// PRECONDITION: the rotation block is orthonormal.
pub fn invert_rigid_pose(pose: &[[f64; 4]; 4]) -> [[f64; 4]; 4] {
    let rotation = pose_rotation(pose);
    let translation = pose_translation(pose);

    // R' = R^T
    let mut rotation_inv = [[0.0; 3]; 3];
    for (i, row) in rotation_inv.iter_mut().enumerate() {
        for (j, val) in row.iter_mut().enumerate() {
            *val = rotation[j][i];
        }
    }

    // t' = -R^T * t
    let mut translation_inv = [0.0; 3];
    for (i, val) in translation_inv.iter_mut().enumerate() {
        *val = -(0..3).map(|j| rotation_inv[i][j] * translation[j]).sum::<f64>();
    }

    pose_from_parts(&rotation_inv, &translation_inv)
}
