use cylfit::{
    k3d::{
        colormap::Colormap,
        linalg::{invert_rigid_pose, pose_from_parts, transform_points_homogeneous},
        transforms::axis_angle_to_rotation_matrix,
    },
    ClusterParams, CylinderConfig, PointCloudProcessor,
};
use glam::DVec3;
use rand::{Rng, SeedableRng};

// Points on the surface of a pole of the given radius, with a little radial noise.
fn pole(
    rng: &mut impl Rng,
    base: DVec3,
    axis: DVec3,
    radius: f64,
    noise: f64,
    n: usize,
) -> Vec<[f64; 3]> {
    let axis = axis.normalize();
    let u = axis.any_orthonormal_vector();
    let v = axis.cross(u);
    (0..n)
        .map(|_| {
            let t = rng.random_range(0.0..1.0);
            let theta = rng.random_range(0.0..std::f64::consts::TAU);
            let r = radius + rng.random_range(-noise..noise);
            (base + axis * t + (u * theta.cos() + v * theta.sin()) * r).to_array()
        })
        .collect()
}

#[test]
fn cluster_score_and_color_poles() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(1338);

    // scene in the global frame: two poles and scattered noise
    let mut global = pole(&mut rng, DVec3::new(0.0, 0.0, 0.0), DVec3::Z, 0.01, 0.0005, 150);
    global.extend(pole(
        &mut rng,
        DVec3::new(1.0, 0.5, 0.0),
        DVec3::new(0.05, 0.0, 1.0),
        0.01,
        0.004,
        150,
    ));
    global.extend((0..10).map(|i| [3.0 + i as f64, -3.0, 0.5]));

    // express the scene in the camera frame
    let rotation = axis_angle_to_rotation_matrix(&[0.2, 1.0, -0.3], 0.8)?;
    let camera_pose = pose_from_parts(&rotation, &[0.3, -1.0, 1.5]);
    let camera_points = transform_points_homogeneous(&global, &invert_rigid_pose(&camera_pose));

    let processor = PointCloudProcessor::new(CylinderConfig::default())?;
    assert_eq!(processor.config().radius, 0.01);
    let mut cylinders = processor.cluster(&camera_points, &camera_pose, &ClusterParams::default())?;
    assert_eq!(cylinders.len(), 2);

    // the recovered cluster points are back in the global frame
    for p in cylinders[0].points.points() {
        assert!(p[0].abs() < 0.05 && p[1].abs() < 0.05);
    }

    for cylinder in &cylinders {
        let axis = DVec3::new(
            cylinder.transform[0][2],
            cylinder.transform[1][2],
            cylinder.transform[2][2],
        );
        assert!(axis.z.abs() > 0.99);
    }

    let scores = processor.color_cylinders_by_r2(&mut cylinders);
    assert_eq!(scores.len(), 2);

    for score in &scores {
        assert!(score.mean_distance < 0.02);
        assert!(score.median_distance < 0.02);
        assert!(score.num_points_within_radius > 0);
        let json = serde_json::to_string(score)?;
        assert!(json.contains("r2_score"));
    }

    // the noisier pole has fewer points close to the nominal radius
    assert!(scores[0].num_points_within_radius > scores[1].num_points_within_radius);

    let colors = cylinders
        .iter()
        .map(|c| c.mesh.vertex_colors().map(|colors| colors[0]))
        .collect::<Vec<_>>();
    assert!(colors.contains(&Some(Colormap::Jet.map(0.0))));
    assert!(colors.contains(&Some(Colormap::Jet.map(1.0))));

    Ok(())
}
