use argh::FromArgs;
use glam::DVec3;
use rand::{Rng, SeedableRng};

use cylfit::{
    k3d::{
        linalg::{invert_rigid_pose, pose_from_parts, transform_points_homogeneous},
        transforms::axis_angle_to_rotation_matrix,
    },
    ClusterParams, CylinderConfig, PointCloudProcessor,
};

#[derive(FromArgs)]
/// Cluster a synthetic scene of poles, fit cylinders and show them colored by fit quality
struct Args {
    /// number of poles in the scene
    #[argh(option, default = "5")]
    num_poles: usize,

    /// number of points sampled on each pole
    #[argh(option, default = "300")]
    points_per_pole: usize,

    /// number of uniformly scattered noise points
    #[argh(option, default = "100")]
    noise_points: usize,

    /// clustering neighborhood radius
    #[argh(option, default = "0.1")]
    eps: f64,

    /// minimum neighbors of a core point
    #[argh(option, default = "15")]
    min_samples: usize,

    /// cylinder radius
    #[argh(option, default = "0.01")]
    radius: f64,

    /// cylinder height
    #[argh(option, default = "1.0")]
    height: f64,

    /// random seed of the scene
    #[argh(option, default = "1338")]
    seed: u64,

    /// do not spawn the viewer
    #[argh(switch)]
    no_viz: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    // fails on invalid cylinder dimensions, so check them before sampling with them
    let processor = build_processor(&args)?;

    let mut rng = rand::rngs::StdRng::seed_from_u64(args.seed);

    // camera 1.5m above the ground, pitched down and yawed
    let camera_r_world = axis_angle_to_rotation_matrix(&[1.0, 0.2, 0.0], 2.2)?;
    let camera_pose = pose_from_parts(&camera_r_world, &[0.0, -1.0, 1.5]);

    let points_global = synthesize_scene(&mut rng, &args);
    let points = transform_points_homogeneous(&points_global, &invert_rigid_pose(&camera_pose));
    println!("Synthesized #{} points", points.len());

    let params = ClusterParams {
        eps: args.eps,
        min_samples: args.min_samples,
    };

    let mut cylinders = processor.cluster(&points, &camera_pose, &params)?;
    println!("Found #{} clusters", cylinders.len());

    let scores = processor.color_cylinders_by_r2(&mut cylinders);
    for (cylinder, score) in cylinders.iter().zip(scores.iter()) {
        let record = serde_json::json!({
            "label": cylinder.label,
            "num_points": cylinder.points.len(),
            "metrics": score,
        });
        println!("{record}");
    }

    if args.no_viz {
        return Ok(());
    }

    let rec = cylfit_viz::spawn_viewer("Cylinder Fit")?;

    let cluster_clouds = cylinders
        .iter()
        .map(|c| c.points.clone())
        .collect::<Vec<_>>();
    cylfit_viz::visualize(&rec, &cluster_clouds, &cylinders)?;
    rec.flush_blocking();

    Ok(())
}

fn build_processor(args: &Args) -> Result<PointCloudProcessor, cylfit::ProcessorError> {
    PointCloudProcessor::new(CylinderConfig {
        radius: args.radius,
        height: args.height,
        ..Default::default()
    })
}

// Poles standing on a 4x4m patch with a random tilt and surface noise, plus scattered noise.
fn synthesize_scene(rng: &mut impl Rng, args: &Args) -> Vec<[f64; 3]> {
    let mut points = Vec::with_capacity(args.num_poles * args.points_per_pole + args.noise_points);

    for pole in 0..args.num_poles {
        let base = DVec3::new(
            rng.random_range(-2.0..2.0),
            rng.random_range(0.5..4.5),
            0.0,
        );
        let axis = DVec3::new(
            rng.random_range(-0.05..0.05),
            rng.random_range(-0.05..0.05),
            1.0,
        )
        .normalize();
        let u = axis.any_orthonormal_vector();
        let v = axis.cross(u);

        // later poles are noisier, so the fit quality varies across the scene
        let surface_noise = 0.001 * (pole + 1) as f64;

        for _ in 0..args.points_per_pole {
            let t = rng.random_range(0.0..args.height);
            let theta = rng.random_range(0.0..std::f64::consts::TAU);
            let r = args.radius + rng.random_range(-surface_noise..surface_noise);
            let p = base + axis * t + (u * theta.cos() + v * theta.sin()) * r;
            points.push(p.to_array());
        }
    }

    for _ in 0..args.noise_points {
        points.push([
            rng.random_range(-3.0..3.0),
            rng.random_range(0.0..5.0),
            rng.random_range(0.0..2.0),
        ]);
    }

    log::debug!("scene with {} poles and {} noise points", args.num_poles, args.noise_points);

    points
}
