#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

use cylfit::{
    k3d::{mesh::TriangleMesh, pointcloud::PointCloud},
    FittedCylinder,
};

/// Color of the logged cluster points.
pub const DEFAULT_POINT_COLOR: [u8; 3] = [90, 145, 199];

/// Radius of the logged points, in scene units.
const POINT_RADIUS: f32 = 0.003;

/// Error types for the visualization module.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum VizError {
    /// The rerun recording stream failed.
    #[error(transparent)]
    Rerun(#[from] rerun::RecordingStreamError),
}

/// Spawn a rerun viewer and connect a recording stream to it.
pub fn spawn_viewer(app_id: &str) -> Result<rerun::RecordingStream, VizError> {
    Ok(rerun::RecordingStreamBuilder::new(app_id).spawn()?)
}

/// Log the cluster point sets under `clusters/<i>` and the cylinders under `cylinders/<i>`.
///
/// Cylinders are logged with the vertex colors they were painted with.
///
/// The data is sent to the viewer behind `rec` and the call returns once it is
/// queued. It does not wait for the viewer window to close: the viewer is a
/// separate process that stays open until the user closes it. Call
/// [`rerun::RecordingStream::flush_blocking`] before exiting so nothing is lost.
pub fn visualize(
    rec: &rerun::RecordingStream,
    cluster_clouds: &[PointCloud],
    cylinders: &[FittedCylinder],
) -> Result<(), VizError> {
    for (i, cloud) in cluster_clouds.iter().enumerate() {
        log_pointcloud(rec, &format!("clusters/{i}"), cloud)?;
    }

    for (i, cylinder) in cylinders.iter().enumerate() {
        log_mesh(rec, &format!("cylinders/{i}"), &cylinder.mesh)?;
    }

    log::debug!(
        "logged {} clusters and {} cylinders",
        cluster_clouds.len(),
        cylinders.len()
    );

    Ok(())
}

/// Log a point cloud in [`DEFAULT_POINT_COLOR`].
pub fn log_pointcloud(
    rec: &rerun::RecordingStream,
    name: &str,
    pointcloud: &PointCloud,
) -> Result<(), VizError> {
    let points = pointcloud
        .points()
        .iter()
        .map(|p| rerun::Position3D::new(p[0] as f32, p[1] as f32, p[2] as f32))
        .collect::<Vec<_>>();

    let [r, g, b] = DEFAULT_POINT_COLOR;

    rec.log(
        name,
        &rerun::Points3D::new(points)
            .with_colors([rerun::Color::from_rgb(r, g, b)])
            .with_radii([POINT_RADIUS]),
    )?;

    Ok(())
}

/// Log a triangle mesh with its normals and vertex colors.
pub fn log_mesh(
    rec: &rerun::RecordingStream,
    name: &str,
    mesh: &TriangleMesh,
) -> Result<(), VizError> {
    let positions = mesh
        .vertices()
        .iter()
        .map(|v| [v[0] as f32, v[1] as f32, v[2] as f32])
        .collect::<Vec<_>>();

    let mut archetype =
        rerun::Mesh3D::new(positions).with_triangle_indices(mesh.triangles().iter().copied());

    if let Some(normals) = mesh.vertex_normals() {
        archetype = archetype.with_vertex_normals(
            normals
                .iter()
                .map(|n| [n[0] as f32, n[1] as f32, n[2] as f32]),
        );
    }

    if let Some(colors) = mesh.vertex_colors() {
        archetype = archetype.with_vertex_colors(colors.iter().map(|&c| to_color(c)));
    }

    rec.log(name, &archetype)?;

    Ok(())
}

/// Convert an rgb color in `[0, 1]` to a rerun color.
fn to_color(color: [f64; 3]) -> rerun::Color {
    let [r, g, b] = color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    rerun::Color::from_rgb(r, g, b)
}
