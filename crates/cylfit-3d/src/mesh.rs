use glam::DVec3;

use crate::{
    error::Error3d,
    linalg::{pose_rotation, transform_points_homogeneous},
    transforms::mat3_mul_vec,
};

/// An indexed triangle mesh.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    vertices: Vec<[f64; 3]>,
    triangles: Vec<[u32; 3]>,
    vertex_normals: Option<Vec<[f64; 3]>>,
    // rgb in [0, 1]
    vertex_colors: Option<Vec<[f64; 3]>>,
}

impl TriangleMesh {
    /// Create a mesh from vertices and triangle indices.
    pub fn new(vertices: Vec<[f64; 3]>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            triangles,
            vertex_normals: None,
            vertex_colors: None,
        }
    }

    /// Create a cylinder centered at the origin with its axis along +Z.
    ///
    /// The side is split into `split` stacked bands of `resolution` segments, and
    /// both ends are closed with a triangle fan. Vertices `0` and `1` are the
    /// top and bottom cap centers.
    ///
    /// # Arguments
    ///
    /// * `radius` - Radius of the cylinder.
    /// * `height` - Height of the cylinder, the caps sit at `±height / 2`.
    /// * `resolution` - Number of segments around the circumference.
    /// * `split` - Number of bands along the height.
    ///
    /// # Errors
    ///
    /// Returns [`Error3d::InvalidMeshParameter`] for non-positive sizes,
    /// `resolution < 3` or `split == 0`.
    pub fn create_cylinder(
        radius: f64,
        height: f64,
        resolution: usize,
        split: usize,
    ) -> Result<Self, Error3d> {
        if radius.is_nan() || radius <= 0.0 {
            return Err(Error3d::InvalidMeshParameter(format!(
                "radius must be positive, got {radius}"
            )));
        }
        if height.is_nan() || height <= 0.0 {
            return Err(Error3d::InvalidMeshParameter(format!(
                "height must be positive, got {height}"
            )));
        }
        if resolution < 3 || split == 0 {
            return Err(Error3d::InvalidMeshParameter(format!(
                "resolution must be >= 3 and split >= 1, got {resolution} and {split}"
            )));
        }

        let half = height / 2.0;
        let step = 2.0 * std::f64::consts::PI / resolution as f64;
        let h_step = height / split as f64;

        let mut vertices = Vec::with_capacity(2 + resolution * (split + 1));
        vertices.push([0.0, 0.0, half]);
        vertices.push([0.0, 0.0, -half]);
        for i in 0..=split {
            let z = half - i as f64 * h_step;
            for j in 0..resolution {
                let theta = step * j as f64;
                vertices.push([theta.cos() * radius, theta.sin() * radius, z]);
            }
        }

        let res = resolution as u32;
        let mut triangles = Vec::with_capacity(2 * resolution * (split + 1));

        // caps
        let top = 2;
        let bottom = 2 + res * split as u32;
        for j in 0..res {
            let j1 = (j + 1) % res;
            triangles.push([0, top + j, top + j1]);
            triangles.push([1, bottom + j1, bottom + j]);
        }

        // side bands
        for i in 0..split as u32 {
            let base1 = 2 + res * i;
            let base2 = base1 + res;
            for j in 0..res {
                let j1 = (j + 1) % res;
                triangles.push([base2 + j, base1 + j1, base1 + j]);
                triangles.push([base2 + j, base2 + j1, base1 + j1]);
            }
        }

        let mut mesh = Self::new(vertices, triangles);
        mesh.compute_vertex_normals();
        Ok(mesh)
    }

    /// The mesh vertices.
    pub fn vertices(&self) -> &[[f64; 3]] {
        &self.vertices
    }

    /// The triangle vertex indices.
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Per-vertex normals, if computed.
    pub fn vertex_normals(&self) -> Option<&[[f64; 3]]> {
        self.vertex_normals.as_deref()
    }

    /// Per-vertex colors in `[0, 1]`, if painted.
    pub fn vertex_colors(&self) -> Option<&[[f64; 3]]> {
        self.vertex_colors.as_deref()
    }

    /// Set every vertex to the same color.
    pub fn paint_uniform_color(&mut self, color: [f64; 3]) {
        let color = color.map(|c| c.clamp(0.0, 1.0));
        self.vertex_colors = Some(vec![color; self.vertices.len()]);
    }

    /// Compute area weighted vertex normals from the triangles.
    pub fn compute_vertex_normals(&mut self) {
        let mut normals = vec![DVec3::ZERO; self.vertices.len()];
        for tri in &self.triangles {
            let [a, b, c] = tri.map(|i| DVec3::from_array(self.vertices[i as usize]));
            let face_normal = (b - a).cross(c - a);
            for &i in tri {
                normals[i as usize] += face_normal;
            }
        }
        self.vertex_normals = Some(
            normals
                .into_iter()
                .map(|n| n.normalize_or_zero().to_array())
                .collect(),
        );
    }

    /// Apply a homogeneous transform to the vertices and normals in place.
    pub fn transform(&mut self, pose: &[[f64; 4]; 4]) {
        self.vertices = transform_points_homogeneous(&self.vertices, pose);

        if let Some(normals) = self.vertex_normals.as_mut() {
            let rotation = pose_rotation(pose);
            for n in normals.iter_mut() {
                let rotated = DVec3::from_array(mat3_mul_vec(&rotation, n));
                *n = rotated.normalize_or_zero().to_array();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::pose_from_parts;
    use crate::transforms::axis_angle_to_rotation_matrix;
    use approx::assert_relative_eq;

    #[test]
    fn test_create_cylinder_layout() -> Result<(), Error3d> {
        let mesh = TriangleMesh::create_cylinder(0.5, 2.0, 20, 4)?;
        assert_eq!(mesh.vertices().len(), 2 + 20 * 5);
        assert_eq!(mesh.triangles().len(), 2 * 20 + 2 * 20 * 4);
        assert_eq!(mesh.vertices()[0], [0.0, 0.0, 1.0]);
        assert_eq!(mesh.vertices()[1], [0.0, 0.0, -1.0]);

        for v in &mesh.vertices()[2..] {
            assert_relative_eq!((v[0] * v[0] + v[1] * v[1]).sqrt(), 0.5, epsilon = 1e-12);
            assert!(v[2].abs() <= 1.0 + 1e-12);
        }

        let max_index = mesh.vertices().len() as u32;
        assert!(mesh.triangles().iter().flatten().all(|&i| i < max_index));
        Ok(())
    }

    #[test]
    fn test_cylinder_normals() -> Result<(), Error3d> {
        let mesh = TriangleMesh::create_cylinder(1.0, 1.0, 16, 2)?;
        let normals = mesh.vertex_normals().expect("normals are computed on creation");
        // top cap center points up
        assert_relative_eq!(normals[0][2], 1.0, epsilon = 1e-9);
        assert_relative_eq!(normals[1][2], -1.0, epsilon = 1e-9);
        // middle band vertices point outwards
        let mid = 2 + 16;
        let v = mesh.vertices()[mid];
        let n = normals[mid];
        assert!(v[0] * n[0] + v[1] * n[1] > 0.9);
        Ok(())
    }

    #[test]
    fn test_create_cylinder_invalid() {
        assert!(TriangleMesh::create_cylinder(0.0, 1.0, 20, 4).is_err());
        assert!(TriangleMesh::create_cylinder(1.0, -1.0, 20, 4).is_err());
        assert!(TriangleMesh::create_cylinder(1.0, 1.0, 2, 4).is_err());
        assert!(TriangleMesh::create_cylinder(1.0, 1.0, 20, 0).is_err());
        assert!(TriangleMesh::create_cylinder(f64::NAN, 1.0, 20, 4).is_err());
    }

    #[test]
    fn test_transform_and_paint() -> Result<(), Error3d> {
        let mut mesh = TriangleMesh::create_cylinder(0.1, 1.0, 8, 1)?;
        let rotation = axis_angle_to_rotation_matrix(&[1.0, 0.0, 0.0], std::f64::consts::FRAC_PI_2)?;
        let pose = pose_from_parts(&rotation, &[1.0, 2.0, 3.0]);
        mesh.transform(&pose);

        // the top cap center moves from +Z to -Y
        let top = mesh.vertices()[0];
        assert_relative_eq!(top[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(top[1], 1.5, epsilon = 1e-12);
        assert_relative_eq!(top[2], 3.0, epsilon = 1e-12);

        let center = mesh
            .vertices()
            .iter()
            .fold(DVec3::ZERO, |acc, v| acc + DVec3::from_array(*v))
            / mesh.vertices().len() as f64;
        assert_relative_eq!(center[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(center[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(center[2], 3.0, epsilon = 1e-12);

        assert!(mesh.vertex_colors().is_none());
        mesh.paint_uniform_color([0.0, 0.0, 1.5]);
        let colors = mesh.vertex_colors().expect("mesh was painted");
        assert_eq!(colors.len(), mesh.vertices().len());
        assert_eq!(colors[0], [0.0, 0.0, 1.0]);
        Ok(())
    }
}
