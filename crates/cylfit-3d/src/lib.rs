#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Colormaps used to encode scalar values as colors.
pub mod colormap;

/// Error types for the 3d module.
pub mod error;
pub use error::Error3d;

/// Linear algebra utilities.
pub mod linalg;

/// Triangle meshes and geometric primitives.
pub mod mesh;

/// Principal component analysis of point sets.
pub mod pca;

/// Point cloud container.
pub mod pointcloud;

/// 3D transforms algorithms.
pub mod transforms;
