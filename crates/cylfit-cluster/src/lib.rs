#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

mod dbscan;
pub use dbscan::*;

mod labels;
pub use labels::{group_by_label, project_xy};
