use std::collections::BTreeMap;

use crate::NOISE;

/// Drop the z coordinate of every point.
pub fn project_xy(points: &[[f64; 3]]) -> Vec<[f64; 2]> {
    points.iter().map(|p| [p[0], p[1]]).collect()
}

/// Group point indices by cluster label, in ascending label order.
///
/// Points labeled [`NOISE`] are left out.
///
/// Example:
///
/// ```
/// use cylfit_cluster::{group_by_label, NOISE};
///
/// let groups = group_by_label(&[1, NOISE, 0, 1]);
/// assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec![0, 1]);
/// assert_eq!(groups[&1], vec![0, 3]);
/// ```
pub fn group_by_label(labels: &[i32]) -> BTreeMap<i32, Vec<usize>> {
    let mut groups: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
    for (i, &label) in labels.iter().enumerate() {
        if label == NOISE {
            continue;
        }
        groups.entry(label).or_default().push(i);
    }
    groups
}
