use rstar::RTree;

use crate::model::Profile;

/// Distance from every evaluated point to the nearest reference vertex.
///
/// An empty reference yields zeros, one per evaluated point.
pub fn profile_deviation(reference: &Profile, evaluated: &Profile) -> Vec<f64> {
    if reference.is_empty() {
        return vec![0.0; evaluated.len()];
    }

    let tree = RTree::bulk_load(
        reference
            .points()
            .map(|p| [p.distance, p.elevation])
            .collect::<Vec<_>>(),
    );

    evaluated
        .points()
        .map(|p| {
            tree.nearest_neighbor(&[p.distance, p.elevation])
                .map(|nearest| (nearest[0] - p.distance).hypot(nearest[1] - p.elevation))
                .unwrap_or(0.0)
        })
        .collect()
}
