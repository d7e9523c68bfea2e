use serde::{Deserialize, Serialize};

use crate::model::BenchParams;

/// Idealized crest/toe polyline of a section, for overlays and export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconciledProfile {
    pub distances: Vec<f64>,
    pub elevations: Vec<f64>,
}

impl ReconciledProfile {
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}

/// Orders benches by crest distance and emits crest then toe for each one.
pub fn build_reconciled_profile(benches: &[BenchParams]) -> ReconciledProfile {
    let mut ordered: Vec<&BenchParams> = benches.iter().collect();
    ordered.sort_by(|a, b| a.crest_distance.total_cmp(&b.crest_distance));

    let mut profile = ReconciledProfile {
        distances: Vec::with_capacity(ordered.len() * 2),
        elevations: Vec::with_capacity(ordered.len() * 2),
    };
    for bench in ordered {
        profile.distances.push(bench.crest_distance);
        profile.elevations.push(bench.crest_elevation);
        profile.distances.push(bench.toe_distance);
        profile.elevations.push(bench.toe_elevation);
    }
    profile
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProfilePoint;

    #[test]
    fn empty_benches_give_empty_profile() {
        assert!(build_reconciled_profile(&[]).is_empty());
    }

    #[test]
    fn profile_runs_along_crest_distance() {
        let lower = BenchParams::from_break_points(
            ProfilePoint::new(37.0, 90.0),
            ProfilePoint::new(39.0, 80.0),
            78.0,
        );
        let upper = BenchParams::from_break_points(
            ProfilePoint::new(10.0, 100.0),
            ProfilePoint::new(12.0, 90.0),
            78.0,
        );
        let profile = build_reconciled_profile(&[lower, upper]);
        assert_eq!(profile.distances, vec![10.0, 12.0, 37.0, 39.0]);
        assert_eq!(profile.elevations, vec![100.0, 90.0, 90.0, 80.0]);
        assert_eq!(profile.len(), 4);
    }
}
