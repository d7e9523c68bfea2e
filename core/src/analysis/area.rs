use serde::Serialize;

use crate::model::Profile;

/// Resampling step along distance.
pub const GRID_STEP: f64 = 0.1;

/// Areas enclosed between a reference and an evaluated profile.
///
/// `under` accumulates where the evaluated surface lies above the reference
/// (material left in place), `over` where it lies below (overbreak). The
/// resampled grid is kept for plotting.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AreaBetween {
    pub over: f64,
    pub under: f64,
    pub grid: Vec<f64>,
    pub reference: Vec<f64>,
    pub evaluated: Vec<f64>,
}

/// Linear interpolant over a profile sorted by distance, extrapolating past
/// both ends with the outermost segments.
struct Interpolant {
    distances: Vec<f64>,
    elevations: Vec<f64>,
}

impl Interpolant {
    fn new(profile: &Profile) -> Self {
        let mut points: Vec<_> = profile.points().collect();
        points.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        Self {
            distances: points.iter().map(|p| p.distance).collect(),
            elevations: points.iter().map(|p| p.elevation).collect(),
        }
    }

    fn at(&self, distance: f64) -> f64 {
        let last = self.distances.len() - 1;
        let upper = self
            .distances
            .partition_point(|&d| d < distance)
            .clamp(1, last);
        let (d0, d1) = (self.distances[upper - 1], self.distances[upper]);
        let (z0, z1) = (self.elevations[upper - 1], self.elevations[upper]);
        if d1 == d0 {
            return z1;
        }
        z0 + (z1 - z0) * (distance - d0) / (d1 - d0)
    }
}

fn range(profile: &Profile) -> (f64, f64) {
    profile
        .distances()
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &d| {
            (lo.min(d), hi.max(d))
        })
}

pub fn area_between_profiles(reference: &Profile, evaluated: &Profile) -> AreaBetween {
    if reference.len() < 2 || evaluated.len() < 2 {
        return AreaBetween::default();
    }

    let (ref_min, ref_max) = range(reference);
    let (eval_min, eval_max) = range(evaluated);
    let start = ref_min.max(eval_min);
    let end = ref_max.min(eval_max);
    if end <= start {
        return AreaBetween::default();
    }

    // half-open like arange: the end of the overlap is not sampled
    let samples = ((end - start) / GRID_STEP).ceil() as usize;
    let grid: Vec<f64> = (0..samples)
        .map(|i| start + i as f64 * GRID_STEP)
        .collect();

    let reference_fn = Interpolant::new(reference);
    let evaluated_fn = Interpolant::new(evaluated);
    let reference_z: Vec<f64> = grid.iter().map(|&d| reference_fn.at(d)).collect();
    let evaluated_z: Vec<f64> = grid.iter().map(|&d| evaluated_fn.at(d)).collect();

    let (mut over, mut under) = (0.0, 0.0);
    for (z_ref, z_eval) in reference_z.iter().zip(&evaluated_z) {
        let diff = z_eval - z_ref;
        if diff > 0.0 {
            under += diff;
        } else {
            over -= diff;
        }
    }

    AreaBetween {
        over: over * GRID_STEP,
        under: under * GRID_STEP,
        grid,
        reference: reference_z,
        evaluated: evaluated_z,
    }
}
