pub mod matrix;
pub mod simplify;
pub mod stats;

pub use matrix::MatrixHelper;
pub use simplify::{perpendicular_distance, simplify, simplify_indices};
pub use stats::StatsHelper;

/// Angle of a rise over a run, in degrees within [0, 90].
pub fn slope_degrees(rise: f64, run: f64) -> f64 {
    rise.abs().atan2(run.abs()).to_degrees()
}
