//! Point-wise and area metrics between two section profiles.

pub mod area;
pub mod deviation;

pub use area::{area_between_profiles, AreaBetween, GRID_STEP};
pub use deviation::profile_deviation;
