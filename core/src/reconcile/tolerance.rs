use serde::{Deserialize, Serialize};

/// Allowed deviation below (`neg`) and above (`pos`) the design value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    pub neg: f64,
    pub pos: f64,
}

impl Tolerance {
    pub fn new(neg: f64, pos: f64) -> Self {
        Self { neg, pos }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BermTolerance {
    #[serde(default)]
    pub min: f64,
}

/// Tolerances keyed by compared parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToleranceConfig {
    pub bench_height: Tolerance,
    pub face_angle: Tolerance,
    pub berm_width: BermTolerance,
    pub inter_ramp_angle: Tolerance,
    pub overall_angle: Tolerance,
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            bench_height: Tolerance::new(1.0, 1.5),
            face_angle: Tolerance::new(5.0, 5.0),
            berm_width: BermTolerance { min: 6.0 },
            inter_ramp_angle: Tolerance::new(3.0, 2.0),
            overall_angle: Tolerance::new(2.0, 2.0),
        }
    }
}

/// Matching and classification constants of the comparator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Pairs whose mid elevations differ by this much or more stay unmatched.
    pub match_threshold: f64,
    /// Multiple of a tolerance bound still reported as out of tolerance.
    pub band_factor: f64,
    /// Fraction of the minimum berm still reported as out of tolerance.
    pub berm_soft_factor: f64,
    /// Design berms wider than this are treated as planned ramps.
    pub ramp_design_width: f64,
    /// Maximum width difference for a ramp to be reported as built.
    pub ramp_width_tolerance: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            match_threshold: 8.0,
            band_factor: 1.5,
            berm_soft_factor: 0.8,
            ramp_design_width: 15.0,
            ramp_width_tolerance: 3.0,
        }
    }
}
