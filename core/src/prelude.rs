use serde::{Deserialize, Serialize};

/// Heuristic constants used while turning steep runs into benches.
///
/// None of these are physically derived; they are exposed so a site can
/// recalibrate them without touching the extraction code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchHeuristics {
    /// Candidates lower than this are rejected.
    pub min_bench_height: f64,
    /// Candidates whose crest-to-toe chord is shorter than this are rejected.
    pub min_face_length: f64,
    /// Segments steeper than `face_threshold - steep_margin` dominate the face angle.
    pub steep_margin: f64,
    /// Minimum combined length of the steep segments before they are trusted.
    pub min_steep_length: f64,
    /// Elevation gap under which two consecutive benches may be merged.
    pub merge_gap: f64,
    /// A merge needs at least one of the two benches below this height.
    pub merge_max_height: f64,
    pub ramp_min_width: f64,
    pub ramp_max_width: f64,
    /// Horizontal offset past the lowest toe before the trailing berm starts.
    pub trailing_offset: f64,
}

impl Default for BenchHeuristics {
    fn default() -> Self {
        Self {
            min_bench_height: 2.0,
            min_face_length: 1.5,
            steep_margin: 10.0,
            min_steep_length: 0.1,
            merge_gap: 2.0,
            merge_max_height: 3.0,
            ramp_min_width: 15.0,
            ramp_max_width: 42.0,
            trailing_offset: 0.1,
        }
    }
}

impl BenchHeuristics {
    /// True when `width` falls inside the ramp band (inclusive on both ends).
    pub fn is_ramp_width(&self, width: f64) -> bool {
        (self.ramp_min_width..=self.ramp_max_width).contains(&width)
    }
}

/// Shared configuration for each extraction stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Profile sampling scale; the simplification tolerance is derived from it.
    pub resolution: f64,
    /// Segments at or above this angle (degrees) are faces.
    pub face_threshold: f64,
    /// A trailing run at or below this angle (degrees) counts as a berm.
    pub berm_threshold: f64,
    /// Berms wider than this split the bench list; `None` or zero disables it.
    pub max_berm_width: Option<f64>,
    /// Segments at least this long are classified on their own angle instead
    /// of the window-3 smoothed one. The default therefore differs from plain
    /// smoothing on long berms between faces; `f64::INFINITY` smooths every
    /// segment.
    pub smoothing_span: f64,
    pub heuristics: BenchHeuristics,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            resolution: 0.5,
            face_threshold: 40.0,
            berm_threshold: 20.0,
            max_berm_width: Some(50.0),
            smoothing_span: 5.0,
            heuristics: BenchHeuristics::default(),
        }
    }
}

impl ExtractionConfig {
    /// Simplification tolerance: half the resolution, never below 5 cm.
    pub fn epsilon(&self) -> f64 {
        (self.resolution / 2.0).max(0.05)
    }

    /// Outlier filter limit, if the filter is enabled.
    pub fn berm_limit(&self) -> Option<f64> {
        self.max_berm_width.filter(|limit| *limit > 0.0)
    }

    pub fn validate(&self) -> StageResult<()> {
        positive("resolution", self.resolution)?;
        positive("face_threshold", self.face_threshold)?;
        positive("berm_threshold", self.berm_threshold)?;
        if self.smoothing_span.is_nan() || self.smoothing_span < 0.0 {
            return Err(StageError::InvalidInput(format!(
                "smoothing_span must be non-negative, got {}",
                self.smoothing_span
            )));
        }
        if let Some(limit) = self.max_berm_width {
            if !limit.is_finite() || limit < 0.0 {
                return Err(StageError::InvalidInput(format!(
                    "max_berm_width must be a non-negative number, got {}",
                    limit
                )));
            }
        }
        let heuristics = &self.heuristics;
        if heuristics.ramp_min_width > heuristics.ramp_max_width {
            return Err(StageError::InvalidInput(format!(
                "ramp width range is inverted: [{}, {}]",
                heuristics.ramp_min_width, heuristics.ramp_max_width
            )));
        }
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> StageResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(StageError::InvalidInput(format!(
            "{} must be a positive number, got {}",
            name, value
        )))
    }
}

/// Common error type for stage execution.
#[derive(thiserror::Error, Debug)]
pub enum StageError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("internal failure: {0}")]
    Internal(String),
}

pub type StageResult<T> = Result<T, StageError>;

/// Trait describing the stages of the profile-to-bench pipeline.
pub trait ProcessingStage {
    type Input;
    type Output;

    fn initialize(&mut self, config: &ExtractionConfig) -> StageResult<()>;
    fn execute(&mut self, input: Self::Input) -> StageResult<Self::Output>;
    fn cleanup(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epsilon_has_a_floor() {
        let config = ExtractionConfig {
            resolution: 0.02,
            ..Default::default()
        };
        assert_eq!(config.epsilon(), 0.05);
        assert_eq!(ExtractionConfig::default().epsilon(), 0.25);
    }

    #[test]
    fn validate_rejects_non_positive_resolution() {
        let config = ExtractionConfig {
            resolution: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(StageError::InvalidInput(_))
        ));
    }

    #[test]
    fn validate_rejects_negative_threshold() {
        let config = ExtractionConfig {
            face_threshold: -5.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_berm_limit_disables_filter() {
        let config = ExtractionConfig {
            max_berm_width: Some(0.0),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.berm_limit(), None);
    }

    #[test]
    fn ramp_band_is_inclusive() {
        let heuristics = BenchHeuristics::default();
        assert!(heuristics.is_ramp_width(15.0));
        assert!(heuristics.is_ramp_width(42.0));
        assert!(!heuristics.is_ramp_width(14.99));
        assert!(!heuristics.is_ramp_width(42.01));
    }
}
