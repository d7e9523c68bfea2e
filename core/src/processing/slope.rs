use crate::math::slope_degrees;
use crate::math::stats::StatsHelper;
use crate::model::ProfilePoint;
use crate::prelude::{ExtractionConfig, ProcessingStage, StageError, StageResult};
use crate::telemetry::log::LogManager;

/// Segments shorter than this carry no direction.
const MIN_SEGMENT_LENGTH: f64 = 1e-4;
const SMOOTHING_WINDOW: usize = 3;

/// Per-segment slope analysis of a simplified profile.
///
/// Segment `i` joins vertices `i` and `i + 1`; every vector except `points`
/// has one entry per segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlopeProfile {
    pub points: Vec<ProfilePoint>,
    pub angles: Vec<f64>,
    pub lengths: Vec<f64>,
    pub valid: Vec<bool>,
    pub smoothed: Vec<f64>,
    pub steep: Vec<bool>,
}

impl SlopeProfile {
    pub fn segment_count(&self) -> usize {
        self.angles.len()
    }

    pub fn has_valid_segments(&self) -> bool {
        self.valid.iter().any(|&valid| valid)
    }
}

/// Labels each segment of a simplified profile as face or berm.
pub struct SlopeStage {
    config: Option<ExtractionConfig>,
    logger: LogManager,
}

impl SlopeStage {
    pub fn new(logger: LogManager) -> Self {
        Self {
            config: None,
            logger,
        }
    }
}

impl ProcessingStage for SlopeStage {
    type Input = Vec<ProfilePoint>;
    type Output = SlopeProfile;

    fn initialize(&mut self, config: &ExtractionConfig) -> StageResult<()> {
        self.config = Some(config.clone());
        Ok(())
    }

    fn execute(&mut self, input: Self::Input) -> StageResult<Self::Output> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| StageError::Internal("stage not initialized".into()))?;

        let segments = input.len().saturating_sub(1);
        let mut angles = Vec::with_capacity(segments);
        let mut lengths = Vec::with_capacity(segments);
        let mut valid = Vec::with_capacity(segments);
        for pair in input.windows(2) {
            let rise = pair[1].elevation - pair[0].elevation;
            let run = pair[1].distance - pair[0].distance;
            let length = rise.hypot(run);
            let is_valid = length > MIN_SEGMENT_LENGTH;
            angles.push(if is_valid {
                slope_degrees(rise, run)
            } else {
                0.0
            });
            lengths.push(length);
            valid.push(is_valid);
        }

        let smoothed = StatsHelper::moving_average(&angles, SMOOTHING_WINDOW);
        let steep = angles
            .iter()
            .zip(&smoothed)
            .zip(&lengths)
            .map(|((&raw, &smooth), &length)| {
                let angle = if length < config.smoothing_span {
                    smooth
                } else {
                    raw
                };
                angle >= config.face_threshold
            })
            .collect::<Vec<_>>();

        self.logger.detail(&format!(
            "SlopeStage {} segments, {} steep",
            segments,
            steep.iter().filter(|&&s| s).count()
        ));

        Ok(SlopeProfile {
            points: input,
            angles,
            lengths,
            valid,
            smoothed,
            steep,
        })
    }

    fn cleanup(&mut self) {
        self.config = None;
    }
}
