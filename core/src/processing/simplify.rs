use crate::math::simplify::simplify;
use crate::model::ProfilePoint;
use crate::prelude::{ExtractionConfig, ProcessingStage, StageError, StageResult};
use crate::telemetry::log::LogManager;

/// Reduces a raw profile to the vertices that carry its shape.
pub struct SimplifyStage {
    config: Option<ExtractionConfig>,
    logger: LogManager,
}

impl SimplifyStage {
    pub fn new(logger: LogManager) -> Self {
        Self {
            config: None,
            logger,
        }
    }
}

impl ProcessingStage for SimplifyStage {
    type Input = Vec<ProfilePoint>;
    type Output = Vec<ProfilePoint>;

    fn initialize(&mut self, config: &ExtractionConfig) -> StageResult<()> {
        self.config = Some(config.clone());
        Ok(())
    }

    fn execute(&mut self, input: Self::Input) -> StageResult<Self::Output> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| StageError::Internal("stage not initialized".into()))?;

        let epsilon = config.epsilon();
        let simplified = simplify(&input, epsilon);
        self.logger.detail(&format!(
            "SimplifyStage kept {} of {} vertices (epsilon {:.3})",
            simplified.len(),
            input.len(),
            epsilon
        ));
        Ok(simplified)
    }

    fn cleanup(&mut self) {
        self.config = None;
    }
}
