use anyhow::Context;
use benchcore::prelude::ExtractionConfig;
use benchcore::reconcile::{Comparator, MatchConfig, ToleranceConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub extraction: ExtractionConfig,
    pub tolerances: ToleranceConfig,
    pub matching: MatchConfig,
    /// Sections processed concurrently.
    pub max_workers: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            extraction: ExtractionConfig::default(),
            tolerances: ToleranceConfig::default(),
            matching: MatchConfig::default(),
            max_workers: 4,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .validate()
            .with_context(|| format!("validating workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        resolution: f64,
        face_threshold: f64,
        berm_threshold: f64,
        max_berm_width: Option<f64>,
        max_workers: usize,
    ) -> Self {
        Self {
            extraction: ExtractionConfig {
                resolution,
                face_threshold,
                berm_threshold,
                max_berm_width,
                ..Default::default()
            },
            max_workers,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.extraction.validate()?;
        anyhow::ensure!(self.max_workers > 0, "max_workers must be at least 1");
        Ok(())
    }

    pub fn comparator(&self) -> Comparator {
        Comparator::new(self.tolerances.clone(), self.matching.clone())
    }
}
