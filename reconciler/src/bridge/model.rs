use crate::workflow::config::WorkflowConfig;
use crate::workflow::report::{RunReport, SectionReport};
use crate::workflow::runner::SectionOutcome;
use benchcore::analysis::{profile_deviation, AreaBetween};
use benchcore::model::{BenchParams, Profile};
use benchcore::processing::{BenchOverride, ReconciledProfile};
use benchcore::reconcile::{ComparisonRecord, ComplianceSummary};
use benchcore::telemetry::Metrics;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Plot data for one section.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub index: usize,
    pub section: String,
    pub sector: String,
    pub design: Option<Profile>,
    pub asbuilt: Option<Profile>,
    pub reconciled: ReconciledProfile,
    pub area: Option<AreaBetween>,
    /// Distance from each as-built point to the design surface.
    pub deviation: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub struct EditResponse<'a> {
    pub index: usize,
    pub benches: &'a [BenchParams],
    pub reconciled: ReconciledProfile,
    pub records: Vec<ComparisonRecord<'a>>,
}

struct BridgeModel {
    config: WorkflowConfig,
    outcomes: Vec<SectionOutcome>,
    metrics: Metrics,
}

/// Results of a run, shared between the HTTP handlers.
#[derive(Clone)]
pub struct BridgeState {
    inner: Arc<RwLock<BridgeModel>>,
}

impl BridgeState {
    pub fn new(config: WorkflowConfig, outcomes: Vec<SectionOutcome>, metrics: Metrics) -> Self {
        Self {
            inner: Arc::new(RwLock::new(BridgeModel {
                config,
                outcomes,
                metrics,
            })),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, BridgeModel> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BridgeModel> {
        self.inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn section_count(&self) -> usize {
        self.read().outcomes.len()
    }

    pub fn results(&self) -> anyhow::Result<Value> {
        let model = self.read();
        let report = RunReport::build(&model.outcomes, &model.config, model.metrics);
        Ok(serde_json::to_value(&report)?)
    }

    pub fn summary(&self) -> ComplianceSummary {
        let model = self.read();
        let sections: Vec<SectionReport<'_>> = model
            .outcomes
            .iter()
            .map(|outcome| SectionReport::new(outcome, &model.config))
            .collect();
        crate::workflow::report::summarize(&sections)
    }

    pub fn profile(&self, index: usize) -> Option<ProfileView> {
        let model = self.read();
        let outcome = model.outcomes.get(index)?;
        let deviation = match (&outcome.design_profile, &outcome.asbuilt_profile) {
            (Some(design), Some(asbuilt)) => profile_deviation(design, asbuilt),
            _ => Vec::new(),
        };
        Some(ProfileView {
            index,
            section: outcome.section.name.clone(),
            sector: outcome.section.sector.clone(),
            design: outcome.design_profile.clone(),
            asbuilt: outcome.asbuilt_profile.clone(),
            reconciled: outcome.reconciled(),
            area: outcome.area(),
            deviation,
        })
    }

    /// Applies bench edits to a section and returns the re-run comparison.
    ///
    /// `Ok(None)` when the index is out of range.
    pub fn edit(&self, index: usize, overrides: &[BenchOverride]) -> anyhow::Result<Option<Value>> {
        let mut model = self.write();
        let config = model.config.clone();
        let Some(outcome) = model.outcomes.get_mut(index) else {
            return Ok(None);
        };
        outcome.apply_edits(overrides, &config);
        log::info!(
            "[{}] applied {} bench edits",
            outcome.section.name,
            overrides.len()
        );

        let outcome = &*outcome;
        let response = EditResponse {
            index,
            benches: &outcome.effective_asbuilt().benches,
            reconciled: outcome.reconciled(),
            records: outcome.records(&config),
        };
        Ok(Some(serde_json::to_value(&response)?))
    }
}
