use crate::workflow::config::WorkflowConfig;
use crate::workflow::input::SectionInput;
use anyhow::Context;
use benchcore::analysis::{area_between_profiles, AreaBetween};
use benchcore::model::{ExtractionResult, Profile, SectionDescriptor};
use benchcore::processing::{build_reconciled_profile, BenchExtractor, BenchOverride, ReconciledProfile};
use benchcore::reconcile::{compare_section_angles, AngleRecord, ComparisonRecord};
use benchcore::telemetry::{LogManager, Metrics, MetricsRecorder};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// Shared flag that stops the runner from scheduling further sections.
#[derive(Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Everything computed for one section.
#[derive(Debug, Clone)]
pub struct SectionOutcome {
    pub index: usize,
    pub section: SectionDescriptor,
    pub design_profile: Option<Profile>,
    pub asbuilt_profile: Option<Profile>,
    pub design: ExtractionResult,
    pub asbuilt: ExtractionResult,
    /// As-built benches after interactive edits, if any were applied.
    pub edited: Option<ExtractionResult>,
    pub error: Option<String>,
}

impl SectionOutcome {
    fn placeholder(index: usize, input: &SectionInput, error: Option<String>) -> Self {
        let section = input.descriptor();
        Self {
            index,
            design: ExtractionResult::empty(&section),
            asbuilt: ExtractionResult::empty(&section),
            section,
            design_profile: input.design.clone(),
            asbuilt_profile: input.asbuilt.clone(),
            edited: None,
            error,
        }
    }

    /// As-built result the comparison runs against.
    pub fn effective_asbuilt(&self) -> &ExtractionResult {
        self.edited.as_ref().unwrap_or(&self.asbuilt)
    }

    pub fn records(&self, config: &WorkflowConfig) -> Vec<ComparisonRecord<'_>> {
        config
            .comparator()
            .compare(&self.design, self.effective_asbuilt())
    }

    pub fn angles(&self, config: &WorkflowConfig) -> Vec<AngleRecord> {
        compare_section_angles(
            &self.design,
            self.effective_asbuilt(),
            &config.tolerances,
            &config.matching,
        )
    }

    pub fn reconciled(&self) -> ReconciledProfile {
        build_reconciled_profile(&self.effective_asbuilt().benches)
    }

    pub fn area(&self) -> Option<AreaBetween> {
        match (&self.design_profile, &self.asbuilt_profile) {
            (Some(design), Some(asbuilt)) => Some(area_between_profiles(design, asbuilt)),
            _ => None,
        }
    }

    /// Replaces any earlier edit with `overrides` applied to the extracted as-built.
    pub fn apply_edits(&mut self, overrides: &[BenchOverride], config: &WorkflowConfig) {
        self.edited = Some(
            self.asbuilt
                .with_overrides(overrides, &config.extraction.heuristics),
        );
    }
}

#[derive(Clone)]
pub struct Runner {
    config: Arc<WorkflowConfig>,
    extractor: BenchExtractor,
    metrics: Arc<MetricsRecorder>,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> anyhow::Result<Self> {
        config.validate().context("validating workflow config")?;
        let extractor =
            BenchExtractor::new(config.extraction.clone()).context("building bench extractor")?;
        Ok(Self {
            config: Arc::new(config),
            extractor,
            metrics: Arc::new(MetricsRecorder::new()),
        })
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics.snapshot()
    }

    fn extract(&self, profile: Option<&Profile>, section: &SectionDescriptor) -> anyhow::Result<ExtractionResult> {
        let Some(profile) = profile else {
            return Ok(ExtractionResult::empty(section));
        };
        let result = self
            .extractor
            .extract(profile, section)
            .with_context(|| format!("extracting benches for section {}", section.name))?;
        self.metrics.record_extraction(result.benches.len());
        Ok(result)
    }

    /// Extracts both surfaces of one section.
    pub fn execute(&self, index: usize, input: &SectionInput) -> anyhow::Result<SectionOutcome> {
        let section = input.descriptor();
        let logger = LogManager::for_section(&section.name);
        self.metrics.record_section();

        let design = self.extract(input.design.as_ref(), &section)?;
        let asbuilt = self.extract(input.asbuilt.as_ref(), &section)?;
        logger.detail(&format!(
            "design {} benches, as-built {} benches",
            design.benches.len(),
            asbuilt.benches.len()
        ));

        Ok(SectionOutcome {
            design,
            asbuilt,
            ..SectionOutcome::placeholder(index, input, None)
        })
    }

    /// Waits for one section task; a task that panicked leaves a placeholder
    /// so the remaining tasks are still collected.
    async fn join_section(
        &self,
        index: usize,
        input: &SectionInput,
        handle: JoinHandle<SectionOutcome>,
    ) -> SectionOutcome {
        match handle.await {
            Ok(outcome) => outcome,
            Err(err) => {
                self.metrics.record_error();
                log::error!("section {} task failed: {}", input.name, err);
                SectionOutcome::placeholder(index, input, Some(format!("section task failed: {}", err)))
            }
        }
    }

    /// Processes every section on the blocking pool, at most `max_workers` at a time.
    ///
    /// Output order follows input order. Failed sections keep an empty
    /// placeholder carrying the error; sections never scheduled because of
    /// cancellation are dropped.
    pub async fn run(
        &self,
        sections: Vec<SectionInput>,
        cancel: &CancellationToken,
    ) -> anyhow::Result<Vec<SectionOutcome>> {
        let total = sections.len();
        let semaphore = Arc::new(Semaphore::new(self.config.max_workers.max(1)));
        let mut handles: Vec<(SectionInput, JoinHandle<SectionOutcome>)> =
            Vec::with_capacity(total);

        for (index, input) in sections.into_iter().enumerate() {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .context("acquiring worker permit")?;
            if cancel.is_cancelled() {
                log::warn!("cancelled after scheduling {} of {} sections", index, total);
                break;
            }
            let stub = SectionInput {
                design: None,
                asbuilt: None,
                ..input.clone()
            };
            let runner = self.clone();
            let handle = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                match runner.execute(index, &input) {
                    Ok(outcome) => outcome,
                    Err(err) => {
                        runner.metrics.record_error();
                        log::error!("section {} failed: {:#}", input.name, err);
                        SectionOutcome::placeholder(index, &input, Some(format!("{:#}", err)))
                    }
                }
            });
            handles.push((stub, handle));
        }

        let mut slots: Vec<Option<SectionOutcome>> = (0..total).map(|_| None).collect();
        for (index, (stub, handle)) in handles.into_iter().enumerate() {
            slots[index] = Some(self.join_section(index, &stub, handle).await);
        }

        let outcomes: Vec<SectionOutcome> = slots.into_iter().flatten().collect();
        log::info!("processed {} of {} sections", outcomes.len(), total);
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchcore::reconcile::RecordKind;

    fn staircase() -> Profile {
        Profile::new(
            vec![0.0, 10.0, 12.0, 37.0, 39.0],
            vec![100.0, 100.0, 90.0, 90.0, 80.0],
        )
        .unwrap()
    }

    fn section(name: &str, design: Option<Profile>, asbuilt: Option<Profile>) -> SectionInput {
        SectionInput {
            name: name.into(),
            sector: "North".into(),
            design,
            asbuilt,
        }
    }

    #[test]
    fn runner_executes_section() {
        let runner = Runner::new(WorkflowConfig::default()).unwrap();
        let outcome = runner
            .execute(0, &section("S1", Some(staircase()), Some(staircase())))
            .unwrap();
        assert_eq!(outcome.design.benches.len(), 2);
        assert_eq!(outcome.design, outcome.asbuilt);

        let records = outcome.records(runner.config());
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.kind == RecordKind::Match));
        assert_eq!(outcome.reconciled().len(), 4);
        assert_eq!(outcome.area().map(|a| a.over), Some(0.0));

        let metrics = runner.metrics();
        assert_eq!(metrics.sections, 1);
        assert_eq!(metrics.benches, 4);
    }

    #[test]
    fn missing_profile_yields_placeholder() {
        let runner = Runner::new(WorkflowConfig::default()).unwrap();
        let outcome = runner
            .execute(3, &section("S4", Some(staircase()), None))
            .unwrap();
        assert_eq!(outcome.index, 3);
        assert!(outcome.asbuilt.is_empty());
        assert_eq!(outcome.asbuilt.section_name, "S4");
        assert!(outcome.area().is_none());
        assert!(outcome
            .records(runner.config())
            .iter()
            .all(|r| r.kind == RecordKind::Missing));
    }

    #[test]
    fn edits_replace_the_compared_asbuilt() {
        let runner = Runner::new(WorkflowConfig::default()).unwrap();
        let mut outcome = runner
            .execute(0, &section("S1", Some(staircase()), Some(staircase())))
            .unwrap();
        let overrides = vec![BenchOverride {
            toe_elevation: Some(88.0),
            ..Default::default()
        }];
        outcome.apply_edits(&overrides, runner.config());
        assert_eq!(outcome.effective_asbuilt().benches[0].toe_elevation, 88.0);
        assert_eq!(outcome.asbuilt.benches[0].toe_elevation, 90.0);
        let records = outcome.records(runner.config());
        let first = records.iter().find(|r| r.bench_num == 1).unwrap();
        assert!((first.height_dev.unwrap() - 2.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn run_keeps_input_order() {
        let cfg = WorkflowConfig {
            max_workers: 2,
            ..Default::default()
        };
        let runner = Runner::new(cfg).unwrap();
        let sections: Vec<_> = (0..5)
            .map(|i| section(&format!("S{}", i), Some(staircase()), Some(staircase())))
            .collect();
        let outcomes = runner.run(sections, &CancellationToken::new()).await.unwrap();
        assert_eq!(outcomes.len(), 5);
        for (i, outcome) in outcomes.iter().enumerate() {
            assert_eq!(outcome.index, i);
            assert_eq!(outcome.section.name, format!("S{}", i));
        }
        assert_eq!(runner.metrics().sections, 5);
    }

    #[tokio::test]
    async fn cancelled_run_schedules_nothing() {
        let runner = Runner::new(WorkflowConfig::default()).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let outcomes = runner
            .run(vec![section("S1", Some(staircase()), None)], &cancel)
            .await
            .unwrap();
        assert!(outcomes.is_empty());
        assert_eq!(runner.metrics().sections, 0);
    }

    #[tokio::test]
    async fn panicked_task_leaves_placeholder() {
        let runner = Runner::new(WorkflowConfig::default()).unwrap();
        let input = section("S7", None, None);
        let handle = tokio::task::spawn_blocking(|| -> SectionOutcome { panic!("cut failed") });
        let outcome = runner.join_section(7, &input, handle).await;
        assert_eq!(outcome.index, 7);
        assert_eq!(outcome.section.name, "S7");
        assert!(outcome.error.is_some());
        assert!(outcome.design.is_empty());
        assert_eq!(runner.metrics().errors, 1);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = WorkflowConfig {
            max_workers: 0,
            ..Default::default()
        };
        assert!(Runner::new(cfg).is_err());
    }
}
