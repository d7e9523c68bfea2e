use crate::workflow::config::WorkflowConfig;
use crate::workflow::runner::SectionOutcome;
use anyhow::Context;
use benchcore::model::ExtractionResult;
use benchcore::processing::ReconciledProfile;
use benchcore::reconcile::{AngleRecord, ComparisonRecord, ComplianceSummary};
use benchcore::telemetry::Metrics;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct SectionReport<'a> {
    pub index: usize,
    pub section: &'a str,
    pub sector: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
    pub design: &'a ExtractionResult,
    pub asbuilt: &'a ExtractionResult,
    pub edited: bool,
    pub reconciled: ReconciledProfile,
    pub records: Vec<ComparisonRecord<'a>>,
    pub angles: Vec<AngleRecord>,
    pub area_over: Option<f64>,
    pub area_under: Option<f64>,
}

impl<'a> SectionReport<'a> {
    pub fn new(outcome: &'a SectionOutcome, config: &WorkflowConfig) -> Self {
        let area = outcome.area();
        Self {
            index: outcome.index,
            section: &outcome.section.name,
            sector: &outcome.section.sector,
            error: outcome.error.as_deref(),
            design: &outcome.design,
            asbuilt: outcome.effective_asbuilt(),
            edited: outcome.edited.is_some(),
            reconciled: outcome.reconciled(),
            records: outcome.records(config),
            angles: outcome.angles(config),
            area_over: area.as_ref().map(|a| a.over),
            area_under: area.as_ref().map(|a| a.under),
        }
    }
}

/// Full output of a reconciliation run.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub sections: Vec<SectionReport<'a>>,
    pub summary: ComplianceSummary,
    pub metrics: Metrics,
}

impl<'a> RunReport<'a> {
    pub fn build(outcomes: &'a [SectionOutcome], config: &WorkflowConfig, metrics: Metrics) -> Self {
        let sections: Vec<SectionReport<'a>> = outcomes
            .iter()
            .map(|outcome| SectionReport::new(outcome, config))
            .collect();
        let summary = summarize(&sections);
        Self {
            sections,
            summary,
            metrics,
        }
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path_ref = path.as_ref();
        if let Some(parent) = path_ref.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating report directory {}", parent.display()))?;
        }
        let file = File::create(path_ref)
            .with_context(|| format!("creating report {}", path_ref.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .with_context(|| format!("writing report {}", path_ref.display()))?;
        writer
            .flush()
            .with_context(|| format!("flushing report {}", path_ref.display()))?;
        Ok(())
    }
}

/// Summary over the records of every section.
pub fn summarize(sections: &[SectionReport<'_>]) -> ComplianceSummary {
    let records: Vec<ComparisonRecord<'_>> = sections
        .iter()
        .flat_map(|section| section.records.iter().cloned())
        .collect();
    ComplianceSummary::from_records(&records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::input::SectionInput;
    use crate::workflow::runner::Runner;
    use benchcore::model::Profile;
    use tempfile::tempdir;

    fn outcomes(runner: &Runner) -> Vec<SectionOutcome> {
        let staircase = Profile::new(
            vec![0.0, 10.0, 12.0, 37.0, 39.0],
            vec![100.0, 100.0, 90.0, 90.0, 80.0],
        )
        .unwrap();
        vec![
            SectionInput {
                name: "S1".into(),
                sector: "North".into(),
                design: Some(staircase.clone()),
                asbuilt: Some(staircase.clone()),
            },
            SectionInput {
                name: "S2".into(),
                sector: "North".into(),
                design: Some(staircase),
                asbuilt: None,
            },
        ]
        .iter()
        .enumerate()
        .map(|(i, input)| runner.execute(i, input).unwrap())
        .collect()
    }

    #[test]
    fn report_aggregates_every_section() {
        let runner = Runner::new(WorkflowConfig::default()).unwrap();
        let outcomes = outcomes(&runner);
        let report = RunReport::build(&outcomes, runner.config(), runner.metrics());
        assert_eq!(report.sections.len(), 2);
        assert_eq!(report.summary.matched, 2);
        assert_eq!(report.summary.missing, 2);
        assert_eq!(report.summary.extra, 0);
        assert_eq!(report.metrics.sections, 2);
        assert_eq!(report.sections[1].area_over, None);
    }

    #[test]
    fn report_writes_json() {
        let runner = Runner::new(WorkflowConfig::default()).unwrap();
        let outcomes = outcomes(&runner);
        let report = RunReport::build(&outcomes, runner.config(), runner.metrics());

        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("report.json");
        report.write(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["sections"][0]["section"], "S1");
        assert_eq!(value["sections"][0]["records"][0]["type"], "MATCH");
        assert_eq!(value["sections"][1]["records"][0]["berm_status"], "FALTA BANCO");
        assert_eq!(value["summary"]["missing"], 2);
    }
}
