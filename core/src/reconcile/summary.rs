use serde::Serialize;

use crate::reconcile::compare::{ComparisonRecord, RecordKind};
use crate::reconcile::status::ComplianceStatus;

/// Verdict counts for one compared parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ParameterSummary {
    pub compliant: usize,
    pub out_of_tolerance: usize,
    pub non_compliant: usize,
    pub total: usize,
    /// Share of `total` that is compliant, 0-100.
    pub compliance_pct: f64,
}

impl ParameterSummary {
    fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = ComplianceStatus>,
    {
        let mut summary = Self::default();
        for status in statuses {
            match status {
                ComplianceStatus::Compliant | ComplianceStatus::RampOk => summary.compliant += 1,
                ComplianceStatus::OutOfTolerance | ComplianceStatus::RampWidthDeviation => {
                    summary.out_of_tolerance += 1
                }
                ComplianceStatus::NonCompliant
                | ComplianceStatus::RampDetected
                | ComplianceStatus::MissingRamp => summary.non_compliant += 1,
                _ => continue,
            }
            summary.total += 1;
        }
        if summary.total > 0 {
            summary.compliance_pct = summary.compliant as f64 * 100.0 / summary.total as f64;
        }
        summary
    }
}

/// Aggregate view over a set of comparison records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComplianceSummary {
    pub height: ParameterSummary,
    pub angle: ParameterSummary,
    pub berm: ParameterSummary,
    pub matched: usize,
    pub missing: usize,
    pub extra: usize,
}

impl ComplianceSummary {
    /// Only matched records contribute to the parameter counts.
    pub fn from_records(records: &[ComparisonRecord<'_>]) -> Self {
        let matched = || records.iter().filter(|r| r.kind == RecordKind::Match);
        let count = |kind| records.iter().filter(|r| r.kind == kind).count();
        Self {
            height: ParameterSummary::from_statuses(matched().map(|r| r.height_status)),
            angle: ParameterSummary::from_statuses(matched().map(|r| r.angle_status)),
            berm: ParameterSummary::from_statuses(matched().map(|r| r.berm_status)),
            matched: count(RecordKind::Match),
            missing: count(RecordKind::Missing),
            extra: count(RecordKind::Extra),
        }
    }

    pub fn record_count(&self) -> usize {
        self.matched + self.missing + self.extra
    }
}
