use serde::Serialize;

use crate::model::ExtractionResult;
use crate::reconcile::status::ComplianceStatus;
use crate::reconcile::tolerance::{MatchConfig, Tolerance, ToleranceConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionAngle {
    InterRamp,
    Overall,
}

/// Section-level angle comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AngleRecord {
    pub sector: String,
    pub section: String,
    pub parameter: SectionAngle,
    pub design: f64,
    pub real: f64,
    pub deviation: Option<f64>,
    pub status: ComplianceStatus,
}

pub fn compare_section_angles(
    design: &ExtractionResult,
    asbuilt: &ExtractionResult,
    tolerances: &ToleranceConfig,
    matching: &MatchConfig,
) -> Vec<AngleRecord> {
    let comparable = !design.is_empty() && !asbuilt.is_empty();
    let record = |parameter, design_angle: f64, real_angle: f64, tolerance: &Tolerance| {
        let deviation = comparable.then(|| real_angle - design_angle);
        let status = match deviation {
            Some(deviation) => ComplianceStatus::evaluate(deviation, tolerance, matching.band_factor),
            None => ComplianceStatus::NotApplicable,
        };
        AngleRecord {
            sector: design.sector.clone(),
            section: design.section_name.clone(),
            parameter,
            design: design_angle,
            real: real_angle,
            deviation,
            status,
        }
    };

    vec![
        record(
            SectionAngle::InterRamp,
            design.inter_ramp_angle,
            asbuilt.inter_ramp_angle,
            &tolerances.inter_ramp_angle,
        ),
        record(
            SectionAngle::Overall,
            design.overall_angle,
            asbuilt.overall_angle,
            &tolerances.overall_angle,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BenchParams, ProfilePoint};

    fn section(angle: f64, benches: usize) -> ExtractionResult {
        ExtractionResult {
            section_name: "S1".into(),
            sector: "North".into(),
            benches: (0..benches)
                .map(|i| {
                    let top = 100.0 - 10.0 * i as f64;
                    BenchParams::from_break_points(
                        ProfilePoint::new(10.0 * i as f64, top),
                        ProfilePoint::new(10.0 * i as f64 + 3.0, top - 10.0),
                        angle,
                    )
                })
                .collect(),
            inter_ramp_angle: angle,
            overall_angle: angle,
        }
    }

    #[test]
    fn deviations_use_their_own_tolerances() {
        let records = compare_section_angles(
            &section(45.0, 2),
            &section(42.5, 2),
            &ToleranceConfig::default(),
            &MatchConfig::default(),
        );
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].parameter, SectionAngle::InterRamp);
        assert_eq!(records[0].deviation, Some(-2.5));
        assert_eq!(records[0].status, ComplianceStatus::Compliant);
        // overall tolerance is 2 below, band reaches 3
        assert_eq!(records[1].status, ComplianceStatus::OutOfTolerance);
    }

    #[test]
    fn empty_side_is_not_applicable() {
        let records = compare_section_angles(
            &section(45.0, 2),
            &section(0.0, 0),
            &ToleranceConfig::default(),
            &MatchConfig::default(),
        );
        assert!(records
            .iter()
            .all(|r| r.status == ComplianceStatus::NotApplicable && r.deviation.is_none()));
    }
}
