use std::collections::HashSet;

use serde::Serialize;

use crate::math::matrix::MatrixHelper;
use crate::model::{BenchParams, ExtractionResult};
use crate::reconcile::status::ComplianceStatus;
use crate::reconcile::tolerance::{MatchConfig, ToleranceConfig};
use crate::telemetry::log::LogManager;

/// Bench number reported for as-built benches with no design counterpart.
pub const EXTRA_BENCH_NUMBER: u32 = 999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordKind {
    Match,
    Missing,
    Extra,
}

/// One evaluated design/as-built bench relationship.
///
/// Borrows the contributing benches from the two extraction results it was
/// built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRecord<'a> {
    pub sector: String,
    pub section: String,
    pub bench_num: u32,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    /// Rounded toe elevation, used as display key.
    pub level: String,
    pub height_design: Option<f64>,
    pub height_real: Option<f64>,
    pub height_dev: Option<f64>,
    pub height_status: ComplianceStatus,
    pub angle_design: Option<f64>,
    pub angle_real: Option<f64>,
    pub angle_dev: Option<f64>,
    pub angle_status: ComplianceStatus,
    pub berm_design: Option<f64>,
    pub berm_real: Option<f64>,
    pub berm_min: Option<f64>,
    pub berm_status: ComplianceStatus,
    pub delta_crest: Option<f64>,
    pub delta_toe: Option<f64>,
    pub bench_design: Option<&'a BenchParams>,
    pub bench_real: Option<&'a BenchParams>,
}

impl ComparisonRecord<'_> {
    /// Numeric value of `level`; anything unparsable sorts as zero.
    pub fn level_value(&self) -> f64 {
        self.level
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .unwrap_or(0.0)
    }
}

fn level_of(bench: &BenchParams) -> String {
    format!("{:.0}", bench.toe_elevation)
}

/// Matches design benches to as-built benches and classifies every pair.
#[derive(Debug, Clone, Default)]
pub struct Comparator {
    tolerances: ToleranceConfig,
    matching: MatchConfig,
}

impl Comparator {
    pub fn new(tolerances: ToleranceConfig, matching: MatchConfig) -> Self {
        Self {
            tolerances,
            matching,
        }
    }

    pub fn tolerances(&self) -> &ToleranceConfig {
        &self.tolerances
    }

    pub fn matching(&self) -> &MatchConfig {
        &self.matching
    }

    /// Optimal design-to-as-built pairing by mid elevation.
    ///
    /// Only pairs closer than the match threshold are returned, sorted by
    /// design index.
    pub fn match_benches(&self, design: &[BenchParams], asbuilt: &[BenchParams]) -> Vec<(usize, usize)> {
        let costs = MatrixHelper::cost_matrix(design.len(), asbuilt.len(), |row, col| {
            (design[row].mid_elevation() - asbuilt[col].mid_elevation()).abs()
        });
        MatrixHelper::assign(&costs)
            .into_iter()
            .filter(|&(row, col)| costs[[row, col]] < self.matching.match_threshold)
            .collect()
    }

    pub fn compare<'a>(
        &self,
        design: &'a ExtractionResult,
        asbuilt: &'a ExtractionResult,
    ) -> Vec<ComparisonRecord<'a>> {
        let design_benches = &design.benches;
        let asbuilt_benches = &asbuilt.benches;
        if design_benches.is_empty() && asbuilt_benches.is_empty() {
            return Vec::new();
        }

        let matches = self.match_benches(design_benches, asbuilt_benches);
        let matched_design: HashSet<usize> = matches.iter().map(|&(row, _)| row).collect();
        let matched_asbuilt: HashSet<usize> = matches.iter().map(|&(_, col)| col).collect();

        let mut records = Vec::with_capacity(design_benches.len() + asbuilt_benches.len());
        for &(row, col) in &matches {
            records.push(self.matched_record(design, &design_benches[row], &asbuilt_benches[col]));
        }
        for (index, bench) in design_benches.iter().enumerate() {
            if !matched_design.contains(&index) {
                records.push(missing_record(design, bench));
            }
        }
        for (index, bench) in asbuilt_benches.iter().enumerate() {
            if !matched_asbuilt.contains(&index) {
                records.push(extra_record(design, bench));
            }
        }

        records.sort_by(|a, b| b.level_value().total_cmp(&a.level_value()));

        LogManager::for_section(&design.section_name).detail(&format!(
            "compared {} design / {} as-built benches: {} matched",
            design_benches.len(),
            asbuilt_benches.len(),
            matches.len()
        ));
        records
    }

    fn matched_record<'a>(
        &self,
        section: &ExtractionResult,
        design: &'a BenchParams,
        real: &'a BenchParams,
    ) -> ComparisonRecord<'a> {
        let band = self.matching.band_factor;
        let height_dev = real.bench_height - design.bench_height;
        let angle_dev = real.face_angle - design.face_angle;

        ComparisonRecord {
            sector: section.sector.clone(),
            section: section.section_name.clone(),
            bench_num: design.bench_number,
            kind: RecordKind::Match,
            level: level_of(design),
            height_design: Some(design.bench_height),
            height_real: Some(real.bench_height),
            height_dev: Some(height_dev),
            height_status: ComplianceStatus::evaluate(
                height_dev,
                &self.tolerances.bench_height,
                band,
            ),
            angle_design: Some(design.face_angle),
            angle_real: Some(real.face_angle),
            angle_dev: Some(angle_dev),
            angle_status: ComplianceStatus::evaluate(angle_dev, &self.tolerances.face_angle, band),
            berm_design: Some(design.berm_width),
            berm_real: Some(real.berm_width),
            berm_min: Some(self.tolerances.berm_width.min),
            berm_status: self.berm_status(design, real),
            delta_crest: Some(real.crest_distance - design.crest_distance),
            delta_toe: Some(real.toe_distance - design.toe_distance),
            bench_design: Some(design),
            bench_real: Some(real),
        }
    }

    /// Berm verdict for a matched pair; ramp flags override the width check.
    pub fn berm_status(&self, design: &BenchParams, real: &BenchParams) -> ComplianceStatus {
        let matching = &self.matching;
        if real.is_ramp {
            let design_has_ramp = design.is_ramp || design.berm_width > matching.ramp_design_width;
            if !design_has_ramp {
                ComplianceStatus::RampDetected
            } else if (real.berm_width - design.berm_width).abs() < matching.ramp_width_tolerance {
                ComplianceStatus::RampOk
            } else {
                ComplianceStatus::RampWidthDeviation
            }
        } else if design.is_ramp {
            ComplianceStatus::MissingRamp
        } else {
            let min = self.tolerances.berm_width.min;
            if real.berm_width == 0.0 && design.berm_width == 0.0 {
                ComplianceStatus::Compliant
            } else if real.berm_width >= min {
                ComplianceStatus::Compliant
            } else if real.berm_width >= min * matching.berm_soft_factor {
                ComplianceStatus::OutOfTolerance
            } else {
                ComplianceStatus::NonCompliant
            }
        }
    }
}

fn missing_record<'a>(section: &ExtractionResult, design: &'a BenchParams) -> ComparisonRecord<'a> {
    ComparisonRecord {
        sector: section.sector.clone(),
        section: section.section_name.clone(),
        bench_num: design.bench_number,
        kind: RecordKind::Missing,
        level: level_of(design),
        height_design: Some(design.bench_height),
        height_real: None,
        height_dev: None,
        height_status: ComplianceStatus::NotBuilt,
        angle_design: Some(design.face_angle),
        angle_real: None,
        angle_dev: None,
        angle_status: ComplianceStatus::NotApplicable,
        berm_design: Some(design.berm_width),
        berm_real: None,
        berm_min: None,
        berm_status: ComplianceStatus::MissingBench,
        delta_crest: None,
        delta_toe: None,
        bench_design: Some(design),
        bench_real: None,
    }
}

fn extra_record<'a>(section: &ExtractionResult, real: &'a BenchParams) -> ComparisonRecord<'a> {
    ComparisonRecord {
        sector: section.sector.clone(),
        section: section.section_name.clone(),
        bench_num: EXTRA_BENCH_NUMBER,
        kind: RecordKind::Extra,
        level: level_of(real),
        height_design: None,
        height_real: Some(real.bench_height),
        height_dev: None,
        height_status: ComplianceStatus::Extra,
        angle_design: None,
        angle_real: Some(real.face_angle),
        angle_dev: None,
        angle_status: ComplianceStatus::NotApplicable,
        berm_design: None,
        berm_real: Some(real.berm_width),
        berm_min: None,
        berm_status: ComplianceStatus::AdditionalBench,
        delta_crest: None,
        delta_toe: None,
        bench_design: None,
        bench_real: Some(real),
    }
}

/// Compares two extraction results with the default matching constants.
pub fn compare_design_vs_asbuilt<'a>(
    design: &'a ExtractionResult,
    asbuilt: &'a ExtractionResult,
    tolerances: &ToleranceConfig,
) -> Vec<ComparisonRecord<'a>> {
    Comparator::new(tolerances.clone(), MatchConfig::default()).compare(design, asbuilt)
}
