use crate::model::{ExtractionResult, Profile, SectionDescriptor};
use crate::prelude::{ExtractionConfig, ProcessingStage, StageResult};
use crate::processing::benches::{BenchInput, BenchStage};
use crate::processing::simplify::SimplifyStage;
use crate::processing::slope::SlopeStage;
use crate::telemetry::log::LogManager;

/// Runs simplification, slope classification and bench building over one profile.
#[derive(Debug, Clone)]
pub struct BenchExtractor {
    config: ExtractionConfig,
}

impl BenchExtractor {
    /// Fails fast when the configuration violates the extraction contract.
    pub fn new(config: ExtractionConfig) -> StageResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn extract(
        &self,
        profile: &Profile,
        section: &SectionDescriptor,
    ) -> StageResult<ExtractionResult> {
        let logger = LogManager::for_section(&section.name);
        let mut result = ExtractionResult::empty(section);
        if profile.len() < 3 {
            logger.detail(&format!("profile has {} points, skipping", profile.len()));
            return Ok(result);
        }

        let mut simplify_stage = SimplifyStage::new(logger.clone());
        simplify_stage.initialize(&self.config)?;
        let simplified = simplify_stage.execute(profile.points().collect())?;
        simplify_stage.cleanup();
        if simplified.len() < 3 {
            logger.detail("profile simplifies to a single segment, no benches");
            return Ok(result);
        }

        let mut slope_stage = SlopeStage::new(logger.clone());
        slope_stage.initialize(&self.config)?;
        let slopes = slope_stage.execute(simplified)?;
        slope_stage.cleanup();
        if !slopes.has_valid_segments() {
            logger.warn("every simplified segment is degenerate");
            return Ok(result);
        }

        let mut bench_stage = BenchStage::new(logger.clone());
        bench_stage.initialize(&self.config)?;
        let bench_set = bench_stage.execute(BenchInput {
            slopes,
            raw: profile.clone(),
        })?;
        bench_stage.cleanup();

        result.benches = bench_set.benches;
        result.inter_ramp_angle = bench_set.inter_ramp_angle;
        result.overall_angle = bench_set.overall_angle;
        logger.record(&format!(
            "extracted {} benches, overall angle {:.1}",
            result.benches.len(),
            result.overall_angle
        ));
        Ok(result)
    }
}

/// One-shot extraction with an explicit configuration.
pub fn extract_parameters(
    profile: &Profile,
    section: &SectionDescriptor,
    config: &ExtractionConfig,
) -> StageResult<ExtractionResult> {
    BenchExtractor::new(config.clone())?.extract(profile, section)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::StageError;

    fn section() -> SectionDescriptor {
        SectionDescriptor::new("TestSection", "TestSector")
    }

    fn staircase() -> Profile {
        Profile::new(
            vec![0.0, 10.0, 12.0, 37.0, 39.0],
            vec![100.0, 100.0, 90.0, 90.0, 80.0],
        )
        .unwrap()
    }

    #[test]
    fn staircase_reports_ramp_berm() {
        let config = ExtractionConfig {
            max_berm_width: Some(50.0),
            ..Default::default()
        };
        let result = extract_parameters(&staircase(), &section(), &config).unwrap();
        assert_eq!(result.section_name, "TestSection");
        assert_eq!(result.sector, "TestSector");
        assert_eq!(result.benches.len(), 2);

        let ramp = result
            .benches
            .iter()
            .find(|b| (b.berm_width - 25.0).abs() < 1.0)
            .expect("bench with a 25 m berm");
        assert!(ramp.is_ramp);
        assert_eq!(ramp.crest_elevation, 100.0);
        assert_eq!(ramp.toe_elevation, 90.0);
        assert!((ramp.bench_height - 10.0).abs() < 1e-9);
        assert!((ramp.face_angle - 10.0_f64.atan2(2.0).to_degrees()).abs() < 1e-6);
    }

    #[test]
    fn staircase_section_angle_spans_all_benches() {
        let result =
            extract_parameters(&staircase(), &section(), &ExtractionConfig::default()).unwrap();
        let expected = 20.0_f64.atan2(29.0).to_degrees();
        assert!((result.overall_angle - expected).abs() < 1e-9);
        assert_eq!(result.inter_ramp_angle, result.overall_angle);
    }

    #[test]
    fn benches_are_ordered_and_oriented() {
        let mut distances = Vec::new();
        let mut elevations = Vec::new();
        for step in 0..6 {
            let base = step as f64 * 14.0;
            let top = 200.0 - step as f64 * 12.0;
            distances.extend([base, base + 9.0]);
            elevations.extend([top, top]);
        }
        distances.extend([84.0, 100.0]);
        elevations.extend([128.0, 128.0]);
        let profile = Profile::new(distances, elevations).unwrap();
        let result =
            extract_parameters(&profile, &section(), &ExtractionConfig::default()).unwrap();
        assert_eq!(result.benches.len(), 6);
        for (index, bench) in result.benches.iter().enumerate() {
            assert!(bench.crest_elevation >= bench.toe_elevation);
            assert_eq!(bench.bench_number as usize, index + 1);
            let in_band = (15.0..=42.0).contains(&bench.berm_width);
            assert_eq!(bench.is_ramp, in_band);
        }
        for pair in result.benches.windows(2) {
            assert!(pair[0].crest_elevation >= pair[1].crest_elevation);
        }
    }

    #[test]
    fn short_profiles_yield_empty_results() {
        let profile = Profile::new(vec![0.0, 1.0], vec![5.0, 0.0]).unwrap();
        let result =
            extract_parameters(&profile, &section(), &ExtractionConfig::default()).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.overall_angle, 0.0);
    }

    #[test]
    fn flat_profile_has_no_benches() {
        let profile = Profile::new(vec![0.0, 5.0, 10.0, 15.0], vec![50.0; 4]).unwrap();
        let result =
            extract_parameters(&profile, &section(), &ExtractionConfig::default()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn degenerate_profile_yields_empty_result() {
        let profile = Profile::new(vec![3.0; 5], vec![7.0; 5]).unwrap();
        let result =
            extract_parameters(&profile, &section(), &ExtractionConfig::default()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn ramp_flag_matches_final_berm_under_tight_limit() {
        let profile = Profile::new(
            vec![0.0, 10.0, 12.0, 20.0, 22.0, 57.0, 59.0],
            vec![100.0, 100.0, 90.0, 90.0, 80.0, 80.0, 70.0],
        )
        .unwrap();
        let config = ExtractionConfig {
            max_berm_width: Some(30.0),
            ..Default::default()
        };
        let result = extract_parameters(&profile, &section(), &config).unwrap();
        assert_eq!(result.benches.len(), 2);
        assert_eq!(result.benches[1].crest_elevation, 90.0);
        assert_eq!(result.benches[1].berm_width, 0.0);
        for bench in &result.benches {
            assert_eq!(
                bench.is_ramp,
                (15.0..=42.0).contains(&bench.berm_width),
                "bench {}",
                bench.bench_number
            );
        }
    }

    #[test]
    fn invalid_configuration_fails_fast() {
        let config = ExtractionConfig {
            resolution: -1.0,
            ..Default::default()
        };
        let err = extract_parameters(&staircase(), &section(), &config).unwrap_err();
        assert!(matches!(err, StageError::InvalidInput(_)));
    }
}
