use crate::workflow::input::SectionInput;
use anyhow::Context;
use benchcore::model::{Profile, ProfilePoint};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration for generating synthetic pit-wall sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub sections: usize,
    pub benches: usize,
    pub bench_height: f64,
    pub face_angle: f64,
    pub berm_width: f64,
    /// Every n-th berm is widened into a ramp; zero disables ramps.
    pub ramp_every: usize,
    pub ramp_width: f64,
    pub crest_elevation: f64,
    /// Sample spacing of the as-built surface.
    pub spacing: f64,
    /// Elevation jitter of the as-built surface.
    pub noise: f64,
    /// Maximum construction deviation of face angles, in degrees.
    pub angle_jitter: f64,
    /// Maximum construction deviation of berm widths.
    pub berm_jitter: f64,
    pub seed: u64,
    pub sector: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            sections: 8,
            benches: 6,
            bench_height: 15.0,
            face_angle: 70.0,
            berm_width: 10.0,
            ramp_every: 3,
            ramp_width: 25.0,
            crest_elevation: 3000.0,
            spacing: 0.5,
            noise: 0.1,
            angle_jitter: 4.0,
            berm_jitter: 2.0,
            seed: 0,
            sector: "Synthetic".into(),
        }
    }
}

impl GeneratorConfig {
    fn berm_for(&self, bench: usize) -> f64 {
        if self.ramp_every > 0 && (bench + 1) % self.ramp_every == 0 {
            self.ramp_width
        } else {
            self.berm_width
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.bench_height > 0.0 && self.berm_width > 0.0,
            "bench height and berm width must be positive"
        );
        anyhow::ensure!(
            self.face_angle > 0.0 && self.face_angle < 90.0,
            "face angle must lie in (0, 90) degrees, got {}",
            self.face_angle
        );
        anyhow::ensure!(self.spacing > 0.0, "sample spacing must be positive");
        Ok(())
    }
}

/// Break points of a staircase wall: a leading berm, then face and berm per bench.
fn staircase_vertices<F>(config: &GeneratorConfig, mut shape: F) -> Vec<ProfilePoint>
where
    F: FnMut(usize) -> (f64, f64),
{
    let mut distance = 0.0;
    let mut elevation = config.crest_elevation;
    let mut vertices = vec![ProfilePoint::new(distance, elevation)];
    distance += config.berm_width;
    vertices.push(ProfilePoint::new(distance, elevation));

    for bench in 0..config.benches {
        let (angle, berm) = shape(bench);
        distance += config.bench_height / angle.to_radians().tan();
        elevation -= config.bench_height;
        vertices.push(ProfilePoint::new(distance, elevation));
        distance += berm;
        vertices.push(ProfilePoint::new(distance, elevation));
    }
    vertices
}

/// Samples a polyline every `spacing` along distance, keeping its vertices.
fn densify(vertices: &[ProfilePoint], spacing: f64) -> Vec<ProfilePoint> {
    let mut points = Vec::new();
    for pair in vertices.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let run = end.distance - start.distance;
        let steps = (run / spacing).ceil().max(1.0) as usize;
        for step in 0..steps {
            let t = step as f64 / steps as f64;
            points.push(ProfilePoint::new(
                start.distance + run * t,
                start.elevation + (end.elevation - start.elevation) * t,
            ));
        }
    }
    if let Some(last) = vertices.last() {
        points.push(*last);
    }
    points
}

pub fn design_profile(config: &GeneratorConfig) -> anyhow::Result<Profile> {
    config.validate()?;
    let vertices = staircase_vertices(config, |bench| (config.face_angle, config.berm_for(bench)));
    Profile::from_points(&vertices).context("building design profile")
}

fn asbuilt_profile(config: &GeneratorConfig, rng: &mut StdRng) -> anyhow::Result<Profile> {
    let vertices = staircase_vertices(config, |bench| {
        let angle = config.face_angle + rng.gen_range(-1.0..=1.0) * config.angle_jitter;
        let berm = config.berm_for(bench) + rng.gen_range(-1.0..=1.0) * config.berm_jitter;
        (angle.clamp(1.0, 89.0), berm.max(0.5))
    });
    let mut points = densify(&vertices, config.spacing);
    if config.noise > 0.0 {
        for point in points.iter_mut() {
            point.elevation += rng.gen_range(-config.noise..config.noise);
        }
    }
    Profile::from_points(&points).context("building as-built profile")
}

/// Builds `config.sections` sections sharing one design wall, each with its
/// own as-built construction. Deterministic for a given seed.
pub fn build_sections(config: &GeneratorConfig) -> anyhow::Result<Vec<SectionInput>> {
    let design = design_profile(config)?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    (0..config.sections)
        .map(|index| {
            Ok(SectionInput {
                name: format!("SEC-{:03}", index + 1),
                sector: config.sector.clone(),
                design: Some(design.clone()),
                asbuilt: Some(asbuilt_profile(config, &mut rng)?),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchcore::model::SectionDescriptor;
    use benchcore::prelude::ExtractionConfig;
    use benchcore::processing::extract_parameters;

    #[test]
    fn generator_builds_requested_sections() {
        let config = GeneratorConfig {
            sections: 3,
            ..Default::default()
        };
        let sections = build_sections(&config).unwrap();
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[2].name, "SEC-003");
        let design = sections[0].design.as_ref().unwrap();
        assert_eq!(design.len(), 2 + 2 * config.benches);
        assert!(sections[0].asbuilt.as_ref().unwrap().len() > design.len());
    }

    #[test]
    fn generator_is_seeded() {
        let config = GeneratorConfig {
            sections: 2,
            seed: 13,
            ..Default::default()
        };
        let first = build_sections(&config).unwrap();
        let second = build_sections(&config).unwrap();
        assert_eq!(first[1].asbuilt, second[1].asbuilt);
        assert_ne!(first[0].asbuilt, first[1].asbuilt);
    }

    #[test]
    fn design_wall_extracts_every_bench_and_ramp() {
        let config = GeneratorConfig::default();
        let design = design_profile(&config).unwrap();
        let result = extract_parameters(
            &design,
            &SectionDescriptor::new("SEC-001", "Synthetic"),
            &ExtractionConfig::default(),
        )
        .unwrap();
        assert_eq!(result.benches.len(), config.benches);
        assert!(result.benches[2].is_ramp);
        assert!(!result.benches[0].is_ramp);
        assert!((result.benches[0].face_angle - config.face_angle).abs() < 0.5);
    }

    #[test]
    fn invalid_geometry_is_rejected() {
        let config = GeneratorConfig {
            face_angle: 95.0,
            ..Default::default()
        };
        assert!(build_sections(&config).is_err());
    }
}
