use serde::{Deserialize, Serialize};

use crate::model::profile::{ProfilePoint, SectionDescriptor};

/// One detected bench face with the berm that follows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchParams {
    pub bench_number: u32,
    pub crest_elevation: f64,
    pub crest_distance: f64,
    pub toe_elevation: f64,
    pub toe_distance: f64,
    pub bench_height: f64,
    pub face_angle: f64,
    pub berm_width: f64,
    #[serde(default)]
    pub is_ramp: bool,
}

impl BenchParams {
    /// Builds a bench from two break points, putting the higher one at the crest.
    pub fn from_break_points(a: ProfilePoint, b: ProfilePoint, face_angle: f64) -> Self {
        let (crest, toe) = if a.elevation > b.elevation {
            (a, b)
        } else {
            (b, a)
        };
        Self {
            bench_number: 0,
            crest_elevation: crest.elevation,
            crest_distance: crest.distance,
            toe_elevation: toe.elevation,
            toe_distance: toe.distance,
            bench_height: (crest.elevation - toe.elevation).abs(),
            face_angle,
            berm_width: 0.0,
            is_ramp: false,
        }
    }

    pub fn crest(&self) -> ProfilePoint {
        ProfilePoint::new(self.crest_distance, self.crest_elevation)
    }

    pub fn toe(&self) -> ProfilePoint {
        ProfilePoint::new(self.toe_distance, self.toe_elevation)
    }

    /// Elevation halfway between crest and toe, used to pair benches.
    pub fn mid_elevation(&self) -> f64 {
        (self.crest_elevation + self.toe_elevation) / 2.0
    }

    /// Straight-line length of the face.
    pub fn face_length(&self) -> f64 {
        self.crest().distance_to(&self.toe())
    }
}

/// Full analysis of one profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub section_name: String,
    pub sector: String,
    pub benches: Vec<BenchParams>,
    pub inter_ramp_angle: f64,
    pub overall_angle: f64,
}

impl ExtractionResult {
    /// Empty result for a section, used when nothing could be extracted.
    pub fn empty(section: &SectionDescriptor) -> Self {
        Self {
            section_name: section.name.clone(),
            sector: section.sector.clone(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.benches.is_empty()
    }

    /// Topmost crest and bottommost toe, when the section has benches.
    pub fn extremes(&self) -> Option<(&BenchParams, &BenchParams)> {
        Some((self.benches.first()?, self.benches.last()?))
    }
}
