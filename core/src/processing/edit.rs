use serde::{Deserialize, Serialize};

use crate::math::slope_degrees;
use crate::model::{BenchParams, ExtractionResult};
use crate::prelude::BenchHeuristics;

/// Horizontal extent under which an edited face is treated as vertical.
const VERTICAL_FACE_RUN: f64 = 0.01;

/// User-supplied break-line positions for one bench; unset fields keep the
/// extracted value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crest_distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crest_elevation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toe_distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toe_elevation: Option<f64>,
}

impl BenchOverride {
    fn apply(&self, bench: &mut BenchParams) {
        if let Some(value) = self.crest_distance {
            bench.crest_distance = value;
        }
        if let Some(value) = self.crest_elevation {
            bench.crest_elevation = value;
        }
        if let Some(value) = self.toe_distance {
            bench.toe_distance = value;
        }
        if let Some(value) = self.toe_elevation {
            bench.toe_elevation = value;
        }
    }
}

/// Applies overrides in bench order to a copy of `benches` and recomputes the
/// derived height, face angle, berm width and ramp flag.
///
/// Overrides beyond the last bench are ignored. Simplification and
/// classification are not re-run.
pub fn apply_overrides(
    benches: &[BenchParams],
    overrides: &[BenchOverride],
    heuristics: &BenchHeuristics,
) -> Vec<BenchParams> {
    let mut edited = benches.to_vec();
    for (bench, edit) in edited.iter_mut().zip(overrides) {
        edit.apply(bench);
        if bench.toe_elevation > bench.crest_elevation {
            std::mem::swap(&mut bench.crest_elevation, &mut bench.toe_elevation);
            std::mem::swap(&mut bench.crest_distance, &mut bench.toe_distance);
        }
        bench.bench_height = (bench.crest_elevation - bench.toe_elevation).abs();
        let run = (bench.toe_distance - bench.crest_distance).abs();
        bench.face_angle = if run > VERTICAL_FACE_RUN {
            slope_degrees(bench.crest_elevation - bench.toe_elevation, run)
        } else {
            90.0
        };
    }

    for i in 1..edited.len() {
        let lower_crest = edited[i].crest_distance;
        let upper = &mut edited[i - 1];
        upper.berm_width = (upper.toe_distance - lower_crest).abs();
    }
    for bench in edited.iter_mut() {
        bench.is_ramp = heuristics.is_ramp_width(bench.berm_width);
    }
    edited
}

impl ExtractionResult {
    /// Snapshot of this result with user edits applied; `self` is untouched.
    pub fn with_overrides(
        &self,
        overrides: &[BenchOverride],
        heuristics: &BenchHeuristics,
    ) -> ExtractionResult {
        ExtractionResult {
            benches: apply_overrides(&self.benches, overrides, heuristics),
            ..self.clone()
        }
    }
}
