use crate::math::slope_degrees;
use crate::math::stats::StatsHelper;
use crate::model::{BenchParams, Profile};
use crate::prelude::{
    BenchHeuristics, ExtractionConfig, ProcessingStage, StageError, StageResult,
};
use crate::processing::slope::SlopeProfile;
use crate::telemetry::log::LogManager;

/// Section analysis consumed by [`BenchStage`].
#[derive(Debug, Clone)]
pub struct BenchInput {
    pub slopes: SlopeProfile,
    /// Unsimplified profile, scanned for the trailing berm.
    pub raw: Profile,
}

/// Benches of one profile plus the section angles derived from them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenchSet {
    pub benches: Vec<BenchParams>,
    pub inter_ramp_angle: f64,
    pub overall_angle: f64,
}

/// Turns steep runs of a classified profile into ordered benches.
pub struct BenchStage {
    config: Option<ExtractionConfig>,
    logger: LogManager,
}

impl BenchStage {
    pub fn new(logger: LogManager) -> Self {
        Self {
            config: None,
            logger,
        }
    }
}

impl ProcessingStage for BenchStage {
    type Input = BenchInput;
    type Output = BenchSet;

    fn initialize(&mut self, config: &ExtractionConfig) -> StageResult<()> {
        self.config = Some(config.clone());
        Ok(())
    }

    fn execute(&mut self, input: Self::Input) -> StageResult<Self::Output> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| StageError::Internal("stage not initialized".into()))?;
        let heuristics = &config.heuristics;

        let (crests, toes) = break_points(&input.slopes.steep);
        let candidates = pair_candidates(&crests, &toes, &input.slopes, config);
        let candidate_count = candidates.len();

        let mut benches = merge_micro_benches(candidates, heuristics);
        order_and_number(&mut benches);
        assign_berm_widths(&mut benches, heuristics);
        if let Some(limit) = config.berm_limit() {
            benches = keep_largest_group(benches, limit, heuristics);
        }
        apply_trailing_berm(&mut benches, &input.raw, config);

        let (inter_ramp_angle, overall_angle) = section_angles(&benches);
        self.logger.detail(&format!(
            "BenchStage {} crests, {} toes, {} candidates, {} benches",
            crests.len(),
            toes.len(),
            candidate_count,
            benches.len()
        ));

        Ok(BenchSet {
            benches,
            inter_ramp_angle,
            overall_angle,
        })
    }

    fn cleanup(&mut self) {
        self.config = None;
    }
}

/// Vertex indices where faces start (crests) and end (toes).
pub fn break_points(steep: &[bool]) -> (Vec<usize>, Vec<usize>) {
    let mut crests = Vec::new();
    let mut toes = Vec::new();
    for i in 1..steep.len() {
        if steep[i] && !steep[i - 1] {
            crests.push(i);
        } else if !steep[i] && steep[i - 1] {
            toes.push(i);
        }
    }
    if steep.first() == Some(&true) {
        crests.insert(0, 0);
    }
    if steep.last() == Some(&true) {
        toes.push(steep.len());
    }
    (crests, toes)
}

/// Pairs every crest with the first toe after it and keeps the valid faces.
pub fn pair_candidates(
    crests: &[usize],
    toes: &[usize],
    slopes: &SlopeProfile,
    config: &ExtractionConfig,
) -> Vec<BenchParams> {
    let heuristics = &config.heuristics;
    let mut benches = Vec::new();
    let mut crest_cursor = 0;
    let mut toe_cursor = 0;

    while crest_cursor < crests.len() && toe_cursor < toes.len() {
        let crest_vertex = crests[crest_cursor];
        while toe_cursor < toes.len() && toes[toe_cursor] <= crest_vertex {
            toe_cursor += 1;
        }
        let Some(&toe_vertex) = toes.get(toe_cursor) else {
            break;
        };

        let bench = BenchParams::from_break_points(
            slopes.points[crest_vertex],
            slopes.points[toe_vertex],
            0.0,
        );
        crest_cursor += 1;
        toe_cursor += 1;

        if bench.bench_height < heuristics.min_bench_height
            || bench.face_length() < heuristics.min_face_length
        {
            continue;
        }

        let start = crest_vertex.min(toe_vertex);
        let end = crest_vertex.max(toe_vertex);
        benches.push(BenchParams {
            bench_number: benches.len() as u32 + 1,
            face_angle: face_angle(slopes, start, end, config),
            ..bench
        });
    }
    benches
}

/// Length-weighted face angle over segments `start..end`, dominated by the
/// segments that are close to the face threshold.
pub fn face_angle(slopes: &SlopeProfile, start: usize, end: usize, config: &ExtractionConfig) -> f64 {
    if end <= start {
        return config.face_threshold;
    }
    let angles = &slopes.angles[start..end];
    let lengths = &slopes.lengths[start..end];
    let cutoff = config.face_threshold - config.heuristics.steep_margin;

    let (steep_angles, steep_lengths): (Vec<f64>, Vec<f64>) = angles
        .iter()
        .zip(lengths)
        .filter(|&(&angle, _)| angle > cutoff)
        .map(|(&angle, &length)| (angle, length))
        .unzip();

    if steep_lengths.iter().sum::<f64>() > config.heuristics.min_steep_length {
        if let Some(angle) = StatsHelper::weighted_mean(&steep_angles, &steep_lengths) {
            return angle;
        }
    }
    let valid_angles: Vec<f64> = angles
        .iter()
        .zip(&slopes.valid[start..end])
        .filter(|&(_, &valid)| valid)
        .map(|(&angle, _)| angle)
        .collect();
    StatsHelper::mean(&valid_angles).unwrap_or(config.face_threshold)
}

/// Folds benches separated by a small elevation gap into their predecessor
/// when one of the two is too short to stand on its own.
pub fn merge_micro_benches(
    benches: Vec<BenchParams>,
    heuristics: &BenchHeuristics,
) -> Vec<BenchParams> {
    let mut merged: Vec<BenchParams> = Vec::with_capacity(benches.len());
    for current in benches {
        if let Some(previous) = merged.last_mut() {
            if should_merge(previous, &current, heuristics) {
                *previous = merge_pair(previous, &current);
                continue;
            }
        }
        merged.push(current);
    }
    merged
}

fn should_merge(upper: &BenchParams, lower: &BenchParams, heuristics: &BenchHeuristics) -> bool {
    let gap = (upper.toe_elevation - lower.crest_elevation).abs();
    let has_micro_bench = upper.bench_height < heuristics.merge_max_height
        || lower.bench_height < heuristics.merge_max_height;
    gap < heuristics.merge_gap && has_micro_bench
}

fn merge_pair(upper: &BenchParams, lower: &BenchParams) -> BenchParams {
    let (crest_elevation, crest_distance) = if upper.crest_elevation >= lower.crest_elevation {
        (upper.crest_elevation, upper.crest_distance)
    } else {
        (lower.crest_elevation, lower.crest_distance)
    };
    let (toe_elevation, toe_distance) = if upper.toe_elevation <= lower.toe_elevation {
        (upper.toe_elevation, upper.toe_distance)
    } else {
        (lower.toe_elevation, lower.toe_distance)
    };
    let face_angle = StatsHelper::weighted_mean(
        &[upper.face_angle, lower.face_angle],
        &[upper.bench_height, lower.bench_height],
    )
    .unwrap_or((upper.face_angle + lower.face_angle) / 2.0);

    BenchParams {
        bench_number: upper.bench_number,
        crest_elevation,
        crest_distance,
        toe_elevation,
        toe_distance,
        bench_height: (crest_elevation - toe_elevation).abs(),
        face_angle,
        berm_width: 0.0,
        is_ramp: false,
    }
}

/// Sorts by descending crest elevation and renumbers from 1.
pub fn order_and_number(benches: &mut [BenchParams]) {
    benches.sort_by(|a, b| b.crest_elevation.total_cmp(&a.crest_elevation));
    renumber(benches);
}

fn renumber(benches: &mut [BenchParams]) {
    for (index, bench) in benches.iter_mut().enumerate() {
        bench.bench_number = index as u32 + 1;
    }
}

/// Berm width of each bench is the horizontal gap from its toe to the next
/// crest down. The lowest bench is left untouched.
pub fn assign_berm_widths(benches: &mut [BenchParams], heuristics: &BenchHeuristics) {
    for i in 1..benches.len() {
        let lower_crest = benches[i].crest_distance;
        let upper = &mut benches[i - 1];
        upper.berm_width = (upper.toe_distance - lower_crest).abs();
        upper.is_ramp = heuristics.is_ramp_width(upper.berm_width);
    }
}

/// Splits the bench list at berms wider than `limit` and keeps the longest
/// run (the first one on ties). A splitting berm is cleared along with its
/// ramp flag.
pub fn keep_largest_group(
    mut benches: Vec<BenchParams>,
    limit: f64,
    heuristics: &BenchHeuristics,
) -> Vec<BenchParams> {
    if benches.len() < 2 {
        return benches;
    }
    let mut groups: Vec<(usize, usize)> = Vec::new();
    let mut group_start = 0;
    for i in 0..benches.len() - 1 {
        if benches[i].berm_width > limit {
            benches[i].berm_width = 0.0;
            benches[i].is_ramp = heuristics.is_ramp_width(0.0);
            groups.push((group_start, i + 1));
            group_start = i + 1;
        }
    }
    groups.push((group_start, benches.len()));

    let (start, end) = groups
        .iter()
        .copied()
        .fold((0, 0), |best, group| {
            if group.1 - group.0 > best.1 - best.0 {
                group
            } else {
                best
            }
        });
    let mut kept: Vec<BenchParams> = benches.drain(start..end).collect();
    renumber(&mut kept);
    kept
}

/// Gives the lowest bench the width of the flat run left after its toe.
pub fn apply_trailing_berm(
    benches: &mut [BenchParams],
    raw: &Profile,
    config: &ExtractionConfig,
) {
    let Some(last) = benches.last_mut() else {
        return;
    };
    let offset = config.heuristics.trailing_offset;
    let ascending = raw.is_ascending();
    let tail: Vec<_> = raw
        .points()
        .filter(|point| {
            if ascending {
                point.distance > last.toe_distance + offset
            } else {
                point.distance < last.toe_distance - offset
            }
        })
        .collect();

    let (Some(first), Some(end)) = (tail.first(), tail.last()) else {
        return;
    };
    if tail.len() < 2 {
        return;
    }
    let run = end.distance - first.distance;
    let slope = slope_degrees(end.elevation - first.elevation, run);
    if slope <= config.berm_threshold {
        last.berm_width = run.abs();
        last.is_ramp = config.heuristics.is_ramp_width(last.berm_width);
    }
}

/// Inter-ramp and overall angle from the topmost crest to the bottommost toe.
pub fn section_angles(benches: &[BenchParams]) -> (f64, f64) {
    match benches {
        [] => (0.0, 0.0),
        [only] => (only.face_angle, only.face_angle),
        [top, .., bottom] => {
            let rise = top.crest_elevation - bottom.toe_elevation;
            let run = (top.crest_distance - bottom.toe_distance).abs();
            let overall = if run > 1e-3 {
                slope_degrees(rise, run)
            } else {
                0.0
            };
            (overall, overall)
        }
    }
}
