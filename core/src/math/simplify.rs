use crate::model::ProfilePoint;

/// Perpendicular distance from `point` to the chord `start`-`end`.
///
/// Zero-length chords fall back to the Euclidean distance to `start`.
pub fn perpendicular_distance(point: ProfilePoint, start: ProfilePoint, end: ProfilePoint) -> f64 {
    let dx = end.distance - start.distance;
    let dz = end.elevation - start.elevation;
    let length_sq = dx * dx + dz * dz;
    if length_sq == 0.0 {
        return point.distance_to(&start);
    }
    let px = point.distance - start.distance;
    let pz = point.elevation - start.elevation;
    (dx * pz - dz * px).abs() / length_sq.sqrt()
}

/// Douglas-Peucker simplification of a profile polyline.
///
/// Keeps both endpoints and every vertex needed to stay within `epsilon` of
/// the original curve. Inputs with fewer than three points come back as-is.
pub fn simplify(points: &[ProfilePoint], epsilon: f64) -> Vec<ProfilePoint> {
    simplify_indices(points, epsilon)
        .into_iter()
        .map(|index| points[index])
        .collect()
}

/// Indices of the vertices kept by [`simplify`], in ascending order.
pub fn simplify_indices(points: &[ProfilePoint], epsilon: f64) -> Vec<usize> {
    if points.len() < 3 {
        return (0..points.len()).collect();
    }

    let last = points.len() - 1;
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[last] = true;

    let mut pending = vec![(0usize, last)];
    while let Some((start, end)) = pending.pop() {
        if end <= start + 1 {
            continue;
        }
        let mut max_distance = 0.0;
        let mut max_index = start;
        for index in (start + 1)..end {
            let distance = perpendicular_distance(points[index], points[start], points[end]);
            // strict comparison keeps the first of equally distant vertices
            if distance > max_distance {
                max_distance = distance;
                max_index = index;
            }
        }
        if max_distance > epsilon {
            keep[max_index] = true;
            pending.push((max_index, end));
            pending.push((start, max_index));
        }
    }

    keep.iter()
        .enumerate()
        .filter_map(|(index, &kept)| kept.then_some(index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<ProfilePoint> {
        raw.iter().map(|&(d, z)| ProfilePoint::new(d, z)).collect()
    }

    #[test]
    fn short_inputs_are_returned_unchanged() {
        let two = pts(&[(0.0, 0.0), (1.0, 5.0)]);
        assert_eq!(simplify(&two, 0.25), two);
        assert!(simplify(&[], 0.25).is_empty());
    }

    #[test]
    fn collinear_points_collapse_to_endpoints() {
        let line = pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        assert_eq!(simplify(&line, 0.1), pts(&[(0.0, 0.0), (3.0, 3.0)]));
    }

    #[test]
    fn staircase_corners_survive() {
        let stairs = pts(&[
            (0.0, 100.0),
            (10.0, 100.0),
            (12.0, 90.0),
            (37.0, 90.0),
            (39.0, 80.0),
        ]);
        assert_eq!(simplify(&stairs, 0.25), stairs);
    }

    #[test]
    fn noise_within_tolerance_is_removed() {
        let noisy = pts(&[
            (0.0, 10.0),
            (1.0, 10.05),
            (2.0, 9.97),
            (3.0, 10.02),
            (4.0, 10.0),
        ]);
        let simplified = simplify(&noisy, 0.25);
        assert_eq!(simplified, pts(&[(0.0, 10.0), (4.0, 10.0)]));
    }

    #[test]
    fn simplification_is_idempotent_and_keeps_endpoints() {
        let profile: Vec<ProfilePoint> = (0..200)
            .map(|i| {
                let d = i as f64 * 0.5;
                let z = 100.0 - (d / 12.0).floor() * 10.0 + (d * 1.7).sin() * 0.3;
                ProfilePoint::new(d, z)
            })
            .collect();
        let once = simplify(&profile, 0.25);
        let twice = simplify(&once, 0.25);
        assert_eq!(once, twice);
        assert_eq!(once.first(), profile.first());
        assert_eq!(once.last(), profile.last());
    }

    #[test]
    fn degenerate_chord_uses_point_distance() {
        let start = ProfilePoint::new(0.0, 0.0);
        let point = ProfilePoint::new(3.0, 4.0);
        assert_eq!(perpendicular_distance(point, start, start), 5.0);
    }
}
