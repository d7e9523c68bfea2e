use serde::{Deserialize, Serialize};

use crate::prelude::{StageError, StageResult};

/// A single (distance, elevation) vertex of a section profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    pub distance: f64,
    pub elevation: f64,
}

impl ProfilePoint {
    pub fn new(distance: f64, elevation: f64) -> Self {
        Self {
            distance,
            elevation,
        }
    }

    pub fn distance_to(&self, other: &ProfilePoint) -> f64 {
        (self.distance - other.distance).hypot(self.elevation - other.elevation)
    }
}

/// Elevation profile along a section line, as produced by the mesh cutter.
///
/// Construction validates the contract the extraction relies on: equal-length
/// sequences and finite values. Anything else degrades gracefully downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawProfile")]
pub struct Profile {
    distances: Vec<f64>,
    elevations: Vec<f64>,
}

#[derive(Deserialize)]
struct RawProfile {
    distances: Vec<f64>,
    elevations: Vec<f64>,
}

impl TryFrom<RawProfile> for Profile {
    type Error = StageError;

    fn try_from(raw: RawProfile) -> StageResult<Self> {
        Profile::new(raw.distances, raw.elevations)
    }
}

impl Profile {
    pub fn new(distances: Vec<f64>, elevations: Vec<f64>) -> StageResult<Self> {
        if distances.len() != elevations.len() {
            return Err(StageError::InvalidInput(format!(
                "profile has {} distances but {} elevations",
                distances.len(),
                elevations.len()
            )));
        }
        if let Some(index) = distances
            .iter()
            .zip(&elevations)
            .position(|(d, z)| !d.is_finite() || !z.is_finite())
        {
            return Err(StageError::InvalidInput(format!(
                "profile value at index {} is not finite",
                index
            )));
        }
        Ok(Self {
            distances,
            elevations,
        })
    }

    pub fn from_points(points: &[ProfilePoint]) -> StageResult<Self> {
        Self::new(
            points.iter().map(|p| p.distance).collect(),
            points.iter().map(|p| p.elevation).collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    pub fn elevations(&self) -> &[f64] {
        &self.elevations
    }

    pub fn point(&self, index: usize) -> ProfilePoint {
        ProfilePoint::new(self.distances[index], self.elevations[index])
    }

    pub fn points(&self) -> impl Iterator<Item = ProfilePoint> + '_ {
        self.distances
            .iter()
            .zip(&self.elevations)
            .map(|(&d, &z)| ProfilePoint::new(d, z))
    }

    /// True when distance grows from the first sample to the last one.
    pub fn is_ascending(&self) -> bool {
        match (self.distances.first(), self.distances.last()) {
            (Some(first), Some(last)) => last > first,
            _ => false,
        }
    }
}

/// Identifies the section a profile was cut from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDescriptor {
    pub name: String,
    pub sector: String,
}

impl SectionDescriptor {
    pub fn new(name: impl Into<String>, sector: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sector: sector.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_rejects_mismatched_lengths() {
        let err = Profile::new(vec![0.0, 1.0], vec![10.0]).unwrap_err();
        assert!(err.to_string().contains("2 distances but 1 elevations"));
    }

    #[test]
    fn profile_rejects_non_finite_values() {
        assert!(Profile::new(vec![0.0, f64::NAN], vec![1.0, 2.0]).is_err());
        assert!(Profile::new(vec![0.0, 1.0], vec![1.0, f64::INFINITY]).is_err());
    }

    #[test]
    fn profile_direction_follows_endpoints() {
        let ascending = Profile::new(vec![0.0, 5.0, 10.0], vec![0.0; 3]).unwrap();
        let descending = Profile::new(vec![10.0, 5.0, 0.0], vec![0.0; 3]).unwrap();
        assert!(ascending.is_ascending());
        assert!(!descending.is_ascending());
        assert!(!Profile::default().is_ascending());
    }

    #[test]
    fn profile_deserialization_validates() {
        let ok: Profile =
            serde_json::from_str(r#"{"distances":[0,1],"elevations":[5,6]}"#).unwrap();
        assert_eq!(ok.len(), 2);
        let bad = serde_json::from_str::<Profile>(r#"{"distances":[0,1],"elevations":[5]}"#);
        assert!(bad.is_err());
    }
}
