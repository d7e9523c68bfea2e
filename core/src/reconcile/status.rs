use std::fmt;

use serde::{Deserialize, Serialize};

use crate::reconcile::tolerance::Tolerance;

/// Verdict attached to one parameter of a comparison record.
///
/// Serialized with the labels used in the reconciliation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplianceStatus {
    #[serde(rename = "CUMPLE")]
    Compliant,
    #[serde(rename = "FUERA DE TOLERANCIA")]
    OutOfTolerance,
    #[serde(rename = "NO CUMPLE")]
    NonCompliant,
    #[serde(rename = "NO CONSTRUIDO")]
    NotBuilt,
    #[serde(rename = "EXTRA")]
    Extra,
    #[serde(rename = "-")]
    NotApplicable,
    #[serde(rename = "FALTA BANCO")]
    MissingBench,
    #[serde(rename = "BANCO ADICIONAL")]
    AdditionalBench,
    #[serde(rename = "RAMPA DETECTADA")]
    RampDetected,
    #[serde(rename = "RAMPA OK")]
    RampOk,
    #[serde(rename = "RAMPA (Desv. Ancho)")]
    RampWidthDeviation,
    #[serde(rename = "FALTA RAMPA")]
    MissingRamp,
}

impl ComplianceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compliant => "CUMPLE",
            Self::OutOfTolerance => "FUERA DE TOLERANCIA",
            Self::NonCompliant => "NO CUMPLE",
            Self::NotBuilt => "NO CONSTRUIDO",
            Self::Extra => "EXTRA",
            Self::NotApplicable => "-",
            Self::MissingBench => "FALTA BANCO",
            Self::AdditionalBench => "BANCO ADICIONAL",
            Self::RampDetected => "RAMPA DETECTADA",
            Self::RampOk => "RAMPA OK",
            Self::RampWidthDeviation => "RAMPA (Desv. Ancho)",
            Self::MissingRamp => "FALTA RAMPA",
        }
    }

    /// Tripartite verdict for a signed deviation against an asymmetric tolerance.
    ///
    /// The negative bound applies to negative deviations and the positive bound
    /// otherwise; deviations up to `band_factor` times the bound are out of
    /// tolerance, anything beyond is non-compliant.
    pub fn evaluate(deviation: f64, tolerance: &Tolerance, band_factor: f64) -> Self {
        let limit = if deviation < 0.0 {
            tolerance.neg
        } else {
            tolerance.pos
        };
        let magnitude = deviation.abs();
        if magnitude <= limit {
            Self::Compliant
        } else if magnitude <= limit * band_factor {
            Self::OutOfTolerance
        } else {
            Self::NonCompliant
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
