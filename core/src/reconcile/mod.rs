//! Design versus as-built bench reconciliation.

pub mod angles;
pub mod compare;
pub mod status;
pub mod summary;
pub mod tolerance;

pub use angles::{compare_section_angles, AngleRecord, SectionAngle};
pub use compare::{
    compare_design_vs_asbuilt, Comparator, ComparisonRecord, RecordKind, EXTRA_BENCH_NUMBER,
};
pub use status::ComplianceStatus;
pub use summary::{ComplianceSummary, ParameterSummary};
pub use tolerance::{BermTolerance, MatchConfig, Tolerance, ToleranceConfig};
