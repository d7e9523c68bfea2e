//! Core bench extraction and reconciliation for open-pit section profiles.
//!
//! A profile goes through simplification, slope classification and bench
//! building; the resulting benches of a design and an as-built surface are
//! then matched and classified against configurable tolerances.

pub mod analysis;
pub mod math;
pub mod model;
pub mod prelude;
pub mod processing;
pub mod reconcile;
pub mod telemetry;

pub use model::{BenchParams, ExtractionResult, Profile, ProfilePoint, SectionDescriptor};
pub use prelude::{ExtractionConfig, ProcessingStage, StageError, StageResult};
pub use processing::{build_reconciled_profile, extract_parameters, BenchExtractor};
pub use reconcile::{compare_design_vs_asbuilt, ComparisonRecord, ToleranceConfig};
