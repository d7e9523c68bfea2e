pub mod benches;
pub mod edit;
pub mod extraction;
pub mod reconciled;
pub mod simplify;
pub mod slope;

pub use benches::{BenchInput, BenchSet, BenchStage};
pub use edit::{apply_overrides, BenchOverride};
pub use extraction::{extract_parameters, BenchExtractor};
pub use reconciled::{build_reconciled_profile, ReconciledProfile};
pub use simplify::SimplifyStage;
pub use slope::{SlopeProfile, SlopeStage};
