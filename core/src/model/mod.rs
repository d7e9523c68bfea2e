pub mod bench;
pub mod profile;

pub use bench::{BenchParams, ExtractionResult};
pub use profile::{Profile, ProfilePoint, SectionDescriptor};
