use anyhow::Context;
use benchcore::model::{Profile, SectionDescriptor};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One section cut through both surfaces.
///
/// A missing profile stands for a cut that produced nothing; the section is
/// still processed so output indices line up with the input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionInput {
    pub name: String,
    #[serde(default)]
    pub sector: String,
    #[serde(default)]
    pub design: Option<Profile>,
    #[serde(default)]
    pub asbuilt: Option<Profile>,
}

impl SectionInput {
    pub fn descriptor(&self) -> SectionDescriptor {
        SectionDescriptor::new(self.name.clone(), self.sector.clone())
    }
}

pub fn load_sections<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<SectionInput>> {
    let path_ref = path.as_ref();
    let contents = fs::read_to_string(path_ref)
        .with_context(|| format!("reading sections {}", path_ref.display()))?;
    let sections: Vec<SectionInput> = serde_json::from_str(&contents)
        .with_context(|| format!("parsing sections {}", path_ref.display()))?;
    Ok(sections)
}
