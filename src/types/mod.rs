pub mod errors;
pub mod mapping;

pub use errors::{MapperError, MapperResult};
pub use mapping::{
    CaseActivity, CaseMap, CaseSummary, Confidence, Field, FieldCounts, FieldMatch, ItemContext,
    MappingResult, ProjectPhase, RawTitleItem, RunSummary,
};
