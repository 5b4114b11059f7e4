//! casemap — pattern-driven extraction and mapping of shipment/case
//! metadata from unstructured folder and email titles.
//!
//! Raw titles go through the rule-driven extractor, the bounded-batch
//! mapper, and the case-level aggregator; the result is a case-keyed map
//! of deduplicated summaries plus a run summary of what matched, what
//! missed, and what errored.

pub mod services;
pub mod types;

pub use services::config::MapperSettings;
pub use services::mapper::{
    aggregate, cancel_flag, run_pipeline, Aggregator, BatchMapper, CancelFlag, ExtractOptions,
    PatternRuleSet, RuleDocument, RuleUpdate, TitleExtractor,
};
pub use types::{
    CaseMap, CaseSummary, Confidence, Field, FieldMatch, MapperError, MapperResult, MappingResult,
    ProjectPhase, RawTitleItem, RunSummary,
};
