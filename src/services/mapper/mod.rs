//! The mapping pipeline: pattern rules, normalization, per-title
//! extraction, bounded-batch mapping, and case-level aggregation.

pub mod aggregate;
pub mod batch;
pub mod extractor;
pub mod normalizer;
pub mod rules;
pub mod updater;
pub mod vocab;

use std::sync::Arc;

use crate::services::config::MapperSettings;
use crate::types::{CaseMap, RawTitleItem, RunSummary};

pub use aggregate::{aggregate, Aggregator};
pub use batch::{cancel_flag, BatchMapper, CancelFlag};
pub use extractor::{ExtractOptions, TitleExtractor};
pub use rules::{PatternRule, PatternRuleSet, RuleDocument};
pub use updater::{apply_update, probe, validate_document, RuleUpdate};
pub use vocab::Vocabulary;

/// Run the full pipeline over a set of items: batch-map every title, then
/// aggregate the results into the case map and run summary.
pub async fn run_pipeline(
    rules: Arc<PatternRuleSet>,
    settings: MapperSettings,
    items: Vec<RawTitleItem>,
    cancel: CancelFlag,
) -> (CaseMap, RunSummary) {
    let extractor = TitleExtractor::new(rules, settings);
    let mapper = BatchMapper::new(extractor, settings.batch_size);

    let mut rx = mapper.map_all(items, cancel);
    let mut aggregator = Aggregator::new();
    while let Some(result) = rx.recv().await {
        aggregator.push(result);
    }
    aggregator.finish()
}
