//! Rule-set maintenance: validating candidate rule documents and merging
//! rule additions. Runs at load time, never on the extraction hot path.
//!
//! Updates are atomic: the merged document is fully re-validated and an
//! update that would make the set unloadable is refused, leaving the base
//! document untouched.

use serde::{Deserialize, Serialize};

use super::rules::{PatternRule, PatternRuleSet, RuleDocument};
use super::vocab::VocabEntry;
use crate::types::{MapperError, MapperResult};

/// A batch of additions to a rule document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleUpdate {
    #[serde(default)]
    pub add_rules: Vec<PatternRule>,
    #[serde(default)]
    pub add_sites: Vec<VocabEntry>,
    #[serde(default)]
    pub add_vendors: Vec<VocabEntry>,
}

impl RuleUpdate {
    pub fn is_empty(&self) -> bool {
        self.add_rules.is_empty() && self.add_sites.is_empty() && self.add_vendors.is_empty()
    }
}

/// Validate a candidate document without keeping the compiled set.
pub fn validate_document(document: &RuleDocument) -> MapperResult<()> {
    PatternRuleSet::from_document(document.clone()).map(|_| ())
}

/// Merge additions into a base document. The merged result is validated
/// before it is returned; on any error the base is left as it was.
pub fn apply_update(base: &RuleDocument, update: &RuleUpdate) -> MapperResult<RuleDocument> {
    if update.is_empty() {
        return Err(MapperError::RuleLoad("empty rule update".into()));
    }

    let mut merged = base.clone();
    merged.rules.extend(update.add_rules.iter().cloned());
    merged.vocabulary.sites.extend(update.add_sites.iter().cloned());
    merged.vocabulary.vendors.extend(update.add_vendors.iter().cloned());

    validate_document(&merged)?;
    log::info!(
        "rule update applied: +{} rules, +{} sites, +{} vendors",
        update.add_rules.len(),
        update.add_sites.len(),
        update.add_vendors.len()
    );
    Ok(merged)
}

/// Dry-run a document against sample titles: which rules fire on which
/// sample. Used to vet new patterns before rolling them out.
pub fn probe(document: &RuleDocument, samples: &[&str]) -> MapperResult<Vec<ProbeResult>> {
    let rule_set = PatternRuleSet::from_document(document.clone())?;
    let mut results = Vec::with_capacity(samples.len());
    for sample in samples {
        let mut fired: Vec<String> = Vec::new();
        for field in crate::types::Field::ALL {
            for compiled in rule_set.rules_for(field) {
                if compiled.regex.is_match(sample) {
                    fired.push(compiled.rule.id.clone());
                }
            }
        }
        results.push(ProbeResult {
            sample: sample.to_string(),
            fired_rules: fired,
        });
    }
    Ok(results)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeResult {
    pub sample: String,
    pub fired_rules: Vec<String>,
}

#[cfg(test)]
#[path = "tests/updater_tests.rs"]
mod tests;
