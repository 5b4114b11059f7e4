//! Per-title extraction: applies the rule set and normalizer to one raw
//! title, producing a `MappingResult`.
//!
//! Pure over (rule set, settings, title): the same title always yields the
//! same matches, and unmatched input is never an error. Rules run in
//! priority order per field; a rule whose captures all fail normalization
//! falls through to the next rule for that field only.

use regex::{Captures, Regex};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, LazyLock};

use super::normalizer::{self, Normalizer};
use super::rules::{CompiledRule, PatternRuleSet, Postprocess};
use crate::services::config::MapperSettings;
use crate::types::{
    Confidence, Field, FieldMatch, ItemContext, MappingResult, ProjectPhase, RawTitleItem,
};

static RE_LPO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bLPO[-\s]?(\d+)").expect("Invalid regex"));

/// Keyword tables for project-phase classification, checked in order.
const PHASE_KEYWORDS: &[(ProjectPhase, &[&str])] = &[
    (ProjectPhase::Procurement, &["lpo", "purchase order", "procurement", "order"]),
    (
        ProjectPhase::Shipping,
        &["shipping", "delivery", "container", "cntr", "lct", "vessel", "cargo"],
    ),
    (ProjectPhase::Customs, &["customs", "clearance", "import", "export", "duty"]),
    (
        ProjectPhase::Logistics,
        &["logistics", "transport", "freight", "material", "backload"],
    ),
    (
        ProjectPhase::Installation,
        &["installation", "install", "mounting", "assembly"],
    ),
    (ProjectPhase::Testing, &["test", "testing", "commissioning", "startup"]),
    (
        ProjectPhase::Certification,
        &["certificate", "cert", "mtc", "coc", "quality"],
    ),
];

/// Extraction tuning.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Collect candidates from every rule instead of stopping at the
    /// first rule that yields a normalized value.
    pub exhaustive: bool,
}

/// Applies the rule set to raw titles. Cheap to clone; the rule set is
/// shared.
#[derive(Debug, Clone)]
pub struct TitleExtractor {
    rules: Arc<PatternRuleSet>,
    settings: MapperSettings,
    options: ExtractOptions,
}

impl TitleExtractor {
    pub fn new(rules: Arc<PatternRuleSet>, settings: MapperSettings) -> Self {
        Self {
            rules,
            settings,
            options: ExtractOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Extract all fields from one item. Never fails: a title with zero
    /// extractable fields yields a result with every field unmatched.
    pub fn extract(&self, item: &RawTitleItem) -> MappingResult {
        let title = normalizer::preprocess_title(&item.title);
        let normalizer = Normalizer::new(self.rules.vocabulary(), &self.settings);

        let mut matches: BTreeMap<Field, Vec<FieldMatch>> = BTreeMap::new();
        let mut unmatched: BTreeSet<Field> = BTreeSet::new();

        for field in Field::ALL {
            let candidates = self.extract_field(field, &title, &normalizer);
            if candidates.is_empty() {
                unmatched.insert(field);
            } else {
                matches.insert(field, candidates);
            }
        }

        MappingResult {
            source_id: item.source_id.clone(),
            matches,
            unmatched_fields: unmatched,
            phase: classify_phase(&title),
            lpo_numbers: extract_lpo_numbers(&title),
            error: None,
            context: item.context.clone(),
            extracted_at: chrono::Utc::now(),
        }
    }

    /// Run one field's rules in order. Stops at the first rule whose
    /// captures normalize, unless exhaustive collection is requested.
    fn extract_field(
        &self,
        field: Field,
        title: &str,
        normalizer: &Normalizer<'_>,
    ) -> Vec<FieldMatch> {
        let mut candidates: Vec<FieldMatch> = Vec::new();

        for compiled in self.rules.rules_for(field) {
            let mut rule_yielded = false;
            for caps in compiled.regex.captures_iter(title) {
                let raw = capture_raw(&caps);
                let composed = compose(compiled, &caps);
                match normalizer.normalize(field, &composed) {
                    Ok(normalized) => {
                        rule_yielded = true;
                        let confidence = grade(compiled, normalized.fuzzy_score);
                        push_candidate(
                            &mut candidates,
                            FieldMatch {
                                field,
                                raw_value: raw,
                                normalized_value: normalized.value,
                                confidence,
                                rule_id: compiled.rule.id.clone(),
                            },
                        );
                    }
                    Err(error) => {
                        log::debug!(
                            "rule {} capture {:?} failed normalization: {error}",
                            compiled.rule.id,
                            raw
                        );
                    }
                }
            }
            if rule_yielded && !self.options.exhaustive {
                break;
            }
        }

        // Best first: confidence descending, stable within a rule.
        candidates.sort_by(|a, b| b.confidence.cmp(&a.confidence));
        candidates
    }
}

/// Raw captured substring for reporting: the full rule match.
fn capture_raw(caps: &Captures<'_>) -> String {
    caps.get(0).map(|m| m.as_str().trim().to_string()).unwrap_or_default()
}

/// Apply the rule's canonical-shape hint to its captures.
fn compose(compiled: &CompiledRule, caps: &Captures<'_>) -> String {
    let group = |name: &str| caps.name(name).map(|m| m.as_str()).unwrap_or_default();
    match compiled.rule.postprocess {
        Some(Postprocess::AdoptPrefix) => {
            format!("HVDC-ADOPT-{}-{}", group("vendor"), group("num"))
        }
        Some(Postprocess::JptwGrmPair) => {
            format!("HVDC-AGI-JPTW{}-GRM{}", group("jptw"), group("grm"))
        }
        Some(Postprocess::Uppercase) | None => {
            // Prefer the named value group when the rule defines one, so
            // surrounding context (colons, parens) stays out of the value.
            let value = caps.name("value").map(|m| m.as_str());
            value.unwrap_or_else(|| caps.get(0).map(|m| m.as_str()).unwrap_or_default()).to_string()
        }
    }
}

/// Confidence from rule precedence and fuzzy-match quality: authoritative
/// exact hits are High, fallbacks Medium, late low-priority fallbacks Low.
/// A fuzzy vocabulary hit caps the grade at Medium.
fn grade(compiled: &CompiledRule, fuzzy_score: Option<f64>) -> Confidence {
    let base = if compiled.rule.authoritative {
        Confidence::High
    } else if compiled.rule.priority < 50 {
        Confidence::Medium
    } else {
        Confidence::Low
    };
    match fuzzy_score {
        Some(_) => base.min(Confidence::Medium),
        None => base,
    }
}

/// Keep all distinct normalized values; on a duplicate keep the higher
/// confidence.
fn push_candidate(candidates: &mut Vec<FieldMatch>, candidate: FieldMatch) {
    if let Some(existing) = candidates
        .iter_mut()
        .find(|existing| existing.normalized_value == candidate.normalized_value)
    {
        if candidate.confidence > existing.confidence {
            *existing = candidate;
        }
        return;
    }
    candidates.push(candidate);
}

/// Classify the title's project phase from its keywords.
pub fn classify_phase(title: &str) -> ProjectPhase {
    let lower = title.to_lowercase();
    for (phase, keywords) in PHASE_KEYWORDS {
        for keyword in *keywords {
            if contains_word(&lower, keyword) {
                return *phase;
            }
        }
    }
    ProjectPhase::General
}

/// Substring containment over word boundaries, so "order" does not fire
/// inside "reorder".
fn contains_word(haystack: &str, needle: &str) -> bool {
    let mut start = 0;
    while let Some(offset) = haystack[start..].find(needle) {
        let begin = start + offset;
        let end = begin + needle.len();
        let boundary_before = begin == 0
            || !haystack[..begin].chars().next_back().is_some_and(|c| c.is_alphanumeric());
        let boundary_after =
            end == haystack.len() || !haystack[end..].chars().next().is_some_and(|c| c.is_alphanumeric());
        if boundary_before && boundary_after {
            return true;
        }
        start = end;
    }
    false
}

/// LPO/PO numbers in the title, normalized to `LPO-<n>`.
pub fn extract_lpo_numbers(title: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for caps in RE_LPO.captures_iter(title) {
        let value = format!("LPO-{}", &caps[1]);
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

#[cfg(test)]
#[path = "tests/extractor_tests.rs"]
mod tests;
