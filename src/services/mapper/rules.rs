//! Pattern rule set: the ordered extraction rules for every field, plus
//! the site/vendor vocabulary, loaded together from one JSON document.
//!
//! Loading is total-or-fail: an unparsable pattern, a duplicate rule id or
//! a second authoritative rule for a field rejects the whole document. The
//! built-in catalog mirrors the project's accumulated title conventions
//! (HVDC-ADOPT codes, generic HVDC codes, JPTW/GRM pairs, parenthesised
//! shorthand, trailing identifiers, the usual date shapes).

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use super::vocab::{default_sites, default_vendors, Vocabulary};
use crate::types::{Field, MapperError, MapperResult};

/// Canonical-shape hint applied to a rule's captures before
/// normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Postprocess {
    /// `(HE-0427)` style shorthand: compose `HVDC-ADOPT-<vendor>-<num>`
    /// from the `vendor` and `num` captures.
    AdoptPrefix,
    /// `JPTW-71 / GRM-123` pairs: compose `HVDC-AGI-JPTW<j>-GRM<g>` from
    /// the `jptw` and `grm` captures.
    JptwGrmPair,
    /// Uppercase the full match.
    Uppercase,
}

/// One extraction rule. Lower priority runs first; the authoritative rule
/// for a field, if any, always runs before the fallbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRule {
    pub id: String,
    pub field: Field,
    /// Pattern text, compiled case-insensitively. Named capture groups
    /// feed the postprocess hint.
    pub pattern: String,
    pub priority: i32,
    #[serde(default)]
    pub authoritative: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postprocess: Option<Postprocess>,
}

/// On-disk shape of a rule definition document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleDocument {
    pub rules: Vec<PatternRule>,
    #[serde(default)]
    pub vocabulary: Vocabulary,
}

impl RuleDocument {
    /// The built-in rule catalog. Used when no rule file is supplied.
    pub fn builtin() -> Self {
        let rule = |id: &str, field: Field, pattern: &str, priority: i32, authoritative: bool, postprocess: Option<Postprocess>| {
            PatternRule {
                id: id.to_string(),
                field,
                pattern: pattern.to_string(),
                priority,
                authoritative,
                postprocess,
            }
        };

        Self {
            rules: vec![
                // Case numbers, most specific shape first.
                rule(
                    "case_adopt",
                    Field::CaseNumber,
                    r"\bHVDC-ADOPT-(?P<vendor>[A-Z]+)-(?P<num>[0-9]{3,5}(?:-[0-9A-Z]+)*)\b",
                    10,
                    true,
                    Some(Postprocess::Uppercase),
                ),
                rule(
                    "case_generic",
                    Field::CaseNumber,
                    r"\bHVDC-(?P<site>[A-Z]+)-(?P<vendor>[A-Z0-9]+)-(?P<num>[A-Z0-9]+(?:-[0-9A-Z]+)*)\b",
                    20,
                    false,
                    Some(Postprocess::Uppercase),
                ),
                rule(
                    "case_jptw_grm",
                    Field::CaseNumber,
                    r"\bJPTW-(?P<jptw>\d+)\s*/\s*GRM-(?P<grm>\d+)\b",
                    30,
                    false,
                    Some(Postprocess::JptwGrmPair),
                ),
                rule(
                    "case_paren_short",
                    Field::CaseNumber,
                    r"[(,]\s*(?P<vendor>[A-Z]{2,4})-(?P<num>\d{3,5}(?:-\d[0-9A-Z]*)?)\b",
                    40,
                    false,
                    Some(Postprocess::AdoptPrefix),
                ),
                rule(
                    "case_trailing",
                    Field::CaseNumber,
                    r":\s*(?P<value>[A-Z]+(?:-[A-Z0-9]+){2,})\b",
                    50,
                    false,
                    Some(Postprocess::Uppercase),
                ),
                // Dates. The normalizer owns form parsing and calendar
                // validation; rules only locate the raw substrings.
                rule(
                    "date_iso",
                    Field::Date,
                    r"\b(?P<value>\d{4}[-./]\d{1,2}[-./]\d{1,2})\b",
                    10,
                    true,
                    None,
                ),
                rule(
                    "date_dmy",
                    Field::Date,
                    r"\b(?P<value>\d{1,2}-\d{1,2}-\d{2,4})\b",
                    20,
                    false,
                    None,
                ),
                rule(
                    "date_mdy_slash",
                    Field::Date,
                    r"\b(?P<value>\d{1,2}/\d{1,2}/\d{2,4})\b",
                    30,
                    false,
                    None,
                ),
                rule(
                    "date_textual",
                    Field::Date,
                    r"\b(?P<value>\d{1,2}\s+(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\.?,?\s+\d{2,4})\b",
                    40,
                    false,
                    None,
                ),
                rule(
                    "date_textual_mdy",
                    Field::Date,
                    r"\b(?P<value>(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\.?\s+\d{1,2},?\s+\d{2,4})\b",
                    50,
                    false,
                    None,
                ),
                // Site codes: bare tokens first, then "<name> site/station"
                // phrases resolved through the vocabulary.
                rule(
                    "site_token",
                    Field::Site,
                    r"\b(?P<value>MIRFA|GHALLAN|DAS|AGI|MIR|SHU|ZAK)\b",
                    10,
                    true,
                    None,
                ),
                rule(
                    "site_phrase",
                    Field::Site,
                    r"\b(?P<value>[A-Za-z]{3,12})\s+(?:site|station|substation)\b",
                    20,
                    false,
                    None,
                ),
                // Vendor codes and spelled-out vendor names.
                rule(
                    "vendor_token",
                    Field::Vendor,
                    r"\b(?P<value>HE|SCT|SIM|MOSB|ALS|ZEN|BWE|FAL|HEC|SPE|NAF|JPTW|GRM)\b",
                    10,
                    true,
                    None,
                ),
                rule(
                    "vendor_name",
                    Field::Vendor,
                    r"\b(?P<value>Hitachi(?:\s+Energy)?|Samsung(?:\s+C&T)?|Siemens|ZENER|Best\s+Way(?:\s+Equipment)?|Falcor(?:\s+Engineering)?|Hanlim(?:\s+Engineering)?|Super\s+Phoenix)\b",
                    20,
                    false,
                    None,
                ),
            ],
            vocabulary: Vocabulary {
                sites: default_sites(),
                vendors: default_vendors(),
            },
        }
    }
}

/// A rule with its compiled matcher.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub rule: PatternRule,
    pub regex: Regex,
}

/// Validated, immutable rule set for one run. Loaded once, passed
/// explicitly to every component.
#[derive(Debug, Clone)]
pub struct PatternRuleSet {
    by_field: BTreeMap<Field, Vec<CompiledRule>>,
    vocabulary: Vocabulary,
}

impl PatternRuleSet {
    /// Compile and validate a rule document. Fails atomically: on any
    /// error the caller gets no rule set at all.
    pub fn from_document(document: RuleDocument) -> MapperResult<Self> {
        if document.rules.is_empty() {
            return Err(MapperError::RuleLoad("rule document contains no rules".into()));
        }

        let mut seen_ids: HashSet<String> = HashSet::new();
        let mut authoritative_seen: HashSet<Field> = HashSet::new();
        let mut by_field: BTreeMap<Field, Vec<CompiledRule>> = BTreeMap::new();

        for rule in document.rules {
            if rule.id.trim().is_empty() {
                return Err(MapperError::RuleLoad("rule with empty id".into()));
            }
            if !seen_ids.insert(rule.id.clone()) {
                return Err(MapperError::RuleLoad(format!("duplicate rule id: {}", rule.id)));
            }
            if rule.authoritative && !authoritative_seen.insert(rule.field) {
                return Err(MapperError::RuleLoad(format!(
                    "duplicate authoritative rule for field {}: {}",
                    rule.field, rule.id
                )));
            }
            let regex = RegexBuilder::new(&rule.pattern)
                .case_insensitive(true)
                .build()
                .map_err(|error| {
                    MapperError::RuleLoad(format!("rule {}: invalid pattern: {error}", rule.id))
                })?;
            by_field.entry(rule.field).or_default().push(CompiledRule { rule, regex });
        }

        // Authoritative rule first, then fallbacks by ascending priority.
        for rules in by_field.values_mut() {
            rules.sort_by(|a, b| {
                b.rule
                    .authoritative
                    .cmp(&a.rule.authoritative)
                    .then(a.rule.priority.cmp(&b.rule.priority))
                    .then_with(|| a.rule.id.cmp(&b.rule.id))
            });
        }

        Ok(Self {
            by_field,
            vocabulary: document.vocabulary,
        })
    }

    /// Parse and validate a JSON rule document.
    pub fn from_json(json: &str) -> MapperResult<Self> {
        let document: RuleDocument = serde_json::from_str(json)
            .map_err(|error| MapperError::RuleLoad(format!("invalid rule document: {error}")))?;
        Self::from_document(document)
    }

    /// Load a rule definition file.
    pub fn load(path: &Path) -> MapperResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|error| {
            MapperError::RuleLoad(format!("cannot read {}: {error}", path.display()))
        })?;
        Self::from_json(&contents)
    }

    /// The built-in rule catalog, compiled.
    pub fn builtin() -> Self {
        // The built-in catalog is covered by tests; compiling it cannot
        // fail at runtime.
        Self::from_document(RuleDocument::builtin()).expect("built-in rule catalog is valid")
    }

    /// Rules for one field, authoritative first, then by priority.
    pub fn rules_for(&self, field: Field) -> &[CompiledRule] {
        self.by_field.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }
}

#[cfg(test)]
#[path = "tests/rules_tests.rs"]
mod tests;
