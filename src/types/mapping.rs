//! Data model for the title-mapping pipeline: raw items in, field matches
//! and case summaries out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Semantic field extracted from a title.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Field {
    CaseNumber,
    Date,
    Site,
    Vendor,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::CaseNumber, Field::Date, Field::Site, Field::Vendor];
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::CaseNumber => write!(f, "CASE_NUMBER"),
            Field::Date => write!(f, "DATE"),
            Field::Site => write!(f, "SITE"),
            Field::Vendor => write!(f, "VENDOR"),
        }
    }
}

/// Matching confidence. Ordered so that `High > Medium > Low`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::High => write!(f, "High"),
            Confidence::Medium => write!(f, "Medium"),
            Confidence::Low => write!(f, "Low"),
        }
    }
}

/// Passthrough context supplied by the external folder/email scanner.
/// Carried unmodified onto the mapping result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
}

impl ItemContext {
    pub fn is_empty(&self) -> bool {
        self.modified.is_none() && self.size.is_none() && self.sender.is_none()
    }
}

/// One raw title to map: a folder name or an email subject, plus an opaque
/// source key (folder path or message id). Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTitleItem {
    pub source_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "ItemContext::is_empty")]
    pub context: ItemContext,
}

impl RawTitleItem {
    pub fn new(source_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            title: title.into(),
            context: ItemContext::default(),
        }
    }
}

/// A single extracted value for one field of one title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMatch {
    pub field: Field,
    pub raw_value: String,
    pub normalized_value: String,
    pub confidence: Confidence,
    /// Id of the pattern rule that produced the raw capture.
    pub rule_id: String,
}

/// Project phase classified from title keywords.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ProjectPhase {
    Procurement,
    Shipping,
    Customs,
    Logistics,
    Installation,
    Testing,
    Certification,
    General,
}

impl std::fmt::Display for ProjectPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProjectPhase::Procurement => "procurement",
            ProjectPhase::Shipping => "shipping",
            ProjectPhase::Customs => "customs",
            ProjectPhase::Logistics => "logistics",
            ProjectPhase::Installation => "installation",
            ProjectPhase::Testing => "testing",
            ProjectPhase::Certification => "certification",
            ProjectPhase::General => "general",
        };
        write!(f, "{name}")
    }
}

/// Extraction outcome for one title. Created once per `RawTitleItem`,
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingResult {
    pub source_id: String,
    /// Candidates per field, best first.
    pub matches: BTreeMap<Field, Vec<FieldMatch>>,
    /// Fields with no usable match for this title.
    pub unmatched_fields: BTreeSet<Field>,
    pub phase: ProjectPhase,
    /// LPO/PO numbers found in the title, normalized to `LPO-<n>`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lpo_numbers: Vec<String>,
    /// Set when the item failed during batch mapping instead of being
    /// extracted. An error-marked result still counts toward the 1:1
    /// input/output correspondence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "ItemContext::is_empty")]
    pub context: ItemContext,
    pub extracted_at: DateTime<Utc>,
}

impl MappingResult {
    /// Result for an item that failed during batch mapping. All fields
    /// unmatched, error marker set.
    pub fn errored(source_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            matches: BTreeMap::new(),
            unmatched_fields: Field::ALL.into_iter().collect(),
            phase: ProjectPhase::General,
            lpo_numbers: Vec::new(),
            error: Some(error.into()),
            context: ItemContext::default(),
            extracted_at: Utc::now(),
        }
    }

    /// Best candidate for a field, if any.
    pub fn best(&self, field: Field) -> Option<&FieldMatch> {
        self.matches.get(&field).and_then(|candidates| candidates.first())
    }
}

/// Aggregated, deduplicated view of one case number across all
/// contributing titles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseSummary {
    pub case_number: String,
    pub dates: BTreeSet<String>,
    pub sites: BTreeSet<String>,
    pub vendors: BTreeSet<String>,
    pub source_ids: BTreeSet<String>,
    pub phases: BTreeSet<ProjectPhase>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub lpo_numbers: BTreeSet<String>,
    /// Fields where contributing items disagree. Conflicts are surfaced,
    /// never auto-resolved.
    pub conflict_flags: BTreeSet<Field>,
    /// Highest-confidence match per field, for consumers that need a
    /// single representative value.
    pub best: BTreeMap<Field, FieldMatch>,
}

impl CaseSummary {
    pub fn new(case_number: impl Into<String>) -> Self {
        Self {
            case_number: case_number.into(),
            dates: BTreeSet::new(),
            sites: BTreeSet::new(),
            vendors: BTreeSet::new(),
            source_ids: BTreeSet::new(),
            phases: BTreeSet::new(),
            lpo_numbers: BTreeSet::new(),
            conflict_flags: BTreeSet::new(),
            best: BTreeMap::new(),
        }
    }
}

/// Final artifact of a run: case-keyed summaries plus the bucket of items
/// that could not be attributed to any case number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseMap {
    pub cases: BTreeMap<String, CaseSummary>,
    /// Keyed by source_id. Items here yielded no CASE_NUMBER match and are
    /// never silently dropped.
    pub unassigned: BTreeMap<String, MappingResult>,
}

/// Per-field tallies for the run summary. Items that failed in batch
/// mapping count as `errors`, not as genuine non-matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldCounts {
    pub matched: usize,
    pub unmatched: usize,
    pub errors: usize,
}

/// One case ranked by how many source items contributed to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseActivity {
    pub case_number: String,
    pub source_count: usize,
}

/// Observable degradation report: how many items matched, missed, or
/// errored, per field and overall, plus the case/site/vendor rollups of
/// the run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_items: usize,
    pub error_items: usize,
    pub unassigned_items: usize,
    pub total_cases: usize,
    pub field_counts: BTreeMap<Field, FieldCounts>,
    pub phase_counts: BTreeMap<ProjectPhase, usize>,
    /// Busiest cases by contributing source count, descending.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_cases: Vec<CaseActivity>,
    /// Distinct cases seen per site code.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub site_counts: BTreeMap<String, usize>,
    /// Distinct cases seen per vendor.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub vendor_counts: BTreeMap<String, usize>,
}
