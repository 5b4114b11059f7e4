//! Case-level aggregation: merges mapping results sharing a case number
//! into deduplicated summaries, and tallies the run-level counts.
//!
//! Merging never picks winners: every distinct value is retained in the
//! summary's sets and disagreements are surfaced through `conflict_flags`.
//! The state is owned by a single run and mutated on one logical thread of
//! control (the loop draining the batch mapper's output).

use std::collections::BTreeMap;

use crate::types::{
    CaseActivity, CaseMap, CaseSummary, Field, FieldCounts, FieldMatch, MappingResult, RunSummary,
};

/// How many of the busiest cases the run summary lists.
const TOP_CASES: usize = 10;

#[derive(Debug, Default)]
pub struct Aggregator {
    map: CaseMap,
    summary: RunSummary,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one result. Items without a case-number match land in the
    /// unassigned bucket, keyed by source_id, and are never dropped.
    pub fn push(&mut self, result: MappingResult) {
        self.tally(&result);

        let case_numbers: Vec<String> = result
            .matches
            .get(&Field::CaseNumber)
            .map(|candidates| {
                candidates.iter().map(|m| m.normalized_value.clone()).collect()
            })
            .unwrap_or_default();

        if case_numbers.is_empty() {
            self.map.unassigned.insert(result.source_id.clone(), result);
            return;
        }

        for case_number in case_numbers {
            let summary = self
                .map
                .cases
                .entry(case_number.clone())
                .or_insert_with(|| CaseSummary::new(case_number));
            merge_into(summary, &result);
        }
    }

    /// Drain a whole collection of results.
    pub fn extend(&mut self, results: impl IntoIterator<Item = MappingResult>) {
        for result in results {
            self.push(result);
        }
    }

    /// Finish the run: the case map plus the observable degradation
    /// counts and the case/site/vendor rollups.
    pub fn finish(mut self) -> (CaseMap, RunSummary) {
        self.summary.unassigned_items = self.map.unassigned.len();
        self.summary.total_cases = self.map.cases.len();

        let mut top: Vec<CaseActivity> = self
            .map
            .cases
            .values()
            .map(|case| CaseActivity {
                case_number: case.case_number.clone(),
                source_count: case.source_ids.len(),
            })
            .collect();
        top.sort_by(|a, b| {
            b.source_count.cmp(&a.source_count).then_with(|| a.case_number.cmp(&b.case_number))
        });
        top.truncate(TOP_CASES);
        self.summary.top_cases = top;

        for case in self.map.cases.values() {
            for site in &case.sites {
                *self.summary.site_counts.entry(site.clone()).or_default() += 1;
            }
            for vendor in &case.vendors {
                *self.summary.vendor_counts.entry(vendor.clone()).or_default() += 1;
            }
        }

        (self.map, self.summary)
    }

    fn tally(&mut self, result: &MappingResult) {
        self.summary.total_items += 1;
        if result.error.is_some() {
            self.summary.error_items += 1;
        }
        for field in Field::ALL {
            let counts: &mut FieldCounts = self.summary.field_counts.entry(field).or_default();
            if result.error.is_some() {
                counts.errors += 1;
            } else if result.matches.contains_key(&field) {
                counts.matched += 1;
            } else {
                counts.unmatched += 1;
            }
        }
        *self.summary.phase_counts.entry(result.phase).or_default() += 1;
    }
}

/// One-shot aggregation over an unordered set of results. Deterministic:
/// the summaries are set-valued and the tie-break for representatives is
/// order-independent.
pub fn aggregate(results: impl IntoIterator<Item = MappingResult>) -> (CaseMap, RunSummary) {
    let mut aggregator = Aggregator::new();
    aggregator.extend(results);
    aggregator.finish()
}

fn merge_into(summary: &mut CaseSummary, result: &MappingResult) {
    summary.source_ids.insert(result.source_id.clone());
    summary.phases.insert(result.phase);
    summary.lpo_numbers.extend(result.lpo_numbers.iter().cloned());

    for (field, candidates) in &result.matches {
        for candidate in candidates {
            match field {
                Field::Date => {
                    summary.dates.insert(candidate.normalized_value.clone());
                }
                Field::Site => {
                    summary.sites.insert(candidate.normalized_value.clone());
                }
                Field::Vendor => {
                    summary.vendors.insert(candidate.normalized_value.clone());
                }
                Field::CaseNumber => {
                    // An item can carry several case-number candidates
                    // and join each of their summaries; only the
                    // candidate this summary is keyed by represents it.
                    if candidate.normalized_value != summary.case_number {
                        continue;
                    }
                }
            }
            update_best(&mut summary.best, *field, candidate);
        }
    }

    // A field conflicts when contributing items disagree; all distinct
    // values stay in the sets, resolution is left to the consumer.
    summary.conflict_flags.clear();
    if summary.dates.len() > 1 {
        summary.conflict_flags.insert(Field::Date);
    }
    if summary.sites.len() > 1 {
        summary.conflict_flags.insert(Field::Site);
    }
    if summary.vendors.len() > 1 {
        summary.conflict_flags.insert(Field::Vendor);
    }
}

/// Track the highest-confidence representative per field. Ties break on
/// the lexicographically smaller value so the outcome is independent of
/// arrival order.
fn update_best(best: &mut BTreeMap<Field, FieldMatch>, field: Field, candidate: &FieldMatch) {
    let keep_existing = best.get(&field).is_some_and(|existing| {
        existing.confidence > candidate.confidence
            || (existing.confidence == candidate.confidence
                && existing.normalized_value <= candidate.normalized_value)
    });
    if !keep_existing {
        best.insert(field, candidate.clone());
    }
}

#[cfg(test)]
#[path = "tests/aggregate_tests.rs"]
mod tests;
