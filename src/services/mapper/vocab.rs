//! Controlled vocabulary for site and vendor codes.
//!
//! Lookup is exact-first (case-insensitive against canonical names and
//! aliases), then fuzzy via normalized Levenshtein distance. Below-threshold
//! candidates are rejected, never guessed.

use serde::{Deserialize, Serialize};

use crate::types::{MapperError, MapperResult};

/// One canonical vocabulary value with its accepted aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabEntry {
    pub canonical: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl VocabEntry {
    pub fn new(canonical: &str, aliases: &[&str]) -> Self {
        Self {
            canonical: canonical.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// How a vocabulary lookup resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VocabHit {
    Exact,
    /// Best similarity score that cleared the threshold.
    Fuzzy(f64),
}

/// Site and vendor tables for one rule set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    #[serde(default)]
    pub sites: Vec<VocabEntry>,
    #[serde(default)]
    pub vendors: Vec<VocabEntry>,
}

impl Vocabulary {
    /// Resolve a raw site token to its canonical code.
    pub fn lookup_site(&self, raw: &str, threshold: f64) -> MapperResult<(String, VocabHit)> {
        lookup(&self.sites, raw, threshold)
            .ok_or_else(|| MapperError::Normalization(format!("unknown site token: {raw:?}")))
    }

    /// Resolve a raw vendor token or name to its canonical vendor name.
    pub fn lookup_vendor(&self, raw: &str, threshold: f64) -> MapperResult<(String, VocabHit)> {
        lookup(&self.vendors, raw, threshold)
            .ok_or_else(|| MapperError::Normalization(format!("unknown vendor token: {raw:?}")))
    }
}

fn lookup(entries: &[VocabEntry], raw: &str, threshold: f64) -> Option<(String, VocabHit)> {
    let needle = raw.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    // Exact pass over canonical names and aliases.
    for entry in entries {
        if entry.canonical.to_lowercase() == needle {
            return Some((entry.canonical.clone(), VocabHit::Exact));
        }
        for alias in &entry.aliases {
            if alias.to_lowercase() == needle {
                return Some((entry.canonical.clone(), VocabHit::Exact));
            }
        }
    }

    // Fuzzy pass: best normalized Levenshtein score wins, if it clears
    // the threshold.
    let mut best_score: f64 = 0.0;
    let mut best_entry: Option<&VocabEntry> = None;
    for entry in entries {
        let score = strsim::normalized_levenshtein(&needle, &entry.canonical.to_lowercase());
        if score > best_score {
            best_score = score;
            best_entry = Some(entry);
        }
        for alias in &entry.aliases {
            let alias_score = strsim::normalized_levenshtein(&needle, &alias.to_lowercase());
            if alias_score > best_score {
                best_score = alias_score;
                best_entry = Some(entry);
            }
        }
    }

    if best_score < threshold {
        return None;
    }
    best_entry.map(|entry| (entry.canonical.clone(), VocabHit::Fuzzy(best_score)))
}

/// Default site table from the project's code books.
pub fn default_sites() -> Vec<VocabEntry> {
    vec![
        VocabEntry::new("DAS", &["das site", "das station"]),
        VocabEntry::new("AGI", &["agi site"]),
        VocabEntry::new("MIR", &["mir site"]),
        VocabEntry::new("MIRFA", &["mirfa site", "mirfa station"]),
        VocabEntry::new("GHALLAN", &["ghallan site"]),
        VocabEntry::new("SHU", &["shuweihat", "shuweihat site"]),
        VocabEntry::new("ZAK", &["zakum"]),
    ]
}

/// Default vendor table from the project's code books.
pub fn default_vendors() -> Vec<VocabEntry> {
    vec![
        VocabEntry::new("Hitachi Energy", &["he", "hitachi"]),
        VocabEntry::new("Samsung C&T", &["sct", "samsung"]),
        VocabEntry::new("Siemens", &["sim"]),
        VocabEntry::new("MOSB", &[]),
        VocabEntry::new("ALS", &[]),
        VocabEntry::new("JPTW", &[]),
        VocabEntry::new("GRM", &[]),
        VocabEntry::new("ZENER", &["zen"]),
        VocabEntry::new("Best Way Equipment", &["bwe", "best way"]),
        VocabEntry::new("Falcor Engineering", &["fal", "falcor"]),
        VocabEntry::new("Hanlim Engineering", &["hec", "hanlim"]),
        VocabEntry::new("Super Phoenix", &["spe"]),
        VocabEntry::new("NAF", &[]),
    ]
}

#[cfg(test)]
#[path = "tests/vocab_tests.rs"]
mod tests;
