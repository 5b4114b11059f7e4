//! Canonicalization of raw matched substrings into typed values: dates to
//! ISO form, case numbers to their canonical token shape, site/vendor
//! tokens to the controlled vocabulary.

use deunicode::deunicode;
use regex::Regex;
use std::sync::LazyLock;

use super::vocab::{VocabHit, Vocabulary};
use crate::services::config::MapperSettings;
use crate::types::{Field, MapperError, MapperResult};

static RE_WS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

static RE_DATE_ISO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})[-./](\d{1,2})[-./](\d{1,2})$").expect("Invalid regex")
});
// Years are either 2 or exactly 4 digits; a 3-digit year is a typo, not
// calendar year 2xx.
static RE_DATE_DMY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})[-.](\d{1,2})[-.](\d{4}|\d{2})$").expect("Invalid regex")
});
static RE_DATE_MDY_SLASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4}|\d{2})$").expect("Invalid regex"));
static RE_DATE_TEXTUAL_DMY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})\s+([A-Za-z]+)\.?,?\s+(\d{4}|\d{2})$").expect("Invalid regex")
});
static RE_DATE_TEXTUAL_MDY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]+)\.?\s+(\d{1,2}),?\s+(\d{4}|\d{2})$").expect("Invalid regex")
});

/// Preprocess a raw title for matching: transliterate non-Latin text and
/// collapse whitespace. Casing is preserved; the rule patterns compile
/// case-insensitively.
pub fn preprocess_title(title: &str) -> String {
    let latin = deunicode(title);
    RE_WS.replace_all(latin.trim(), " ").to_string()
}

/// A normalized value plus how fuzzily it resolved (for confidence
/// grading).
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub value: String,
    /// Set when the value resolved through fuzzy vocabulary matching.
    pub fuzzy_score: Option<f64>,
}

impl Normalized {
    fn exact(value: String) -> Self {
        Self { value, fuzzy_score: None }
    }
}

/// Field-value canonicalizer for one run. Borrows the run's vocabulary
/// and carries the configured pivot and fuzzy threshold.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    vocab: &'a Vocabulary,
    pivot_year: i32,
    fuzzy_threshold: f64,
}

impl<'a> Normalizer<'a> {
    pub fn new(vocab: &'a Vocabulary, settings: &MapperSettings) -> Self {
        Self {
            vocab,
            pivot_year: settings.date_pivot_year,
            fuzzy_threshold: settings.fuzzy_threshold,
        }
    }

    /// Canonicalize one raw value for one field. Fails with a
    /// normalization error when the value cannot be made canonical; the
    /// caller surfaces the field as unmatched in that case.
    pub fn normalize(&self, field: Field, raw: &str) -> MapperResult<Normalized> {
        match field {
            Field::CaseNumber => Ok(Normalized::exact(normalize_case_token(raw)?)),
            Field::Date => Ok(Normalized::exact(normalize_date(raw, self.pivot_year)?)),
            Field::Site => {
                let (value, hit) = self.vocab.lookup_site(raw, self.fuzzy_threshold)?;
                Ok(match hit {
                    VocabHit::Exact => Normalized::exact(value),
                    VocabHit::Fuzzy(score) => Normalized { value, fuzzy_score: Some(score) },
                })
            }
            Field::Vendor => {
                let (value, hit) = self.vocab.lookup_vendor(raw, self.fuzzy_threshold)?;
                Ok(match hit {
                    VocabHit::Exact => Normalized::exact(value),
                    VocabHit::Fuzzy(score) => Normalized { value, fuzzy_score: Some(score) },
                })
            }
        }
    }
}

/// Canonical case-number token shape: uppercase, single-spaced, no
/// surrounding punctuation.
fn normalize_case_token(raw: &str) -> MapperResult<String> {
    let cleaned = RE_WS
        .replace_all(raw.trim().trim_matches(|c: char| "():,.".contains(c)), " ")
        .to_uppercase();
    if cleaned.is_empty() {
        return Err(MapperError::Normalization("empty case number".into()));
    }
    Ok(cleaned)
}

/// Resolve a possibly 2-digit year against the pivot: `yy >= pivot` is
/// 19yy, below it 20yy. 4-digit years pass through.
fn resolve_year(year: i32, pivot: i32) -> i32 {
    if year >= 100 {
        year
    } else if year >= pivot {
        1900 + year
    } else {
        2000 + year
    }
}

fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.to_lowercase().chars().take(3).collect();
    let number = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(number)
}

/// Normalize a raw date string to `YYYY-MM-DD`.
///
/// Accepted forms: `YYYY-MM-DD` / `YYYY.MM.DD` / `YYYY/MM/DD`,
/// day-month-year with dashes or dots (`25-12-20`, `25-12-2020`),
/// month/day/year with slashes (`12/25/20`), and textual forms
/// (`25 Dec 2020`, `Dec 25, 2020`). Calendar validity is enforced:
/// `31-02-2024` is an error, never defaulted.
pub fn normalize_date(raw: &str, pivot: i32) -> MapperResult<String> {
    let text = raw.trim();

    let (year, month, day) = if let Some(caps) = RE_DATE_ISO.captures(text) {
        (parse_num(&caps[1]), parse_num(&caps[2]), parse_num(&caps[3]))
    } else if let Some(caps) = RE_DATE_DMY.captures(text) {
        (parse_num(&caps[3]), parse_num(&caps[2]), parse_num(&caps[1]))
    } else if let Some(caps) = RE_DATE_MDY_SLASH.captures(text) {
        (parse_num(&caps[3]), parse_num(&caps[1]), parse_num(&caps[2]))
    } else if let Some(caps) = RE_DATE_TEXTUAL_DMY.captures(text) {
        let month = month_number(&caps[2]).ok_or_else(|| {
            MapperError::Normalization(format!("unknown month name in date: {text:?}"))
        })?;
        (parse_num(&caps[3]), month as i32, parse_num(&caps[1]))
    } else if let Some(caps) = RE_DATE_TEXTUAL_MDY.captures(text) {
        let month = month_number(&caps[1]).ok_or_else(|| {
            MapperError::Normalization(format!("unknown month name in date: {text:?}"))
        })?;
        (parse_num(&caps[3]), month as i32, parse_num(&caps[2]))
    } else {
        return Err(MapperError::Normalization(format!("unrecognized date form: {text:?}")));
    };

    let year = resolve_year(year, pivot);
    let date = chrono::NaiveDate::from_ymd_opt(year, month as u32, day as u32).ok_or_else(
        || MapperError::Normalization(format!("invalid calendar date: {text:?}")),
    )?;
    Ok(date.format("%Y-%m-%d").to_string())
}

fn parse_num(digits: &str) -> i32 {
    // Capture groups above are digit-only.
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
#[path = "tests/normalizer_tests.rs"]
mod tests;
