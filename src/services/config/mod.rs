//! Run configuration. Defaults can be overridden through `CASEMAP_*`
//! environment variables, mirroring how the deployment scripts drive the
//! pipeline.

use serde::{Deserialize, Serialize};

use crate::types::{MapperError, MapperResult};

/// Env var overriding the batch size.
pub const ENV_BATCH_SIZE: &str = "CASEMAP_BATCH_SIZE";
/// Env var overriding the fuzzy-match threshold.
pub const ENV_FUZZY_THRESHOLD: &str = "CASEMAP_FUZZY_THRESHOLD";
/// Env var overriding the 2-digit-year pivot.
pub const ENV_DATE_PIVOT: &str = "CASEMAP_DATE_PIVOT";

pub const DEFAULT_BATCH_SIZE: usize = 32;
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.82;

/// Pivot for resolving 2-digit years: `yy >= pivot` is read as 19yy,
/// anything below as 20yy. With the default of 70, "69" means 2069 and
/// "70" means 1970.
pub const DEFAULT_DATE_PIVOT_YEAR: i32 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapperSettings {
    /// Peak concurrency of the batch mapper. Must be > 0.
    pub batch_size: usize,
    /// Minimum normalized-similarity score for a fuzzy vocabulary hit,
    /// in `0.0..=1.0`. Scores below it reject the candidate.
    pub fuzzy_threshold: f64,
    /// 2-digit-year pivot, `0..=99`.
    pub date_pivot_year: i32,
}

impl Default for MapperSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            date_pivot_year: DEFAULT_DATE_PIVOT_YEAR,
        }
    }
}

impl MapperSettings {
    /// Load settings from the environment. Unset variables keep their
    /// defaults; set-but-invalid values are rejected rather than clamped.
    pub fn from_env() -> MapperResult<Self> {
        let mut settings = Self::default();
        if let Some(raw) = read_env(ENV_BATCH_SIZE) {
            settings.batch_size = raw.parse().map_err(|_| invalid(ENV_BATCH_SIZE, &raw))?;
        }
        if let Some(raw) = read_env(ENV_FUZZY_THRESHOLD) {
            settings.fuzzy_threshold =
                raw.parse().map_err(|_| invalid(ENV_FUZZY_THRESHOLD, &raw))?;
        }
        if let Some(raw) = read_env(ENV_DATE_PIVOT) {
            settings.date_pivot_year = raw.parse().map_err(|_| invalid(ENV_DATE_PIVOT, &raw))?;
        }
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> MapperResult<()> {
        if self.batch_size == 0 {
            return Err(MapperError::Config("batch_size must be > 0".into()));
        }
        if !(0.0..=1.0).contains(&self.fuzzy_threshold) {
            return Err(MapperError::Config(format!(
                "fuzzy_threshold must be within 0..=1, got {}",
                self.fuzzy_threshold
            )));
        }
        if !(0..=99).contains(&self.date_pivot_year) {
            return Err(MapperError::Config(format!(
                "date_pivot_year must be within 0..=99, got {}",
                self.date_pivot_year
            )));
        }
        Ok(())
    }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn invalid(name: &str, raw: &str) -> MapperError {
    MapperError::Config(format!("invalid {name}: {raw:?}"))
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
