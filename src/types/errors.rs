use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapperError {
    /// Invalid rule definitions. Fatal: a run cannot start without a
    /// usable rule set.
    #[error("Rule load error: {0}")]
    RuleLoad(String),
    /// A raw value could not be canonicalized. Local: the field surfaces
    /// as unmatched for that title.
    #[error("Normalization error: {0}")]
    Normalization(String),
    /// A single item failed during batch mapping. Local: the item yields
    /// an error-marked result, the batch continues.
    #[error("Extraction item error: {0}")]
    ExtractionItem(String),
    /// Invalid configuration value. Fatal at startup.
    #[error("Config error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for MapperError {
    fn from(error: std::io::Error) -> Self {
        MapperError::Io(error.to_string())
    }
}

impl Serialize for MapperError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

pub type MapperResult<T> = Result<T, MapperError>;

#[cfg(test)]
#[path = "tests/errors_tests.rs"]
mod tests;
