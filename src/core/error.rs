use serde::Serialize;
use thiserror::Error;

use crate::catalog::CatalogError;

/// Errors that end a mapping with `MatchStatus::Error`.
///
/// "No candidate" and "filtered to empty" are not errors; they produce
/// `MatchStatus::NoMatch`.
///
/// Serialized as `{"code": "<machine code>", "detail": "..."}`.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "detail")]
pub enum MappingError {
    #[error("Invalid input: {0}")]
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput(String),

    #[error("Could not detect a supported device type in '{0}'")]
    #[serde(rename = "UNDETECTED_DEVICE_TYPE")]
    UndetectedDeviceType(String),

    #[error("Catalog error: {0}")]
    #[serde(rename = "CATALOG_ERROR")]
    Catalog(String),

    #[error("Internal error: {0}")]
    #[serde(rename = "INTERNAL_ERROR")]
    Internal(String),
}

impl MappingError {
    /// Stable machine code reported to callers
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::UndetectedDeviceType(_) => "UNDETECTED_DEVICE_TYPE",
            Self::Catalog(_) => "CATALOG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether retrying the same input can change the outcome.
    /// Only backend failures qualify; the pipeline itself is deterministic.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Catalog(_))
    }
}

impl From<CatalogError> for MappingError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err.to_string())
    }
}
