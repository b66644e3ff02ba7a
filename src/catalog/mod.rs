//! Device catalog storage and the read interface the matchers query.
//!
//! The catalog holds device models (one row per physical model revision) and
//! their capacity variants (one row per storage size). Matchers never see the
//! storage backend; they go through [`CatalogReader`].
//!
//! An embedded catalog is compiled into the binary, but custom catalogs can
//! also be loaded from JSON files.
//!
//! ## Example
//!
//! ```rust,no_run
//! use device_matcher::catalog::{CatalogReader, ModelQuery};
//! use device_matcher::catalog::store::DeviceCatalog;
//! use device_matcher::core::types::DeviceFamily;
//!
//! let catalog = DeviceCatalog::load_embedded().unwrap();
//!
//! let query = ModelQuery::for_family(DeviceFamily::IPhone).with_term("iPhone 13");
//! for model in catalog.find_models(&query).unwrap() {
//!     println!("{} {}", model.id, model.description);
//! }
//! ```

pub mod model;
pub mod store;

use thiserror::Error;

use crate::core::types::{DeviceFamily, ModelId};
pub use model::{CatalogCapacity, CatalogModel};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// Filter over catalog model rows. Every unset field matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelQuery {
    pub family: Option<DeviceFamily>,
    /// Case-insensitive; exact or substring in either direction
    pub hardware_id: Option<String>,
    /// Every term must appear in the description at word boundaries
    pub terms: Vec<String>,
    /// Models without a year always pass
    pub year: Option<u16>,
}

impl ModelQuery {
    #[must_use]
    pub fn for_family(family: DeviceFamily) -> Self {
        Self {
            family: Some(family),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_hardware_id(mut self, hardware_id: impl Into<String>) -> Self {
        self.hardware_id = Some(hardware_id.into());
        self
    }

    #[must_use]
    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.terms.push(term.into());
        self
    }

    #[must_use]
    pub fn with_year(mut self, year: Option<u16>) -> Self {
        self.year = year;
        self
    }
}

/// Read access to the catalog of models and capacities.
///
/// Implementations must be safe to share between worker threads.
pub trait CatalogReader: Send + Sync {
    /// Model rows matching `query`, in catalog order
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` when the backend cannot be read.
    fn find_models(&self, query: &ModelQuery) -> Result<Vec<CatalogModel>, CatalogError>;

    /// Capacity rows of one model, in catalog order
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` when the backend cannot be read.
    fn capacities_of(&self, model_id: &ModelId) -> Result<Vec<CatalogCapacity>, CatalogError>;

    /// One model row
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` when the backend cannot be read.
    fn model(&self, model_id: &ModelId) -> Result<Option<CatalogModel>, CatalogError>;
}

/// True when `term` occurs in `text` bounded by non-alphanumeric characters.
/// Both sides are compared case-insensitively.
#[must_use]
pub fn contains_term(text: &str, term: &str) -> bool {
    let text = text.to_lowercase();
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }

    let mut start = 0;
    while let Some(pos) = text[start..].find(&term) {
        let begin = start + pos;
        let end = begin + term.len();
        let before_ok = text[..begin]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = text[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        start = begin + term.chars().next().map_or(1, char::len_utf8);
    }
    false
}
