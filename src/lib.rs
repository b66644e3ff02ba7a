//! # device-matcher
//!
//! A library for mapping noisy vendor device listings to exact catalog capacities.
//!
//! Marketplace feeds describe the same phone or laptop in dozens of ways:
//! "iPhone 13 Pro 128GB", "Apple iPhone13 Pro (128 GB) - Graphite",
//! "MacBook Pro 16\" M3 Max 16-Core CPU 40-Core GPU A2991 10/2023 8TB SSD".
//! The catalog, on the other hand, has one row per model revision and one
//! child row per storage size.
//!
//! `device-matcher` bridges the two with a per-family pipeline: extract
//! attributes from the text, fill gaps from a static knowledge base, retrieve
//! candidates by hardware id, name or generation, narrow them with a rule
//! chain and pick one with a documented tie-break.
//!
//! ## Features
//!
//! - **Family engines**: iPhone, iPad, MacBook, Mac desktops and Samsung Galaxy
//! - **Hardware-id matching**: Apple model numbers and Samsung model codes are the strongest key
//! - **No silent fallthrough**: a recognized model without the requested capacity is reported, never swapped for a different model
//! - **Capacity suggestions**: lists the storage sizes a recognized model is missing, using the whole feed as evidence
//! - **Audit trail**: every mapping carries a stage-by-stage log and metadata
//!
//! ## Example
//!
//! ```rust,no_run
//! use device_matcher::{DeviceCatalog, MappingFacade, MappingInput, MatchingConfig};
//!
//! // Load the embedded device catalog
//! let catalog = DeviceCatalog::load_embedded().unwrap();
//! let facade = MappingFacade::new(&catalog, MatchingConfig::default());
//!
//! let input = MappingInput::new("iPad Pro 12.9-inch M2 Cellular 256GB").unwrap();
//! let result = facade.map(input);
//!
//! if let Some(description) = &result.model_description {
//!     println!("{description}: {:.2}", result.score);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`adapter`]: Routing facade, external record normalization and flattened results
//! - [`catalog`]: Device catalog storage and the read interface
//! - [`core`]: Inputs, features, candidates, results and the mapping context
//! - [`engine`]: Per-family pipelines and tie-break policies
//! - [`knowledge`]: Static release tables used to infer missing attributes
//! - [`matching`]: Candidate retrieval strategies and scoring
//! - [`parsing`]: Per-family feature extractors
//! - [`rules`]: Composable candidate filters
//! - [`cli`]: Command-line interface implementation

pub mod adapter;
pub mod catalog;
pub mod cli;
pub mod core;
pub mod engine;
pub mod knowledge;
pub mod matching;
pub mod parsing;
pub mod rules;
pub mod utils;

// Re-export commonly used types for convenience
pub use adapter::{FlatMatchResult, MappingFacade};
pub use catalog::store::DeviceCatalog;
pub use catalog::CatalogReader;
pub use core::error::MappingError;
pub use core::input::MappingInput;
pub use core::result::MatchResult;
pub use core::types::*;
pub use matching::MatchingConfig;
