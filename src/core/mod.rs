//! Core data types for device mapping.
//!
//! - [`MappingInput`]: one immutable vendor record
//! - [`ExtractedFeatures`]: attributes recovered from text, enriched by knowledge bases
//! - [`MatchCandidate`]: a proposed catalog capacity with score and strategy
//! - [`MatchResult`]: the typed outcome of one mapping
//! - [`MappingContext`]: per-invocation audit log and cross-stage metadata
//!
//! ## Data flow
//!
//! One input yields one feature set, zero or more candidates and exactly one
//! result. The context is owned by the engine call that created it.

pub mod candidate;
pub mod context;
pub mod error;
pub mod features;
pub mod input;
pub mod result;
pub mod types;

pub use candidate::MatchCandidate;
pub use context::{MappingContext, PipelineStage};
pub use error::MappingError;
pub use features::ExtractedFeatures;
pub use input::MappingInput;
pub use result::{CapacityGap, MatchResult};
