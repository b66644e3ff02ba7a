//! Shared validation and normalization helpers.

pub mod validation;
