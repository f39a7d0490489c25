//! Utility functions shared across layers.
//!
//! - [`hash_generator`] - Short hash generation
//! - [`url_validator`] - Source URL validation

pub mod hash_generator;
pub mod url_validator;
