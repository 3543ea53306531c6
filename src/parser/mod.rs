//! Decoding of DAS responses and input documents
//!
//! This module turns wire documents into the plain records the classifier
//! and the entity store work with.

pub mod das;
pub mod mijson;
pub mod sanitize;

pub use das::{parse_features, parse_sequence};
pub use mijson::{load_entities, read_entities};
