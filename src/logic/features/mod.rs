//! Features Module - Feature Extraction Engine
//!
//! Turns raw audit-log events into the normalized vectors the clustering
//! engine consumes. The layout is versioned; see `layout.rs`.

// Allow unused - some exports for future use
#![allow(unused)]

pub mod extractor;
pub mod layout;
pub mod vector;


// Re-export common types
pub use extractor::extract_features;
pub use layout::{FEATURE_COUNT, FEATURE_VERSION};
pub use vector::FeatureVector;
