//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the knowledge-area enumeration (`KnowledgeArea`)
//! - normalized, classified student records (`Record`) and column presence (`Schema`)
//! - aggregation outputs (`AreaSummary`) and degraded-capability notices (`Advisory`)

pub mod types;

pub use types::*;
