//! Input/output helpers.
//!
//! - header canonicalization + field resolution (`schema`)
//! - CSV ingest + classification (`ingest`)
//! - summary/record exports (CSV/JSON) (`export`)
//! - Markdown report snapshots (`snapshot`)

pub mod export;
pub mod ingest;
pub mod schema;
pub mod snapshot;

pub use export::*;
pub use ingest::*;
pub use schema::*;
pub use snapshot::*;
