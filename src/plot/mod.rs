//! Terminal charts for CLI output.

pub mod ascii;

pub use ascii::*;
