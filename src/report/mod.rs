//! Reporting utilities: formatted derived values and the dimensions table.

pub mod format;

pub use format::*;
