//! `neck-templates` library crate.
//!
//! The binary (`neckgen`) is a thin wrapper around this library so that:
//!
//! - the geometry pipeline is testable without spawning processes
//! - other front-ends (a web UI, a batch job) can call `app::pipeline` directly
//! - the core stays free of file I/O
//!
//! Pipeline: `params` (validate) -> `derived` -> `geometry` -> `render`.

pub mod app;
pub mod cli;
pub mod derived;
pub mod domain;
pub mod error;
pub mod geometry;
pub mod io;
pub mod math;
pub mod params;
pub mod render;
pub mod report;
