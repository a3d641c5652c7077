//! Input/output helpers used by the binary.
//!
//! - request/preset JSON and `key=value` overrides (`request`)
//! - SVG and JSON writers (`export`)
//!
//! The library core never touches the filesystem; only `app` calls into here.

pub mod export;
pub mod request;

pub use export::*;
pub use request::*;
