//! Parameter catalog and request validation.

pub mod registry;
pub mod validate;

pub use registry::*;
pub use validate::*;
