//! Mathematical utilities: circular arcs and fret spacing.

pub mod arc;
pub mod frets;

pub use arc::*;
pub use frets::*;
