//! Derived-value calculation (taper, arc rise, flat area, fret positions).

pub mod calculator;

pub use calculator::*;
