//! Vector output.
//!
//! Only SVG today. Rendering is a pure `GeometryView -> String` step; writing
//! files is the binary's job (`io::export`).

pub mod svg;

pub use self::svg::{RenderOptions, SVG_MARGIN, fmt_coord, render, render_with};
