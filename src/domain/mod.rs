//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the typed, validated parameter set (`ParameterSet`, `InstrumentFamily`)
//! - derived measurements (`DerivedValues`)
//! - generated geometry (`GeometryView`, `PointGroup`, `TextAnchor`, `BoundingBox`)
//! - request/response shapes (`ValidationResult`, `GenerateResponse`, `DerivedResponse`)

pub mod types;

pub use types::*;
