//! Parameter catalog.
//!
//! The registry is an explicit, immutable table: build it once with
//! `ParameterRegistry::new()` and pass it by reference to the validator and the
//! pipeline. It is also exported as JSON so an external UI can generate its
//! input widgets from it.

use serde::Serialize;
use serde_json::Value;

use crate::domain::{InstrumentFamily, ParameterSet};

/// Registry keys. The validator maps each of these onto a `ParameterSet` field.
pub mod keys {
    pub const INSTRUMENT_NAME: &str = "instrument_name";
    pub const INSTRUMENT_FAMILY: &str = "instrument_family";
    pub const FINGERBOARD_RADIUS: &str = "fingerboard_radius";
    pub const FB_WIDTH_AT_NUT: &str = "fb_width_at_nut";
    pub const FB_WIDTH_AT_END: &str = "fb_width_at_end";
    pub const FB_VISIBLE_HEIGHT_AT_NUT: &str = "fb_visible_height_at_nut";
    pub const FB_VISIBLE_HEIGHT_AT_JOIN: &str = "fb_visible_height_at_join";
    pub const NUM_FRETS: &str = "num_frets";
    pub const NECK_LENGTH: &str = "neck_length";
    pub const VIBRATING_LENGTH: &str = "vibrating_length";
    pub const RADIUS_TEMPLATE_HEIGHT: &str = "radius_template_height";
    pub const SHOW_MEASUREMENTS: &str = "show_measurements";
}

const CATEGORY_GENERAL: &str = "General";
const CATEGORY_FINGERBOARD: &str = "Fingerboard";
const CATEGORY_FRETS: &str = "Frets";
const CATEGORY_TEMPLATE: &str = "Template";
const CATEGORY_DISPLAY: &str = "Display Options";

const CATEGORIES: [&str; 5] = [
    CATEGORY_GENERAL,
    CATEGORY_FINGERBOARD,
    CATEGORY_FRETS,
    CATEGORY_TEMPLATE,
    CATEGORY_DISPLAY,
];

/// How a parameter is typed and constrained.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParameterKind {
    /// Inclusive numeric bounds. `integer` rejects fractional values.
    Number {
        min: f64,
        max: f64,
        step: f64,
        integer: bool,
    },
    Enum {
        options: Vec<EnumOption>,
    },
    #[serde(rename = "string")]
    Text {
        max_length: usize,
    },
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterDefinition {
    pub key: &'static str,
    #[serde(flatten)]
    pub kind: ParameterKind,
    pub default: Value,
    pub unit: &'static str,
    pub label: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    /// Required keys must be present in a request; optional ones fall back to `default`.
    pub required: bool,
}

impl ParameterDefinition {
    fn number(key: &'static str, label: &'static str, default: f64, min: f64, max: f64) -> Self {
        Self {
            key,
            kind: ParameterKind::Number {
                min,
                max,
                step: 0.1,
                integer: false,
            },
            default: Value::from(default),
            unit: "mm",
            label,
            category: CATEGORY_FINGERBOARD,
            description: "",
            required: true,
        }
    }

    fn integer(key: &'static str, label: &'static str, default: u32, min: u32, max: u32) -> Self {
        Self {
            key,
            kind: ParameterKind::Number {
                min: f64::from(min),
                max: f64::from(max),
                step: 1.0,
                integer: true,
            },
            default: Value::from(default),
            unit: "",
            label,
            category: CATEGORY_FRETS,
            description: "",
            required: true,
        }
    }

    fn step(mut self, step: f64) -> Self {
        if let ParameterKind::Number { step: s, .. } = &mut self.kind {
            *s = step;
        }
        self
    }

    fn category(mut self, category: &'static str) -> Self {
        self.category = category;
        self
    }

    fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// Family-specific starting points.
struct FamilyPreset {
    name: &'static str,
    radius: f64,
    width_at_nut: f64,
    width_at_end: f64,
    height_at_nut: f64,
    height_at_join: f64,
    frets: u32,
    neck_length: f64,
    vibrating_length: f64,
}

const DEFAULT_TEMPLATE_HEIGHT: f64 = 40.0;

fn family_preset(family: InstrumentFamily) -> FamilyPreset {
    match family {
        InstrumentFamily::Violin => FamilyPreset {
            name: "Violin",
            radius: 41.0,
            width_at_nut: 24.0,
            width_at_end: 42.0,
            height_at_nut: 3.2,
            height_at_join: 1.2,
            frets: 0,
            neck_length: 270.0,
            vibrating_length: 328.0,
        },
        InstrumentFamily::Viol => FamilyPreset {
            name: "Viol",
            radius: 120.0,
            width_at_nut: 48.0,
            width_at_end: 72.0,
            height_at_nut: 4.0,
            height_at_join: 2.0,
            frets: 7,
            neck_length: 420.0,
            vibrating_length: 690.0,
        },
        InstrumentFamily::Guitar => FamilyPreset {
            name: "Guitar",
            radius: 300.0,
            width_at_nut: 43.0,
            width_at_end: 56.0,
            height_at_nut: 6.5,
            height_at_join: 5.5,
            frets: 20,
            neck_length: 470.0,
            vibrating_length: 650.0,
        },
    }
}

/// Immutable parameter catalog.
#[derive(Debug, Clone)]
pub struct ParameterRegistry {
    definitions: Vec<ParameterDefinition>,
}

impl Default for ParameterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterRegistry {
    pub fn new() -> Self {
        use keys::*;

        let violin = family_preset(InstrumentFamily::Violin);
        let definitions = vec![
            ParameterDefinition {
                key: INSTRUMENT_NAME,
                kind: ParameterKind::Text { max_length: 100 },
                default: Value::from(violin.name),
                unit: "",
                label: "Instrument Name",
                category: CATEGORY_GENERAL,
                description: "Printed on the radius template.",
                required: false,
            },
            ParameterDefinition {
                key: INSTRUMENT_FAMILY,
                kind: ParameterKind::Enum {
                    options: InstrumentFamily::ALL
                        .into_iter()
                        .map(|f| EnumOption {
                            value: f.value(),
                            label: f.display_name(),
                        })
                        .collect(),
                },
                default: Value::from(InstrumentFamily::Violin.value()),
                unit: "",
                label: "Instrument Family",
                category: CATEGORY_GENERAL,
                description: "",
                required: false,
            },
            ParameterDefinition::number(
                FINGERBOARD_RADIUS,
                "Fingerboard Radius",
                violin.radius,
                10.0,
                1000.0,
            )
            .step(0.5)
            .describe("Radius of the cylindrical arc of the fingerboard surface."),
            ParameterDefinition::number(
                FB_WIDTH_AT_NUT,
                "Fingerboard Width at Nut",
                violin.width_at_nut,
                5.0,
                100.0,
            ),
            ParameterDefinition::number(
                FB_WIDTH_AT_END,
                "Fingerboard Width at End",
                violin.width_at_end,
                5.0,
                150.0,
            ),
            ParameterDefinition::number(
                FB_VISIBLE_HEIGHT_AT_NUT,
                "Visible Height at Nut",
                violin.height_at_nut,
                0.1,
                30.0,
            )
            .describe("Fingerboard edge height above the neck at the nut."),
            ParameterDefinition::number(
                FB_VISIBLE_HEIGHT_AT_JOIN,
                "Visible Height at Join",
                violin.height_at_join,
                0.1,
                30.0,
            )
            .describe("Fingerboard edge height above the neck where it meets the body."),
            ParameterDefinition::integer(NUM_FRETS, "Number of Frets", violin.frets, 0, 36),
            ParameterDefinition::number(
                NECK_LENGTH,
                "Fingerboard Length",
                violin.neck_length,
                50.0,
                800.0,
            )
            .step(1.0)
            .describe("Nut to fingerboard end, along the centreline.")
            .optional(),
            ParameterDefinition::number(
                VIBRATING_LENGTH,
                "Vibrating String Length",
                violin.vibrating_length,
                100.0,
                1200.0,
            )
            .step(1.0)
            .category(CATEGORY_FRETS)
            .describe("Scale length used for equal-tempered fret spacing.")
            .optional(),
            ParameterDefinition::number(
                RADIUS_TEMPLATE_HEIGHT,
                "Radius Template Height",
                DEFAULT_TEMPLATE_HEIGHT,
                10.0,
                200.0,
            )
            .step(1.0)
            .category(CATEGORY_TEMPLATE)
            .describe("Height of the radius gauge plate; the legend sits under the arc.")
            .optional(),
            ParameterDefinition {
                key: SHOW_MEASUREMENTS,
                kind: ParameterKind::Boolean,
                default: Value::from(true),
                unit: "",
                label: "Show Measurements",
                category: CATEGORY_DISPLAY,
                description: "Print dimension labels on the templates.",
                required: false,
            },
        ];

        Self { definitions }
    }

    pub fn get(&self, key: &str) -> Option<&ParameterDefinition> {
        self.definitions.iter().find(|d| d.key == key)
    }

    /// All definitions, in display order.
    pub fn definitions(&self) -> &[ParameterDefinition] {
        &self.definitions
    }

    pub fn categories(&self) -> &'static [&'static str] {
        &CATEGORIES
    }

    /// A parameter set made entirely of catalog defaults.
    pub fn defaults(&self) -> ParameterSet {
        self.defaults_for(InstrumentFamily::Violin)
    }

    /// Defaults tuned for an instrument family (fret count, scale, widths, radius).
    pub fn defaults_for(&self, family: InstrumentFamily) -> ParameterSet {
        let preset = family_preset(family);
        ParameterSet {
            instrument_name: preset.name.to_string(),
            instrument_family: family,
            fingerboard_radius: preset.radius,
            fb_width_at_nut: preset.width_at_nut,
            fb_width_at_end: preset.width_at_end,
            fb_visible_height_at_nut: preset.height_at_nut,
            fb_visible_height_at_join: preset.height_at_join,
            num_frets: preset.frets,
            neck_length: preset.neck_length,
            vibrating_length: preset.vibrating_length,
            radius_template_height: DEFAULT_TEMPLATE_HEIGHT,
            show_measurements: true,
        }
    }

    /// Serializable view of the catalog: `{categories, parameters}`.
    pub fn export(&self) -> DefinitionsExport<'_> {
        DefinitionsExport {
            categories: self.categories(),
            parameters: &self.definitions,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.export())
    }
}

#[derive(Debug, Serialize)]
pub struct DefinitionsExport<'a> {
    pub categories: &'static [&'static str],
    pub parameters: &'a [ParameterDefinition],
}
