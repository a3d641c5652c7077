//! Formatted measurements and the plain-text dimensions table.
//!
//! We keep formatting code in one place so:
//! - the geometry and derived math stay free of string handling
//! - label text and the CLI table agree on how a millimetre value looks

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::domain::{DerivedValues, ParameterSet};
use crate::params::ParameterRegistry;

/// Display metadata for one derived value (for an external UI).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedMeta {
    pub key: &'static str,
    pub display_name: &'static str,
    pub unit: &'static str,
    pub decimals: usize,
    pub category: &'static str,
    pub order: u32,
    pub visible: bool,
}

static DERIVED_META: [DerivedMeta; 8] = [
    DerivedMeta {
        key: "taper_rate",
        display_name: "Taper Rate",
        unit: "mm/mm",
        decimals: 4,
        category: "Fingerboard",
        order: 1,
        visible: true,
    },
    DerivedMeta {
        key: "arc_sagitta",
        display_name: "Arc Height at End",
        unit: "mm",
        decimals: 2,
        category: "Fingerboard",
        order: 2,
        visible: true,
    },
    DerivedMeta {
        key: "arc_sagitta_at_nut",
        display_name: "Arc Height at Nut",
        unit: "mm",
        decimals: 2,
        category: "Fingerboard",
        order: 3,
        visible: true,
    },
    DerivedMeta {
        key: "fb_center_height_at_nut",
        display_name: "Centre Height at Nut",
        unit: "mm",
        decimals: 2,
        category: "Fingerboard",
        order: 4,
        visible: true,
    },
    DerivedMeta {
        key: "fb_center_height_at_join",
        display_name: "Centre Height at Join",
        unit: "mm",
        decimals: 2,
        category: "Fingerboard",
        order: 5,
        visible: true,
    },
    DerivedMeta {
        key: "flat_area_height",
        display_name: "Template Flat Area",
        unit: "mm",
        decimals: 1,
        category: "Template",
        order: 6,
        visible: true,
    },
    DerivedMeta {
        key: "template_width",
        display_name: "Template Width",
        unit: "mm",
        decimals: 1,
        category: "Template",
        order: 7,
        visible: true,
    },
    DerivedMeta {
        key: "fret_distances",
        display_name: "Fret Positions",
        unit: "mm",
        decimals: 1,
        category: "Frets",
        order: 8,
        visible: false,
    },
];

/// Metadata for every formatted derived value, in display order.
pub fn derived_metadata() -> &'static [DerivedMeta] {
    &DERIVED_META
}

/// Millimetre value with at most two decimals and no trailing zeros ("41", "3.2").
pub fn format_mm(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

fn format_with_unit(v: f64, decimals: usize, unit: &str) -> String {
    if unit.is_empty() {
        format!("{v:.decimals$}")
    } else {
        format!("{v:.decimals$} {unit}")
    }
}

/// Display strings for the derived values, keyed like the `DerivedValues` fields.
pub fn format_derived(values: &DerivedValues) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for meta in derived_metadata() {
        let text = match meta.key {
            "taper_rate" => format_with_unit(values.taper_rate, meta.decimals, meta.unit),
            "arc_sagitta" => format_with_unit(values.arc_sagitta, meta.decimals, meta.unit),
            "arc_sagitta_at_nut" => {
                format_with_unit(values.arc_sagitta_at_nut, meta.decimals, meta.unit)
            }
            "fb_center_height_at_nut" => {
                format_with_unit(values.fb_center_height_at_nut, meta.decimals, meta.unit)
            }
            "fb_center_height_at_join" => {
                format_with_unit(values.fb_center_height_at_join, meta.decimals, meta.unit)
            }
            "flat_area_height" => {
                format_with_unit(values.flat_area_height, meta.decimals, meta.unit)
            }
            "template_width" => format_with_unit(values.template_width, meta.decimals, meta.unit),
            "fret_distances" => fmt_list(&values.fret_distances, meta.decimals, meta.unit),
            _ => continue,
        };
        out.insert(meta.key.to_string(), text);
    }
    out
}

/// Plain-text summary of inputs, derived values and fret positions.
pub fn format_dimensions_table(
    registry: &ParameterRegistry,
    params: &ParameterSet,
    values: &DerivedValues,
) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "=== {} ({}) ===\n",
        params.instrument_name,
        params.instrument_family.display_name()
    ));

    let raw = params.to_raw();
    for category in registry.categories() {
        let defs: Vec<_> = registry
            .definitions()
            .iter()
            .filter(|d| d.category == *category)
            .collect();
        if defs.is_empty() {
            continue;
        }
        out.push_str(&format!("\n{category}:\n"));
        for def in defs {
            let value = raw.get(def.key).map(fmt_param).unwrap_or_default();
            let line = format!("  {:<28} {value} {}", truncate(def.label, 28), def.unit);
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }

    out.push_str("\nDerived:\n");
    let formatted = format_derived(values);
    for meta in derived_metadata().iter().filter(|m| m.visible) {
        if let Some(text) = formatted.get(meta.key) {
            out.push_str(&format!("  {:<28} {text}\n", meta.display_name));
        }
    }

    if !values.fret_distances.is_empty() {
        out.push_str("\nFret positions:\n");
        out.push_str(&format!("  {:>4} {:>10} {:>8}\n", "fret", "from nut", "fraction"));
        out.push_str(&format!("  {:->4} {:->10} {:->8}\n", "", "", ""));
        for (i, (d, f)) in values
            .fret_distances
            .iter()
            .zip(&values.fret_positions)
            .enumerate()
        {
            out.push_str(&format!("  {:>4} {:>10.2} {:>8.4}\n", i + 1, d, f));
        }
    }

    out
}

fn fmt_param(v: &Value) -> String {
    match v {
        Value::Number(n) => n.as_f64().map(format_mm).unwrap_or_else(|| n.to_string()),
        Value::String(s) => s.clone(),
        Value::Bool(b) => String::from(if *b { "yes" } else { "no" }),
        other => other.to_string(),
    }
}

fn fmt_list(v: &[f64], decimals: usize, unit: &str) -> String {
    if v.is_empty() {
        return "none".to_string();
    }
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.decimals$}")).collect();
    format!("{} {unit}", parts.join(", "))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derived::compute;
    use crate::domain::InstrumentFamily;

    #[test]
    fn mm_values_drop_trailing_zeros() {
        assert_eq!(format_mm(41.0), "41");
        assert_eq!(format_mm(3.2), "3.2");
        assert_eq!(format_mm(5.789), "5.79");
        assert_eq!(format_mm(-0.001), "0");
    }

    #[test]
    fn derived_strings_cover_every_metadata_key() {
        let params = ParameterRegistry::new().defaults();
        let values = compute(&params).unwrap();
        let formatted = format_derived(&values);
        for meta in derived_metadata() {
            assert!(formatted.contains_key(meta.key), "{}", meta.key);
        }
        assert_eq!(formatted["template_width"], "52.0 mm");
        assert_eq!(formatted["fret_distances"], "none");
    }

    #[test]
    fn metadata_order_is_strictly_increasing() {
        assert!(derived_metadata().windows(2).all(|w| w[1].order > w[0].order));
    }

    #[test]
    fn table_lists_inputs_and_frets() {
        let registry = ParameterRegistry::new();
        let params = registry.defaults_for(InstrumentFamily::Viol);
        let values = compute(&params).unwrap();
        let table = format_dimensions_table(&registry, &params, &values);

        assert!(table.starts_with("=== Viol (Viol) ===\n"));
        assert!(table.contains("Fingerboard Radius"));
        assert_eq!(table.matches("Fret positions:").count(), 1);
        let fret_rows = table
            .lines()
            .skip_while(|l| *l != "Fret positions:")
            .skip(3)
            .count();
        assert_eq!(fret_rows, 7);
        assert!(table.lines().all(|l| l == l.trim_end()));
    }

    #[test]
    fn truncate_marks_cut_labels() {
        assert_eq!(truncate("abcdef", 4), "abc.");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
