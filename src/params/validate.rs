//! Request validation.
//!
//! Turns an untyped key -> JSON mapping into a typed `ParameterSet`, or into
//! the complete list of things wrong with it.
//!
//! Rules:
//! - every registry key is coerced and range-checked on its own first
//!   (numeric strings are accepted; unknown keys are ignored)
//! - required keys that are missing are reported; optional ones take the
//!   catalog default for the requested family
//! - cross-field constraints only run once all the fields they read passed
//!   their own checks, so one bad field does not cascade into noise
//! - nothing is fail-fast: all violations are returned together

use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use crate::derived::{MIN_FLAT_AREA_HEIGHT, flat_area_height};
use crate::domain::{InstrumentFamily, ParameterSet, RawParams, ValidationResult};
use crate::math::fret_distance;
use crate::params::registry::{ParameterDefinition, ParameterKind, ParameterRegistry, keys};

/// A single coerced field value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Number(f64),
    Text(String),
    Bool(bool),
    /// Canonical option value of an enum parameter.
    Choice(&'static str),
}

/// Validate a raw request against the registry and the cross-field rules.
pub fn validate(registry: &ParameterRegistry, raw: &RawParams) -> ValidationResult {
    let mut errors = Vec::new();
    let mut params = registry.defaults_for(requested_family(registry, raw));
    let mut ok: HashSet<&'static str> = HashSet::new();

    for def in registry.definitions() {
        match raw.get(def.key) {
            None | Some(Value::Null) => {
                if def.required {
                    errors.push(format!("Missing required parameter: {} ({})", def.label, def.key));
                } else {
                    ok.insert(def.key);
                }
            }
            Some(value) => match coerce(def, value) {
                Ok(parsed) => {
                    if assign(&mut params, def.key, parsed) {
                        ok.insert(def.key);
                    } else {
                        errors.push(format!("{} has an unsupported value type", def.label));
                    }
                }
                Err(message) => errors.push(message),
            },
        }
    }

    check_cross_fields(&params, &ok, &mut errors);

    if errors.is_empty() {
        ValidationResult::accepted(params)
    } else {
        debug!(count = errors.len(), "parameter validation failed");
        ValidationResult::rejected(errors)
    }
}

/// Family named in the request, if it is a valid one. Optional keys that are
/// missing take that family's defaults; the family field itself is still
/// validated (and reported) in the main pass.
fn requested_family(registry: &ParameterRegistry, raw: &RawParams) -> InstrumentFamily {
    registry
        .get(keys::INSTRUMENT_FAMILY)
        .zip(raw.get(keys::INSTRUMENT_FAMILY))
        .and_then(|(def, value)| match coerce(def, value) {
            Ok(ParamValue::Choice(c)) => InstrumentFamily::from_value(c),
            _ => None,
        })
        .unwrap_or(InstrumentFamily::Violin)
}

/// Coerce and bounds-check one value against its definition.
pub fn coerce(def: &ParameterDefinition, value: &Value) -> Result<ParamValue, String> {
    match &def.kind {
        ParameterKind::Number {
            min,
            max,
            integer,
            ..
        } => {
            let v = match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            }
            .ok_or_else(|| format!("{} must be a valid number (got {value})", def.label))?;

            if !v.is_finite() {
                return Err(format!("{} must be a finite number (got {v})", def.label));
            }
            if *integer && v.fract() != 0.0 {
                return Err(format!("{} must be a whole number (got {v})", def.label));
            }
            if v < *min || v > *max {
                return Err(format!(
                    "{} must be between {min} and {max}{} (got {v})",
                    def.label,
                    unit_suffix(def.unit),
                ));
            }
            Ok(ParamValue::Number(v))
        }
        ParameterKind::Enum { options } => {
            let s = value
                .as_str()
                .ok_or_else(|| format!("{} must be a string (got {value})", def.label))?;
            options
                .iter()
                .find(|o| o.value.eq_ignore_ascii_case(s.trim()))
                .map(|o| ParamValue::Choice(o.value))
                .ok_or_else(|| {
                    let allowed: Vec<&str> = options.iter().map(|o| o.value).collect();
                    format!("{} must be one of {} (got \"{s}\")", def.label, allowed.join(", "))
                })
        }
        ParameterKind::Text { max_length } => {
            let s = match value {
                Value::String(s) => s.trim().to_string(),
                Value::Number(n) => n.to_string(),
                _ => return Err(format!("{} must be text (got {value})", def.label)),
            };
            if s.chars().count() > *max_length {
                return Err(format!("{} must be at most {max_length} characters", def.label));
            }
            if s.contains(['<', '>', '&']) {
                return Err(format!("{} must not contain '<', '>' or '&'", def.label));
            }
            Ok(ParamValue::Text(s))
        }
        ParameterKind::Boolean => match value {
            Value::Bool(b) => Ok(ParamValue::Bool(*b)),
            Value::String(s) if s.trim().eq_ignore_ascii_case("true") => Ok(ParamValue::Bool(true)),
            Value::String(s) if s.trim().eq_ignore_ascii_case("false") => {
                Ok(ParamValue::Bool(false))
            }
            Value::Number(n) if n.as_f64() == Some(1.0) => Ok(ParamValue::Bool(true)),
            Value::Number(n) if n.as_f64() == Some(0.0) => Ok(ParamValue::Bool(false)),
            _ => Err(format!("{} must be true or false (got {value})", def.label)),
        },
    }
}

/// Store a coerced value in its typed field. Returns false on a key/type mismatch.
fn assign(params: &mut ParameterSet, key: &str, value: ParamValue) -> bool {
    use ParamValue::*;

    match (key, value) {
        (keys::INSTRUMENT_NAME, Text(s)) => params.instrument_name = s,
        (keys::INSTRUMENT_FAMILY, Choice(c)) => match InstrumentFamily::from_value(c) {
            Some(family) => params.instrument_family = family,
            None => return false,
        },
        (keys::FINGERBOARD_RADIUS, Number(v)) => params.fingerboard_radius = v,
        (keys::FB_WIDTH_AT_NUT, Number(v)) => params.fb_width_at_nut = v,
        (keys::FB_WIDTH_AT_END, Number(v)) => params.fb_width_at_end = v,
        (keys::FB_VISIBLE_HEIGHT_AT_NUT, Number(v)) => params.fb_visible_height_at_nut = v,
        (keys::FB_VISIBLE_HEIGHT_AT_JOIN, Number(v)) => params.fb_visible_height_at_join = v,
        // Bounds (0..=36) and the whole-number check already ran.
        (keys::NUM_FRETS, Number(v)) => params.num_frets = v as u32,
        (keys::NECK_LENGTH, Number(v)) => params.neck_length = v,
        (keys::VIBRATING_LENGTH, Number(v)) => params.vibrating_length = v,
        (keys::RADIUS_TEMPLATE_HEIGHT, Number(v)) => params.radius_template_height = v,
        (keys::SHOW_MEASUREMENTS, Bool(b)) => params.show_measurements = b,
        _ => return false,
    }
    true
}

fn check_cross_fields(params: &ParameterSet, ok: &HashSet<&'static str>, errors: &mut Vec<String>) {
    let all_ok = |needed: &[&str]| needed.iter().all(|k| ok.contains(k));

    if all_ok(&[keys::FB_WIDTH_AT_NUT, keys::FB_WIDTH_AT_END])
        && params.fb_width_at_end < params.fb_width_at_nut
    {
        errors.push(format!(
            "Fingerboard width at end ({} mm) must be at least the width at nut ({} mm)",
            params.fb_width_at_end, params.fb_width_at_nut
        ));
    }

    if all_ok(&[keys::FB_VISIBLE_HEIGHT_AT_NUT, keys::FB_VISIBLE_HEIGHT_AT_JOIN])
        && params.fb_visible_height_at_nut < params.fb_visible_height_at_join
    {
        errors.push(format!(
            "Visible height at nut ({} mm) must be at least the visible height at join ({} mm)",
            params.fb_visible_height_at_nut, params.fb_visible_height_at_join
        ));
    }

    let radius_fields = [keys::FINGERBOARD_RADIUS, keys::FB_WIDTH_AT_NUT, keys::FB_WIDTH_AT_END];
    let mut radius_ok = false;
    if all_ok(&radius_fields) {
        let widest = params.max_width();
        if params.fingerboard_radius > widest / 2.0 {
            radius_ok = true;
        } else {
            errors.push(format!(
                "Fingerboard radius too small for width: a {} mm radius cannot span a {} mm wide \
                 fingerboard (radius must exceed {} mm)",
                params.fingerboard_radius,
                widest,
                widest / 2.0
            ));
        }
    }

    if radius_ok && ok.contains(keys::RADIUS_TEMPLATE_HEIGHT) {
        match flat_area_height(params) {
            Ok(flat) if flat > MIN_FLAT_AREA_HEIGHT => {}
            Ok(flat) => errors.push(format!(
                "Radius template flat area too small: {flat:.2} mm left under the arc, more than \
                 {MIN_FLAT_AREA_HEIGHT} mm is needed for the printed radius (increase {})",
                keys::RADIUS_TEMPLATE_HEIGHT
            )),
            Err(e) => errors.push(format!("Radius template cannot be computed: {e}")),
        }
    }

    if params.num_frets > 0
        && all_ok(&[keys::NUM_FRETS, keys::NECK_LENGTH, keys::VIBRATING_LENGTH])
    {
        let last = fret_distance(params.vibrating_length, params.num_frets);
        if last >= params.neck_length {
            errors.push(format!(
                "Fret {} falls {last:.1} mm from the nut, beyond the fingerboard length ({} mm)",
                params.num_frets, params.neck_length
            ));
        }
    }
}

fn unit_suffix(unit: &str) -> String {
    if unit.is_empty() {
        String::new()
    } else {
        format!(" {unit}")
    }
}
