//! Tolerant decoding of controls-API payloads
//!
//! The API has shipped several field spellings over time; each logical field
//! accepts a list of aliases and the first present string wins.

use crate::config::compile_time::catalog::{MAX_CONTROLS, MAX_CONTROL_ID_LENGTH};
use crate::logging::codes;
use crate::model::Control;
use crate::{log_debug, log_warning};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

const ID_KEYS: &[&str] = &["id", "control_id", "controlId"];
const NAME_KEYS: &[&str] = &["name", "control_name", "controlName", "title"];
const INTENT_KEYS: &[&str] = &["intent", "explanation", "discussion"];
const OFFICIAL_TEXT_KEYS: &[&str] = &["official_text", "officialText", "statement", "text"];
const ENHANCEMENT_KEYS: &[&str] = &["enhancements", "control_enhancements"];

fn nist_id_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Z]{2,3}-\d+(\(\d+\))?$").ok())
        .as_ref()
}

/// Whether an identifier follows the NIST `XX-N` / `XX-N(N)` shape
pub fn is_standard_control_id(id: &str) -> bool {
    nist_id_pattern().map(|re| re.is_match(id)).unwrap_or(true)
}

/// Locate the control list inside a payload: a bare array or a `controls` envelope.
pub(crate) fn control_list(payload: &Value) -> Option<&Vec<Value>> {
    match payload {
        Value::Array(items) => Some(items),
        Value::Object(map) => map.get("controls").and_then(Value::as_array),
        _ => None,
    }
}

/// Decode every usable entry of a payload. A missing or non-array list yields none.
pub(crate) fn decode_controls(payload: &Value) -> Vec<Control> {
    let Some(items) = control_list(payload) else {
        log_warning!(
            codes::catalog::MISSING_CONTROL_LIST,
            "Catalog payload has no control list",
            "payload_type" => json_type_name(payload)
        );
        return Vec::new();
    };

    if items.len() > MAX_CONTROLS {
        log_warning!(
            codes::catalog::CATALOG_TRUNCATED,
            "Catalog truncated to the maximum control count",
            "entries" => items.len(),
            "limit" => MAX_CONTROLS
        );
    }

    items
        .iter()
        .take(MAX_CONTROLS)
        .enumerate()
        .filter_map(|(position, item)| decode_control(position, item))
        .collect()
}

fn decode_control(position: usize, item: &Value) -> Option<Control> {
    let Some(fields) = item.as_object() else {
        log_warning!(
            codes::catalog::CONTROL_SKIPPED,
            "Catalog entry is not an object",
            "position" => position
        );
        return None;
    };

    let id = match first_string(fields, ID_KEYS) {
        Some(id) if !id.is_empty() && id.len() <= MAX_CONTROL_ID_LENGTH => id,
        _ => {
            log_warning!(
                codes::catalog::CONTROL_SKIPPED,
                "Catalog entry has no usable identifier",
                "position" => position,
                "name" => first_string(fields, NAME_KEYS).unwrap_or("-")
            );
            return None;
        }
    };

    if !is_standard_control_id(id) {
        log_debug!(
            codes::catalog::NONSTANDARD_CONTROL_ID,
            "Control identifier outside NIST shape",
            "id" => id
        );
    }

    let name = first_string(fields, NAME_KEYS).unwrap_or_default();
    let mut control = Control::new(id, name);

    if let Some(intent) = first_string(fields, INTENT_KEYS) {
        control = control.with_intent(intent);
    }
    if let Some(text) = first_string(fields, OFFICIAL_TEXT_KEYS) {
        control = control.with_official_text(text);
    }
    if let Some(enhancements) = first_array(fields, ENHANCEMENT_KEYS) {
        control = control.with_enhancements(enhancements.iter().filter_map(enhancement_id));
    }

    Some(control)
}

fn first_string<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| fields.get(*key).and_then(Value::as_str))
        .map(str::trim)
}

fn first_array<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Vec<Value>> {
    keys.iter()
        .find_map(|key| fields.get(*key).and_then(Value::as_array))
}

/// Enhancements arrive either as bare ids or as nested control objects
fn enhancement_id(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.trim().to_string()),
        Value::Object(fields) => first_string(fields, ID_KEYS).map(str::to_string),
        _ => None,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
