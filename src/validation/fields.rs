//! Primitive predicates shared by the validators

use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::Value;
use std::collections::HashSet;

static INTEGER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?[0-9]+(_[0-9]+)*$").expect("static pattern"));

/// Required-field adequacy check
///
/// Every required name must appear among `present`; additional names and
/// repeated names are tolerated.
pub fn has_required_fields<'a, I>(present: I, required: &[&str]) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    let required_set: HashSet<&str> = required.iter().copied().collect();
    let matched: HashSet<&str> = present
        .into_iter()
        .filter(|name| required_set.contains(name))
        .collect();
    matched.len() == required.len()
}

/// Adequacy check against the keys of a mapping (or items of a sequence)
///
/// Scalars and nulls have no keys, so they only satisfy an empty requirement.
pub fn value_has_required_fields(source: &Value, required: &[&str]) -> bool {
    let names = field_names(source);
    has_required_fields(names.iter().map(String::as_str), required)
}

/// Names a value offers to a required-field check
pub fn field_names(source: &Value) -> Vec<String> {
    match untag(source) {
        Value::Mapping(map) => map.keys().map(key_name).collect(),
        Value::Sequence(items) => items.iter().map(key_name).collect(),
        _ => Vec::new(),
    }
}

/// Text form of a key or scalar, as it appears in diagnostics
pub fn key_name(value: &Value) -> String {
    match untag(value) {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Null => "None".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Whether a cell of the output table holds a floating point value
///
/// Integers, scientific notation, `inf` and `nan` are accepted; empty or
/// non-numeric text is not.
pub fn is_float_str(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed.parse::<f64>().is_ok()
}

/// Integer text, classified by whether it fits an `i64`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegerText {
    Value(i64),
    /// Well-formed but beyond the `i64` range in the given direction
    Overflow { negative: bool },
    Invalid,
}

/// Classify an integer written as text, allowing a sign and digit separators
pub fn classify_int_str(value: &str) -> IntegerText {
    let trimmed = value.trim();
    if !INTEGER_REGEX.is_match(trimmed) {
        return IntegerText::Invalid;
    }
    match trimmed.replace('_', "").parse::<i64>() {
        Ok(number) => IntegerText::Value(number),
        Err(_) => IntegerText::Overflow {
            negative: trimmed.starts_with('-'),
        },
    }
}

/// Parse an integer written as text; out-of-range values yield `None`
pub fn parse_int_str(value: &str) -> Option<i64> {
    match classify_int_str(value) {
        IntegerText::Value(number) => Some(number),
        _ => None,
    }
}

/// Whether a metadata value can be read as a number
pub fn is_float_value(value: &Value) -> bool {
    match untag(value) {
        Value::Number(_) | Value::Bool(_) => true,
        Value::String(s) => is_float_str(s),
        _ => false,
    }
}

/// Whether a metadata value can be read as an integer
///
/// Finite floats qualify (they truncate); numeric text must be integral.
pub fn is_int_value(value: &Value) -> bool {
    match untag(value) {
        Value::Number(n) => n.is_i64() || n.is_u64() || n.as_f64().is_some_and(f64::is_finite),
        Value::Bool(_) => true,
        Value::String(s) => INTEGER_REGEX.is_match(s.trim()),
        _ => false,
    }
}

/// Truthiness of a metadata value: false, zero, null and empty are false
pub fn is_truthy(value: &Value) -> bool {
    match untag(value) {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(items) => !items.is_empty(),
        Value::Mapping(map) => !map.is_empty(),
        Value::Tagged(_) => true,
    }
}

/// Items of a sequence value; anything else yields no items
pub fn sequence_items(value: &Value) -> &[Value] {
    match untag(value) {
        Value::Sequence(items) => items.as_slice(),
        _ => &[],
    }
}

/// Strip YAML tags so `!!str 12` is judged by its content
pub fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}
