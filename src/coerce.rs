//! String and JSON coercion into typed leaf slots.

use crate::schema::{FieldKind, ValueMut};
use serde_json::Value;
use std::str::FromStr;
use thiserror::Error;

/// A literal that does not parse as the slot's declared kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{value:?} is not a valid {kind}")]
pub struct InvalidValue {
    pub kind: FieldKind,
    pub value: String,
}

/// Parse the boolean literal forms accepted by configuration sources.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Parse `raw` as the slot's kind and assign it.
///
/// On failure the slot keeps its previous value.
pub fn coerce(slot: &mut ValueMut<'_>, raw: &str) -> Result<(), InvalidValue> {
    let kind = slot.kind();
    match slot {
        ValueMut::Str(s) => {
            s.clear();
            s.push_str(raw);
        }
        ValueMut::I8(v) => **v = parse_literal(raw, kind)?,
        ValueMut::I16(v) => **v = parse_literal(raw, kind)?,
        ValueMut::I32(v) => **v = parse_literal(raw, kind)?,
        ValueMut::I64(v) => **v = parse_literal(raw, kind)?,
        ValueMut::Isize(v) => **v = parse_literal(raw, kind)?,
        ValueMut::U8(v) => **v = parse_literal(raw, kind)?,
        ValueMut::U16(v) => **v = parse_literal(raw, kind)?,
        ValueMut::U32(v) => **v = parse_literal(raw, kind)?,
        ValueMut::U64(v) => **v = parse_literal(raw, kind)?,
        ValueMut::Usize(v) => **v = parse_literal(raw, kind)?,
        ValueMut::Bool(v) => {
            **v = parse_bool(raw).ok_or_else(|| InvalidValue {
                kind,
                value: raw.to_string(),
            })?
        }
    }
    Ok(())
}

fn parse_literal<T: FromStr>(raw: &str, kind: FieldKind) -> Result<T, InvalidValue> {
    raw.parse().map_err(|_| InvalidValue {
        kind,
        value: raw.to_string(),
    })
}

/// Whether the slot already holds a purposeful value.
///
/// Zero values (`""`, `0`, `false`) count as unset, so a configured zero
/// cannot be told apart from a missing one.
pub fn is_meaningful(slot: &ValueMut<'_>) -> bool {
    match slot {
        ValueMut::Str(s) => !s.is_empty(),
        ValueMut::I8(v) => **v > 0,
        ValueMut::I16(v) => **v > 0,
        ValueMut::I32(v) => **v > 0,
        ValueMut::I64(v) => **v > 0,
        ValueMut::Isize(v) => **v > 0,
        ValueMut::U8(v) => **v > 0,
        ValueMut::U16(v) => **v > 0,
        ValueMut::U32(v) => **v > 0,
        ValueMut::U64(v) => **v > 0,
        ValueMut::Usize(v) => **v > 0,
        ValueMut::Bool(v) => **v,
    }
}

/// Assign a decoded JSON value to the slot.
///
/// Returns `Ok(false)` for `null`, which counts as absent. A value of the
/// wrong JSON type or out of range leaves the slot untouched.
pub fn assign_json(slot: &mut ValueMut<'_>, value: &Value) -> Result<bool, String> {
    if value.is_null() {
        return Ok(false);
    }
    let kind = slot.kind();
    match slot {
        ValueMut::Str(s) => {
            let text = value
                .as_str()
                .ok_or_else(|| format!("expects a string, got {value}"))?;
            s.clear();
            s.push_str(text);
        }
        ValueMut::I8(v) => **v = json_int(value, kind)?,
        ValueMut::I16(v) => **v = json_int(value, kind)?,
        ValueMut::I32(v) => **v = json_int(value, kind)?,
        ValueMut::I64(v) => **v = json_int(value, kind)?,
        ValueMut::Isize(v) => **v = json_int(value, kind)?,
        ValueMut::U8(v) => **v = json_int(value, kind)?,
        ValueMut::U16(v) => **v = json_int(value, kind)?,
        ValueMut::U32(v) => **v = json_int(value, kind)?,
        ValueMut::U64(v) => **v = json_int(value, kind)?,
        ValueMut::Usize(v) => **v = json_int(value, kind)?,
        ValueMut::Bool(v) => {
            **v = value
                .as_bool()
                .ok_or_else(|| format!("expects a boolean, got {value}"))?
        }
    }
    Ok(true)
}

fn json_int<T>(value: &Value, kind: FieldKind) -> Result<T, String>
where
    T: TryFrom<i64> + TryFrom<u64>,
{
    let converted = if let Some(n) = value.as_i64() {
        <T as TryFrom<i64>>::try_from(n).ok()
    } else if let Some(n) = value.as_u64() {
        <T as TryFrom<u64>>::try_from(n).ok()
    } else if value.is_number() {
        return Err(format!("expects an integer, got {value}"));
    } else {
        return Err(format!("expects a number, got {value}"));
    };
    converted.ok_or_else(|| format!("{value} is out of range for {kind}"))
}
