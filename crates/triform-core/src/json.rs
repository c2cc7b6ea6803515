//! JSON parser and writer.
//!
//! Both directions go through `serde_json::Value` (built with the
//! `preserve_order` feature, so object keys keep document order) and fold
//! to/from the neutral [`Value`] tree.
//!
//! Rules fixed by this module:
//!
//! - Numbers without a fractional part or exponent parse as `Integer`; all
//!   others as `Float`. Unsigned values above `i64::MAX` degrade to `Float`.
//! - Duplicate object keys: the last value wins and the key keeps its first
//!   position. JSON itself leaves this open; the policy here follows the
//!   ordered map backing the parser.
//! - Output is pretty-printed with 2-space indentation and a trailing
//!   newline. This is fixed, not configurable.
//! - `Float` values with no JSON representation (NaN, infinities) are a
//!   [`ConvertError::Structure`] on write rather than a silent `null`.

use crate::convert::Format;
use crate::error::{ConvertError, Location, Result};
use crate::value::Value;

/// Parse a JSON document into a [`Value`].
///
/// Malformed input (unterminated strings, trailing commas, invalid escapes)
/// is a [`ConvertError::Syntax`] carrying serde_json's line/column.
pub fn parse(source: &str) -> Result<Value> {
    let json: serde_json::Value = serde_json::from_str(source)
        .map_err(|e| ConvertError::syntax(Format::Json, e.to_string(), error_location(&e)))?;
    Ok(from_json(json))
}

/// Write a [`Value`] as pretty-printed JSON.
pub fn write(value: &Value) -> Result<String> {
    let json = to_json(value)?;
    let mut out = serde_json::to_string_pretty(&json)
        .map_err(|e| ConvertError::structure(Format::Json, e.to_string()))?;
    out.push('\n');
    Ok(out)
}

/// serde_json reports `line() == 0` when it has no position.
fn error_location(err: &serde_json::Error) -> Option<Location> {
    (err.line() > 0).then(|| Location {
        line: err.line(),
        column: err.column(),
    })
}

fn from_json(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            // u64 beyond i64::MAX; as_f64 is total for non-arbitrary-precision numbers
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => {
            Value::Sequence(items.into_iter().map(from_json).collect())
        }
        serde_json::Value::Object(map) => Value::Mapping(
            map.into_iter()
                .map(|(key, val)| (key, from_json(val)))
                .collect(),
        ),
    }
}

fn to_json(value: &Value) -> Result<serde_json::Value> {
    Ok(match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Integer(n) => serde_json::Value::Number((*n).into()),
        Value::Float(f) => match serde_json::Number::from_f64(*f) {
            Some(n) => serde_json::Value::Number(n),
            None => {
                return Err(ConvertError::structure(
                    Format::Json,
                    format!("the number {f} has no JSON representation"),
                ));
            }
        },
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Sequence(items) => {
            serde_json::Value::Array(items.iter().map(to_json).collect::<Result<_>>()?)
        }
        Value::Mapping(entries) => {
            let mut map = serde_json::Map::with_capacity(entries.len());
            for (key, val) in entries {
                map.insert(key.clone(), to_json(val)?);
            }
            serde_json::Value::Object(map)
        }
    })
}
