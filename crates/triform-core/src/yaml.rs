//! YAML parser and writer.
//!
//! Both directions go through `serde_yaml::Value` and fold to/from the
//! neutral [`Value`] tree. serde_yaml's mapping preserves insertion order,
//! which carries the document-order guarantee.
//!
//! Plain (unquoted) scalars resolve per the YAML 1.2 core schema as
//! implemented by serde_yaml. The accepted spellings:
//!
//! - null: empty, `~`, `null`, `Null`, `NULL`
//! - booleans: `true`/`True`/`TRUE`, `false`/`False`/`FALSE`
//! - integers: optionally signed decimal, `0x` hexadecimal, `0o` octal
//! - floats: decimal and exponent forms, `.inf`/`.Inf`/`.INF` with either
//!   sign, `.nan`/`.NaN`/`.NAN`
//!
//! Anything else, and any quoted scalar, is a `String`.
//!
//! Further rules fixed by this module:
//!
//! - Duplicate mapping keys are a parse error (YAML 1.2 requires key
//!   uniqueness and serde_yaml enforces it).
//! - Scalar mapping keys that are not strings are stringified (`1:` becomes
//!   key `"1"`, `~:` becomes `"null"`); sequence or mapping keys are
//!   rejected. Stringification collisions resolve last-wins.
//! - YAML tags are dropped; the tagged node's value is used.
//! - An empty document parses as `Null`; multi-document streams are
//!   rejected by the parser.
//! - Output is block style. Strings whose content would re-read as another
//!   scalar type (`'true'`, `'42'`, `'3.14'`, `'null'`, `'0x1f'`) are
//!   quoted by the emitter; that is what makes string round-trips hold.

use crate::convert::Format;
use crate::error::{ConvertError, Location, Result};
use crate::value::Value;

/// Parse a YAML document into a [`Value`].
///
/// Malformed indentation (including tabs), unterminated structures, and
/// duplicate keys are [`ConvertError::Syntax`] with serde_yaml's position.
pub fn parse(source: &str) -> Result<Value> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(source)
        .map_err(|e| ConvertError::syntax(Format::Yaml, e.to_string(), error_location(&e)))?;
    from_yaml(yaml)
}

/// Write a [`Value`] as block-style YAML.
pub fn write(value: &Value) -> Result<String> {
    let yaml = to_yaml(value);
    serde_yaml::to_string(&yaml).map_err(|e| ConvertError::structure(Format::Yaml, e.to_string()))
}

fn error_location(err: &serde_yaml::Error) -> Option<Location> {
    err.location().map(|l| Location {
        line: l.line(),
        column: l.column(),
    })
}

fn from_yaml(yaml: serde_yaml::Value) -> Result<Value> {
    Ok(match yaml {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            // u64 beyond i64::MAX or a float either way
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => {
            Value::Sequence(items.into_iter().map(from_yaml).collect::<Result<_>>()?)
        }
        serde_yaml::Value::Mapping(map) => {
            let mut entries = Vec::with_capacity(map.len());
            for (key, val) in map {
                insert_entry(&mut entries, key_string(key)?, from_yaml(val)?);
            }
            Value::Mapping(entries)
        }
        // Tags carry no meaning in the other formats; keep the value.
        serde_yaml::Value::Tagged(tagged) => from_yaml(tagged.value)?,
    })
}

fn to_yaml(value: &Value) -> serde_yaml::Value {
    match value {
        Value::Null => serde_yaml::Value::Null,
        Value::Bool(b) => serde_yaml::Value::Bool(*b),
        Value::Integer(n) => serde_yaml::Value::Number((*n).into()),
        Value::Float(f) => serde_yaml::Value::Number((*f).into()),
        Value::String(s) => serde_yaml::Value::String(s.clone()),
        Value::Sequence(items) => serde_yaml::Value::Sequence(items.iter().map(to_yaml).collect()),
        Value::Mapping(entries) => {
            let mut map = serde_yaml::Mapping::with_capacity(entries.len());
            for (key, val) in entries {
                map.insert(serde_yaml::Value::String(key.clone()), to_yaml(val));
            }
            serde_yaml::Value::Mapping(map)
        }
    }
}

/// Render a YAML mapping key as a string, rejecting non-scalar keys.
fn key_string(key: serde_yaml::Value) -> Result<String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Null => Ok("null".to_string()),
        serde_yaml::Value::Tagged(tagged) => key_string(tagged.value),
        serde_yaml::Value::Sequence(_) => Err(ConvertError::syntax(
            Format::Yaml,
            "sequence mapping keys are not supported: keys must be scalars",
            None,
        )),
        serde_yaml::Value::Mapping(_) => Err(ConvertError::syntax(
            Format::Yaml,
            "mapping-valued mapping keys are not supported: keys must be scalars",
            None,
        )),
    }
}

/// Insert preserving first-key position; replaces on a stringification
/// collision (`1:` and `'1':` cannot coexist in the neutral tree).
fn insert_entry(entries: &mut Vec<(String, Value)>, key: String, value: Value) {
    if let Some(slot) = entries.iter_mut().find(|(k, _)| *k == key) {
        slot.1 = value;
    } else {
        entries.push((key, value));
    }
}
