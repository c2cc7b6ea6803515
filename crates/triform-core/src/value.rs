//! The format-neutral value tree that every parser produces and every
//! writer consumes.
//!
//! All cross-format logic operates on [`Value`]; nothing outside the three
//! format modules ever touches concrete syntax. Mappings keep their pairs in
//! document order (`Vec<(String, Value)>` rather than a hash map) because
//! XML and YAML are order-sensitive even though JSON objects nominally are
//! not. Key uniqueness is guaranteed by the producers, not by the type:
//! each parser resolves duplicates before a `Mapping` is built.

/// A document value, independent of the syntax it was read from.
///
/// Integers and floats are separate variants so that `42` and `42.0`
/// survive conversion distinctly. Mapping pairs preserve insertion order.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    /// Key-value pairs in document order, keys unique by construction.
    Mapping(Vec<(String, Value)>),
}

impl Value {
    /// True for `Value::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up a mapping entry by key. `None` for non-mappings and misses.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Mapping(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Lowercase variant name for error messages ("mapping", "sequence", ...).
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }

    /// Total number of values in the tree, this node included.
    pub fn node_count(&self) -> usize {
        match self {
            Value::Sequence(items) => 1 + items.iter().map(Value::node_count).sum::<usize>(),
            Value::Mapping(entries) => {
                1 + entries.iter().map(|(_, v)| v.node_count()).sum::<usize>()
            }
            _ => 1,
        }
    }
}

/// Structural, order-sensitive equality. The one deviation from a derived
/// impl: `Float(NaN)` equals `Float(NaN)`, so values read from YAML `.nan`
/// compare equal after a round trip.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => a == b,
            (Value::Mapping(a), Value::Mapping(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Value {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Value {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Value {
        Value::Sequence(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_compares_equal_to_itself() {
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_ne!(Value::Float(f64::NAN), Value::Float(1.0));
    }

    #[test]
    fn mapping_equality_is_order_sensitive() {
        let ab = Value::Mapping(vec![
            ("a".to_string(), Value::Integer(1)),
            ("b".to_string(), Value::Integer(2)),
        ]);
        let ba = Value::Mapping(vec![
            ("b".to_string(), Value::Integer(2)),
            ("a".to_string(), Value::Integer(1)),
        ]);
        assert_ne!(ab, ba);
    }

    #[test]
    fn get_finds_mapping_entries() {
        let v = Value::Mapping(vec![("name".to_string(), Value::from("Alice"))]);
        assert_eq!(v.get("name"), Some(&Value::from("Alice")));
        assert_eq!(v.get("age"), None);
        assert_eq!(Value::Integer(1).get("name"), None);
    }

    #[test]
    fn node_count_walks_the_tree() {
        let v = Value::Mapping(vec![(
            "items".to_string(),
            Value::Sequence(vec![Value::Integer(1), Value::Integer(2)]),
        )]);
        // mapping + sequence + two integers
        assert_eq!(v.node_count(), 4);
    }
}
