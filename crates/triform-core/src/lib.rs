//! # triform-core
//!
//! Convert documents between **JSON**, **YAML**, and **XML** through a
//! format-neutral tree.
//!
//! Every conversion parses the source into a [`Value`] — a closed tagged
//! union over null, booleans, integers, floats, strings, sequences, and
//! ordered mappings — and re-emits it in the target syntax. Parsers and
//! writers are the only code that touches concrete syntax; everything else
//! operates on `Value`. Each parser/writer pair round-trips: parsing what
//! the writer emitted yields an equal `Value`.
//!
//! ## Quick start
//!
//! ```rust
//! use triform_core::{convert_str, Format};
//!
//! let json = r#"{"name":"Alice","age":30}"#;
//! let yaml = convert_str(Format::Json, Format::Yaml, json).unwrap();
//! assert_eq!(yaml, "name: Alice\nage: 30\n");
//! ```
//!
//! File-to-file conversion with extension detection and atomic output goes
//! through [`convert`]; it is blocking, reentrant, and safe to call from
//! worker threads (the crate holds no global state).
//!
//! ## Modules
//!
//! - [`value`] — the format-neutral [`Value`] tree
//! - [`json`] — JSON parser/writer (serde_json, order-preserving)
//! - [`yaml`] — YAML parser/writer (serde_yaml, implicit scalar typing)
//! - [`xml`] — XML parser/writer (quick-xml, structural reconciliation)
//! - [`convert`] — format detection and the conversion driver
//! - [`error`] — [`ConvertError`] and the crate-wide [`Result`]

pub mod convert;
pub mod error;
pub mod json;
pub mod value;
pub mod xml;
pub mod yaml;

pub use convert::{
    convert, convert_str, inspect, parse_document, validate, write_document, Document,
    DocumentInfo, Format,
};
pub use error::{ConvertError, Location, Result};
pub use value::Value;
