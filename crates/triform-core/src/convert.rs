//! The conversion driver: format detection, parser/writer dispatch, and
//! file-level orchestration.
//!
//! Dispatch is an explicit `match` owned by this module — there is no
//! registry and no process-wide state, so concurrent conversions are
//! independent by construction.
//!
//! The XML root tag travels next to the tree (see [`Document`]) and is
//! reconciled with the other formats here: an XML-sourced document becomes
//! a single-key mapping in JSON/YAML (`<root><item/></root>` →
//! `{"root": {"item": null}}`), and the XML writer takes its root from the
//! exact inverse — an explicit name, an unwrappable single-key mapping, or
//! a synthesized `<root>`.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{ConvertError, Result};
use crate::value::Value;
use crate::{json, xml, yaml};

/// Root element name synthesized when an XML target has no better one.
const DEFAULT_ROOT_NAME: &str = "root";

/// The three supported formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Xml,
}

impl Format {
    /// Map a file extension (without the dot, any case) to a format.
    pub fn from_extension(extension: &str) -> Option<Format> {
        match extension.to_ascii_lowercase().as_str() {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            "xml" => Some(Format::Xml),
            _ => None,
        }
    }

    /// Detect a file's format from its extension. No content sniffing:
    /// an unrecognized or missing extension is
    /// [`ConvertError::UnknownFormat`].
    pub fn detect(path: &Path) -> Result<Format> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
            .ok_or_else(|| ConvertError::UnknownFormat {
                path: path.to_path_buf(),
            })
    }

    /// Display name ("JSON", "YAML", "XML").
    pub fn name(&self) -> &'static str {
        match self {
            Format::Json => "JSON",
            Format::Yaml => "YAML",
            Format::Xml => "XML",
        }
    }

    /// Recognized extensions for this format, without the dot.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Format::Json => &["json"],
            Format::Yaml => &["yaml", "yml"],
            Format::Xml => &["xml"],
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed document: the value tree plus the XML root-tag side channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Root element name when the source was XML; `None` otherwise.
    pub root_name: Option<String>,
    pub value: Value,
}

impl Document {
    pub fn new(value: Value) -> Document {
        Document {
            root_name: None,
            value,
        }
    }

    pub fn with_root(root_name: impl Into<String>, value: Value) -> Document {
        Document {
            root_name: Some(root_name.into()),
            value,
        }
    }
}

/// Parse `source` as `format` into a [`Document`].
pub fn parse_document(format: Format, source: &str) -> Result<Document> {
    match format {
        Format::Json => json::parse(source).map(Document::new),
        Format::Yaml => yaml::parse(source).map(Document::new),
        Format::Xml => xml::parse(source).map(|(name, value)| Document::with_root(name, value)),
    }
}

/// Render a [`Document`] in `format`. Consumes the document; the tree is
/// built once per conversion and owned by exactly one writer.
pub fn write_document(format: Format, document: Document) -> Result<String> {
    match format {
        Format::Json => json::write(&wrap_root(document)),
        Format::Yaml => yaml::write(&wrap_root(document)),
        Format::Xml => {
            let (root_name, value) = xml_parts(document);
            xml::write(&root_name, &value)
        }
    }
}

/// In-memory conversion pipeline, the pure core of [`convert`].
pub fn convert_str(source: Format, target: Format, text: &str) -> Result<String> {
    let document = parse_document(source, text)?;
    write_document(target, document)
}

/// Convert one file: read `input`, detect its format from the extension,
/// parse, render as `target`, write `output`.
///
/// The output is placed atomically — rendered fully in memory, written to
/// a temporary file in the destination directory, and renamed over
/// `output` only on success — so a failure never leaves a partial file and
/// never clobbers an existing one.
///
/// Safe to call concurrently from multiple threads; the driver keeps no
/// shared state.
pub fn convert(input: &Path, output: &Path, target: Format) -> Result<()> {
    let (_, _, document) = load(input)?;
    let rendered = write_document(target, document)?;
    write_atomic(output, rendered.as_bytes())
}

/// Parse-only check: read, detect, parse. Returns the detected format.
pub fn validate(path: &Path) -> Result<Format> {
    let (format, _, _) = load(path)?;
    Ok(format)
}

/// Summary of a parsed file, for info displays.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentInfo {
    pub format: Format,
    pub size_bytes: u64,
    /// Root element name when the file is XML.
    pub root_name: Option<String>,
    /// Entries of a top-level mapping or items of a top-level sequence;
    /// 1 for a scalar document.
    pub top_level_entries: usize,
    /// Total number of values in the tree.
    pub node_count: usize,
}

/// Parse a file and report its shape.
pub fn inspect(path: &Path) -> Result<DocumentInfo> {
    let (format, size_bytes, document) = load(path)?;
    let top_level_entries = match &document.value {
        Value::Mapping(entries) => entries.len(),
        Value::Sequence(items) => items.len(),
        _ => 1,
    };
    Ok(DocumentInfo {
        format,
        size_bytes,
        root_name: document.root_name,
        top_level_entries,
        node_count: document.value.node_count(),
    })
}

/// Shared read→detect→decode→parse front half of the file operations.
fn load(path: &Path) -> Result<(Format, u64, Document)> {
    let bytes = fs::read(path).map_err(|source| ConvertError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    let format = Format::detect(path)?;
    let text = decode_utf8(&bytes, format)?;
    let document = parse_document(format, text)?;
    Ok((format, bytes.len() as u64, document))
}

/// Decode input bytes as UTF-8, tolerating a leading BOM.
fn decode_utf8(bytes: &[u8], format: Format) -> Result<&str> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| ConvertError::syntax(format, format!("input is not valid UTF-8: {e}"), None))?;
    Ok(text.trim_start_matches('\u{feff}'))
}

/// XML-sourced documents keep their root tag as an outer single-key
/// mapping in the other formats.
fn wrap_root(document: Document) -> Value {
    match document.root_name {
        Some(name) => Value::Mapping(vec![(name, document.value)]),
        None => document.value,
    }
}

/// Choose the XML root element: an explicit name wins; otherwise a
/// single-entry mapping with a usable element name and a non-sequence
/// value unwraps (the exact inverse of [`wrap_root`]); otherwise a
/// `<root>` element is synthesized around the whole value.
fn xml_parts(document: Document) -> (String, Value) {
    let Document { root_name, value } = document;
    if let Some(name) = root_name {
        return (name, value);
    }
    match value {
        Value::Mapping(mut entries)
            if entries.len() == 1
                && xml::is_valid_name(&entries[0].0)
                && !matches!(entries[0].1, Value::Sequence(_)) =>
        {
            let (name, inner) = entries.remove(0);
            (name, inner)
        }
        other => (DEFAULT_ROOT_NAME.to_string(), other),
    }
}

/// Write through a temporary file in the destination directory and rename
/// into place.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let output_error = |source: std::io::Error| ConvertError::Output {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(output_error)?;
    tmp.write_all(bytes).map_err(output_error)?;
    tmp.persist(path).map_err(|e| output_error(e.error))?;
    Ok(())
}
