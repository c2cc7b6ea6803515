//! XML parser and writer.
//!
//! XML is a single rooted element tree with attributes and mixed text, not
//! a mapping/sequence structure, so this module fixes a canonical
//! reconciliation between the two:
//!
//! - Attributes become mapping keys prefixed with `@` (`<a id="1">` →
//!   `{"@id": "1"}`). The prefix cannot collide with child elements because
//!   `@` is not a legal XML name character.
//! - Non-whitespace text next to attributes or children lands under the
//!   reserved key `#text`, trimmed at the ends; text interleaved with
//!   children is concatenated.
//! - Repeated child tags fold into a `Sequence` at the first occurrence's
//!   position (`<item>1</item><item>2</item>` → `{"item": ["1", "2"]}`).
//! - An element with only text is that scalar; a fully empty element is
//!   `Null`.
//! - The root element's tag name is returned next to the tree, never
//!   inside it; the writer takes it back as a parameter.
//!
//! Text content stays `String` by default: XML is untyped and guessing at
//! numbers would surprise round trips. [`ReadOptions::infer_scalars`]
//! enables a conservative inference chain (null, true/false, integer,
//! float, with the `.inf`/`.nan` spellings the writer also uses) over text
//! and attribute values for callers that want typed output.
//!
//! Inherent losses, shared with any mapping of this shape: a one-element
//! sequence re-reads as the bare value, and `Null` and the empty string
//! both emit an empty element and re-read as `Null`.
//!
//! Comments, processing instructions, DOCTYPE, and the XML declaration are
//! skipped on read. CDATA contributes text content. Entity and character
//! references decode on read and text/attribute content is entity-encoded
//! on write; attribute values additionally escape `\n`, `\r`, `\t` as
//! character references so they survive attribute-value normalization.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::convert::Format;
use crate::error::{ConvertError, Location, Result};
use crate::value::Value;

/// Mapping-key prefix marking an XML attribute.
pub const ATTRIBUTE_PREFIX: char = '@';
/// Reserved mapping key holding element text alongside attributes/children.
pub const TEXT_KEY: &str = "#text";

/// Read-side policy switches. The default is the documented behavior; the
/// driver and CLI never deviate from it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    /// Apply the null/bool/integer/float inference chain to text and
    /// attribute values instead of keeping them as `String`.
    pub infer_scalars: bool,
}

/// Parse an XML document into its root tag name and a [`Value`].
pub fn parse(source: &str) -> Result<(String, Value)> {
    parse_with(source, ReadOptions::default())
}

/// [`parse`] with explicit [`ReadOptions`].
pub fn parse_with(source: &str, options: ReadOptions) -> Result<(String, Value)> {
    let mut reader = Reader::from_reader(source.as_bytes());
    reader.trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Value)> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if root.is_some() && stack.is_empty() {
                    return Err(syntax_at(
                        source,
                        reader.buffer_position(),
                        "document has more than one root element",
                    ));
                }
                let frame = Frame::open(&e, source, reader.buffer_position())?;
                stack.push(frame);
            }
            Ok(Event::Empty(e)) => {
                if root.is_some() && stack.is_empty() {
                    return Err(syntax_at(
                        source,
                        reader.buffer_position(),
                        "document has more than one root element",
                    ));
                }
                let frame = Frame::open(&e, source, reader.buffer_position())?;
                let (name, value) = frame.close(options);
                attach(&mut stack, &mut root, name, value);
            }
            Ok(Event::End(_)) => {
                // quick-xml has already checked that the tag names match
                match stack.pop() {
                    Some(frame) => {
                        let (name, value) = frame.close(options);
                        attach(&mut stack, &mut root, name, value);
                    }
                    None => {
                        return Err(syntax_at(
                            source,
                            reader.buffer_position(),
                            "closing tag without a matching opening tag",
                        ));
                    }
                }
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(|err| {
                    syntax_at(
                        source,
                        reader.buffer_position(),
                        format!("invalid text content: {err}"),
                    )
                })?;
                match stack.last_mut() {
                    Some(frame) => frame.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => {
                        return Err(syntax_at(
                            source,
                            reader.buffer_position(),
                            "text content outside the root element",
                        ));
                    }
                }
            }
            Ok(Event::CData(e)) => {
                let bytes = e.into_inner();
                let text = std::str::from_utf8(&bytes).map_err(|_| {
                    syntax_at(
                        source,
                        reader.buffer_position(),
                        "CDATA content is not valid UTF-8",
                    )
                })?;
                match stack.last_mut() {
                    Some(frame) => frame.text.push_str(text),
                    None => {
                        return Err(syntax_at(
                            source,
                            reader.buffer_position(),
                            "CDATA outside the root element",
                        ));
                    }
                }
            }
            Ok(Event::Eof) => break,
            // declaration, comments, processing instructions, DOCTYPE
            Ok(_) => {}
            Err(e) => return Err(syntax_at(source, reader.buffer_position(), e.to_string())),
        }
        buf.clear();
    }

    if let Some(frame) = stack.pop() {
        return Err(ConvertError::syntax(
            Format::Xml,
            format!("unclosed element <{}>", frame.name),
            None,
        ));
    }
    root.ok_or_else(|| {
        ConvertError::syntax(Format::Xml, "document has no root element", None)
    })
}

/// Write a [`Value`] as an XML document rooted at `root_name`.
///
/// Inverse of the reconciliation rules: `@` keys → attributes, `#text` →
/// text content, a `Sequence` under a key → repeated elements. A sequence
/// at the root, a sequence directly inside another sequence, a non-scalar
/// under an `@` key or `#text`, and names outside the accepted XML name
/// subset are [`ConvertError::Structure`].
pub fn write(root_name: &str, value: &Value) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(write_error)?;
    write_element(&mut writer, root_name, value)?;

    let mut out = String::from_utf8(writer.into_inner())
        .map_err(|e| ConvertError::structure(Format::Xml, e.to_string()))?;
    out.push('\n');
    Ok(out)
}

/// One partially-read element on the parse stack.
struct Frame {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<(String, Value)>,
}

impl Frame {
    fn open(start: &BytesStart<'_>, source: &str, position: usize) -> Result<Frame> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|_| syntax_at(source, position, "element name is not valid UTF-8"))?
            .to_string();

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            // duplicate attribute names are an attribute-parse error here
            let attr = attr.map_err(|e| {
                syntax_at(source, position, format!("bad attribute in <{name}>: {e}"))
            })?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|_| syntax_at(source, position, "attribute name is not valid UTF-8"))?
                .to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| {
                    syntax_at(
                        source,
                        position,
                        format!("invalid value for attribute '{key}' in <{name}>: {e}"),
                    )
                })?
                .into_owned();
            attributes.push((key, value));
        }

        Ok(Frame {
            name,
            attributes,
            text: String::new(),
            children: Vec::new(),
        })
    }

    /// Apply the reconciliation rules to a fully-read element.
    fn close(self, options: ReadOptions) -> (String, Value) {
        let Frame {
            name,
            attributes,
            text,
            children,
        } = self;
        let text = text.trim();

        if attributes.is_empty() && children.is_empty() {
            let value = if text.is_empty() {
                Value::Null
            } else {
                scalar(text, options)
            };
            return (name, value);
        }

        let mut entries = Vec::with_capacity(attributes.len() + children.len() + 1);
        for (attr_name, attr_value) in attributes {
            entries.push((
                format!("{ATTRIBUTE_PREFIX}{attr_name}"),
                scalar(&attr_value, options),
            ));
        }
        if !text.is_empty() {
            entries.push((TEXT_KEY.to_string(), scalar(text, options)));
        }
        for (child_name, child_value) in children {
            merge_child(&mut entries, child_name, child_value);
        }
        (name, Value::Mapping(entries))
    }
}

fn attach(stack: &mut Vec<Frame>, root: &mut Option<(String, Value)>, name: String, value: Value) {
    match stack.last_mut() {
        Some(parent) => parent.children.push((name, value)),
        None => *root = Some((name, value)),
    }
}

/// Attach a child under its tag; a repeated tag folds into a `Sequence` at
/// the first occurrence's position, even when other tags interleave.
fn merge_child(entries: &mut Vec<(String, Value)>, name: String, value: Value) {
    if let Some((_, existing)) = entries.iter_mut().find(|(k, _)| *k == name) {
        match existing {
            Value::Sequence(items) => items.push(value),
            _ => {
                let first = std::mem::replace(existing, Value::Null);
                *existing = Value::Sequence(vec![first, value]);
            }
        }
    } else {
        entries.push((name, value));
    }
}

fn scalar(text: &str, options: ReadOptions) -> Value {
    if options.infer_scalars {
        infer_scalar(text)
    } else {
        Value::String(text.to_string())
    }
}

/// Optional inference chain: null, booleans, i64, f64 (including the
/// `.inf`/`.nan` spellings [`write`] emits), else string.
fn infer_scalar(text: &str) -> Value {
    match text {
        "null" => Value::Null,
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        ".inf" => Value::Float(f64::INFINITY),
        "-.inf" => Value::Float(f64::NEG_INFINITY),
        ".nan" => Value::Float(f64::NAN),
        _ => {
            if let Ok(n) = text.parse::<i64>() {
                Value::Integer(n)
            } else if let Ok(f) = text.parse::<f64>() {
                Value::Float(f)
            } else {
                Value::String(text.to_string())
            }
        }
    }
}

fn write_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &Value,
) -> Result<()> {
    validate_name(name, "element")?;
    match value {
        Value::Mapping(entries) => write_mapping_element(writer, name, entries),
        Value::Sequence(_) => Err(ConvertError::structure(
            Format::Xml,
            format!("cannot write a sequence as the single element <{name}>: its items have no element name"),
        )),
        scalar => {
            // Null and the empty string both collapse to an empty element
            let text = scalar_text(scalar).unwrap_or_default();
            let elem = BytesStart::new(name);
            if text.is_empty() {
                writer.write_event(Event::Empty(elem)).map_err(write_error)
            } else {
                writer.write_event(Event::Start(elem)).map_err(write_error)?;
                writer
                    .write_event(Event::Text(BytesText::new(&text)))
                    .map_err(write_error)?;
                writer
                    .write_event(Event::End(BytesEnd::new(name)))
                    .map_err(write_error)
            }
        }
    }
}

fn write_mapping_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    entries: &[(String, Value)],
) -> Result<()> {
    let mut elem = BytesStart::new(name);
    let mut text = String::new();
    let mut children: Vec<(&str, &Value)> = Vec::new();

    for (key, value) in entries {
        if let Some(attr_name) = key.strip_prefix(ATTRIBUTE_PREFIX) {
            validate_name(attr_name, "attribute")?;
            let attr_value = scalar_text(value).ok_or_else(|| {
                ConvertError::structure(
                    Format::Xml,
                    format!(
                        "attribute '{key}' of <{name}> must be a scalar, found a {}",
                        value.kind()
                    ),
                )
            })?;
            elem.push_attribute((attr_name.as_bytes(), escape_attribute(&attr_value).as_bytes()));
        } else if key == TEXT_KEY {
            text = scalar_text(value).ok_or_else(|| {
                ConvertError::structure(
                    Format::Xml,
                    format!(
                        "'{TEXT_KEY}' of <{name}> must be a scalar, found a {}",
                        value.kind()
                    ),
                )
            })?;
        } else {
            children.push((key, value));
        }
    }

    if children.is_empty() && text.is_empty() {
        return writer.write_event(Event::Empty(elem)).map_err(write_error);
    }

    writer.write_event(Event::Start(elem)).map_err(write_error)?;
    if !text.is_empty() {
        writer
            .write_event(Event::Text(BytesText::new(&text)))
            .map_err(write_error)?;
    }
    for (child_name, child_value) in children {
        match child_value {
            // a sequence under a key fans out into repeated sibling elements
            Value::Sequence(items) => {
                for item in items {
                    if matches!(item, Value::Sequence(_)) {
                        return Err(ConvertError::structure(
                            Format::Xml,
                            format!(
                                "sequence nested directly under '{child_name}': inner items have no element name"
                            ),
                        ));
                    }
                    write_element(writer, child_name, item)?;
                }
            }
            _ => write_element(writer, child_name, child_value)?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(write_error)
}

/// Text rendering for scalars; `None` for sequences and mappings.
fn scalar_text(value: &Value) -> Option<String> {
    Some(match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Integer(n) => n.to_string(),
        Value::Float(f) => float_text(*f),
        Value::String(s) => s.clone(),
        Value::Sequence(_) | Value::Mapping(_) => return None,
    })
}

/// Integral floats keep a `.0` so they stay distinguishable from integers;
/// non-finite values use the spellings [`infer_scalar`] maps back.
fn float_text(f: f64) -> String {
    if f.is_nan() {
        return ".nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { ".inf" } else { "-.inf" }.to_string();
    }
    let s = f.to_string();
    if s.contains('.') {
        s
    } else {
        format!("{s}.0")
    }
}

/// Escape attribute content, including whitespace that attribute-value
/// normalization would otherwise rewrite. The caller pushes the result as
/// raw bytes to avoid double-escaping.
fn escape_attribute(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            '\t' => escaped.push_str("&#9;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Pragmatic subset of the XML Name grammar: first char alphabetic or
/// `_`, rest alphanumeric or `-`/`.`/`_`/`:`. Namespace prefixes pass
/// through untouched (namespaces themselves are not interpreted).
pub(crate) fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => {
            (first.is_alphabetic() || first == '_')
                && chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '.' | '_' | ':'))
        }
        None => false,
    }
}

fn validate_name(name: &str, role: &str) -> Result<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(ConvertError::structure(
            Format::Xml,
            format!("'{name}' is not a usable XML {role} name"),
        ))
    }
}

fn write_error(err: quick_xml::Error) -> ConvertError {
    ConvertError::structure(Format::Xml, format!("write error: {err}"))
}

/// Map a byte offset into a 1-based line/column (byte columns; a hint, not
/// a grapheme-exact position).
fn position_to_location(source: &str, offset: usize) -> Location {
    let bytes = &source.as_bytes()[..offset.min(source.len())];
    let line = bytes.iter().filter(|&&b| b == b'\n').count() + 1;
    let column = bytes.iter().rev().take_while(|&&b| b != b'\n').count() + 1;
    Location { line, column }
}

fn syntax_at(source: &str, offset: usize, message: impl Into<String>) -> ConvertError {
    let location = position_to_location(source, offset);
    ConvertError::syntax(
        Format::Xml,
        format!("{} at {location}", message.into()),
        Some(location),
    )
}
