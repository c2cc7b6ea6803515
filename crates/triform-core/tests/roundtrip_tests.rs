//! Parse → write → parse idempotence per format, plus cross-format trips,
//! on a curated corpus of documents.

use triform_core::xml::{self, ReadOptions};
use triform_core::{convert_str, json, yaml, Format};

/// Assert parse → write → parse stability for one JSON document.
fn assert_json_roundtrip(source: &str) {
    let value = json::parse(source).expect("corpus document must parse");
    let written = json::write(&value).expect("write failed");
    let reread = json::parse(&written).expect("written document must re-parse");
    assert_eq!(
        value, reread,
        "JSON roundtrip failed:\n  input:   {source}\n  written: {written}"
    );
}

/// Assert parse → write → parse stability for one YAML document.
fn assert_yaml_roundtrip(source: &str) {
    let value = yaml::parse(source).expect("corpus document must parse");
    let written = yaml::write(&value).expect("write failed");
    let reread = yaml::parse(&written).expect("written document must re-parse");
    assert_eq!(
        value, reread,
        "YAML roundtrip failed:\n  input:   {source}\n  written: {written}"
    );
}

/// Assert parse → write → parse stability for one XML document, root
/// name included.
fn assert_xml_roundtrip(source: &str) {
    let (root, value) = xml::parse(source).expect("corpus document must parse");
    let written = xml::write(&root, &value).expect("write failed");
    let (root2, reread) = xml::parse(&written).expect("written document must re-parse");
    assert_eq!(root, root2, "root tag changed:\n  written: {written}");
    assert_eq!(
        value, reread,
        "XML roundtrip failed:\n  input:   {source}\n  written: {written}"
    );
}

// ============================================================================
// JSON
// ============================================================================

#[test]
fn json_scalars() {
    for doc in ["null", "true", "false", "0", "42", "-7", "3.14", "-0.5", "1e3"] {
        assert_json_roundtrip(doc);
    }
}

#[test]
fn json_strings() {
    for doc in [
        r#""""#,
        r#""hello""#,
        r#""with \"quotes\" and \\ backslash""#,
        r#""tab\tnewline\n""#,
        r#""café 你好""#,
        r#""42""#,
        r#""true""#,
    ] {
        assert_json_roundtrip(doc);
    }
}

#[test]
fn json_structures() {
    for doc in [
        "[]",
        "{}",
        "[1, 2, 3]",
        r#"[null, true, "mixed", 1.5]"#,
        r#"{"a": 1, "b": [2, 3], "c": {"d": null}}"#,
        r#"{"zebra": 1, "apple": 2, "mango": 3}"#,
        r#"[[1, 2], [3, 4]]"#,
    ] {
        assert_json_roundtrip(doc);
    }
}

#[test]
fn json_deeply_nested() {
    assert_json_roundtrip(r#"{"a": {"b": {"c": {"d": [{"e": [0]}]}}}}"#);
}

// ============================================================================
// YAML
// ============================================================================

#[test]
fn yaml_scalars() {
    for doc in [
        "null", "~", "true", "false", "42", "-7", "3.14", ".inf", "-.inf", ".nan", "hello",
        "'42'", "'true'",
    ] {
        assert_yaml_roundtrip(doc);
    }
}

#[test]
fn yaml_structures() {
    for doc in [
        "- a\n- b\n- c\n",
        "a: 1\nb: 2\n",
        "outer:\n  inner:\n    leaf: true\n",
        "servers:\n  - name: web\n    port: 80\n  - name: db\n    port: 5432\n",
        "{flow: [1, 2], style: ok}",
    ] {
        assert_yaml_roundtrip(doc);
    }
}

#[test]
fn yaml_ambiguous_strings_survive() {
    // quoted on input, must stay strings through write → parse
    assert_yaml_roundtrip("key: 'true'\nother: '3.14'\nthird: 'null'\n");
}

// ============================================================================
// XML
// ============================================================================

#[test]
fn xml_documents() {
    for doc in [
        "<empty/>",
        "<greeting>hello</greeting>",
        "<person><name>Alice</name><city>Lyon</city></person>",
        "<root><item>1</item><item>2</item><item>3</item></root>",
        r#"<user id="7" role="admin"><name>Alice</name></user>"#,
        r#"<price currency="EUR">9.99</price>"#,
        "<a><b><c>deep</c></b></a>",
        "<t>a &amp; b &lt;c&gt;</t>",
    ] {
        assert_xml_roundtrip(doc);
    }
}

#[test]
fn xml_roundtrip_with_scalar_inference() {
    let options = ReadOptions { infer_scalars: true };
    let source = "<m><count>3</count><ratio>2.5</ratio><ok>true</ok><none>null</none></m>";
    let (root, value) = xml::parse_with(source, options).unwrap();
    let written = xml::write(&root, &value).unwrap();
    let (_, reread) = xml::parse_with(&written, options).unwrap();
    assert_eq!(value, reread, "written: {written}");
}

// ============================================================================
// Cross-format
// ============================================================================

#[test]
fn json_to_yaml_to_json_is_lossless() {
    for doc in [
        r#"{"name": "Alice", "age": 30, "tags": ["a", "b"]}"#,
        r#"{"nested": {"int": 1, "float": 2.5, "bool": true, "null": null}}"#,
        r#"[1, "two", 3.0, false]"#,
    ] {
        let there = convert_str(Format::Json, Format::Yaml, doc).unwrap();
        let back = convert_str(Format::Yaml, Format::Json, &there).unwrap();
        assert_eq!(
            json::parse(doc).unwrap(),
            json::parse(&back).unwrap(),
            "lost through YAML:\n  yaml: {there}\n  back: {back}"
        );
    }
}

#[test]
fn json_to_xml_to_json_preserves_string_shapes() {
    // string leaves only: XML text is untyped, so typed leaves would come
    // back as strings under the default policy
    let doc = r#"{"book": {"title": "Dune", "author": "Herbert"}}"#;
    let there = convert_str(Format::Json, Format::Xml, doc).unwrap();
    let back = convert_str(Format::Xml, Format::Json, &there).unwrap();
    assert_eq!(json::parse(doc).unwrap(), json::parse(&back).unwrap());
}

#[test]
fn yaml_to_xml_to_yaml_preserves_string_shapes() {
    let doc = "report:\n  title: quarterly\n  owner: ops\n";
    let there = convert_str(Format::Yaml, Format::Xml, doc).unwrap();
    let back = convert_str(Format::Xml, Format::Yaml, &there).unwrap();
    assert_eq!(yaml::parse(doc).unwrap(), yaml::parse(&back).unwrap());
}

#[test]
fn all_format_pairs_accept_a_common_document() {
    let json_doc = r#"{"config": {"host": "localhost", "mode": "fast"}}"#;
    let formats = [Format::Json, Format::Yaml, Format::Xml];
    for source in formats {
        let doc = convert_str(Format::Json, source, json_doc).unwrap();
        for target in formats {
            let out = convert_str(source, target, &doc).unwrap();
            assert!(!out.is_empty(), "{source} -> {target} produced nothing");
        }
    }
}
