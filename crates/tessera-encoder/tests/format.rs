use indoc::indoc;
use pretty_assertions::assert_eq;
use tessera_encoder::{format, format_source, format_source_with, EncodeError, FormatOptions, QuoteStyle};
use tessera_parser::{Parser, ParserOptions};

#[test]
fn simple_object_round_trip() {
    let tree = Parser::new(r#"{"name":"Alice","age":30}"#).parse().unwrap();
    let output = format(&tree, &FormatOptions::default()).unwrap();
    assert_eq!(
        output,
        indoc! {r#"
            {
              "name": "Alice",
              "age": 30
            }
        "#},
    );
}

#[test]
fn key_sort_plus_compact() {
    let output = format_source(
        r#"{"zebra":1,"alpha":2,"beta":3}"#,
        &FormatOptions::default().sort_keys(true).force_compact(true),
    )
    .unwrap();
    assert_eq!(output, r#"{"alpha":2,"beta":3,"zebra":1}"#);
}

#[test]
fn empty_containers_format_to_themselves() {
    let option_sets = [
        FormatOptions::default(),
        FormatOptions::default().force_compact(true),
        FormatOptions::default().force_multiline(true),
        FormatOptions::default().sort_keys(true).indent_size(7),
        FormatOptions::default()
            .compact_objects(true)
            .compact_arrays(true),
    ];
    for options in &option_sets {
        assert_eq!(format_source("{}", options).unwrap(), "{}");
        assert_eq!(format_source("[]", options).unwrap(), "[]");
    }
}

#[test]
fn numbers_are_reproduced_verbatim() {
    let output = format_source(
        r#"[1e01, -0.500, 3.14159e-2, 9007199254740993]"#,
        &FormatOptions::default().force_compact(true),
    )
    .unwrap();
    assert_eq!(output, "[1e01,-0.500,3.14159e-2,9007199254740993]");
}

#[test]
fn strings_are_reescaped_from_decoded_values() {
    let output = format_source(
        r#"["line\nbreak", "tab\there", "quote\"inside", "café"]"#,
        &FormatOptions::default().force_compact(true),
    )
    .unwrap();
    // Decoded content is re-escaped with short escapes; the é became
    // a literal é and stays unescaped.
    assert_eq!(
        output,
        "[\"line\\nbreak\",\"tab\\there\",\"quote\\\"inside\",\"caf\u{e9}\"]",
    );
}

#[test]
fn compact_heuristic_respects_line_width_and_nesting() {
    let options = FormatOptions::default()
        .compact_objects(true)
        .compact_arrays(true);

    // Small and flat: collapses.
    assert_eq!(
        format_source(r#"{"a":1,"b":2}"#, &options.clone()).unwrap(),
        r#"{"a":1,"b":2}"#,
    );

    // A container child forces multiline even though the estimate is tiny.
    assert_eq!(
        format_source(r#"{"a":[1]}"#, &options.clone()).unwrap(),
        "{\n  \"a\": [\n    1\n  ]\n}\n",
    );

    // Over half the line width: stays multiline.
    let wide = r#"{"k1":"0123456789","k2":"0123456789","k3":"0123456789","k4":"0123456789"}"#;
    let narrow = options.line_width(40);
    let output = format_source(wide, &narrow).unwrap();
    assert!(output.contains('\n'), "{output}");
}

#[test]
fn multiline_uses_indent_options() {
    let output = format_source(
        r#"{"a":[true]}"#,
        &FormatOptions::default().indent_size(4),
    )
    .unwrap();
    assert_eq!(output, "{\n    \"a\": [\n        true\n    ]\n}\n");

    let output = format_source(
        r#"{"a":1}"#,
        &FormatOptions::default()
            .indent_size(1)
            .indent_style(tessera_encoder::IndentStyle::Tab),
    )
    .unwrap();
    assert_eq!(output, "{\n\t\"a\": 1\n}\n");
}

#[test]
fn quote_style_single_requires_json5() {
    let err = format_source(
        r#""x""#,
        &FormatOptions::default().quote_style(QuoteStyle::Single),
    )
    .unwrap_err();
    assert_eq!(err, EncodeError::OptionsConflict("QuoteStyle::Single"));

    let output = format_source(
        r#"["it's", "fine"]"#,
        &FormatOptions::default()
            .json5(true)
            .quote_style(QuoteStyle::Single)
            .force_compact(true),
    )
    .unwrap();
    assert_eq!(output, r#"['it\'s','fine']"#);
}

#[test]
fn quote_style_preserve_keeps_source_quotes() {
    let output = format_source_with(
        r#"{'single': "double"}"#,
        ParserOptions::json5(),
        &FormatOptions::default()
            .json5(true)
            .quote_style(QuoteStyle::Preserve)
            .force_compact(true),
    )
    .unwrap();
    assert_eq!(output, r#"{'single':"double"}"#);
}

#[test]
fn trailing_comma_requires_json5_and_lands_in_multiline_output() {
    let err = format_source(r#"[1]"#, &FormatOptions::default().trailing_comma(true)).unwrap_err();
    assert_eq!(err, EncodeError::OptionsConflict("trailing_comma"));

    let output = format_source(
        r#"{"a":[1,2]}"#,
        &FormatOptions::default().json5(true).trailing_comma(true),
    )
    .unwrap();
    assert_eq!(output, "{\n  \"a\": [\n    1,\n    2,\n  ],\n}\n");
}

#[test]
fn formatting_is_idempotent() {
    let corpus = [
        r#"{"name":"Alice","age":30,"tags":["a","b"],"nested":{"x":[1,2,3]}}"#,
        r#"[0, -1.5, "two", true, false, null, {}, []]"#,
        r#"{"esc":"a\nbé","deep":[[[1]]]}"#,
    ];
    for source in corpus {
        for options in [
            FormatOptions::default(),
            FormatOptions::default().force_compact(true),
            FormatOptions::default().sort_keys(true),
            FormatOptions::default()
                .compact_objects(true)
                .compact_arrays(true)
                .space_after_colon(true)
                .space_after_comma(true),
        ] {
            let once = format_source(source, &options).unwrap();
            let twice = format_source(&once, &options).unwrap();
            assert_eq!(once, twice, "{source}");
        }
    }
}

#[test]
fn sort_keys_is_idempotent() {
    let options = FormatOptions::default().sort_keys(true);
    let once = format_source(r#"{"c":1,"a":{"z":1,"y":2},"b":3}"#, &options).unwrap();
    let twice = format_source(&once, &options).unwrap();
    assert_eq!(once, twice);
    // And sorted order is by decoded key bytes.
    let compact = format_source(
        r#"{"c":1,"a":{"z":1,"y":2},"b":3}"#,
        &FormatOptions::default().sort_keys(true).force_compact(true),
    )
    .unwrap();
    assert_eq!(compact, r#"{"a":{"y":2,"z":1},"b":3,"c":1}"#);
}

#[test]
fn output_is_semantically_equal_to_input() {
    // serde_json as an independent oracle: formatting must preserve value
    // equality, including property order.
    let corpus = [
        r#"{"name":"Alice","age":30}"#,
        r#"[1.5e300, -7, "❤", {"k": [null, false]}]"#,
        r#"{"a":{"b":{"c":[{}]}}}"#,
    ];
    for source in corpus {
        for options in [
            FormatOptions::default(),
            FormatOptions::default().force_compact(true),
            FormatOptions::default().space_after_comma(true).space_after_colon(true).compact_arrays(true).compact_objects(true),
        ] {
            let formatted = format_source(source, &options).unwrap();
            let before: serde_json::Value = serde_json::from_str(source).unwrap();
            let after: serde_json::Value = serde_json::from_str(&formatted).unwrap();
            assert_eq!(before, after, "{source}");
        }
    }
}

#[test]
fn recovered_documents_still_format() {
    // `01` became an error node; its raw text passes through.
    let tree = Parser::new("[0, 01, 2]").parse().unwrap();
    assert!(!tree.errors().is_empty());
    let output = format(&tree, &FormatOptions::default().force_compact(true)).unwrap();
    assert_eq!(output, "[0,01,2]");
}

#[test]
fn json5_input_formats_to_strict_json() {
    let output = format_source_with(
        "// config\n{'a': 1, /* trailing */ 'b': [2,],}",
        ParserOptions::json5(),
        &FormatOptions::default().force_compact(true),
    )
    .unwrap();
    assert_eq!(output, r#"{"a":1,"b":[2]}"#);
}
