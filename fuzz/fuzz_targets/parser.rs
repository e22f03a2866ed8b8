#![no_main]
//! The parser must never panic, and formatting whatever parsed must be
//! parseable again without losing value structure.

use libfuzzer_sys::fuzz_target;
use tessera_encoder::{format, FormatOptions};
use tessera_parser::Parser;

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };

    let Ok(tree) = Parser::new(source).parse() else {
        // Depth-limited inputs are the only hard failure.
        return;
    };

    if !tree.errors().is_empty() {
        return;
    }

    let formatted = format(&tree, &FormatOptions::default()).expect("default options are valid");
    let reparsed = Parser::new(&formatted)
        .parse()
        .expect("formatted output parses");
    assert!(
        reparsed.errors().is_empty(),
        "formatted output must be clean: {formatted:?}",
    );

    // Idempotence: formatting the formatted output changes nothing.
    let again = format(&reparsed, &FormatOptions::default()).expect("default options are valid");
    assert_eq!(formatted, again);
});
