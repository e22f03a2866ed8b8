use criterion::*;
use tessera_parser::{Lexer, Parser, StreamLexer, LexerOptions};

/// Build a ~10 KB document with realistic shape: nested objects, arrays,
/// strings with the occasional escape, and a mix of number forms.
fn sample_document() -> String {
    let mut doc = String::from("{\n  \"records\": [\n");
    for i in 0..100 {
        doc.push_str(&format!(
            "    {{\"id\": {i}, \"name\": \"user-{i}\", \"score\": {}.{}e2, \"tags\": [\"a\\n\", \"b\"], \"active\": {}}},\n",
            i * 3,
            i % 10,
            i % 2 == 0,
        ));
    }
    doc.push_str("    null\n  ]\n}\n");
    doc
}

fn bench_lexer(c: &mut Criterion) {
    let doc = sample_document();

    c.bench_function("lex_batch_10kb", |b| {
        b.iter(|| {
            let lexer = Lexer::new(&doc);
            assert!(lexer.errors().is_empty());
            black_box(lexer.tokens().len());
        })
    });

    c.bench_function("lex_stream_4kb_chunks", |b| {
        b.iter(|| {
            let mut lexer = StreamLexer::new(LexerOptions::default());
            let mut tokens = Vec::new();
            for chunk_start in (0..doc.len()).step_by(4096) {
                let end = (chunk_start + 4096).min(doc.len());
                lexer.feed_into(&doc[chunk_start..end], &mut tokens).unwrap();
            }
            tokens.extend(lexer.finish().unwrap());
            black_box(tokens.len());
        })
    });
}

fn bench_parser(c: &mut Criterion) {
    let doc = sample_document();

    c.bench_function("parse_10kb", |b| {
        b.iter(|| {
            let tree = Parser::new(&doc).parse().unwrap();
            assert!(tree.errors().is_empty());
            black_box(tree.node_count());
        })
    });
}

criterion_group!(benches, bench_lexer, bench_parser);
criterion_main!(benches);
