#![no_main]

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tagstream::{ParserConfig, StepMessage, StreamParser, is_marker_prefix};

#[derive(Debug, Arbitrary)]
struct Input {
    text: String,
    cuts: Vec<u16>,
    streaming: bool,
}

fn parser(streaming: bool) -> StreamParser {
    let config = ParserConfig::new()
        .with_tags([("think", "reasoning"), ("tool", "tool call"), ("a", "short")])
        .with_streaming(streaming);
    match StreamParser::new(config) {
        Ok(parser) => parser,
        Err(err) => panic!("static config rejected: {err}"),
    }
}

fn by_label(messages: &[StepMessage]) -> BTreeMap<String, String> {
    let mut out = BTreeMap::<String, String>::new();
    for m in messages {
        out.entry(m.label.clone()).or_default().push_str(&m.content);
    }
    out
}

fuzz_target!(|input: Input| {
    let text = input.text.as_str();

    let mut bounds: Vec<usize> = input
        .cuts
        .iter()
        .map(|&c| usize::from(c) % (text.len() + 1))
        .filter(|&i| text.is_char_boundary(i))
        .collect();
    bounds.push(0);
    bounds.push(text.len());
    bounds.sort_unstable();
    bounds.dedup();

    let chunks: Vec<&str> = bounds.windows(2).map(|w| &text[w[0]..w[1]]).collect();

    let whole = parser(input.streaming).parse_all([text]);
    let mut split_parser = parser(input.streaming);
    let mut split = Vec::new();
    for chunk in &chunks {
        split.extend(split_parser.process_chunk(chunk));
        let pending = split_parser.pending();
        assert!(pending.is_empty() || is_marker_prefix(pending));
    }
    split.extend(split_parser.finalize());

    assert_eq!(by_label(&whole), by_label(&split));
    assert!(split.iter().all(|m| !m.content.is_empty()));

    let mut seen = BTreeMap::<&str, usize>::new();
    for m in &split {
        let last = seen.entry(m.label.as_str()).or_default();
        *last += 1;
        assert_eq!(m.ordinal, *last);
    }
});
