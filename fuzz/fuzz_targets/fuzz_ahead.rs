#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use scanahead::{
    AheadScanner, BufferLimits, ReaderSource, SourceExt, TokenSource, Words,
    reference::{Annotated, Token, annotate},
};

#[derive(Debug, Arbitrary)]
struct Input {
    /// Byte whose presence makes a word match.
    marker: u8,
    /// Whether non-matching words are dropped before the lookahead engine.
    drop_non_matching: bool,
    initial: u8,
    max: u16,
    text: Vec<u8>,
}

/// Reads the words once without lookahead, recording what the engine must
/// later report.
fn offline(input: &Input, limits: BufferLimits) -> (Vec<Token>, Vec<Vec<u8>>, Option<String>) {
    let mut source = ReaderSource::with_split(&input.text[..], Words);
    source.set_buffer_limits(limits);
    let mut tokens = Vec::new();
    let mut words = Vec::new();
    while source.advance() {
        let is_match = source.bytes().contains(&input.marker);
        if input.drop_non_matching && !is_match {
            continue;
        }
        tokens.push(Token {
            sequence_number: source.sequence_number(),
            is_match,
        });
        words.push(source.bytes().to_vec());
    }
    (tokens, words, source.error().map(ToString::to_string))
}

type Facts = (Vec<Annotated>, Vec<Vec<u8>>, Option<String>);

/// Drains the engine, recording what it reports for every token.
fn online<S: TokenSource>(mut scanner: AheadScanner<S>, limits: BufferLimits) -> Facts {
    scanner.set_buffer_limits(limits);
    let mut facts = Vec::new();
    let mut words = Vec::new();
    while scanner.advance() {
        facts.push(Annotated {
            is_last: scanner.is_last(),
            run: scanner.run(),
        });
        words.push(scanner.bytes().to_vec());
    }
    assert!(!scanner.advance());
    (facts, words, scanner.error().map(ToString::to_string))
}

fuzz_target!(|input: Input| {
    let limits = BufferLimits::new(usize::from(input.initial), usize::from(input.max));
    let (tokens, words, err) = offline(&input, limits);
    let expected = (annotate(&tokens), words, err);

    let marker = input.marker;
    let source = ReaderSource::with_split(&input.text[..], Words)
        .with_rule(move |t: &[u8]| Ok(t.contains(&marker)));
    let actual = if input.drop_non_matching {
        online(source.only_matching().ahead(), limits)
    } else {
        online(source.ahead(), limits)
    };

    assert_eq!(actual, expected);
});
