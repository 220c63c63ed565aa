mod property_filtered;

use alloc::{
    collections::VecDeque,
    string::{String, ToString},
    vec::Vec,
};

use tracing_subscriber::EnvFilter;

use crate::{
    AheadScanner, BufferLimits, RuleError, ScanError, TokenSource,
    reference::{Annotated, Token},
};

/// Routes `tracing` output to the test harness. Set `RUST_LOG=scanahead=trace`
/// to see every engine step.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// One scripted response of [`Scripted::advance`].
#[derive(Debug, Clone)]
pub(crate) enum Scene {
    Token {
        sequence_number: u64,
        is_match: bool,
    },
    End,
    Fail(&'static str),
}

/// Token source that replays a fixed script, including misbehaviour such as
/// producing tokens again after reporting the end. Its text is the sequence
/// number.
#[derive(Debug, Default)]
pub(crate) struct Scripted {
    script: VecDeque<Scene>,
    text: String,
    sequence_number: u64,
    matched: bool,
    err: Option<ScanError>,
    pub(crate) advances: usize,
}

impl Scripted {
    pub(crate) fn new(script: impl IntoIterator<Item = Scene>) -> Self {
        Self {
            script: script.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Tokens with the given sequence numbers and match flags, then the end.
    pub(crate) fn tokens(tokens: &[Token]) -> Self {
        Self::new(tokens.iter().map(|t| Scene::Token {
            sequence_number: t.sequence_number,
            is_match: t.is_match,
        }))
    }
}

impl TokenSource for Scripted {
    fn advance(&mut self) -> bool {
        self.advances += 1;
        self.text.clear();
        self.matched = false;
        match self.script.pop_front() {
            Some(Scene::Token {
                sequence_number,
                is_match,
            }) => {
                self.sequence_number = sequence_number;
                self.matched = is_match;
                self.text = sequence_number.to_string();
                true
            }
            Some(Scene::Fail(msg)) => {
                self.err = Some(ScanError::Rule(RuleError::from(msg)));
                false
            }
            Some(Scene::End) | None => false,
        }
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    fn is_match(&self) -> bool {
        self.matched
    }

    fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    fn error(&self) -> Option<&ScanError> {
        self.err.as_ref()
    }

    fn set_buffer_limits(&mut self, _limits: BufferLimits) {}
}

/// Drains `scanner`, collecting the facts of every delivered token.
pub(crate) fn online<S: TokenSource>(scanner: &mut AheadScanner<S>) -> Vec<Annotated> {
    let mut out = Vec::new();
    while scanner.advance() {
        out.push(Annotated {
            is_last: scanner.is_last(),
            run: scanner.run(),
        });
    }
    out
}

/// Builds tokens from `(is_match, gap)` pairs; a gap skips one sequence
/// number, as a dropping decorator would.
pub(crate) fn tokens_with_gaps(steps: &[(bool, bool)]) -> Vec<Token> {
    let mut sequence_number = 0;
    steps
        .iter()
        .map(|&(is_match, gap)| {
            sequence_number += if gap { 2 } else { 1 };
            Token {
                sequence_number,
                is_match,
            }
        })
        .collect()
}
