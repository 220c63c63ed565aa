//! Whole-buffer run detection, used to check the online engine.
//!
//! [`annotate`] sees every token at once, so it can compute the facts the
//! engine derives with one token of lookahead directly from their
//! definitions. The two must always agree.

use alloc::vec::Vec;

use crate::RunFacts;

/// One token as seen by the reference computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Sequence number reported by the source.
    pub sequence_number: u64,
    /// Whether the token matched.
    pub is_match: bool,
}

/// Facts of one token in a fully buffered stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Annotated {
    /// Whether the token is the final one.
    pub is_last: bool,
    /// Run facts.
    pub run: RunFacts,
}

fn continues(prev: Token, next: Token) -> bool {
    prev.is_match && next.is_match && prev.sequence_number.checked_add(1) == Some(next.sequence_number)
}

/// Computes per-token facts for a complete stream.
#[must_use]
pub fn annotate(tokens: &[Token]) -> Vec<Annotated> {
    let mut out: Vec<Annotated> = Vec::with_capacity(tokens.len());
    for (i, &token) in tokens.iter().enumerate() {
        let next = tokens.get(i + 1).copied();
        let mut run = RunFacts::default();
        if token.is_match {
            run.begin = i == 0 || !continues(tokens[i - 1], token);
            run.end = next.is_none_or(|next| !continues(token, next));
            run.length = if run.begin {
                1
            } else {
                out[i - 1].run.length + 1
            };
        }
        out.push(Annotated {
            is_last: next.is_none(),
            run,
        });
    }
    out
}
