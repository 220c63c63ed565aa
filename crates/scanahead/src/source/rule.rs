//! Decorators that flag, drop or rewrite tokens of another source.
//!
//! All decorators report the inner source's sequence numbers unchanged, so a
//! token keeps its original position even when its neighbours are dropped.

use alloc::string::String;
use core::fmt;

use tracing::debug;

use crate::{BufferLimits, RuleError, ScanError, TokenSource};

/// Forwards the `TokenSource` methods a decorator does not override to its
/// `inner` field.
macro_rules! forward_to_inner {
    (text) => {
        fn text(&self) -> &str {
            self.inner.text()
        }
    };
    (is_match) => {
        fn is_match(&self) -> bool {
            self.inner.is_match()
        }
    };
    (error) => {
        fn error(&self) -> Option<&ScanError> {
            self.inner.error()
        }
    };
    (common) => {
        fn bytes(&self) -> &[u8] {
            self.inner.bytes()
        }

        fn sequence_number(&self) -> u64 {
            self.inner.sequence_number()
        }

        fn set_buffer_limits(&mut self, limits: BufferLimits) {
            self.inner.set_buffer_limits(limits);
        }
    };
}

/// Flags each token with the result of a match rule.
///
/// A rule error halts the stream: `advance` returns `false` from then on and
/// [`error`](TokenSource::error) reports [`ScanError::Rule`].
pub struct RuleSource<S, F> {
    inner: S,
    rule: F,
    matched: bool,
    err: Option<ScanError>,
}

impl<S, F> RuleSource<S, F>
where
    S: TokenSource,
    F: FnMut(&[u8]) -> Result<bool, RuleError>,
{
    /// Wraps `inner`, classifying its tokens with `rule`.
    pub fn new(inner: S, rule: F) -> Self {
        Self {
            inner,
            rule,
            matched: false,
            err: None,
        }
    }

    /// Returns the wrapped source.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, F> TokenSource for RuleSource<S, F>
where
    S: TokenSource,
    F: FnMut(&[u8]) -> Result<bool, RuleError>,
{
    fn advance(&mut self) -> bool {
        self.matched = false;
        if self.err.is_some() || !self.inner.advance() {
            return false;
        }
        match (self.rule)(self.inner.bytes()) {
            Ok(matched) => {
                self.matched = matched;
                true
            }
            Err(e) => {
                let err = ScanError::Rule(e);
                debug!(
                    target: "scanahead",
                    sequence_number = self.inner.sequence_number(),
                    error = %err,
                    "match rule halted the stream"
                );
                self.err = Some(err);
                false
            }
        }
    }

    fn is_match(&self) -> bool {
        self.matched
    }

    fn error(&self) -> Option<&ScanError> {
        self.err.as_ref().or_else(|| self.inner.error())
    }

    forward_to_inner!(text);
    forward_to_inner!(common);
}

impl<S: fmt::Debug, F> fmt::Debug for RuleSource<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSource")
            .field("inner", &self.inner)
            .field("matched", &self.matched)
            .field("err", &self.err)
            .finish_non_exhaustive()
    }
}

/// Passes through only the tokens whose match flag is set.
#[derive(Debug)]
pub struct OnlyMatching<S> {
    inner: S,
}

impl<S: TokenSource> OnlyMatching<S> {
    /// Wraps `inner`.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Returns the wrapped source.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: TokenSource> TokenSource for OnlyMatching<S> {
    fn advance(&mut self) -> bool {
        while self.inner.advance() {
            if self.inner.is_match() {
                return true;
            }
        }
        false
    }

    forward_to_inner!(text);
    forward_to_inner!(is_match);
    forward_to_inner!(error);
    forward_to_inner!(common);
}

/// Passes through only the tokens whose match flag is clear.
#[derive(Debug)]
pub struct OnlyNonMatching<S> {
    inner: S,
}

impl<S: TokenSource> OnlyNonMatching<S> {
    /// Wraps `inner`.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Returns the wrapped source.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: TokenSource> TokenSource for OnlyNonMatching<S> {
    fn advance(&mut self) -> bool {
        while self.inner.advance() {
            if !self.inner.is_match() {
                return true;
            }
        }
        false
    }

    forward_to_inner!(text);
    forward_to_inner!(is_match);
    forward_to_inner!(error);
    forward_to_inner!(common);
}

/// Keeps only the tokens of `inner` accepted by `rule`.
///
/// ```rust
/// use scanahead::{IterSource, TokenSource, filter};
///
/// let mut source = filter(IterSource::new(["1234", "5678", "123456"]), |t: &[u8]| {
///     Ok(t.first() == Some(&b'1'))
/// });
/// let mut kept = Vec::new();
/// while source.advance() {
///     kept.push(source.text().to_owned());
/// }
/// assert_eq!(kept, ["1234", "123456"]);
/// ```
pub fn filter<S, F>(inner: S, rule: F) -> OnlyMatching<RuleSource<S, F>>
where
    S: TokenSource,
    F: FnMut(&[u8]) -> Result<bool, RuleError>,
{
    OnlyMatching::new(RuleSource::new(inner, rule))
}

/// Flags each token and replaces its text.
///
/// The rule receives the inner token's text and an empty buffer; it writes
/// the replacement text into the buffer and returns the match flag. The
/// original bytes stay available through [`bytes`](TokenSource::bytes).
pub struct Rewrite<S, F> {
    inner: S,
    rule: F,
    text: String,
    matched: bool,
}

impl<S, F> Rewrite<S, F>
where
    S: TokenSource,
    F: FnMut(&str, &mut String) -> bool,
{
    /// Wraps `inner`, rewriting its tokens with `rule`.
    pub fn new(inner: S, rule: F) -> Self {
        Self {
            inner,
            rule,
            text: String::new(),
            matched: false,
        }
    }

    /// Returns the wrapped source.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, F> TokenSource for Rewrite<S, F>
where
    S: TokenSource,
    F: FnMut(&str, &mut String) -> bool,
{
    fn advance(&mut self) -> bool {
        self.text.clear();
        self.matched = false;
        if !self.inner.advance() {
            return false;
        }
        self.matched = (self.rule)(self.inner.text(), &mut self.text);
        true
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn is_match(&self) -> bool {
        self.matched
    }

    forward_to_inner!(error);
    forward_to_inner!(common);
}

impl<S: fmt::Debug, F> fmt::Debug for Rewrite<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rewrite")
            .field("inner", &self.inner)
            .field("text", &self.text)
            .field("matched", &self.matched)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::ToString, vec::Vec};

    use super::*;
    use crate::{IterSource, SourceExt};

    fn starts_with_hash(token: &[u8]) -> Result<bool, RuleError> {
        Ok(token.starts_with(b"#"))
    }

    fn drain<S: TokenSource>(mut source: S) -> Vec<(u64, bool, String)> {
        let mut out = Vec::new();
        while source.advance() {
            out.push((source.sequence_number(), source.is_match(), source.text().to_string()));
        }
        out
    }

    const COMMENTS: [&str; 5] = ["", "# comment 1", "  ", "#comment2", "something"];

    #[test]
    fn rule_flags_tokens() {
        let out = drain(IterSource::new(COMMENTS).with_rule(starts_with_hash));
        let flags: Vec<_> = out.iter().map(|(n, m, _)| (*n, *m)).collect();
        assert_eq!(flags, [(1, false), (2, true), (3, false), (4, true), (5, false)]);
    }

    #[test]
    fn only_matching_keeps_sequence_numbers() {
        let out = drain(IterSource::new(COMMENTS).filter(starts_with_hash));
        assert_eq!(
            out,
            [
                (2, true, "# comment 1".to_string()),
                (4, true, "#comment2".to_string()),
            ]
        );
    }

    #[test]
    fn only_non_matching() {
        let out = drain(
            IterSource::new(COMMENTS)
                .with_rule(starts_with_hash)
                .only_non_matching(),
        );
        let numbers: Vec<_> = out.iter().map(|(n, _, _)| *n).collect();
        assert_eq!(numbers, [1, 3, 5]);
        assert!(out.iter().all(|(_, m, _)| !m));
    }

    #[test]
    fn plain_source_has_no_non_matching_tokens() {
        let mut source = IterSource::new(COMMENTS).only_non_matching();
        assert!(!source.advance());
        assert_eq!(source.sequence_number(), 5);
    }

    #[test]
    fn rule_error_is_sticky() {
        let mut calls = 0;
        let mut source = IterSource::new(["1", "x", "2"]).with_rule(|t: &[u8]| {
            calls += 1;
            core::str::from_utf8(t)?.parse::<u32>()?;
            Ok(true)
        });
        assert!(source.advance());
        assert!(!source.advance());
        assert!(!source.advance());
        assert!(!source.is_match());
        let err = source.error().expect("rule error");
        assert!(matches!(err, ScanError::Rule(_)));
        assert_eq!(err.to_string(), "match rule failed: invalid digit found in string");
        drop(source);
        assert_eq!(calls, 2);
    }

    #[test]
    fn inner_error_passes_through() {
        let mut inner = IterSource::new(["abcdef"]);
        inner.set_buffer_limits(BufferLimits::new(1, 2));
        let mut source = inner.with_rule(starts_with_hash);
        assert!(!source.advance());
        assert!(matches!(
            source.error(),
            Some(ScanError::TokenTooLong { max: 2 })
        ));
    }

    #[test]
    fn rewrite_replaces_text_keeps_bytes() {
        let mut source = IterSource::new(["# note", "code"]).rewrite(|text, out| {
            match text.strip_prefix("# ") {
                Some(rest) => {
                    out.push_str(rest);
                    true
                }
                None => false,
            }
        });
        assert!(source.advance());
        assert_eq!((source.text(), source.bytes(), source.is_match()), ("note", &b"# note"[..], true));
        assert!(source.advance());
        assert_eq!((source.text(), source.is_match()), ("", false));
        assert!(!source.advance());
    }
}
