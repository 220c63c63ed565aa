//! Token sources: the narrow capability surface the lookahead engine reads
//! from, plus the sources and decorators shipped with the crate.
//!
//! A [`TokenSource`] behaves like a cursor. `advance()` moves to the next
//! token, and the accessors describe that token until the next `advance()`.
//! The accessors borrow from the source, so the borrow checker rules out
//! holding a token across an advance; anything that must outlive a step has to
//! be copied, which is exactly what [`AheadScanner`] does.
//!
//! Sequence numbers are part of the contract. A decorator that drops tokens
//! (such as [`OnlyMatching`](rule::OnlyMatching)) must report the inner
//! source's sequence number unchanged, otherwise run detection downstream can
//! no longer see the gaps left by dropped tokens.

pub(crate) mod iter;
#[cfg(feature = "std")]
pub(crate) mod reader;
pub(crate) mod rule;
pub(crate) mod split;

use alloc::{boxed::Box, string::String};

use self::rule::{OnlyMatching, OnlyNonMatching, Rewrite, RuleSource};
use crate::{AheadScanner, BufferLimits, RuleError, ScanError};

/// A sequential, pull-based source of tokens.
pub trait TokenSource {
    /// Moves to the next token.
    ///
    /// Returns `false` at end of input or when the source halted on an error;
    /// [`error`](Self::error) tells the two apart.
    fn advance(&mut self) -> bool;

    /// Text of the current token.
    fn text(&self) -> &str;

    /// Raw bytes of the current token.
    fn bytes(&self) -> &[u8];

    /// Whether the current token satisfies the source's match rule.
    fn is_match(&self) -> bool;

    /// 1-based number of tokens produced so far; 0 before the first token.
    fn sequence_number(&self) -> u64;

    /// The error that halted the source, if any. Sticky once set.
    fn error(&self) -> Option<&ScanError>;

    /// Reconfigures buffer sizes. Call it before the first `advance`; later
    /// calls only affect buffers allocated or grown afterwards.
    fn set_buffer_limits(&mut self, limits: BufferLimits);
}

impl<S: TokenSource + ?Sized> TokenSource for &mut S {
    #[inline]
    fn advance(&mut self) -> bool {
        (**self).advance()
    }

    #[inline]
    fn text(&self) -> &str {
        (**self).text()
    }

    #[inline]
    fn bytes(&self) -> &[u8] {
        (**self).bytes()
    }

    #[inline]
    fn is_match(&self) -> bool {
        (**self).is_match()
    }

    #[inline]
    fn sequence_number(&self) -> u64 {
        (**self).sequence_number()
    }

    #[inline]
    fn error(&self) -> Option<&ScanError> {
        (**self).error()
    }

    #[inline]
    fn set_buffer_limits(&mut self, limits: BufferLimits) {
        (**self).set_buffer_limits(limits);
    }
}

impl<S: TokenSource + ?Sized> TokenSource for Box<S> {
    #[inline]
    fn advance(&mut self) -> bool {
        (**self).advance()
    }

    #[inline]
    fn text(&self) -> &str {
        (**self).text()
    }

    #[inline]
    fn bytes(&self) -> &[u8] {
        (**self).bytes()
    }

    #[inline]
    fn is_match(&self) -> bool {
        (**self).is_match()
    }

    #[inline]
    fn sequence_number(&self) -> u64 {
        (**self).sequence_number()
    }

    #[inline]
    fn error(&self) -> Option<&ScanError> {
        (**self).error()
    }

    #[inline]
    fn set_buffer_limits(&mut self, limits: BufferLimits) {
        (**self).set_buffer_limits(limits);
    }
}

/// Fluent composition of sources, decorators and the lookahead engine.
///
/// ```rust
/// use scanahead::{IterSource, SourceExt};
///
/// let mut scanner = IterSource::new(["# a", "b", "# c"])
///     .filter(|token: &[u8]| Ok(token.starts_with(b"#")))
///     .ahead();
/// assert!(scanner.advance());
/// assert_eq!((scanner.sequence_number(), scanner.text()), (1, "# a"));
/// assert!(scanner.advance());
/// assert_eq!((scanner.sequence_number(), scanner.text()), (3, "# c"));
/// assert!(scanner.is_last());
/// ```
pub trait SourceExt: TokenSource + Sized {
    /// Flags each token with the result of `rule`.
    fn with_rule<F>(self, rule: F) -> RuleSource<Self, F>
    where
        F: FnMut(&[u8]) -> Result<bool, RuleError>,
    {
        RuleSource::new(self, rule)
    }

    /// Skips tokens that do not match.
    fn only_matching(self) -> OnlyMatching<Self> {
        OnlyMatching::new(self)
    }

    /// Skips tokens that match.
    fn only_non_matching(self) -> OnlyNonMatching<Self> {
        OnlyNonMatching::new(self)
    }

    /// Keeps only the tokens accepted by `rule`.
    fn filter<F>(self, rule: F) -> OnlyMatching<RuleSource<Self, F>>
    where
        F: FnMut(&[u8]) -> Result<bool, RuleError>,
    {
        rule::filter(self, rule)
    }

    /// Flags each token and replaces its text with the output of `rule`.
    fn rewrite<F>(self, rule: F) -> Rewrite<Self, F>
    where
        F: FnMut(&str, &mut String) -> bool,
    {
        Rewrite::new(self, rule)
    }

    /// Wraps the source in a lookahead engine.
    fn ahead(self) -> AheadScanner<Self> {
        AheadScanner::new(self)
    }
}

impl<S: TokenSource> SourceExt for S {}
