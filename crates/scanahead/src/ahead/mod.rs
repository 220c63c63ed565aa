//! Lookahead engine.
//!
//! [`AheadScanner`] keeps a window of two [`Snapshot`]s over its source:
//! `current`, the token reported to the caller, and `pending`, the token after
//! it. Each `advance` swaps the two and recaptures `pending` in place, so the
//! source is read exactly one token ahead and the window never allocates
//! after the first step (unless the limits are raised).
//!
//! Knowing `pending` answers the two questions `current` alone cannot:
//! whether `current` is the last token, and whether a run of matches ends at
//! `current`. The run state machine lives in [`RunTracker`].
//!
//! Invariants
//! - Before the first `advance` there is no window.
//! - Once `current` fails to advance the engine is exhausted: the source is
//!   never advanced again and every accessor except `sequence_number`
//!   reports neutral values.
//! - A source failure discovered while filling `pending` is reported one step
//!   later, after `current` has been delivered.

use alloc::{string::String, vec::Vec};
use core::{iter::FusedIterator, mem};

use tracing::{debug, trace};

use crate::{BufferLimits, RunFacts, RunTracker, ScanError, Snapshot, TokenSource};


#[derive(Debug)]
struct Window {
    current: Snapshot,
    pending: Snapshot,
}

/// Token scanner that knows whether each token is the last one and where
/// runs of matching tokens begin and end.
///
/// ```rust
/// use scanahead::{IterSource, SourceExt};
///
/// let words = ["34", "1234", "145", "1", "2"];
/// let mut scanner = IterSource::new(words)
///     .with_rule(|t: &[u8]| Ok(t.starts_with(b"1")))
///     .ahead();
/// let mut runs = Vec::new();
/// let mut begin = 0;
/// while scanner.advance() {
///     if scanner.run_begin() {
///         begin = scanner.sequence_number();
///     }
///     if scanner.run_end() {
///         runs.push((begin..=scanner.sequence_number(), scanner.run_length()));
///     }
/// }
/// assert_eq!(runs, [(2..=4, 3)]);
/// ```
#[derive(Debug)]
pub struct AheadScanner<S> {
    source: S,
    limits: BufferLimits,
    window: Option<Window>,
    tracker: RunTracker,
    exhausted: bool,
}

impl<S: TokenSource> AheadScanner<S> {
    /// Wraps `source`. Nothing is read until the first [`advance`](Self::advance).
    pub fn new(source: S) -> Self {
        Self {
            source,
            limits: BufferLimits::default(),
            window: None,
            tracker: RunTracker::new(),
            exhausted: false,
        }
    }

    /// Moves to the next token.
    ///
    /// Returns `false` once the source is exhausted or halted, and keeps
    /// returning `false` afterwards even if the source could produce more.
    pub fn advance(&mut self) -> bool {
        if self.exhausted {
            return false;
        }

        let window = match self.window.take() {
            None => self.start(),
            Some(mut window) => {
                self.shift(&mut window);
                window
            }
        };
        let window = self.window.insert(window);

        let facts = self.tracker.update(&window.current, &window.pending);
        if !window.current.advanced() {
            self.exhausted = true;
            window.pending.exhaust();
            match self.source.error() {
                Some(err) => debug!(
                    target: "scanahead",
                    sequence_number = window.current.sequence_number(),
                    error = %err,
                    "lookahead halted by source error"
                ),
                None => debug!(
                    target: "scanahead",
                    sequence_number = window.current.sequence_number(),
                    "lookahead exhausted"
                ),
            }
            return false;
        }

        trace!(
            target: "scanahead",
            sequence_number = window.current.sequence_number(),
            is_match = window.current.is_match(),
            is_last = !window.pending.advanced(),
            run_begin = facts.begin,
            run_end = facts.end,
            run_length = facts.length,
            "advanced"
        );
        true
    }

    /// Fills a fresh window with the first two tokens.
    fn start(&mut self) -> Window {
        let mut current = Snapshot::with_limits(self.limits);
        let mut pending = Snapshot::with_limits(self.limits);
        let advanced = self.source.advance();
        current.capture(&self.source, advanced);
        let ahead = self.source.advance();
        pending.capture(&self.source, ahead);
        debug!(target: "scanahead", empty = !advanced, "lookahead started");
        Window { current, pending }
    }

    /// Promotes `pending` to `current` and refills `pending` in place.
    fn shift(&mut self, window: &mut Window) {
        mem::swap(&mut window.current, &mut window.pending);
        if window.current.advanced() {
            let advanced = self.source.advance();
            window.pending.capture(&self.source, advanced);
        } else {
            window.pending.exhaust();
        }
    }

    /// Text of the current token; empty before the first and after the last
    /// token.
    #[must_use]
    pub fn text(&self) -> &str {
        self.window.as_ref().map_or("", |w| w.current.text())
    }

    /// Bytes of the current token.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        self.window.as_ref().map_or(&[][..], |w| w.current.bytes())
    }

    /// Sequence number the source gave the current token.
    ///
    /// After exhaustion this stays at the last number the source reported.
    #[must_use]
    pub fn sequence_number(&self) -> u64 {
        self.window.as_ref().map_or(0, |w| w.current.sequence_number())
    }

    /// Whether the current token matched the source's rule.
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.window.as_ref().is_some_and(|w| w.current.is_match())
    }

    /// Whether no token follows the current one.
    ///
    /// `false` before the first `advance`; `true` from the last token on,
    /// including after exhaustion.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.window.as_ref().is_some_and(|w| !w.pending.advanced())
    }

    /// The current token's snapshot, once the first `advance` has run.
    #[must_use]
    pub fn current(&self) -> Option<&Snapshot> {
        self.window.as_ref().map(|w| &w.current)
    }

    /// The snapshot of the token after the current one.
    ///
    /// Its `advanced()` is `false` when the current token is the last.
    #[must_use]
    pub fn pending(&self) -> Option<&Snapshot> {
        self.window.as_ref().map(|w| &w.pending)
    }

    /// Run facts of the current token.
    #[must_use]
    pub fn run(&self) -> RunFacts {
        self.tracker.facts()
    }

    /// Whether the current token starts a run of matches.
    #[must_use]
    pub fn run_begin(&self) -> bool {
        self.tracker.facts().begin
    }

    /// Whether the current token ends a run of matches.
    #[must_use]
    pub fn run_end(&self) -> bool {
        self.tracker.facts().end
    }

    /// Length of the run so far, counting the current token; 0 outside a run.
    #[must_use]
    pub fn run_length(&self) -> usize {
        self.tracker.facts().length
    }

    /// The error that halted the source, if any.
    #[must_use]
    pub fn error(&self) -> Option<&ScanError> {
        self.source.error()
    }

    /// Sets buffer sizes on the source and on the engine's token copies.
    pub fn set_buffer_limits(&mut self, limits: BufferLimits) {
        self.limits = limits.normalized();
        self.source.set_buffer_limits(limits);
        if let Some(window) = &mut self.window {
            window.current.reserve(self.limits);
            window.pending.reserve(self.limits);
        }
    }

    /// Limits applied to the engine's token copies.
    #[must_use]
    pub fn buffer_limits(&self) -> BufferLimits {
        self.limits
    }

    /// The current token as an owned [`Record`].
    #[must_use]
    pub fn record(&self) -> Record {
        Record {
            text: String::from(self.text()),
            bytes: Vec::from(self.bytes()),
            sequence_number: self.sequence_number(),
            is_match: self.is_match(),
            is_last: self.is_last(),
            run: self.run(),
        }
    }

    /// Iterates over the remaining tokens as owned [`Record`]s.
    pub fn records(&mut self) -> Records<'_, S> {
        Records { scanner: self }
    }

    /// The wrapped source. It is one token ahead of this scanner.
    #[must_use]
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Returns the wrapped source. The token held in the window is lost.
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: TokenSource> TokenSource for AheadScanner<S> {
    fn advance(&mut self) -> bool {
        AheadScanner::advance(self)
    }

    fn text(&self) -> &str {
        AheadScanner::text(self)
    }

    fn bytes(&self) -> &[u8] {
        AheadScanner::bytes(self)
    }

    fn is_match(&self) -> bool {
        AheadScanner::is_match(self)
    }

    fn sequence_number(&self) -> u64 {
        AheadScanner::sequence_number(self)
    }

    fn error(&self) -> Option<&ScanError> {
        AheadScanner::error(self)
    }

    fn set_buffer_limits(&mut self, limits: BufferLimits) {
        AheadScanner::set_buffer_limits(self, limits);
    }
}

/// Owned copy of one token and everything the scanner knows about it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Record {
    /// Token text.
    pub text: String,
    /// Token bytes.
    pub bytes: Vec<u8>,
    /// Sequence number from the source.
    pub sequence_number: u64,
    /// Whether the token matched.
    pub is_match: bool,
    /// Whether this is the last token.
    pub is_last: bool,
    /// Run facts.
    pub run: RunFacts,
}

/// Iterator over the remaining tokens of an [`AheadScanner`].
///
/// Ends at the first failed advance; check
/// [`AheadScanner::error`] afterwards to tell end of input from a failure.
#[derive(Debug)]
pub struct Records<'a, S> {
    scanner: &'a mut AheadScanner<S>,
}

impl<S: TokenSource> Iterator for Records<'_, S> {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        self.scanner.advance().then(|| self.scanner.record())
    }
}

impl<S: TokenSource> FusedIterator for Records<'_, S> {}
