//! Owned capture of one token source step.
//!
//! A source's `bytes()` are only valid until its next `advance()`, so the
//! lookahead engine copies every step into a [`Snapshot`] it owns. The engine
//! keeps two of them and overwrites them in place: `capture` clears the
//! existing `String`/`Vec<u8>` and copies into their allocations, so after
//! warm-up no step allocates unless a token outgrows the buffers.

use alloc::{string::String, vec::Vec};
use core::fmt;

use bstr::BStr;

use crate::{BufferLimits, TokenSource};

/// The observable state of a token source at one advance step.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    text: String,
    bytes: Vec<u8>,
    sequence_number: u64,
    is_match: bool,
    advanced: bool,
}

impl Snapshot {
    /// Allocates an empty snapshot that can hold a token of `limits.max`
    /// bytes without growing.
    pub(crate) fn with_limits(limits: BufferLimits) -> Self {
        let limits = limits.normalized();
        Self {
            text: String::new(),
            bytes: Vec::with_capacity(limits.max),
            ..Self::default()
        }
    }

    /// Overwrites this snapshot with the source's current state.
    ///
    /// `advanced` is the value the source's `advance()` just returned. A step
    /// that did not advance captures no content: text and bytes are cleared
    /// and the match flag is reset, only the sequence number is kept.
    pub(crate) fn capture<S: TokenSource + ?Sized>(&mut self, source: &S, advanced: bool) {
        self.advanced = advanced;
        self.sequence_number = source.sequence_number();
        self.text.clear();
        self.bytes.clear();
        if advanced {
            self.is_match = source.is_match();
            self.text.push_str(source.text());
            self.bytes.extend_from_slice(source.bytes());
        } else {
            self.is_match = false;
        }
    }

    /// Clears the content, keeping the sequence number and the allocations.
    pub(crate) fn exhaust(&mut self) {
        self.advanced = false;
        self.is_match = false;
        self.text.clear();
        self.bytes.clear();
    }

    /// Grows the byte buffer so it can hold `limits.max` bytes.
    pub(crate) fn reserve(&mut self, limits: BufferLimits) {
        let additional = limits.normalized().max.saturating_sub(self.bytes.len());
        self.bytes.reserve(additional);
    }

    /// Whether `next` continues a run of matches that includes `self`.
    ///
    /// Both must match and `next` must directly follow `self` in the original
    /// numbering. A gap means the source dropped tokens in between.
    #[must_use]
    pub fn is_continued_by(&self, next: &Snapshot) -> bool {
        self.is_match
            && next.advanced
            && next.is_match
            && self.sequence_number.checked_add(1) == Some(next.sequence_number)
    }

    /// The token text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The token bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Sequence number reported by the source at capture time.
    #[must_use]
    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    /// Whether the token matched the source's rule.
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.is_match
    }

    /// Whether the source produced a token at this step.
    #[must_use]
    pub fn advanced(&self) -> bool {
        self.advanced
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("text", &self.text)
            .field("bytes", &BStr::new(&self.bytes))
            .field("sequence_number", &self.sequence_number)
            .field("is_match", &self.is_match)
            .field("advanced", &self.advanced)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IterSource;

    fn step(source: &mut IterSource<alloc::vec::IntoIter<&'static str>>) -> Snapshot {
        let mut snap = Snapshot::with_limits(BufferLimits::default());
        let advanced = source.advance();
        snap.capture(&*source, advanced);
        snap
    }

    #[test]
    fn capture_copies_token() {
        let mut source = IterSource::new(alloc::vec!["abc", "de"]);
        let first = step(&mut source);
        assert!(first.advanced());
        assert_eq!(first.text(), "abc");
        assert_eq!(first.bytes(), b"abc");
        assert_eq!(first.sequence_number(), 1);
        assert!(first.is_match());
    }

    #[test]
    fn capture_reuses_allocation() {
        let mut source = IterSource::new(alloc::vec!["abcdef", "gh"]);
        let mut snap = Snapshot::with_limits(BufferLimits::new(16, 16));
        let advanced = source.advance();
        snap.capture(&source, advanced);
        let ptr = snap.bytes.as_ptr();
        let advanced = source.advance();
        snap.capture(&source, advanced);
        assert_eq!(snap.bytes(), b"gh");
        assert_eq!(snap.bytes.as_ptr(), ptr);
    }

    #[test]
    fn sized_for_largest_token() {
        let limits = BufferLimits::new(4, 64);
        let mut snap = Snapshot::with_limits(limits);
        assert!(snap.bytes.capacity() >= 64);
        let ptr = snap.bytes.as_ptr();
        let long = [b'x'; 64];
        let mut source = IterSource::new([&long[..]]);
        source.set_buffer_limits(limits);
        let advanced = source.advance();
        snap.capture(&source, advanced);
        assert_eq!(snap.bytes().len(), 64);
        assert_eq!(snap.bytes.as_ptr(), ptr);

        snap.reserve(BufferLimits::new(4, 256));
        assert!(snap.bytes.capacity() >= 256);
    }

    #[test]
    fn failed_step_is_empty() {
        let mut source = IterSource::new(alloc::vec!["only"]);
        let _ = step(&mut source);
        let done = step(&mut source);
        assert!(!done.advanced());
        assert_eq!(done.text(), "");
        assert_eq!(done.bytes(), b"");
        assert!(!done.is_match());
        assert_eq!(done.sequence_number(), 1);
    }

    #[test]
    fn continuation_requires_adjacent_matches() {
        let mut source = IterSource::new(alloc::vec!["a", "b"]);
        let a = step(&mut source);
        let b = step(&mut source);
        let end = step(&mut source);
        assert!(a.is_continued_by(&b));
        assert!(!b.is_continued_by(&end));
        assert!(!b.is_continued_by(&a));
    }
}
