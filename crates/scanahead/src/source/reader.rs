//! Buffered tokenizer over `std::io::Read`.
//!
//! The buffer holds unconsumed input in `buf[start..end]`. Each `advance`
//! asks the split policy for a token in that window; when it needs more data
//! the window is moved to the front, the buffer doubles (up to
//! [`BufferLimits::max`]) if it is full, and the reader fills the free tail.
//! Tokens are ranges into the buffer, valid until the next `advance`.

use alloc::{string::String, vec::Vec};
use core::ops::Range;
use std::io::{ErrorKind, Read};

use bstr::ByteSlice;
use tracing::debug;

use super::split::{Lines, Split, Step};
use crate::{BufferLimits, RuleError, ScanError, TokenSource};

/// Empty tokens tolerated in a row before the split policy is considered
/// stuck.
const MAX_EMPTY_TOKENS: usize = 100;

/// Token source reading from any [`Read`] implementation.
///
/// Tokens are cut by a [`Split`] policy, [`Lines`] by default. Every token
/// matches; wrap the source in a [`RuleSource`](crate::RuleSource) to flag
/// tokens.
///
/// ```rust
/// use scanahead::{ReaderSource, TokenSource, Words};
///
/// let mut source = ReaderSource::with_split("one  two\nthree".as_bytes(), Words);
/// let mut words = Vec::new();
/// while source.advance() {
///     words.push((source.sequence_number(), source.text().to_owned()));
/// }
/// assert_eq!(words[2], (3, "three".to_owned()));
/// assert!(source.error().is_none());
/// ```
pub struct ReaderSource<R, P = Lines> {
    reader: R,
    split: P,
    limits: BufferLimits,
    buf: Vec<u8>,
    start: usize,
    end: usize,
    token: Range<usize>,
    text: String,
    sequence_number: u64,
    matched: bool,
    empty_tokens: usize,
    eof: bool,
    done: bool,
    err: Option<ScanError>,
}

impl<R: Read> ReaderSource<R> {
    /// Creates a line source.
    pub fn new(reader: R) -> Self {
        Self::with_split(reader, Lines)
    }
}

impl<R: Read, P: Split> ReaderSource<R, P> {
    /// Creates a source cutting tokens with `split`.
    pub fn with_split(reader: R, split: P) -> Self {
        Self {
            reader,
            split,
            limits: BufferLimits::default(),
            buf: Vec::new(),
            start: 0,
            end: 0,
            token: 0..0,
            text: String::new(),
            sequence_number: 0,
            matched: false,
            empty_tokens: 0,
            eof: false,
            done: false,
            err: None,
        }
    }

    /// Replaces the split policy. Only meaningful before the first `advance`.
    pub fn set_split<Q: Split>(self, split: Q) -> ReaderSource<R, Q> {
        ReaderSource {
            reader: self.reader,
            split,
            limits: self.limits,
            buf: self.buf,
            start: self.start,
            end: self.end,
            token: self.token,
            text: self.text,
            sequence_number: self.sequence_number,
            matched: self.matched,
            empty_tokens: self.empty_tokens,
            eof: self.eof,
            done: self.done,
            err: self.err,
        }
    }

    /// Returns the wrapped reader. Buffered input is lost.
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn halt(&mut self, err: ScanError) -> bool {
        debug!(target: "scanahead", sequence_number = self.sequence_number, error = %err, "reader source halted");
        self.err = Some(err);
        self.done = true;
        false
    }

    fn emit(&mut self, token: Range<usize>) -> bool {
        self.token = token;
        self.text.push_str(&self.buf[self.token.clone()].to_str_lossy());
        self.sequence_number += 1;
        self.matched = true;
        true
    }

    /// Applies one step of the split policy. Returns `Some` when `advance`
    /// should return with that value.
    fn take_step(&mut self, step: Step) -> Option<bool> {
        let available = self.end - self.start;
        if step.advance > available {
            return Some(self.halt(ScanError::Split(RuleError::from(
                "split advanced beyond the buffered input",
            ))));
        }
        let base = self.start;
        self.start += step.advance;
        let token = step.token?;
        if token.start > token.end || token.end > available {
            return Some(self.halt(ScanError::Split(RuleError::from(
                "split returned a token outside the buffered input",
            ))));
        }
        if step.advance == 0 && token.is_empty() {
            self.empty_tokens += 1;
            if self.empty_tokens >= MAX_EMPTY_TOKENS {
                return Some(self.halt(ScanError::NoProgress(self.empty_tokens)));
            }
        } else {
            self.empty_tokens = 0;
        }
        Some(self.emit(base + token.start..base + token.end))
    }

    /// Makes room for more input. Fails when the buffer is full at the
    /// maximum size.
    fn make_room(&mut self) -> Result<(), ScanError> {
        if self.start > 0 && (self.end == self.buf.len() || self.start > self.buf.len() / 2) {
            self.buf.copy_within(self.start..self.end, 0);
            self.end -= self.start;
            self.start = 0;
        }
        if self.end == self.buf.len() {
            if self.buf.len() >= self.limits.max {
                return Err(ScanError::TokenTooLong {
                    max: self.limits.max,
                });
            }
            let size = if self.buf.is_empty() {
                self.limits.initial.max(1)
            } else {
                self.buf.len().saturating_mul(2)
            }
            .min(self.limits.max);
            self.buf.resize(size, 0);
        }
        Ok(())
    }

    fn fill(&mut self) -> Result<(), ScanError> {
        loop {
            match self.reader.read(&mut self.buf[self.end..]) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(());
                }
                Ok(n) => {
                    self.end += n;
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl<R: Read, P: Split> TokenSource for ReaderSource<R, P> {
    fn advance(&mut self) -> bool {
        self.matched = false;
        self.token = 0..0;
        self.text.clear();
        if self.done {
            return false;
        }
        loop {
            if self.end > self.start || self.eof {
                let data = &self.buf[self.start..self.end];
                match self.split.split(data, self.eof) {
                    Err(e) => return self.halt(ScanError::Split(e)),
                    Ok(Some(step)) => {
                        let progressed = step.advance > 0;
                        if let Some(ret) = self.take_step(step) {
                            return ret;
                        }
                        if progressed {
                            continue;
                        }
                    }
                    Ok(None) => {}
                }
                if self.eof {
                    self.done = true;
                    self.start = 0;
                    self.end = 0;
                    return false;
                }
            }
            if let Err(e) = self.make_room() {
                return self.halt(e);
            }
            if let Err(e) = self.fill() {
                return self.halt(e);
            }
        }
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn bytes(&self) -> &[u8] {
        &self.buf[self.token.clone()]
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

    fn set_buffer_limits(&mut self, limits: BufferLimits) {
        self.limits = limits.normalized();
    }
}

impl<R, P> core::fmt::Debug for ReaderSource<R, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ReaderSource")
            .field("limits", &self.limits)
            .field("buffered", &(self.end - self.start))
            .field("sequence_number", &self.sequence_number)
            .field("eof", &self.eof)
            .field("done", &self.done)
            .field("err", &self.err)
            .finish_non_exhaustive()
    }
}
