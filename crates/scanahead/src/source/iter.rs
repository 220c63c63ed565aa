use alloc::{string::String, vec::Vec};

use bstr::ByteSlice;

use crate::{BufferLimits, ScanError, TokenSource};

/// In-memory token source over an iterator of tokens.
///
/// Every token matches, as with a plain reader. Tokens are copied into an
/// internal buffer, so the iterator may yield temporaries. A token longer
/// than [`BufferLimits::max`] halts the source with
/// [`ScanError::TokenTooLong`]. Text of tokens that are not valid UTF-8 is
/// decoded lossily; [`bytes`](TokenSource::bytes) stay exact.
///
/// ```rust
/// use scanahead::{IterSource, TokenSource};
///
/// let mut source = IterSource::new(["a", "b"]);
/// assert!(source.advance());
/// assert_eq!((source.sequence_number(), source.text()), (1, "a"));
/// ```
#[derive(Debug)]
pub struct IterSource<I> {
    tokens: I,
    limits: BufferLimits,
    bytes: Vec<u8>,
    text: String,
    sequence_number: u64,
    matched: bool,
    done: bool,
    err: Option<ScanError>,
}

impl<I> IterSource<I>
where
    I: Iterator,
    I::Item: AsRef<[u8]>,
{
    /// Creates a source yielding the items of `tokens` in order.
    pub fn new<T>(tokens: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            tokens: tokens.into_iter(),
            limits: BufferLimits::default(),
            bytes: Vec::new(),
            text: String::new(),
            sequence_number: 0,
            matched: false,
            done: false,
            err: None,
        }
    }
}

impl<I> TokenSource for IterSource<I>
where
    I: Iterator,
    I::Item: AsRef<[u8]>,
{
    fn advance(&mut self) -> bool {
        self.matched = false;
        self.bytes.clear();
        self.text.clear();
        if self.done {
            return false;
        }
        let Some(token) = self.tokens.next() else {
            self.done = true;
            return false;
        };
        let token = token.as_ref();
        if token.len() > self.limits.max {
            self.err = Some(ScanError::TokenTooLong {
                max: self.limits.max,
            });
            self.done = true;
            return false;
        }
        self.bytes.extend_from_slice(token);
        self.text.push_str(&token.to_str_lossy());
        self.sequence_number += 1;
        self.matched = true;
        true
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn bytes(&self) -> &[u8] {
        &self.bytes
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
        self.bytes.reserve(self.limits.initial);
    }
}
