//! Split policies: how a reader's bytes are cut into tokens.

use core::ops::Range;

use bstr::ByteSlice;

use crate::RuleError;

/// Outcome of one successful [`Split::split`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Bytes of input consumed, including any delimiter.
    pub advance: usize,
    /// Token position within the data passed to `split`, if a token was found.
    /// `None` with a non-zero `advance` skips input without producing a token.
    pub token: Option<Range<usize>>,
}

impl Step {
    /// A token at `token`, consuming `advance` bytes.
    #[must_use]
    pub fn token(advance: usize, token: Range<usize>) -> Self {
        Self {
            advance,
            token: Some(token),
        }
    }

    /// Consumes `advance` bytes without producing a token.
    #[must_use]
    pub fn skip(advance: usize) -> Self {
        Self {
            advance,
            token: None,
        }
    }
}

/// Cuts buffered input into tokens.
///
/// `data` is the unconsumed input; `at_eof` is true once the reader has no
/// more bytes. Returning `Ok(None)` asks for more data, or ends the stream
/// when `at_eof` is set. Any error halts the source with
/// [`ScanError::Split`](crate::ScanError::Split).
///
/// Closures with the same signature implement `Split`:
///
/// ```rust
/// use scanahead::{ReaderSource, RuleError, Step, TokenSource};
///
/// // fixed-width records of two bytes
/// let pairs = |data: &[u8], at_eof: bool| {
///     Ok::<_, RuleError>(match data.len() {
///         0 => None,
///         1 if !at_eof => None,
///         n => Some(Step::token(n.min(2), 0..n.min(2))),
///     })
/// };
/// let mut source = ReaderSource::with_split(&b"abcde"[..], pairs);
/// let mut tokens = Vec::new();
/// while source.advance() {
///     tokens.push(source.text().to_owned());
/// }
/// assert_eq!(tokens, ["ab", "cd", "e"]);
/// ```
pub trait Split {
    /// Looks for the next token at the start of `data`.
    fn split(&mut self, data: &[u8], at_eof: bool) -> Result<Option<Step>, RuleError>;
}

impl<F> Split for F
where
    F: FnMut(&[u8], bool) -> Result<Option<Step>, RuleError>,
{
    fn split(&mut self, data: &[u8], at_eof: bool) -> Result<Option<Step>, RuleError> {
        self(data, at_eof)
    }
}

/// Newline-terminated lines, without the `\n` or a `\r\n` pair.
///
/// A final line without a newline is still a token unless it is empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lines;

impl Split for Lines {
    fn split(&mut self, data: &[u8], at_eof: bool) -> Result<Option<Step>, RuleError> {
        if at_eof && data.is_empty() {
            return Ok(None);
        }
        if let Some(i) = data.find_byte(b'\n') {
            return Ok(Some(Step::token(i + 1, 0..drop_cr(data, i))));
        }
        if at_eof {
            return Ok(Some(Step::token(data.len(), 0..drop_cr(data, data.len()))));
        }
        Ok(None)
    }
}

fn drop_cr(data: &[u8], end: usize) -> usize {
    if end > 0 && data[end - 1] == b'\r' {
        end - 1
    } else {
        end
    }
}

/// Words separated by Unicode whitespace.
///
/// Invalid UTF-8 counts as part of a word.
#[derive(Debug, Clone, Copy, Default)]
pub struct Words;

impl Split for Words {
    fn split(&mut self, data: &[u8], at_eof: bool) -> Result<Option<Step>, RuleError> {
        let mut start = 0;
        while start < data.len() {
            let (ch, width) = bstr::decode_utf8(&data[start..]);
            if !ch.is_some_and(char::is_whitespace) {
                break;
            }
            start += width;
        }

        let mut i = start;
        while i < data.len() {
            let (ch, width) = bstr::decode_utf8(&data[i..]);
            if ch.is_some_and(char::is_whitespace) {
                return Ok(Some(Step::token(i + width, start..i)));
            }
            i += width.max(1);
        }

        if at_eof && data.len() > start {
            return Ok(Some(Step::token(data.len(), start..data.len())));
        }
        if start > 0 {
            return Ok(Some(Step::skip(start)));
        }
        Ok(None)
    }
}

/// One byte per token.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bytes;

impl Split for Bytes {
    fn split(&mut self, data: &[u8], _at_eof: bool) -> Result<Option<Step>, RuleError> {
        Ok((!data.is_empty()).then(|| Step::token(1, 0..1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step<P: Split>(mut policy: P, data: &str, at_eof: bool) -> Option<Step> {
        policy.split(data.as_bytes(), at_eof).unwrap()
    }

    #[test]
    fn lines() {
        assert_eq!(step(Lines, "ab\ncd", false), Some(Step::token(3, 0..2)));
        assert_eq!(step(Lines, "ab\r\n", false), Some(Step::token(4, 0..2)));
        assert_eq!(step(Lines, "\n", false), Some(Step::token(1, 0..0)));
        assert_eq!(step(Lines, "ab", false), None);
        assert_eq!(step(Lines, "ab\r", true), Some(Step::token(3, 0..2)));
        assert_eq!(step(Lines, "", true), None);
    }

    #[test]
    fn words() {
        assert_eq!(step(Words, "  ab cd", false), Some(Step::token(5, 2..4)));
        assert_eq!(step(Words, "ab\u{3000}cd", false), Some(Step::token(5, 0..2)));
        assert_eq!(step(Words, "ab", false), None);
        assert_eq!(step(Words, "ab", true), Some(Step::token(2, 0..2)));
        assert_eq!(step(Words, "   ", false), Some(Step::skip(3)));
        assert_eq!(step(Words, "   ", true), Some(Step::skip(3)));
        assert_eq!(step(Words, "", true), None);
    }

    #[test]
    fn bytes() {
        assert_eq!(step(Bytes, "xy", false), Some(Step::token(1, 0..1)));
        assert_eq!(step(Bytes, "", true), None);
    }
}
