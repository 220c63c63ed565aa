/// Default initial size of a token buffer, in bytes.
pub(crate) const START_BUF_SIZE: usize = 4096;

/// Default maximum size of a token buffer, in bytes.
pub(crate) const MAX_TOKEN_SIZE: usize = 64 * 1024;

/// Buffer sizing shared by token sources and the lookahead engine.
///
/// A source allocates `initial` bytes up front and may grow its buffer up to
/// `max` bytes while looking for the end of a token. A token that does not
/// fit in `max` bytes halts the source with
/// [`ScanError::TokenTooLong`](crate::ScanError::TokenTooLong).
///
/// [`AheadScanner`](crate::AheadScanner) mirrors the limits into its own
/// token copies, so wrapping a source does not change which tokens fit.
///
/// # Examples
///
/// ```rust
/// use scanahead::BufferLimits;
///
/// let limits = BufferLimits::new(5, 2);
/// // `max` never drops below `initial`.
/// assert_eq!(limits.max, 5);
/// ```
///
/// # Default
///
/// `initial` is 4 KiB, `max` is 64 KiB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BufferLimits {
    /// Size of the first buffer allocation, in bytes.
    pub initial: usize,

    /// Largest size the buffer may grow to, in bytes.
    ///
    /// Always at least `initial` once normalized.
    pub max: usize,
}

impl BufferLimits {
    /// Creates limits, raising `max` to `initial` when it is smaller.
    #[must_use]
    pub const fn new(initial: usize, max: usize) -> Self {
        Self {
            initial,
            max: if max < initial { initial } else { max },
        }
    }

    /// Returns a copy with `max` raised to at least `initial`.
    #[must_use]
    pub const fn normalized(self) -> Self {
        Self::new(self.initial, self.max)
    }
}

impl Default for BufferLimits {
    fn default() -> Self {
        Self {
            initial: START_BUF_SIZE,
            max: MAX_TOKEN_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits() {
        let limits = BufferLimits::default();
        assert_eq!(limits.initial, 4096);
        assert_eq!(limits.max, 64 * 1024);
    }

    #[test]
    fn max_raised_to_initial() {
        assert_eq!(BufferLimits::new(5, 2), BufferLimits { initial: 5, max: 5 });
        assert_eq!(BufferLimits { initial: 8, max: 1 }.normalized().max, 8);
        assert_eq!(BufferLimits::new(2, 16).max, 16);
    }
}
