use alloc::boxed::Box;

use thiserror::Error;

/// Error returned by match rules and split policies.
pub type RuleError = Box<dyn core::error::Error + Send + Sync>;

/// A halting failure reported by a [`TokenSource`](crate::TokenSource).
///
/// End of input is not an error: a source that simply runs out of tokens
/// returns `false` from `advance()` and reports no error.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ScanError {
    /// A token did not fit in the maximum buffer size.
    #[error("token too long: exceeds the {max}-byte buffer limit")]
    TokenTooLong {
        /// The configured maximum, in bytes.
        max: usize,
    },
    /// The match rule could not classify a token.
    #[error("match rule failed: {0}")]
    Rule(#[source] RuleError),
    /// The split policy rejected the input.
    #[error("split failed: {0}")]
    Split(#[source] RuleError),
    /// The underlying reader failed.
    #[cfg(feature = "std")]
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
    /// The split policy kept producing empty tokens without consuming input.
    #[error("split produced {0} empty tokens without advancing")]
    NoProgress(usize),
}
