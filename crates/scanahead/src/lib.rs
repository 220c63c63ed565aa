//! Streaming token scanning with one token of lookahead.
//!
//! [`AheadScanner`] wraps any [`TokenSource`] and reads exactly one token
//! further than it reports. That single token of lookahead is enough to
//! answer, for every token as it is consumed:
//!
//! - whether it is the last token the source will produce ([`AheadScanner::is_last`]),
//! - whether it begins or ends a run of consecutive matching tokens
//!   ([`AheadScanner::run_begin`], [`AheadScanner::run_end`]),
//! - how long that run is so far ([`AheadScanner::run_length`]).
//!
//! ```rust
//! use scanahead::{IterSource, SourceExt};
//!
//! let words = ["One", "two", "three"];
//! let mut scanner = IterSource::new(words).ahead();
//! let mut out = String::new();
//! while scanner.advance() {
//!     out.push_str(scanner.text());
//!     if !scanner.is_last() {
//!         out.push_str(", ");
//!     }
//! }
//! assert_eq!(out, "One, two, three");
//! ```

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod ahead;
mod error;
mod options;
#[cfg(any(test, feature = "fuzzing"))]
pub mod reference;
mod run;
mod snapshot;
mod source;

#[cfg(test)]
mod tests;

pub use ahead::{AheadScanner, Record, Records};
pub use error::{RuleError, ScanError};
pub use options::BufferLimits;
pub use run::{RunFacts, RunTracker};
pub use snapshot::Snapshot;
#[cfg(feature = "std")]
pub use source::reader::ReaderSource;
pub use source::{
    SourceExt, TokenSource,
    iter::IterSource,
    rule::{OnlyMatching, OnlyNonMatching, Rewrite, RuleSource, filter},
    split::{Bytes, Lines, Split, Step, Words},
};
