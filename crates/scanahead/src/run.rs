//! Detection of runs of consecutive matching tokens.

use crate::Snapshot;

/// Per-token run facts.
///
/// `begin` and `end` are both set on a run of length one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunFacts {
    /// The token starts a run.
    pub begin: bool,
    /// The token ends a run: the next token is missing, does not match, or
    /// does not directly follow it.
    pub end: bool,
    /// Matching tokens in the run up to and including this one; 0 outside a
    /// run.
    pub length: usize,
}

/// State machine deriving [`RunFacts`] from a `(current, pending)` pair.
///
/// Feed it every step of the lookahead window, in order. It keeps only
/// whether it is inside a run and the facts of the last step.
#[derive(Debug, Clone, Default)]
pub struct RunTracker {
    in_run: bool,
    facts: RunFacts,
}

impl RunTracker {
    /// Creates a tracker outside any run.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the state machine by one step and returns the facts for
    /// `current`.
    pub fn update(&mut self, current: &Snapshot, pending: &Snapshot) -> RunFacts {
        if !current.advanced() {
            self.reset();
            return self.facts;
        }

        if !self.in_run {
            self.facts = RunFacts::default();
            if !current.is_match() {
                return self.facts;
            }
            self.facts.begin = true;
            self.in_run = true;
        }

        self.facts.length += 1;
        if !current.is_continued_by(pending) {
            self.facts.end = true;
            self.in_run = false;
        }
        // begin survives only on the first token of a run
        if self.facts.length > 1 {
            self.facts.begin = false;
        }
        self.facts
    }

    /// Leaves any run and clears the facts.
    pub fn reset(&mut self) {
        self.in_run = false;
        self.facts = RunFacts::default();
    }

    /// Facts computed by the last [`update`](Self::update).
    #[must_use]
    pub fn facts(&self) -> RunFacts {
        self.facts
    }

    /// Whether the next matching, adjacent token would extend the current run.
    #[must_use]
    pub fn in_run(&self) -> bool {
        self.in_run
    }
}
