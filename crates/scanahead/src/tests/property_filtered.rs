use alloc::{format, vec::Vec};

use quickcheck_macros::quickcheck;

use super::{init_tracing, online};
use crate::{
    IterSource, SourceExt,
    reference::{Token, annotate},
};

fn is_kept(token: &[u8]) -> bool {
    token.ends_with(b"+")
}

/// Property: dropping tokens with `OnlyMatching` leaves gaps in the sequence
/// numbers, and runs end at those gaps exactly as in the unfiltered stream.
#[quickcheck]
fn filtered_runs_follow_original_numbering(flags: Vec<bool>) -> bool {
    let words: Vec<_> = flags
        .iter()
        .enumerate()
        .map(|(i, &keep)| if keep { format!("{i}+") } else { format!("{i}") })
        .collect();
    let kept: Vec<Token> = (1..)
        .zip(&flags)
        .filter(|&(_, &keep)| keep)
        .map(|(sequence_number, _)| Token {
            sequence_number,
            is_match: true,
        })
        .collect();

    let mut scanner = IterSource::new(&words)
        .filter(|t: &[u8]| Ok(is_kept(t)))
        .ahead();
    online(&mut scanner) == annotate(&kept)
}

#[test]
fn filtered_scenario_run_ends() {
    init_tracing();
    let words = "34 235 1234 5678 123456 145 1 2 15678 123".split(' ');
    let mut scanner = IterSource::new(words)
        .filter(|t: &[u8]| Ok(t.starts_with(b"1")))
        .ahead();
    let mut ends = Vec::new();
    while scanner.advance() {
        ends.push((scanner.sequence_number(), scanner.run_end()));
    }
    assert_eq!(
        ends,
        [
            (3, true),
            (5, false),
            (6, false),
            (7, true),
            (9, false),
            (10, true)
        ]
    );
}
