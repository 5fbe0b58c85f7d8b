use std::collections::HashMap;
use std::fmt::Display;

use crate::chart::Chart;
use crate::error_handling::ErrorType;
use crate::grammar::{Grammar, Nonterminal};

use super::fill;

/// Derivation counts of each nonterminal over one span. `None` marks a
/// count that does not fit in a `u128`.
pub type Counts = HashMap<Nonterminal, Option<u128>>;

/// The number of parse trees is larger than `u128::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountOverflow;

impl ErrorType for CountOverflow {}

impl Display for CountOverflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Number of parses exceeds {}", u128::MAX)
    }
}

impl std::error::Error for CountOverflow {}

// total + left * right, None once any part no longer fits
fn accumulate(total: Option<u128>, left: Option<u128>, right: Option<u128>) -> Option<u128> {
    total?.checked_add(left?.checked_mul(right?)?)
}

/// Counts parse trees without building them.
///
/// Counts are kept per (span, nonterminal), so they agree exactly with the
/// number of trees [`super::Parser`] enumerates.
#[derive(Debug, Clone, Copy)]
pub struct Counter<'g> {
    grammar: &'g Grammar,
}

impl<'g> Counter<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Counter { grammar }
    }

    pub fn chart<S: AsRef<str>>(&self, sentence: &[S]) -> Chart<Counts> {
        let mut counts = Chart::<Counts>::new(sentence.len());

        for (i, token) in sentence.iter().enumerate() {
            let cell = counts.cell_mut(i, i + 1);
            for &lhs in self.grammar.terminal_productions(token.as_ref()) {
                cell.insert(lhs, Some(1));
            }
        }

        // Children cells are final by the time a combination is reported
        fill(self.grammar, sentence, |start, mid, end, rule| {
            let left = counts.cell(start, mid).get(&rule.left).copied().unwrap_or(Some(0));
            let right = counts.cell(mid, end).get(&rule.right).copied().unwrap_or(Some(0));
            let total = counts.cell_mut(start, end).entry(rule.lhs).or_insert(Some(0));
            *total = accumulate(*total, left, right);
        });

        counts
    }

    /// Number of trees rooted at the start symbol.
    pub fn count<S: AsRef<str>>(&self, sentence: &[S]) -> Result<u128, CountOverflow> {
        self.chart(sentence)
            .root()
            .and_then(|counts| counts.get(&self.grammar.start()).copied())
            .map_or(Ok(0), |count| count.ok_or(CountOverflow))
    }

    /// Number of trees rooted at any nonterminal spanning the sentence.
    pub fn count_spanning<S: AsRef<str>>(&self, sentence: &[S]) -> Result<u128, CountOverflow> {
        self.chart(sentence)
            .root()
            .map_or(Ok(0), |counts| {
                counts.values().try_fold(0u128, |sum, &count| {
                    count.and_then(|count| sum.checked_add(count)).ok_or(CountOverflow)
                })
            })
    }
}
