/*
    This module runs the CKY algorithm over CNF grammars
*/

mod counter;
mod parser;
mod recognizer;
mod tree;

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, trace};

use crate::chart::{compound_spans, Chart};
use crate::grammar::{BinaryRule, Grammar, Nonterminal};

pub use counter::{CountOverflow, Counter, Counts};
pub use parser::{Backpointers, Parser};
pub use recognizer::Recognizer;
pub use tree::{Bracketed, ParseTree};

/// Nonterminals that derive each span of a sentence.
pub type SymbolChart = Chart<HashSet<Nonterminal>>;

/// Whether `sentence` is in the language of `grammar`. An empty sentence
/// never is.
pub fn recognize<S: AsRef<str>>(grammar: &Grammar, sentence: &[S]) -> bool {
    Recognizer::new(grammar).recognize(sentence)
}

/// Every distinct parse tree of `sentence` rooted at the start symbol.
pub fn parse<S: AsRef<str>>(grammar: &Grammar, sentence: &[S]) -> BTreeSet<ParseTree> {
    Parser::new(grammar).parse(sentence)
}

/// The number of trees [`parse`] would return, computed without building them.
/// Fails when that number does not fit in a `u128`.
pub fn count<S: AsRef<str>>(grammar: &Grammar, sentence: &[S]) -> Result<u128, CountOverflow> {
    Counter::new(grammar).count(sentence)
}

// Fills the symbol chart bottom-up. `on_combine(start, mid, end, rule)` is
// called for every split and binary rule whose children are both present,
// once the narrower cells it reads from are final.
fn fill<S, F>(grammar: &Grammar, sentence: &[S], mut on_combine: F) -> SymbolChart
where
    S: AsRef<str>,
    F: FnMut(usize, usize, usize, &BinaryRule),
{
    let n = sentence.len();
    let mut chart = SymbolChart::new(n);
    debug!(tokens = n, productions = grammar.productions().len(), "filling chart");

    for (i, token) in sentence.iter().enumerate() {
        let token = token.as_ref();
        let symbols = grammar.terminal_productions(token);
        if symbols.is_empty() {
            debug!(token, position = i, "no terminal production matches token");
        }
        chart.cell_mut(i, i + 1).extend(symbols.iter().copied());
    }

    for (start, end) in compound_spans(n) {
        let mut found = Vec::new();
        for mid in start + 1..end {
            let left = chart.cell(start, mid);
            let right = chart.cell(mid, end);
            if left.is_empty() || right.is_empty() {
                continue;
            }
            for rule in grammar.binary_productions() {
                if left.contains(&rule.left) && right.contains(&rule.right) {
                    on_combine(start, mid, end, rule);
                    found.push(rule.lhs);
                }
            }
        }
        if !found.is_empty() {
            trace!(start, end, found = found.len(), "span derived");
        }
        chart.cell_mut(start, end).extend(found);
    }

    chart
}
