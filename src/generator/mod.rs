/*
    This module generates random sentences from a grammar
*/

use rand::prelude::*;
use std::fmt::Display;
use std::sync::Arc;

use tracing::trace;

use crate::cky::ParseTree;
use crate::grammar::*;

#[derive(Debug, PartialEq)]
pub enum GenerateErrorType {
    // An undefined nonterminal was used
    UndefinedNonterminal(String),
    // The nonterminal never rewrites to a string of terminals
    Unproductive(String),
}

impl crate::error_handling::ErrorType for GenerateErrorType {}

impl Display for GenerateErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateErrorType::UndefinedNonterminal(nonterminal) => write!(f, "No definition for nonterminal `{}`", nonterminal),
            GenerateErrorType::Unproductive(nonterminal) => write!(f, "Nonterminal `{}` derives no sentence", nonterminal),
        }
    }
}

pub type GenResult = Result<ParseTree, GenerateErrorType>;

// Height of the shortest derivation of every nonterminal, None for those that
// derive nothing
fn min_heights(grammar: &Grammar) -> Vec<Option<usize>> {
    let mut heights = vec![None; grammar.nonterminals().count()];
    let mut changed = true;
    while changed {
        changed = false;
        for production in grammar.productions() {
            let height = production_height(production, &heights);
            let current = &mut heights[production.lhs().index()];
            if let Some(h) = height {
                if current.map_or(true, |c| h < c) {
                    *current = Some(h);
                    changed = true;
                }
            }
        }
    }
    heights
}

fn production_height(production: &Production, heights: &[Option<usize>]) -> Option<usize> {
    match production {
        Production::Terminal { .. } => Some(1),
        Production::Binary(rule) => {
            let left = heights[rule.left.index()]?;
            let right = heights[rule.right.index()]?;
            Some(1 + left.max(right))
        }
    }
}

/// Generates a random derivation from the grammar's start symbol.
pub fn generate(grammar: &Grammar, max_depth: usize, rng: &mut impl Rng) -> GenResult {
    generate_symbol(grammar, grammar.start(), max_depth, rng)
}

// Generates a derivation starting with the given symbol
pub fn generate_with_override(grammar: &Grammar, start: &str, max_depth: usize, rng: &mut impl Rng) -> GenResult {
    let symbol = grammar
        .nonterminal(start)
        .ok_or_else(|| GenerateErrorType::UndefinedNonterminal(start.to_string()))?;
    generate_symbol(grammar, symbol, max_depth, rng)
}

/// Trees are at most `max_depth` high, or as high as the shortest
/// derivation of `symbol` if that is taller.
pub fn generate_symbol(grammar: &Grammar, symbol: Nonterminal, max_depth: usize, rng: &mut impl Rng) -> GenResult {
    let heights = min_heights(grammar);
    let shortest = heights[symbol.index()]
        .ok_or_else(|| GenerateErrorType::Unproductive(grammar.name(symbol).to_string()))?;
    Ok(generate_nonterminal(grammar, &heights, symbol, max_depth.max(shortest), rng))
}

fn generate_nonterminal(
    grammar: &Grammar,
    heights: &[Option<usize>],
    symbol: Nonterminal,
    budget: usize,
    rng: &mut impl Rng,
) -> ParseTree {
    // Only productions that can finish within the remaining budget. There is
    // always at least one since the caller checked the symbol's height.
    let candidates: Vec<&Production> = grammar
        .productions_of(symbol)
        .filter(|p| production_height(p, heights).is_some_and(|h| h <= budget))
        .collect();
    trace!(symbol = grammar.name(symbol), budget, candidates = candidates.len(), "expanding");

    match candidates.choose(rng) {
        Some(Production::Terminal { lhs, token }) => ParseTree::Leaf { label: *lhs, token: token.clone() },
        Some(Production::Binary(rule)) => ParseTree::Branch {
            label: rule.lhs,
            left: Arc::new(generate_nonterminal(grammar, heights, rule.left, budget - 1, rng)),
            right: Arc::new(generate_nonterminal(grammar, heights, rule.right, budget - 1, rng)),
        },
        None => unreachable!("`{}` has no production within height {}", grammar.name(symbol), budget),
    }
}
