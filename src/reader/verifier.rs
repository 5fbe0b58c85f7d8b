use std::collections::HashSet;

use super::GrammarFormatErrorType::{UndefinedNonterminal, UndefinedStart};
use super::{GrammarFormatError, GrammarFormatErrors, FileResult, Location, Rhs, Rule};

fn get_rhs_undefined_symbols(rhs: &Rhs, location: &Location, defined: &HashSet<&str>) -> GrammarFormatErrors {
    // Terminals are always defined, so only the pair can be missing anything
    let symbols = match rhs {
        Rhs::Terminal(_) => vec![],
        Rhs::Pair(left, right) => vec![left, right],
    };
    symbols.into_iter()
        .filter(|symbol| !defined.contains(symbol.as_str()))
        .map(|symbol_text| GrammarFormatError {
            location: location.to_owned(),
            error: UndefinedNonterminal(symbol_text.to_owned())
        })
        .collect()
}

fn get_rule_undefined_symbols(rule: &Rule, defined: &HashSet<&str>) -> GrammarFormatErrors {
    // Get the undefined nonterminals in each alternative, while flattening
    // into all the undefined nonterminals in the rule
    rule.rewrite.iter()
        .flat_map(|rhs| get_rhs_undefined_symbols(rhs, &rule.location, defined))
        .collect()
}

fn get_undefined_symbols(rules: &[Rule], defined: &HashSet<&str>) -> GrammarFormatErrors {
    rules.iter()
        .flat_map(|rule| get_rule_undefined_symbols(rule, defined))
        .collect()
}

pub fn verify_rules(rules: &[Rule], start: Option<&(String, Location)>) -> FileResult<()> {
    // A nonterminal may have its alternatives spread over several lines
    let defined: HashSet<&str> = rules.iter().map(|rule| rule.symbol.as_str()).collect();
    let mut errors = Vec::new();

    if let Some((symbol, location)) = start {
        if !defined.contains(symbol.as_str()) {
            errors.push(GrammarFormatError {
                location: location.to_owned(),
                error: UndefinedStart(symbol.to_owned())
            });
        }
    }

    errors.extend(get_undefined_symbols(rules, &defined).into_iter());

    if errors.len() > 0 {
        Err(errors)
    } else {
        Ok(())
    }
}
