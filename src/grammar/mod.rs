/*
    This module stores grammars in Chomsky Normal Form
*/

use std::collections::{HashMap, HashSet};
use std::fmt::Display;

/// A nonterminal interned in a [`Grammar`]'s symbol table.
///
/// Ids are only meaningful for the grammar (or builder) that handed them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Nonterminal(u32);

impl Nonterminal {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// `lhs -> left right`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BinaryRule {
    pub lhs: Nonterminal,
    pub left: Nonterminal,
    pub right: Nonterminal,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Production {
    // lhs -> "token"
    Terminal { lhs: Nonterminal, token: String },
    Binary(BinaryRule),
}

impl Production {
    pub fn lhs(&self) -> Nonterminal {
        match self {
            Production::Terminal { lhs, .. } => *lhs,
            Production::Binary(rule) => rule.lhs,
        }
    }
}

/// An immutable CNF grammar.
///
/// Productions keep their declaration order. Lookups needed by the chart
/// parsers (terminal productions by token, all binary productions) are
/// indexed once when the grammar is built.
#[derive(Debug, Clone)]
pub struct Grammar {
    names: Vec<String>,
    ids: HashMap<String, Nonterminal>,
    productions: Vec<Production>,
    binary: Vec<BinaryRule>,
    by_token: HashMap<String, Vec<Nonterminal>>,
    by_lhs: Vec<Vec<usize>>,
    start: Nonterminal,
}

impl Grammar {
    pub fn start(&self) -> Nonterminal {
        self.start
    }

    /// Returns the same grammar with a different start symbol, or `None` if
    /// `name` is not one of its nonterminals.
    pub fn with_start(mut self, name: &str) -> Option<Grammar> {
        self.start = self.nonterminal(name)?;
        Some(self)
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// Left-hand sides of the productions `A -> token`, in declaration order.
    pub fn terminal_productions(&self, token: &str) -> &[Nonterminal] {
        self.by_token.get(token).map_or(&[], Vec::as_slice)
    }

    pub fn binary_productions(&self) -> &[BinaryRule] {
        &self.binary
    }

    pub fn productions_of(&self, lhs: Nonterminal) -> impl Iterator<Item = &Production> + '_ {
        self.by_lhs[lhs.index()].iter().map(move |&i| &self.productions[i])
    }

    pub fn nonterminal(&self, name: &str) -> Option<Nonterminal> {
        self.ids.get(name).copied()
    }

    pub fn nonterminals(&self) -> impl Iterator<Item = Nonterminal> {
        (0..self.names.len() as u32).map(Nonterminal)
    }

    pub fn name(&self, symbol: Nonterminal) -> &str {
        &self.names[symbol.index()]
    }

    pub fn rule_text(&self, production: &Production) -> String {
        match production {
            Production::Terminal { lhs, token } => format!("{} -> {:?}", self.name(*lhs), token),
            Production::Binary(rule) => format!(
                "{} -> {} {}",
                self.name(rule.lhs),
                self.name(rule.left),
                self.name(rule.right)
            ),
        }
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "%start {}", self.name(self.start))?;
        for production in &self.productions {
            writeln!(f, "{}", self.rule_text(production))?;
        }
        Ok(())
    }
}

/// Incrementally assembles a [`Grammar`].
///
/// Nonterminals are interned on first mention. The first one mentioned is
/// the start symbol unless [`GrammarBuilder::start`] says otherwise.
/// Repeated productions are kept once.
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    names: Vec<String>,
    ids: HashMap<String, Nonterminal>,
    productions: Vec<Production>,
    seen: HashSet<Production>,
    start: Option<String>,
}

impl GrammarBuilder {
    pub fn nonterminal(&mut self, name: &str) -> Nonterminal {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = Nonterminal(self.names.len() as u32);
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    pub fn add_terminal(&mut self, lhs: &str, token: &str) {
        let lhs = self.nonterminal(lhs);
        self.push(Production::Terminal { lhs, token: token.to_string() });
    }

    pub fn add_binary(&mut self, lhs: &str, left: &str, right: &str) {
        let rule = BinaryRule {
            lhs: self.nonterminal(lhs),
            left: self.nonterminal(left),
            right: self.nonterminal(right),
        };
        self.push(Production::Binary(rule));
    }

    fn push(&mut self, production: Production) {
        if self.seen.insert(production.clone()) {
            self.productions.push(production);
        }
    }

    pub fn terminal(mut self, lhs: &str, token: &str) -> Self {
        self.add_terminal(lhs, token);
        self
    }

    pub fn binary(mut self, lhs: &str, left: &str, right: &str) -> Self {
        self.add_binary(lhs, left, right);
        self
    }

    pub fn start(mut self, name: &str) -> Self {
        self.start = Some(name.to_string());
        self
    }

    /// Returns `None` when the grammar would have no start symbol: either
    /// nothing was declared or the requested start was never mentioned.
    pub fn build(self) -> Option<Grammar> {
        let start = match &self.start {
            Some(name) => *self.ids.get(name)?,
            None if self.names.is_empty() => return None,
            None => Nonterminal(0),
        };

        let mut binary = Vec::new();
        let mut by_token = HashMap::<String, Vec<Nonterminal>>::new();
        let mut by_lhs = vec![Vec::new(); self.names.len()];
        for (i, production) in self.productions.iter().enumerate() {
            by_lhs[production.lhs().index()].push(i);
            match production {
                Production::Terminal { lhs, token } => by_token.entry(token.clone()).or_default().push(*lhs),
                Production::Binary(rule) => binary.push(*rule),
            }
        }

        Some(Grammar {
            names: self.names,
            ids: self.ids,
            productions: self.productions,
            binary,
            by_token,
            by_lhs,
            start,
        })
    }
}
