use std::fmt::Display;
use std::sync::Arc;

use crate::grammar::{Grammar, Nonterminal};

/// A derivation of a span under a CNF grammar.
///
/// Subtrees are reference counted so that trees reconstructed from one
/// chart share the parts they have in common. Equality, ordering and
/// hashing are structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParseTree {
    // label -> token
    Leaf { label: Nonterminal, token: String },
    // label -> left right
    Branch { label: Nonterminal, left: Arc<ParseTree>, right: Arc<ParseTree> },
}

impl ParseTree {
    pub fn label(&self) -> Nonterminal {
        match self {
            ParseTree::Leaf { label, .. } | ParseTree::Branch { label, .. } => *label,
        }
    }

    /// Tokens at the leaves, left to right.
    pub fn leaves(&self) -> Vec<&str> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a str>) {
        match self {
            ParseTree::Leaf { token, .. } => leaves.push(token),
            ParseTree::Branch { left, right, .. } => {
                left.collect_leaves(leaves);
                right.collect_leaves(leaves);
            }
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            ParseTree::Leaf { .. } => 1,
            ParseTree::Branch { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Height counting nonterminal nodes; a lone leaf has height 1.
    pub fn height(&self) -> usize {
        match self {
            ParseTree::Leaf { .. } => 1,
            ParseTree::Branch { left, right, .. } => 1 + left.height().max(right.height()),
        }
    }

    /// Bracketed rendering such as `(S (A a) (B b))`, using the names from
    /// the grammar the tree was built with.
    pub fn display<'a>(&'a self, grammar: &'a Grammar) -> Bracketed<'a> {
        Bracketed { tree: self, grammar }
    }
}

pub struct Bracketed<'a> {
    tree: &'a ParseTree,
    grammar: &'a Grammar,
}

impl Display for Bracketed<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.tree {
            ParseTree::Leaf { label, token } => write!(f, "({} {})", self.grammar.name(*label), token),
            ParseTree::Branch { label, left, right } => write!(
                f,
                "({} {} {})",
                self.grammar.name(*label),
                left.display(self.grammar),
                right.display(self.grammar)
            ),
        }
    }
}
