//! Chart parsing of context-free grammars in Chomsky Normal Form.
//!
//! [`cky::recognize`], [`cky::parse`] and [`cky::count`] answer whether a
//! sentence is in a grammar's language, what all of its parse trees are,
//! and how many there are. Grammars come from [`grammar::GrammarBuilder`]
//! or from grammar files through [`reader`].

pub mod chart;
pub mod cky;
pub mod error_handling;
pub mod generator;
pub mod grammar;
pub mod reader;

pub use cky::{count, parse, recognize, CountOverflow, Counter, ParseTree, Parser, Recognizer};
pub use grammar::{Grammar, GrammarBuilder, Nonterminal};
