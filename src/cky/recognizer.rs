use crate::grammar::Grammar;

use super::{fill, SymbolChart};

/// Answers membership questions for one grammar.
#[derive(Debug, Clone, Copy)]
pub struct Recognizer<'g> {
    grammar: &'g Grammar,
}

impl<'g> Recognizer<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Recognizer { grammar }
    }

    /// The filled chart: every nonterminal deriving every span.
    pub fn chart<S: AsRef<str>>(&self, sentence: &[S]) -> SymbolChart {
        fill(self.grammar, sentence, |_, _, _, _| ())
    }

    pub fn recognize<S: AsRef<str>>(&self, sentence: &[S]) -> bool {
        self.chart(sentence)
            .root()
            .is_some_and(|symbols| symbols.contains(&self.grammar.start()))
    }
}
