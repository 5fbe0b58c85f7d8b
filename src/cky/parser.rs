use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::debug;

use crate::chart::Chart;
use crate::grammar::{BinaryRule, Grammar, Nonterminal};

use super::{fill, ParseTree, SymbolChart};

/// For one span: every (split point, rule) that derived each nonterminal.
pub type Backpointers = HashMap<Nonterminal, Vec<(usize, BinaryRule)>>;

/// Enumerates every parse tree of a sentence.
///
/// Output grows exponentially with ambiguity. Use [`super::Counter`] when
/// only the number of trees is needed.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'g> {
    grammar: &'g Grammar,
}

impl<'g> Parser<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Parser { grammar }
    }

    /// Fills the symbol chart along with a backpointer for every successful
    /// combination. Alternatives are appended, never replaced.
    pub fn chart<S: AsRef<str>>(&self, sentence: &[S]) -> (SymbolChart, Chart<Backpointers>) {
        let mut backpointers = Chart::<Backpointers>::new(sentence.len());
        let symbols = fill(self.grammar, sentence, |start, mid, end, rule| {
            backpointers.cell_mut(start, end)
                .entry(rule.lhs)
                .or_default()
                .push((mid, *rule));
        });
        (symbols, backpointers)
    }

    /// Trees rooted at the start symbol and spanning the whole sentence.
    pub fn parse<S: AsRef<str>>(&self, sentence: &[S]) -> BTreeSet<ParseTree> {
        self.parse_roots(sentence, |symbol| symbol == self.grammar.start())
    }

    /// Trees rooted at any nonterminal that spans the whole sentence.
    pub fn parse_spanning<S: AsRef<str>>(&self, sentence: &[S]) -> BTreeSet<ParseTree> {
        self.parse_roots(sentence, |_| true)
    }

    fn parse_roots<S, F>(&self, sentence: &[S], keep: F) -> BTreeSet<ParseTree>
    where
        S: AsRef<str>,
        F: Fn(Nonterminal) -> bool,
    {
        let (symbols, backpointers) = self.chart(sentence);
        let roots = match symbols.root() {
            Some(roots) => roots,
            None => return BTreeSet::new(),
        };

        let mut builder = TreeBuilder {
            sentence,
            backpointers: &backpointers,
            memo: HashMap::new(),
        };

        let n = sentence.len();
        let mut trees = BTreeSet::new();
        for &symbol in roots.iter().filter(|&&symbol| keep(symbol)) {
            let built = builder.build(0, n, symbol);
            trees.extend(built.iter().map(|tree| (**tree).clone()));
        }
        debug!(trees = trees.len(), shared_subtrees = builder.memo.len(), "reconstructed parse trees");
        trees
    }
}

type Subtrees = Arc<Vec<Arc<ParseTree>>>;

// Rebuilds trees from backpointers, remembering the trees of every
// (start, end, symbol) so shared sub-derivations are built once.
struct TreeBuilder<'a, S> {
    sentence: &'a [S],
    backpointers: &'a Chart<Backpointers>,
    memo: HashMap<(usize, usize, Nonterminal), Subtrees>,
}

impl<S: AsRef<str>> TreeBuilder<'_, S> {
    fn build(&mut self, start: usize, end: usize, symbol: Nonterminal) -> Subtrees {
        if let Some(trees) = self.memo.get(&(start, end, symbol)) {
            return Arc::clone(trees);
        }

        let trees = if start + 1 == end {
            vec![Arc::new(ParseTree::Leaf {
                label: symbol,
                token: self.sentence[start].as_ref().to_string(),
            })]
        } else {
            let derivations = self.backpointers.cell(start, end)
                .get(&symbol)
                .cloned()
                .unwrap_or_default();

            let mut trees = Vec::new();
            for (mid, rule) in derivations {
                let left = self.build(start, mid, rule.left);
                let right = self.build(mid, end, rule.right);
                for l in left.iter() {
                    for r in right.iter() {
                        trees.push(Arc::new(ParseTree::Branch {
                            label: rule.lhs,
                            left: Arc::clone(l),
                            right: Arc::clone(r),
                        }));
                    }
                }
            }
            trees
        };

        let trees = Arc::new(trees);
        self.memo.insert((start, end, symbol), Arc::clone(&trees));
        trees
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cky::tests::*;
    use crate::grammar::GrammarBuilder;

    fn rendered(grammar: &Grammar, trees: &BTreeSet<ParseTree>) -> Vec<String> {
        let mut rendered: Vec<_> = trees.iter().map(|t| t.display(grammar).to_string()).collect();
        rendered.sort();
        rendered
    }

    #[test]
    fn backpointers_keep_every_alternative() {
        let grammar = two_readings();
        let (symbols, backpointers) = Parser::new(&grammar).chart(&words("x y"));
        let s = grammar.nonterminal("S").unwrap();

        assert!(symbols.cell(0, 2).contains(&s));
        let entries = &backpointers.cell(0, 2)[&s];
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|(mid, _)| *mid == 1));
        assert_eq!(grammar.name(entries[0].1.left), "A");
        assert_eq!(grammar.name(entries[1].1.left), "C");
    }

    #[test]
    fn attachment_readings() {
        let grammar = telescope();
        let trees = Parser::new(&grammar).parse(&words("i saw the man with the telescope"));

        assert_eq!(rendered(&grammar, &trees), vec![
            "(S (NP i) (VP (V saw) (NP (NP (Det the) (N man)) (PP (P with) (NP (Det the) (N telescope))))))",
            "(S (NP i) (VP (VP (V saw) (NP (Det the) (N man))) (PP (P with) (NP (Det the) (N telescope)))))",
        ]);
    }

    #[test]
    fn spanning_includes_other_roots() {
        // Both S and T cover "a b"; only S is the start symbol
        let grammar = GrammarBuilder::default()
            .binary("S", "A", "B")
            .binary("T", "A", "B")
            .terminal("A", "a")
            .terminal("B", "b")
            .build()
            .unwrap();
        let parser = Parser::new(&grammar);

        assert_eq!(rendered(&grammar, &parser.parse(&words("a b"))), vec!["(S (A a) (B b))"]);
        assert_eq!(rendered(&grammar, &parser.parse_spanning(&words("a b"))), vec![
            "(S (A a) (B b))",
            "(T (A a) (B b))",
        ]);
    }

    #[test]
    fn single_token_trees() {
        let grammar = GrammarBuilder::default()
            .binary("S", "S", "S")
            .terminal("S", "a")
            .terminal("X", "a")
            .build()
            .unwrap();
        let parser = Parser::new(&grammar);

        assert_eq!(rendered(&grammar, &parser.parse(&["a"])), vec!["(S a)"]);
        assert_eq!(rendered(&grammar, &parser.parse_spanning(&["a"])), vec!["(S a)", "(X a)"]);
    }

    #[test]
    fn shared_subtrees_are_reused() {
        let grammar = catalan();
        let trees = Parser::new(&grammar).parse(&vec!["a"; 5]);
        assert_eq!(trees.len(), 14);

        // Every tree is distinct even though they are built from shared parts
        let distinct: std::collections::HashSet<_> = trees.iter().collect();
        assert_eq!(distinct.len(), 14);
    }

    #[test]
    fn sentences_parse_on_separate_threads() {
        let grammar = &telescope();
        let sentences = [
            words("i saw the man"),
            words("i saw the man with the telescope"),
            words("i saw the man with the telescope with the telescope"),
        ];

        let trees: Vec<BTreeSet<ParseTree>> = std::thread::scope(|scope| {
            let workers: Vec<_> = sentences.iter()
                .map(|sentence| scope.spawn(move || Parser::new(grammar).parse(sentence)))
                .collect();
            workers.into_iter().map(|worker| worker.join().unwrap()).collect()
        });

        let sizes: Vec<_> = trees.iter().map(BTreeSet::len).collect();
        assert_eq!(sizes, vec![1, 2, 5]);
        for (sentence, trees) in sentences.iter().zip(&trees) {
            assert_eq!(trees, &Parser::new(grammar).parse(sentence));
        }
    }

    #[test]
    fn no_trees_without_derivation() {
        let grammar = nested();
        assert!(Parser::new(&grammar).parse(&words("the dog saw")).is_empty());
        assert!(Parser::new(&grammar).parse(&words("the unicorn")).is_empty());
    }
}
