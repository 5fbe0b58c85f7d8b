use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about = "Recognize, parse and count sentences with the CKY algorithm")]
pub struct Cli {
    /// File containing the grammar, in Chomsky Normal Form
    pub grammar: PathBuf,

    /// Start symbol (default: first in the file)
    #[arg(short, long, value_name = "SYMBOL")]
    pub start: Option<String>,

    /// Log chart construction to stderr
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Tell whether each sentence is in the language
    Recognize(Sentences),

    /// Print every parse tree of each sentence
    Parse {
        #[command(flatten)]
        sentences: Sentences,

        /// Include trees rooted at any nonterminal, not only the start symbol
        #[arg(long)]
        all_roots: bool,
    },

    /// Print the number of parse trees of each sentence
    Count {
        #[command(flatten)]
        sentences: Sentences,

        /// Include trees rooted at any nonterminal, not only the start symbol
        #[arg(long)]
        all_roots: bool,
    },

    /// Print random sentences from the grammar
    Generate {
        /// Amount to generate (default: 1)
        #[arg(short = 'n', long, value_name = "AMOUNT")]
        amount: Option<u32>,

        /// Maximum tree height
        #[arg(short, long, value_name = "HEIGHT", default_value_t = 8)]
        depth: usize,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Args)]
pub struct Sentences {
    /// Sentences, tokenized on whitespace (default: one per line from stdin)
    pub sentences: Vec<String>,

    /// Read sentences from a corpus file, where `sentence : N` expects N parses
    #[arg(short, long, value_name = "FILE", conflicts_with = "sentences")]
    pub corpus: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_arguments() {
        let cli = Cli::try_parse_from(["ckyparse", "g.cfg", "-s", "NP", "count", "--all-roots", "the dog", "a cat"]).unwrap();
        assert_eq!(cli.grammar, PathBuf::from("g.cfg"));
        assert_eq!(cli.start.as_deref(), Some("NP"));
        match cli.command {
            Command::Count { sentences, all_roots } => {
                assert!(all_roots);
                assert_eq!(sentences.sentences, vec!["the dog", "a cat"]);
                assert!(sentences.corpus.is_none());
            }
            _ => panic!("expected count"),
        }
    }

    #[test]
    fn corpus_excludes_sentences() {
        assert!(Cli::try_parse_from(["ckyparse", "g.cfg", "recognize", "-c", "s.txt", "a b"]).is_err());
    }

    #[test]
    fn generate_defaults() {
        let cli = Cli::try_parse_from(["ckyparse", "g.cfg", "generate"]).unwrap();
        match cli.command {
            Command::Generate { amount, depth, seed } => {
                assert_eq!(amount, None);
                assert_eq!(depth, 8);
                assert_eq!(seed, None);
            }
            _ => panic!("expected generate"),
        }
    }
}
