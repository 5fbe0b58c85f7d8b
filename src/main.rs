mod cli;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use itertools::Itertools;
use rand::prelude::*;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use ckyparse::cky::{Counter, Parser as ChartParser, Recognizer};
use ckyparse::error_handling::{eprint_all, Error, ErrorType, Location};
use ckyparse::generator;
use ckyparse::grammar::Grammar;
use ckyparse::reader::{self, GrammarFormatErrorType};
use ckyparse::reader::corpus::{self, TestSentence};
use cli::{Cli, Command, Sentences};

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn report<T: ErrorType>(errors: &[Error<T>]) -> ExitCode {
    eprint_all(errors);
    ExitCode::FAILURE
}

fn load_grammar(path: &Path, start: Option<&str>) -> Result<Grammar, ExitCode> {
    let grammar = reader::read_file(path).map_err(|errors| report(&errors))?;
    let grammar = match start {
        None => grammar,
        Some(name) => grammar.with_start(name).ok_or_else(|| {
            let error = GrammarFormatErrorType::UndefinedStart(name.to_string());
            report(&[Error::in_file(error, path)])
        })?,
    };
    debug!("grammar in use:\n{}", grammar);
    Ok(grammar)
}

fn load_sentences(sentences: &Sentences) -> Result<Vec<TestSentence>, ExitCode> {
    if let Some(path) = &sentences.corpus {
        return corpus::read_corpus(path).map_err(|errors| report(&errors));
    }

    if sentences.sentences.is_empty() {
        let stdin = std::io::stdin();
        return corpus::read_corpus_from(stdin.lock(), Path::new("<stdin>")).map_err(|errors| report(&errors));
    }

    Ok(sentences.sentences.iter().enumerate().map(|(i, text)| TestSentence {
        tokens: corpus::tokenize(text),
        expected: None,
        location: Location::line(Path::new("<args>"), i + 1)
    }).collect())
}

fn recognize(grammar: &Grammar, sentences: &[TestSentence]) -> ExitCode {
    let recognizer = Recognizer::new(grammar);
    for sentence in sentences {
        let verdict = if recognizer.recognize(&sentence.tokens) { "grammatical" } else { "ungrammatical" };
        println!("{}\t{}", verdict, sentence.text());
    }
    ExitCode::SUCCESS
}

fn parse(grammar: &Grammar, sentences: &[TestSentence], all_roots: bool) -> ExitCode {
    let parser = ChartParser::new(grammar);
    for sentence in sentences {
        let trees = if all_roots {
            parser.parse_spanning(&sentence.tokens)
        } else {
            parser.parse(&sentence.tokens)
        };
        println!("{}\t{} parse(s)", sentence.text(), trees.len());
        for tree in &trees {
            println!("  {}", tree.display(grammar));
        }
    }
    ExitCode::SUCCESS
}

fn count(grammar: &Grammar, sentences: &[TestSentence], all_roots: bool) -> ExitCode {
    let counter = Counter::new(grammar);
    let mut mismatches = 0;
    let mut overflows = Vec::new();
    for sentence in sentences {
        let count = if all_roots {
            counter.count_spanning(&sentence.tokens)
        } else {
            counter.count(&sentence.tokens)
        };
        let count = match count {
            Ok(count) => count,
            Err(error) => {
                overflows.push(Error { location: sentence.location.clone(), error });
                continue;
            }
        };
        println!("{}\t{}", count, sentence.text());

        if let Some(expected) = sentence.expected.filter(|&expected| expected != count) {
            warn!(location = %sentence.location, %expected, found = %count, "unexpected number of parses");
            mismatches += 1;
        }
    }

    if !overflows.is_empty() {
        return report(&overflows);
    }
    if mismatches > 0 {
        eprintln!("{} of {} sentences had an unexpected number of parses", mismatches, sentences.len());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn generate(grammar: &Grammar, path: &Path, start: Option<&str>, amount: u32, depth: usize, seed: Option<u64>) -> ExitCode {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    for _ in 0..amount {
        let generated = match start {
            Some(start) => generator::generate_with_override(grammar, start, depth, &mut rng),
            None => generator::generate(grammar, depth, &mut rng),
        };
        match generated {
            Ok(tree) => println!("{}", tree.leaves().iter().join(" ")),
            Err(error) => return report(&[Error::in_file(error, path)]),
        }
    }
    ExitCode::SUCCESS
}

fn run(cli: &Cli) -> Result<ExitCode, ExitCode> {
    let grammar = load_grammar(&cli.grammar, cli.start.as_deref())?;

    let code = match &cli.command {
        Command::Recognize(sentences) => recognize(&grammar, &load_sentences(sentences)?),
        Command::Parse { sentences, all_roots } => parse(&grammar, &load_sentences(sentences)?, *all_roots),
        Command::Count { sentences, all_roots } => count(&grammar, &load_sentences(sentences)?, *all_roots),
        Command::Generate { amount, depth, seed } => {
            generate(&grammar, &cli.grammar, cli.start.as_deref(), amount.unwrap_or(1), *depth, *seed)
        }
    };
    Ok(code)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    info!(grammar = %cli.grammar.display(), "starting");

    match run(&cli) {
        Ok(code) | Err(code) => code,
    }
}
