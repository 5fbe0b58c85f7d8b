/*
    This module reads grammar files in Chomsky Normal Form
*/

pub mod corpus;
mod lexer;
mod verifier;

use std::fmt::Display;
use std::fs::File;
use std::io::BufRead;
use std::path::Path;

use crate::grammar::{Grammar, GrammarBuilder};
use crate::error_handling::*;
use itertools::Itertools;
use lexer::*;
use tracing::{debug, info};
use verifier::verify_rules;

#[derive(Debug)]
pub enum GrammarFormatErrorType {
    // A line which should contain a rule does not
    MissingArrow,
    // A rule has multiple arrows
    UnexpectedArrow,
    // The user starts a rule line with something other than a nonterminal
    MissingNonterminal,
    // There is an unclosed quote
    UnmatchedQuote,
    // An alternative derives the empty string
    EmptyAlternative,
    // An alternative is neither one terminal nor two nonterminals
    NotCnf(String),
    // An undefined nonterminal was used
    UndefinedNonterminal(String),
    // `%start` names a nonterminal without rules
    UndefinedStart(String),
    // The file has no rules at all
    EmptyGrammar,
    // Somehow a full rewrite was parsed as a base alternative
    // This is a problem with the reader, not the grammar
    UnsplitRewrite,
    // A blank line got too deep into the reader
    // This is a problem with the reader, not the grammar
    UnexpectedBlankLine,
    // There was an issue with reading a file
    FileError(std::io::Error),
}

impl ErrorType for GrammarFormatErrorType {}

impl PartialEq for GrammarFormatErrorType {
    fn eq(&self, other: &Self) -> bool {
        if let GrammarFormatErrorType::FileError(a) = self {
            if let GrammarFormatErrorType::FileError(b) = other {
                return a.kind() == b.kind();
            }
        }
        return std::mem::discriminant(self) == std::mem::discriminant(other);
    }
}

impl Display for GrammarFormatErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrammarFormatErrorType::MissingArrow => write!(f, "Expected `->` or `=` after nonterminal"),
            GrammarFormatErrorType::UnexpectedArrow => write!(f, "Unexpected `->` or `=` encountered"),
            GrammarFormatErrorType::MissingNonterminal => write!(f, "Tried to define something other than a nonterminal"),
            GrammarFormatErrorType::UnmatchedQuote => write!(f, "Unmatched quotes"),
            GrammarFormatErrorType::EmptyAlternative => write!(f, "Empty alternatives are not allowed in Chomsky Normal Form"),
            GrammarFormatErrorType::NotCnf(alternative) => write!(f, "`{}` is neither a single terminal nor two nonterminals", alternative),
            GrammarFormatErrorType::UndefinedNonterminal(nonterminal) => write!(f, "Could not find definition for `{}`", nonterminal),
            GrammarFormatErrorType::UndefinedStart(nonterminal) => write!(f, "Start symbol `{}` has no rules", nonterminal),
            GrammarFormatErrorType::EmptyGrammar => write!(f, "Grammar has no rules"),
            GrammarFormatErrorType::UnsplitRewrite => write!(f, "Rewrite was not fully split (this is a problem with the reader, not the grammar)"),
            GrammarFormatErrorType::UnexpectedBlankLine => write!(f, "Blank line encountered in rule parser (this is a problem with the reader, not the grammar)"),
            GrammarFormatErrorType::FileError(e) => write!(f, "File error: {}", e),
        }
    }
}

pub type GrammarFormatError = Error<GrammarFormatErrorType>;
pub type GrammarFormatErrors = Errors<GrammarFormatErrorType>;

pub type Result<T> = std::result::Result<T, GrammarFormatErrorType>;
pub type LineResult<T> = std::result::Result<T, GrammarFormatError>;
pub type FileResult<T> = std::result::Result<T, GrammarFormatErrors>;

// Right-hand side of one alternative, already known to be in CNF
#[derive(PartialEq, Debug)]
enum Rhs {
    Terminal(String),
    Pair(String, String),
}

#[derive(PartialEq, Debug)]
struct Rule {
    symbol: String,
    rewrite: Vec<Rhs>,
    location: Location
}

#[derive(PartialEq, Debug)]
enum Line {
    Rule(Rule),
    // `%start SYMBOL`
    Start(String, Location),
}

fn describe(tokens: &[Token]) -> String {
    tokens.iter().map(|t| match t {
        Token::Arrow => "->".to_string(),
        Token::Or => "|".to_string(),
        Token::Nonterminal(s) => s.clone(),
        Token::Terminal(s) => format!("\"{}\"", s),
    }).join(" ")
}

fn parse_alternative(tokens: &[Token]) -> Result<Rhs> {
    if tokens.contains(&Token::Arrow) {
        return Err(GrammarFormatErrorType::UnexpectedArrow);
    }
    if tokens.contains(&Token::Or) {
        return Err(GrammarFormatErrorType::UnsplitRewrite);
    }

    match tokens {
        [] => Err(GrammarFormatErrorType::EmptyAlternative),
        [Token::Terminal(t)] if t.is_empty() => Err(GrammarFormatErrorType::EmptyAlternative),
        [Token::Terminal(t)] => Ok(Rhs::Terminal(t.clone())),
        [Token::Nonterminal(a), Token::Nonterminal(b)] => Ok(Rhs::Pair(a.clone(), b.clone())),
        _ => Err(GrammarFormatErrorType::NotCnf(describe(tokens))),
    }
}

fn parse_rewrite(tokens: &[Token]) -> Result<Vec<Rhs>> {
    tokens.split(|t| *t == Token::Or).map(parse_alternative).collect()
}

fn parse_line(tokens: &[Token], location: Location) -> Result<Line> {
    // Try to get the token the rule is for. The match returns a result which
    // is then unwrapped with the ? operator
    let symbol = match tokens.get(0) {
        Some(Token::Nonterminal(s)) => Ok(s.clone()),
        Some(_) => Err(GrammarFormatErrorType::MissingNonterminal),
        None => Err(GrammarFormatErrorType::UnexpectedBlankLine)
    }?;

    if symbol == "%start" {
        return match &tokens[1..] {
            [Token::Nonterminal(start)] => Ok(Line::Start(start.clone(), location)),
            _ => Err(GrammarFormatErrorType::MissingNonterminal),
        };
    }

    if tokens.get(1) != Some(&Token::Arrow) {
        return Err(GrammarFormatErrorType::MissingArrow)
    }

    let rewrite = parse_rewrite(&tokens[2..])?;

    return Ok(Line::Rule(Rule {
        symbol,
        rewrite,
        location
    }));
}

fn parse_lex_line(line: &str, location: Location) -> LineResult<Line> {
    lexer::lex_line(line)
        .and_then(|lexed_line| parse_line(&lexed_line, location.clone()))
        .map_err(|error| GrammarFormatError { location: location, error })
}

fn is_rule_line(line: &String) -> bool {
    let line = line.trim_start();
    !line.is_empty() && !line.starts_with(';') && !line.starts_with('#')
}

// Returns an iterator over the lines of a reader, with the io errors wrapped
// in GrammarFormatError and enumerated
fn numbered_lines<'a>(reader: impl BufRead + 'a, path: &'a Path) -> impl Iterator<Item = (usize, LineResult<String>)> + 'a {
    reader
        .lines()
        .map(move |line| line.map_err(|e| GrammarFormatError::in_file(GrammarFormatErrorType::FileError(e), path)))
        .enumerate()
        .filter(|(_, line)| line.as_ref().is_ok_and(is_rule_line) || line.is_err())
        .map(|(num, line)| (num + 1, line))
}

fn grammar_from_lines(lines: Vec<Line>, path: &Path) -> FileResult<Grammar> {
    let mut rules = Vec::new();
    let mut start = None;
    for line in lines {
        match line {
            Line::Rule(rule) => rules.push(rule),
            Line::Start(symbol, location) => start = Some((symbol, location)),
        }
    }

    if rules.is_empty() {
        return Err(vec![GrammarFormatError::in_file(GrammarFormatErrorType::EmptyGrammar, path)]);
    }

    verify_rules(&rules, start.as_ref())?;

    let mut builder = GrammarBuilder::default();
    builder.nonterminal(&rules[0].symbol);
    for rule in &rules {
        for rhs in &rule.rewrite {
            match rhs {
                Rhs::Terminal(token) => builder.add_terminal(&rule.symbol, token),
                Rhs::Pair(left, right) => builder.add_binary(&rule.symbol, left, right),
            }
        }
    }
    if let Some((symbol, _)) = start {
        builder = builder.start(&symbol);
    }

    // The verifier has made sure there is a start symbol with rules
    builder.build().ok_or_else(|| vec![GrammarFormatError::in_file(GrammarFormatErrorType::EmptyGrammar, path)])
}

/// Reads a grammar, reporting every malformed line at once. `path` is only
/// used to locate errors.
pub fn read(reader: impl BufRead, path: &Path) -> FileResult<Grammar> {
    let lines = numbered_lines(reader, path);

    let parsed_lines = lines.map(|(num, line_res)| {
        line_res.and_then(|line| parse_lex_line(&line, Location::line(path, num)))
    });

    let (lines, errors): (Vec<_>, Vec<_>) = parsed_lines.partition(LineResult::is_ok);
    if errors.len() > 0 {
        debug!(errors = errors.len(), "grammar has malformed lines");
        return Err(errors.into_iter().filter_map(LineResult::err).collect_vec());
    }
    let lines_unwrapped = lines.into_iter().filter_map(LineResult::ok).collect_vec();

    let grammar = grammar_from_lines(lines_unwrapped, path)?;
    info!(
        path = %path.display(),
        productions = grammar.productions().len(),
        start = grammar.name(grammar.start()),
        "loaded grammar"
    );
    Ok(grammar)
}

pub fn read_file(path: &Path) -> FileResult<Grammar> {
    let file = File::open(path).map_err(|e| vec![GrammarFormatError::in_file(GrammarFormatErrorType::FileError(e), path)])?;
    read(std::io::BufReader::new(file), path)
}

pub fn read_str(text: &str) -> FileResult<Grammar> {
    read(text.as_bytes(), Path::new("<string>"))
}
