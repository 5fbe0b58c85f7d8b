/*
    Test sentence files: one whitespace-tokenized sentence per line, with an
    optional `: N` suffix giving the number of parses it should have
*/

use std::fmt::Display;
use std::fs::File;
use std::io::BufRead;
use std::path::Path;

use itertools::Itertools;

use crate::error_handling::*;

#[derive(Debug)]
pub enum CorpusErrorType {
    // The text after `:` is not a number
    BadExpectedCount(String),
    // There was an issue with reading a file
    FileError(std::io::Error),
}

impl ErrorType for CorpusErrorType {}

impl PartialEq for CorpusErrorType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CorpusErrorType::BadExpectedCount(a), CorpusErrorType::BadExpectedCount(b)) => a == b,
            (CorpusErrorType::FileError(a), CorpusErrorType::FileError(b)) => a.kind() == b.kind(),
            _ => false,
        }
    }
}

impl Display for CorpusErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorpusErrorType::BadExpectedCount(text) => write!(f, "Expected a parse count after `:`, found `{}`", text),
            CorpusErrorType::FileError(e) => write!(f, "File error: {}", e),
        }
    }
}

pub type CorpusError = Error<CorpusErrorType>;

#[derive(Debug, PartialEq, Clone)]
pub struct TestSentence {
    pub tokens: Vec<String>,
    pub expected: Option<u128>,
    pub location: Location,
}

impl TestSentence {
    pub fn text(&self) -> String {
        self.tokens.join(" ")
    }
}

pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

fn parse_sentence(line: &str, location: Location) -> Result<TestSentence, CorpusError> {
    let (text, expected) = match line.rsplit_once(':') {
        Some((text, count)) => {
            let count = count.trim();
            let expected = count.parse::<u128>().map_err(|_| CorpusError {
                location: location.clone(),
                error: CorpusErrorType::BadExpectedCount(count.to_string())
            })?;
            (text, Some(expected))
        }
        None => (line, None),
    };

    Ok(TestSentence { tokens: tokenize(text), expected, location })
}

// `#`, `%` and `;` start comment lines
fn is_sentence_line(line: &str) -> bool {
    let line = line.trim_start();
    !line.is_empty() && !line.starts_with(&['#', '%', ';'][..])
}

pub fn read_corpus_from(reader: impl BufRead, path: &Path) -> Result<Vec<TestSentence>, Vec<CorpusError>> {
    let (sentences, errors): (Vec<_>, Vec<_>) = reader
        .lines()
        .enumerate()
        .filter(|(_, line)| line.as_ref().map_or(true, |l| is_sentence_line(l)))
        .map(|(num, line)| {
            let line = line.map_err(|e| CorpusError::in_file(CorpusErrorType::FileError(e), path))?;
            parse_sentence(&line, Location::line(path, num + 1))
        })
        .partition_result();

    if errors.is_empty() { Ok(sentences) } else { Err(errors) }
}

pub fn read_corpus(path: &Path) -> Result<Vec<TestSentence>, Vec<CorpusError>> {
    let file = File::open(path).map_err(|e| vec![CorpusError::in_file(CorpusErrorType::FileError(e), path)])?;
    read_corpus_from(std::io::BufReader::new(file), path)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn sentence_with_count() {
        let sentence = parse_sentence("i saw the man : 1", Location::new()).unwrap();
        assert_eq!(sentence.tokens, vec!["i", "saw", "the", "man"]);
        assert_eq!(sentence.expected, Some(1));
        assert_eq!(sentence.text(), "i saw the man");
    }

    #[test]
    fn sentence_without_count() {
        let sentence = parse_sentence("  what is the cheapest fare  ", Location::new()).unwrap();
        assert_eq!(sentence.tokens, vec!["what", "is", "the", "cheapest", "fare"]);
        assert_eq!(sentence.expected, None);
    }

    #[test]
    fn bad_count() {
        let error = parse_sentence("i saw : many", Location::new()).unwrap_err();
        assert_eq!(error.error, CorpusErrorType::BadExpectedCount("many".to_string()));
    }

    #[test]
    fn read_sentences_file() {
        let path = PathBuf::from("example_data/telescope.txt");
        let sentences = read_corpus(&path).unwrap();

        let summary: Vec<_> = sentences.iter().map(|s| (s.location.line, s.text(), s.expected)).collect();
        assert_eq!(summary, vec![
            (2, "i saw the man".to_string(), Some(1)),
            (3, "i saw the man with the telescope".to_string(), Some(2)),
            (4, "i saw the man with the telescope with the telescope".to_string(), Some(5)),
            (5, "a dog saw the man".to_string(), None),
            (7, "man the saw".to_string(), Some(0)),
        ]);
    }

    #[test]
    fn comment_lines_are_skipped() {
        let text = "# flights\n% ATIS test set\n; parses : many\n  ;indented\nshow me flights : 3\n";
        let sentences = read_corpus_from(text.as_bytes(), Path::new("atis.txt")).unwrap();

        let summary: Vec<_> = sentences.iter().map(|s| (s.location.line, s.text(), s.expected)).collect();
        assert_eq!(summary, vec![(5, "show me flights".to_string(), Some(3))]);
    }

    #[test]
    fn every_bad_line_is_reported() {
        let text = "a b : 1\nc : x\nd : -2\n";
        let errors = read_corpus_from(text.as_bytes(), Path::new("s.txt")).unwrap_err();
        let lines: Vec<_> = errors.iter().map(|e| e.location.line).collect();
        assert_eq!(lines, vec![2, 3]);
    }
}
