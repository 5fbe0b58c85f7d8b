/*
    Errors that point back at the grammar or corpus line they came from
*/

use std::path::{Path, PathBuf};
use std::fmt::Display;

/// The kinds of problem one stage of loading can report.
pub trait ErrorType: Display + PartialEq {}

#[derive(Debug, PartialEq, Clone)]
pub struct Location {
    pub file: PathBuf,
    // 1-based, 0 when the whole file is meant
    pub line: usize
}

impl Location {
    pub fn file(file: impl Into<PathBuf>) -> Self {
        Location { file: file.into(), line: 0 }
    }

    pub fn line(file: &Path, line: usize) -> Self {
        Location { file: file.to_path_buf(), line }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.file.display())
        } else {
            write!(f, "{}:{}", self.file.display(), self.line)
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Error<T: ErrorType> {
    pub location: Location,
    pub error: T
}

impl<T: ErrorType> Error<T> {
    // For problems with a file as a whole, such as failing to open it
    pub fn in_file(error: T, file: &Path) -> Self {
        Error { location: Location::file(file), error }
    }
}

impl<T: ErrorType> Display for Error<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\x1b[31;49;1m[{}]\x1b[39;49;1m  {}\x1b[0m", self.location, self.error)
    }
}

impl<T: ErrorType + std::fmt::Debug> std::error::Error for Error<T> {}

pub type Errors<T> = Vec<Error<T>>;

/// Prints every error to stderr, one per line.
pub fn eprint_all<T: ErrorType>(errors: &[Error<T>]) {
    for error in errors {
        eprintln!("{}", error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct MissingRule;

    impl Display for MissingRule {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "no rule for `S`")
        }
    }

    impl ErrorType for MissingRule {}

    #[test]
    fn location_display() {
        assert_eq!(Location::file("g.cfg").to_string(), "g.cfg");
        assert_eq!(Location::line(Path::new("g.cfg"), 4).to_string(), "g.cfg:4");
    }

    #[test]
    fn error_display_mentions_location_and_message() {
        let error = Error { location: Location::line(Path::new("g.cfg"), 2), error: MissingRule };
        let text = error.to_string();
        assert!(text.contains("[g.cfg:2]"));
        assert!(text.contains("no rule for `S`"));
    }

    #[test]
    fn whole_file_errors() {
        let error = Error::in_file(MissingRule, Path::new("g.cfg"));
        assert_eq!(error.location, Location { file: PathBuf::from("g.cfg"), line: 0 });
    }
}
