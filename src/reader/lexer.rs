use itertools::{Itertools, PeekingNext};

use super::{GrammarFormatErrorType, Result};

#[derive(PartialEq, Debug)]
pub enum Token {
    // `=` or `->`
    Arrow,
    Or,
    Nonterminal(String),
    Terminal(String)
}

pub fn lex_terminal(line: &mut impl PeekingNext<Item = char>) -> Result<Token> {
    // Consume open quote, which may be either kind
    let quote = line.next();
    let token_text = line.peeking_take_while(|&c| Some(c) != quote).collect();

    // Check if there is a close quote and consume it if there is
    if line.next() != quote {
        return Err(GrammarFormatErrorType::UnmatchedQuote);
    }

    Ok(Token::Terminal(token_text))
}

pub fn lex_nonterminal(line: &mut impl Iterator<Item = char>) -> Result<Token> {
    Ok(Token::Nonterminal(line.take_while(|c| !c.is_whitespace()).collect()))
}

pub fn lex_line(line: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();

    let mut line_chars = line.chars().peekable();

    while let Some(&c) = line_chars.peek() {
        if c == '=' {
            line_chars.next();
            tokens.push(Token::Arrow);
        } else if c == '-' && line_chars.clone().nth(1) == Some('>') {
            line_chars.nth(1);
            tokens.push(Token::Arrow);
        } else if c == '|' {
            line_chars.next();
            tokens.push(Token::Or);
        } else if c == '\"' || c == '\'' {
            tokens.push(lex_terminal(&mut line_chars)?);
        } else if !c.is_whitespace() {
            tokens.push(lex_nonterminal(&mut line_chars)?);
        } else {
            line_chars.next();
        }
    }

    return Ok(tokens);
}
