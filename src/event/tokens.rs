//! Whitespace tokenizer.

use nom::{
    bytes::complete::{take_till1, take_while},
    multi::many0,
    sequence::preceded,
    IResult, Offset,
};

fn token(input: &str) -> IResult<&str, &str> {
    preceded(take_while(char::is_whitespace), take_till1(char::is_whitespace))(input)
}

/// A line split into whitespace-separated tokens that still know where
/// they sit in the original line.
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    line: &'a str,
    tokens: Vec<&'a str>,
}

impl<'a> Tokens<'a> {
    /// Tokenize a line.
    pub fn new(line: &'a str) -> Self {
        let tokens = many0(token)(line)
            .map(|(_, tokens)| tokens)
            .unwrap_or_default();
        Self { line, tokens }
    }

    /// Number of tokens.
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True if the line held only whitespace.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token at `index`, if present.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.tokens.get(index).copied()
    }

    /// All tokens starting at `index`.
    pub fn tail(&self, index: usize) -> &[&'a str] {
        self.tokens.get(index..).unwrap_or(&[])
    }

    /// The raw remainder of the line starting at token `index`, with its
    /// internal spacing intact.
    pub fn rest(&self, index: usize) -> Option<&'a str> {
        let token = self.get(index)?;
        Some(&self.line[self.line.offset(token)..])
    }

    /// The original line.
    pub fn line(&self) -> &'a str {
        self.line
    }
}

impl<'a> std::ops::Index<usize> for Tokens<'a> {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        self.tokens[index]
    }
}

/// Strip one leading `:` if present.
#[inline]
pub fn strip_colon(token: &str) -> &str {
    token.strip_prefix(':').unwrap_or(token)
}
