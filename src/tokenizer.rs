use std::fmt;

/// The units a statement is split into.
///
/// Parentheses and separating commas are always isolated; everything else stays a
/// [Token::Word], including keywords, which the parser matches case-insensitively.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Left parenthesis `(`
    LeftParen,
    /// Right parenthesis `)`
    RightParen,
    /// Comma `,`
    Comma,
    /// Any other whitespace-delimited text: keyword, identifier, literal or operator.
    Word(String),
}

impl Token {
    /// Returns the text of a [Token::Word].
    pub fn as_word(&self) -> Option<&str> {
        match self {
            Self::Word(word) => Some(word),
            _ => None,
        }
    }

    /// Checks if the token is the given keyword, ignoring case.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.as_word()
            .is_some_and(|word| word.eq_ignore_ascii_case(keyword))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LeftParen => f.write_str("("),
            Self::RightParen => f.write_str(")"),
            Self::Comma => f.write_str(","),
            Self::Word(word) => f.write_str(word),
        }
    }
}

/// Splits a raw statement into a flat sequence of [Token]s.
///
/// The input is first split on whitespace. Each fragment then loses any trailing `;`,
/// has one trailing `,` or `)` split off, and has a leading `(` split off. Punctuation in
/// the middle of a fragment is kept as part of the word.
pub struct Tokenizer<'a> {
    input: &'a str,
}

impl<'a> Tokenizer<'a> {
    /// Creates a new Tokenizer for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// Processes the entire input and returns a vector of tokens.
    ///
    /// # Example
    /// ```
    /// # use simpledb::tokenizer::{Tokenizer, Token};
    /// let tokens = Tokenizer::new("VALUES (1, Bob)").tokenize();
    /// assert_eq!(tokens[1], Token::LeftParen);
    /// assert_eq!(tokens[3], Token::Comma);
    /// ```
    pub fn tokenize(&self) -> Vec<Token> {
        let mut tokens = Vec::new();
        for fragment in self.input.split_whitespace() {
            Self::split_fragment(fragment, &mut tokens);
        }
        tokens
    }

    fn split_fragment(fragment: &str, tokens: &mut Vec<Token>) {
        // A statement terminator is never part of a token.
        let mut rest = fragment.trim_end_matches(';');

        let trailing = match rest.chars().last() {
            Some(',') => Some(Token::Comma),
            Some(')') => Some(Token::RightParen),
            _ => None,
        };
        if trailing.is_some() {
            rest = &rest[..rest.len() - 1];
        }

        if let Some(stripped) = rest.strip_prefix('(') {
            tokens.push(Token::LeftParen);
            rest = stripped;
        }

        if !rest.is_empty() {
            tokens.push(Token::Word(rest.to_string()));
        }

        if let Some(token) = trailing {
            tokens.push(token);
        }
    }
}
