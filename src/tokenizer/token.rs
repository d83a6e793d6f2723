//! # Core Token Types and Tokenizer
//!
//! The [`Tokenizer`] turns Razen source text into an ordered sequence of
//! [`TokenSpan`]s. It is total: it always terminates, and it never fails.
//! Unlexable input becomes [`Token::Error`] tokens carrying a message, so the
//! decision of whether a lexical problem is fatal belongs to the parser and
//! its caller, not the lexer.
//!
//! ## Token Stream Shape
//!
//! The raw stream covers the whole input: whitespace, newlines, and comments
//! are real tokens. A single [`Token::Eof`] is appended at the end of input.
//! The preprocessor strips trivia before parsing.
//!
//! ## Position Tracking
//!
//! Each token carries a [`Span`] with byte offsets and 1-based line/column
//! information for diagnostics. The tokenizer can be seeded at an arbitrary
//! position ([`Tokenizer::with_position`]) so that f-string interpolations
//! can be re-lexed with spans in the coordinate space of the enclosing file.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{take_while, take_while1},
    combinator::recognize,
    error::{VerboseError, context},
    sequence::pair,
};

use super::{
    comment::{CommentType, parse_comment},
    keyword::Keyword,
    literal::{Literal, parse_literal},
    symbol::{Delimiter, Operator, parse_delimiter, parse_operator},
    whitespace::{parse_newline, parse_whitespace},
};

/// Result type shared by the per-category nom parsers.
pub type ParserResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

/// The smallest lexical unit of a Razen source file.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A reserved word.
    Keyword(Keyword),
    /// A name, stored verbatim.
    Identifier(String),
    /// An integer, float, string, or f-string literal.
    Literal(Literal),
    /// An operator symbol.
    Operator(Operator),
    /// A structural delimiter.
    Delimiter(Delimiter),
    /// Spaces and tabs (trivia).
    Whitespace(String),
    /// A line break (trivia).
    Newline,
    /// A comment (trivia, retained for tooling).
    Comment {
        content: String,
        comment_type: CommentType,
    },
    /// An unlexable span, with a message describing why.
    Error(String),
    /// End of input; emitted exactly once, after all other tokens.
    Eof,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Keyword(kw) => write!(f, "{}", kw),
            Token::Identifier(name) => write!(f, "{}", name),
            Token::Literal(lit) => write!(f, "{}", lit),
            Token::Operator(op) => write!(f, "{}", op),
            Token::Delimiter(d) => write!(f, "{}", d),
            Token::Whitespace(_) => write!(f, "whitespace"),
            Token::Newline => write!(f, "newline"),
            Token::Comment { .. } => write!(f, "comment"),
            Token::Error(message) => write!(f, "error token ({})", message),
            Token::Eof => write!(f, "end of file"),
        }
    }
}

/// A half-open byte range in the source, with the 1-based line and column of
/// its start, attached to every token and AST node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// An empty span, for synthesized nodes.
    pub fn empty() -> Self {
        Self {
            start: 0,
            end: 0,
            line: 1,
            column: 1,
        }
    }

    /// The smallest span covering both `self` and `other`; keeps the
    /// line/column of whichever starts first.
    pub fn merge(self, other: Span) -> Span {
        let (line, column) = if self.start <= other.start {
            (self.line, self.column)
        } else {
            (other.line, other.column)
        };
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line,
            column,
        }
    }

    /// True when `other` lies entirely within `self`.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A token plus the source span it was lexed from.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenSpan {
    pub token: Token,
    pub span: Span,
}

/// The Razen lexer. Owns only its position counters; one instance per
/// source unit.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    current_position: usize,
    current_line: usize,
    current_column: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            current_position: 0,
            current_line: 1,
            current_column: 1,
        }
    }

    /// A tokenizer seeded at an arbitrary position. Used to re-lex f-string
    /// interpolation text so its spans land in the enclosing file's
    /// coordinate space.
    pub fn with_position(position: usize, line: usize, column: usize) -> Self {
        Self {
            current_position: position,
            current_line: line,
            current_column: column,
        }
    }

    /// Tokenizes the input completely. Total: never fails, always terminates,
    /// and the final token is always [`Token::Eof`]. Unrecognized characters
    /// become [`Token::Error`] tokens.
    #[tracing::instrument(level = "debug", skip(self, input))]
    pub fn tokenize(&mut self, input: &str) -> Vec<TokenSpan> {
        let mut tokens = Vec::new();
        let mut remaining = input;

        while !remaining.is_empty() {
            let start_position = self.current_position;
            let start_line = self.current_line;
            let start_column = self.current_column;

            let result = alt((
                // Trivia
                parse_whitespace,
                parse_newline,
                parse_comment,
                // Literals (before identifiers, so `f"` wins over `f`)
                parse_literal,
                // Symbols
                parse_operator,
                parse_delimiter,
                // Words
                parse_identifier,
            ))(remaining);

            let (new_remaining, token) = match result {
                Ok((new_remaining, token)) => (new_remaining, token),
                Err(_) => {
                    // Nothing matched; consume one character as an error
                    // token and keep going.
                    let Some(c) = remaining.chars().next() else {
                        break;
                    };
                    (
                        &remaining[c.len_utf8()..],
                        Token::Error(format!("unrecognized character: {:?}", c)),
                    )
                }
            };

            let consumed = &remaining[..(remaining.len() - new_remaining.len())];
            self.update_position(consumed);

            tokens.push(TokenSpan {
                token,
                span: Span::new(
                    start_position,
                    self.current_position,
                    start_line,
                    start_column,
                ),
            });

            remaining = new_remaining;
        }

        tokens.push(TokenSpan {
            token: Token::Eof,
            span: Span::new(
                self.current_position,
                self.current_position,
                self.current_line,
                self.current_column,
            ),
        });

        tokens
    }

    fn update_position(&mut self, text: &str) {
        for c in text.chars() {
            self.current_position += c.len_utf8();
            if c == '\n' {
                self.current_line += 1;
                self.current_column = 1;
            } else {
                self.current_column += 1;
            }
        }
    }
}

/// Parses an identifier word, then reclassifies it through the keyword table.
/// Scanning the full word first is what keeps `matches` from lexing as the
/// keyword `match` plus `es`.
#[tracing::instrument(level = "debug", skip(input))]
fn parse_identifier(input: &str) -> ParserResult<Token> {
    let (input, word) = context(
        "identifier",
        recognize(pair(
            take_while1(|c: char| c.is_ascii_alphabetic() || c == '_'),
            take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
        )),
    )(input)?;

    if let Ok(kw) = Keyword::try_from(word) {
        return Ok((input, Token::Keyword(kw)));
    }

    Ok((input, Token::Identifier(word.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Token> {
        Tokenizer::new()
            .tokenize(input)
            .into_iter()
            .map(|ts| ts.token)
            .filter(|t| !matches!(t, Token::Whitespace(_) | Token::Newline))
            .collect()
    }

    #[test]
    fn test_identifier_vs_keyword() {
        let (rest, token) = parse_identifier("match rest").unwrap();
        assert_eq!(token, Token::Keyword(Keyword::Match));
        assert_eq!(rest, " rest");

        let (rest, token) = parse_identifier("matches").unwrap();
        assert_eq!(token, Token::Identifier("matches".to_string()));
        assert_eq!(rest, "");

        let (_, token) = parse_identifier("_tmp1").unwrap();
        assert_eq!(token, Token::Identifier("_tmp1".to_string()));
    }

    #[test]
    fn test_tokenize_positions() {
        let tokens = Tokenizer::new().tokenize("x\ny");
        assert_eq!(tokens[0].token, Token::Identifier("x".to_string()));
        assert_eq!(tokens[0].span.line, 1);
        assert_eq!(tokens[0].span.column, 1);

        assert_eq!(tokens[2].token, Token::Identifier("y".to_string()));
        assert_eq!(tokens[2].span.line, 2);
        assert_eq!(tokens[2].span.column, 1);
    }

    #[test]
    fn test_tokenize_ends_with_eof() {
        let tokens = Tokenizer::new().tokenize("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].token, Token::Eof);

        let tokens = Tokenizer::new().tokenize("var x;");
        assert_eq!(tokens.last().unwrap().token, Token::Eof);
    }

    #[test]
    fn test_tokenize_never_fails() {
        let tokens = Tokenizer::new().tokenize("var @ x;");
        let errors: Vec<_> = tokens
            .iter()
            .filter(|ts| matches!(ts.token, Token::Error(_)))
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span.start, 4);
        assert_eq!(errors[0].span.end, 5);
        // Lexing continued past the error.
        assert!(tokens.iter().any(|ts| ts.token == Token::Identifier("x".to_string())));
    }

    #[test]
    fn test_declaration_stream() {
        let tokens = kinds("pub var count: int = 0;");
        assert_eq!(
            tokens,
            vec![
                Token::Keyword(Keyword::Pub),
                Token::Keyword(Keyword::Var),
                Token::Identifier("count".to_string()),
                Token::Delimiter(Delimiter::Colon),
                Token::Keyword(Keyword::Int),
                Token::Operator(Operator::Assign),
                Token::Literal(Literal::Integer(0)),
                Token::Delimiter(Delimiter::Semicolon),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_spans_cover_input() {
        let input = "fun main() { return 1 + 2; }";
        let tokens = Tokenizer::new().tokenize(input);
        let mut expected_start = 0;
        for ts in &tokens {
            assert_eq!(ts.span.start, expected_start);
            expected_start = ts.span.end;
        }
        assert_eq!(expected_start, input.len());
    }

    #[test]
    fn test_comment_tokens_are_emitted() {
        let tokens = kinds("1 // trailing\n/* block */ 2");
        assert!(matches!(
            tokens[1],
            Token::Comment {
                comment_type: CommentType::Line,
                ..
            }
        ));
        assert!(matches!(
            tokens[2],
            Token::Comment {
                comment_type: CommentType::Block,
                ..
            }
        ));
    }
}
