//! # Comment Token Handling
//!
//! Razen has two comment forms:
//!
//! * **Line Comments**: `// comment text`, to end of line
//! * **Block Comments**: `/* comment text */`, non-nested
//!
//! Comments are lexed as real tokens so that tooling which wants them
//! (formatters, documentation extractors) can see them; the preprocessor
//! strips them from the stream before parsing, so the grammar never has to
//! mention them.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until},
    character::complete::not_line_ending,
    combinator::{map, rest},
    error::context,
    sequence::{delimited, preceded},
};

use super::token::{ParserResult, Token};

/// The comment form a [`Token::Comment`] was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentType {
    /// `//` to end of line
    Line,
    /// `/* ... */`
    Block,
}

/// Parses either comment form. Must run before operator parsing so that `//`
/// and `/*` are not read as division.
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_comment(input: &str) -> ParserResult<Token> {
    context(
        "comment",
        alt((
            parse_block_comment,
            parse_unterminated_block_comment,
            parse_line_comment,
        )),
    )(input)
}

/// Parses a line comment. The comment content is trimmed.
pub fn parse_line_comment(input: &str) -> ParserResult<Token> {
    map(preceded(tag("//"), not_line_ending), |content: &str| {
        Token::Comment {
            content: content.trim().to_string(),
            comment_type: CommentType::Line,
        }
    })(input)
}

/// Parses a block comment. Block comments do not nest: the first `*/` closes.
pub fn parse_block_comment(input: &str) -> ParserResult<Token> {
    map(
        delimited(tag("/*"), take_until("*/"), tag("*/")),
        |content: &str| Token::Comment {
            content: content.to_string(),
            comment_type: CommentType::Block,
        },
    )(input)
}

/// A `/*` with no closing `*/` consumes the rest of the input as an error
/// token; lexing never aborts.
fn parse_unterminated_block_comment(input: &str) -> ParserResult<Token> {
    map(preceded(tag("/*"), rest), |_| {
        Token::Error("unterminated block comment".to_string())
    })(input)
}
