//! # Grammar Productions
//!
//! The parsers for the Razen grammar, organized by category:
//!
//! * [`root`]: the source-file entry point and top-level recovery loop
//! * [`statement`]: statement dispatch, declarations, and control flow
//! * [`expression`]: precedence-climbing expression parsing
//! * [`types`]: type-context parsing
//!
//! This module holds the token-level leaf parsers they are built from. Leaf
//! parsers operate on `&[TokenSpan]` and produce precise expected/found
//! errors; everything above them composes leaves with the combinators.

pub mod expression;
pub mod root;
pub mod statement;
pub mod types;

use super::core::{ParseError, Parser};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::tokenizer::keyword::Keyword;
use crate::tokenizer::symbol::{Delimiter, Operator};
use crate::tokenizer::token::{Span, Token, TokenSpan};

/// The display text of the token at `pos`, for error messages.
pub(crate) fn found_text(input: &[TokenSpan], pos: usize) -> String {
    match input.get(pos) {
        Some(ts) => format!("`{}`", ts.token),
        None => "end of file".to_string(),
    }
}

/// Matches one specific token and yields its [`TokenSpan`].
pub fn token(expected: Token) -> impl Parser<TokenSpan, TokenSpan> {
    move |input: &[TokenSpan], pos: usize| match input.get(pos) {
        Some(ts) if ts.token == expected => Ok((pos + 1, ts.clone())),
        Some(_) => Err(ParseError::Unexpected {
            expected: vec![format!("`{}`", expected)],
            found: found_text(input, pos),
            position: pos,
            context: None,
        }),
        None => Err(ParseError::UnexpectedEof {
            expected: format!("`{}`", expected),
            position: pos,
            context: None,
        }),
    }
}

/// Matches a specific keyword.
pub fn keyword(kw: Keyword) -> impl Parser<TokenSpan, TokenSpan> {
    token(Token::Keyword(kw))
}

/// Matches a specific operator.
pub fn operator(op: Operator) -> impl Parser<TokenSpan, TokenSpan> {
    token(Token::Operator(op))
}

/// Matches a specific delimiter.
pub fn delimiter(d: Delimiter) -> impl Parser<TokenSpan, TokenSpan> {
    token(Token::Delimiter(d))
}

/// Matches any identifier, yielding its text and span.
pub fn identifier() -> impl Parser<TokenSpan, (String, Span)> {
    move |input: &[TokenSpan], pos: usize| match input.get(pos) {
        Some(TokenSpan {
            token: Token::Identifier(name),
            span,
        }) => Ok((pos + 1, (name.clone(), *span))),
        Some(_) => Err(ParseError::Unexpected {
            expected: vec!["an identifier".to_string()],
            found: found_text(input, pos),
            position: pos,
            context: None,
        }),
        None => Err(ParseError::UnexpectedEof {
            expected: "an identifier".to_string(),
            position: pos,
            context: None,
        }),
    }
}

/// The smallest span covering the tokens in `[start, end)`; an empty span at
/// the `start` token when the range is empty.
pub(crate) fn span_of(input: &[TokenSpan], start: usize, end: usize) -> Span {
    if start >= end || start >= input.len() {
        return input
            .get(start.min(input.len().saturating_sub(1)))
            .map(|ts| Span::new(ts.span.start, ts.span.start, ts.span.line, ts.span.column))
            .unwrap_or_else(Span::empty);
    }
    let last = end.min(input.len()) - 1;
    input[start].span.merge(input[last].span)
}

/// Wraps a parser so its output is paired with the span of the tokens it
/// consumed.
pub fn spanned<P, O>(parser: P) -> impl Parser<TokenSpan, (O, Span)>
where
    P: Parser<TokenSpan, O>,
{
    move |input: &[TokenSpan], pos: usize| {
        let (end, value) = parser.parse(input, pos)?;
        Ok((end, (value, span_of(input, pos, end))))
    }
}

/// Records a parse error as a diagnostic, resolving its token index to a
/// source span.
pub(crate) fn report(sink: &DiagnosticSink, error: &ParseError, input: &[TokenSpan]) {
    let pos = error.position().min(input.len().saturating_sub(1));
    let span = input.get(pos).map(|ts| ts.span).unwrap_or_else(Span::empty);
    let diagnostic = match error {
        ParseError::InvalidAssignmentTarget { .. } => {
            Diagnostic::invalid_assignment_target(span, sink.source())
        }
        _ => Diagnostic::syntax_error(error.to_string(), error.expected(), span, sink.source()),
    };
    tracing::debug!(target: "parser::recovery", %diagnostic, "recorded diagnostic");
    sink.push(diagnostic);
}
