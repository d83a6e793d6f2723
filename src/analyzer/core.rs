//! # Core Parser Definitions
//!
//! The fundamental parser interface and error type that the combinator
//! system and the grammar productions are built on.

use thiserror::Error;

/// Parser trait: the core parsing interface.
///
/// A parser takes an input slice and a position and returns either a success
/// with the new position and output value, or a [`ParseError`]. Positions are
/// token indices; the recovery layer resolves them to source spans.
///
/// # Type Parameters
///
/// * `I` - The input token type
/// * `O` - The output value type
pub trait Parser<I, O> {
    /// Attempts to parse the input starting at the given position.
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O>;
}

/// Result type for parsing operations.
pub type ParseResult<O> = Result<(usize, O), ParseError>;

/// Any compatible closure is a parser. Grammar productions with imperative
/// structure (dispatch, recovery loops, precedence climbing) are written as
/// closures and compose with the combinator structs through this impl.
impl<I, O, F> Parser<I, O> for F
where
    F: Fn(&[I], usize) -> ParseResult<O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        self(input, pos)
    }
}

/// Error type for parsing operations.
///
/// Carries the token index where parsing failed, the expected-token set when
/// known, and an optional production-context trail built by `with_context`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Input ended where a production still expected tokens.
    #[error("unexpected end of file: expected {expected} at position {position}")]
    UnexpectedEof {
        expected: String,
        position: usize,
        context: Option<String>,
    },
    /// The current token cannot continue the current production.
    #[error("unexpected token: expected {}, found {found}", expected.join(" or "))]
    Unexpected {
        expected: Vec<String>,
        found: String,
        position: usize,
        context: Option<String>,
    },
    /// A production failed for a reason other than a single-token mismatch.
    #[error("{message}")]
    Failure {
        message: String,
        position: usize,
        context: Option<String>,
    },
    /// Assignment or update applied to an expression that is not an
    /// identifier, member, or index.
    #[error("invalid assignment target")]
    InvalidAssignmentTarget { position: usize },
}

impl ParseError {
    /// Appends a production label to the error's context trail.
    pub fn with_context(self, ctx: &str) -> Self {
        let extend = |context: Option<String>| {
            Some(match context {
                Some(existing) => format!("{} -> {}", ctx, existing),
                None => ctx.to_string(),
            })
        };
        match self {
            ParseError::UnexpectedEof {
                expected,
                position,
                context,
            } => ParseError::UnexpectedEof {
                expected,
                position,
                context: extend(context),
            },
            ParseError::Unexpected {
                expected,
                found,
                position,
                context,
            } => ParseError::Unexpected {
                expected,
                found,
                position,
                context: extend(context),
            },
            ParseError::Failure {
                message,
                position,
                context,
            } => ParseError::Failure {
                message,
                position,
                context: extend(context),
            },
            other @ ParseError::InvalidAssignmentTarget { .. } => other,
        }
    }

    /// The token index the error occurred at.
    pub fn position(&self) -> usize {
        match self {
            ParseError::UnexpectedEof { position, .. } => *position,
            ParseError::Unexpected { position, .. } => *position,
            ParseError::Failure { position, .. } => *position,
            ParseError::InvalidAssignmentTarget { position } => *position,
        }
    }

    /// The expected-token set, when the error carries one.
    pub fn expected(&self) -> Vec<String> {
        match self {
            ParseError::UnexpectedEof { expected, .. } => vec![expected.clone()],
            ParseError::Unexpected { expected, .. } => expected.clone(),
            _ => Vec::new(),
        }
    }
}
