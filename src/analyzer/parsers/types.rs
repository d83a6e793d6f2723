//! # Type Parsing
//!
//! Types appear only in annotation positions (after `:`, after `->`, inside
//! `array<...>` / `map<...>`), so the parser is always in type context when
//! it runs and `<` / `>` are angle delimiters here, never comparisons.
//!
//! Nested generics close with adjacent angles that the lexer has already
//! joined into a `>>` shift token (`array<array<int>>`). The closing-angle
//! parser splits such a token: consuming it satisfies one close and banks
//! the second for the enclosing type.

use super::super::core::{ParseError, ParseResult, Parser};
use super::super::prelude::*;
use super::{delimiter, found_text};
use crate::ast;
use crate::tokenizer::keyword::Keyword;
use crate::tokenizer::symbol::{Delimiter, Operator};
use crate::tokenizer::token::{Span, Token, TokenSpan};

/// Parses a type expression.
pub fn parse_type() -> impl Parser<TokenSpan, ast::TypeExpr> {
    with_context(
        |input: &[TokenSpan], pos: usize| {
            let mut pending_closes = 0usize;
            let result = parse_type_inner(input, pos, &mut pending_closes);
            if pending_closes > 0 {
                // A split `>>` left an unmatched closing angle.
                return Err(ParseError::Unexpected {
                    expected: vec!["a type".to_string()],
                    found: "`>`".to_string(),
                    position: result.map(|(p, _)| p.saturating_sub(1)).unwrap_or(pos),
                    context: None,
                });
            }
            result
        },
        "type",
    )
}

fn primitive(kw: Keyword) -> Option<ast::PrimitiveType> {
    match kw {
        Keyword::Int => Some(ast::PrimitiveType::Int),
        Keyword::Float => Some(ast::PrimitiveType::Float),
        Keyword::Str => Some(ast::PrimitiveType::Str),
        Keyword::Bool => Some(ast::PrimitiveType::Bool),
        Keyword::Char => Some(ast::PrimitiveType::Char),
        Keyword::Any => Some(ast::PrimitiveType::Any),
        _ => None,
    }
}

fn parse_type_inner(
    input: &[TokenSpan],
    pos: usize,
    pending_closes: &mut usize,
) -> ParseResult<ast::TypeExpr> {
    let Some(ts) = input.get(pos) else {
        return Err(ParseError::UnexpectedEof {
            expected: "a type".to_string(),
            position: pos,
            context: None,
        });
    };
    let span = ts.span;
    match &ts.token {
        Token::Keyword(kw) => {
            if let Some(p) = primitive(*kw) {
                return Ok((
                    pos + 1,
                    ast::TypeExpr {
                        kind: ast::TypeKind::Primitive(p),
                        span,
                    },
                ));
            }
            match kw {
                Keyword::Array => {
                    let p = open_angle(input, pos + 1)?;
                    let (p, element) = parse_type_inner(input, p, pending_closes)?;
                    let (end, close_span) = close_angle(input, p, pending_closes)?;
                    Ok((
                        end,
                        ast::TypeExpr {
                            kind: ast::TypeKind::Array(Box::new(element)),
                            span: span.merge(close_span),
                        },
                    ))
                }
                Keyword::Map => {
                    let p = open_angle(input, pos + 1)?;
                    let (p, key) = parse_type_inner(input, p, pending_closes)?;
                    let (p, _) = delimiter(Delimiter::Comma).parse(input, p)?;
                    let (p, value) = parse_type_inner(input, p, pending_closes)?;
                    let (end, close_span) = close_angle(input, p, pending_closes)?;
                    Ok((
                        end,
                        ast::TypeExpr {
                            kind: ast::TypeKind::Map(Box::new(key), Box::new(value)),
                            span: span.merge(close_span),
                        },
                    ))
                }
                _ => Err(type_error(input, pos)),
            }
        }
        Token::Identifier(name) => Ok((
            pos + 1,
            ast::TypeExpr {
                kind: ast::TypeKind::Named(name.clone()),
                span,
            },
        )),
        _ => Err(type_error(input, pos)),
    }
}

fn type_error(input: &[TokenSpan], pos: usize) -> ParseError {
    ParseError::Unexpected {
        expected: vec!["a type".to_string()],
        found: found_text(input, pos),
        position: pos,
        context: None,
    }
}

fn open_angle(input: &[TokenSpan], pos: usize) -> Result<usize, ParseError> {
    match input.get(pos).map(|ts| &ts.token) {
        Some(Token::Operator(Operator::Less)) => Ok(pos + 1),
        _ => Err(ParseError::Unexpected {
            expected: vec!["`<`".to_string()],
            found: found_text(input, pos),
            position: pos,
            context: None,
        }),
    }
}

/// Consumes one closing angle. A banked half of a previously split `>>`
/// satisfies the close without consuming; a `>>` token here is consumed and
/// its second half banked for the enclosing type.
fn close_angle(
    input: &[TokenSpan],
    pos: usize,
    pending_closes: &mut usize,
) -> Result<(usize, Span), ParseError> {
    if *pending_closes > 0 {
        *pending_closes -= 1;
        let span = input
            .get(pos.saturating_sub(1))
            .map(|ts| ts.span)
            .unwrap_or_else(Span::empty);
        return Ok((pos, span));
    }
    match input.get(pos).map(|ts| &ts.token) {
        Some(Token::Operator(Operator::Greater)) => Ok((pos + 1, input[pos].span)),
        Some(Token::Operator(Operator::ShiftRight)) => {
            *pending_closes += 1;
            Ok((pos + 1, input[pos].span))
        }
        _ => Err(ParseError::Unexpected {
            expected: vec!["`>`".to_string()],
            found: found_text(input, pos),
            position: pos,
            context: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::tokens;
    use super::*;
    use crate::ast::{PrimitiveType, TypeKind};

    fn parse(source: &str) -> ast::TypeExpr {
        let input = tokens(source);
        let (end, ty) = parse_type()
            .parse(&input, 0)
            .unwrap_or_else(|e| panic!("parse failed for {:?}: {}", source, e));
        assert_eq!(
            input[end].token,
            Token::Eof,
            "type did not consume all of {:?}",
            source
        );
        ty
    }

    #[test]
    fn test_primitive_types() {
        for (source, expected) in [
            ("int", PrimitiveType::Int),
            ("float", PrimitiveType::Float),
            ("str", PrimitiveType::Str),
            ("bool", PrimitiveType::Bool),
            ("char", PrimitiveType::Char),
            ("any", PrimitiveType::Any),
        ] {
            assert_eq!(parse(source).kind, TypeKind::Primitive(expected));
        }
    }

    #[test]
    fn test_named_type() {
        let ty = parse("Point");
        assert_eq!(ty.kind, TypeKind::Named("Point".to_string()));
    }

    #[test]
    fn test_array_and_map_types() {
        let ty = parse("array<int>");
        let TypeKind::Array(element) = ty.kind else {
            panic!("expected an array type");
        };
        assert_eq!(element.kind, TypeKind::Primitive(PrimitiveType::Int));

        let ty = parse("map<str, float>");
        let TypeKind::Map(key, value) = ty.kind else {
            panic!("expected a map type");
        };
        assert_eq!(key.kind, TypeKind::Primitive(PrimitiveType::Str));
        assert_eq!(value.kind, TypeKind::Primitive(PrimitiveType::Float));
    }

    #[test]
    fn test_nested_generics_split_shift_tokens() {
        // `>>` at the end lexes as one shift token; the type parser splits it.
        let ty = parse("array<array<int>>");
        let TypeKind::Array(inner) = ty.kind else {
            panic!("expected an array type");
        };
        assert!(matches!(inner.kind, TypeKind::Array(_)));

        let ty = parse("map<str, array<map<str, int>>>");
        assert!(matches!(ty.kind, TypeKind::Map(_, _)));
    }

    #[test]
    fn test_type_spans_cover_generics() {
        let source = "array<array<int>>";
        let ty = parse(source);
        assert_eq!(ty.span.start, 0);
        assert_eq!(ty.span.end, source.len());
    }

    #[test]
    fn test_type_errors() {
        let input = tokens("123");
        assert!(parse_type().parse(&input, 0).is_err());

        let input = tokens("array<int");
        assert!(parse_type().parse(&input, 0).is_err());

        let input = tokens("array int>");
        assert!(parse_type().parse(&input, 0).is_err());
    }
}
