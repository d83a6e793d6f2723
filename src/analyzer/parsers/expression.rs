//! # Expression Parsing
//!
//! Precedence-climbing expression parser. The ten purely binary levels
//! (`**` up through `||`, with ranges at comparative level) are driven by a
//! binding-power table; postfix/unary, ternary, and assignment are explicit
//! layers because each has a rule the table cannot express:
//!
//! * postfix `++`/`--` binds to the just-parsed primary *before* any pending
//!   prefix operator applies, so `-x++` parses as `-(x++)` — this is the
//!   grammar's one declared conflict, resolved here as an explicit branch;
//! * ternary and assignment are right-associative and assignment validates
//!   its target shape (`Identifier`, `Member`, or `Index`);
//! * range expressions do not chain: `a..b..c` is a parse error.
//!
//! F-string tokens carry their interpolations as raw source text; this module
//! re-enters the expression grammar on each of them, with the tokenizer
//! seeded at the interpolation's absolute position so sub-expression spans
//! stay in the enclosing file's coordinate space.

use super::super::core::{ParseError, ParseResult, Parser};
use super::super::prelude::*;
use super::{delimiter, found_text, report, span_of};
use crate::ast;
use crate::diagnostics::DiagnosticSink;
use crate::preprocessor::{Preprocessor, TokenPreprocessor};
use crate::tokenizer::literal::{Literal, StringPart};
use crate::tokenizer::symbol::{Delimiter, Operator};
use crate::tokenizer::token::{Span, Token, TokenSpan, Tokenizer};
use crate::tokenizer::keyword::Keyword;

/// Parses one expression, consuming greedily according to the precedence
/// table.
pub fn parse_expression() -> impl Parser<TokenSpan, ast::Expression> {
    with_context(
        |input: &[TokenSpan], pos: usize| parse_assignment(input, pos),
        "expression",
    )
}

/// Parses an expression with shallow recovery: on failure, reports one
/// diagnostic, skips to the statement boundary, and yields an
/// [`ast::ExpressionKind::Error`] placeholder so the enclosing statement
/// survives.
///
/// With `require_progress`, a failure on the very first token propagates
/// instead, leaving the report to statement-level recovery; use this where
/// nothing has committed to an expression yet.
pub fn parse_expression_recovering(
    sink: &DiagnosticSink,
    require_progress: bool,
) -> impl Parser<TokenSpan, ast::Expression> {
    let sink = sink.clone();
    move |input: &[TokenSpan], pos: usize| match parse_assignment(input, pos) {
        Ok(ok) => Ok(ok),
        Err(error) if require_progress && error.position() <= pos => Err(error),
        Err(error) => {
            report(&sink, &error, input);
            Ok(skip_to_boundary(input, pos, error.position()))
        }
    }
}

/// Skips forward to just before the statement boundary (`;` or the `}` that
/// closes the current block), yielding an error placeholder spanning the
/// skipped tokens.
fn skip_to_boundary(
    input: &[TokenSpan],
    start: usize,
    from: usize,
) -> (usize, ast::Expression) {
    let mut depth = 0usize;
    let mut i = from.max(start);
    while i < input.len() {
        match &input[i].token {
            Token::Eof => break,
            Token::Delimiter(Delimiter::Semicolon) if depth == 0 => break,
            Token::Delimiter(Delimiter::CloseBrace) if depth == 0 => break,
            Token::Delimiter(Delimiter::OpenBrace) => depth += 1,
            Token::Delimiter(Delimiter::CloseBrace) => depth -= 1,
            _ => {}
        }
        i += 1;
    }
    let span = span_of(input, start, i);
    (
        i,
        ast::Expression {
            kind: ast::ExpressionKind::Error,
            span,
        },
    )
}

// --- Assignment and ternary layers (right-associative) ---

fn parse_assignment(input: &[TokenSpan], pos: usize) -> ParseResult<ast::Expression> {
    let (after_target, target) = parse_ternary(input, pos)?;
    let Some(op) = input
        .get(after_target)
        .and_then(|ts| assignment_operator(&ts.token))
    else {
        return Ok((after_target, target));
    };
    if !target.is_valid_target() {
        return Err(ParseError::InvalidAssignmentTarget { position: pos });
    }
    // Right recursion gives `a = b = 1` its right grouping.
    let (end, value) = parse_assignment(input, after_target + 1)?;
    let span = target.span.merge(value.span);
    Ok((
        end,
        ast::Expression {
            kind: ast::ExpressionKind::Assignment {
                op,
                target: Box::new(target),
                value: Box::new(value),
            },
            span,
        },
    ))
}

fn parse_ternary(input: &[TokenSpan], pos: usize) -> ParseResult<ast::Expression> {
    let (after_cond, condition) = parse_binary(input, pos, 0)?;
    if !matches!(
        input.get(after_cond).map(|ts| &ts.token),
        Some(Token::Operator(Operator::Question))
    ) {
        return Ok((after_cond, condition));
    }
    let (p, consequence) = parse_ternary(input, after_cond + 1)?;
    let (p, _) = delimiter(Delimiter::Colon).parse(input, p)?;
    let (end, alternative) = parse_ternary(input, p)?;
    let span = condition.span.merge(alternative.span);
    Ok((
        end,
        ast::Expression {
            kind: ast::ExpressionKind::Ternary {
                condition: Box::new(condition),
                consequence: Box::new(consequence),
                alternative: Box::new(alternative),
            },
            span,
        },
    ))
}

// --- Binary layer (binding-power table) ---

/// Binding power for a binary operator. Left-associative operators bind
/// their right side one step tighter than their left, so an equal-precedence
/// neighbor to the right does not fold in.
#[derive(Debug, Clone, Copy)]
struct BindingPower {
    left: u8,
    right: u8,
}

const fn left_assoc(precedence: u8) -> BindingPower {
    BindingPower {
        left: precedence,
        right: precedence + 1,
    }
}

enum BinaryLevelOp {
    Binary(ast::BinaryOperator),
    Range { inclusive: bool },
}

/// The binary precedence table, tightest binding last:
///
/// | level | operators |
/// |---|---|
/// | 10 | `\|\|` |
/// | 20 | `&&` |
/// | 30 | `== != < > <= >= .. ..=` |
/// | 40 | `\|` |
/// | 50 | `^` |
/// | 60 | `&` |
/// | 70 | `<< >>` |
/// | 80 | `+ -` |
/// | 90 | `* / %` |
/// | 100 | `**` |
///
/// Every level is left-associative; in particular `**` groups
/// `2 ** 3 ** 2` as `(2 ** 3) ** 2`, a deliberate divergence from
/// mathematical convention.
fn binary_level_op(token: &Token) -> Option<(BinaryLevelOp, BindingPower)> {
    use ast::BinaryOperator::*;
    let Token::Operator(op) = token else {
        return None;
    };
    let (level_op, bp) = match op {
        Operator::Or => (BinaryLevelOp::Binary(Or), left_assoc(10)),
        Operator::And => (BinaryLevelOp::Binary(And), left_assoc(20)),
        Operator::EqualEqual => (BinaryLevelOp::Binary(Equal), left_assoc(30)),
        Operator::NotEqual => (BinaryLevelOp::Binary(NotEqual), left_assoc(30)),
        Operator::Less => (BinaryLevelOp::Binary(LessThan), left_assoc(30)),
        Operator::Greater => (BinaryLevelOp::Binary(GreaterThan), left_assoc(30)),
        Operator::LessEqual => (BinaryLevelOp::Binary(LessThanEqual), left_assoc(30)),
        Operator::GreaterEqual => (BinaryLevelOp::Binary(GreaterThanEqual), left_assoc(30)),
        Operator::Range => (BinaryLevelOp::Range { inclusive: false }, left_assoc(30)),
        Operator::RangeInclusive => (BinaryLevelOp::Range { inclusive: true }, left_assoc(30)),
        Operator::BitOr => (BinaryLevelOp::Binary(BitOr), left_assoc(40)),
        Operator::BitXor => (BinaryLevelOp::Binary(BitXor), left_assoc(50)),
        Operator::BitAnd => (BinaryLevelOp::Binary(BitAnd), left_assoc(60)),
        Operator::ShiftLeft => (BinaryLevelOp::Binary(ShiftLeft), left_assoc(70)),
        Operator::ShiftRight => (BinaryLevelOp::Binary(ShiftRight), left_assoc(70)),
        Operator::Plus => (BinaryLevelOp::Binary(Add), left_assoc(80)),
        Operator::Minus => (BinaryLevelOp::Binary(Subtract), left_assoc(80)),
        Operator::Multiply => (BinaryLevelOp::Binary(Multiply), left_assoc(90)),
        Operator::Divide => (BinaryLevelOp::Binary(Divide), left_assoc(90)),
        Operator::Modulo => (BinaryLevelOp::Binary(Modulo), left_assoc(90)),
        Operator::Power => (BinaryLevelOp::Binary(Power), left_assoc(100)),
        _ => return None,
    };
    Some((level_op, bp))
}

fn parse_binary(input: &[TokenSpan], pos: usize, min_bp: u8) -> ParseResult<ast::Expression> {
    let (mut p, mut left) = parse_unary(input, pos)?;
    while let Some(ts) = input.get(p) {
        let Some((op, bp)) = binary_level_op(&ts.token) else {
            break;
        };
        if bp.left < min_bp {
            break;
        }
        let op_pos = p;
        let (next_p, right) = parse_binary(input, p + 1, bp.right)?;
        p = next_p;
        let span = left.span.merge(right.span);
        left = match op {
            BinaryLevelOp::Binary(op) => ast::Expression {
                kind: ast::ExpressionKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            },
            BinaryLevelOp::Range { inclusive } => {
                if matches!(left.kind, ast::ExpressionKind::Range { .. }) {
                    return Err(ParseError::Failure {
                        message: "range expressions cannot be chained".to_string(),
                        position: op_pos,
                        context: None,
                    });
                }
                ast::Expression {
                    kind: ast::ExpressionKind::Range {
                        start: Box::new(left),
                        end: Box::new(right),
                        inclusive,
                    },
                    span,
                }
            }
        };
    }
    Ok((p, left))
}

// --- Unary and postfix layers ---

fn unary_operator(op: Operator) -> Option<ast::UnaryOperator> {
    match op {
        Operator::Not => Some(ast::UnaryOperator::Not),
        Operator::Minus => Some(ast::UnaryOperator::Negate),
        Operator::Plus => Some(ast::UnaryOperator::Plus),
        Operator::BitNot => Some(ast::UnaryOperator::BitNot),
        _ => None,
    }
}

fn update_operator(op: Operator) -> Option<ast::UpdateOperator> {
    match op {
        Operator::Increment => Some(ast::UpdateOperator::Increment),
        Operator::Decrement => Some(ast::UpdateOperator::Decrement),
        _ => None,
    }
}

fn parse_unary(input: &[TokenSpan], pos: usize) -> ParseResult<ast::Expression> {
    let Some(ts) = input.get(pos) else {
        return Err(ParseError::UnexpectedEof {
            expected: "an expression".to_string(),
            position: pos,
            context: None,
        });
    };
    if let Token::Operator(op) = &ts.token {
        if let Some(op) = unary_operator(*op) {
            // The operand recursion reaches the postfix layer first, so a
            // trailing `++`/`--` binds to the operand before this prefix
            // operator applies: `-x++` is `-(x++)`, never `(-x)++`.
            let (p, operand) = parse_unary(input, pos + 1)?;
            let span = ts.span.merge(operand.span);
            return Ok((
                p,
                ast::Expression {
                    kind: ast::ExpressionKind::Unary {
                        op,
                        operand: Box::new(operand),
                    },
                    span,
                },
            ));
        }
        if let Some(op) = update_operator(*op) {
            let (p, operand) = parse_unary(input, pos + 1)?;
            if !operand.is_valid_target() {
                return Err(ParseError::InvalidAssignmentTarget { position: pos + 1 });
            }
            let span = ts.span.merge(operand.span);
            return Ok((
                p,
                ast::Expression {
                    kind: ast::ExpressionKind::Update {
                        op,
                        operand: Box::new(operand),
                        prefix: true,
                    },
                    span,
                },
            ));
        }
    }
    parse_postfix(input, pos)
}

fn parse_postfix(input: &[TokenSpan], pos: usize) -> ParseResult<ast::Expression> {
    let (mut p, mut expr) = parse_primary(input, pos)?;
    loop {
        match input.get(p).map(|ts| &ts.token) {
            Some(Token::Delimiter(Delimiter::OpenParen)) => {
                let (after_args, arguments) = separated_list(
                    parse_expression(),
                    as_unit(delimiter(Delimiter::Comma)),
                )
                .parse(input, p + 1)?;
                let (next, close) = delimiter(Delimiter::CloseParen).parse(input, after_args)?;
                let span = expr.span.merge(close.span);
                expr = ast::Expression {
                    kind: ast::ExpressionKind::Call {
                        callee: Box::new(expr),
                        arguments,
                    },
                    span,
                };
                p = next;
            }
            Some(Token::Delimiter(Delimiter::OpenBracket)) => {
                let (after_index, index) = parse_assignment(input, p + 1)?;
                let (next, close) = delimiter(Delimiter::CloseBracket).parse(input, after_index)?;
                let span = expr.span.merge(close.span);
                expr = ast::Expression {
                    kind: ast::ExpressionKind::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    },
                    span,
                };
                p = next;
            }
            Some(Token::Operator(Operator::Dot)) => {
                let (next, (property, property_span)) =
                    super::identifier().parse(input, p + 1)?;
                let span = expr.span.merge(property_span);
                expr = ast::Expression {
                    kind: ast::ExpressionKind::Member {
                        object: Box::new(expr),
                        property,
                    },
                    span,
                };
                p = next;
            }
            Some(Token::Operator(op)) => {
                let Some(update) = update_operator(*op) else {
                    break;
                };
                // Postfix update: applies to the expression just parsed.
                if !expr.is_valid_target() {
                    return Err(ParseError::InvalidAssignmentTarget { position: pos });
                }
                let span = expr.span.merge(input[p].span);
                expr = ast::Expression {
                    kind: ast::ExpressionKind::Update {
                        op: update,
                        operand: Box::new(expr),
                        prefix: false,
                    },
                    span,
                };
                p += 1;
            }
            _ => break,
        }
    }
    Ok((p, expr))
}

// --- Primary layer ---

fn parse_primary(input: &[TokenSpan], pos: usize) -> ParseResult<ast::Expression> {
    let Some(ts) = input.get(pos) else {
        return Err(ParseError::UnexpectedEof {
            expected: "an expression".to_string(),
            position: pos,
            context: None,
        });
    };
    let span = ts.span;
    let simple = |kind: ast::ExpressionKind| Ok((pos + 1, ast::Expression { kind, span }));
    match &ts.token {
        Token::Identifier(name) => simple(ast::ExpressionKind::Identifier(name.clone())),
        Token::Keyword(Keyword::True) => simple(ast::ExpressionKind::BoolLiteral(true)),
        Token::Keyword(Keyword::False) => simple(ast::ExpressionKind::BoolLiteral(false)),
        Token::Keyword(Keyword::Null) => simple(ast::ExpressionKind::NullLiteral),
        Token::Keyword(Keyword::SelfValue) => simple(ast::ExpressionKind::SelfExpr),
        Token::Literal(Literal::Integer(value)) => simple(ast::ExpressionKind::IntLiteral(*value)),
        Token::Literal(Literal::Float(value)) => simple(ast::ExpressionKind::FloatLiteral(*value)),
        Token::Literal(Literal::String(text)) => {
            simple(ast::ExpressionKind::StringLiteral(text.clone()))
        }
        Token::Literal(Literal::FString(parts)) => {
            let kind = parse_fstring_segments(parts, span, pos)?;
            Ok((pos + 1, ast::Expression { kind, span }))
        }
        Token::Delimiter(Delimiter::OpenParen) => {
            let (after_inner, inner) = parse_assignment(input, pos + 1)?;
            let (end, close) = delimiter(Delimiter::CloseParen).parse(input, after_inner)?;
            Ok((
                end,
                ast::Expression {
                    kind: ast::ExpressionKind::Paren(Box::new(inner)),
                    span: span.merge(close.span),
                },
            ))
        }
        Token::Delimiter(Delimiter::OpenBracket) => {
            let (after_elems, elements) = separated_list(
                parse_expression(),
                as_unit(delimiter(Delimiter::Comma)),
            )
            .parse(input, pos + 1)?;
            let (end, close) = delimiter(Delimiter::CloseBracket).parse(input, after_elems)?;
            Ok((
                end,
                ast::Expression {
                    kind: ast::ExpressionKind::ArrayLiteral(elements),
                    span: span.merge(close.span),
                },
            ))
        }
        Token::Delimiter(Delimiter::OpenBrace) => {
            let (after_entries, entries) = separated_list(
                parse_map_entry(),
                as_unit(delimiter(Delimiter::Comma)),
            )
            .parse(input, pos + 1)?;
            if entries.is_empty() {
                return Err(ParseError::Unexpected {
                    expected: vec!["a map entry".to_string()],
                    found: found_text(input, pos + 1),
                    position: pos + 1,
                    context: Some("map literal".to_string()),
                });
            }
            let (end, close) = delimiter(Delimiter::CloseBrace).parse(input, after_entries)?;
            Ok((
                end,
                ast::Expression {
                    kind: ast::ExpressionKind::MapLiteral(entries),
                    span: span.merge(close.span),
                },
            ))
        }
        _ => Err(ParseError::Unexpected {
            expected: vec!["an expression".to_string()],
            found: found_text(input, pos),
            position: pos,
            context: None,
        }),
    }
}

fn parse_map_entry() -> impl Parser<TokenSpan, ast::MapEntry> {
    map(
        tuple3(
            parse_expression(),
            delimiter(Delimiter::Colon),
            parse_expression(),
        ),
        |(key, _, value)| ast::MapEntry { key, value },
    )
}

// --- F-string interpolations ---

fn parse_fstring_segments(
    parts: &[StringPart],
    outer: Span,
    position: usize,
) -> Result<ast::ExpressionKind, ParseError> {
    let mut segments = Vec::new();
    for part in parts {
        match part {
            StringPart::Text(text) => segments.push(ast::FStringSegment::Text(text.clone())),
            StringPart::Interpolation {
                source,
                offset,
                lines,
                cols,
            } => {
                let expr = parse_interpolation(source, outer, *offset, *lines, *cols, position)?;
                segments.push(ast::FStringSegment::Expr(expr));
            }
        }
    }
    Ok(ast::ExpressionKind::FString(segments))
}

/// Re-enters the expression grammar on an interpolation's raw source text.
/// The tokenizer is seeded at the interpolation's absolute position, so the
/// sub-expression's spans nest correctly inside the f-string token's span.
fn parse_interpolation(
    source: &str,
    outer: Span,
    offset: usize,
    lines: usize,
    cols: usize,
    position: usize,
) -> Result<ast::Expression, ParseError> {
    let start = outer.start + offset;
    let line = outer.line + lines;
    let column = if lines == 0 { outer.column + cols } else { cols + 1 };

    let raw = Tokenizer::with_position(start, line, column).tokenize(source);
    if let Some(message) = raw.iter().find_map(|ts| match &ts.token {
        Token::Error(message) => Some(message.clone()),
        _ => None,
    }) {
        return Err(ParseError::Failure {
            message: format!("invalid f-string interpolation: {}", message),
            position,
            context: None,
        });
    }
    let tokens = TokenPreprocessor::new().process(raw);

    let (end, expr) = parse_assignment(&tokens, 0).map_err(|e| ParseError::Failure {
        message: format!("invalid f-string interpolation: {}", e),
        position,
        context: None,
    })?;
    if !matches!(tokens.get(end).map(|ts| &ts.token), Some(Token::Eof)) {
        return Err(ParseError::Failure {
            message: "trailing tokens in f-string interpolation".to_string(),
            position,
            context: None,
        });
    }
    Ok(expr)
}

// --- Operator tables ---

fn assignment_operator(token: &Token) -> Option<ast::AssignmentOperator> {
    use ast::AssignmentOperator::*;
    let Token::Operator(op) = token else {
        return None;
    };
    let mapped = match op {
        Operator::Assign => Assign,
        Operator::PlusAssign => AddAssign,
        Operator::MinusAssign => SubtractAssign,
        Operator::MultiplyAssign => MultiplyAssign,
        Operator::DivideAssign => DivideAssign,
        Operator::ModuloAssign => ModuloAssign,
        Operator::BitAndAssign => BitAndAssign,
        Operator::BitOrAssign => BitOrAssign,
        Operator::BitXorAssign => BitXorAssign,
        Operator::ShiftLeftAssign => ShiftLeftAssign,
        Operator::ShiftRightAssign => ShiftRightAssign,
        _ => return None,
    };
    Some(mapped)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::tokens;
    use super::*;
    use crate::ast::{BinaryOperator, ExpressionKind, UnaryOperator, UpdateOperator};
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> ast::Expression {
        let input = tokens(source);
        let (end, expr) = parse_expression()
            .parse(&input, 0)
            .unwrap_or_else(|e| panic!("parse failed for {:?}: {}", source, e));
        assert_eq!(
            input[end].token,
            Token::Eof,
            "expression did not consume all of {:?}",
            source
        );
        expr
    }

    fn parse_err(source: &str) -> ParseError {
        let input = tokens(source);
        match parse_expression().parse(&input, 0) {
            Err(e) => e,
            Ok((end, _)) if input[end].token != Token::Eof => {
                // Trailing tokens also count as a non-expression here.
                ParseError::Failure {
                    message: "trailing tokens".to_string(),
                    position: end,
                    context: None,
                }
            }
            Ok(_) => panic!("expected a parse error for {:?}", source),
        }
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        let expr = parse("1 + 2 * 3");
        let ExpressionKind::Binary { op, left, right } = expr.kind else {
            panic!("expected a binary expression");
        };
        assert_eq!(op, BinaryOperator::Add);
        assert_eq!(left.kind, ExpressionKind::IntLiteral(1));
        let ExpressionKind::Binary { op, .. } = right.kind else {
            panic!("expected the right operand to be a product");
        };
        assert_eq!(op, BinaryOperator::Multiply);
    }

    #[test]
    fn test_power_is_left_associative() {
        // `2 ** 3 ** 2` groups as `(2 ** 3) ** 2` per the table; the
        // divergence from mathematical convention is deliberate.
        let expr = parse("2 ** 3 ** 2");
        let ExpressionKind::Binary { op, left, right } = expr.kind else {
            panic!("expected a binary expression");
        };
        assert_eq!(op, BinaryOperator::Power);
        assert_eq!(right.kind, ExpressionKind::IntLiteral(2));
        let ExpressionKind::Binary { op, left, right } = left.kind else {
            panic!("expected the left operand to be a power");
        };
        assert_eq!(op, BinaryOperator::Power);
        assert_eq!(left.kind, ExpressionKind::IntLiteral(2));
        assert_eq!(right.kind, ExpressionKind::IntLiteral(3));
    }

    #[test]
    fn test_shift_binds_tighter_than_bitwise_and() {
        let expr = parse("a & b << 2");
        let ExpressionKind::Binary { op, right, .. } = expr.kind else {
            panic!("expected a binary expression");
        };
        assert_eq!(op, BinaryOperator::BitAnd);
        assert!(matches!(
            right.kind,
            ExpressionKind::Binary {
                op: BinaryOperator::ShiftLeft,
                ..
            }
        ));
    }

    #[test]
    fn test_postfix_update_binds_before_prefix_unary() {
        // `-x++` is `-(x++)`, never `(-x)++`.
        let expr = parse("-x++");
        let ExpressionKind::Unary { op, operand } = expr.kind else {
            panic!("expected a unary expression");
        };
        assert_eq!(op, UnaryOperator::Negate);
        let ExpressionKind::Update {
            op,
            operand,
            prefix,
        } = operand.kind
        else {
            panic!("expected an update expression");
        };
        assert_eq!(op, UpdateOperator::Increment);
        assert!(!prefix);
        assert_eq!(operand.kind, ExpressionKind::Identifier("x".to_string()));
    }

    #[test]
    fn test_prefix_update() {
        let expr = parse("--count");
        assert!(matches!(
            expr.kind,
            ExpressionKind::Update {
                op: UpdateOperator::Decrement,
                prefix: true,
                ..
            }
        ));
    }

    #[test]
    fn test_update_requires_lvalue() {
        assert!(matches!(
            parse_err("5++"),
            ParseError::InvalidAssignmentTarget { .. }
        ));
        assert!(matches!(
            parse_err("++(a + b)"),
            ParseError::InvalidAssignmentTarget { .. }
        ));
    }

    #[test]
    fn test_assignment_is_right_associative() {
        let expr = parse("a = b = 1");
        let ExpressionKind::Assignment { target, value, .. } = expr.kind else {
            panic!("expected an assignment");
        };
        assert_eq!(target.kind, ExpressionKind::Identifier("a".to_string()));
        let ExpressionKind::Assignment { target, value, .. } = value.kind else {
            panic!("expected a nested assignment");
        };
        assert_eq!(target.kind, ExpressionKind::Identifier("b".to_string()));
        assert_eq!(value.kind, ExpressionKind::IntLiteral(1));
    }

    #[test]
    fn test_assignment_target_shapes() {
        // Member and index targets are fine.
        parse("self.count = 1");
        parse("xs[0] += 2");
        // A literal is not.
        assert!(matches!(
            parse_err("1 = 2"),
            ParseError::InvalidAssignmentTarget { position: 0 }
        ));
        // Parenthesized identifiers do not reduce to a bare target.
        assert!(matches!(
            parse_err("(a) = 2"),
            ParseError::InvalidAssignmentTarget { .. }
        ));
    }

    #[test]
    fn test_ternary_is_right_associative() {
        let expr = parse("a ? b : c ? d : e");
        let ExpressionKind::Ternary { alternative, .. } = expr.kind else {
            panic!("expected a ternary");
        };
        assert!(matches!(alternative.kind, ExpressionKind::Ternary { .. }));
    }

    #[test]
    fn test_range_expressions() {
        let expr = parse("0..10");
        assert!(matches!(
            expr.kind,
            ExpressionKind::Range {
                inclusive: false,
                ..
            }
        ));

        let expr = parse("0 ..= limit");
        assert!(matches!(
            expr.kind,
            ExpressionKind::Range {
                inclusive: true,
                ..
            }
        ));
    }

    #[test]
    fn test_ranges_do_not_chain() {
        let err = parse_err("a..b..c");
        let ParseError::Failure { message, .. } = err else {
            panic!("expected a failure");
        };
        assert_eq!(message, "range expressions cannot be chained");
    }

    #[test]
    fn test_postfix_chains() {
        let expr = parse("obj.items[0](x, y)");
        let ExpressionKind::Call { callee, arguments } = expr.kind else {
            panic!("expected a call");
        };
        assert_eq!(arguments.len(), 2);
        let ExpressionKind::Index { object, .. } = callee.kind else {
            panic!("expected an index below the call");
        };
        assert!(matches!(object.kind, ExpressionKind::Member { .. }));
    }

    #[test]
    fn test_literals_and_collections() {
        assert_eq!(parse("null").kind, ExpressionKind::NullLiteral);
        assert_eq!(parse("true").kind, ExpressionKind::BoolLiteral(true));
        assert_eq!(parse("1.5").kind, ExpressionKind::FloatLiteral(1.5));

        let expr = parse("[1, 2, 3,]");
        let ExpressionKind::ArrayLiteral(elements) = expr.kind else {
            panic!("expected an array literal");
        };
        assert_eq!(elements.len(), 3);

        let expr = parse("{\"a\": 1, \"b\": 2}");
        let ExpressionKind::MapLiteral(entries) = expr.kind else {
            panic!("expected a map literal");
        };
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_empty_map_literal_is_an_error() {
        assert!(matches!(parse_err("{}"), ParseError::Unexpected { .. }));
    }

    #[test]
    fn test_paren_nodes_are_kept() {
        let expr = parse("(1 + 2) * 3");
        let ExpressionKind::Binary { left, .. } = expr.kind else {
            panic!("expected a binary expression");
        };
        assert!(matches!(left.kind, ExpressionKind::Paren(_)));
    }

    #[test]
    fn test_fstring_interpolation_parses_expressions() {
        let expr = parse("f\"val={ {1:2}[1] }\"");
        let ExpressionKind::FString(segments) = expr.kind else {
            panic!("expected an f-string");
        };
        assert_eq!(segments.len(), 2);
        let ast::FStringSegment::Expr(inner) = &segments[1] else {
            panic!("expected an interpolated expression");
        };
        let ExpressionKind::Index { object, index } = &inner.kind else {
            panic!("expected the interpolation to be an index expression");
        };
        assert!(matches!(object.kind, ExpressionKind::MapLiteral(_)));
        assert_eq!(index.kind, ExpressionKind::IntLiteral(1));
    }

    #[test]
    fn test_fstring_interpolation_spans_are_absolute() {
        let source = "f\"v={x}\"";
        let expr = parse(source);
        let ExpressionKind::FString(segments) = &expr.kind else {
            panic!("expected an f-string");
        };
        let ast::FStringSegment::Expr(inner) = &segments[1] else {
            panic!("expected an interpolated expression");
        };
        // `x` sits at byte 5 of the source.
        assert_eq!(inner.span.start, 5);
        assert_eq!(inner.span.end, 6);
        assert!(expr.span.contains(&inner.span));
    }

    #[test]
    fn test_recovering_parser_yields_placeholder() {
        let sink = DiagnosticSink::new("test.rzn");
        let input = tokens("1 + ;");
        let (end, expr) = parse_expression_recovering(&sink, false)
            .parse(&input, 0)
            .unwrap();
        assert_eq!(expr.kind, ExpressionKind::Error);
        assert_eq!(sink.len(), 1);
        // Skipped to just before the terminator.
        assert_eq!(
            input[end].token,
            Token::Delimiter(Delimiter::Semicolon)
        );
    }
}
