//! # Statement Parsing
//!
//! Statement productions and the statement-level recovery machinery.
//!
//! ## Dispatch
//!
//! [`parse_statement`] inspects the leading token and hands off to the one
//! production that can start with it. There is no backtracking alternation:
//! a malformed `while` reports the `while` production's own error instead of
//! a vague "no alternative matched".
//!
//! ## Recovery
//!
//! [`parse_statement_sequence`] drives both the top level and block bodies.
//! When a statement production fails, the error becomes a diagnostic and the
//! parser resynchronizes at the next statement boundary — past the next `;`
//! at the current brace depth, or up to the `}` that closes the current
//! block — so one malformed statement never hides the rest of the file.

use super::super::core::{ParseError, Parser};
use super::super::prelude::*;
use super::expression::{parse_expression, parse_expression_recovering};
use super::types::parse_type;
use super::{delimiter, found_text, identifier, keyword, operator, report, span_of, spanned};
use crate::ast;
use crate::diagnostics::DiagnosticSink;
use crate::tokenizer::keyword::Keyword;
use crate::tokenizer::literal::Literal;
use crate::tokenizer::symbol::{Delimiter, Operator};
use crate::tokenizer::token::{Token, TokenSpan};

/// Parses one statement, dispatching on the leading token.
pub fn parse_statement(sink: &DiagnosticSink) -> impl Parser<TokenSpan, ast::Statement> {
    let sink = sink.clone();
    move |input: &[TokenSpan], pos: usize| {
        let Some(ts) = input.get(pos) else {
            return Err(ParseError::UnexpectedEof {
                expected: "a statement".to_string(),
                position: pos,
                context: None,
            });
        };
        match &ts.token {
            Token::Keyword(Keyword::Pub) => parse_pub_declaration(&sink).parse(input, pos),
            Token::Keyword(Keyword::Var) => parse_var_declaration(&sink).parse(input, pos),
            Token::Keyword(Keyword::Const) => parse_const_declaration(&sink).parse(input, pos),
            Token::Keyword(Keyword::Fun) => map(parse_function_declaration(&sink), |decl| {
                ast::Statement {
                    span: decl.span,
                    kind: ast::StatementKind::FunctionDecl(decl),
                }
            })
            .parse(input, pos),
            Token::Keyword(Keyword::Struct) => parse_struct_declaration().parse(input, pos),
            Token::Keyword(Keyword::Enum) => parse_enum_declaration().parse(input, pos),
            Token::Keyword(Keyword::Impl) => parse_impl_block(&sink).parse(input, pos),
            Token::Keyword(Keyword::Type) => parse_type_alias().parse(input, pos),
            Token::Keyword(Keyword::Mod) => parse_module_declaration(&sink).parse(input, pos),
            Token::Keyword(Keyword::Use) | Token::Keyword(Keyword::From) => {
                parse_use_statement().parse(input, pos)
            }
            Token::Keyword(Keyword::If) => parse_if_statement(&sink).parse(input, pos),
            Token::Keyword(Keyword::While) => parse_while_statement(&sink).parse(input, pos),
            Token::Keyword(Keyword::For) => parse_for_statement(&sink).parse(input, pos),
            Token::Keyword(Keyword::Match) => parse_match_statement(&sink).parse(input, pos),
            Token::Keyword(Keyword::Try) => parse_try_statement(&sink).parse(input, pos),
            Token::Keyword(Keyword::Return) => parse_return_statement(&sink).parse(input, pos),
            Token::Keyword(Keyword::Break) => {
                parse_terminal_statement(Keyword::Break, ast::StatementKind::Break)
                    .parse(input, pos)
            }
            Token::Keyword(Keyword::Continue) => {
                parse_terminal_statement(Keyword::Continue, ast::StatementKind::Continue)
                    .parse(input, pos)
            }
            Token::Keyword(Keyword::Throw) => parse_throw_statement(&sink).parse(input, pos),
            // A leading `{` always opens a block statement; map literals in
            // statement position need parentheses.
            Token::Delimiter(Delimiter::OpenBrace) => map(parse_block(&sink), |block| {
                ast::Statement {
                    span: block.span,
                    kind: ast::StatementKind::Block(block),
                }
            })
            .parse(input, pos),
            _ => parse_expression_statement(&sink).parse(input, pos),
        }
    }
}

/// Parses the statements of one region, recovering at statement boundaries.
/// Stops at end of input, or additionally at a closing `}` when parsing a
/// block body.
pub(crate) fn parse_statement_sequence(
    input: &[TokenSpan],
    mut pos: usize,
    sink: &DiagnosticSink,
    stop_at_close_brace: bool,
) -> (usize, Vec<ast::Statement>) {
    let mut statements = Vec::new();
    loop {
        match input.get(pos).map(|ts| &ts.token) {
            None | Some(Token::Eof) => break,
            Some(Token::Delimiter(Delimiter::CloseBrace)) if stop_at_close_brace => break,
            _ => {}
        }
        match parse_statement(sink).parse(input, pos) {
            Ok((new_pos, statement)) => {
                statements.push(statement);
                pos = new_pos;
            }
            Err(error) => {
                report(sink, &error, input);
                let next = synchronize(input, error.position().max(pos));
                tracing::debug!(
                    target: "parser::recovery",
                    from = pos,
                    to = next,
                    "resynchronized after statement error"
                );
                // Always make progress, even on a stray closing brace.
                pos = if next > pos { next } else { pos + 1 };
            }
        }
    }
    (pos, statements)
}

/// Scans forward to the next statement boundary: past the next `;` at the
/// current brace depth, up to the `}` (or end of input) that closes the
/// current block, or — for statements with no surviving terminator — up to
/// the next token that can only start a fresh statement.
pub(crate) fn synchronize(input: &[TokenSpan], start: usize) -> usize {
    let mut depth = 0usize;
    let mut i = start;
    while i < input.len() {
        match &input[i].token {
            Token::Eof => return i,
            Token::Delimiter(Delimiter::Semicolon) if depth == 0 => return i + 1,
            Token::Delimiter(Delimiter::OpenBrace) => depth += 1,
            Token::Delimiter(Delimiter::CloseBrace) => {
                if depth == 0 {
                    return i;
                }
                depth -= 1;
            }
            Token::Keyword(kw) if depth == 0 && i > start && starts_statement(*kw) => {
                return i;
            }
            _ => {}
        }
        i += 1;
    }
    i
}

/// Keywords that can only begin a statement, used as additional
/// synchronization points. Continuation keywords (`elif`, `else`, `catch`,
/// `in`, `as`) are deliberately absent.
fn starts_statement(kw: Keyword) -> bool {
    matches!(
        kw,
        Keyword::Var
            | Keyword::Const
            | Keyword::Fun
            | Keyword::Struct
            | Keyword::Enum
            | Keyword::Impl
            | Keyword::Type
            | Keyword::Mod
            | Keyword::Use
            | Keyword::From
            | Keyword::Pub
            | Keyword::If
            | Keyword::While
            | Keyword::For
            | Keyword::Match
            | Keyword::Try
            | Keyword::Return
            | Keyword::Break
            | Keyword::Continue
            | Keyword::Throw
    )
}

/// Parses a `{ ... }` block with per-statement recovery inside it.
pub fn parse_block(sink: &DiagnosticSink) -> impl Parser<TokenSpan, ast::Block> {
    let sink = sink.clone();
    move |input: &[TokenSpan], pos: usize| {
        let (p, open) = delimiter(Delimiter::OpenBrace).parse(input, pos)?;
        let (p, statements) = parse_statement_sequence(input, p, &sink, true);
        let (p, close) =
            with_context(delimiter(Delimiter::CloseBrace), "block").parse(input, p)?;
        Ok((
            p,
            ast::Block {
                statements,
                span: open.span.merge(close.span),
            },
        ))
    }
}

// --- Declarations ---

/// Dispatches a `pub`-prefixed declaration by the keyword that follows.
fn parse_pub_declaration(sink: &DiagnosticSink) -> impl Parser<TokenSpan, ast::Statement> {
    let sink = sink.clone();
    move |input: &[TokenSpan], pos: usize| match input.get(pos + 1).map(|ts| &ts.token) {
        Some(Token::Keyword(Keyword::Var)) => parse_var_declaration(&sink).parse(input, pos),
        Some(Token::Keyword(Keyword::Const)) => parse_const_declaration(&sink).parse(input, pos),
        Some(Token::Keyword(Keyword::Fun)) => map(parse_function_declaration(&sink), |decl| {
            ast::Statement {
                span: decl.span,
                kind: ast::StatementKind::FunctionDecl(decl),
            }
        })
        .parse(input, pos),
        Some(Token::Keyword(Keyword::Struct)) => parse_struct_declaration().parse(input, pos),
        Some(Token::Keyword(Keyword::Enum)) => parse_enum_declaration().parse(input, pos),
        Some(Token::Keyword(Keyword::Type)) => parse_type_alias().parse(input, pos),
        _ => Err(ParseError::Unexpected {
            expected: vec![
                "`var`".to_string(),
                "`const`".to_string(),
                "`fun`".to_string(),
                "`struct`".to_string(),
                "`enum`".to_string(),
                "`type`".to_string(),
            ],
            found: found_text(input, pos + 1),
            position: pos + 1,
            context: Some("visibility modifier".to_string()),
        }),
    }
}

fn parse_var_declaration(sink: &DiagnosticSink) -> impl Parser<TokenSpan, ast::Statement> {
    let sink = sink.clone();
    move |input: &[TokenSpan], pos: usize| {
        with_context(
            map(
                spanned(tuple4(
                    tuple2(optional(keyword(Keyword::Pub)), keyword(Keyword::Var)),
                    identifier(),
                    tuple2(
                        optional(preceded(delimiter(Delimiter::Colon), parse_type())),
                        optional(preceded(
                            operator(Operator::Assign),
                            parse_expression_recovering(&sink, false),
                        )),
                    ),
                    delimiter(Delimiter::Semicolon),
                )),
                |(((vis, _), (name, _), (ty, init), _), span)| ast::Statement {
                    kind: ast::StatementKind::VarDecl(ast::VarDecl {
                        is_pub: vis.is_some(),
                        name,
                        ty,
                        init,
                    }),
                    span,
                },
            ),
            "variable declaration",
        )
        .parse(input, pos)
    }
}

fn parse_const_declaration(sink: &DiagnosticSink) -> impl Parser<TokenSpan, ast::Statement> {
    let sink = sink.clone();
    move |input: &[TokenSpan], pos: usize| {
        with_context(
            map(
                spanned(tuple4(
                    tuple2(optional(keyword(Keyword::Pub)), keyword(Keyword::Const)),
                    identifier(),
                    tuple2(
                        optional(preceded(delimiter(Delimiter::Colon), parse_type())),
                        preceded(
                            operator(Operator::Assign),
                            parse_expression_recovering(&sink, false),
                        ),
                    ),
                    delimiter(Delimiter::Semicolon),
                )),
                |(((vis, _), (name, _), (ty, value), _), span)| ast::Statement {
                    kind: ast::StatementKind::ConstDecl(ast::ConstDecl {
                        is_pub: vis.is_some(),
                        name,
                        ty,
                        value,
                    }),
                    span,
                },
            ),
            "constant declaration",
        )
        .parse(input, pos)
    }
}

/// Parses a function declaration; also used inside `impl` blocks.
pub fn parse_function_declaration(
    sink: &DiagnosticSink,
) -> impl Parser<TokenSpan, ast::FunctionDecl> {
    let sink = sink.clone();
    move |input: &[TokenSpan], pos: usize| {
        with_context(
            map(
                spanned(tuple4(
                    tuple2(optional(keyword(Keyword::Pub)), keyword(Keyword::Fun)),
                    identifier(),
                    tuple2(
                        parse_parameter_list(),
                        optional(preceded(operator(Operator::ThinArrow), parse_type())),
                    ),
                    parse_block(&sink),
                )),
                |(((vis, _), (name, _), (params, return_type), body), span)| ast::FunctionDecl {
                    is_pub: vis.is_some(),
                    name,
                    params,
                    return_type,
                    body,
                    span,
                },
            ),
            "function declaration",
        )
        .parse(input, pos)
    }
}

fn parse_parameter_list() -> impl Parser<TokenSpan, Vec<ast::Parameter>> {
    delimited(
        delimiter(Delimiter::OpenParen),
        separated_list(parse_parameter(), as_unit(delimiter(Delimiter::Comma))),
        delimiter(Delimiter::CloseParen),
    )
}

fn parse_parameter() -> impl Parser<TokenSpan, ast::Parameter> {
    move |input: &[TokenSpan], pos: usize| match input.get(pos).map(|ts| &ts.token) {
        Some(Token::Keyword(Keyword::SelfValue)) => Ok((
            pos + 1,
            ast::Parameter {
                kind: ast::ParameterKind::Receiver,
                span: input[pos].span,
            },
        )),
        _ => map(
            spanned(tuple3(
                identifier(),
                delimiter(Delimiter::Colon),
                parse_type(),
            )),
            |(((name, _), _, ty), span)| ast::Parameter {
                kind: ast::ParameterKind::Named { name, ty },
                span,
            },
        )
        .parse(input, pos),
    }
}

fn parse_struct_declaration() -> impl Parser<TokenSpan, ast::Statement> {
    with_context(
        map(
            spanned(tuple3(
                tuple2(optional(keyword(Keyword::Pub)), keyword(Keyword::Struct)),
                identifier(),
                delimited(
                    delimiter(Delimiter::OpenBrace),
                    many(parse_struct_field()),
                    delimiter(Delimiter::CloseBrace),
                ),
            )),
            |(((vis, _), (name, _), fields), span)| ast::Statement {
                kind: ast::StatementKind::StructDecl(ast::StructDecl {
                    is_pub: vis.is_some(),
                    name,
                    fields,
                }),
                span,
            },
        ),
        "struct declaration",
    )
}

fn parse_struct_field() -> impl Parser<TokenSpan, ast::StructField> {
    map(
        spanned(tuple4(
            tuple2(optional(keyword(Keyword::Pub)), identifier()),
            delimiter(Delimiter::Colon),
            parse_type(),
            delimiter(Delimiter::Comma),
        )),
        |(((vis, (name, _)), _, ty, _), span)| ast::StructField {
            is_pub: vis.is_some(),
            name,
            ty,
            span,
        },
    )
}

fn parse_enum_declaration() -> impl Parser<TokenSpan, ast::Statement> {
    with_context(
        map(
            spanned(tuple3(
                tuple2(optional(keyword(Keyword::Pub)), keyword(Keyword::Enum)),
                identifier(),
                delimited(
                    delimiter(Delimiter::OpenBrace),
                    many(parse_enum_variant()),
                    delimiter(Delimiter::CloseBrace),
                ),
            )),
            |(((vis, _), (name, _), variants), span)| ast::Statement {
                kind: ast::StatementKind::EnumDecl(ast::EnumDecl {
                    is_pub: vis.is_some(),
                    name,
                    variants,
                }),
                span,
            },
        ),
        "enum declaration",
    )
}

fn parse_enum_variant() -> impl Parser<TokenSpan, ast::EnumVariant> {
    map(
        spanned(tuple3(
            identifier(),
            optional(delimited(
                delimiter(Delimiter::OpenParen),
                separated_list(parse_type(), as_unit(delimiter(Delimiter::Comma))),
                delimiter(Delimiter::CloseParen),
            )),
            delimiter(Delimiter::Comma),
        )),
        |(((name, _), payload, _), span)| ast::EnumVariant {
            name,
            payload: payload.unwrap_or_default(),
            span,
        },
    )
}

fn parse_impl_block(sink: &DiagnosticSink) -> impl Parser<TokenSpan, ast::Statement> {
    let sink = sink.clone();
    move |input: &[TokenSpan], pos: usize| {
        with_context(
            map(
                spanned(tuple2(
                    preceded(keyword(Keyword::Impl), identifier()),
                    delimited(
                        delimiter(Delimiter::OpenBrace),
                        many(parse_function_declaration(&sink)),
                        delimiter(Delimiter::CloseBrace),
                    ),
                )),
                |(((target, _), functions), span)| ast::Statement {
                    kind: ast::StatementKind::ImplBlock(ast::ImplBlock { target, functions }),
                    span,
                },
            ),
            "impl block",
        )
        .parse(input, pos)
    }
}

fn parse_type_alias() -> impl Parser<TokenSpan, ast::Statement> {
    with_context(
        map(
            spanned(tuple4(
                tuple2(optional(keyword(Keyword::Pub)), keyword(Keyword::Type)),
                identifier(),
                preceded(operator(Operator::Assign), parse_type()),
                delimiter(Delimiter::Semicolon),
            )),
            |(((vis, _), (name, _), ty, _), span)| ast::Statement {
                kind: ast::StatementKind::TypeAlias(ast::TypeAlias {
                    is_pub: vis.is_some(),
                    name,
                    ty,
                }),
                span,
            },
        ),
        "type alias",
    )
}

fn parse_module_declaration(sink: &DiagnosticSink) -> impl Parser<TokenSpan, ast::Statement> {
    let sink = sink.clone();
    move |input: &[TokenSpan], pos: usize| {
        let (p, (name, _)) =
            preceded(keyword(Keyword::Mod), identifier()).parse(input, pos)?;
        let (end, body) = match input.get(p).map(|ts| &ts.token) {
            Some(Token::Delimiter(Delimiter::Semicolon)) => (p + 1, None),
            Some(Token::Delimiter(Delimiter::OpenBrace)) => {
                let (end, block) = parse_block(&sink).parse(input, p)?;
                (end, Some(block))
            }
            _ => {
                return Err(ParseError::Unexpected {
                    expected: vec!["`;`".to_string(), "`{`".to_string()],
                    found: found_text(input, p),
                    position: p,
                    context: Some("module declaration".to_string()),
                });
            }
        };
        Ok((
            end,
            ast::Statement {
                kind: ast::StatementKind::ModuleDecl(ast::ModuleDecl { name, body }),
                span: span_of(input, pos, end),
            },
        ))
    }
}

/// Parses `use a;`, `use a::b;`, or `from a use b, c;`, each with an
/// optional `as alias`.
fn parse_use_statement() -> impl Parser<TokenSpan, ast::Statement> {
    move |input: &[TokenSpan], pos: usize| {
        let (p, kind) = match input.get(pos).map(|ts| &ts.token) {
            Some(Token::Keyword(Keyword::From)) => {
                let (p, (module, _)) =
                    preceded(keyword(Keyword::From), identifier()).parse(input, pos)?;
                let (p, _) = keyword(Keyword::Use).parse(input, p)?;
                let (p, names) =
                    separated_list(identifier(), as_unit(delimiter(Delimiter::Comma)))
                        .parse(input, p)?;
                if names.is_empty() {
                    return Err(ParseError::Unexpected {
                        expected: vec!["an identifier".to_string()],
                        found: found_text(input, p),
                        position: p,
                        context: Some("selective import".to_string()),
                    });
                }
                (
                    p,
                    ast::UseKind::From {
                        module,
                        names: names.into_iter().map(|(name, _)| name).collect(),
                    },
                )
            }
            _ => {
                let (p, (first, _)) =
                    preceded(keyword(Keyword::Use), identifier()).parse(input, pos)?;
                let (p, second) =
                    optional(preceded(operator(Operator::Scope), identifier()))
                        .parse(input, p)?;
                let mut path = vec![first];
                if let Some((segment, _)) = second {
                    path.push(segment);
                }
                (p, ast::UseKind::Path(path))
            }
        };
        let (p, alias) =
            optional(preceded(keyword(Keyword::As), identifier())).parse(input, p)?;
        let (end, _) = with_context(delimiter(Delimiter::Semicolon), "use statement")
            .parse(input, p)?;
        Ok((
            end,
            ast::Statement {
                kind: ast::StatementKind::Use(ast::UseDecl {
                    kind,
                    alias: alias.map(|(name, _)| name),
                }),
                span: span_of(input, pos, end),
            },
        ))
    }
}

// --- Control flow ---

fn parse_if_statement(sink: &DiagnosticSink) -> impl Parser<TokenSpan, ast::Statement> {
    let sink = sink.clone();
    move |input: &[TokenSpan], pos: usize| {
        with_context(
            map(
                spanned(tuple4(
                    preceded(keyword(Keyword::If), parse_expression()),
                    parse_block(&sink),
                    many(parse_elif_clause(&sink)),
                    optional(preceded(keyword(Keyword::Else), parse_block(&sink))),
                )),
                |((condition, consequence, elif_clauses, else_clause), span)| ast::Statement {
                    kind: ast::StatementKind::If(ast::IfStmt {
                        condition,
                        consequence,
                        elif_clauses,
                        else_clause,
                    }),
                    span,
                },
            ),
            "if statement",
        )
        .parse(input, pos)
    }
}

fn parse_elif_clause(sink: &DiagnosticSink) -> impl Parser<TokenSpan, ast::ElifClause> {
    let sink = sink.clone();
    move |input: &[TokenSpan], pos: usize| {
        map(
            spanned(tuple2(
                preceded(keyword(Keyword::Elif), parse_expression()),
                parse_block(&sink),
            )),
            |((condition, consequence), span)| ast::ElifClause {
                condition,
                consequence,
                span,
            },
        )
        .parse(input, pos)
    }
}

fn parse_while_statement(sink: &DiagnosticSink) -> impl Parser<TokenSpan, ast::Statement> {
    let sink = sink.clone();
    move |input: &[TokenSpan], pos: usize| {
        with_context(
            map(
                spanned(tuple2(
                    preceded(keyword(Keyword::While), parse_expression()),
                    parse_block(&sink),
                )),
                |((condition, body), span)| ast::Statement {
                    kind: ast::StatementKind::While(ast::WhileStmt { condition, body }),
                    span,
                },
            ),
            "while statement",
        )
        .parse(input, pos)
    }
}

fn parse_for_statement(sink: &DiagnosticSink) -> impl Parser<TokenSpan, ast::Statement> {
    let sink = sink.clone();
    move |input: &[TokenSpan], pos: usize| {
        with_context(
            map(
                spanned(tuple3(
                    preceded(keyword(Keyword::For), identifier()),
                    preceded(keyword(Keyword::In), parse_expression()),
                    parse_block(&sink),
                )),
                |(((binding, _), iterable, body), span)| ast::Statement {
                    kind: ast::StatementKind::For(ast::ForStmt {
                        binding,
                        iterable,
                        body,
                    }),
                    span,
                },
            ),
            "for statement",
        )
        .parse(input, pos)
    }
}

fn parse_match_statement(sink: &DiagnosticSink) -> impl Parser<TokenSpan, ast::Statement> {
    let sink = sink.clone();
    move |input: &[TokenSpan], pos: usize| {
        with_context(
            map(
                spanned(tuple2(
                    preceded(keyword(Keyword::Match), parse_expression()),
                    delimited(
                        delimiter(Delimiter::OpenBrace),
                        many(parse_match_arm(&sink)),
                        delimiter(Delimiter::CloseBrace),
                    ),
                )),
                |((value, arms), span)| ast::Statement {
                    kind: ast::StatementKind::Match(ast::MatchStmt { value, arms }),
                    span,
                },
            ),
            "match statement",
        )
        .parse(input, pos)
    }
}

fn parse_match_arm(sink: &DiagnosticSink) -> impl Parser<TokenSpan, ast::MatchArm> {
    let sink = sink.clone();
    move |input: &[TokenSpan], pos: usize| {
        let (p, pattern) = parse_match_pattern().parse(input, pos)?;
        let (p, _) = operator(Operator::FatArrow).parse(input, p)?;
        // `{` here always opens a block body.
        let (p, body) = match input.get(p).map(|ts| &ts.token) {
            Some(Token::Delimiter(Delimiter::OpenBrace)) => {
                let (p, block) = parse_block(&sink).parse(input, p)?;
                (p, ast::MatchArmBody::Block(block))
            }
            _ => {
                let (p, expr) = parse_expression().parse(input, p)?;
                (p, ast::MatchArmBody::Expr(expr))
            }
        };
        let (end, _) = delimiter(Delimiter::Comma).parse(input, p)?;
        Ok((
            end,
            ast::MatchArm {
                pattern,
                body,
                span: span_of(input, pos, end),
            },
        ))
    }
}

/// Patterns are shallow: `_`, a bare identifier, or a literal. The wildcard
/// is just the identifier spelled `_`; both it and any other bare identifier
/// match unconditionally.
fn parse_match_pattern() -> impl Parser<TokenSpan, ast::MatchPattern> {
    move |input: &[TokenSpan], pos: usize| {
        let Some(ts) = input.get(pos) else {
            return Err(ParseError::UnexpectedEof {
                expected: "a pattern".to_string(),
                position: pos,
                context: None,
            });
        };
        let span = ts.span;
        let literal = |kind: ast::ExpressionKind| {
            ast::PatternKind::Literal(ast::Expression { kind, span })
        };
        let kind = match &ts.token {
            Token::Identifier(name) if name == "_" => ast::PatternKind::Wildcard,
            Token::Identifier(name) => ast::PatternKind::Binding(name.clone()),
            Token::Literal(Literal::Integer(value)) => {
                literal(ast::ExpressionKind::IntLiteral(*value))
            }
            Token::Literal(Literal::Float(value)) => {
                literal(ast::ExpressionKind::FloatLiteral(*value))
            }
            Token::Literal(Literal::String(text)) => {
                literal(ast::ExpressionKind::StringLiteral(text.clone()))
            }
            Token::Keyword(Keyword::True) => literal(ast::ExpressionKind::BoolLiteral(true)),
            Token::Keyword(Keyword::False) => literal(ast::ExpressionKind::BoolLiteral(false)),
            Token::Keyword(Keyword::Null) => literal(ast::ExpressionKind::NullLiteral),
            _ => {
                return Err(ParseError::Unexpected {
                    expected: vec![
                        "an identifier".to_string(),
                        "a literal".to_string(),
                        "`_`".to_string(),
                    ],
                    found: found_text(input, pos),
                    position: pos,
                    context: Some("match pattern".to_string()),
                });
            }
        };
        Ok((pos + 1, ast::MatchPattern { kind, span }))
    }
}

fn parse_try_statement(sink: &DiagnosticSink) -> impl Parser<TokenSpan, ast::Statement> {
    let sink = sink.clone();
    move |input: &[TokenSpan], pos: usize| {
        with_context(
            map(
                spanned(tuple2(
                    preceded(keyword(Keyword::Try), parse_block(&sink)),
                    many1(parse_catch_clause(&sink)),
                )),
                |((body, catch_clauses), span)| ast::Statement {
                    kind: ast::StatementKind::Try(ast::TryStmt {
                        body,
                        catch_clauses,
                    }),
                    span,
                },
            ),
            "try statement",
        )
        .parse(input, pos)
    }
}

fn parse_catch_clause(sink: &DiagnosticSink) -> impl Parser<TokenSpan, ast::CatchClause> {
    let sink = sink.clone();
    move |input: &[TokenSpan], pos: usize| {
        map(
            spanned(tuple2(
                preceded(
                    keyword(Keyword::Catch),
                    optional(delimited(
                        delimiter(Delimiter::OpenParen),
                        identifier(),
                        delimiter(Delimiter::CloseParen),
                    )),
                ),
                parse_block(&sink),
            )),
            |((binding, body), span)| ast::CatchClause {
                binding: binding.map(|(name, _)| name),
                body,
                span,
            },
        )
        .parse(input, pos)
    }
}

fn parse_return_statement(sink: &DiagnosticSink) -> impl Parser<TokenSpan, ast::Statement> {
    let sink = sink.clone();
    move |input: &[TokenSpan], pos: usize| {
        let (p, _) = keyword(Keyword::Return).parse(input, pos)?;
        let (p, value) = match input.get(p).map(|ts| &ts.token) {
            Some(Token::Delimiter(Delimiter::Semicolon)) => (p, None),
            _ => {
                let (p, expr) =
                    parse_expression_recovering(&sink, true).parse(input, p)?;
                (p, Some(expr))
            }
        };
        let (end, _) = with_context(delimiter(Delimiter::Semicolon), "return statement")
            .parse(input, p)?;
        Ok((
            end,
            ast::Statement {
                kind: ast::StatementKind::Return(value),
                span: span_of(input, pos, end),
            },
        ))
    }
}

fn parse_throw_statement(sink: &DiagnosticSink) -> impl Parser<TokenSpan, ast::Statement> {
    let sink = sink.clone();
    move |input: &[TokenSpan], pos: usize| {
        let (p, _) = keyword(Keyword::Throw).parse(input, pos)?;
        let (p, value) = parse_expression_recovering(&sink, true).parse(input, p)?;
        let (end, _) = with_context(delimiter(Delimiter::Semicolon), "throw statement")
            .parse(input, p)?;
        Ok((
            end,
            ast::Statement {
                kind: ast::StatementKind::Throw(value),
                span: span_of(input, pos, end),
            },
        ))
    }
}

/// `break;` and `continue;`.
fn parse_terminal_statement(
    kw: Keyword,
    kind: ast::StatementKind,
) -> impl Parser<TokenSpan, ast::Statement> {
    move |input: &[TokenSpan], pos: usize| {
        let (p, _) = keyword(kw).parse(input, pos)?;
        let (end, _) = delimiter(Delimiter::Semicolon).parse(input, p)?;
        Ok((
            end,
            ast::Statement {
                kind: kind.clone(),
                span: span_of(input, pos, end),
            },
        ))
    }
}

fn parse_expression_statement(sink: &DiagnosticSink) -> impl Parser<TokenSpan, ast::Statement> {
    let sink = sink.clone();
    move |input: &[TokenSpan], pos: usize| {
        let (p, expr) = parse_expression_recovering(&sink, true).parse(input, pos)?;
        let (end, _) = with_context(delimiter(Delimiter::Semicolon), "expression statement")
            .parse(input, p)?;
        Ok((
            end,
            ast::Statement {
                span: span_of(input, pos, end),
                kind: ast::StatementKind::Expr(expr),
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::tokens;
    use super::*;
    use crate::ast::{ExpressionKind, PatternKind, StatementKind, TypeKind};
    use pretty_assertions::assert_eq;

    fn parse_one(source: &str) -> ast::Statement {
        let sink = DiagnosticSink::new("test.rzn");
        let input = tokens(source);
        let (end, statement) = parse_statement(&sink)
            .parse(&input, 0)
            .unwrap_or_else(|e| panic!("parse failed for {:?}: {}", source, e));
        assert_eq!(input[end].token, Token::Eof, "leftover input for {:?}", source);
        assert!(
            sink.is_empty(),
            "unexpected diagnostics for {:?}: {:?}",
            source,
            sink.len()
        );
        statement
    }

    #[test]
    fn test_var_declaration_forms() {
        let StatementKind::VarDecl(decl) = parse_one("var x;").kind else {
            panic!("expected a var declaration");
        };
        assert_eq!(decl.name, "x");
        assert!(!decl.is_pub);
        assert!(decl.ty.is_none());
        assert!(decl.init.is_none());

        let StatementKind::VarDecl(decl) = parse_one("pub var count: int = 1 + 2;").kind else {
            panic!("expected a var declaration");
        };
        assert!(decl.is_pub);
        assert!(matches!(
            decl.ty.as_ref().unwrap().kind,
            TypeKind::Primitive(crate::ast::PrimitiveType::Int)
        ));
        assert!(decl.init.is_some());
    }

    #[test]
    fn test_const_requires_initializer() {
        let sink = DiagnosticSink::new("test.rzn");
        let input = tokens("const x: int;");
        let err = parse_statement(&sink).parse(&input, 0).unwrap_err();
        assert!(err.expected().contains(&"`=`".to_string()));

        // With `=` present but no value, the initializer recovers in place.
        let sink = DiagnosticSink::new("test.rzn");
        let input = tokens("const x = ;");
        let (_, statement) = parse_statement(&sink).parse(&input, 0).unwrap();
        let StatementKind::ConstDecl(decl) = statement.kind else {
            panic!("expected a const declaration");
        };
        assert_eq!(decl.value.kind, ExpressionKind::Error);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_function_declaration() {
        let StatementKind::FunctionDecl(decl) =
            parse_one("pub fun add(a: int, b: int) -> int { return a + b; }").kind
        else {
            panic!("expected a function declaration");
        };
        assert!(decl.is_pub);
        assert_eq!(decl.name, "add");
        assert_eq!(decl.params.len(), 2);
        assert!(decl.return_type.is_some());
        assert_eq!(decl.body.statements.len(), 1);
    }

    #[test]
    fn test_struct_and_enum_preserve_order() {
        let StatementKind::StructDecl(decl) =
            parse_one("struct Point { x: int, pub y: int, }").kind
        else {
            panic!("expected a struct declaration");
        };
        assert_eq!(decl.fields.len(), 2);
        assert_eq!(decl.fields[0].name, "x");
        assert_eq!(decl.fields[1].name, "y");
        assert!(decl.fields[1].is_pub);

        let StatementKind::EnumDecl(decl) =
            parse_one("enum Shape { Circle(float), Rect(float, float), Empty, }").kind
        else {
            panic!("expected an enum declaration");
        };
        assert_eq!(decl.variants.len(), 3);
        assert_eq!(decl.variants[0].name, "Circle");
        assert_eq!(decl.variants[1].payload.len(), 2);
        assert!(decl.variants[2].payload.is_empty());
    }

    #[test]
    fn test_impl_block_holds_functions() {
        let StatementKind::ImplBlock(block) = parse_one(
            "impl Point { fun norm(self) -> float { return 0.0; } fun zero() { } }",
        )
        .kind
        else {
            panic!("expected an impl block");
        };
        assert_eq!(block.target, "Point");
        assert_eq!(block.functions.len(), 2);
        assert!(matches!(
            block.functions[0].params[0].kind,
            ast::ParameterKind::Receiver
        ));
    }

    #[test]
    fn test_module_declaration_forms() {
        let StatementKind::ModuleDecl(decl) = parse_one("mod geometry;").kind else {
            panic!("expected a module declaration");
        };
        assert_eq!(decl.name, "geometry");
        assert!(decl.body.is_none());

        let StatementKind::ModuleDecl(decl) = parse_one("mod inner { var x = 1; }").kind else {
            panic!("expected a module declaration");
        };
        assert!(decl.body.is_some());
    }

    #[test]
    fn test_use_statement_shapes() {
        let StatementKind::Use(decl) = parse_one("use math;").kind else {
            panic!("expected a use statement");
        };
        assert_eq!(decl.kind, ast::UseKind::Path(vec!["math".to_string()]));
        assert!(decl.alias.is_none());

        let StatementKind::Use(decl) = parse_one("use math::trig as t;").kind else {
            panic!("expected a use statement");
        };
        assert_eq!(
            decl.kind,
            ast::UseKind::Path(vec!["math".to_string(), "trig".to_string()])
        );
        assert_eq!(decl.alias.as_deref(), Some("t"));

        let StatementKind::Use(decl) = parse_one("from math use sin, cos;").kind else {
            panic!("expected a use statement");
        };
        assert_eq!(
            decl.kind,
            ast::UseKind::From {
                module: "math".to_string(),
                names: vec!["sin".to_string(), "cos".to_string()],
            }
        );
    }

    #[test]
    fn test_if_elif_else() {
        let StatementKind::If(stmt) =
            parse_one("if a { } elif b { } elif c { } else { }").kind
        else {
            panic!("expected an if statement");
        };
        assert_eq!(stmt.elif_clauses.len(), 2);
        assert!(stmt.else_clause.is_some());
    }

    #[test]
    fn test_loops() {
        let StatementKind::While(stmt) = parse_one("while x < 10 { x++; }").kind else {
            panic!("expected a while statement");
        };
        assert!(matches!(stmt.condition.kind, ExpressionKind::Binary { .. }));

        let StatementKind::For(stmt) = parse_one("for i in 0..10 { }").kind else {
            panic!("expected a for statement");
        };
        assert_eq!(stmt.binding, "i");
        assert!(matches!(stmt.iterable.kind, ExpressionKind::Range { .. }));
    }

    #[test]
    fn test_match_arms_and_patterns() {
        let StatementKind::Match(stmt) = parse_one(
            "match status { 200 => \"ok\", \"redirect\" => { }, _ => other, code => code, }",
        )
        .kind
        else {
            panic!("expected a match statement");
        };
        assert_eq!(stmt.arms.len(), 4);
        assert!(matches!(stmt.arms[0].pattern.kind, PatternKind::Literal(_)));
        assert!(matches!(stmt.arms[1].body, ast::MatchArmBody::Block(_)));
        assert!(matches!(stmt.arms[2].pattern.kind, PatternKind::Wildcard));
        assert!(matches!(
            &stmt.arms[3].pattern.kind,
            PatternKind::Binding(name) if name == "code"
        ));
    }

    #[test]
    fn test_try_catch() {
        let StatementKind::Try(stmt) =
            parse_one("try { risky(); } catch (e) { log(e); } catch { }").kind
        else {
            panic!("expected a try statement");
        };
        assert_eq!(stmt.catch_clauses.len(), 2);
        assert_eq!(stmt.catch_clauses[0].binding.as_deref(), Some("e"));
        assert!(stmt.catch_clauses[1].binding.is_none());
    }

    #[test]
    fn test_try_requires_a_catch() {
        let sink = DiagnosticSink::new("test.rzn");
        let input = tokens("try { }");
        assert!(parse_statement(&sink).parse(&input, 0).is_err());
    }

    #[test]
    fn test_jump_statements() {
        assert!(matches!(parse_one("break;").kind, StatementKind::Break));
        assert!(matches!(
            parse_one("continue;").kind,
            StatementKind::Continue
        ));
        assert!(matches!(
            parse_one("return;").kind,
            StatementKind::Return(None)
        ));
        assert!(matches!(
            parse_one("return x + 1;").kind,
            StatementKind::Return(Some(_))
        ));
        assert!(matches!(
            parse_one("throw err;").kind,
            StatementKind::Throw(_)
        ));
    }

    #[test]
    fn test_block_statement() {
        let StatementKind::Block(block) = parse_one("{ var x = 1; x; }").kind else {
            panic!("expected a block statement");
        };
        assert_eq!(block.statements.len(), 2);
    }

    #[test]
    fn test_statement_sequence_recovers_inside_blocks() {
        let sink = DiagnosticSink::new("test.rzn");
        let input = tokens("{ var = 1; var ok = 2; }");
        let (_, block) = parse_block(&sink).parse(&input, 0).unwrap();
        // The malformed declaration is reported, the valid one survives.
        assert_eq!(sink.len(), 1);
        assert_eq!(block.statements.len(), 1);
        assert!(matches!(
            &block.statements[0].kind,
            StatementKind::VarDecl(decl) if decl.name == "ok"
        ));
    }

    #[test]
    fn test_synchronize_respects_nesting() {
        let input = tokens("a { ; } ; b");
        // Scanning from the start: the `;` inside the braces is at depth 1,
        // so the boundary is the outer `;`.
        let next = synchronize(&input, 0);
        assert_eq!(input[next].token, Token::Identifier("b".to_string()));
    }

    #[test]
    fn test_statement_span_covers_terminator() {
        let statement = parse_one("var x = 1;");
        assert_eq!(statement.span.start, 0);
        assert_eq!(statement.span.end, 10);
    }
}
