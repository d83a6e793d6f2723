//! # Source File Parsing
//!
//! The entry production: a source file is a sequence of top-level statements
//! ending at `Eof`. Parsing the root never fails — malformed statements are
//! reported through the sink and skipped, and an empty file is a valid,
//! empty root.

use super::span_of;
use super::statement::parse_statement_sequence;
use crate::ast;
use crate::diagnostics::DiagnosticSink;
use crate::tokenizer::token::TokenSpan;

/// Parses a whole (preprocessed) token stream into a [`ast::SourceFile`],
/// reporting problems to the sink.
pub fn parse_source_file(input: &[TokenSpan], sink: &DiagnosticSink) -> ast::SourceFile {
    let (end, statements) = parse_statement_sequence(input, 0, sink, false);
    debug_assert!(
        end >= input.len().saturating_sub(1),
        "statement sequence stopped before eof"
    );
    ast::SourceFile {
        statements,
        span: span_of(input, 0, input.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::tokens;
    use super::*;
    use crate::ast::StatementKind;

    #[test]
    fn test_empty_source_is_a_valid_empty_root() {
        let sink = DiagnosticSink::new("test.rzn");
        let root = parse_source_file(&tokens(""), &sink);
        assert!(root.statements.is_empty());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_top_level_statements_in_order() {
        let sink = DiagnosticSink::new("test.rzn");
        let root = parse_source_file(
            &tokens("use math;\nvar x = 1;\nfun main() { }\n"),
            &sink,
        );
        assert!(sink.is_empty());
        assert_eq!(root.statements.len(), 3);
        assert!(matches!(root.statements[0].kind, StatementKind::Use(_)));
        assert!(matches!(root.statements[1].kind, StatementKind::VarDecl(_)));
        assert!(matches!(
            root.statements[2].kind,
            StatementKind::FunctionDecl(_)
        ));
    }

    #[test]
    fn test_root_span_contains_statements() {
        let sink = DiagnosticSink::new("test.rzn");
        let root = parse_source_file(&tokens("var x = 1;"), &sink);
        for statement in &root.statements {
            assert!(root.span.contains(&statement.span));
        }
    }

    #[test]
    fn test_stray_close_brace_is_reported_and_skipped() {
        let sink = DiagnosticSink::new("test.rzn");
        let root = parse_source_file(&tokens("} var x = 1;"), &sink);
        assert_eq!(sink.len(), 1);
        assert_eq!(root.statements.len(), 1);
    }
}
