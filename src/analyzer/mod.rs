//! # Analyzer Component
//!
//! The parser for the Razen language: a parser-combinator system over the
//! preprocessed token stream, with an explicit precedence-climbing expression
//! layer and statement-level error recovery.
//!
//! ## Architecture
//!
//! * [`core`]: the [`core::Parser`] trait and [`core::ParseError`]
//! * [`combinators`]: the combinator functions productions are composed from
//! * [`prelude`]: one-import vocabulary for production modules
//! * [`parsers`]: the grammar productions by category
//!
//! ## Entry Point
//!
//! [`parse_source`] runs the whole pipeline on one source unit:
//!
//! ```text
//! Source text → Tokenizer → Preprocessor → Parser → SourceFile + diagnostics
//! ```
//!
//! The call is synchronous and owns all of its state; independent source
//! units can be parsed concurrently without synchronization. It never fails
//! for malformed input: lexical and syntactic problems come back as
//! diagnostics next to whatever AST could be built, and an empty diagnostic
//! sequence means the parse is clean.
//!
//! ```rust
//! use razen_syntax::analyzer::parse_source;
//!
//! let output = parse_source("demo.rzn", "var greeting = f\"hello {name}\";");
//! assert!(output.is_clean());
//! assert_eq!(output.root.statements.len(), 1);
//! ```

pub mod combinators;
pub mod core;
pub mod parsers;
pub mod prelude;

use crate::ast;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::preprocessor::{Preprocessor, TokenPreprocessor};
use crate::tokenizer::token::{Token, Tokenizer};

/// Everything a parse call produces: the root AST and the ordered
/// diagnostics. Both are owned by the caller; nothing outlives this value.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutput {
    pub root: ast::SourceFile,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutput {
    /// True when the parse produced no diagnostics.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Parses one source unit. `name` attributes diagnostics and is not
/// interpreted; file loading and encoding are the caller's concern.
#[tracing::instrument(level = "debug", skip(source))]
pub fn parse_source(name: &str, source: &str) -> ParseOutput {
    let raw = Tokenizer::new().tokenize(source);

    // Every unlexable span was preserved as an error token; report each one
    // exactly once, in stream order, before the parser sees the stream.
    let sink = DiagnosticSink::new(name);
    for ts in &raw {
        if let Token::Error(message) = &ts.token {
            sink.push(Diagnostic::lex_error(message.clone(), ts.span, name));
        }
    }

    let tokens = TokenPreprocessor::new().process(raw);
    let root = parsers::root::parse_source_file(&tokens, &sink);

    ParseOutput {
        root,
        diagnostics: sink.into_diagnostics(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;

    #[test]
    fn test_clean_parse() {
        let output = parse_source("test.rzn", "var x = 1;\n");
        assert!(output.is_clean());
        assert_eq!(output.root.statements.len(), 1);
    }

    #[test]
    fn test_lex_errors_are_reported_once() {
        let output = parse_source("test.rzn", "var x = 1; @ var y = 2;");
        let lex_errors: Vec<_> = output
            .diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::LexError)
            .collect();
        assert_eq!(lex_errors.len(), 1);
        // Both declarations still parsed.
        assert_eq!(output.root.statements.len(), 2);
    }

    #[test]
    fn test_diagnostics_carry_the_source_name() {
        let output = parse_source("lib/widgets.rzn", "var = ;");
        assert!(!output.is_clean());
        assert!(
            output
                .diagnostics
                .iter()
                .all(|d| d.source == "lib/widgets.rzn")
        );
    }
}
