//! # Diagnostics
//!
//! Structured records for everything the lexer and parser can report. A parse
//! call never throws for malformed input; it returns the AST it could build
//! plus an ordered sequence of [`Diagnostic`]s, and the caller decides what
//! to do with them (render, log, or just check for emptiness).
//!
//! Diagnostics are serializable so tooling consumers can ship them as JSON.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::tokenizer::token::Span;

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// The class of problem a diagnostic reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    /// Unrecognized character, unterminated string or f-string, bad escape.
    LexError,
    /// Unexpected token for the current production; carries the expected set.
    SyntaxError,
    /// Assignment or update applied to a non-lvalue expression.
    InvalidAssignmentTarget,
}

/// A single problem found in one source unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
    /// The token spellings that would have been accepted, when known.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub expected: Vec<String>,
    pub span: Span,
    /// The source unit name given to the parse call; attribution only.
    pub source: String,
}

impl Diagnostic {
    pub fn lex_error(message: impl Into<String>, span: Span, source: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            kind: DiagnosticKind::LexError,
            message: message.into(),
            expected: Vec::new(),
            span,
            source: source.into(),
        }
    }

    pub fn syntax_error(
        message: impl Into<String>,
        expected: Vec<String>,
        span: Span,
        source: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Error,
            kind: DiagnosticKind::SyntaxError,
            message: message.into(),
            expected,
            span,
            source: source.into(),
        }
    }

    pub fn invalid_assignment_target(span: Span, source: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            kind: DiagnosticKind::InvalidAssignmentTarget,
            message: "invalid assignment target: expected an identifier, member, or index expression"
                .to_string(),
            expected: Vec::new(),
            span,
            source: source.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(
            f,
            "{}:{}:{}: {}: {}",
            self.source, self.span.line, self.span.column, level, self.message
        )
    }
}

/// Shared collection point for diagnostics during one parse call.
///
/// Statement-level recovery needs to record diagnostics from inside nested
/// parsers, so the sink is a cheap clonable handle. It is created per call
/// and dropped with the result; nothing is shared across parses, which keeps
/// independent parses free to run concurrently.
#[derive(Debug, Clone)]
pub struct DiagnosticSink {
    source: String,
    diagnostics: Rc<RefCell<Vec<Diagnostic>>>,
}

impl DiagnosticSink {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            diagnostics: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// The source unit name this sink attributes diagnostics to.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn push(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.diagnostics.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.borrow().is_empty()
    }

    /// Consumes the sink, returning the diagnostics in the order they were
    /// reported.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        Rc::try_unwrap(self.diagnostics)
            .map(RefCell::into_inner)
            .unwrap_or_else(|rc| rc.borrow().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let d = Diagnostic::syntax_error(
            "unexpected token: found `}`".to_string(),
            vec![";".to_string()],
            Span::new(10, 11, 2, 5),
            "main.rzn",
        );
        assert_eq!(
            d.to_string(),
            "main.rzn:2:5: error: unexpected token: found `}`"
        );
    }

    #[test]
    fn test_sink_collects_in_order() {
        let sink = DiagnosticSink::new("test.rzn");
        assert!(sink.is_empty());
        sink.push(Diagnostic::lex_error("first", Span::empty(), sink.source()));
        sink.push(Diagnostic::lex_error("second", Span::empty(), sink.source()));
        let collected = sink.into_diagnostics();
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].message, "first");
        assert_eq!(collected[1].message, "second");
    }

    #[test]
    fn test_serializes_to_json() {
        let d = Diagnostic::invalid_assignment_target(Span::new(0, 1, 1, 1), "t.rzn");
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["kind"], "InvalidAssignmentTarget");
        assert_eq!(json["severity"], "error");
        assert_eq!(json["span"]["line"], 1);
    }
}
