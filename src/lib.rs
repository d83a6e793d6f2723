//! # Razen Syntax
//!
//! Tokenizer and parser for the Razen language: a small statically-typed,
//! curly-brace language. This crate turns source text into an abstract
//! syntax tree with unambiguous operator binding, plus diagnostics — and
//! stops there. Name resolution, type checking, and evaluation belong to
//! later layers.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Source text → Tokenizer → Preprocessor → Parser → AST + diagnostics
//!                                                 ↘ Formatter (canonical text)
//! ```
//!
//! ### Stage 1: Tokenization (Lexical Analysis)
//!
//! The [`tokenizer`] module transforms raw source into a token stream with
//! spans. It is total: unlexable spans become error tokens, never failures.
//!
//! ### Stage 2: Preprocessing
//!
//! The [`preprocessor`] module strips trivia (whitespace, newlines,
//! comments) and error tokens from the stream before parsing.
//!
//! ### Stage 3: Parsing (Syntactic Analysis)
//!
//! The [`analyzer`] module consumes the token stream with one-token
//! lookahead — precedence climbing for expressions, leading-token dispatch
//! for statements — and produces an [`ast::SourceFile`] plus an ordered
//! sequence of [`diagnostics::Diagnostic`]s. Statement-level recovery means
//! one malformed statement never hides the rest of the file.
//!
//! ### Formatting
//!
//! The [`formatter`] module renders an AST back to canonical source text
//! that re-parses to an equivalent tree.
//!
//! ## Usage
//!
//! ```rust
//! use razen_syntax::parse_source;
//!
//! let output = parse_source("example.rzn", "fun main() { return 1 + 2 * 3; }");
//! assert!(output.is_clean());
//! ```
//!
//! ## Concurrency
//!
//! A parse call is synchronous and owns its token buffer and AST
//! exclusively. The keyword and precedence tables are immutable process-wide
//! constants, so independent source units can be parsed on separate threads
//! with no synchronization.

pub mod analyzer;
pub mod ast;
pub mod diagnostics;
pub mod formatter;
pub mod preprocessor;
pub mod tokenizer;

pub use analyzer::{ParseOutput, parse_source};
pub use diagnostics::{Diagnostic, DiagnosticKind, Severity};
pub use formatter::Formatter;
