//! # Tokenizer Component
//!
//! The Tokenizer performs lexical analysis of Razen source code, transforming
//! raw text into a structured token stream for the parser.
//!
//! ## Design Principles
//!
//! * **Totality**: tokenization always terminates and never fails; unlexable
//!   spans become [`token::Token::Error`] tokens and reporting is deferred to
//!   the caller.
//! * **Comprehensive Position Information**: every token carries a
//!   [`token::Span`] (byte offsets plus line/column) for precise diagnostics.
//! * **Format Preservation**: whitespace, newlines, and comments are lexed as
//!   tokens so the raw stream covers the input; the preprocessor strips them
//!   before parsing.
//!
//! ## Component Structure
//!
//! * [`token`]: core token types and the [`token::Tokenizer`] driver
//! * [`keyword`]: the reserved-word table
//! * [`symbol`]: operators and delimiters (longest-match)
//! * [`literal`]: numbers, strings, and f-strings
//! * [`comment`]: line and block comments
//! * [`whitespace`]: whitespace and newline trivia
//!
//! ## Usage
//!
//! ```rust
//! use razen_syntax::tokenizer::token::{Token, Tokenizer};
//!
//! let tokens = Tokenizer::new().tokenize("var greeting = \"hello\";");
//! assert_eq!(tokens.last().unwrap().token, Token::Eof);
//! ```

pub mod comment;
pub mod keyword;
pub mod literal;
pub mod symbol;
pub mod token;
pub mod whitespace;
