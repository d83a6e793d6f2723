//! # Token Preprocessor
//!
//! The preprocessor bridges tokenization and parsing:
//!
//! ```text
//! Source text → Tokenizer → Preprocessor → Parser
//! ```
//!
//! The raw token stream covers the whole input, trivia included, so tooling
//! can reconstruct formatting. The grammar productions never mention trivia,
//! so before parsing the stream is filtered down to the significant tokens:
//!
//! * whitespace, newlines, and comments are dropped;
//! * error tokens are dropped too — `parse_source` has already reported each
//!   of them as a `LexError` diagnostic, and the parser reports any
//!   syntactic gap they leave behind as an ordinary syntax error;
//! * spans, ordering, and the final `Eof` token are preserved.

use crate::tokenizer::token::{Token, TokenSpan};

/// A transformation applied to parser input before parsing.
pub trait Preprocessor<T, U = T> {
    /// Process the input of type `T` and return the processed result.
    fn process(&self, input: T) -> U;
}

/// Strips trivia and error tokens from a raw token stream.
#[derive(Debug, Default, Clone)]
pub struct TokenPreprocessor {}

impl TokenPreprocessor {
    pub fn new() -> Self {
        Self {}
    }
}

impl Preprocessor<Vec<TokenSpan>> for TokenPreprocessor {
    fn process(&self, input: Vec<TokenSpan>) -> Vec<TokenSpan> {
        input
            .into_iter()
            .filter(|ts| {
                !matches!(
                    ts.token,
                    Token::Whitespace(_)
                        | Token::Newline
                        | Token::Comment { .. }
                        | Token::Error(_)
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::token::Tokenizer;

    #[test]
    fn test_strips_trivia() {
        let tokens = Tokenizer::new().tokenize("var x; // set up\n/* later */ x = 1;");
        let significant = TokenPreprocessor::new().process(tokens);
        assert!(significant.iter().all(|ts| !matches!(
            ts.token,
            Token::Whitespace(_) | Token::Newline | Token::Comment { .. }
        )));
        assert_eq!(significant.last().unwrap().token, Token::Eof);
    }

    #[test]
    fn test_strips_error_tokens() {
        let tokens = Tokenizer::new().tokenize("var @ x;");
        let significant = TokenPreprocessor::new().process(tokens);
        assert!(
            significant
                .iter()
                .all(|ts| !matches!(ts.token, Token::Error(_)))
        );
    }

    #[test]
    fn test_preserves_order_and_spans() {
        let tokens = Tokenizer::new().tokenize("a + b");
        let significant = TokenPreprocessor::new().process(tokens);
        assert_eq!(significant.len(), 4); // a, +, b, eof
        assert!(significant.windows(2).all(|w| w[0].span.start <= w[1].span.start));
    }
}
