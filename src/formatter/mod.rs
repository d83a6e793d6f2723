//! # Formatter Component
//!
//! Renders an AST back to canonical Razen source text. The output is not
//! byte-identical to the original input — trivia is gone and spacing is
//! normalized — but it parses to a structurally equivalent tree:
//! parenthesized expressions keep their `Paren` nodes, so printing needs no
//! precedence reasoning, and re-parsing the output reproduces the same
//! shapes.
//!
//! This is what makes round-trip testing possible: formatting is a fixed
//! point (`format(parse(format(ast))) == format(ast)`), and re-tokenizing
//! the formatted text yields the same token kinds as tokenizing the
//! canonical source.

pub mod config;
pub mod error;
pub mod visitor;

use crate::ast::SourceFile;
use config::FormatterConfig;
use error::FormatterError;
use visitor::FormatterVisitor;

/// Renders ASTs to canonical source text.
pub struct Formatter {
    config: FormatterConfig,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(FormatterConfig::default())
    }
}

impl Formatter {
    pub fn new(config: FormatterConfig) -> Self {
        Self { config }
    }

    pub fn format(&self, ast: &SourceFile) -> Result<String, FormatterError> {
        let mut visitor = FormatterVisitor::new(self.config.clone());
        visitor.format_source_file(ast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::parse_source;

    fn roundtrip(source: &str) -> String {
        let output = parse_source("test.rzn", source);
        assert!(
            output.is_clean(),
            "test source did not parse cleanly: {:?}",
            output.diagnostics
        );
        Formatter::default().format(&output.root).unwrap()
    }

    #[test]
    fn test_formats_declarations() {
        let formatted = roundtrip("pub var x:int=1+2;");
        assert_eq!(formatted, "pub var x: int = 1 + 2;\n");
    }

    #[test]
    fn test_formats_functions_and_blocks() {
        let formatted = roundtrip("fun add(a:int,b:int)->int{return a+b;}");
        assert_eq!(
            formatted,
            "fun add(a: int, b: int) -> int {\n    return a + b;\n}\n"
        );
    }

    #[test]
    fn test_format_is_a_fixed_point() {
        let sources = [
            "var x = 1 + 2 * 3;",
            "fun f(a: int) -> array<int> { return [a, a]; }",
            "struct P { x: int, y: int, }",
            "if a { b(); } elif c { } else { d(); }",
            "match x { 1 => one(), _ => { other(); }, }",
            "for i in 0..10 { total += i; }",
            "try { risky(); } catch (e) { throw e; }",
            "var m = {\"k\": 1, \"v\": 2};",
            "var s = f\"x={x} y={ {1:2}[1] }\";",
        ];
        for source in sources {
            let once = roundtrip(source);
            let twice = roundtrip(&once);
            assert_eq!(once, twice, "formatting is not stable for {:?}", source);
        }
    }

    #[test]
    fn test_error_placeholders_are_not_formattable() {
        let output = parse_source("test.rzn", "var x = ;");
        assert!(!output.is_clean());
        assert!(Formatter::default().format(&output.root).is_err());
    }
}
