//! # Symbol Token Handling
//!
//! This module defines the operators and delimiters recognized by the Razen
//! language and provides the nom parsers for them.
//!
//! ## Symbol Types
//!
//! * [`Operator`]: arithmetic, bitwise, comparison, logical, assignment,
//!   update, range, and access operators
//! * [`Delimiter`]: braces, parentheses, brackets, and punctuation
//!
//! ## Parsing Strategy
//!
//! Symbols are parsed with a longest-match approach: three-character operators
//! are tried before two-character ones, which are tried before single
//! characters. This is what keeps `<<=` from being split into `<` `<=` and
//! `**` from being read as two `*` tokens.

use strum_macros::{AsRefStr, Display, EnumString};

use nom::{
    branch::alt,
    bytes::complete::tag,
    combinator::{map, value},
    error::context,
};

use super::token::{ParserResult, Token};

/// Operators of the Razen language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr)]
pub enum Operator {
    /// Addition operator (`+`)
    #[strum(serialize = "+")]
    Plus,
    /// Subtraction and negation operator (`-`)
    #[strum(serialize = "-")]
    Minus,
    /// Multiplication operator (`*`)
    #[strum(serialize = "*")]
    Multiply,
    /// Division operator (`/`)
    #[strum(serialize = "/")]
    Divide,
    /// Remainder operator (`%`)
    #[strum(serialize = "%")]
    Modulo,
    /// Exponentiation operator (`**`)
    #[strum(serialize = "**")]
    Power,

    /// Equality comparison (`==`)
    #[strum(serialize = "==")]
    EqualEqual,
    /// Inequality comparison (`!=`)
    #[strum(serialize = "!=")]
    NotEqual,
    /// Greater than comparison (`>`)
    #[strum(serialize = ">")]
    Greater,
    /// Greater than or equal comparison (`>=`)
    #[strum(serialize = ">=")]
    GreaterEqual,
    /// Less than comparison (`<`)
    #[strum(serialize = "<")]
    Less,
    /// Less than or equal comparison (`<=`)
    #[strum(serialize = "<=")]
    LessEqual,

    /// Logical AND (`&&`)
    #[strum(serialize = "&&")]
    And,
    /// Logical OR (`||`)
    #[strum(serialize = "||")]
    Or,
    /// Logical NOT (`!`)
    #[strum(serialize = "!")]
    Not,

    /// Bitwise AND (`&`)
    #[strum(serialize = "&")]
    BitAnd,
    /// Bitwise OR (`|`)
    #[strum(serialize = "|")]
    BitOr,
    /// Bitwise XOR (`^`)
    #[strum(serialize = "^")]
    BitXor,
    /// Bitwise NOT (`~`)
    #[strum(serialize = "~")]
    BitNot,
    /// Left shift (`<<`)
    #[strum(serialize = "<<")]
    ShiftLeft,
    /// Right shift (`>>`)
    #[strum(serialize = ">>")]
    ShiftRight,

    /// Assignment (`=`)
    #[strum(serialize = "=")]
    Assign,
    /// Compound addition assignment (`+=`)
    #[strum(serialize = "+=")]
    PlusAssign,
    /// Compound subtraction assignment (`-=`)
    #[strum(serialize = "-=")]
    MinusAssign,
    /// Compound multiplication assignment (`*=`)
    #[strum(serialize = "*=")]
    MultiplyAssign,
    /// Compound division assignment (`/=`)
    #[strum(serialize = "/=")]
    DivideAssign,
    /// Compound remainder assignment (`%=`)
    #[strum(serialize = "%=")]
    ModuloAssign,
    /// Compound bitwise AND assignment (`&=`)
    #[strum(serialize = "&=")]
    BitAndAssign,
    /// Compound bitwise OR assignment (`|=`)
    #[strum(serialize = "|=")]
    BitOrAssign,
    /// Compound bitwise XOR assignment (`^=`)
    #[strum(serialize = "^=")]
    BitXorAssign,
    /// Compound left shift assignment (`<<=`)
    #[strum(serialize = "<<=")]
    ShiftLeftAssign,
    /// Compound right shift assignment (`>>=`)
    #[strum(serialize = ">>=")]
    ShiftRightAssign,

    /// Increment (`++`)
    #[strum(serialize = "++")]
    Increment,
    /// Decrement (`--`)
    #[strum(serialize = "--")]
    Decrement,

    /// Exclusive range (`..`)
    #[strum(serialize = "..")]
    Range,
    /// Inclusive range (`..=`)
    #[strum(serialize = "..=")]
    RangeInclusive,

    /// Ternary condition marker (`?`)
    #[strum(serialize = "?")]
    Question,
    /// Member access (`.`)
    #[strum(serialize = ".")]
    Dot,
    /// Path separator in imports (`::`)
    #[strum(serialize = "::")]
    Scope,
    /// Match arm arrow (`=>`)
    #[strum(serialize = "=>")]
    FatArrow,
    /// Return type arrow (`->`)
    #[strum(serialize = "->")]
    ThinArrow,
}

/// Delimiters of the Razen language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
pub enum Delimiter {
    /// Opening brace (`{`) for blocks and map literals
    #[strum(serialize = "{")]
    OpenBrace,
    /// Closing brace (`}`)
    #[strum(serialize = "}")]
    CloseBrace,
    /// Opening parenthesis (`(`)
    #[strum(serialize = "(")]
    OpenParen,
    /// Closing parenthesis (`)`)
    #[strum(serialize = ")")]
    CloseParen,
    /// Opening bracket (`[`) for array literals and indexing
    #[strum(serialize = "[")]
    OpenBracket,
    /// Closing bracket (`]`)
    #[strum(serialize = "]")]
    CloseBracket,
    /// Comma (`,`) separating list elements
    #[strum(serialize = ",")]
    Comma,
    /// Semicolon (`;`) terminating single-line statements
    #[strum(serialize = ";")]
    Semicolon,
    /// Colon (`:`) in type annotations, map entries, and ternaries
    #[strum(serialize = ":")]
    Colon,
}

impl std::fmt::Display for Delimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Parses an operator token, longest match first.
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_operator(input: &str) -> ParserResult<Token> {
    context(
        "operator",
        map(
            alt((
                // Three-character operators
                alt((
                    value(Operator::ShiftLeftAssign, tag("<<=")),
                    value(Operator::ShiftRightAssign, tag(">>=")),
                    value(Operator::RangeInclusive, tag("..=")),
                )),
                // Two-character operators
                alt((
                    value(Operator::Power, tag("**")),
                    value(Operator::EqualEqual, tag("==")),
                    value(Operator::NotEqual, tag("!=")),
                    value(Operator::LessEqual, tag("<=")),
                    value(Operator::GreaterEqual, tag(">=")),
                    value(Operator::And, tag("&&")),
                    value(Operator::Or, tag("||")),
                    value(Operator::ShiftLeft, tag("<<")),
                    value(Operator::ShiftRight, tag(">>")),
                    value(Operator::PlusAssign, tag("+=")),
                    value(Operator::MinusAssign, tag("-=")),
                    value(Operator::MultiplyAssign, tag("*=")),
                    value(Operator::DivideAssign, tag("/=")),
                    value(Operator::ModuloAssign, tag("%=")),
                    value(Operator::BitAndAssign, tag("&=")),
                    value(Operator::BitOrAssign, tag("|=")),
                    value(Operator::BitXorAssign, tag("^=")),
                    value(Operator::Increment, tag("++")),
                    value(Operator::Decrement, tag("--")),
                    value(Operator::Range, tag("..")),
                    value(Operator::Scope, tag("::")),
                )),
                alt((
                    value(Operator::FatArrow, tag("=>")),
                    value(Operator::ThinArrow, tag("->")),
                )),
                // Single-character operators
                alt((
                    value(Operator::Plus, tag("+")),
                    value(Operator::Minus, tag("-")),
                    value(Operator::Multiply, tag("*")),
                    value(Operator::Divide, tag("/")),
                    value(Operator::Modulo, tag("%")),
                    value(Operator::Less, tag("<")),
                    value(Operator::Greater, tag(">")),
                    value(Operator::Assign, tag("=")),
                    value(Operator::Not, tag("!")),
                    value(Operator::BitNot, tag("~")),
                    value(Operator::BitAnd, tag("&")),
                    value(Operator::BitOr, tag("|")),
                    value(Operator::BitXor, tag("^")),
                    value(Operator::Question, tag("?")),
                    value(Operator::Dot, tag(".")),
                )),
            )),
            Token::Operator,
        ),
    )(input)
}

/// Parses a delimiter token.
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_delimiter(input: &str) -> ParserResult<Token> {
    context(
        "delimiter",
        map(
            alt((
                value(Delimiter::OpenBrace, tag("{")),
                value(Delimiter::CloseBrace, tag("}")),
                value(Delimiter::OpenParen, tag("(")),
                value(Delimiter::CloseParen, tag(")")),
                value(Delimiter::OpenBracket, tag("[")),
                value(Delimiter::CloseBracket, tag("]")),
                value(Delimiter::Comma, tag(",")),
                value(Delimiter::Semicolon, tag(";")),
                value(Delimiter::Colon, tag(":")),
            )),
            Token::Delimiter,
        ),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operators() {
        let test_cases = [
            ("**", Token::Operator(Operator::Power)),
            ("==", Token::Operator(Operator::EqualEqual)),
            ("!=", Token::Operator(Operator::NotEqual)),
            ("..=", Token::Operator(Operator::RangeInclusive)),
            ("..", Token::Operator(Operator::Range)),
            ("::", Token::Operator(Operator::Scope)),
            ("=>", Token::Operator(Operator::FatArrow)),
            ("->", Token::Operator(Operator::ThinArrow)),
            ("~", Token::Operator(Operator::BitNot)),
            ("?", Token::Operator(Operator::Question)),
        ];

        for (input, expected) in test_cases.iter() {
            let (rest, token) = parse_operator(input).unwrap();
            assert_eq!(token, *expected);
            assert_eq!(rest, "");
        }
    }

    #[test]
    fn test_delimiters() {
        let test_cases = [
            ("{", Token::Delimiter(Delimiter::OpenBrace)),
            ("}", Token::Delimiter(Delimiter::CloseBrace)),
            ("(", Token::Delimiter(Delimiter::OpenParen)),
            (")", Token::Delimiter(Delimiter::CloseParen)),
            ("[", Token::Delimiter(Delimiter::OpenBracket)),
            ("]", Token::Delimiter(Delimiter::CloseBracket)),
            (",", Token::Delimiter(Delimiter::Comma)),
            (";", Token::Delimiter(Delimiter::Semicolon)),
            (":", Token::Delimiter(Delimiter::Colon)),
        ];

        for (input, expected) in test_cases.iter() {
            let (rest, token) = parse_delimiter(input).unwrap();
            assert_eq!(token, *expected);
            assert_eq!(rest, "");
        }
    }

    #[test]
    fn test_longest_match() {
        // `<<=` must not be split into `<` `<=`.
        let (rest, token) = parse_operator("<<=").unwrap();
        assert_eq!(token, Token::Operator(Operator::ShiftLeftAssign));
        assert_eq!(rest, "");

        // `**` is one operator, not two `*`.
        let (rest, token) = parse_operator("**2").unwrap();
        assert_eq!(token, Token::Operator(Operator::Power));
        assert_eq!(rest, "2");

        // `++` before `+`.
        let (rest, token) = parse_operator("++x").unwrap();
        assert_eq!(token, Token::Operator(Operator::Increment));
        assert_eq!(rest, "x");

        // `..=` before `..`.
        let (rest, token) = parse_operator("..=5").unwrap();
        assert_eq!(token, Token::Operator(Operator::RangeInclusive));
        assert_eq!(rest, "5");
    }
}
