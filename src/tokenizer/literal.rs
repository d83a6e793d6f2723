//! # Literal Token Handling
//!
//! Parsers for the literal forms of the Razen language: integers (with
//! optional `0x`/`0o`/`0b` radix prefixes and `_` separators), floats
//! (fraction required, optional exponent), plain strings, and f-strings.
//!
//! ## Float Disambiguation
//!
//! A `.` only turns digits into a float when another digit follows it, so
//! `1.5` is a float while `1.abs()` lexes as the integer `1` followed by the
//! member-access dot. The float parser is tried before the integer parser and
//! simply fails when the fractional digits are missing.
//!
//! ## F-String Interpolations
//!
//! `f"..."` literals may embed `{ expression }` regions. The lexer does not
//! parse the embedded expression; it captures the raw source text between the
//! braces (tracking nested `{}` depth, and skipping string literals inside the
//! region so their quotes and braces cannot end the capture early) together
//! with its position relative to the token start. The parser later re-enters
//! the expression grammar on that text with rebased spans.
//!
//! ## Error Tokens
//!
//! Lexing is total: an unterminated string, an unknown escape, or an
//! out-of-range number produces a [`Token::Error`] covering the offending
//! span instead of aborting the token stream.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{char, digit1, one_of},
    combinator::{opt, recognize, value},
    error::{ErrorKind, ParseError as NomParseError, VerboseError, context},
    sequence::{pair, tuple},
};

use super::token::{ParserResult, Token};

/// One segment of an f-string literal.
#[derive(Debug, Clone, PartialEq)]
pub enum StringPart {
    /// Literal text with escape sequences already decoded.
    Text(String),
    /// A `{ ... }` interpolation region, kept as raw source text for the
    /// parser to re-enter the expression grammar on.
    Interpolation {
        /// Raw source text between the braces.
        source: String,
        /// Byte offset of the expression text from the start of the token.
        offset: usize,
        /// Newlines between the token start and the expression text.
        lines: usize,
        /// Characters between the last newline (or the token start) and the
        /// expression text.
        cols: usize,
    },
}

/// Literal payloads carried by [`Token::Literal`].
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    String(String),
    FString(Vec<StringPart>),
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Integer(value) => write!(f, "{}", value),
            Literal::Float(value) => write!(f, "{}", value),
            Literal::String(text) => write!(f, "\"{}\"", text),
            Literal::FString(_) => write!(f, "f\"...\""),
        }
    }
}

fn no_match(input: &str) -> nom::Err<VerboseError<&str>> {
    nom::Err::Error(VerboseError::from_error_kind(input, ErrorKind::Tag))
}

/// Parses any literal token. Tried before identifiers so that the `f"` prefix
/// wins over the identifier `f`.
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_literal(input: &str) -> ParserResult<Token> {
    context(
        "literal",
        alt((parse_fstring_literal, parse_string_literal, parse_number)),
    )(input)
}

/// Decimal digit run: a digit followed by digits or `_` separators.
fn decimal_digits(input: &str) -> ParserResult<&str> {
    recognize(pair(
        one_of("0123456789"),
        take_while(|c: char| c.is_ascii_digit() || c == '_'),
    ))(input)
}

/// Parses a number: radix-prefixed integer, float, or decimal integer.
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_number(input: &str) -> ParserResult<Token> {
    context(
        "number literal",
        alt((parse_radix_integer, parse_float, parse_decimal_integer)),
    )(input)
}

fn parse_radix_integer(input: &str) -> ParserResult<Token> {
    let (rest, (radix, digits)) = alt((
        pair(
            value(16u32, tag("0x")),
            recognize(pair(
                one_of("0123456789abcdefABCDEF"),
                take_while(|c: char| c.is_ascii_hexdigit() || c == '_'),
            )),
        ),
        pair(
            value(8u32, tag("0o")),
            recognize(pair(
                one_of("01234567"),
                take_while(|c: char| ('0'..='7').contains(&c) || c == '_'),
            )),
        ),
        pair(
            value(2u32, tag("0b")),
            recognize(pair(
                one_of("01"),
                take_while(|c: char| c == '0' || c == '1' || c == '_'),
            )),
        ),
    ))(input)?;

    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    let token = match i64::from_str_radix(&cleaned, radix) {
        Ok(v) => Token::Literal(Literal::Integer(v)),
        Err(_) => Token::Error(format!("integer literal out of range: {}", digits)),
    };
    Ok((rest, token))
}

fn parse_float(input: &str) -> ParserResult<Token> {
    let (rest, text) = recognize(tuple((
        decimal_digits,
        char('.'),
        decimal_digits,
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    )))(input)?;

    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let token = match cleaned.parse::<f64>() {
        Ok(v) => Token::Literal(Literal::Float(v)),
        Err(_) => Token::Error(format!("malformed float literal: {}", text)),
    };
    Ok((rest, token))
}

fn parse_decimal_integer(input: &str) -> ParserResult<Token> {
    let (rest, digits) = decimal_digits(input)?;
    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    let token = match cleaned.parse::<i64>() {
        Ok(v) => Token::Literal(Literal::Integer(v)),
        Err(_) => Token::Error(format!("integer literal out of range: {}", digits)),
    };
    Ok((rest, token))
}

/// Decodes the escape sequence at the start of `s` (the text after the `\`).
/// Returns the number of bytes consumed from `s` and the decoded character.
fn decode_escape(s: &str) -> (usize, Result<char, String>) {
    let mut chars = s.chars();
    let Some(marker) = chars.next() else {
        return (0, Err("unterminated escape sequence".to_string()));
    };
    match marker {
        'n' => (1, Ok('\n')),
        'r' => (1, Ok('\r')),
        't' => (1, Ok('\t')),
        '\\' => (1, Ok('\\')),
        '\'' => (1, Ok('\'')),
        '"' => (1, Ok('"')),
        'x' => decode_hex_escape(s, 2),
        'u' => decode_hex_escape(s, 4),
        'U' => decode_hex_escape(s, 8),
        other => (
            other.len_utf8(),
            Err(format!("unknown escape sequence: \\{}", other)),
        ),
    }
}

/// Decodes `\xHH`, `\uHHHH`, or `\UHHHHHHHH` given `s` starting at the marker
/// character and the required digit count.
fn decode_hex_escape(s: &str, digits: usize) -> (usize, Result<char, String>) {
    let mut consumed = 1; // the marker character
    let mut code: u32 = 0;
    for c in s.chars().skip(1).take(digits) {
        match c.to_digit(16) {
            Some(d) => {
                code = code * 16 + d;
                consumed += 1;
            }
            None => {
                return (
                    consumed,
                    Err(format!("invalid hex digit in escape sequence: {}", c)),
                );
            }
        }
    }
    if consumed != digits + 1 {
        return (consumed, Err("truncated hex escape sequence".to_string()));
    }
    match char::from_u32(code) {
        Some(c) => (consumed, Ok(c)),
        None => (
            consumed,
            Err(format!("escape value {:#x} is not a valid character", code)),
        ),
    }
}

/// Parses a `"`-delimited string literal, decoding escapes. Unterminated
/// literals and bad escapes yield an error token spanning the literal.
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_string_literal(input: &str) -> ParserResult<Token> {
    let Some(body) = input.strip_prefix('"') else {
        return Err(no_match(input));
    };

    let mut text = String::new();
    let mut error: Option<String> = None;
    let mut i = 0;
    while i < body.len() {
        let Some(c) = body[i..].chars().next() else {
            break;
        };
        i += c.len_utf8();
        match c {
            '"' => {
                let token = match error {
                    None => Token::Literal(Literal::String(text)),
                    Some(message) => Token::Error(message),
                };
                return Ok((&body[i..], token));
            }
            '\\' => {
                let (consumed, decoded) = decode_escape(&body[i..]);
                i += consumed;
                match decoded {
                    Ok(c) => text.push(c),
                    Err(message) => {
                        error.get_or_insert(message);
                    }
                }
            }
            _ => text.push(c),
        }
    }
    Ok((
        "",
        Token::Error(
            error.unwrap_or_else(|| "unterminated string literal".to_string()),
        ),
    ))
}

/// Parses an `f"`-delimited f-string literal into text and interpolation
/// parts. Interpolation regions track `{}` depth, so a map literal inside an
/// interpolation does not close it early.
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_fstring_literal(input: &str) -> ParserResult<Token> {
    let Some(body) = input.strip_prefix("f\"") else {
        return Err(no_match(input));
    };
    const PREFIX_LEN: usize = 2; // `f"`

    let mut parts = Vec::new();
    let mut text = String::new();
    let mut error: Option<String> = None;
    let mut i = 0;
    while i < body.len() {
        let Some(c) = body[i..].chars().next() else {
            break;
        };
        match c {
            '"' => {
                i += 1;
                if !text.is_empty() {
                    parts.push(StringPart::Text(text));
                }
                let token = match error {
                    None => Token::Literal(Literal::FString(parts)),
                    Some(message) => Token::Error(message),
                };
                return Ok((&body[i..], token));
            }
            '\\' => {
                i += 1;
                let (consumed, decoded) = decode_escape(&body[i..]);
                i += consumed;
                match decoded {
                    Ok(c) => text.push(c),
                    Err(message) => {
                        error.get_or_insert(message);
                    }
                }
            }
            '{' => {
                i += 1;
                if !text.is_empty() {
                    parts.push(StringPart::Text(std::mem::take(&mut text)));
                }
                match scan_interpolation(body, i) {
                    Ok(end) => {
                        let (lines, cols) = relative_position(&input[..PREFIX_LEN + i]);
                        parts.push(StringPart::Interpolation {
                            source: body[i..end].to_string(),
                            offset: PREFIX_LEN + i,
                            lines,
                            cols,
                        });
                        i = end + 1; // past the closing `}`
                    }
                    Err(message) => {
                        return Ok(("", Token::Error(message)));
                    }
                }
            }
            _ => {
                text.push(c);
                i += c.len_utf8();
            }
        }
    }
    Ok((
        "",
        Token::Error(
            error.unwrap_or_else(|| "unterminated f-string literal".to_string()),
        ),
    ))
}

/// Scans an interpolation region starting just inside its opening `{`.
/// Returns the byte index of the matching `}`. Tracks brace depth and skips
/// over string literals inside the region.
fn scan_interpolation(body: &str, start: usize) -> Result<usize, String> {
    let mut depth = 1usize;
    let mut i = start;
    while i < body.len() {
        let Some(c) = body[i..].chars().next() else {
            break;
        };
        i += c.len_utf8();
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i - 1);
                }
            }
            '"' => {
                // A string literal inside the interpolation; skip to its end
                // so embedded braces and quotes are not miscounted.
                while i < body.len() {
                    let Some(c) = body[i..].chars().next() else {
                        break;
                    };
                    i += c.len_utf8();
                    match c {
                        '\\' => {
                            if let Some(next) = body[i..].chars().next() {
                                i += next.len_utf8();
                            }
                        }
                        '"' => break,
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }
    Err("unterminated f-string interpolation".to_string())
}

/// Lines and trailing characters of a raw-text prefix, used to locate an
/// interpolation relative to the start of its token.
fn relative_position(prefix: &str) -> (usize, usize) {
    let lines = prefix.matches('\n').count();
    let cols = match prefix.rfind('\n') {
        Some(idx) => prefix[idx + 1..].chars().count(),
        None => prefix.chars().count(),
    };
    (lines, cols)
}
