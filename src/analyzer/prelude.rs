//! Convenience re-exports for grammar productions: the combinator
//! constructors and the parser trait, so a production module gets its whole
//! vocabulary from one import.

pub use super::combinators::{
    as_unit, delimited, many, many1, map, optional, preceded, separated_list, tuple2, tuple3,
    tuple4, with_context,
};
pub use super::core::{ParseError, ParseResult, Parser};
