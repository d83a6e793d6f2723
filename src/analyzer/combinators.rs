//! # Parser Combinators
//!
//! The building blocks the grammar productions are composed from. Each
//! combinator is a function returning an `impl Parser` closure; any
//! compatible closure is already a parser (see the blanket impl in
//! [`super::core`]), so combinator output and hand-written productions
//! compose freely.
//!
//! ## Combinator Types
//!
//! * **Sequential**: [`tuple2`], [`tuple3`], [`tuple4`], [`preceded`], [`delimited`]
//! * **Repetition**: [`many`], [`many1`], [`separated_list`]
//! * **Transformation**: [`map`], [`as_unit`], [`optional`]
//! * **Error Handling**: [`with_context`]
//!
//! Alternation is deliberately absent: statement parsing dispatches on the
//! leading token instead of backtracking through alternatives, so a
//! malformed statement reports its production's own error rather than a
//! vague no-alternative failure.

use super::core::Parser;

/// Transforms the output of a parser with a function.
pub fn map<I, A, B, P, F>(parser: P, f: F) -> impl Parser<I, B>
where
    P: Parser<I, A>,
    F: Fn(A) -> B,
{
    move |input: &[I], pos: usize| {
        parser
            .parse(input, pos)
            .map(|(new_pos, value)| (new_pos, f(value)))
    }
}

/// Discards a parser's output, keeping only its consumption.
pub fn as_unit<I, O, P>(parser: P) -> impl Parser<I, ()>
where
    P: Parser<I, O>,
{
    move |input: &[I], pos: usize| parser.parse(input, pos).map(|(new_pos, _)| (new_pos, ()))
}

/// Turns failure into `None` without consuming input.
pub fn optional<I, O, P>(parser: P) -> impl Parser<I, Option<O>>
where
    P: Parser<I, O>,
{
    move |input: &[I], pos: usize| match parser.parse(input, pos) {
        Ok((new_pos, value)) => Ok((new_pos, Some(value))),
        Err(_) => Ok((pos, None)),
    }
}

/// Applies a parser zero or more times, collecting the results. Always
/// succeeds; an immediate failure yields an empty vector.
pub fn many<I, O, P>(parser: P) -> impl Parser<I, Vec<O>>
where
    P: Parser<I, O>,
{
    move |input: &[I], pos: usize| {
        let mut results = Vec::new();
        let mut current_pos = pos;
        loop {
            match parser.parse(input, current_pos) {
                Ok((new_pos, value)) => {
                    results.push(value);
                    current_pos = new_pos;
                }
                Err(e) => {
                    tracing::trace!(
                        target: "parser::many",
                        error = %e,
                        position = current_pos,
                        items_collected = results.len(),
                        "repetition stopped"
                    );
                    break;
                }
            }
        }
        Ok((current_pos, results))
    }
}

/// Like [`many`], but the first application must succeed.
pub fn many1<I, O, P>(parser: P) -> impl Parser<I, Vec<O>>
where
    P: Parser<I, O>,
{
    move |input: &[I], pos: usize| {
        let (mut current_pos, first) = parser.parse(input, pos)?;
        let mut results = vec![first];
        while let Ok((new_pos, value)) = parser.parse(input, current_pos) {
            results.push(value);
            current_pos = new_pos;
        }
        Ok((current_pos, results))
    }
}

/// Items separated by a delimiter, e.g. comma-separated parameters.
/// Handles empty lists and tolerates one trailing separator, which is
/// exactly the grammar's trailing-comma rule.
pub fn separated_list<I, O, OS, P, S>(item_parser: P, separator_parser: S) -> impl Parser<I, Vec<O>>
where
    P: Parser<I, O>,
    S: Parser<I, OS>,
{
    move |input: &[I], pos: usize| {
        let mut results = Vec::new();
        let mut current_pos = pos;

        if let Ok((new_pos, value)) = item_parser.parse(input, current_pos) {
            results.push(value);
            current_pos = new_pos;

            while let Ok((sep_pos, _)) = separator_parser.parse(input, current_pos) {
                current_pos = sep_pos;
                match item_parser.parse(input, current_pos) {
                    Ok((new_pos, value)) => {
                        results.push(value);
                        current_pos = new_pos;
                    }
                    // Trailing separator: the list ends here.
                    Err(_) => break,
                }
            }
        }

        Ok((current_pos, results))
    }
}

/// Runs a prefix parser for its consumption only, then the value parser.
pub fn preceded<I, O1, O2, P1, P2>(prefix: P1, parser: P2) -> impl Parser<I, O2>
where
    P1: Parser<I, O1>,
    P2: Parser<I, O2>,
{
    move |input: &[I], pos: usize| {
        let (pos, _) = prefix.parse(input, pos)?;
        parser.parse(input, pos)
    }
}

/// A value parser between an opening and a closing parser whose outputs are
/// discarded.
pub fn delimited<I, OL, O, OR, L, P, R>(left: L, parser: P, right: R) -> impl Parser<I, O>
where
    L: Parser<I, OL>,
    P: Parser<I, O>,
    R: Parser<I, OR>,
{
    move |input: &[I], pos: usize| {
        let (pos, _) = left.parse(input, pos)?;
        let (pos, value) = parser.parse(input, pos)?;
        let (pos, _) = right.parse(input, pos)?;
        Ok((pos, value))
    }
}

/// Two parsers in sequence, outputs paired.
pub fn tuple2<I, O1, O2, P1, P2>(parser1: P1, parser2: P2) -> impl Parser<I, (O1, O2)>
where
    P1: Parser<I, O1>,
    P2: Parser<I, O2>,
{
    move |input: &[I], pos: usize| {
        let (pos, value1) = parser1.parse(input, pos)?;
        let (pos, value2) = parser2.parse(input, pos)?;
        Ok((pos, (value1, value2)))
    }
}

/// Three parsers in sequence, outputs grouped.
pub fn tuple3<I, O1, O2, O3, P1, P2, P3>(
    parser1: P1,
    parser2: P2,
    parser3: P3,
) -> impl Parser<I, (O1, O2, O3)>
where
    P1: Parser<I, O1>,
    P2: Parser<I, O2>,
    P3: Parser<I, O3>,
{
    move |input: &[I], pos: usize| {
        let (pos, value1) = parser1.parse(input, pos)?;
        let (pos, value2) = parser2.parse(input, pos)?;
        let (pos, value3) = parser3.parse(input, pos)?;
        Ok((pos, (value1, value2, value3)))
    }
}

/// Four parsers in sequence, outputs grouped.
pub fn tuple4<I, O1, O2, O3, O4, P1, P2, P3, P4>(
    parser1: P1,
    parser2: P2,
    parser3: P3,
    parser4: P4,
) -> impl Parser<I, (O1, O2, O3, O4)>
where
    P1: Parser<I, O1>,
    P2: Parser<I, O2>,
    P3: Parser<I, O3>,
    P4: Parser<I, O4>,
{
    move |input: &[I], pos: usize| {
        let (pos, value1) = parser1.parse(input, pos)?;
        let (pos, value2) = parser2.parse(input, pos)?;
        let (pos, value3) = parser3.parse(input, pos)?;
        let (pos, value4) = parser4.parse(input, pos)?;
        Ok((pos, (value1, value2, value3, value4)))
    }
}

/// Labels errors from the inner parser with the production name, building a
/// context trail from the innermost production outward.
pub fn with_context<I, O, P>(parser: P, context: &'static str) -> impl Parser<I, O>
where
    P: Parser<I, O>,
{
    move |input: &[I], pos: usize| {
        parser
            .parse(input, pos)
            .map_err(|e| e.with_context(context))
    }
}
