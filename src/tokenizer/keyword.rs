//! # Keyword Token Handling
//!
//! This module defines the keywords reserved by the Razen language.
//!
//! ## Keyword Groups
//!
//! * **Declaration Keywords**: `var`, `const`, `fun`, `struct`, `enum`, `impl`, `type`, `mod`
//! * **Import Keywords**: `use`, `from`, `as`
//! * **Control Flow Keywords**: `if`, `elif`, `else`, `while`, `for`, `in`, `match`,
//!   `try`, `catch`, `return`, `break`, `continue`, `throw`
//! * **Literal Keywords**: `true`, `false`, `null`
//! * **Type Keywords**: `int`, `float`, `str`, `bool`, `char`, `any`, `array`, `map`
//! * **Modifiers and Special Forms**: `pub`, `self`
//!
//! ## Classification Strategy
//!
//! Keywords are not matched against the raw input directly. The tokenizer first
//! scans a full identifier word and then reclassifies it through the keyword
//! table ([`Keyword::try_from`]), so an identifier that merely starts with a
//! keyword (`matches`, `format`) is never split. The table is an exact-match
//! lookup with no case folding: `Match` is an identifier, `match` is a keyword.
//!
//! The table itself is derived via `strum`, making it an immutable, process-wide
//! constant; concurrent parses share it without synchronization.

/// Reserved words of the Razen language.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::EnumString,
    strum::Display,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Keyword {
    /// Mutable variable declaration.
    Var,
    /// Constant declaration.
    Const,
    /// Function declaration.
    Fun,
    /// Struct declaration.
    Struct,
    /// Enum declaration.
    Enum,
    /// Implementation block.
    Impl,
    /// Type alias declaration.
    Type,
    /// Module declaration.
    Mod,
    /// Import statement.
    Use,
    /// Selective import prefix (`from a use b, c`).
    From,
    /// Import alias.
    As,
    /// Visibility modifier.
    Pub,
    /// Receiver parameter and receiver expression.
    #[strum(serialize = "self")]
    SelfValue,
    /// Conditional statement.
    If,
    /// Additional conditional branch.
    Elif,
    /// Fallback conditional branch.
    Else,
    /// Loop with a condition.
    While,
    /// Iteration loop.
    For,
    /// Iteration source separator (`for x in xs`).
    In,
    /// Pattern dispatch statement.
    Match,
    /// Guarded block.
    Try,
    /// Error handler clause.
    Catch,
    /// Return from a function.
    Return,
    /// Exit the innermost loop.
    Break,
    /// Skip to the next loop iteration.
    Continue,
    /// Raise a value as an error.
    Throw,
    /// Boolean literal `true`.
    True,
    /// Boolean literal `false`.
    False,
    /// Null literal.
    Null,
    /// Primitive integer type.
    Int,
    /// Primitive floating-point type.
    Float,
    /// Primitive string type.
    Str,
    /// Primitive boolean type.
    Bool,
    /// Primitive character type.
    Char,
    /// Dynamic type.
    Any,
    /// Generic array type constructor (`array<T>`).
    Array,
    /// Generic map type constructor (`map<K, V>`).
    Map,
}

impl Keyword {
    /// True for the keywords that may appear in type position.
    pub fn is_type_keyword(&self) -> bool {
        matches!(
            self,
            Keyword::Int
                | Keyword::Float
                | Keyword::Str
                | Keyword::Bool
                | Keyword::Char
                | Keyword::Any
                | Keyword::Array
                | Keyword::Map
        )
    }
}
