//! Formatter errors.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatterError {
    /// The tree contains an error placeholder from parse recovery; there is
    /// no source form to print for it.
    #[error("cannot format a tree containing error placeholders")]
    ErrorNode,
}
