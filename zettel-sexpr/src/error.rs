//! Error types for reading and evaluating trees

use thiserror::Error;

/// Errors raised while reading symbolic-expression text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// Input ended inside a list or string, or contained no node at all
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// A `)` with no matching `(`
    #[error("unexpected ')' at byte offset {offset}")]
    UnexpectedClose { offset: usize },
    /// A `(` that would nest deeper than [`crate::reader::MAX_DEPTH`]
    #[error("lists nested too deeply at byte offset {offset}")]
    TooDeep { offset: usize },
}

/// Errors raised while evaluating a tree against an environment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// A list head names a symbol with no bound handler
    #[error("unbound identifier: {0}")]
    UnboundIdentifier(String),
    /// A handler needs more arguments than were supplied
    #[error("{node}: expected at least {expected} argument(s), found {found}")]
    Arity {
        node: String,
        expected: usize,
        found: usize,
    },
    /// An argument has the wrong node kind
    #[error("{node}: argument {position} must be a {expected}, found {found}")]
    TypeMismatch {
        node: String,
        position: usize,
        expected: &'static str,
        found: String,
    },
    /// The tree nests deeper than the evaluator follows
    #[error("nesting deeper than {0} levels")]
    TooDeep(usize),
    #[error("{0}")]
    Custom(String),
}

impl EvalError {
    pub fn arity(node: impl Into<String>, expected: usize, found: usize) -> Self {
        EvalError::Arity {
            node: node.into(),
            expected,
            found,
        }
    }

    pub fn type_mismatch(
        node: impl Into<String>,
        position: usize,
        expected: &'static str,
        found: impl Into<String>,
    ) -> Self {
        EvalError::TypeMismatch {
            node: node.into(),
            position,
            expected,
            found: found.into(),
        }
    }
}
