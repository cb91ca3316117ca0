//! Error types for rendering and format selection

use thiserror::Error;
use zettel_sexpr::{EvalError, ReadError};

/// The first error recorded during a render call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Errors surfaced by [`crate::Format`] implementations and the registry
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("format not found: {0}")]
    FormatNotFound(String),
    #[error("read error: {0}")]
    Read(#[from] ReadError),
    #[error("invalid zjson: {0}")]
    Json(#[from] serde_json::Error),
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}
