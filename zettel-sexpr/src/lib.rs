//! # zettel-sexpr
//!
//! Symbolic-expression trees for zettel documents.
//!
//! File Layout
//!
//!     - value.rs     Node model (symbols, strings, lists), the symbol interner and the printer
//!     - reader.rs    Text → Node
//!     - eval.rs      The generic evaluation protocol (Environment, evaluate, evaluate_call)
//!     - error.rs     ReadError and EvalError
//!
//! A zettel body arrives here already parsed by the store, as text like
//!
//!     (PARA (TEXT "Hello") (FORMAT-EMPH () (TEXT "world")))
//!
//! The reader turns that into a [`Node`] tree. Consumers walk the tree through an
//! [`Environment`] that binds node-type symbols to handlers; the HTML lowering in
//! `zettel-html` is one such environment.

pub mod error;
pub mod eval;
pub mod reader;
pub mod value;

pub use error::{EvalError, ReadError};
pub use eval::{evaluate, evaluate_call, Binding, Environment};
pub use reader::{read, read_all, MAX_DEPTH};
pub use value::{Node, Symbol, SymbolTable};
