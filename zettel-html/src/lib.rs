//! HTML lowering for zettel trees
//!
//!     A zettel body reaches this crate already parsed, either as a symbolic tree
//!     (`zettel-sexpr`) or as zjson. Both are rendered to the same HTML5 fragment.
//!
//!     This is a pure lib: it powers the zettel cli but never prints, reads files or looks at the
//!     environment.
//!
//! Architecture
//!
//!     - Format trait: uniform interface for every input representation
//!     - FormatRegistry: discovery and selection of formats, by name or file extension
//!     - encoder: the symbolic tree walker, one renderer per node kind behind a dispatch table
//!     - zjson: a generic JSON tree visitor and the encoder built on it
//!
//!     The file structure:
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry
//!     ├── options.rs              # RenderOptions
//!     ├── attributes.rs           # Node attributes
//!     ├── escape.rs               # Escaping and the raw-HTML safety filter
//!     ├── writer.rs               # Sticky-error HTML sink
//!     ├── markup.rs               # Tag and attribute decisions shared by both encoders
//!     ├── endnotes.rs             # Footnote queue and the endnote list
//!     ├── encoder
//!     │   ├── mod.rs              # Encoder, render_html
//!     │   ├── table.rs            # NodeKind and the dispatch table
//!     │   ├── blocks.rs
//!     │   └── inlines.rs
//!     ├── zjson
//!     │   ├── mod.rs              # Visitor and walk functions
//!     │   └── encoder.rs          # ZjsonEncoder, render_zjson_html
//!     └── formats
//!         ├── sz.rs
//!         └── zjson.rs
//!
//! Testing
//!
//!     Unit tests live next to the code. tests/ holds the document-level properties, most
//!     importantly that a symbolic tree and its zjson twin render byte-identical HTML.

pub mod attributes;
pub mod encoder;
pub mod endnotes;
pub mod error;
pub mod escape;
pub mod format;
pub mod formats;
pub mod markup;
pub mod options;
pub mod registry;
pub mod writer;
pub mod zjson;

pub use attributes::Attributes;
pub use encoder::table::{DispatchTable, NodeKind, Renderer};
pub use encoder::{render_html, render_inline_html, Encoder};
pub use error::{FormatError, RenderError};
pub use format::Format;
pub use options::RenderOptions;
pub use registry::FormatRegistry;
pub use zjson::{render_zjson_html, render_zjson_inline_html, ZjsonEncoder};
