//! Symbolic-expression input

use crate::encoder::render_html;
use crate::error::FormatError;
use crate::format::Format;
use crate::options::RenderOptions;
use zettel_sexpr::{read_all, Node, SymbolTable};

/// `(PARA (TEXT "x"))` text, rendered by the symbolic encoder
///
/// Several top-level nodes are rendered in order as one block sequence.
pub struct SzFormat;

impl Format for SzFormat {
    fn name(&self) -> &str {
        "sz"
    }

    fn description(&self) -> &str {
        "Symbolic zettel tree"
    }

    fn file_extensions(&self) -> &[&str] {
        &["sz", "sxn"]
    }

    fn render(&self, source: &str, options: &RenderOptions) -> Result<String, FormatError> {
        let mut symbols = SymbolTable::new();
        let mut nodes = read_all(source, &mut symbols)?;
        tracing::debug!(nodes = nodes.len(), symbols = symbols.len(), "read symbolic tree");
        let root = match nodes.len() {
            1 => nodes.remove(0),
            _ => Node::list(nodes),
        };
        Ok(render_html(&root, options)?)
    }
}
