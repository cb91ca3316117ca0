//! HTML lowering of symbolic zettel trees
//!
//! Strategy: direct tree walk, one renderer per node kind
//!
//! # Architecture
//!
//!     [`Encoder`] is an [`Environment`] in which every node kind is bound as a special form: a
//!     renderer receives the unevaluated arguments of its node and decides itself what to write
//!     and which children to walk. Renderers live in `blocks.rs` and `inlines.rs` and are bound
//!     in `table.rs`.
//!
//!     Errors are sticky. A renderer that meets a malformed node records the error on the
//!     encoder and returns; the walk goes on but writes nothing more. [`Encoder::finish`] hands
//!     back either the HTML or the first error.
//!
//!     Lists nest at most one level deeper than [`MAX_DEPTH`] (the extra level is the sequence
//!     that wraps several top-level forms). Deeper trees fail with [`EvalError::TooDeep`]
//!     instead of exhausting the stack.
//!
//!     Render modes (suppress-links, visible-space) are plain fields. A renderer that changes
//!     one does so for its own subtree and restores the previous value before returning.
//!
//! # Sub-renders
//!
//!     [`Encoder::child`] creates an encoder that shares the dispatch table and the footnote
//!     queue but writes into its own buffer. Image `alt` text is produced that way, through a
//!     text-only writer.

mod blocks;
mod inlines;
pub mod table;

use crate::attributes::Attributes;
use crate::endnotes::{self, EndnoteSink, Footnote, FootnoteQueue};
use crate::error::RenderError;
use crate::options::RenderOptions;
use crate::writer::HtmlWriter;
use std::cell::RefCell;
use std::rc::Rc;
use table::{DispatchTable, NodeKind, Renderer};
use zettel_sexpr::{
    evaluate, evaluate_call, Binding, Environment, EvalError, Node, Symbol, MAX_DEPTH,
};

/// Render a symbolic tree as a block sequence, followed by its endnotes.
pub fn render_html(node: &Node, options: &RenderOptions) -> Result<String, RenderError> {
    tracing::debug!(?options, "rendering symbolic tree");
    let mut encoder = Encoder::new(options);
    encoder.render(node);
    if options.emit_footnotes {
        encoder.write_endnotes();
    }
    encoder.finish()
}

/// Render a symbolic tree without endnotes (footnote markers are still written).
pub fn render_inline_html(node: &Node, options: &RenderOptions) -> Result<String, RenderError> {
    let mut encoder = Encoder::new(options);
    encoder.render(node);
    encoder.finish()
}

pub struct Encoder<'n> {
    table: Rc<DispatchTable>,
    out: HtmlWriter,
    footnotes: Rc<RefCell<FootnoteQueue<&'n [Node]>>>,
    heading_offset: i32,
    unique: Rc<str>,
    emit_footnotes: bool,
    suppress_links: bool,
    visible_space: bool,
    /// Lists currently being evaluated
    depth: usize,
}

impl<'n> Encoder<'n> {
    pub fn new(options: &RenderOptions) -> Self {
        Self::with_table(options, DispatchTable::standard())
    }

    pub fn with_table(options: &RenderOptions, table: DispatchTable) -> Self {
        Self {
            table: Rc::new(table),
            out: HtmlWriter::new(),
            footnotes: Rc::new(RefCell::new(FootnoteQueue::new())),
            heading_offset: options.heading_offset,
            unique: Rc::from(options.unique_prefix.as_str()),
            emit_footnotes: options.emit_footnotes,
            suppress_links: options.suppress_links,
            visible_space: false,
            depth: 0,
        }
    }

    /// An encoder sharing this one's table, footnotes and modes, writing to a fresh buffer
    pub fn child(&self) -> Self {
        Self {
            table: Rc::clone(&self.table),
            out: HtmlWriter::new(),
            footnotes: Rc::clone(&self.footnotes),
            heading_offset: self.heading_offset,
            unique: Rc::clone(&self.unique),
            emit_footnotes: self.emit_footnotes,
            suppress_links: self.suppress_links,
            visible_space: self.visible_space,
            depth: self.depth,
        }
    }

    /// Render one node. Errors are recorded, not returned.
    pub fn render(&mut self, node: &'n Node) {
        if let Err(error) = evaluate(self, node) {
            self.out.fail(error);
        }
    }

    pub fn render_children(&mut self, nodes: &'n [Node]) {
        for node in nodes {
            self.render(node);
        }
    }

    pub fn write_endnotes(&mut self) {
        endnotes::write_endnotes(self);
    }

    pub fn finish(self) -> Result<String, RenderError> {
        self.out.finish()
    }

    /// The output sink, for renderers bound from outside this crate
    pub fn writer(&mut self) -> &mut HtmlWriter {
        &mut self.out
    }

    /// Render `nodes` as plain text through a text-only child.
    fn plain_text(&mut self, nodes: &'n [Node]) -> String {
        let mut child = self.child();
        child.out = HtmlWriter::text_only();
        child.emit_footnotes = false;
        child.render_children(nodes);
        match child.finish() {
            Ok(text) => text,
            Err(error) => {
                self.out.fail(error);
                String::new()
            }
        }
    }

    fn fail(&mut self, error: EvalError) {
        self.out.fail(error);
    }

    /// Record an arity error unless `args` has at least `count` elements.
    fn expect_args(&mut self, kind: NodeKind, args: &[Node], count: usize) -> bool {
        if args.len() < count {
            self.fail(EvalError::arity(kind.name(), count, args.len()));
            return false;
        }
        true
    }

    fn string_arg(&mut self, kind: NodeKind, args: &'n [Node], pos: usize) -> Option<&'n str> {
        let node = args.get(pos)?;
        match node {
            Node::String(text) => Some(text),
            other => {
                self.fail(EvalError::type_mismatch(
                    kind.name(),
                    pos + 1,
                    "string",
                    other.kind_name(),
                ));
                None
            }
        }
    }

    fn list_arg(&mut self, kind: NodeKind, args: &'n [Node], pos: usize) -> Option<&'n [Node]> {
        let node = args.get(pos)?;
        match node {
            Node::List(items) => Some(items),
            other => {
                self.fail(EvalError::type_mismatch(
                    kind.name(),
                    pos + 1,
                    "list",
                    other.kind_name(),
                ));
                None
            }
        }
    }

    fn attrs_arg(&mut self, kind: NodeKind, args: &'n [Node], pos: usize) -> Option<Attributes> {
        let Some(node) = args.get(pos) else {
            return Some(Attributes::new());
        };
        let attrs = Attributes::from_node(node);
        if attrs.is_none() {
            self.fail(EvalError::type_mismatch(
                kind.name(),
                pos + 1,
                "attribute list",
                node.kind_name(),
            ));
        }
        attrs
    }

    /// Integer argument, written as a symbol (`2`) or a string (`"2"`)
    fn number_arg(&mut self, kind: NodeKind, args: &'n [Node], pos: usize) -> Option<i64> {
        let text = self.name_arg(kind, args, pos)?;
        match text.parse() {
            Ok(number) => Some(number),
            Err(_) => {
                self.fail(EvalError::type_mismatch(kind.name(), pos + 1, "number", text));
                None
            }
        }
    }

    /// Symbol or string argument, as text
    fn name_arg(&mut self, kind: NodeKind, args: &'n [Node], pos: usize) -> Option<&'n str> {
        match args.get(pos)? {
            Node::Symbol(symbol) => Some(symbol.name()),
            Node::String(text) => Some(text),
            other => {
                self.fail(EvalError::type_mismatch(
                    kind.name(),
                    pos + 1,
                    "symbol or string",
                    other.kind_name(),
                ));
                None
            }
        }
    }
}

impl<'n> Environment<'n> for Encoder<'n> {
    type Value = ();
    type Handler = Renderer;

    fn lookup(&self, symbol: &Symbol) -> Option<Binding<Renderer>> {
        let kind = NodeKind::from_symbol(symbol)?;
        tracing::trace!(kind = kind.name(), "dispatch");
        self.table.get(kind).map(Binding::Special)
    }

    fn apply_special(&mut self, handler: Renderer, args: &'n [Node]) -> Result<(), EvalError> {
        handler(self, args);
        Ok(())
    }

    fn apply(&mut self, _handler: Renderer, _args: Vec<()>) -> Result<(), EvalError> {
        Err(EvalError::Custom(
            "renderers take unevaluated arguments".to_string(),
        ))
    }

    fn evaluate_symbol(&mut self, _symbol: &'n Symbol) -> Result<(), EvalError> {
        Ok(())
    }

    fn evaluate_string(&mut self, text: &'n str) -> Result<(), EvalError> {
        self.out.text(text);
        Ok(())
    }

    fn evaluate_list(&mut self, list: &'n [Node]) -> Result<(), EvalError> {
        if self.depth > MAX_DEPTH {
            return Err(EvalError::TooDeep(MAX_DEPTH));
        }
        self.depth += 1;
        let result = evaluate_call(self, list);
        self.depth -= 1;
        result
    }
}

impl<'n> EndnoteSink<&'n [Node]> for Encoder<'n> {
    fn writer(&mut self) -> &mut HtmlWriter {
        &mut self.out
    }

    fn unique_prefix(&self) -> &str {
        &self.unique
    }

    fn next_footnote(&mut self) -> Option<(usize, Footnote<&'n [Node]>)> {
        self.footnotes.borrow_mut().pop()
    }

    fn has_footnotes(&self) -> bool {
        !self.footnotes.borrow().is_empty()
    }

    fn render_footnote(&mut self, children: &'n [Node]) {
        self.render_children(children);
    }
}
