//! HTML lowering of zjson trees
//!
//!     [`ZjsonEncoder`] is a [`Visitor`]. Simple nodes open their tag in the object hook and
//!     close it from the returned closure; lists, tables, regions and links need their own
//!     child order and walk their fields directly. All tag and attribute decisions come from
//!     `markup.rs`, which the symbolic encoder uses as well, so both produce the same HTML for
//!     the same document.

use super::{
    json_kind, typed_object, walk_block, walk_block_array, walk_inline, walk_inline_array,
    walk_item, CloseFn, Visitor, ATTRS, BLOB, BLOCKS, DESCRIPTIONS, DESCRIPTION_ITEMS, INLINES,
    ITEMS, NUMBER, REFERENCE, SECONDARY, SLUG, STRING, TABLE, TYPE,
};
use crate::attributes::Attributes;
use crate::endnotes::{self, write_footnote_ref, EndnoteSink, Footnote, FootnoteQueue};
use crate::error::RenderError;
use crate::markup::{
    blob_source, cite_attributes, class_attributes, heading_attributes, heading_level,
    start_cell, start_link, write_image, write_literal, write_transclusion, write_verbatim, Align,
    Format, LinkState, Literal, Region, Verbatim,
};
use crate::options::RenderOptions;
use crate::writer::HtmlWriter;
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::mem;
use std::rc::Rc;
use zettel_sexpr::EvalError;

type Object = Map<String, Value>;

/// Render a zjson block array (or a single block object), followed by its endnotes.
pub fn render_zjson_html(value: &Value, options: &RenderOptions) -> Result<String, RenderError> {
    tracing::debug!(?options, "rendering zjson tree");
    let mut encoder = ZjsonEncoder::new(options);
    encoder.render_blocks(value);
    if options.emit_footnotes {
        encoder.write_endnotes();
    }
    encoder.finish()
}

/// Render a zjson inline array (or a single inline object) without endnotes.
pub fn render_zjson_inline_html(
    value: &Value,
    options: &RenderOptions,
) -> Result<String, RenderError> {
    let mut encoder = ZjsonEncoder::new(options);
    encoder.render_inlines(value);
    encoder.finish()
}

pub struct ZjsonEncoder<'v> {
    out: HtmlWriter,
    footnotes: Rc<RefCell<FootnoteQueue<&'v [Value]>>>,
    heading_offset: i32,
    unique: Rc<str>,
    emit_footnotes: bool,
    suppress_links: bool,
    visible_space: bool,
    /// Set while entering an item that is a single paragraph
    compact: bool,
}

impl<'v> ZjsonEncoder<'v> {
    pub fn new(options: &RenderOptions) -> Self {
        Self {
            out: HtmlWriter::new(),
            footnotes: Rc::new(RefCell::new(FootnoteQueue::new())),
            heading_offset: options.heading_offset,
            unique: Rc::from(options.unique_prefix.as_str()),
            emit_footnotes: options.emit_footnotes,
            suppress_links: options.suppress_links,
            visible_space: false,
            compact: false,
        }
    }

    pub fn child(&self) -> Self {
        Self {
            out: HtmlWriter::new(),
            footnotes: Rc::clone(&self.footnotes),
            heading_offset: self.heading_offset,
            unique: Rc::clone(&self.unique),
            emit_footnotes: self.emit_footnotes,
            suppress_links: self.suppress_links,
            visible_space: self.visible_space,
            compact: false,
        }
    }

    pub fn render_blocks(&mut self, value: &'v Value) {
        if value.is_object() {
            walk_block(self, value, 0);
        } else {
            walk_block_array(self, value, 0);
        }
    }

    pub fn render_inlines(&mut self, value: &'v Value) {
        if value.is_object() {
            walk_inline(self, value, 0);
        } else {
            walk_inline_array(self, value, 0);
        }
    }

    pub fn write_endnotes(&mut self) {
        endnotes::write_endnotes(self);
    }

    pub fn finish(self) -> Result<String, RenderError> {
        self.out.finish()
    }

    fn fail(&mut self, error: EvalError) {
        self.out.fail(error);
    }

    fn mismatch(
        &mut self,
        kind: &str,
        pos: usize,
        expected: &'static str,
        key: &str,
        found: Option<&Value>,
    ) {
        let found = match found {
            Some(value) => format!("{} in `{}`", json_kind(value), key),
            None => format!("missing `{}`", key),
        };
        self.fail(EvalError::type_mismatch(kind, pos + 1, expected, found));
    }

    fn attrs(&mut self, kind: &str, obj: &'v Object, pos: usize) -> Option<Attributes> {
        let Some(value) = obj.get(ATTRS) else {
            return Some(Attributes::new());
        };
        let attrs = Attributes::from_json(value);
        if attrs.is_none() {
            self.mismatch(kind, pos, "attribute object", ATTRS, Some(value));
        }
        attrs
    }

    fn string(
        &mut self,
        kind: &str,
        obj: &'v Object,
        key: &'static str,
        pos: usize,
    ) -> Option<&'v str> {
        let value = obj.get(key);
        match value.and_then(Value::as_str) {
            Some(text) => Some(text),
            None => {
                self.mismatch(kind, pos, "string", key, value);
                None
            }
        }
    }

    /// Optional string field, empty when absent
    fn string_or_empty(
        &mut self,
        kind: &str,
        obj: &'v Object,
        key: &'static str,
        pos: usize,
    ) -> Option<&'v str> {
        match obj.get(key) {
            None => Some(""),
            Some(_) => self.string(kind, obj, key, pos),
        }
    }

    /// Optional array, empty when absent
    fn array(
        &mut self,
        kind: &str,
        value: Option<&'v Value>,
        key: &'static str,
        pos: usize,
    ) -> Option<&'v [Value]> {
        match value {
            None => Some(&[]),
            Some(Value::Array(values)) => Some(values),
            Some(other) => {
                self.mismatch(kind, pos, "array", key, Some(other));
                None
            }
        }
    }

    fn plain_text(&mut self, obj: &'v Object) -> String {
        let mut child = self.child();
        child.out = HtmlWriter::text_only();
        child.emit_footnotes = false;
        if let Some(inlines) = obj.get(INLINES) {
            walk_inline_array(&mut child, inlines, 0);
        }
        match child.finish() {
            Ok(text) => text,
            Err(error) => {
                self.out.fail(error);
                String::new()
            }
        }
    }

    fn closing(tag: &'static str) -> Option<CloseFn<'v, Self>> {
        Some(Box::new(move |enc: &mut Self| enc.out.end_tag(tag)))
    }

    fn heading(&mut self, kind: &str, obj: &'v Object, pos: usize) -> Option<CloseFn<'v, Self>> {
        let Some(level) = obj.get(NUMBER).and_then(Value::as_i64) else {
            self.mismatch(kind, pos, "number", NUMBER, obj.get(NUMBER));
            return None;
        };
        let attrs = self.attrs(kind, obj, pos)?;
        let slug = self.string_or_empty(kind, obj, SLUG, pos)?;
        let fragment = self.string_or_empty(kind, obj, SECONDARY, pos)?;

        let tag = format!("h{}", heading_level(level, self.heading_offset));
        let attrs = heading_attributes(attrs, &self.unique, slug, fragment);
        self.out.start_tag(&tag, &attrs);
        Some(Box::new(move |enc: &mut Self| enc.out.end_tag(&tag)))
    }

    fn items(&mut self, kind: &str, obj: &'v Object, pos: usize) -> Option<&'v [Value]> {
        self.array(kind, obj.get(ITEMS), ITEMS, pos)
    }

    fn list(&mut self, tag: &'static str, kind: &str, obj: &'v Object, pos: usize) {
        let Some(items) = self.items(kind, obj, pos) else {
            return;
        };
        self.out.start_tag(tag, &Attributes::new());
        for (index, item) in items.iter().enumerate() {
            self.out.markup("<li>");
            walk_item(self, item, index);
            self.out.markup("</li>");
        }
        self.out.end_tag(tag);
    }

    fn quotation(&mut self, kind: &str, obj: &'v Object, pos: usize) {
        let Some(items) = self.items(kind, obj, pos) else {
            return;
        };
        self.out.markup("<blockquote>");
        if let [only] = items {
            walk_item(self, only, 0);
        } else {
            for (index, item) in items.iter().enumerate() {
                self.out.markup("<p>");
                walk_item(self, item, index);
                self.out.markup("</p>");
            }
        }
        self.out.markup("</blockquote>");
    }

    fn description_list(&mut self, kind: &str, obj: &'v Object, pos: usize) {
        let Some(entries) = self.array(kind, obj.get(DESCRIPTIONS), DESCRIPTIONS, pos) else {
            return;
        };
        self.out.markup("<dl>");
        for (index, entry) in entries.iter().enumerate() {
            let Some(entry) = entry.as_object() else {
                self.unexpected(entry, index, "description");
                return;
            };
            self.out.markup("<dt>");
            if let Some(term) = entry.get(INLINES) {
                walk_inline_array(self, term, 0);
            }
            self.out.markup("</dt>");

            let key = DESCRIPTION_ITEMS;
            let Some(descriptions) = self.array(kind, entry.get(key), key, index) else {
                return;
            };
            for (index, item) in descriptions.iter().enumerate() {
                self.out.markup("<dd>");
                walk_item(self, item, index);
                self.out.markup("</dd>");
            }
        }
        self.out.markup("</dl>");
    }

    fn table(&mut self, kind: &str, obj: &'v Object, pos: usize) {
        let Some(table) = self.array(kind, obj.get(TABLE), TABLE, pos) else {
            return;
        };
        let Some(header) = self.array(kind, table.first(), TABLE, pos) else {
            return;
        };
        let Some(rows) = self.array(kind, table.get(1), TABLE, pos) else {
            return;
        };

        self.out.markup("<table>");
        if !header.is_empty() {
            self.out.markup("<thead><tr>");
            for (index, cell) in header.iter().enumerate() {
                self.table_cell(cell, index, true);
            }
            self.out.markup("</tr></thead>");
        }
        if !rows.is_empty() {
            self.out.markup("<tbody>");
            for (index, row) in rows.iter().enumerate() {
                let Some(cells) = self.array(kind, Some(row), TABLE, index) else {
                    return;
                };
                self.out.markup("<tr>");
                for (index, cell) in cells.iter().enumerate() {
                    self.table_cell(cell, index, false);
                }
                self.out.markup("</tr>");
            }
            self.out.markup("</tbody>");
        }
        self.out.markup("</table>");
    }

    fn table_cell(&mut self, cell: &'v Value, pos: usize, header: bool) {
        let align = typed_object(cell).and_then(|(kind, _)| match kind {
            "Cell" => Some(Align::Default),
            "CellLeft" => Some(Align::Left),
            "CellCenter" => Some(Align::Center),
            "CellRight" => Some(Align::Right),
            _ => None,
        });
        let Some(align) = align else {
            self.unexpected(cell, pos, "cell");
            return;
        };
        let tag = start_cell(&mut self.out, align, header);
        if let Some(inlines) = cell.get(INLINES) {
            walk_inline_array(self, inlines, 0);
        }
        self.out.end_tag(tag);
    }

    fn region(&mut self, region: Region, kind: &str, obj: &'v Object, pos: usize) {
        let Some(attrs) = self.attrs(kind, obj, pos) else {
            return;
        };
        let tag = region.tag();
        self.out.start_tag(tag, &class_attributes(attrs));
        if let Some(blocks) = obj.get(BLOCKS) {
            walk_block_array(self, blocks, 0);
        }
        if let Some(cite) = obj.get(INLINES) {
            if cite.as_array().map_or(true, |inlines| !inlines.is_empty()) {
                self.out.markup("<cite>");
                walk_inline_array(self, cite, 0);
                self.out.markup("</cite>");
            }
        }
        self.out.end_tag(tag);
    }

    fn verbatim(&mut self, verbatim: Verbatim, kind: &str, obj: &'v Object, pos: usize) {
        let Some(attrs) = self.attrs(kind, obj, pos) else {
            return;
        };
        let Some(text) = self.string(kind, obj, STRING, pos) else {
            return;
        };
        let saved = mem::replace(&mut self.visible_space, attrs.has_flag());
        write_verbatim(&mut self.out, verbatim, attrs, text, self.visible_space);
        self.visible_space = saved;
    }

    fn literal(&mut self, literal: Literal, kind: &str, obj: &'v Object, pos: usize) {
        let Some(attrs) = self.attrs(kind, obj, pos) else {
            return;
        };
        let Some(text) = self.string(kind, obj, STRING, pos) else {
            return;
        };
        let saved = mem::replace(&mut self.visible_space, attrs.has_flag());
        write_literal(&mut self.out, literal, attrs, text, self.visible_space);
        self.visible_space = saved;
    }

    fn transclude(&mut self, kind: &str, obj: &'v Object, pos: usize) {
        let Some(attrs) = self.attrs(kind, obj, pos) else {
            return;
        };
        let Some(reference) = obj.get(REFERENCE).and_then(Value::as_object) else {
            self.mismatch(kind, pos, "reference object", REFERENCE, obj.get(REFERENCE));
            return;
        };
        let Some(target) = self.string(kind, reference, TYPE, pos) else {
            return;
        };
        let Some(value) = self.string(kind, reference, STRING, pos) else {
            return;
        };
        write_transclusion(&mut self.out, attrs, target, value);
    }

    fn embed_blob(&mut self, kind: &str, obj: &'v Object, pos: usize) {
        let Some(attrs) = self.attrs(kind, obj, pos) else {
            return;
        };
        let Some(syntax) = self.string(kind, obj, SECONDARY, pos) else {
            return;
        };
        let Some(data) = self.string(kind, obj, BLOB, pos) else {
            return;
        };
        let alt = self.plain_text(obj);
        write_image(&mut self.out, attrs, &blob_source(syntax, data), syntax, &alt);
    }

    fn embed(&mut self, kind: &str, obj: &'v Object, pos: usize) {
        let Some(attrs) = self.attrs(kind, obj, pos) else {
            return;
        };
        let Some(reference) = self.string(kind, obj, STRING, pos) else {
            return;
        };
        let Some(syntax) = self.string(kind, obj, SECONDARY, pos) else {
            return;
        };
        let alt = self.plain_text(obj);
        write_image(&mut self.out, attrs, reference, syntax, &alt);
    }

    fn link(&mut self, kind: &str, obj: &'v Object, pos: usize) {
        let Some(attrs) = self.attrs(kind, obj, pos) else {
            return;
        };
        let Some(state) = self.string(kind, obj, SECONDARY, pos) else {
            return;
        };
        let Some(state) = LinkState::from_name(state) else {
            self.mismatch(kind, pos, "link state", SECONDARY, obj.get(SECONDARY));
            return;
        };
        let Some(reference) = self.string(kind, obj, STRING, pos) else {
            return;
        };
        let Some(text) = self.array(kind, obj.get(INLINES), INLINES, pos) else {
            return;
        };

        let tag = start_link(&mut self.out, state, attrs, reference, self.suppress_links);
        let saved = mem::replace(&mut self.suppress_links, true);
        if text.is_empty() {
            self.out.text(reference);
        } else {
            for (index, inline) in text.iter().enumerate() {
                walk_inline(self, inline, index);
            }
        }
        self.suppress_links = saved;
        self.out.end_tag(tag);
    }

    fn cite(&mut self, kind: &str, obj: &'v Object, pos: usize) {
        let Some(attrs) = self.attrs(kind, obj, pos) else {
            return;
        };
        let Some(key) = self.string(kind, obj, STRING, pos) else {
            return;
        };
        let Some(text) = self.array(kind, obj.get(INLINES), INLINES, pos) else {
            return;
        };

        self.out.start_tag("span", &cite_attributes(attrs));
        self.out.text(key);
        if !text.is_empty() {
            self.out.text(", ");
            for (index, inline) in text.iter().enumerate() {
                walk_inline(self, inline, index);
            }
        }
        self.out.end_tag("span");
    }

    fn footnote(&mut self, kind: &str, obj: &'v Object, pos: usize) {
        if !self.emit_footnotes {
            return;
        }
        let Some(attrs) = self.attrs(kind, obj, pos) else {
            return;
        };
        let Some(children) = self.array(kind, obj.get(INLINES), INLINES, pos) else {
            return;
        };
        let number = self.footnotes.borrow_mut().push(Footnote { attrs, children });
        write_footnote_ref(&mut self.out, &self.unique, number, self.suppress_links);
    }

    fn mark(&mut self, kind: &str, obj: &'v Object, pos: usize) {
        let (Some(slug), Some(fragment)) = (
            self.string_or_empty(kind, obj, SLUG, pos),
            self.string_or_empty(kind, obj, SECONDARY, pos),
        ) else {
            return;
        };

        let anchor = heading_attributes(Attributes::new(), &self.unique, slug, fragment);
        let linked = !self.suppress_links && !anchor.is_empty();
        let saved = mem::replace(&mut self.suppress_links, true);
        if linked {
            self.out.start_tag("a", &anchor);
        }
        if let Some(inlines) = obj.get(INLINES) {
            walk_inline_array(self, inlines, 0);
        }
        if linked {
            self.out.end_tag("a");
        }
        self.suppress_links = saved;
    }

    fn format(
        &mut self,
        format: Format,
        kind: &str,
        obj: &'v Object,
        pos: usize,
    ) -> Option<CloseFn<'v, Self>> {
        let attrs = self.attrs(kind, obj, pos)?;
        let tag = format.tag();
        self.out.start_tag(tag, &class_attributes(attrs));
        Self::closing(tag)
    }
}

impl<'v> Visitor<'v> for ZjsonEncoder<'v> {
    fn item_array(&mut self, item: &'v [Value], _pos: usize) -> Option<CloseFn<'v, Self>> {
        self.compact = match item {
            [only] => typed_object(only).is_some_and(|(kind, _)| kind == "Para"),
            _ => false,
        };
        None
    }

    fn block_object(
        &mut self,
        kind: &'v str,
        obj: &'v Object,
        pos: usize,
    ) -> (bool, Option<CloseFn<'v, Self>>) {
        tracing::trace!(kind, "zjson block");
        let compact = mem::take(&mut self.compact);
        match kind {
            "Para" if compact => return (true, None),
            "Para" => {
                self.out.markup("<p>");
                return (true, Self::closing("p"));
            }
            "Heading" => {
                let close = self.heading(kind, obj, pos);
                return (close.is_some(), close);
            }
            "Thematic" => {
                if let Some(attrs) = self.attrs(kind, obj, pos) {
                    self.out.start_tag("hr", &class_attributes(attrs));
                }
            }
            "Bullet" => self.list("ul", kind, obj, pos),
            "Ordered" => self.list("ol", kind, obj, pos),
            "Quotation" => self.quotation(kind, obj, pos),
            "DescrList" => self.description_list(kind, obj, pos),
            "Table" => self.table(kind, obj, pos),
            "Block" => self.region(Region::Block, kind, obj, pos),
            "Excerpt" => self.region(Region::Quote, kind, obj, pos),
            "Poem" => self.region(Region::Verse, kind, obj, pos),
            "CodeBlock" => self.verbatim(Verbatim::Code, kind, obj, pos),
            "EvalBlock" => self.verbatim(Verbatim::Eval, kind, obj, pos),
            "MathBlock" => self.verbatim(Verbatim::Math, kind, obj, pos),
            "ZettelBlock" => self.verbatim(Verbatim::Zettel, kind, obj, pos),
            "CommentBlock" => self.verbatim(Verbatim::Comment, kind, obj, pos),
            "HTMLBlock" => self.verbatim(Verbatim::Html, kind, obj, pos),
            "Transclude" => self.transclude(kind, obj, pos),
            "BLOB" => self.embed_blob(kind, obj, pos),
            _ => self.fail(EvalError::UnboundIdentifier(kind.to_string())),
        }
        (false, None)
    }

    fn inline_object(
        &mut self,
        kind: &'v str,
        obj: &'v Object,
        pos: usize,
    ) -> (bool, Option<CloseFn<'v, Self>>) {
        tracing::trace!(kind, "zjson inline");
        let format = match kind {
            "Emph" => Format::Emph,
            "Strong" => Format::Strong,
            "Delete" => Format::Delete,
            "Insert" => Format::Insert,
            "Quote" => Format::Quote,
            "Span" => Format::Span,
            "Sub" => Format::Sub,
            "Super" => Format::Super,
            "Highlight" => Format::Mark,
            _ => {
                self.leaf_inline(kind, obj, pos);
                return (false, None);
            }
        };
        let close = self.format(format, kind, obj, pos);
        (close.is_some(), close)
    }

    fn unexpected(&mut self, value: &'v Value, pos: usize, expected: &'static str) {
        self.fail(EvalError::type_mismatch("zjson", pos + 1, expected, json_kind(value)));
    }
}

impl<'v> ZjsonEncoder<'v> {
    /// Inline nodes that are not a plain format wrapper
    fn leaf_inline(&mut self, kind: &'v str, obj: &'v Object, pos: usize) {
        match kind {
            "Text" => {
                if let Some(text) = self.string(kind, obj, STRING, pos) {
                    self.out.text(text);
                }
            }
            "Space" => {
                if let Some(space) = self.string_or_empty(kind, obj, STRING, pos) {
                    self.out.text(if obj.contains_key(STRING) { space } else { " " });
                }
            }
            "Soft" => self.out.text("\n"),
            "Hard" => self.out.markup("<br>"),
            "Link" => self.link(kind, obj, pos),
            "Embed" => self.embed(kind, obj, pos),
            "EmbedBLOB" => self.embed_blob(kind, obj, pos),
            "Cite" => self.cite(kind, obj, pos),
            "Footnote" => self.footnote(kind, obj, pos),
            "Mark" => self.mark(kind, obj, pos),
            "Code" => self.literal(Literal::Code, kind, obj, pos),
            "Input" => self.literal(Literal::Input, kind, obj, pos),
            "Output" => self.literal(Literal::Output, kind, obj, pos),
            "Math" => self.literal(Literal::Math, kind, obj, pos),
            "Literal" => self.literal(Literal::Zettel, kind, obj, pos),
            "Comment" => self.literal(Literal::Comment, kind, obj, pos),
            "HTML" => self.literal(Literal::Html, kind, obj, pos),
            _ => self.fail(EvalError::UnboundIdentifier(kind.to_string())),
        }
    }
}

impl<'v> EndnoteSink<&'v [Value]> for ZjsonEncoder<'v> {
    fn writer(&mut self) -> &mut HtmlWriter {
        &mut self.out
    }

    fn unique_prefix(&self) -> &str {
        &self.unique
    }

    fn next_footnote(&mut self) -> Option<(usize, Footnote<&'v [Value]>)> {
        self.footnotes.borrow_mut().pop()
    }

    fn has_footnotes(&self) -> bool {
        !self.footnotes.borrow().is_empty()
    }

    fn render_footnote(&mut self, children: &'v [Value]) {
        for (index, inline) in children.iter().enumerate() {
            walk_inline(self, inline, index);
        }
    }
}
