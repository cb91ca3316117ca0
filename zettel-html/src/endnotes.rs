//! Footnotes and endnotes
//!
//!     A FOOTNOTE node does not render its content in place. It enqueues the content, writes a
//!     numbered reference, and the content is rendered at the end of the document as an ordered
//!     list of endnotes. Numbers are 1-based and document-unique:
//!
//!     <sup id="fnref:{u}{n}"><a href="#fn:{u}{n}">{n}</a></sup>
//!     ...
//!     <ol class="zs-endnotes"><li id="fn:{u}{n}" role="doc-endnote">... <a href="#fnref:{u}{n}">↩</a></li></ol>
//!
//!     The queue is FIFO and shared between an encoder and its child encoders. Rendering an
//!     endnote may enqueue further footnotes; [`write_endnotes`] checks the queue again on every
//!     iteration so those are flushed in the same list.

use crate::attributes::Attributes;
use crate::writer::HtmlWriter;
use std::collections::VecDeque;

/// A buffered footnote: its attributes and its (not yet rendered) children
#[derive(Debug, Clone)]
pub struct Footnote<C> {
    pub attrs: Attributes,
    pub children: C,
}

#[derive(Debug)]
pub struct FootnoteQueue<C> {
    pending: VecDeque<Footnote<C>>,
    pushed: usize,
    emitted: usize,
}

impl<C> Default for FootnoteQueue<C> {
    fn default() -> Self {
        Self {
            pending: VecDeque::new(),
            pushed: 0,
            emitted: 0,
        }
    }
}

impl<C> FootnoteQueue<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a footnote, returning its number.
    pub fn push(&mut self, note: Footnote<C>) -> usize {
        self.pending.push_back(note);
        self.pushed += 1;
        self.pushed
    }

    /// Dequeue the oldest footnote together with its number.
    pub fn pop(&mut self) -> Option<(usize, Footnote<C>)> {
        let note = self.pending.pop_front()?;
        self.emitted += 1;
        Some((self.emitted, note))
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// What an encoder provides so [`write_endnotes`] can drive it
pub trait EndnoteSink<C> {
    fn writer(&mut self) -> &mut HtmlWriter;
    fn unique_prefix(&self) -> &str;
    fn next_footnote(&mut self) -> Option<(usize, Footnote<C>)>;
    fn has_footnotes(&self) -> bool;
    fn render_footnote(&mut self, children: C);
}

/// Write the endnote list. Writes nothing when no footnote is pending.
pub fn write_endnotes<C, S: EndnoteSink<C>>(sink: &mut S) {
    if !sink.has_footnotes() {
        return;
    }
    sink.writer().markup(r#"<ol class="zs-endnotes">"#);
    while let Some((number, note)) = sink.next_footnote() {
        let unique = sink.unique_prefix().to_string();
        let attrs = endnote_attributes(note.attrs, &unique, number);
        sink.writer().start_tag("li", &attrs);
        sink.render_footnote(note.children);
        write_backref(sink.writer(), &unique, number);
        sink.writer().end_tag("li");
    }
    sink.writer().markup("</ol>");
}

fn endnote_attributes(mut attrs: Attributes, unique: &str, number: usize) -> Attributes {
    attrs.set_default("id", format!("fn:{}{}", unique, number));
    attrs.set_default("role", "doc-endnote");
    attrs
}

fn write_backref(out: &mut HtmlWriter, unique: &str, number: usize) {
    out.markup(" ");
    let attrs = Attributes::new().with("href", format!("#fnref:{}{}", unique, number));
    out.start_tag("a", &attrs);
    out.markup("\u{21a9}");
    out.end_tag("a");
}

/// Write the in-text reference for footnote `number`.
pub fn write_footnote_ref(out: &mut HtmlWriter, unique: &str, number: usize, suppress_links: bool) {
    let sup = Attributes::new().with("id", format!("fnref:{}{}", unique, number));
    out.start_tag("sup", &sup);
    if suppress_links {
        out.text(&number.to_string());
    } else {
        let link = Attributes::new().with("href", format!("#fn:{}{}", unique, number));
        out.start_tag("a", &link);
        out.text(&number.to_string());
        out.end_tag("a");
    }
    out.end_tag("sup");
}
