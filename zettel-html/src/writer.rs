//! Sticky-error HTML sink
//!
//!     Every write goes through an [`HtmlWriter`]. The first recorded failure turns all later
//!     writes into no-ops while the caller keeps walking the tree; the error is only surfaced by
//!     [`HtmlWriter::finish`].
//!
//!     A text-only writer drops markup and writes text unescaped. Sub-renders use it to produce
//!     plain text that is then escaped as an attribute value (image `alt` text).

use crate::attributes::Attributes;
use crate::error::RenderError;
use crate::escape::{escape_attr, escape_literal, escape_text};

#[derive(Debug, Default)]
pub struct HtmlWriter {
    buf: String,
    error: Option<RenderError>,
    text_only: bool,
}

impl HtmlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text_only() -> Self {
        Self {
            text_only: true,
            ..Self::default()
        }
    }

    pub fn failed(&self) -> bool {
        self.error.is_some()
    }

    /// Record `error` unless an earlier one is already recorded.
    pub fn fail(&mut self, error: impl Into<RenderError>) {
        if self.error.is_none() {
            let error = error.into();
            tracing::warn!(%error, "render failed, suppressing further output");
            self.error = Some(error);
        }
    }

    /// Write markup verbatim.
    pub fn markup(&mut self, html: &str) {
        if self.error.is_none() && !self.text_only {
            self.buf.push_str(html);
        }
    }

    /// Write text content.
    pub fn text(&mut self, text: &str) {
        if self.error.is_some() {
            return;
        }
        if self.text_only {
            self.buf.push_str(text);
        } else {
            self.buf.push_str(&escape_text(text));
        }
    }

    /// Write literal (code) content.
    pub fn literal(&mut self, text: &str, visible_space: bool) {
        if self.error.is_some() {
            return;
        }
        if self.text_only {
            self.buf.push_str(text);
        } else {
            self.buf.push_str(&escape_literal(text, visible_space));
        }
    }

    /// Write ` key="value"` for every emittable attribute.
    pub fn attributes(&mut self, attrs: &Attributes) {
        if self.error.is_some() || self.text_only {
            return;
        }
        for (key, value) in attrs.emittable() {
            self.buf.push(' ');
            self.buf.push_str(key);
            self.buf.push_str("=\"");
            self.buf.push_str(&escape_attr(value));
            self.buf.push('"');
        }
    }

    /// Write `<tag attrs>`.
    pub fn start_tag(&mut self, tag: &str, attrs: &Attributes) {
        self.markup("<");
        self.markup(tag);
        self.attributes(attrs);
        self.markup(">");
    }

    pub fn end_tag(&mut self, tag: &str) {
        self.markup("</");
        self.markup(tag);
        self.markup(">");
    }

    pub fn finish(self) -> Result<String, RenderError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.buf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zettel_sexpr::EvalError;

    #[test]
    fn test_tags_and_attributes() {
        let mut out = HtmlWriter::new();
        let attrs = Attributes::new().with("title", "a \"b\"").with("", "x");
        out.start_tag("span", &attrs);
        out.text("1 < 2");
        out.end_tag("span");

        assert_eq!(
            out.finish().unwrap(),
            "<span title=\"a &quot;b&quot;\">1 &lt; 2</span>"
        );
    }

    #[test]
    fn test_first_error_sticks() {
        let mut out = HtmlWriter::new();
        out.markup("<p>");
        out.fail(EvalError::UnboundIdentifier("A".into()));
        out.markup("lost");
        out.fail(EvalError::UnboundIdentifier("B".into()));

        assert!(out.failed());
        assert_eq!(
            out.finish(),
            Err(RenderError::Eval(EvalError::UnboundIdentifier("A".into())))
        );
    }

    #[test]
    fn test_text_only_drops_markup() {
        let mut out = HtmlWriter::text_only();
        out.start_tag("em", &Attributes::new().with("class", "x"));
        out.text("a & b");
        out.end_tag("em");
        out.literal("c d", true);

        assert_eq!(out.finish().unwrap(), "a & bc d");
    }
}
