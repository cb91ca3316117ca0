use serde::{Deserialize, Serialize};

/// Knobs for one render call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Added to every heading level (the result is clamped to 1..=6)
    pub heading_offset: i32,
    /// Prepended to generated ids, so several zettel can share one page
    pub unique_prefix: String,
    /// Render footnote markers and the endnote list
    pub emit_footnotes: bool,
    /// Render links as `<span>` instead of `<a>`
    pub suppress_links: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            heading_offset: 0,
            unique_prefix: String::new(),
            emit_footnotes: true,
            suppress_links: false,
        }
    }
}

impl RenderOptions {
    pub fn with_heading_offset(mut self, offset: i32) -> Self {
        self.heading_offset = offset;
        self
    }

    pub fn with_unique_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.unique_prefix = prefix.into();
        self
    }

    pub fn with_footnotes(mut self, emit: bool) -> Self {
        self.emit_footnotes = emit;
        self
    }

    pub fn with_suppressed_links(mut self, suppress: bool) -> Self {
        self.suppress_links = suppress;
        self
    }
}
