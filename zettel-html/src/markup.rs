//! HTML shapes shared by the symbolic and the zjson encoder
//!
//!     Both encoders decode their own node representation into the small enums below and then
//!     let these functions decide tags, classes and attributes. Keeping the decisions in one
//!     place is what makes the two encoders produce identical HTML.
//!
//!     All attribute adjustments are pure: they take the node's attributes by value and return
//!     the normalized set.

use crate::attributes::Attributes;
use crate::escape::{escape_comment, is_safe};
use crate::writer::HtmlWriter;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbatim {
    Code,
    Eval,
    Math,
    Zettel,
    Comment,
    Html,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal {
    Code,
    Input,
    Output,
    Math,
    Zettel,
    Comment,
    Html,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Emph,
    Strong,
    Delete,
    Insert,
    Quote,
    Span,
    Sub,
    Super,
    Mark,
}

impl Format {
    pub fn tag(self) -> &'static str {
        match self {
            Format::Emph => "em",
            Format::Strong => "strong",
            Format::Delete => "del",
            Format::Insert => "ins",
            Format::Quote => "q",
            Format::Span => "span",
            Format::Sub => "sub",
            Format::Super => "sup",
            Format::Mark => "mark",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Block,
    Quote,
    Verse,
}

impl Region {
    pub fn tag(self) -> &'static str {
        match self {
            Region::Quote => "blockquote",
            Region::Block | Region::Verse => "div",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Default,
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Zettel,
    SelfRef,
    Found,
    Broken,
    Hosted,
    Based,
    Query,
    External,
    Invalid,
}

impl LinkState {
    /// Parse the zjson spelling (`"zettel"`, `"self"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "zettel" => LinkState::Zettel,
            "self" => LinkState::SelfRef,
            "found" => LinkState::Found,
            "broken" => LinkState::Broken,
            "hosted" => LinkState::Hosted,
            "based" => LinkState::Based,
            "query" => LinkState::Query,
            "external" => LinkState::External,
            "invalid" => LinkState::Invalid,
            _ => return None,
        })
    }
}

/// Heading level after applying the offset, clamped to `h1`..`h6`
pub fn heading_level(level: i64, offset: i32) -> i64 {
    level.saturating_add(i64::from(offset)).clamp(1, 6)
}

/// Heading attributes with the generated id (fragment, else slug; none when both are empty)
pub fn heading_attributes(
    mut attrs: Attributes,
    unique: &str,
    slug: &str,
    fragment: &str,
) -> Attributes {
    let anchor = if fragment.is_empty() { slug } else { fragment };
    if !anchor.is_empty() {
        attrs.set("id", format!("{}{}", unique, anchor));
    }
    attrs
}

/// Promote the default attribute to a CSS class.
pub fn class_attributes(mut attrs: Attributes) -> Attributes {
    if let Some(class) = attrs.default_value().map(str::to_string) {
        attrs.add_class(&class);
    }
    attrs
}

/// Promote the default attribute to a `language-…` class, then add `extra` in front.
pub fn code_attributes(mut attrs: Attributes, extra: Option<&str>) -> Attributes {
    if let Some(language) = attrs.default_value().map(str::to_string) {
        attrs.add_class(&format!("language-{}", language));
    }
    if let Some(class) = extra {
        attrs.add_class(class);
    }
    attrs
}

pub fn write_verbatim(
    out: &mut HtmlWriter,
    kind: Verbatim,
    attrs: Attributes,
    text: &str,
    visible_space: bool,
) {
    let extra = match kind {
        Verbatim::Eval => Some("zs-eval"),
        Verbatim::Math => Some("zs-math"),
        Verbatim::Code | Verbatim::Zettel => None,
        Verbatim::Comment => {
            if attrs.has_flag() {
                out.markup("<!--\n");
                out.markup(&escape_comment(text));
                out.markup("\n-->");
            }
            return;
        }
        Verbatim::Html => {
            write_raw_html(out, text);
            return;
        }
    };
    let attrs = if kind == Verbatim::Zettel {
        attrs
    } else {
        code_attributes(attrs, extra)
    };
    out.markup("<pre>");
    out.start_tag("code", &attrs);
    out.literal(text, visible_space);
    out.markup("</code></pre>");
}

pub fn write_literal(
    out: &mut HtmlWriter,
    kind: Literal,
    attrs: Attributes,
    text: &str,
    visible_space: bool,
) {
    let (tag, attrs) = match kind {
        Literal::Code => ("code", code_attributes(attrs, None)),
        Literal::Input => ("kbd", attrs),
        Literal::Output => ("samp", attrs),
        Literal::Math => ("code", code_attributes(attrs, Some("zs-math"))),
        Literal::Zettel => ("code", attrs),
        Literal::Comment => {
            if attrs.has_flag() {
                out.markup("<!-- ");
                out.markup(&escape_comment(text));
                out.markup(" -->");
            }
            return;
        }
        Literal::Html => {
            write_raw_html(out, text);
            return;
        }
    };
    out.start_tag(tag, &attrs);
    out.literal(text, visible_space);
    out.end_tag(tag);
}

/// Emit raw HTML only when it passes the safety filter. Unsafe content is dropped silently.
pub fn write_raw_html(out: &mut HtmlWriter, html: &str) {
    if is_safe(html) {
        out.markup(html);
    } else {
        tracing::debug!("dropping unsafe raw html");
    }
}

/// Open a cell and return its tag.
pub fn start_cell(out: &mut HtmlWriter, align: Align, header: bool) -> &'static str {
    let tag = if header { "th" } else { "td" };
    let mut attrs = Attributes::new();
    match align {
        Align::Default => {}
        Align::Left => attrs.set("class", "left"),
        Align::Center => attrs.set("class", "center"),
        Align::Right => attrs.set("class", "right"),
    }
    out.start_tag(tag, &attrs);
    tag
}

/// Open a link (or its `<span>` stand-in) and return the tag to close it with.
pub fn start_link(
    out: &mut HtmlWriter,
    state: LinkState,
    mut attrs: Attributes,
    reference: &str,
    suppress_links: bool,
) -> &'static str {
    match state {
        _ if suppress_links => {}
        LinkState::Invalid => {}
        LinkState::Broken => attrs.add_class("broken"),
        LinkState::External => {
            attrs.set("href", reference);
            attrs.set("rel", "external");
            out.start_tag("a", &attrs);
            return "a";
        }
        _ => {
            attrs.set("href", reference);
            out.start_tag("a", &attrs);
            return "a";
        }
    }
    out.start_tag("span", &attrs);
    "span"
}

pub fn cite_attributes(mut attrs: Attributes) -> Attributes {
    attrs.add_class("cite");
    attrs
}

/// `src` of an inline BLOB: SVG text is base64-encoded, raster data is expected in base64.
pub fn blob_source(syntax: &str, data: &str) -> String {
    if syntax == "svg" {
        format!("data:image/svg+xml;base64,{}", STANDARD.encode(data))
    } else {
        format!("data:image/{};base64,{}", syntax, data)
    }
}

/// Write an image, or an `<embed>` inside a `<figure>` for SVG.
pub fn write_image(
    out: &mut HtmlWriter,
    mut attrs: Attributes,
    src: &str,
    syntax: &str,
    alt: &str,
) {
    attrs.set("src", src);
    if syntax == "svg" {
        attrs.set("type", "image/svg+xml");
        out.markup("<figure>");
        out.start_tag("embed", &attrs);
        out.markup("</figure>");
    } else {
        if !alt.is_empty() {
            attrs.set("alt", alt);
        }
        out.start_tag("img", &attrs);
    }
}

/// Transclusion of an external resource becomes an image; anything else a placeholder comment.
pub fn write_transclusion(out: &mut HtmlWriter, mut attrs: Attributes, kind: &str, value: &str) {
    if kind.eq_ignore_ascii_case("external") {
        attrs.set("src", value);
        out.start_tag("img", &attrs);
    } else {
        out.markup("<!-- transclude ");
        out.markup(&escape_comment(&kind.to_ascii_lowercase()));
        out.markup(": ");
        out.markup(&escape_comment(value));
        out.markup(" -->");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(f: impl FnOnce(&mut HtmlWriter)) -> String {
        let mut out = HtmlWriter::new();
        f(&mut out);
        out.finish().unwrap()
    }

    #[test]
    fn test_heading_level_clamps() {
        assert_eq!(heading_level(1, 2), 3);
        assert_eq!(heading_level(5, 4), 6);
        assert_eq!(heading_level(1, -3), 1);
    }

    #[test]
    fn test_heading_level_extremes() {
        assert_eq!(heading_level(i64::MAX, 1), 6);
        assert_eq!(heading_level(i64::MAX, i32::MAX), 6);
        assert_eq!(heading_level(i64::MIN, -1), 1);
        assert_eq!(heading_level(i64::MIN, i32::MIN), 1);
    }

    #[test]
    fn test_heading_attributes_prefers_fragment() {
        let attrs = heading_attributes(Attributes::new(), "u-", "slug", "frag");
        assert_eq!(attrs.get("id"), Some("u-frag"));
        let attrs = heading_attributes(Attributes::new(), "", "slug", "");
        assert_eq!(attrs.get("id"), Some("slug"));
        assert!(heading_attributes(Attributes::new(), "u-", "", "").is_empty());
    }

    #[test]
    fn test_code_attributes() {
        let attrs = code_attributes(Attributes::new().with("", "go"), None);
        assert_eq!(attrs.get("class"), Some("language-go"));
        let attrs = code_attributes(Attributes::new().with("", "tex"), Some("zs-math"));
        assert_eq!(attrs.get("class"), Some("zs-math language-tex"));
    }

    #[test]
    fn test_verbatim_code() {
        let html = written(|out| {
            let attrs = Attributes::new().with("", "rust");
            write_verbatim(out, Verbatim::Code, attrs, "a < b", false)
        });
        assert_eq!(html, r#"<pre><code class="language-rust">a &lt; b</code></pre>"#);
    }

    #[test]
    fn test_comments_need_flag() {
        let hidden =
            written(|out| write_literal(out, Literal::Comment, Attributes::new(), "x", false));
        let shown = written(|out| {
            write_literal(out, Literal::Comment, Attributes::new().with("-", ""), "x--y", false)
        });
        assert_eq!(hidden, "");
        assert_eq!(shown, "<!-- x-&#45;y -->");
    }

    #[test]
    fn test_links() {
        let html = written(|out| {
            let tag =
                start_link(out, LinkState::External, Attributes::new(), "https://x.org", false);
            out.text("x");
            out.end_tag(tag);
            let tag =
                start_link(out, LinkState::Found, Attributes::new(), "20240101000000", true);
            out.end_tag(tag);
            let tag =
                start_link(out, LinkState::Broken, Attributes::new(), "00000000000000", false);
            out.end_tag(tag);
        });
        assert_eq!(
            html,
            r#"<a href="https://x.org" rel="external">x</a><span></span><span class="broken"></span>"#
        );
    }

    #[test]
    fn test_blob_source() {
        assert_eq!(blob_source("png", "AAAA"), "data:image/png;base64,AAAA");
        assert_eq!(blob_source("svg", "<svg/>"), "data:image/svg+xml;base64,PHN2Zy8+");
    }

    #[test]
    fn test_image_and_svg() {
        let img = written(|out| write_image(out, Attributes::new(), "a.png", "png", "An \"A\""));
        let svg = written(|out| write_image(out, Attributes::new(), "a.svg", "svg", "ignored"));
        assert_eq!(img, r#"<img alt="An &quot;A&quot;" src="a.png">"#);
        assert_eq!(svg, r#"<figure><embed src="a.svg" type="image/svg+xml"></figure>"#);
    }

    #[test]
    fn test_transclusion() {
        let ext = written(|out| {
            write_transclusion(out, Attributes::new(), "EXTERNAL", "https://x.org/a.png")
        });
        let other = written(|out| {
            write_transclusion(out, Attributes::new(), "ZETTEL", "20240101000000")
        });
        assert_eq!(ext, r#"<img src="https://x.org/a.png">"#);
        assert_eq!(other, "<!-- transclude zettel: 20240101000000 -->");
    }
}
