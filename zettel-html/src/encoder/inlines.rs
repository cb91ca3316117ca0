//! Inline renderers

use super::table::NodeKind;
use super::Encoder;
use crate::endnotes::{write_footnote_ref, Footnote};
use crate::markup::{
    blob_source, cite_attributes, class_attributes, heading_attributes, start_link, write_image,
    write_literal, Format, LinkState, Literal,
};
use std::mem;
use zettel_sexpr::Node;

pub(super) fn render_text<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    let kind = NodeKind::Text;
    if !enc.expect_args(kind, args, 1) {
        return;
    }
    if let Some(text) = enc.string_arg(kind, args, 0) {
        enc.out.text(text);
    }
}

pub(super) fn render_space<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    if args.is_empty() {
        enc.out.text(" ");
    } else if let Some(space) = enc.string_arg(NodeKind::Space, args, 0) {
        enc.out.text(space);
    }
}

pub(super) fn render_soft<'n>(enc: &mut Encoder<'n>, _args: &'n [Node]) {
    enc.out.text("\n");
}

pub(super) fn render_hard<'n>(enc: &mut Encoder<'n>, _args: &'n [Node]) {
    enc.out.markup("<br>");
}

/// `(LINK-* attrs "reference" inline...)`
fn render_link<'n>(enc: &mut Encoder<'n>, state: LinkState, kind: NodeKind, args: &'n [Node]) {
    if !enc.expect_args(kind, args, 2) {
        return;
    }
    let Some(attrs) = enc.attrs_arg(kind, args, 0) else {
        return;
    };
    let Some(reference) = enc.string_arg(kind, args, 1) else {
        return;
    };

    let tag = start_link(&mut enc.out, state, attrs, reference, enc.suppress_links);
    let saved = mem::replace(&mut enc.suppress_links, true);
    let text = &args[2..];
    if text.is_empty() {
        enc.out.text(reference);
    } else {
        enc.render_children(text);
    }
    enc.suppress_links = saved;
    enc.out.end_tag(tag);
}

pub(super) fn render_link_zettel<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_link(enc, LinkState::Zettel, NodeKind::LinkZettel, args);
}

pub(super) fn render_link_self<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_link(enc, LinkState::SelfRef, NodeKind::LinkSelf, args);
}

pub(super) fn render_link_found<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_link(enc, LinkState::Found, NodeKind::LinkFound, args);
}

pub(super) fn render_link_broken<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_link(enc, LinkState::Broken, NodeKind::LinkBroken, args);
}

pub(super) fn render_link_hosted<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_link(enc, LinkState::Hosted, NodeKind::LinkHosted, args);
}

pub(super) fn render_link_based<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_link(enc, LinkState::Based, NodeKind::LinkBased, args);
}

pub(super) fn render_link_query<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_link(enc, LinkState::Query, NodeKind::LinkQuery, args);
}

pub(super) fn render_link_external<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_link(enc, LinkState::External, NodeKind::LinkExternal, args);
}

pub(super) fn render_link_invalid<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_link(enc, LinkState::Invalid, NodeKind::LinkInvalid, args);
}

/// `(EMBED attrs "reference" syntax inline...)`
pub(super) fn render_embed<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    let kind = NodeKind::Embed;
    if !enc.expect_args(kind, args, 3) {
        return;
    }
    let Some(attrs) = enc.attrs_arg(kind, args, 0) else {
        return;
    };
    let Some(reference) = enc.string_arg(kind, args, 1) else {
        return;
    };
    let Some(syntax) = enc.string_arg(kind, args, 2) else {
        return;
    };
    let alt = enc.plain_text(&args[3..]);
    write_image(&mut enc.out, attrs, reference, syntax, &alt);
}

/// `(EMBED-BLOB attrs syntax "data" inline...)`, also bound to `BLOB`
pub(super) fn render_embed_blob<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    let kind = NodeKind::EmbedBlob;
    if !enc.expect_args(kind, args, 3) {
        return;
    }
    let Some(attrs) = enc.attrs_arg(kind, args, 0) else {
        return;
    };
    let Some(syntax) = enc.string_arg(kind, args, 1) else {
        return;
    };
    let Some(data) = enc.string_arg(kind, args, 2) else {
        return;
    };
    let alt = enc.plain_text(&args[3..]);
    write_image(&mut enc.out, attrs, &blob_source(syntax, data), syntax, &alt);
}

/// `(CITE attrs "key" inline...)`
pub(super) fn render_cite<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    let kind = NodeKind::Cite;
    if !enc.expect_args(kind, args, 2) {
        return;
    }
    let Some(attrs) = enc.attrs_arg(kind, args, 0) else {
        return;
    };
    let Some(key) = enc.string_arg(kind, args, 1) else {
        return;
    };

    enc.out.start_tag("span", &cite_attributes(attrs));
    enc.out.text(key);
    let text = &args[2..];
    if !text.is_empty() {
        enc.out.text(", ");
        enc.render_children(text);
    }
    enc.out.end_tag("span");
}

/// `(FOOTNOTE attrs inline...)`: queue the content, write the numbered reference
pub(super) fn render_footnote<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    if !enc.emit_footnotes {
        return;
    }
    let Some(attrs) = enc.attrs_arg(NodeKind::Footnote, args, 0) else {
        return;
    };
    let children = args.get(1..).unwrap_or_default();
    let number = enc.footnotes.borrow_mut().push(Footnote { attrs, children });
    write_footnote_ref(&mut enc.out, &enc.unique, number, enc.suppress_links);
}

/// `(MARK "mark" "slug" "fragment" inline...)`
pub(super) fn render_mark<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    let kind = NodeKind::Mark;
    if !enc.expect_args(kind, args, 3) {
        return;
    }
    if enc.string_arg(kind, args, 0).is_none() {
        return;
    }
    let Some(slug) = enc.string_arg(kind, args, 1) else {
        return;
    };
    let Some(fragment) = enc.string_arg(kind, args, 2) else {
        return;
    };

    let anchor = heading_attributes(Default::default(), &enc.unique, slug, fragment);
    let linked = !enc.suppress_links && !anchor.is_empty();
    let saved = mem::replace(&mut enc.suppress_links, true);
    if linked {
        enc.out.start_tag("a", &anchor);
    }
    enc.render_children(&args[3..]);
    if linked {
        enc.out.end_tag("a");
    }
    enc.suppress_links = saved;
}

fn render_format<'n>(enc: &mut Encoder<'n>, format: Format, kind: NodeKind, args: &'n [Node]) {
    let Some(attrs) = enc.attrs_arg(kind, args, 0) else {
        return;
    };
    let tag = format.tag();
    enc.out.start_tag(tag, &class_attributes(attrs));
    enc.render_children(args.get(1..).unwrap_or_default());
    enc.out.end_tag(tag);
}

pub(super) fn render_format_emph<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_format(enc, Format::Emph, NodeKind::FormatEmph, args);
}

pub(super) fn render_format_strong<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_format(enc, Format::Strong, NodeKind::FormatStrong, args);
}

pub(super) fn render_format_delete<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_format(enc, Format::Delete, NodeKind::FormatDelete, args);
}

pub(super) fn render_format_insert<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_format(enc, Format::Insert, NodeKind::FormatInsert, args);
}

pub(super) fn render_format_quote<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_format(enc, Format::Quote, NodeKind::FormatQuote, args);
}

pub(super) fn render_format_span<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_format(enc, Format::Span, NodeKind::FormatSpan, args);
}

pub(super) fn render_format_sub<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_format(enc, Format::Sub, NodeKind::FormatSub, args);
}

pub(super) fn render_format_super<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_format(enc, Format::Super, NodeKind::FormatSuper, args);
}

pub(super) fn render_format_mark<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_format(enc, Format::Mark, NodeKind::FormatMark, args);
}

fn render_literal<'n>(enc: &mut Encoder<'n>, literal: Literal, kind: NodeKind, args: &'n [Node]) {
    if !enc.expect_args(kind, args, 2) {
        return;
    }
    let Some(attrs) = enc.attrs_arg(kind, args, 0) else {
        return;
    };
    let Some(text) = enc.string_arg(kind, args, 1) else {
        return;
    };

    let saved = mem::replace(&mut enc.visible_space, attrs.has_flag());
    write_literal(&mut enc.out, literal, attrs, text, enc.visible_space);
    enc.visible_space = saved;
}

pub(super) fn render_literal_code<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_literal(enc, Literal::Code, NodeKind::LiteralCode, args);
}

pub(super) fn render_literal_input<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_literal(enc, Literal::Input, NodeKind::LiteralInput, args);
}

pub(super) fn render_literal_output<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_literal(enc, Literal::Output, NodeKind::LiteralOutput, args);
}

pub(super) fn render_literal_math<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_literal(enc, Literal::Math, NodeKind::LiteralMath, args);
}

pub(super) fn render_literal_zettel<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_literal(enc, Literal::Zettel, NodeKind::LiteralZettel, args);
}

pub(super) fn render_literal_comment<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_literal(enc, Literal::Comment, NodeKind::LiteralComment, args);
}

pub(super) fn render_literal_html<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_literal(enc, Literal::Html, NodeKind::LiteralHtml, args);
}

#[cfg(test)]
mod tests {
    use crate::encoder::{render_html, render_inline_html};
    use crate::error::RenderError;
    use crate::options::RenderOptions;
    use rstest::rstest;
    use zettel_sexpr::{read, EvalError, SymbolTable};

    fn render_with(text: &str, options: &RenderOptions) -> Result<String, RenderError> {
        let mut symbols = SymbolTable::new();
        let node = read(text, &mut symbols).unwrap();
        render_html(&node, options)
    }

    fn render(text: &str) -> String {
        render_with(text, &RenderOptions::default()).unwrap()
    }

    #[rstest]
    #[case::space(r#"(SPACE)"#, " ")]
    #[case::wide_space(r#"(SPACE "  ")"#, "  ")]
    #[case::soft_hard(r#"((TEXT "a") (SOFT) (TEXT "b") (HARD) (TEXT "c"))"#, "a\nb<br>c")]
    #[case::link_found(
        r#"(LINK-FOUND () "20240101000000" (TEXT "note"))"#,
        r#"<a href="20240101000000">note</a>"#
    )]
    #[case::link_without_text(
        r#"(LINK-EXTERNAL () "https://x.org")"#,
        r#"<a href="https://x.org" rel="external">https://x.org</a>"#
    )]
    #[case::link_broken(
        r#"(LINK-BROKEN () "00000000000000" (TEXT "gone"))"#,
        r#"<span class="broken">gone</span>"#
    )]
    #[case::link_invalid(r#"(LINK-INVALID () "::" (TEXT "bad"))"#, "<span>bad</span>")]
    #[case::nested_link(
        r#"(LINK-HOSTED () "/a" (LINK-HOSTED () "/b" (TEXT "x")))"#,
        r#"<a href="/a"><span>x</span></a>"#
    )]
    #[case::embed(
        r#"(EMBED () "a.png" "png" (TEXT "An ") (FORMAT-EMPH () (TEXT "A")))"#,
        r#"<img alt="An A" src="a.png">"#
    )]
    #[case::embed_svg(
        r#"(EMBED () "a.svg" "svg")"#,
        r#"<figure><embed src="a.svg" type="image/svg+xml"></figure>"#
    )]
    #[case::blob(
        r#"(EMBED-BLOB () "png" "AAAA" (TEXT "dot"))"#,
        r#"<img alt="dot" src="data:image/png;base64,AAAA">"#
    )]
    #[case::cite(
        r#"(CITE () "Knuth84" (TEXT "p. 7"))"#,
        r#"<span class="cite">Knuth84, p. 7</span>"#
    )]
    #[case::cite_key_only(r#"(CITE () "Knuth84")"#, r#"<span class="cite">Knuth84</span>"#)]
    #[case::mark(
        r#"(MARK "m" "m" "" (TEXT "here"))"#,
        r#"<a id="m">here</a>"#
    )]
    #[case::mark_without_id(r#"(MARK "m" "" "" (TEXT "here"))"#, "here")]
    #[case::span_class(
        r#"(FORMAT-SPAN (("" "warn") ("title" "t")) (TEXT "x"))"#,
        r#"<span class="warn" title="t">x</span>"#
    )]
    #[case::quote(r#"(FORMAT-QUOTE () (TEXT "q"))"#, "<q>q</q>")]
    #[case::literal_code(r#"(LITERAL-CODE (("" "go")) "x")"#, r#"<code class="language-go">x</code>"#)]
    #[case::literal_input(r#"(LITERAL-INPUT () "ls -l")"#, "<kbd>ls -l</kbd>")]
    #[case::literal_output(r#"(LITERAL-OUTPUT () "<ok>")"#, "<samp>&lt;ok&gt;</samp>")]
    #[case::literal_math(r#"(LITERAL-MATH () "x")"#, r#"<code class="zs-math">x</code>"#)]
    #[case::comment_shown(r#"(LITERAL-COMMENT (("-")) "note")"#, "<!-- note -->")]
    #[case::unsafe_html(r#"(LITERAL-HTML () "<script>x</script>")"#, "")]
    #[case::safe_html(r#"(LITERAL-HTML () "<b>x</b>")"#, "<b>x</b>")]
    fn test_inlines(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(render(input), expected);
    }

    #[test]
    fn test_suppressed_links() {
        let options = RenderOptions::default().with_suppressed_links(true);
        let html = render_with(
            r#"((LINK-ZETTEL (("title" "t")) "x" (TEXT "z")) (MARK "m" "m" "" (TEXT "here")))"#,
            &options,
        )
        .unwrap();
        assert_eq!(html, r#"<span title="t">z</span>here"#);
    }

    #[test]
    fn test_footnotes_numbered_in_order() {
        let html = render(r#"(PARA (TEXT "a") (FOOTNOTE () (TEXT "one")) (FOOTNOTE () (TEXT "two")))"#);
        assert_eq!(
            html,
            concat!(
                r##"<p>a<sup id="fnref:1"><a href="#fn:1">1</a></sup>"##,
                r##"<sup id="fnref:2"><a href="#fn:2">2</a></sup></p>"##,
                r#"<ol class="zs-endnotes">"#,
                r##"<li id="fn:1" role="doc-endnote">one <a href="#fnref:1">↩</a></li>"##,
                r##"<li id="fn:2" role="doc-endnote">two <a href="#fnref:2">↩</a></li>"##,
                "</ol>"
            )
        );
    }

    #[test]
    fn test_nested_footnote_is_flushed() {
        let html = render(r#"(FOOTNOTE () (TEXT "outer") (FOOTNOTE () (TEXT "inner")))"#);
        assert_eq!(
            html,
            concat!(
                r##"<sup id="fnref:1"><a href="#fn:1">1</a></sup>"##,
                r#"<ol class="zs-endnotes">"#,
                r##"<li id="fn:1" role="doc-endnote">outer<sup id="fnref:2"><a href="#fn:2">2</a></sup>"##,
                r##" <a href="#fnref:1">↩</a></li>"##,
                r##"<li id="fn:2" role="doc-endnote">inner <a href="#fnref:2">↩</a></li>"##,
                "</ol>"
            )
        );
    }

    #[test]
    fn test_footnotes_with_unique_prefix() {
        let options = RenderOptions::default().with_unique_prefix("z1-");
        let html = render_with(r#"(FOOTNOTE () (TEXT "n"))"#, &options).unwrap();
        assert!(html.starts_with(r##"<sup id="fnref:z1-1"><a href="#fn:z1-1">1</a></sup>"##));
        assert!(html.contains(r#"<li id="fn:z1-1" role="doc-endnote">"#));
    }

    #[test]
    fn test_footnotes_disabled() {
        let options = RenderOptions::default().with_footnotes(false);
        let html = render_with(r#"(PARA (TEXT "a") (FOOTNOTE () (TEXT "n")))"#, &options).unwrap();
        assert_eq!(html, "<p>a</p>");
    }

    #[test]
    fn test_inline_render_keeps_markers_only() {
        let mut symbols = SymbolTable::new();
        let node = read(r#"(FOOTNOTE () (TEXT "n"))"#, &mut symbols).unwrap();
        let html = render_inline_html(&node, &RenderOptions::default()).unwrap();
        assert_eq!(html, r##"<sup id="fnref:1"><a href="#fn:1">1</a></sup>"##);
    }

    #[test]
    fn test_footnote_in_alt_text_is_dropped() {
        let html = render(r#"(EMBED () "a.png" "png" (TEXT "x") (FOOTNOTE () (TEXT "n")))"#);
        assert_eq!(html, r#"<img alt="x" src="a.png">"#);
    }

    #[rstest]
    #[case::missing_text("(TEXT)", EvalError::arity("TEXT", 1, 0))]
    #[case::text_not_string(
        "(TEXT (X))",
        EvalError::type_mismatch("TEXT", 1, "string", "list")
    )]
    #[case::bad_attrs(
        r#"(FORMAT-EMPH "x" (TEXT "y"))"#,
        EvalError::type_mismatch("FORMAT-EMPH", 1, "attribute list", "string")
    )]
    #[case::bad_level(
        r#"(HEADING x () "" "")"#,
        EvalError::type_mismatch("HEADING", 1, "number", "X")
    )]
    fn test_malformed_nodes(#[case] input: &str, #[case] expected: EvalError) {
        let result = render_with(input, &RenderOptions::default());
        assert_eq!(result, Err(RenderError::Eval(expected)));
    }
}
