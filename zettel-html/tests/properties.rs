//! Document-level rendering properties

use rstest::rstest;
use zettel_html::{
    render_html, DispatchTable, Encoder, FormatError, FormatRegistry, NodeKind, RenderError,
    RenderOptions,
};
use zettel_sexpr::{read, EvalError, Node, SymbolTable};

fn render_with(text: &str, options: &RenderOptions) -> Result<String, RenderError> {
    let mut symbols = SymbolTable::new();
    let node = read(text, &mut symbols).unwrap();
    render_html(&node, options)
}

fn render(text: &str) -> String {
    render_with(text, &RenderOptions::default()).unwrap()
}

#[rstest]
#[case::emphasis(
    r#"(PARA (TEXT "Hello") (FORMAT-EMPH () (TEXT "world")))"#,
    "<p>Hello<em>world</em></p>"
)]
#[case::bullets(
    r#"(LIST-UNORDERED (PARA (TEXT "a")) (PARA (TEXT "b")))"#,
    "<ul><li>a</li><li>b</li></ul>"
)]
#[case::language_class(r#"(LITERAL-CODE (("" "go")) "x")"#, r#"<code class="language-go">x</code>"#)]
#[case::unsafe_html(r#"(LITERAL-HTML () "<script>x</script>")"#, "")]
#[case::unsafe_html_mixed_case(r#"(LITERAL-HTML () "<ScRiPt>x")"#, "")]
#[case::safe_html(r#"(LITERAL-HTML () "<b>x</b>")"#, "<b>x</b>")]
#[case::escaped_text(r#"(PARA (TEXT "a < b & \"c\""))"#, r#"<p>a &lt; b &amp; "c"</p>"#)]
fn test_documents(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(render(input), expected);
}

#[test]
fn test_heading_offset() {
    let options = RenderOptions::default().with_heading_offset(2);
    let html = render_with(r#"(HEADING 1 () "" "" (TEXT "x"))"#, &options).unwrap();
    assert_eq!(html, "<h3>x</h3>");
}

#[test]
fn test_two_footnotes() {
    let html = render(r#"(PARA (FOOTNOTE () (TEXT "a")) (FOOTNOTE () (TEXT "b")))"#);
    for id in [
        r#"id="fn:1""#,
        r#"id="fn:2""#,
        r#"id="fnref:1""#,
        r#"id="fnref:2""#,
    ] {
        assert!(html.contains(id), "{} missing from {}", id, html);
    }
    insta::assert_snapshot!(html, @r###"<p><sup id="fnref:1"><a href="#fn:1">1</a></sup><sup id="fnref:2"><a href="#fn:2">2</a></sup></p><ol class="zs-endnotes"><li id="fn:1" role="doc-endnote">a <a href="#fnref:1">↩</a></li><li id="fn:2" role="doc-endnote">b <a href="#fnref:2">↩</a></li></ol>"###);
}

#[test]
fn test_first_error_wins() {
    let result = render_with(
        r#"((PARA (TEXT)) (UNKNOWN) (PARA (TEXT "x")))"#,
        &RenderOptions::default(),
    );
    assert_eq!(result, Err(RenderError::Eval(EvalError::arity("TEXT", 1, 0))));
}

#[test]
fn test_custom_renderer() {
    fn loud<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
        enc.writer().markup("<strong class=\"loud\">");
        enc.render_children(args);
        enc.writer().markup("</strong>");
    }

    let mut table = DispatchTable::standard();
    table.set(NodeKind::Para, loud);

    let mut symbols = SymbolTable::new();
    let node = read(r#"((PARA (TEXT "a")) (THEMATIC))"#, &mut symbols).unwrap();
    let mut encoder = Encoder::with_table(&RenderOptions::default(), table);
    encoder.render(&node);
    assert_eq!(encoder.finish().unwrap(), r#"<strong class="loud">a</strong><hr>"#);
}

#[test]
fn test_registry_errors() {
    let registry = FormatRegistry::with_defaults();
    let options = RenderOptions::default();

    assert!(matches!(
        registry.render("x", "markdown", &options),
        Err(FormatError::FormatNotFound(name)) if name == "markdown"
    ));
    assert!(matches!(
        registry.render("(PARA (BOGUS))", "sz", &options),
        Err(FormatError::Render(RenderError::Eval(EvalError::UnboundIdentifier(name)))) if name == "BOGUS"
    ));
}
