//! Block-level renderers

use super::table::NodeKind;
use super::Encoder;
use crate::attributes::Attributes;
use crate::markup::{
    class_attributes, heading_attributes, heading_level, start_cell, write_transclusion,
    write_verbatim, Align, Region, Verbatim,
};
use std::mem;
use zettel_sexpr::{EvalError, Node};

pub(super) fn render_sequence<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    enc.render_children(args);
}

pub(super) fn render_para<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    enc.out.markup("<p>");
    enc.render_children(args);
    enc.out.markup("</p>");
}

pub(super) fn render_heading<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    let kind = NodeKind::Heading;
    if !enc.expect_args(kind, args, 4) {
        return;
    }
    let Some(level) = enc.number_arg(kind, args, 0) else {
        return;
    };
    let Some(attrs) = enc.attrs_arg(kind, args, 1) else {
        return;
    };
    let Some(slug) = enc.string_arg(kind, args, 2) else {
        return;
    };
    let Some(fragment) = enc.string_arg(kind, args, 3) else {
        return;
    };

    let tag = format!("h{}", heading_level(level, enc.heading_offset));
    let attrs = heading_attributes(attrs, &enc.unique, slug, fragment);
    enc.out.start_tag(&tag, &attrs);
    enc.render_children(&args[4..]);
    enc.out.end_tag(&tag);
}

pub(super) fn render_thematic<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    if let Some(attrs) = enc.attrs_arg(NodeKind::Thematic, args, 0) {
        enc.out.start_tag("hr", &class_attributes(attrs));
    }
}

/// Inline content of an item that consists of a single paragraph
///
/// An item is either a block node, `(PARA ...)`, or a block sequence, `((PARA ...) ...)`.
fn item_paragraph(item: &Node) -> Option<&[Node]> {
    let block = match item.as_list()? {
        [only @ Node::List(_)] => only,
        _ => item,
    };
    match NodeKind::of(block)? {
        NodeKind::Para => block.as_list().map(|list| &list[1..]),
        _ => None,
    }
}

fn render_item<'n>(enc: &mut Encoder<'n>, item: &'n Node) {
    match item_paragraph(item) {
        Some(inlines) => enc.render_children(inlines),
        None => enc.render(item),
    }
}

fn render_list<'n>(enc: &mut Encoder<'n>, tag: &str, items: &'n [Node]) {
    enc.out.start_tag(tag, &Attributes::new());
    for item in items {
        enc.out.markup("<li>");
        render_item(enc, item);
        enc.out.markup("</li>");
    }
    enc.out.end_tag(tag);
}

pub(super) fn render_list_unordered<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_list(enc, "ul", args);
}

pub(super) fn render_list_ordered<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_list(enc, "ol", args);
}

pub(super) fn render_list_quote<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    enc.out.markup("<blockquote>");
    if let [only] = args {
        render_item(enc, only);
    } else {
        for item in args {
            enc.out.markup("<p>");
            render_item(enc, item);
            enc.out.markup("</p>");
        }
    }
    enc.out.markup("</blockquote>");
}

/// `(DESCRIPTION term descriptions term descriptions ...)`
pub(super) fn render_description<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    let kind = NodeKind::Description;
    enc.out.markup("<dl>");
    for pos in (0..args.len()).step_by(2) {
        let Some(term) = enc.list_arg(kind, args, pos) else {
            return;
        };
        enc.out.markup("<dt>");
        enc.render_children(term);
        enc.out.markup("</dt>");

        if pos + 1 == args.len() {
            break;
        }
        let Some(descriptions) = enc.list_arg(kind, args, pos + 1) else {
            return;
        };
        for item in descriptions {
            enc.out.markup("<dd>");
            render_item(enc, item);
            enc.out.markup("</dd>");
        }
    }
    enc.out.markup("</dl>");
}

/// `(TABLE (header-cell ...) (cell ...) ...)`
pub(super) fn render_table<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    let kind = NodeKind::Table;
    if !enc.expect_args(kind, args, 1) {
        return;
    }
    let Some(header) = enc.list_arg(kind, args, 0) else {
        return;
    };

    enc.out.markup("<table>");
    if !header.is_empty() {
        enc.out.markup("<thead><tr>");
        for (pos, cell) in header.iter().enumerate() {
            render_table_cell(enc, cell, pos, true);
        }
        enc.out.markup("</tr></thead>");
    }
    let rows = &args[1..];
    if !rows.is_empty() {
        enc.out.markup("<tbody>");
        for pos in 0..rows.len() {
            let Some(row) = enc.list_arg(kind, rows, pos) else {
                return;
            };
            enc.out.markup("<tr>");
            for (pos, cell) in row.iter().enumerate() {
                render_table_cell(enc, cell, pos, false);
            }
            enc.out.markup("</tr>");
        }
        enc.out.markup("</tbody>");
    }
    enc.out.markup("</table>");
}

fn cell_alignment(kind: NodeKind) -> Option<Align> {
    Some(match kind {
        NodeKind::Cell => Align::Default,
        NodeKind::CellLeft => Align::Left,
        NodeKind::CellCenter => Align::Center,
        NodeKind::CellRight => Align::Right,
        _ => return None,
    })
}

/// `pos` is the column, reported 1-based on a malformed cell
fn render_table_cell<'n>(enc: &mut Encoder<'n>, cell: &'n Node, pos: usize, header: bool) {
    let align = NodeKind::of(cell).and_then(cell_alignment);
    match (align, cell.as_list()) {
        (Some(align), Some(list)) => write_cell(enc, align, header, &list[1..]),
        _ => enc.fail(EvalError::type_mismatch(
            NodeKind::Table.name(),
            pos + 1,
            "cell",
            cell.kind_name(),
        )),
    }
}

fn write_cell<'n>(enc: &mut Encoder<'n>, align: Align, header: bool, inlines: &'n [Node]) {
    let tag = start_cell(&mut enc.out, align, header);
    enc.render_children(inlines);
    enc.out.end_tag(tag);
}

pub(super) fn render_cell<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    write_cell(enc, Align::Default, false, args);
}

pub(super) fn render_cell_left<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    write_cell(enc, Align::Left, false, args);
}

pub(super) fn render_cell_center<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    write_cell(enc, Align::Center, false, args);
}

pub(super) fn render_cell_right<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    write_cell(enc, Align::Right, false, args);
}

fn render_region<'n>(enc: &mut Encoder<'n>, region: Region, kind: NodeKind, args: &'n [Node]) {
    if !enc.expect_args(kind, args, 2) {
        return;
    }
    let Some(attrs) = enc.attrs_arg(kind, args, 0) else {
        return;
    };
    let Some(blocks) = enc.list_arg(kind, args, 1) else {
        return;
    };

    let tag = region.tag();
    enc.out.start_tag(tag, &class_attributes(attrs));
    enc.render_children(blocks);
    let cite = &args[2..];
    if !cite.is_empty() {
        enc.out.markup("<cite>");
        enc.render_children(cite);
        enc.out.markup("</cite>");
    }
    enc.out.end_tag(tag);
}

pub(super) fn render_region_block<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_region(enc, Region::Block, NodeKind::RegionBlock, args);
}

pub(super) fn render_region_quote<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_region(enc, Region::Quote, NodeKind::RegionQuote, args);
}

pub(super) fn render_region_verse<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_region(enc, Region::Verse, NodeKind::RegionVerse, args);
}

fn render_verbatim<'n>(
    enc: &mut Encoder<'n>,
    verbatim: Verbatim,
    kind: NodeKind,
    args: &'n [Node],
) {
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
    write_verbatim(&mut enc.out, verbatim, attrs, text, enc.visible_space);
    enc.visible_space = saved;
}

pub(super) fn render_verbatim_code<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_verbatim(enc, Verbatim::Code, NodeKind::VerbatimCode, args);
}

pub(super) fn render_verbatim_eval<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_verbatim(enc, Verbatim::Eval, NodeKind::VerbatimEval, args);
}

pub(super) fn render_verbatim_math<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_verbatim(enc, Verbatim::Math, NodeKind::VerbatimMath, args);
}

pub(super) fn render_verbatim_zettel<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_verbatim(enc, Verbatim::Zettel, NodeKind::VerbatimZettel, args);
}

pub(super) fn render_verbatim_comment<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_verbatim(enc, Verbatim::Comment, NodeKind::VerbatimComment, args);
}

pub(super) fn render_verbatim_html<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    render_verbatim(enc, Verbatim::Html, NodeKind::VerbatimHtml, args);
}

/// `(TRANSCLUDE attrs (KIND "value"))`
pub(super) fn render_transclude<'n>(enc: &mut Encoder<'n>, args: &'n [Node]) {
    let kind = NodeKind::Transclude;
    if !enc.expect_args(kind, args, 2) {
        return;
    }
    let Some(attrs) = enc.attrs_arg(kind, args, 0) else {
        return;
    };
    let Some(reference) = enc.list_arg(kind, args, 1) else {
        return;
    };
    if !enc.expect_args(kind, reference, 2) {
        return;
    }
    let Some(target) = enc.name_arg(kind, reference, 0) else {
        return;
    };
    let Some(value) = enc.string_arg(kind, reference, 1) else {
        return;
    };
    write_transclusion(&mut enc.out, attrs, target, value);
}
