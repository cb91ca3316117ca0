//! Node kinds and the renderer dispatch table
//!
//!     Node-type symbols are mapped to a [`NodeKind`] by name and the kind indexes a fixed-size
//!     array of renderer functions. The default table is built once and cloned into every
//!     encoder, so overriding a renderer on one encoder never touches the shared default.

use super::{blocks, inlines, Encoder};
use once_cell::sync::Lazy;
use std::str::FromStr;
use strum::{EnumCount, EnumIter, EnumString, IntoStaticStr};
use zettel_sexpr::{Node, Symbol};

/// Renders the arguments of one node (everything after the type symbol)
pub type Renderer = for<'n> fn(&mut Encoder<'n>, &'n [Node]);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumCount, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING-KEBAB-CASE")]
pub enum NodeKind {
    Block,
    Inline,
    Para,
    Heading,
    Thematic,
    ListUnordered,
    ListOrdered,
    ListQuote,
    Description,
    Table,
    Cell,
    CellLeft,
    CellCenter,
    CellRight,
    RegionBlock,
    RegionQuote,
    RegionVerse,
    VerbatimCode,
    VerbatimEval,
    VerbatimMath,
    VerbatimZettel,
    VerbatimComment,
    VerbatimHtml,
    Transclude,
    Blob,
    Text,
    Space,
    Soft,
    Hard,
    LinkZettel,
    LinkSelf,
    LinkFound,
    LinkBroken,
    LinkHosted,
    LinkBased,
    LinkQuery,
    LinkExternal,
    LinkInvalid,
    Embed,
    EmbedBlob,
    Cite,
    Footnote,
    Mark,
    FormatEmph,
    FormatStrong,
    FormatDelete,
    FormatInsert,
    FormatQuote,
    FormatSpan,
    FormatSub,
    FormatSuper,
    FormatMark,
    LiteralCode,
    LiteralInput,
    LiteralOutput,
    LiteralMath,
    LiteralZettel,
    LiteralComment,
    LiteralHtml,
}

impl NodeKind {
    pub fn from_symbol(symbol: &Symbol) -> Option<Self> {
        NodeKind::from_str(symbol.name()).ok()
    }

    /// Kind of a typed list such as `(PARA ...)`
    pub fn of(node: &Node) -> Option<Self> {
        node.head_symbol().and_then(NodeKind::from_symbol)
    }

    pub fn name(self) -> &'static str {
        self.into()
    }
}

#[derive(Clone)]
pub struct DispatchTable {
    renderers: [Option<Renderer>; NodeKind::COUNT],
}

impl DispatchTable {
    /// A table with nothing bound
    pub fn empty() -> Self {
        Self {
            renderers: [None; NodeKind::COUNT],
        }
    }

    /// A fresh copy of the default bindings
    pub fn standard() -> Self {
        DEFAULT_TABLE.clone()
    }

    pub fn get(&self, kind: NodeKind) -> Option<Renderer> {
        self.renderers[kind as usize]
    }

    pub fn set(&mut self, kind: NodeKind, renderer: Renderer) {
        self.renderers[kind as usize] = Some(renderer);
    }

    pub fn remove(&mut self, kind: NodeKind) {
        self.renderers[kind as usize] = None;
    }

}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::standard()
    }
}

static DEFAULT_TABLE: Lazy<DispatchTable> = Lazy::new(|| {
    use NodeKind::*;

    let mut table = DispatchTable::empty();
    table.set(Block, blocks::render_sequence);
    table.set(Inline, blocks::render_sequence);
    table.set(Para, blocks::render_para);
    table.set(Heading, blocks::render_heading);
    table.set(Thematic, blocks::render_thematic);
    table.set(ListUnordered, blocks::render_list_unordered);
    table.set(ListOrdered, blocks::render_list_ordered);
    table.set(ListQuote, blocks::render_list_quote);
    table.set(Description, blocks::render_description);
    table.set(Table, blocks::render_table);
    table.set(Cell, blocks::render_cell);
    table.set(CellLeft, blocks::render_cell_left);
    table.set(CellCenter, blocks::render_cell_center);
    table.set(CellRight, blocks::render_cell_right);
    table.set(RegionBlock, blocks::render_region_block);
    table.set(RegionQuote, blocks::render_region_quote);
    table.set(RegionVerse, blocks::render_region_verse);
    table.set(VerbatimCode, blocks::render_verbatim_code);
    table.set(VerbatimEval, blocks::render_verbatim_eval);
    table.set(VerbatimMath, blocks::render_verbatim_math);
    table.set(VerbatimZettel, blocks::render_verbatim_zettel);
    table.set(VerbatimComment, blocks::render_verbatim_comment);
    table.set(VerbatimHtml, blocks::render_verbatim_html);
    table.set(Transclude, blocks::render_transclude);
    table.set(Blob, inlines::render_embed_blob);
    table.set(Text, inlines::render_text);
    table.set(Space, inlines::render_space);
    table.set(Soft, inlines::render_soft);
    table.set(Hard, inlines::render_hard);
    table.set(LinkZettel, inlines::render_link_zettel);
    table.set(LinkSelf, inlines::render_link_self);
    table.set(LinkFound, inlines::render_link_found);
    table.set(LinkBroken, inlines::render_link_broken);
    table.set(LinkHosted, inlines::render_link_hosted);
    table.set(LinkBased, inlines::render_link_based);
    table.set(LinkQuery, inlines::render_link_query);
    table.set(LinkExternal, inlines::render_link_external);
    table.set(LinkInvalid, inlines::render_link_invalid);
    table.set(Embed, inlines::render_embed);
    table.set(EmbedBlob, inlines::render_embed_blob);
    table.set(Cite, inlines::render_cite);
    table.set(Footnote, inlines::render_footnote);
    table.set(Mark, inlines::render_mark);
    table.set(FormatEmph, inlines::render_format_emph);
    table.set(FormatStrong, inlines::render_format_strong);
    table.set(FormatDelete, inlines::render_format_delete);
    table.set(FormatInsert, inlines::render_format_insert);
    table.set(FormatQuote, inlines::render_format_quote);
    table.set(FormatSpan, inlines::render_format_span);
    table.set(FormatSub, inlines::render_format_sub);
    table.set(FormatSuper, inlines::render_format_super);
    table.set(FormatMark, inlines::render_format_mark);
    table.set(LiteralCode, inlines::render_literal_code);
    table.set(LiteralInput, inlines::render_literal_input);
    table.set(LiteralOutput, inlines::render_literal_output);
    table.set(LiteralMath, inlines::render_literal_math);
    table.set(LiteralZettel, inlines::render_literal_zettel);
    table.set(LiteralComment, inlines::render_literal_comment);
    table.set(LiteralHtml, inlines::render_literal_html);
    table
});

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;
    use zettel_sexpr::SymbolTable;

    #[test]
    fn test_kind_names() {
        assert_eq!(NodeKind::VerbatimHtml.name(), "VERBATIM-HTML");
        assert_eq!(NodeKind::EmbedBlob.name(), "EMBED-BLOB");
        assert_eq!(NodeKind::from_str("LIST-UNORDERED"), Ok(NodeKind::ListUnordered));
    }

    #[test]
    fn test_kind_from_symbol() {
        let mut symbols = SymbolTable::new();
        let sym = symbols.intern("format-emph");
        assert_eq!(NodeKind::from_symbol(&sym), Some(NodeKind::FormatEmph));
        assert_eq!(NodeKind::from_symbol(&symbols.intern("nope")), None);
    }

    #[test]
    fn test_default_table_binds_every_kind() {
        let table = DispatchTable::standard();
        assert!(NodeKind::iter().all(|kind| table.get(kind).is_some()));
    }

    #[test]
    fn test_override_does_not_touch_default() {
        let mut table = DispatchTable::standard();
        table.remove(NodeKind::Para);

        assert!(table.get(NodeKind::Para).is_none());
        assert!(DispatchTable::standard().get(NodeKind::Para).is_some());
    }
}
