//! zjson: zettel trees as JSON
//!
//!     The same document the symbolic encoder reads as `(PARA (TEXT "x"))` arrives here as
//!     `[{"t": "Para", "i": [{"t": "Text", "s": "x"}]}]`. Objects carry their type in `t` and
//!     their payload in one-letter fields:
//!
//!     | key | payload |
//!     |-----|---------|
//!     | `b` | block array |
//!     | `i` | inline array |
//!     | `c` | items: an array of block arrays |
//!     | `a` | attributes object |
//!     | `s` | string |
//!     | `n` | number (heading level) |
//!     | `q` | secondary string: fragment, link state or syntax |
//!     | `l` | slug |
//!     | `g` | description list, `[{"i": term, "e": [item...]}]` |
//!     | `p` | table, `[header cells, [row...]]` |
//!     | `o` | BLOB data |
//!     | `r` | reference, `{"t": kind, "s": value}` |
//!
//! # Traversal
//!
//!     A [`Visitor`] is told about every array and object on the way down. Object hooks return
//!     whether to descend into the standard children (`b`, `c`, then `i`) and optionally a
//!     closure that runs once those children are done. Visitors that need another order return
//!     `false` and call the `walk_*` functions themselves.

pub mod encoder;

use serde_json::{Map, Value};

pub use encoder::{render_zjson_html, render_zjson_inline_html, ZjsonEncoder};

pub const TYPE: &str = "t";
pub const BLOCKS: &str = "b";
pub const INLINES: &str = "i";
pub const ITEMS: &str = "c";
pub const ATTRS: &str = "a";
pub const STRING: &str = "s";
pub const NUMBER: &str = "n";
pub const SECONDARY: &str = "q";
pub const SLUG: &str = "l";
pub const DESCRIPTIONS: &str = "g";
pub const DESCRIPTION_ITEMS: &str = "e";
pub const TABLE: &str = "p";
pub const BLOB: &str = "o";
pub const REFERENCE: &str = "r";

/// Runs after the children of an array or object have been walked
pub type CloseFn<'v, V> = Box<dyn FnOnce(&mut V) + 'v>;

pub trait Visitor<'v>: Sized {
    fn block_array(&mut self, _blocks: &'v [Value], _pos: usize) -> Option<CloseFn<'v, Self>> {
        None
    }

    fn inline_array(&mut self, _inlines: &'v [Value], _pos: usize) -> Option<CloseFn<'v, Self>> {
        None
    }

    /// Called for every item (a block array) of a list, before its blocks are walked
    fn item_array(&mut self, _item: &'v [Value], _pos: usize) -> Option<CloseFn<'v, Self>> {
        None
    }

    fn block_object(
        &mut self,
        kind: &'v str,
        obj: &'v Map<String, Value>,
        pos: usize,
    ) -> (bool, Option<CloseFn<'v, Self>>);

    fn inline_object(
        &mut self,
        kind: &'v str,
        obj: &'v Map<String, Value>,
        pos: usize,
    ) -> (bool, Option<CloseFn<'v, Self>>);

    /// A value did not have the expected shape.
    fn unexpected(&mut self, value: &'v Value, pos: usize, expected: &'static str);
}

/// The `t` field and the object, if `value` is a typed object
pub fn typed_object(value: &Value) -> Option<(&str, &Map<String, Value>)> {
    let obj = value.as_object()?;
    let kind = obj.get(TYPE)?.as_str()?;
    Some((kind, obj))
}

/// JSON type name, for error messages
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub fn walk_block_array<'v, V: Visitor<'v>>(visitor: &mut V, value: &'v Value, pos: usize) {
    let Some(blocks) = value.as_array() else {
        visitor.unexpected(value, pos, "block array");
        return;
    };
    let close = visitor.block_array(blocks, pos);
    for (index, block) in blocks.iter().enumerate() {
        walk_block(visitor, block, index);
    }
    if let Some(close) = close {
        close(visitor);
    }
}

pub fn walk_block<'v, V: Visitor<'v>>(visitor: &mut V, value: &'v Value, pos: usize) {
    let Some((kind, obj)) = typed_object(value) else {
        visitor.unexpected(value, pos, "block object");
        return;
    };
    let (descend, close) = visitor.block_object(kind, obj, pos);
    if descend {
        if let Some(blocks) = obj.get(BLOCKS) {
            walk_block_array(visitor, blocks, 0);
        }
        if let Some(items) = obj.get(ITEMS) {
            walk_items(visitor, items, 0);
        }
        if let Some(inlines) = obj.get(INLINES) {
            walk_inline_array(visitor, inlines, 0);
        }
    }
    if let Some(close) = close {
        close(visitor);
    }
}

pub fn walk_inline_array<'v, V: Visitor<'v>>(visitor: &mut V, value: &'v Value, pos: usize) {
    let Some(inlines) = value.as_array() else {
        visitor.unexpected(value, pos, "inline array");
        return;
    };
    let close = visitor.inline_array(inlines, pos);
    for (index, inline) in inlines.iter().enumerate() {
        walk_inline(visitor, inline, index);
    }
    if let Some(close) = close {
        close(visitor);
    }
}

pub fn walk_inline<'v, V: Visitor<'v>>(visitor: &mut V, value: &'v Value, pos: usize) {
    let Some((kind, obj)) = typed_object(value) else {
        visitor.unexpected(value, pos, "inline object");
        return;
    };
    let (descend, close) = visitor.inline_object(kind, obj, pos);
    if descend {
        if let Some(inlines) = obj.get(INLINES) {
            walk_inline_array(visitor, inlines, 0);
        }
    }
    if let Some(close) = close {
        close(visitor);
    }
}

/// Walk an array of items.
pub fn walk_items<'v, V: Visitor<'v>>(visitor: &mut V, value: &'v Value, pos: usize) {
    let Some(items) = value.as_array() else {
        visitor.unexpected(value, pos, "item array");
        return;
    };
    for (index, item) in items.iter().enumerate() {
        walk_item(visitor, item, index);
    }
}

/// Walk a single item, a block array.
pub fn walk_item<'v, V: Visitor<'v>>(visitor: &mut V, value: &'v Value, pos: usize) {
    let Some(blocks) = value.as_array() else {
        visitor.unexpected(value, pos, "item");
        return;
    };
    let close = visitor.item_array(blocks, pos);
    for (index, block) in blocks.iter().enumerate() {
        walk_block(visitor, block, index);
    }
    if let Some(close) = close {
        close(visitor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Records the traversal as a flat trace
    #[derive(Default)]
    struct Trace {
        events: Vec<String>,
    }

    impl<'v> Visitor<'v> for Trace {
        fn block_array(&mut self, blocks: &'v [Value], _pos: usize) -> Option<CloseFn<'v, Self>> {
            self.events.push(format!("blocks({})", blocks.len()));
            Some(Box::new(|trace: &mut Trace| trace.events.push("/blocks".into())))
        }

        fn item_array(&mut self, _item: &'v [Value], pos: usize) -> Option<CloseFn<'v, Self>> {
            self.events.push(format!("item {}", pos));
            None
        }

        fn block_object(
            &mut self,
            kind: &'v str,
            _obj: &'v Map<String, Value>,
            _pos: usize,
        ) -> (bool, Option<CloseFn<'v, Self>>) {
            self.events.push(kind.to_string());
            let close = move |trace: &mut Trace| trace.events.push(format!("/{}", kind));
            (kind != "CodeBlock", Some(Box::new(close)))
        }

        fn inline_object(
            &mut self,
            kind: &'v str,
            _obj: &'v Map<String, Value>,
            _pos: usize,
        ) -> (bool, Option<CloseFn<'v, Self>>) {
            self.events.push(kind.to_string());
            (true, None)
        }

        fn unexpected(&mut self, value: &'v Value, pos: usize, expected: &'static str) {
            self.events.push(format!("unexpected {} at {}: {}", expected, pos, json_kind(value)));
        }
    }

    #[test]
    fn test_walk_order() {
        let doc = json!([
            {"t": "Para", "i": [
                {"t": "Text", "s": "a"},
                {"t": "Emph", "i": [{"t": "Text", "s": "b"}]}
            ]},
            {"t": "Bullet", "c": [[{"t": "Para", "i": []}], []]},
            {"t": "CodeBlock", "s": "x", "b": [{"t": "Para"}]}
        ]);
        let mut trace = Trace::default();
        walk_block_array(&mut trace, &doc, 0);

        assert_eq!(
            trace.events,
            vec![
                "blocks(3)", "Para", "Text", "Emph", "Text", "/Para", "Bullet", "item 0", "Para",
                "/Para", "item 1", "/Bullet", "CodeBlock", "/CodeBlock", "/blocks",
            ]
        );
    }

    #[test]
    fn test_unexpected_shapes() {
        let doc = json!([{"t": "Para", "i": "oops"}, 7]);
        let mut trace = Trace::default();
        walk_block_array(&mut trace, &doc, 0);

        assert_eq!(
            trace.events,
            vec![
                "blocks(2)",
                "Para",
                "unexpected inline array at 0: string",
                "/Para",
                "unexpected block object at 1: number",
                "/blocks",
            ]
        );
    }

    #[test]
    fn test_typed_object() {
        let value = json!({"t": "Text", "s": "x"});
        assert_eq!(typed_object(&value).map(|(kind, _)| kind), Some("Text"));
        assert!(typed_object(&json!({"s": "x"})).is_none());
        assert!(typed_object(&json!({"t": 1})).is_none());
    }
}
