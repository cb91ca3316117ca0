//! Property-based tests for the reader and printer
//!
//! Trees built from lists, strings and symbols must survive print → read → print unchanged.

use proptest::prelude::*;
use zettel_sexpr::{read, Node, SymbolTable};

/// Table-independent description of a tree, turned into real nodes per test case.
#[derive(Debug, Clone)]
enum Shape {
    Symbol(String),
    String(String),
    List(Vec<Shape>),
}

impl Shape {
    fn build(&self, table: &mut SymbolTable) -> Node {
        match self {
            Shape::Symbol(name) => Node::Symbol(table.intern(name)),
            Shape::String(text) => Node::string(text.clone()),
            Shape::List(items) => Node::list(items.iter().map(|item| item.build(table)).collect()),
        }
    }
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    let leaf = prop_oneof![
        "[A-Za-z][A-Za-z0-9*+!<>=-]{0,12}".prop_map(Shape::Symbol),
        any::<String>().prop_map(Shape::String),
    ];
    leaf.prop_recursive(4, 64, 8, |inner| {
        prop::collection::vec(inner, 0..8).prop_map(Shape::List)
    })
}

proptest! {
    #[test]
    fn test_print_read_roundtrip(shape in shape_strategy()) {
        let mut table = SymbolTable::new();
        let tree = shape.build(&mut table);
        let printed = tree.to_string();

        let reread = read(&printed, &mut table);
        prop_assert!(reread.is_ok(), "Failed to read back: {}", printed);
        let reread = reread.unwrap();

        prop_assert_eq!(reread.to_string(), printed);
        prop_assert_eq!(reread, tree);
    }

    #[test]
    fn test_reader_never_panics(text in "[()\" a-z\\\\;\n]{0,40}") {
        let mut table = SymbolTable::new();
        let _ = read(&text, &mut table);
    }
}
