//! Node model: symbols, strings and lists
//!
//!     Symbols are interned through a [`SymbolTable`]. The table uppercases the text before
//!     interning, so `para`, `Para` and `PARA` all come back as the same [`Symbol`], and two
//!     symbols compare by identity rather than by text. The table is an explicit object: a
//!     reader and everything that builds symbols for the same tree should share one.
//!
//!     The `Display` impl on [`Node`] is the printer. Its output reads back to an equal tree.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// An interned, uppercase atom
#[derive(Clone)]
pub struct Symbol(Rc<str>);

impl Symbol {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as *const u8 as usize).hash(state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Interner handing out one [`Symbol`] per distinct (case-insensitive) name
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: HashSet<Rc<str>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the symbol for `text`, creating it on first use.
    pub fn intern(&mut self, text: &str) -> Symbol {
        let name = text.to_uppercase();
        if let Some(existing) = self.symbols.get(name.as_str()) {
            return Symbol(existing.clone());
        }
        let rc: Rc<str> = Rc::from(name);
        self.symbols.insert(rc.clone());
        Symbol(rc)
    }

    /// Look up an already interned symbol without creating it.
    pub fn get(&self, text: &str) -> Option<Symbol> {
        self.symbols
            .get(text.to_uppercase().as_str())
            .map(|rc| Symbol(rc.clone()))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// A tree value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Symbol(Symbol),
    String(String),
    List(Vec<Node>),
}

impl Node {
    pub fn symbol(symbol: Symbol) -> Self {
        Node::Symbol(symbol)
    }

    pub fn string(text: impl Into<String>) -> Self {
        Node::String(text.into())
    }

    pub fn list(items: Vec<Node>) -> Self {
        Node::List(items)
    }

    /// The empty list
    pub fn nil() -> Self {
        Node::List(Vec::new())
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Node::Symbol(sym) => Some(sym),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Node::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Node::List(items) if items.is_empty())
    }

    /// The head symbol of a typed list, e.g. `PARA` for `(PARA ...)`
    pub fn head_symbol(&self) -> Option<&Symbol> {
        self.as_list()
            .and_then(|items| items.first())
            .and_then(Node::as_symbol)
    }

    /// Node kind, for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Symbol(_) => "symbol",
            Node::String(_) => "string",
            Node::List(_) => "list",
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Symbol(sym) => f.write_str(sym.name()),
            Node::String(text) => write_quoted(f, text),
            Node::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    f.write_str("\"")?;
    for ch in text.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            _ => write!(f, "{}", ch)?,
        }
    }
    f.write_str("\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_is_case_insensitive() {
        let mut table = SymbolTable::new();
        let a = table.intern("para");
        let b = table.intern("PARA");
        let c = table.intern("Para");

        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.name(), "PARA");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_symbols_from_different_tables_differ() {
        let mut first = SymbolTable::new();
        let mut second = SymbolTable::new();

        assert_ne!(first.intern("TEXT"), second.intern("TEXT"));
    }

    #[test]
    fn test_get_does_not_intern() {
        let mut table = SymbolTable::new();
        assert!(table.get("text").is_none());
        let sym = table.intern("text");
        assert_eq!(table.get("Text"), Some(sym));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_print_list() {
        let mut table = SymbolTable::new();
        let node = Node::list(vec![
            Node::Symbol(table.intern("text")),
            Node::string("a \"quoted\"\nline\\"),
            Node::nil(),
        ]);

        assert_eq!(
            node.to_string(),
            r#"(TEXT "a \"quoted\"\nline\\" ())"#
        );
    }

    #[test]
    fn test_head_symbol() {
        let mut table = SymbolTable::new();
        let para = table.intern("PARA");
        let node = Node::list(vec![Node::Symbol(para.clone())]);

        assert_eq!(node.head_symbol(), Some(&para));
        assert!(Node::nil().head_symbol().is_none());
        assert!(Node::string("x").head_symbol().is_none());
    }
}
