//! Reader: symbolic-expression text → [`Node`]
//!
//! Grammar
//!
//!     node    := list | string | symbol
//!     list    := '(' node* ')'
//!     string  := '"' (char | escape)* '"'
//!     escape  := '\' ( 't' | 'r' | 'n' | '"' | '\' | 'x' HH | 'u' HHHH | 'U' HHHHHH | any )
//!     symbol  := any run of characters other than whitespace, parens, '"' and ';'
//!
//!     Whitespace separates tokens and `;` starts a comment running to the end of the line.
//!     Symbols are uppercased and interned through the caller's [`SymbolTable`].
//!
//!     Lists nest at most [`MAX_DEPTH`] deep; a deeper list is [`ReadError::TooDeep`].
//!
//!     A numeric escape that is cut short or names an invalid scalar value is not an error: the
//!     escape letter and whatever digits were consumed are kept as literal text.

use crate::error::ReadError;
use crate::value::{Node, SymbolTable};
use std::iter::Peekable;
use std::str::CharIndices;

/// Deepest list nesting the reader accepts, and the encoders render
pub const MAX_DEPTH: usize = 128;

/// Read the first node of `text`. Trailing input is ignored.
pub fn read(text: &str, table: &mut SymbolTable) -> Result<Node, ReadError> {
    let mut reader = Reader::new(text, table);
    reader.skip_trivia();
    if reader.chars.peek().is_none() {
        return Err(ReadError::UnexpectedEof);
    }
    reader.read_node()
}

/// Read every top-level node of `text`.
pub fn read_all(text: &str, table: &mut SymbolTable) -> Result<Vec<Node>, ReadError> {
    let mut reader = Reader::new(text, table);
    let mut nodes = Vec::new();
    loop {
        reader.skip_trivia();
        if reader.chars.peek().is_none() {
            return Ok(nodes);
        }
        nodes.push(reader.read_node()?);
    }
}

struct Reader<'t, 's> {
    chars: Peekable<CharIndices<'t>>,
    table: &'s mut SymbolTable,
    depth: usize,
}

impl<'t, 's> Reader<'t, 's> {
    fn new(text: &'t str, table: &'s mut SymbolTable) -> Self {
        Self {
            chars: text.char_indices().peekable(),
            table,
            depth: 0,
        }
    }

    fn skip_trivia(&mut self) {
        while let Some(&(_, ch)) = self.chars.peek() {
            if ch.is_whitespace() {
                self.chars.next();
            } else if ch == ';' {
                while let Some((_, ch)) = self.chars.next() {
                    if ch == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn read_node(&mut self) -> Result<Node, ReadError> {
        match self.chars.peek().copied() {
            None => Err(ReadError::UnexpectedEof),
            Some((offset, '(')) => {
                if self.depth == MAX_DEPTH {
                    return Err(ReadError::TooDeep { offset });
                }
                self.chars.next();
                self.depth += 1;
                let list = self.read_list();
                self.depth -= 1;
                list
            }
            Some((offset, ')')) => Err(ReadError::UnexpectedClose { offset }),
            Some((_, '"')) => {
                self.chars.next();
                self.read_string()
            }
            Some(_) => Ok(self.read_symbol()),
        }
    }

    fn read_list(&mut self) -> Result<Node, ReadError> {
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            match self.chars.peek() {
                None => return Err(ReadError::UnexpectedEof),
                Some(&(_, ')')) => {
                    self.chars.next();
                    return Ok(Node::List(items));
                }
                Some(_) => items.push(self.read_node()?),
            }
        }
    }

    fn read_string(&mut self) -> Result<Node, ReadError> {
        let mut text = String::new();
        loop {
            let (_, ch) = self.chars.next().ok_or(ReadError::UnexpectedEof)?;
            match ch {
                '"' => return Ok(Node::String(text)),
                '\\' => {
                    let (_, escaped) = self.chars.next().ok_or(ReadError::UnexpectedEof)?;
                    match escaped {
                        't' => text.push('\t'),
                        'r' => text.push('\r'),
                        'n' => text.push('\n'),
                        'x' => self.read_hex_escape(&mut text, 'x', 2),
                        'u' => self.read_hex_escape(&mut text, 'u', 4),
                        'U' => self.read_hex_escape(&mut text, 'U', 6),
                        other => text.push(other),
                    }
                }
                other => text.push(other),
            }
        }
    }

    fn read_hex_escape(&mut self, text: &mut String, letter: char, width: usize) {
        let mut digits = String::with_capacity(width);
        while digits.len() < width {
            match self.chars.peek() {
                Some(&(_, ch)) if ch.is_ascii_hexdigit() => {
                    digits.push(ch);
                    self.chars.next();
                }
                _ => break,
            }
        }

        let decoded = if digits.len() == width {
            u32::from_str_radix(&digits, 16)
                .ok()
                .and_then(char::from_u32)
        } else {
            None
        };

        match decoded {
            Some(ch) => text.push(ch),
            None => {
                text.push(letter);
                text.push_str(&digits);
            }
        }
    }

    fn read_symbol(&mut self) -> Node {
        let mut name = String::new();
        while let Some(&(_, ch)) = self.chars.peek() {
            if ch.is_whitespace() || matches!(ch, '(' | ')' | '"' | ';') {
                break;
            }
            name.push(ch);
            self.chars.next();
        }
        Node::Symbol(self.table.intern(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn read_str(text: &str) -> Result<Node, ReadError> {
        let mut table = SymbolTable::new();
        read(text, &mut table)
    }

    #[test]
    fn test_read_symbol_is_uppercased() {
        let node = read_str("para").unwrap();
        assert_eq!(node.as_symbol().unwrap().name(), "PARA");
    }

    #[test]
    fn test_read_nested_list() {
        let node = read_str(r#"(PARA (TEXT "Hello") (FORMAT-EMPH () (TEXT "world")))"#).unwrap();
        let items = node.as_list().unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_symbol().unwrap().name(), "PARA");
        let emph = items[2].as_list().unwrap();
        assert!(emph[1].is_nil());
    }

    #[test]
    fn test_read_interns_through_table() {
        let mut table = SymbolTable::new();
        let node = read("(text Text TEXT)", &mut table).unwrap();
        let items = node.as_list().unwrap();

        assert_eq!(items[0], items[1]);
        assert_eq!(items[1], items[2]);
        assert_eq!(table.len(), 1);
    }

    #[rstest]
    #[case::named(r#""a\tb\nc\r\"d\\e""#, "a\tb\nc\r\"d\\e")]
    #[case::numeric(r#""\x41é\U01F600""#, "Aé😀")]
    #[case::bad_hex(r#""\xZZ""#, "xZZ")]
    #[case::short_unicode(r#""\u12""#, "u12")]
    #[case::surrogate(r#""\uD800""#, "uD800")]
    #[case::unknown(r#""\q""#, "q")]
    fn test_string_escapes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(read_str(input).unwrap().as_str(), Some(expected));
    }

    #[test]
    fn test_unterminated_list() {
        assert_eq!(read_str("(PARA (TEXT \"x\")"), Err(ReadError::UnexpectedEof));
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(read_str("(TEXT \"x)"), Err(ReadError::UnexpectedEof));
        assert_eq!(read_str("\"x\\"), Err(ReadError::UnexpectedEof));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(read_str("   ; only a comment\n"), Err(ReadError::UnexpectedEof));
    }

    #[test]
    fn test_stray_close() {
        assert_eq!(
            read_str("  )"),
            Err(ReadError::UnexpectedClose { offset: 2 })
        );
    }

    #[test]
    fn test_nesting_at_the_limit() {
        let text = format!("{}{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        let mut node = read_str(&text).unwrap();
        let mut depth = 0;
        while let Node::List(mut items) = node {
            depth += 1;
            match items.pop() {
                Some(inner) => node = inner,
                None => break,
            }
        }
        assert_eq!(depth, MAX_DEPTH);
    }

    #[test]
    fn test_nesting_past_the_limit() {
        let text = format!("{}{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert_eq!(read_str(&text), Err(ReadError::TooDeep { offset: MAX_DEPTH }));

        let text = format!("{}{}", "(".repeat(200_000), ")".repeat(200_000));
        assert_eq!(read_str(&text), Err(ReadError::TooDeep { offset: MAX_DEPTH }));
    }

    #[test]
    fn test_comments_are_skipped() {
        let node = read_str("; heading\n(PARA ; inline\n (TEXT \"x\"))").unwrap();
        assert_eq!(node.to_string(), r#"(PARA (TEXT "x"))"#);
    }

    #[test]
    fn test_read_all() {
        let mut table = SymbolTable::new();
        let nodes = read_all("(THEMATIC) (PARA) \"s\" sym", &mut table).unwrap();
        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[3].as_symbol().unwrap().name(), "SYM");
    }

    #[test]
    fn test_symbol_stops_at_quote_and_paren() {
        let node = read_str(r#"(a"b"c)"#).unwrap();
        assert_eq!(node.to_string(), r#"(A "b" C)"#);
    }
}
