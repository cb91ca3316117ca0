//! Node attributes
//!
//!     A string → string map with two reserved keys:
//!
//!     - `""`: the default attribute, a positional value such as a CSS class or a language
//!     - `"-"`: a flag without a value
//!
//!     Neither reserved key is ever emitted as an HTML attribute. Keys are kept sorted so output
//!     is deterministic.
//!
//!     Symbolic form: `()` or a list of pairs, `(("" "go") ("-") ("title" "x"))`.
//!     zjson form: an object, `{"": "go", "-": "", "title": "x"}`.

use serde_json::Value;
use std::collections::BTreeMap;
use zettel_sexpr::Node;

pub const DEFAULT_KEY: &str = "";
pub const FLAG_KEY: &str = "-";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(BTreeMap<String, String>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the symbolic form. Returns `None` when the node is not a list of string pairs.
    pub fn from_node(node: &Node) -> Option<Self> {
        let mut attrs = Self::new();
        for pair in node.as_list()? {
            match pair.as_list()? {
                [key] => attrs.set(key.as_str()?, ""),
                [key, value] => attrs.set(key.as_str()?, value.as_str()?),
                _ => return None,
            }
        }
        Some(attrs)
    }

    /// Parse the zjson form. Non-string values are rejected.
    pub fn from_json(value: &Value) -> Option<Self> {
        let mut attrs = Self::new();
        for (key, value) in value.as_object()? {
            attrs.set(key, value.as_str()?);
        }
        Some(attrs)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn has(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// The default attribute, if present and non-empty
    pub fn default_value(&self) -> Option<&str> {
        self.get(DEFAULT_KEY).filter(|value| !value.is_empty())
    }

    pub fn has_flag(&self) -> bool {
        self.has(FLAG_KEY)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style [`Attributes::set`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Set `key` only when it is absent.
    pub fn set_default(&mut self, key: &str, value: impl Into<String>) {
        self.0.entry(key.to_string()).or_insert_with(|| value.into());
    }

    /// Prepend a class to the existing `class` attribute.
    pub fn add_class(&mut self, class: &str) {
        let merged = match self.get("class") {
            Some(existing) if !existing.is_empty() => format!("{} {}", class, existing),
            _ => class.to_string(),
        };
        self.set("class", merged);
    }

    /// Emittable `(key, value)` pairs in key order, reserved keys skipped
    pub fn emittable(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter(|(key, _)| key.as_str() != DEFAULT_KEY && key.as_str() != FLAG_KEY)
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for (key, value) in iter {
            attrs.set(key, value);
        }
        attrs
    }
}
