//! Format registry for format discovery and selection
//!
//! Formats are registered and retrieved by name, or picked by file extension.

use crate::error::FormatError;
use crate::format::Format;
use crate::options::RenderOptions;
use std::collections::HashMap;
use std::path::Path;

/// Registry of input formats
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::with_defaults();
/// let html = registry.render(r#"(PARA (TEXT "x"))"#, "sz", &RenderOptions::default())?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it will be replaced.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    /// Get a format by name
    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Pick a format by the extension of `path` (case-insensitive)
    pub fn for_path(&self, path: &Path) -> Result<&dyn Format, FormatError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let mut names: Vec<_> = self.formats.keys().collect();
        names.sort();
        names
            .into_iter()
            .filter_map(|name| self.formats.get(name))
            .find(|f| f.file_extensions().contains(&extension.as_str()))
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(format!(".{}", extension)))
    }

    /// Render source text using the specified format
    pub fn render(
        &self,
        source: &str,
        format: &str,
        options: &RenderOptions,
    ) -> Result<String, FormatError> {
        let fmt = self.get(format)?;
        tracing::debug!(format = fmt.name(), "rendering");
        fmt.render(source, options)
    }

    /// Create a registry with default formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        // Register built-in formats
        registry.register(crate::formats::sz::SzFormat);
        registry.register(crate::formats::zjson::ZjsonFormat);

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Format;

    // Test format
    struct TestFormat;
    impl Format for TestFormat {
        fn name(&self) -> &str {
            "test"
        }
        fn description(&self) -> &str {
            "Test format"
        }
        fn file_extensions(&self) -> &[&str] {
            &["tst"]
        }
        fn render(&self, source: &str, _options: &RenderOptions) -> Result<String, FormatError> {
            Ok(format!("<pre>{}</pre>", source))
        }
    }

    #[test]
    fn test_registry_creation() {
        let registry = FormatRegistry::new();
        assert_eq!(registry.formats.len(), 0);
    }

    #[test]
    fn test_registry_register() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        assert!(registry.has("test"));
        assert!(!registry.has("nonexistent"));
        assert_eq!(registry.list_formats(), vec!["test"]);
    }

    #[test]
    fn test_registry_get_nonexistent() {
        let registry = FormatRegistry::new();
        match registry.get("nonexistent") {
            Err(FormatError::FormatNotFound(name)) => assert_eq!(name, "nonexistent"),
            _ => panic!("Expected FormatNotFound error"),
        }
    }

    #[test]
    fn test_registry_render() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        let html = registry
            .render("x", "test", &RenderOptions::default())
            .unwrap();
        assert_eq!(html, "<pre>x</pre>");
    }

    #[test]
    fn test_registry_for_path() {
        let mut registry = FormatRegistry::with_defaults();
        registry.register(TestFormat);

        assert_eq!(registry.for_path(Path::new("a/b.TST")).unwrap().name(), "test");
        assert_eq!(registry.for_path(Path::new("note.sz")).unwrap().name(), "sz");
        assert_eq!(registry.for_path(Path::new("note.json")).unwrap().name(), "zjson");
        assert!(matches!(
            registry.for_path(Path::new("note.md")),
            Err(FormatError::FormatNotFound(ext)) if ext == ".md"
        ));
    }

    #[test]
    fn test_registry_with_defaults() {
        let registry = FormatRegistry::default();
        assert_eq!(registry.list_formats(), vec!["sz", "zjson"]);
    }

    #[test]
    fn test_registry_replace_format() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);
        registry.register(TestFormat); // Replace

        assert_eq!(registry.list_formats().len(), 1);
    }
}
