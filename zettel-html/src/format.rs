//! Format trait definition
//!
//! A format knows how to turn one input representation of a zettel body into HTML.

use crate::error::FormatError;
use crate::options::RenderOptions;

/// An input representation that can be rendered to HTML
///
/// # Examples
///
/// ```ignore
/// struct Upper;
///
/// impl Format for Upper {
///     fn name(&self) -> &str {
///         "upper"
///     }
///
///     fn render(&self, source: &str, _options: &RenderOptions) -> Result<String, FormatError> {
///         Ok(source.to_uppercase())
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "sz", "zjson")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions (without the dot) that select this format
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Render source text to an HTML fragment
    fn render(&self, source: &str, options: &RenderOptions) -> Result<String, FormatError>;
}
