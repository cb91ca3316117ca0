//! zjson input

use crate::error::FormatError;
use crate::format::Format;
use crate::options::RenderOptions;
use crate::zjson::render_zjson_html;
use serde_json::Value;

/// A zjson block array, rendered by the zjson encoder
pub struct ZjsonFormat;

impl Format for ZjsonFormat {
    fn name(&self) -> &str {
        "zjson"
    }

    fn description(&self) -> &str {
        "Zettel tree as JSON"
    }

    fn file_extensions(&self) -> &[&str] {
        &["zjson", "json"]
    }

    fn render(&self, source: &str, options: &RenderOptions) -> Result<String, FormatError> {
        let value: Value = serde_json::from_str(source)?;
        Ok(render_zjson_html(&value, options)?)
    }
}
