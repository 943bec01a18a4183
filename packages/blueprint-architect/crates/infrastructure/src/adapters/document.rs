use std::fs;
use std::path::Path;

use domain::entities::blueprint::BlueprintPlan;
use domain::ports::parser::{BlueprintParser, ParseError};

/// Multi-format blueprint document reader (YAML, JSON).
///
/// The default implementation of the parser port: format is detected from
/// the file extension and the document deserialized into the typed plan.
pub struct DocumentBlueprintParser;

/// Supported blueprint document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentBlueprintParser {
    pub fn new() -> Self {
        Self
    }

    /// Detect format from file extension
    pub fn detect_format(path: &Path) -> Result<DocumentFormat, ParseError> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .ok_or_else(|| {
                ParseError::UnsupportedFormat(format!("{} has no extension", path.display()))
            })?;

        match extension.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(DocumentFormat::Yaml),
            "json" => Ok(DocumentFormat::Json),
            other => Err(ParseError::UnsupportedFormat(format!(".{other}"))),
        }
    }

    /// Parse a document from a string with an explicit format
    pub fn parse_str(content: &str, format: DocumentFormat) -> Result<BlueprintPlan, ParseError> {
        match format {
            DocumentFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|error| ParseError::Malformed(error.to_string())),
            DocumentFormat::Json => serde_json::from_str(content)
                .map_err(|error| ParseError::Malformed(error.to_string())),
        }
    }
}

impl Default for DocumentBlueprintParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BlueprintParser for DocumentBlueprintParser {
    fn parse(&self, blueprint_path: &Path) -> Result<BlueprintPlan, ParseError> {
        let format = Self::detect_format(blueprint_path)?;
        let content = fs::read_to_string(blueprint_path).map_err(|source| {
            ParseError::Unreadable {
                path: blueprint_path.to_path_buf(),
                source,
            }
        })?;
        Self::parse_str(&content, format)
    }
}
