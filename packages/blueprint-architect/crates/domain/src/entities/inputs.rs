use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{CoreError, CoreResult};

/// Source forms accepted for deployment inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum DeploymentInputs {
    /// An explicit flat mapping, used as-is.
    Map(BTreeMap<String, Value>),

    /// A literal to be normalized: a path to a YAML document, an inline
    /// `key=value;key=value` string, or a raw YAML string.
    Literal(String),
}

impl Default for DeploymentInputs {
    fn default() -> Self {
        DeploymentInputs::Map(BTreeMap::new())
    }
}

impl From<BTreeMap<String, Value>> for DeploymentInputs {
    fn from(map: BTreeMap<String, Value>) -> Self {
        DeploymentInputs::Map(map)
    }
}

impl From<&str> for DeploymentInputs {
    fn from(literal: &str) -> Self {
        DeploymentInputs::Literal(literal.to_owned())
    }
}

/// Normalize deployment inputs to a flat mapping.
///
/// A literal is tried as a file path, then as a `key=value;key=value` string,
/// then as raw YAML; the first form that parses wins. The result must be a
/// mapping at the top level.
pub fn normalize(inputs: &DeploymentInputs) -> CoreResult<BTreeMap<String, Value>> {
    match inputs {
        DeploymentInputs::Map(map) => Ok(map.clone()),
        DeploymentInputs::Literal(literal) => normalize_literal(literal),
    }
}

fn normalize_literal(literal: &str) -> CoreResult<BTreeMap<String, Value>> {
    let literal = literal.trim();
    if literal.is_empty() {
        return Ok(BTreeMap::new());
    }

    let candidate = Path::new(literal);
    if candidate.exists() {
        let content = fs::read_to_string(candidate).map_err(|error| {
            CoreError::InvalidInput(format!(
                "cannot read inputs file '{}': {}",
                candidate.display(),
                error
            ))
        })?;
        return mapping_from_yaml(&content, literal);
    }

    if let Some(map) = key_value_pairs(literal) {
        return Ok(map);
    }

    mapping_from_yaml(literal, literal)
}

/// Parse an inline `key1=value1;key2=value2` string. Returns `None` when the
/// literal does not fit that shape, so the caller can fall through to YAML.
fn key_value_pairs(literal: &str) -> Option<BTreeMap<String, Value>> {
    let mut map = BTreeMap::new();
    for pair in literal.split(';') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=')?;
        if key.trim().is_empty() || value.contains('=') {
            return None;
        }
        map.insert(
            key.trim().to_owned(),
            Value::String(value.trim().to_owned()),
        );
    }
    Some(map)
}

fn mapping_from_yaml(content: &str, described_as: &str) -> CoreResult<BTreeMap<String, Value>> {
    let parsed: serde_yaml::Value = serde_yaml::from_str(content)
        .map_err(|error| CoreError::InvalidInput(format!("'{described_as}': {error}")))?;
    let json: Value = serde_json::to_value(parsed)
        .map_err(|error| CoreError::InvalidInput(format!("'{described_as}': {error}")))?;

    match json {
        Value::Object(object) => Ok(object.into_iter().collect()),
        _ => Err(CoreError::InvalidInput(format!(
            "invalid inputs: '{described_as}' must represent a mapping. Valid values are a path \
             to a YAML file, a string formatted as YAML, or a string formatted as \
             key1=value1;key2=value2"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_inline_key_value_string() {
        let inputs = normalize(&DeploymentInputs::from("a=1;b=2")).unwrap();
        assert_eq!(inputs.get("a"), Some(&Value::String("1".into())));
        assert_eq!(inputs.get("b"), Some(&Value::String("2".into())));
    }

    #[test]
    fn test_yaml_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inputs.yaml");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(b"x: 1").unwrap();

        let inputs = normalize(&DeploymentInputs::Literal(path.display().to_string())).unwrap();
        assert_eq!(inputs.get("x"), Some(&Value::from(1)));
    }

    #[test]
    fn test_raw_yaml_string() {
        let inputs = normalize(&DeploymentInputs::from("port: 8080\nhost: localhost")).unwrap();
        assert_eq!(inputs.get("port"), Some(&Value::from(8080)));
        assert_eq!(inputs.get("host"), Some(&Value::String("localhost".into())));
    }

    #[test]
    fn test_non_mapping_document_is_rejected() {
        let error = normalize(&DeploymentInputs::from("- just\n- a\n- list")).unwrap_err();
        assert!(matches!(error, CoreError::InvalidInput(_)));
    }

    #[test]
    fn test_empty_literal_is_empty_mapping() {
        let inputs = normalize(&DeploymentInputs::from("  ")).unwrap();
        assert!(inputs.is_empty());
    }

    #[test]
    fn test_explicit_mapping_wins_over_parsing() {
        let mut map = BTreeMap::new();
        map.insert("k".to_owned(), Value::from(true));
        let inputs = normalize(&DeploymentInputs::Map(map.clone())).unwrap();
        assert_eq!(inputs, map);
    }
}
