//! Engine configuration

use serde::{Deserialize, Serialize};

use super::{EDITABLE_ATTRIBUTE, PLACEHOLDER_HTML};

/// Settings shared by the extractor, serializer and editor session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Attribute written onto editable elements
    pub editable_attribute: String,
    /// Document substituted for an empty block list
    pub placeholder_html: String,
    /// Separator placed between blocks when serializing
    pub block_separator: String,
}

impl EngineConfig {
    /// Parse a configuration from JSON; an empty string yields the defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            editable_attribute: EDITABLE_ATTRIBUTE.to_string(),
            placeholder_html: PLACEHOLDER_HTML.to_string(),
            block_separator: "\n".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        assert_eq!(EngineConfig::from_json("  ").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = EngineConfig::from_json(r#"{"block_separator": ""}"#).unwrap();
        assert_eq!(config.block_separator, "");
        assert_eq!(config.editable_attribute, "data-editable");
        assert_eq!(config.placeholder_html, PLACEHOLDER_HTML);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(EngineConfig::from_json("{not json").is_err());
    }
}
