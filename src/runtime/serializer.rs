//! Block Serializer - blocks back to HTML
//!
//! Joins block contents in position order. No parsing or validation happens
//! here; re-extraction is left to whoever needs it.

use crate::core::block::Block;
use crate::core::config::EngineConfig;

/// Join blocks into one document using the given configuration.
///
/// An empty list yields the placeholder document, never an empty string.
pub fn serialize_with(blocks: &[Block], config: &EngineConfig) -> String {
    if blocks.is_empty() {
        return config.placeholder_html.clone();
    }

    let mut ordered: Vec<&Block> = blocks.iter().collect();
    ordered.sort_by_key(|b| b.position);

    ordered
        .iter()
        .map(|b| b.content.as_str())
        .collect::<Vec<_>>()
        .join(&config.block_separator)
}

/// Join blocks into one document with the default configuration
pub fn serialize_blocks(blocks: &[Block]) -> String {
    serialize_with(blocks, &EngineConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::block::BlockType;
    use crate::core::PLACEHOLDER_HTML;

    fn block(content: &str, position: usize) -> Block {
        Block::new(format!("b{position}").as_str().into(), BlockType::Container, content, position)
    }

    #[test]
    fn test_joins_in_position_order() {
        let blocks = vec![block("<p>b</p>", 1), block("<p>a</p>", 0), block("<p>c</p>", 2)];
        assert_eq!(serialize_blocks(&blocks), "<p>a</p>\n<p>b</p>\n<p>c</p>");
    }

    #[test]
    fn test_empty_list_is_placeholder() {
        assert_eq!(serialize_blocks(&[]), PLACEHOLDER_HTML);
    }

    #[test]
    fn test_custom_separator() {
        let config = EngineConfig {
            block_separator: String::new(),
            ..EngineConfig::default()
        };
        let blocks = vec![block("<p>a</p>", 0), block("<p>b</p>", 1)];
        assert_eq!(serialize_with(&blocks, &config), "<p>a</p><p>b</p>");
    }
}
