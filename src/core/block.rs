//! Block type and related types
//!
//! This module defines the unit of editable template markup, the closed
//! vocabulary of block types, and the error type shared by the block engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a block within a document.
///
/// Ids have the shape `{type}-{timestamp}-{position}` and are never reused
/// after the block is removed (see [`crate::runtime::clock::IdGenerator`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub String);

impl BlockId {
    /// Build an id from its three components
    pub fn compose(block_type: BlockType, timestamp: u64, position: usize) -> Self {
        BlockId(format!("{}-{}-{}", block_type.as_str(), timestamp, position))
    }

    /// Borrow the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(value: &str) -> Self {
        BlockId(value.to_string())
    }
}

/// Block types
///
/// The full vocabulary the classifier can produce. Anything that no rule
/// matches becomes [`BlockType::Container`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    /// Listing title (`ebay-title` and vendor-prefixed `-title` variants)
    EbayTitle,
    /// Price container or badge
    EbayPrice,
    /// Image gallery or main image section
    EbayGallery,
    /// Long-form item description
    EbayDescription,
    /// Product name placeholder from the product-data feed
    BlProductName,
    /// Price placeholder from the product-data feed
    BlPrice,
    /// Image placeholders from the product-data feed
    BlImages,
    /// Two-column separator layout
    #[serde(rename = "separator-2col")]
    Separator2Col,
    /// Three-column separator layout
    #[serde(rename = "separator-3col")]
    Separator3Col,
    /// Four-column separator layout
    #[serde(rename = "separator-4col")]
    Separator4Col,
    /// Any other separator (line, spacer, image+text)
    SeparatorLine,
    /// Brand, producer or logo section
    BrandSection,
    /// Feature, benefit or highlight list
    ProductFeatures,
    /// Specification table
    SpecTable,
    /// Shipping and delivery information
    ShippingInfo,
    /// Care instructions
    CareInstructions,
    /// Bare image
    Image,
    /// Ordered or unordered list
    List,
    /// Page header
    HeaderSection,
    /// Page footer
    FooterSection,
    /// Generic section
    Section,
    /// Catch-all for unmatched markup
    Container,
}

impl BlockType {
    /// Every block type, in declaration order
    pub const ALL: [BlockType; 22] = [
        BlockType::EbayTitle,
        BlockType::EbayPrice,
        BlockType::EbayGallery,
        BlockType::EbayDescription,
        BlockType::BlProductName,
        BlockType::BlPrice,
        BlockType::BlImages,
        BlockType::Separator2Col,
        BlockType::Separator3Col,
        BlockType::Separator4Col,
        BlockType::SeparatorLine,
        BlockType::BrandSection,
        BlockType::ProductFeatures,
        BlockType::SpecTable,
        BlockType::ShippingInfo,
        BlockType::CareInstructions,
        BlockType::Image,
        BlockType::List,
        BlockType::HeaderSection,
        BlockType::FooterSection,
        BlockType::Section,
        BlockType::Container,
    ];

    /// Stable string tag, as used in block ids and JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::EbayTitle => "ebay-title",
            BlockType::EbayPrice => "ebay-price",
            BlockType::EbayGallery => "ebay-gallery",
            BlockType::EbayDescription => "ebay-description",
            BlockType::BlProductName => "bl-product-name",
            BlockType::BlPrice => "bl-price",
            BlockType::BlImages => "bl-images",
            BlockType::Separator2Col => "separator-2col",
            BlockType::Separator3Col => "separator-3col",
            BlockType::Separator4Col => "separator-4col",
            BlockType::SeparatorLine => "separator-line",
            BlockType::BrandSection => "brand-section",
            BlockType::ProductFeatures => "product-features",
            BlockType::SpecTable => "spec-table",
            BlockType::ShippingInfo => "shipping-info",
            BlockType::CareInstructions => "care-instructions",
            BlockType::Image => "image",
            BlockType::List => "list",
            BlockType::HeaderSection => "header-section",
            BlockType::FooterSection => "footer-section",
            BlockType::Section => "section",
            BlockType::Container => "container",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = BlockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| BlockError::UnknownBlockType(s.to_string()))
    }
}

/// A unit of editable content extracted from a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Unique id within the document
    pub id: BlockId,
    /// Classification of the block's root element
    #[serde(rename = "type")]
    pub block_type: BlockType,
    /// Serialized outer markup of the root element
    pub content: String,
    /// Zero-based position in the backing list
    pub position: usize,
}

impl Block {
    /// Create a new block
    pub fn new(id: BlockId, block_type: BlockType, content: impl Into<String>, position: usize) -> Self {
        Self {
            id,
            block_type,
            content: content.into(),
            position,
        }
    }

    /// Whether this block's root element is flagged as the empty-state
    /// placeholder (`data-placeholder="true"`)
    pub fn is_placeholder(&self) -> bool {
        super::markup::root_element(&self.content)
            .and_then(|root| super::markup::attribute_value(&root, super::PLACEHOLDER_ATTRIBUTE))
            .map_or(false, |value| value == "true")
    }
}

/// Block engine errors
///
/// The plain mutation entry points never return these; they are surfaced by
/// the `try_*` variants and by lookups that name something that doesn't exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockError {
    /// Index outside the current block list
    #[error("Index {index} out of range for {len} blocks")]
    IndexOutOfRange { index: usize, len: usize },

    /// No block with the given id
    #[error("Block not found: {0}")]
    BlockNotFound(String),

    /// No library template with the given id
    #[error("Unknown block template: {0}")]
    UnknownTemplate(String),

    /// Library template id already registered
    #[error("Duplicate block template: {0}")]
    DuplicateTemplate(String),

    /// Type tag outside the vocabulary
    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),

    /// A drop arrived with no drag in progress
    #[error("No drag in progress")]
    NoActiveDrag,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_type_round_trips_through_str() {
        for ty in BlockType::ALL {
            assert_eq!(ty.as_str().parse::<BlockType>().unwrap(), ty);
        }
    }

    #[test]
    fn test_block_type_serde_matches_as_str() {
        for ty in BlockType::ALL {
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json, format!("\"{}\"", ty.as_str()));
        }
    }

    #[test]
    fn test_unknown_block_type() {
        let err = "carousel".parse::<BlockType>().unwrap_err();
        assert_eq!(err, BlockError::UnknownBlockType("carousel".into()));
    }

    #[test]
    fn test_block_id_shape() {
        let id = BlockId::compose(BlockType::EbayTitle, 1700000000000, 3);
        assert_eq!(id.as_str(), "ebay-title-1700000000000-3");
    }

    #[test]
    fn test_block_serializes_type_field() {
        let block = Block::new("a".into(), BlockType::List, "<ul></ul>", 0);
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], "list");
        assert_eq!(value["position"], 0);
    }
}
