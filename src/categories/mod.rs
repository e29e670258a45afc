//! Block library categories
//!
//! This module groups the predefined block templates offered by the editor
//! and provides the library that serves them.

pub mod library;

use serde::{Deserialize, Serialize};

pub use library::{BlockLibrary, BlockTemplate};

/// Library category enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LibraryCategory {
    /// Product feed placeholders (name, price, main image, description)
    ProductData,
    /// Secondary product feed placeholders (extra descriptions, weight, ids)
    ExtraProductData,
    /// Single product attribute rows (color, size, material)
    ProductAttributes,
    /// Core marketplace listing elements
    Marketplace,
    /// Optional marketplace elements (buy button, rating, shipping)
    MarketplaceExtras,
    /// Generic layout containers
    Layout,
    /// Tables and feature lists
    Advanced,
    /// Spacers and multi-column separators
    Separators,
}

impl LibraryCategory {
    /// Every category, in display order
    pub const ALL: [LibraryCategory; 8] = [
        LibraryCategory::ProductData,
        LibraryCategory::ExtraProductData,
        LibraryCategory::ProductAttributes,
        LibraryCategory::Marketplace,
        LibraryCategory::MarketplaceExtras,
        LibraryCategory::Layout,
        LibraryCategory::Advanced,
        LibraryCategory::Separators,
    ];

    /// Get a human-readable name for the category
    pub fn display_name(&self) -> &'static str {
        match self {
            LibraryCategory::ProductData => "Product Data",
            LibraryCategory::ExtraProductData => "Extra Product Data",
            LibraryCategory::ProductAttributes => "Product Attributes",
            LibraryCategory::Marketplace => "Marketplace",
            LibraryCategory::MarketplaceExtras => "Marketplace Extras",
            LibraryCategory::Layout => "Layout",
            LibraryCategory::Advanced => "Advanced",
            LibraryCategory::Separators => "Separators",
        }
    }
}

impl std::fmt::Display for LibraryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
