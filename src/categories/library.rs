//! Block Library - the predefined block templates
//!
//! The library supplies ready-made snippets the user can append to a
//! template. It supports:
//! - lookup by template id
//! - filtering by category
//! - case-insensitive search over id and name
//! - registration of custom templates

use serde::{Deserialize, Serialize};

use super::LibraryCategory;
use crate::core::block::BlockError;

/// A predefined snippet that can be appended as a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockTemplate {
    /// Stable template id
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Category shown in the library panel
    pub category: LibraryCategory,
    /// Markup inserted on append
    pub content: String,
}

impl BlockTemplate {
    /// Create a template
    pub fn new(id: &str, name: &str, category: LibraryCategory, content: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category,
            content: content.to_string(),
        }
    }
}

/// Ordered collection of block templates
#[derive(Debug, Clone)]
pub struct BlockLibrary {
    templates: Vec<BlockTemplate>,
}

impl BlockLibrary {
    /// Create an empty library
    pub fn empty() -> Self {
        Self {
            templates: Vec::new(),
        }
    }

    /// Create the library with every standard template
    pub fn standard() -> Self {
        Self {
            templates: standard_templates(),
        }
    }

    /// Add a custom template
    ///
    /// # Returns
    /// * `Ok(())` if the id is new
    /// * `Err(BlockError::DuplicateTemplate)` if a template with that id exists
    pub fn register(&mut self, template: BlockTemplate) -> Result<(), BlockError> {
        if self.get(&template.id).is_some() {
            return Err(BlockError::DuplicateTemplate(template.id));
        }
        self.templates.push(template);
        Ok(())
    }

    /// All templates in library order
    pub fn all(&self) -> &[BlockTemplate] {
        &self.templates
    }

    /// Look up a template by id
    pub fn get(&self, id: &str) -> Option<&BlockTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Templates in one category, in library order
    pub fn by_category(&self, category: LibraryCategory) -> Vec<&BlockTemplate> {
        self.templates
            .iter()
            .filter(|t| t.category == category)
            .collect()
    }

    /// Search templates by id or name (case-insensitive)
    pub fn search(&self, query: &str) -> Vec<&BlockTemplate> {
        let query = query.to_lowercase();
        self.templates
            .iter()
            .filter(|t| {
                t.id.to_lowercase().contains(&query) || t.name.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Number of templates
    pub fn count(&self) -> usize {
        self.templates.len()
    }
}

impl Default for BlockLibrary {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_templates() -> Vec<BlockTemplate> {
    use LibraryCategory::*;

    vec![
        // Product data
        BlockTemplate::new("bl-name", "Product name", ProductData,
            r#"<h1 class="bl-product-name" data-editable="true">[name]</h1>"#),
        BlockTemplate::new("bl-auction-title", "Auction title", ProductData,
            r#"<h1 class="bl-auction-title" data-editable="true">[auction_name]</h1>"#),
        BlockTemplate::new("bl-price", "Product price", ProductData,
            r#"<div class="bl-price-section" data-editable="true"><span class="bl-price">[price]</span></div>"#),
        BlockTemplate::new("bl-image", "Main image", ProductData,
            r#"<div class="bl-images" data-editable="true"><img src="[image]" alt="[name]" class="bl-main-image" data-editable="true"></div>"#),
        BlockTemplate::new("bl-description", "Product description", ProductData,
            r#"<div class="bl-description" data-editable="true"><h3>Product description</h3><div class="bl-desc-content">[description]</div></div>"#),
        BlockTemplate::new("bl-producer", "Producer", ProductData,
            r#"<div class="bl-producer" data-editable="true"><span class="bl-producer-label">Producer:</span> <span class="bl-producer-name">[producer]</span></div>"#),
        BlockTemplate::new("bl-category", "Category", ProductData,
            r#"<div class="bl-category" data-editable="true"><span class="bl-category-label">Category:</span> <span class="bl-category-name">[category]</span></div>"#),
        // Extra product data
        BlockTemplate::new("bl-extra-description-1", "Extra description 1", ExtraProductData,
            r#"<div class="bl-additional-desc1" data-editable="true"><h4>Additional information</h4><div class="bl-desc-content">[extra_description_1]</div></div>"#),
        BlockTemplate::new("bl-extra-description-2", "Extra description 2", ExtraProductData,
            r#"<div class="bl-additional-desc2" data-editable="true"><h4>Specification</h4><div class="bl-desc-content">[extra_description_2]</div></div>"#),
        BlockTemplate::new("bl-features-list", "Feature list", ExtraProductData,
            r#"<div class="bl-features-list" data-editable="true"><h4>Product features</h4><div class="bl-features-content">[features_list]</div></div>"#),
        BlockTemplate::new("bl-weight", "Product weight", ExtraProductData,
            r#"<div class="bl-weight" data-editable="true"><span class="bl-weight-label">Weight:</span> <span class="bl-weight-value">[weight]</span></div>"#),
        BlockTemplate::new("bl-product-id", "Product id", ExtraProductData,
            r#"<div class="bl-product-id" data-editable="true"><span class="bl-id-label">Product id:</span> <span class="bl-id-value">[product_id]</span></div>"#),
        BlockTemplate::new("bl-producer-logo", "Producer logo", ExtraProductData,
            r#"<div class="bl-producer-logo" data-editable="true"><img src="[producer_logo]" alt="Logo [producer]" class="bl-logo-image" data-editable="true"></div>"#),
        BlockTemplate::new("bl-extra-images", "Extra images", ExtraProductData,
            r#"<div class="bl-additional-images" data-editable="true"><h4>More photos</h4><div class="bl-images-gallery">[extra_images]</div></div>"#),
        // Product attributes
        BlockTemplate::new("bl-attribute-color", "Attribute: color", ProductAttributes,
            r#"<div class="bl-feature-color" data-editable="true"><span class="bl-feature-label">Color:</span> <span class="bl-feature-value">[attribute|color]</span></div>"#),
        BlockTemplate::new("bl-attribute-size", "Attribute: size", ProductAttributes,
            r#"<div class="bl-feature-size" data-editable="true"><span class="bl-feature-label">Size:</span> <span class="bl-feature-value">[attribute|size]</span></div>"#),
        BlockTemplate::new("bl-attribute-material", "Attribute: material", ProductAttributes,
            r#"<div class="bl-feature-material" data-editable="true"><span class="bl-feature-label">Material:</span> <span class="bl-feature-value">[attribute|material]</span></div>"#),
        BlockTemplate::new("bl-shipping-cost", "Shipping cost", ProductAttributes,
            r#"<div class="bl-shipping-cost" data-editable="true"><h4>Delivery cost</h4><div class="bl-shipping-price">[shipping_1]</div></div>"#),
        // Marketplace
        BlockTemplate::new("ebay-title", "Listing title", Marketplace,
            r#"<h1 class="ebay-title" data-editable="true">{{PRODUCT_TITLE}}</h1>"#),
        BlockTemplate::new("ebay-price", "Listing price", Marketplace,
            r#"<div class="ebay-price-container" data-editable="true"><span class="ebay-price">{{CURRENT_PRICE}}</span><span class="ebay-currency">{{CURRENCY}}</span></div>"#),
        BlockTemplate::new("ebay-gallery", "Listing gallery", Marketplace,
            r#"<div class="ebay-gallery" data-editable="true"><img src="{{MAIN_IMAGE}}" alt="{{PRODUCT_TITLE}}" class="ebay-main-image" data-editable="true"></div>"#),
        BlockTemplate::new("ebay-description", "Listing description", Marketplace,
            r#"<div class="ebay-description" data-editable="true"><h3>Item description</h3><div class="description-content">{{ITEM_DESCRIPTION}}</div></div>"#),
        // Marketplace extras
        BlockTemplate::new("ebay-buy-button", "Buy it now button", MarketplaceExtras,
            r#"<div class="ebay-buy-section" data-editable="true"><button class="ebay-buy-button">Buy now for {{CURRENT_PRICE}} {{CURRENCY}}</button></div>"#),
        BlockTemplate::new("ebay-seller-rating", "Seller rating", MarketplaceExtras,
            r#"<div class="ebay-seller-rating" data-editable="true"><h4>Seller rating</h4><div class="rating-stars">{{SELLER_RATING}}</div></div>"#),
        BlockTemplate::new("ebay-shipping", "Shipping", MarketplaceExtras,
            r#"<div class="ebay-shipping" data-editable="true"><h4>Shipping</h4><p>{{SHIPPING_INFO}}</p></div>"#),
        BlockTemplate::new("ebay-payment", "Payment", MarketplaceExtras,
            r#"<div class="ebay-payment" data-editable="true"><h4>Payment</h4><p>{{PAYMENT_METHODS}}</p></div>"#),
        // Layout
        BlockTemplate::new("container", "Container", Layout,
            r#"<div class="container" data-editable="true">Container content</div>"#),
        BlockTemplate::new("section", "Section", Layout,
            r#"<section class="section" data-editable="true"><h2>Section title</h2><p>Section content</p></section>"#),
        BlockTemplate::new("grid", "Grid", Layout,
            r#"<div class="grid" data-editable="true"><div class="grid-item">Item 1</div><div class="grid-item">Item 2</div></div>"#),
        BlockTemplate::new("list", "List", Layout,
            r#"<ul class="list" data-editable="true"><li>Item 1</li><li>Item 2</li><li>Item 3</li></ul>"#),
        BlockTemplate::new("image", "Image", Layout,
            r#"<img src="https://images.pexels.com/photos/356056/pexels-photo-356056.jpeg?auto=compress&amp;cs=tinysrgb&amp;w=400" alt="Image" class="image" data-editable="true">"#),
        // Advanced
        BlockTemplate::new("spec-table", "Specification table", Advanced,
            r#"<table class="spec-table" data-editable="true"><tbody><tr><th>Property</th><th>Value</th></tr><tr><td>Size</td><td>{{SIZE}}</td></tr></tbody></table>"#),
        BlockTemplate::new("product-features", "Product benefits", Advanced,
            r#"<div class="product-features" data-editable="true"><h3>Benefits</h3><ul><li>High quality</li><li>Fast delivery</li></ul></div>"#),
        // Separators
        BlockTemplate::new("separator-line", "Line", Separators,
            r#"<hr class="separator-line" data-editable="true" style="border: 1px solid #ddd; margin: 20px 0;">"#),
        BlockTemplate::new("separator-space", "Spacer", Separators,
            r#"<div class="separator-space" data-editable="true" style="height: 40px; background: transparent;"></div>"#),
        BlockTemplate::new("separator-image-text", "Image with text", Separators,
            r#"<div class="separator-image-text" data-editable="true" style="display: flex; align-items: center; gap: 20px; margin: 20px 0;"><img src="[image]" alt="Image" data-editable="true" style="width: 150px;"><div class="text-content" data-editable="true" style="flex: 1;"><h3 data-editable="true">Section title</h3><p data-editable="true">Extra information about the product.</p></div></div>"#),
        BlockTemplate::new("separator-2col", "Two columns", Separators,
            r#"<div class="separator-2col" data-editable="true" style="display: flex; gap: 20px;"><div class="col" data-editable="true" style="flex: 1;"><h3 data-editable="true">Column 1</h3><p data-editable="true">First column</p></div><div class="col" data-editable="true" style="flex: 1;"><h3 data-editable="true">Column 2</h3><p data-editable="true">Second column</p></div></div>"#),
        BlockTemplate::new("separator-3col", "Three columns", Separators,
            r#"<div class="separator-3col" data-editable="true" style="display: flex; gap: 15px;"><div class="col" data-editable="true" style="flex: 1;"><h4 data-editable="true">Column 1</h4></div><div class="col" data-editable="true" style="flex: 1;"><h4 data-editable="true">Column 2</h4></div><div class="col" data-editable="true" style="flex: 1;"><h4 data-editable="true">Column 3</h4></div></div>"#),
        BlockTemplate::new("separator-4col", "Four columns", Separators,
            r#"<div class="separator-4col" data-editable="true" style="display: flex; gap: 10px;"><div class="col" data-editable="true" style="flex: 1;"><h5 data-editable="true">Column 1</h5></div><div class="col" data-editable="true" style="flex: 1;"><h5 data-editable="true">Column 2</h5></div><div class="col" data-editable="true" style="flex: 1;"><h5 data-editable="true">Column 3</h5></div><div class="col" data-editable="true" style="flex: 1;"><h5 data-editable="true">Column 4</h5></div></div>"#),
    ]
}
