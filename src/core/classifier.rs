//! Markup Classifier - maps elements onto block types
//!
//! Classification is driven by two pieces of data:
//! - an [`EditablePolicy`] deciding whether an element is a block boundary
//! - an ordered list of [`ClassRule`]s deciding its [`BlockType`]
//!
//! Rules are evaluated top to bottom and the first match wins, so vendor
//! specific class rules must sit above the bare tag defaults.

use kuchiki::traits::*;
use kuchiki::NodeRef;
use serde::{Deserialize, Serialize};

use super::block::BlockType;
use super::markup::{self, ElementInfo};
use super::EDITABLE_ATTRIBUTE;

/// Predicate over an element's tag and class attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum Matcher {
    /// Class attribute contains at least one of the substrings
    ClassContainsAny(Vec<String>),
    /// Class attribute contains every one of the substrings
    ClassContainsAll(Vec<String>),
    /// Tag is one of the names
    TagIs(Vec<String>),
    /// Tag is one of the names and the element has element children
    TagWithChildren(Vec<String>),
    /// Any of the nested matchers
    AnyOf(Vec<Matcher>),
}

impl Matcher {
    /// Shorthand for [`Matcher::ClassContainsAny`]
    pub fn class_any(tokens: &[&str]) -> Self {
        Matcher::ClassContainsAny(owned(tokens))
    }

    /// Shorthand for [`Matcher::ClassContainsAll`]
    pub fn class_all(tokens: &[&str]) -> Self {
        Matcher::ClassContainsAll(owned(tokens))
    }

    /// Shorthand for [`Matcher::TagIs`]
    pub fn tag(tags: &[&str]) -> Self {
        Matcher::TagIs(owned(tags))
    }

    /// Test the matcher against an element
    pub fn matches(&self, element: &ElementInfo) -> bool {
        match self {
            Matcher::ClassContainsAny(tokens) => {
                tokens.iter().any(|t| element.class.contains(t.as_str()))
            }
            Matcher::ClassContainsAll(tokens) => {
                tokens.iter().all(|t| element.class.contains(t.as_str()))
            }
            Matcher::TagIs(tags) => tags.iter().any(|t| *t == element.tag),
            Matcher::TagWithChildren(tags) => {
                element.has_element_children && tags.iter().any(|t| *t == element.tag)
            }
            Matcher::AnyOf(matchers) => matchers.iter().any(|m| m.matches(element)),
        }
    }
}

/// One entry of an ordered classification table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRule {
    /// When the rule applies
    pub matcher: Matcher,
    /// Type assigned on match
    pub block_type: BlockType,
}

impl ClassRule {
    /// Create a rule
    pub fn new(matcher: Matcher, block_type: BlockType) -> Self {
        Self { matcher, block_type }
    }

    /// The standard rule table, most specific first
    pub fn standard() -> Vec<ClassRule> {
        vec![
            ClassRule::new(
                Matcher::class_any(&[
                    "ebay-title",
                    "pro-title",
                    "luxury-title",
                    "premium-title",
                    "clean-title",
                    "modern-title",
                ]),
                BlockType::EbayTitle,
            ),
            ClassRule::new(
                Matcher::class_any(&[
                    "ebay-price",
                    "pro-price",
                    "luxury-price",
                    "premium-price",
                    "price-badge",
                    "price-container",
                    "price-section",
                ]),
                BlockType::EbayPrice,
            ),
            ClassRule::new(
                Matcher::class_any(&[
                    "ebay-gallery",
                    "pro-gallery",
                    "luxury-gallery",
                    "premium-gallery",
                    "image-section",
                    "main-image",
                    "gallery",
                ]),
                BlockType::EbayGallery,
            ),
            ClassRule::new(
                Matcher::class_any(&[
                    "ebay-description",
                    "pro-description",
                    "luxury-description",
                    "premium-description",
                    "description",
                ]),
                BlockType::EbayDescription,
            ),
            ClassRule::new(
                Matcher::class_any(&["bl-product-name", "bl-auction-title"]),
                BlockType::BlProductName,
            ),
            ClassRule::new(Matcher::class_any(&["bl-price"]), BlockType::BlPrice),
            ClassRule::new(
                Matcher::class_any(&["bl-images", "bl-main-image", "bl-additional-images"]),
                BlockType::BlImages,
            ),
            ClassRule::new(Matcher::class_all(&["separator", "2col"]), BlockType::Separator2Col),
            ClassRule::new(Matcher::class_all(&["separator", "3col"]), BlockType::Separator3Col),
            ClassRule::new(Matcher::class_all(&["separator", "4col"]), BlockType::Separator4Col),
            ClassRule::new(Matcher::class_any(&["separator"]), BlockType::SeparatorLine),
            ClassRule::new(
                Matcher::class_any(&["brand", "producer", "logo"]),
                BlockType::BrandSection,
            ),
            ClassRule::new(
                Matcher::class_any(&["features", "benefits", "highlights"]),
                BlockType::ProductFeatures,
            ),
            ClassRule::new(
                Matcher::class_any(&["specs", "specifications", "spec-table"]),
                BlockType::SpecTable,
            ),
            ClassRule::new(
                Matcher::class_any(&["shipping", "delivery"]),
                BlockType::ShippingInfo,
            ),
            ClassRule::new(
                Matcher::class_any(&["care", "instructions"]),
                BlockType::CareInstructions,
            ),
            ClassRule::new(Matcher::tag(&["img"]), BlockType::Image),
            ClassRule::new(Matcher::tag(&["table"]), BlockType::SpecTable),
            ClassRule::new(Matcher::tag(&["ul", "ol"]), BlockType::List),
            ClassRule::new(
                Matcher::AnyOf(vec![Matcher::class_any(&["header"]), Matcher::tag(&["header"])]),
                BlockType::HeaderSection,
            ),
            ClassRule::new(
                Matcher::AnyOf(vec![Matcher::class_any(&["footer"]), Matcher::tag(&["footer"])]),
                BlockType::FooterSection,
            ),
            ClassRule::new(
                Matcher::AnyOf(vec![
                    Matcher::class_any(&["showcase", "section"]),
                    Matcher::tag(&["section"]),
                ]),
                BlockType::Section,
            ),
        ]
    }

    /// The simplified table used when the main extraction pass finds nothing
    pub fn fallback() -> Vec<ClassRule> {
        vec![
            ClassRule::new(Matcher::class_any(&["header"]), BlockType::HeaderSection),
            ClassRule::new(Matcher::class_any(&["gallery", "image"]), BlockType::EbayGallery),
            ClassRule::new(Matcher::class_any(&["price"]), BlockType::EbayPrice),
            ClassRule::new(Matcher::class_any(&["description"]), BlockType::EbayDescription),
            ClassRule::new(Matcher::class_any(&["showcase", "content"]), BlockType::Section),
            ClassRule::new(Matcher::TagWithChildren(owned(&["div"])), BlockType::Section),
        ]
    }
}

/// Decides whether an element is a block boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditablePolicy {
    /// Tags that are always editable
    pub tags: Vec<String>,
    /// Class substrings that make any element editable
    pub class_tokens: Vec<String>,
}

impl EditablePolicy {
    /// Whether the element should carry the editable marker
    pub fn is_editable(&self, element: &ElementInfo) -> bool {
        self.tags.iter().any(|t| *t == element.tag)
            || self
                .class_tokens
                .iter()
                .any(|t| element.class.contains(t.as_str()))
    }
}

impl Default for EditablePolicy {
    fn default() -> Self {
        Self {
            tags: owned(&[
                "h1", "h2", "h3", "h4", "h5", "h6", "p", "span", "div", "section", "img", "a",
                "button",
            ]),
            class_tokens: owned(&[
                "title",
                "price",
                "description",
                "gallery",
                "image",
                "content",
                "header",
                "footer",
                "section",
                "brand",
                "product",
                "feature",
                "spec",
                "highlight",
                "benefit",
                "delivery",
                "shipping",
                "care",
                "option",
                "badge",
                "label",
                "value",
                "info",
                "details",
            ]),
        }
    }
}

/// Outcome of classifying one element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Whether the element is a block boundary
    pub editable: bool,
    /// The type it represents
    #[serde(rename = "type")]
    pub block_type: BlockType,
}

/// Rule engine mapping an element's tag and class onto a block type
#[derive(Debug, Clone)]
pub struct Classifier {
    policy: EditablePolicy,
    rules: Vec<ClassRule>,
    fallback_rules: Vec<ClassRule>,
    attribute: String,
}

impl Classifier {
    /// Create a classifier with the standard rule tables
    pub fn new() -> Self {
        Self {
            policy: EditablePolicy::default(),
            rules: ClassRule::standard(),
            fallback_rules: ClassRule::fallback(),
            attribute: EDITABLE_ATTRIBUTE.to_string(),
        }
    }

    /// Create a classifier with a custom rule table
    pub fn with_rules(rules: Vec<ClassRule>) -> Self {
        Self {
            rules,
            ..Self::new()
        }
    }

    /// Replace the editable policy
    pub fn with_policy(mut self, policy: EditablePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Use a different marker attribute
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = attribute.into();
        self
    }

    /// The ordered rule table
    pub fn rules(&self) -> &[ClassRule] {
        &self.rules
    }

    /// The marker attribute name
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Classify by tag name and class attribute alone
    pub fn classify(&self, tag: &str, class: &str) -> Classification {
        self.classify_element(&ElementInfo::new(tag, class))
    }

    /// Classify a described element. Pure: nothing is mutated.
    pub fn classify_element(&self, element: &ElementInfo) -> Classification {
        Classification {
            editable: self.policy.is_editable(element),
            block_type: first_match(&self.rules, element),
        }
    }

    /// Type under the simplified fallback table
    pub fn fallback_type(&self, element: &ElementInfo) -> BlockType {
        first_match(&self.fallback_rules, element)
    }

    /// Classify a tree node and mark it editable when the policy says so.
    ///
    /// An element that already carries the marker counts as editable even
    /// if the policy would not tag it. Returns `None` for non-element nodes.
    pub fn tag_element(&self, node: &NodeRef) -> Option<Classification> {
        let info = ElementInfo::of(node)?;
        let mut classification = self.classify_element(&info);
        if classification.editable {
            markup::mark_attribute(node, &self.attribute);
        } else {
            classification.editable = markup::has_attribute(node, &self.attribute);
        }
        Some(classification)
    }

    /// Mark every editable descendant of a node (the node itself excluded)
    pub fn tag_descendants(&self, node: &NodeRef) {
        for element in node.descendants().elements().skip(1) {
            if let Some(info) = ElementInfo::of(element.as_node()) {
                if self.policy.is_editable(&info) {
                    markup::mark_attribute(element.as_node(), &self.attribute);
                }
            }
        }
    }

    /// Return a copy of `html` with every editable element marked
    pub fn annotate(&self, html: &str) -> String {
        let root = markup::parse_fragment(html);
        self.tag_descendants(&root);
        markup::inner_html(&root)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

fn first_match(rules: &[ClassRule], element: &ElementInfo) -> BlockType {
    rules
        .iter()
        .find(|rule| rule.matcher.matches(element))
        .map(|rule| rule.block_type)
        .unwrap_or(BlockType::Container)
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
