//! Core block abstractions and types
//!
//! This module defines the block type vocabulary, the classifier that maps
//! markup elements onto it, and the engine configuration.

pub mod block;
pub mod classifier;
pub mod config;
pub mod markup;

pub use block::{Block, BlockError, BlockId, BlockType};
pub use classifier::{Classification, Classifier, ClassRule, EditablePolicy, Matcher};
pub use config::EngineConfig;
pub use markup::ElementInfo;

/// Attribute that marks an element as clickable in the live-editing surface
pub const EDITABLE_ATTRIBUTE: &str = "data-editable";

/// Attribute carried only by the empty-state placeholder document
pub const PLACEHOLDER_ATTRIBUTE: &str = "data-placeholder";

/// The fixed document shown when a template has no blocks
pub const PLACEHOLDER_HTML: &str = concat!(
    r#"<div class="template-container" data-editable="true" data-placeholder="true" "#,
    r#"style="padding: 20px; font-family: Arial, sans-serif; min-height: 400px; "#,
    r#"border: 2px dashed #ccc; text-align: center; display: flex; align-items: center; "#,
    r#"justify-content: center; color: #666;">"#,
    r#"<p>Click "Blocks" to add the first element to the template</p></div>"#
);
