//! Listing Blocks - block model engine for marketplace listing templates
//!
//! This crate turns an HTML listing template into an ordered list of editable
//! blocks, lets the editor append, reorder and remove them, and turns the
//! list back into one document. It also carries the block library, a
//! template store and the marketplace publishing contract.

pub mod core;
pub mod categories;
pub mod marketplace;
pub mod runtime;
pub mod store;
mod tests;

#[cfg(target_arch = "wasm32")]
pub mod wasm_api;

// Re-export commonly used types
pub use core::{Block, BlockError, BlockId, BlockType, Classifier, EngineConfig};
pub use categories::{BlockLibrary, LibraryCategory};
pub use runtime::{extract_blocks, serialize_blocks, EditorSession};
pub use store::{InMemoryTemplateStore, TemplateStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
