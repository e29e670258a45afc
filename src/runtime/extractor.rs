//! Block Extractor - HTML to blocks
//!
//! Every element directly under the synthetic root becomes one block, in
//! document order, whether or not the editable policy accepts it. The walk
//! therefore never descends past the top level: editable descendants are
//! marked in place inside their block rather than surfacing on their own.
//! Each block's root carries the editable marker.
//!
//! Parsing is tolerant: malformed markup is repaired by the HTML parser and
//! extraction degrades to a fallback pass instead of failing.

use kuchiki::traits::*;
use kuchiki::NodeRef;
use serde::Serialize;

use crate::core::block::{Block, BlockType};
use crate::core::classifier::Classifier;
use crate::core::markup::{self, ElementInfo};
use crate::runtime::clock::IdGenerator;

/// Something the extractor noticed but could not turn into a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The main pass found no blocks and the direct children were re-scanned
    FallbackUsed,
    /// Top-level text outside any element was left out of the blocks
    DroppedText { text: String },
    /// A top-level comment was left out of the blocks
    DroppedComment { text: String },
}

/// Result of one extraction pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Extraction {
    /// Blocks in visitation order, positions `0..n`
    pub blocks: Vec<Block>,
    /// Data-loss and fallback notes
    pub diagnostics: Vec<Diagnostic>,
}

impl Extraction {
    /// Whether any markup was dropped
    pub fn lost_content(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| !matches!(d, Diagnostic::FallbackUsed))
    }
}

/// Turns markup into an ordered block list
pub struct BlockExtractor<'a> {
    classifier: &'a Classifier,
}

impl<'a> BlockExtractor<'a> {
    /// Create an extractor over a classifier
    pub fn new(classifier: &'a Classifier) -> Self {
        Self { classifier }
    }

    /// Extract blocks from `html`, drawing ids from `ids`.
    ///
    /// Empty or whitespace-only input yields no blocks. Any other input that
    /// contains an element or non-blank text yields at least one.
    pub fn extract(&self, html: &str, ids: &mut IdGenerator) -> Extraction {
        if html.trim().is_empty() {
            return Extraction::default();
        }

        let root = markup::parse_fragment(html);
        let mut found: Vec<(BlockType, String)> = Vec::new();
        for child in root.children().elements() {
            self.visit(child.as_node(), &mut found);
        }

        let mut diagnostics = Vec::new();
        if found.is_empty() {
            tracing::debug!("no blocks in main pass, re-scanning direct children");
            diagnostics.push(Diagnostic::FallbackUsed);
            self.fallback(&root, &mut found, &mut diagnostics);
        } else {
            collect_dropped(&root, &mut diagnostics);
        }

        for diagnostic in &diagnostics {
            if !matches!(diagnostic, Diagnostic::FallbackUsed) {
                tracing::warn!(?diagnostic, "extraction dropped top-level content");
            }
        }

        let batch = ids.next_batch();
        let blocks = found
            .into_iter()
            .enumerate()
            .map(|(position, (block_type, content))| {
                Block::new(batch.id(block_type, position), block_type, content, position)
            })
            .collect();

        Extraction { blocks, diagnostics }
    }

    fn visit(&self, node: &NodeRef, found: &mut Vec<(BlockType, String)>) {
        let Some(classification) = self.classifier.tag_element(node) else {
            return;
        };
        markup::mark_attribute(node, self.classifier.attribute());
        self.classifier.tag_descendants(node);
        found.push((classification.block_type, node.to_string()));
    }

    fn fallback(
        &self,
        root: &NodeRef,
        found: &mut Vec<(BlockType, String)>,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        for child in root.children() {
            if let Some(info) = ElementInfo::of(&child) {
                markup::mark_attribute(&child, self.classifier.attribute());
                self.classifier.tag_descendants(&child);
                found.push((self.classifier.fallback_type(&info), child.to_string()));
            } else if let Some(text) = child.as_text() {
                if text.borrow().trim().is_empty() {
                    continue;
                }
                let content = format!(
                    r#"<div {}="true">{}</div>"#,
                    self.classifier.attribute(),
                    child.to_string().trim()
                );
                found.push((BlockType::Container, content));
            } else if let Some(comment) = child.as_comment() {
                diagnostics.push(Diagnostic::DroppedComment {
                    text: comment.borrow().trim().to_string(),
                });
            }
        }
    }
}

fn collect_dropped(root: &NodeRef, diagnostics: &mut Vec<Diagnostic>) {
    for child in root.children() {
        if let Some(text) = child.as_text() {
            let text = text.borrow();
            if !text.trim().is_empty() {
                diagnostics.push(Diagnostic::DroppedText {
                    text: text.trim().to_string(),
                });
            }
        } else if let Some(comment) = child.as_comment() {
            diagnostics.push(Diagnostic::DroppedComment {
                text: comment.borrow().trim().to_string(),
            });
        }
    }
}

/// Extract blocks with the standard classifier
pub fn extract_blocks(html: &str) -> Vec<Block> {
    extract_blocks_with_diagnostics(html).blocks
}

/// Extract blocks with the standard classifier, keeping diagnostics
pub fn extract_blocks_with_diagnostics(html: &str) -> Extraction {
    let classifier = Classifier::new();
    BlockExtractor::new(&classifier).extract(html, &mut IdGenerator::default())
}
