//! Editor session - the reorder / mutation state machine
//!
//! The session owns the block list of one document and keeps the serialized
//! document in step with it. There are two states, [`SessionState::Empty`]
//! (the placeholder document is shown) and [`SessionState::HasBlocks`], and
//! four operations move between them: append, move, remove and bulk replace.
//!
//! After every operation block positions are exactly `0..n` in list order.

use std::sync::Arc;

use serde::Serialize;

use crate::categories::BlockLibrary;
use crate::core::block::{Block, BlockError, BlockId, BlockType};
use crate::core::classifier::Classifier;
use crate::core::config::EngineConfig;
use crate::runtime::clock::{Clock, IdGenerator};
use crate::runtime::drag::{DragSource, DragState};
use crate::runtime::extractor::{BlockExtractor, Diagnostic, Extraction};
use crate::runtime::serializer;
use crate::store::{Template, TemplateId, TemplatePatch, TemplateStore, StoreError};

/// Whether the document has real content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No blocks; the placeholder document is shown
    Empty,
    /// At least one block
    HasBlocks,
}

/// What a bulk replace did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReplaceOutcome {
    /// The markup is the session's own document; nothing was re-parsed
    Unchanged,
    /// The markup was re-extracted and adopted
    Accepted { blocks: usize },
    /// The markup was blank or the placeholder; the session is now empty
    Cleared,
    /// Extraction found nothing, so the markup was kept as one wrapped block
    /// after the previous blocks
    Recovered { blocks: usize },
}

/// What a drop did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DropOutcome {
    /// A library template was appended
    Appended { ids: Vec<BlockId> },
    /// A block moved
    Moved { from: usize, to: usize },
    /// Nothing changed (dropped onto itself or outside a target)
    Unchanged,
}

/// Block list of one document plus everything needed to edit it
pub struct EditorSession {
    blocks: Vec<Block>,
    document: String,
    classifier: Classifier,
    config: EngineConfig,
    library: BlockLibrary,
    ids: IdGenerator,
    drag: DragState,
    diagnostics: Vec<Diagnostic>,
    placeholder: Vec<String>,
}

impl EditorSession {
    /// Create an empty session with the default configuration
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an empty session with the given configuration
    pub fn with_config(config: EngineConfig) -> Self {
        let classifier = Classifier::new().with_attribute(config.editable_attribute.clone());
        let document = config.placeholder_html.clone();
        let placeholder = placeholder_contents(&classifier, &config);
        Self {
            blocks: Vec::new(),
            document,
            classifier,
            config,
            library: BlockLibrary::standard(),
            ids: IdGenerator::default(),
            drag: DragState::default(),
            diagnostics: Vec::new(),
            placeholder,
        }
    }

    /// Create a session and load `html` into it
    pub fn from_html(html: &str) -> Self {
        let mut session = Self::new();
        session.load_html(html);
        session
    }

    /// Load the document of a stored template
    pub fn open<S: TemplateStore + ?Sized>(store: &S, id: &TemplateId) -> Result<Self, StoreError> {
        let template = store.load(id)?;
        Ok(Self::from_html(&template.html_content))
    }

    /// Write the current document back into a stored template
    pub fn save_into<S: TemplateStore + ?Sized>(
        &self,
        store: &S,
        id: &TemplateId,
    ) -> Result<Template, StoreError> {
        store.save(
            id,
            TemplatePatch {
                html_content: Some(self.document.clone()),
                ..TemplatePatch::default()
            },
        )
    }

    /// Use a different clock for block ids
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.ids = IdGenerator::new(clock);
        self
    }

    /// Use a different classifier; its marker attribute is kept in step
    /// with the configuration
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier.with_attribute(self.config.editable_attribute.clone());
        self.placeholder = placeholder_contents(&self.classifier, &self.config);
        self
    }

    /// Use a different block library
    pub fn with_library(mut self, library: BlockLibrary) -> Self {
        self.library = library;
        self
    }

    // ── Accessors ───────────────────────────────────────────────────────

    /// Blocks in position order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether there are no blocks
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The serialized document; the placeholder when empty
    pub fn document(&self) -> &str {
        &self.document
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        if self.blocks.is_empty() {
            SessionState::Empty
        } else {
            SessionState::HasBlocks
        }
    }

    /// Look up a block by id
    pub fn block(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| &b.id == id)
    }

    /// Index of a block by id
    pub fn index_of(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| &b.id == id)
    }

    /// Diagnostics from the most recent extraction
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The block library appends draw from
    pub fn library(&self) -> &BlockLibrary {
        &self.library
    }

    /// The classifier extraction uses
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Whether re-extracting the current document gives the same type sequence
    pub fn is_stable(&self) -> bool {
        let mut scratch = IdGenerator::default();
        let reparsed = BlockExtractor::new(&self.classifier).extract(&self.document, &mut scratch);
        let reparsed = self.strip_placeholder(reparsed.blocks);
        reparsed.len() == self.blocks.len()
            && reparsed
                .iter()
                .zip(&self.blocks)
                .all(|(a, b)| a.block_type == b.block_type)
    }

    // ── Operations ──────────────────────────────────────────────────────

    /// Replace the whole block list by extracting `html`.
    ///
    /// Used for initial load. Unlike [`Self::replace_from_html`] the result is
    /// always adopted, even when it is empty.
    pub fn load_html(&mut self, html: &str) {
        let extraction = self.extract(html);
        self.diagnostics = extraction.diagnostics;
        let blocks = self.strip_placeholder(extraction.blocks);
        self.set_blocks(blocks);
    }

    /// Append the library template with the given id
    pub fn append_template(&mut self, template_id: &str) -> Result<Vec<BlockId>, BlockError> {
        let content = self
            .library
            .get(template_id)
            .map(|t| t.content.clone())
            .ok_or_else(|| BlockError::UnknownTemplate(template_id.to_string()))?;
        Ok(self.append_markup(&content))
    }

    /// Append a snippet of markup at the end.
    ///
    /// The snippet goes through extraction, so it is marked and classified
    /// like any loaded document. A snippet with several top-level elements
    /// appends one block per element. When the session is empty the snippet
    /// replaces the placeholder rather than following it.
    pub fn append_markup(&mut self, markup: &str) -> Vec<BlockId> {
        let extraction = self.extract(markup);
        let incoming = self.strip_placeholder(extraction.blocks);
        if incoming.is_empty() {
            tracing::debug!("append produced no blocks");
            return Vec::new();
        }

        let batch = self.ids.next_batch();
        let mut appended = Vec::with_capacity(incoming.len());
        for block in incoming {
            let position = self.blocks.len();
            let id = batch.id(block.block_type, position);
            appended.push(id.clone());
            self.blocks
                .push(Block::new(id, block.block_type, block.content, position));
        }
        self.regenerate();
        appended
    }

    /// Move the block at `source` to `target`.
    ///
    /// Returns whether anything changed. Out-of-range indices are a no-op.
    pub fn move_block(&mut self, source: usize, target: usize) -> bool {
        match self.try_move_block(source, target) {
            Ok(moved) => moved,
            Err(e) => {
                tracing::warn!(%e, "ignoring move");
                false
            }
        }
    }

    /// Move the block at `source` to `target`, reporting bad indices
    pub fn try_move_block(&mut self, source: usize, target: usize) -> Result<bool, BlockError> {
        self.check_index(source)?;
        self.check_index(target)?;
        if source == target {
            return Ok(false);
        }

        let block = self.blocks.remove(source);
        self.blocks.insert(target, block);
        self.renumber();
        self.regenerate();
        Ok(true)
    }

    /// Swap the block at `index` with the one above it
    pub fn move_up(&mut self, index: usize) -> bool {
        match index.checked_sub(1) {
            Some(target) => self.move_block(index, target),
            None => false,
        }
    }

    /// Swap the block at `index` with the one below it
    pub fn move_down(&mut self, index: usize) -> bool {
        index
            .checked_add(1)
            .map_or(false, |target| self.move_block(index, target))
    }

    /// Remove the block at `index`. Out-of-range indices are a no-op.
    pub fn remove(&mut self, index: usize) -> Option<Block> {
        match self.try_remove(index) {
            Ok(block) => Some(block),
            Err(e) => {
                tracing::warn!(%e, "ignoring remove");
                None
            }
        }
    }

    /// Remove the block at `index`, reporting a bad index
    pub fn try_remove(&mut self, index: usize) -> Result<Block, BlockError> {
        self.check_index(index)?;
        let removed = self.blocks.remove(index);
        self.renumber();
        self.regenerate();
        Ok(removed)
    }

    /// Replace the document with hand-edited or pasted markup.
    ///
    /// Markup identical to the session's own document is ignored, so
    /// feeding regenerated output back in never re-parses. If extraction
    /// yields no blocks for non-blank markup, the previous blocks are kept
    /// and the markup is appended as one wrapped container block.
    pub fn replace_from_html(&mut self, raw: &str) -> ReplaceOutcome {
        if raw == self.document {
            return ReplaceOutcome::Unchanged;
        }
        if raw.trim().is_empty() {
            self.diagnostics.clear();
            self.set_blocks(Vec::new());
            return ReplaceOutcome::Cleared;
        }

        let extraction = self.extract(raw);
        self.diagnostics = extraction.diagnostics;
        if self.is_placeholder(&extraction.blocks) {
            self.set_blocks(Vec::new());
            return ReplaceOutcome::Cleared;
        }
        let blocks = extraction.blocks;
        if !blocks.is_empty() {
            let count = blocks.len();
            self.set_blocks(blocks);
            return ReplaceOutcome::Accepted { blocks: count };
        }

        tracing::warn!("replacement markup produced no blocks, keeping it as one container");
        let content = format!(
            r#"<div class="template-container" {}="true">{}</div>"#,
            self.classifier.attribute(),
            raw
        );
        let batch = self.ids.next_batch();
        let position = self.blocks.len();
        self.blocks.push(Block::new(
            batch.id(BlockType::Container, position),
            BlockType::Container,
            content,
            position,
        ));
        self.regenerate();
        ReplaceOutcome::Recovered {
            blocks: self.blocks.len(),
        }
    }

    // ── Drag and drop ───────────────────────────────────────────────────

    /// Begin dragging. A drag still in flight is ended first.
    pub fn start_drag(&mut self, source: DragSource) -> Result<(), BlockError> {
        match &source {
            DragSource::Block(id) if self.block(id).is_none() => {
                return Err(BlockError::BlockNotFound(id.to_string()));
            }
            DragSource::Library(id) if self.library.get(id).is_none() => {
                return Err(BlockError::UnknownTemplate(id.clone()));
            }
            _ => {}
        }
        self.end_drag();
        self.drag.begin(source);
        Ok(())
    }

    /// Record the block currently under the pointer
    pub fn hover(&mut self, target: Option<BlockId>) {
        self.drag.hover(target);
    }

    /// Finish the drag by dropping at `target` (an index into the block list).
    ///
    /// The drag state is cleared before anything else happens, so it is
    /// released even when the drop itself fails. Library templates are
    /// appended at the end whatever the target.
    pub fn drop_at(&mut self, target: Option<usize>) -> Result<DropOutcome, BlockError> {
        let source = self.drag.take().ok_or(BlockError::NoActiveDrag)?;
        match source {
            DragSource::Library(template_id) => {
                let ids = self.append_template(&template_id)?;
                Ok(DropOutcome::Appended { ids })
            }
            DragSource::Block(id) => {
                let from = self
                    .index_of(&id)
                    .ok_or_else(|| BlockError::BlockNotFound(id.to_string()))?;
                match target {
                    Some(to) if self.try_move_block(from, to)? => Ok(DropOutcome::Moved { from, to }),
                    _ => Ok(DropOutcome::Unchanged),
                }
            }
        }
    }

    /// End the drag without dropping. Returns whether a drag was in flight.
    pub fn end_drag(&mut self) -> bool {
        self.drag.clear()
    }

    /// The ambient drag state
    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// Begin a drag owned by a guard that ends it when dropped
    pub fn drag(&mut self, source: DragSource) -> Result<DragGuard<'_>, BlockError> {
        self.start_drag(source)?;
        Ok(DragGuard {
            session: self,
            released: false,
        })
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn extract(&mut self, html: &str) -> Extraction {
        BlockExtractor::new(&self.classifier).extract(html, &mut self.ids)
    }

    /// Whether `blocks` is exactly the configured placeholder document.
    ///
    /// Matches the canonical extraction of the placeholder markup, or a lone
    /// block whose root carries `data-placeholder="true"`. Mentions of the
    /// attribute in text, in other attribute values or on descendants do not
    /// count.
    fn is_placeholder(&self, blocks: &[Block]) -> bool {
        if blocks.is_empty() {
            return false;
        }
        let canonical = blocks.len() == self.placeholder.len()
            && blocks.iter().zip(&self.placeholder).all(|(b, c)| &b.content == c);
        canonical || (blocks.len() == 1 && blocks[0].is_placeholder())
    }

    fn strip_placeholder(&self, blocks: Vec<Block>) -> Vec<Block> {
        if self.is_placeholder(&blocks) {
            Vec::new()
        } else {
            blocks
        }
    }

    fn check_index(&self, index: usize) -> Result<(), BlockError> {
        if index < self.blocks.len() {
            Ok(())
        } else {
            Err(BlockError::IndexOutOfRange {
                index,
                len: self.blocks.len(),
            })
        }
    }

    fn set_blocks(&mut self, blocks: Vec<Block>) {
        self.blocks = blocks;
        self.renumber();
        self.regenerate();
    }

    fn renumber(&mut self) {
        for (position, block) in self.blocks.iter_mut().enumerate() {
            block.position = position;
        }
    }

    fn regenerate(&mut self) {
        self.document = serializer::serialize_with(&self.blocks, &self.config);
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

/// A drag in flight; ends the drag when dropped unless [`DragGuard::drop_at`]
/// already did
pub struct DragGuard<'a> {
    session: &'a mut EditorSession,
    released: bool,
}

impl DragGuard<'_> {
    /// Record the block currently under the pointer
    pub fn hover(&mut self, target: Option<BlockId>) {
        self.session.hover(target);
    }

    /// The session being edited
    pub fn session(&self) -> &EditorSession {
        &*self.session
    }

    /// Drop at `target` and release the drag
    pub fn drop_at(mut self, target: Option<usize>) -> Result<DropOutcome, BlockError> {
        self.released = true;
        self.session.drop_at(target)
    }
}

impl Drop for DragGuard<'_> {
    fn drop(&mut self) {
        if !self.released {
            self.session.end_drag();
        }
    }
}

/// Block contents the configured placeholder extracts to
fn placeholder_contents(classifier: &Classifier, config: &EngineConfig) -> Vec<String> {
    let mut scratch = IdGenerator::default();
    BlockExtractor::new(classifier)
        .extract(&config.placeholder_html, &mut scratch)
        .blocks
        .into_iter()
        .map(|block| block.content)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::clock::FixedClock;

    fn session() -> EditorSession {
        EditorSession::new().with_clock(Arc::new(FixedClock(1_000)))
    }

    fn positions(session: &EditorSession) -> Vec<usize> {
        session.blocks().iter().map(|b| b.position).collect()
    }

    #[test]
    fn test_new_session_is_empty_placeholder() {
        let session = session();
        assert_eq!(session.state(), SessionState::Empty);
        assert_eq!(session.document(), crate::core::PLACEHOLDER_HTML);
    }

    #[test]
    fn test_append_replaces_placeholder() {
        let mut session = session();
        session.append_template("ebay-title").unwrap();
        assert_eq!(session.len(), 1);
        assert!(!session.document().contains("data-placeholder"));
        assert!(session.document().starts_with("<h1"));
    }

    #[test]
    fn test_move_renumbers() {
        let mut session = EditorSession::from_html("<p>a</p><p>b</p><p>c</p>");
        assert!(session.move_block(0, 2));
        assert_eq!(positions(&session), vec![0, 1, 2]);
        assert!(session.blocks()[2].content.contains(">a<"));
        assert!(!session.move_block(1, 1));
        assert!(!session.move_block(0, 9));
    }

    #[test]
    fn test_remove_last_reverts_to_placeholder() {
        let mut session = EditorSession::from_html("<p>only</p>");
        assert!(session.remove(0).is_some());
        assert_eq!(session.state(), SessionState::Empty);
        assert_eq!(session.document(), crate::core::PLACEHOLDER_HTML);
        assert!(session.remove(0).is_none());
    }

    #[test]
    fn test_try_variants_report_bad_indices() {
        let mut session = EditorSession::from_html("<p>a</p>");
        assert_eq!(
            session.try_remove(3),
            Err(BlockError::IndexOutOfRange { index: 3, len: 1 })
        );
        assert!(session.try_move_block(0, 1).is_err());
    }

    #[test]
    fn test_ids_never_reused_after_remove() {
        let mut session = session();
        let first = session.append_markup("<p>a</p>");
        session.remove(0);
        let second = session.append_markup("<p>a</p>");
        assert_ne!(first, second);
    }

    #[test]
    fn test_drag_guard_releases_without_drop() {
        let mut session = EditorSession::from_html("<p>a</p><p>b</p>");
        let id = session.blocks()[0].id.clone();
        {
            let mut guard = session.drag(DragSource::Block(id)).unwrap();
            guard.hover(Some(guard.session().blocks()[1].id.clone()));
            assert!(guard.session().drag_state().is_active());
        }
        assert!(!session.drag_state().is_active());
        assert!(!session.end_drag());
    }

    #[test]
    fn test_move_down_at_max_index_is_noop() {
        let mut session = EditorSession::from_html("<p>a</p><p>b</p>");
        let before = session.document().to_string();
        assert!(!session.move_down(usize::MAX));
        assert!(!session.move_down(1));
        assert_eq!(session.document(), before);
        assert!(session.move_down(0));
    }

    #[test]
    fn test_attribute_mention_is_not_placeholder() {
        let mut session = EditorSession::from_html("<p>Set the data-placeholder attribute on inputs</p>");
        assert_eq!(session.len(), 1);
        assert_eq!(session.state(), SessionState::HasBlocks);

        let outcome = session.replace_from_html(r#"<div data-placeholder="Your name">Real content</div>"#);
        assert_eq!(outcome, ReplaceOutcome::Accepted { blocks: 1 });
        assert!(session.document().contains("Real content"));
    }

    #[test]
    fn test_custom_placeholder_is_recognised() {
        let config = EngineConfig {
            placeholder_html: "<p>Nothing here yet</p>".into(),
            ..EngineConfig::default()
        };
        let mut session = EditorSession::with_config(config);
        assert_eq!(session.document(), "<p>Nothing here yet</p>");

        session.load_html("<p>Nothing here yet</p>");
        assert_eq!(session.state(), SessionState::Empty);

        session.load_html("<p>real</p>");
        assert_eq!(
            session.replace_from_html("<p>Nothing here yet</p>"),
            ReplaceOutcome::Cleared
        );
        assert!(session.is_empty());
        assert!(session.is_stable());
    }
}
