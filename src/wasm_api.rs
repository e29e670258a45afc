//! WASM API - `#[wasm_bindgen]` exports for the browser editor.
//!
//! This module is only compiled when targeting `wasm32`. It provides:
//! - `init_editor` / `destroy_editor` - lifecycle
//! - `load_html` / `replace_html` / `get_html` / `get_blocks` - document I/O
//! - `append_block` / `append_html` / `move_block` / `move_up` / `move_down` /
//!   `remove_block` - block mutations
//! - `start_drag` / `start_library_drag` / `drag_over` / `drop_at` / `end_drag` -
//!   drag and drop
//! - `get_block_library` / `classify_element` / `render_description` - helpers
//!
//! Every export returns a JSON string; failures come back as `{"error": "..."}`.

use std::cell::RefCell;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::categories::{BlockTemplate, LibraryCategory};
use crate::core::block::{Block, BlockId};
use crate::core::config::EngineConfig;
use crate::marketplace::render_listing_description;
use crate::runtime::drag::DragSource;
use crate::runtime::extractor::Diagnostic;
use crate::runtime::session::{EditorSession, SessionState};

// ── Global state ────────────────────────────────────────────────────────────

thread_local! {
    static EDITOR: RefCell<Option<EditorSession>> = RefCell::new(None);
}

fn with_editor<R>(f: impl FnOnce(&mut EditorSession) -> R) -> Result<R, String> {
    EDITOR.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(editor) => Ok(f(editor)),
            None => Err("Editor not initialized. Call init_editor() first.".into()),
        }
    })
}

// ── Response types ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct DocumentResponse<'a> {
    state: SessionState,
    html: &'a str,
    blocks: &'a [Block],
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    diagnostics: &'a [Diagnostic],
}

#[derive(Serialize)]
struct ChangedResponse<'a> {
    changed: bool,
    #[serde(flatten)]
    document: DocumentResponse<'a>,
}

#[derive(Serialize)]
struct AppendResponse<'a> {
    ids: Vec<BlockId>,
    #[serde(flatten)]
    document: DocumentResponse<'a>,
}

#[derive(Serialize)]
struct LibraryCategoryResponse<'a> {
    id: LibraryCategory,
    name: &'a str,
    templates: Vec<&'a BlockTemplate>,
}

fn document(editor: &EditorSession) -> DocumentResponse<'_> {
    DocumentResponse {
        state: editor.state(),
        html: editor.document(),
        blocks: editor.blocks(),
        diagnostics: editor.diagnostics(),
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| json_err(format!("Serialization failed: {}", e)))
}

fn json_err(msg: impl Into<String>) -> String {
    serde_json::to_string(&ErrorResponse { error: msg.into() }).unwrap_or_default()
}

fn respond(result: Result<String, String>) -> String {
    result.unwrap_or_else(json_err)
}

fn changed(editor: &EditorSession, changed: bool) -> String {
    to_json(&ChangedResponse {
        changed,
        document: document(editor),
    })
}

fn appended(editor: &EditorSession, ids: Vec<BlockId>) -> String {
    to_json(&AppendResponse {
        ids,
        document: document(editor),
    })
}

/// JavaScript passes `-1` for "no index"
fn optional_index(index: i32) -> Option<usize> {
    usize::try_from(index).ok()
}

// ── Exported functions ──────────────────────────────────────────────────────

#[wasm_bindgen]
pub fn init_editor(config_json: &str) -> String {
    console_error_panic_hook::set_once();

    let config = match EngineConfig::from_json(config_json) {
        Ok(c) => c,
        Err(e) => return json_err(format!("Invalid config JSON: {}", e)),
    };

    EDITOR.with(|cell| {
        let editor = EditorSession::with_config(config);
        let response = to_json(&document(&editor));
        *cell.borrow_mut() = Some(editor);
        response
    })
}

#[wasm_bindgen]
pub fn destroy_editor() {
    EDITOR.with(|cell| {
        *cell.borrow_mut() = None;
    });
}

#[wasm_bindgen]
pub fn load_html(html: &str) -> String {
    respond(with_editor(|editor| {
        editor.load_html(html);
        to_json(&document(editor))
    }))
}

#[wasm_bindgen]
pub fn get_blocks() -> String {
    respond(with_editor(|editor| to_json(&editor.blocks())))
}

#[wasm_bindgen]
pub fn get_html() -> String {
    respond(with_editor(|editor| to_json(&document(editor))))
}

#[wasm_bindgen]
pub fn append_block(template_id: &str) -> String {
    respond(with_editor(|editor| {
        editor
            .append_template(template_id)
            .map(|ids| appended(editor, ids))
            .map_err(|e| e.to_string())
    })
    .and_then(|r| r))
}

#[wasm_bindgen]
pub fn append_html(markup: &str) -> String {
    respond(with_editor(|editor| {
        let ids = editor.append_markup(markup);
        appended(editor, ids)
    }))
}

#[wasm_bindgen]
pub fn move_block(source: usize, target: usize) -> String {
    respond(with_editor(|editor| {
        let moved = editor.move_block(source, target);
        changed(editor, moved)
    }))
}

#[wasm_bindgen]
pub fn move_up(index: usize) -> String {
    respond(with_editor(|editor| {
        let moved = editor.move_up(index);
        changed(editor, moved)
    }))
}

#[wasm_bindgen]
pub fn move_down(index: usize) -> String {
    respond(with_editor(|editor| {
        let moved = editor.move_down(index);
        changed(editor, moved)
    }))
}

#[wasm_bindgen]
pub fn remove_block(index: usize) -> String {
    respond(with_editor(|editor| {
        let removed = editor.remove(index).is_some();
        changed(editor, removed)
    }))
}

#[wasm_bindgen]
pub fn replace_html(html: &str) -> String {
    #[derive(Serialize)]
    struct ReplaceResponse<'a> {
        #[serde(flatten)]
        outcome: crate::runtime::session::ReplaceOutcome,
        #[serde(flatten)]
        document: DocumentResponse<'a>,
    }

    respond(with_editor(|editor| {
        let outcome = editor.replace_from_html(html);
        to_json(&ReplaceResponse {
            outcome,
            document: document(editor),
        })
    }))
}

#[wasm_bindgen]
pub fn start_drag(block_id: &str) -> String {
    respond(with_editor(|editor| {
        editor
            .start_drag(DragSource::Block(BlockId::from(block_id)))
            .map(|()| to_json(editor.drag_state()))
            .map_err(|e| e.to_string())
    })
    .and_then(|r| r))
}

#[wasm_bindgen]
pub fn start_library_drag(template_id: &str) -> String {
    respond(with_editor(|editor| {
        editor
            .start_drag(DragSource::Library(template_id.to_string()))
            .map(|()| to_json(editor.drag_state()))
            .map_err(|e| e.to_string())
    })
    .and_then(|r| r))
}

#[wasm_bindgen]
pub fn drag_over(block_id: &str) -> String {
    respond(with_editor(|editor| {
        let target = (!block_id.is_empty()).then(|| BlockId::from(block_id));
        editor.hover(target);
        to_json(editor.drag_state())
    }))
}

#[wasm_bindgen]
pub fn drop_at(target_index: i32) -> String {
    #[derive(Serialize)]
    struct DropResponse<'a> {
        #[serde(flatten)]
        outcome: crate::runtime::session::DropOutcome,
        #[serde(flatten)]
        document: DocumentResponse<'a>,
    }

    respond(with_editor(|editor| {
        editor
            .drop_at(optional_index(target_index))
            .map(|outcome| {
                to_json(&DropResponse {
                    outcome,
                    document: document(editor),
                })
            })
            .map_err(|e| e.to_string())
    })
    .and_then(|r| r))
}

#[wasm_bindgen]
pub fn end_drag() -> String {
    #[derive(Serialize)]
    struct EndDragResponse {
        cleared: bool,
    }

    respond(with_editor(|editor| {
        to_json(&EndDragResponse {
            cleared: editor.end_drag(),
        })
    }))
}

#[wasm_bindgen]
pub fn get_block_library() -> String {
    respond(with_editor(|editor| {
        let library = editor.library();
        let categories: Vec<LibraryCategoryResponse<'_>> = LibraryCategory::ALL
            .iter()
            .map(|&category| LibraryCategoryResponse {
                id: category,
                name: category.display_name(),
                templates: library.by_category(category),
            })
            .collect();
        to_json(&categories)
    }))
}

#[wasm_bindgen]
pub fn classify_element(tag: &str, class_name: &str) -> String {
    respond(with_editor(|editor| to_json(&editor.classifier().classify(tag, class_name))))
}

#[wasm_bindgen]
pub fn render_description(html: &str, css: &str) -> String {
    #[derive(Serialize)]
    struct DescriptionResponse {
        description: String,
    }

    to_json(&DescriptionResponse {
        description: render_listing_description(html, css),
    })
}
