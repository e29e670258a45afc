//! In-memory template store
//!
//! Templates live in an `Arc<RwLock<HashMap>>` so clones of the store share
//! one collection across threads. Snapshots are plain JSON and can be written
//! to and read from disk to persist templates between sessions.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::{StoreError, Template, TemplateCategory, TemplateDraft, TemplateId, TemplatePatch, TemplateStore};
use crate::runtime::clock::{Clock, SystemClock};

#[derive(Serialize, Deserialize)]
struct Snapshot {
    templates: Vec<Template>,
}

/// Thread-safe template collection
#[derive(Clone)]
pub struct InMemoryTemplateStore {
    templates: Arc<RwLock<HashMap<TemplateId, Template>>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryTemplateStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty store stamping templates with `clock`
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            templates: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }

    /// Create a template from a draft
    pub fn create(&self, draft: TemplateDraft) -> Template {
        let now = self.clock.now_ms();
        let template = Template {
            id: TemplateId::new(),
            name: draft.name,
            description: draft.description,
            category: draft.category,
            thumbnail: draft.thumbnail,
            html_content: draft.html_content,
            css_content: draft.css_content,
            tags: draft.tags,
            created_at: now,
            updated_at: now,
        };
        self.templates.write().insert(template.id, template.clone());
        template
    }

    /// Apply a partial update, bumping `updated_at`
    pub fn update(&self, id: &TemplateId, patch: TemplatePatch) -> Result<Template, StoreError> {
        let mut templates = self.templates.write();
        let template = templates.get_mut(id).ok_or(StoreError::NotFound(*id))?;
        patch.apply(template);
        template.updated_at = self.clock.now_ms();
        Ok(template.clone())
    }

    /// Remove a template, returning it
    pub fn delete(&self, id: &TemplateId) -> Result<Template, StoreError> {
        self.templates
            .write()
            .remove(id)
            .ok_or(StoreError::NotFound(*id))
    }

    /// Copy a template under a fresh id with " (copy)" appended to its name
    pub fn duplicate(&self, id: &TemplateId) -> Result<Template, StoreError> {
        let mut templates = self.templates.write();
        let original = templates.get(id).ok_or(StoreError::NotFound(*id))?;
        let now = self.clock.now_ms();
        let copy = Template {
            id: TemplateId::new(),
            name: format!("{} (copy)", original.name),
            created_at: now,
            updated_at: now,
            ..original.clone()
        };
        templates.insert(copy.id, copy.clone());
        Ok(copy)
    }

    /// Fetch a template by id
    pub fn get(&self, id: &TemplateId) -> Option<Template> {
        self.templates.read().get(id).cloned()
    }

    /// All templates, oldest first
    pub fn list(&self) -> Vec<Template> {
        let mut all: Vec<Template> = self.templates.read().values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        all
    }

    /// Templates in one category, oldest first
    pub fn by_category(&self, category: TemplateCategory) -> Vec<Template> {
        self.list()
            .into_iter()
            .filter(|t| t.category == category)
            .collect()
    }

    /// Case-insensitive search over name, description and tags
    pub fn search(&self, query: &str) -> Vec<Template> {
        let query = query.to_lowercase();
        self.list()
            .into_iter()
            .filter(|t| {
                t.name.to_lowercase().contains(&query)
                    || t.description.to_lowercase().contains(&query)
                    || t.tags.iter().any(|tag| tag.to_lowercase().contains(&query))
            })
            .collect()
    }

    /// Number of templates
    pub fn count(&self) -> usize {
        self.templates.read().len()
    }

    /// Whether a template with the given id exists
    pub fn contains(&self, id: &TemplateId) -> bool {
        self.templates.read().contains_key(id)
    }

    /// Encode every template as a JSON snapshot
    pub fn to_json(&self) -> Result<String, StoreError> {
        let snapshot = Snapshot {
            templates: self.list(),
        };
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    /// Replace the contents of the store with a JSON snapshot
    pub fn from_json(&self, json: &str) -> Result<usize, StoreError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        let count = snapshot.templates.len();
        let mut templates = self.templates.write();
        templates.clear();
        templates.extend(snapshot.templates.into_iter().map(|t| (t.id, t)));
        Ok(count)
    }

    /// Write a snapshot to `path`
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| {
            tracing::warn!(path = %path.display(), %e, "failed to write template snapshot");
            StoreError::Io(e)
        })?;
        tracing::debug!(path = %path.display(), templates = self.count(), "saved template snapshot");
        Ok(())
    }

    /// Replace the contents of the store with the snapshot at `path`
    pub fn load_from_path(&self, path: impl AsRef<Path>) -> Result<usize, StoreError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            tracing::warn!(path = %path.display(), %e, "failed to read template snapshot");
            StoreError::Io(e)
        })?;
        let count = self.from_json(&json)?;
        tracing::debug!(path = %path.display(), templates = count, "loaded template snapshot");
        Ok(count)
    }
}

impl Default for InMemoryTemplateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateStore for InMemoryTemplateStore {
    fn load(&self, id: &TemplateId) -> Result<Template, StoreError> {
        self.get(id).ok_or(StoreError::NotFound(*id))
    }

    fn save(&self, id: &TemplateId, patch: TemplatePatch) -> Result<Template, StoreError> {
        self.update(id, patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::clock::FixedClock;

    fn store() -> InMemoryTemplateStore {
        InMemoryTemplateStore::with_clock(Arc::new(FixedClock(42)))
    }

    #[test]
    fn test_create_stamps_timestamps() {
        let store = store();
        let t = store.create(TemplateDraft::new("Classic", "<h1>x</h1>"));
        assert_eq!(t.created_at, 42);
        assert_eq!(t.updated_at, 42);
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_update_applies_patch() {
        let store = store();
        let t = store.create(TemplateDraft::new("Classic", "<h1>x</h1>"));
        let updated = store
            .update(
                &t.id,
                TemplatePatch {
                    css_content: Some("h1{}".into()),
                    ..TemplatePatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.css_content, "h1{}");
        assert_eq!(updated.name, "Classic");
    }

    #[test]
    fn test_missing_template() {
        let store = store();
        let id = TemplateId::new();
        assert!(matches!(store.load(&id), Err(StoreError::NotFound(missing)) if missing == id));
        assert!(store.delete(&id).is_err());
        assert!(store.duplicate(&id).is_err());
    }

    #[test]
    fn test_duplicate_appends_copy_suffix() {
        let store = store();
        let t = store.create(TemplateDraft::new("Classic", "<h1>x</h1>"));
        let copy = store.duplicate(&t.id).unwrap();
        assert_ne!(copy.id, t.id);
        assert_eq!(copy.name, "Classic (copy)");
        assert_eq!(copy.html_content, t.html_content);
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let store = store();
        let mut draft = TemplateDraft::new("Modern Electronics", "<p></p>");
        draft.tags = vec!["[price]".into()];
        draft.category = TemplateCategory::Electronics;
        store.create(draft);
        store.create(TemplateDraft::new("Fashion", "<p></p>"));

        assert_eq!(store.search("electronics").len(), 1);
        assert_eq!(store.search("PRICE").len(), 1);
        assert_eq!(store.by_category(TemplateCategory::Electronics).len(), 1);
        assert_eq!(store.by_category(TemplateCategory::Other).len(), 1);
    }
}
