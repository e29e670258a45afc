//! Template store
//!
//! Saved listing templates (markup plus stylesheet) and the storage seam the
//! editor loads from and saves into. [`InMemoryTemplateStore`] is the
//! bundled implementation; hosts with their own persistence implement
//! [`TemplateStore`] directly.

pub mod memory;

pub use memory::InMemoryTemplateStore;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a stored template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(pub Uuid);

impl TemplateId {
    /// Generate a fresh random id
    pub fn new() -> Self {
        TemplateId(Uuid::new_v4())
    }
}

impl Default for TemplateId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TemplateId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(TemplateId)
    }
}

/// Product category a template is aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateCategory {
    Electronics,
    Fashion,
    Home,
    Automotive,
    Sport,
    #[default]
    Other,
}

/// A saved listing template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    pub description: String,
    pub category: TemplateCategory,
    /// Preview image URL
    pub thumbnail: String,
    pub html_content: String,
    pub css_content: String,
    /// Product-data placeholders the template uses, e.g. `[name]`
    pub tags: Vec<String>,
    /// Milliseconds since the Unix epoch
    pub created_at: u64,
    /// Milliseconds since the Unix epoch
    pub updated_at: u64,
}

/// Everything needed to create a template; id and timestamps are assigned
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateDraft {
    pub name: String,
    pub description: String,
    pub category: TemplateCategory,
    pub thumbnail: String,
    pub html_content: String,
    pub css_content: String,
    pub tags: Vec<String>,
}

impl TemplateDraft {
    /// Draft with a name and markup, everything else defaulted
    pub fn new(name: impl Into<String>, html_content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            html_content: html_content.into(),
            ..Self::default()
        }
    }
}

/// Partial update; `None` fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<TemplateCategory>,
    pub thumbnail: Option<String>,
    pub html_content: Option<String>,
    pub css_content: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl TemplatePatch {
    /// Whether the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Apply the patch; returns whether any field was set
    pub fn apply(self, template: &mut Template) -> bool {
        let changed = !self.is_empty();
        if let Some(v) = self.name {
            template.name = v;
        }
        if let Some(v) = self.description {
            template.description = v;
        }
        if let Some(v) = self.category {
            template.category = v;
        }
        if let Some(v) = self.thumbnail {
            template.thumbnail = v;
        }
        if let Some(v) = self.html_content {
            template.html_content = v;
        }
        if let Some(v) = self.css_content {
            template.css_content = v;
        }
        if let Some(v) = self.tags {
            template.tags = v;
        }
        changed
    }
}

/// Where the editor loads templates from and saves them into
pub trait TemplateStore: Send + Sync {
    /// Fetch a template by id
    fn load(&self, id: &TemplateId) -> Result<Template, StoreError>;

    /// Apply a partial update and return the updated template
    fn save(&self, id: &TemplateId, patch: TemplatePatch) -> Result<Template, StoreError>;
}

/// Template store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No template with the given id
    #[error("Template not found: {0}")]
    NotFound(TemplateId),

    /// Snapshot could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
