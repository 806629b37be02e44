//! Document value type flowing through embedding and retrieval.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unit of text with an identity and arbitrary metadata.
///
/// The `content` field is what gets embedded. Documents are value types:
/// they are copied across component boundaries and treated as immutable
/// once embedded into a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier.
    pub id: String,

    /// Text content to embed.
    pub content: String,

    /// Associated metadata.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Document {
    /// Create a document with an explicit id.
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    /// Create a document with a generated id.
    pub fn from_content(content: impl Into<String>) -> Self {
        Self::new(Uuid::new_v4().to_string(), content)
    }

    /// Attach a metadata entry.
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
