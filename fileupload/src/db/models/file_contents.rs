use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::hash::{Hash, Hasher};
use utoipa::ToSchema;

use super::{Record, base64_bytes};
use crate::types::RecordId;

/// An uploaded binary object. Name, bytes and content type are all required.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileContentRecord {
    id: Option<RecordId>,
    name: String,
    #[serde(with = "base64_bytes")]
    #[schema(value_type = String, format = Byte)]
    content: Vec<u8>,
    content_content_type: String,
}

impl FileContentRecord {
    /// A record that has not been persisted yet
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>, content_content_type: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            content: content.into(),
            content_content_type: content_content_type.into(),
        }
    }

    pub fn id(&self) -> Option<RecordId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn content_content_type(&self) -> &str {
        &self.content_content_type
    }

    pub fn with_id(self, id: Option<RecordId>) -> Self {
        Self { id, ..self }
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self { name: name.into(), ..self }
    }

    pub fn with_content(self, content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: content.into(),
            ..self
        }
    }

    pub fn with_content_content_type(self, content_content_type: impl Into<String>) -> Self {
        Self {
            content_content_type: content_content_type.into(),
            ..self
        }
    }
}

impl Record for FileContentRecord {
    const TABLE: &'static str = "file_contents";

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn with_id(self, id: RecordId) -> Self {
        FileContentRecord::with_id(self, Some(id))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn content(&self) -> Option<&[u8]> {
        Some(&self.content)
    }

    fn content_content_type(&self) -> Option<&str> {
        Some(&self.content_content_type)
    }
}

impl PartialEq for FileContentRecord {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
    }
}

impl Hash for FileContentRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
