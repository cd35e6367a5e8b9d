use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::hash::{Hash, Hasher};
use utoipa::ToSchema;

use super::{Record, base64_bytes};
use crate::types::RecordId;

/// A named metadata record whose content and content type may be absent.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    id: Option<RecordId>,
    name: String,
    #[serde(default, with = "base64_bytes::option")]
    #[schema(value_type = Option<String>, format = Byte)]
    content: Option<Vec<u8>>,
    #[serde(default)]
    content_content_type: Option<String>,
}

impl FileRecord {
    /// A record that has not been persisted yet
    pub fn new(name: impl Into<String>, content: Option<Vec<u8>>, content_content_type: Option<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            content,
            content_content_type,
        }
    }

    pub fn id(&self) -> Option<RecordId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> Option<&[u8]> {
        self.content.as_deref()
    }

    pub fn content_content_type(&self) -> Option<&str> {
        self.content_content_type.as_deref()
    }

    pub fn with_id(self, id: Option<RecordId>) -> Self {
        Self { id, ..self }
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self { name: name.into(), ..self }
    }

    pub fn with_content(self, content: Option<Vec<u8>>) -> Self {
        Self { content, ..self }
    }

    pub fn with_content_content_type(self, content_content_type: Option<String>) -> Self {
        Self {
            content_content_type,
            ..self
        }
    }

    pub fn into_parts(self) -> (Option<RecordId>, String, Option<Vec<u8>>, Option<String>) {
        (self.id, self.name, self.content, self.content_content_type)
    }
}

impl Record for FileRecord {
    const TABLE: &'static str = "files";

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn with_id(self, id: RecordId) -> Self {
        FileRecord::with_id(self, Some(id))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn content(&self) -> Option<&[u8]> {
        self.content.as_deref()
    }

    fn content_content_type(&self) -> Option<&str> {
        self.content_content_type.as_deref()
    }
}

impl PartialEq for FileRecord {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
    }
}

impl Hash for FileRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_keyed_on_identity() {
        let first = FileRecord::new("AAAAAAAAAA", None, None).with_id(Some(1));
        let same_id = FileRecord::new("BBBBBBBBBB", Some(vec![1]), Some("image/png".into())).with_id(Some(1));
        assert_eq!(first, same_id);

        let other_id = same_id.clone().with_id(Some(2));
        assert_ne!(first, other_id);

        let unsaved = first.clone().with_id(None);
        assert_ne!(unsaved, other_id);
        assert_ne!(other_id, unsaved);
    }

    #[test]
    fn test_unsaved_records_are_only_equal_by_reference() {
        let unsaved = FileRecord::new("AAAAAAAAAA", None, None);
        let copy = unsaved.clone();
        assert_ne!(unsaved, copy);
        assert!(unsaved.eq(&unsaved));
    }

    #[test]
    fn test_with_field_updates_leave_original_fields_intact() {
        let record = FileRecord::new("a.txt", Some(vec![1, 2]), Some("text/plain".into()));
        let renamed = record.clone().with_name("b.txt");
        assert_eq!(renamed.name(), "b.txt");
        assert_eq!(renamed.content(), Some(&[1u8, 2][..]));
        assert_eq!(record.name(), "a.txt");

        let wiped = renamed.with_content(None).with_content_content_type(None);
        assert!(wiped.content().is_none());
        assert!(wiped.content_content_type().is_none());
    }

    #[test]
    fn test_json_shape_matches_camel_case_with_base64_content() {
        let record = FileRecord::new("a.txt", Some(vec![0x00]), Some("text/plain".into())).with_id(Some(7));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "name": "a.txt",
                "content": "AA==",
                "contentContentType": "text/plain"
            })
        );
    }
}
