use serde::Deserialize;
use utoipa::ToSchema;

use crate::db::models::{base64_bytes, file_contents::FileContentRecord};
use crate::errors::Error;
use crate::types::RecordId;
use crate::upload::sanitize_filename;

/// Body of `PUT /api/file-contents`. The stored record is replaced by exactly
/// these values, so every field but the id is required.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileContentUpdate {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, with = "base64_bytes::option")]
    #[schema(value_type = Option<String>, format = Byte)]
    pub content: Option<Vec<u8>>,
    #[serde(default)]
    pub content_content_type: Option<String>,
}

impl FileContentUpdate {
    /// Validated record for the given id. Missing required fields are a bad request.
    ///
    /// The name goes through the same normalization as an uploaded filename, so an update
    /// cannot store a name that a multipart upload would have refused.
    pub fn into_record(self, id: RecordId) -> Result<FileContentRecord, Error> {
        let raw_name = self.name.filter(|n| !n.is_empty()).ok_or_else(|| missing("name"))?;
        let name = sanitize_filename(&raw_name).map_err(|e| Error::BadRequest {
            message: format!("Field 'name' is invalid: {e}"),
        })?;
        let content = self.content.ok_or_else(|| missing("content"))?;
        let content_type = self.content_content_type.ok_or_else(|| missing("contentContentType"))?;
        Ok(FileContentRecord::new(name, content, content_type).with_id(Some(id)))
    }
}

fn missing(field: &str) -> Error {
    Error::BadRequest {
        message: format!("Field '{field}' is required"),
    }
}
