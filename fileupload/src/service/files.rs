use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::ToSchema;

use crate::{
    db::{
        handlers::Repository,
        models::{base64_bytes, files::FileRecord},
    },
    errors::{Error, Result},
    types::{RecordId, Sort},
    upload::MAX_NAME_LEN,
};

/// Wire representation of a [`FileRecord`]. Every field is optional so that
/// validation happens in the service rather than in deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileDto {
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

impl From<FileRecord> for FileDto {
    fn from(record: FileRecord) -> Self {
        let (id, name, content, content_content_type) = record.into_parts();
        Self {
            id,
            name: Some(name),
            content,
            content_content_type,
        }
    }
}

impl FileDto {
    /// Build the record this DTO describes. `None` when the required name is missing.
    pub fn into_record(self) -> Option<FileRecord> {
        let name = self.name?;
        Some(FileRecord::new(name, self.content, self.content_content_type).with_id(self.id))
    }
}

/// Record for a DTO that carries a usable name, else a bad request.
fn into_valid_record(dto: FileDto) -> Result<FileRecord> {
    let record = dto
        .into_record()
        .filter(|record| !record.name().is_empty())
        .ok_or_else(|| Error::BadRequest {
            message: "Field 'name' is required".to_string(),
        })?;
    if record.name().chars().count() > MAX_NAME_LEN {
        return Err(Error::BadRequest {
            message: format!("Field 'name' must be at most {MAX_NAME_LEN} characters"),
        });
    }
    Ok(record)
}

/// Operations on file metadata records.
#[async_trait::async_trait]
pub trait FileService: Send + Sync {
    /// Persist the file, inserting when it has no id and overwriting otherwise.
    /// A missing or overlong name is a bad request.
    async fn save(&self, file: FileDto) -> Result<FileDto>;

    async fn find_all(&self, sort: Option<Sort>) -> Result<Vec<FileDto>>;

    async fn find_one(&self, id: RecordId) -> Result<Option<FileDto>>;

    /// Remove the record. Missing ids are ignored.
    async fn delete(&self, id: RecordId) -> Result<()>;

    async fn count(&self) -> Result<i64>;
}

pub struct FileServiceImpl {
    repository: Arc<dyn Repository<FileRecord>>,
}

impl FileServiceImpl {
    pub fn new(repository: Arc<dyn Repository<FileRecord>>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl FileService for FileServiceImpl {
    #[instrument(skip_all, fields(id = ?file.id))]
    async fn save(&self, file: FileDto) -> Result<FileDto> {
        debug!("Request to save File : {:?}", file.name);
        let record = into_valid_record(file)?;
        let saved = self.repository.save(record).await?;
        Ok(saved.into())
    }

    #[instrument(skip(self))]
    async fn find_all(&self, sort: Option<Sort>) -> Result<Vec<FileDto>> {
        debug!("Request to get all Files");
        let files = self.repository.find_all(sort).await?;
        Ok(files.into_iter().map(FileDto::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_one(&self, id: RecordId) -> Result<Option<FileDto>> {
        debug!("Request to get File : {}", id);
        Ok(self.repository.find_by_id(id).await?.map(FileDto::from))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: RecordId) -> Result<()> {
        debug!("Request to delete File : {}", id);
        if !self.repository.delete_by_id(id).await? {
            debug!("File {} was already absent", id);
        }
        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.repository.count().await?)
    }
}
