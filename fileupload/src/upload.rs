//! Multipart decoding for the file-content upload endpoint.
//!
//! [`read_upload`] pulls the `file` part out of a `multipart/form-data` body and
//! buffers it fully in memory. The part's filename goes through
//! [`sanitize_filename`] before it is ever stored, so a stored name never contains
//! a segment that climbs out of its root.

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::errors::Error;

/// Name of the multipart field carrying the upload.
pub const FILE_FIELD: &str = "file";

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Longest name the `name` column holds, in characters.
pub const MAX_NAME_LEN: usize = 255;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilenameError {
    #[error("Filename is empty")]
    Empty,
    #[error("Filename contains a NUL byte")]
    NulByte,
    #[error("Filename escapes its directory: {0}")]
    Traversal(String),
    #[error("Filename is longer than {} characters", MAX_NAME_LEN)]
    TooLong,
}

/// Normalize a client-supplied filename.
///
/// Backslashes become `/`, empty and `.` segments are dropped, and `seg/..`
/// pairs cancel out. A `..` that cannot be cancelled is rejected, as are NUL
/// bytes, names that normalize to nothing and names too long to store.
pub fn sanitize_filename(raw: &str) -> Result<String, FilenameError> {
    if raw.contains('\0') {
        return Err(FilenameError::NulByte);
    }

    let unified = raw.replace('\\', "/");
    let mut segments: Vec<&str> = Vec::new();
    let mut escaped = false;

    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(_) => {
                    segments.pop();
                }
                None => escaped = true,
            },
            other => segments.push(other),
        }
    }

    if escaped {
        return Err(FilenameError::Traversal(raw.to_string()));
    }
    if segments.is_empty() {
        return Err(FilenameError::Empty);
    }

    let name = segments.join("/");
    if name.chars().count() > MAX_NAME_LEN {
        return Err(FilenameError::TooLong);
    }
    Ok(name)
}

/// A fully buffered upload, ready to become a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub name: String,
    pub content: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug, Error)]
pub enum UploadError {
    /// The request does not carry a usable `file` part
    #[error("{0}")]
    Invalid(String),

    /// The body stream failed while reading the payload
    #[error("Failed to read upload: {0}")]
    Read(String),

    /// The body exceeded the configured size limit
    #[error("Upload exceeds the maximum allowed size")]
    TooLarge,
}

impl From<MultipartError> for UploadError {
    fn from(err: MultipartError) -> Self {
        let status = err.status();
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            UploadError::TooLarge
        } else if status.is_server_error() {
            UploadError::Read(err.body_text())
        } else {
            UploadError::Invalid(format!("Failed to parse multipart data: {}", err.body_text()))
        }
    }
}

impl From<UploadError> for Error {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Invalid(message) => Error::BadRequest { message },
            UploadError::Read(reason) => {
                tracing::error!("Upload body read failed: {}", reason);
                Error::Internal {
                    operation: "read upload".to_string(),
                }
            }
            UploadError::TooLarge => Error::PayloadTooLarge {
                message: UploadError::TooLarge.to_string(),
            },
        }
    }
}

/// Content type declared on the part, or one guessed from the filename.
fn resolve_content_type(declared: Option<&str>, name: &str) -> String {
    match declared.map(str::trim).filter(|s| !s.is_empty()) {
        Some(declared) => declared.to_string(),
        None => mime_guess::from_path(name)
            .first_raw()
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_string(),
    }
}

/// Read the `file` part of a multipart body. Other fields are skipped.
#[instrument(skip_all, err)]
pub async fn read_upload(multipart: &mut Multipart) -> Result<Upload, UploadError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let raw_name = field
            .file_name()
            .ok_or_else(|| UploadError::Invalid("The 'file' part has no filename".to_string()))?
            .to_string();
        let name = sanitize_filename(&raw_name).map_err(|e| UploadError::Invalid(e.to_string()))?;
        let content_type = resolve_content_type(field.content_type(), &name);

        let content = field.bytes().await?.to_vec();
        debug!("Read upload {} ({} bytes, {})", name, content.len(), content_type);

        return Ok(Upload {
            name,
            content,
            content_type,
        });
    }

    Err(UploadError::Invalid("Missing multipart field 'file'".to_string()))
}
