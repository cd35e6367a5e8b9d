//! HTTP handlers for `/api/file-contents`.
//!
//! Records of this kind are created only by multipart upload. Reads, full
//! overwrites and deletes act on the stored record by id.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use tracing::{debug, instrument};

use crate::{
    AppState,
    api::{
        extract::ApiJson,
        headers::{self, FILE_CONTENT_ENTITY},
        models::{ListQuery, file_contents::FileContentUpdate},
    },
    db::models::file_contents::FileContentRecord,
    errors::{Error, Result},
    types::RecordId,
    upload,
};

fn created_headers(id: RecordId) -> HeaderMap {
    let mut headers = headers::entity_creation_alert(FILE_CONTENT_ENTITY, id);
    if let Ok(location) = format!("/api/file-contents/{id}").parse() {
        headers.insert(header::LOCATION, location);
    }
    headers
}

/// Upload a file and store it as a new file content record.
#[utoipa::path(
    post,
    path = "/file-contents",
    tag = "file-contents",
    summary = "Upload file content",
    description = "Store the `file` part of a multipart body. The record name is the sanitized filename of the part.",
    request_body(
        content_type = "multipart/form-data",
        description = "Multipart body with a `file` part",
    ),
    responses(
        (status = 201, description = "File content stored", body = FileContentRecord,
            headers(("Location" = String, description = "URL of the new record"))),
        (status = 400, description = "Missing `file` part, missing or unsafe filename"),
        (status = 413, description = "Upload exceeds the configured size limit"),
        (status = 500, description = "The upload could not be read"),
    )
)]
#[instrument(skip_all)]
pub async fn create_file_content(State(state): State<AppState>, mut multipart: Multipart) -> Result<Response> {
    let upload = upload::read_upload(&mut multipart).await?;
    debug!("REST request to save FileContent : {}", upload.name);

    let record = FileContentRecord::new(upload.name, upload.content, upload.content_type);
    let saved = state.file_contents.save(record).await?;
    let id = saved.id().ok_or_else(|| Error::Internal {
        operation: "assign file content id".to_string(),
    })?;

    Ok((StatusCode::CREATED, created_headers(id), Json(saved)).into_response())
}

/// Replace a stored file content record.
#[utoipa::path(
    put,
    path = "/file-contents",
    tag = "file-contents",
    summary = "Update file content",
    description = "Overwrite every field of the record identified by `id`. Fields are not merged.",
    request_body = FileContentUpdate,
    responses(
        (status = 200, description = "Record updated", body = FileContentRecord),
        (status = 400, description = "Unreadable body, missing id, missing field or unsafe name"),
        (status = 404, description = "No record with this id"),
    )
)]
#[instrument(skip_all)]
pub async fn update_file_content(
    State(state): State<AppState>,
    ApiJson(update): ApiJson<FileContentUpdate>,
) -> Result<Response> {
    debug!("REST request to update FileContent : {:?}", update.id);
    let Some(id) = update.id else {
        return Err(Error::bad_request_alert("Invalid id", FILE_CONTENT_ENTITY, "idnull"));
    };

    let record = update.into_record(id)?;
    let saved = state.file_contents.save(record).await?;

    Ok((headers::entity_update_alert(FILE_CONTENT_ENTITY, id), Json(saved)).into_response())
}

/// List every stored file content record.
#[utoipa::path(
    get,
    path = "/file-contents",
    tag = "file-contents",
    summary = "List file contents",
    params(ListQuery),
    responses(
        (status = 200, description = "All records", body = [FileContentRecord]),
        (status = 400, description = "Unsupported sort parameter"),
    )
)]
#[instrument(skip_all)]
pub async fn list_file_contents(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<FileContentRecord>>> {
    debug!("REST request to get all FileContents");
    Ok(Json(state.file_contents.find_all(query.sort).await?))
}

/// Get a file content record by id.
#[utoipa::path(
    get,
    path = "/file-contents/{id}",
    tag = "file-contents",
    summary = "Get file content",
    params(("id" = i64, Path, description = "Record id")),
    responses(
        (status = 200, description = "The record", body = FileContentRecord),
        (status = 404, description = "No record with this id"),
    )
)]
#[instrument(skip_all)]
pub async fn get_file_content(State(state): State<AppState>, Path(id): Path<RecordId>) -> Result<Response> {
    debug!("REST request to get FileContent : {}", id);
    match state.file_contents.find_by_id(id).await? {
        Some(record) => Ok(Json(record).into_response()),
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}

/// Delete a file content record. Deleting a missing id succeeds.
#[utoipa::path(
    delete,
    path = "/file-contents/{id}",
    tag = "file-contents",
    summary = "Delete file content",
    params(("id" = i64, Path, description = "Record id")),
    responses(
        (status = 200, description = "Record removed or already absent"),
    )
)]
#[instrument(skip_all)]
pub async fn delete_file_content(State(state): State<AppState>, Path(id): Path<RecordId>) -> Result<Response> {
    debug!("REST request to delete FileContent : {}", id);
    state.file_contents.delete_by_id(id).await?;
    Ok((StatusCode::OK, headers::entity_deletion_alert(FILE_CONTENT_ENTITY, id)).into_response())
}
