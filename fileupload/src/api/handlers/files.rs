//! HTTP handlers for `/api/files`, backed by [`FileService`](crate::service::FileService).

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use tracing::{debug, instrument};

use crate::{
    AppState,
    api::{
        extract::ApiJson,
        headers::{self, FILE_ENTITY},
        models::ListQuery,
    },
    errors::{Error, Result},
    service::FileDto,
    types::RecordId,
};

/// Create a new file record.
#[utoipa::path(
    post,
    path = "/files",
    tag = "files",
    summary = "Create file",
    request_body = FileDto,
    responses(
        (status = 201, description = "File created", body = FileDto,
            headers(("Location" = String, description = "URL of the new record"))),
        (status = 400, description = "Unreadable body, or the body carries an id or misses the name"),
    )
)]
#[instrument(skip_all)]
pub async fn create_file(State(state): State<AppState>, ApiJson(dto): ApiJson<FileDto>) -> Result<Response> {
    debug!("REST request to save File : {:?}", dto.name);
    if dto.id.is_some() {
        return Err(Error::bad_request_alert(
            "A new file cannot already have an ID",
            FILE_ENTITY,
            "idexists",
        ));
    }

    let saved = state.files.save(dto).await?;
    let id = saved.id.ok_or_else(|| Error::Internal {
        operation: "assign file id".to_string(),
    })?;

    let mut headers: HeaderMap = headers::entity_creation_alert(FILE_ENTITY, id);
    if let Ok(location) = format!("/api/files/{id}").parse() {
        headers.insert(header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(saved)).into_response())
}

/// Replace a stored file record.
#[utoipa::path(
    put,
    path = "/files",
    tag = "files",
    summary = "Update file",
    description = "Overwrite every field of the record identified by `id`. Omitted optional fields are cleared.",
    request_body = FileDto,
    responses(
        (status = 200, description = "File updated", body = FileDto),
        (status = 400, description = "Unreadable body, missing id or name"),
        (status = 404, description = "No record with this id"),
    )
)]
#[instrument(skip_all)]
pub async fn update_file(State(state): State<AppState>, ApiJson(dto): ApiJson<FileDto>) -> Result<Response> {
    debug!("REST request to update File : {:?}", dto.id);
    let Some(id) = dto.id else {
        return Err(Error::bad_request_alert("Invalid id", FILE_ENTITY, "idnull"));
    };

    let saved = state.files.save(dto).await?;
    Ok((headers::entity_update_alert(FILE_ENTITY, id), Json(saved)).into_response())
}

/// List every stored file record.
#[utoipa::path(
    get,
    path = "/files",
    tag = "files",
    summary = "List files",
    params(ListQuery),
    responses(
        (status = 200, description = "All files", body = [FileDto]),
        (status = 400, description = "Unsupported sort parameter"),
    )
)]
#[instrument(skip_all)]
pub async fn list_files(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Result<Json<Vec<FileDto>>> {
    debug!("REST request to get all Files");
    Ok(Json(state.files.find_all(query.sort).await?))
}

/// Get a file record by id.
#[utoipa::path(
    get,
    path = "/files/{id}",
    tag = "files",
    summary = "Get file",
    params(("id" = i64, Path, description = "Record id")),
    responses(
        (status = 200, description = "The file", body = FileDto),
        (status = 404, description = "No record with this id"),
    )
)]
#[instrument(skip_all)]
pub async fn get_file(State(state): State<AppState>, Path(id): Path<RecordId>) -> Result<Response> {
    debug!("REST request to get File : {}", id);
    Ok(match state.files.find_one(id).await? {
        Some(file) => Json(file).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    })
}

/// Delete a file record. Deleting a missing id succeeds.
#[utoipa::path(
    delete,
    path = "/files/{id}",
    tag = "files",
    summary = "Delete file",
    params(("id" = i64, Path, description = "Record id")),
    responses(
        (status = 200, description = "File removed or already absent"),
    )
)]
#[instrument(skip_all)]
pub async fn delete_file(State(state): State<AppState>, Path(id): Path<RecordId>) -> Result<Response> {
    debug!("REST request to delete File : {}", id);
    state.files.delete(id).await?;
    Ok((StatusCode::OK, headers::entity_deletion_alert(FILE_ENTITY, id)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use serde_json::json;

    #[test_log::test(tokio::test)]
    async fn test_create_file() {
        let (server, state) = create_test_app();

        let response = server
            .post("/api/files")
            .json(&json!({"name": "notes.txt", "content": "aGk=", "contentContentType": "text/plain"}))
            .await;

        response.assert_status(StatusCode::CREATED);
        let created: FileDto = response.json();
        let id = created.id.unwrap();
        assert_eq!(created.content.as_deref(), Some(b"hi".as_slice()));
        assert_eq!(response.header(header::LOCATION), format!("/api/files/{id}"));
        assert_eq!(response.header(headers::ALERT_HEADER.as_str()), "fileuploadApp.file.created");
        assert_eq!(state.files.count().await.unwrap(), 1);
    }

    #[test_log::test(tokio::test)]
    async fn test_create_file_without_content() {
        let (server, _state) = create_test_app();

        let response = server.post("/api/files").json(&json!({"name": "empty"})).await;

        response.assert_status(StatusCode::CREATED);
        let body: serde_json::Value = response.json();
        assert!(body["content"].is_null());
        assert!(body["contentContentType"].is_null());
    }

    #[test_log::test(tokio::test)]
    async fn test_create_file_with_existing_id_is_rejected() {
        let (server, state) = create_test_app();

        let response = server.post("/api/files").json(&json!({"id": 1, "name": "a.txt"})).await;

        response.assert_status_bad_request();
        assert_eq!(response.header(headers::ERROR_HEADER.as_str()), "error.idexists");
        assert_eq!(state.files.count().await.unwrap(), 0);
    }

    #[test_log::test(tokio::test)]
    async fn test_create_file_requires_name() {
        let (server, state) = create_test_app();

        let response = server.post("/api/files").json(&json!({"contentContentType": "text/plain"})).await;

        response.assert_status_bad_request();
        assert_eq!(state.files.count().await.unwrap(), 0);
    }

    #[test_log::test(tokio::test)]
    async fn test_create_file_with_overlong_name_is_rejected() {
        let (server, state) = create_test_app();

        let response = server.post("/api/files").json(&json!({"name": "x".repeat(300)})).await;

        response.assert_status_bad_request();
        assert_eq!(state.files.count().await.unwrap(), 0);
    }

    #[test_log::test(tokio::test)]
    async fn test_create_file_with_invalid_base64_is_bad_request() {
        let (server, state) = create_test_app();

        let response = server
            .post("/api/files")
            .json(&json!({"name": "a", "content": "not base64!"}))
            .await;

        response.assert_status_bad_request();
        assert_eq!(state.files.count().await.unwrap(), 0);
    }

    #[test_log::test(tokio::test)]
    async fn test_malformed_json_is_bad_request() {
        let (server, state) = create_test_app();

        let response = server
            .post("/api/files")
            .content_type("application/json")
            .bytes("{\"name\": ".into())
            .await;

        response.assert_status_bad_request();
        assert_eq!(state.files.count().await.unwrap(), 0);
    }

    #[test_log::test(tokio::test)]
    async fn test_update_file_with_string_id_is_bad_request() {
        let (server, state) = create_test_app();
        let id = seed_file(&state, "a.txt").await.id.unwrap();

        let response = server.put("/api/files").json(&json!({"id": "abc", "name": "b.txt"})).await;

        response.assert_status_bad_request();
        let stored = state.files.find_one(id).await.unwrap().unwrap();
        assert_eq!(stored.name.as_deref(), Some("a.txt"));
    }

    #[test_log::test(tokio::test)]
    async fn test_update_file_with_null_id_is_rejected() {
        let (server, state) = create_test_app();
        seed_file(&state, "a.txt").await;

        let response = server.put("/api/files").json(&json!({"name": "b.txt"})).await;

        response.assert_status_bad_request();
        assert_eq!(response.header(headers::ERROR_HEADER.as_str()), "error.idnull");
        assert_eq!(state.files.count().await.unwrap(), 1);
    }

    #[test_log::test(tokio::test)]
    async fn test_update_file_clears_omitted_fields() {
        let (server, state) = create_test_app();
        let id = seed_file(&state, "a.txt").await.id.unwrap();

        let response = server.put("/api/files").json(&json!({"id": id, "name": "renamed.txt"})).await;

        response.assert_status_ok();
        assert_eq!(response.header(headers::ALERT_HEADER.as_str()), "fileuploadApp.file.updated");
        let stored = state.files.find_one(id).await.unwrap().unwrap();
        assert_eq!(stored.name.as_deref(), Some("renamed.txt"));
        assert_eq!(stored.content, None);
        assert_eq!(stored.content_content_type, None);
        assert_eq!(state.files.count().await.unwrap(), 1);
    }

    #[test_log::test(tokio::test)]
    async fn test_get_list_and_delete_files() {
        let (server, state) = create_test_app();
        let first = seed_file(&state, "b.txt").await.id.unwrap();
        let second = seed_file(&state, "a.txt").await.id.unwrap();

        let response = server.get("/api/files").add_query_param("sort", "name,asc").await;
        response.assert_status_ok();
        let names: Vec<String> = response.json::<Vec<FileDto>>().into_iter().filter_map(|f| f.name).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);

        server.get(&format!("/api/files/{first}")).await.assert_status_ok();
        server.get(&format!("/api/files/{}", i64::MAX)).await.assert_status_not_found();

        server.delete(&format!("/api/files/{second}")).await.assert_status_ok();
        server.delete(&format!("/api/files/{second}")).await.assert_status_ok();
        assert_eq!(state.files.count().await.unwrap(), 1);
    }
}
