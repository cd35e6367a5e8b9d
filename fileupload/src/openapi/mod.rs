//! OpenAPI documentation for the `/api` surface, served by Scalar at `/api/docs`.

use utoipa::OpenApi;

use crate::api;
use crate::api::models::file_contents::FileContentUpdate;
use crate::db::models::{file_contents::FileContentRecord, files::FileRecord};
use crate::errors::AlertErrorBody;
use crate::service::FileDto;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "File upload API",
        description = "Store named binary objects with their content type.",
    ),
    servers(
        (url = "/api", description = "File upload API server")
    ),
    paths(
        api::handlers::file_contents::create_file_content,
        api::handlers::file_contents::update_file_content,
        api::handlers::file_contents::list_file_contents,
        api::handlers::file_contents::get_file_content,
        api::handlers::file_contents::delete_file_content,
        api::handlers::files::create_file,
        api::handlers::files::update_file,
        api::handlers::files::list_files,
        api::handlers::files::get_file,
        api::handlers::files::delete_file,
    ),
    components(schemas(FileContentRecord, FileContentUpdate, FileRecord, FileDto, AlertErrorBody)),
    tags(
        (name = "file-contents", description = "Uploaded files with their bytes and content type"),
        (name = "files", description = "File records created from JSON"),
    )
)]
pub struct ApiDoc;
