//! Entity alert headers attached to mutating responses.
//!
//! A client UI reads these to show a notification without parsing the body:
//!
//! ```text
//! x-fileuploadapp-alert: fileuploadApp.fileContent.created
//! x-fileuploadapp-params: 42
//! ```
//!
//! Rejected requests carry `x-fileuploadapp-error: error.<key>` instead.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::types::RecordId;

pub const APPLICATION_NAME: &str = "fileuploadApp";

pub static ALERT_HEADER: HeaderName = HeaderName::from_static("x-fileuploadapp-alert");
pub static ERROR_HEADER: HeaderName = HeaderName::from_static("x-fileuploadapp-error");
pub static PARAMS_HEADER: HeaderName = HeaderName::from_static("x-fileuploadapp-params");

/// Entity name used in alerts for [`FileContentRecord`](crate::db::models::file_contents::FileContentRecord)
pub const FILE_CONTENT_ENTITY: &str = "fileContent";
/// Entity name used in alerts for [`FileRecord`](crate::db::models::files::FileRecord)
pub const FILE_ENTITY: &str = "file";

fn insert(headers: &mut HeaderMap, name: &HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(name.clone(), value);
        }
        Err(e) => tracing::warn!("Skipping header {}: {}", name, e),
    }
}

pub fn alert(message: &str, param: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    insert(&mut headers, &ALERT_HEADER, message);
    insert(&mut headers, &PARAMS_HEADER, param);
    headers
}

pub fn entity_creation_alert(entity_name: &str, id: RecordId) -> HeaderMap {
    alert(&format!("{APPLICATION_NAME}.{entity_name}.created"), &id.to_string())
}

pub fn entity_update_alert(entity_name: &str, id: RecordId) -> HeaderMap {
    alert(&format!("{APPLICATION_NAME}.{entity_name}.updated"), &id.to_string())
}

pub fn entity_deletion_alert(entity_name: &str, id: RecordId) -> HeaderMap {
    alert(&format!("{APPLICATION_NAME}.{entity_name}.deleted"), &id.to_string())
}

pub fn failure_alert(entity_name: &str, error_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    insert(&mut headers, &ERROR_HEADER, &format!("error.{error_key}"));
    insert(&mut headers, &PARAMS_HEADER, entity_name);
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation_alert() {
        let headers = entity_creation_alert(FILE_CONTENT_ENTITY, 42);
        assert_eq!(headers[&ALERT_HEADER], "fileuploadApp.fileContent.created");
        assert_eq!(headers[&PARAMS_HEADER], "42");
    }

    #[test]
    fn test_failure_alert() {
        let headers = failure_alert(FILE_ENTITY, "idnull");
        assert_eq!(headers[&ERROR_HEADER], "error.idnull");
        assert_eq!(headers[&PARAMS_HEADER], "file");
        assert!(!headers.contains_key(&ALERT_HEADER));
    }
}
