//! Helpers shared by handler and router tests.

use std::sync::Arc;

use axum_test::TestServer;

use crate::{
    AppState, Application,
    config::Config,
    db::{
        handlers::InMemoryRepository,
        models::{file_contents::FileContentRecord, files::FileRecord},
    },
    service::{FileDto, FileServiceImpl},
};

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..Default::default()
    }
}

/// State backed by fresh in-memory repositories
pub fn create_test_state(config: Config) -> AppState {
    AppState::builder()
        .config(config)
        .file_contents(Arc::new(InMemoryRepository::<FileContentRecord>::new()))
        .files(Arc::new(FileServiceImpl::new(Arc::new(InMemoryRepository::<FileRecord>::new()))))
        .build()
}

/// Test server plus a handle on its state, for asserting on storage directly
pub fn create_test_app_with_config(config: Config) -> (TestServer, AppState) {
    let state = create_test_state(config);
    let app = Application::with_state(state.clone()).expect("Failed to create application");
    (app.into_test_server(), state)
}

pub fn create_test_app() -> (TestServer, AppState) {
    create_test_app_with_config(create_test_config())
}

pub async fn seed_file_content(state: &AppState, name: &str) -> FileContentRecord {
    state
        .file_contents
        .save(FileContentRecord::new(name, vec![0x01], "text/plain"))
        .await
        .expect("Failed to seed file content")
}

pub async fn seed_file(state: &AppState, name: &str) -> FileDto {
    state
        .files
        .save(FileDto {
            name: Some(name.to_string()),
            content: Some(vec![0x01]),
            content_content_type: Some("text/plain".to_string()),
            ..Default::default()
        })
        .await
        .expect("Failed to seed file")
}
