//! Business services sitting between HTTP handlers and repositories.
//!
//! Only [`FileRecord`](crate::db::models::files::FileRecord) goes through a
//! service; file contents are handled directly against their repository.

pub mod files;

pub use files::{FileDto, FileService, FileServiceImpl};
