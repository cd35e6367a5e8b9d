//! Storage layer for data persistence and access.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  (API request handlers, FileService)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │ Repositories│  (db::handlers - PostgreSQL or in-memory)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │   Models    │  (db::models - FileRecord, FileContentRecord)
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`handlers`]: Repository trait and its implementations
//! - [`models`]: Record structures matching table schemas
//! - [`errors`]: Storage error types
//!
//! # Migrations
//!
//! Database migrations are managed by SQLx and located in the `migrations/` directory.
//! The [`crate::migrator`] function provides access to the migrator:
//!
//! ```ignore
//! fileupload::migrator().run(&pool).await?;
//! ```

pub mod errors;
pub mod handlers;
pub mod models;
