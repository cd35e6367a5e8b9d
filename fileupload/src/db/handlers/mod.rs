//! Repository implementations for record storage.
//!
//! Every record kind is served by the same [`Repository`] trait, with two
//! interchangeable implementations:
//!
//! - [`PgRepository`]: one PostgreSQL table per record kind, each operation a single statement
//! - [`InMemoryRepository`]: a concurrent map, used by the `memory` database mode and by tests
//!
//! Handlers hold repositories as `Arc<dyn Repository<R>>`, so the choice is
//! made once, at startup, from [`crate::config::DatabaseConfig`].
//!
//! # Common Pattern
//!
//! ```ignore
//! use fileupload::db::handlers::{PgRepository, Repository};
//! use fileupload::db::models::file_contents::FileContentRecord;
//!
//! async fn example(pool: sqlx::PgPool) -> anyhow::Result<()> {
//!     let repo = PgRepository::<FileContentRecord>::new(pool);
//!     let saved = repo.save(FileContentRecord::new("a.txt", b"hi".to_vec(), "text/plain")).await?;
//!     assert!(saved.id().is_some());
//!     Ok(())
//! }
//! ```

pub mod memory;
pub mod postgres;
pub mod repository;

pub use memory::InMemoryRepository;
pub use postgres::PgRepository;
pub use repository::Repository;
