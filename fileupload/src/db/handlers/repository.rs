//! Base repository trait for record storage.

/// Contains the Repository trait.
///
/// A repository is the data access layer for one record kind. It stores
/// records keyed by their identity and knows nothing about HTTP. Every method
/// is a single store operation; no cross-record transaction is implied.
///
/// Each repository is generic over the record type R, which carries its own
/// table name through [`Record::TABLE`].
use crate::{
    db::{errors::Result, models::Record},
    types::{RecordId, Sort},
};

/// Base repository trait providing the storage operations used by the API
#[async_trait::async_trait]
pub trait Repository<R: Record>: Send + Sync {
    /// Insert when the record has no id, otherwise overwrite the stored row with
    /// exactly the given field values. Returns the persisted record with its id.
    ///
    /// Overwriting an id that is not stored fails with [`DbError::NotFound`](crate::db::errors::DbError::NotFound).
    async fn save(&self, record: R) -> Result<R>;

    /// Every stored record, ordered by `sort` when given, by ascending id otherwise
    async fn find_all(&self, sort: Option<Sort>) -> Result<Vec<R>>;

    /// Get a record by ID
    async fn find_by_id(&self, id: RecordId) -> Result<Option<R>>;

    /// Delete a record by ID. Returns whether a record was removed; a missing id is not an error.
    async fn delete_by_id(&self, id: RecordId) -> Result<bool>;

    /// Number of stored records
    async fn count(&self) -> Result<i64>;
}
