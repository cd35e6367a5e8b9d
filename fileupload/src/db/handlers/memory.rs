//! In-process repository for the `memory` database mode and for tests.

use dashmap::DashMap;
use std::cmp::Ordering;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};
use tracing::instrument;

use crate::{
    db::{
        errors::{DbError, Result},
        handlers::repository::Repository,
        models::Record,
    },
    types::{RecordId, Sort, SortDirection, SortField},
};

/// Records kept in a concurrent map. Ids are handed out from a monotonic
/// counter starting at 1 and are never reused, matching an identity column.
pub struct InMemoryRepository<R> {
    records: DashMap<RecordId, R>,
    next_id: AtomicI64,
}

impl<R: Record> InMemoryRepository<R> {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl<R: Record> Default for InMemoryRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

fn compare<R: Record>(a: &R, b: &R, sort: Sort) -> Ordering {
    let ordering = match sort.field {
        SortField::Id => a.id().cmp(&b.id()),
        SortField::Name => a.name().cmp(b.name()),
        SortField::ContentContentType => a.content_content_type().cmp(&b.content_content_type()),
    };
    let ordering = match sort.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    };
    ordering.then_with(|| a.id().cmp(&b.id()))
}

#[async_trait::async_trait]
impl<R: Record> Repository<R> for InMemoryRepository<R> {
    #[instrument(skip(self, record), fields(table = R::TABLE, id = ?record.id()), err)]
    async fn save(&self, record: R) -> Result<R> {
        match record.id() {
            None => {
                let id = self.next_id.fetch_add(1, AtomicOrdering::SeqCst);
                let saved = record.with_id(id);
                self.records.insert(id, saved.clone());
                Ok(saved)
            }
            Some(id) => match self.records.get_mut(&id) {
                Some(mut stored) => {
                    *stored = record.clone();
                    Ok(record)
                }
                None => Err(DbError::NotFound),
            },
        }
    }

    #[instrument(skip(self), fields(table = R::TABLE), err)]
    async fn find_all(&self, sort: Option<Sort>) -> Result<Vec<R>> {
        let mut records: Vec<R> = self.records.iter().map(|entry| entry.value().clone()).collect();
        let sort = sort.unwrap_or(Sort::new(SortField::Id, SortDirection::Asc));
        records.sort_by(|a, b| compare(a, b, sort));

        Ok(records)
    }

    #[instrument(skip(self), fields(table = R::TABLE), err)]
    async fn find_by_id(&self, id: RecordId) -> Result<Option<R>> {
        Ok(self.records.get(&id).map(|entry| entry.value().clone()))
    }

    #[instrument(skip(self), fields(table = R::TABLE), err)]
    async fn delete_by_id(&self, id: RecordId) -> Result<bool> {
        Ok(self.records.remove(&id).is_some())
    }

    #[instrument(skip(self), fields(table = R::TABLE), err)]
    async fn count(&self) -> Result<i64> {
        Ok(self.records.len() as i64)
    }
}
