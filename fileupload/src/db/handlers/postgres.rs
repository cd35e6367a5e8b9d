//! PostgreSQL-backed repository, one table per record kind.

use sqlx::PgPool;
use std::marker::PhantomData;
use tracing::instrument;

use crate::{
    db::{errors::Result, handlers::repository::Repository, models::Record},
    types::{RecordId, Sort},
};

const COLUMNS: &str = "id, name, content, content_content_type";

/// Repository storing records of kind `R` in the table named by `R::TABLE`.
pub struct PgRepository<R> {
    pool: PgPool,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> PgRepository<R> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }

    async fn insert(&self, record: &R) -> Result<R> {
        let sql = format!(
            "INSERT INTO {} (name, content, content_content_type) VALUES ($1, $2, $3) RETURNING {COLUMNS}",
            R::TABLE
        );
        let saved = sqlx::query_as::<_, R>(&sql)
            .bind(record.name())
            .bind(record.content())
            .bind(record.content_content_type())
            .fetch_one(&self.pool)
            .await?;

        Ok(saved)
    }

    async fn overwrite(&self, id: RecordId, record: &R) -> Result<R> {
        // Total overwrite: absent optional fields become NULL
        let sql = format!(
            "UPDATE {} SET name = $2, content = $3, content_content_type = $4 WHERE id = $1 RETURNING {COLUMNS}",
            R::TABLE
        );
        let saved = sqlx::query_as::<_, R>(&sql)
            .bind(id)
            .bind(record.name())
            .bind(record.content())
            .bind(record.content_content_type())
            .fetch_one(&self.pool)
            .await?;

        Ok(saved)
    }
}

#[async_trait::async_trait]
impl<R: Record> Repository<R> for PgRepository<R> {
    #[instrument(skip(self, record), fields(table = R::TABLE, id = ?record.id()), err)]
    async fn save(&self, record: R) -> Result<R> {
        match record.id() {
            None => self.insert(&record).await,
            Some(id) => self.overwrite(id, &record).await,
        }
    }

    #[instrument(skip(self), fields(table = R::TABLE), err)]
    async fn find_all(&self, sort: Option<Sort>) -> Result<Vec<R>> {
        let order_by = match sort {
            Some(sort) => format!("{} {}, id ASC", sort.field.column(), sort.direction.as_sql()),
            None => "id ASC".to_string(),
        };
        let sql = format!("SELECT {COLUMNS} FROM {} ORDER BY {order_by}", R::TABLE);
        let records = sqlx::query_as::<_, R>(&sql).fetch_all(&self.pool).await?;

        Ok(records)
    }

    #[instrument(skip(self), fields(table = R::TABLE), err)]
    async fn find_by_id(&self, id: RecordId) -> Result<Option<R>> {
        let sql = format!("SELECT {COLUMNS} FROM {} WHERE id = $1", R::TABLE);
        let record = sqlx::query_as::<_, R>(&sql).bind(id).fetch_optional(&self.pool).await?;

        Ok(record)
    }

    #[instrument(skip(self), fields(table = R::TABLE), err)]
    async fn delete_by_id(&self, id: RecordId) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", R::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(table = R::TABLE), err)]
    async fn count(&self) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", R::TABLE);
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::errors::DbError;
    use crate::db::models::{file_contents::FileContentRecord, files::FileRecord};
    use crate::types::{SortDirection, SortField};

    #[sqlx::test]
    async fn test_save_assigns_id_and_find_by_id_returns_it(pool: PgPool) {
        let repo = PgRepository::<FileContentRecord>::new(pool);

        let saved = repo
            .save(FileContentRecord::new("report.csv", vec![0x01], "text/csv"))
            .await
            .unwrap();
        let id = saved.id().expect("insert should assign an id");

        let found = repo.find_by_id(id).await.unwrap().expect("record should exist");
        assert_eq!(found.name(), "report.csv");
        assert_eq!(found.content(), &[0x01]);
        assert_eq!(found.content_content_type(), "text/csv");
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[sqlx::test]
    async fn test_save_with_id_overwrites_every_field(pool: PgPool) {
        let repo = PgRepository::<FileRecord>::new(pool);

        let saved = repo
            .save(FileRecord::new("AAAAAAAAAA", Some(vec![0]), Some("image/jpg".into())))
            .await
            .unwrap();

        let updated = repo
            .save(saved.clone().with_name("BBBBBBBBBB").with_content(None).with_content_content_type(None))
            .await
            .unwrap();

        assert_eq!(updated.id(), saved.id());
        assert_eq!(updated.name(), "BBBBBBBBBB");
        assert!(updated.content().is_none());
        assert!(updated.content_content_type().is_none());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[sqlx::test]
    async fn test_save_with_unknown_id_is_not_found(pool: PgPool) {
        let repo = PgRepository::<FileRecord>::new(pool);

        let result = repo.save(FileRecord::new("ghost", None, None).with_id(Some(i64::MAX))).await;
        assert!(matches!(result, Err(DbError::NotFound)));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[sqlx::test]
    async fn test_delete_is_idempotent(pool: PgPool) {
        let repo = PgRepository::<FileContentRecord>::new(pool);
        let saved = repo.save(FileContentRecord::new("a.bin", vec![1, 2, 3], "application/octet-stream")).await.unwrap();
        let id = saved.id().unwrap();

        assert!(repo.delete_by_id(id).await.unwrap());
        assert!(!repo.delete_by_id(id).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(repo.find_by_id(id).await.unwrap().is_none());
    }

    #[sqlx::test]
    async fn test_find_all_honours_sort(pool: PgPool) {
        let repo = PgRepository::<FileRecord>::new(pool);
        for name in ["b", "c", "a"] {
            repo.save(FileRecord::new(name, None, None)).await.unwrap();
        }

        let by_id = repo.find_all(None).await.unwrap();
        let names: Vec<_> = by_id.iter().map(|r| r.name().to_string()).collect();
        assert_eq!(names, vec!["b", "c", "a"]);

        let by_name_desc = repo
            .find_all(Some(Sort::new(SortField::Name, SortDirection::Desc)))
            .await
            .unwrap();
        let names: Vec<_> = by_name_desc.iter().map(|r| r.name().to_string()).collect();
        assert_eq!(names, vec!["c", "b", "a"]);
    }
}
