use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use log::debug;
use propdesk_core::errors::Result;
use propdesk_core::store::DocumentRepositoryTrait;

use super::model::DocumentDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::documents;

/// Key of the row holding the application document.
pub const DEFAULT_DOCUMENT_KEY: &str = "propdesk";

/// Keeps the whole document as one JSON payload in the `documents` table.
///
/// Reads use the pool; writes go through the single-writer actor.
pub struct DocumentRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
    document_key: String,
}

impl DocumentRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self::with_key(pool, writer, DEFAULT_DOCUMENT_KEY)
    }

    pub fn with_key(pool: Arc<DbPool>, writer: WriteHandle, document_key: impl Into<String>) -> Self {
        DocumentRepository {
            pool,
            writer,
            document_key: document_key.into(),
        }
    }

    /// Last time the payload was written, if ever.
    pub fn updated_at(&self) -> Result<Option<chrono::NaiveDateTime>> {
        let mut conn = get_connection(&self.pool)?;
        documents::table
            .find(&self.document_key)
            .select(documents::updated_at)
            .first::<chrono::NaiveDateTime>(&mut conn)
            .optional()
            .into_core()
    }
}

#[async_trait]
impl DocumentRepositoryTrait for DocumentRepository {
    fn load(&self) -> Result<Option<String>> {
        let mut conn = get_connection(&self.pool)?;
        documents::table
            .find(&self.document_key)
            .select(DocumentDB::as_select())
            .first(&mut conn)
            .optional()
            .map(|row| row.map(|r| r.payload))
            .into_core()
    }

    async fn save(&self, payload: String) -> Result<()> {
        let row = DocumentDB {
            document_key: self.document_key.clone(),
            payload,
            updated_at: Utc::now().naive_utc(),
        };
        debug!("Saving document '{}' ({} bytes)", row.document_key, row.payload.len());

        self.writer
            .exec(move |conn| {
                diesel::insert_into(documents::table)
                    .values(&row)
                    .on_conflict(documents::document_key)
                    .do_update()
                    .set((
                        documents::payload.eq(&row.payload),
                        documents::updated_at.eq(row.updated_at),
                    ))
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, spawn_writer};
    use propdesk_core::accounts::{AccountService, AccountServiceTrait, NewAccount};
    use propdesk_core::store::RecordStore;
    use tempfile::tempdir;

    fn create_test_repository(dir: &tempfile::TempDir, key: &str) -> DocumentRepository {
        let db_path = dir.path().join("test.db").to_string_lossy().to_string();
        let pool = create_pool(&db_path).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());
        DocumentRepository::with_key(pool, writer, key)
    }

    #[tokio::test]
    async fn test_load_is_none_before_first_save() {
        let dir = tempdir().unwrap();
        let repo = create_test_repository(&dir, DEFAULT_DOCUMENT_KEY);
        assert!(repo.load().unwrap().is_none());
        assert!(repo.updated_at().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites_the_single_row() {
        let dir = tempdir().unwrap();
        let repo = create_test_repository(&dir, DEFAULT_DOCUMENT_KEY);

        repo.save(r#"{"accounts":[]}"#.to_string()).await.unwrap();
        repo.save(r#"{"payouts":[]}"#.to_string()).await.unwrap();

        assert_eq!(repo.load().unwrap().as_deref(), Some(r#"{"payouts":[]}"#));
        assert!(repo.updated_at().unwrap().is_some());

        let mut conn = get_connection(&repo.pool).unwrap();
        let rows: i64 = documents::table.count().get_result(&mut conn).unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn test_keys_are_isolated() {
        let dir = tempdir().unwrap();
        let main = create_test_repository(&dir, "main");
        let scratch = DocumentRepository::with_key(main.pool.clone(), main.writer.clone(), "scratch");

        main.save("{}".to_string()).await.unwrap();
        assert!(scratch.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_record_store_survives_reopen() {
        let dir = tempdir().unwrap();
        let repo = Arc::new(create_test_repository(&dir, DEFAULT_DOCUMENT_KEY));

        let store = Arc::new(RecordStore::open(repo.clone()).unwrap());
        let account = AccountService::new(store.clone())
            .create_account(NewAccount {
                name: "Persisted".to_string(),
                initial_funding: Some(25_000.0),
                ..Default::default()
            })
            .await
            .unwrap();

        let reopened = RecordStore::open(repo).unwrap();
        let doc = reopened.snapshot();
        let loaded = doc.account(&account.id).unwrap();
        assert_eq!(loaded.name, "Persisted");
        assert_eq!(loaded.current_funding, 25_000.0);
    }
}
