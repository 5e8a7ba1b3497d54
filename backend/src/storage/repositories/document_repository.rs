use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::Document;
use crate::storage::connection::DbConnection;
use crate::storage::traits::DocumentStorage;

#[derive(Clone)]
pub struct DocumentRepository {
    db: DbConnection,
}

impl DocumentRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn from_row(row: &SqliteRow) -> Result<Document> {
        let file_size: i64 = row.try_get("file_size")?;
        Ok(Document {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            original_name: row.try_get("original_name")?,
            filename: row.try_get("filename")?,
            file_path: row.try_get("file_path")?,
            file_type: row.try_get("file_type")?,
            file_size: u64::try_from(file_size)?,
            uploaded_at: row.try_get("uploaded_at")?,
        })
    }
}

#[async_trait]
impl DocumentStorage for DocumentRepository {
    async fn store_document(&self, document: &Document) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO documents
                (id, user_id, original_name, filename, file_path, file_type, file_size, uploaded_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&document.id)
        .bind(&document.user_id)
        .bind(&document.original_name)
        .bind(&document.filename)
        .bind(&document.file_path)
        .bind(&document.file_type)
        .bind(i64::try_from(document.file_size)?)
        .bind(document.uploaded_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_document(&self, document_id: &str) -> Result<Option<Document>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, original_name, filename, file_path, file_type, file_size, uploaded_at
            FROM documents
            WHERE id = ?
            "#,
        )
        .bind(document_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list_documents_for_user(&self, user_id: &str) -> Result<Vec<Document>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, original_name, filename, file_path, file_type, file_size, uploaded_at
            FROM documents
            WHERE user_id = ?
            ORDER BY uploaded_at DESC, ROWID DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::from_row).collect()
    }

    async fn delete_document(&self, document_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(document_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    async fn setup_test() -> DocumentRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        DocumentRepository::new(db)
    }

    fn test_document(id: &str, user_id: &str, hour: u32) -> Document {
        Document {
            id: id.to_string(),
            user_id: user_id.to_string(),
            original_name: "vaccine record.pdf".to_string(),
            filename: format!("{}_vaccine_record.pdf", hour),
            file_path: format!("/uploads/documents/user_a/{}_vaccine_record.pdf", hour),
            file_type: "application/pdf".to_string(),
            file_size: 2048,
            uploaded_at: Utc.with_ymd_and_hms(2024, 2, 1, hour, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_store_and_get_document() {
        let repo = setup_test().await;
        let document = test_document("document::1", "user::a", 9);
        repo.store_document(&document).await.expect("Failed to store document");

        assert_eq!(repo.get_document("document::1").await.unwrap(), Some(document));
    }

    #[tokio::test]
    async fn test_list_documents_newest_first() {
        let repo = setup_test().await;
        repo.store_document(&test_document("document::1", "user::a", 9)).await.unwrap();
        repo.store_document(&test_document("document::2", "user::a", 15)).await.unwrap();
        repo.store_document(&test_document("document::3", "user::b", 12)).await.unwrap();

        let documents = repo.list_documents_for_user("user::a").await.unwrap();
        let ids: Vec<&str> = documents.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["document::2", "document::1"]);
    }

    #[tokio::test]
    async fn test_delete_document() {
        let repo = setup_test().await;
        repo.store_document(&test_document("document::1", "user::a", 9)).await.unwrap();

        assert!(repo.delete_document("document::1").await.unwrap());
        assert!(!repo.delete_document("document::1").await.unwrap());
    }
}
