//! User documents (vaccination records, invoices, scans).
//!
//! The file is written before the row. If the row cannot be stored the file
//! is removed again; on removal the row goes first and the file follows
//! best-effort.

use std::sync::Arc;

use chrono::Utc;
use shared::EntityKind;
use tracing::info;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{new_id, Document};
use crate::domain::validation::ensure_owner;
use crate::storage::file_store::{FileStore, UploadedFile};
use crate::storage::traits::DocumentStorage;

#[derive(Clone)]
pub struct DocumentService {
    documents: Arc<dyn DocumentStorage>,
    files: FileStore,
}

impl DocumentService {
    pub fn new(documents: Arc<dyn DocumentStorage>, files: FileStore) -> Self {
        Self { documents, files }
    }

    pub async fn upload_document(
        &self,
        user_id: &str,
        file: Option<UploadedFile>,
    ) -> DomainResult<Document> {
        let file = file.ok_or_else(|| DomainError::validation("No document uploaded"))?;
        let stored = self.files.store_document(user_id, &file).await?;

        let document = Document {
            id: new_id(EntityKind::Document),
            user_id: user_id.to_string(),
            original_name: file.original_name.clone(),
            filename: stored.filename,
            file_path: stored.public_path,
            file_type: file.content_type.clone(),
            file_size: file.size(),
            uploaded_at: Utc::now(),
        };

        if let Err(e) = self.documents.store_document(&document).await {
            self.files.remove_document(user_id, &document.filename).await;
            return Err(e.into());
        }

        info!("Uploaded document {} ({} bytes)", document.id, document.file_size);
        Ok(document)
    }

    /// Caller's documents, most recent first
    pub async fn list_documents(&self, user_id: &str) -> DomainResult<Vec<Document>> {
        Ok(self.documents.list_documents_for_user(user_id).await?)
    }

    pub async fn remove_document(&self, user_id: &str, document_id: &str) -> DomainResult<()> {
        let document = self
            .documents
            .get_document(document_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Document not found"))?;
        ensure_owner(&document.user_id, user_id, "document")?;

        if !self.documents.delete_document(&document.id).await? {
            return Err(DomainError::not_found("Document not found"));
        }
        self.files
            .remove_document(&document.user_id, &document.filename)
            .await;

        info!("Removed document {}", document.id);
        Ok(())
    }
}
