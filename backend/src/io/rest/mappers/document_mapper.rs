use shared::{Document as SharedDocument, DocumentListResponse, DocumentUploadResponse};

use crate::domain::models::Document as DomainDocument;

pub struct DocumentMapper;

impl DocumentMapper {
    pub fn to_dto(domain: DomainDocument) -> SharedDocument {
        SharedDocument {
            id: domain.id,
            user_id: domain.user_id,
            original_name: domain.original_name,
            filename: domain.filename,
            file_path: domain.file_path,
            file_type: domain.file_type,
            file_size: domain.file_size,
            uploaded_at: domain.uploaded_at.to_rfc3339(),
        }
    }

    pub fn to_upload_response(domain: DomainDocument) -> DocumentUploadResponse {
        DocumentUploadResponse {
            message: "Document uploaded".to_string(),
            new_document: Self::to_dto(domain),
        }
    }

    pub fn to_list_response(documents: Vec<DomainDocument>) -> DocumentListResponse {
        DocumentListResponse {
            documents: documents.into_iter().map(Self::to_dto).collect(),
        }
    }
}
