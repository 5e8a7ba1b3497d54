//! # Upload Pipeline
//!
//! Stores uploaded files under the configured upload directory, which is
//! also served statically at `/uploads`:
//!
//! ```text
//! <root>/pets/                      raw pet images, removed after transcoding
//! <root>/pets/optimized/            800px wide JPEG (quality 80) pet images
//! <root>/documents/<user>/          user documents as <millis>_<token>_<name>
//! ```
//!
//! Deletions are best-effort. A file that is already gone is logged and
//! ignored, and nothing is rolled back when a later database write fails.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::ImageReader;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const PET_IMAGE_WIDTH: u32 = 800;
pub const PET_IMAGE_QUALITY: u8 = 80;

const MB: u64 = 1024 * 1024;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Unsupported file type: {0}")]
    InvalidFileType(String),
    #[error("File exceeds the {limit_bytes} byte limit")]
    FileTooLarge { limit_bytes: u64 },
    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A file received from a multipart form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// MIME allowlist and size ceiling for one kind of upload
#[derive(Debug, Clone, Copy)]
pub struct UploadPolicy {
    pub max_bytes: u64,
    accepts: fn(&str) -> bool,
}

impl UploadPolicy {
    pub fn check(&self, file: &UploadedFile) -> Result<(), UploadError> {
        if !(self.accepts)(&file.content_type) {
            return Err(UploadError::InvalidFileType(file.content_type.clone()));
        }
        if file.size() > self.max_bytes {
            return Err(UploadError::FileTooLarge {
                limit_bytes: self.max_bytes,
            });
        }
        Ok(())
    }
}

fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}

fn is_document(mime: &str) -> bool {
    matches!(mime, "application/pdf" | "image/jpeg" | "image/png")
}

pub const PET_IMAGE_POLICY: UploadPolicy = UploadPolicy {
    max_bytes: 5 * MB,
    accepts: is_image,
};

pub const DOCUMENT_POLICY: UploadPolicy = UploadPolicy {
    max_bytes: 10 * MB,
    accepts: is_document,
};

/// Where a document ended up
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub filename: String,
    /// URL path below /uploads
    pub public_path: String,
}

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn raw_pet_dir(&self) -> PathBuf {
        self.root.join("pets")
    }

    pub fn pet_image_dir(&self) -> PathBuf {
        self.root.join("pets").join("optimized")
    }

    fn document_dir(&self, user_id: &str) -> PathBuf {
        self.root.join("documents").join(user_dir_name(user_id))
    }

    pub fn pet_image_path(&self, name: &str) -> PathBuf {
        self.pet_image_dir().join(name)
    }

    pub fn document_path(&self, user_id: &str, filename: &str) -> PathBuf {
        self.document_dir(user_id).join(filename)
    }

    /// Validate, store and transcode a pet image. Returns the optimized file name.
    pub async fn store_pet_image(&self, file: &UploadedFile) -> Result<String, UploadError> {
        PET_IMAGE_POLICY.check(file)?;

        let millis = Utc::now().timestamp_millis();
        let raw_dir = self.raw_pet_dir();
        let optimized_dir = self.pet_image_dir();
        tokio::fs::create_dir_all(&optimized_dir).await?;

        let raw_path = raw_dir.join(format!("pet_{}{}", millis, extension_of(&file.original_name)));
        tokio::fs::write(&raw_path, &file.bytes).await?;
        debug!("Stored raw pet image at {}", raw_path.display());

        let optimized_name = format!("{}_{}.jpg", millis, short_token());
        let optimized_path = optimized_dir.join(&optimized_name);

        let source = raw_path.clone();
        let target = optimized_path.clone();
        let transcoded = tokio::task::spawn_blocking(move || transcode_pet_image(&source, &target)).await;

        remove_best_effort(&raw_path).await;
        match transcoded {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                remove_best_effort(&optimized_path).await;
                return Err(e);
            }
            Err(e) => return Err(e.into()),
        }

        info!("Stored optimized pet image {}", optimized_name);
        Ok(optimized_name)
    }

    /// Validate and store a document for a user.
    pub async fn store_document(
        &self,
        user_id: &str,
        file: &UploadedFile,
    ) -> Result<StoredDocument, UploadError> {
        DOCUMENT_POLICY.check(file)?;

        let dir = self.document_dir(user_id);
        tokio::fs::create_dir_all(&dir).await?;

        let filename = format!(
            "{}_{}_{}",
            Utc::now().timestamp_millis(),
            short_token(),
            sanitize_file_name(&file.original_name)
        );
        tokio::fs::write(dir.join(&filename), &file.bytes).await?;

        info!("Stored document {} for {}", filename, user_id);
        Ok(StoredDocument {
            public_path: format!("/uploads/documents/{}/{}", user_dir_name(user_id), filename),
            filename,
        })
    }

    pub async fn remove_pet_image(&self, name: &str) {
        remove_best_effort(&self.pet_image_path(name)).await;
    }

    pub async fn remove_document(&self, user_id: &str, filename: &str) {
        remove_best_effort(&self.document_path(user_id, filename)).await;
    }
}

fn transcode_pet_image(source: &Path, target: &Path) -> Result<(), UploadError> {
    let image = ImageReader::open(source)?.with_guessed_format()?.decode()?;

    let scale = f64::from(PET_IMAGE_WIDTH) / f64::from(image.width().max(1));
    let height = (f64::from(image.height()) * scale).round().max(1.0) as u32;
    let resized = image.resize_exact(PET_IMAGE_WIDTH, height, FilterType::Lanczos3);

    let mut writer = BufWriter::new(File::create(target)?);
    let encoder = JpegEncoder::new_with_quality(&mut writer, PET_IMAGE_QUALITY);
    resized.to_rgb8().write_with_encoder(encoder)?;
    writer.flush()?;
    Ok(())
}

async fn remove_best_effort(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!("Removed {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("File already missing, nothing to remove: {}", path.display())
        }
        Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
    }
}

/// Strip any directory part and replace whitespace runs with underscores.
pub fn sanitize_file_name(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");
    let cleaned = base.split_whitespace().collect::<Vec<_>>().join("_");
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default()
}

fn user_dir_name(user_id: &str) -> String {
    user_id.replace("::", "_")
}

fn short_token() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}
