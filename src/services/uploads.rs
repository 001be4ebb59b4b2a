use crate::config::UploadSettings;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Extensions accepted for document uploads
pub const ALLOWED_EXTENSIONS: [&str; 7] =
    [".pdf", ".docx", ".xlsx", ".pptx", ".doc", ".xls", ".ppt"];

/// Categories the document catalog is organized into
pub const DOCUMENT_CATEGORIES: [&str; 4] =
    ["Procédures", "Modes d'emploi", "Notes internes", "Politiques"];

/// MIME types accepted for document uploads
pub const ALLOWED_MIME_TYPES: [&str; 7] = [
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "application/msword",
    "application/vnd.ms-excel",
    "application/vnd.ms-powerpoint",
];

/// Rejections produced by upload validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("File size ({size_mb:.2}MB) exceeds maximum allowed size ({max_mb}MB)")]
    TooLarge { size_mb: f64, max_mb: u64 },

    #[error("File type '{extension}' is not allowed. Allowed types: {allowed}")]
    DisallowedType { extension: String, allowed: String },
}

/// Upload staging and archival
///
/// Screening and list uploads are archived with timestamped names so a
/// processed workbook can be re-examined later. Archival is best-effort;
/// a failed write is logged and never fails the request. Document uploads
/// are staged to a scratch area for the indexer and discarded afterwards.
pub struct UploadArchive {
    dir: PathBuf,
    max_size_mb: u64,
}

impl UploadArchive {
    /// Create a new archive rooted at the configured directory
    pub fn new(settings: &UploadSettings) -> Self {
        Self {
            dir: PathBuf::from(&settings.dir),
            max_size_mb: settings.max_size_mb,
        }
    }

    /// Configured upload size ceiling in megabytes
    pub fn max_size_mb(&self) -> u64 {
        self.max_size_mb
    }

    /// Validate a document upload by size, then MIME type or extension
    pub fn validate_document(
        &self,
        filename: &str,
        content_type: Option<&str>,
        size: u64,
    ) -> Result<(), ValidationError> {
        let max_bytes = self.max_size_mb * 1024 * 1024;
        if size > max_bytes {
            return Err(ValidationError::TooLarge {
                size_mb: size as f64 / 1024.0 / 1024.0,
                max_mb: self.max_size_mb,
            });
        }

        if content_type.is_some_and(|mime| ALLOWED_MIME_TYPES.contains(&mime)) {
            return Ok(());
        }

        let extension = file_extension(filename);
        if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Ok(());
        }

        Err(ValidationError::DisallowedType {
            extension,
            allowed: ALLOWED_EXTENSIONS.join(", "),
        })
    }

    /// Archive uploaded bytes under a timestamped name, best-effort
    pub async fn archive(&self, prefix: &str, extension: &str, bytes: &[u8]) -> Option<PathBuf> {
        let name = format!(
            "{}-{}.{}",
            prefix,
            chrono::Utc::now().timestamp_millis(),
            extension
        );
        let path = self.dir.join(name);

        if let Err(e) = fs::create_dir_all(&self.dir).await {
            tracing::warn!("Could not create upload directory {:?}: {}", self.dir, e);
            return None;
        }
        if let Err(e) = fs::write(&path, bytes).await {
            tracing::warn!("Could not archive upload to {:?}: {}", path, e);
            return None;
        }

        tracing::debug!("Archived upload to {:?}", path);
        Some(path)
    }

    /// Stage a document upload for the indexer
    ///
    /// Unlike archiving, staging failures are fatal to the request since
    /// the indexer needs the file on disk.
    pub async fn stage(&self, original_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        let scratch = self.dir.join("tmp");
        fs::create_dir_all(&scratch).await?;

        let base = Path::new(original_name)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.bin".to_string());
        let path = scratch.join(format!(
            "{}_{}",
            chrono::Utc::now().timestamp_millis(),
            base
        ));

        fs::write(&path, bytes).await?;
        Ok(path)
    }

    /// Remove a staged file, best-effort
    pub async fn discard(&self, path: &Path) {
        if let Err(e) = fs::remove_file(path).await {
            tracing::warn!("Could not remove staged file {:?}: {}", path, e);
        }
    }
}

/// Lowercased extension of a filename, including the leading dot
fn file_extension(filename: &str) -> String {
    match filename.rfind('.') {
        Some(idx) => filename[idx..].to_lowercase(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UploadSettings;

    fn archive_at(dir: &Path) -> UploadArchive {
        UploadArchive::new(&UploadSettings {
            dir: dir.to_string_lossy().into_owned(),
            max_size_mb: 50,
        })
    }

    #[test]
    fn test_validate_accepts_allowed_extension() {
        let archive = archive_at(Path::new("uploads"));
        assert!(archive
            .validate_document("notes.PDF", None, 1024)
            .is_ok());
        assert!(archive
            .validate_document("slides.pptx", Some("application/octet-stream"), 1024)
            .is_ok());
    }

    #[test]
    fn test_validate_accepts_known_mime_with_odd_name() {
        let archive = archive_at(Path::new("uploads"));
        assert!(archive
            .validate_document("export", Some("application/pdf"), 1024)
            .is_ok());
    }

    #[test]
    fn test_validate_rejects_disallowed_type() {
        let archive = archive_at(Path::new("uploads"));
        let err = archive
            .validate_document("payload.exe", None, 1024)
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("'.exe'"));
        assert!(message.contains(".pdf"));
    }

    #[test]
    fn test_validate_rejects_oversize() {
        let archive = archive_at(Path::new("uploads"));
        let err = archive
            .validate_document("big.pdf", None, 51 * 1024 * 1024)
            .unwrap_err();
        assert!(err.to_string().contains("maximum allowed size (50MB)"));
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("report.PDF"), ".pdf");
        assert_eq!(file_extension("archive.tar.gz"), ".gz");
        assert_eq!(file_extension("noext"), "");
    }

    #[tokio::test]
    async fn test_archive_writes_timestamped_file() {
        let dir = tempfile::tempdir().unwrap();
        let archive = archive_at(dir.path());

        let path = archive.archive("excel", "xlsx", b"workbook bytes").await;
        let path = path.unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("excel-"));
        assert!(name.ends_with(".xlsx"));
        assert_eq!(std::fs::read(&path).unwrap(), b"workbook bytes");
    }

    #[tokio::test]
    async fn test_stage_and_discard() {
        let dir = tempfile::tempdir().unwrap();
        let archive = archive_at(dir.path());

        let staged = archive.stage("../sneaky/report.pdf", b"doc").await.unwrap();
        assert!(staged.exists());
        let name = staged.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.ends_with("_report.pdf"));

        archive.discard(&staged).await;
        assert!(!staged.exists());
    }
}
