use crate::models::domain::{
    Document, DocumentStatistics, NameMatchResult, RiskAssessmentClient, SanctionsEntry,
    SheetProfile,
};
use serde::{Deserialize, Serialize};

/// Metadata describing one screening extraction pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningMetadata {
    #[serde(rename = "sheetsProcessed")]
    pub sheets_processed: usize,
    #[serde(rename = "totalRows")]
    pub total_rows: usize,
    #[serde(rename = "extractionTimestamp")]
    pub extraction_timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub degraded: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Rollup block returned with every screening response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionSummary {
    #[serde(rename = "sheetsProcessed")]
    pub sheets_processed: usize,
    #[serde(rename = "clientsFound")]
    pub clients_found: usize,
    #[serde(rename = "riskFactorsExtracted")]
    pub risk_factors_extracted: usize,
}

/// Response for the screening endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningResponse {
    pub success: bool,
    pub message: String,
    pub matches: Vec<NameMatchResult>,
    pub clients: Vec<SheetProfile>,
    pub metadata: ScreeningMetadata,
    #[serde(rename = "totalNames")]
    pub total_names: usize,
    #[serde(rename = "totalMatches")]
    pub total_matches: usize,
    #[serde(rename = "extractionSummary")]
    pub extraction_summary: ExtractionSummary,
}

/// Metadata describing one risk-assessment extraction pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentMetadata {
    #[serde(rename = "totalSheets")]
    pub total_sheets: usize,
    #[serde(rename = "processedSheets")]
    pub processed_sheets: usize,
    #[serde(rename = "extractionTimestamp")]
    pub extraction_timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "totalCategories")]
    pub total_categories: usize,
    #[serde(rename = "totalFactors")]
    pub total_factors: usize,
}

/// Response for the risk-assessment extraction endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentResponse {
    pub success: bool,
    pub message: String,
    pub clients: Vec<RiskAssessmentClient>,
    pub metadata: AssessmentMetadata,
}

/// Response after a bulk replace of the sanctions store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceResponse {
    pub success: bool,
    pub count: usize,
}

/// Response after ingesting an XML or PDF sanctions list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    pub success: bool,
    pub message: String,
    pub data: Vec<SanctionsEntry>,
    pub count: usize,
}

/// User block returned on successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub username: String,
    pub role: String,
    pub permissions: Vec<String>,
}

/// Response for the login endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user: SessionUser,
}

/// Response for failed authentication requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthFailureResponse {
    pub success: bool,
    pub error: String,
}

/// User block returned by the session verify endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedUser {
    pub username: String,
    pub role: String,
}

/// Response for the session verify endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<VerifiedUser>,
}

/// Response for the logout endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: String,
}

/// Response listing indexed documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsResponse {
    pub success: bool,
    pub documents: Vec<Document>,
    #[serde(default)]
    pub degraded: bool,
}

/// Response carrying document catalog statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsResponse {
    pub success: bool,
    pub statistics: DocumentStatistics,
    #[serde(default)]
    pub degraded: bool,
}

/// Response after deleting a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteDocumentResponse {
    pub success: bool,
    pub message: String,
}

/// Response after uploading a document to the indexer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentUploadResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "documentId", skip_serializing_if = "Option::is_none")]
    pub document_id: Option<i64>,
    #[serde(default)]
    pub degraded: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(rename = "sanctionsLoaded")]
    pub sanctions_loaded: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Shared error body for failed requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}
