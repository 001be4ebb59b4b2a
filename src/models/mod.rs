// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{DataQuality, Document, DocumentStatistics, EntryType, ExtractedCandidate, MatchTier, NameMatchResult, RiskAssessmentClient, RiskCategory, RiskFactor, RiskFactorCell, RiskLevel, SanctionMatch, SanctionsEntry, Session, SheetProfile};
pub use requests::{DeleteDocumentQuery, DocumentsQuery, LoginRequest, SearchQuery};
pub use responses::{AssessmentMetadata, AssessmentResponse, AuthFailureResponse, DeleteDocumentResponse, DocumentUploadResponse, DocumentsResponse, ErrorResponse, ExtractionSummary, HealthResponse, IngestResponse, LoginResponse, LogoutResponse, ReplaceResponse, ScreeningMetadata, ScreeningResponse, SessionUser, StatisticsResponse, VerifiedUser, VerifyResponse};
