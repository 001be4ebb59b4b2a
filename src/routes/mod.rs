// Route exports
pub mod auth;
pub mod documents;
mod multipart;
pub mod sanctions;
pub mod screening;

use crate::auth::CredentialVerifier;
use crate::config::ScreeningSettings;
use crate::core::PdfListParser;
use crate::models::HealthResponse;
use crate::services::{IndexerClient, UploadArchive};
use crate::store::SanctionsStore;
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SanctionsStore>,
    pub verifier: CredentialVerifier,
    pub indexer: Arc<IndexerClient>,
    pub archive: Arc<UploadArchive>,
    pub pdf_parser: Arc<PdfListParser>,
    pub screening: ScreeningSettings,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/aml")
            .configure(screening::configure)
            .configure(sanctions::configure),
    )
    .service(web::scope("/api/admin/auth").configure(auth::configure))
    .service(web::scope("/api/docsecure").configure(documents::configure))
    .route("/health", web::get().to(health_check));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        sanctions_loaded: state.store.len(),
        timestamp: chrono::Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            sanctions_loaded: 0,
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }
}
