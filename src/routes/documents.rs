use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};

use super::multipart::collect_document_form;
use super::AppState;
use crate::models::{
    DeleteDocumentQuery, DeleteDocumentResponse, DocumentUploadResponse, DocumentsQuery,
    DocumentsResponse, ErrorResponse, StatisticsResponse,
};
use crate::services::{ALLOWED_EXTENSIONS, DOCUMENT_CATEGORIES};

/// Configure document catalog routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/documents", web::get().to(list_documents))
        .route("/documents", web::delete().to(delete_document))
        .route("/upload", web::get().to(upload_info))
        .route("/upload", web::post().to(upload_document));
}

/// List indexed documents or fetch catalog statistics
///
/// GET /api/docsecure/documents?action=list|stats&category=&search=&limit=&offset=
async fn list_documents(
    state: web::Data<AppState>,
    query: web::Query<DocumentsQuery>,
) -> impl Responder {
    if query.action == "stats" {
        return match state.indexer.stats().await {
            Ok(stats) => HttpResponse::Ok().json(StatisticsResponse {
                success: true,
                statistics: stats.statistics,
                degraded: stats.degraded,
            }),
            Err(e) => {
                tracing::error!("Statistics fetch failed: {}", e);
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Failed to fetch statistics".to_string(),
                    message: e.to_string(),
                    status_code: 500,
                })
            }
        };
    }

    let listing = state
        .indexer
        .list(
            query.category.as_deref(),
            query.search.as_deref(),
            query.limit,
            query.offset,
        )
        .await;

    match listing {
        Ok(listing) => HttpResponse::Ok().json(DocumentsResponse {
            success: true,
            documents: listing.documents,
            degraded: listing.degraded,
        }),
        Err(e) => {
            tracing::error!("Document listing failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to list documents".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Delete an indexed document
///
/// DELETE /api/docsecure/documents?id=
async fn delete_document(
    state: web::Data<AppState>,
    query: web::Query<DeleteDocumentQuery>,
) -> impl Responder {
    let Some(id) = query.id else {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Document ID is required".to_string(),
            message: "Query parameter \"id\" is missing".to_string(),
            status_code: 400,
        });
    };

    match state.indexer.delete(id).await {
        Ok(receipt) => {
            tracing::info!("Deleted document {}", id);
            HttpResponse::Ok().json(DeleteDocumentResponse {
                success: true,
                message: receipt.message,
            })
        }
        Err(e) => {
            tracing::error!("Document delete failed for {}: {}", id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to delete document".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Informational endpoint describing upload constraints
async fn upload_info(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "DOC Secure Upload API",
        "maxFileSize": format!("{}MB", state.archive.max_size_mb()),
        "allowedTypes": ALLOWED_EXTENSIONS,
        "categories": DOCUMENT_CATEGORIES,
    }))
}

/// Upload a document into the catalog
///
/// POST /api/docsecure/upload
///
/// Multipart form with `file`, `title`, `category` and an optional
/// `description`. The file is staged on disk, handed to the indexer and
/// discarded afterwards.
async fn upload_document(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, actix_web::Error> {
    let form = collect_document_form(&mut payload).await?;

    let Some(file) = form.file else {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: "No file uploaded".to_string(),
            message: "Multipart field \"file\" is missing".to_string(),
            status_code: 400,
        }));
    };

    if form.title.is_empty() || form.category.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: "Title and category are required".to_string(),
            message: "Multipart fields \"title\" and \"category\" must be non-empty".to_string(),
            status_code: 400,
        }));
    }

    if let Err(e) = state.archive.validate_document(
        &file.filename,
        file.content_type.as_deref(),
        file.bytes.len() as u64,
    ) {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: e.to_string(),
            status_code: 400,
        }));
    }

    let staged = match state.archive.stage(&file.filename, &file.bytes).await {
        Ok(path) => path,
        Err(e) => {
            tracing::error!("Could not stage upload {}: {}", file.filename, e);
            return Ok(HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Internal server error during file upload".to_string(),
                message: e.to_string(),
                status_code: 500,
            }));
        }
    };

    let outcome = state
        .indexer
        .upload(&staged, &form.title, &form.category, &form.description)
        .await;

    state.archive.discard(&staged).await;

    match outcome {
        Ok(receipt) => {
            tracing::info!(
                "Uploaded document \"{}\" to category {}",
                form.title,
                form.category
            );
            Ok(HttpResponse::Ok().json(DocumentUploadResponse {
                success: true,
                message: receipt.message,
                document_id: receipt.document_id,
                degraded: receipt.degraded,
            }))
        }
        Err(e) => {
            tracing::error!("Indexer rejected upload \"{}\": {}", form.title, e);
            Ok(HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to index document".to_string(),
                message: e.to_string(),
                status_code: 500,
            }))
        }
    }
}
