use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};

use super::multipart::collect_file;
use super::AppState;
use crate::core::parse_consolidated_list;
use crate::models::{ErrorResponse, IngestResponse, ReplaceResponse, SanctionsEntry, SearchQuery};

/// Configure sanctions store routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/sanctions", web::get().to(get_sanctions))
        .route("/sanctions", web::post().to(replace_sanctions))
        .route("/search", web::get().to(search_sanctions))
        .route("/upload-xml", web::post().to(upload_xml))
        .route("/upload-pdf", web::post().to(upload_pdf));
}

/// Dump the current sanctions store as a raw array
///
/// GET /api/aml/sanctions
async fn get_sanctions(state: web::Data<AppState>) -> impl Responder {
    let entries = state.store.snapshot();
    HttpResponse::Ok().json(&*entries)
}

/// Replace the sanctions store with the posted array
///
/// POST /api/aml/sanctions
async fn replace_sanctions(
    state: web::Data<AppState>,
    body: web::Json<Vec<SanctionsEntry>>,
) -> impl Responder {
    let count = state.store.replace(body.into_inner());
    HttpResponse::Ok().json(ReplaceResponse {
        success: true,
        count,
    })
}

/// Search the sanctions store
///
/// GET /api/aml/search?query=&idFilter=&nameFilter=&typeFilter=&nationalityFilter=&perPage=
///
/// All filters are conjunctive; empty ones are skipped. The reply is the
/// matching entries as a raw array.
async fn search_sanctions(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> impl Responder {
    let results = state.store.search(&query);
    tracing::debug!("Search returned {} entries", results.len());
    HttpResponse::Ok().json(results)
}

/// Ingest a consolidated sanctions list in XML form
///
/// POST /api/aml/upload-xml
///
/// Multipart form with an `xmlFile` field. The parsed entries replace the
/// whole store.
async fn upload_xml(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, actix_web::Error> {
    let Some(file) = collect_file(&mut payload, "xmlFile").await? else {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: "No file uploaded".to_string(),
            message: "Multipart field \"xmlFile\" is missing".to_string(),
            status_code: 400,
        }));
    };

    state.archive.archive("xml", "xml", &file.bytes).await;

    let text = String::from_utf8_lossy(&file.bytes);
    let entries = match parse_consolidated_list(&text) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!("XML list parse failed: {}", e);
            return Ok(HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to process XML".to_string(),
                message: e.to_string(),
                status_code: 500,
            }));
        }
    };

    let count = state.store.replace(entries.clone());

    Ok(HttpResponse::Ok().json(IngestResponse {
        success: true,
        message: "XML processed successfully".to_string(),
        data: entries,
        count,
    }))
}

/// Ingest a sanctions list in PDF form
///
/// POST /api/aml/upload-pdf
///
/// Multipart form with a `pdfFile` field. Entries parsed from the
/// extracted text replace the whole store.
async fn upload_pdf(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, actix_web::Error> {
    let Some(file) = collect_file(&mut payload, "pdfFile").await? else {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: "No file uploaded".to_string(),
            message: "Multipart field \"pdfFile\" is missing".to_string(),
            status_code: 400,
        }));
    };

    state.archive.archive("pdfFile", "pdf", &file.bytes).await;

    let entries = match state.pdf_parser.parse_pdf(&file.bytes) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!("PDF list parse failed: {}", e);
            return Ok(HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to process PDF".to_string(),
                message: e.to_string(),
                status_code: 500,
            }));
        }
    };

    let count = state.store.replace(entries.clone());

    Ok(HttpResponse::Ok().json(IngestResponse {
        success: true,
        message: "PDF processed successfully".to_string(),
        data: entries,
        count,
    }))
}
