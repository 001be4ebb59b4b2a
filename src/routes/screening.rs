use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};

use super::multipart::collect_file;
use super::AppState;
use crate::core::{
    decode_workbook, extract_risk_assessments, extract_screening_data, screen_names,
    FALLBACK_NAMES,
};
use crate::models::{
    AssessmentMetadata, AssessmentResponse, ErrorResponse, ExtractionSummary, ScreeningMetadata,
    ScreeningResponse,
};

/// Configure screening routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/match-excel", web::post().to(match_excel)).route(
        "/process-risk-assessment",
        web::post().to(process_risk_assessment),
    );
}

/// Screen an uploaded client workbook against the sanctions store
///
/// POST /api/aml/match-excel
///
/// Multipart form with an `excelFile` field. Every candidate name pulled
/// out of the workbook is fuzzy-matched against the loaded sanctions
/// entries. A workbook that cannot be decoded either degrades to the
/// built-in demo names or is rejected, depending on configuration.
async fn match_excel(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, actix_web::Error> {
    let Some(file) = collect_file(&mut payload, "excelFile").await? else {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: "No file uploaded".to_string(),
            message: "Multipart field \"excelFile\" is missing".to_string(),
            status_code: 400,
        }));
    };

    state.archive.archive("excel", "xlsx", &file.bytes).await;

    let mut clients = Vec::new();
    let mut sheets_processed = 0;
    let mut total_rows = 0;
    let mut degraded = false;
    let mut parse_error = None;

    let names = match decode_workbook(&file.bytes) {
        Ok(workbook) => {
            let extraction = extract_screening_data(&workbook);
            let names = extraction.unique_names();
            clients = extraction.clients;
            sheets_processed = extraction.sheets_processed;
            total_rows = extraction.total_rows;
            names
        }
        Err(e) if state.screening.fallback_on_parse_error => {
            tracing::warn!("Workbook decode failed, serving fallback names: {}", e);
            degraded = true;
            parse_error = Some(e.to_string());
            FALLBACK_NAMES.iter().map(|name| name.to_string()).collect()
        }
        Err(e) => {
            tracing::warn!("Workbook decode failed: {}", e);
            return Ok(HttpResponse::UnprocessableEntity().json(ErrorResponse {
                error: "Failed to process Excel file".to_string(),
                message: e.to_string(),
                status_code: 422,
            }));
        }
    };

    let entries = state.store.snapshot();
    let matches = screen_names(&names, &entries);
    let total_matches = matches.iter().filter(|m| !m.matches.is_empty()).count();
    let clients_found = clients.len();
    let risk_factors_extracted = clients.iter().map(|c| c.risk_factors.len()).sum();

    tracing::info!(
        "Screened {} names against {} sanctions entries, {} with matches",
        names.len(),
        entries.len(),
        total_matches
    );

    Ok(HttpResponse::Ok().json(ScreeningResponse {
        success: true,
        message: "Excel file processed successfully with enhanced data extraction".to_string(),
        matches,
        clients,
        metadata: ScreeningMetadata {
            sheets_processed,
            total_rows,
            extraction_timestamp: chrono::Utc::now(),
            degraded,
            error: parse_error,
        },
        total_names: names.len(),
        total_matches,
        extraction_summary: ExtractionSummary {
            sheets_processed,
            clients_found,
            risk_factors_extracted,
        },
    }))
}

/// Extract structured risk assessments from an uploaded workbook
///
/// POST /api/aml/process-risk-assessment
///
/// Multipart form with an `excelFile` field. Each client sheet yields one
/// assessment with its categories, factors, dates and overall level.
async fn process_risk_assessment(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, actix_web::Error> {
    let Some(file) = collect_file(&mut payload, "excelFile").await? else {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: "No file uploaded".to_string(),
            message: "Multipart field \"excelFile\" is missing".to_string(),
            status_code: 400,
        }));
    };

    state
        .archive
        .archive("risk-assessment", "xlsx", &file.bytes)
        .await;

    let workbook = match decode_workbook(&file.bytes) {
        Ok(workbook) => workbook,
        Err(e) => {
            tracing::error!("Risk assessment decode failed: {}", e);
            return Ok(HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to extract risk assessment data".to_string(),
                message: e.to_string(),
                status_code: 500,
            }));
        }
    };

    let extraction = extract_risk_assessments(&workbook);
    let processed_sheets = extraction.clients.len();
    let total_categories = extraction
        .clients
        .iter()
        .map(|c| c.categories.len())
        .sum();
    let total_factors = extraction
        .clients
        .iter()
        .map(|c| c.risk_factors.len())
        .sum();

    tracing::info!(
        "Extracted {} assessments from {} sheets",
        processed_sheets,
        extraction.total_sheets
    );

    Ok(HttpResponse::Ok().json(AssessmentResponse {
        success: true,
        message: "Risk assessment data extracted successfully".to_string(),
        clients: extraction.clients,
        metadata: AssessmentMetadata {
            total_sheets: extraction.total_sheets,
            processed_sheets,
            extraction_timestamp: chrono::Utc::now(),
            total_categories,
            total_factors,
        },
    }))
}
