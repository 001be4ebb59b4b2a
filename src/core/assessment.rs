use crate::core::workbook::{Sheet, Workbook};
use crate::models::{DataQuality, RiskAssessmentClient, RiskCategory, RiskFactor, RiskLevel};

/// Categories expected in the assessment table, matched loosely since
/// workbooks abbreviate or extend the labels
const KNOWN_CATEGORIES: [&str; 5] = [
    "Zone géographique",
    "Caractéristiques du client",
    "Réputation du client",
    "Nature produits/opérations",
    "Canal de distribution",
];

/// Sheets that never contain client assessments
const SKIP_SHEETS: [&str; 5] = ["Instructions", "Guide", "Template", "Index", "Profil de risque"];

/// Header cells containing any of these identify the client name
const CLIENT_NAME_MARKERS: [&str; 4] = ["BANK", "SECURITIES", "AMAL", "CLIENT"];

/// The assessment table conventionally occupies rows 8-25, columns A-E
const TABLE_FIRST_ROW: usize = 7;
const TABLE_LAST_ROW: usize = 24;
/// Header area scanned for the client name
const HEADER_SCAN_LIMIT: usize = 10;
/// Date labels live in the top rows of the sheet
const DATE_SCAN_LAST_ROW: usize = 15;
/// The overall risk level sits within the last rows of the sheet
const LEVEL_SCAN_DEPTH: usize = 10;

/// Everything pulled out of one workbook during assessment extraction
#[derive(Debug, Clone)]
pub struct AssessmentExtraction {
    pub clients: Vec<RiskAssessmentClient>,
    pub total_sheets: usize,
}

/// Walk every client sheet of a decoded workbook and build one
/// `RiskAssessmentClient` per sheet
pub fn extract_risk_assessments(workbook: &Workbook) -> AssessmentExtraction {
    let mut clients = Vec::new();

    for sheet in &workbook.sheets {
        if SKIP_SHEETS.contains(&sheet.name.as_str()) {
            continue;
        }
        clients.push(assess_sheet(sheet));
    }

    AssessmentExtraction {
        clients,
        total_sheets: workbook.sheets.len(),
    }
}

fn assess_sheet(sheet: &Sheet) -> RiskAssessmentClient {
    let name = find_client_name(sheet).unwrap_or_else(|| sheet.name.clone());
    let (categories, risk_factors) = walk_assessment_table(sheet);
    let found_level = find_overall_level(sheet);
    let (update_date, assessment_date) = find_dates(sheet);

    let data_quality = DataQuality {
        categories_found: categories.len(),
        factors_found: risk_factors.len(),
        has_valid_risk_level: found_level.is_some(),
        has_update_date: !update_date.is_empty(),
        has_assessment_date: !assessment_date.is_empty(),
    };

    RiskAssessmentClient {
        name,
        risk_level: found_level.unwrap_or_default(),
        update_date,
        assessment_date,
        categories,
        risk_factors,
        additional_info: serde_json::Map::new(),
        data_quality,
    }
}

/// Scan the header area for a cell that looks like a client name.
/// The last matching cell wins.
fn find_client_name(sheet: &Sheet) -> Option<String> {
    let mut name = None;
    for row in 0..HEADER_SCAN_LIMIT.min(sheet.end_row()) {
        for col in 0..HEADER_SCAN_LIMIT.min(sheet.end_col()) {
            let Some(raw) = sheet.cell(row, col).as_text() else {
                continue;
            };
            let value = raw.trim();
            if value.chars().count() > 5
                && CLIENT_NAME_MARKERS.iter().any(|marker| value.contains(marker))
            {
                name = Some(value.to_string());
            }
        }
    }
    name
}

fn walk_assessment_table(sheet: &Sheet) -> (Vec<RiskCategory>, Vec<RiskFactor>) {
    let mut categories: Vec<RiskCategory> = Vec::new();
    let mut factors: Vec<RiskFactor> = Vec::new();

    let last_row = TABLE_LAST_ROW.min(sheet.end_row());
    for row in TABLE_FIRST_ROW..=last_row {
        let Some(label) = sheet.cell(row, 0).display().filter(|v| !v.is_empty()) else {
            continue;
        };

        if is_known_category(&label) {
            let rating = sheet
                .cell(row, 4)
                .display()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| RiskLevel::Faible.to_string());
            categories.push(RiskCategory {
                name: label,
                rating,
                factors: Vec::new(),
            });
        } else if let Some(category) = categories.last_mut() {
            let profile = factor_profile(sheet, row);
            let rating = sheet
                .cell(row, 4)
                .display()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| category.rating.clone());

            let factor = RiskFactor {
                name: label,
                profile,
                rating,
            };
            category.factors.push(factor.clone());
            factors.push(factor);
        }
    }

    (categories, factors)
}

fn is_known_category(label: &str) -> bool {
    let lower = label.to_lowercase();
    KNOWN_CATEGORIES.iter().any(|cat| {
        let cat_lower = cat.to_lowercase();
        lower.contains(&cat_lower) || cat_lower.contains(&lower)
    })
}

/// Columns B-D describe the client against this factor; risk tokens in
/// those columns belong to the rating column and are ignored here
fn factor_profile(sheet: &Sheet, row: usize) -> String {
    let parts: Vec<String> = (1..=3)
        .filter_map(|col| sheet.cell(row, col).display())
        .filter(|v| !v.is_empty() && RiskLevel::parse_token(v).is_none())
        .collect();

    if parts.is_empty() {
        "Non spécifié".to_string()
    } else {
        parts.join(" ")
    }
}

/// Look for a labeled overall risk level near the bottom of the sheet.
/// The token is expected within the three cells right of the label.
fn find_overall_level(sheet: &Sheet) -> Option<RiskLevel> {
    let mut found = None;
    let table_end = TABLE_LAST_ROW.min(sheet.end_row());
    let scan_start = table_end.max(sheet.end_row().saturating_sub(LEVEL_SCAN_DEPTH));

    for row in scan_start..=sheet.end_row() {
        for col in 0..=sheet.end_col() {
            let Some(raw) = sheet.cell(row, col).as_text() else {
                continue;
            };
            let lower = raw.trim().to_lowercase();
            if !lower.contains("niveau risque") && !lower.contains("risk level") {
                continue;
            }
            for risk_col in (col + 1)..=(col + 3).min(sheet.end_col()) {
                if let Some(value) = sheet.cell(row, risk_col).display() {
                    if let Some(level) = RiskLevel::parse_token(&value) {
                        found = Some(level);
                        break;
                    }
                }
            }
        }
    }

    found
}

fn find_dates(sheet: &Sheet) -> (String, String) {
    let mut update_date = String::new();
    let mut assessment_date = String::new();

    for row in 0..=DATE_SCAN_LAST_ROW.min(sheet.end_row()) {
        for col in 0..=sheet.end_col() {
            let Some(raw) = sheet.cell(row, col).as_text() else {
                continue;
            };
            let lower = raw.trim().to_lowercase();
            let next = || {
                sheet
                    .cell(row, col + 1)
                    .display()
                    .filter(|v| !v.is_empty())
            };

            if lower.contains("date de maj") || lower.contains("update date") {
                if let Some(value) = next() {
                    update_date = value;
                }
            } else if lower.contains("date d'eer") || lower.contains("assessment date") {
                if let Some(value) = next() {
                    assessment_date = value;
                }
            }
        }
    }

    (update_date, assessment_date)
}
