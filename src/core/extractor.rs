use crate::core::workbook::{Sheet, Workbook};
use crate::models::{ExtractedCandidate, RiskFactorCell, RiskLevel, SheetProfile};
use std::collections::HashSet;

/// Column-0 cells containing any of these (case-insensitive) are labels
/// or identifiers, not client names
const NAME_STOPWORDS: [&str; 6] = ["name", "nom", "client", "id", "facteur", "zone"];

/// Longer cells mentioning any of these terms are recorded as risk factors
const RISK_FACTOR_TOKENS: [&str; 6] = [
    "risque",
    "géographique",
    "client",
    "produit",
    "réputation",
    "canal",
];

/// Stub candidate names substituted when an uploaded workbook cannot be
/// decoded and degraded mode is enabled
pub const FALLBACK_NAMES: [&str; 6] = [
    "Abdul Aziz Abbasin",
    "John Smith",
    "Abdul Rahman Agha",
    "Jane Doe",
    "Al-Qaeda Organization",
    "Test Company Ltd",
];

/// Everything pulled out of one workbook during screening extraction
#[derive(Debug, Clone)]
pub struct ScreeningExtraction {
    pub candidates: Vec<ExtractedCandidate>,
    pub clients: Vec<SheetProfile>,
    pub sheets_processed: usize,
    pub total_rows: usize,
}

impl ScreeningExtraction {
    /// Candidate names deduplicated across the workbook, first seen first
    pub fn unique_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for candidate in &self.candidates {
            if seen.insert(candidate.name.clone()) {
                names.push(candidate.name.clone());
            }
        }
        names
    }
}

/// Walk every sheet of a decoded workbook and collect candidate names,
/// per-sheet client profiles, risk factors and date labels
pub fn extract_screening_data(workbook: &Workbook) -> ScreeningExtraction {
    let mut extraction = ScreeningExtraction {
        candidates: Vec::new(),
        clients: Vec::new(),
        sheets_processed: 0,
        total_rows: 0,
    };

    for sheet in &workbook.sheets {
        extraction.sheets_processed += 1;
        extraction.total_rows += sheet.rows.len();

        let profile = walk_sheet(sheet, &mut extraction.candidates);
        if profile.is_meaningful() {
            extraction.clients.push(profile);
        }
    }

    extraction
}

fn walk_sheet(sheet: &Sheet, candidates: &mut Vec<ExtractedCandidate>) -> SheetProfile {
    let mut profile = SheetProfile::new(&sheet.name);

    for (row_idx, row) in sheet.rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let Some(raw) = cell.as_text() else { continue };
            let value = raw.trim();
            if value.chars().count() <= 2 {
                continue;
            }

            if col_idx == 0 && is_candidate_name(value) {
                candidates.push(ExtractedCandidate {
                    name: value.to_string(),
                    source_sheet: sheet.name.clone(),
                    source_row: row_idx,
                    source_column: col_idx,
                });
                profile.extracted_names.push(value.to_string());
            }

            if let Some(level) = RiskLevel::parse_token(value) {
                profile.risk_level = level;
            }

            if is_risk_factor(value) {
                profile.risk_factors.push(RiskFactorCell {
                    text: value.to_string(),
                    row: row_idx,
                    column: col_idx,
                });
            }

            if value.to_lowercase().contains("date") {
                if let Some(next) = row.get(col_idx + 1).and_then(|c| c.display()) {
                    if !next.is_empty() {
                        profile.dates.insert(value.to_string(), next);
                    }
                }
            }
        }
    }

    profile
}

/// A first-column cell is a candidate name when it is long enough and
/// carries none of the label stopwords
fn is_candidate_name(value: &str) -> bool {
    if value.chars().count() <= 3 {
        return false;
    }
    let lower = value.to_lowercase();
    !NAME_STOPWORDS.iter().any(|word| lower.contains(word))
}

fn is_risk_factor(value: &str) -> bool {
    value.chars().count() > 10 && RISK_FACTOR_TOKENS.iter().any(|token| value.contains(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::workbook::Cell;

    fn sheet_of(name: &str, rows: Vec<Vec<&str>>) -> Sheet {
        Sheet::from_rows(
            name,
            rows.into_iter()
                .map(|row| row.into_iter().map(Cell::text).collect())
                .collect(),
        )
    }

    #[test]
    fn test_extracts_names_from_first_column() {
        let workbook = Workbook::from_sheets(vec![sheet_of(
            "Clients",
            vec![
                vec!["Nom du client", "Notes"],
                vec!["Jean Dupont", "RAS"],
                vec!["Abdul Aziz Abbasin", ""],
            ],
        )]);

        let extraction = extract_screening_data(&workbook);

        assert_eq!(
            extraction.unique_names(),
            vec!["Jean Dupont", "Abdul Aziz Abbasin"]
        );
        // The header row is filtered by the stopword list
        assert!(!extraction.unique_names().contains(&"Nom du client".to_string()));
    }

    #[test]
    fn test_names_outside_first_column_ignored() {
        let workbook = Workbook::from_sheets(vec![sheet_of(
            "Clients",
            vec![vec!["", "Jean Dupont"]],
        )]);

        let extraction = extract_screening_data(&workbook);
        assert!(extraction.unique_names().is_empty());
    }

    #[test]
    fn test_risk_level_last_token_wins() {
        let workbook = Workbook::from_sheets(vec![sheet_of(
            "Profil",
            vec![
                vec!["Jean Dupont", "Faible"],
                vec!["Autre client", "Moyen"],
            ],
        )]);

        let extraction = extract_screening_data(&workbook);
        assert_eq!(extraction.clients[0].risk_level, RiskLevel::Moyen);
    }

    #[test]
    fn test_unaccented_eleve_is_normalized() {
        let workbook = Workbook::from_sheets(vec![sheet_of(
            "Profil",
            vec![vec!["Jean Dupont", "Elevé"]],
        )]);

        let extraction = extract_screening_data(&workbook);
        assert_eq!(extraction.clients[0].risk_level, RiskLevel::Eleve);
        assert_eq!(extraction.clients[0].risk_level.to_string(), "Élevé");
    }

    #[test]
    fn test_risk_factor_cells_recorded_with_position() {
        let workbook = Workbook::from_sheets(vec![sheet_of(
            "Profil",
            vec![
                vec!["Jean Dupont"],
                vec!["", "Zone géographique du client"],
            ],
        )]);

        let extraction = extract_screening_data(&workbook);
        let factors = &extraction.clients[0].risk_factors;
        assert_eq!(factors.len(), 1);
        assert_eq!(factors[0].text, "Zone géographique du client");
        assert_eq!(factors[0].row, 1);
        assert_eq!(factors[0].column, 1);
    }

    #[test]
    fn test_short_factor_text_ignored() {
        // "risque" alone is under the length floor
        let workbook = Workbook::from_sheets(vec![sheet_of(
            "Profil",
            vec![vec!["Jean Dupont", "risque"]],
        )]);

        let extraction = extract_screening_data(&workbook);
        assert!(extraction.clients[0].risk_factors.is_empty());
    }

    #[test]
    fn test_date_label_captures_next_cell() {
        let workbook = Workbook::from_sheets(vec![Sheet::from_rows(
            "Profil",
            vec![vec![
                Cell::text("Jean Dupont"),
                Cell::text("Date de mise à jour"),
                Cell::text("2024-01-15"),
            ]],
        )]);

        let extraction = extract_screening_data(&workbook);
        assert_eq!(
            extraction.clients[0].dates.get("Date de mise à jour"),
            Some(&"2024-01-15".to_string())
        );
    }

    #[test]
    fn test_sheets_without_findings_are_dropped() {
        let workbook = Workbook::from_sheets(vec![
            sheet_of("Vide", vec![vec!["abc"]]),
            sheet_of("Clients", vec![vec!["Jean Dupont"]]),
        ]);

        let extraction = extract_screening_data(&workbook);
        assert_eq!(extraction.sheets_processed, 2);
        assert_eq!(extraction.clients.len(), 1);
        assert_eq!(extraction.clients[0].sheet_name, "Clients");
    }

    #[test]
    fn test_duplicate_names_deduplicated_in_order() {
        let workbook = Workbook::from_sheets(vec![
            sheet_of("A", vec![vec!["Jean Dupont"], vec!["John Smith"]]),
            sheet_of("B", vec![vec!["Jean Dupont"]]),
        ]);

        let extraction = extract_screening_data(&workbook);
        assert_eq!(extraction.unique_names(), vec!["Jean Dupont", "John Smith"]);
        // Per-sheet profiles keep their own copies
        assert_eq!(extraction.clients.len(), 2);
    }
}
