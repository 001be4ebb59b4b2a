// Unit tests for AML Center

use aml_center::core::{
    extract_risk_assessments, extract_screening_data, match_tier, parse_consolidated_list,
    screen_names, similarity, Cell, PdfListParser, Sheet, Workbook, HIGH_THRESHOLD,
    INCLUSION_THRESHOLD, MEDIUM_THRESHOLD,
};
use aml_center::models::{EntryType, MatchTier, RiskLevel, SanctionsEntry, SearchQuery};
use aml_center::store::SanctionsStore;

fn person(id: &str, name: &str) -> SanctionsEntry {
    SanctionsEntry::new(id, name, EntryType::Person)
}

fn sheet_of(name: &str, rows: Vec<Vec<&str>>) -> Sheet {
    Sheet::from_rows(
        name,
        rows.into_iter()
            .map(|row| row.into_iter().map(Cell::text).collect())
            .collect(),
    )
}

#[test]
fn test_similarity_identity_and_symmetry() {
    let samples = [
        "Abdul Aziz Abbasin",
        "Jean Dupont",
        "Al-Qaida",
        "écart composé",
        "",
    ];

    for s in samples {
        assert_eq!(similarity(s, s), 1.0, "identity failed for {:?}", s);
    }

    for a in samples {
        for b in samples {
            assert_eq!(
                similarity(a, b),
                similarity(b, a),
                "symmetry failed for {:?} / {:?}",
                a,
                b
            );
        }
    }
}

#[test]
fn test_similarity_is_case_insensitive() {
    assert_eq!(similarity("ABDUL AZIZ", "abdul aziz"), 1.0);
}

#[test]
fn test_matches_never_include_scores_at_or_below_inclusion_threshold() {
    // "ab" vs "abcd" scores exactly at the inclusion threshold
    assert_eq!(similarity("ab", "abcd"), INCLUSION_THRESHOLD);

    let entries = vec![person("1", "abcd"), person("2", "zzzz")];
    let results = screen_names(&[String::from("ab")], &entries);

    assert_eq!(results.len(), 1);
    assert!(results[0].matches.is_empty());

    for result in &results {
        for m in &result.matches {
            assert!(m.similarity > INCLUSION_THRESHOLD);
        }
    }
}

#[test]
fn test_tier_boundaries() {
    // Boundary values fall into the lower tier; only strict excess promotes
    assert_eq!(match_tier(HIGH_THRESHOLD), MatchTier::Medium);
    assert_eq!(match_tier(MEDIUM_THRESHOLD), MatchTier::Low);
    assert_eq!(match_tier(INCLUSION_THRESHOLD), MatchTier::Low);
    assert_eq!(match_tier(0.801), MatchTier::High);
    assert_eq!(match_tier(0.601), MatchTier::Medium);
    assert_eq!(match_tier(1.0), MatchTier::High);
}

#[test]
fn test_empty_store_yields_empty_matches() {
    let results = screen_names(&[String::from("Abdul Aziz Abbasin")], &[]);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Abdul Aziz Abbasin");
    assert!(results[0].matches.is_empty());
}

#[test]
fn test_near_identical_name_is_a_high_tier_match() {
    let entries = vec![person("1", "Abdul Aziz Abbasin")];
    let results = screen_names(&[String::from("Abdul Aziz Abbasine")], &entries);

    assert_eq!(results[0].matches.len(), 1);
    let m = &results[0].matches[0];
    assert!(m.similarity > 0.9, "similarity was {}", m.similarity);
    assert_eq!(m.match_type, MatchTier::High);
}

#[test]
fn test_screening_sheet_extraction_properties() {
    let workbook = Workbook::from_sheets(vec![sheet_of(
        "Feuille1",
        vec![
            vec!["Nom", "Commentaire"],
            vec!["", ""],
            vec!["Jean Dupont", "client historique"],
            vec!["", "Moyen"],
        ],
    )]);

    let extraction = extract_screening_data(&workbook);

    let names = extraction.unique_names();
    assert!(names.contains(&"Jean Dupont".to_string()));
    assert!(!names.contains(&"Nom".to_string()));

    assert_eq!(extraction.clients.len(), 1);
    assert_eq!(extraction.clients[0].risk_level, RiskLevel::Moyen);
}

#[test]
fn test_unaccented_level_token_normalizes() {
    assert_eq!(RiskLevel::parse_token("Elevé"), Some(RiskLevel::Eleve));
    assert_eq!(RiskLevel::parse_token("Elevé").map(|l| l.as_str()), Some("Élevé"));

    let workbook = Workbook::from_sheets(vec![sheet_of(
        "Feuille1",
        vec![vec!["Jean Dupont", "Elevé"]],
    )]);
    let extraction = extract_screening_data(&workbook);
    assert_eq!(extraction.clients[0].risk_level.as_str(), "Élevé");
}

#[test]
fn test_search_name_filter_is_case_insensitive_containment() {
    let store = SanctionsStore::with_entries(vec![
        person("1", "Abdul Aziz Abbasin"),
        person("2", "Jean Dupont"),
        person("3", "ABDULLAH RAHIM"),
    ]);

    let query = SearchQuery {
        name_filter: "abdul".to_string(),
        per_page: 0,
        ..SearchQuery::default()
    };
    let results = store.search(&query);

    assert_eq!(results.len(), 2);
    for entry in &results {
        assert!(entry.name.to_lowercase().contains("abdul"));
    }
}

#[test]
fn test_store_snapshot_is_isolated_from_replace() {
    let store = SanctionsStore::with_entries(vec![person("1", "Abdul Aziz Abbasin")]);
    let before = store.snapshot();

    store.replace(vec![]);

    assert_eq!(before.len(), 1);
    assert_eq!(store.len(), 0);

    let results = screen_names(&[String::from("Abdul Aziz Abbasine")], &store.snapshot());
    assert!(results[0].matches.is_empty());
}

#[test]
fn test_consolidated_list_round_trip_through_store() {
    let xml = r#"<CONSOLIDATED_LIST>
  <INDIVIDUALS>
    <INDIVIDUAL>
      <DATAID>110001</DATAID>
      <REFERENCE_NUMBER>QDi.321</REFERENCE_NUMBER>
      <FIRST_NAME>Malik</FIRST_NAME>
      <SECOND_NAME>Muhammad</SECOND_NAME>
      <THIRD_NAME>Ishaq</THIRD_NAME>
      <NATIONALITY><VALUE>Pakistan</VALUE></NATIONALITY>
    </INDIVIDUAL>
  </INDIVIDUALS>
  <ENTITIES>
    <ENTITY>
      <DATAID>110002</DATAID>
      <REFERENCE_NUMBER>QDe.121</REFERENCE_NUMBER>
      <FIRST_NAME>Rahat Limited</FIRST_NAME>
    </ENTITY>
  </ENTITIES>
</CONSOLIDATED_LIST>"#;

    let entries = parse_consolidated_list(xml).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, "QDi.321");
    assert_eq!(entries[0].name, "Malik Muhammad Ishaq");
    assert_eq!(entries[0].entry_type, EntryType::Person);
    assert_eq!(entries[1].name, "Rahat Limited");
    assert_eq!(entries[1].entry_type, EntryType::Entity);

    let store = SanctionsStore::new();
    store.replace(entries);

    let query = SearchQuery {
        type_filter: "entity".to_string(),
        per_page: 0,
        ..SearchQuery::default()
    };
    let results = store.search(&query);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "QDe.121");
}

#[test]
fn test_pdf_text_parsing_extracts_people_and_entities() {
    let parser = PdfListParser::new();
    let text = "QDe.010 Nom: Rahat Limited Nationalité: Pakistan \
                QDi.001 Nom: 1: ABDUL AZIZ 2: ABBASIN Nationalité: Afghanistan \
                Date de naissance: 1969 Lieu de naissance: Sheykhan, Afghanistan";

    let entries = parser.parse_text(text);

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, "QDe.010");
    assert_eq!(entries[0].entry_type, EntryType::Entity);
    assert_eq!(entries[1].id, "QDi.001");
    assert_eq!(entries[1].entry_type, EntryType::Person);
    assert_eq!(entries[1].nationality.as_deref(), Some("Afghanistan"));
}

#[test]
fn test_risk_assessment_extraction_shapes() {
    let mut rows = vec![vec![String::new(); 6]; 30];
    rows[1][0] = "CLIENT: AMAL SECURITIES".to_string();
    rows[3][0] = "Date de maj".to_string();
    rows[3][1] = "2024-05-01".to_string();
    rows[8][0] = "Zone géographique".to_string();
    rows[8][4] = "Moyen".to_string();
    rows[9][0] = "Pays de résidence".to_string();
    rows[9][1] = "France".to_string();
    rows[9][4] = "Faible".to_string();
    rows[27][0] = "Niveau risque".to_string();
    rows[27][2] = "Elevé".to_string();

    let sheet = Sheet::from_rows(
        "Client 1",
        rows.into_iter()
            .map(|row| row.into_iter().map(|v| Cell::text(&v)).collect())
            .collect(),
    );
    let workbook = Workbook::from_sheets(vec![sheet]);

    let extraction = extract_risk_assessments(&workbook);

    assert_eq!(extraction.clients.len(), 1);
    let client = &extraction.clients[0];
    assert_eq!(client.name, "CLIENT: AMAL SECURITIES");
    assert_eq!(client.risk_level, RiskLevel::Eleve);
    assert_eq!(client.update_date, "2024-05-01");
    assert_eq!(client.categories.len(), 1);
    assert_eq!(client.categories[0].factors.len(), 1);
    assert!(client.data_quality.has_valid_risk_level);
}
