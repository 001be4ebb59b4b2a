use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whether a sanctions list entry designates a natural person or an organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Person,
    Entity,
}

impl Default for EntryType {
    fn default() -> Self {
        EntryType::Person
    }
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Person => "person",
            EntryType::Entity => "entity",
        }
    }
}

/// A single entry of the consolidated sanctions list
///
/// Entries come from three sources: the XML consolidated list, the PDF
/// list, or a raw JSON replace. Only `id` and `name` are mandatory; the
/// remaining fields depend on what the source format carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanctionsEntry {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub entry_type: EntryType,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(rename = "dateOfBirth", default)]
    pub date_of_birth: Option<String>,
    #[serde(rename = "placeOfBirth", default)]
    pub place_of_birth: Option<String>,
    #[serde(rename = "reliableAlias", default)]
    pub reliable_alias: Vec<String>,
    #[serde(rename = "unreliableAlias", default)]
    pub unreliable_alias: Vec<String>,
    #[serde(rename = "otherNames", default)]
    pub other_names: Vec<String>,
    #[serde(rename = "previouslyKnownAs", default)]
    pub previously_known_as: Vec<String>,
    #[serde(rename = "passportNo", default)]
    pub passport_no: Option<String>,
    #[serde(rename = "nationalId", default)]
    pub national_id: Option<String>,
    #[serde(default)]
    pub address: Vec<String>,
    #[serde(rename = "listedOn", default)]
    pub listed_on: Option<String>,
    #[serde(rename = "lastUpdated", default)]
    pub last_updated: Option<String>,
    #[serde(rename = "otherInfo", default)]
    pub other_info: Option<String>,
    #[serde(rename = "originalScript", default)]
    pub original_script: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

impl SanctionsEntry {
    /// Minimal entry used by ingestion parsers before fields are filled in
    pub fn new(id: &str, name: &str, entry_type: EntryType) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            entry_type,
            nationality: None,
            title: None,
            designation: None,
            date_of_birth: None,
            place_of_birth: None,
            reliable_alias: Vec::new(),
            unreliable_alias: Vec::new(),
            other_names: Vec::new(),
            previously_known_as: Vec::new(),
            passport_no: None,
            national_id: None,
            address: Vec::new(),
            listed_on: None,
            last_updated: None,
            other_info: None,
            original_script: None,
            gender: None,
        }
    }

    /// Case-insensitive free-text search across id, name, nationality,
    /// other info and the joined address block
    pub fn matches_query(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.id.to_lowercase().contains(&term)
            || self.name.to_lowercase().contains(&term)
            || self
                .nationality
                .as_ref()
                .is_some_and(|n| n.to_lowercase().contains(&term))
            || self
                .other_info
                .as_ref()
                .is_some_and(|o| o.to_lowercase().contains(&term))
            || self.address.join(", ").to_lowercase().contains(&term)
    }
}

/// A candidate name pulled out of an uploaded spreadsheet, with provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedCandidate {
    pub name: String,
    #[serde(rename = "sourceSheet")]
    pub source_sheet: String,
    #[serde(rename = "sourceRow")]
    pub source_row: usize,
    #[serde(rename = "sourceColumn")]
    pub source_column: usize,
}

/// Client risk level as used in the French assessment workbooks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Faible,
    Moyen,
    #[serde(rename = "Élevé")]
    Eleve,
}

impl RiskLevel {
    /// Parse a workbook cell value. Accepts the unaccented "Elevé"
    /// variant and normalizes it to "Élevé".
    pub fn parse_token(value: &str) -> Option<RiskLevel> {
        match value.trim() {
            "Faible" => Some(RiskLevel::Faible),
            "Moyen" => Some(RiskLevel::Moyen),
            "Élevé" | "Elevé" => Some(RiskLevel::Eleve),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Faible => "Faible",
            RiskLevel::Moyen => "Moyen",
            RiskLevel::Eleve => "Élevé",
        }
    }
}

impl Default for RiskLevel {
    fn default() -> Self {
        RiskLevel::Faible
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cell flagged as risk-factor text during screening extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactorCell {
    pub text: String,
    pub row: usize,
    pub column: usize,
}

/// Per-sheet client profile assembled during screening extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetProfile {
    pub name: String,
    #[serde(rename = "sheetName")]
    pub sheet_name: String,
    #[serde(rename = "riskLevel")]
    pub risk_level: RiskLevel,
    #[serde(rename = "extractedNames")]
    pub extracted_names: Vec<String>,
    #[serde(rename = "riskFactors")]
    pub risk_factors: Vec<RiskFactorCell>,
    pub dates: BTreeMap<String, String>,
    #[serde(rename = "additionalInfo", default)]
    pub additional_info: serde_json::Map<String, serde_json::Value>,
}

impl SheetProfile {
    pub fn new(sheet_name: &str) -> Self {
        Self {
            name: sheet_name.to_string(),
            sheet_name: sheet_name.to_string(),
            risk_level: RiskLevel::default(),
            extracted_names: Vec::new(),
            risk_factors: Vec::new(),
            dates: BTreeMap::new(),
            additional_info: serde_json::Map::new(),
        }
    }

    /// Sheets contributing neither names nor risk factors are dropped
    pub fn is_meaningful(&self) -> bool {
        !self.extracted_names.is_empty() || !self.risk_factors.is_empty()
    }
}

/// One risk factor row of an assessment table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub name: String,
    pub profile: String,
    pub rating: String,
}

/// A known assessment category with the factors listed under it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskCategory {
    pub name: String,
    pub rating: String,
    pub factors: Vec<RiskFactor>,
}

/// Extraction quality counters reported with each assessment client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataQuality {
    #[serde(rename = "categoriesFound")]
    pub categories_found: usize,
    #[serde(rename = "factorsFound")]
    pub factors_found: usize,
    #[serde(rename = "hasValidRiskLevel")]
    pub has_valid_risk_level: bool,
    #[serde(rename = "hasUpdateDate")]
    pub has_update_date: bool,
    #[serde(rename = "hasAssessmentDate")]
    pub has_assessment_date: bool,
}

/// Fully extracted risk assessment for one client sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessmentClient {
    pub name: String,
    #[serde(rename = "riskLevel")]
    pub risk_level: RiskLevel,
    #[serde(rename = "updateDate")]
    pub update_date: String,
    #[serde(rename = "assessmentDate")]
    pub assessment_date: String,
    pub categories: Vec<RiskCategory>,
    #[serde(rename = "riskFactors")]
    pub risk_factors: Vec<RiskFactor>,
    #[serde(rename = "additionalInfo", default)]
    pub additional_info: serde_json::Map<String, serde_json::Value>,
    #[serde(rename = "dataQuality")]
    pub data_quality: DataQuality,
}

/// Match confidence tier derived from the similarity score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    High,
    Medium,
    Low,
}

/// One sanctions entry scored against a candidate name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanctionMatch {
    #[serde(rename = "sanctionEntry")]
    pub sanction_entry: SanctionsEntry,
    pub similarity: f64,
    #[serde(rename = "matchType")]
    pub match_type: MatchTier,
}

/// All surviving matches for one extracted name, best first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameMatchResult {
    pub name: String,
    pub matches: Vec<SanctionMatch>,
}

/// Authenticated administrator session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub role: String,
    pub permissions: Vec<String>,
    #[serde(rename = "expiresAt")]
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// Document record as reported by the indexing collaborator
///
/// The collaborator speaks snake_case JSON; it is forwarded as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub title: String,
    pub original_filename: String,
    pub stored_filename: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub file_size: u64,
    pub upload_date: String,
    pub last_modified: String,
    pub file_path: String,
    pub mime_type: String,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// Aggregate catalog statistics from the indexing collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStatistics {
    pub total_documents: usize,
    pub category_counts: BTreeMap<String, usize>,
    pub total_size_bytes: u64,
    pub total_size_mb: f64,
    pub categories: Vec<String>,
}
