use serde::{Deserialize, Serialize};
use validator::Validate;

/// Administrator login request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Query parameters for the sanctions search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
    #[serde(alias = "id_filter", rename = "idFilter", default)]
    pub id_filter: String,
    #[serde(alias = "name_filter", rename = "nameFilter", default)]
    pub name_filter: String,
    #[serde(alias = "type_filter", rename = "typeFilter", default)]
    pub type_filter: String,
    #[serde(alias = "nationality_filter", rename = "nationalityFilter", default)]
    pub nationality_filter: String,
    #[serde(alias = "per_page", rename = "perPage", default = "default_per_page")]
    pub per_page: i64,
}

fn default_per_page() -> i64 {
    20
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            id_filter: String::new(),
            name_filter: String::new(),
            type_filter: String::new(),
            nationality_filter: String::new(),
            per_page: default_per_page(),
        }
    }
}

/// Query parameters for listing documents or fetching catalog statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsQuery {
    #[serde(default = "default_action")]
    pub action: String,
    pub category: Option<String>,
    pub search: Option<String>,
    #[serde(default = "default_list_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_action() -> String {
    "list".to_string()
}

fn default_list_limit() -> usize {
    100
}

/// Query parameters for deleting a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteDocumentQuery {
    pub id: Option<i64>,
}
