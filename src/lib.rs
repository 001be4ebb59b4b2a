//! AML Center - Sanctions screening and risk-assessment extraction service
//!
//! This library backs the AML Center compliance service. It screens client
//! names against a sanctions store with fuzzy matching, extracts risk
//! assessments from uploaded workbooks, and ingests consolidated sanctions
//! lists in XML and PDF form.

pub mod auth;
pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

// Re-export commonly used types
pub use crate::core::{
    match_tier, parse_consolidated_list, screen_names, similarity, PdfListParser,
    HIGH_THRESHOLD, INCLUSION_THRESHOLD, MEDIUM_THRESHOLD,
};
pub use models::{MatchTier, NameMatchResult, SanctionMatch, SanctionsEntry, SearchQuery};
pub use store::SanctionsStore;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        assert_eq!(similarity("night", "night"), 1.0);
        assert_eq!(match_tier(0.95), MatchTier::High);
    }
}
