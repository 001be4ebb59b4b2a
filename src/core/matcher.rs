use std::cmp::Ordering;

use crate::core::similarity::{match_tier, similarity, INCLUSION_THRESHOLD};
use crate::models::{NameMatchResult, SanctionMatch, SanctionsEntry};

/// Screen a batch of extracted names against the sanctions list
///
/// Every input name produces a result, even when nothing scores above the
/// inclusion threshold; callers rely on the 1:1 correspondence to report
/// per-name outcomes. Matches within a result are ordered best-first.
///
/// The pass is O(names × entries) with no indexing; sanctions lists run
/// in the hundreds of entries, where a full scan per name is cheap.
pub fn screen_names(names: &[String], entries: &[SanctionsEntry]) -> Vec<NameMatchResult> {
    names
        .iter()
        .map(|name| NameMatchResult {
            name: name.clone(),
            matches: matches_for_name(name, entries),
        })
        .collect()
}

fn matches_for_name(name: &str, entries: &[SanctionsEntry]) -> Vec<SanctionMatch> {
    let mut matches: Vec<SanctionMatch> = entries
        .iter()
        .filter_map(|entry| {
            let score = similarity(name, &entry.name);
            if score > INCLUSION_THRESHOLD {
                Some(SanctionMatch {
                    sanction_entry: entry.clone(),
                    similarity: score,
                    match_type: match_tier(score),
                })
            } else {
                None
            }
        })
        .collect();

    matches.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
    });
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntryType, MatchTier};

    fn create_entry(id: &str, name: &str) -> SanctionsEntry {
        SanctionsEntry::new(id, name, EntryType::Person)
    }

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_every_name_gets_a_result() {
        let entries = vec![create_entry("QDi.001", "Abdul Aziz Abbasin")];
        let results = screen_names(&names(&["Abdul Aziz Abbasin", "Zzzz Qqqq"]), &entries);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "Abdul Aziz Abbasin");
        assert_eq!(results[0].matches.len(), 1);
        assert!(results[1].matches.is_empty());
    }

    #[test]
    fn test_exact_match_scores_one() {
        let entries = vec![create_entry("QDi.001", "ABDUL AZIZ ABBASIN")];
        let results = screen_names(&names(&["abdul aziz abbasin"]), &entries);

        let hit = &results[0].matches[0];
        assert_eq!(hit.similarity, 1.0);
        assert_eq!(hit.match_type, MatchTier::High);
        assert_eq!(hit.sanction_entry.id, "QDi.001");
    }

    #[test]
    fn test_inclusion_threshold_is_exclusive() {
        // "ab" vs "abcd" shares one bigram of four, scoring exactly 0.5
        let entries = vec![create_entry("X.1", "abcd")];
        let results = screen_names(&names(&["ab"]), &entries);

        assert!(results[0].matches.is_empty());
    }

    #[test]
    fn test_near_match_included_with_tier() {
        // "abc" vs "abcd" scores 0.8, landing in the medium tier
        let entries = vec![create_entry("X.1", "abcd")];
        let results = screen_names(&names(&["abc"]), &entries);

        assert_eq!(results[0].matches.len(), 1);
        assert_eq!(results[0].matches[0].match_type, MatchTier::Medium);
    }

    #[test]
    fn test_matches_sorted_best_first() {
        let entries = vec![
            create_entry("X.1", "Abdul Rahman Abbasin"),
            create_entry("X.2", "Abdul Aziz Abbasin"),
            create_entry("X.3", "Abdul Aziz Abbasine"),
        ];
        let results = screen_names(&names(&["Abdul Aziz Abbasin"]), &entries);

        let scores: Vec<f64> = results[0].matches.iter().map(|m| m.similarity).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(results[0].matches[0].sanction_entry.id, "X.2");
    }

    #[test]
    fn test_close_variant_scores_high() {
        let entries = vec![create_entry("QDi.001", "Abdul Aziz Abbasine")];
        let results = screen_names(&names(&["Abdul Aziz Abbasin"]), &entries);

        let hit = &results[0].matches[0];
        assert!(hit.similarity > 0.9);
        assert_eq!(hit.match_type, MatchTier::High);
    }

    #[test]
    fn test_empty_sanctions_list() {
        let results = screen_names(&names(&["Jean Dupont"]), &[]);
        assert_eq!(results.len(), 1);
        assert!(results[0].matches.is_empty());
    }
}
