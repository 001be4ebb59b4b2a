use crate::models::MatchTier;

/// Minimum similarity for a match to be reported at all
pub const INCLUSION_THRESHOLD: f64 = 0.5;
/// Above this the match is tagged medium confidence
pub const MEDIUM_THRESHOLD: f64 = 0.6;
/// Above this the match is tagged high confidence
pub const HIGH_THRESHOLD: f64 = 0.8;

/// Case-insensitive name similarity in [0, 1]
///
/// Sørensen-Dice coefficient over character bigrams with whitespace
/// stripped: identical strings score 1.0, strings sharing no bigrams
/// score 0.0. Symmetric in its arguments.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::sorensen_dice(&a.to_lowercase(), &b.to_lowercase())
}

/// Classify a similarity score into a confidence tier
///
/// Scores at or below `INCLUSION_THRESHOLD` are never reported, so `Low`
/// effectively covers the (0.5, 0.6] band.
pub fn match_tier(similarity: f64) -> MatchTier {
    if similarity > HIGH_THRESHOLD {
        MatchTier::High
    } else if similarity > MEDIUM_THRESHOLD {
        MatchTier::Medium
    } else {
        MatchTier::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_names_score_one() {
        assert_eq!(similarity("Abdul Aziz Abbasin", "Abdul Aziz Abbasin"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(similarity("ABDUL AZIZ", "abdul aziz"), 1.0);
    }

    #[test]
    fn test_symmetric() {
        let ab = similarity("Jean Dupont", "Jean Dupond");
        let ba = similarity("Jean Dupond", "Jean Dupont");
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_disjoint_names_score_zero() {
        assert_eq!(similarity("abcd", "wxyz"), 0.0);
    }

    #[test]
    fn test_single_char_scores_zero() {
        assert_eq!(similarity("a", "b"), 0.0);
        assert_eq!(similarity("a", "abcd"), 0.0);
    }

    #[test]
    fn test_near_identical_scores_high() {
        let score = similarity("Abdul Aziz Abbasin", "Abdul Aziz Abbasine");
        assert!(score > 0.9, "expected > 0.9, got {}", score);
        assert_eq!(match_tier(score), MatchTier::High);
    }

    #[test]
    fn test_tier_boundaries() {
        // Boundaries are exclusive: exactly 0.8 is medium, exactly 0.6 is low
        assert_eq!(match_tier(0.81), MatchTier::High);
        assert_eq!(match_tier(0.8), MatchTier::Medium);
        assert_eq!(match_tier(0.61), MatchTier::Medium);
        assert_eq!(match_tier(0.6), MatchTier::Low);
        assert_eq!(match_tier(0.51), MatchTier::Low);
    }
}
