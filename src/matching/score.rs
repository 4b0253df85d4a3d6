//! Pure compatibility sub-scores. Each one compares two free-text profile
//! attributes and contributes a fixed share of the 100-point total:
//! cuisine 30, location 25, dietary 25, historical success rate 20
//! (the last one needs the database and lives in [`super::rank`]).

use std::collections::HashSet;

pub const CUISINE_WEIGHT: f64 = 30.0;
pub const LOCATION_WEIGHT: f64 = 25.0;
pub const DIETARY_WEIGHT: f64 = 25.0;
pub const SUCCESS_RATE_WEIGHT: f64 = 20.0;

/// Comma-separated free text to a normalized token set.
fn token_set(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Overlap of the two cuisine token sets, relative to the larger set,
/// scaled to [0, 30]. Either side missing or empty scores 0.
pub fn cuisine_score(a: Option<&str>, b: Option<&str>) -> f64 {
    let (a, b) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        _ => return 0.0,
    };
    let set_a = token_set(a);
    let set_b = token_set(b);
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }
    let overlap = set_a.intersection(&set_b).count() as f64;
    overlap / set_a.len().max(set_b.len()) as f64 * CUISINE_WEIGHT
}

fn equality_score(a: Option<&str>, b: Option<&str>, weight: f64) -> f64 {
    let (a, b) = match (a, b) {
        (Some(a), Some(b)) => (a.trim(), b.trim()),
        _ => return 0.0,
    };
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a.eq_ignore_ascii_case(b) {
        weight
    } else {
        0.0
    }
}

/// 25 when both locations are present and equal case-insensitively, else 0.
pub fn location_score(a: Option<&str>, b: Option<&str>) -> f64 {
    equality_score(a, b, LOCATION_WEIGHT)
}

/// 25 when both dietary restrictions are present and equal
/// case-insensitively, else 0.
pub fn dietary_score(a: Option<&str>, b: Option<&str>) -> f64 {
    equality_score(a, b, DIETARY_WEIGHT)
}

#[cfg(test)]
mod test_cuisine_score {
    use super::*;

    #[test]
    fn test_identical_sets() {
        let score = cuisine_score(Some("Italian,Japanese"), Some("japanese, italian"));
        assert_eq!(score, CUISINE_WEIGHT);
    }

    #[test]
    fn test_disjoint_sets() {
        let score = cuisine_score(
            Some("Italian, Japanese, Thai"),
            Some("Mexican, Indian, French"),
        );
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        // {italian} over max(3, 2) = 1/3 of the weight
        let score = cuisine_score(Some("Italian, Japanese, Thai"), Some("Italian, Indian"));
        assert_eq!(score, 10.0);
    }

    #[test]
    fn test_missing_side() {
        assert_eq!(cuisine_score(None, Some("Italian")), 0.0);
        assert_eq!(cuisine_score(Some("Italian"), None), 0.0);
        assert_eq!(cuisine_score(Some(""), Some("Italian")), 0.0);
        assert_eq!(cuisine_score(Some(" , ,"), Some("Italian")), 0.0);
    }

    #[test]
    fn test_duplicate_tokens_collapse() {
        let score = cuisine_score(Some("Italian, italian, ITALIAN"), Some("Italian"));
        assert_eq!(score, CUISINE_WEIGHT);
    }
}
