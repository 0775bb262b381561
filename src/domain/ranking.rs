//! Exact top-K cosine ranking over a full candidate scan.
//!
//! O(N·D) per query. The contract is index-friendly: an exact or approximate
//! index dropped in later must preserve the scoring formula, the stable
//! tie-break, and the per-candidate skip semantics.

use crate::domain::entities::product::{ProductInfo, VectorRecord};
use crate::domain::error::DomainError;
use serde::Serialize;

/// One ranked result. The raw vector is deliberately not carried here.
#[derive(Debug, Clone, Serialize)]
pub struct RankedMatch {
    pub id: String,
    pub score: f64,
    pub product: ProductInfo,
}

/// Why a candidate was excluded from ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// Vector length disagrees with the query's dimensionality.
    LengthMismatch { expected: usize, actual: usize },
    /// Zero-norm vector; cosine similarity is undefined for it.
    ZeroNorm,
    /// Score came out NaN or infinite (corrupt vector contents).
    NonFinite,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedRecord {
    pub id: String,
    pub reason: SkipReason,
}

/// Outcome of one ranking pass: ordered matches plus every candidate that
/// was excluded, with its reason. Skips are data, not errors.
#[derive(Debug, Clone, Serialize)]
pub struct Ranking {
    pub matches: Vec<RankedMatch>,
    pub skipped: Vec<SkippedRecord>,
}

/// Ranks `candidates` against `query` by cosine similarity, descending,
/// returning at most `k` matches.
///
/// Ties keep scan order (stable sort), so the same snapshot and query always
/// produce identical output. A corrupt candidate is skipped and reported,
/// never fatal; an invalid query (`k == 0`, empty or zero-norm vector) fails
/// the whole ranking with `InvalidArgument`.
pub fn rank(
    query: &[f32],
    candidates: impl IntoIterator<Item = VectorRecord>,
    k: usize,
) -> Result<Ranking, DomainError> {
    if k == 0 {
        return Err(DomainError::InvalidArgument(
            "result count k must be at least 1".into(),
        ));
    }
    if query.is_empty() {
        return Err(DomainError::InvalidArgument("query vector is empty".into()));
    }
    let query_norm = norm(query);
    if query_norm == 0.0 {
        return Err(DomainError::InvalidArgument(
            "query vector has zero norm".into(),
        ));
    }

    let mut matches = Vec::new();
    let mut skipped = Vec::new();

    for record in candidates {
        if record.vector.len() != query.len() {
            skipped.push(SkippedRecord {
                id: record.id,
                reason: SkipReason::LengthMismatch {
                    expected: query.len(),
                    actual: record.vector.len(),
                },
            });
            continue;
        }
        let candidate_norm = norm(&record.vector);
        if candidate_norm == 0.0 {
            skipped.push(SkippedRecord {
                id: record.id,
                reason: SkipReason::ZeroNorm,
            });
            continue;
        }
        let score = dot(query, &record.vector) / (query_norm * candidate_norm);
        if !score.is_finite() {
            skipped.push(SkippedRecord {
                id: record.id,
                reason: SkipReason::NonFinite,
            });
            continue;
        }
        matches.push(RankedMatch {
            id: record.id,
            score,
            product: record.product,
        });
    }

    // Stable sort: equal scores keep scan order.
    matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    matches.truncate(k);

    Ok(Ranking { matches, skipped })
}

fn dot(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| *x as f64 * *y as f64)
        .sum()
}

fn norm(v: &[f32]) -> f64 {
    v.iter().map(|x| *x as f64 * *x as f64).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, vector: Vec<f32>) -> VectorRecord {
        VectorRecord::new(
            Some(id.to_string()),
            vector,
            ProductInfo {
                title: format!("product {id}"),
                image: format!("{id}.jpg"),
                price: "$10".into(),
                link: format!("https://example.com/{id}"),
                style: None,
            },
        )
    }

    #[test]
    fn orders_by_descending_score() {
        let candidates = vec![
            record("a", vec![1.0, 0.0]),
            record("b", vec![0.0, 1.0]),
            record("c", vec![0.7, 0.7]),
        ];
        let ranking = rank(&[1.0, 0.0], candidates, 2).unwrap();
        assert_eq!(ranking.matches.len(), 2);
        assert_eq!(ranking.matches[0].id, "a");
        assert!((ranking.matches[0].score - 1.0).abs() < 1e-9);
        assert_eq!(ranking.matches[1].id, "c");
        assert!((ranking.matches[1].score - 0.707).abs() < 1e-3);
        for pair in ranking.matches.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn k_zero_is_invalid() {
        let err = rank(&[1.0], vec![record("a", vec![1.0])], 0).unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
    }

    #[test]
    fn zero_norm_query_is_invalid() {
        let err = rank(&[0.0, 0.0], vec![record("a", vec![1.0, 0.0])], 3).unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
    }

    #[test]
    fn empty_query_is_invalid() {
        let err = rank(&[], Vec::new(), 3).unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
    }

    #[test]
    fn k_larger_than_candidates_returns_all() {
        let candidates = vec![record("a", vec![1.0, 0.0]), record("b", vec![0.0, 1.0])];
        let ranking = rank(&[1.0, 1.0], candidates, 50).unwrap();
        assert_eq!(ranking.matches.len(), 2);
    }

    #[test]
    fn empty_candidates_is_not_an_error() {
        let ranking = rank(&[1.0, 0.0], Vec::new(), 5).unwrap();
        assert!(ranking.matches.is_empty());
        assert!(ranking.skipped.is_empty());
    }

    #[test]
    fn zero_norm_candidate_is_skipped_not_ranked() {
        let candidates = vec![
            record("a", vec![1.0, 0.0]),
            record("z", vec![0.0, 0.0]),
            record("b", vec![0.5, 0.5]),
        ];
        let ranking = rank(&[1.0, 0.0], candidates, 10).unwrap();
        assert_eq!(ranking.matches.len(), 2);
        assert!(ranking.matches.iter().all(|m| m.id != "z"));
        assert_eq!(ranking.skipped.len(), 1);
        assert_eq!(ranking.skipped[0].id, "z");
        assert_eq!(ranking.skipped[0].reason, SkipReason::ZeroNorm);
    }

    #[test]
    fn length_mismatch_is_skipped_not_fatal() {
        let candidates = vec![
            record("short", vec![1.0]),
            record("ok", vec![1.0, 0.0]),
            record("long", vec![1.0, 0.0, 0.0]),
        ];
        let ranking = rank(&[1.0, 0.0], candidates, 10).unwrap();
        assert_eq!(ranking.matches.len(), 1);
        assert_eq!(ranking.matches[0].id, "ok");
        assert_eq!(ranking.skipped.len(), 2);
        assert_eq!(
            ranking.skipped[0].reason,
            SkipReason::LengthMismatch { expected: 2, actual: 1 }
        );
    }

    #[test]
    fn nan_vector_is_skipped() {
        let candidates = vec![record("bad", vec![f32::NAN, 1.0]), record("ok", vec![0.0, 1.0])];
        let ranking = rank(&[1.0, 1.0], candidates, 10).unwrap();
        assert_eq!(ranking.matches.len(), 1);
        assert_eq!(ranking.matches[0].id, "ok");
        assert_eq!(ranking.skipped.len(), 1);
    }

    #[test]
    fn ties_keep_scan_order() {
        // Same direction, different magnitude: identical cosine scores.
        let candidates = vec![
            record("first", vec![2.0, 0.0]),
            record("second", vec![1.0, 0.0]),
            record("third", vec![4.0, 0.0]),
        ];
        let a = rank(&[1.0, 0.0], candidates.clone(), 3).unwrap();
        let ids: Vec<&str> = a.matches.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);

        // Deterministic across repeated runs on the same snapshot.
        let b = rank(&[1.0, 0.0], candidates, 3).unwrap();
        let ids_b: Vec<&str> = b.matches.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ids_b);
    }

    #[test]
    fn scores_stay_within_cosine_range() {
        let candidates = vec![
            record("pos", vec![3.0, 4.0]),
            record("neg", vec![-3.0, -4.0]),
            record("orth", vec![-4.0, 3.0]),
        ];
        let ranking = rank(&[3.0, 4.0], candidates, 3).unwrap();
        for m in &ranking.matches {
            assert!(m.score <= 1.0 + 1e-9 && m.score >= -1.0 - 1e-9);
        }
        assert_eq!(ranking.matches[0].id, "pos");
        assert_eq!(ranking.matches[2].id, "neg");
        assert!((ranking.matches[2].score + 1.0).abs() < 1e-9);
    }
}
