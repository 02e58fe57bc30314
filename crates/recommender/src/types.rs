//! Result types handed to the presentation layer.

use data_loader::{MovieId, Score};
use serde::Serialize;

/// One ranked neighbour of the queried movie
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub movie_id: MovieId,
    pub title: String,
    pub score: Score,
}

/// Outcome of a successful `resolve` call.
///
/// Built per request and never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    /// The query as the caller typed it
    pub query: String,
    /// Catalog entry the query resolved to
    pub movie_id: MovieId,
    /// Canonical catalog title of that entry
    pub title: String,
    /// Highest score first, never contains `movie_id`
    pub items: Vec<Recommendation>,
    /// Ranked ids dropped because the catalog has no title for them
    pub skipped: Vec<MovieId>,
}

impl Recommendations {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Mean score of the returned items, `None` when there are none
    pub fn average_score(&self) -> Option<Score> {
        if self.items.is_empty() {
            return None;
        }
        let total: Score = self.items.iter().map(|r| r.score).sum();
        Some(total / self.items.len() as Score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recommendations(scores: &[Score]) -> Recommendations {
        Recommendations {
            query: "Up".to_string(),
            movie_id: 1,
            title: "Up".to_string(),
            items: scores
                .iter()
                .enumerate()
                .map(|(i, &score)| Recommendation {
                    movie_id: i as MovieId + 2,
                    title: format!("Movie {}", i),
                    score,
                })
                .collect(),
            skipped: vec![],
        }
    }

    #[test]
    fn test_average_score() {
        let recs = recommendations(&[0.8, 0.4]);
        let avg = recs.average_score().unwrap();
        assert!((avg - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_average_score_empty() {
        let recs = recommendations(&[]);
        assert!(recs.is_empty());
        assert_eq!(recs.average_score(), None);
    }
}
