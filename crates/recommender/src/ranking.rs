//! Ordering of one similarity column.

use data_loader::{MovieId, Score, SimilarityTable};

/// Every other movie ranked by its score against `movie_id`.
///
/// Order is score descending, then `movie_id` ascending on equal scores, so
/// the output does not depend on the row order of the artifact. The queried
/// movie itself is excluded. Returns `None` if the table has no column for
/// `movie_id`.
pub fn rank_column(
    table: &SimilarityTable,
    movie_id: MovieId,
) -> Option<Vec<(MovieId, Score)>> {
    let mut ranked: Vec<(MovieId, Score)> = table
        .column(movie_id)?
        .filter(|&(id, _)| id != movie_id)
        .collect();

    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Some(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_sorts_descending_and_excludes_self() {
        let table = SimilarityTable::new(
            vec![1, 2, 3],
            vec![1, 2, 3],
            vec![
                1.0, 0.3, 0.8, //
                0.3, 1.0, 0.1, //
                0.8, 0.1, 1.0,
            ],
        )
        .unwrap();

        let ranked = rank_column(&table, 1).unwrap();
        assert_eq!(ranked, vec![(3, 0.8), (2, 0.3)]);
    }

    #[test]
    fn test_rank_breaks_ties_by_movie_id() {
        let table =
            SimilarityTable::new(vec![9, 4, 1, 7], vec![1], vec![0.5, 0.5, 1.0, 0.9]).unwrap();

        let ids: Vec<MovieId> = rank_column(&table, 1)
            .unwrap()
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec![7, 4, 9]);
    }

    #[test]
    fn test_rank_uses_column_not_row() {
        // Asymmetric: row 1 says 2 is close, column 1 says 3 is close
        let table = SimilarityTable::new(
            vec![1, 2, 3],
            vec![1, 2, 3],
            vec![
                1.0, 0.9, 0.0, //
                0.1, 1.0, 0.0, //
                0.7, 0.0, 1.0,
            ],
        )
        .unwrap();

        let ranked = rank_column(&table, 1).unwrap();
        assert_eq!(ranked[0], (3, 0.7));
    }

    #[test]
    fn test_rank_missing_column() {
        let table = SimilarityTable::new(vec![1], vec![1], vec![1.0]).unwrap();
        assert!(rank_column(&table, 2).is_none());
    }
}
