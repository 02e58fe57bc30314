//! # Recommendation Resolver
//!
//! Turns a title query into a ranked list of similar movies:
//! 1. Exact title match against the catalog
//! 2. Otherwise, surface up to 5 case-insensitive substring suggestions and stop
//! 3. Check the matched movie has a similarity column
//! 4. Rank the column (score desc, movie_id asc), excluding the movie itself
//! 5. Join titles, skipping ids the catalog does not know, and keep the first N
//!
//! The resolver holds no per-call state; every `resolve` is a pure function
//! of the shared store and its arguments.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use data_loader::Store;

use crate::error::{ResolveError, Result};
use crate::ranking::rank_column;
use crate::types::{Recommendation, Recommendations};

/// Number of substring suggestions returned with `NotFoundExact`
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Number of column ids listed with `NotFoundInMatrix`
pub const DEFAULT_KEY_SAMPLE_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct Resolver {
    /// Shared, read-only store
    store: Arc<Store>,
    suggestion_limit: usize,
    key_sample_limit: usize,
}

impl Resolver {
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            store,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            key_sample_limit: DEFAULT_KEY_SAMPLE_LIMIT,
        }
    }

    /// Configure how many suggestions accompany a missed title (default: 5)
    pub fn with_suggestion_limit(mut self, limit: usize) -> Self {
        self.suggestion_limit = limit;
        self
    }

    /// Configure how many available ids a matrix miss reports (default: 10)
    pub fn with_key_sample_limit(mut self, limit: usize) -> Self {
        self.key_sample_limit = limit;
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Titles containing `query`, ignoring case, in catalog order
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<String> {
        self.store
            .catalog()
            .search(query, limit)
            .into_iter()
            .map(|entry| entry.title.clone())
            .collect()
    }

    /// Resolve `query` and return up to `n` most similar movies.
    ///
    /// `n` larger than the number of candidates returns all of them; `n == 0`
    /// returns an empty list.
    #[instrument(skip(self))]
    pub fn resolve(&self, query: &str, n: usize) -> Result<Recommendations> {
        let catalog = self.store.catalog();
        let similarity = self.store.similarity();

        let Some(entry) = catalog.find_exact(query) else {
            let suggestions = self.suggest(query, self.suggestion_limit);
            debug!("No exact match, {} suggestions", suggestions.len());
            return Err(ResolveError::NotFoundExact {
                query: query.to_string(),
                suggestions,
            });
        };
        debug!(movie_id = entry.movie_id, title = %entry.title, "Resolved title");

        let Some(ranked) = rank_column(similarity, entry.movie_id) else {
            return Err(ResolveError::NotFoundInMatrix {
                movie_id: entry.movie_id,
                title: entry.title.clone(),
                available_sample: similarity
                    .column_ids()
                    .iter()
                    .take(self.key_sample_limit)
                    .copied()
                    .collect(),
            });
        };

        let mut items = Vec::with_capacity(n.min(ranked.len()));
        let mut skipped = Vec::new();
        for (movie_id, score) in ranked {
            if items.len() == n {
                break;
            }
            match catalog.title(movie_id) {
                Some(title) => items.push(Recommendation {
                    movie_id,
                    title: title.to_string(),
                    score,
                }),
                None => {
                    warn!(movie_id, "Similar movie has no catalog entry, skipping");
                    skipped.push(movie_id);
                }
            }
        }
        debug!("{} recommendations", items.len());

        Ok(Recommendations {
            query: query.to_string(),
            movie_id: entry.movie_id,
            title: entry.title.clone(),
            items,
            skipped,
        })
    }
}
