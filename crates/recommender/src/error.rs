//! Per-query resolution failures.
//!
//! Both variants are recoverable: they end one query and leave the store
//! untouched. They serialize so the presentation layer can render them as
//! structured data.

use data_loader::MovieId;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolveError {
    /// No catalog title equals the query. `suggestions` holds titles that
    /// contain the query case-insensitively, possibly none.
    #[error("No movie titled '{query}' (did you mean: {})", .suggestions.join(", "))]
    NotFoundExact {
        query: String,
        suggestions: Vec<String>,
    },

    /// The title resolved but the similarity table has no column for it.
    #[error("Movie {movie_id} ('{title}') has no similarity data (available ids include {available_sample:?})")]
    NotFoundInMatrix {
        movie_id: MovieId,
        title: String,
        available_sample: Vec<MovieId>,
    },
}

pub type Result<T> = std::result::Result<T, ResolveError>;
