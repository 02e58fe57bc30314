//! Core domain types for the catalog and the similarity table.
//!
//! Both structures are built once while loading and are read-only afterwards.
//! Lookups return references into the owning [`Store`] so the resolver never
//! copies the underlying data.

use crate::error::{DataLoadError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a movie (the catalog's primary key)
pub type MovieId = u32;

/// Pairwise similarity score, nominally in `[0, 1]`
pub type Score = f64;

// =============================================================================
// Catalog
// =============================================================================

/// One row of the catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub movie_id: MovieId,
    /// Display title. Titles are not guaranteed to be unique.
    pub title: String,
}

/// Mapping from movie identifier to title, kept in file order.
///
/// File order matters: when several entries share a title, exact lookups
/// resolve to the first one that was inserted.
#[derive(Debug, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    /// Lower-cased titles, parallel to `entries`, for substring search
    lowercase_titles: Vec<String>,
    by_id: HashMap<MovieId, usize>,
    /// Position of the first entry carrying each exact title
    first_by_title: HashMap<String, usize>,
}

impl Catalog {
    /// Creates an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    ///
    /// Fails with [`DataLoadError::DuplicateId`] if the id is already present.
    pub fn insert(&mut self, entry: CatalogEntry) -> Result<()> {
        if self.by_id.contains_key(&entry.movie_id) {
            return Err(DataLoadError::DuplicateId {
                entity: "catalog entry".to_string(),
                id: entry.movie_id,
            });
        }

        let position = self.entries.len();
        self.by_id.insert(entry.movie_id, position);
        self.first_by_title
            .entry(entry.title.clone())
            .or_insert(position);
        self.lowercase_titles.push(entry.title.to_lowercase());
        self.entries.push(entry);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in file order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Get an entry by movie ID
    pub fn get(&self, movie_id: MovieId) -> Option<&CatalogEntry> {
        self.by_id.get(&movie_id).map(|&pos| &self.entries[pos])
    }

    /// Get the title for a movie ID
    pub fn title(&self, movie_id: MovieId) -> Option<&str> {
        self.get(movie_id).map(|entry| entry.title.as_str())
    }

    /// First entry whose title is byte-for-byte equal to `title`
    pub fn find_exact(&self, title: &str) -> Option<&CatalogEntry> {
        self.first_by_title.get(title).map(|&pos| &self.entries[pos])
    }

    /// Entries whose title contains `query`, ignoring case, in file order.
    ///
    /// Stops after `limit` matches.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&CatalogEntry> {
        let needle = query.to_lowercase();
        self.lowercase_titles
            .iter()
            .zip(&self.entries)
            .filter(|(lowered, _)| lowered.contains(&needle))
            .map(|(_, entry)| entry)
            .take(limit)
            .collect()
    }

    /// All titles sorted alphabetically (duplicates kept)
    pub fn sorted_titles(&self) -> Vec<&str> {
        let mut titles: Vec<&str> = self
            .entries
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        titles.sort_unstable();
        titles
    }
}

// =============================================================================
// Similarity Table
// =============================================================================

/// Dense `row movie_id × column movie_id → score` table.
///
/// Scores are stored row-major. Row and column labels are kept separately;
/// they are normally the same set of ids but nothing requires it, and the
/// table is not required to be symmetric.
#[derive(Debug, Clone)]
pub struct SimilarityTable {
    row_ids: Vec<MovieId>,
    column_ids: Vec<MovieId>,
    scores: Vec<Score>,
    column_index: HashMap<MovieId, usize>,
}

impl SimilarityTable {
    /// Build a table from its labels and row-major scores.
    ///
    /// Fails if `scores.len() != row_ids.len() * column_ids.len()` or if a
    /// row or column id appears twice.
    pub fn new(
        row_ids: Vec<MovieId>,
        column_ids: Vec<MovieId>,
        scores: Vec<Score>,
    ) -> Result<Self> {
        let expected = row_ids.len() * column_ids.len();
        if scores.len() != expected {
            return Err(DataLoadError::ValidationError(format!(
                "similarity table is {}x{} but holds {} scores",
                row_ids.len(),
                column_ids.len(),
                scores.len()
            )));
        }

        let mut seen_rows = HashSet::with_capacity(row_ids.len());
        for &id in &row_ids {
            if !seen_rows.insert(id) {
                return Err(DataLoadError::DuplicateId {
                    entity: "similarity row".to_string(),
                    id,
                });
            }
        }

        let mut column_index = HashMap::with_capacity(column_ids.len());
        for (pos, &id) in column_ids.iter().enumerate() {
            if column_index.insert(id, pos).is_some() {
                return Err(DataLoadError::DuplicateId {
                    entity: "similarity column".to_string(),
                    id,
                });
            }
        }

        Ok(Self {
            row_ids,
            column_ids,
            scores,
            column_index,
        })
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.row_ids.len(), self.column_ids.len())
    }

    pub fn row_ids(&self) -> &[MovieId] {
        &self.row_ids
    }

    pub fn column_ids(&self) -> &[MovieId] {
        &self.column_ids
    }

    /// Raw row-major scores
    pub fn scores(&self) -> &[Score] {
        &self.scores
    }

    pub fn contains_column(&self, movie_id: MovieId) -> bool {
        self.column_index.contains_key(&movie_id)
    }

    /// Every `(row id, score)` pair of the column labelled `movie_id`, in row
    /// order. Returns `None` if there is no such column.
    pub fn column(
        &self,
        movie_id: MovieId,
    ) -> Option<impl Iterator<Item = (MovieId, Score)> + '_> {
        let col = *self.column_index.get(&movie_id)?;
        let width = self.column_ids.len();
        Some(
            self.row_ids
                .iter()
                .enumerate()
                .map(move |(row, &id)| (id, self.scores[row * width + col])),
        )
    }
}

// =============================================================================
// Store
// =============================================================================

/// The loaded artifacts, owned for the lifetime of the process.
///
/// Built by [`Store::load_from_files`] (see `index.rs`) or assembled directly
/// with [`Store::new`].
#[derive(Debug)]
pub struct Store {
    pub(crate) catalog: Catalog,
    pub(crate) similarity: SimilarityTable,
}

impl Store {
    pub fn new(catalog: Catalog, similarity: SimilarityTable) -> Self {
        Self {
            catalog,
            similarity,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn similarity(&self) -> &SimilarityTable {
        &self.similarity
    }

    /// `(catalog entries, matrix rows, matrix columns)` for logging
    pub fn counts(&self) -> (usize, usize, usize) {
        let (rows, cols) = self.similarity.shape();
        (self.catalog.len(), rows, cols)
    }
}
