//! Building and validating a [`Store`] from the artifact files.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::path::Path;
use tracing::{info, warn};

impl Store {
    /// Load the catalog and the similarity table.
    ///
    /// Steps:
    /// 1. Parse both files in parallel
    /// 2. Validate the result
    ///
    /// Nothing is partially usable on failure: either both artifacts load
    /// and validate, or an error is returned.
    pub fn load_from_files(catalog_path: &Path, similarity_path: &Path) -> Result<Self> {
        info!(
            catalog = %catalog_path.display(),
            similarity = %similarity_path.display(),
            "Loading artifacts"
        );

        let (catalog, similarity) = rayon::join(
            || parser::parse_catalog(catalog_path),
            || parser::parse_similarity(similarity_path),
        );

        let store = Store::new(catalog?, similarity?);
        store.validate()?;

        let (movies, rows, cols) = store.counts();
        info!("Loaded {} movies, similarity table {}x{}", movies, rows, cols);
        Ok(store)
    }

    /// Validate data integrity
    ///
    /// Errors on:
    /// - an empty catalog
    /// - a non-finite score
    ///
    /// Only warns on scores outside `[0, 1]` and on matrix ids that have no
    /// catalog entry; the resolver copes with both.
    pub fn validate(&self) -> Result<()> {
        if self.catalog.is_empty() {
            return Err(DataLoadError::ValidationError(
                "catalog has no entries".to_string(),
            ));
        }

        let width = self.similarity.column_ids().len();
        let mut out_of_range = 0usize;
        for (pos, &score) in self.similarity.scores().iter().enumerate() {
            if !score.is_finite() {
                let row = self.similarity.row_ids()[pos / width];
                let col = self.similarity.column_ids()[pos % width];
                return Err(DataLoadError::InvalidValue {
                    field: format!("similarity[{}][{}]", row, col),
                    value: score.to_string(),
                });
            }
            if !(0.0..=1.0).contains(&score) {
                out_of_range += 1;
            }
        }
        if out_of_range > 0 {
            warn!("{} similarity scores fall outside [0, 1]", out_of_range);
        }

        let untitled = self
            .similarity
            .row_ids()
            .iter()
            .filter(|&&id| self.catalog.get(id).is_none())
            .count();
        if untitled > 0 {
            warn!("{} similarity rows have no catalog entry", untitled);
        }

        Ok(())
    }
}
