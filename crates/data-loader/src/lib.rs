//! # Data Loader Crate
//!
//! Loads the movie catalog and the precomputed similarity table.
//!
//! ## Main Components
//!
//! - **types**: Catalog, SimilarityTable and the Store that owns both
//! - **parser**: Parse the catalog CSV and the similarity artifact (CSV or bincode)
//! - **index**: Build and validate a Store from files
//! - **loader**: Load-once access shared between callers
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::StoreLoader;
//!
//! let loader = StoreLoader::new("movies_list.csv", "movie_similarity.csv");
//! let store = loader.get_or_load()?;
//!
//! let toy_story = store.catalog().find_exact("Toy Story (1995)").unwrap();
//! let (rows, cols) = store.similarity().shape();
//! println!("{} is one of {} movies ({}x{} matrix)", toy_story.title, store.catalog().len(), rows, cols);
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod index;
pub mod loader;

pub use error::{DataLoadError, Result};
pub use loader::StoreLoader;
pub use parser::SimilarityArtifact;
pub use types::{
    // Type aliases
    MovieId,
    Score,
    // Core types
    Catalog,
    CatalogEntry,
    SimilarityTable,
    Store,
};
