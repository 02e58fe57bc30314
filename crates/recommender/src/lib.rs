//! Title-to-neighbours lookup over a precomputed similarity table.
//!
//! This crate provides:
//! - [`Resolver`], which resolves a title and ranks its similarity column
//! - [`Recommendations`], the structured result handed to the presentation layer
//! - [`ResolveError`], the recoverable per-query failures
//!
//! ## Example Usage
//! ```ignore
//! use data_loader::StoreLoader;
//! use recommender::{Resolver, ResolveError};
//!
//! let store = StoreLoader::new("movies_list.csv", "movie_similarity.csv").get_or_load()?;
//! let resolver = Resolver::new(store);
//!
//! match resolver.resolve("Toy Story (1995)", 10) {
//!     Ok(recs) => for rec in &recs.items { println!("{} {:.1}%", rec.title, rec.score * 100.0) },
//!     Err(ResolveError::NotFoundExact { suggestions, .. }) => println!("Did you mean {:?}", suggestions),
//!     Err(other) => println!("{}", other),
//! }
//! ```

pub mod error;
pub mod ranking;
pub mod resolver;
pub mod types;

pub use error::ResolveError;
pub use resolver::{DEFAULT_KEY_SAMPLE_LIMIT, DEFAULT_SUGGESTION_LIMIT, Resolver};
pub use types::{Recommendation, Recommendations};
