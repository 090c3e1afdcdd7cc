//! Relevance search over build records.
//!
//! Text is canonicalized by [`normalize`], each build is flattened once into an
//! index string by [`build_index`], and [`Scorer`] rates index strings against
//! free-text queries. [`rank`] ties these together over a [`Catalog`](crate::Catalog)
//! with an explicit [`IndexCache`].

pub mod cache;
pub mod index;
pub mod normalize;
pub mod query;
pub mod scoring;

pub use cache::{CacheStats, IndexCache, record_fingerprint};
pub use index::{Lookups, build_index};
pub use normalize::{normalize, normalize_opt};
pub use query::{MIN_FILTER_QUERY_CHARS, RankOptions, RankedBuild, is_visible, rank};
pub use scoring::Scorer;
