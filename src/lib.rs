//! Relevance search over weapon loadout builds.

pub mod catalog;
pub mod config;
pub mod debounce;
pub mod error;
pub mod search;
pub mod server;
pub mod state;
pub mod tools;
pub mod tracing;
pub mod types;

pub use catalog::Catalog;
pub use config::SearchConfig;
pub use debounce::{Debouncer, debounce};
pub use error::{CatalogError, ConfigError};
pub use search::{IndexCache, RankOptions, RankedBuild, Scorer, build_index, normalize, rank};
pub use server::BuildServer;
pub use state::SearchState;
pub use types::{BuildId, BuildRecord, Tab, TopRank};
