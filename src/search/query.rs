//! Ranking a catalog against a query.

use super::cache::IndexCache;
use super::scoring::Scorer;
use crate::catalog::Catalog;
use crate::types::BuildRecord;

/// Queries shorter than this (in characters) show every build.
pub const MIN_FILTER_QUERY_CHARS: usize = 2;

/// Optional narrowing applied after scoring.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankOptions<'a> {
    /// Keep only builds of this weapon type key.
    pub weapon_type: Option<&'a str>,
    pub limit: Option<usize>,
}

/// A build with its relevance for the current query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedBuild<'a> {
    pub record: &'a BuildRecord,
    pub score: u32,
}

/// Whether a build stays listed for the raw `query`.
///
/// Very short queries filter nothing; otherwise only scoring builds stay.
pub fn is_visible(score: u32, query: &str) -> bool {
    score > 0 || query.chars().count() < MIN_FILTER_QUERY_CHARS
}

/// Scores every build of `catalog`, keeps visible ones and orders them by
/// descending score. Equal scores keep catalog order.
pub fn rank<'a>(
    catalog: &'a Catalog,
    cache: &mut IndexCache,
    scorer: &Scorer,
    query: &str,
    options: RankOptions<'_>,
) -> Vec<RankedBuild<'a>> {
    cache.reserve(catalog.builds().len());
    let mut ranked: Vec<RankedBuild<'a>> = catalog
        .builds()
        .iter()
        .filter(|record| options.weapon_type.is_none_or(|key| record.weapon_type == key))
        .filter_map(|record| {
            let index = cache.index_for(catalog, record);
            let score = scorer.score(record, Some(&*index), query);
            is_visible(score, query).then_some(RankedBuild { record, score })
        })
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    if let Some(limit) = options.limit {
        ranked.truncate(limit);
    }

    tracing::debug!(
        "Ranked {} of {} builds for {:?}",
        ranked.len(),
        catalog.builds().len(),
        query
    );
    ranked
}
