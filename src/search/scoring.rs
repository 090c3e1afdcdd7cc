//! Relevance scoring of build records against free-text queries.
//!
//! A record is scored against its precomputed index string (see
//! [`build_index`](super::index::build_index)):
//! - each query token found in the index earns `exact`; a token of three or more
//!   characters whose leading ~60% is found earns `partial` instead
//! - each synonym of the record's weapon type found in the query earns `synonym`
//! - a query naming any rank the record holds earns `top`, once
//! - a standalone number equal to some tab's module count earns `exact + 1`

use super::normalize::normalize;
use crate::config::{ScoreWeights, SearchConfig, SynonymTables};
use crate::types::{BuildRecord, TopRank};
use ahash::AHashMap;
use regex::Regex;
use std::sync::LazyLock;

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

/// Immutable scoring rules: weights plus pre-normalized synonym tables.
#[derive(Debug, Clone)]
pub struct Scorer {
    weights: ScoreWeights,
    type_synonyms: AHashMap<String, Vec<String>>,
    top_synonyms: [Vec<String>; 3],
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(ScoreWeights::default(), &SynonymTables::default())
    }
}

impl Scorer {
    pub fn new(weights: ScoreWeights, synonyms: &SynonymTables) -> Self {
        let type_synonyms = synonyms
            .types
            .iter()
            .map(|(key, list)| (key.clone(), normalize_synonyms(key, list)))
            .collect();

        let top = &synonyms.top;
        let top_synonyms = [
            normalize_synonyms(TopRank::First.tag(), &top.first),
            normalize_synonyms(TopRank::Second.tag(), &top.second),
            normalize_synonyms(TopRank::Third.tag(), &top.third),
        ];

        Self {
            weights,
            type_synonyms,
            top_synonyms,
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.weights, &config.synonyms)
    }

    /// Scores `record` for `query`. `index` is the record's index string; `None`
    /// scores as an empty index.
    ///
    /// Blank queries score 0 for every record.
    pub fn score(&self, record: &BuildRecord, index: Option<&str>, query: &str) -> u32 {
        let query = normalize(query);
        if query.is_empty() {
            return 0;
        }
        let index = index.unwrap_or_default();

        let mut score: u32 = 0;
        for token in query.split(' ').filter(|t| !t.is_empty()) {
            if index.contains(token) {
                score = score.saturating_add(self.weights.exact);
            } else if let Some(probe) = partial_probe(token)
                && index.contains(probe)
            {
                score = score.saturating_add(self.weights.partial);
            }
        }

        if let Some(synonyms) = self.type_synonyms.get(&record.weapon_type) {
            let hits = synonyms.iter().filter(|s| query.contains(s.as_str())).count();
            let hits = u32::try_from(hits).unwrap_or(u32::MAX);
            score = score.saturating_add(self.weights.synonym.saturating_mul(hits));
        }

        let names_rank = record.ranks().any(|rank| {
            self.top_synonyms[rank_slot(rank)]
                .iter()
                .any(|s| query.contains(s.as_str()))
        });
        if names_rank {
            score = score.saturating_add(self.weights.top);
        }

        if let Some(n) = first_number(&query)
            && record.tabs.iter().any(|tab| tab.items.len() as u64 == n)
        {
            score = score.saturating_add(self.weights.numeric());
        }

        score
    }
}

const fn rank_slot(rank: TopRank) -> usize {
    match rank {
        TopRank::First => 0,
        TopRank::Second => 1,
        TopRank::Third => 2,
    }
}

/// Normalizes a synonym list, dropping entries that normalize to nothing
/// (they would match every query).
fn normalize_synonyms(owner: &str, list: &[String]) -> Vec<String> {
    list.iter()
        .filter_map(|raw| {
            let synonym = normalize(raw);
            if synonym.is_empty() {
                tracing::warn!("Ignoring empty synonym {:?} for '{}'", raw, owner);
                None
            } else {
                Some(synonym)
            }
        })
        .collect()
}

/// Leading `max(2, floor(len * 0.6))` characters of a token of 3+ characters.
fn partial_probe(token: &str) -> Option<&str> {
    let len = token.chars().count();
    if len < 3 {
        return None;
    }
    let keep = (len * 6 / 10).max(2);
    let end = token
        .char_indices()
        .nth(keep)
        .map_or(token.len(), |(i, _)| i);
    Some(&token[..end])
}

/// First run of ASCII digits delimited by ASCII word boundaries on both sides.
///
/// Letters outside ASCII count as boundaries, so `топ5` yields 5 but `m4a1` yields nothing.
fn first_number(text: &str) -> Option<u64> {
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';
    DIGITS
        .find_iter(text)
        .find(|m| {
            let before = text[..m.start()].chars().next_back();
            let after = text[m.end()..].chars().next();
            !before.is_some_and(is_word) && !after.is_some_and(is_word)
        })
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::index::build_index;
    use crate::types::{BuildId, Tab};
    use assert2::check;
    use rstest::rstest;
    use std::collections::HashMap;

    type Maps = (HashMap<String, String>, HashMap<String, String>);

    fn maps() -> Maps {
        (
            HashMap::from([("assault".to_string(), "Штурмовые винтовки".to_string())]),
            HashMap::from([("mono".to_string(), "Монолитный глушитель".to_string())]),
        )
    }

    fn record(title: &str, weapon_type: &str) -> BuildRecord {
        BuildRecord {
            id: BuildId(1),
            title: title.into(),
            weapon_type: weapon_type.into(),
            ..BuildRecord::default()
        }
    }

    fn score(record: &BuildRecord, query: &str) -> u32 {
        let index = build_index(record, &maps());
        Scorer::default().score(record, Some(&*index), query)
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("?!")]
    fn blank_query_scores_zero(#[case] query: &str) {
        let mut record = record("Desert Eagle", "assault");
        record.top1 = Some("Meta".into());
        record.tabs = vec![Tab {
            label: "Дуло".into(),
            items: vec!["mono".into()],
        }];
        check!(score(&record, query) == 0);
    }

    #[test]
    fn exact_tokens_accumulate() {
        let record = record("Desert Eagle", "");
        check!(score(&record, "desert") == 5);
        check!(score(&record, "Desert Eagle") == 10);
    }

    #[test]
    fn final_sigma_matches_across_case() {
        let record = record("ΟΔΟΣ", "");
        check!(score(&record, "οδος") == 5);
    }

    #[test]
    fn large_weights_saturate() {
        let weights = ScoreWeights {
            exact: u32::MAX - 1,
            synonym: u32::MAX,
            partial: u32::MAX,
            top: u32::MAX,
        };
        let scorer = Scorer::new(weights, &SynonymTables::default());
        let mut record = record("Kilo 141", "assault");
        record.top1 = Some("Meta".into());
        record.tabs = vec![Tab {
            label: String::new(),
            items: (0..5).map(|i| format!("m{i}")).collect(),
        }];
        let index = build_index(&record, &maps());
        check!(scorer.score(&record, Some(&*index), "kilo штурм штурмовые 5 топ1") == u32::MAX);
        check!(weights.numeric() == u32::MAX);
    }

    #[test]
    fn partial_probe_scores_when_exact_misses() {
        let record = record("Desert Eagle", "");
        // "deserted" misses, its probe "dese" hits
        check!(score(&record, "deserted") == 2);
        // two-letter tokens never get a partial probe
        check!(score(&record, "dz") == 0);
    }

    #[rstest]
    #[case("abc", Some("ab"))]
    #[case("abcd", Some("ab"))]
    #[case("abcde", Some("abc"))]
    #[case("deserted", Some("dese"))]
    #[case("штурмовые", Some("штурм"))]
    #[case("ab", None)]
    fn probe_length(#[case] token: &str, #[case] expected: Option<&str>) {
        check!(partial_probe(token) == expected);
    }

    #[test]
    fn type_synonym_without_index_hit() {
        let record = record("Kilo 141", "assault");
        check!(score(&record, "штурм") >= 4);
    }

    #[test]
    fn type_synonyms_stack() {
        let record = record("Kilo 141", "assault");
        // "штурмовые" contains both "штурм" and "штурмовые"; the index holds
        // "штурмовые винтовки" too, adding the exact bonus
        check!(score(&record, "штурмовые") == 5 + 4 + 4);
    }

    #[test]
    fn type_synonyms_ignore_other_types() {
        let record = record("Kilo 141", "pp");
        check!(score(&record, "штурм") == 0);
    }

    #[test]
    fn top_bonus_for_held_rank() {
        let mut held = record("Kilo", "");
        held.top1 = Some("Best Loadout".into());
        check!(score(&held, "топ1") >= 3);

        let unranked = record("Kilo", "");
        check!(score(&unranked, "топ1") == 0);
        check!(score(&unranked, "первый") == 0);
    }

    #[test]
    fn top_bonus_applies_once() {
        let mut record = record("Kilo", "");
        record.top1 = Some("A".into());
        record.top2 = Some("B".into());
        // names both ranks, still one bonus
        check!(score(&record, "первый второй") == 3);
    }

    #[test]
    fn top_bonus_needs_matching_rank() {
        let mut record = record("Kilo", "");
        record.top3 = Some("C".into());
        check!(score(&record, "первый") == 0);
        check!(score(&record, "третий") == 3);
    }

    #[test]
    fn numeric_module_count() {
        let mut five = record("Kilo", "");
        five.tabs = vec![Tab {
            label: String::new(),
            items: (0..5).map(|i| format!("m{i}")).collect(),
        }];
        // "5" is also in the index ("5 модулей"), so exact + numeric
        check!(score(&five, "5") == 5 + 6);

        let mut three = record("Kilo", "");
        three.tabs = vec![Tab {
            label: String::new(),
            items: vec!["a".into(), "b".into(), "c".into()],
        }];
        check!(score(&three, "5") == 0);
    }

    #[rstest]
    #[case("5", Some(5))]
    #[case("сборка 12 модулей", Some(12))]
    #[case("топ5", Some(5))]
    #[case("m4a1", None)]
    #[case("x12 7", Some(7))]
    #[case("#3", Some(3))]
    #[case("5-6", Some(5))]
    #[case("no digits", None)]
    fn extracts_first_number(#[case] text: &str, #[case] expected: Option<u64>) {
        check!(first_number(text) == expected);
    }

    #[test]
    fn missing_index_scores_only_query_rules() {
        let mut record = record("Desert Eagle", "assault");
        record.top1 = Some("Meta".into());
        let scorer = Scorer::default();
        check!(scorer.score(&record, None, "desert") == 0);
        check!(scorer.score(&record, None, "штурм топ1") == 4 + 3);
    }

    #[test]
    fn deterministic() {
        let record = record("Desert Eagle", "assault");
        check!(score(&record, "eagle штурм") == score(&record, "eagle штурм"));
    }

    #[test]
    fn empty_synonyms_are_dropped() {
        let mut synonyms = SynonymTables::default();
        synonyms.types.insert("launcher".into(), vec!["?!".into(), "rpg".into()]);
        let scorer = Scorer::new(ScoreWeights::default(), &synonyms);
        let record = record("Panzer", "launcher");
        check!(scorer.score(&record, Some(""), "anything") == 0);
        check!(scorer.score(&record, Some(""), "rpg") == 4);
    }
}
