mod common;

use assert2::check;
use common::{IsolatedState, catalog, isolated_state};
use loadout_search::debounce::DEFAULT_DELAY;
use loadout_search::{BuildId, Catalog, IndexCache, RankOptions, Scorer, debounce, rank};
use rstest::rstest;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Typing "desert" one key at a time ranks only the final query.
#[rstest]
#[tokio::test(start_paused = true)]
async fn typing_ranks_only_the_final_query(catalog: Catalog) {
    let catalog = Arc::new(catalog);
    let searches: Arc<Mutex<Vec<(String, Vec<u64>)>>> = Arc::default();

    let search = {
        let catalog = Arc::clone(&catalog);
        let searches = Arc::clone(&searches);
        let cache = Mutex::new(IndexCache::new(16));
        let scorer = Scorer::default();
        debounce(
            move |query: String| {
                let mut cache = cache.lock().unwrap();
                let ids = rank(&catalog, &mut cache, &scorer, &query, RankOptions::default())
                    .into_iter()
                    .map(|r| r.record.id.0)
                    .collect();
                searches.lock().unwrap().push((query, ids));
            },
            DEFAULT_DELAY,
        )
    };

    let mut typed = String::new();
    for ch in "desert".chars() {
        typed.push(ch);
        search(typed.clone());
        tokio::time::sleep(Duration::from_millis(120)).await;
    }
    check!(searches.lock().unwrap().is_empty());

    tokio::time::sleep(Duration::from_millis(200)).await;
    let searches = searches.lock().unwrap();
    check!(*searches == vec![("desert".to_string(), vec![12])]);
}

/// The state's debounced search uses the configured delay (250 ms by default).
#[rstest]
#[tokio::test(start_paused = true)]
async fn state_search_reports_the_last_keystroke(isolated_state: IsolatedState) {
    let results: Arc<Mutex<Vec<(String, Vec<(BuildId, u32)>)>>> = Arc::default();
    let sink = Arc::clone(&results);
    let search = isolated_state
        .state
        .debounced_search(move |query, ranked| sink.lock().unwrap().push((query, ranked)));

    for query in ["k", "ki", "kil", "kilo"] {
        search.call(query.to_string());
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    tokio::time::sleep(Duration::from_millis(150)).await;
    check!(results.lock().unwrap().is_empty());

    tokio::time::sleep(Duration::from_millis(60)).await;
    let results = results.lock().unwrap();
    // "ki", the partial probe of "kilo", is also in "akimbo" and "snayperki"
    let expected = vec![(BuildId(10), 5), (BuildId(12), 2), (BuildId(13), 2)];
    check!(*results == vec![("kilo".to_string(), expected)]);
}
