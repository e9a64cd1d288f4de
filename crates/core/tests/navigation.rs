use std::sync::Arc;

use anyhow::Result;
use gamepedia_core::{
    catalog::{sample_games, CatalogLoader, CatalogOrigin, CatalogSource},
    query::{self, Filters},
    slug::{game_url, slugify},
    AppState, FileStore, Location, PageState, RecordStore, RenderInstruction, SearchSettings,
};

fn app(strings: Arc<FileStore>, fragment: &str) -> AppState {
    AppState::new(
        RecordStore::with_records(sample_games()),
        strings,
        Location::new(fragment),
        SearchSettings::default(),
    )
}

#[test]
fn fragments_drive_the_page_state() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let strings = Arc::new(FileStore::new(dir.path().join("state.json")));
    let mut state = app(strings, "");
    state.sync_location();
    assert_eq!(state.page_state(), PageState::Home);

    state.request_navigation("#game/the-legend-of-zelda-breath-of-the-wild");
    assert_eq!(state.page_state(), PageState::GameDetail(1));

    state.request_navigation("#game/minecraft");
    assert_eq!(state.page_state(), PageState::GameDetail(3));

    let out = state.request_navigation("#bogus/path");
    assert_eq!(state.page_state(), PageState::Home);
    assert!(out
        .iter()
        .any(|instruction| matches!(instruction, RenderInstruction::Home(_))));
    Ok(())
}

#[test]
fn history_survives_a_restart() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("state.json");

    let mut first = app(Arc::new(FileStore::new(&path)), "");
    first.sync_location();
    for id in [1, 3, 1] {
        first.select_game(id);
        first.request_navigation("home");
    }
    let ids: Vec<u64> = first.recently_viewed().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 3]);

    let second = app(Arc::new(FileStore::new(&path)), "");
    let ids: Vec<u64> = second.recently_viewed().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 3]);
    Ok(())
}

#[test]
fn every_sample_slug_round_trips() {
    let store = RecordStore::with_records(sample_games());
    for record in store.all().iter() {
        let url = game_url(record);
        let slug = url.trim_start_matches("#game/");
        assert_eq!(slug, slugify(slug));
        assert_eq!(store.find_by_slug(slug).map(|r| r.id), Some(record.id));
    }
}

#[test]
fn filter_order_does_not_matter() {
    let records = sample_games();
    let genre = Filters::genre("rpg");
    let platform = Filters::platform("switch");

    let stepwise = query::filter(&query::filter(&records, &genre), &platform);
    let reversed = query::filter(&query::filter(&records, &platform), &genre);
    let combined = query::filter(&records, &genre.clone().with_platform("switch"));

    let ids = |records: &[gamepedia_core::GameRecord]| -> Vec<u64> {
        records.iter().map(|r| r.id).collect()
    };
    assert_eq!(ids(&stepwise), ids(&combined));
    assert_eq!(ids(&reversed), ids(&combined));
    assert_eq!(ids(&combined), vec![5]);
}

#[tokio::test]
async fn missing_catalog_still_fills_the_store() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let loader = CatalogLoader::new(CatalogSource::File(dir.path().join("games.json")));
    let outcome = loader.load().await;
    assert_eq!(outcome.origin, CatalogOrigin::Fallback);

    let strings = Arc::new(FileStore::new(dir.path().join("state.json")));
    let mut state = AppState::new(
        RecordStore::new(),
        strings,
        Location::new("game/hades"),
        SearchSettings::default(),
    );
    state.sync_location();
    assert_eq!(state.page_state(), PageState::Home);

    state.replace_catalog(outcome.records);
    assert_eq!(state.page_state(), PageState::GameDetail(9));
    let ids: Vec<u64> = state.recently_viewed().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![9]);
    Ok(())
}
