//! Fragment routing between the listing page and game detail pages.
//!
//! Navigation only ever happens by requesting a new fragment on the
//! [`Location`]; the [`Router`] observes the change and derives the page
//! state from it.

use tracing::debug;

use crate::{catalog::RecordStore, models::GameRecord, recent::RecentlyViewed, slug::slugify};

/// Window title of the listing page.
pub const HOME_TITLE: &str = "GamePedia - The Free Gaming Encyclopedia";

/// Parsed fragment. Parsing is total; resolution decides what is reachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `""` or `home`.
    Home,
    /// `game/<slug>`; the slug may be missing.
    Game(Option<String>),
    /// Any other route name.
    Unknown(String),
}

impl Route {
    /// Parse a fragment, with or without its leading `#`.
    pub fn parse(fragment: &str) -> Self {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        if fragment.is_empty() {
            return Route::Home;
        }
        let mut segments = fragment.split('/');
        match segments.next().unwrap_or_default() {
            "home" => Route::Home,
            "game" => Route::Game(
                segments
                    .next()
                    .filter(|slug| !slug.is_empty())
                    .map(str::to_string),
            ),
            other => Route::Unknown(other.to_string()),
        }
    }
}

/// Which page is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageState {
    /// Listing page.
    #[default]
    Home,
    /// Detail page of the record with this id.
    GameDetail(u64),
}

/// The addressable fragment, the sole routing channel.
#[derive(Debug, Clone)]
pub struct Location {
    fragment: String,
    changed: bool,
}

impl Location {
    /// Location at `initial`; the initial load counts as a change.
    pub fn new(initial: &str) -> Self {
        Self {
            fragment: normalize(initial),
            changed: true,
        }
    }

    /// Current fragment without the leading `#`.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Ask to move to `fragment`. Requesting the current fragment is a no-op.
    pub fn request(&mut self, fragment: &str) {
        let fragment = normalize(fragment);
        if fragment != self.fragment {
            self.fragment = fragment;
            self.changed = true;
        }
    }

    /// Ask to move to the detail page of `record`.
    pub fn request_game(&mut self, record: &GameRecord) {
        self.request(&format!("game/{}", slugify(&record.title)));
    }

    /// The fragment, once per change.
    pub fn take_change(&mut self) -> Option<String> {
        if std::mem::take(&mut self.changed) {
            Some(self.fragment.clone())
        } else {
            None
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new("")
    }
}

fn normalize(fragment: &str) -> String {
    fragment
        .trim()
        .strip_prefix('#')
        .unwrap_or(fragment.trim())
        .to_string()
}

/// Outcome of resolving a fragment: the entered state and its entry actions.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Route the fragment parsed to.
    pub route: Route,
    /// State that was entered.
    pub state: PageState,
    /// Resolved record when a detail page was entered.
    pub record: Option<GameRecord>,
    /// Window/page title.
    pub title: String,
    /// Whether the listing view is active.
    pub listing_visible: bool,
    /// Whether the detail view is active.
    pub detail_visible: bool,
}

/// Page state machine driven by fragment changes.
#[derive(Debug, Default)]
pub struct Router {
    state: PageState,
}

impl Router {
    /// Router on the listing page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Active page.
    pub fn state(&self) -> PageState {
        self.state
    }

    /// Resolve `fragment` and run the entry actions of the resulting state.
    ///
    /// Unknown routes and unresolvable slugs land on the listing page.
    /// Entering a detail page records exactly one view in `recent`.
    pub fn resolve(
        &mut self,
        fragment: &str,
        store: &RecordStore,
        recent: &mut RecentlyViewed,
    ) -> Transition {
        let route = Route::parse(fragment);
        match lookup(&route, store) {
            Some(record) => self.enter_detail(route, record, Some(recent)),
            None => self.enter_home(route),
        }
    }

    /// Resolve `fragment` again against a replaced store.
    ///
    /// Staying on the same detail page is not a new visit and leaves `recent`
    /// untouched; a slug that only now resolves still records its view.
    pub fn refresh(
        &mut self,
        fragment: &str,
        store: &RecordStore,
        recent: &mut RecentlyViewed,
    ) -> Transition {
        let route = Route::parse(fragment);
        match lookup(&route, store) {
            Some(record) if self.state == PageState::GameDetail(record.id) => {
                self.enter_detail(route, record, None)
            }
            Some(record) => self.enter_detail(route, record, Some(recent)),
            None => self.enter_home(route),
        }
    }

    fn enter_home(&mut self, route: Route) -> Transition {
        self.state = PageState::Home;
        Transition {
            route,
            state: self.state,
            record: None,
            title: HOME_TITLE.to_string(),
            listing_visible: true,
            detail_visible: false,
        }
    }

    fn enter_detail(
        &mut self,
        route: Route,
        record: GameRecord,
        recent: Option<&mut RecentlyViewed>,
    ) -> Transition {
        self.state = PageState::GameDetail(record.id);
        if let Some(recent) = recent {
            recent.record_view(&record);
        }
        debug!(id = record.id, title = %record.title, "Entered game page");
        Transition {
            route,
            state: self.state,
            title: format!("{} - GamePedia", record.title),
            record: Some(record),
            listing_visible: false,
            detail_visible: true,
        }
    }

    /// Record shown by the active detail page, looked up in the current store.
    pub fn current_game(&self, store: &RecordStore) -> Option<GameRecord> {
        match self.state {
            PageState::GameDetail(id) => store.find_by_id(id),
            PageState::Home => None,
        }
    }
}

fn lookup(route: &Route, store: &RecordStore) -> Option<GameRecord> {
    match route {
        Route::Home => None,
        Route::Game(None) => {
            debug!("Game route without slug; showing home");
            None
        }
        Route::Game(Some(slug)) => {
            let found = store.find_by_slug(slug);
            if found.is_none() {
                debug!(%slug, "Unknown game slug; showing home");
            }
            found
        }
        Route::Unknown(name) => {
            debug!(route = %name, "Unknown route; showing home");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::sample_games, storage::MemoryStore};
    use std::sync::Arc;

    fn fixture() -> (Router, RecordStore, RecentlyViewed, Arc<MemoryStore>) {
        let storage = Arc::new(MemoryStore::new());
        (
            Router::new(),
            RecordStore::with_records(sample_games()),
            RecentlyViewed::load(storage.clone()),
            storage,
        )
    }

    #[test]
    fn parses_fragments() {
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("#"), Route::Home);
        assert_eq!(Route::parse("home"), Route::Home);
        assert_eq!(Route::parse("#game"), Route::Game(None));
        assert_eq!(Route::parse("game/"), Route::Game(None));
        assert_eq!(
            Route::parse("game/hades/extra"),
            Route::Game(Some("hades".to_string()))
        );
        assert_eq!(
            Route::parse("bogus/path"),
            Route::Unknown("bogus".to_string())
        );
    }

    #[test]
    fn home_like_fragments_resolve_home() {
        let (mut router, store, mut recent, storage) = fixture();
        for fragment in ["", "home", "#home", "bogus/path", "game", "game/does-not-exist"] {
            let transition = router.resolve(fragment, &store, &mut recent);
            assert_eq!(transition.state, PageState::Home, "fragment {fragment:?}");
            assert!(transition.listing_visible);
            assert!(!transition.detail_visible);
            assert_eq!(transition.title, HOME_TITLE);
        }
        assert!(recent.is_empty());
        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn valid_slug_enters_detail_and_records_one_view() {
        let (mut router, store, mut recent, storage) = fixture();

        let transition = router.resolve(
            "#game/the-legend-of-zelda-breath-of-the-wild",
            &store,
            &mut recent,
        );
        assert_eq!(transition.state, PageState::GameDetail(1));
        assert!(transition.detail_visible);
        assert!(!transition.listing_visible);
        assert_eq!(
            transition.title,
            "The Legend of Zelda: Breath of the Wild - GamePedia"
        );
        assert_eq!(storage.write_count(), 1);
        assert_eq!(router.current_game(&store).map(|r| r.id), Some(1));

        let transition = router.resolve("game/minecraft", &store, &mut recent);
        assert_eq!(transition.state, PageState::GameDetail(3));
        assert_eq!(storage.write_count(), 2);

        let transition = router.resolve("bogus/path", &store, &mut recent);
        assert_eq!(transition.state, PageState::Home);
        assert!(router.current_game(&store).is_none());
    }

    #[test]
    fn empty_store_routes_home_without_panicking() {
        let storage = Arc::new(MemoryStore::new());
        let mut recent = RecentlyViewed::load(storage);
        let mut router = Router::new();
        let transition = router.resolve("game/minecraft", &RecordStore::new(), &mut recent);
        assert_eq!(transition.state, PageState::Home);
    }

    #[test]
    fn refresh_keeps_the_visit_count_on_the_same_page() {
        let (mut router, store, mut recent, storage) = fixture();
        router.resolve("game/minecraft", &store, &mut recent);
        assert_eq!(storage.write_count(), 1);

        let transition = router.refresh("game/minecraft", &store, &mut recent);
        assert_eq!(transition.state, PageState::GameDetail(3));
        assert!(transition.detail_visible);
        assert_eq!(storage.write_count(), 1);

        router.resolve("home", &store, &mut recent);
        router.refresh("game/hades", &store, &mut recent);
        assert_eq!(router.state(), PageState::GameDetail(9));
        assert_eq!(storage.write_count(), 2);
    }

    #[test]
    fn location_reports_each_change_once() {
        let mut location = Location::new("#game/hades");
        assert_eq!(location.take_change().as_deref(), Some("game/hades"));
        assert_eq!(location.take_change(), None);

        location.request("#game/hades");
        assert_eq!(location.take_change(), None);

        location.request("");
        assert_eq!(location.take_change().as_deref(), Some(""));

        let store = RecordStore::with_records(sample_games());
        let hades = store.find_by_id(9).expect("sample record");
        location.request_game(&hades);
        assert_eq!(location.fragment(), "game/hades");
    }
}
