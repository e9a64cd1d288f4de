//! Application state and the render instructions it emits.
//!
//! [`AppState`] is the one owner of the record store, recently viewed list,
//! router and search input. Every operation returns the instructions the
//! presentation layer needs to bring the screen up to date.

use std::{sync::Arc, time::Duration, time::Instant};

use tracing::debug;

use crate::{
    catalog::RecordStore,
    config::AppConfig,
    debounce::Debouncer,
    models::GameRecord,
    query::{self, Collection, Filters, DEFAULT_SUGGESTION_LIMIT},
    recent::RecentlyViewed,
    router::{Location, PageState, Router, Transition},
    storage::StringStore,
    views::{self, Picker, Statistics, DEFAULT_RECENT_LIMIT},
    widget::{WidgetSnapshot, WidgetView},
};

/// Search and listing knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    /// Quiet period before typed input is processed.
    pub debounce: Duration,
    /// Minimum trimmed input length for suggestions.
    pub suggestion_min_chars: usize,
    /// Maximum number of suggestions.
    pub suggestion_limit: usize,
    /// Length of the recent releases strip.
    pub recent_limit: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce: crate::debounce::DEFAULT_DEBOUNCE,
            suggestion_min_chars: 3,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

impl From<&AppConfig> for SearchSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            debounce: config.search_debounce(),
            suggestion_min_chars: config.suggestion_min_chars,
            suggestion_limit: config.suggestion_limit,
            recent_limit: config.recent_limit,
        }
    }
}

/// User-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Text to show.
    pub message: String,
    /// Offer a retry action.
    pub retry: bool,
    /// Can be closed by the user.
    pub dismissible: bool,
}

/// Contents of the listing page.
#[derive(Debug, Clone, PartialEq)]
pub struct HomeView {
    /// Featured record.
    pub featured: Option<GameRecord>,
    /// Newest releases.
    pub recent: Vec<GameRecord>,
    /// Catalog counters.
    pub statistics: Statistics,
    /// Recently viewed history, newest first.
    pub recently_viewed: Vec<GameRecord>,
}

/// What the presentation layer should change.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderInstruction {
    /// Window/page title.
    PageTitle(String),
    /// Show a result list under a heading.
    Listing {
        /// Heading.
        title: String,
        /// Records in display order.
        records: Vec<GameRecord>,
    },
    /// Explicit empty-result state.
    NoResults {
        /// Query or heading that produced nothing.
        query: String,
    },
    /// Hide the result list.
    HideResults,
    /// Show suggestions for the typed input.
    Suggestions {
        /// Trimmed input.
        query: String,
        /// At most the configured limit.
        records: Vec<GameRecord>,
    },
    /// Hide the suggestion list.
    HideSuggestions,
    /// Activate the detail page.
    Detail(GameRecord),
    /// Activate the listing page.
    Home(HomeView),
    /// Catalog counters changed.
    Statistics(Statistics),
    /// Recently viewed list changed.
    RecentlyViewed(Vec<GameRecord>),
    /// Widget contents changed.
    Widget(WidgetView),
    /// Show a notification.
    Notify(Notification),
}

/// Root application state.
pub struct AppState {
    store: RecordStore,
    recent: RecentlyViewed,
    router: Router,
    location: Location,
    settings: SearchSettings,
    input: String,
    typing: Debouncer<String>,
    filters: Filters,
    picker: Picker,
    widget: WidgetSnapshot,
    notification: Option<Notification>,
}

impl AppState {
    /// State over `store`, persisting history in `strings`, starting at `location`.
    pub fn new(
        store: RecordStore,
        strings: Arc<dyn StringStore>,
        location: Location,
        settings: SearchSettings,
    ) -> Self {
        Self {
            store,
            recent: RecentlyViewed::load(strings),
            router: Router::new(),
            location,
            typing: Debouncer::new(settings.debounce),
            settings,
            input: String::new(),
            filters: Filters::default(),
            picker: Picker::default(),
            widget: WidgetSnapshot::demo(),
            notification: None,
        }
    }

    /// Replace the randomness source.
    pub fn with_picker(mut self, picker: Picker) -> Self {
        self.picker = picker;
        self
    }

    /// Shared record store.
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Recently viewed history.
    pub fn recently_viewed(&self) -> &[GameRecord] {
        self.recent.entries()
    }

    /// Current location.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Active page.
    pub fn page_state(&self) -> PageState {
        self.router.state()
    }

    /// Record of the active detail page.
    pub fn current_game(&self) -> Option<GameRecord> {
        self.router.current_game(&self.store)
    }

    /// Current search input.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Active filters.
    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Active notification.
    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Search settings.
    pub fn settings(&self) -> SearchSettings {
        self.settings
    }

    /// The search box changed. Processing waits for the quiet period.
    pub fn on_input(&mut self, text: &str, now: Instant) -> Vec<RenderInstruction> {
        self.input = text.to_string();
        self.typing.push(self.input.clone(), now);
        Vec::new()
    }

    /// Drive time-based work: releases debounced input.
    pub fn on_tick(&mut self, now: Instant) -> Vec<RenderInstruction> {
        match self.typing.poll(now) {
            Some(text) => self.process_input(&text),
            None => Vec::new(),
        }
    }

    fn process_input(&self, text: &str) -> Vec<RenderInstruction> {
        let query = text.trim();
        let mut out = Vec::new();
        if query.chars().count() >= self.settings.suggestion_min_chars {
            let records =
                query::suggestions(query, &self.store.all(), self.settings.suggestion_limit);
            if records.is_empty() {
                out.push(RenderInstruction::HideSuggestions);
            } else {
                out.push(RenderInstruction::Suggestions {
                    query: query.to_string(),
                    records,
                });
            }
        } else {
            out.push(RenderInstruction::HideSuggestions);
        }
        if query.is_empty() {
            out.push(RenderInstruction::HideResults);
        }
        out
    }

    /// Run the search for the current input, narrowed by the active filters.
    pub fn submit_search(&mut self) -> Vec<RenderInstruction> {
        self.typing.cancel();
        let query = self.input.trim().to_string();
        if query.is_empty() {
            return vec![
                RenderInstruction::HideSuggestions,
                RenderInstruction::HideResults,
            ];
        }
        let records = query::apply(&query, &self.filters, &self.store.all());
        debug!(%query, hits = records.len(), "Search");
        vec![
            RenderInstruction::HideSuggestions,
            listing(format!("Search results for \"{query}\""), &query, records),
        ]
    }

    /// Replace the filters and list what the current input and filters select.
    pub fn set_filters(&mut self, filters: Filters) -> Vec<RenderInstruction> {
        self.filters = filters;
        let query = self.input.trim().to_string();
        let records = query::apply(&query, &self.filters, &self.store.all());
        let heading = if query.is_empty() {
            "Filtered results".to_string()
        } else {
            query.clone()
        };
        vec![listing(heading.clone(), &heading, records)]
    }

    /// Empty the search box and drop its results.
    pub fn clear_search(&mut self) -> Vec<RenderInstruction> {
        self.input.clear();
        self.typing.cancel();
        vec![
            RenderInstruction::HideSuggestions,
            RenderInstruction::HideResults,
        ]
    }

    /// List a quick-navigation collection.
    pub fn browse(&mut self, collection: Collection) -> Vec<RenderInstruction> {
        let records = collection.select(&self.store.all());
        let label = collection.label().to_string();
        vec![listing(label.clone(), &label, records)]
    }

    /// Navigate to the detail page of `id`; unknown ids do nothing.
    ///
    /// The view is recorded by the detail page's entry action.
    pub fn select_game(&mut self, id: u64) -> Vec<RenderInstruction> {
        self.navigate_to_game(id)
    }

    /// Request `game/<slug>` for a known id.
    pub fn navigate_to_game(&mut self, id: u64) -> Vec<RenderInstruction> {
        match self.store.find_by_id(id) {
            Some(record) => {
                self.location.request_game(&record);
                self.sync_location()
            }
            None => {
                debug!(id, "Ignoring navigation to unknown game");
                Vec::new()
            }
        }
    }

    /// Navigate to a random record's page.
    pub fn random_game(&mut self) -> Vec<RenderInstruction> {
        match views::random(&self.store.all(), &mut self.picker) {
            Some(record) => {
                self.location.request_game(&record);
                self.sync_location()
            }
            None => Vec::new(),
        }
    }

    /// Request a fragment change and resolve it.
    pub fn request_navigation(&mut self, fragment: &str) -> Vec<RenderInstruction> {
        self.location.request(fragment);
        self.sync_location()
    }

    /// Resolve the location if it changed since the last call.
    pub fn sync_location(&mut self) -> Vec<RenderInstruction> {
        let Some(fragment) = self.location.take_change() else {
            return Vec::new();
        };
        let transition = self
            .router
            .resolve(&fragment, &self.store, &mut self.recent);
        self.render_transition(transition)
    }

    fn render_transition(&mut self, transition: Transition) -> Vec<RenderInstruction> {
        let mut out = vec![RenderInstruction::PageTitle(transition.title)];
        match transition.record {
            Some(record) => {
                out.push(RenderInstruction::HideSuggestions);
                out.push(RenderInstruction::Detail(record));
                out.push(RenderInstruction::RecentlyViewed(
                    self.recent.entries().to_vec(),
                ));
            }
            None => out.push(RenderInstruction::Home(self.home_view())),
        }
        out
    }

    /// Listing page contents for the current store.
    pub fn home_view(&mut self) -> HomeView {
        let records = self.store.all();
        HomeView {
            featured: views::featured(&records, &mut self.picker),
            recent: views::recent(&records, self.settings.recent_limit),
            statistics: views::statistics(&records),
            recently_viewed: self.recent.entries().to_vec(),
        }
    }

    /// Swap in a freshly loaded catalog and re-render the active page.
    pub fn replace_catalog(&mut self, records: Vec<GameRecord>) -> Vec<RenderInstruction> {
        self.store.replace(records);
        let mut out = vec![RenderInstruction::Statistics(views::statistics(
            &self.store.all(),
        ))];
        let transition = match self.location.take_change() {
            Some(fragment) => self
                .router
                .resolve(&fragment, &self.store, &mut self.recent),
            None => self
                .router
                .refresh(self.location.fragment(), &self.store, &mut self.recent),
        };
        out.extend(self.render_transition(transition));
        out
    }

    /// Forget the viewing history.
    pub fn clear_recently_viewed(&mut self) -> Vec<RenderInstruction> {
        self.recent.clear();
        vec![RenderInstruction::RecentlyViewed(Vec::new())]
    }

    /// Current widget contents.
    pub fn widget_view(&self) -> WidgetView {
        WidgetView::from(&self.widget)
    }

    /// New widget data arrived.
    pub fn widget_loaded(&mut self, snapshot: WidgetSnapshot) -> Vec<RenderInstruction> {
        self.widget = snapshot;
        vec![RenderInstruction::Widget(self.widget_view())]
    }

    /// The widget endpoint failed: show demo data and a retryable notice.
    pub fn widget_failed(&mut self, message: impl Into<String>) -> Vec<RenderInstruction> {
        self.widget = WidgetSnapshot::demo();
        let notification = Notification {
            message: message.into(),
            retry: true,
            dismissible: true,
        };
        self.notification = Some(notification.clone());
        vec![
            RenderInstruction::Widget(self.widget_view()),
            RenderInstruction::Notify(notification),
        ]
    }

    /// Close the active notification.
    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }
}

fn listing(title: String, query: &str, records: Vec<GameRecord>) -> RenderInstruction {
    if records.is_empty() {
        RenderInstruction::NoResults {
            query: query.to_string(),
        }
    } else {
        RenderInstruction::Listing { title, records }
    }
}
