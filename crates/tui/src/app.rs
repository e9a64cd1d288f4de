use std::{
    io, thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use gamepedia_core::{
    catalog::{CatalogEvent, CatalogLoader},
    query::{self, Collection, Facets, Filters},
    router::HOME_TITLE,
    views::Statistics,
    widget::{WidgetMode, WidgetView},
    AppState, GameRecord, HomeView, Notification, RenderInstruction, WidgetClient, WidgetEvent,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

const TICK_RATE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    selection_bg: Color,
    highlight: Color,
    success: Color,
    warning: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            highlight: Color::Yellow,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Browse,
    Search,
    Command,
}

#[derive(Debug, Clone, PartialEq)]
enum Page {
    Home,
    Detail(GameRecord),
}

#[derive(Debug, Clone, PartialEq)]
enum Results {
    Hidden,
    Listing {
        title: String,
        records: Vec<GameRecord>,
    },
    Empty {
        query: String,
    },
}

enum AppEvent {
    Input(Event),
    Tick,
}

/// Terminal front end translating [`RenderInstruction`]s into screens.
pub struct GamepediaApp {
    app: AppState,
    ui: UiState,
    theme: Theme,
    loader: CatalogLoader,
    widget: WidgetClient,
    facets: Facets,
    catalog_tx: Option<mpsc::Sender<CatalogEvent>>,
    catalog_rx: Option<mpsc::Receiver<CatalogEvent>>,
    widget_tx: Option<mpsc::Sender<WidgetEvent>>,
    widget_rx: Option<mpsc::Receiver<WidgetEvent>>,
}

impl GamepediaApp {
    pub fn new(app: AppState, loader: CatalogLoader, widget: WidgetClient) -> Self {
        let ui = UiState {
            widget: app.widget_view(),
            ..UiState::default()
        };
        Self {
            app,
            ui,
            theme: Theme::default(),
            loader,
            widget,
            facets: Facets::default(),
            catalog_tx: None,
            catalog_rx: None,
            widget_tx: None,
            widget_rx: None,
        }
    }

    pub fn attach_catalog(
        &mut self,
        sender: mpsc::Sender<CatalogEvent>,
        receiver: mpsc::Receiver<CatalogEvent>,
    ) {
        self.catalog_tx = Some(sender);
        self.catalog_rx = Some(receiver);
    }

    pub fn attach_widget(
        &mut self,
        sender: mpsc::Sender<WidgetEvent>,
        receiver: mpsc::Receiver<WidgetEvent>,
    ) {
        self.widget_tx = Some(sender);
        self.widget_rx = Some(receiver);
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut catalog_rx = self
            .catalog_rx
            .take()
            .context("catalog channel not attached")?;
        let mut widget_rx = self
            .widget_rx
            .take()
            .context("widget channel not attached")?;

        let initial = self.app.sync_location();
        self.apply(initial);
        self.ui.set_status("Loading catalog...".to_string());

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        loop {
            if let Some(title) = self.ui.take_title_change() {
                let _ = execute!(terminal.backend_mut(), SetTitle(title));
            }
            terminal.draw(|frame| self.draw(frame))?;
            if self.ui.should_quit {
                break;
            }

            tokio::select! {
                maybe_event = event_rx.recv() => {
                    if !self.process_app_event(maybe_event) {
                        break;
                    }
                }
                Some(event) = catalog_rx.recv() => self.handle_catalog_event(event),
                Some(event) = widget_rx.recv() => self.handle_widget_event(event),
            }

            if self.ui.should_quit {
                break;
            }
        }

        restore_terminal(&mut terminal)?;
        Ok(())
    }

    fn apply(&mut self, instructions: Vec<RenderInstruction>) {
        for instruction in instructions {
            match instruction {
                RenderInstruction::PageTitle(title) => {
                    self.ui.title = title;
                    self.ui.title_changed = true;
                }
                RenderInstruction::Listing { title, records } => {
                    self.ui.results = Results::Listing { title, records };
                    self.ui.reset_cursor();
                }
                RenderInstruction::NoResults { query } => {
                    self.ui.results = Results::Empty { query };
                    self.ui.reset_cursor();
                }
                RenderInstruction::HideResults => {
                    self.ui.results = Results::Hidden;
                    self.ui.reset_cursor();
                }
                RenderInstruction::Suggestions { query, records } => {
                    self.ui.suggestion_cursor = None;
                    self.ui.suggestions = Some((query, records));
                }
                RenderInstruction::HideSuggestions => {
                    self.ui.suggestion_cursor = None;
                    self.ui.suggestions = None;
                }
                RenderInstruction::Detail(record) => {
                    self.ui.results = Results::Hidden;
                    self.ui.page = Page::Detail(record);
                    self.ui.reset_cursor();
                }
                RenderInstruction::Home(view) => {
                    self.ui.page = Page::Home;
                    self.ui.set_home(view);
                    self.ui.reset_cursor();
                }
                RenderInstruction::Statistics(statistics) => self.ui.statistics = statistics,
                RenderInstruction::RecentlyViewed(records) => self.ui.recently_viewed = records,
                RenderInstruction::Widget(view) => self.ui.widget = view,
                RenderInstruction::Notify(notification) => {
                    self.ui.notification = Some(notification)
                }
            }
        }
    }

    fn handle_catalog_event(&mut self, event: CatalogEvent) {
        match event {
            CatalogEvent::Loaded(outcome) => {
                let total = outcome.records.len();
                let origin = outcome.origin;
                let instructions = self.app.replace_catalog(outcome.records);
                self.apply(instructions);
                self.facets = query::facets(&self.app.store().all());
                info!(total, origin = origin.label(), "Catalog applied");
                self.ui.set_status(format!(
                    "Loaded {total} games ({}) at {}",
                    origin.label(),
                    Local::now().format("%H:%M")
                ));
            }
            CatalogEvent::SourceChanged(path) => {
                info!(path = %path.display(), "Catalog changed on disk; reloading");
                self.reload_catalog();
            }
        }
    }

    fn handle_widget_event(&mut self, event: WidgetEvent) {
        let instructions = match event {
            WidgetEvent::Loaded(snapshot) => self.app.widget_loaded(snapshot),
            WidgetEvent::Failed(message) => self.app.widget_failed(message),
        };
        self.apply(instructions);
    }

    fn reload_catalog(&mut self) {
        let Some(sender) = self.catalog_tx.clone() else {
            return;
        };
        let loader = self.loader.clone();
        tokio::spawn(async move {
            if let Err(err) = loader.run(sender).await {
                error!("Catalog reload task error: {err}");
            }
        });
        self.ui.set_status("Reloading catalog...".to_string());
    }

    fn retry_widget(&mut self) {
        let Some(sender) = self.widget_tx.clone() else {
            return;
        };
        let widget = self.widget.clone();
        tokio::spawn(async move {
            if let Err(err) = widget.run(sender).await {
                error!("Widget retry task error: {err}");
            }
        });
        self.app.dismiss_notification();
        self.ui.notification = None;
        self.ui.set_status("Refreshing player widget...".to_string());
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(event)) => {
                if let Event::Key(key) = event {
                    if let Err(err) = self.handle_key(key) {
                        self.ui.set_status(format!("Error: {err}"));
                    }
                }
                true
            }
            Some(AppEvent::Tick) => {
                let instructions = self.app.on_tick(Instant::now());
                self.apply(instructions);
                true
            }
            None => false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers == KeyModifiers::CONTROL {
            if let KeyCode::Char('c') = key.code {
                self.ui.should_quit = true;
                return Ok(());
            }
        }
        match self.ui.mode {
            Mode::Browse => self.handle_browse_key(key),
            Mode::Search => self.handle_search_key(key),
            Mode::Command => self.handle_command_key(key),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.ui.mode = Mode::Browse;
                self.apply(vec![RenderInstruction::HideSuggestions]);
                self.ui.set_status("Search cancelled".to_string());
            }
            KeyCode::Enter => {
                self.ui.mode = Mode::Browse;
                let chosen = self.ui.selected_suggestion().map(|record| record.id);
                let instructions = match chosen {
                    Some(id) => self.app.select_game(id),
                    None => self.app.submit_search(),
                };
                self.apply(instructions);
            }
            KeyCode::Down | KeyCode::Tab => self.ui.move_suggestion(1),
            KeyCode::Up | KeyCode::BackTab => self.ui.move_suggestion(-1),
            KeyCode::Backspace => {
                let mut text = self.app.input().to_string();
                text.pop();
                let instructions = self.app.on_input(&text, Instant::now());
                self.apply(instructions);
            }
            KeyCode::Char(c) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    let mut text = self.app.input().to_string();
                    text.push(c);
                    let instructions = self.app.on_input(&text, Instant::now());
                    self.apply(instructions);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_command_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.ui.mode = Mode::Browse;
                self.ui.command.clear();
                self.ui.set_status("Navigation cancelled".to_string());
            }
            KeyCode::Enter => {
                self.ui.mode = Mode::Browse;
                let fragment = std::mem::take(&mut self.ui.command);
                debug!(%fragment, "Navigation requested");
                let instructions = self.app.request_navigation(&fragment);
                self.apply(instructions);
                self.ui
                    .set_status(format!("#{}", self.app.location().fragment()));
            }
            KeyCode::Backspace => {
                self.ui.command.pop();
            }
            KeyCode::Char(c) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    self.ui.command.push(c);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => self.ui.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.ui.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.ui.move_cursor(-1),
            KeyCode::Char('/') => {
                self.ui.mode = Mode::Search;
                self.ui
                    .set_status("Type to search, Enter to run, Esc to cancel".to_string());
            }
            KeyCode::Char(':') => {
                self.ui.mode = Mode::Command;
                self.ui.command.clear();
                self.ui
                    .set_status("Go to fragment, e.g. #game/minecraft".to_string());
            }
            KeyCode::Enter => {
                if let Some(id) = self.ui.current_record().map(|record| record.id) {
                    let instructions = self.app.select_game(id);
                    self.apply(instructions);
                }
            }
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') => {
                let instructions = if self.ui.results != Results::Hidden {
                    self.app.clear_search()
                } else {
                    self.app.request_navigation("home")
                };
                self.apply(instructions);
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.reload_catalog();
            }
            KeyCode::Char('r') => {
                let instructions = self.app.random_game();
                self.apply(instructions);
            }
            KeyCode::Char('g') => {
                let genre = cycle(self.app.filters().genre.as_deref(), &self.facets.genres);
                let filters = Filters {
                    genre,
                    ..self.app.filters().clone()
                };
                self.set_filters(filters);
            }
            KeyCode::Char('p') => {
                let platform = cycle(
                    self.app.filters().platform.as_deref(),
                    &self.facets.platforms,
                );
                let filters = Filters {
                    platform,
                    ..self.app.filters().clone()
                };
                self.set_filters(filters);
            }
            KeyCode::Char('y') => {
                let year = cycle(self.app.filters().year.as_deref(), &self.facets.years);
                let filters = Filters {
                    year,
                    ..self.app.filters().clone()
                };
                self.set_filters(filters);
            }
            KeyCode::Char('c') => {
                let mut instructions = self.app.set_filters(Filters::default());
                instructions.extend(self.app.clear_search());
                self.apply(instructions);
                self.ui.set_status("Search and filters cleared".to_string());
            }
            KeyCode::Char('C') => {
                let instructions = self.app.clear_recently_viewed();
                self.apply(instructions);
                self.ui.set_status("Recently viewed cleared".to_string());
            }
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                let instructions = self.app.browse(Collection::ALL[index]);
                self.apply(instructions);
            }
            KeyCode::Char('x') => {
                self.app.dismiss_notification();
                self.ui.notification = None;
            }
            KeyCode::Char('R') => self.retry_widget(),
            _ => {}
        }
        Ok(())
    }

    fn set_filters(&mut self, filters: Filters) {
        let summary = filter_summary(&filters);
        let instructions = self.app.set_filters(filters);
        self.apply(instructions);
        self.ui.set_status(summary);
    }

    fn draw(&mut self, frame: &mut Frame) {
        let size = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(4),
            ])
            .split(size);

        self.render_search_bar(frame, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[1]);
        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(14)])
            .split(body[1]);

        self.render_record_list(frame, body[0]);
        match (&self.ui.page, &self.ui.results) {
            (Page::Detail(record), Results::Hidden) => {
                self.render_detail(frame, side[0], record)
            }
            _ => self.render_preview(frame, side[0]),
        }
        self.render_widget_panel(frame, side[1]);
        self.render_status(frame, chunks[2]);

        if self.ui.mode == Mode::Search {
            self.render_suggestions(frame, chunks[0], size);
        }
        if let Some(notification) = &self.ui.notification {
            self.render_notification(frame, size, notification);
        }
    }

    fn render_search_bar(&self, frame: &mut Frame, area: Rect) {
        let (label, text, active) = match self.ui.mode {
            Mode::Command => (" Go ", format!("#{}", self.ui.command), true),
            Mode::Search => (" Search ", self.app.input().to_string(), true),
            Mode::Browse => (" Search ", self.app.input().to_string(), false),
        };
        let style = if active {
            Style::default().fg(self.theme.accent)
        } else {
            Style::default().fg(self.theme.muted)
        };
        let cursor = if active { "_" } else { "" };
        let paragraph = Paragraph::new(Line::from(vec![
            Span::styled(label, style.add_modifier(Modifier::BOLD)),
            Span::raw(" "),
            Span::styled(
                format!("{text}{cursor}"),
                Style::default().fg(self.theme.primary_fg),
            ),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(self.ui.title.clone())
                .border_style(style),
        );
        frame.render_widget(paragraph, area);
    }

    fn render_record_list(&mut self, frame: &mut Frame, area: Rect) {
        self.ui.list_height = area.height.saturating_sub(2) as usize;
        self.ui.clamp_cursor();
        self.ui.ensure_cursor_visible();

        let heading = self.ui.list_heading();
        let block = Block::default().borders(Borders::ALL).title(heading);

        if let Results::Empty { query } = &self.ui.results {
            let paragraph = Paragraph::new(vec![
                Line::from(Span::styled(
                    "No results found",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("No games match \"{query}\"."),
                    Style::default().fg(self.theme.muted),
                )),
            ])
            .block(block)
            .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
            return;
        }

        let height = self.ui.list_height;
        let records = self.ui.visible_records(height);
        let mut list_state = ListState::default();
        if !records.is_empty() {
            let selected = self
                .ui
                .cursor
                .saturating_sub(self.ui.offset)
                .min(records.len().saturating_sub(1));
            list_state.select(Some(selected));
        }
        let items: Vec<ListItem> = records
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                let is_selected = self.ui.cursor == self.ui.offset + idx;
                let marker = if is_selected {
                    Span::styled(
                        "▶ ",
                        Style::default()
                            .fg(self.theme.accent)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::raw("  ")
                };
                ListItem::new(Line::from(vec![
                    marker,
                    Span::styled(
                        record.title.clone(),
                        Style::default()
                            .fg(self.theme.primary_fg)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!(" · {}", record.year()),
                        Style::default().fg(self.theme.muted),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect, record: &GameRecord) {
        let block = Block::default().borders(Borders::ALL).title("Game");
        let mut lines = vec![
            Line::from(Span::styled(
                record.title.clone(),
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                record.meta_line(),
                Style::default().fg(self.theme.muted),
            )),
            Line::from(""),
            Line::from(format!("Publisher: {}", record.publisher)),
            Line::from(format!("Released:  {}", record.release_date)),
            Line::from(format!("Platforms: {}", record.platforms.join(", "))),
            Line::from(format!("Rating:    {}", record.rating)),
        ];
        if !record.categories.is_empty() {
            lines.push(Line::from(format!(
                "Categories: {}",
                record.categories.join(", ")
            )));
        }
        if !record.tags.is_empty() {
            lines.push(Line::from(format!("Tags: {}", record.tags.join(", "))));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(record.description.clone()));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("#{}", self.app.location().fragment()),
            Style::default().fg(self.theme.muted),
        )));
        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_preview(&self, frame: &mut Frame, area: Rect) {
        let (title, record) = match (&self.ui.results, self.ui.current_record()) {
            (Results::Hidden, None) => ("Featured", self.ui.featured.as_ref()),
            (Results::Hidden, Some(record)) => ("Preview", Some(record)),
            (_, record) => ("Preview", record),
        };
        let block = Block::default().borders(Borders::ALL).title(title);

        let mut lines = Vec::new();
        if let Some(record) = record {
            lines.push(Line::from(Span::styled(
                record.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                format!("{} • {}", record.meta_line(), record.platforms.join(", ")),
                Style::default().fg(self.theme.muted),
            )));
            lines.push(Line::from(record.description.clone()));
            lines.push(Line::from(""));
        } else {
            lines.push(Line::from("No games loaded yet"));
            lines.push(Line::from(""));
        }

        let Statistics {
            count,
            distinct_developers,
            distinct_platforms,
        } = self.ui.statistics;
        lines.push(Line::from(Span::styled(
            format!("{count} games · {distinct_developers} developers · {distinct_platforms} platforms"),
            Style::default().fg(self.theme.accent),
        )));

        let recent = if self.ui.recently_viewed.is_empty() {
            "No recently viewed games".to_string()
        } else {
            self.ui
                .recently_viewed
                .iter()
                .map(|record| record.title.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        lines.push(Line::from(Span::styled(
            format!("Recently viewed: {recent}"),
            Style::default().fg(self.theme.muted),
        )));

        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_widget_panel(&self, frame: &mut Frame, area: Rect) {
        let view = &self.ui.widget;
        let title = match view.mode {
            WidgetMode::Demo => "Player (demo)",
            WidgetMode::Live => "Player",
        };
        let status_color = if view.online {
            self.theme.success
        } else {
            self.theme.muted
        };
        let mut lines = vec![Line::from(vec![
            Span::styled(
                view.player_name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(view.status, Style::default().fg(status_color)),
        ])];
        lines.push(Line::from(
            view.stats
                .iter()
                .take(3)
                .map(|(label, value)| format!("{label}: {value}"))
                .collect::<Vec<_>>()
                .join(" · "),
        ));
        for game in &view.recent_games {
            let mut spans = vec![
                Span::raw(format!("  {} ", game.name)),
                Span::styled(game.playtime.clone(), Style::default().fg(self.theme.accent)),
            ];
            if let Some(recent) = &game.recent {
                spans.push(Span::styled(
                    format!(" {recent}"),
                    Style::default().fg(self.theme.muted),
                ));
            }
            if let Some(price) = &game.price {
                spans.push(Span::styled(
                    format!(" {price}"),
                    Style::default().fg(self.theme.warning),
                ));
            }
            lines.push(Line::from(spans));
        }
        lines.push(Line::from(format!(
            "Achievements {}/{} ({:.1}%)",
            view.achievements_unlocked, view.achievements_total, view.achievement_percentage
        )));
        for recommendation in &view.recommendations {
            lines.push(Line::from(Span::styled(
                format!("  {recommendation}"),
                Style::default().fg(self.theme.muted),
            )));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_suggestions(&self, frame: &mut Frame, anchor: Rect, size: Rect) {
        let Some((query, records)) = &self.ui.suggestions else {
            return;
        };
        let height = (records.len() as u16 + 2).min(size.height.saturating_sub(anchor.bottom()));
        if height < 3 {
            return;
        }
        let area = Rect {
            x: anchor.x + 2,
            y: anchor.bottom(),
            width: anchor.width.saturating_sub(4),
            height,
        };
        let items: Vec<ListItem> = records
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                let mut spans: Vec<Span> = query::highlight(&record.title, query)
                    .into_iter()
                    .map(|segment| {
                        if segment.matched {
                            Span::styled(
                                segment.text.to_string(),
                                Style::default()
                                    .fg(self.theme.highlight)
                                    .add_modifier(Modifier::BOLD),
                            )
                        } else {
                            Span::raw(segment.text.to_string())
                        }
                    })
                    .collect();
                spans.push(Span::styled(
                    format!("  {}", record.meta_line()),
                    Style::default().fg(self.theme.muted),
                ));
                let item = ListItem::new(Line::from(spans));
                if self.ui.suggestion_cursor == Some(idx) {
                    item.style(Style::default().bg(self.theme.selection_bg))
                } else {
                    item
                }
            })
            .collect();
        frame.render_widget(Clear, area);
        frame.render_widget(
            List::new(items).block(Block::default().borders(Borders::ALL).title("Suggestions")),
            area,
        );
    }

    fn render_notification(&self, frame: &mut Frame, size: Rect, notification: &Notification) {
        let area = centered_rect(60, 20, size);
        let mut hints = Vec::new();
        if notification.retry {
            hints.push("[R] retry");
        }
        if notification.dismissible {
            hints.push("[x] dismiss");
        }
        let paragraph = Paragraph::new(vec![
            Line::from(notification.message.clone()),
            Line::from(""),
            Line::from(Span::styled(
                hints.join("  "),
                Style::default().fg(self.theme.muted),
            )),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Notice")
                .border_style(Style::default().fg(self.theme.danger)),
        );
        frame.render_widget(Clear, area);
        frame.render_widget(paragraph, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let primary = self.ui.status.clone();
        let secondary = match self.ui.mode {
            Mode::Browse => format!(
                "{} │ / search  : go  r random  g/p/y filter  c clear  1-4 browse  q quit",
                filter_summary(self.app.filters())
            ),
            Mode::Search => "↑/↓ pick suggestion  Enter open/search  Esc cancel".to_string(),
            Mode::Command => "Enter go  Esc cancel".to_string(),
        };
        let paragraph = Paragraph::new(vec![
            Line::from(primary),
            Line::from(Span::styled(secondary, Style::default().fg(self.theme.muted))),
        ])
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

fn filter_summary(filters: &Filters) -> String {
    if filters.is_empty() {
        return "No filters".to_string();
    }
    let parts: Vec<String> = [
        ("genre", &filters.genre),
        ("platform", &filters.platform),
        ("year", &filters.year),
    ]
    .into_iter()
    .filter_map(|(name, value)| value.as_ref().map(|value| format!("{name}={value}")))
    .collect();
    format!("Filters: {}", parts.join(", "))
}

/// Next value after `current` in `options`, wrapping back to unset.
fn cycle(current: Option<&str>, options: &[String]) -> Option<String> {
    match current.and_then(|value| options.iter().position(|option| option == value)) {
        None => options.first().cloned(),
        Some(idx) => options.get(idx + 1).cloned(),
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

struct UiState {
    title: String,
    title_changed: bool,
    page: Page,
    results: Results,
    featured: Option<GameRecord>,
    recent_releases: Vec<GameRecord>,
    recently_viewed: Vec<GameRecord>,
    statistics: Statistics,
    suggestions: Option<(String, Vec<GameRecord>)>,
    suggestion_cursor: Option<usize>,
    widget: WidgetView,
    notification: Option<Notification>,
    command: String,
    cursor: usize,
    offset: usize,
    list_height: usize,
    status: String,
    mode: Mode,
    should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            title: HOME_TITLE.to_string(),
            title_changed: true,
            page: Page::Home,
            results: Results::Hidden,
            featured: None,
            recent_releases: Vec::new(),
            recently_viewed: Vec::new(),
            statistics: Statistics::default(),
            suggestions: None,
            suggestion_cursor: None,
            widget: WidgetView::from(&gamepedia_core::widget::WidgetSnapshot::demo()),
            notification: None,
            command: String::new(),
            cursor: 0,
            offset: 0,
            list_height: 1,
            status: "Ready".to_string(),
            mode: Mode::Browse,
            should_quit: false,
        }
    }
}

impl UiState {
    fn set_home(&mut self, view: HomeView) {
        self.featured = view.featured;
        self.recent_releases = view.recent;
        self.statistics = view.statistics;
        self.recently_viewed = view.recently_viewed;
    }

    fn take_title_change(&mut self) -> Option<String> {
        std::mem::take(&mut self.title_changed).then(|| self.title.clone())
    }

    /// Records behind the left-hand list: results, else recent releases on
    /// the home page, else the viewing history.
    fn records(&self) -> &[GameRecord] {
        match (&self.results, &self.page) {
            (Results::Listing { records, .. }, _) => records,
            (Results::Empty { .. }, _) => &[],
            (Results::Hidden, Page::Home) => &self.recent_releases,
            (Results::Hidden, Page::Detail(_)) => &self.recently_viewed,
        }
    }

    fn list_heading(&self) -> String {
        match (&self.results, &self.page) {
            (Results::Listing { title, records }, _) => format!("{title} ({})", records.len()),
            (Results::Empty { .. }, _) => "Results".to_string(),
            (Results::Hidden, Page::Home) => "Recent Releases".to_string(),
            (Results::Hidden, Page::Detail(_)) => "Recently Viewed".to_string(),
        }
    }

    fn visible_records(&self, height: usize) -> &[GameRecord] {
        let records = self.records();
        let start = self.offset.min(records.len());
        let end = (start + height).min(records.len());
        &records[start..end]
    }

    fn current_record(&self) -> Option<&GameRecord> {
        self.records().get(self.cursor)
    }

    fn selected_suggestion(&self) -> Option<&GameRecord> {
        let (_, records) = self.suggestions.as_ref()?;
        records.get(self.suggestion_cursor?)
    }

    fn move_suggestion(&mut self, delta: isize) {
        let Some((_, records)) = &self.suggestions else {
            return;
        };
        if records.is_empty() {
            return;
        }
        let len = records.len() as isize;
        let next = match self.suggestion_cursor {
            None if delta > 0 => 0,
            None => len - 1,
            Some(idx) => (idx as isize + delta).rem_euclid(len),
        };
        self.suggestion_cursor = Some(next as usize);
    }

    fn reset_cursor(&mut self) {
        self.cursor = 0;
        self.offset = 0;
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.records().len() as isize;
        if len == 0 {
            return;
        }
        let idx = (self.cursor as isize + delta).clamp(0, len - 1);
        self.cursor = idx as usize;
        self.ensure_cursor_visible();
    }

    fn set_status(&mut self, message: String) {
        self.status = message;
    }

    fn clamp_cursor(&mut self) {
        let len = self.records().len();
        if len == 0 {
            self.cursor = 0;
            self.offset = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    fn ensure_cursor_visible(&mut self) {
        let len = self.records().len();
        if len == 0 || self.list_height == 0 {
            self.offset = 0;
            return;
        }
        let height = self.list_height;
        let max_offset = len.saturating_sub(height);

        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor + 1 - height;
        }

        if self.offset > max_offset {
            self.offset = max_offset;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycling_walks_options_then_unsets() {
        let options = vec!["action".to_string(), "rpg".to_string()];
        assert_eq!(cycle(None, &options).as_deref(), Some("action"));
        assert_eq!(cycle(Some("action"), &options).as_deref(), Some("rpg"));
        assert_eq!(cycle(Some("rpg"), &options), None);
        assert_eq!(cycle(Some("gone"), &options).as_deref(), Some("action"));
        assert_eq!(cycle(None, &[]), None);
    }

    #[test]
    fn summary_lists_active_facets() {
        assert_eq!(filter_summary(&Filters::default()), "No filters");
        assert_eq!(
            filter_summary(&Filters::genre("rpg").with_year("2020")),
            "Filters: genre=rpg, year=2020"
        );
    }

    #[test]
    fn suggestion_cursor_wraps() {
        let mut ui = UiState::default();
        ui.move_suggestion(1);
        assert_eq!(ui.suggestion_cursor, None);

        let records = gamepedia_core::catalog::sample_games();
        ui.suggestions = Some(("a".to_string(), records[..3].to_vec()));
        ui.move_suggestion(-1);
        assert_eq!(ui.suggestion_cursor, Some(2));
        ui.move_suggestion(1);
        assert_eq!(ui.suggestion_cursor, Some(0));
        assert_eq!(ui.selected_suggestion().map(|r| r.id), Some(1));
    }
}
