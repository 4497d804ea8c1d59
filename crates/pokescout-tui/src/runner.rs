// TUI event loop and terminal management
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use pokescout_core::{
    alias::validate_alias,
    catalog::{CatalogPage, CatalogSource},
    favorites::FavoritesStore,
    models::{FavoriteCandidate, PokemonDetails, PokemonSummary},
};

use crate::app::{App, DetailState, InputMode, View};

pub const LIST_LOAD_ERROR: &str = "Could not load the Pokémon list";
pub const SEARCH_MISS_ERROR: &str = "No Pokémon found with that name";
pub const DETAIL_LOAD_ERROR: &str = "Could not load details.";

const ADDED_MSG: &str = "Added to your favorites";
const REMOVED_MSG: &str = "Removed from favorites";
const ALIAS_UPDATED_MSG: &str = "Alias updated";

/// Results of background fetches, funneled back into the event loop.
///
/// Each request carries the generation it was spawned under; a response
/// from a superseded request is simply dropped, which is all the
/// cancellation this needs.
enum FetchOutcome {
    Page {
        generation: u64,
        result: pokescout_core::Result<CatalogPage>,
    },
    Search {
        generation: u64,
        result: pokescout_core::Result<PokemonDetails>,
    },
    Detail {
        result: pokescout_core::Result<PokemonDetails>,
    },
}

pub async fn run_tui(
    mut app: App,
    catalog: Arc<dyn CatalogSource>,
    store: FavoritesStore,
    mouse_enabled: bool,
) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if mouse_enabled {
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    } else {
        execute!(stdout, EnterAlternateScreen)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app, catalog, &store).await;

    // Restore terminal even when the loop errored
    disable_raw_mode()?;
    if mouse_enabled {
        execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    } else {
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    }
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    catalog: Arc<dyn CatalogSource>,
    store: &FavoritesStore,
) -> anyhow::Result<()> {
    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();
    let mut favorites_rx = store.subscribe();
    app.sync_favorites(favorites_rx.borrow_and_update().clone());

    request_page(app, &catalog, &outcome_tx);

    loop {
        // Mirror the favorites stream into the view state
        if favorites_rx.has_changed().unwrap_or(false) {
            app.sync_favorites(favorites_rx.borrow_and_update().clone());
        }

        while let Ok(outcome) = outcome_rx.try_recv() {
            apply_outcome(app, outcome);
        }

        // Fire the debounced search once its window has elapsed
        if let Some(query) = app.take_due_search(Instant::now()) {
            if query.is_empty() {
                app.clear_search();
            } else {
                request_search(app, query, &catalog, &outcome_tx);
            }
        }

        terminal.draw(|frame| crate::ui::render(frame, app))?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key.code, &catalog, store, &outcome_tx);
                }
            }
        }
    }

    Ok(())
}

fn handle_key(
    app: &mut App,
    key: KeyCode,
    catalog: &Arc<dyn CatalogSource>,
    store: &FavoritesStore,
    outcome_tx: &mpsc::UnboundedSender<FetchOutcome>,
) {
    match app.input_mode {
        InputMode::Searching => match key {
            KeyCode::Enter => {
                app.flush_search(Instant::now());
                app.input_mode = InputMode::Normal;
            }
            KeyCode::Esc => {
                app.input_mode = InputMode::Normal;
            }
            KeyCode::Char(c) => {
                app.search_input.push(c);
                app.note_search_edit(Instant::now());
            }
            KeyCode::Backspace => {
                app.search_input.pop();
                app.note_search_edit(Instant::now());
            }
            _ => {}
        },
        InputMode::EditingAlias => match key {
            KeyCode::Enter => save_alias(app, store),
            KeyCode::Esc => {
                app.input_mode = InputMode::Normal;
                app.alias_input.clear();
                app.alias_error = None;
                app.editing_favorite_id = None;
            }
            KeyCode::Char(c) => {
                app.alias_input.push(c);
                app.alias_error = None;
            }
            KeyCode::Backspace => {
                app.alias_input.pop();
                app.alias_error = None;
            }
            _ => {}
        },
        InputMode::Normal => {
            // An open detail popup swallows everything except close keys
            if app.detail.is_some() {
                if matches!(key, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                    app.detail = None;
                }
                return;
            }

            match key {
                KeyCode::Char('q') => app.should_quit = true,
                KeyCode::Char('F') => app.toggle_favorites_view(),
                KeyCode::Down | KeyCode::Char('j') => app.select_next(),
                KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
                _ => match app.view {
                    View::List => handle_list_key(app, key, catalog, store, outcome_tx),
                    View::Favorites => handle_favorites_key(app, key, catalog, store, outcome_tx),
                },
            }
        }
    }
}

fn handle_list_key(
    app: &mut App,
    key: KeyCode,
    catalog: &Arc<dyn CatalogSource>,
    store: &FavoritesStore,
    outcome_tx: &mpsc::UnboundedSender<FetchOutcome>,
) {
    match key {
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Searching;
            app.status_message = None;
        }
        KeyCode::Esc => {
            if app.search.is_some() {
                app.clear_search();
            }
        }
        KeyCode::Right | KeyCode::Char('n') => {
            if app.search.is_none() && app.next_page() {
                request_page(app, catalog, outcome_tx);
            }
        }
        KeyCode::Left | KeyCode::Char('p') => {
            if app.search.is_none() && app.previous_page() {
                request_page(app, catalog, outcome_tx);
            }
        }
        KeyCode::Char('s') => {
            if app.search.is_none() {
                app.cycle_page_size();
                request_page(app, catalog, outcome_tx);
            }
        }
        KeyCode::Char('f') => {
            if let Some(item) = app.selected_item().cloned() {
                toggle_favorite(app, store, item);
            }
        }
        KeyCode::Enter | KeyCode::Char('d') => {
            if let Some(item) = app.selected_item().cloned() {
                open_detail(app, item.id.to_string(), item.name, catalog, outcome_tx);
            }
        }
        _ => {}
    }
}

fn handle_favorites_key(
    app: &mut App,
    key: KeyCode,
    catalog: &Arc<dyn CatalogSource>,
    store: &FavoritesStore,
    outcome_tx: &mpsc::UnboundedSender<FetchOutcome>,
) {
    match key {
        KeyCode::Esc => app.toggle_favorites_view(),
        KeyCode::Char('r') | KeyCode::Delete => {
            if let Some(favorite) = app.selected_favorite().cloned() {
                store.remove(favorite.id);
                app.set_status(REMOVED_MSG);
            }
        }
        KeyCode::Char('e') => {
            if let Some(favorite) = app.selected_favorite().cloned() {
                app.input_mode = InputMode::EditingAlias;
                app.alias_input = favorite.alias.clone();
                app.alias_error = None;
                app.editing_favorite_id = Some(favorite.id);
            }
        }
        KeyCode::Enter | KeyCode::Char('d') => {
            if let Some(favorite) = app.selected_favorite().cloned() {
                open_detail(app, favorite.id.to_string(), favorite.name, catalog, outcome_tx);
            }
        }
        _ => {}
    }
}

fn toggle_favorite(app: &mut App, store: &FavoritesStore, item: PokemonSummary) {
    if app.is_favorite(item.id) {
        store.remove(item.id);
        app.set_status(REMOVED_MSG);
        return;
    }

    match store.add(FavoriteCandidate::from(item)) {
        Ok(()) => app.set_status(ADDED_MSG),
        Err(reason) => app.set_status(reason.to_string()),
    }
}

fn save_alias(app: &mut App, store: &FavoritesStore) {
    let Some(id) = app.editing_favorite_id else {
        app.input_mode = InputMode::Normal;
        return;
    };
    let Some(current) = app.favorites.iter().find(|entry| entry.id == id) else {
        // The favorite vanished while the editor was open
        app.input_mode = InputMode::Normal;
        app.editing_favorite_id = None;
        return;
    };

    let aliases: Vec<String> = app
        .favorites
        .iter()
        .map(|entry| entry.alias.clone())
        .collect();

    match validate_alias(&app.alias_input, &current.alias, &aliases) {
        Ok(()) => {
            store.update_alias(id, app.alias_input.trim());
            app.set_status(ALIAS_UPDATED_MSG);
            app.input_mode = InputMode::Normal;
            app.alias_input.clear();
            app.alias_error = None;
            app.editing_favorite_id = None;
        }
        Err(err) => {
            app.alias_error = Some(err.to_string());
        }
    }
}

fn open_detail(
    app: &mut App,
    query: String,
    title: String,
    catalog: &Arc<dyn CatalogSource>,
    outcome_tx: &mpsc::UnboundedSender<FetchOutcome>,
) {
    app.detail = Some(DetailState::Loading { title });

    let catalog = catalog.clone();
    let tx = outcome_tx.clone();
    tokio::spawn(async move {
        let result = catalog.fetch_detail(&query).await;
        let _ = tx.send(FetchOutcome::Detail { result });
    });
}

fn request_page(
    app: &mut App,
    catalog: &Arc<dyn CatalogSource>,
    outcome_tx: &mpsc::UnboundedSender<FetchOutcome>,
) {
    let generation = app.begin_page_load();
    let limit = app.page_size;
    let offset = app.offset();

    let catalog = catalog.clone();
    let tx = outcome_tx.clone();
    tokio::spawn(async move {
        let result = catalog.fetch_page(limit, offset).await;
        let _ = tx.send(FetchOutcome::Page { generation, result });
    });
}

fn request_search(
    app: &mut App,
    query: String,
    catalog: &Arc<dyn CatalogSource>,
    outcome_tx: &mpsc::UnboundedSender<FetchOutcome>,
) {
    let generation = app.begin_search(query.clone());

    let catalog = catalog.clone();
    let tx = outcome_tx.clone();
    tokio::spawn(async move {
        let result = catalog.fetch_detail(&query).await;
        let _ = tx.send(FetchOutcome::Search { generation, result });
    });
}

fn apply_outcome(app: &mut App, outcome: FetchOutcome) {
    match outcome {
        FetchOutcome::Page { generation, result } => {
            if generation != app.page_generation {
                return;
            }
            match result {
                Ok(page) => app.apply_page(page.total, page.items),
                Err(err) => {
                    tracing::warn!("Catalog page fetch failed: {err}");
                    app.apply_page_error(LIST_LOAD_ERROR.to_string());
                }
            }
        }
        FetchOutcome::Search { generation, result } => {
            if generation != app.search_generation || app.search.is_none() {
                return;
            }
            match result {
                Ok(details) => app.apply_search_result(PokemonSummary {
                    id: details.id,
                    name: details.name,
                    image: details.image.unwrap_or_default(),
                }),
                Err(err) => {
                    tracing::debug!("Search lookup failed: {err}");
                    app.apply_search_error(SEARCH_MISS_ERROR.to_string());
                }
            }
        }
        FetchOutcome::Detail { result } => {
            if app.detail.is_none() {
                return;
            }
            app.detail = Some(match result {
                Ok(details) => DetailState::Loaded(Box::new(details)),
                Err(err) => {
                    tracing::warn!("Detail fetch failed: {err}");
                    DetailState::Failed(DETAIL_LOAD_ERROR.to_string())
                }
            });
        }
    }
}
