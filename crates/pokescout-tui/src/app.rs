// TUI application state and event handling
use std::time::{Duration, Instant};

use pokescout_core::config::PAGE_SIZE_OPTIONS;
use pokescout_core::models::{FavoriteEntry, PokemonDetails, PokemonSummary};
use ratatui::widgets::ListState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,      // Paginated catalog (or search result)
    Favorites, // The favorites list
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,       // Navigating
    Searching,    // Typing in the search box
    EditingAlias, // Typing a new alias for a favorite
}

/// Single-result search overlay on top of the paged list.
///
/// The paged items stay cached underneath so clearing the query restores
/// them without a refetch.
#[derive(Debug, Clone)]
pub struct SearchState {
    pub query: String,
    pub loading: bool,
    pub error: Option<String>,
    pub results: Vec<PokemonSummary>,
}

#[derive(Debug, Clone)]
pub enum DetailState {
    Loading { title: String },
    Loaded(Box<PokemonDetails>),
    Failed(String),
}

pub struct App {
    pub should_quit: bool,
    pub view: View,
    pub input_mode: InputMode,

    // paged catalog state
    pub page_index: u32,
    pub page_size: u32,
    pub total: u32,
    pub items: Vec<PokemonSummary>,
    pub loading: bool,
    pub error_message: Option<String>,
    pub list_state: ListState,
    // Stale page responses are dropped by generation
    pub page_generation: u64,

    // search box state
    pub search_input: String,
    pub search: Option<SearchState>,
    pub search_generation: u64,
    debounce: Duration,
    pending_search_at: Option<Instant>,
    last_executed_query: Option<String>,

    // favorites, mirrored from the store stream
    pub favorites: Vec<FavoriteEntry>,
    pub favorites_state: ListState,

    // detail popup
    pub detail: Option<DetailState>,

    // alias editor
    pub alias_input: String,
    pub alias_error: Option<String>,
    pub editing_favorite_id: Option<u32>,

    // one-line feedback in the status bar
    pub status_message: Option<String>,
}

impl App {
    pub fn new(page_size: u32, debounce: Duration) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));

        Self {
            should_quit: false,
            view: View::List,
            input_mode: InputMode::Normal,
            page_index: 0,
            page_size,
            total: 0,
            items: Vec::new(),
            loading: false,
            error_message: None,
            list_state,
            page_generation: 0,
            search_input: String::new(),
            search: None,
            search_generation: 0,
            debounce,
            pending_search_at: None,
            last_executed_query: None,
            favorites: Vec::new(),
            favorites_state: ListState::default(),
            detail: None,
            alias_input: String::new(),
            alias_error: None,
            editing_favorite_id: None,
            status_message: None,
        }
    }

    /// Rows currently on screen: the search result when a query is live,
    /// the catalog page otherwise.
    pub fn visible_items(&self) -> &[PokemonSummary] {
        match &self.search {
            Some(search) => &search.results,
            None => &self.items,
        }
    }

    pub fn selected_item(&self) -> Option<&PokemonSummary> {
        self.list_state
            .selected()
            .and_then(|index| self.visible_items().get(index))
    }

    pub fn selected_favorite(&self) -> Option<&FavoriteEntry> {
        self.favorites_state
            .selected()
            .and_then(|index| self.favorites.get(index))
    }

    pub fn is_favorite(&self, id: u32) -> bool {
        self.favorites.iter().any(|entry| entry.id == id)
    }

    // --- pagination -------------------------------------------------------

    pub fn total_pages(&self) -> u32 {
        if self.total == 0 || self.page_size == 0 {
            return 0;
        }
        (self.total + self.page_size - 1) / self.page_size
    }

    /// Move to the next page if there is one. Returns true when the page
    /// actually changed and a refetch is needed.
    pub fn next_page(&mut self) -> bool {
        if self.page_index + 1 < self.total_pages() {
            self.page_index += 1;
            return true;
        }
        false
    }

    pub fn previous_page(&mut self) -> bool {
        if self.page_index > 0 {
            self.page_index -= 1;
            return true;
        }
        false
    }

    /// Cycle through the offered page sizes, back to the first page.
    pub fn cycle_page_size(&mut self) {
        let position = PAGE_SIZE_OPTIONS
            .iter()
            .position(|&size| size == self.page_size)
            .unwrap_or(0);
        self.page_size = PAGE_SIZE_OPTIONS[(position + 1) % PAGE_SIZE_OPTIONS.len()];
        self.page_index = 0;
    }

    pub fn offset(&self) -> u32 {
        self.page_index * self.page_size
    }

    pub fn begin_page_load(&mut self) -> u64 {
        self.loading = true;
        self.error_message = None;
        self.page_generation += 1;
        self.page_generation
    }

    pub fn apply_page(&mut self, total: u32, items: Vec<PokemonSummary>) {
        self.loading = false;
        self.error_message = None;
        self.total = total;
        self.items = items;
        self.clamp_selection();
    }

    pub fn apply_page_error(&mut self, message: String) {
        self.loading = false;
        self.error_message = Some(message);
        self.items.clear();
        self.total = 0;
    }

    // --- selection --------------------------------------------------------

    pub fn select_next(&mut self) {
        let len = match self.view {
            View::List => self.visible_items().len(),
            View::Favorites => self.favorites.len(),
        };
        if len == 0 {
            return;
        }
        let state = self.active_list_state();
        let next = match state.selected() {
            Some(current) if current + 1 < len => current + 1,
            Some(current) => current,
            None => 0,
        };
        state.select(Some(next));
    }

    pub fn select_previous(&mut self) {
        let state = self.active_list_state();
        let previous = match state.selected() {
            Some(0) | None => 0,
            Some(current) => current - 1,
        };
        state.select(Some(previous));
    }

    fn active_list_state(&mut self) -> &mut ListState {
        match self.view {
            View::List => &mut self.list_state,
            View::Favorites => &mut self.favorites_state,
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_items().len();
        let selected = self.list_state.selected().unwrap_or(0);
        if len == 0 {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(selected.min(len - 1)));
        }
    }

    pub fn sync_favorites(&mut self, favorites: Vec<FavoriteEntry>) {
        self.favorites = favorites;
        let len = self.favorites.len();
        let selected = self.favorites_state.selected().unwrap_or(0);
        if len == 0 {
            self.favorites_state.select(None);
        } else {
            self.favorites_state.select(Some(selected.min(len - 1)));
        }
    }

    // --- search box -------------------------------------------------------

    /// Record a keystroke in the search box and (re)arm the debounce timer.
    pub fn note_search_edit(&mut self, now: Instant) {
        self.pending_search_at = Some(now + self.debounce);
    }

    /// Arm the timer to fire immediately (Enter skips the debounce).
    pub fn flush_search(&mut self, now: Instant) {
        self.pending_search_at = Some(now);
    }

    /// The normalized query to run, if the debounce window has elapsed.
    /// Returns `Some` at most once per armed edit, and suppresses queries
    /// identical to the one already executed.
    pub fn take_due_search(&mut self, now: Instant) -> Option<String> {
        let deadline = self.pending_search_at?;
        if now < deadline {
            return None;
        }
        self.pending_search_at = None;

        let query = self.search_input.trim().to_lowercase();
        if self.last_executed_query.as_deref() == Some(query.as_str()) {
            return None;
        }
        self.last_executed_query = Some(query.clone());
        Some(query)
    }

    pub fn begin_search(&mut self, query: String) -> u64 {
        self.search_generation += 1;
        self.search = Some(SearchState {
            query,
            loading: true,
            error: None,
            results: Vec::new(),
        });
        self.list_state.select(Some(0));
        self.search_generation
    }

    pub fn apply_search_result(&mut self, result: PokemonSummary) {
        if let Some(search) = &mut self.search {
            search.loading = false;
            search.error = None;
            search.results = vec![result];
        }
        self.list_state.select(Some(0));
    }

    pub fn apply_search_error(&mut self, message: String) {
        if let Some(search) = &mut self.search {
            search.loading = false;
            search.error = Some(message);
            search.results.clear();
        }
    }

    /// Drop the search overlay and show the cached page again.
    pub fn clear_search(&mut self) {
        self.search = None;
        self.search_input.clear();
        self.pending_search_at = None;
        self.last_executed_query = None;
        self.clamp_selection();
    }

    // --- misc -------------------------------------------------------------

    pub fn toggle_favorites_view(&mut self) {
        self.view = match self.view {
            View::List => {
                if self.favorites_state.selected().is_none() && !self.favorites.is_empty() {
                    self.favorites_state.select(Some(0));
                }
                View::Favorites
            }
            View::Favorites => View::List,
        };
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }
}
