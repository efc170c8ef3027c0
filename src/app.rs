//! App state and core application logic
//!
//! Manages the application state machine, navigation stack,
//! and coordinates between UI and the backend client.

use std::time::{Duration, Instant};

use crate::config::Config;
use crate::models::*;
use crate::rank;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

// =============================================================================
// App State Enum
// =============================================================================

/// Application state enum representing current screen
#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    /// Home screen with search box and shortcuts
    Home,
    /// Login form
    Login,
    /// Search results view
    Search,
    /// Detail view for a movie or TV show
    Detail,
    /// Torrent resource listing (ranked and grouped)
    Resources,
    /// Download queue and history
    Downloads,
}

impl Default for AppState {
    fn default() -> Self {
        AppState::Home
    }
}

// =============================================================================
// Input Mode
// =============================================================================

/// Current input mode for keyboard handling
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Text input mode (search box or login form focused)
    Editing,
}

// =============================================================================
// Loading State
// =============================================================================

/// Loading state for async operations
#[derive(Debug, Clone, PartialEq)]
pub enum LoadingState {
    /// Idle - no loading in progress
    Idle,
    /// Loading with optional message
    Loading(Option<String>),
    /// Error with message
    Error(String),
}

impl Default for LoadingState {
    fn default() -> Self {
        LoadingState::Idle
    }
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadingState::Error(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            LoadingState::Loading(Some(msg)) => Some(msg),
            LoadingState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

// =============================================================================
// Selection State (per-view)
// =============================================================================

/// Selection state for list views
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Scroll offset for viewport
    pub offset: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self {
            selected: 0,
            offset: 0,
            len,
        }
    }

    /// Move selection up
    pub fn up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            if self.selected < self.offset {
                self.offset = self.selected;
            }
        }
    }

    /// Move selection down
    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    /// Move selection up by a page
    pub fn page_up(&mut self, page_size: usize) {
        self.selected = self.selected.saturating_sub(page_size);
        if self.selected < self.offset {
            self.offset = self.selected;
        }
    }

    /// Move selection down by a page
    pub fn page_down(&mut self, page_size: usize) {
        if self.len > 0 {
            self.selected = (self.selected + page_size).min(self.len - 1);
        }
    }

    /// Jump to first item
    pub fn first(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    /// Jump to last item
    pub fn last(&mut self) {
        if self.len > 0 {
            self.selected = self.len - 1;
        }
    }

    /// Update offset to keep selected item visible
    pub fn scroll_into_view(&mut self, visible_height: usize) {
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if visible_height > 0 && self.selected >= self.offset + visible_height {
            self.offset = self.selected - visible_height + 1;
        }
    }

    /// Update length (e.g., when new results come in)
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        // Clamp selected to valid range
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

// =============================================================================
// Deferred Actions
// =============================================================================

/// Backend work requested by key handling, executed by the event loop
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    Login { username: String, password: String },
    Search(String),
    LoadDetail { tmdbid: i64, media_type: String },
    LoadResources(String),
    QueueDownload(i64),
    ResumeDownload(String),
    PauseDownload(String),
    RemoveDownload(String),
    RefreshDownloads,
    LoadHistory(u32),
}

// =============================================================================
// View-Specific State
// =============================================================================

/// Login form field focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

/// Login view state
#[derive(Debug, Clone, Default)]
pub struct LoginState {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
    pub loading: LoadingState,
}

impl LoginState {
    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    pub fn insert(&mut self, c: char) {
        self.field_mut().push(c);
    }

    pub fn backspace(&mut self) {
        self.field_mut().pop();
    }

    /// Cycle focus between the two fields
    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    pub fn can_submit(&self) -> bool {
        !self.username.trim().is_empty() && !self.password.is_empty()
    }
}

/// Search view state
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    /// Search query
    pub query: String,
    /// Cursor position in query
    pub cursor: usize,
    /// Search results
    pub results: Vec<SearchItem>,
    /// Results list state
    pub list: ListState,
    /// Loading state
    pub loading: LoadingState,
}

impl SearchState {
    /// Insert character at cursor
    pub fn insert(&mut self, c: char) {
        self.query.insert(self.cursor, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.query.remove(self.cursor);
        }
    }

    /// Delete character at cursor
    pub fn delete(&mut self) {
        if self.cursor < self.query.len() {
            self.query.remove(self.cursor);
        }
    }

    /// Move cursor left
    pub fn cursor_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Move cursor right
    pub fn cursor_right(&mut self) {
        if self.cursor < self.query.len() {
            self.cursor += 1;
        }
    }

    /// Move cursor to start
    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    /// Move cursor to end
    pub fn cursor_end(&mut self) {
        self.cursor = self.query.len();
    }

    /// Clear query
    pub fn clear(&mut self) {
        self.query.clear();
        self.cursor = 0;
    }

    /// Set results and update list state
    pub fn set_results(&mut self, results: Vec<SearchItem>) {
        self.list.set_len(results.len());
        self.results = results;
        self.loading = LoadingState::Idle;
    }

    /// Get currently selected result
    pub fn selected_result(&self) -> Option<&SearchItem> {
        self.results.get(self.list.selected)
    }
}

/// Detail view state
#[derive(Debug, Clone, Default)]
pub struct DetailState {
    pub detail: MediaDetails,
    pub loading: LoadingState,
}

impl DetailState {
    pub fn set_detail(&mut self, detail: MediaDetails) {
        self.detail = detail;
        self.loading = LoadingState::Idle;
    }
}

/// Resources view state.
///
/// `items` is the display list: the recommended resource pinned first,
/// then the remaining pool in bucket order (4k, 2k, 1080p, other).
#[derive(Debug, Clone, Default)]
pub struct ResourcesState {
    /// Keyword the listing was fetched for
    pub keyword: String,
    pub has_resources: bool,
    pub has_seeders: bool,
    pub recommended: Option<TorrentResource>,
    pub items: Vec<TorrentResource>,
    pub list: ListState,
    pub loading: LoadingState,
}

impl ResourcesState {
    pub fn begin_load(&mut self, keyword: String) {
        self.keyword = keyword;
        self.has_resources = false;
        self.has_seeders = false;
        self.recommended = None;
        self.items.clear();
        self.list = ListState::new(0);
        self.loading = LoadingState::Loading(Some("Searching resources...".into()));
    }

    /// Install a fresh processing result, pinning the recommended resource.
    ///
    /// Recommendation runs over the full deduplicated set, so the pin can be
    /// a dead release that the seeded listing would otherwise hide; it is
    /// prepended to the rows in that case.
    pub fn set_resources(&mut self, processed: ProcessedResources) {
        let pool: Vec<TorrentResource> = processed
            .grouped
            .iter()
            .flat_map(|(_, bucket)| bucket.iter().cloned())
            .collect();

        let recommended = rank::recommend(&processed.candidates).cloned();

        let mut items = Vec::with_capacity(pool.len());
        if let Some(best) = &recommended {
            items.push(best.clone());
        }
        for resource in pool {
            let is_pinned = recommended
                .as_ref()
                .map(|best| best.id == resource.id && best.site == resource.site)
                .unwrap_or(false);
            if !is_pinned {
                items.push(resource);
            }
        }

        self.has_resources = processed.has_resources;
        self.has_seeders = processed.has_seeders;
        self.recommended = recommended;
        self.list = ListState::new(items.len());
        self.items = items;
        self.loading = LoadingState::Idle;
    }

    /// Whether the given display index is the pinned recommendation
    pub fn is_recommended(&self, index: usize) -> bool {
        index == 0 && self.recommended.is_some()
    }

    pub fn selected_resource(&self) -> Option<&TorrentResource> {
        self.items.get(self.list.selected)
    }
}

/// Downloads panel focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadsPanel {
    #[default]
    Queue,
    History,
}

/// Downloads view state: active queue, history, and polling bookkeeping
#[derive(Debug, Clone, Default)]
pub struct DownloadsState {
    pub tasks: Vec<DownloadTask>,
    pub history: Vec<DownloadHistoryItem>,
    pub panel: DownloadsPanel,
    pub queue_list: ListState,
    pub history_list: ListState,
    pub loading: LoadingState,
    /// Status change asserted locally, reverted if the backend call fails
    optimistic: Option<(String, DownloadStatus)>,
    /// When the active list was last refreshed
    last_poll: Option<Instant>,
    /// Whether the view has been opened this session
    pub opened: bool,
}

impl DownloadsState {
    /// Replace the whole active collection with a fresh snapshot
    pub fn set_active(&mut self, tasks: Vec<DownloadTask>) {
        self.queue_list.set_len(tasks.len());
        self.tasks = tasks;
        self.optimistic = None;
        self.loading = LoadingState::Idle;
    }

    pub fn set_history(&mut self, items: Vec<DownloadHistoryItem>) {
        self.history_list.set_len(items.len());
        self.history = items;
    }

    pub fn selected_task(&self) -> Option<&DownloadTask> {
        self.tasks.get(self.queue_list.selected)
    }

    pub fn selected_history(&self) -> Option<&DownloadHistoryItem> {
        self.history.get(self.history_list.selected)
    }

    pub fn toggle_panel(&mut self) {
        self.panel = match self.panel {
            DownloadsPanel::Queue => DownloadsPanel::History,
            DownloadsPanel::History => DownloadsPanel::Queue,
        };
    }

    /// Assert a status transition locally before the backend confirms it.
    /// Only one optimistic change is in flight at a time.
    pub fn apply_optimistic(&mut self, id: &str, status: DownloadStatus) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            self.optimistic = Some((id.to_string(), task.status));
            task.status = status;
        }
    }

    /// Undo the in-flight optimistic change after a backend failure
    pub fn revert_optimistic(&mut self) {
        if let Some((id, prior)) = self.optimistic.take() {
            if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
                task.status = prior;
            }
        }
    }

    /// The backend confirmed the change; drop the revert handle
    pub fn commit_optimistic(&mut self) {
        self.optimistic = None;
    }

    pub fn has_active(&self) -> bool {
        self.tasks.iter().any(|t| t.status.is_active())
    }

    /// Whether a poll is due. Re-arms only while something is active and
    /// the view has been opened.
    pub fn should_poll(&self, now: Instant, interval: Duration) -> bool {
        if !self.opened || !self.has_active() {
            return false;
        }
        match self.last_poll {
            Some(last) => now.duration_since(last) >= interval,
            None => true,
        }
    }

    pub fn mark_polled(&mut self, now: Instant) {
        self.last_poll = Some(now);
    }
}

// =============================================================================
// Main Application State
// =============================================================================

/// Main application state
#[derive(Debug)]
pub struct App {
    /// Current state/screen
    pub state: AppState,
    /// Navigation history stack
    pub nav_stack: Vec<AppState>,
    /// Whether the app is running
    pub running: bool,
    /// Current input mode
    pub input_mode: InputMode,
    /// Global error message
    pub error: Option<String>,
    /// Loaded configuration (session lives here)
    pub config: Config,

    // View-specific states
    pub login: LoginState,
    pub search: SearchState,
    pub detail: DetailState,
    pub resources: ResourcesState,
    pub downloads: DownloadsState,

    /// Backend work queued by key handling
    pending: Option<AppAction>,
}

impl App {
    /// Create a new App instance; lands on Login when no session exists
    pub fn new(config: Config) -> Self {
        let state = if config.is_logged_in() {
            AppState::Home
        } else {
            AppState::Login
        };
        let input_mode = if state == AppState::Login {
            InputMode::Editing
        } else {
            InputMode::Normal
        };

        Self {
            state,
            nav_stack: Vec::new(),
            running: true,
            input_mode,
            error: None,
            config,

            login: LoginState::default(),
            search: SearchState::default(),
            detail: DetailState::default(),
            resources: ResourcesState::default(),
            downloads: DownloadsState::default(),

            pending: None,
        }
    }

    /// Navigate to a new state, pushing current to stack
    pub fn navigate(&mut self, state: AppState) {
        if self.state != state {
            self.nav_stack.push(self.state.clone());
            self.state = state;
        }
        // Login is a form, everything else starts in navigation mode
        self.input_mode = if self.state == AppState::Login {
            InputMode::Editing
        } else {
            InputMode::Normal
        };
    }

    /// Go back to previous state
    pub fn back(&mut self) -> bool {
        // If in editing mode, exit editing first
        if self.input_mode == InputMode::Editing && self.state != AppState::Login {
            self.input_mode = InputMode::Normal;
            return true;
        }

        if let Some(prev) = self.nav_stack.pop() {
            self.state = prev;
            self.input_mode = if self.state == AppState::Login {
                InputMode::Editing
            } else {
                InputMode::Normal
            };
            true
        } else {
            false
        }
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Clear error message
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Set error message
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error = Some(msg.into());
    }

    /// Take the queued backend action, if any
    pub fn take_action(&mut self) -> Option<AppAction> {
        self.pending.take()
    }

    fn queue_action(&mut self, action: AppAction) {
        self.pending = Some(action);
    }

    /// The backend rejected the session: drop it and force the Login view
    pub fn handle_auth_expired(&mut self) {
        self.config.clear_token();
        let _ = self.config.save();
        self.nav_stack.clear();
        self.state = AppState::Login;
        self.input_mode = InputMode::Editing;
        self.set_error("Session expired, please log in again");
    }

    /// Login succeeded: persist the token and land on Home
    pub fn handle_login_success(&mut self, token: String) {
        self.config.auth_token = Some(token);
        let _ = self.config.save();
        self.login.password.clear();
        self.login.loading = LoadingState::Idle;
        self.nav_stack.clear();
        self.state = AppState::Home;
        self.input_mode = InputMode::Normal;
    }

    /// Focus search input
    pub fn focus_search(&mut self) {
        if self.state == AppState::Home || self.state == AppState::Search {
            self.input_mode = InputMode::Editing;
            if self.state == AppState::Home {
                self.navigate(AppState::Search);
                self.input_mode = InputMode::Editing;
            }
        }
    }

    /// Open the Downloads view and refresh both panels
    fn open_downloads(&mut self) {
        self.downloads.opened = true;
        self.downloads.loading = LoadingState::Loading(Some("Fetching downloads...".into()));
        self.navigate(AppState::Downloads);
        self.queue_action(AppAction::RefreshDownloads);
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, returns true if event was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Clear error on any keypress
        self.error = None;

        // Global quit shortcut (Ctrl+C)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return true;
        }

        if self.input_mode == InputMode::Editing {
            if self.state == AppState::Login {
                self.handle_login_key(key)
            } else {
                self.handle_editing_key(key)
            }
        } else {
            self.handle_normal_key(key)
        }
    }

    /// Handle keys in the login form
    fn handle_login_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => {
                self.quit();
                true
            }
            KeyCode::Tab | KeyCode::Up | KeyCode::Down => {
                self.login.next_field();
                true
            }
            KeyCode::Enter => {
                if self.login.focus == LoginField::Username {
                    self.login.next_field();
                } else if self.login.can_submit() {
                    self.login.loading = LoadingState::Loading(Some("Logging in...".into()));
                    self.queue_action(AppAction::Login {
                        username: self.login.username.trim().to_string(),
                        password: self.login.password.clone(),
                    });
                }
                true
            }
            KeyCode::Char(c) => {
                self.login.insert(c);
                true
            }
            KeyCode::Backspace => {
                self.login.backspace();
                true
            }
            _ => false,
        }
    }

    /// Handle keys in editing (text input) mode
    fn handle_editing_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                true
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                let query = self.search.query.trim().to_string();
                if !query.is_empty() {
                    self.search.loading = LoadingState::Loading(Some("Searching...".into()));
                    self.queue_action(AppAction::Search(query));
                }
                true
            }
            KeyCode::Char(c) => {
                self.search.insert(c);
                true
            }
            KeyCode::Backspace => {
                self.search.backspace();
                true
            }
            KeyCode::Delete => {
                self.search.delete();
                true
            }
            KeyCode::Left => {
                self.search.cursor_left();
                true
            }
            KeyCode::Right => {
                self.search.cursor_right();
                true
            }
            KeyCode::Home => {
                self.search.cursor_home();
                true
            }
            KeyCode::End => {
                self.search.cursor_end();
                true
            }
            _ => false,
        }
    }

    /// Handle keys in normal navigation mode
    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        // Global shortcuts
        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                return true;
            }
            KeyCode::Char('/') => {
                self.focus_search();
                return true;
            }
            KeyCode::Char('D') => {
                self.open_downloads();
                return true;
            }
            KeyCode::Esc => {
                return self.back();
            }
            _ => {}
        }

        // State-specific handling
        match &self.state {
            AppState::Home => self.handle_home_key(key),
            AppState::Login => false,
            AppState::Search => self.handle_search_key(key),
            AppState::Detail => self.handle_detail_key(key),
            AppState::Resources => self.handle_resources_key(key),
            AppState::Downloads => self.handle_downloads_key(key),
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('s') => {
                self.focus_search();
                true
            }
            KeyCode::Char('d') => {
                self.open_downloads();
                true
            }
            _ => false,
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.search.list.up();
                true
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.search.list.down();
                true
            }
            KeyCode::Enter | KeyCode::Char('i') => {
                // Open detail view for selected result
                if let Some(item) = self.search.selected_result() {
                    let tmdbid = item.id;
                    let media_type = if item.is_tv() { "TV" } else { "MOV" }.to_string();
                    self.detail.loading =
                        LoadingState::Loading(Some("Fetching details...".into()));
                    self.navigate(AppState::Detail);
                    self.queue_action(AppAction::LoadDetail { tmdbid, media_type });
                }
                true
            }
            KeyCode::Char('r') => {
                // Jump straight to resources for the selected title
                if let Some(item) = self.search.selected_result() {
                    let keyword = item.title.clone();
                    self.resources.begin_load(keyword.clone());
                    self.navigate(AppState::Resources);
                    self.queue_action(AppAction::LoadResources(keyword));
                }
                true
            }
            KeyCode::PageUp => {
                self.search.list.page_up(10);
                true
            }
            KeyCode::PageDown => {
                self.search.list.page_down(10);
                true
            }
            KeyCode::Home => {
                self.search.list.first();
                true
            }
            KeyCode::End => {
                self.search.list.last();
                true
            }
            _ => false,
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter | KeyCode::Char('r') => {
                // List torrent resources for this title
                let keyword = self.detail.detail.title.clone();
                if !keyword.is_empty() {
                    self.resources.begin_load(keyword.clone());
                    self.navigate(AppState::Resources);
                    self.queue_action(AppAction::LoadResources(keyword));
                }
                true
            }
            _ => false,
        }
    }

    fn handle_resources_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.resources.list.up();
                true
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.resources.list.down();
                true
            }
            KeyCode::PageUp => {
                self.resources.list.page_up(10);
                true
            }
            KeyCode::PageDown => {
                self.resources.list.page_down(10);
                true
            }
            KeyCode::Enter | KeyCode::Char('d') => {
                // Queue a download for the selected resource
                if let Some(resource) = self.resources.selected_resource() {
                    self.queue_action(AppAction::QueueDownload(resource.id));
                }
                true
            }
            _ => false,
        }
    }

    fn handle_downloads_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Tab => {
                self.downloads.toggle_panel();
                true
            }
            KeyCode::Up | KeyCode::Char('k') => {
                match self.downloads.panel {
                    DownloadsPanel::Queue => self.downloads.queue_list.up(),
                    DownloadsPanel::History => self.downloads.history_list.up(),
                }
                true
            }
            KeyCode::Down | KeyCode::Char('j') => {
                match self.downloads.panel {
                    DownloadsPanel::Queue => self.downloads.queue_list.down(),
                    DownloadsPanel::History => self.downloads.history_list.down(),
                }
                true
            }
            KeyCode::Char('p') => {
                // Pause, asserting the transition before the backend answers
                if self.downloads.panel == DownloadsPanel::Queue {
                    if let Some(task) = self.downloads.selected_task() {
                        if task.status.can_pause() {
                            let id = task.id.clone();
                            self.downloads.apply_optimistic(&id, DownloadStatus::Paused);
                            self.queue_action(AppAction::PauseDownload(id));
                        }
                    }
                }
                true
            }
            KeyCode::Char('r') => {
                // Resume a paused task
                if self.downloads.panel == DownloadsPanel::Queue {
                    if let Some(task) = self.downloads.selected_task() {
                        if task.status.can_resume() {
                            let id = task.id.clone();
                            self.downloads
                                .apply_optimistic(&id, DownloadStatus::Downloading);
                            self.queue_action(AppAction::ResumeDownload(id));
                        }
                    }
                }
                true
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                if self.downloads.panel == DownloadsPanel::Queue {
                    if let Some(task) = self.downloads.selected_task() {
                        let id = task.id.clone();
                        self.queue_action(AppAction::RemoveDownload(id));
                    }
                }
                true
            }
            KeyCode::Char('R') => {
                self.queue_action(AppAction::RefreshDownloads);
                true
            }
            KeyCode::Char('h') => {
                self.downloads.panel = DownloadsPanel::History;
                self.queue_action(AppAction::LoadHistory(1));
                true
            }
            _ => false,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let mut config = Config::default();
        config.auth_token = Some("tok".to_string());
        App::new(config)
    }

    fn task(id: &str, status: DownloadStatus) -> DownloadTask {
        DownloadTask {
            id: id.to_string(),
            name: format!("task {}", id),
            site: String::new(),
            progress: 0.0,
            speed: String::new(),
            status,
        }
    }

    fn resource(id: i64, name: &str, seeders: i64, respix: &str) -> TorrentResource {
        TorrentResource {
            id,
            torrent_name: name.to_string(),
            seeders,
            respix: respix.to_string(),
            ..Default::default()
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    // -------------------------------------------------------------------------
    // ListState Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_list_state_navigation() {
        let mut list = ListState::new(5);
        assert_eq!(list.selected, 0);

        list.down();
        assert_eq!(list.selected, 1);

        list.down();
        list.down();
        list.down();
        assert_eq!(list.selected, 4);

        // Can't go past end
        list.down();
        assert_eq!(list.selected, 4);

        list.up();
        assert_eq!(list.selected, 3);

        list.first();
        assert_eq!(list.selected, 0);

        list.last();
        assert_eq!(list.selected, 4);
    }

    #[test]
    fn test_list_state_set_len() {
        let mut list = ListState::new(10);
        list.selected = 8;

        // Shrinking should clamp selection
        list.set_len(5);
        assert_eq!(list.selected, 4);

        // Growing shouldn't change selection
        list.set_len(10);
        assert_eq!(list.selected, 4);
    }

    // -------------------------------------------------------------------------
    // Login Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_starts_on_login_without_session() {
        let app = App::new(Config::default());
        assert_eq!(app.state, AppState::Login);
        assert_eq!(app.input_mode, InputMode::Editing);
    }

    #[test]
    fn test_starts_on_home_with_session() {
        let app = app();
        assert_eq!(app.state, AppState::Home);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_login_form_submit() {
        let mut app = App::new(Config::default());

        app.handle_key(key(KeyCode::Char('m')));
        app.handle_key(key(KeyCode::Char('e')));
        app.handle_key(key(KeyCode::Enter)); // moves to password field
        assert_eq!(app.login.focus, LoginField::Password);

        app.handle_key(key(KeyCode::Char('p')));
        app.handle_key(key(KeyCode::Char('w')));
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(
            app.take_action(),
            Some(AppAction::Login {
                username: "me".to_string(),
                password: "pw".to_string(),
            })
        );
        assert!(app.login.loading.is_loading());
    }

    #[test]
    fn test_login_requires_both_fields() {
        let mut app = App::new(Config::default());
        app.login.next_field(); // focus password, leave username empty
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.take_action(), None);
    }

    #[test]
    fn test_login_success_lands_on_home() {
        let mut app = App::new(Config::default());
        app.login.password = "secret".to_string();

        app.handle_login_success("tok-123".to_string());
        assert_eq!(app.state, AppState::Home);
        assert_eq!(app.config.auth_token.as_deref(), Some("tok-123"));
        assert!(app.login.password.is_empty());
    }

    #[test]
    fn test_auth_expired_forces_login() {
        let mut app = app();
        app.navigate(AppState::Search);
        app.navigate(AppState::Downloads);

        app.handle_auth_expired();
        assert_eq!(app.state, AppState::Login);
        assert!(app.nav_stack.is_empty());
        assert!(!app.config.is_logged_in());
        assert!(app.error.is_some());
    }

    // -------------------------------------------------------------------------
    // App Navigation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_app_navigation() {
        let mut app = app();
        assert_eq!(app.state, AppState::Home);
        assert!(app.nav_stack.is_empty());

        app.navigate(AppState::Search);
        assert_eq!(app.state, AppState::Search);
        assert_eq!(app.nav_stack.len(), 1);

        app.navigate(AppState::Detail);
        assert_eq!(app.state, AppState::Detail);
        assert_eq!(app.nav_stack.len(), 2);

        assert!(app.back());
        assert_eq!(app.state, AppState::Search);

        assert!(app.back());
        assert_eq!(app.state, AppState::Home);

        // Can't go back from home
        assert!(!app.back());
        assert_eq!(app.state, AppState::Home);
    }

    #[test]
    fn test_app_focus_search() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('/')));
        assert_eq!(app.input_mode, InputMode::Editing);
        assert_eq!(app.state, AppState::Search);
    }

    #[test]
    fn test_search_submit_queues_action() {
        let mut app = app();
        app.focus_search();

        app.handle_key(key(KeyCode::Char('d')));
        app.handle_key(key(KeyCode::Char('u')));
        app.handle_key(key(KeyCode::Char('n')));
        app.handle_key(key(KeyCode::Char('e')));
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.take_action(), Some(AppAction::Search("dune".to_string())));
        assert!(app.search.loading.is_loading());
    }

    #[test]
    fn test_search_empty_submit_is_noop() {
        let mut app = app();
        app.focus_search();
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.take_action(), None);
    }

    #[test]
    fn test_search_select_opens_detail() {
        let mut app = app();
        app.navigate(AppState::Search);
        app.search.set_results(vec![SearchItem {
            id: 438631,
            title: "Dune".to_string(),
            year: Some("2021".to_string()),
            kind: "Movie".to_string(),
            media_type: "MOV".to_string(),
            vote: 7.8,
            image: String::new(),
            overview: String::new(),
            poster: String::new(),
        }]);

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Detail);
        assert_eq!(
            app.take_action(),
            Some(AppAction::LoadDetail {
                tmdbid: 438631,
                media_type: "MOV".to_string(),
            })
        );
    }

    // -------------------------------------------------------------------------
    // Resources Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_resources_pin_recommended_first() {
        let processed = rank::process_resources(
            &serde_json::from_value(serde_json::json!({
                "result": {
                    "MOV#1": {
                        "title": "Dune",
                        "torrent_dict": [[
                            "x",
                            {"cat": {"group_torrents": {"sub": {"torrent_list": [
                                {"id": 1, "torrent_name": "low", "seeders": 3, "respix": "720p"},
                                {"id": 2, "torrent_name": "best", "seeders": 40,
                                 "respix": "2160p", "releasegroup": "FRDS"},
                                {"id": 3, "torrent_name": "mid", "seeders": 12, "respix": "1080p"},
                            ]}}}}
                        ]],
                    }
                }
            }))
            .unwrap(),
        );

        let mut state = ResourcesState::default();
        state.set_resources(processed);

        assert!(state.has_resources);
        assert!(state.has_seeders);
        assert_eq!(state.items.len(), 3);
        assert_eq!(state.items[0].torrent_name, "best");
        assert!(state.is_recommended(0));
        assert!(!state.is_recommended(1));
    }

    #[test]
    fn test_resources_pin_can_be_a_hidden_dead_release() {
        let processed = rank::process_resources(
            &serde_json::from_value(serde_json::json!({
                "result": {
                    "MOV#1": {
                        "title": "Dune",
                        "torrent_dict": [[
                            "x",
                            {"cat": {"group_torrents": {"sub": {"torrent_list": [
                                {"id": 1, "torrent_name": "dead uhd", "seeders": 0,
                                 "respix": "2160p", "releasegroup": "FRDS"},
                                {"id": 2, "torrent_name": "seeded sd", "seeders": 5,
                                 "respix": "720p"},
                            ]}}}}
                        ]],
                    }
                }
            }))
            .unwrap(),
        );

        let mut state = ResourcesState::default();
        state.set_resources(processed);

        // The seeded listing drops the dead 4k release, but it still wins
        // the recommendation and gets prepended as the pinned row
        assert!(state.has_seeders);
        assert_eq!(state.items.len(), 2);
        assert_eq!(state.items[0].id, 1);
        assert_eq!(state.items[1].id, 2);
        assert!(state.is_recommended(0));
    }

    #[test]
    fn test_resources_download_action() {
        let mut app = app();
        app.navigate(AppState::Resources);
        app.resources.items = vec![resource(7, "pick me", 5, "1080p")];
        app.resources.list = ListState::new(1);

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.take_action(), Some(AppAction::QueueDownload(7)));
    }

    // -------------------------------------------------------------------------
    // Downloads Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_open_downloads_triggers_refresh() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('d')));
        assert_eq!(app.state, AppState::Downloads);
        assert!(app.downloads.opened);
        assert_eq!(app.take_action(), Some(AppAction::RefreshDownloads));
    }

    #[test]
    fn test_pause_applies_optimistic_status() {
        let mut app = app();
        app.navigate(AppState::Downloads);
        app.downloads
            .set_active(vec![task("dl-1", DownloadStatus::Downloading)]);

        app.handle_key(key(KeyCode::Char('p')));
        assert_eq!(app.downloads.tasks[0].status, DownloadStatus::Paused);
        assert_eq!(
            app.take_action(),
            Some(AppAction::PauseDownload("dl-1".to_string()))
        );
    }

    #[test]
    fn test_pause_ignored_when_not_pausable() {
        let mut app = app();
        app.navigate(AppState::Downloads);
        app.downloads
            .set_active(vec![task("dl-1", DownloadStatus::Paused)]);

        app.handle_key(key(KeyCode::Char('p')));
        assert_eq!(app.downloads.tasks[0].status, DownloadStatus::Paused);
        assert_eq!(app.take_action(), None);
    }

    #[test]
    fn test_optimistic_revert() {
        let mut downloads = DownloadsState::default();
        downloads.set_active(vec![task("dl-1", DownloadStatus::Downloading)]);

        downloads.apply_optimistic("dl-1", DownloadStatus::Paused);
        assert_eq!(downloads.tasks[0].status, DownloadStatus::Paused);

        downloads.revert_optimistic();
        assert_eq!(downloads.tasks[0].status, DownloadStatus::Downloading);

        // A second revert is a no-op
        downloads.revert_optimistic();
        assert_eq!(downloads.tasks[0].status, DownloadStatus::Downloading);
    }

    #[test]
    fn test_optimistic_commit_drops_revert_handle() {
        let mut downloads = DownloadsState::default();
        downloads.set_active(vec![task("dl-1", DownloadStatus::Downloading)]);

        downloads.apply_optimistic("dl-1", DownloadStatus::Paused);
        downloads.commit_optimistic();
        downloads.revert_optimistic();
        assert_eq!(downloads.tasks[0].status, DownloadStatus::Paused);
    }

    #[test]
    fn test_set_active_replaces_whole_collection() {
        let mut downloads = DownloadsState::default();
        downloads.set_active(vec![
            task("a", DownloadStatus::Downloading),
            task("b", DownloadStatus::Paused),
        ]);
        downloads.apply_optimistic("a", DownloadStatus::Paused);

        downloads.set_active(vec![task("c", DownloadStatus::Downloading)]);
        assert_eq!(downloads.tasks.len(), 1);
        assert_eq!(downloads.tasks[0].id, "c");

        // Optimistic bookkeeping does not survive a snapshot replace
        downloads.revert_optimistic();
        assert_eq!(downloads.tasks[0].status, DownloadStatus::Downloading);
    }

    #[test]
    fn test_should_poll_requires_open_and_active() {
        let mut downloads = DownloadsState::default();
        let now = Instant::now();
        let interval = Duration::from_secs(3);

        // Not opened yet
        downloads.set_active(vec![task("a", DownloadStatus::Downloading)]);
        assert!(!downloads.should_poll(now, interval));

        downloads.opened = true;
        assert!(downloads.should_poll(now, interval));

        downloads.mark_polled(now);
        assert!(!downloads.should_poll(now, interval));
        assert!(downloads.should_poll(now + interval, interval));

        // Nothing active disarms the poll
        downloads.set_active(vec![task("a", DownloadStatus::Completed)]);
        assert!(!downloads.should_poll(now + interval * 2, interval));
    }

    #[test]
    fn test_quit_keys() {
        let mut with_q = app();
        assert!(with_q.running);
        with_q.handle_key(key(KeyCode::Char('q')));
        assert!(!with_q.running);

        let mut with_ctrl_c = app();
        with_ctrl_c.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!with_ctrl_c.running);
    }
}
