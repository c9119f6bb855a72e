use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::catalog::ScopeCatalog;
use crate::keys::{KeyCode, KeyOutcome, KeyPress};
use crate::menu::{Menu, MenuAction};
use crate::options::{OptionFilter, OptionItem, OptionKind, ALL_OPTION_ID};
use crate::parse::{self, ParsedState, SkipFlags};
use crate::prefs::{KvStore, GROUP_KEY, SORT_KEY};
use crate::provider::{
    LaunchAction, LaunchOutcome, PaletteHost, SearchApiResult, SearchProvider, SearchRequest,
    SearchResponse, SearchableScope,
};
use crate::results::{self, DisplayView, GroupMode, SortMode};

/// Delay between the last keystroke and the search request.
pub const DEBOUNCE: Duration = Duration::from_millis(150);

/// Completions sent by background tasks. The host event loop receives these
/// from the channel returned by [`PaletteEngine::new`] and pumps each one into
/// [`PaletteEngine::on_background`], then re-renders.
#[derive(Debug)]
pub enum BackgroundMsg {
    ScopesLoaded {
        session: u64,
        scopes: anyhow::Result<Vec<SearchableScope>>,
    },
    DebounceElapsed {
        session: u64,
        token: u64,
    },
    SearchDone {
        session: u64,
        token: u64,
        response: anyhow::Result<SearchResponse>,
    },
}

/// The command-palette query engine. Owns all mutable palette state
/// exclusively; background tasks never touch it and instead report back
/// through the message channel. One instance per open palette.
pub struct PaletteEngine {
    provider: Arc<dyn SearchProvider>,
    host: Arc<dyn PaletteHost>,
    store: Arc<dyn KvStore>,
    tx: UnboundedSender<BackgroundMsg>,

    open: bool,
    /// Bumped on every open and close so stale task completions are dropped.
    session: u64,

    input: String,
    state: ParsedState,
    skips: SkipFlags,
    catalog: ScopeCatalog,
    filter: OptionFilter,
    /// Focus cursor into the visible list: options in picker modes, ordered
    /// results in search modes.
    focus: usize,
    menu: Option<Menu>,

    sort: SortMode,
    group: GroupMode,

    results: Vec<SearchApiResult>,
    display: DisplayView,
    loading: bool,
    last_timing_ms: Option<u64>,

    /// Monotone request token; only the most recently issued request may
    /// mutate visible state.
    issued: u64,
    /// Identity key of the last scheduled request, to suppress redundant
    /// re-fetches on idempotent re-derivations.
    last_key: Option<String>,
    /// Request captured at schedule time, consumed when the debounce fires.
    pending_request: Option<SearchRequest>,
}

impl PaletteEngine {
    pub fn new(
        provider: Arc<dyn SearchProvider>,
        host: Arc<dyn PaletteHost>,
        store: Arc<dyn KvStore>,
    ) -> (Self, UnboundedReceiver<BackgroundMsg>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut engine = Self {
            provider,
            host,
            store,
            tx,
            open: false,
            session: 0,
            input: String::new(),
            state: ParsedState::Idle,
            skips: SkipFlags::default(),
            catalog: ScopeCatalog::default(),
            filter: OptionFilter::new(),
            focus: 0,
            menu: None,
            sort: SortMode::default(),
            group: GroupMode::default(),
            results: Vec::new(),
            display: DisplayView::default(),
            loading: false,
            last_timing_ms: None,
            issued: 0,
            last_key: None,
            pending_request: None,
        };
        engine.load_prefs();
        (engine, rx)
    }

    /// Reset to a fresh session and kick off the scope fetch. Requires a
    /// tokio runtime.
    pub fn open(&mut self) {
        self.session += 1;
        self.issued += 1;
        self.open = true;
        self.input.clear();
        self.state = ParsedState::Idle;
        self.skips = SkipFlags::default();
        self.catalog = ScopeCatalog::default();
        self.focus = 0;
        self.menu = None;
        self.clear_results();
        self.last_key = None;
        self.last_timing_ms = None;
        self.load_prefs();
        self.spawn_scope_fetch();
    }

    /// Tear the session down. In-flight fetches and timers become stale and
    /// their completions are dropped.
    pub fn close(&mut self) {
        self.session += 1;
        self.issued += 1;
        self.open = false;
        self.input.clear();
        self.state = ParsedState::Idle;
        self.skips = SkipFlags::default();
        self.menu = None;
        self.clear_results();
        self.last_key = None;
    }

    /// Feed the current input text, re-deriving mode and search schedule.
    /// Called by the host on every edit.
    pub fn set_input(&mut self, text: &str) {
        if !self.open || text == self.input {
            return;
        }
        self.input = text.to_string();
        self.reparse();
    }

    /// Apply a background completion. Stale sessions and superseded request
    /// tokens are silently dropped.
    pub fn on_background(&mut self, msg: BackgroundMsg) {
        match msg {
            BackgroundMsg::ScopesLoaded { session, scopes } => {
                if session != self.session || !self.open {
                    return;
                }
                match scopes {
                    Ok(scopes) => {
                        tracing::debug!(count = scopes.len(), "scope catalog loaded");
                        self.catalog = ScopeCatalog::new(scopes);
                        self.reparse();
                    }
                    Err(err) => {
                        tracing::warn!("failed to load searchable scopes: {err:#}");
                        self.host.status("Search sources are unavailable");
                    }
                }
            }
            BackgroundMsg::DebounceElapsed { session, token } => {
                if session != self.session || token != self.issued {
                    return;
                }
                let Some(request) = self.pending_request.take() else {
                    return;
                };
                let provider = self.provider.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let response = provider.fetch_results(request).await;
                    let _ = tx.send(BackgroundMsg::SearchDone {
                        session,
                        token,
                        response,
                    });
                });
            }
            BackgroundMsg::SearchDone {
                session,
                token,
                response,
            } => {
                if session != self.session || token != self.issued {
                    return;
                }
                self.loading = false;
                match response {
                    Ok(response) => {
                        self.last_timing_ms = response.timing_ms;
                        self.results = response.results;
                        self.display = results::organize(&self.results, self.sort, self.group);
                        self.focus = 0;
                    }
                    Err(err) => {
                        tracing::warn!("search failed: {err:#}");
                        self.results.clear();
                        self.display = DisplayView::default();
                        self.host.status("Search failed");
                    }
                }
            }
        }
    }

    /// Route a key press. Precedence: open menu, then the mode-specific
    /// binding; anything unbound returns [`KeyOutcome::Ignored`] for the text
    /// field.
    pub fn handle_key(&mut self, key: KeyPress) -> KeyOutcome {
        if !self.open {
            return KeyOutcome::Ignored;
        }
        if self.menu.is_some() {
            return self.handle_menu_key(key);
        }
        match key.code {
            KeyCode::Escape => KeyOutcome::CloseRequested,
            KeyCode::Up => {
                self.move_focus(-1);
                KeyOutcome::Handled
            }
            KeyCode::Down => {
                self.move_focus(1);
                KeyOutcome::Handled
            }
            KeyCode::Right => self.open_action_menu(),
            KeyCode::Enter => self.confirm(key.shift),
            KeyCode::Backspace => self.step_back(key.caret_at_end),
        }
    }

    /// Open the contextual action menu for the focused result. Also bound to
    /// ArrowRight in search modes.
    pub fn open_action_menu(&mut self) -> KeyOutcome {
        if !self.state.is_searchable() || self.focused_result().is_none() {
            return KeyOutcome::Ignored;
        }
        self.menu = Some(Menu::actions(self.host.selected_panel_id().is_some()));
        KeyOutcome::Handled
    }

    /// Open the sort/group settings menu. Bound to a toolbar affordance on
    /// the host side.
    pub fn open_sort_menu(&mut self) {
        self.menu = Some(Menu::settings(self.sort, self.group));
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        self.sort = sort;
        self.store.set(SORT_KEY, sort.as_str());
        self.reorganize();
    }

    pub fn set_group(&mut self, group: GroupMode) {
        self.group = group;
        self.store.set(GROUP_KEY, group.as_str());
        self.reorganize();
    }

    // Render accessors.

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn state(&self) -> &ParsedState {
        &self.state
    }

    pub fn skip_flags(&self) -> SkipFlags {
        self.skips
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_timing_ms(&self) -> Option<u64> {
        self.last_timing_ms
    }

    pub fn sort(&self) -> SortMode {
        self.sort
    }

    pub fn group(&self) -> GroupMode {
        self.group
    }

    pub fn menu(&self) -> Option<&Menu> {
        self.menu.as_ref()
    }

    pub fn results(&self) -> &[SearchApiResult] {
        &self.results
    }

    pub fn display(&self) -> &DisplayView {
        &self.display
    }

    /// The result at a display ordinal, as referenced by
    /// [`crate::results::DisplayEntry::Result`].
    pub fn result_at(&self, ordinal: usize) -> Option<&SearchApiResult> {
        self.results.get(*self.display.ordered.get(ordinal)?)
    }

    /// Focus index, clamped to the visible list on every read.
    pub fn focus(&self) -> usize {
        let len = self.visible_len();
        if len == 0 {
            0
        } else {
            self.focus.min(len - 1)
        }
    }

    /// The suggestion rows for the current picker mode, filtered by the
    /// partial token. Empty in search modes.
    pub fn options(&self) -> Vec<OptionItem> {
        match &self.state {
            ParsedState::Idle => self.filter.command_options(""),
            ParsedState::Command { query } => self.filter.command_options(query),
            ParsedState::Profile { query } => self.filter.profile_options(&self.catalog, query),
            ParsedState::Scope { profile, query } => {
                self.filter.scope_options(&self.catalog, profile, query)
            }
            _ => Vec::new(),
        }
    }

    pub fn icon_for(&self, result: &SearchApiResult) -> Option<String> {
        self.host.resolve_icon(result)
    }

    pub fn is_mobile_viewport(&self) -> bool {
        self.host.is_mobile_viewport()
    }

    // Internals.

    fn load_prefs(&mut self) {
        self.sort = self
            .store
            .get(SORT_KEY)
            .and_then(|v| SortMode::parse(&v))
            .unwrap_or_default();
        self.group = self
            .store
            .get(GROUP_KEY)
            .and_then(|v| GroupMode::parse(&v))
            .unwrap_or_default();
    }

    fn spawn_scope_fetch(&self) {
        let provider = self.provider.clone();
        let tx = self.tx.clone();
        let session = self.session;
        tokio::spawn(async move {
            let scopes = provider.fetch_scopes().await;
            let _ = tx.send(BackgroundMsg::ScopesLoaded { session, scopes });
        });
    }

    fn reparse(&mut self) {
        let next = parse::parse(&self.input, &self.catalog, self.skips);
        if !next.same_mode(&self.state) {
            self.focus = 0;
        }
        self.state = next;
        self.schedule();
    }

    /// Re-derive the search schedule from the current mode. Idempotent for an
    /// unchanged identity key.
    fn schedule(&mut self) {
        let Some(key) = self.state.identity_key() else {
            // Left the searchable modes; drop whatever was in flight.
            if self.last_key.is_some() || self.loading || !self.results.is_empty() {
                self.issued += 1;
                self.last_key = None;
                self.clear_results();
            }
            return;
        };
        if self.last_key.as_deref() == Some(key.as_str()) {
            return;
        }
        self.last_key = Some(key);
        self.issued += 1;
        let token = self.issued;

        let Some(request) = self.request_for_state() else {
            // Fully empty and unscoped; nothing to browse.
            self.clear_results();
            return;
        };
        self.loading = true;
        self.pending_request = Some(request);
        let tx = self.tx.clone();
        let session = self.session;
        tokio::spawn(async move {
            tokio::time::sleep(DEBOUNCE).await;
            let _ = tx.send(BackgroundMsg::DebounceElapsed { session, token });
        });
    }

    /// An empty query may run as a browse request only when a profile or
    /// scope is confirmed.
    fn request_for_state(&self) -> Option<SearchRequest> {
        match &self.state {
            ParsedState::Query {
                profile,
                scope,
                query,
            } => {
                if query.is_empty() && profile.is_none() && scope.is_none() {
                    return None;
                }
                Some(SearchRequest {
                    query: query.clone(),
                    profiles: profile.clone().map(|p| vec![p]),
                    plugin: scope.clone(),
                })
            }
            ParsedState::Global { query } => {
                if query.is_empty() {
                    return None;
                }
                Some(SearchRequest {
                    query: query.clone(),
                    profiles: None,
                    plugin: None,
                })
            }
            _ => None,
        }
    }

    fn clear_results(&mut self) {
        self.results.clear();
        self.display = DisplayView::default();
        self.loading = false;
        self.pending_request = None;
        self.focus = 0;
    }

    fn reorganize(&mut self) {
        self.display = results::organize(&self.results, self.sort, self.group);
    }

    fn visible_len(&self) -> usize {
        if self.state.is_searchable() {
            self.display.ordered.len()
        } else {
            self.options().len()
        }
    }

    fn move_focus(&mut self, delta: isize) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        let len = len as isize;
        let current = (self.focus as isize).min(len - 1);
        self.focus = (current + delta).rem_euclid(len) as usize;
    }

    fn handle_menu_key(&mut self, key: KeyPress) -> KeyOutcome {
        match key.code {
            KeyCode::Escape => {
                self.menu = None;
                KeyOutcome::Handled
            }
            KeyCode::Up => {
                if let Some(menu) = self.menu.as_mut() {
                    menu.move_focus(-1);
                }
                KeyOutcome::Handled
            }
            KeyCode::Down => {
                if let Some(menu) = self.menu.as_mut() {
                    menu.move_focus(1);
                }
                KeyOutcome::Handled
            }
            KeyCode::Enter => self.select_menu_entry(),
            // The menu captures the remaining bound keys so the text field
            // underneath does not edit while it is up.
            KeyCode::Right | KeyCode::Backspace => KeyOutcome::Handled,
        }
    }

    fn select_menu_entry(&mut self) -> KeyOutcome {
        let Some(entry) = self.menu.as_ref().and_then(Menu::focused) else {
            return KeyOutcome::Handled;
        };
        if entry.disabled {
            return KeyOutcome::Handled;
        }
        let action = entry.action;
        self.menu = None;
        match action {
            MenuAction::SetSort(sort) => {
                self.set_sort(sort);
                KeyOutcome::Handled
            }
            MenuAction::SetGroup(group) => {
                self.set_group(group);
                KeyOutcome::Handled
            }
            MenuAction::Launch(action) => self.launch_focused(action),
        }
    }

    fn confirm(&mut self, shift: bool) -> KeyOutcome {
        if self.state.is_searchable() {
            let action = if shift {
                LaunchAction::Replace
            } else {
                LaunchAction::Modal
            };
            return self.launch_focused(action);
        }
        let options = self.options();
        if options.is_empty() {
            return KeyOutcome::Handled;
        }
        let option = options[self.focus.min(options.len() - 1)].clone();
        self.apply_option(&option)
    }

    /// Confirm a picker option by rewriting the input to the next confirmed
    /// prefix. Choosing "All" records the skip flag for this session.
    fn apply_option(&mut self, option: &OptionItem) -> KeyOutcome {
        let next = match option.kind {
            OptionKind::Command => match option.id.as_str() {
                "search" => "/search ".to_string(),
                "pinned" => "/pinned".to_string(),
                _ => return KeyOutcome::Handled,
            },
            OptionKind::Profile => {
                if option.id == ALL_OPTION_ID {
                    self.skips.profile = true;
                    "/search ".to_string()
                } else {
                    format!("/search {} ", option.id)
                }
            }
            OptionKind::Scope => {
                let ParsedState::Scope { profile, .. } = &self.state else {
                    return KeyOutcome::Handled;
                };
                if option.id == ALL_OPTION_ID {
                    let profile = profile.clone();
                    self.skips.scope = true;
                    format!("/search {profile} ")
                } else {
                    format!("/search {} {} ", profile, option.id)
                }
            }
        };
        self.input = next.clone();
        self.reparse();
        KeyOutcome::SetInput(next)
    }

    fn launch_focused(&mut self, action: LaunchAction) -> KeyOutcome {
        let Some(result) = self.focused_result().cloned() else {
            return KeyOutcome::Handled;
        };
        if action == LaunchAction::Replace && self.host.selected_panel_id().is_none() {
            // Nothing to replace.
            return KeyOutcome::Handled;
        }
        match self.host.launch(&result, action) {
            LaunchOutcome::KeepOpen => KeyOutcome::Handled,
            LaunchOutcome::Close => KeyOutcome::CloseRequested,
        }
    }

    fn focused_result(&self) -> Option<&SearchApiResult> {
        if self.display.ordered.is_empty() {
            return None;
        }
        let ordinal = self.focus.min(self.display.ordered.len() - 1);
        self.result_at(ordinal)
    }

    /// Step a picker chain backward: at the boundary (caret at end, empty
    /// trailing segment) the input is rewritten to the previous confirmed
    /// prefix and the relevant skip flag cleared. The only way to reopen a
    /// picker after confirmation.
    fn step_back(&mut self, caret_at_end: bool) -> KeyOutcome {
        if !caret_at_end {
            return KeyOutcome::Ignored;
        }
        let next = match &self.state {
            ParsedState::Query {
                profile,
                scope,
                query,
            } if query.is_empty() => match (profile, scope) {
                (Some(profile), Some(_)) => format!("/search {profile} "),
                (Some(profile), None) => {
                    let rewritten = format!("/search {profile} ");
                    self.skips.scope = false;
                    rewritten
                }
                (None, _) => {
                    self.skips.profile = false;
                    "/search ".to_string()
                }
            },
            ParsedState::Scope { query, .. } if query.is_empty() => "/search ".to_string(),
            ParsedState::Profile { query } if query.is_empty() => "/search".to_string(),
            _ => return KeyOutcome::Ignored,
        };
        self.input = next.clone();
        self.reparse();
        KeyOutcome::SetInput(next)
    }
}
