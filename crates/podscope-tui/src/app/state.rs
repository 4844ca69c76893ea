use std::time::{Duration, Instant};

use ratatui::widgets::{ListState, TableState};
use tokio::sync::mpsc;

use podscope_api::ApiError;
use podscope_describe::format_pod_description;
use podscope_types::{ALL_CONTEXTS, PodDescription, PodRef, PodSummary};

use super::{Action, Panel, PodFilter, RequestTracker, Ticket};
use crate::config::ContextStore;

/// Lines moved by PageUp / PageDown in the viewer
const PAGE_LINES: usize = 20;

/// Screen enumeration
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    ContextSelect,
    PodList,
}

/// Outcome of applying a fetch result to the state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    /// The result was rendered (successfully or as an error)
    Applied,
    /// A newer request for the same panel exists; the result was dropped
    Stale,
    /// The backend rejected the credentials; the session must be reloaded
    Unauthorized,
}

/// An entry of the context list
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextChoice {
    /// Value sent to the backend
    pub value: String,
    pub label: String,
}

impl ContextChoice {
    pub fn all() -> Self {
        Self {
            value: ALL_CONTEXTS.to_string(),
            label: "All contexts".to_string(),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            value: name.clone(),
            label: name,
        }
    }

    /// "All contexts" followed by the backend's contexts in order
    pub fn from_names(names: Vec<String>) -> Vec<Self> {
        std::iter::once(Self::all())
            .chain(names.into_iter().map(Self::named))
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewerKind {
    Logs,
    Describe,
}

impl ViewerKind {
    pub fn panel(&self) -> Panel {
        match self {
            Self::Logs => Panel::Logs,
            Self::Describe => Panel::Describe,
        }
    }
}

/// Overlay showing the logs or the description of one pod
#[derive(Clone, Debug)]
pub struct Viewer {
    pub kind: ViewerKind,
    pub pod: PodRef,
    pub title: String,
    pub content: String,
    /// First visible line; clamped by the renderer
    pub scroll: usize,
    /// Keep the last line in view
    pub follow: bool,
}

impl Viewer {
    pub fn logs(pod: PodRef) -> Self {
        Self {
            kind: ViewerKind::Logs,
            title: format!("Logs for {} ({})", pod.pod, pod.namespace),
            content: Panel::Logs.loading_message().to_string(),
            pod,
            scroll: 0,
            follow: false,
        }
    }

    pub fn describe(pod: PodRef) -> Self {
        Self {
            kind: ViewerKind::Describe,
            title: format!("Details for {} ({})", pod.pod, pod.namespace),
            content: Panel::Describe.loading_message().to_string(),
            pod,
            scroll: 0,
            follow: false,
        }
    }

    /// Replace the content and start at the top
    fn show(&mut self, content: String) {
        self.content = content;
        self.scroll = 0;
        self.follow = false;
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.follow = false;
        self.scroll = self.scroll.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.follow = false;
        // Don't cap here - the renderer clamps to the last page
        self.scroll = self.scroll.saturating_add(n);
    }

    pub fn page_up(&mut self) {
        self.scroll_up(PAGE_LINES);
    }

    pub fn page_down(&mut self) {
        self.scroll_down(PAGE_LINES);
    }

    pub fn scroll_to_top(&mut self) {
        self.follow = false;
        self.scroll = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.follow = true;
        self.scroll = usize::MAX;
    }
}

/// Transient message in the status bar
#[derive(Clone, Debug)]
pub struct Flash {
    pub text: String,
    pub expires_at: Instant,
}

/// UI-specific transient state
#[derive(Default)]
pub struct UiState {
    /// Is help overlay visible?
    pub help_visible: bool,

    /// Selection in the context list
    pub list_state: ListState,

    /// Selection in the pod table
    pub table_state: TableState,

    /// Error message to display (if any)
    pub error_message: Option<String>,

    /// Short-lived confirmation such as "Copied!"
    pub flash: Option<Flash>,

    /// Is search/filter bar active?
    pub search_active: bool,

    /// Current search input text
    pub search_input: String,

    /// Currently active pod filter (None = show all)
    pub active_filter: Option<PodFilter>,

    /// Filter input error message (e.g., invalid regex)
    pub filter_error: Option<String>,
}

impl UiState {
    fn new() -> Self {
        let mut ui_state = Self::default();
        ui_state.list_state.select(Some(0));
        ui_state.table_state.select(Some(0));
        ui_state
    }
}

/// Global application state
pub struct AppState {
    /// Current screen being displayed
    pub current_screen: Screen,

    /// Navigation stack for back navigation
    pub screen_stack: Vec<Screen>,

    /// Context list, empty until loaded
    pub contexts: Vec<ContextChoice>,

    /// Shown instead of the context list when loading failed
    pub contexts_error: Option<String>,

    /// Context whose pods are listed
    pub selected_context: Option<String>,

    pub pods: Vec<PodSummary>,

    /// Shown instead of the pod table when loading failed
    pub pods_error: Option<String>,

    /// Logs or describe overlay
    pub viewer: Option<Viewer>,

    /// In-flight requests per panel
    pub requests: RequestTracker,

    /// UI state
    pub ui_state: UiState,

    /// Persisted context selection
    pub store: ContextStore,

    /// Whether app should quit
    pub should_quit: bool,

    /// Channel sender for async actions
    pub action_tx: mpsc::UnboundedSender<Action>,

    flash_duration: Duration,
}

impl AppState {
    pub fn new(
        action_tx: mpsc::UnboundedSender<Action>,
        store: ContextStore,
        flash_duration: Duration,
    ) -> Self {
        Self {
            current_screen: Screen::ContextSelect,
            screen_stack: Vec::new(),
            contexts: Vec::new(),
            contexts_error: None,
            selected_context: None,
            pods: Vec::new(),
            pods_error: None,
            viewer: None,
            requests: RequestTracker::new(),
            ui_state: UiState::new(),
            store,
            should_quit: false,
            action_tx,
            flash_duration,
        }
    }

    /// Back to the state right after startup, keeping the store and channels.
    ///
    /// Every in-flight request is abandoned.
    pub fn reset_for_reload(&mut self) {
        tracing::info!("Reloading session");
        self.current_screen = Screen::ContextSelect;
        self.screen_stack.clear();
        self.contexts.clear();
        self.contexts_error = None;
        self.selected_context = None;
        self.pods.clear();
        self.pods_error = None;
        self.viewer = None;
        self.requests.reset();
        self.ui_state = UiState::new();
    }

    // ------------------------------------------------------------------
    // Contexts
    // ------------------------------------------------------------------

    pub fn begin_contexts_load(&mut self) -> Ticket {
        self.contexts_error = None;
        self.requests.begin(Panel::Contexts)
    }

    pub fn apply_contexts(&mut self, ticket: Ticket, result: Result<Vec<String>, ApiError>) -> Completion {
        if !self.requests.finish(ticket) {
            return Completion::Stale;
        }

        match result {
            Ok(names) => {
                tracing::debug!(count = names.len(), "Loaded contexts");
                self.contexts = ContextChoice::from_names(names);
                self.ui_state.list_state.select(Some(0));
            }
            Err(e) => {
                // Reloading would only repeat this request
                if e.is_unauthorized() {
                    self.show_error(
                        "The backend rejected the configured credentials".to_string(),
                    );
                }
                tracing::error!("Error loading contexts: {}", e);
                self.contexts.clear();
                self.contexts_error = Some("Error loading contexts".to_string());
            }
        }
        Completion::Applied
    }

    /// Select the preferred context, or the saved one, once contexts are loaded.
    ///
    /// A context that is not among the choices is ignored.
    pub fn restore_context(&mut self, preferred: Option<&str>) -> Option<(Ticket, String)> {
        let candidate = preferred.map(str::to_string).or_else(|| self.store.load())?;

        if !self.contexts.iter().any(|c| c.value == candidate) {
            tracing::warn!(context = %candidate, "Context not offered by the backend, ignoring");
            return None;
        }

        self.select_context(candidate)
    }

    /// Make `context` the current one, persist it and start loading its pods
    pub fn select_context(&mut self, context: String) -> Option<(Ticket, String)> {
        if context.is_empty() {
            return None;
        }

        self.store.save(&context);
        if let Some(index) = self.contexts.iter().position(|c| c.value == context) {
            self.ui_state.list_state.select(Some(index));
        }
        self.selected_context = Some(context);
        self.pods.clear();
        self.clear_filter();

        if self.current_screen != Screen::PodList {
            self.navigate_to(Screen::PodList);
        }
        self.ui_state.table_state.select(Some(0));
        self.begin_pods_load()
    }

    /// Forget the current and the saved context
    pub fn clear_context(&mut self) {
        self.store.clear();
        self.selected_context = None;
        self.pods.clear();
        self.pods_error = None;
        self.requests.cancel(Panel::Pods);
        self.clear_filter();

        if self.current_screen == Screen::PodList {
            self.screen_stack.clear();
            self.current_screen = Screen::ContextSelect;
        }
        self.flash("Saved context cleared");
    }

    /// Value to put on the clipboard for "copy context"
    pub fn context_to_copy(&self) -> Option<String> {
        match self.current_screen {
            Screen::PodList => self.selected_context.clone(),
            Screen::ContextSelect => self
                .ui_state
                .list_state
                .selected()
                .and_then(|i| self.contexts.get(i))
                .map(|c| c.value.clone()),
        }
    }

    // ------------------------------------------------------------------
    // Pods
    // ------------------------------------------------------------------

    /// Start (re)loading the pods of the selected context
    pub fn begin_pods_load(&mut self) -> Option<(Ticket, String)> {
        let context = self.selected_context.clone()?;
        self.pods_error = None;
        Some((self.requests.begin(Panel::Pods), context))
    }

    pub fn apply_pods(&mut self, ticket: Ticket, result: Result<Vec<PodSummary>, ApiError>) -> Completion {
        if !self.requests.finish(ticket) {
            return Completion::Stale;
        }

        match result {
            Ok(pods) => {
                self.pods = pods;
                self.clamp_table_selection();
            }
            Err(ApiError::Unauthorized) => return Completion::Unauthorized,
            Err(e) => {
                tracing::error!("Error loading pods: {}", e);
                self.pods.clear();
                self.pods_error = Some("Error loading pods".to_string());
            }
        }
        Completion::Applied
    }

    /// Whether the pod table has a Context column
    pub fn shows_all_contexts(&self) -> bool {
        self.selected_context.as_deref() == Some(ALL_CONTEXTS)
    }

    /// Pods passing the active filter, in backend order
    pub fn visible_pods(&self) -> Vec<&PodSummary> {
        match &self.ui_state.active_filter {
            Some(filter) => self.pods.iter().filter(|p| filter.matches(p)).collect(),
            None => self.pods.iter().collect(),
        }
    }

    pub fn selected_pod(&self) -> Option<&PodSummary> {
        let index = self.ui_state.table_state.selected()?;
        self.visible_pods().get(index).copied()
    }

    fn clamp_table_selection(&mut self) {
        let len = self.visible_pods().len();
        let selected = self.ui_state.table_state.selected().unwrap_or(0);
        self.ui_state
            .table_state
            .select(Some(selected.min(len.saturating_sub(1))));
    }

    // ------------------------------------------------------------------
    // Viewer
    // ------------------------------------------------------------------

    /// Open the logs viewer for the selected pod
    pub fn open_logs(&mut self) -> Option<(Ticket, PodRef)> {
        let pod = self.selected_pod()?.pod_ref();
        Some(self.open_viewer(Viewer::logs(pod)))
    }

    /// Open the describe viewer for the selected pod
    pub fn open_describe(&mut self) -> Option<(Ticket, PodRef)> {
        let pod = self.selected_pod()?.pod_ref();
        Some(self.open_viewer(Viewer::describe(pod)))
    }

    fn open_viewer(&mut self, viewer: Viewer) -> (Ticket, PodRef) {
        // Only one viewer at a time
        self.requests.cancel(Panel::Logs);
        self.requests.cancel(Panel::Describe);

        let ticket = self.requests.begin(viewer.kind.panel());
        let pod = viewer.pod.clone();
        self.viewer = Some(viewer);
        (ticket, pod)
    }

    pub fn apply_logs(&mut self, ticket: Ticket, result: Result<String, ApiError>) -> Completion {
        let Some(viewer) = self.current_viewer(ticket, ViewerKind::Logs) else {
            return Completion::Stale;
        };

        match result {
            Ok(logs) => {
                viewer.show(logs);
                viewer.scroll_to_bottom();
            }
            Err(ApiError::Unauthorized) => return Completion::Unauthorized,
            Err(ApiError::Backend(msg)) => viewer.show(format!("Error: {}", msg)),
            Err(e) => {
                tracing::error!(pod = %viewer.pod, "Error loading logs: {}", e);
                viewer.show("Error loading logs".to_string());
            }
        }
        Completion::Applied
    }

    pub fn apply_describe(
        &mut self,
        ticket: Ticket,
        result: Result<PodDescription, ApiError>,
    ) -> Completion {
        let Some(viewer) = self.current_viewer(ticket, ViewerKind::Describe) else {
            return Completion::Stale;
        };

        match result {
            Ok(details) => viewer.show(format_pod_description(&details)),
            Err(ApiError::Unauthorized) => return Completion::Unauthorized,
            Err(ApiError::Backend(msg)) => viewer.show(format!("Error: {}", msg)),
            Err(e) => {
                tracing::error!(pod = %viewer.pod, "Error loading pod details: {}", e);
                viewer.show("Error loading pod details".to_string());
            }
        }
        Completion::Applied
    }

    /// The open viewer, if `ticket` is still the one it is waiting for
    fn current_viewer(&mut self, ticket: Ticket, kind: ViewerKind) -> Option<&mut Viewer> {
        if !self.requests.finish(ticket) {
            return None;
        }
        self.viewer.as_mut().filter(|v| v.kind == kind)
    }

    /// Close the viewer; a response still in flight for it is dropped
    pub fn close_viewer(&mut self) {
        if let Some(viewer) = self.viewer.take() {
            self.requests.cancel(viewer.kind.panel());
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Navigate to a new screen, pushing current to stack
    pub fn navigate_to(&mut self, screen: Screen) {
        self.screen_stack.push(self.current_screen.clone());
        self.current_screen = screen;
    }

    /// Go back to previous screen
    pub fn go_back(&mut self) -> bool {
        if let Some(prev_screen) = self.screen_stack.pop() {
            self.current_screen = prev_screen;
            true
        } else {
            false
        }
    }

    /// Get the current list length based on screen
    pub fn current_list_len(&self) -> usize {
        match self.current_screen {
            Screen::ContextSelect => self.contexts.len(),
            Screen::PodList => self.visible_pods().len(),
        }
    }

    fn current_selection(&self) -> Option<usize> {
        match self.current_screen {
            Screen::ContextSelect => self.ui_state.list_state.selected(),
            Screen::PodList => self.ui_state.table_state.selected(),
        }
    }

    fn select(&mut self, index: usize) {
        match self.current_screen {
            Screen::ContextSelect => self.ui_state.list_state.select(Some(index)),
            Screen::PodList => self.ui_state.table_state.select(Some(index)),
        }
    }

    /// Move selection up
    pub fn list_up(&mut self) {
        let len = self.current_list_len();
        if len == 0 {
            return;
        }

        let i = match self.current_selection() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.select(i);
    }

    /// Move selection down
    pub fn list_down(&mut self) {
        let len = self.current_list_len();
        if len == 0 {
            return;
        }

        let i = match self.current_selection() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.select(i);
    }

    /// Context highlighted in the context list
    pub fn highlighted_context(&self) -> Option<&ContextChoice> {
        self.ui_state
            .list_state
            .selected()
            .and_then(|i| self.contexts.get(i))
    }

    // ------------------------------------------------------------------
    // Messages
    // ------------------------------------------------------------------

    /// Show an error message
    pub fn show_error(&mut self, msg: String) {
        self.ui_state.error_message = Some(msg);
    }

    /// Dismiss the error message
    pub fn dismiss_error(&mut self) {
        self.ui_state.error_message = None;
    }

    /// Show `text` in the status bar for the configured duration
    pub fn flash(&mut self, text: impl Into<String>) {
        self.ui_state.flash = Some(Flash {
            text: text.into(),
            expires_at: Instant::now() + self.flash_duration,
        });
    }

    /// Drop an expired flash message; returns true if one was removed
    pub fn expire_flash(&mut self, now: Instant) -> bool {
        match &self.ui_state.flash {
            Some(flash) if flash.expires_at <= now => {
                self.ui_state.flash = None;
                true
            }
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Filter
    // ------------------------------------------------------------------

    /// Start search/filter input mode
    pub fn start_search(&mut self) {
        self.ui_state.search_active = true;
        self.ui_state.search_input = self
            .ui_state
            .active_filter
            .as_ref()
            .map(|f| f.pattern().to_string())
            .unwrap_or_default();
        self.ui_state.filter_error = None;
    }

    /// Cancel search/filter input and clear filter
    pub fn cancel_search(&mut self) {
        self.ui_state.search_active = false;
        self.clear_filter();
    }

    /// Apply the current search input as a filter
    pub fn apply_filter(&mut self) {
        self.ui_state.search_active = false;
        self.ui_state.filter_error = None;

        if self.ui_state.search_input.is_empty() {
            self.ui_state.active_filter = None;
        } else {
            match PodFilter::new(&self.ui_state.search_input) {
                Ok(filter) => {
                    self.ui_state.active_filter = Some(filter);
                }
                Err(e) => {
                    self.ui_state.filter_error = Some(format!("Invalid regex: {}", e));
                    self.ui_state.search_active = true; // Keep input open to fix
                    return;
                }
            }
        }
        self.ui_state.table_state.select(Some(0));
    }

    /// Clear the active filter
    pub fn clear_filter(&mut self) {
        self.ui_state.active_filter = None;
        self.ui_state.search_input.clear();
        self.ui_state.filter_error = None;
        self.clamp_table_selection();
    }

    /// Add a character to search input
    pub fn search_input_char(&mut self, c: char) {
        self.ui_state.search_input.push(c);
    }

    /// Remove last character from search input
    pub fn search_input_backspace(&mut self) {
        self.ui_state.search_input.pop();
    }

    /// Spinner text of the latest request still in flight
    pub fn spinner_message(&self) -> Option<&'static str> {
        self.requests.spinner_message()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        let (tx, _rx) = mpsc::unbounded_channel();
        AppState::new(tx, ContextStore::disabled(), Duration::from_millis(2000))
    }

    fn loaded(names: &[&str]) -> AppState {
        let mut state = state();
        let ticket = state.begin_contexts_load();
        let names = names.iter().map(|n| n.to_string()).collect();
        assert_eq!(state.apply_contexts(ticket, Ok(names)), Completion::Applied);
        state
    }

    fn pod(name: &str, namespace: &str) -> PodSummary {
        let mut pod = PodSummary::new(name, namespace, "dev");
        pod.status = Some("Running".to_string());
        pod
    }

    fn with_pods(pods: Vec<PodSummary>) -> AppState {
        let mut state = loaded(&["dev"]);
        let (ticket, _) = state.select_context("dev".to_string()).unwrap();
        assert_eq!(state.apply_pods(ticket, Ok(pods)), Completion::Applied);
        state
    }

    #[test]
    fn test_context_choices_start_with_all() {
        let state = loaded(&["dev", "prod"]);
        let values: Vec<_> = state.contexts.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["all", "dev", "prod"]);
        assert_eq!(state.contexts[0].label, "All contexts");
        assert_eq!(state.spinner_message(), None);
    }

    #[test]
    fn test_contexts_failure() {
        let mut state = state();
        let ticket = state.begin_contexts_load();
        assert_eq!(state.spinner_message(), Some("Loading contexts..."));

        state.apply_contexts(ticket, Err(ApiError::Status(500)));
        assert!(state.contexts.is_empty());
        assert_eq!(state.contexts_error.as_deref(), Some("Error loading contexts"));
        assert_eq!(state.spinner_message(), None);
    }

    #[test]
    fn test_unauthorized_contexts_are_reported_not_reloaded() {
        let mut state = state();
        let ticket = state.begin_contexts_load();
        let completion = state.apply_contexts(ticket, Err(ApiError::Unauthorized));
        assert_eq!(completion, Completion::Applied);
        assert!(state.ui_state.error_message.is_some());
    }

    #[test]
    fn test_restore_saved_context() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContextStore::new(dir.path().join("state.toml"));
        store.save("prod");

        let (tx, _rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(tx, store, Duration::from_millis(2000));
        let ticket = state.begin_contexts_load();
        state.apply_contexts(ticket, Ok(vec!["dev".to_string(), "prod".to_string()]));

        let (pods_ticket, context) = state.restore_context(None).unwrap();
        assert_eq!(context, "prod");
        assert_eq!(pods_ticket.panel, Panel::Pods);
        assert_eq!(state.current_screen, Screen::PodList);
        assert_eq!(state.ui_state.list_state.selected(), Some(2));
        assert_eq!(state.spinner_message(), Some("Loading pods..."));
    }

    #[test]
    fn test_restore_prefers_argument_and_ignores_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContextStore::new(dir.path().join("state.toml"));
        store.save("prod");

        let (tx, _rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(tx, store, Duration::from_millis(2000));
        let ticket = state.begin_contexts_load();
        state.apply_contexts(ticket, Ok(vec!["dev".to_string(), "prod".to_string()]));

        assert!(state.restore_context(Some("staging")).is_none());
        assert_eq!(state.current_screen, Screen::ContextSelect);

        let (_, context) = state.restore_context(Some("dev")).unwrap();
        assert_eq!(context, "dev");
        // Selection is written through
        assert_eq!(state.store.load().as_deref(), Some("dev"));
    }

    #[test]
    fn test_clear_context_removes_saved_selection() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContextStore::new(dir.path().join("state.toml"));
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(tx, store, Duration::from_millis(2000));
        let ticket = state.begin_contexts_load();
        state.apply_contexts(ticket, Ok(vec!["dev".to_string()]));

        let (pods_ticket, _) = state.select_context("dev".to_string()).unwrap();
        state.clear_context();

        assert_eq!(state.store.load(), None);
        assert_eq!(state.selected_context, None);
        assert_eq!(state.current_screen, Screen::ContextSelect);
        assert_eq!(state.spinner_message(), None);
        // Late pods response is dropped
        assert_eq!(
            state.apply_pods(pods_ticket, Ok(vec![pod("web-0", "shop")])),
            Completion::Stale
        );
        assert!(state.pods.is_empty());
    }

    #[test]
    fn test_latest_pods_request_wins() {
        let mut state = loaded(&["dev", "prod"]);
        let (dev, _) = state.select_context("dev".to_string()).unwrap();
        let (prod, _) = state.select_context("prod".to_string()).unwrap();

        // prod resolves first, then the slower dev response arrives
        assert_eq!(state.apply_pods(prod, Ok(vec![pod("api-0", "prod-ns")])), Completion::Applied);
        assert_eq!(state.apply_pods(dev, Ok(vec![pod("web-0", "dev-ns")])), Completion::Stale);

        assert_eq!(state.pods.len(), 1);
        assert_eq!(state.pods[0].name, "api-0");
        assert_eq!(state.spinner_message(), None);
    }

    #[test]
    fn test_pods_failure_and_unauthorized() {
        let mut state = loaded(&["dev"]);
        let (ticket, _) = state.select_context("dev".to_string()).unwrap();
        state.apply_pods(ticket, Err(ApiError::Status(502)));
        assert_eq!(state.pods_error.as_deref(), Some("Error loading pods"));
        assert_eq!(state.spinner_message(), None);

        let (ticket, _) = state.begin_pods_load().unwrap();
        assert!(state.pods_error.is_none());
        assert_eq!(state.apply_pods(ticket, Err(ApiError::Unauthorized)), Completion::Unauthorized);
    }

    #[test]
    fn test_logs_viewer() {
        let mut state = with_pods(vec![pod("web-0", "shop")]);
        let (ticket, pod_ref) = state.open_logs().unwrap();
        assert_eq!(pod_ref, PodRef::new("dev", "shop", "web-0"));

        let viewer = state.viewer.as_ref().unwrap();
        assert_eq!(viewer.title, "Logs for web-0 (shop)");
        assert_eq!(viewer.content, "Loading logs...");
        assert_eq!(state.spinner_message(), Some("Loading logs..."));

        state.apply_logs(ticket, Ok("one\ntwo\n".to_string()));
        let viewer = state.viewer.as_ref().unwrap();
        assert_eq!(viewer.content, "one\ntwo\n");
        assert!(viewer.follow);
        assert_eq!(viewer.scroll, usize::MAX);
        assert_eq!(state.spinner_message(), None);
    }

    #[test]
    fn test_viewer_errors() {
        let mut state = with_pods(vec![pod("web-0", "shop")]);

        let (ticket, _) = state.open_logs().unwrap();
        state.apply_logs(ticket, Err(ApiError::Backend("Permission denied".to_string())));
        assert_eq!(state.viewer.as_ref().unwrap().content, "Error: Permission denied");

        let (ticket, _) = state.open_logs().unwrap();
        state.apply_logs(ticket, Err(ApiError::Status(500)));
        assert_eq!(state.viewer.as_ref().unwrap().content, "Error loading logs");

        let (ticket, _) = state.open_describe().unwrap();
        state.apply_describe(ticket, Err(ApiError::Incomplete("pod_details")));
        assert_eq!(state.viewer.as_ref().unwrap().content, "Error loading pod details");
        assert_eq!(state.spinner_message(), None);
    }

    #[test]
    fn test_describe_viewer_renders_description() {
        let mut state = with_pods(vec![pod("web-0", "shop")]);
        let (ticket, _) = state.open_describe().unwrap();
        assert_eq!(state.viewer.as_ref().unwrap().title, "Details for web-0 (shop)");
        assert_eq!(state.viewer.as_ref().unwrap().content, "Loading pod details...");

        let details: PodDescription = serde_json::from_value(serde_json::json!({
            "events": [],
            "manifest": {"name": "web-0", "namespace": "shop", "containers": []}
        }))
        .unwrap();
        state.apply_describe(ticket, Ok(details.clone()));

        let viewer = state.viewer.as_ref().unwrap();
        assert_eq!(viewer.content, format_pod_description(&details));
        assert!(viewer.content.contains("No events found"));
        assert_eq!(viewer.scroll, 0);
    }

    #[test]
    fn test_closed_viewer_drops_response() {
        let mut state = with_pods(vec![pod("web-0", "shop")]);
        let (ticket, _) = state.open_logs().unwrap();
        state.close_viewer();
        assert_eq!(state.spinner_message(), None);
        assert_eq!(state.apply_logs(ticket, Ok("late".to_string())), Completion::Stale);
        assert!(state.viewer.is_none());
    }

    #[test]
    fn test_switching_viewer_drops_previous_response() {
        let mut state = with_pods(vec![pod("web-0", "shop")]);
        let (logs, _) = state.open_logs().unwrap();
        let (describe, _) = state.open_describe().unwrap();

        assert_eq!(state.apply_logs(logs, Ok("late".to_string())), Completion::Stale);
        assert_eq!(state.viewer.as_ref().unwrap().kind, ViewerKind::Describe);
        assert_eq!(state.spinner_message(), Some("Loading pod details..."));
        state.apply_describe(describe, Err(ApiError::Backend("gone".to_string())));
        assert_eq!(state.viewer.as_ref().unwrap().content, "Error: gone");
    }

    #[test]
    fn test_filter_and_selection() {
        let mut state = with_pods(vec![
            pod("web-0", "shop"),
            pod("api-0", "backend"),
            pod("web-1", "shop"),
        ]);

        state.start_search();
        for c in "WEB".chars() {
            state.search_input_char(c);
        }
        state.apply_filter();
        assert!(!state.ui_state.search_active);
        assert_eq!(state.visible_pods().len(), 2);

        state.list_down();
        assert_eq!(state.selected_pod().unwrap().name, "web-1");
        state.list_down();
        assert_eq!(state.selected_pod().unwrap().name, "web-0");

        state.clear_filter();
        assert_eq!(state.visible_pods().len(), 3);
    }

    #[test]
    fn test_invalid_filter_keeps_input_open() {
        let mut state = with_pods(vec![pod("web-0", "shop")]);
        state.start_search();
        state.search_input_char('[');
        state.apply_filter();
        assert!(state.ui_state.search_active);
        assert!(state.ui_state.filter_error.is_some());
        assert!(state.ui_state.active_filter.is_none());
    }

    #[test]
    fn test_flash_expires() {
        let mut state = state();
        state.flash("Copied!");
        let expires_at = state.ui_state.flash.as_ref().unwrap().expires_at;

        assert!(!state.expire_flash(expires_at - Duration::from_millis(1)));
        assert!(state.ui_state.flash.is_some());
        assert!(state.expire_flash(expires_at));
        assert!(state.ui_state.flash.is_none());
    }

    #[test]
    fn test_reset_for_reload() {
        let mut state = with_pods(vec![pod("web-0", "shop")]);
        let (ticket, _) = state.open_logs().unwrap();
        state.reset_for_reload();

        assert_eq!(state.current_screen, Screen::ContextSelect);
        assert!(state.screen_stack.is_empty());
        assert!(state.contexts.is_empty());
        assert!(state.pods.is_empty());
        assert!(state.viewer.is_none());
        assert_eq!(state.spinner_message(), None);
        assert_eq!(state.apply_logs(ticket, Ok("late".to_string())), Completion::Stale);
    }

    #[test]
    fn test_context_to_copy() {
        let mut state = loaded(&["dev", "prod"]);
        state.list_down();
        assert_eq!(state.context_to_copy().as_deref(), Some("dev"));

        state.select_context("prod".to_string());
        assert_eq!(state.context_to_copy().as_deref(), Some("prod"));
    }

    #[test]
    fn test_viewer_scrolling() {
        let mut viewer = Viewer::logs(PodRef::new("dev", "shop", "web-0"));
        viewer.scroll_to_bottom();
        viewer.scroll_up(1);
        assert!(!viewer.follow);

        viewer.scroll_to_top();
        viewer.page_down();
        assert_eq!(viewer.scroll, PAGE_LINES);
        viewer.scroll_up(100);
        assert_eq!(viewer.scroll, 0);
    }
}
