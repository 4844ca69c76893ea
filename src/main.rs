use std::fs::File;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use podscope_api::{ApiClient, ApiError};
use podscope_types::{PodDescription, PodRef, PodSummary};
use podscope_tui::{
    Action, AppState, Completion, ContextSelectScreen, ContextStore, ErrorPopup, Event,
    EventHandler, HelpOverlay, KeyBindings, KeyContext, PodListScreen, Screen, Settings,
    SpinnerOverlay, TextViewer, Ticket, Tui, copy_to_clipboard,
};

/// Podscope - A terminal UI for browsing Kubernetes pods through a podscope backend
#[derive(Parser, Debug)]
#[command(name = "podscope")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Context to open (overrides the saved selection; use "all" for every context)
    #[arg(value_name = "CONTEXT")]
    context: Option<String>,

    /// Backend base URL
    #[arg(long, value_name = "URL")]
    server: Option<String>,

    /// Username for HTTP Basic authentication
    #[arg(long)]
    username: Option<String>,

    /// Password for HTTP Basic authentication
    #[arg(long, env = "PODSCOPE_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Settings file (defaults to the platform config directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write diagnostics to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(args.log_file.as_deref())?;

    let result = run_app(args).await;

    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }

    result
}

/// `RUST_LOG` directives when set and valid, WARN otherwise
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref());

    match log_file {
        Some(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

/// Settings file merged with command line overrides
fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = Settings::load(args.config.as_deref())?;

    if let Some(server) = &args.server {
        settings.server.url = server.clone();
    }
    if let Some(username) = &args.username {
        settings.server.username = Some(username.clone());
    }
    if let Some(password) = &args.password {
        settings.server.password = Some(password.clone());
    }

    settings.validate()?;
    Ok(settings)
}

/// Internal actions for async operations
enum InternalAction {
    LoadContexts,
    LoadPods(Ticket, String),
    LoadLogs(Ticket, PodRef),
    Describe(Ticket, PodRef),
    ContextsLoaded(Ticket, Result<Vec<String>, ApiError>),
    PodsLoaded(Ticket, Result<Vec<PodSummary>, ApiError>),
    LogsLoaded(Ticket, Result<String, ApiError>),
    DescribeLoaded(Ticket, Result<PodDescription, ApiError>),
    /// Start over after the backend rejected the session
    Reload,
}

async fn run_app(mut args: Args) -> Result<()> {
    let settings = load_settings(&args)?;
    let client = ApiClient::with_timeout(&settings.server.url, settings.credentials(), settings.timeout())
        .context("Failed to create backend client")?;
    tracing::info!(server = %client.base_url(), "Starting podscope");

    // Create action channels
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (internal_tx, mut internal_rx) = mpsc::unbounded_channel::<InternalAction>();

    let mut state = AppState::new(
        action_tx.clone(),
        ContextStore::default_location(),
        settings.flash_duration(),
    );

    // Only the first context load honours the command line context
    let mut preferred_context = args.context.take();

    let mut tui = Tui::new()?;
    let mut events = EventHandler::new(settings.tick_rate());
    let keybindings = KeyBindings::new();
    let mut tick: usize = 0;

    let _ = internal_tx.send(InternalAction::LoadContexts);

    render(&mut tui, &mut state, tick)?;

    loop {
        tokio::select! {
            Some(event) = events.next() => {
                match event {
                    Event::Key(key) => {
                        if let Some(action) = key_action(&state, &keybindings, &key) {
                            let _ = action_tx.send(action);
                        }
                    }
                    Event::Tick => {
                        tick = tick.wrapping_add(1);
                        state.expire_flash(Instant::now());
                    }
                    Event::Resize(_, _) => {
                        let _ = action_tx.send(Action::Render);
                    }
                    Event::Error(e) => {
                        state.show_error(e);
                    }
                }
            }

            Some(action) = action_rx.recv() => {
                handle_action(&mut state, &internal_tx, action);
            }

            Some(internal) = internal_rx.recv() => {
                handle_internal(&mut state, &client, &internal_tx, &mut preferred_context, internal);
            }
        }

        if state.should_quit {
            break;
        }

        render(&mut tui, &mut state, tick)?;
    }

    // Cleanup
    events.shutdown().await;
    tui.restore()?;

    Ok(())
}

/// Resolve a key press against the bindings of whatever has focus
fn key_action(
    state: &AppState,
    keybindings: &KeyBindings,
    key: &crossterm::event::KeyEvent,
) -> Option<Action> {
    if state.viewer.is_some() {
        return keybindings.get_action(KeyContext::Viewer, key);
    }

    match state.current_screen {
        Screen::PodList if state.ui_state.search_active => {
            keybindings.get_filter_input_action(key)
        }
        Screen::PodList => keybindings.get_action(KeyContext::PodList, key),
        Screen::ContextSelect => keybindings.get_action(KeyContext::ListNavigation, key),
    }
}

/// Run `fetch` on its own task and report the result back to the event loop
fn spawn_fetch<T, Fut, F>(internal_tx: &mpsc::UnboundedSender<InternalAction>, fetch: Fut, done: F)
where
    T: Send + 'static,
    Fut: Future<Output = T> + Send + 'static,
    F: FnOnce(T) -> InternalAction + Send + 'static,
{
    let internal_tx = internal_tx.clone();
    tokio::spawn(async move {
        let result = fetch.await;
        let _ = internal_tx.send(done(result));
    });
}

fn handle_internal(
    state: &mut AppState,
    client: &ApiClient,
    internal_tx: &mpsc::UnboundedSender<InternalAction>,
    preferred_context: &mut Option<String>,
    internal: InternalAction,
) {
    let completion = match internal {
        InternalAction::LoadContexts => {
            let ticket = state.begin_contexts_load();
            let client = client.clone();
            spawn_fetch(
                internal_tx,
                async move { client.contexts().await },
                move |result| InternalAction::ContextsLoaded(ticket, result),
            );
            return;
        }
        InternalAction::LoadPods(ticket, context) => {
            let client = client.clone();
            spawn_fetch(
                internal_tx,
                async move { client.pods(&context).await },
                move |result| InternalAction::PodsLoaded(ticket, result),
            );
            return;
        }
        InternalAction::LoadLogs(ticket, pod) => {
            let client = client.clone();
            spawn_fetch(
                internal_tx,
                async move { client.logs(&pod).await },
                move |result| InternalAction::LogsLoaded(ticket, result),
            );
            return;
        }
        InternalAction::Describe(ticket, pod) => {
            let client = client.clone();
            spawn_fetch(
                internal_tx,
                async move { client.describe(&pod).await },
                move |result| InternalAction::DescribeLoaded(ticket, result),
            );
            return;
        }

        InternalAction::ContextsLoaded(ticket, result) => {
            let completion = state.apply_contexts(ticket, result);
            if completion == Completion::Applied && !state.contexts.is_empty() {
                let preferred = preferred_context.take();
                if let Some((ticket, context)) = state.restore_context(preferred.as_deref()) {
                    let _ = internal_tx.send(InternalAction::LoadPods(ticket, context));
                }
            }
            completion
        }
        InternalAction::PodsLoaded(ticket, result) => state.apply_pods(ticket, result),
        InternalAction::LogsLoaded(ticket, result) => state.apply_logs(ticket, result),
        InternalAction::DescribeLoaded(ticket, result) => state.apply_describe(ticket, result),

        InternalAction::Reload => {
            state.reset_for_reload();
            let _ = internal_tx.send(InternalAction::LoadContexts);
            return;
        }
    };

    if completion == Completion::Unauthorized {
        tracing::warn!("Backend answered 401, reloading");
        let _ = internal_tx.send(InternalAction::Reload);
    }
}

fn handle_action(
    state: &mut AppState,
    internal_tx: &mpsc::UnboundedSender<InternalAction>,
    action: Action,
) {
    match action {
        Action::Quit => {
            state.should_quit = true;
        }
        Action::GoBack => {
            // Close the topmost layer first
            if state.ui_state.help_visible {
                state.ui_state.help_visible = false;
            } else if state.ui_state.error_message.is_some() {
                state.dismiss_error();
            } else if state.viewer.is_some() {
                state.close_viewer();
            } else if !state.go_back() {
                state.should_quit = true;
            }
        }

        // Contexts
        Action::ListSelect => {
            if state.current_screen == Screen::ContextSelect {
                if let Some(choice) = state.highlighted_context() {
                    let _ = state.action_tx.send(Action::SelectContext(choice.value.clone()));
                }
            }
        }
        Action::SelectContext(context) => {
            if let Some((ticket, context)) = state.select_context(context) {
                let _ = internal_tx.send(InternalAction::LoadPods(ticket, context));
            }
        }
        Action::ClearContext => {
            state.clear_context();
        }
        Action::RefreshPods => {
            if let Some((ticket, context)) = state.begin_pods_load() {
                let _ = internal_tx.send(InternalAction::LoadPods(ticket, context));
            }
        }
        Action::CopyContext => {
            if let Some(context) = state.context_to_copy() {
                copy(state, &context, "Failed to copy context name to clipboard");
            }
        }

        // Pods
        Action::ViewLogs => {
            if let Some((ticket, pod)) = state.open_logs() {
                let _ = internal_tx.send(InternalAction::LoadLogs(ticket, pod));
            }
        }
        Action::DescribePod => {
            if let Some((ticket, pod)) = state.open_describe() {
                let _ = internal_tx.send(InternalAction::Describe(ticket, pod));
            }
        }
        Action::ListUp => {
            state.list_up();
        }
        Action::ListDown => {
            state.list_down();
        }

        // Filter/Search actions
        Action::OpenSearch => {
            state.start_search();
        }
        Action::CloseSearch => {
            state.cancel_search();
        }
        Action::SearchInput(c) => {
            state.search_input_char(c);
        }
        Action::SearchBackspace => {
            state.search_input_backspace();
        }
        Action::SearchClear => {
            state.ui_state.search_input.clear();
        }
        Action::ApplyFilter => {
            state.apply_filter();
        }
        Action::ClearFilter => {
            state.clear_filter();
        }

        // Viewer
        Action::CloseViewer => {
            state.close_viewer();
        }
        Action::ScrollUp(n) => {
            if let Some(viewer) = state.viewer.as_mut() {
                viewer.scroll_up(n);
            }
        }
        Action::ScrollDown(n) => {
            if let Some(viewer) = state.viewer.as_mut() {
                viewer.scroll_down(n);
            }
        }
        Action::PageUp => {
            if let Some(viewer) = state.viewer.as_mut() {
                viewer.page_up();
            }
        }
        Action::PageDown => {
            if let Some(viewer) = state.viewer.as_mut() {
                viewer.page_down();
            }
        }
        Action::ScrollToTop => {
            if let Some(viewer) = state.viewer.as_mut() {
                viewer.scroll_to_top();
            }
        }
        Action::ScrollToBottom => {
            if let Some(viewer) = state.viewer.as_mut() {
                viewer.scroll_to_bottom();
            }
        }
        Action::CopyViewer => {
            if let Some(content) = state.viewer.as_ref().map(|v| v.content.clone()) {
                copy(state, &content, "Failed to copy to clipboard");
            }
        }

        Action::ShowError(msg) => {
            state.show_error(msg);
        }
        Action::DismissError => {
            state.dismiss_error();
        }
        Action::ToggleHelp => {
            state.ui_state.help_visible = !state.ui_state.help_visible;
        }

        Action::Tick | Action::Render => {
            // Rendering happens after every loop iteration
        }
    }
}

fn copy(state: &mut AppState, text: &str, failure: &str) {
    match copy_to_clipboard(text) {
        Ok(()) => state.flash("Copied!"),
        Err(e) => {
            tracing::error!("Error copying to clipboard: {}", e);
            state.show_error(failure.to_string());
        }
    }
}

fn render(tui: &mut Tui, state: &mut AppState, tick: usize) -> Result<()> {
    tui.terminal().draw(|frame| {
        match state.current_screen {
            Screen::ContextSelect => ContextSelectScreen::render(frame, state),
            Screen::PodList => PodListScreen::render(frame, state),
        }

        if let Some(viewer) = state.viewer.as_mut() {
            TextViewer::render(frame, viewer);
        }

        if let Some(message) = state.spinner_message() {
            SpinnerOverlay::render(frame, message, tick);
        }

        if let Some(error) = &state.ui_state.error_message {
            ErrorPopup::render(frame, error);
        }

        if state.ui_state.help_visible {
            HelpOverlay::render(frame);
        }
    })?;

    Ok(())
}
