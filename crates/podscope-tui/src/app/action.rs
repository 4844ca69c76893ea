/// All possible actions in the application (command pattern)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    // Navigation
    GoBack,
    Quit,

    // Context selection
    SelectContext(String),
    ClearContext,
    CopyContext,
    RefreshPods,

    // Pod actions
    ViewLogs,
    DescribePod,

    // UI toggles
    ToggleHelp,

    // List navigation
    ListUp,
    ListDown,
    ListSelect,

    // Pod filter
    OpenSearch,
    CloseSearch,
    SearchInput(char),
    SearchBackspace,
    SearchClear,
    ApplyFilter,
    ClearFilter,

    // Logs / describe viewer
    CloseViewer,
    ScrollUp(usize),
    ScrollDown(usize),
    ScrollToTop,
    ScrollToBottom,
    PageUp,
    PageDown,
    CopyViewer,

    // Error handling
    ShowError(String),
    DismissError,

    // Tick (for periodic updates)
    Tick,

    // Render request
    Render,
}
