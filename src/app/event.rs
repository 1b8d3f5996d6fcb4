/// Events that can occur in the application
/// Handlers return these events instead of mutating app state directly
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    // Sidebar navigation
    NavUp,
    NavDown,
    SelectNav(usize),
    ToggleFocus,
    FocusContent,
    FocusSidebar,

    // Data panel rows
    RowSelectUp,
    RowSelectDown,
    RowSelectFirst,
    RowSelectLast,
    ToggleExpanded,
    ToggleActions,
    MoveRowUp,
    MoveRowDown,
    DeleteRow,
    ClearPanel,

    // Form fields (connection and audio panels)
    FieldNext,
    FieldPrev,
    StartEdit,
    EditChar(char),
    EditBackspace,
    EditSubmit,
    EditCancel,
    AdjustDown, // previous device / lower volume
    AdjustUp,   // next device / higher volume

    // Host commands
    Connect,
    Disconnect,
    ToggleCapture,
    RefreshDevices,

    // Help mode
    ShowHelp,
    HideHelp,

    // System events
    Quit,
}
