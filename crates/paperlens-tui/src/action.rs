use crate::app::Screen;

/// Actions that the TUI can process, mapped from keyboard input or internal events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Jump straight to a view.
    Show(Screen),
    NextScreen,
    Dismiss,
    Confirm,
    ToggleSelect,
    Compare,
    ResetComparison,
    Rescan,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    GoTop,
    GoBottom,
    ToggleHelp,
    Tick,
    Resize(u16, u16),
    None,
}
