// src/engine/window_watch.rs

/// Windowed-mode detection as a two-state machine.
///
/// The relay waits for the primary to show at least one visible window, then
/// for all of them to disappear. A zero count before anything appeared means
/// nothing (the window may simply not be up yet). The transition to
/// `AwaitingDisappearance` is never undone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowWatch {
    #[default]
    AwaitingFirstAppearance,
    AwaitingDisappearance,
}

impl WindowWatch {
    /// Feed one census count. Returns `true` when the windows are gone.
    pub fn observe(&mut self, visible: usize) -> bool {
        match self {
            WindowWatch::AwaitingFirstAppearance => {
                if visible > 0 {
                    *self = WindowWatch::AwaitingDisappearance;
                }
                false
            }
            WindowWatch::AwaitingDisappearance => visible == 0,
        }
    }

    pub fn window_has_appeared(&self) -> bool {
        matches!(self, WindowWatch::AwaitingDisappearance)
    }
}
