//! Edit-sheet navigation: history-aware open/close with a dirty-state gate.

use log::debug;

/// Browser history surface the controller drives.
pub trait History {
    fn current_url(&self) -> String;
    fn push(&mut self, url: &str);
    fn replace(&mut self, url: &str);
    /// Navigate back one entry. The host later reports it via `on_pop_state`.
    fn back(&mut self);
}

/// Blocking yes/no prompt.
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavMode {
    #[default]
    Push,
    Replace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetState {
    Closed,
    OpenClean,
    OpenDirty,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetNavState {
    pub is_open: bool,
    pub dirty: bool,
    pub background_url: Option<String>,
    pub editor_url: Option<String>,
    pub nav_mode: NavMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    /// The user kept editing.
    Declined,
    AlreadyClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopOutcome {
    /// Not ours: sheet closed, or the echo of our own navigation.
    Ignored,
    /// The sheet closed along with the navigation.
    Closed,
    /// Dirty sheet kept open; the editor URL was pushed back.
    Restored,
}

pub const DISCARD_PROMPT: &str = "Discard unsaved changes?";

pub struct SheetNavigator<H: History> {
    history: H,
    state: SheetNavState,
    /// Set right before our own `back()`, so the pop it produces is skipped.
    suppress_next_pop: bool,
}

impl<H: History> SheetNavigator<H> {
    pub fn new(history: H) -> Self {
        SheetNavigator {
            history,
            state: SheetNavState::default(),
            suppress_next_pop: false,
        }
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    pub fn nav_state(&self) -> &SheetNavState {
        &self.state
    }

    pub fn state(&self) -> SheetState {
        match (self.state.is_open, self.state.dirty) {
            (false, _) => SheetState::Closed,
            (true, false) => SheetState::OpenClean,
            (true, true) => SheetState::OpenDirty,
        }
    }

    /// Open the editor at `editor_url`. Re-opening an open sheet only swaps
    /// the URL (replace) and keeps the original background.
    pub fn open(&mut self, editor_url: &str, mode: NavMode) {
        if self.state.is_open {
            self.history.replace(editor_url);
            self.state.editor_url = Some(editor_url.to_string());
            return;
        }
        self.state = SheetNavState {
            is_open: true,
            dirty: false,
            background_url: Some(self.history.current_url()),
            editor_url: Some(editor_url.to_string()),
            nav_mode: mode,
        };
        match mode {
            NavMode::Push => self.history.push(editor_url),
            NavMode::Replace => self.history.replace(editor_url),
        }
        debug!("sheet opened ({:?}) at {editor_url}", mode);
    }

    /// First form edit flips the sheet dirty; later calls are no-ops.
    pub fn mark_dirty(&mut self) {
        if self.state.is_open && !self.state.dirty {
            self.state.dirty = true;
            debug!("sheet dirty");
        }
    }

    /// Close, asking first when there are unsaved edits (unless `force`).
    pub fn close(&mut self, confirm: &mut dyn Confirm, force: bool) -> CloseOutcome {
        if !self.state.is_open {
            return CloseOutcome::AlreadyClosed;
        }
        if self.state.dirty && !force && !confirm.confirm(DISCARD_PROMPT) {
            return CloseOutcome::Declined;
        }
        match self.state.nav_mode {
            NavMode::Push => {
                self.suppress_next_pop = true;
                self.history.back();
            }
            NavMode::Replace => {
                if let Some(url) = &self.state.background_url {
                    self.history.replace(url);
                }
            }
        }
        self.reset();
        CloseOutcome::Closed
    }

    /// The form saved: close without asking.
    pub fn save_succeeded(&mut self) -> CloseOutcome {
        struct Always;
        impl Confirm for Always {
            fn confirm(&mut self, _message: &str) -> bool {
                true
            }
        }
        self.close(&mut Always, true)
    }

    /// Host saw a back/forward navigation.
    pub fn on_pop_state(&mut self, confirm: &mut dyn Confirm) -> PopOutcome {
        if std::mem::take(&mut self.suppress_next_pop) {
            return PopOutcome::Ignored;
        }
        if !self.state.is_open {
            return PopOutcome::Ignored;
        }
        if !self.state.dirty {
            self.reset();
            return PopOutcome::Closed;
        }

        // Put the editor entry back before asking, so declining is silent.
        if let Some(url) = self.state.editor_url.clone() {
            self.history.push(&url);
        }
        if confirm.confirm(DISCARD_PROMPT) {
            self.suppress_next_pop = true;
            self.history.back();
            self.reset();
            PopOutcome::Closed
        } else {
            PopOutcome::Restored
        }
    }

    fn reset(&mut self) {
        debug!("sheet closed");
        self.state = SheetNavState::default();
    }
}
