/// The keys the palette intercepts while open. Everything else stays with the
/// host's text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Escape,
    Up,
    Down,
    Right,
    Enter,
    Backspace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub code: KeyCode,
    pub shift: bool,
    /// Whether the text caret sits at the end of the input. Backspace is only
    /// intercepted there.
    pub caret_at_end: bool,
}

impl KeyPress {
    pub fn plain(code: KeyCode) -> Self {
        Self {
            code,
            shift: false,
            caret_at_end: true,
        }
    }

    pub fn shifted(code: KeyCode) -> Self {
        Self {
            code,
            shift: true,
            caret_at_end: true,
        }
    }
}

/// What the engine did with a key, and what the host must do next. Anything
/// other than `Ignored` means the event was consumed and must not propagate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not intercepted; let the text field handle it.
    Ignored,
    /// Consumed; state may have changed, re-render.
    Handled,
    /// Consumed; the host must rewrite its input field to this text and move
    /// the caret to the end.
    SetInput(String),
    /// Consumed; the host should close the palette (and call `close`).
    CloseRequested,
}
