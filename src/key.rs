//! Key bindings for timer controls and the board.

use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};

/// A single key press a binding listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// Key code.
    pub code: KeyCode,
    /// Required modifiers.
    pub modifiers: KeyModifiers,
}

impl From<KeyCode> for KeyPress {
    fn from(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }
}

impl From<(KeyCode, KeyModifiers)> for KeyPress {
    fn from((code, modifiers): (KeyCode, KeyModifiers)) -> Self {
        Self { code, modifiers }
    }
}

impl KeyPress {
    fn matches(&self, msg: &KeyMsg) -> bool {
        if self.code != msg.key {
            return false;
        }
        // Shifted characters arrive with SHIFT set; a plain binding still matches.
        self.modifiers == msg.modifiers
            || (self.modifiers.is_empty() && msg.modifiers == KeyModifiers::SHIFT)
    }
}

/// A named set of key presses with help text.
#[derive(Debug, Clone)]
pub struct Binding {
    /// Presses that trigger the binding.
    pub keys: Vec<KeyPress>,
    /// Short key label shown in help, e.g. `"space"`.
    pub help: String,
    /// What the binding does, e.g. `"play/pause"`.
    pub description: String,
    disabled: bool,
}

impl Binding {
    /// Creates a binding for the given presses.
    ///
    /// ```rust
    /// use countdown_ring::key::Binding;
    /// use crossterm::event::{KeyCode, KeyModifiers};
    ///
    /// let quit = Binding::new(vec![(KeyCode::Char('c'), KeyModifiers::CONTROL)])
    ///     .with_help("ctrl+c")
    ///     .with_description("quit");
    /// assert_eq!(quit.keys.len(), 1);
    /// ```
    pub fn new<K: Into<KeyPress>>(keys: Vec<K>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            help: String::new(),
            description: String::new(),
            disabled: false,
        }
    }

    /// Sets the key label shown in help.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Sets the description shown in help.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Enables or disables the binding. Disabled bindings never match and
    /// are left out of help.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }

    /// Whether the binding is enabled.
    pub fn enabled(&self) -> bool {
        !self.disabled
    }

    /// Whether a key message triggers this binding.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        self.enabled() && self.keys.iter().any(|press| press.matches(msg))
    }
}

/// Whether `msg` triggers `binding`.
pub fn matches(msg: &KeyMsg, binding: &Binding) -> bool {
    binding.matches(msg)
}

/// Renders enabled bindings as `"key desc • key desc"`.
pub fn short_help(bindings: &[&Binding]) -> String {
    bindings
        .iter()
        .filter(|b| b.enabled())
        .map(|b| format!("{} {}", b.help, b.description))
        .collect::<Vec<_>>()
        .join(" • ")
}

/// Bindings for the two controls of a single timer.
#[derive(Debug, Clone)]
pub struct TimerKeyMap {
    /// Primary control: play or pause.
    pub toggle: Binding,
    /// Secondary control: reset.
    pub reset: Binding,
}

impl Default for TimerKeyMap {
    fn default() -> Self {
        Self {
            toggle: Binding::new(vec![KeyCode::Char(' '), KeyCode::Char('p')])
                .with_help("space")
                .with_description("play/pause"),
            reset: Binding::new(vec![KeyCode::Char('r')])
                .with_help("r")
                .with_description("reset"),
        }
    }
}

/// Bindings for the board that hosts many timers.
#[derive(Debug, Clone)]
pub struct BoardKeyMap {
    /// Opens the new-timer form.
    pub add: Binding,
    /// Removes the selected timer.
    pub remove: Binding,
    /// Selects the previous timer.
    pub prev: Binding,
    /// Selects the next timer.
    pub next: Binding,
    /// Switches between the light and dark palette.
    pub theme: Binding,
    /// Quits the program.
    pub quit: Binding,
}

impl Default for BoardKeyMap {
    fn default() -> Self {
        Self {
            add: Binding::new(vec![KeyCode::Char('n'), KeyCode::Char('+')])
                .with_help("n")
                .with_description("new timer"),
            remove: Binding::new(vec![KeyCode::Char('x'), KeyCode::Delete])
                .with_help("x")
                .with_description("remove"),
            prev: Binding::new(vec![KeyCode::Left, KeyCode::Char('h')])
                .with_help("←/h")
                .with_description("prev"),
            next: Binding::new(vec![KeyCode::Right, KeyCode::Char('l')])
                .with_help("→/l")
                .with_description("next"),
            theme: Binding::new(vec![KeyCode::Char('t')])
                .with_help("t")
                .with_description("theme"),
            quit: Binding::new(vec![
                KeyPress::from(KeyCode::Char('q')),
                KeyPress::from((KeyCode::Char('c'), KeyModifiers::CONTROL)),
            ])
            .with_help("q")
            .with_description("quit"),
        }
    }
}

/// Bindings for the new-timer form.
#[derive(Debug, Clone)]
pub struct FormKeyMap {
    /// Moves focus to the next field.
    pub next_field: Binding,
    /// Moves focus to the previous field.
    pub prev_field: Binding,
    /// Submits the form.
    pub submit: Binding,
    /// Cancels and closes the form.
    pub cancel: Binding,
}

impl Default for FormKeyMap {
    fn default() -> Self {
        Self {
            next_field: Binding::new(vec![KeyCode::Tab, KeyCode::Down])
                .with_help("tab")
                .with_description("next field"),
            prev_field: Binding::new(vec![KeyCode::BackTab, KeyCode::Up])
                .with_help("shift+tab")
                .with_description("prev field"),
            submit: Binding::new(vec![KeyCode::Enter])
                .with_help("enter")
                .with_description("add"),
            cancel: Binding::new(vec![KeyCode::Esc])
                .with_help("esc")
                .with_description("cancel"),
        }
    }
}
