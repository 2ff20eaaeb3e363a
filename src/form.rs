//! New-timer form.
//!
//! Collects hours, minutes and seconds, adds them up and hands the total to
//! the host. Totals of zero are rejected with a message and the form stays
//! open. Accepting or cancelling clears the fields and closes the form.
//!
//! ```rust
//! use countdown_ring::form::{Field, Model};
//!
//! let mut form = Model::new();
//! form.open();
//! form.set_field(Field::Minutes, "2");
//! form.set_field(Field::Seconds, "5");
//! assert_eq!(form.total_seconds(), 125);
//! assert_eq!(form.submit(), Ok(125));
//! assert!(!form.is_open());
//! ```

use crate::key::{self, FormKeyMap};
use bubbletea_rs::KeyMsg;
use crossterm::event::KeyCode;
use lipgloss_extras::prelude::*;
use std::fmt;
use tracing::debug;

/// Digits accepted per field.
const MAX_DIGITS: usize = 6;

/// Errors surfaced to the user by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormError {
    /// The fields add up to zero seconds.
    NonPositiveTotal,
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::NonPositiveTotal => write!(f, "Enter a valid time (greater than 0)."),
        }
    }
}

impl std::error::Error for FormError {}

/// The three numeric fields, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Hours.
    Hours,
    /// Minutes.
    Minutes,
    /// Seconds.
    Seconds,
}

impl Field {
    /// Every field in focus order.
    pub const ALL: [Field; 3] = [Field::Hours, Field::Minutes, Field::Seconds];

    fn index(self) -> usize {
        match self {
            Field::Hours => 0,
            Field::Minutes => 1,
            Field::Seconds => 2,
        }
    }

    fn caption(self) -> &'static str {
        match self {
            Field::Hours => "hh",
            Field::Minutes => "mm",
            Field::Seconds => "ss",
        }
    }
}

/// Outcome of a key press handled by the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// The form was accepted with this many seconds and has closed.
    Submitted(u64),
    /// The form was rejected and stays open.
    Rejected(FormError),
    /// The form was cancelled and has closed.
    Cancelled,
}

/// Reads a field value as whole, non-negative seconds of its unit.
///
/// Empty, non-numeric, negative and non-finite values count as zero;
/// fractions are floored.
pub fn clamp_field(value: &str) -> u64 {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v.floor() as u64,
        _ => 0,
    }
}

/// Adds up hours, minutes and seconds.
pub fn total_seconds(hours: u64, minutes: u64, seconds: u64) -> u64 {
    hours
        .saturating_mul(3600)
        .saturating_add(minutes.saturating_mul(60))
        .saturating_add(seconds)
}

/// Styles for the form popover.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Title line.
    pub title: Style,
    /// Unfocused field.
    pub field: Style,
    /// Focused field.
    pub focused: Style,
    /// Rejection message.
    pub error: Style,
    /// Help line.
    pub help: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            title: Style::new().bold(true),
            field: Style::new().foreground(AdaptiveColor {
                Light: "#9B9B9B",
                Dark: "#5C5C5C",
            }),
            focused: Style::new().bold(true).foreground(AdaptiveColor {
                Light: "#04B575",
                Dark: "#ECFD65",
            }),
            error: Style::new().foreground(Color::from("#FF5F87")),
            help: Style::new().foreground(AdaptiveColor {
                Light: "#B2B2B2",
                Dark: "#4A4A4A",
            }),
        }
    }
}

/// The new-timer form.
#[derive(Debug, Clone)]
pub struct Model {
    values: [String; 3],
    focus: Field,
    open: bool,
    error: Option<FormError>,
    /// Key bindings.
    pub keys: FormKeyMap,
    /// Styles.
    pub styles: Styles,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// Creates a closed, empty form.
    pub fn new() -> Self {
        Self {
            values: Default::default(),
            focus: Field::Hours,
            open: false,
            error: None,
            keys: FormKeyMap::default(),
            styles: Styles::default(),
        }
    }

    /// Opens the form with the first field focused.
    pub fn open(&mut self) {
        self.open = true;
        self.focus = Field::Hours;
        self.error = None;
    }

    /// Whether the form is shown.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Focused field.
    pub fn focused(&self) -> Field {
        self.focus
    }

    /// Raw text of a field.
    pub fn field(&self, field: Field) -> &str {
        &self.values[field.index()]
    }

    /// Replaces the text of a field.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.values[field.index()] = value.into();
    }

    /// Last rejection, if the form is showing one.
    pub fn error(&self) -> Option<FormError> {
        self.error
    }

    /// Current total of the three fields in seconds.
    pub fn total_seconds(&self) -> u64 {
        total_seconds(
            clamp_field(self.field(Field::Hours)),
            clamp_field(self.field(Field::Minutes)),
            clamp_field(self.field(Field::Seconds)),
        )
    }

    /// Accepts the form.
    ///
    /// A positive total clears and closes the form and is returned. A zero
    /// total is recorded as the visible error and the form stays as is.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use countdown_ring::form::{Field, FormError, Model};
    ///
    /// let mut form = Model::new();
    /// form.open();
    /// form.set_field(Field::Seconds, "0");
    /// assert_eq!(form.submit(), Err(FormError::NonPositiveTotal));
    /// assert!(form.is_open());
    ///
    /// form.set_field(Field::Hours, "1");
    /// form.set_field(Field::Minutes, "1.9");
    /// assert_eq!(form.submit(), Ok(3660));
    /// assert!(!form.is_open());
    /// assert_eq!(form.field(Field::Hours), "");
    /// ```
    pub fn submit(&mut self) -> Result<u64, FormError> {
        let total = self.total_seconds();
        if total == 0 {
            debug!("new timer rejected, total is zero");
            self.error = Some(FormError::NonPositiveTotal);
            return Err(FormError::NonPositiveTotal);
        }
        self.clear();
        self.open = false;
        Ok(total)
    }

    /// Clears and closes the form.
    pub fn cancel(&mut self) {
        self.clear();
        self.open = false;
    }

    fn clear(&mut self) {
        for value in &mut self.values {
            value.clear();
        }
        self.error = None;
    }

    fn cycle(&mut self, step: isize) {
        let n = Field::ALL.len() as isize;
        let next = (self.focus.index() as isize + step).rem_euclid(n) as usize;
        self.focus = Field::ALL[next];
    }

    /// Handles a key press while open.
    ///
    /// Digits type into the focused field and Backspace deletes; other keys
    /// follow [`Model::keys`]. Returns an event when the form was submitted,
    /// rejected or cancelled. A closed form ignores every key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bubbletea_rs::KeyMsg;
    /// use countdown_ring::form::{FormEvent, Model};
    /// use crossterm::event::{KeyCode, KeyModifiers};
    ///
    /// let key = |key| KeyMsg { key, modifiers: KeyModifiers::NONE };
    /// let mut form = Model::new();
    /// form.open();
    ///
    /// form.handle_key(&key(KeyCode::Tab));
    /// form.handle_key(&key(KeyCode::Char('3')));
    /// assert_eq!(form.total_seconds(), 180);
    ///
    /// assert_eq!(form.handle_key(&key(KeyCode::Enter)), Some(FormEvent::Submitted(180)));
    /// assert_eq!(form.handle_key(&key(KeyCode::Enter)), None);
    /// ```
    pub fn handle_key(&mut self, msg: &KeyMsg) -> Option<FormEvent> {
        if !self.open {
            return None;
        }

        if key::matches(msg, &self.keys.submit) {
            return Some(match self.submit() {
                Ok(total) => FormEvent::Submitted(total),
                Err(err) => FormEvent::Rejected(err),
            });
        }
        if key::matches(msg, &self.keys.cancel) {
            self.cancel();
            return Some(FormEvent::Cancelled);
        }
        if key::matches(msg, &self.keys.next_field) {
            self.cycle(1);
            return None;
        }
        if key::matches(msg, &self.keys.prev_field) {
            self.cycle(-1);
            return None;
        }

        let value = &mut self.values[self.focus.index()];
        match msg.key {
            KeyCode::Char(c) if c.is_ascii_digit() && value.len() < MAX_DIGITS => {
                value.push(c);
                self.error = None;
            }
            KeyCode::Backspace => {
                value.pop();
            }
            _ => {}
        }
        None
    }

    /// Renders the popover, or nothing when closed.
    pub fn view(&self) -> String {
        if !self.open {
            return String::new();
        }

        let fields = Field::ALL
            .iter()
            .map(|&field| {
                let text = format!("{} [{:>2}]", field.caption(), self.field(field));
                if field == self.focus {
                    self.styles.focused.render(&text)
                } else {
                    self.styles.field.render(&text)
                }
            })
            .collect::<Vec<_>>()
            .join("  ");

        let mut lines = vec![self.styles.title.render("New timer"), fields];
        if let Some(err) = self.error {
            lines.push(self.styles.error.render(&err.to_string()));
        }
        let help = key::short_help(&[
            &self.keys.next_field,
            &self.keys.submit,
            &self.keys.cancel,
        ]);
        lines.push(self.styles.help.render(&help));
        lines.join("\n")
    }
}
