//! A board of countdown timers.
//!
//! The board is the host for timer instances: it creates them from the
//! new-timer form, names them sequentially, routes their tick messages, and
//! tears them down when they are removed. It implements the bubbletea-rs
//! `Model` trait, so it can be run directly as a program.
//!
//! ```rust
//! use countdown_ring::board::Model;
//!
//! let mut board = Model::new();
//! let id = board.add_timer(90);
//! assert_eq!(board.timers()[0].display_name(), "Timer 1");
//! assert!(board.remove(id));
//! assert!(board.timers().is_empty());
//! ```

use crate::form::{self, FormEvent};
use crate::key::{self, BoardKeyMap};
use crate::ring;
use crate::timer::{self, TickMsg, TimeoutMsg, TimerOption};
use bubbletea_rs::{Cmd, KeyMsg, Model as BubbleTeaModel, Msg};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;
use tracing::debug;

/// Columns between two cards.
const GAP: &str = "   ";

/// Styles for board chrome around the cards.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Underline of the selected card.
    pub selected: Style,
    /// Text shown when there are no timers.
    pub empty: Style,
    /// Finished-timer notice.
    pub status: Style,
    /// Help line.
    pub help: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            selected: Style::new().foreground(AdaptiveColor {
                Light: "#04B575",
                Dark: "#04B575",
            }),
            empty: Style::new().foreground(AdaptiveColor {
                Light: "#909090",
                Dark: "#626262",
            }),
            status: Style::new().bold(true).foreground(AdaptiveColor {
                Light: "#EE6FF8",
                Dark: "#EE6FF8",
            }),
            help: Style::new().foreground(AdaptiveColor {
                Light: "#B2B2B2",
                Dark: "#4A4A4A",
            }),
        }
    }
}

/// Host for any number of timers plus the new-timer form.
#[derive(Debug)]
pub struct Model {
    timers: Vec<timer::Model>,
    selected: usize,
    finished: Option<String>,
    /// The new-timer form.
    pub form: form::Model,
    /// Board key bindings.
    pub keys: BoardKeyMap,
    /// Board styles.
    pub styles: Styles,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            timers: Vec::new(),
            selected: 0,
            finished: None,
            form: form::Model::new(),
            keys: BoardKeyMap::default(),
            styles: Styles::default(),
        }
    }

    /// Timers in display order.
    pub fn timers(&self) -> &[timer::Model] {
        &self.timers
    }

    /// Index of the selected timer.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// The selected timer, if any.
    pub fn selected_timer_mut(&mut self) -> Option<&mut timer::Model> {
        self.timers.get_mut(self.selected)
    }

    /// Looks up a timer by id.
    pub fn get_mut(&mut self, id: i64) -> Option<&mut timer::Model> {
        self.timers.iter_mut().find(|t| t.id() == id)
    }

    /// Name of the last timer that ran out, until the next key press.
    pub fn finished(&self) -> Option<&str> {
        self.finished.as_deref()
    }

    /// Adds an idle timer counting down from `seconds`, named after its
    /// position, and selects it. Returns its id.
    ///
    /// Names count from the current number of timers, so after a removal
    /// the next timer may reuse a name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use countdown_ring::board::Model;
    ///
    /// let mut board = Model::new();
    /// board.add_timer(30);
    /// let id = board.add_timer(125);
    ///
    /// let timer = &board.timers()[board.selected()];
    /// assert_eq!(timer.id(), id);
    /// assert_eq!(timer.display_name(), "Timer 2");
    /// assert_eq!(timer.label(), "2:05");
    /// assert!(!timer.running());
    /// ```
    pub fn add_timer(&mut self, seconds: u64) -> i64 {
        let label = format!("Timer {}", self.timers.len() + 1);
        let timer = timer::new(&[
            TimerOption::Time(seconds as f64),
            TimerOption::Label(label),
        ]);
        let id = timer.id();
        debug!(id, seconds, "timer added to board");
        self.timers.push(timer);
        self.selected = self.timers.len() - 1;
        id
    }

    /// Removes a timer and tears it down. Returns whether it was found.
    ///
    /// Ticks already in flight for the removed timer find no recipient and
    /// are dropped. The selection moves to the last timer when it pointed
    /// past the end.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use countdown_ring::board::Model;
    ///
    /// let mut board = Model::new();
    /// let first = board.add_timer(10);
    /// board.add_timer(20);
    ///
    /// assert!(board.remove(first));
    /// assert!(!board.remove(first));
    /// assert_eq!(board.timers().len(), 1);
    /// assert_eq!(board.selected(), 0);
    /// ```
    pub fn remove(&mut self, id: i64) -> bool {
        let Some(index) = self.timers.iter().position(|t| t.id() == id) else {
            return false;
        };
        let mut removed = self.timers.remove(index);
        removed.teardown();
        debug!(id, "timer removed from board");

        if self.selected >= self.timers.len() {
            self.selected = self.timers.len().saturating_sub(1);
        }
        true
    }

    /// Switches between the light and dark palette and returns whether the
    /// dark one is now active.
    ///
    /// Flips lipgloss's dark-background flag for the whole process, then
    /// rebuilds the board, form and card styles from their defaults. Custom
    /// styles set on those fields are replaced.
    pub fn toggle_theme(&mut self) -> bool {
        let dark = !lipgloss::has_dark_background();
        lipgloss::set_has_dark_background(dark);

        // Adaptive colors resolve when a style is built.
        self.styles = Styles::default();
        self.form.styles = form::Styles::default();
        for timer in &mut self.timers {
            timer.styles = ring::Styles::default();
        }
        debug!(dark, "theme toggled");
        dark
    }

    fn select(&mut self, step: isize) {
        let n = self.timers.len() as isize;
        if n == 0 {
            return;
        }
        self.selected = (self.selected as isize + step).rem_euclid(n) as usize;
    }

    /// Processes key, tick and timeout messages.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(tick) = msg.downcast_ref::<TickMsg>() {
            let id = tick.id;
            return self.get_mut(id).and_then(|t| t.update(msg));
        }

        if let Some(timeout) = msg.downcast_ref::<TimeoutMsg>() {
            if let Some(t) = self.timers.iter().find(|t| t.id() == timeout.id) {
                self.finished = Some(t.display_name().to_string());
            }
            return None;
        }

        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            self.finished = None;

            if self.form.is_open() {
                if let Some(FormEvent::Submitted(total)) = self.form.handle_key(key_msg) {
                    self.add_timer(total);
                }
                return None;
            }

            if key::matches(key_msg, &self.keys.quit) {
                return Some(bubbletea_rs::quit());
            }
            if key::matches(key_msg, &self.keys.add) {
                self.form.open();
                return None;
            }
            if key::matches(key_msg, &self.keys.prev) {
                self.select(-1);
                return None;
            }
            if key::matches(key_msg, &self.keys.next) {
                self.select(1);
                return None;
            }
            if key::matches(key_msg, &self.keys.theme) {
                self.toggle_theme();
                return None;
            }
            if key::matches(key_msg, &self.keys.remove) {
                if let Some(id) = self.timers.get(self.selected).map(timer::Model::id) {
                    self.remove(id);
                }
                return None;
            }

            return self.selected_timer_mut().and_then(|t| t.update(msg));
        }

        None
    }

    /// Renders the cards side by side, then the form, notices and help.
    pub fn view(&self) -> String {
        let mut sections = Vec::new();

        if self.timers.is_empty() {
            sections.push(
                self.styles
                    .empty
                    .render("No timers yet. Press n to add one."),
            );
        } else {
            let cards: Vec<String> = self
                .timers
                .iter()
                .enumerate()
                .map(|(i, t)| {
                    let marker = if i == self.selected {
                        self.styles.selected.render(&"▔".repeat(t.width))
                    } else {
                        " ".repeat(t.width)
                    };
                    format!("{}\n{}", t.view(), marker)
                })
                .collect();

            let mut parts: Vec<&str> = Vec::new();
            for (i, card) in cards.iter().enumerate() {
                if i > 0 {
                    parts.push(GAP);
                }
                parts.push(card.as_str());
            }
            sections.push(lipgloss::join_horizontal(lipgloss::TOP, &parts));
        }

        if self.form.is_open() {
            sections.push(self.form.view());
        }

        if let Some(name) = &self.finished {
            sections.push(self.styles.status.render(&format!("{} finished", name)));
        }

        if !self.form.is_open() {
            let timer_keys = self
                .timers
                .get(self.selected)
                .map(|t| t.keys.clone())
                .unwrap_or_default();
            let help = key::short_help(&[
                &timer_keys.toggle,
                &timer_keys.reset,
                &self.keys.add,
                &self.keys.prev,
                &self.keys.next,
                &self.keys.remove,
                &self.keys.theme,
                &self.keys.quit,
            ]);
            sections.push(self.styles.help.render(&help));
        }

        sections.join("\n\n")
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        (Model::new(), None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}
