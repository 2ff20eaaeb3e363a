//! Render derivation for countdown timers.
//!
//! Everything a view needs to draw a timer is derived here from two numbers:
//! the configured duration and the remaining seconds. The results are pushed
//! into a [`RenderSink`] after every state change, so a view layer only has
//! to implement four setters.
//!
//! # Label
//!
//! ```rust
//! use countdown_ring::render::format_label;
//!
//! assert_eq!(format_label(0.0), "0:00");
//! assert_eq!(format_label(125.0), "2:05");
//! assert_eq!(format_label(3600.0), "60:00"); // no hour component
//! ```
//!
//! # Arc
//!
//! The ring is described the same way an SVG stroke dash array is: a visible
//! length out of [`FULL_ARC_LENGTH`].
//!
//! ```rust
//! use countdown_ring::render::{arc_length, dash_array, FULL_ARC_LENGTH};
//!
//! assert_eq!(arc_length(20, 20), FULL_ARC_LENGTH);
//! assert_eq!(dash_array(20, 20), "283 283");
//! ```

/// Total circumference unit of the progress ring.
pub const FULL_ARC_LENGTH: i64 = 283;

/// Formats a number of seconds as `"{minutes}:{seconds:02}"`.
///
/// Input is floored and clamped to zero first, so negative, fractional and
/// non-finite values all produce a well-formed label.
pub fn format_label(seconds: f64) -> String {
    let time = if seconds.is_finite() {
        seconds.floor().max(0.0) as u64
    } else if seconds > 0.0 {
        u64::MAX
    } else {
        0
    };
    format_label_secs(time)
}

/// Integer form of [`format_label`].
pub fn format_label_secs(seconds: u64) -> String {
    let minutes = seconds / 60;
    let secs = seconds % 60;
    format!("{}:{:02}", minutes, secs)
}

/// Returns the corrected fraction of the ring that should remain visible.
///
/// The raw ratio `remaining / duration` is shifted by
/// `(1 / duration) * (1 - raw)` so the ring closes fully on the last tick
/// instead of leaving a one-step sliver. The result may dip below zero when
/// nothing remains; [`arc_length`] clamps it.
pub fn arc_fraction(remaining: u64, duration: u64) -> f64 {
    if duration == 0 {
        return 0.0;
    }
    let duration = duration as f64;
    let raw = remaining as f64 / duration;
    raw - (1.0 / duration) * (1.0 - raw)
}

/// Visible ring length in [`FULL_ARC_LENGTH`] units, clamped to
/// `0..=FULL_ARC_LENGTH`.
pub fn arc_length(remaining: u64, duration: u64) -> i64 {
    let length = (arc_fraction(remaining, duration) * FULL_ARC_LENGTH as f64).round() as i64;
    length.clamp(0, FULL_ARC_LENGTH)
}

/// Stroke dash array pair `"{visible} {total}"`.
pub fn dash_array(remaining: u64, duration: u64) -> String {
    format!("{} {}", arc_length(remaining, duration), FULL_ARC_LENGTH)
}

/// Glyph shown on the primary control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    /// Timer is idle, paused or exhausted.
    Play,
    /// Timer is counting down.
    Pause,
}

impl Glyph {
    /// Glyph reflecting a running flag.
    pub fn for_running(running: bool) -> Self {
        if running {
            Glyph::Pause
        } else {
            Glyph::Play
        }
    }

    /// Terminal symbol for this glyph.
    pub fn symbol(self) -> &'static str {
        match self {
            Glyph::Play => "▶",
            Glyph::Pause => "⏸",
        }
    }
}

/// Destination for the rendered projections of a timer.
///
/// A timer calls every setter after each state-mutating operation, in the
/// order name, label, arc, glyph.
pub trait RenderSink {
    /// Display name, already trimmed and defaulted.
    fn set_name(&mut self, name: &str);
    /// Remaining-time label as produced by [`format_label`].
    fn set_label(&mut self, label: &str);
    /// Visible ring length out of `total`.
    fn set_arc(&mut self, visible: i64, total: i64);
    /// Primary control glyph.
    fn set_glyph(&mut self, glyph: Glyph);
}

/// Snapshot of the last rendered projections.
///
/// Every timer keeps one of these so views can draw without recomputing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Display name.
    pub name: String,
    /// Remaining-time label.
    pub label: String,
    /// Visible ring length.
    pub arc: i64,
    /// Primary control glyph.
    pub glyph: Glyph,
}

impl Frame {
    /// Dash array string for the current arc.
    pub fn dash_array(&self) -> String {
        format!("{} {}", self.arc, FULL_ARC_LENGTH)
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            name: String::new(),
            label: format_label_secs(0),
            arc: FULL_ARC_LENGTH,
            glyph: Glyph::Play,
        }
    }
}

impl RenderSink for Frame {
    fn set_name(&mut self, name: &str) {
        if self.name != name {
            self.name = name.to_string();
        }
    }

    fn set_label(&mut self, label: &str) {
        if self.label != label {
            self.label = label.to_string();
        }
    }

    fn set_arc(&mut self, visible: i64, _total: i64) {
        self.arc = visible;
    }

    fn set_glyph(&mut self, glyph: Glyph) {
        self.glyph = glyph;
    }
}
