//! Terminal rendering of a timer card.
//!
//! A card is four lines: the display name, the ring drawn as a horizontal
//! track whose filled length follows the arc, the remaining-time label, and
//! the control glyphs.
//!
//! ```text
//!  Tea
//!  ██████████████░░░░░░░░░░
//!           1:29
//!          ⏸   ↺
//! ```
//!
//! Colors are adaptive, so the card follows the terminal's light or dark
//! background.

use crate::render::{Frame, FULL_ARC_LENGTH};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Glyph of the secondary (reset) control.
pub const RESET_GLYPH: &str = "↺";

const ELLIPSIS: &str = "…";

/// Styles for the parts of a timer card.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Display name line.
    pub name: Style,
    /// Remaining-time label.
    pub label: Style,
    /// Filled part of the ring track.
    pub ring_full: Style,
    /// Empty part of the ring track.
    pub ring_empty: Style,
    /// Primary control glyph.
    pub primary: Style,
    /// Secondary control glyph.
    pub secondary: Style,
    /// Character for the filled track.
    pub full: char,
    /// Character for the empty track.
    pub empty: char,
}

impl Default for Styles {
    fn default() -> Self {
        let subdued = AdaptiveColor {
            Light: "#9B9B9B",
            Dark: "#5C5C5C",
        };
        let accent = AdaptiveColor {
            Light: "#04B575",
            Dark: "#04B575",
        };

        Self {
            name: Style::new().bold(true).foreground(AdaptiveColor {
                Light: "#1a1a1a",
                Dark: "#dddddd",
            }),
            label: Style::new().bold(true),
            ring_full: Style::new().foreground(accent.clone()),
            ring_empty: Style::new().foreground(AdaptiveColor {
                Light: "#DDDADA",
                Dark: "#3C3C3C",
            }),
            primary: Style::new().foreground(accent),
            secondary: Style::new().foreground(subdued),
            full: '█',
            empty: '░',
        }
    }
}

impl Styles {
    /// Renders a full card for `frame` at `width` columns.
    pub fn card(&self, frame: &Frame, width: usize) -> String {
        let width = width.max(1);
        let name = self.name.render(&truncate(&frame.name, width));
        let track = self.track(frame.arc, width);
        let label = center(&self.label.render(&frame.label), width);
        let controls = format!(
            "{}   {}",
            self.primary.render(frame.glyph.symbol()),
            self.secondary.render(RESET_GLYPH)
        );
        let controls = center(&controls, width);

        [name, track, label, controls].join("\n")
    }

    /// Renders the ring as a track of `width` cells.
    pub fn track(&self, arc: i64, width: usize) -> String {
        let filled = filled_cells(arc, width);
        let mut out = String::new();
        if filled > 0 {
            out.push_str(&self.ring_full.render(&self.full.to_string().repeat(filled)));
        }
        if filled < width {
            out.push_str(
                &self
                    .ring_empty
                    .render(&self.empty.to_string().repeat(width - filled)),
            );
        }
        out
    }
}

/// Number of filled cells for an arc on a track of `width` cells.
pub fn filled_cells(arc: i64, width: usize) -> usize {
    let arc = arc.clamp(0, FULL_ARC_LENGTH) as f64;
    let cells = (width as f64 * arc / FULL_ARC_LENGTH as f64).round() as usize;
    cells.min(width)
}

/// Shortens `text` to at most `width` columns, ending in an ellipsis when
/// anything was cut. Graphemes are never split. A zero width yields an
/// empty string.
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width < ELLIPSIS.width() {
        return String::new();
    }
    let budget = width.saturating_sub(ELLIPSIS.width());
    let mut out = String::new();
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        let w = grapheme.width();
        if used + w > budget {
            break;
        }
        out.push_str(grapheme);
        used += w;
    }
    out.push_str(ELLIPSIS);
    out
}

/// Pads `text` on the left so it sits in the middle of `width` columns.
fn center(text: &str, width: usize) -> String {
    let visible = lipgloss::width_visible(text);
    let pad = width.saturating_sub(visible) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Glyph;

    fn plain(s: &str) -> String {
        String::from_utf8(strip_ansi_escapes::strip(s)).expect("utf8")
    }

    #[test]
    fn test_filled_cells() {
        assert_eq!(filled_cells(FULL_ARC_LENGTH, 20), 20);
        assert_eq!(filled_cells(0, 20), 0);
        assert_eq!(filled_cells(-14, 20), 0);
        assert_eq!(filled_cells(134, 20), 9);
        assert_eq!(filled_cells(500, 20), 20);
    }

    #[test]
    fn test_track_width() {
        let styles = Styles::default();
        let track = plain(&styles.track(134, 20));
        assert_eq!(track.chars().count(), 20);
        assert_eq!(track.chars().filter(|c| *c == '█').count(), 9);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Tea", 10), "Tea");
        assert_eq!(truncate("Timer 12345", 6), "Timer…");
        assert_eq!(truncate("日本語のタイマー", 5), "日本…");
        assert_eq!(truncate("abc", 1), "…");
        assert_eq!(truncate("abc", 0), "");
        assert_eq!(truncate("", 0), "");
    }

    #[test]
    fn test_card_contents() {
        let frame = Frame {
            name: "Pasta".to_string(),
            label: "2:05".to_string(),
            arc: FULL_ARC_LENGTH,
            glyph: Glyph::Pause,
        };
        let card = plain(&Styles::default().card(&frame, 16));
        let lines: Vec<&str> = card.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Pasta");
        assert!(!lines[1].contains('░'));
        assert!(lines[2].trim() == "2:05");
        assert!(lines[3].contains(Glyph::Pause.symbol()));
        assert!(lines[3].contains(RESET_GLYPH));
    }
}
