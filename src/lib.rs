#![warn(missing_docs)]

//! # countdown-ring
//!
//! Countdown timer widgets for [bubbletea-rs](https://github.com/joshka/bubbletea-rs)
//! terminal applications. Each timer draws a progress ring, a `m:ss` label
//! and play/pause/reset controls, and a board hosts any number of them
//! together with a form for adding new ones.
//!
//! ## Overview
//!
//! Components follow the Elm Architecture used throughout bubbletea-rs:
//! control methods and `update()` mutate state and return the next [`Cmd`],
//! and `view()` renders the current state as a string.
//!
//! - [`timer`]: the countdown engine. Tracks duration and elapsed seconds,
//!   owns at most one live tick chain, and stops itself at zero.
//! - [`render`]: pure derivations from timer state: the label, the ring's
//!   arc length, the control glyph, and the [`RenderSink`] trait they are
//!   pushed through.
//! - [`attr`]: `time` and `label` attributes with their fallback rules.
//! - [`ring`]: the terminal card for one timer.
//! - [`form`]: the hours/minutes/seconds form for new timers.
//! - [`board`]: the host that creates, routes and removes timers.
//! - [`key`]: key bindings for all of the above.
//!
//! ## Quick Start
//!
//! ```rust
//! use countdown_ring::prelude::*;
//!
//! let mut timer = timer_new(&[with_time(125), with_label("Pasta")]);
//! assert_eq!(timer.label(), "2:05");
//! assert_eq!(timer.dash_array(), "283 283");
//!
//! let _next_tick = timer.toggle();
//! assert!(timer.running());
//! assert_eq!(timer.glyph(), Glyph::Pause);
//! ```
//!
//! Running a board as a program:
//!
//! ```rust,ignore
//! use countdown_ring::Board;
//! use bubbletea_rs::Program;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let program = Program::<Board>::builder().build()?;
//!     program.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Lifecycle transitions are reported through [`tracing`] at `debug` level
//! and dropped ticks at `trace` level. The crate never installs a
//! subscriber.

pub mod attr;
pub mod board;
pub mod form;
pub mod key;
pub mod render;
pub mod ring;
pub mod timer;

pub use bubbletea_rs::Cmd;

pub use attr::{Attribute, DEFAULT_LABEL, DEFAULT_TIME};
pub use board::Model as Board;
pub use form::{Field as FormField, FormError, FormEvent, Model as TimerForm};
pub use key::{Binding, BoardKeyMap, FormKeyMap, KeyPress, TimerKeyMap};
pub use render::{
    arc_fraction, arc_length, dash_array, format_label, Frame, Glyph, RenderSink,
    FULL_ARC_LENGTH,
};
pub use ring::Styles as RingStyles;
pub use timer::{
    new as timer_new, with_interval, with_label, with_time, with_width, Model as Timer,
    TickHandle, TickMsg as TimerTickMsg, TimeoutMsg as TimerTimeoutMsg, TimerOption,
};

/// Prelude module for convenient imports.
///
/// ```rust
/// use countdown_ring::prelude::*;
///
/// let mut board = Board::new();
/// board.add_timer(60);
/// assert_eq!(board.timers()[0].label(), "1:00");
/// ```
pub mod prelude {
    pub use crate::board::Model as Board;
    pub use crate::form::{FormError, FormEvent, Model as TimerForm};
    pub use crate::key::{Binding, KeyPress};
    pub use crate::render::{
        arc_length, format_label, Frame, Glyph, RenderSink, FULL_ARC_LENGTH,
    };
    pub use crate::timer::{
        new as timer_new, with_interval, with_label, with_time, with_width, Model as Timer,
        TickMsg as TimerTickMsg, TimeoutMsg as TimerTimeoutMsg, TimerOption,
    };
}
