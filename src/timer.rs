//! Countdown timer engine.
//!
//! A timer counts whole seconds down from a configured duration and keeps
//! its rendered projections (label, ring arc, control glyph) in step with
//! the elapsed time. It follows the bubbletea-rs architecture: control
//! methods mutate state synchronously and hand back the [`Cmd`] that drives
//! the next tick, and [`Model::update`] consumes the resulting [`TickMsg`].
//!
//! # Basic Usage
//!
//! ```rust
//! use countdown_ring::timer::{new, with_label, with_time};
//!
//! let mut timer = new(&[with_time(90), with_label("Tea")]);
//! assert_eq!(timer.label(), "1:30");
//! assert!(!timer.running()); // timers never start on their own
//!
//! let _tick = timer.play(); // counts the first second immediately
//! assert!(timer.running());
//! assert_eq!(timer.label(), "1:29");
//!
//! timer.pause();
//! timer.reset();
//! assert_eq!(timer.elapsed(), 0);
//! ```
//!
//! # Cancellation
//!
//! Every tick command carries the timer's id and the tag of the handle it
//! was scheduled under. Pausing, resetting, retargeting and tearing down
//! all drop the handle and bump the tag, so a tick that was already in
//! flight is ignored when it arrives. A timer therefore never has more than
//! one live tick chain, however quickly play and pause alternate.
//!
//! # bubbletea-rs Integration
//!
//! ```rust
//! use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};
//! use countdown_ring::timer::{new, with_time, Model, TimeoutMsg};
//!
//! struct App {
//!     timer: Model,
//!     done: bool,
//! }
//!
//! impl BubbleTeaModel for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let mut timer = new(&[with_time(10)]);
//!         let cmd = timer.play();
//!         (Self { timer, done: false }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         if let Some(timeout) = msg.downcast_ref::<TimeoutMsg>() {
//!             if timeout.id == self.timer.id() {
//!                 self.done = true;
//!             }
//!         }
//!         self.timer.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.timer.view()
//!     }
//! }
//! ```

use crate::attr::{self, Attribute};
use crate::key::{self, TimerKeyMap};
use crate::render::{self, Frame, Glyph, RenderSink, FULL_ARC_LENGTH};
use crate::ring::Styles;
use bubbletea_rs::{tick as bubbletea_tick, Cmd, KeyMsg, Model as BubbleTeaModel, Msg};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tracing::{debug, trace};

// Internal ID management for timer instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Period between scheduled ticks.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Card width used by [`Model::view`] unless overridden.
pub const DEFAULT_WIDTH: usize = 24;

/// Configuration options applied when creating a timer.
///
/// ```rust
/// use countdown_ring::timer::{new, with_interval, with_label, with_time};
/// use std::time::Duration;
///
/// let timer = new(&[
///     with_time(300),
///     with_label("Pizza"),
///     with_interval(Duration::from_millis(250)),
/// ]);
/// assert_eq!(timer.duration(), 300);
/// assert_eq!(timer.display_name(), "Pizza");
/// ```
#[derive(Debug, Clone)]
pub enum TimerOption {
    /// Duration in seconds; invalid values fall back to the default.
    Time(f64),
    /// Display name; blank values fall back to the default.
    Label(String),
    /// Period between scheduled ticks.
    Interval(Duration),
    /// Card width for the terminal view.
    Width(usize),
}

impl TimerOption {
    fn apply(&self, m: &mut Model) {
        match self {
            TimerOption::Time(seconds) => {
                m.duration = attr::sanitize_time(*seconds);
                m.time_attr = Some(m.duration.to_string());
            }
            TimerOption::Label(label) => {
                m.name = attr::normalize_label(Some(label));
                m.label_attr = Some(label.clone());
            }
            TimerOption::Interval(interval) => m.interval = *interval,
            TimerOption::Width(width) => m.width = *width,
        }
    }
}

/// Sets the countdown duration in seconds.
pub fn with_time(seconds: impl Into<f64>) -> TimerOption {
    TimerOption::Time(seconds.into())
}

/// Sets the display name.
pub fn with_label(label: impl Into<String>) -> TimerOption {
    TimerOption::Label(label.into())
}

/// Sets the period between scheduled ticks. Each tick still counts one
/// second; this only changes how often ticks are delivered.
pub fn with_interval(interval: Duration) -> TimerOption {
    TimerOption::Interval(interval)
}

/// Sets the card width of the terminal view.
pub fn with_width(width: usize) -> TimerOption {
    TimerOption::Width(width)
}

/// Message delivered once per period while a timer is running.
///
/// The `tag` is private: only the timer that scheduled a tick can produce
/// one it will accept.
#[derive(Debug, Clone)]
pub struct TickMsg {
    /// Identifier of the timer that scheduled this tick.
    pub id: i64,
    tag: i64,
}

/// Message sent once when a timer counts down to zero.
#[derive(Debug, Clone)]
pub struct TimeoutMsg {
    /// Identifier of the timer that ran out.
    pub id: i64,
}

/// Token for the single live tick chain of a timer.
///
/// A timer holds `Some(handle)` exactly while it is running. Cancelling
/// drops the handle and retires its tag, so ticks issued under it are
/// rejected afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickHandle(i64);

impl TickHandle {
    /// Tag the handle's ticks are stamped with.
    pub fn tag(self) -> i64 {
        self.0
    }
}

/// A countdown timer.
///
/// State is kept in whole seconds: `elapsed` never exceeds `duration`, and
/// `remaining()` is their difference. The timer is idle after creation,
/// counts down while running, and stops itself on the tick that reaches
/// zero. Dropping a timer tears it down.
pub struct Model {
    duration: u64,
    elapsed: u64,
    name: String,
    interval: Duration,

    id: i64,
    tag: i64,
    handle: Option<TickHandle>,
    torn_down: bool,

    // Last values seen through `set_attribute`.
    time_attr: Option<String>,
    label_attr: Option<String>,

    frame: Frame,
    sink: Option<Box<dyn RenderSink + Send>>,

    /// Key bindings for the primary and secondary controls.
    pub keys: TimerKeyMap,
    /// Styles used by [`Model::view`].
    pub styles: Styles,
    /// Card width used by [`Model::view`].
    pub width: usize,
}

/// Creates an idle timer and renders its initial state.
///
/// Without options the timer counts down from
/// [`DEFAULT_TIME`](crate::attr::DEFAULT_TIME) seconds and is named
/// [`DEFAULT_LABEL`](crate::attr::DEFAULT_LABEL).
///
/// ```rust
/// use countdown_ring::render::FULL_ARC_LENGTH;
/// use countdown_ring::timer::new;
///
/// let timer = new(&[]);
/// assert_eq!(timer.duration(), 20);
/// assert_eq!(timer.label(), "0:20");
/// assert_eq!(timer.frame().arc, FULL_ARC_LENGTH);
/// ```
pub fn new(opts: &[TimerOption]) -> Model {
    let mut m = Model {
        duration: attr::DEFAULT_TIME,
        elapsed: 0,
        name: attr::DEFAULT_LABEL.to_string(),
        interval: DEFAULT_INTERVAL,
        id: next_id(),
        tag: 0,
        handle: None,
        torn_down: false,
        time_attr: None,
        label_attr: None,
        frame: Frame::default(),
        sink: None,
        keys: TimerKeyMap::default(),
        styles: Styles::default(),
        width: DEFAULT_WIDTH,
    };

    for opt in opts {
        opt.apply(&mut m);
    }

    m.render();
    m
}

impl Model {
    /// Unique identifier of this timer.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Configured duration in seconds.
    pub fn duration(&self) -> u64 {
        self.duration
    }

    /// Seconds counted so far in the current cycle.
    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    /// Seconds left before the timer runs out.
    pub fn remaining(&self) -> u64 {
        self.duration.saturating_sub(self.elapsed)
    }

    /// Whether a tick chain is live.
    pub fn running(&self) -> bool {
        self.handle.is_some()
    }

    /// Whether the current cycle has counted all the way down.
    pub fn exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Whether [`Model::teardown`] has run.
    pub fn torn_down(&self) -> bool {
        self.torn_down
    }

    /// Handle of the live tick chain, if any.
    pub fn handle(&self) -> Option<TickHandle> {
        self.handle
    }

    /// Period between scheduled ticks.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Display name, trimmed and defaulted.
    pub fn display_name(&self) -> &str {
        &self.name
    }

    /// Most recently rendered projections.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Rendered remaining-time label, e.g. `"2:05"`.
    pub fn label(&self) -> &str {
        &self.frame.label
    }

    /// Rendered ring dash array, e.g. `"134 283"`.
    pub fn dash_array(&self) -> String {
        self.frame.dash_array()
    }

    /// Glyph the primary control should show.
    pub fn glyph(&self) -> Glyph {
        self.frame.glyph
    }

    /// Attaches an external render sink and renders the current state to it.
    ///
    /// ```rust
    /// use countdown_ring::render::Frame;
    /// use countdown_ring::timer::{new, with_time};
    ///
    /// let mut timer = new(&[with_time(60)]);
    /// timer.attach_sink(Box::new(Frame::default()));
    /// ```
    pub fn attach_sink(&mut self, sink: Box<dyn RenderSink + Send>) {
        self.sink = Some(sink);
        self.render();
    }

    /// The tick the live handle would deliver next.
    #[cfg(test)]
    pub(crate) fn pending_tick(&self) -> Option<TickMsg> {
        self.handle.map(|h| TickMsg {
            id: self.id,
            tag: h.tag(),
        })
    }

    /// Detaches and returns the external render sink.
    pub fn detach_sink(&mut self) -> Option<Box<dyn RenderSink + Send>> {
        self.sink.take()
    }

    /// Re-initializes the timer with a new duration and display name.
    ///
    /// Any live tick chain is cancelled, elapsed time returns to zero and
    /// the idle view is rendered. Counting does not start. Invalid
    /// durations fall back to the default and blank names to `"Timer"`.
    /// Has no effect after teardown.
    pub fn initialize(&mut self, seconds: f64, name: Option<&str>) {
        if self.torn_down {
            return;
        }
        self.cancel();
        self.duration = attr::sanitize_time(seconds);
        self.elapsed = 0;
        self.name = attr::normalize_label(name);
        self.time_attr = Some(self.duration.to_string());
        self.label_attr = name.map(str::to_string);
        debug!(id = self.id, duration = self.duration, name = %self.name, "timer initialized");
        self.render();
    }

    /// Starts counting down.
    ///
    /// The first second is counted immediately so the view does not lag a
    /// whole period behind the control. Returns the command that delivers
    /// the next tick, or `None` when nothing was started: the timer was
    /// already running, already exhausted, or torn down. If that first
    /// second runs the timer out, the command delivers a [`TimeoutMsg`]
    /// instead and the timer is stopped.
    ///
    /// ```rust
    /// use countdown_ring::render::Glyph;
    /// use countdown_ring::timer::{new, with_time};
    ///
    /// let mut timer = new(&[with_time(3)]);
    /// assert!(timer.play().is_some());
    /// assert_eq!(timer.elapsed(), 1);
    /// assert_eq!(timer.glyph(), Glyph::Pause);
    ///
    /// // A second play while running does nothing.
    /// assert!(timer.play().is_none());
    /// assert_eq!(timer.elapsed(), 1);
    /// ```
    pub fn play(&mut self) -> Option<Cmd> {
        if self.torn_down || self.running() {
            return None;
        }
        if self.exhausted() {
            debug!(id = self.id, "play ignored, timer exhausted");
            return None;
        }

        self.arm();
        debug!(id = self.id, remaining = self.remaining(), "timer started");
        Some(self.advance())
    }

    /// Stops counting, keeping the elapsed time. No effect when idle.
    pub fn pause(&mut self) {
        if !self.running() {
            return;
        }
        self.cancel();
        debug!(id = self.id, remaining = self.remaining(), "timer paused");
        self.render();
    }

    /// Pauses a running timer or plays an idle one.
    ///
    /// This is the primary control. The glyph reflects the resulting state.
    pub fn toggle(&mut self) -> Option<Cmd> {
        if self.running() {
            self.pause();
            None
        } else {
            self.play()
        }
    }

    /// Stops counting and returns to the full duration.
    pub fn reset(&mut self) {
        if self.torn_down {
            return;
        }
        self.cancel();
        self.elapsed = 0;
        debug!(id = self.id, duration = self.duration, "timer reset");
        self.render();
    }

    /// Replaces the duration and resets.
    ///
    /// Invalid values fall back to the default duration, following the same
    /// rule as creation.
    ///
    /// ```rust
    /// use countdown_ring::timer::{new, with_time};
    ///
    /// let mut timer = new(&[with_time(10)]);
    /// let _ = timer.play();
    /// timer.retarget(45.0);
    /// assert_eq!(timer.duration(), 45);
    /// assert_eq!(timer.elapsed(), 0);
    /// assert!(!timer.running());
    ///
    /// timer.retarget(-1.0);
    /// assert_eq!(timer.duration(), 20);
    /// ```
    pub fn retarget(&mut self, seconds: f64) {
        if self.torn_down {
            return;
        }
        self.duration = attr::sanitize_time(seconds);
        self.time_attr = Some(self.duration.to_string());
        debug!(id = self.id, duration = self.duration, "timer retargeted");
        self.reset();
    }

    /// Changes the display name only. Blank names show `"Timer"`.
    pub fn rename_display(&mut self, name: &str) {
        self.name = attr::normalize_label(Some(name));
        self.label_attr = Some(name.to_string());
        self.render();
    }

    /// Applies an attribute change by markup name.
    ///
    /// Setting an attribute to the value it already holds does nothing.
    /// `time` retargets (a removed `time` retargets to the default) and
    /// `label` renames. Unknown names, and every change after
    /// [`Model::teardown`], are ignored.
    ///
    /// ```rust
    /// use countdown_ring::timer::new;
    ///
    /// let mut timer = new(&[]);
    /// timer.set_attribute("time", Some("125"));
    /// timer.set_attribute("label", Some("  Bread "));
    /// assert_eq!(timer.label(), "2:05");
    /// assert_eq!(timer.display_name(), "Bread");
    /// ```
    pub fn set_attribute(&mut self, name: &str, value: Option<&str>) {
        if self.torn_down {
            return;
        }
        let Some(attribute) = Attribute::from_name(name) else {
            trace!(id = self.id, name, "ignoring unobserved attribute");
            return;
        };

        let current = match attribute {
            Attribute::Time => self.time_attr.as_deref(),
            Attribute::Label => self.label_attr.as_deref(),
        };
        if current == value {
            return;
        }

        match attribute {
            Attribute::Time => {
                let seconds = value.map_or(attr::DEFAULT_TIME, attr::parse_time);
                self.retarget(seconds as f64);
                self.time_attr = value.map(str::to_string);
            }
            Attribute::Label => match value {
                Some(label) => self.rename_display(label),
                None => {
                    self.name = attr::normalize_label(None);
                    self.label_attr = None;
                    self.render();
                }
            },
        }
    }

    /// Cancels any live tick chain for good.
    ///
    /// Call when the timer leaves the view. Later ticks, plays, resets and
    /// retargets are ignored. Runs once; dropping the timer calls it too.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.cancel();
        self.torn_down = true;
        debug!(id = self.id, "timer torn down");
        self.render();
    }

    /// Processes tick and key messages.
    ///
    /// A [`TickMsg`] counts one second if it belongs to this timer and was
    /// issued under the live handle; otherwise it is dropped and `None` is
    /// returned. An accepted tick returns the next tick command, or a
    /// [`TimeoutMsg`] command when it ran the timer out. Key messages that
    /// match [`Model::keys`] toggle or reset.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(tick_msg) = msg.downcast_ref::<TickMsg>() {
            if tick_msg.id != self.id {
                return None;
            }
            if self.handle != Some(TickHandle(tick_msg.tag)) {
                trace!(id = self.id, tag = tick_msg.tag, "dropping stale tick");
                return None;
            }
            return Some(self.advance());
        }

        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            return self.handle_key(key_msg);
        }

        None
    }

    fn handle_key(&mut self, key_msg: &KeyMsg) -> Option<Cmd> {
        if key::matches(key_msg, &self.keys.toggle) {
            return self.toggle();
        }
        if key::matches(key_msg, &self.keys.reset) {
            self.reset();
        }
        None
    }

    /// Renders the timer as a terminal card.
    pub fn view(&self) -> String {
        self.styles.card(&self.frame, self.width)
    }

    /// Counts one second and returns the follow-up command.
    ///
    /// Only called with a live handle. The tick that reaches zero stops the
    /// timer before returning.
    fn advance(&mut self) -> Cmd {
        self.elapsed = (self.elapsed + 1).min(self.duration);

        if self.exhausted() {
            self.cancel();
            debug!(id = self.id, duration = self.duration, "timer ran out");
            self.render();
            return self.timeout_cmd();
        }

        self.render();
        self.next_tick()
    }

    fn arm(&mut self) {
        self.tag += 1;
        self.handle = Some(TickHandle(self.tag));
    }

    fn cancel(&mut self) {
        if self.handle.take().is_some() {
            self.tag += 1;
        }
    }

    fn next_tick(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(self.interval, move |_| Box::new(TickMsg { id, tag }) as Msg)
    }

    fn timeout_cmd(&self) -> Cmd {
        let id = self.id;
        bubbletea_tick(Duration::from_nanos(1), move |_| {
            Box::new(TimeoutMsg { id }) as Msg
        })
    }

    fn render(&mut self) {
        let remaining = self.remaining();
        let label = render::format_label_secs(remaining);
        let arc = render::arc_length(remaining, self.duration);
        let glyph = Glyph::for_running(self.running());

        emit(&mut self.frame, &self.name, &label, arc, glyph);
        if let Some(sink) = self.sink.as_mut() {
            emit(sink.as_mut(), &self.name, &label, arc, glyph);
        }
    }
}

fn emit(sink: &mut dyn RenderSink, name: &str, label: &str, arc: i64, glyph: Glyph) {
    sink.set_name(name);
    sink.set_label(label);
    sink.set_arc(arc, FULL_ARC_LENGTH);
    sink.set_glyph(glyph);
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("id", &self.id)
            .field("duration", &self.duration)
            .field("elapsed", &self.elapsed)
            .field("name", &self.name)
            .field("handle", &self.handle)
            .field("torn_down", &self.torn_down)
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}

impl Drop for Model {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        (new(&[]), None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}

impl Default for Model {
    fn default() -> Self {
        new(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::sync::{Arc, Mutex};

    /// The tick the live handle would deliver next, as the runtime would.
    fn pending(timer: &Model) -> Option<TickMsg> {
        timer.pending_tick()
    }

    /// Advances a simulated clock by one period.
    fn period(timer: &mut Model) -> Option<Cmd> {
        let msg = pending(timer)?;
        timer.update(Box::new(msg))
    }

    fn snapshot(timer: &Model) -> (u64, u64, bool, Frame) {
        (
            timer.duration(),
            timer.elapsed(),
            timer.running(),
            timer.frame().clone(),
        )
    }

    #[derive(Default)]
    struct Recorder {
        labels: Vec<String>,
        arcs: Vec<i64>,
        glyphs: Vec<Glyph>,
        names: Vec<String>,
    }

    struct SharedSink(Arc<Mutex<Recorder>>);

    impl RenderSink for SharedSink {
        fn set_name(&mut self, name: &str) {
            self.0.lock().unwrap().names.push(name.to_string());
        }
        fn set_label(&mut self, label: &str) {
            self.0.lock().unwrap().labels.push(label.to_string());
        }
        fn set_arc(&mut self, visible: i64, total: i64) {
            assert_eq!(total, FULL_ARC_LENGTH);
            self.0.lock().unwrap().arcs.push(visible);
        }
        fn set_glyph(&mut self, glyph: Glyph) {
            self.0.lock().unwrap().glyphs.push(glyph);
        }
    }

    #[test]
    fn test_new_defaults() {
        let timer = new(&[]);
        assert_eq!(timer.duration(), attr::DEFAULT_TIME);
        assert_eq!(timer.elapsed(), 0);
        assert_eq!(timer.display_name(), attr::DEFAULT_LABEL);
        assert_eq!(timer.interval(), DEFAULT_INTERVAL);
        assert!(!timer.running());
        assert!(timer.handle().is_none());
        assert!(timer.id() > 0);
    }

    #[test]
    fn test_unique_ids() {
        let a = new(&[]);
        let b = new(&[]);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_initial_render_is_full_ring() {
        for duration in [1u32, 5, 20, 59, 60, 125, 3600] {
            let timer = new(&[with_time(duration)]);
            assert_eq!(timer.label(), render::format_label(duration as f64));
            assert_eq!(timer.frame().arc, FULL_ARC_LENGTH);
            assert_eq!(timer.dash_array(), "283 283");
            assert_eq!(timer.glyph(), Glyph::Play);
        }
    }

    #[test]
    fn test_invalid_time_falls_back() {
        assert_eq!(new(&[with_time(0)]).duration(), 20);
        assert_eq!(new(&[with_time(-4)]).duration(), 20);
        assert_eq!(new(&[with_time(f64::NAN)]).duration(), 20);
        assert_eq!(new(&[with_time(f64::INFINITY)]).duration(), 20);
        assert_eq!(new(&[with_time(7.8)]).duration(), 7);
    }

    #[test]
    fn test_play_ticks_immediately() {
        let mut timer = new(&[with_time(20)]);
        let cmd = timer.play();
        assert!(cmd.is_some());
        assert!(timer.running());
        assert_eq!(timer.elapsed(), 1);
        assert_eq!(timer.label(), "0:19");
        assert_eq!(timer.glyph(), Glyph::Pause);
    }

    #[test]
    fn test_play_while_running_is_noop() {
        let mut timer = new(&[with_time(20)]);
        let _ = timer.play();
        let handle = timer.handle();
        assert!(timer.play().is_none());
        assert_eq!(timer.handle(), handle);
        assert_eq!(timer.elapsed(), 1);
    }

    #[test]
    fn test_pause_keeps_elapsed() {
        let mut timer = new(&[with_time(20)]);
        let _ = timer.play();
        period(&mut timer);
        period(&mut timer);
        timer.pause();

        assert!(!timer.running());
        assert!(timer.handle().is_none());
        assert_eq!(timer.elapsed(), 3);
        assert_eq!(timer.glyph(), Glyph::Play);

        // Pausing again changes nothing.
        let before = snapshot(&timer);
        timer.pause();
        assert_eq!(snapshot(&timer), before);
    }

    #[test]
    fn test_toggle_alternates() {
        let mut timer = new(&[with_time(20)]);
        assert!(timer.toggle().is_some());
        assert!(timer.running());
        assert!(timer.toggle().is_none());
        assert!(!timer.running());
        assert_eq!(timer.glyph(), Glyph::Play);
        assert!(timer.toggle().is_some());
        assert_eq!(timer.glyph(), Glyph::Pause);
        assert_eq!(timer.elapsed(), 2);
    }

    #[test]
    fn test_runs_out_after_duration_ticks() {
        for duration in [1u32, 2, 5, 20] {
            let mut timer = new(&[with_time(duration)]);
            let _ = timer.play();
            while timer.running() {
                period(&mut timer);
            }

            assert_eq!(timer.elapsed(), duration as u64);
            assert_eq!(timer.remaining(), 0);
            assert!(timer.exhausted());
            assert_eq!(timer.label(), "0:00");
            assert_eq!(timer.frame().arc, 0);
            assert_eq!(timer.glyph(), Glyph::Play);
        }
    }

    #[test]
    fn test_exhausted_timer_ignores_ticks_and_play() {
        let mut timer = new(&[with_time(2)]);
        let _ = timer.play();
        let last = pending(&timer).expect("running");
        period(&mut timer);
        assert!(timer.exhausted());

        let before = snapshot(&timer);
        assert!(timer.update(Box::new(last)).is_none());
        assert!(timer.play().is_none());
        assert!(timer.toggle().is_none());
        assert_eq!(snapshot(&timer), before);
    }

    #[test]
    fn test_end_to_end_five_seconds() {
        let mut timer = new(&[]);
        timer.set_attribute("time", Some("5"));
        let _ = timer.play();

        let mut in_flight = pending(&timer);
        for _ in 0..5 {
            if let Some(msg) = in_flight.take() {
                timer.update(Box::new(msg));
                in_flight = pending(&timer);
            }
        }
        assert_eq!(timer.label(), "0:00");
        assert!(!timer.running());

        let before = snapshot(&timer);
        let sixth = TickMsg {
            id: timer.id(),
            tag: timer.tag,
        };
        assert!(timer.update(Box::new(sixth)).is_none());
        assert_eq!(snapshot(&timer), before);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut timer = new(&[with_time(10)]);
        let _ = timer.play();
        period(&mut timer);
        period(&mut timer);

        timer.reset();
        assert_eq!(timer.elapsed(), 0);
        assert!(!timer.running());
        assert_eq!(timer.label(), "0:10");
        assert_eq!(timer.frame().arc, FULL_ARC_LENGTH);

        let before = snapshot(&timer);
        timer.reset();
        assert_eq!(snapshot(&timer), before);
    }

    #[test]
    fn test_reset_rearms_exhausted_timer() {
        let mut timer = new(&[with_time(1)]);
        let _ = timer.play();
        assert!(timer.exhausted());
        timer.reset();
        assert!(timer.play().is_some());
    }

    #[test]
    fn test_retarget_resets() {
        let mut timer = new(&[with_time(10)]);
        let _ = timer.play();
        period(&mut timer);

        timer.retarget(90.0);
        assert_eq!(timer.duration(), 90);
        assert_eq!(timer.elapsed(), 0);
        assert!(!timer.running());
        assert_eq!(timer.label(), "1:30");

        timer.retarget(f64::NAN);
        assert_eq!(timer.duration(), attr::DEFAULT_TIME);
        assert_eq!(timer.elapsed(), 0);
    }

    #[test]
    fn test_stale_tick_after_pause_is_dropped() {
        let mut timer = new(&[with_time(30)]);
        let _ = timer.play();
        let stale = pending(&timer).expect("running");

        timer.pause();
        let _ = timer.play();
        assert_eq!(timer.elapsed(), 2);

        // The tick scheduled before the pause must not double-count.
        assert!(timer.update(Box::new(stale)).is_none());
        assert_eq!(timer.elapsed(), 2);

        assert!(period(&mut timer).is_some());
        assert_eq!(timer.elapsed(), 3);
    }

    #[test]
    fn test_rapid_play_pause_keeps_one_handle() {
        let mut timer = new(&[with_time(100)]);
        let mut issued = Vec::new();
        for _ in 0..10 {
            let _ = timer.play();
            issued.push(pending(&timer).expect("running"));
            timer.pause();
        }
        let _ = timer.play();
        let elapsed = timer.elapsed();

        let accepted = issued
            .into_iter()
            .filter_map(|msg| timer.update(Box::new(msg)))
            .count();
        assert_eq!(accepted, 0);
        assert_eq!(timer.elapsed(), elapsed);
    }

    #[test]
    fn test_tick_for_other_timer_is_ignored() {
        let mut a = new(&[with_time(10)]);
        let mut b = new(&[with_time(10)]);
        let _ = a.play();
        let _ = b.play();

        let for_b = pending(&b).expect("running");
        assert!(a.update(Box::new(for_b)).is_none());
        assert_eq!(a.elapsed(), 1);
    }

    #[test]
    fn test_teardown_stops_everything() {
        let mut timer = new(&[with_time(10)]);
        let _ = timer.play();
        let in_flight = pending(&timer).expect("running");

        timer.teardown();
        assert!(timer.torn_down());
        assert!(!timer.running());

        let before = snapshot(&timer);
        for _ in 0..5 {
            assert!(timer.update(Box::new(in_flight.clone())).is_none());
        }
        assert!(timer.play().is_none());
        timer.reset();
        timer.retarget(50.0);
        assert_eq!(snapshot(&timer), before);
    }

    #[test]
    fn test_set_attribute_same_value_is_noop() {
        let mut timer = new(&[with_time(10)]);
        timer.set_attribute("time", Some("30"));
        let _ = timer.play();

        timer.set_attribute("time", Some("30"));
        assert!(timer.running());
        assert_eq!(timer.elapsed(), 1);

        timer.set_attribute("time", Some("31"));
        assert!(!timer.running());
        assert_eq!(timer.duration(), 31);
    }

    #[test]
    fn test_set_attribute_invalid_time() {
        let mut timer = new(&[with_time(10)]);
        timer.set_attribute("time", Some("soon"));
        assert_eq!(timer.duration(), attr::DEFAULT_TIME);
        timer.set_attribute("time", Some("60"));
        timer.set_attribute("time", None);
        assert_eq!(timer.duration(), attr::DEFAULT_TIME);
    }

    #[test]
    fn test_rename_does_not_touch_countdown() {
        let mut timer = new(&[with_time(10), with_label("Eggs")]);
        let _ = timer.play();
        let handle = timer.handle();

        timer.rename_display("  Soup ");
        assert_eq!(timer.display_name(), "Soup");
        assert_eq!(timer.frame().name, "Soup");
        assert_eq!(timer.handle(), handle);
        assert_eq!(timer.elapsed(), 1);

        timer.set_attribute("label", Some("   "));
        assert_eq!(timer.display_name(), attr::DEFAULT_LABEL);
        timer.set_attribute("label", None);
        assert_eq!(timer.display_name(), attr::DEFAULT_LABEL);
    }

    #[test]
    fn test_initialize_does_not_start() {
        let mut timer = new(&[with_time(10)]);
        let _ = timer.play();
        timer.initialize(75.0, Some("Rice"));
        assert!(!timer.running());
        assert_eq!(timer.elapsed(), 0);
        assert_eq!(timer.duration(), 75);
        assert_eq!(timer.display_name(), "Rice");
        assert_eq!(timer.label(), "1:15");
    }

    #[test]
    fn test_sink_receives_every_render() {
        let recorder = Arc::new(Mutex::new(Recorder::default()));
        let mut timer = new(&[with_time(3), with_label("Tea")]);
        timer.attach_sink(Box::new(SharedSink(recorder.clone())));

        let _ = timer.play();
        period(&mut timer);
        period(&mut timer);

        let rec = recorder.lock().unwrap();
        assert_eq!(rec.names.first().map(String::as_str), Some("Tea"));
        assert_eq!(rec.labels.first().map(String::as_str), Some("0:03"));
        assert_eq!(rec.labels.last().map(String::as_str), Some("0:00"));
        assert_eq!(rec.arcs.first(), Some(&FULL_ARC_LENGTH));
        assert_eq!(rec.arcs.last(), Some(&0));
        assert_eq!(rec.glyphs.last(), Some(&Glyph::Play));
        assert!(rec.glyphs.contains(&Glyph::Pause));
    }

    #[test]
    fn test_key_messages_drive_controls() {
        let mut timer = new(&[with_time(10)]);
        let press = |c: char| -> Msg {
            Box::new(KeyMsg {
                key: KeyCode::Char(c),
                modifiers: KeyModifiers::NONE,
            })
        };

        assert!(timer.update(press(' ')).is_some());
        assert!(timer.running());
        assert!(timer.update(press(' ')).is_none());
        assert!(!timer.running());
        timer.update(press('r'));
        assert_eq!(timer.elapsed(), 0);
    }

    #[test]
    fn test_drop_tears_down() {
        let recorder = Arc::new(Mutex::new(Recorder::default()));
        let mut timer = new(&[with_time(10)]);
        let _ = timer.play();
        timer.attach_sink(Box::new(SharedSink(recorder.clone())));
        let before = recorder.lock().unwrap().glyphs.len();

        drop(timer);

        let rec = recorder.lock().unwrap();
        assert_eq!(rec.glyphs.len(), before + 1);
        assert_eq!(rec.glyphs.last(), Some(&Glyph::Play));
    }

    #[test]
    fn test_teardown_runs_once_across_drop() {
        let recorder = Arc::new(Mutex::new(Recorder::default()));
        let mut timer = new(&[with_time(10)]);
        let _ = timer.play();
        let in_flight = pending(&timer).expect("running");
        timer.attach_sink(Box::new(SharedSink(recorder.clone())));
        let before = recorder.lock().unwrap().glyphs.len();

        timer.teardown();
        timer.teardown();
        let elapsed = timer.elapsed();
        assert!(timer.update(Box::new(in_flight)).is_none());
        assert_eq!(timer.elapsed(), elapsed);
        drop(timer);

        assert_eq!(recorder.lock().unwrap().glyphs.len(), before + 1);
    }

    #[test]
    fn test_attributes_ignored_after_teardown() {
        let mut timer = new(&[with_time(10), with_label("Tea")]);
        timer.set_attribute("time", Some("10"));
        timer.teardown();

        timer.set_attribute("time", Some("30"));
        assert_eq!(timer.duration(), 10);
        timer.set_attribute("label", Some("Coffee"));
        assert_eq!(timer.display_name(), "Tea");
        assert_eq!(timer.label(), "0:10");
    }

    #[tokio::test]
    async fn test_play_that_exhausts_delivers_timeout() {
        let mut timer = new(&[with_time(1)]);
        let cmd = timer.play().expect("timeout command");
        assert!(!timer.running());
        assert_eq!(timer.elapsed(), 1);
        assert!(timer.handle().is_none());

        let msg = cmd.await.expect("timeout message");
        let timeout = msg.downcast_ref::<TimeoutMsg>().expect("timeout");
        assert_eq!(timeout.id, timer.id());
    }

    #[tokio::test]
    async fn test_play_command_delivers_tick() {
        let mut timer = new(&[with_time(3), with_interval(Duration::from_millis(5))]);
        let cmd = timer.play().expect("started");

        let msg = cmd.await.expect("tick message");
        assert!(msg.downcast_ref::<TickMsg>().is_some());
        let next = timer.update(msg).expect("next tick");
        assert_eq!(timer.elapsed(), 2);

        let msg = next.await.expect("tick message");
        let timeout = timer.update(msg).expect("timeout command");
        assert!(timer.exhausted());

        let msg = timeout.await.expect("timeout message");
        let timeout_msg = msg.downcast_ref::<TimeoutMsg>().expect("timeout");
        assert_eq!(timeout_msg.id, timer.id());
    }
}
