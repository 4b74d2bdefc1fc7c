//! Normalized input
//!
//! Hosts translate keys, taps and touches into `InputEvent`s. The core never
//! sees device codes. Steering is latched across frames: a pressed direction
//! stays active until released, replaced by the opposite direction, or (for
//! keyboards that never report key-up) expired after a quiet window.

pub use crate::sim::Steering;

/// Horizontal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl From<Direction> for Steering {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Left => Steering::Left,
            Direction::Right => Steering::Right,
        }
    }
}

/// One normalized input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Enter / primary button
    Confirm,
    /// Escape
    Cancel,
    /// Close the game immediately
    Quit,
    /// Direction key pressed or auto-repeated
    Press(Direction),
    /// Direction key released
    Release(Direction),
    /// Finger down; `x` is normalized to [0, 1] across the screen
    TouchDown { x: f32 },
    /// Finger lifted
    TouchUp,
    /// Printable character typed
    Char(char),
    Backspace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HoldSource {
    Key,
    Touch,
}

/// Continuous steering state built from discrete events
#[derive(Debug, Clone)]
pub struct SteeringLatch {
    held: Option<(Direction, HoldSource)>,
    /// Frame of the last press/repeat for keyboard holds
    last_seen: u64,
    frame: u64,
    /// Frames without a key event before a key hold expires (0 = never)
    hold_window: u32,
}

impl SteeringLatch {
    pub fn new(hold_window: u32) -> Self {
        Self {
            held: None,
            last_seen: 0,
            frame: 0,
            hold_window,
        }
    }

    /// Call once per frame before applying that frame's events
    pub fn begin_frame(&mut self) {
        self.frame += 1;
    }

    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::Press(dir) => {
                self.held = Some((dir, HoldSource::Key));
                self.last_seen = self.frame;
            }
            InputEvent::Release(dir) => {
                if matches!(self.held, Some((held, HoldSource::Key)) if held == dir) {
                    self.held = None;
                }
            }
            InputEvent::TouchDown { x } => {
                let dir = if x < 0.5 {
                    Direction::Left
                } else {
                    Direction::Right
                };
                self.held = Some((dir, HoldSource::Touch));
            }
            InputEvent::TouchUp => self.held = None,
            _ => {}
        }
    }

    /// Steering for the current frame
    pub fn current(&self) -> Steering {
        match self.held {
            Some((dir, HoldSource::Touch)) => dir.into(),
            Some((dir, HoldSource::Key)) => {
                let quiet = self.frame.saturating_sub(self.last_seen);
                if self.hold_window > 0 && quiet > self.hold_window as u64 {
                    Steering::None
                } else {
                    dir.into()
                }
            }
            None => Steering::None,
        }
    }

    /// Drop any held direction (round start)
    pub fn reset(&mut self) {
        self.held = None;
    }
}

/// Single-line text capture with a length cap
#[derive(Debug, Clone, Default)]
pub struct TextField {
    value: String,
    max_len: usize,
}

impl TextField {
    pub fn new(max_len: usize) -> Self {
        Self {
            value: String::new(),
            max_len,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Apply a typing event; returns true if the text changed
    pub fn apply(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::Char(c) if !c.is_control() => {
                if self.value.chars().count() < self.max_len {
                    self.value.push(c);
                    true
                } else {
                    false
                }
            }
            InputEvent::Backspace => self.value.pop().is_some(),
            _ => false,
        }
    }
}
