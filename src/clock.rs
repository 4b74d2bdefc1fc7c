//! Frame pacing and wall-clock time
//!
//! `FrameClock` measures the real time between frames, caps the loop at the
//! target rate and keeps a rolling FPS figure for the HUD.

use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crate::consts::MAX_FRAME_DT;

/// Frames averaged by the FPS meter
const FPS_WINDOW: usize = 60;

/// Milliseconds since the Unix epoch (0 if the system clock is before it)
pub fn unix_millis() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Rolling frames-per-second over the last `FPS_WINDOW` frames
#[derive(Debug, Clone)]
pub struct FpsMeter {
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
}

impl Default for FpsMeter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
        }
    }
}

impl FpsMeter {
    /// Record a frame at `time_ms` (monotonic, milliseconds)
    pub fn record(&mut self, time_ms: f64) {
        self.frame_times[self.frame_index] = time_ms;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        // Slot we just advanced to holds the oldest sample
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = time_ms - oldest;
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW as f64 - 1.0) * 1000.0 / elapsed).round() as u32;
            }
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

/// Clamp a measured frame time into a usable simulation delta
pub fn clamp_dt(seconds: f32) -> f32 {
    if seconds.is_finite() {
        seconds.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    }
}

/// Time left in the frame budget after `spent`
pub fn remaining_budget(spent: Duration, target_fps: u32) -> Duration {
    if target_fps == 0 {
        return Duration::ZERO;
    }
    let budget = Duration::from_secs_f64(1.0 / target_fps as f64);
    budget.saturating_sub(spent)
}

/// Measured delta time with a frame-rate cap
#[derive(Debug)]
pub struct FrameClock {
    target_fps: u32,
    start: Instant,
    last: Instant,
    meter: FpsMeter,
}

impl FrameClock {
    pub fn new(target_fps: u32) -> Self {
        let now = Instant::now();
        Self {
            target_fps,
            start: now,
            last: now,
            meter: FpsMeter::default(),
        }
    }

    /// Start a frame; returns seconds since the previous one
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = clamp_dt(now.duration_since(self.last).as_secs_f32());
        self.last = now;
        // Offset by 1 ms so the first sample isn't mistaken for an empty slot
        self.meter
            .record(now.duration_since(self.start).as_secs_f64() * 1000.0 + 1.0);
        dt
    }

    /// Sleep out whatever is left of this frame's budget
    pub fn wait_for_next_frame(&self) {
        let remaining = remaining_budget(self.last.elapsed(), self.target_fps);
        if !remaining.is_zero() {
            thread::sleep(remaining);
        }
    }

    pub fn fps(&self) -> u32 {
        self.meter.fps()
    }
}
