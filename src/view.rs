//! Top-level screen flow
//!
//! Title -> (name, email) -> Round / InterRound x3 -> EndOfRound -> Title.
//! The host calls `frame` once per rendered frame with the events it
//! collected; the machine advances exactly one simulation step when a round
//! is running and returns the draw list for the frame.

use rand::Rng;
use rand_pcg::Pcg32;

use crate::clock::clamp_dt;
use crate::consts::{
    CURSOR_BLINK_PERIOD, LEADERBOARD_ROWS, SCORE_BLINK_PERIOD, SCREEN_HEIGHT, SCREEN_WIDTH,
    TITLE_BLINK_PERIOD,
};
use crate::identity::{
    EMAIL_MAX_LEN, Identity, NAME_MAX_LEN, ValidationError, validate_email, validate_name,
};
use crate::input::{InputEvent, SteeringLatch, TextField};
use crate::leaderboard::{Leaderboard, LeaderboardRow};
use crate::render::{self, DrawCommand};
use crate::session::{Session, SessionSummary};
use crate::settings::Settings;
use crate::sim::{
    CloudTier, Rect, RoundController, RoundResult, RoundStatus, Screen, SimContext, autopilot,
    session_rng,
};
use crate::tuning::Tuning;

/// Decorative clouds on the title screen
const BACKDROP_CLOUDS: usize = 5;
const BACKDROP_MIN_SPEED: f32 = 50.0;
const BACKDROP_MAX_SPEED: f32 = 150.0;
/// Title skydiver sway (px/s and px either side of centre)
const SWAY_SPEED: f32 = 30.0;
const SWAY_RANGE: f32 = 100.0;
/// Demo mode lingers this long on each menu screen
const DEMO_SCREEN_SECS: f32 = 2.0;

/// One frame's worth of host input
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    pub events: &'a [InputEvent],
    /// Measured seconds since the previous frame
    pub dt: f32,
    /// Wall clock, Unix milliseconds
    pub now_ms: f64,
}

#[derive(Debug, Clone, Default)]
pub struct FrameOutput {
    pub commands: Vec<DrawCommand>,
    /// Host should exit now
    pub quit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStep {
    Name,
    Email,
}

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Title,
    SessionInfo { step: EntryStep },
    Round,
    InterRound,
    EndOfRound,
}

/// Screen plus the data only that screen needs
#[derive(Debug)]
enum Stage {
    Title,
    SessionInfo {
        step: EntryStep,
        error: Option<ValidationError>,
    },
    Round(RoundController),
    InterRound(RoundResult),
    EndOfRound {
        summary: SessionSummary,
        rows: Vec<LeaderboardRow>,
    },
}

#[derive(Debug, Clone, Copy)]
struct BackdropCloud {
    rect: Rect,
    speed: f32,
}

impl BackdropCloud {
    fn spawn(rng: &mut Pcg32) -> Self {
        let tier = CloudTier::ALL[rng.random_range(0..CloudTier::ALL.len())];
        let size = tier.size();
        let x = rng.random_range(0.0..=(SCREEN_WIDTH - size.x).max(0.0));
        Self {
            rect: Rect::new(x, SCREEN_HEIGHT, size.x, size.y),
            speed: rng.random_range(BACKDROP_MIN_SPEED..BACKDROP_MAX_SPEED),
        }
    }
}

pub struct ViewMachine {
    stage: Stage,
    leaderboard: Box<dyn Leaderboard>,
    session: Option<Session>,
    rng: Pcg32,
    tuning: Tuning,
    screen: Screen,
    latch: SteeringLatch,
    name: TextField,
    email: TextField,
    /// Seconds since the current screen appeared (drives blinking)
    stage_clock: f32,
    /// A tap must start on a screen before its release counts as confirm
    touch_armed: bool,
    title_rows: Vec<LeaderboardRow>,
    backdrop: Vec<BackdropCloud>,
    sway_x: f32,
    sway_dir: f32,
    show_fps: bool,
    fps: u32,
    demo: bool,
}

impl ViewMachine {
    pub fn new(leaderboard: Box<dyn Leaderboard>, settings: &Settings, seed: Option<u64>) -> Self {
        let mut machine = Self {
            stage: Stage::Title,
            leaderboard,
            session: None,
            rng: session_rng(seed),
            tuning: settings.tuning.clone(),
            screen: Screen::default(),
            latch: SteeringLatch::new(settings.hold_window_frames),
            name: TextField::new(NAME_MAX_LEN),
            email: TextField::new(EMAIL_MAX_LEN),
            stage_clock: 0.0,
            touch_armed: false,
            title_rows: Vec::new(),
            backdrop: Vec::with_capacity(BACKDROP_CLOUDS),
            sway_x: SCREEN_WIDTH / 2.0,
            sway_dir: 1.0,
            show_fps: settings.show_fps,
            fps: 0,
            demo: false,
        };
        machine.enter_title();
        machine
    }

    /// Autopilot steering and self-advancing menus
    pub fn with_demo(mut self, demo: bool) -> Self {
        self.demo = demo;
        self
    }

    pub fn state(&self) -> ViewState {
        match &self.stage {
            Stage::Title => ViewState::Title,
            Stage::SessionInfo { step, .. } => ViewState::SessionInfo { step: *step },
            Stage::Round(_) => ViewState::Round,
            Stage::InterRound(_) => ViewState::InterRound,
            Stage::EndOfRound { .. } => ViewState::EndOfRound,
        }
    }

    pub fn leaderboard(&self) -> &dyn Leaderboard {
        self.leaderboard.as_ref()
    }

    pub fn round(&self) -> Option<&RoundController> {
        match &self.stage {
            Stage::Round(round) => Some(round),
            _ => None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Validation message currently shown on the entry screen
    pub fn entry_error(&self) -> Option<ValidationError> {
        match &self.stage {
            Stage::SessionInfo { error, .. } => *error,
            _ => None,
        }
    }

    pub fn entered_name(&self) -> &str {
        self.name.value()
    }

    pub fn entered_email(&self) -> &str {
        self.email.value()
    }

    /// Latest measured frame rate for the HUD counter
    pub fn set_fps(&mut self, fps: u32) {
        self.fps = fps;
    }

    /// Consume one frame of input, step, and describe the frame
    pub fn frame(&mut self, input: FrameInput<'_>) -> FrameOutput {
        let dt = clamp_dt(input.dt);
        self.latch.begin_frame();

        for event in input.events {
            if *event == InputEvent::Quit {
                if self.session.take().is_some() {
                    log::info!("Quit during a session; unfinished rounds are dropped");
                }
                return FrameOutput {
                    commands: Vec::new(),
                    quit: true,
                };
            }
            self.handle_event(event, input.now_ms);
        }

        self.update(dt, input.now_ms);

        FrameOutput {
            commands: self.draw(),
            quit: false,
        }
    }

    fn set_stage(&mut self, stage: Stage) {
        self.stage = stage;
        self.stage_clock = 0.0;
        self.touch_armed = false;
        log::debug!("Screen -> {:?}", self.state());
    }

    fn enter_title(&mut self) {
        self.session = None;
        self.name.clear();
        self.email.clear();
        self.title_rows = self.leaderboard.top_scores(LEADERBOARD_ROWS);
        self.backdrop.clear();
        for _ in 0..BACKDROP_CLOUDS {
            self.backdrop.push(BackdropCloud::spawn(&mut self.rng));
        }
        self.sway_x = SCREEN_WIDTH / 2.0;
        self.sway_dir = 1.0;
        self.set_stage(Stage::Title);
    }

    /// Identity capture only makes sense when scores are kept
    fn wants_identity(&self) -> bool {
        self.leaderboard.is_persistent() && !self.demo
    }

    fn start_session(&mut self, identity: Identity, now_ms: f64) {
        self.session = Some(Session::begin(identity, self.leaderboard.as_mut(), now_ms));
        self.start_round();
    }

    fn start_round(&mut self) {
        let lives = self.session.as_ref().map_or(0, Session::lives);
        self.latch.reset();
        self.set_stage(Stage::Round(RoundController::new(
            self.screen,
            &self.tuning,
            lives,
        )));
    }

    fn finish_session(&mut self, now_ms: f64) {
        let Some(session) = self.session.take() else {
            self.enter_title();
            return;
        };
        let summary = session.finish(self.leaderboard.as_mut(), now_ms);
        let rows = self.leaderboard.top_scores(LEADERBOARD_ROWS);
        self.set_stage(Stage::EndOfRound { summary, rows });
    }

    /// Confirm key, or a tap that started on this screen
    fn is_confirm(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Confirm => true,
            InputEvent::TouchDown { .. } => {
                self.touch_armed = true;
                false
            }
            InputEvent::TouchUp => std::mem::take(&mut self.touch_armed),
            _ => false,
        }
    }

    fn handle_event(&mut self, event: &InputEvent, now_ms: f64) {
        match self.state() {
            ViewState::Title => {
                if self.is_confirm(event) {
                    if self.wants_identity() {
                        self.set_stage(Stage::SessionInfo {
                            step: EntryStep::Name,
                            error: None,
                        });
                    } else {
                        self.start_session(Identity::anonymous(), now_ms);
                    }
                }
            }
            ViewState::SessionInfo { step } => self.handle_entry(step, event, now_ms),
            ViewState::Round => self.latch.apply(event),
            ViewState::InterRound => {
                if self.is_confirm(event) {
                    self.advance_after_round(now_ms);
                }
            }
            ViewState::EndOfRound => {
                if self.is_confirm(event) {
                    self.enter_title();
                }
            }
        }
    }

    fn handle_entry(&mut self, step: EntryStep, event: &InputEvent, now_ms: f64) {
        if *event == InputEvent::Cancel {
            log::debug!("Entry cancelled");
            self.enter_title();
            return;
        }
        if !self.is_confirm(event) {
            match step {
                EntryStep::Name => self.name.apply(event),
                EntryStep::Email => self.email.apply(event),
            };
            return;
        }

        match step {
            EntryStep::Name => match validate_name(self.name.value()) {
                Ok(()) => self.set_stage(Stage::SessionInfo {
                    step: EntryStep::Email,
                    error: None,
                }),
                Err(e) => self.set_entry_error(e),
            },
            EntryStep::Email => match validate_email(self.email.value()) {
                Ok(()) => {
                    let identity = Identity::new(self.name.value(), self.email.value());
                    self.start_session(identity, now_ms);
                }
                Err(e) => self.set_entry_error(e),
            },
        }
    }

    fn set_entry_error(&mut self, e: ValidationError) {
        if let Stage::SessionInfo { error, .. } = &mut self.stage {
            *error = Some(e);
        }
    }

    fn advance_after_round(&mut self, now_ms: f64) {
        let lives_left = self.session.as_ref().map_or(0, Session::lives);
        if lives_left > 0 {
            self.start_round();
        } else {
            self.finish_session(now_ms);
        }
    }

    fn update(&mut self, dt: f32, now_ms: f64) {
        self.stage_clock += dt;

        match &mut self.stage {
            Stage::Round(round) => {
                let steer = if self.demo {
                    autopilot::steer(round)
                } else {
                    self.latch.current()
                };
                let mut ctx = SimContext::new(self.screen, dt, &mut self.rng, &self.tuning);
                if let RoundStatus::Finished(_, result) = round.step(steer, &mut ctx) {
                    if let Some(session) = self.session.as_mut() {
                        session.record_round(result);
                    }
                    self.set_stage(Stage::InterRound(result));
                }
            }
            Stage::Title => {
                self.update_backdrop(dt);
                if self.demo && self.stage_clock >= DEMO_SCREEN_SECS {
                    self.start_session(Identity::anonymous(), now_ms);
                }
            }
            Stage::InterRound(_) => {
                if self.demo && self.stage_clock >= DEMO_SCREEN_SECS {
                    self.advance_after_round(now_ms);
                }
            }
            Stage::EndOfRound { .. } => {
                if self.demo && self.stage_clock >= DEMO_SCREEN_SECS {
                    self.enter_title();
                }
            }
            Stage::SessionInfo { .. } => {}
        }
    }

    fn update_backdrop(&mut self, dt: f32) {
        for cloud in &mut self.backdrop {
            cloud.rect.pos.y -= cloud.speed * dt;
        }
        for i in 0..self.backdrop.len() {
            if self.backdrop[i].rect.bottom() < 0.0 {
                self.backdrop[i] = BackdropCloud::spawn(&mut self.rng);
            }
        }

        self.sway_x += SWAY_SPEED * self.sway_dir * dt;
        let center = SCREEN_WIDTH / 2.0;
        if (self.sway_x - center).abs() > SWAY_RANGE {
            self.sway_x = self.sway_x.clamp(center - SWAY_RANGE, center + SWAY_RANGE);
            self.sway_dir = -self.sway_dir;
        }
    }

    /// On for the first half of each `period`
    fn blink(&self, period: f32) -> bool {
        self.stage_clock % period < period / 2.0
    }

    fn draw(&self) -> Vec<DrawCommand> {
        match &self.stage {
            Stage::Title => {
                let clouds: Vec<Rect> = self.backdrop.iter().map(|c| c.rect).collect();
                render::title_screen(
                    &clouds,
                    self.sway_x,
                    self.blink(TITLE_BLINK_PERIOD),
                    self.leaderboard.title(),
                    &self.title_rows,
                )
            }
            Stage::SessionInfo { step, error } => {
                let (prompt, value) = match step {
                    EntryStep::Name => ("Enter your name:", self.name.value()),
                    EntryStep::Email => ("Enter your email:", self.email.value()),
                };
                let message = error.map(|e| e.to_string());
                render::session_info_screen(
                    prompt,
                    value,
                    self.blink(CURSOR_BLINK_PERIOD),
                    message.as_deref(),
                )
            }
            Stage::Round(round) => {
                let fps = self.show_fps.then_some(self.fps);
                render::round_screen(round, fps)
            }
            Stage::InterRound(result) => render::inter_round_screen(result),
            Stage::EndOfRound { summary, rows } => render::end_of_round_screen(
                summary,
                self.leaderboard.title(),
                rows,
                self.blink(SCORE_BLINK_PERIOD),
            ),
        }
    }
}
