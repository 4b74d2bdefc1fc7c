//! Draw-command generation
//!
//! Each screen is turned into a flat list of `DrawCommand`s in logical
//! coordinates (800 x 1250, origin top-left). Whatever paints the frame only
//! has to scale and rasterize them.

use glam::Vec2;

use crate::consts::{LIVES, PLAYER_HEIGHT, PLAYER_WIDTH, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::leaderboard::{LeaderboardRow, display_name};
use crate::session::SessionSummary;
use crate::sim::{CloudTier, Rect, RoundController, RoundResult};

/// Fixed palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    SkyBlue,
    White,
    Black,
    Grey,
    DarkRed,
    Orange,
    DarkBlue,
    DarkGreen,
}

impl Color {
    pub const fn rgb(self) -> [u8; 3] {
        match self {
            Color::SkyBlue => [135, 206, 235],
            Color::White => [255, 255, 255],
            Color::Black => [0, 0, 0],
            Color::Grey => [100, 100, 100],
            Color::DarkRed => [139, 0, 0],
            Color::Orange => [255, 165, 0],
            Color::DarkBlue => [0, 0, 139],
            Color::DarkGreen => [0, 100, 0],
        }
    }
}

/// Colour of a cloud's point label
pub fn tier_color(tier: CloudTier) -> Color {
    match tier {
        CloudTier::Low => Color::DarkBlue,
        CloudTier::Medium => Color::DarkGreen,
        CloudTier::High => Color::DarkRed,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Title,
    Heading,
    Body,
    Small,
    Hud,
}

impl TextSize {
    /// Nominal glyph height in logical pixels
    pub fn px(self) -> f32 {
        match self {
            TextSize::Title => 144.0,
            TextSize::Heading => 50.0,
            TextSize::Body => 36.0,
            TextSize::Small => 27.0,
            TextSize::Hud => 20.0,
        }
    }

    /// Rough advance width for `text`
    pub fn width_of(self, text: &str) -> f32 {
        text.chars().count() as f32 * self.px() * 0.5
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// `pos` is the top-left corner
    Left,
    /// `pos` is the centre
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    /// Translucent filled box
    Panel { rect: Rect, color: Color, alpha: u8 },
    Outline { rect: Rect, color: Color },
    Line { from: Vec2, to: Vec2, color: Color },
    Text {
        text: String,
        pos: Vec2,
        size: TextSize,
        color: Color,
        align: Align,
    },
    /// Tilt in degrees, positive leans left
    Skydiver { rect: Rect, tilt: f32 },
    /// `tier` is None for decorative clouds
    Cloud { rect: Rect, tier: Option<CloudTier> },
    Helicopter {
        rect: Rect,
        facing_right: bool,
        exploded: bool,
        /// 0-255
        opacity: u8,
    },
    Heart { rect: Rect, full: bool },
}

fn text(out: &mut Vec<DrawCommand>, s: impl Into<String>, pos: Vec2, size: TextSize, color: Color, align: Align) {
    out.push(DrawCommand::Text {
        text: s.into(),
        pos,
        size,
        color,
        align,
    });
}

fn centered(out: &mut Vec<DrawCommand>, s: impl Into<String>, y: f32, size: TextSize, color: Color) {
    text(out, s, Vec2::new(SCREEN_WIDTH / 2.0, y), size, color, Align::Center);
}

// Leaderboard table layout
const BOARD_WIDTH: f32 = SCREEN_WIDTH - 100.0;
const BOARD_HEIGHT: f32 = 400.0;
const BOARD_TOP: f32 = SCREEN_HEIGHT - BOARD_HEIGHT - 250.0;
const BOARD_ALPHA: u8 = 40;
const BOARD_LINE_HEIGHT: f32 = 35.0;
const RANK_X: f32 = 100.0;
const NAME_X: f32 = 160.0;
const SCORE_X: f32 = 650.0;

/// Translucent box with heading and up to eight rows
///
/// Rows for which `hot` returns true are drawn in red.
fn leaderboard_table(
    out: &mut Vec<DrawCommand>,
    title: &str,
    rows: &[LeaderboardRow],
    hot: &dyn Fn(&LeaderboardRow) -> bool,
) {
    out.push(DrawCommand::Panel {
        rect: Rect::new((SCREEN_WIDTH - BOARD_WIDTH) / 2.0, BOARD_TOP, BOARD_WIDTH, BOARD_HEIGHT),
        color: Color::Black,
        alpha: BOARD_ALPHA,
    });
    centered(out, title, BOARD_TOP + 50.0, TextSize::Heading, Color::White);

    let start_y = BOARD_TOP + 90.0;
    for (i, row) in rows.iter().enumerate() {
        let y = start_y + i as f32 * BOARD_LINE_HEIGHT;
        let Some(score) = row.score else {
            // Promotional text line
            text(out, row.name.as_str(), Vec2::new(RANK_X, y), TextSize::Small, Color::White, Align::Left);
            continue;
        };
        let color = if hot(row) { Color::DarkRed } else { Color::White };
        text(out, format!("{}.", i + 1), Vec2::new(RANK_X, y), TextSize::Small, color, Align::Left);
        text(out, display_name(&row.name), Vec2::new(NAME_X, y), TextSize::Small, color, Align::Left);
        text(out, score.to_string(), Vec2::new(SCORE_X, y), TextSize::Small, color, Align::Left);
    }
}

fn background_clouds(out: &mut Vec<DrawCommand>, clouds: &[Rect]) {
    out.extend(
        clouds
            .iter()
            .map(|&rect| DrawCommand::Cloud { rect, tier: None }),
    );
}

/// Title screen: name, swaying skydiver, blinking prompt, leaderboard
pub fn title_screen(
    clouds: &[Rect],
    skydiver_x: f32,
    prompt_visible: bool,
    board_title: &str,
    rows: &[LeaderboardRow],
) -> Vec<DrawCommand> {
    let mut out = vec![DrawCommand::Clear(Color::SkyBlue)];
    background_clouds(&mut out, clouds);

    centered(&mut out, "SKYFALL", 200.0, TextSize::Title, Color::White);
    out.push(DrawCommand::Skydiver {
        rect: Rect::new(skydiver_x - PLAYER_WIDTH / 2.0, 350.0, PLAYER_WIDTH, PLAYER_HEIGHT),
        tilt: 0.0,
    });
    if prompt_visible {
        centered(&mut out, "Press ENTER or TOUCH to play", 550.0, TextSize::Body, Color::DarkRed);
    }

    leaderboard_table(&mut out, board_title, rows, &|_| false);
    out
}

// Text entry layout
const INPUT_WIDTH: f32 = 500.0;
const INPUT_HEIGHT: f32 = 60.0;
const INPUT_PROMPT_Y: f32 = SCREEN_HEIGHT / 3.0;

/// Name / email capture
pub fn session_info_screen(
    prompt: &str,
    value: &str,
    cursor_visible: bool,
    error: Option<&str>,
) -> Vec<DrawCommand> {
    let mut out = vec![DrawCommand::Clear(Color::SkyBlue)];
    centered(&mut out, prompt, INPUT_PROMPT_Y, TextSize::Body, Color::Black);

    let field = Rect::new(
        (SCREEN_WIDTH - INPUT_WIDTH) / 2.0,
        INPUT_PROMPT_Y + 50.0,
        INPUT_WIDTH,
        INPUT_HEIGHT,
    );
    out.push(DrawCommand::Outline {
        rect: field,
        color: Color::Black,
    });
    let text_pos = field.pos + Vec2::new(10.0, 5.0);
    text(&mut out, value, text_pos, TextSize::Small, Color::Black, Align::Left);

    if cursor_visible {
        let x = text_pos.x + TextSize::Small.width_of(value) + 2.0;
        out.push(DrawCommand::Line {
            from: Vec2::new(x, field.top() + 5.0),
            to: Vec2::new(x, field.top() + 45.0),
            color: Color::Black,
        });
    }

    if let Some(message) = error {
        centered(&mut out, message, INPUT_PROMPT_Y + 120.0, TextSize::Hud, Color::DarkRed);
    }
    out
}

// HUD layout
const HUD_RECT: Rect = Rect {
    pos: Vec2::new(10.0, 10.0),
    size: Vec2::new(250.0, 110.0),
};
const HUD_ALPHA: u8 = 100;
const HUD_LINE_HEIGHT: f32 = 28.0;
const HEART_SIZE: f32 = 50.0;
const HEART_PADDING: f32 = 20.0;
const HEART_SPACING: f32 = 60.0;

/// Entities of a running round, in paint order
pub fn round_entities(round: &RoundController) -> Vec<DrawCommand> {
    let mut out = Vec::with_capacity(round.clouds.len() + round.helicopters.len() + 1);
    out.extend(round.clouds.iter().map(|c| DrawCommand::Cloud {
        rect: c.bounds(),
        tier: Some(c.tier),
    }));
    out.extend(round.helicopters.iter().map(|h| DrawCommand::Helicopter {
        rect: h.bounds(),
        facing_right: h.direction > 0.0,
        exploded: h.exploded,
        opacity: h.opacity.clamp(0.0, 255.0).round() as u8,
    }));
    out.push(DrawCommand::Skydiver {
        rect: round.player.bounds(),
        tilt: round.player.tilt,
    });
    out
}

fn hud(out: &mut Vec<DrawCommand>, round: &RoundController) {
    out.push(DrawCommand::Panel {
        rect: HUD_RECT,
        color: Color::Black,
        alpha: HUD_ALPHA,
    });
    out.push(DrawCommand::Outline {
        rect: HUD_RECT,
        color: Color::Black,
    });

    let state = &round.state;
    let lines = [
        format!("Time: {} s", state.elapsed as u32),
        format!("Cloud Points: {}", state.cloud_points),
        format!("Speed: {} ft/s", state.difficulty as u32),
    ];
    for (i, line) in lines.into_iter().enumerate() {
        let pos = Vec2::new(20.0, 20.0 + i as f32 * HUD_LINE_HEIGHT);
        text(out, line, pos, TextSize::Hud, Color::White, Align::Left);
    }

    for i in 0..LIVES {
        let x = SCREEN_WIDTH - HEART_PADDING - i as f32 * HEART_SPACING - HEART_SIZE;
        out.push(DrawCommand::Heart {
            rect: Rect::new(x, 10.0, HEART_SIZE, HEART_SIZE),
            full: i < state.lives,
        });
    }
}

/// A full round frame: sky, entities, HUD, lives and optional FPS
pub fn round_screen(round: &RoundController, fps: Option<u32>) -> Vec<DrawCommand> {
    let mut out = vec![DrawCommand::Clear(Color::SkyBlue)];
    out.extend(round.render());
    hud(&mut out, round);
    if let Some(fps) = fps {
        text(
            &mut out,
            format!("{} fps", fps),
            Vec2::new(SCREEN_WIDTH - 100.0, 70.0),
            TextSize::Hud,
            Color::White,
            Align::Left,
        );
    }
    out
}

/// Between lives
pub fn inter_round_screen(result: &RoundResult) -> Vec<DrawCommand> {
    let mut out = vec![DrawCommand::Clear(Color::SkyBlue)];
    let lines = [
        (format!("Score: {}", result.score), 200.0),
        (format!("Time Alive: {} seconds", result.time_survived.round() as u32), 300.0),
        (format!("Cloud Points: {}", result.cloud_points), 380.0),
        (format!("Max Speed: {} ft/s", result.max_speed.round() as u32), 460.0),
    ];
    for (line, y) in lines {
        centered(&mut out, line, y, TextSize::Body, Color::Black);
    }
    centered(
        &mut out,
        "Press ENTER or TOUCH to continue",
        SCREEN_HEIGHT - 200.0,
        TextSize::Body,
        Color::DarkRed,
    );
    out
}

/// Session results with the leaderboard
///
/// This session's rows blink red while `blink_on`.
pub fn end_of_round_screen(
    summary: &SessionSummary,
    board_title: &str,
    rows: &[LeaderboardRow],
    blink_on: bool,
) -> Vec<DrawCommand> {
    let mut out = vec![DrawCommand::Clear(Color::SkyBlue)];

    if summary.is_top_score {
        centered(&mut out, "High Score!", 200.0, TextSize::Heading, Color::Orange);
    } else {
        centered(&mut out, "End of Round", 200.0, TextSize::Body, Color::Black);
    }

    centered(&mut out, "Your Scores:", 300.0, TextSize::Body, Color::Black);
    for (i, score) in summary.sorted_scores().iter().enumerate() {
        centered(
            &mut out,
            format!("Score {}: {}", i + 1, score),
            360.0 + i as f32 * 60.0,
            TextSize::Body,
            Color::Black,
        );
    }

    leaderboard_table(&mut out, board_title, rows, &|row| blink_on && summary.owns_row(row));

    if !summary.is_top_score {
        if let Some(rank) = summary.rank_in(rows) {
            centered(
                &mut out,
                format!("You are ranked {} with a score of {}", rank, summary.best()),
                SCREEN_HEIGHT - 170.0,
                TextSize::Small,
                Color::DarkRed,
            );
        }
    }

    centered(
        &mut out,
        "Press ENTER or TOUCH to restart",
        SCREEN_HEIGHT - 120.0,
        TextSize::Body,
        Color::Black,
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Identity;
    use crate::sim::{Cloud, Helicopter, Screen};
    use crate::tuning::Tuning;

    fn texts(cmds: &[DrawCommand]) -> Vec<&str> {
        cmds.iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn summary(scores: [u32; 3], top: bool) -> SessionSummary {
        SessionSummary {
            identity: Identity::new("Alice", "alice@example.com"),
            scores,
            session_start: 0.0,
            session_end: 1.0,
            display_name: Some("Alice".into()),
            is_top_score: top,
        }
    }

    fn row(name: &str, score: u32) -> LeaderboardRow {
        LeaderboardRow {
            name: name.into(),
            score: Some(score),
            session_end: Some(1.0),
        }
    }

    #[test]
    fn test_round_screen_lists_entities_and_hearts() {
        let mut round = RoundController::new(Screen::default(), &Tuning::default(), 2);
        round.clouds.push(Cloud::new(1, CloudTier::Medium, Vec2::new(10.0, 500.0), 200.0));
        let mut heli = Helicopter::new(2, Vec2::new(300.0, 900.0), 200.0, 60.0, -1.0);
        heli.explode();
        heli.opacity = 100.4;
        round.helicopters.push(heli);

        let cmds = round_screen(&round, None);
        assert_eq!(cmds[0], DrawCommand::Clear(Color::SkyBlue));
        // Entities come straight from the controller, right after the clear
        let entities = round.render();
        assert_eq!(entities.len(), 3);
        assert_eq!(&cmds[1..=entities.len()], entities.as_slice());
        assert!(cmds.iter().any(|c| matches!(c, DrawCommand::Cloud { tier: Some(CloudTier::Medium), .. })));
        assert!(cmds.iter().any(|c| matches!(
            c,
            DrawCommand::Helicopter { facing_right: false, exploded: true, opacity: 100, .. }
        )));
        let full = cmds
            .iter()
            .filter(|c| matches!(c, DrawCommand::Heart { full: true, .. }))
            .count();
        let empty = cmds
            .iter()
            .filter(|c| matches!(c, DrawCommand::Heart { full: false, .. }))
            .count();
        assert_eq!((full, empty), (2, 1));
        assert!(texts(&cmds).contains(&"Speed: 200 ft/s"));
        assert!(!texts(&cmds).iter().any(|t| t.ends_with("fps")));
    }

    #[test]
    fn test_inter_round_rounds_values() {
        let result = RoundResult::new(&Tuning::default(), 12.6, 15, 389.5);
        let screen = inter_round_screen(&result);
        let lines = texts(&screen);
        assert!(lines.contains(&"Score: 141"));
        assert!(lines.contains(&"Time Alive: 13 seconds"));
        assert!(lines.contains(&"Max Speed: 390 ft/s"));
    }

    #[test]
    fn test_end_of_round_banner_and_rank() {
        let rows = vec![row("Bobby", 900), row("Alice", 500), row("Alice", 100)];
        let cmds = end_of_round_screen(&summary([100, 500, 40], false), "High Scores", &rows, true);
        let lines = texts(&cmds);
        assert!(lines.contains(&"End of Round"));
        assert!(lines.contains(&"Score 1: 500"));
        assert!(lines.contains(&"Score 3: 40"));
        assert!(lines.contains(&"You are ranked 2 with a score of 500"));

        // Session rows blink red, others stay white
        let red_names: Vec<&str> = cmds
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, color: Color::DarkRed, pos, .. } if pos.x == NAME_X => {
                    Some(text.as_str())
                }
                _ => None,
            })
            .collect();
        assert_eq!(red_names, vec!["Alice", "Alice"]);

        let off = end_of_round_screen(&summary([100, 500, 40], false), "High Scores", &rows, false);
        assert!(!off.iter().any(|c| matches!(
            c,
            DrawCommand::Text { color: Color::DarkRed, pos, .. } if pos.x == NAME_X
        )));
    }

    #[test]
    fn test_top_score_hides_rank_line() {
        let rows = vec![row("Alice", 500)];
        let screen = end_of_round_screen(&summary([500, 1, 2], true), "High Scores", &rows, true);
        let lines = texts(&screen);
        assert!(lines.contains(&"High Score!"));
        assert!(!lines.iter().any(|l| l.starts_with("You are ranked")));
    }

    #[test]
    fn test_promo_rows_have_no_rank() {
        let rows = vec![LeaderboardRow::text("See you there!")];
        let screen = title_screen(&[], 400.0, false, "Promo", &rows);
        let lines = texts(&screen);
        assert!(lines.contains(&"See you there!"));
        assert!(!lines.contains(&"1."));
        assert!(!lines.iter().any(|l| l.starts_with("Press ENTER")));
    }

    #[test]
    fn test_long_names_shortened_in_table() {
        let long = "A".repeat(30);
        let rows = vec![row(&long, 10)];
        let cmds = title_screen(&[], 400.0, true, "High Scores", &rows);
        let expected = format!("{}...", "A".repeat(23));
        assert!(texts(&cmds).contains(&expected.as_str()));
    }

    #[test]
    fn test_session_info_cursor_and_error() {
        let cmds = session_info_screen("Enter your name:", "Bob", true, Some("Name must be at least 4 characters."));
        assert!(cmds.iter().any(|c| matches!(c, DrawCommand::Line { .. })));
        assert!(texts(&cmds).contains(&"Name must be at least 4 characters."));
        let hidden = session_info_screen("Enter your name:", "Bob", false, None);
        assert!(!hidden.iter().any(|c| matches!(c, DrawCommand::Line { .. })));
    }
}
