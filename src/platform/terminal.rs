//! Terminal painter
//!
//! Rasterizes a frame's draw commands onto a character grid scaled from the
//! logical screen, then writes the grid with crossterm. Composing into a
//! buffer first keeps each frame to one flush.

use std::io::Write;

use crossterm::{
    QueueableCommand, cursor,
    style::{self, Print},
    terminal,
};
use glam::Vec2;

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::render::{Align, Color, DrawCommand, TextSize, tier_color};
use crate::sim::Rect;

/// Tilt (degrees) past which the skydiver glyph leans
const LEAN_DEGREES: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: [u8; 3],
    pub bg: [u8; 3],
}

impl Cell {
    fn blank(bg: [u8; 3]) -> Self {
        Self {
            ch: ' ',
            fg: Color::Black.rgb(),
            bg,
        }
    }
}

fn blend(under: [u8; 3], over: [u8; 3], alpha: u8) -> [u8; 3] {
    let a = alpha as u16;
    let mix = |u: u8, o: u8| ((u as u16 * (255 - a) + o as u16 * a) / 255) as u8;
    [
        mix(under[0], over[0]),
        mix(under[1], over[1]),
        mix(under[2], over[2]),
    ]
}

/// Character grid in terminal cells
#[derive(Debug, Clone)]
pub struct Canvas {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::blank(Color::SkyBlue.rgb()); cols as usize * rows as usize],
        }
    }

    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    pub fn cell(&self, col: u16, row: u16) -> Option<&Cell> {
        if col < self.cols && row < self.rows {
            self.cells.get(row as usize * self.cols as usize + col as usize)
        } else {
            None
        }
    }

    fn cell_mut(&mut self, col: i32, row: i32) -> Option<&mut Cell> {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return None;
        }
        self.cells
            .get_mut(row as usize * self.cols as usize + col as usize)
    }

    /// Logical point -> cell coordinates (may be off-grid)
    fn to_cell(&self, p: Vec2) -> (i32, i32) {
        let col = (p.x / SCREEN_WIDTH * self.cols as f32).floor() as i32;
        let row = (p.y / SCREEN_HEIGHT * self.rows as f32).floor() as i32;
        (col, row)
    }

    /// Cells covered by a logical rect, at least one cell each way
    fn span(&self, rect: &Rect) -> (i32, i32, i32, i32) {
        let (c0, r0) = self.to_cell(rect.pos);
        let (c1, r1) = self.to_cell(rect.pos + rect.size);
        (c0, r0, c1.max(c0 + 1), r1.max(r0 + 1))
    }

    fn put(&mut self, col: i32, row: i32, ch: char, fg: [u8; 3]) {
        if let Some(cell) = self.cell_mut(col, row) {
            cell.ch = ch;
            cell.fg = fg;
        }
    }

    fn put_str(&mut self, col: i32, row: i32, s: &str, fg: [u8; 3]) {
        for (i, ch) in s.chars().enumerate() {
            self.put(col + i as i32, row, ch, fg);
        }
    }

    /// Text centred on a cell column
    fn put_centered(&mut self, center_col: i32, row: i32, s: &str, fg: [u8; 3]) {
        let len = s.chars().count() as i32;
        self.put_str(center_col - len / 2, row, s, fg);
    }

    fn fill(&mut self, rect: &Rect, bg: [u8; 3], alpha: u8) {
        let (c0, r0, c1, r1) = self.span(rect);
        for row in r0..r1 {
            for col in c0..c1 {
                if let Some(cell) = self.cell_mut(col, row) {
                    cell.bg = blend(cell.bg, bg, alpha);
                }
            }
        }
    }

    pub fn draw(&mut self, cmd: &DrawCommand) {
        match cmd {
            DrawCommand::Clear(color) => {
                let bg = color.rgb();
                self.cells.fill(Cell::blank(bg));
            }
            DrawCommand::Panel { rect, color, alpha } => self.fill(rect, color.rgb(), *alpha),
            DrawCommand::Outline { rect, color } => {
                let (c0, r0, c1, r1) = self.span(rect);
                let fg = color.rgb();
                for col in c0..c1 {
                    self.put(col, r0, '─', fg);
                    self.put(col, r1 - 1, '─', fg);
                }
                for row in r0..r1 {
                    self.put(c0, row, '│', fg);
                    self.put(c1 - 1, row, '│', fg);
                }
                self.put(c0, r0, '┌', fg);
                self.put(c1 - 1, r0, '┐', fg);
                self.put(c0, r1 - 1, '└', fg);
                self.put(c1 - 1, r1 - 1, '┘', fg);
            }
            DrawCommand::Line { from, to, color } => {
                let (c0, r0) = self.to_cell(*from);
                let (c1, r1) = self.to_cell(*to);
                let ch = if c0 == c1 { '│' } else if r0 == r1 { '─' } else { '·' };
                let steps = (c1 - c0).abs().max((r1 - r0).abs()).max(1);
                for i in 0..=steps {
                    let col = c0 + (c1 - c0) * i / steps;
                    let row = r0 + (r1 - r0) * i / steps;
                    self.put(col, row, ch, color.rgb());
                }
            }
            DrawCommand::Text {
                text,
                pos,
                size,
                color,
                align,
            } => {
                let shown = if *size == TextSize::Title {
                    // Letter-spaced to read as a banner
                    text.chars().map(|c| c.to_string()).collect::<Vec<_>>().join(" ")
                } else {
                    text.clone()
                };
                let (col, row) = self.to_cell(*pos);
                match align {
                    Align::Left => self.put_str(col, row, &shown, color.rgb()),
                    Align::Center => self.put_centered(col, row, &shown, color.rgb()),
                }
            }
            DrawCommand::Skydiver { rect, tilt } => {
                let glyph = if *tilt > LEAN_DEGREES {
                    "/o/"
                } else if *tilt < -LEAN_DEGREES {
                    "\\o\\"
                } else {
                    "\\o/"
                };
                let (c0, r0, c1, r1) = self.span(rect);
                let mid = (c0 + c1) / 2;
                let fg = Color::Black.rgb();
                self.put_centered(mid, r0, glyph, fg);
                if r1 - r0 > 1 {
                    self.put_centered(mid, r0 + 1, "/ \\", fg);
                }
            }
            DrawCommand::Cloud { rect, tier } => {
                self.fill(rect, Color::White.rgb(), 230);
                if let Some(tier) = tier {
                    let (c0, r0, c1, r1) = self.span(rect);
                    let label = tier.points().to_string();
                    self.put_centered((c0 + c1) / 2, (r0 + r1 - 1) / 2, &label, tier_color(*tier).rgb());
                }
            }
            DrawCommand::Helicopter {
                rect,
                facing_right,
                exploded,
                opacity,
            } => {
                let (c0, r0, c1, _) = self.span(rect);
                let mid = (c0 + c1) / 2;
                if *exploded {
                    let glyph = if *opacity > 128 { "*#*" } else { ". ." };
                    self.put_centered(mid, r0, glyph, Color::Orange.rgb());
                } else {
                    let body = if *facing_right { "-=[]>" } else { "<[]=-" };
                    self.put_centered(mid, r0, "~~+~~", Color::Grey.rgb());
                    self.put_centered(mid, r0 + 1, body, Color::Black.rgb());
                }
            }
            DrawCommand::Heart { rect, full } => {
                let (c0, r0, c1, _) = self.span(rect);
                let (ch, color) = if *full {
                    ('♥', Color::DarkRed)
                } else {
                    ('♡', Color::Grey)
                };
                self.put((c0 + c1) / 2, r0, ch, color.rgb());
            }
        }
    }

    /// Queue the whole grid to `out`
    pub fn flush<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let mut current: Option<([u8; 3], [u8; 3])> = None;
        for row in 0..self.rows {
            out.queue(cursor::MoveTo(0, row))?;
            for col in 0..self.cols {
                let Some(cell) = self.cell(col, row) else {
                    continue;
                };
                if current != Some((cell.fg, cell.bg)) {
                    let [r, g, b] = cell.fg;
                    out.queue(style::SetForegroundColor(style::Color::Rgb { r, g, b }))?;
                    let [r, g, b] = cell.bg;
                    out.queue(style::SetBackgroundColor(style::Color::Rgb { r, g, b }))?;
                    current = Some((cell.fg, cell.bg));
                }
                out.queue(Print(cell.ch))?;
            }
        }
        out.queue(style::ResetColor)?;
        out.flush()
    }
}

/// Paints frames to the terminal, tracking its size
#[derive(Debug)]
pub struct TerminalPainter {
    canvas: Canvas,
}

impl TerminalPainter {
    pub fn new() -> std::io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Self {
            canvas: Canvas::new(cols, rows),
        })
    }

    pub fn cols(&self) -> u16 {
        self.canvas.cols
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        if self.canvas.size() != (cols, rows) {
            log::debug!("Terminal resized to {}x{}", cols, rows);
            self.canvas = Canvas::new(cols, rows);
        }
    }

    pub fn paint<W: Write>(&mut self, out: &mut W, commands: &[DrawCommand]) -> std::io::Result<()> {
        for cmd in commands {
            self.canvas.draw(cmd);
        }
        self.canvas.flush(out)
    }
}
