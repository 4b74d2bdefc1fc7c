//! Crossterm events -> `InputEvent`
//!
//! Arrow keys steer, Enter confirms, Escape cancels, Ctrl+C / Ctrl+Q quit.
//! A left mouse button stands in for touch: press is a finger down at that
//! column, release lifts it. Terminals without key-release reporting only send
//! presses and repeats; the steering latch covers for that.

use std::io;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

use crate::input::{Direction, InputEvent};

/// Upper bound on events consumed per frame
pub const MAX_EVENTS_PER_FRAME: usize = 64;

fn direction(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Left => Some(Direction::Left),
        KeyCode::Right => Some(Direction::Right),
        _ => None,
    }
}

fn key(event: &KeyEvent) -> Option<InputEvent> {
    if event.kind == KeyEventKind::Release {
        return direction(event.code).map(InputEvent::Release);
    }

    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let repeat = event.kind == KeyEventKind::Repeat;
    match event.code {
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => Some(InputEvent::Quit),
        KeyCode::Enter if !repeat => Some(InputEvent::Confirm),
        KeyCode::Esc if !repeat => Some(InputEvent::Cancel),
        KeyCode::Backspace => Some(InputEvent::Backspace),
        KeyCode::Char(c) if !ctrl => Some(InputEvent::Char(c)),
        code => direction(code).map(InputEvent::Press),
    }
}

fn mouse(event: &MouseEvent, cols: u16) -> Option<InputEvent> {
    let x = if cols > 1 {
        (event.column as f32 / (cols - 1) as f32).clamp(0.0, 1.0)
    } else {
        0.5
    };
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left) => {
            Some(InputEvent::TouchDown { x })
        }
        MouseEventKind::Up(MouseButton::Left) => Some(InputEvent::TouchUp),
        _ => None,
    }
}

/// Map one terminal event; `cols` is the terminal width for touch position
pub fn normalize(event: &Event, cols: u16) -> Option<InputEvent> {
    match event {
        Event::Key(k) => key(k),
        Event::Mouse(m) => mouse(m, cols),
        _ => None,
    }
}

/// Collect pending events without blocking
///
/// Stops after `MAX_EVENTS_PER_FRAME` raw events; the rest wait for the next
/// frame.
pub fn drain(out: &mut Vec<InputEvent>, cols: u16) -> io::Result<()> {
    out.clear();
    for _ in 0..MAX_EVENTS_PER_FRAME {
        if !event::poll(Duration::ZERO)? {
            break;
        }
        if let Some(ev) = normalize(&event::read()?, cols) {
            out.push(ev);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn with_kind(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    fn click(kind: MouseEventKind, column: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row: 10,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_keys() {
        assert_eq!(normalize(&press(KeyCode::Enter), 80), Some(InputEvent::Confirm));
        assert_eq!(normalize(&press(KeyCode::Esc), 80), Some(InputEvent::Cancel));
        assert_eq!(
            normalize(&press(KeyCode::Left), 80),
            Some(InputEvent::Press(Direction::Left))
        );
        assert_eq!(normalize(&press(KeyCode::Char('x')), 80), Some(InputEvent::Char('x')));
        assert_eq!(normalize(&press(KeyCode::Backspace), 80), Some(InputEvent::Backspace));
        assert_eq!(normalize(&press(KeyCode::F(1)), 80), None);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let ev = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(normalize(&ev, 80), Some(InputEvent::Quit));
    }

    #[test]
    fn test_release_and_repeat() {
        assert_eq!(
            normalize(&with_kind(KeyCode::Right, KeyEventKind::Release), 80),
            Some(InputEvent::Release(Direction::Right))
        );
        assert_eq!(
            normalize(&with_kind(KeyCode::Right, KeyEventKind::Repeat), 80),
            Some(InputEvent::Press(Direction::Right))
        );
        // Holding Enter must not confirm twice
        assert_eq!(normalize(&with_kind(KeyCode::Enter, KeyEventKind::Repeat), 80), None);
        assert_eq!(normalize(&with_kind(KeyCode::Char('a'), KeyEventKind::Release), 80), None);
    }

    #[test]
    fn test_mouse_as_touch() {
        assert_eq!(
            normalize(&click(MouseEventKind::Down(MouseButton::Left), 0), 81),
            Some(InputEvent::TouchDown { x: 0.0 })
        );
        assert_eq!(
            normalize(&click(MouseEventKind::Drag(MouseButton::Left), 80), 81),
            Some(InputEvent::TouchDown { x: 1.0 })
        );
        assert_eq!(
            normalize(&click(MouseEventKind::Up(MouseButton::Left), 40), 81),
            Some(InputEvent::TouchUp)
        );
        assert_eq!(normalize(&click(MouseEventKind::Moved, 40), 81), None);
    }
}
