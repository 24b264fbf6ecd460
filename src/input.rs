//! Terminal events to game commands.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};

use crate::config::Rules;
use crate::render::overlay_band;
use crate::session::Status;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Jump,
    Reset,
    Quit,
    Resize(u16, u16),
    None,
}

/// Maps one event given the current status and terminal size (columns, rows).
pub fn map_event(event: &Event, status: Status, rules: &Rules, size: (u16, u16)) -> Command {
    match event {
        Event::Key(key) => map_key(key),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => match status {
                Status::Playing => Command::Jump,
                Status::GameOver if in_overlay(mouse.row, rules, size.1) => Command::Reset,
                Status::GameOver => Command::None,
            },
            _ => Command::None,
        },
        Event::Resize(cols, rows) => Command::Resize(*cols, *rows),
        _ => Command::None,
    }
}

fn map_key(key: &KeyEvent) -> Command {
    if key.kind == KeyEventKind::Release {
        return Command::None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Command::Quit,
        KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Char('k') => Command::Jump,
        KeyCode::Enter | KeyCode::Char('r') => Command::Reset,
        _ => Command::None,
    }
}

fn in_overlay(row: u16, rules: &Rules, rows: u16) -> bool {
    if rows == 0 {
        return false;
    }
    // Each terminal row is two pixels; map the row's midpoint back into world space.
    let world_y = (row as i64 * 2 + 1) * rules.game_height as i64 / (rows as i64 * 2);
    let (top, bottom) = overlay_band(rules);
    (top as i64..=bottom as i64).contains(&world_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseEvent};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn click(row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 10,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    const SIZE: (u16, u16) = (80, 45);

    #[test]
    fn test_jump_keys() {
        let rules = Rules::default();
        for code in [KeyCode::Char(' '), KeyCode::Up, KeyCode::Char('k')] {
            assert_eq!(map_event(&key(code), Status::Playing, &rules, SIZE), Command::Jump);
        }
    }

    #[test]
    fn test_key_release_ignored() {
        let rules = Rules::default();
        let release = Event::Key(KeyEvent {
            code: KeyCode::Char(' '),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(map_event(&release, Status::Playing, &rules, SIZE), Command::None);
    }

    #[test]
    fn test_quit_keys() {
        let rules = Rules::default();
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(map_event(&ctrl_c, Status::Playing, &rules, SIZE), Command::Quit);
        assert_eq!(map_event(&key(KeyCode::Esc), Status::GameOver, &rules, SIZE), Command::Quit);
        assert_eq!(map_event(&key(KeyCode::Char('c')), Status::Playing, &rules, SIZE), Command::None);
    }

    #[test]
    fn test_click_jumps_while_playing() {
        let rules = Rules::default();
        assert_eq!(map_event(&click(3), Status::Playing, &rules, SIZE), Command::Jump);
    }

    #[test]
    fn test_click_on_overlay_resets() {
        let rules = Rules::default();
        // 45 rows = 90 px for 900 world px; overlay 402..=498 sits around rows 20..24
        assert_eq!(map_event(&click(22), Status::GameOver, &rules, SIZE), Command::Reset);
        assert_eq!(map_event(&click(3), Status::GameOver, &rules, SIZE), Command::None);
        assert_eq!(map_event(&click(40), Status::GameOver, &rules, SIZE), Command::None);
    }

    #[test]
    fn test_resize_passthrough() {
        let rules = Rules::default();
        assert_eq!(
            map_event(&Event::Resize(100, 30), Status::Playing, &rules, SIZE),
            Command::Resize(100, 30)
        );
    }
}
