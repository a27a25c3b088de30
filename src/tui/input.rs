use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::screen::Screen;

/// What the navigator should do with a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRoute {
    /// Repeats/releases: dropped.
    Ignore,
    Quit,
    /// Pop the active screen.
    Back,
    /// Hand to the active screen.
    Forward,
}

/// Route a key event.
///
/// Order of operations:
/// 1) Ignore non-press events
/// 2) Keys the active screen claims go straight to it
/// 3) Global keys: Ctrl+C quits, Esc goes back
/// 4) Everything else is forwarded
pub fn route_key(key: &KeyEvent, active: &dyn Screen) -> KeyRoute {
    // Only process key presses; ignore repeats/releases to avoid accidental double actions.
    if key.kind != KeyEventKind::Press {
        return KeyRoute::Ignore;
    }

    if active.owns_key(key) {
        return KeyRoute::Forward;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => KeyRoute::Quit,
        (KeyCode::Esc, _) => KeyRoute::Back,
        _ => KeyRoute::Forward,
    }
}

/// Up/down (and j/k) movement over `len` items, wrapping at both ends.
/// Returns `None` if the key is not a movement key.
pub fn step_cursor(cursor: usize, len: usize, key: &KeyEvent) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match key.code {
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => Some((cursor + 1) % len),
        KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => Some((cursor + len - 1) % len),
        KeyCode::Home | KeyCode::Char('g') => Some(0),
        KeyCode::End | KeyCode::Char('G') => Some(len - 1),
        _ => None,
    }
}

pub fn is_select(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Enter | KeyCode::Char(' '))
}

pub fn is_char(key: &KeyEvent, c: char) -> bool {
    key.code == KeyCode::Char(c) && !key.modifiers.contains(KeyModifiers::CONTROL)
}

#[cfg(test)]
pub fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::command::Command;
    use crate::tui::message::Msg;
    use crate::tui::screen::Context;
    use crate::tui::theme::Theme;
    use crossterm::event::KeyEventState;
    use ratatui::{layout::Rect, Frame};

    struct Plain {
        owns_esc: bool,
    }

    impl Screen for Plain {
        fn update(&mut self, _msg: Msg, _ctx: &Context) -> Command {
            Command::none()
        }
        fn render(&self, _f: &mut Frame<'_>, _area: Rect, _ctx: &Context, _theme: &Theme) {}
        fn title(&self) -> String {
            "plain".into()
        }
        fn owns_key(&self, key: &KeyEvent) -> bool {
            self.owns_esc && key.code == KeyCode::Esc
        }
    }

    #[test]
    fn global_keys_unless_owned() {
        let plain = Plain { owns_esc: false };
        let owner = Plain { owns_esc: true };
        let esc = press(KeyCode::Esc);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);

        assert_eq!(route_key(&esc, &plain), KeyRoute::Back);
        assert_eq!(route_key(&esc, &owner), KeyRoute::Forward);
        assert_eq!(route_key(&ctrl_c, &plain), KeyRoute::Quit);
        assert_eq!(route_key(&press(KeyCode::Char('c')), &plain), KeyRoute::Forward);
    }

    #[test]
    fn releases_are_ignored() {
        let release = KeyEvent {
            code: KeyCode::Esc,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(route_key(&release, &Plain { owns_esc: false }), KeyRoute::Ignore);
    }

    #[test]
    fn cursor_wraps() {
        assert_eq!(step_cursor(2, 3, &press(KeyCode::Down)), Some(0));
        assert_eq!(step_cursor(0, 3, &press(KeyCode::Char('k'))), Some(2));
        assert_eq!(step_cursor(0, 0, &press(KeyCode::Down)), None);
        assert_eq!(step_cursor(1, 3, &press(KeyCode::Char('x'))), None);
    }
}
