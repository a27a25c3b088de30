//! One type per screen. Each is pushed with `Command::navigate` and leaves
//! by returning `Command::pop`.

pub mod app_confirm;
pub mod app_install;
pub mod app_list;
pub mod apps;
pub mod cleanup;
pub mod main_menu;
pub mod run;
pub mod script_menu;
pub mod scripts;
pub mod services;
pub mod sysinfo;
pub mod system_setup;
pub mod theme_picker;

use crossterm::event::KeyEvent;

use super::input::{is_select, step_cursor};
use super::view::MenuItem;

/// Vertical menu state shared by most screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub items: Vec<MenuItem>,
    pub cursor: usize,
}

pub enum MenuKey {
    Moved,
    Selected(usize),
    Unhandled,
}

impl Menu {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self { items, cursor: 0 }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> MenuKey {
        if let Some(next) = step_cursor(self.cursor, self.items.len(), key) {
            self.cursor = next;
            return MenuKey::Moved;
        }
        if is_select(key) && self.cursor < self.items.len() {
            return MenuKey::Selected(self.cursor);
        }
        MenuKey::Unhandled
    }

    /// Swap items, keeping the cursor in range.
    pub fn set_items(&mut self, items: Vec<MenuItem>) {
        self.items = items;
        self.cursor = self.cursor.min(self.items.len().saturating_sub(1));
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::distro::{DistroFamily, DistroInfo};
    use crate::tui::screen::{Context, Screen};
    use crate::tui::theme::Theme;
    use ratatui::{backend::TestBackend, Terminal};

    pub fn ctx() -> Context {
        Context::new(
            DistroInfo {
                family: DistroFamily::Arch,
                name: "Arch Linux".into(),
            },
            "/opt/mypctools".into(),
            Default::default(),
        )
    }

    /// Render a screen into an 80x24 buffer and return its text.
    pub fn render_text(screen: &dyn Screen, ctx: &Context) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let theme = Theme::default();
        terminal
            .draw(|f| {
                let area = f.size();
                screen.render(f, area, ctx, &theme)
            })
            .unwrap();
        let buf = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf.get(x, y).symbol.as_str());
            }
            out.push('\n');
        }
        out
    }
}
