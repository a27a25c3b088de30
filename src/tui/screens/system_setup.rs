use ratatui::{layout::Rect, Frame};

use super::cleanup::CleanupScreen;
use super::run::RunScreen;
use super::services::ServicesMenu;
use super::sysinfo::SysInfoScreen;
use super::theme_picker::ThemePicker;
use super::{Menu, MenuKey};
use crate::system;
use crate::tui::command::Command;
use crate::tui::message::Msg;
use crate::tui::screen::{Context, Hint, Screen};
use crate::tui::theme::Theme;
use crate::tui::view::{render_menu, MenuItem};

const ENTRIES: [(&str, &str); 6] = [
    ("Full System Update", "upgrade every installed package"),
    ("System Cleanup", "remove orphans, clear caches"),
    ("Service Manager", "systemd units"),
    ("System Info", "hardware and OS overview"),
    ("Theme", "change colours"),
    ("Back", ""),
];

pub struct SystemSetup {
    menu: Menu,
}

impl SystemSetup {
    pub fn new() -> Self {
        let items = ENTRIES
            .iter()
            .map(|(label, detail)| {
                if detail.is_empty() {
                    MenuItem::new(*label)
                } else {
                    MenuItem::new(*label).with_detail(*detail)
                }
            })
            .collect();
        Self {
            menu: Menu::new(items),
        }
    }

    fn activate(&self, idx: usize, ctx: &Context) -> Command {
        match idx {
            0 => Command::navigate(RunScreen::maybe(
                "Full System Update",
                "Updating system",
                system::update_spec(ctx.distro.family),
                format!("no update command for {}", ctx.distro.name),
            )),
            1 => Command::navigate(CleanupScreen::new()),
            2 => Command::navigate(ServicesMenu::new()),
            3 => Command::navigate(SysInfoScreen::new()),
            4 => Command::navigate(ThemePicker::new(ctx.palette)),
            _ => Command::pop(),
        }
    }
}

impl Default for SystemSetup {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for SystemSetup {
    fn update(&mut self, msg: Msg, ctx: &Context) -> Command {
        let Msg::Key(key) = msg else {
            return Command::none();
        };
        match self.menu.handle_key(&key) {
            MenuKey::Selected(i) => self.activate(i, ctx),
            _ => Command::none(),
        }
    }

    fn render(&self, f: &mut Frame<'_>, area: Rect, ctx: &Context, theme: &Theme) {
        let heading = format!("{} maintenance", ctx.distro.name);
        render_menu(f, area, &heading, &self.menu.items, self.menu.cursor, theme);
    }

    fn title(&self) -> String {
        "System Setup".to_string()
    }

    fn short_help(&self) -> Vec<Hint> {
        vec![Hint::new("j/k", "navigate"), Hint::new("enter", "select")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::input::press;
    use crate::tui::screens::testing::ctx;
    use crossterm::event::KeyCode;

    fn select(screen: &mut SystemSetup, idx: usize, ctx: &Context) -> Command {
        screen.menu.cursor = idx;
        screen.update(Msg::Key(press(KeyCode::Enter)), ctx)
    }

    fn title_of(cmd: Command) -> Option<String> {
        match cmd {
            Command::Message(Msg::Navigate(s)) => Some(s.title()),
            _ => None,
        }
    }

    #[test]
    fn entries_open_their_screens() {
        let ctx = ctx();
        let mut screen = SystemSetup::new();
        assert_eq!(title_of(select(&mut screen, 0, &ctx)).as_deref(), Some("Full System Update"));
        assert_eq!(title_of(select(&mut screen, 1, &ctx)).as_deref(), Some("System Cleanup"));
        assert_eq!(title_of(select(&mut screen, 2, &ctx)).as_deref(), Some("Services"));
        assert_eq!(title_of(select(&mut screen, 3, &ctx)).as_deref(), Some("System Info"));
        assert_eq!(title_of(select(&mut screen, 4, &ctx)).as_deref(), Some("Theme"));
        assert!(matches!(select(&mut screen, 5, &ctx), Command::Message(Msg::Pop)));
    }
}
