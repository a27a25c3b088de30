use ratatui::{layout::Rect, Frame};

use super::script_menu::ScriptMenu;
use super::{Menu, MenuKey};
use crate::bundle::{self, Bundle};
use crate::tui::command::Command;
use crate::tui::message::Msg;
use crate::tui::screen::{Context, Hint, Screen};
use crate::tui::theme::Theme;
use crate::tui::view::{render_menu, MenuItem};

/// Lists the script bundles shipped with the repository.
pub struct ScriptsScreen {
    bundles: &'static [Bundle],
    menu: Menu,
}

impl ScriptsScreen {
    pub fn new() -> Self {
        let bundles = bundle::all();
        Self {
            bundles,
            menu: Menu::new(items(bundles, &vec![false; bundles.len()])),
        }
    }
}

impl Default for ScriptsScreen {
    fn default() -> Self {
        Self::new()
    }
}

fn items(bundles: &[Bundle], installed: &[bool]) -> Vec<MenuItem> {
    let mut items: Vec<MenuItem> = bundles
        .iter()
        .zip(installed)
        .map(|(b, &on)| {
            let detail = if on {
                format!("{}  [installed]", b.description)
            } else {
                b.description.to_string()
            };
            MenuItem::new(b.name).with_detail(detail)
        })
        .collect();
    items.push(MenuItem::new("Back"));
    items
}

impl Screen for ScriptsScreen {
    fn init(&mut self, _ctx: &Context) -> Command {
        // Re-checked on every show so a run from the menu below is reflected.
        let installed: Vec<bool> = self.bundles.iter().map(Bundle::is_installed).collect();
        self.menu.set_items(items(self.bundles, &installed));
        Command::none()
    }

    fn update(&mut self, msg: Msg, _ctx: &Context) -> Command {
        let Msg::Key(key) = msg else {
            return Command::none();
        };
        match self.menu.handle_key(&key) {
            MenuKey::Selected(i) => match self.bundles.get(i) {
                Some(b) => Command::navigate(ScriptMenu::new(b.clone())),
                None => Command::pop(),
            },
            _ => Command::none(),
        }
    }

    fn render(&self, f: &mut Frame<'_>, area: Rect, _ctx: &Context, theme: &Theme) {
        render_menu(f, area, "Script bundles", &self.menu.items, self.menu.cursor, theme);
    }

    fn title(&self) -> String {
        "My Scripts".to_string()
    }

    fn short_help(&self) -> Vec<Hint> {
        vec![Hint::new("j/k", "navigate"), Hint::new("enter", "open")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::input::press;
    use crate::tui::screens::testing::ctx;
    use crossterm::event::KeyCode;

    #[test]
    fn lists_every_bundle_plus_back() {
        let screen = ScriptsScreen::new();
        assert_eq!(screen.menu.items.len(), bundle::all().len() + 1);
        assert_eq!(screen.menu.items.last().map(|i| i.label.as_str()), Some("Back"));
    }

    #[test]
    fn installed_badge_shows_in_detail() {
        let bundles = bundle::all();
        let mut flags = vec![false; bundles.len()];
        flags[1] = true;
        let items = items(bundles, &flags);
        assert!(items[1].detail.as_deref().is_some_and(|d| d.ends_with("[installed]")));
        assert!(!items[0].detail.as_deref().is_some_and(|d| d.contains("[installed]")));
    }

    #[test]
    fn select_opens_bundle_and_back_pops() {
        let ctx = ctx();
        let mut screen = ScriptsScreen::new();
        let cmd = screen.update(Msg::Key(press(KeyCode::Enter)), &ctx);
        assert!(matches!(cmd, Command::Message(Msg::Navigate(ref s)) if s.title() == bundle::all()[0].name));

        let _ = screen.update(Msg::Key(press(KeyCode::End)), &ctx);
        assert!(matches!(
            screen.update(Msg::Key(press(KeyCode::Enter)), &ctx),
            Command::Message(Msg::Pop)
        ));
    }
}
