use ratatui::{layout::Rect, Frame};

use super::app_list::AppList;
use super::{Menu, MenuKey};
use crate::catalog::{self, Category};
use crate::tui::command::Command;
use crate::tui::message::Msg;
use crate::tui::screen::{Context, Hint, Screen};
use crate::tui::theme::Theme;
use crate::tui::view::{render_menu, MenuItem};

pub struct AppCategories {
    menu: Menu,
}

impl AppCategories {
    pub fn new() -> Self {
        let mut items: Vec<MenuItem> = Category::ALL
            .iter()
            .map(|c| {
                let n = catalog::by_category(*c).len();
                MenuItem::new(c.title()).with_detail(format!("{} apps", n))
            })
            .collect();
        items.push(MenuItem::new("Back"));
        Self {
            menu: Menu::new(items),
        }
    }
}

impl Default for AppCategories {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for AppCategories {
    fn update(&mut self, msg: Msg, _ctx: &Context) -> Command {
        let Msg::Key(key) = msg else {
            return Command::none();
        };
        match self.menu.handle_key(&key) {
            MenuKey::Selected(i) => match Category::ALL.get(i) {
                Some(category) => Command::navigate(AppList::new(*category)),
                None => Command::pop(),
            },
            _ => Command::none(),
        }
    }

    fn render(&self, f: &mut Frame<'_>, area: Rect, _ctx: &Context, theme: &Theme) {
        render_menu(f, area, "Choose a category", &self.menu.items, self.menu.cursor, theme);
    }

    fn title(&self) -> String {
        "Install Apps".to_string()
    }

    fn short_help(&self) -> Vec<Hint> {
        vec![Hint::new("j/k", "navigate"), Hint::new("enter", "open")]
    }
}
