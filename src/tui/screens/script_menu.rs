use ratatui::{layout::Rect, Frame};

use super::run::RunScreen;
use super::{Menu, MenuKey};
use crate::bundle::{Bundle, BundleAction};
use crate::tui::command::Command;
use crate::tui::message::Msg;
use crate::tui::screen::{Context, Hint, Screen};
use crate::tui::theme::Theme;
use crate::tui::view::{render_menu, MenuItem};

const ACTIONS: [BundleAction; 2] = [BundleAction::Install, BundleAction::Uninstall];

pub struct ScriptMenu {
    bundle: Bundle,
    menu: Menu,
}

impl ScriptMenu {
    pub fn new(bundle: Bundle) -> Self {
        let mut items: Vec<MenuItem> = ACTIONS.iter().map(|a| MenuItem::new(a.verb())).collect();
        items.push(MenuItem::new("Back"));
        Self {
            bundle,
            menu: Menu::new(items),
        }
    }

    fn run(&self, action: BundleAction, ctx: &Context) -> Command {
        let title = format!("{} {}", action.verb(), self.bundle.name);
        let script = self.bundle.script_path(&ctx.root_dir, action);
        if !script.exists() {
            tracing::warn!(script = %script.display(), "bundle script missing");
        }
        Command::navigate(RunScreen::new(
            title,
            format!("{}ing {}", action.verb(), self.bundle.name),
            self.bundle.script_spec(&ctx.root_dir, action),
        ))
    }
}

impl Screen for ScriptMenu {
    fn update(&mut self, msg: Msg, ctx: &Context) -> Command {
        let Msg::Key(key) = msg else {
            return Command::none();
        };
        match self.menu.handle_key(&key) {
            MenuKey::Selected(i) => match ACTIONS.get(i) {
                Some(action) => self.run(*action, ctx),
                None => Command::pop(),
            },
            _ => Command::none(),
        }
    }

    fn render(&self, f: &mut Frame<'_>, area: Rect, _ctx: &Context, theme: &Theme) {
        render_menu(f, area, self.bundle.description, &self.menu.items, self.menu.cursor, theme);
    }

    fn title(&self) -> String {
        self.bundle.name.to_string()
    }

    fn short_help(&self) -> Vec<Hint> {
        vec![Hint::new("j/k", "navigate"), Hint::new("enter", "run")]
    }
}
