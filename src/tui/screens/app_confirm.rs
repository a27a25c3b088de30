use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::app_install::AppInstall;
use super::{Menu, MenuKey};
use crate::catalog::{self, App, InstallMethod};
use crate::distro::DistroFamily;
use crate::tui::command::Command;
use crate::tui::input::is_char;
use crate::tui::message::Msg;
use crate::tui::screen::{Context, Hint, Screen};
use crate::tui::theme::Theme;
use crate::tui::view::{menu_lines, padded, MenuItem};

pub struct AppConfirm {
    apps: Vec<App>,
    methods: Vec<Option<InstallMethod>>,
    menu: Menu,
}

impl AppConfirm {
    pub fn new(apps: Vec<App>) -> Self {
        Self {
            methods: vec![None; apps.len()],
            apps,
            menu: Menu::new(vec![MenuItem::new("Install"), MenuItem::new("Cancel")]),
        }
    }

    fn confirm(&self, family: DistroFamily) -> Command {
        Command::navigate(AppInstall::new(self.apps.clone(), family))
    }
}

impl Screen for AppConfirm {
    fn init(&mut self, ctx: &Context) -> Command {
        self.methods = self
            .apps
            .iter()
            .map(|a| catalog::install_method(a, ctx.distro.family))
            .collect();
        Command::none()
    }

    fn update(&mut self, msg: Msg, ctx: &Context) -> Command {
        let Msg::Key(key) = msg else {
            return Command::none();
        };
        if is_char(&key, 'y') {
            return self.confirm(ctx.distro.family);
        }
        if is_char(&key, 'n') {
            return Command::pop();
        }
        match self.menu.handle_key(&key) {
            MenuKey::Selected(0) => self.confirm(ctx.distro.family),
            MenuKey::Selected(_) => Command::pop(),
            _ => Command::none(),
        }
    }

    fn render(&self, f: &mut Frame<'_>, area: Rect, _ctx: &Context, theme: &Theme) {
        let mut lines = vec![
            Line::from(Span::styled(
                format!("Install {} app(s)?", self.apps.len()),
                theme.title,
            )),
            Line::from(""),
        ];
        for (app, method) in self.apps.iter().zip(&self.methods) {
            let style = if method.is_some() { theme.muted } else { theme.warning };
            lines.push(Line::from(vec![
                Span::styled("  • ", theme.accent),
                Span::styled(app.name, theme.text),
                Span::styled(format!("  {}", InstallMethod::describe(*method)), style),
            ]));
        }
        lines.push(Line::from(""));
        lines.extend(menu_lines(&self.menu.items, self.menu.cursor, theme));
        f.render_widget(Paragraph::new(lines), padded(area));
    }

    fn title(&self) -> String {
        "Confirm".to_string()
    }

    fn short_help(&self) -> Vec<Hint> {
        vec![Hint::new("y", "install"), Hint::new("n", "cancel")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use crate::tui::input::press;
    use crate::tui::screens::testing::ctx;
    use crossterm::event::KeyCode;

    #[test]
    fn y_starts_installer_and_n_goes_back() {
        let ctx = ctx();
        let mut confirm = AppConfirm::new(catalog::by_category(Category::Media));
        let _ = confirm.init(&ctx);

        let cmd = confirm.update(Msg::Key(press(KeyCode::Char('y'))), &ctx);
        assert!(matches!(cmd, Command::Message(Msg::Navigate(ref s)) if s.title() == "Installing"));

        let cmd = confirm.update(Msg::Key(press(KeyCode::Char('n'))), &ctx);
        assert!(matches!(cmd, Command::Message(Msg::Pop)));
    }
}
