use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::apps::AppCategories;
use super::run::RunScreen;
use super::scripts::ScriptsScreen;
use super::system_setup::SystemSetup;
use super::{Menu, MenuKey};
use crate::git;
use crate::tui::command::Command;
use crate::tui::input::is_char;
use crate::tui::message::Msg;
use crate::tui::screen::{Context, Hint, Screen};
use crate::tui::theme::Theme;
use crate::tui::view::{menu_lines, MenuItem};

const LOGO: &str = "\
┏┳┓╻ ╻┏━┓┏━╸╺┳╸┏━┓┏━┓╻  ┏━┓
┃┃┃┗┳┛┣━┛┃   ┃ ┃ ┃┃ ┃┃  ┗━┓
╹ ╹ ╹ ╹  ┗━╸ ╹ ┗━┛┗━┛┗━╸┗━┛";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Apps,
    Scripts,
    System,
    PullUpdates,
    Exit,
}

pub struct MainMenu {
    entries: Vec<Entry>,
    menu: Menu,
    built_for: Option<usize>,
}

impl MainMenu {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            menu: Menu::new(Vec::new()),
            built_for: None,
        }
    }

    fn rebuild(&mut self, update_count: usize) {
        if self.built_for == Some(update_count) {
            return;
        }
        self.built_for = Some(update_count);

        let mut entries = vec![Entry::Apps, Entry::Scripts, Entry::System];
        if update_count > 0 {
            entries.push(Entry::PullUpdates);
        }
        entries.push(Entry::Exit);

        let items = entries
            .iter()
            .map(|e| match e {
                Entry::Apps => MenuItem::new("Install Apps"),
                Entry::Scripts => MenuItem::new("My Scripts"),
                Entry::System => MenuItem::new("System Setup"),
                Entry::PullUpdates => MenuItem::new(format!("Pull Updates ({} new)", update_count)),
                Entry::Exit => MenuItem::new("Exit"),
            })
            .collect();
        self.entries = entries;
        self.menu.set_items(items);
    }

    fn activate(&self, entry: Entry, ctx: &Context) -> Command {
        match entry {
            Entry::Apps => Command::navigate(AppCategories::new()),
            Entry::Scripts => Command::navigate(ScriptsScreen::new()),
            Entry::System => Command::navigate(SystemSetup::new()),
            Entry::PullUpdates => Command::navigate(
                RunScreen::new("Pull Updates", "Pulling updates", git::pull_spec(&ctx.root_dir))
                    .resets_update_count(),
            ),
            Entry::Exit => Command::quit(),
        }
    }

    fn on_key(&mut self, key: &KeyEvent, ctx: &Context) -> Command {
        if is_char(key, 'q') {
            return Command::quit();
        }
        match self.menu.handle_key(key) {
            MenuKey::Selected(i) => match self.entries.get(i) {
                Some(entry) => self.activate(*entry, ctx),
                None => Command::none(),
            },
            MenuKey::Moved | MenuKey::Unhandled => Command::none(),
        }
    }
}

impl Default for MainMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for MainMenu {
    fn init(&mut self, ctx: &Context) -> Command {
        self.rebuild(ctx.update_count);
        Command::none()
    }

    fn update(&mut self, msg: Msg, ctx: &Context) -> Command {
        self.rebuild(ctx.update_count);
        match msg {
            Msg::Key(key) => self.on_key(&key, ctx),
            _ => Command::none(),
        }
    }

    fn render(&self, f: &mut Frame<'_>, area: Rect, ctx: &Context, theme: &Theme) {
        let mut lines: Vec<Line> = LOGO
            .lines()
            .map(|l| Line::from(Span::styled(l, theme.primary)))
            .collect();
        if ctx.update_count > 0 {
            lines.push(Line::from(Span::styled(
                format!("⬆ Update available ({} new)", ctx.update_count),
                theme.warning,
            )));
        }
        let pm = ctx.distro.family.package_manager().unwrap_or("no package manager");
        lines.push(Line::from(Span::styled(
            format!("{} · {}", ctx.distro.name, pm),
            theme.muted,
        )));
        lines.push(Line::from(""));

        let header_height = lines.len() as u16;
        f.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            Rect {
                height: header_height.min(area.height),
                ..area
            },
        );

        let menu_area = Rect {
            x: area.x + area.width.saturating_sub(30) / 2,
            y: area.y + header_height.min(area.height),
            width: area.width.min(30),
            height: area.height.saturating_sub(header_height),
        };
        f.render_widget(
            Paragraph::new(menu_lines(&self.menu.items, self.menu.cursor, theme)),
            menu_area,
        );
    }

    fn title(&self) -> String {
        "Main Menu".to_string()
    }

    fn short_help(&self) -> Vec<Hint> {
        vec![
            Hint::new("j/k", "navigate"),
            Hint::new("enter", "select"),
            Hint::new("q", "quit"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::input::press;
    use crate::tui::screens::testing::{ctx, render_text};
    use crossterm::event::KeyCode;

    #[test]
    fn pull_updates_entry_follows_update_count() {
        let mut ctx = ctx();
        let mut menu = MainMenu::new();
        let _ = menu.init(&ctx);
        assert!(!menu.entries.contains(&Entry::PullUpdates));

        ctx.update_count = 3;
        let _ = menu.update(Msg::UpdateCountKnown(3), &ctx);
        assert_eq!(menu.entries[3], Entry::PullUpdates);
        assert!(render_text(&menu, &ctx).contains("Pull Updates (3 new)"));

        ctx.update_count = 0;
        let _ = menu.update(Msg::UpdateCountKnown(0), &ctx);
        assert!(!menu.entries.contains(&Entry::PullUpdates));
    }

    #[test]
    fn q_and_exit_quit() {
        let ctx = ctx();
        let mut menu = MainMenu::new();
        let _ = menu.init(&ctx);
        assert!(matches!(
            menu.update(Msg::Key(press(KeyCode::Char('q'))), &ctx),
            Command::Quit
        ));

        let _ = menu.update(Msg::Key(press(KeyCode::Up)), &ctx);
        assert!(matches!(
            menu.update(Msg::Key(press(KeyCode::Enter)), &ctx),
            Command::Quit
        ));
    }

    #[test]
    fn enter_navigates_to_apps() {
        let ctx = ctx();
        let mut menu = MainMenu::new();
        let _ = menu.init(&ctx);
        let cmd = menu.update(Msg::Key(press(KeyCode::Enter)), &ctx);
        assert!(matches!(cmd, Command::Message(Msg::Navigate(ref s)) if s.title() == "Install Apps"));
    }
}
