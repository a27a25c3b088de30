use std::collections::HashSet;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::app_confirm::AppConfirm;
use crate::catalog::{self, App, Category, InstallMethod};
use crate::tui::command::Command;
use crate::tui::input::step_cursor;
use crate::tui::message::{Msg, ScreenEvent};
use crate::tui::screen::{Context, Hint, Screen};
use crate::tui::tasks::spinner_frames;
use crate::tui::theme::Theme;
use crate::tui::view::{badge, padded};

const DETECT_TIMEOUT: Duration = Duration::from_secs(20);

/// Multi-select list of the apps in one category.
pub struct AppList {
    category: Category,
    apps: Vec<App>,
    methods: Vec<Option<InstallMethod>>,
    selected: HashSet<&'static str>,
    cursor: usize,
    /// `None` while detection runs.
    installed: Option<HashSet<&'static str>>,
}

impl AppList {
    pub fn new(category: Category) -> Self {
        let apps = catalog::by_category(category);
        Self {
            category,
            methods: vec![None; apps.len()],
            apps,
            selected: HashSet::new(),
            cursor: 0,
            installed: None,
        }
    }

    fn toggle_current(&mut self) {
        if let Some(app) = self.apps.get(self.cursor) {
            if !self.selected.remove(app.id) {
                self.selected.insert(app.id);
            }
        }
    }

    /// Selected apps in list order; the cursor row when nothing is ticked.
    fn chosen(&self) -> Vec<App> {
        if self.selected.is_empty() {
            return self.apps.get(self.cursor).cloned().into_iter().collect();
        }
        self.apps
            .iter()
            .filter(|a| self.selected.contains(a.id))
            .cloned()
            .collect()
    }

    fn on_key(&mut self, key: &KeyEvent) -> Command {
        if let Some(next) = step_cursor(self.cursor, self.apps.len(), key) {
            self.cursor = next;
            return Command::none();
        }
        match key.code {
            KeyCode::Char(' ') => self.toggle_current(),
            KeyCode::Char('a') => {
                self.selected = self.apps.iter().map(|a| a.id).collect();
            }
            KeyCode::Char('n') => self.selected.clear(),
            KeyCode::Enter => {
                let chosen = self.chosen();
                if !chosen.is_empty() {
                    return Command::navigate(AppConfirm::new(chosen));
                }
            }
            _ => {}
        }
        Command::none()
    }
}

impl Screen for AppList {
    fn init(&mut self, ctx: &Context) -> Command {
        let family = ctx.distro.family;
        self.methods = self
            .apps
            .iter()
            .map(|a| catalog::install_method(a, family))
            .collect();
        self.installed = None;

        let apps = self.apps.clone();
        Command::blocking(
            "installed apps",
            DETECT_TIMEOUT,
            ScreenEvent::InstalledApps(HashSet::new()).into(),
            move || ScreenEvent::InstalledApps(catalog::installed_ids(&apps, family)).into(),
        )
    }

    fn update(&mut self, msg: Msg, _ctx: &Context) -> Command {
        match msg {
            Msg::Key(key) => self.on_key(&key),
            Msg::Screen(ScreenEvent::InstalledApps(ids)) => {
                self.installed = Some(ids);
                Command::none()
            }
            _ => Command::none(),
        }
    }

    fn render(&self, f: &mut Frame<'_>, area: Rect, _ctx: &Context, theme: &Theme) {
        let mut lines = vec![
            Line::from(Span::styled(self.category.title(), theme.title)),
            Line::from(""),
        ];

        for (idx, app) in self.apps.iter().enumerate() {
            let at_cursor = idx == self.cursor;
            let check = if self.selected.contains(app.id) { "[x] " } else { "[ ] " };
            let mut spans = vec![
                Span::styled(if at_cursor { "› " } else { "  " }, theme.cursor),
                Span::styled(check, theme.accent),
                Span::styled(app.name, if at_cursor { theme.selected } else { theme.text }),
                Span::styled(
                    format!("  {}", InstallMethod::describe(self.methods[idx])),
                    theme.muted,
                ),
            ];
            match &self.installed {
                Some(ids) if ids.contains(app.id) => {
                    spans.push(Span::raw("  "));
                    spans.push(badge("installed", theme.success));
                }
                Some(_) => {}
                None => {
                    spans.push(Span::raw("  "));
                    spans.push(Span::styled(spinner_frames()[0], theme.muted));
                }
            }
            lines.push(Line::from(spans));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{} selected", self.selected.len()),
            theme.muted,
        )));
        f.render_widget(Paragraph::new(lines), padded(area));
    }

    fn title(&self) -> String {
        self.category.title().to_string()
    }

    fn short_help(&self) -> Vec<Hint> {
        vec![
            Hint::new("space", "toggle"),
            Hint::new("a/n", "all/none"),
            Hint::new("enter", "install"),
        ]
    }
}
