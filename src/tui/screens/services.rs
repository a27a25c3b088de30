//! Service manager: pick a list, pick a unit, act on it.
//!
//! Queries run on the blocking pool; every state change goes through
//! `sudo systemctl` with the terminal handed over, so password prompts work.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{Menu, MenuKey};
use crate::logging;
use crate::process::{ProcessOutcome, ProcessSpec};
use crate::system::services::{self, ServiceAction, ServiceStatus};
use crate::tui::command::Command;
use crate::tui::input::step_cursor;
use crate::tui::message::{Msg, ScreenEvent};
use crate::tui::screen::{Context, Hint, Screen};
use crate::tui::theme::Theme;
use crate::tui::view::{badge, dim_line, menu_lines, outcome_line, padded, render_menu, MenuItem};

const QUERY_TIMEOUT: Duration = Duration::from_secs(15);

pub struct ServicesMenu {
    menu: Menu,
}

impl ServicesMenu {
    pub fn new() -> Self {
        Self {
            menu: Menu::new(vec![
                MenuItem::new("Common services").with_detail("docker, ssh, bluetooth, ..."),
                MenuItem::new("All services"),
                MenuItem::new("Back"),
            ]),
        }
    }
}

impl Default for ServicesMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for ServicesMenu {
    fn update(&mut self, msg: Msg, _ctx: &Context) -> Command {
        let Msg::Key(key) = msg else {
            return Command::none();
        };
        match self.menu.handle_key(&key) {
            MenuKey::Selected(0) => Command::navigate(ServiceList::new(false)),
            MenuKey::Selected(1) => Command::navigate(ServiceList::new(true)),
            MenuKey::Selected(_) => Command::pop(),
            _ => Command::none(),
        }
    }

    fn render(&self, f: &mut Frame<'_>, area: Rect, _ctx: &Context, theme: &Theme) {
        render_menu(f, area, "Service manager", &self.menu.items, self.menu.cursor, theme);
    }

    fn title(&self) -> String {
        "Services".to_string()
    }

    fn short_help(&self) -> Vec<Hint> {
        vec![Hint::new("j/k", "navigate"), Hint::new("enter", "open")]
    }
}

/// Scrolling list of service units.
pub struct ServiceList {
    all: bool,
    services: Option<Result<Vec<ServiceStatus>, String>>,
    cursor: usize,
}

impl ServiceList {
    pub fn new(all: bool) -> Self {
        Self {
            all,
            services: None,
            cursor: 0,
        }
    }

    fn loaded(&self) -> &[ServiceStatus] {
        match &self.services {
            Some(Ok(list)) => list,
            _ => &[],
        }
    }

    fn on_key(&mut self, key: &KeyEvent) -> Command {
        let len = self.loaded().len();
        if let Some(next) = step_cursor(self.cursor, len, key) {
            self.cursor = next;
            return Command::none();
        }
        match key.code {
            KeyCode::Enter => match self.loaded().get(self.cursor) {
                Some(svc) => Command::navigate(ServiceDetail::new(svc.clone())),
                None => Command::none(),
            },
            KeyCode::Char('r') => self.load(),
            _ => Command::none(),
        }
    }

    fn load(&mut self) -> Command {
        self.services = None;
        let all = self.all;
        Command::blocking(
            "services",
            QUERY_TIMEOUT,
            ScreenEvent::ServicesLoaded(Err("systemctl did not answer".to_string())).into(),
            move || {
                let result = if all {
                    services::all_services().map_err(|e| format!("{:#}", e))
                } else {
                    Ok(services::known_services())
                };
                ScreenEvent::ServicesLoaded(result).into()
            },
        )
    }
}

impl Screen for ServiceList {
    fn init(&mut self, _ctx: &Context) -> Command {
        // Statuses may have changed in the detail view above.
        self.load()
    }

    fn update(&mut self, msg: Msg, _ctx: &Context) -> Command {
        match msg {
            Msg::Screen(ScreenEvent::ServicesLoaded(result)) => {
                self.services = Some(result);
                self.cursor = self.cursor.min(self.loaded().len().saturating_sub(1));
                Command::none()
            }
            Msg::Key(key) => self.on_key(&key),
            _ => Command::none(),
        }
    }

    fn render(&self, f: &mut Frame<'_>, area: Rect, _ctx: &Context, theme: &Theme) {
        let area = padded(area);
        let list = match &self.services {
            None => {
                f.render_widget(Paragraph::new(dim_line("Loading services...", theme)), area);
                return;
            }
            Some(Err(e)) => {
                let line = Line::from(vec![
                    Span::styled("✗ ", theme.error),
                    Span::styled(e.clone(), theme.text),
                ]);
                f.render_widget(Paragraph::new(line), area);
                return;
            }
            Some(Ok(list)) if list.is_empty() => {
                f.render_widget(Paragraph::new(dim_line("No services found", theme)), area);
                return;
            }
            Some(Ok(list)) => list,
        };

        // Keep the cursor on screen.
        let visible = area.height.max(1) as usize;
        let first = self.cursor.saturating_sub(visible - 1);
        let lines: Vec<Line> = list
            .iter()
            .enumerate()
            .skip(first)
            .take(visible)
            .map(|(idx, svc)| {
                let at_cursor = idx == self.cursor;
                let mut spans = vec![
                    Span::styled(if at_cursor { "› " } else { "  " }, theme.cursor),
                    Span::styled(
                        format!("{:<28}", svc.name),
                        if at_cursor { theme.selected } else { theme.text },
                    ),
                ];
                if svc.active != "unknown" {
                    spans.push(status_badge(svc, theme));
                }
                Line::from(spans)
            })
            .collect();
        f.render_widget(Paragraph::new(lines), area);
    }

    fn title(&self) -> String {
        if self.all { "All Services" } else { "Common Services" }.to_string()
    }

    fn short_help(&self) -> Vec<Hint> {
        vec![
            Hint::new("j/k", "navigate"),
            Hint::new("enter", "manage"),
            Hint::new("r", "reload"),
        ]
    }
}

fn status_badge(svc: &ServiceStatus, theme: &Theme) -> Span<'static> {
    let style = if svc.is_active() {
        theme.success
    } else if svc.active == "failed" {
        theme.error
    } else {
        theme.muted
    };
    badge(&svc.active, style)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DetailItem {
    Action(ServiceAction),
    ViewStatus,
    Back,
}

/// Actions for a single unit, with its live status.
pub struct ServiceDetail {
    status: ServiceStatus,
    items: Vec<DetailItem>,
    menu: Menu,
    /// The last action and how it went.
    last: Option<(String, ProcessOutcome)>,
    pending: Option<String>,
}

impl ServiceDetail {
    pub fn new(status: ServiceStatus) -> Self {
        let items: Vec<DetailItem> = ServiceAction::ALL
            .iter()
            .map(|a| DetailItem::Action(*a))
            .chain([DetailItem::ViewStatus, DetailItem::Back])
            .collect();
        let labels = items
            .iter()
            .map(|i| match i {
                DetailItem::Action(a) => MenuItem::new(capitalize(a.as_str())),
                DetailItem::ViewStatus => MenuItem::new("View status"),
                DetailItem::Back => MenuItem::new("Back"),
            })
            .collect();
        Self {
            status,
            items,
            menu: Menu::new(labels),
            last: None,
            pending: None,
        }
    }

    fn refresh(&self) -> Command {
        let name = self.status.name.clone();
        let fallback = ServiceStatus::unknown(&name);
        Command::blocking(
            "service status",
            QUERY_TIMEOUT,
            ScreenEvent::ServiceStatus(fallback).into(),
            move || ScreenEvent::ServiceStatus(services::status_of(&name)).into(),
        )
    }

    fn run(&mut self, label: String, spec: ProcessSpec) -> Command {
        self.pending = Some(label);
        Command::run_with_terminal(spec)
    }

    fn activate(&mut self, item: DetailItem) -> Command {
        let name = self.status.name.clone();
        match item {
            DetailItem::Action(action) => self.run(
                format!("{} {}", capitalize(action.as_str()), name),
                services::action_spec(&name, action),
            ),
            DetailItem::ViewStatus => {
                self.run(format!("Status of {}", name), services::status_spec(&name))
            }
            DetailItem::Back => Command::pop(),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Screen for ServiceDetail {
    fn init(&mut self, _ctx: &Context) -> Command {
        self.refresh()
    }

    fn update(&mut self, msg: Msg, _ctx: &Context) -> Command {
        match msg {
            Msg::Screen(ScreenEvent::ServiceStatus(status)) if status.name == self.status.name => {
                self.status = status;
                Command::none()
            }
            Msg::ProcessFinished(outcome) => {
                let Some(label) = self.pending.take() else {
                    return Command::none();
                };
                match &outcome {
                    Ok(()) => logging::action(&format!("SERVICE {}: OK", label)),
                    Err(e) => logging::action(&format!("SERVICE {}: FAILED ({})", label, e)),
                }
                self.last = Some((label, outcome));
                self.refresh()
            }
            Msg::Key(key) => match self.menu.handle_key(&key) {
                MenuKey::Selected(i) => match self.items.get(i) {
                    Some(item) => self.activate(*item),
                    None => Command::none(),
                },
                _ => Command::none(),
            },
            _ => Command::none(),
        }
    }

    fn render(&self, f: &mut Frame<'_>, area: Rect, _ctx: &Context, theme: &Theme) {
        let mut lines = vec![
            Line::from(vec![
                Span::styled(self.status.name.clone(), theme.title),
                Span::raw("  "),
                status_badge(&self.status, theme),
                Span::raw(" "),
                badge(&self.status.enabled, theme.muted),
            ]),
            Line::from(""),
        ];
        lines.extend(menu_lines(&self.menu.items, self.menu.cursor, theme));
        if let Some((label, outcome)) = &self.last {
            lines.push(Line::from(""));
            lines.push(outcome_line(label, outcome, theme));
        }
        f.render_widget(Paragraph::new(lines), padded(area));
    }

    fn title(&self) -> String {
        self.status.name.clone()
    }

    fn short_help(&self) -> Vec<Hint> {
        vec![Hint::new("j/k", "navigate"), Hint::new("enter", "run")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessError;
    use crate::tui::input::press;
    use crate::tui::screens::testing::{ctx, render_text};

    fn docker() -> ServiceStatus {
        ServiceStatus {
            name: "docker".into(),
            active: "inactive".into(),
            enabled: "disabled".into(),
        }
    }

    #[test]
    fn list_loads_in_background_and_opens_detail() {
        let ctx = ctx();
        let mut list = ServiceList::new(false);
        assert!(matches!(list.init(&ctx), Command::Background(_)));
        assert!(render_text(&list, &ctx).contains("Loading services"));
        assert!(list.update(Msg::Key(press(KeyCode::Enter)), &ctx).is_none());

        let loaded = vec![ServiceStatus::unknown("bluetooth"), docker()];
        let _ = list.update(Msg::Screen(ScreenEvent::ServicesLoaded(Ok(loaded))), &ctx);
        assert!(render_text(&list, &ctx).contains("[inactive]"));

        let _ = list.update(Msg::Key(press(KeyCode::Char('j'))), &ctx);
        let cmd = list.update(Msg::Key(press(KeyCode::Enter)), &ctx);
        assert!(matches!(cmd, Command::Message(Msg::Navigate(ref s)) if s.title() == "docker"));
    }

    #[test]
    fn list_shows_load_errors() {
        let ctx = ctx();
        let mut list = ServiceList::new(true);
        let _ = list.update(
            Msg::Screen(ScreenEvent::ServicesLoaded(Err("systemctl missing".into()))),
            &ctx,
        );
        assert!(render_text(&list, &ctx).contains("systemctl missing"));
    }

    #[test]
    fn actions_hand_off_and_refresh_after() {
        let ctx = ctx();
        let mut detail = ServiceDetail::new(docker());
        assert!(matches!(detail.init(&ctx), Command::Background(_)));

        match detail.update(Msg::Key(press(KeyCode::Enter)), &ctx) {
            Command::Handoff(spec) => assert_eq!(spec.to_string(), "sudo systemctl start docker"),
            other => panic!("expected handoff, got {:?}", other),
        }
        let cmd = detail.update(
            Msg::ProcessFinished(Err(ProcessError::Exit {
                program: "sudo".into(),
                code: 1,
            })),
            &ctx,
        );
        assert!(matches!(cmd, Command::Background(_)));
        assert!(render_text(&detail, &ctx).contains("✗ Start docker"));

        // Status for another unit is ignored.
        let cups = ServiceStatus::unknown("cups");
        let _ = detail.update(Msg::Screen(ScreenEvent::ServiceStatus(cups)), &ctx);
        assert_eq!(detail.status.name, "docker");

        let running = ServiceStatus {
            active: "active".into(),
            ..docker()
        };
        let _ = detail.update(Msg::Screen(ScreenEvent::ServiceStatus(running)), &ctx);
        assert!(detail.status.is_active());
    }

    #[test]
    fn view_status_uses_systemctl_directly() {
        let ctx = ctx();
        let mut detail = ServiceDetail::new(docker());
        let _ = detail.update(Msg::Key(press(KeyCode::End)), &ctx);
        let _ = detail.update(Msg::Key(press(KeyCode::Up)), &ctx);
        match detail.update(Msg::Key(press(KeyCode::Enter)), &ctx) {
            Command::Handoff(spec) => assert_eq!(spec.program, "systemctl"),
            other => panic!("expected handoff, got {:?}", other),
        }
    }
}
