use std::time::Duration;

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::system::info::{self, SystemInfo};
use crate::tui::command::Command;
use crate::tui::message::{Msg, ScreenEvent};
use crate::tui::screen::{Context, Hint, Screen};
use crate::tui::theme::Theme;
use crate::tui::view::{dim_line, padded, truncate_to_width};

const GATHER_TIMEOUT: Duration = Duration::from_secs(10);

pub struct SysInfoScreen {
    info: Option<Box<SystemInfo>>,
}

impl SysInfoScreen {
    pub fn new() -> Self {
        Self { info: None }
    }
}

impl Default for SysInfoScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for SysInfoScreen {
    fn init(&mut self, ctx: &Context) -> Command {
        if self.info.is_some() {
            return Command::none();
        }
        let distro = ctx.distro.clone();
        Command::blocking(
            "system info",
            GATHER_TIMEOUT,
            ScreenEvent::SystemInfo(Box::default()).into(),
            move || ScreenEvent::SystemInfo(Box::new(info::gather(&distro))).into(),
        )
    }

    fn update(&mut self, msg: Msg, _ctx: &Context) -> Command {
        match msg {
            Msg::Screen(ScreenEvent::SystemInfo(info)) => {
                self.info = Some(info);
                Command::none()
            }
            Msg::Key(key) if key.code == KeyCode::Char('q') => Command::pop(),
            _ => Command::none(),
        }
    }

    fn render(&self, f: &mut Frame<'_>, area: Rect, _ctx: &Context, theme: &Theme) {
        let area = padded(area);
        let Some(info) = &self.info else {
            let lines = vec![Line::from(""), dim_line("Gathering system information...", theme)];
            f.render_widget(Paragraph::new(lines), area);
            return;
        };

        let rows = info.rows();
        if rows.is_empty() {
            f.render_widget(Paragraph::new(dim_line("Nothing could be determined", theme)), area);
            return;
        }
        let label_w = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        let value_w = (area.width as usize).saturating_sub(label_w + 2);
        let lines: Vec<Line> = rows
            .into_iter()
            .map(|(k, v)| {
                Line::from(vec![
                    Span::styled(format!("{:>w$}  ", k, w = label_w), theme.primary),
                    Span::styled(truncate_to_width(v, value_w), theme.text),
                ])
            })
            .collect();
        f.render_widget(Paragraph::new(lines), area);
    }

    fn title(&self) -> String {
        "System Info".to_string()
    }

    fn short_help(&self) -> Vec<Hint> {
        vec![Hint::new("q", "back")]
    }
}
