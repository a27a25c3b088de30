use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::logging;
use crate::process::ProcessOutcome;
use crate::system;
use crate::tui::command::Command;
use crate::tui::message::{Msg, ScreenEvent};
use crate::tui::screen::{Context, Hint, Screen};
use crate::tui::tasks::{spinner_frames, SPINNER_INTERVAL};
use crate::tui::theme::Theme;
use crate::tui::view::{any_key_line, dim_line, outcome_line, padded};

const CLEAR_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Package manager cleanup has the terminal.
    Packages,
    /// Asking whether to clear user caches too.
    Ask,
    Clearing,
    /// Something failed; waiting for a key.
    Done,
}

/// Package cleanup followed by optional removal of user caches.
pub struct CleanupScreen {
    phase: Phase,
    started: bool,
    packages: Option<ProcessOutcome>,
    /// `None` when the user skipped it.
    caches: Option<Result<(), String>>,
    yes_selected: bool,
    frame: u64,
}

impl CleanupScreen {
    pub fn new() -> Self {
        Self {
            phase: Phase::Packages,
            started: false,
            packages: None,
            caches: None,
            yes_selected: true,
            frame: 0,
        }
    }

    fn clear_caches(&mut self) -> Command {
        self.phase = Phase::Clearing;
        self.frame = 0;
        Command::batch([
            Command::blocking(
                "clear caches",
                CLEAR_TIMEOUT,
                ScreenEvent::CachesCleared(Err("timed out".to_string())).into(),
                || {
                    ScreenEvent::CachesCleared(
                        system::clear_user_caches().map_err(|e| format!("{:#}", e)),
                    )
                    .into()
                },
            ),
            Command::timer(SPINNER_INTERVAL, Msg::Tick(1)),
        ])
    }

    fn finish(&mut self) -> Command {
        let packages_ok = matches!(self.packages, Some(Ok(())));
        let caches_ok = !matches!(self.caches, Some(Err(_)));
        let ok = packages_ok && caches_ok;

        logging::action(&format!(
            "CLEANUP {}: packages {}, caches {}",
            if ok { "OK" } else { "FAILED" },
            if packages_ok { "ok" } else { "failed" },
            match &self.caches {
                None => "skipped",
                Some(Ok(())) => "cleared",
                Some(Err(_)) => "failed",
            }
        ));
        system::notify(
            "mypctools",
            if ok { "System cleanup completed" } else { "System cleanup finished with errors" },
        );

        self.phase = Phase::Done;
        if ok {
            Command::toast("System cleanup completed", false)
        } else {
            Command::none()
        }
    }

    fn on_ask_key(&mut self, key: &KeyEvent) -> Command {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => self.clear_caches(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.finish(),
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
                self.yes_selected = !self.yes_selected;
                Command::none()
            }
            KeyCode::Enter => {
                if self.yes_selected {
                    self.clear_caches()
                } else {
                    self.finish()
                }
            }
            _ => Command::none(),
        }
    }
}

impl Default for CleanupScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for CleanupScreen {
    fn init(&mut self, ctx: &Context) -> Command {
        if self.started {
            return Command::none();
        }
        self.started = true;
        Command::run_or_unavailable(
            system::cleanup_spec(ctx.distro.family),
            format!("no cleanup command for {}", ctx.distro.name),
        )
    }

    fn update(&mut self, msg: Msg, _ctx: &Context) -> Command {
        match (self.phase, msg) {
            (Phase::Packages, Msg::ProcessFinished(outcome)) => {
                self.packages = Some(outcome);
                self.phase = Phase::Ask;
                Command::none()
            }
            (Phase::Ask, Msg::Key(key)) => self.on_ask_key(&key),
            (Phase::Clearing, Msg::Tick(n)) if n == self.frame + 1 => {
                self.frame = n;
                Command::timer(SPINNER_INTERVAL, Msg::Tick(n + 1))
            }
            (Phase::Clearing, Msg::Screen(ScreenEvent::CachesCleared(result))) => {
                self.caches = Some(result);
                self.finish()
            }
            (Phase::Done, Msg::Key(_)) => Command::pop(),
            _ => Command::none(),
        }
    }

    fn render(&self, f: &mut Frame<'_>, area: Rect, _ctx: &Context, theme: &Theme) {
        let mut lines = vec![Line::from("")];
        if let Some(outcome) = &self.packages {
            lines.push(outcome_line("Package cleanup", outcome, theme));
        } else {
            lines.push(dim_line("Cleaning packages...", theme));
        }

        match self.phase {
            Phase::Packages => {}
            Phase::Ask => {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Also clear thumbnails and Trash?",
                    theme.title,
                )));
                let (yes, no) = if self.yes_selected {
                    (theme.selected, theme.muted)
                } else {
                    (theme.muted, theme.selected)
                };
                lines.push(Line::from(vec![
                    Span::styled("  [ Yes ]", yes),
                    Span::raw("  "),
                    Span::styled("[ No ]", no),
                ]));
            }
            Phase::Clearing => {
                let frames = spinner_frames();
                let spin = frames[(self.frame as usize) % frames.len()];
                lines.push(Line::from(Span::styled(
                    format!("{} Clearing caches...", spin),
                    theme.accent,
                )));
            }
            Phase::Done => {
                match &self.caches {
                    Some(Ok(())) => lines.push(Line::from(Span::styled("✓ Caches cleared", theme.success))),
                    Some(Err(e)) => lines.push(Line::from(vec![
                        Span::styled("✗ Caches: ", theme.error),
                        Span::styled(e.clone(), theme.text),
                    ])),
                    None => lines.push(dim_line("Caches left alone", theme)),
                }
                lines.push(Line::from(""));
                lines.push(any_key_line(theme));
            }
        }
        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), padded(area));
    }

    fn title(&self) -> String {
        "System Cleanup".to_string()
    }

    fn short_help(&self) -> Vec<Hint> {
        match self.phase {
            Phase::Ask => vec![Hint::new("y/n", "answer"), Hint::new("←/→", "choose")],
            Phase::Done => vec![Hint::new("any key", "continue")],
            _ => Vec::new(),
        }
    }

    /// While asking, Esc means "no" rather than leaving mid-cleanup.
    fn owns_key(&self, key: &KeyEvent) -> bool {
        self.phase == Phase::Ask && key.code == KeyCode::Esc
    }
}
