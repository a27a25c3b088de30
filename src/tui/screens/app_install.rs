use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::catalog::{self, App};
use crate::distro::DistroFamily;
use crate::logging;
use crate::system;
use crate::tui::command::Command;
use crate::tui::message::Msg;
use crate::tui::screen::{Context, Hint, Screen};
use crate::tui::sequence::{Sequence, Step};
use crate::tui::tasks::format_elapsed;
use crate::tui::theme::Theme;
use crate::tui::view::{any_key_line, badge, padded};

/// Installs the confirmed apps one after another, each with the terminal.
///
/// Sits above the list and the confirm dialog, so finishing pops both.
pub struct AppInstall {
    seq: Sequence<App>,
    family: DistroFamily,
    /// Per-item result, filled in as each install finishes.
    results: Vec<bool>,
    started_at: Option<Instant>,
    elapsed: Duration,
}

impl AppInstall {
    pub fn new(apps: Vec<App>, family: DistroFamily) -> Self {
        Self {
            seq: Sequence::new(apps),
            family,
            results: Vec::new(),
            started_at: None,
            elapsed: Duration::ZERO,
        }
    }

    fn next(&mut self, step: Option<App>) -> Command {
        match step {
            Some(app) => Command::run_or_unavailable(
                catalog::install_spec(&app, self.family),
                format!("no install method for {}", app.name),
            ),
            None => {
                self.elapsed = self.started_at.map(|t| t.elapsed()).unwrap_or_default();
                let (ok, failed) = (self.seq.succeeded(), self.seq.failed());
                tracing::info!(ok, failed, elapsed = ?self.elapsed, "app install finished");
                let body = if failed == 0 {
                    format!("Installed {} app(s)", ok)
                } else {
                    format!("{} installed, {} failed", ok, failed)
                };
                system::notify("mypctools", &body);
                Command::none()
            }
        }
    }

    /// Turn a sequence step into an owned value so `self` is free again.
    fn owned(step: Step<'_, App>) -> Option<Option<App>> {
        match step {
            Step::Run(app) => Some(Some(app.clone())),
            Step::Done => Some(None),
            Step::Idle => None,
        }
    }

    fn on_key(&self) -> Command {
        if !self.seq.is_done() {
            return Command::none();
        }
        // Back past the confirm dialog to the list.
        Command::pop_n(2)
    }
}

impl Screen for AppInstall {
    fn init(&mut self, _ctx: &Context) -> Command {
        match Self::owned(self.seq.start()) {
            Some(step) => {
                self.started_at = Some(Instant::now());
                self.next(step)
            }
            None => Command::none(),
        }
    }

    fn update(&mut self, msg: Msg, _ctx: &Context) -> Command {
        match msg {
            Msg::ProcessFinished(outcome) => {
                let Some(app) = self.seq.current().cloned() else {
                    return Command::none();
                };
                match &outcome {
                    Ok(()) => logging::action(&format!("INSTALL OK: {}", app.name)),
                    Err(e) => logging::action(&format!("INSTALL FAILED: {} ({})", app.name, e)),
                }
                self.results.push(outcome.is_ok());
                match Self::owned(self.seq.record(outcome.is_ok())) {
                    Some(step) => self.next(step),
                    None => Command::none(),
                }
            }
            Msg::Key(_) => self.on_key(),
            _ => Command::none(),
        }
    }

    fn render(&self, f: &mut Frame<'_>, area: Rect, _ctx: &Context, theme: &Theme) {
        let total = self.seq.len();
        let heading = if self.seq.is_done() {
            format!("Done in {}", format_elapsed(self.elapsed))
        } else {
            format!(
                "Installing {}/{}",
                (self.seq.position() + 1).min(total),
                total
            )
        };
        let mut lines = vec![Line::from(Span::styled(heading, theme.title)), Line::from("")];

        for (idx, app) in self.seq.items().iter().enumerate() {
            let status = match self.results.get(idx) {
                Some(true) => badge("ok", theme.success),
                Some(false) => badge("failed", theme.error),
                None if idx == self.seq.position() && !self.seq.is_done() => {
                    badge("running", theme.warning)
                }
                None => badge("queued", theme.muted),
            };
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<24}", app.name), theme.text),
                status,
            ]));
        }

        if self.seq.is_done() {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled(format!("{} succeeded", self.seq.succeeded()), theme.success),
                Span::styled(", ", theme.muted),
                Span::styled(
                    format!("{} failed", self.seq.failed()),
                    if self.seq.failed() > 0 { theme.error } else { theme.muted },
                ),
            ]));
            lines.push(any_key_line(theme));
        }
        f.render_widget(Paragraph::new(lines), padded(area));
    }

    fn title(&self) -> String {
        "Installing".to_string()
    }

    fn short_help(&self) -> Vec<Hint> {
        if self.seq.is_done() {
            vec![Hint::new("any key", "back to list")]
        } else {
            Vec::new()
        }
    }

    /// Esc must not leave while installs are still queued.
    fn owns_key(&self, key: &KeyEvent) -> bool {
        key.code == KeyCode::Esc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use crate::process::ProcessError;
    use crate::tui::input::press;
    use crate::tui::screens::testing::{ctx, render_text};

    fn apps() -> Vec<App> {
        catalog::by_category(Category::Browsers)
            .into_iter()
            .take(3)
            .collect()
    }

    fn failed() -> Msg {
        Msg::ProcessFinished(Err(ProcessError::Exit {
            program: "pacman".into(),
            code: 1,
        }))
    }

    #[test]
    fn runs_each_app_then_pops_two_levels() {
        let ctx = ctx();
        let mut screen = AppInstall::new(apps(), DistroFamily::Arch);
        assert!(matches!(screen.init(&ctx), Command::Handoff(_)));
        // Re-init does not restart the queue.
        assert!(screen.init(&ctx).is_none());

        // Keys are ignored while installs are pending.
        assert!(screen.update(Msg::Key(press(KeyCode::Enter)), &ctx).is_none());

        assert!(matches!(screen.update(Msg::ProcessFinished(Ok(())), &ctx), Command::Handoff(_)));
        assert!(matches!(screen.update(failed(), &ctx), Command::Handoff(_)));
        assert!(screen.update(Msg::ProcessFinished(Ok(())), &ctx).is_none());

        assert!(screen.seq.is_done());
        assert_eq!((screen.seq.succeeded(), screen.seq.failed()), (2, 1));
        let text = render_text(&screen, &ctx);
        assert!(text.contains("2 succeeded"));
        assert!(text.contains("[failed]"));

        // Late reports change nothing.
        assert!(screen.update(failed(), &ctx).is_none());
        assert_eq!(screen.seq.failed(), 1);

        match screen.update(Msg::Key(press(KeyCode::Char('x'))), &ctx) {
            Command::Batch(cmds) => {
                assert_eq!(cmds.len(), 2);
                assert!(cmds.iter().all(|c| matches!(c, Command::Message(Msg::Pop))));
            }
            other => panic!("expected two pops, got {:?}", other),
        }
    }

    #[test]
    fn app_without_method_counts_as_failure() {
        let ctx = ctx();
        let python = catalog::all()
            .iter()
            .find(|a| a.id == "python")
            .cloned()
            .into_iter()
            .collect();
        let mut screen = AppInstall::new(python, DistroFamily::Unknown);
        let msg = match screen.init(&ctx) {
            Command::Message(msg @ Msg::ProcessFinished(Err(ProcessError::Unavailable(_)))) => msg,
            other => panic!("expected an unavailable outcome, got {:?}", other),
        };
        let _ = screen.update(msg, &ctx);
        assert!(screen.seq.is_done());
        assert_eq!(screen.seq.failed(), 1);
    }

    #[test]
    fn esc_is_kept_from_the_navigator() {
        let screen = AppInstall::new(apps(), DistroFamily::Arch);
        assert!(screen.owns_key(&press(KeyCode::Esc)));
        assert!(!screen.owns_key(&press(KeyCode::Enter)));
    }
}
