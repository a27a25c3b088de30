use ratatui::{layout::Rect, text::Line, widgets::Paragraph, widgets::Wrap, Frame};

use crate::logging;
use crate::process::{ProcessOutcome, ProcessSpec};
use crate::system;
use crate::tui::command::Command;
use crate::tui::message::Msg;
use crate::tui::screen::{Context, Hint, Screen};
use crate::tui::theme::Theme;
use crate::tui::view::{any_key_line, dim_line, outcome_line, padded};

/// Hands one process the terminal as soon as it is shown, then reports how
/// it went. Any key afterwards goes back.
pub struct RunScreen {
    title: String,
    label: String,
    spec: Option<ProcessSpec>,
    unavailable: String,
    outcome: Option<ProcessOutcome>,
    started: bool,
    reset_updates: bool,
}

impl RunScreen {
    pub fn new(title: impl Into<String>, label: impl Into<String>, spec: ProcessSpec) -> Self {
        Self::maybe(title, label, Some(spec), "")
    }

    /// `spec == None` finishes immediately with `unavailable` as the error.
    pub fn maybe(
        title: impl Into<String>,
        label: impl Into<String>,
        spec: Option<ProcessSpec>,
        unavailable: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            label: label.into(),
            spec,
            unavailable: unavailable.into(),
            outcome: None,
            started: false,
            reset_updates: false,
        }
    }

    /// On success, report that the repository is up to date.
    pub fn resets_update_count(mut self) -> Self {
        self.reset_updates = true;
        self
    }
}

impl Screen for RunScreen {
    fn init(&mut self, _ctx: &Context) -> Command {
        // Re-init after a pop from above must not run the process twice.
        if self.started {
            return Command::none();
        }
        self.started = true;
        Command::run_or_unavailable(self.spec.clone(), self.unavailable.clone())
    }

    fn update(&mut self, msg: Msg, _ctx: &Context) -> Command {
        match msg {
            Msg::ProcessFinished(outcome) if self.outcome.is_none() => {
                let ok = outcome.is_ok();
                match &outcome {
                    Ok(()) => logging::action(&format!("{}: OK", self.title)),
                    Err(e) => logging::action(&format!("{}: FAILED ({})", self.title, e)),
                }
                system::notify(
                    "mypctools",
                    &format!("{} {}", self.title, if ok { "completed" } else { "failed" }),
                );
                self.outcome = Some(outcome);
                if ok && self.reset_updates {
                    return Command::message(Msg::UpdateCountKnown(0));
                }
                Command::none()
            }
            Msg::Key(_) if self.outcome.is_some() => Command::pop(),
            _ => Command::none(),
        }
    }

    fn render(&self, f: &mut Frame<'_>, area: Rect, _ctx: &Context, theme: &Theme) {
        let mut lines = vec![Line::from("")];
        match &self.outcome {
            None => lines.push(dim_line(format!("{}...", self.label), theme)),
            Some(outcome) => {
                lines.push(outcome_line(&self.label, outcome, theme));
                lines.push(Line::from(""));
                lines.push(any_key_line(theme));
            }
        }
        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), padded(area));
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn short_help(&self) -> Vec<Hint> {
        if self.outcome.is_some() {
            vec![Hint::new("any key", "continue")]
        } else {
            Vec::new()
        }
    }
}
