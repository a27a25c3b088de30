use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use super::message::Msg;
use super::screen::Screen;
use crate::process::{ProcessError, ProcessSpec};

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// A side effect requested by the navigator or a screen.
///
/// The scheduler turns every command into exactly one eventual message
/// (`Batch` into one per child, `None`/`Quit` into none).
#[must_use]
pub enum Command {
    None,
    Quit,
    /// Delivered through the bus like any other message.
    Message(Msg),
    Batch(Vec<Command>),
    Timer { delay: Duration, msg: Msg },
    Background(BackgroundTask),
    /// Give the terminal to a child process; yields `Msg::ProcessFinished`.
    Handoff(ProcessSpec),
}

pub struct BackgroundTask {
    pub label: &'static str,
    pub timeout: Duration,
    /// `None` (or the timeout) means "use the fallback".
    pub future: BoxFuture<Option<Msg>>,
    pub fallback: Msg,
}

impl Command {
    pub fn none() -> Self {
        Command::None
    }

    pub fn quit() -> Self {
        Command::Quit
    }

    pub fn message(msg: impl Into<Msg>) -> Self {
        Command::Message(msg.into())
    }

    pub fn navigate(screen: impl Screen + 'static) -> Self {
        Command::Message(Msg::Navigate(Box::new(screen)))
    }

    pub fn pop() -> Self {
        Command::Message(Msg::Pop)
    }

    /// `n` pops in a row, delivered in order.
    pub fn pop_n(n: usize) -> Self {
        Command::batch((0..n).map(|_| Command::pop()))
    }

    /// Show a toast; the navigator also pops the current screen.
    pub fn toast(text: impl Into<String>, is_error: bool) -> Self {
        Command::Message(Msg::Toast {
            text: text.into(),
            is_error,
        })
    }

    pub fn timer(delay: Duration, msg: Msg) -> Self {
        Command::Timer { delay, msg }
    }

    pub fn background<F>(label: &'static str, timeout: Duration, fallback: Msg, future: F) -> Self
    where
        F: Future<Output = Option<Msg>> + Send + 'static,
    {
        Command::Background(BackgroundTask {
            label,
            timeout,
            future: Box::pin(future),
            fallback,
        })
    }

    /// Run blocking work on tokio's blocking pool.
    pub fn blocking<F>(label: &'static str, timeout: Duration, fallback: Msg, f: F) -> Self
    where
        F: FnOnce() -> Msg + Send + 'static,
    {
        Command::background(label, timeout, fallback, async move {
            tokio::task::spawn_blocking(f).await.ok()
        })
    }

    pub fn run_with_terminal(spec: ProcessSpec) -> Self {
        Command::Handoff(spec)
    }

    /// Hand off `spec` if there is one, otherwise report `reason` as a failed
    /// process so the caller goes through the same completion path.
    pub fn run_or_unavailable(spec: Option<ProcessSpec>, reason: impl Into<String>) -> Self {
        match spec {
            Some(spec) => Command::Handoff(spec),
            None => Command::Message(Msg::ProcessFinished(Err(ProcessError::Unavailable(
                reason.into(),
            )))),
        }
    }

    /// Flattens nested batches and drops `None`s.
    pub fn batch(cmds: impl IntoIterator<Item = Command>) -> Self {
        let mut out = Vec::new();
        for cmd in cmds {
            match cmd {
                Command::None => {}
                Command::Batch(inner) => out.extend(inner),
                other => out.push(other),
            }
        }
        match out.len() {
            0 => Command::None,
            1 => out.pop().unwrap_or(Command::None),
            _ => Command::Batch(out),
        }
    }

    #[cfg(test)]
    pub fn is_none(&self) -> bool {
        matches!(self, Command::None)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::None => f.write_str("None"),
            Command::Quit => f.write_str("Quit"),
            Command::Message(m) => f.debug_tuple("Message").field(m).finish(),
            Command::Batch(cmds) => f.debug_tuple("Batch").field(cmds).finish(),
            Command::Timer { delay, msg } => f
                .debug_struct("Timer")
                .field("delay", delay)
                .field("msg", msg)
                .finish(),
            Command::Background(task) => f
                .debug_struct("Background")
                .field("label", &task.label)
                .field("timeout", &task.timeout)
                .finish(),
            Command::Handoff(spec) => f.debug_tuple("Handoff").field(&spec.to_string()).finish(),
        }
    }
}
