use std::collections::VecDeque;
use std::time::Duration;

use tokio::runtime::Handle;

use super::bus::MessageBus;
use super::command::{BackgroundTask, Command};
use crate::process::ProcessSpec;

/// Turns commands into work that eventually posts a message on the bus.
///
/// Model:
/// - `execute` is called on the UI thread with whatever `dispatch` returned.
/// - Timers and background tasks run on the tokio runtime and own a sender.
/// - Terminal handoffs are *not* run here: they are queued and the runtime
///   loop picks them up at its single gatekeeping point, where rendering and
///   input are stopped.
///
/// Every issued command yields exactly one message (background tasks that
/// fail or time out post their fallback).
pub struct Scheduler {
    handle: Handle,
    handoffs: VecDeque<ProcessSpec>,
    quit: bool,
}

impl Scheduler {
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            handoffs: VecDeque::new(),
            quit: false,
        }
    }

    pub fn execute(&mut self, cmd: Command, bus: &MessageBus) {
        match cmd {
            Command::None => {}
            Command::Quit => self.quit = true,
            Command::Message(msg) => bus.push(msg),
            Command::Batch(cmds) => {
                for c in cmds {
                    self.execute(c, bus);
                }
            }
            Command::Timer { delay, msg } => {
                let tx = bus.sender();
                self.handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(msg);
                });
            }
            Command::Background(task) => self.spawn_background(task, bus),
            Command::Handoff(spec) => {
                if !self.handoffs.is_empty() {
                    tracing::warn!(process = %spec, "handoff requested while another is pending; queued");
                }
                self.handoffs.push_back(spec);
            }
        }
    }

    fn spawn_background(&self, task: BackgroundTask, bus: &MessageBus) {
        let tx = bus.sender();
        let BackgroundTask {
            label,
            timeout,
            future,
            fallback,
        } = task;

        self.handle.spawn(async move {
            let msg = match tokio::time::timeout(timeout, future).await {
                Ok(Some(msg)) => msg,
                Ok(None) => {
                    tracing::debug!(task = label, "background task failed; using fallback");
                    fallback
                }
                Err(_) => {
                    tracing::debug!(task = label, ?timeout, "background task timed out");
                    fallback
                }
            };
            let _ = tx.send(msg);
        });
    }

    pub fn has_pending_handoff(&self) -> bool {
        !self.handoffs.is_empty()
    }

    pub fn take_handoff(&mut self) -> Option<ProcessSpec> {
        self.handoffs.pop_front()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }
}

/// A simple unicode spinner sequence.
///
/// You can render `frames[tick % frames.len()]`.
pub fn spinner_frames() -> &'static [&'static str] {
    &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]
}

pub const SPINNER_INTERVAL: Duration = Duration::from_millis(100);

/// Format elapsed time compactly, e.g. `42s` or `3m07s`.
pub fn format_elapsed(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else {
        format!("{}m{:02}s", secs / 60, secs % 60)
    }
}
