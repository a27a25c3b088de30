//! Full-screen TUI entrypoint.
//!
//! Wires the crossterm terminal into the runtime loop; state, routing and
//! rendering live in the submodules.
//!
//! Modules:
//! - `app`: navigation stack, shared context, toast
//! - `bus`/`tasks`: message channel and command scheduler
//! - `handoff`: giving the terminal to child processes
//! - `input`: key routing + cursor helpers
//! - `view`: frame composition (ratatui)
//! - `runtime`: the synchronous loop
//! - `screens`: every menu and dialog

pub mod app;
pub mod bus;
pub mod command;
pub mod handoff;
pub mod input;
pub mod message;
pub mod runtime;
pub mod screen;
pub mod screens;
pub mod sequence;
pub mod tasks;
pub mod theme;
pub mod toast;
pub mod update_check;
pub mod view;

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context as _, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::config::Config;
use crate::distro;
use crate::process::InheritedStdio;
use app::App;
use handoff::TerminalOwner;
use message::Msg;
use runtime::{Frontend, Runtime};
use screen::Context;
use screens::main_menu::MainMenu;
use theme::Palette;

/// Background tasks get this long to wind down after the loop exits.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

struct CrosstermFrontend {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl CrosstermFrontend {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal backend")?;
        terminal.clear().ok();
        Ok(Self { terminal })
    }

    /// Best effort; used on the way out, including after errors.
    fn restore(&mut self) {
        disable_raw_mode().ok();
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen).ok();
        self.terminal.show_cursor().ok();
    }
}

impl TerminalOwner for CrosstermFrontend {
    fn suspend(&mut self) -> Result<()> {
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        disable_raw_mode().context("Failed to disable raw mode")?;
        self.terminal.show_cursor().ok();
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(self.terminal.backend_mut(), EnterAlternateScreen)
            .context("Failed to enter alternate screen")?;
        // Keys typed for the child must not reach the menus.
        while event::poll(Duration::ZERO).context("Failed to poll events")? {
            event::read().context("Failed to read event")?;
        }
        self.terminal.clear().context("Failed to clear terminal")?;
        Ok(())
    }
}

impl Frontend for CrosstermFrontend {
    fn draw(&mut self, app: &App) -> Result<()> {
        self.terminal
            .draw(|f| view::draw(f, app))
            .context("Failed to draw frame")?;
        Ok(())
    }

    fn poll(&mut self, timeout: Duration) -> Result<Option<Msg>> {
        if !event::poll(timeout).context("Failed to poll events")? {
            return Ok(None);
        }
        let msg = match event::read().context("Failed to read event")? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(Msg::Key(key)),
            Event::Resize(w, h) => Some(Msg::Resize(w, h)),
            _ => None,
        };
        Ok(msg)
    }

    fn size(&self) -> Result<(u16, u16)> {
        crossterm::terminal::size().context("Failed to read terminal size")
    }
}

/// Run the full-screen TUI until the user quits.
///
/// Notes:
/// - The UI loop is synchronous; background work runs on a tokio runtime
///   owned here and reports back through the message bus.
/// - The terminal is restored even when the loop fails.
pub fn run_tui(root_dir: PathBuf) -> Result<()> {
    let config = Config::load_or_default();
    let palette = config
        .theme
        .as_deref()
        .map(Palette::by_name)
        .unwrap_or_default();
    let distro = distro::detect();
    tracing::info!(distro = %distro.name, family = %distro.family, root = %root_dir.display(), "starting");

    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    let ctx = Context::new(distro, root_dir.clone(), palette);
    let app = App::new(Box::new(MainMenu::new()), ctx);

    let frontend = CrosstermFrontend::enter()?;
    let mut runtime = Runtime::new(app, frontend, InheritedStdio, rt.handle().clone());
    runtime.schedule(update_check::check_for_updates(root_dir));
    let result = runtime.run();

    let mut frontend = runtime.into_frontend();
    frontend.restore();
    rt.shutdown_timeout(SHUTDOWN_GRACE);

    if let Err(e) = &result {
        tracing::error!(error = %format!("{:#}", e), "tui exited with an error");
    }
    result
}
