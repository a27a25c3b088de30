use std::path::PathBuf;

use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use super::command::Command;
use super::message::Msg;
use super::theme::{Palette, Theme};
use crate::distro::DistroInfo;

/// State shared by all screens. Owned by the navigator; screens only ever
/// see `&Context` and request changes through messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub width: u16,
    pub height: u16,
    pub distro: DistroInfo,
    /// Repository root holding `scripts/`.
    pub root_dir: PathBuf,
    /// Commits behind upstream; 0 until the update check reports.
    pub update_count: usize,
    pub palette: Palette,
}

impl Context {
    pub fn new(distro: DistroInfo, root_dir: PathBuf, palette: Palette) -> Self {
        Self {
            width: 80,
            height: 24,
            distro,
            root_dir,
            update_count: 0,
            palette,
        }
    }
}

/// One key/description pair of a screen's footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hint {
    pub key: &'static str,
    pub desc: &'static str,
}

impl Hint {
    pub const fn new(key: &'static str, desc: &'static str) -> Self {
        Self { key, desc }
    }
}

/// A menu, dialog or progress view living on the navigation stack.
///
/// Screens leave the stack only by returning `Pop`/`Navigate` commands; they
/// never touch another screen.
pub trait Screen: Send {
    /// Called when the screen becomes the top of the stack (pushed, or
    /// uncovered by a pop).
    fn init(&mut self, _ctx: &Context) -> Command {
        Command::none()
    }

    fn update(&mut self, msg: Msg, ctx: &Context) -> Command;

    fn render(&self, f: &mut Frame<'_>, area: Rect, ctx: &Context, theme: &Theme);

    fn title(&self) -> String;

    fn short_help(&self) -> Vec<Hint> {
        Vec::new()
    }

    /// Return true to receive a key (e.g. Esc) that would otherwise be
    /// handled globally.
    fn owns_key(&self, _key: &KeyEvent) -> bool {
        false
    }
}
