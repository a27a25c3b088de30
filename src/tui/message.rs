use std::collections::HashSet;
use std::fmt;

use crossterm::event::KeyEvent;

use super::screen::Screen;
use super::theme::Palette;
use crate::process::ProcessOutcome;
use crate::system::info::SystemInfo;
use crate::system::services::ServiceStatus;

/// Everything that flows through the message bus.
///
/// Messages are values: once sent they are only moved, never mutated.
pub enum Msg {
    Key(KeyEvent),
    Resize(u16, u16),
    /// A timer tick; the id lets a screen ignore ticks it no longer cares about.
    Tick(u64),
    Navigate(Box<dyn Screen>),
    Pop,
    Toast { text: String, is_error: bool },
    /// Carries the stamp of the toast it was scheduled for.
    ToastExpire(u64),
    ProcessFinished(ProcessOutcome),
    UpdateCountKnown(usize),
    ThemeChanged(Palette),
    Screen(ScreenEvent),
}

/// Results of background work started by a particular screen.
#[derive(Debug)]
pub enum ScreenEvent {
    InstalledApps(HashSet<&'static str>),
    ServicesLoaded(Result<Vec<ServiceStatus>, String>),
    ServiceStatus(ServiceStatus),
    SystemInfo(Box<SystemInfo>),
    CachesCleared(Result<(), String>),
}

impl From<ScreenEvent> for Msg {
    fn from(ev: ScreenEvent) -> Self {
        Msg::Screen(ev)
    }
}

impl fmt::Debug for Msg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Msg::Key(k) => f.debug_tuple("Key").field(k).finish(),
            Msg::Resize(w, h) => f.debug_tuple("Resize").field(w).field(h).finish(),
            Msg::Tick(id) => f.debug_tuple("Tick").field(id).finish(),
            Msg::Navigate(s) => f.debug_tuple("Navigate").field(&s.title()).finish(),
            Msg::Pop => f.write_str("Pop"),
            Msg::Toast { text, is_error } => f
                .debug_struct("Toast")
                .field("text", text)
                .field("is_error", is_error)
                .finish(),
            Msg::ToastExpire(stamp) => f.debug_tuple("ToastExpire").field(stamp).finish(),
            Msg::ProcessFinished(r) => f.debug_tuple("ProcessFinished").field(r).finish(),
            Msg::UpdateCountKnown(n) => f.debug_tuple("UpdateCountKnown").field(n).finish(),
            Msg::ThemeChanged(p) => f.debug_tuple("ThemeChanged").field(&p.name).finish(),
            Msg::Screen(ev) => f.debug_tuple("Screen").field(ev).finish(),
        }
    }
}
