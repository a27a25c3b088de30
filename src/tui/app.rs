use std::time::Instant;

use super::command::Command;
use super::input::{self, KeyRoute};
use super::message::Msg;
use super::screen::{Context, Screen};
use super::theme::Theme;
use super::toast::{Toast, ToastState, TOAST_DURATION};

/// Navigation stack that cannot be empty: `base` is the root screen.
struct Stack {
    base: Box<dyn Screen>,
    above: Vec<Box<dyn Screen>>,
}

impl Stack {
    fn top(&self) -> &dyn Screen {
        self.above.last().unwrap_or(&self.base).as_ref()
    }

    fn top_mut(&mut self) -> &mut dyn Screen {
        self.above.last_mut().unwrap_or(&mut self.base).as_mut()
    }

    fn depth(&self) -> usize {
        self.above.len() + 1
    }
}

/// The root controller: owns the screen stack, the shared context, the theme
/// and the toast, and routes every message.
pub struct App {
    stack: Stack,
    ctx: Context,
    theme: Theme,
    toast: ToastState,
}

impl App {
    pub fn new(root: Box<dyn Screen>, ctx: Context) -> Self {
        let theme = Theme::from_palette(ctx.palette);
        Self {
            stack: Stack {
                base: root,
                above: Vec::new(),
            },
            ctx,
            theme,
            toast: ToastState::default(),
        }
    }

    /// Initialise the root screen. Call once before the first dispatch.
    pub fn start(&mut self) -> Command {
        self.stack.base.init(&self.ctx)
    }

    pub fn dispatch(&mut self, msg: Msg) -> Command {
        self.dispatch_at(msg, Instant::now())
    }

    pub fn dispatch_at(&mut self, msg: Msg, now: Instant) -> Command {
        match msg {
            Msg::Key(key) => match input::route_key(&key, self.stack.top()) {
                KeyRoute::Ignore => Command::none(),
                KeyRoute::Quit => Command::quit(),
                KeyRoute::Back => self.pop(),
                KeyRoute::Forward => self.forward(Msg::Key(key)),
            },
            Msg::Resize(w, h) => {
                self.ctx.width = w;
                self.ctx.height = h;
                self.forward(Msg::Resize(w, h))
            }
            Msg::UpdateCountKnown(n) => {
                self.ctx.update_count = n;
                self.forward(Msg::UpdateCountKnown(n))
            }
            Msg::ThemeChanged(palette) => {
                self.ctx.palette = palette;
                self.theme = Theme::from_palette(palette);
                self.forward(Msg::ThemeChanged(palette))
            }
            Msg::Navigate(screen) => self.push(screen),
            Msg::Pop => self.pop(),
            Msg::Toast { text, is_error } => self.show_toast(text, is_error, now),
            Msg::ToastExpire(stamp) => {
                self.toast.expire(stamp, now);
                Command::none()
            }
            other => self.forward(other),
        }
    }

    fn forward(&mut self, msg: Msg) -> Command {
        self.stack.top_mut().update(msg, &self.ctx)
    }

    fn push(&mut self, mut screen: Box<dyn Screen>) -> Command {
        tracing::debug!(screen = %screen.title(), depth = self.depth() + 1, "navigate");
        let cmd = screen.init(&self.ctx);
        self.stack.above.push(screen);
        cmd
    }

    fn pop(&mut self) -> Command {
        match self.stack.above.pop() {
            Some(popped) => {
                tracing::debug!(screen = %popped.title(), depth = self.depth(), "pop");
                self.stack.top_mut().init(&self.ctx)
            }
            None => {
                tracing::info!("user requested exit");
                Command::quit()
            }
        }
    }

    /// Toast-then-pop as one transition. At the root there is nothing to pop
    /// and the toast is just shown.
    fn show_toast(&mut self, text: String, is_error: bool, now: Instant) -> Command {
        if is_error {
            tracing::warn!(toast = %text);
        } else {
            tracing::info!(toast = %text);
        }
        let stamp = self.toast.show(text, is_error, now);
        let expire = Command::timer(TOAST_DURATION, Msg::ToastExpire(stamp));
        if self.depth() > 1 {
            Command::batch([self.pop(), expire])
        } else {
            expire
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn active(&self) -> &dyn Screen {
        self.stack.top()
    }

    /// Titles from the root to the active screen.
    pub fn titles(&self) -> Vec<String> {
        std::iter::once(&self.stack.base)
            .chain(self.stack.above.iter())
            .map(|s| s.title())
            .collect()
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.current()
    }
}
