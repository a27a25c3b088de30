use std::time::Duration;

use anyhow::Result;
use tokio::runtime::Handle;

use super::app::App;
use super::bus::MessageBus;
use super::command::Command;
use super::handoff::{self, TerminalOwner};
use super::message::Msg;
use super::tasks::Scheduler;
use crate::process::ProcessRunner;

pub const TICK_RATE: Duration = Duration::from_millis(33);

/// The terminal side of the loop: drawing, input and size. Production uses
/// crossterm; tests use ratatui's `TestBackend`.
pub trait Frontend: TerminalOwner {
    fn draw(&mut self, app: &App) -> Result<()>;

    /// Wait up to `timeout` for one input event.
    fn poll(&mut self, timeout: Duration) -> Result<Option<Msg>>;

    fn size(&self) -> Result<(u16, u16)>;
}

/// The synchronous UI loop.
///
/// Each `step`:
/// 1) drains the bus through the navigator, scheduling returned commands
/// 2) if a handoff is pending, runs it (no draw, no input) and returns
/// 3) otherwise draws one frame and polls input for up to one tick
///
/// Step 2 is the only place a child process ever gets the terminal.
pub struct Runtime<F, P> {
    app: App,
    bus: MessageBus,
    scheduler: Scheduler,
    frontend: F,
    runner: P,
}

impl<F: Frontend, P: ProcessRunner> Runtime<F, P> {
    pub fn new(app: App, frontend: F, runner: P, handle: Handle) -> Self {
        Self {
            app,
            bus: MessageBus::new(),
            scheduler: Scheduler::new(handle),
            frontend,
            runner,
        }
    }

    /// Init the root screen and report the initial terminal size.
    pub fn start(&mut self) -> Result<()> {
        let cmd = self.app.start();
        self.schedule(cmd);
        let (w, h) = self.frontend.size()?;
        self.bus.push(Msg::Resize(w, h));
        Ok(())
    }

    /// Run a command issued from outside any screen (e.g. the startup
    /// update check).
    pub fn schedule(&mut self, cmd: Command) {
        self.scheduler.execute(cmd, &self.bus);
    }

    /// One iteration. Returns `false` once the app asked to quit.
    pub fn step(&mut self) -> Result<bool> {
        self.drain();
        if self.scheduler.quit_requested() {
            return Ok(false);
        }

        if let Some(spec) = self.scheduler.take_handoff() {
            let msg = handoff::run_with_terminal(&mut self.frontend, &mut self.runner, &spec)?;
            self.bus.push(msg);
            // The child may have resized the terminal while it owned it.
            let (w, h) = self.frontend.size()?;
            self.bus.push(Msg::Resize(w, h));
            return Ok(true);
        }

        self.frontend.draw(&self.app)?;
        if let Some(msg) = self.frontend.poll(TICK_RATE)? {
            self.bus.push(msg);
        }
        Ok(true)
    }

    fn drain(&mut self) {
        while !self.scheduler.quit_requested() && !self.scheduler.has_pending_handoff() {
            let Some(msg) = self.bus.try_next() else {
                break;
            };
            let cmd = self.app.dispatch(msg);
            self.scheduler.execute(cmd, &self.bus);
        }
    }

    pub fn run(&mut self) -> Result<()> {
        self.start()?;
        while self.step()? {}
        Ok(())
    }

    pub fn into_frontend(self) -> F {
        self.frontend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distro::DistroInfo;
    use crate::process::{ProcessError, ProcessOutcome, ProcessSpec};
    use crate::tui::input::press;
    use crate::tui::screen::{Context as ScreenContext, Screen};
    use crate::tui::theme::Theme;
    use crate::tui::view;
    use crossterm::event::KeyCode;
    use proptest::prelude::*;
    use ratatui::{backend::TestBackend, layout::Rect, Frame, Terminal};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<String>>>;

    fn note(log: &Log, what: impl Into<String>) {
        log.lock().unwrap().push(what.into());
    }

    struct FakeFrontend {
        terminal: Terminal<TestBackend>,
        input: VecDeque<Msg>,
        log: Log,
    }

    impl TerminalOwner for FakeFrontend {
        fn suspend(&mut self) -> Result<()> {
            note(&self.log, "suspend");
            Ok(())
        }
        fn resume(&mut self) -> Result<()> {
            note(&self.log, "resume");
            Ok(())
        }
    }

    impl Frontend for FakeFrontend {
        fn draw(&mut self, app: &App) -> Result<()> {
            self.terminal.draw(|f| view::draw(f, app))?;
            Ok(())
        }
        fn poll(&mut self, _timeout: Duration) -> Result<Option<Msg>> {
            Ok(self.input.pop_front())
        }
        fn size(&self) -> Result<(u16, u16)> {
            Ok((60, 20))
        }
    }

    struct FakeRunner {
        log: Log,
        outcomes: VecDeque<ProcessOutcome>,
    }

    impl ProcessRunner for FakeRunner {
        fn run(&mut self, spec: &ProcessSpec) -> ProcessOutcome {
            note(&self.log, format!("child {}", spec.program));
            self.outcomes.pop_front().unwrap_or(Ok(()))
        }
    }

    /// Hands off `remaining` processes back to back, one per finished
    /// child. Key 'r' hands off one extra process, 'q' leaves. Logs
    /// issue/finish/render.
    struct Installer {
        log: Log,
        remaining: usize,
    }

    impl Screen for Installer {
        fn init(&mut self, _ctx: &ScreenContext) -> Command {
            self.issue_next()
        }
        fn update(&mut self, msg: Msg, _ctx: &ScreenContext) -> Command {
            match msg {
                Msg::ProcessFinished(r) => {
                    note(&self.log, format!("finished ok={}", r.is_ok()));
                    self.issue_next()
                }
                Msg::Key(key) if key.code == KeyCode::Char('r') => self.issue("extra"),
                Msg::Key(key) if key.code == KeyCode::Char('q') => Command::pop(),
                _ => Command::none(),
            }
        }
        fn render(&self, _f: &mut Frame<'_>, _area: Rect, _ctx: &ScreenContext, _theme: &Theme) {
            note(&self.log, "render");
        }
        fn title(&self) -> String {
            "installer".into()
        }
    }

    impl Installer {
        fn issue_next(&mut self) -> Command {
            if self.remaining == 0 {
                return Command::none();
            }
            self.remaining -= 1;
            self.issue(&format!("job{}", self.remaining))
        }

        fn issue(&self, program: &str) -> Command {
            note(&self.log, "issue");
            Command::run_with_terminal(ProcessSpec::new(program))
        }
    }

    fn failure() -> ProcessOutcome {
        Err(ProcessError::Exit {
            program: "job".into(),
            code: 2,
        })
    }

    fn runtime(
        log: &Log,
        jobs: usize,
        outcomes: Vec<ProcessOutcome>,
        input: Vec<Msg>,
    ) -> Runtime<FakeFrontend, FakeRunner> {
        let ctx = ScreenContext::new(DistroInfo::unknown(), "/tmp".into(), Default::default());
        let app = App::new(
            Box::new(Installer {
                log: Arc::clone(log),
                remaining: jobs,
            }),
            ctx,
        );
        let frontend = FakeFrontend {
            terminal: Terminal::new(TestBackend::new(60, 20)).unwrap(),
            input: input.into(),
            log: Arc::clone(log),
        };
        let runner = FakeRunner {
            log: Arc::clone(log),
            outcomes: outcomes.into(),
        };
        Runtime::new(app, frontend, runner, Handle::current())
    }

    fn run_to_quit(rt: &mut Runtime<FakeFrontend, FakeRunner>) {
        rt.start().unwrap();
        let mut steps = 0;
        while rt.step().unwrap() {
            steps += 1;
            assert!(steps < 200, "runtime did not quit");
        }
    }

    /// Fails if a frame was drawn between a handoff being issued and its
    /// result arriving, or if a child ran outside suspend/resume.
    fn assert_exclusive(log: &[String]) {
        let mut outstanding = false;
        for (i, entry) in log.iter().enumerate() {
            match entry.as_str() {
                "issue" => outstanding = true,
                e if e.starts_with("finished") => outstanding = false,
                "render" => assert!(!outstanding, "rendered during a handoff: {:?}", log),
                e if e.starts_with("child") => {
                    assert_eq!(log[i - 1], "suspend", "{:?}", log);
                    assert_eq!(log[i + 1], "resume", "{:?}", log);
                }
                _ => {}
            }
        }
    }

    fn count(log: &[String], pred: impl Fn(&str) -> bool) -> usize {
        log.iter().filter(|e| pred(e.as_str())).count()
    }

    #[tokio::test]
    async fn nothing_renders_while_a_child_owns_the_terminal() {
        let log: Log = Arc::default();
        let mut rt = runtime(
            &log,
            3,
            vec![Ok(()), failure()],
            vec![Msg::Key(press(KeyCode::Char('q')))],
        );
        run_to_quit(&mut rt);

        let log = log.lock().unwrap().clone();
        assert_exclusive(&log);
        assert_eq!(count(&log, |e| e.starts_with("child")), 3);
        assert_eq!(count(&log, |e| e == "suspend"), 3);
        assert_eq!(count(&log, |e| e == "finished ok=false"), 1);
        assert!(log.contains(&"render".to_string()));
    }

    #[tokio::test]
    async fn quit_stops_the_loop() {
        let log: Log = Arc::default();
        // Installer pops on 'q'; popping the root quits.
        let mut rt = runtime(&log, 0, Vec::new(), vec![Msg::Key(press(KeyCode::Char('q')))]);
        rt.start().unwrap();
        assert!(rt.step().unwrap());
        assert!(!rt.step().unwrap());
    }

    proptest! {
        #[test]
        fn handoffs_never_overlap_rendering(
            jobs in 0usize..8,
            outcomes in proptest::collection::vec(any::<bool>(), 0..16),
            keys in proptest::collection::vec(
                prop_oneof![Just('r'), Just('x'), Just('j')], 0..8),
        ) {
            let tokio_rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            let _guard = tokio_rt.enter();

            let log: Log = Arc::default();
            let mut input: Vec<Msg> = keys
                .iter()
                .map(|&c| Msg::Key(press(KeyCode::Char(c))))
                .collect();
            input.push(Msg::Key(press(KeyCode::Char('q'))));
            let planned: Vec<ProcessOutcome> = outcomes
                .iter()
                .map(|&ok| if ok { Ok(()) } else { failure() })
                .collect();

            let mut rt = runtime(&log, jobs, planned, input);
            run_to_quit(&mut rt);

            let log = log.lock().unwrap().clone();
            assert_exclusive(&log);

            let children = jobs + keys.iter().filter(|&&c| c == 'r').count();
            prop_assert_eq!(count(&log, |e| e.starts_with("child")), children);
            prop_assert_eq!(count(&log, |e| e == "suspend"), children);
            prop_assert_eq!(count(&log, |e| e == "resume"), children);
            prop_assert_eq!(count(&log, |e| e == "issue"), children);

            // Runner falls back to success once the planned outcomes run out.
            let failed = outcomes.iter().take(children).filter(|ok| !**ok).count();
            prop_assert_eq!(count(&log, |e| e == "finished ok=false"), failed);
            prop_assert!(log.contains(&"render".to_string()));
        }
    }
}
