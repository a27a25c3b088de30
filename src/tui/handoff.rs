use anyhow::{Context, Result};

use super::message::Msg;
use crate::process::{ProcessError, ProcessRunner, ProcessSpec};

/// Something that can give up the terminal and take it back.
///
/// `suspend` leaves raw mode and the alternate screen; `resume` restores
/// them. Nothing may draw or read input in between.
pub trait TerminalOwner {
    fn suspend(&mut self) -> Result<()>;
    fn resume(&mut self) -> Result<()>;
}

/// Run `spec` with the terminal handed over and produce its
/// `ProcessFinished` message.
///
/// A failed suspend is reported as a failed process (the child never ran).
/// A failed resume is fatal: the UI cannot continue without its terminal.
pub fn run_with_terminal<T, P>(term: &mut T, runner: &mut P, spec: &ProcessSpec) -> Result<Msg>
where
    T: TerminalOwner + ?Sized,
    P: ProcessRunner + ?Sized,
{
    tracing::info!(process = %spec, "handing terminal to child");

    if let Err(e) = term.suspend() {
        tracing::error!(error = %format!("{:#}", e), "failed to suspend terminal");
        // Best effort: we may be half-way out of raw mode.
        term.resume().context("Failed to restore terminal")?;
        return Ok(Msg::ProcessFinished(Err(ProcessError::Terminal(format!("{:#}", e)))));
    }

    let outcome = runner.run(spec);

    term.resume().context("Failed to restore terminal after child process")?;

    match &outcome {
        Ok(()) => tracing::info!(process = %spec, "child finished"),
        Err(e) => tracing::warn!(process = %spec, error = %e, "child failed"),
    }
    Ok(Msg::ProcessFinished(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use crate::process::ProcessOutcome;

    #[derive(Default)]
    struct FakeTerm {
        events: Vec<&'static str>,
        fail_suspend: bool,
    }

    impl TerminalOwner for FakeTerm {
        fn suspend(&mut self) -> Result<()> {
            self.events.push("suspend");
            if self.fail_suspend {
                bail!("no tty");
            }
            Ok(())
        }
        fn resume(&mut self) -> Result<()> {
            self.events.push("resume");
            Ok(())
        }
    }

    struct Fixed(ProcessOutcome);

    impl ProcessRunner for Fixed {
        fn run(&mut self, _spec: &ProcessSpec) -> ProcessOutcome {
            self.0.clone()
        }
    }

    #[test]
    fn child_runs_between_suspend_and_resume() {
        let mut term = FakeTerm::default();
        let failure = Err(ProcessError::Exit {
            program: "bash".into(),
            code: 1,
        });
        let msg = run_with_terminal(&mut term, &mut Fixed(failure.clone()), &ProcessSpec::new("bash")).unwrap();
        assert_eq!(term.events, vec!["suspend", "resume"]);
        assert!(matches!(msg, Msg::ProcessFinished(ref r) if *r == failure));
    }

    #[test]
    fn failed_suspend_is_reported_not_fatal() {
        let mut term = FakeTerm {
            fail_suspend: true,
            ..Default::default()
        };
        let msg = run_with_terminal(&mut term, &mut Fixed(Ok(())), &ProcessSpec::new("true")).unwrap();
        assert!(matches!(msg, Msg::ProcessFinished(Err(ProcessError::Terminal(_)))));
    }
}
