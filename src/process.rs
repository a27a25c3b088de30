use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;

/// An external command the TUI can hand the terminal to.
///
/// Only the exit status matters to the caller; output goes straight to the
/// terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    pub cwd: Option<PathBuf>,
}

impl ProcessSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            cwd: None,
        }
    }

    /// `bash -c <script>`
    pub fn shell(script: impl Into<String>) -> Self {
        Self::new("bash").arg("-c").arg(script)
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        for (k, v) in &self.env {
            cmd.env(k, v);
        }
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl fmt::Display for ProcessSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for a in &self.args {
            if a.contains(char::is_whitespace) {
                write!(f, " {:?}", a)?;
            } else {
                write!(f, " {}", a)?;
            }
        }
        Ok(())
    }
}

/// Why a handed-off process did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessError {
    #[error("failed to start {program}: {reason}")]
    Spawn { program: String, reason: String },

    #[error("{program} exited with status {code}")]
    Exit { program: String, code: i32 },

    #[error("{program} was terminated by a signal")]
    Signal { program: String },

    /// No command could be built (e.g. no install method for this distro).
    #[error("{0}")]
    Unavailable(String),

    #[error("terminal handoff failed: {0}")]
    Terminal(String),
}

impl ProcessError {
    pub fn from_status(program: &str, status: ExitStatus) -> Result<(), ProcessError> {
        if status.success() {
            return Ok(());
        }
        match status.code() {
            Some(code) => Err(ProcessError::Exit {
                program: program.to_string(),
                code,
            }),
            None => Err(ProcessError::Signal {
                program: program.to_string(),
            }),
        }
    }
}

pub type ProcessOutcome = Result<(), ProcessError>;

/// Runs a process to completion while it owns the terminal.
pub trait ProcessRunner {
    fn run(&mut self, spec: &ProcessSpec) -> ProcessOutcome;
}

/// Production runner: the child inherits stdin/stdout/stderr and we block
/// until it exits.
#[derive(Debug, Default, Clone, Copy)]
pub struct InheritedStdio;

impl ProcessRunner for InheritedStdio {
    fn run(&mut self, spec: &ProcessSpec) -> ProcessOutcome {
        let status = spec
            .to_command()
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| ProcessError::Spawn {
                program: spec.program.clone(),
                reason: e.to_string(),
            })?;
        ProcessError::from_status(&spec.program, status)
    }
}

/// True if `name` resolves to an executable on `PATH`.
pub fn command_exists(name: &str) -> bool {
    let Some(paths) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&paths).any(|dir| {
        let candidate = dir.join(name);
        candidate.is_file() && is_executable(&candidate)
    })
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    true
}

/// Run a command quietly and report whether it exited successfully.
pub fn succeeds(program: &str, args: &[&str]) -> bool {
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Run a command and capture trimmed stdout, if it succeeded.
pub fn output_of(program: &str, args: &[&str]) -> Option<String> {
    let o = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .ok()?;
    if !o.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&o.stdout).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_quotes_arguments_with_spaces() {
        let spec = ProcessSpec::shell("sudo apt install -y vlc");
        assert_eq!(spec.to_string(), r#"bash -c "sudo apt install -y vlc""#);
    }

    #[cfg(unix)]
    #[test]
    fn inherited_runner_maps_exit_codes() {
        let mut runner = InheritedStdio;
        assert_eq!(runner.run(&ProcessSpec::shell("exit 0")), Ok(()));
        assert_eq!(
            runner.run(&ProcessSpec::shell("exit 3")),
            Err(ProcessError::Exit {
                program: "bash".into(),
                code: 3
            })
        );
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let mut runner = InheritedStdio;
        let err = runner
            .run(&ProcessSpec::new("definitely-not-a-real-binary-4711"))
            .unwrap_err();
        assert!(matches!(err, ProcessError::Spawn { .. }));
    }
}
