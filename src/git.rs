use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::{Command, Stdio};

use crate::process::ProcessSpec;

/// Branch the repository tracks for updates.
pub const UPSTREAM_BRANCH: &str = "main";

pub fn is_repo(dir: &Path) -> bool {
    Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["rev-parse", "--is-inside-work-tree"])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn run_git_status(dir: &Path, args: &[&str]) -> Result<std::process::ExitStatus> {
    Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("Failed to run git {}", args.join(" ")))
}

/// Background git: never prompts, since the TUI owns `/dev/tty`.
async fn run_git_async(dir: &Path, args: &[&str]) -> Result<std::process::Output> {
    tokio::process::Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .env("GIT_TERMINAL_PROMPT", "0")
        .env("GIT_SSH_COMMAND", "ssh -o BatchMode=yes")
        .env_remove("GIT_ASKPASS")
        .env_remove("SSH_ASKPASS")
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .with_context(|| format!("Failed to run git {}", args.join(" ")))
}

/// Fetch upstream and count commits `HEAD` is behind it.
///
/// Kills git when the future is dropped, so callers can put a timeout around
/// it without leaking a hung fetch.
pub async fn commits_behind(dir: &Path) -> Result<usize> {
    let fetch = run_git_async(dir, &["fetch", "origin", UPSTREAM_BRANCH]).await?;
    if !fetch.status.success() {
        bail!(
            "git fetch failed: {}",
            String::from_utf8_lossy(&fetch.stderr).trim()
        );
    }

    let range = format!("HEAD..origin/{}", UPSTREAM_BRANCH);
    let out = run_git_async(dir, &["rev-list", &range, "--count"]).await?;
    if !out.status.success() {
        bail!(
            "git rev-list failed: {}",
            String::from_utf8_lossy(&out.stderr).trim()
        );
    }
    parse_count(&String::from_utf8_lossy(&out.stdout))
}

fn parse_count(text: &str) -> Result<usize> {
    text.trim()
        .parse()
        .with_context(|| format!("Unexpected rev-list output: {:?}", text.trim()))
}

/// Interactive pull, run with the terminal handed over.
pub fn pull_spec(dir: &Path) -> ProcessSpec {
    ProcessSpec::new("git")
        .arg("-C")
        .arg(dir.to_string_lossy())
        .args(["pull", "origin", UPSTREAM_BRANCH])
}

/// Fast-forward-only pull with output on the console (used outside the TUI).
pub fn pull_ff_only(dir: &Path) -> Result<()> {
    if !is_repo(dir) {
        bail!("{} is not a git repository.", dir.display());
    }
    let status = run_git_status(dir, &["pull", "--ff-only"])?;
    if !status.success() {
        bail!("git pull --ff-only failed.");
    }
    Ok(())
}
