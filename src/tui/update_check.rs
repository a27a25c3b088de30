use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use super::command::Command;
use super::message::Msg;
use crate::git;

pub const UPDATE_CHECK_TIMEOUT: Duration = Duration::from_secs(3);

/// Count upstream commits in the background. Always yields exactly one
/// `UpdateCountKnown`; errors and timeouts report 0.
pub fn check_for_updates(root: PathBuf) -> Command {
    check_with(UPDATE_CHECK_TIMEOUT, async move {
        git::commits_behind(&root).await
    })
}

pub fn check_with<F>(timeout: Duration, check: F) -> Command
where
    F: Future<Output = Result<usize>> + Send + 'static,
{
    Command::background("update check", timeout, Msg::UpdateCountKnown(0), async move {
        match check.await {
            Ok(n) => {
                tracing::info!(behind = n, "update check finished");
                Some(Msg::UpdateCountKnown(n))
            }
            Err(e) => {
                tracing::debug!(error = %format!("{:#}", e), "update check failed");
                None
            }
        }
    })
}
