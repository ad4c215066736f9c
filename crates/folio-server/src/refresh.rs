//! Periodic source refresh.
//!
//! Re-pulls the site content repository on a daily schedule so a deployed
//! server picks up published articles without a restart. Pure process glue:
//! the rendering pipeline notices new content only through its normal
//! cache-miss path.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::process::Command;
use tokio::time::{sleep, timeout};

/// Delay before the first pull after startup.
const INITIAL_DELAY: Duration = Duration::from_secs(30);
/// Interval between pulls.
const PULL_INTERVAL: Duration = Duration::from_secs(60 * 60 * 24);
/// Upper bound on one `git pull` invocation.
const PULL_TIMEOUT: Duration = Duration::from_secs(30);

/// Spawn the refresh task.
pub(crate) fn spawn(root_dir: PathBuf) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        sleep(INITIAL_DELAY).await;
        loop {
            pull(&root_dir).await;
            sleep(PULL_INTERVAL).await;
        }
    })
}

/// Run one bounded `git pull` in the site root.
async fn pull(root_dir: &Path) {
    let result = timeout(
        PULL_TIMEOUT,
        Command::new("git")
            .arg("pull")
            .current_dir(root_dir)
            .output(),
    )
    .await;

    match result {
        Ok(Ok(output)) if output.status.success() => {
            tracing::info!(
                output = %String::from_utf8_lossy(&output.stdout).trim(),
                "git pull"
            );
        }
        Ok(Ok(output)) => {
            tracing::warn!(
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "git pull failed"
            );
        }
        Ok(Err(err)) => tracing::warn!(error = %err, "git pull could not run"),
        Err(_) => tracing::warn!(timeout = ?PULL_TIMEOUT, "git pull timed out"),
    }
}
