//! Pipeline glue: event context, step outputs, and workflow commands.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use deploywait_core::WaitError;

#[derive(Deserialize)]
struct EventPayload {
    #[serde(default)]
    pull_request: Option<PullRequest>,
}

#[derive(Deserialize)]
struct PullRequest {
    head: Head,
}

#[derive(Deserialize)]
struct Head {
    sha: String,
}

/// Commit sha of the triggering event.
///
/// Pull-request events build the head commit of the PR branch; `GITHUB_SHA`
/// points at the synthetic merge commit there, so the sha is read from the
/// event payload instead. Every other event uses `GITHUB_SHA` directly.
pub fn commit_sha() -> Result<String, WaitError> {
    if std::env::var("GITHUB_EVENT_NAME").as_deref() == Ok("pull_request") {
        if let Ok(path) = std::env::var("GITHUB_EVENT_PATH") {
            if let Some(sha) = pull_request_head_sha(Path::new(&path)) {
                return Ok(sha);
            }
        }
    }

    std::env::var("GITHUB_SHA")
        .map_err(|_| WaitError::MissingConfig("commit sha (GITHUB_SHA)".to_owned()))
}

fn pull_request_head_sha(path: &Path) -> Option<String> {
    let payload = std::fs::read_to_string(path).ok()?;
    let event: EventPayload = serde_json::from_str(&payload).ok()?;
    event.pull_request.map(|pr| pr.head.sha)
}

/// Publish a step output through the `GITHUB_OUTPUT` file.
pub fn set_output(key: &str, value: &str) {
    let Ok(path) = std::env::var("GITHUB_OUTPUT") else {
        warn!(key, "GITHUB_OUTPUT is not set, skipping step output");
        return;
    };
    if let Err(e) = append_output(Path::new(&path), key, value) {
        warn!(key, error = %e, "failed to write step output");
    }
}

fn append_output(path: &Path, key: &str, value: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{key}={value}")
}

/// Mark the pipeline step failed.
pub fn set_failed(message: &str) {
    println!("::error::{}", escape_data(message));
}

/// Surface a notice annotation on the workflow run.
pub fn notice(message: &str) {
    println!("::notice::{}", escape_data(message));
}

fn escape_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
