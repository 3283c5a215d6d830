//! Deploy records and the platform's state vocabulary.

use serde::Deserialize;

/// States the readiness waiter accepts as terminal.
///
/// `error` belongs here: the platform has finished processing the deploy even
/// though the build itself failed. Whether an error state is fatal is decided
/// by the orchestrator, not the waiter.
pub const READY_STATES: [&str; 3] = ["ready", "current", "error"];

/// Message fragment the platform emits when it declines to build because
/// nothing changed since the previous deploy.
pub const NO_CONTENT_CHANGE: &str = "canceled build due to no content change";

/// A deploy as returned by the platform API.
///
/// Each poll fetches a fresh snapshot; a later poll supersedes it entirely.
#[derive(Debug, Clone, Deserialize)]
pub struct Deploy {
    pub id: String,
    /// Site name, used to derive the preview hostname.
    pub name: String,
    #[serde(default)]
    pub commit_ref: Option<String>,
    pub state: String,
    #[serde(default)]
    pub error_message: Option<String>,
    /// Pre-assigned permalink. Still serves the previous deploy when the
    /// platform skips a build.
    #[serde(default)]
    pub deploy_ssl_url: Option<String>,
}

impl Deploy {
    /// Whether the platform has finished processing this deploy.
    pub fn is_ready(&self) -> bool {
        is_ready_state(&self.state)
    }

    /// Whether this deploy ended in the platform's error state.
    pub fn is_error(&self) -> bool {
        self.state == "error"
    }

    /// The URL this deploy is published under once it is live.
    pub fn preview_url(&self, domain: &str) -> String {
        format!("https://{}--{}.{}", self.id, self.name, domain)
    }
}

/// Whether `state` is one of the terminal readiness states.
pub fn is_ready_state(state: &str) -> bool {
    READY_STATES.contains(&state)
}

/// Case-insensitive check for the no-content-change skip condition.
pub fn is_no_content_change(message: &str) -> bool {
    message.to_lowercase().contains(NO_CONTENT_CHANGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deploy(state: &str) -> Deploy {
        Deploy {
            id: "dep-1".to_owned(),
            name: "mysite".to_owned(),
            commit_ref: Some("abc123".to_owned()),
            state: state.to_owned(),
            error_message: None,
            deploy_ssl_url: None,
        }
    }

    #[test]
    fn ready_states_include_error() {
        assert!(deploy("ready").is_ready());
        assert!(deploy("current").is_ready());
        assert!(deploy("error").is_ready());
        assert!(!deploy("building").is_ready());
        assert!(!deploy("enqueued").is_ready());
    }

    #[test]
    fn preview_url_combines_id_and_name() {
        assert_eq!(
            deploy("ready").preview_url("netlify.app"),
            "https://dep-1--mysite.netlify.app"
        );
    }

    #[test]
    fn skip_phrase_matches_case_insensitively() {
        assert!(is_no_content_change("Canceled build due to no content change"));
        assert!(is_no_content_change(
            "Skipped: CANCELED BUILD DUE TO NO CONTENT CHANGE (cache hit)"
        ));
        assert!(!is_no_content_change("build script failed"));
        assert!(!is_no_content_change(""));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let deploy: Deploy = serde_json::from_str(
            r#"{
                "id": "dep-2",
                "name": "mysite",
                "state": "building",
                "branch": "main",
                "created_at": "2024-03-01T00:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(deploy.id, "dep-2");
        assert_eq!(deploy.commit_ref, None);
        assert_eq!(deploy.error_message, None);
    }
}
