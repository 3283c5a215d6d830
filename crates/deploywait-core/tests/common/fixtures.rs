//! Test fixtures for deploy records.

use deploywait_core::types::Deploy;

/// Builder for test deploy records.
pub struct DeployBuilder {
    id: String,
    name: String,
    commit_ref: Option<String>,
    state: String,
    error_message: Option<String>,
    deploy_ssl_url: Option<String>,
}

impl DeployBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_owned(),
            name: "mysite".to_owned(),
            commit_ref: None,
            state: "building".to_owned(),
            error_message: None,
            deploy_ssl_url: None,
        }
    }

    pub fn with_commit(mut self, commit_ref: &str) -> Self {
        self.commit_ref = Some(commit_ref.to_owned());
        self
    }

    pub fn with_state(mut self, state: &str) -> Self {
        self.state = state.to_owned();
        self
    }

    pub fn with_error_message(mut self, message: &str) -> Self {
        self.error_message = Some(message.to_owned());
        self
    }

    pub fn with_ssl_url(mut self, url: &str) -> Self {
        self.deploy_ssl_url = Some(url.to_owned());
        self
    }

    pub fn build(self) -> Deploy {
        Deploy {
            id: self.id,
            name: self.name,
            commit_ref: self.commit_ref,
            state: self.state,
            error_message: self.error_message,
            deploy_ssl_url: self.deploy_ssl_url,
        }
    }
}
