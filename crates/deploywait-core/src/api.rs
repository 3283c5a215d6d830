//! HTTP clients for the deploy API and the reachability probe.
//!
//! Both clients sit behind small traits so the waiters can be exercised
//! against scripted fakes in tests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};

use crate::error::ApiError;
use crate::types::Deploy;

/// Per-request timeout for both clients. Unrelated to the wait budgets; this
/// only bounds a single hung connection.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Read access to the platform's deploy endpoints.
#[async_trait]
pub trait DeploysApi: Send + Sync {
    /// Fetch the site's deploy listing. `None` means the API answered without
    /// a collection at all.
    async fn list_deploys(&self, site_id: &str) -> Result<Option<Vec<Deploy>>, ApiError>;

    /// Fetch a single deploy.
    async fn get_deploy(&self, deploy_id: &str) -> Result<Deploy, ApiError>;
}

/// A single reachability attempt against a published URL.
#[async_trait]
pub trait Prober: Send + Sync {
    /// `true` when the URL answered with an accepted status.
    async fn probe(&self, url: &str) -> bool;
}

/// Response classification applied to every probe, uniformly at the client
/// boundary: a password-protected preview answers 401, which still proves the
/// deploy is being served.
pub fn is_reachable_status(status: StatusCode) -> bool {
    status.is_success() || status == StatusCode::UNAUTHORIZED
}

/// Bearer-authenticated client for the deploy API.
pub struct DeployApiClient {
    client: reqwest::Client,
    api_base: String,
    token: SecretString,
}

impl DeployApiClient {
    pub fn new(api_base: &str, token: SecretString) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_owned(),
            token,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(self.token.expose_secret())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::UnexpectedResponse(format!(
                "{url} returned {status}"
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl DeploysApi for DeployApiClient {
    async fn list_deploys(&self, site_id: &str) -> Result<Option<Vec<Deploy>>, ApiError> {
        let url = format!("{}/sites/{}/deploys", self.api_base, site_id);
        self.get_json(&url).await
    }

    async fn get_deploy(&self, deploy_id: &str) -> Result<Deploy, ApiError> {
        let url = format!("{}/deploys/{}", self.api_base, deploy_id);
        self.get_json(&url).await
    }
}

/// Plain unauthenticated client for probing the published site.
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    pub fn new() -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> bool {
        match self.client.get(url).send().await {
            Ok(response) => is_reachable_status(response.status()),
            Err(_) => false,
        }
    }
}
