//! Sequencing of the three waits and the no-content-change branch.
//!
//! Control flows strictly creation → readiness → reachability, each waiter
//! fully settled before the next begins. The only values carried across
//! stages are the resolved deploy record and the computed URL.

use std::time::Duration;

use tracing::{info, warn};

use crate::api::{DeploysApi, Prober};
use crate::config::{
    CREATION_BUDGET_SECS, FALLBACK_PROBE_BUDGET_SECS, READINESS_BUDGET_SECS, WaitConfig,
};
use crate::error::WaitError;
use crate::types::{is_no_content_change, Deploy};
use crate::wait::{wait_for_created, wait_for_ready, wait_until_reachable, ProbeOutcome};

/// Terminal outcome of a wait run.
///
/// `NoPreview` and `Unreachable` are returned, not raised. `NoPreview` is a
/// success with nothing to publish; `Unreachable` marks the pipeline failed
/// without going through the error channel, so callers report it to the
/// failure sink rather than catching it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The deploy is published and answering at `url`.
    Ready { deploy_id: String, url: String },
    /// The platform skipped the build and the previous deploy is not
    /// answering either; there is no preview for this commit.
    NoPreview,
    /// The deploy finished but the site never answered within the budget.
    Unreachable {
        deploy_id: String,
        url: String,
        budget_secs: u64,
    },
}

/// Wait until the site's deploy for `commit_ref` is created, ready, and
/// reachable.
pub async fn run(
    api: &dyn DeploysApi,
    prober: &dyn Prober,
    config: &WaitConfig,
    commit_ref: &str,
) -> Result<WaitOutcome, WaitError> {
    info!(site_id = %config.site_id, commit = commit_ref, "waiting for deploy to be created");
    let deploy = wait_for_created(
        api,
        &config.site_id,
        commit_ref,
        Duration::from_secs(CREATION_BUDGET_SECS),
    )
    .await?;

    if deploy.is_error() {
        let message = deploy.error_message.clone().unwrap_or_default();
        if is_no_content_change(&message) {
            return probe_previous_deploy(prober, &deploy).await;
        }
        return Err(WaitError::DeployFailed(message));
    }

    let url = deploy.preview_url(&config.preview_domain);

    info!(deploy_id = %deploy.id, "waiting for deploy to be ready");
    wait_for_ready(api, &deploy.id, Duration::from_secs(READINESS_BUDGET_SECS)).await?;

    info!(%url, "waiting for site to answer");
    let budget = config.reachability_budget();
    match wait_until_reachable(prober, &url, budget, false).await? {
        ProbeOutcome::Reachable => Ok(WaitOutcome::Ready {
            deploy_id: deploy.id,
            url,
        }),
        ProbeOutcome::ExhaustedRetries => Ok(WaitOutcome::Unreachable {
            deploy_id: deploy.id,
            url,
            budget_secs: budget.as_secs(),
        }),
    }
}

/// The build was skipped: the previous deploy may still be live at the
/// pre-assigned URL. One probe decides between reusing it and reporting that
/// no preview exists. The readiness wait is skipped on this path — the
/// platform already finished with this deploy.
async fn probe_previous_deploy(
    prober: &dyn Prober,
    deploy: &Deploy,
) -> Result<WaitOutcome, WaitError> {
    let Some(url) = deploy.deploy_ssl_url.clone() else {
        warn!(deploy_id = %deploy.id, "skipped build carries no fallback URL");
        return Ok(WaitOutcome::NoPreview);
    };

    info!(%url, "build skipped (no content change), probing previous deploy");
    let budget = Duration::from_secs(FALLBACK_PROBE_BUDGET_SECS);
    match wait_until_reachable(prober, &url, budget, true).await {
        Ok(ProbeOutcome::Reachable) => Ok(WaitOutcome::Ready {
            deploy_id: deploy.id.clone(),
            url,
        }),
        Ok(ProbeOutcome::ExhaustedRetries) | Err(_) => {
            warn!("previous deploy is not answering, no preview available");
            Ok(WaitOutcome::NoPreview)
        }
    }
}
