//! The three poll loops that gate the pipeline.
//!
//! All three share one shape: a fixed-interval sleep loop that checks its
//! timeout budget *before* fetching, so the loop terminates even if a slow
//! fetch pushes elapsed time past the budget between ticks. Elapsed time is
//! an accumulator bumped by the fixed interval; it only increases, and no
//! fetch is issued after a loop has settled.

use std::time::Duration;

use tokio::time::sleep;
use tracing::info;

use crate::api::{DeploysApi, Prober};
use crate::config::{
    CREATION_POLL_INTERVAL_SECS, PROBE_RETRY_INTERVAL_SECS, READINESS_POLL_INTERVAL_SECS,
};
use crate::error::WaitError;
use crate::types::Deploy;

/// How a reachability wait ended.
///
/// `ExhaustedRetries` is a soft failure: the orchestrator inspects it and the
/// caller routes it to the pipeline failure sink. It is never raised through
/// the error channel, unlike the creation and readiness timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Reachable,
    ExhaustedRetries,
}

/// Poll the site's deploy listing until a deploy for `commit_ref` appears.
pub async fn wait_for_created(
    api: &dyn DeploysApi,
    site_id: &str,
    commit_ref: &str,
    budget: Duration,
) -> Result<Deploy, WaitError> {
    let interval = Duration::from_secs(CREATION_POLL_INTERVAL_SECS);
    let mut elapsed = Duration::ZERO;

    loop {
        if elapsed >= budget {
            return Err(WaitError::CreationTimeout {
                budget_secs: budget.as_secs(),
            });
        }

        let deploys = api.list_deploys(site_id).await?.ok_or_else(|| {
            WaitError::NotFound(format!("no deploy listing for site {site_id}"))
        })?;

        if let Some(deploy) = deploys
            .into_iter()
            .find(|d| d.commit_ref.as_deref() == Some(commit_ref))
        {
            return Ok(deploy);
        }

        info!(
            commit = commit_ref,
            elapsed_secs = elapsed.as_secs(),
            "deploy not created yet, waiting"
        );
        sleep(interval).await;
        elapsed += interval;
    }
}

/// Poll a single deploy until its state reaches the terminal ready set.
pub async fn wait_for_ready(
    api: &dyn DeploysApi,
    deploy_id: &str,
    budget: Duration,
) -> Result<(), WaitError> {
    let interval = Duration::from_secs(READINESS_POLL_INTERVAL_SECS);
    let mut elapsed = Duration::ZERO;
    let mut last_state: Option<String> = None;

    loop {
        if elapsed >= budget {
            return Err(WaitError::ReadinessTimeout {
                budget_secs: budget.as_secs(),
                last_state: last_state.unwrap_or_else(|| "undefined".to_owned()),
            });
        }

        let deploy = api.get_deploy(deploy_id).await?;
        if deploy.is_ready() {
            return Ok(());
        }

        info!(
            deploy_id,
            state = %deploy.state,
            elapsed_secs = elapsed.as_secs(),
            "deploy not ready yet, waiting"
        );
        last_state = Some(deploy.state);
        sleep(interval).await;
        elapsed += interval;
    }
}

/// Probe `url` until it answers with an accepted status.
///
/// The budget is divided into fixed retry slots. With `single_attempt` set, a
/// failed first attempt is a hard [`WaitError::NotFound`] with no sleep and no
/// retry; otherwise exhausting every slot yields
/// [`ProbeOutcome::ExhaustedRetries`] through the success channel.
pub async fn wait_until_reachable(
    prober: &dyn Prober,
    url: &str,
    budget: Duration,
    single_attempt: bool,
) -> Result<ProbeOutcome, WaitError> {
    let slot = Duration::from_secs(PROBE_RETRY_INTERVAL_SECS);
    let attempts = budget
        .as_secs()
        .div_ceil(PROBE_RETRY_INTERVAL_SECS)
        .max(1);

    for attempt in 1..=attempts {
        if prober.probe(url).await {
            return Ok(ProbeOutcome::Reachable);
        }

        if single_attempt {
            return Err(WaitError::NotFound(format!("no response from {url}")));
        }

        info!(url, attempt, "site not answering, retrying");
        sleep(slot).await;
    }

    Ok(ProbeOutcome::ExhaustedRetries)
}
