//! deploywait - block a CI step until the deploy for a commit is live.

mod ci;

use clap::Parser;
use tracing::info;

use deploywait_core::api::{DeployApiClient, HttpProber};
use deploywait_core::{config, orchestrator, WaitConfig, WaitOutcome};

#[derive(Parser)]
#[command(name = "deploywait")]
#[command(about = "Wait for a site deploy to be created, ready, and reachable")]
#[command(version)]
struct Cli {
    /// Site to watch (overrides the site_id input)
    #[arg(long)]
    site_id: Option<String>,

    /// Commit to wait for (defaults to the sha of the triggering event)
    #[arg(long)]
    commit: Option<String>,

    /// Reachability budget in seconds
    #[arg(long)]
    max_ready_timeout: Option<u64>,

    /// Deploy API base URL
    #[arg(long)]
    api_base: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    // MissingConfig, NotFound, the two timeouts, and DeployFailed all land
    // here; the soft outcomes are handled inside run and return Ok.
    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            ci::set_failed(&e.to_string());
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    let mut config = WaitConfig::load()?;
    if let Some(site_id) = cli.site_id {
        config.site_id = site_id;
    }
    if let Some(timeout) = cli.max_ready_timeout {
        config.max_ready_timeout = timeout;
    }
    if let Some(api_base) = cli.api_base {
        config.api_base = api_base;
    }
    config.validate()?;

    let token = config::load_token()?;
    let commit = match cli.commit {
        Some(commit) => commit,
        None => ci::commit_sha()?,
    };

    let api = DeployApiClient::new(&config.api_base, token)?;
    let prober = HttpProber::new()?;

    match orchestrator::run(&api, &prober, &config, &commit).await? {
        WaitOutcome::Ready { deploy_id, url } => {
            ci::set_output("deploy_id", &deploy_id);
            ci::set_output("url", &url);
            info!(%deploy_id, %url, "deploy is live");
            Ok(0)
        }
        WaitOutcome::NoPreview => {
            ci::notice(
                "Build was skipped (no content change) and the previous deploy is not \
                 answering; there is no preview for this commit.",
            );
            ci::set_output("nopreview", "1");
            Ok(0)
        }
        WaitOutcome::Unreachable {
            deploy_id,
            url,
            budget_secs,
        } => {
            ci::set_output("deploy_id", &deploy_id);
            ci::set_output("url", &url);
            ci::set_failed(&format!(
                "Timeout reached after {budget_secs}s: unable to connect to {url}"
            ));
            Ok(1)
        }
    }
}
