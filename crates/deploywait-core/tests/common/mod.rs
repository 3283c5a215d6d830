//! Common test utilities: scripted fakes for the deploy API and the prober.

pub mod fixtures;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use deploywait_core::api::{DeploysApi, Prober};
use deploywait_core::error::ApiError;
use deploywait_core::types::Deploy;

/// Deploy API fake serving scripted response sequences.
///
/// Each call pops the next scripted response; the final entry repeats once
/// the script is exhausted, so "the state never changes" is a one-entry
/// script. Calls against an endpoint with no script at all panic — tests use
/// that to prove an endpoint was never touched.
#[derive(Default)]
pub struct FakeDeploysApi {
    listings: Mutex<VecDeque<Option<Vec<Deploy>>>>,
    deploys: Mutex<VecDeque<Deploy>>,
    pub list_calls: AtomicUsize,
    pub get_calls: AtomicUsize,
}

impl FakeDeploysApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listings(listings: Vec<Option<Vec<Deploy>>>) -> Self {
        let fake = Self::new();
        *fake.listings.lock().unwrap() = listings.into();
        fake
    }

    /// Script the per-deploy endpoint with successive snapshots of `deploy`,
    /// one per state in `states`.
    pub fn script_deploy_states(&self, deploy: &Deploy, states: &[&str]) {
        let mut queue = self.deploys.lock().unwrap();
        for state in states {
            let mut snapshot = deploy.clone();
            snapshot.state = (*state).to_owned();
            queue.push_back(snapshot);
        }
    }

    fn next<T: Clone>(queue: &Mutex<VecDeque<T>>, endpoint: &str) -> T {
        let mut queue = queue.lock().unwrap();
        match queue.len() {
            0 => panic!("unexpected {endpoint} call: no scripted responses"),
            1 => queue.front().cloned().unwrap(),
            _ => queue.pop_front().unwrap(),
        }
    }
}

#[async_trait]
impl DeploysApi for FakeDeploysApi {
    async fn list_deploys(&self, _site_id: &str) -> Result<Option<Vec<Deploy>>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::next(&self.listings, "list_deploys"))
    }

    async fn get_deploy(&self, _deploy_id: &str) -> Result<Deploy, ApiError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::next(&self.deploys, "get_deploy"))
    }
}

/// Prober fake answering from a scripted sequence of verdicts; the final
/// verdict repeats once the script is exhausted.
pub struct FakeProber {
    script: Mutex<VecDeque<bool>>,
    pub attempts: AtomicUsize,
    pub probed_urls: Mutex<Vec<String>>,
}

impl FakeProber {
    pub fn with_script(script: Vec<bool>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            attempts: AtomicUsize::new(0),
            probed_urls: Mutex::new(Vec::new()),
        }
    }

    pub fn always_up() -> Self {
        Self::with_script(vec![true])
    }

    pub fn always_down() -> Self {
        Self::with_script(vec![false])
    }
}

#[async_trait]
impl Prober for FakeProber {
    async fn probe(&self, url: &str) -> bool {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.probed_urls.lock().unwrap().push(url.to_owned());

        let mut script = self.script.lock().unwrap();
        match script.len() {
            0 => panic!("unexpected probe call: no scripted verdicts"),
            1 => *script.front().unwrap(),
            _ => script.pop_front().unwrap(),
        }
    }
}
