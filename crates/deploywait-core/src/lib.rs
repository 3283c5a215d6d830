//! Deploy-wait gate for CI pipelines.
//!
//! Blocks a pipeline step until the hosting platform has created a deploy for
//! a commit, the deploy has reached a terminal state, and the published URL
//! answers. The crate exposes the three waiters and the orchestrator that
//! sequences them; the `deploywait` binary wires them to the surrounding CI
//! environment.

pub mod api;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod types;
pub mod wait;

pub use config::WaitConfig;
pub use error::{ApiError, WaitError};
pub use orchestrator::WaitOutcome;
pub use types::Deploy;
pub use wait::ProbeOutcome;
