//! # Control-Plane Client Layer
//!
//! The control plane is the service of record for session bookkeeping,
//! command filter rules and control tasks. The session core talks to it only
//! through the [`ControlPlane`] trait, so the lifecycle logic can be driven by
//! the real HTTP client in production and by in-memory stubs in tests.
//!
//! ## Core Components
//!
//! - **[`ControlPlane`]**: async operations the session core consumes
//! - **[`HttpControlPlane`]**: `reqwest` implementation against the core API
//! - **[`RetryPolicy`]**: bounded fixed-interval retry used for session registration
//! - **[`ServiceError`]**: failure modes of a control-plane call
//!
//! ## Retry ownership
//!
//! Implementations of [`ControlPlane`] make exactly one attempt per call.
//! Retrying is decided by the caller: registration is retried through
//! [`RetryPolicy`], while session finish and task acknowledgement are
//! best-effort single attempts whose failures are only logged.

pub mod http;
pub mod retry;

pub use http::HttpControlPlane;
pub use retry::RetryPolicy;

use crate::model::{FilterRule, TerminalTask};
use crate::session::SessionAttributes;
use async_trait::async_trait;

/// Errors returned by a control-plane call
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Core API returned status {status} for {url}: {body}")]
    Status { url: String, status: u16, body: String },
    #[error("Invalid core API url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Session attributes have no id")]
    MissingSessionId,
    #[error("Control plane unavailable: {0}")]
    Unavailable(String),
}

/// Operations the session core needs from the control plane
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Register a new session. Returns `false` when the control plane did not
    /// accept it; the caller decides whether to retry.
    async fn create_session(&self, attributes: &SessionAttributes) -> bool;

    /// Mark a session as finished
    async fn finish_session(&self, attributes: &SessionAttributes) -> Result<(), ServiceError>;

    /// Command filter rules for a system user, in evaluation order
    async fn get_filter_rules(&self, system_user_id: &str)
    -> Result<Vec<FilterRule>, ServiceError>;

    /// Acknowledge a control task as done
    async fn finish_task(&self, task_id: &str) -> Result<(), ServiceError>;

    /// Report the live session ids and collect pending control tasks
    async fn heartbeat(&self, alive_sessions: &[String]) -> Result<Vec<TerminalTask>, ServiceError>;
}
