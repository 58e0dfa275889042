use crate::model::{FilterRule, SystemUser, User};
use crate::proxy::UserConnection;
use crate::service::ServiceError;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use std::fmt;
use std::sync::OnceLock;
use tokio::sync::watch;
use uuid::Uuid;

/// Process-unique session identifier (UUID v4 in hyphenated form)
pub type SessionId = String;

/// Descriptive attributes sent to the control plane, derived on demand
pub type SessionAttributes = serde_json::Map<String, Value>;

/// Timestamp format used in session records
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

pub fn new_session_id() -> SessionId {
    Uuid::new_v4().to_string()
}

/// Which proxy produced the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    Shell,
    Database,
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionKind::Shell => write!(f, "shell"),
            SessionKind::Database => write!(f, "database"),
        }
    }
}

/// Errors surfaced by the session lifecycle
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Core server did not accept session {session_id} after {attempts} attempts")]
    RemoteRegistrationFailed { session_id: SessionId, attempts: u32 },
    #[error("Fetching filter rules for session {session_id} failed: {source}")]
    PolicyFetchFailed {
        session_id: SessionId,
        #[source]
        source: ServiceError,
    },
    #[error("Session {0} not found")]
    SessionNotFound(SessionId),
}

/// One-shot stop request shared between a session and its connection.
///
/// Triggering never blocks; the connection observes it through
/// [`TerminateSignal::triggered`] and tears itself down.
#[derive(Debug)]
pub struct TerminateSignal {
    tx: watch::Sender<bool>,
}

impl Default for TerminateSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminateSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once [`trigger`](Self::trigger) has been called
    pub async fn triggered(&self) {
        let mut rx = self.tx.subscribe();
        // the sender lives as long as `self`, so this cannot observe a closed channel
        let _ = rx.wait_for(|stop| *stop).await;
    }
}

/// State shared by both session variants
#[derive(Debug)]
pub struct SessionCommon {
    pub(crate) id: SessionId,
    pub(crate) date_start: DateTime<Utc>,
    pub(crate) date_end: OnceLock<DateTime<Utc>>,
    pub(crate) filter_rules: Vec<FilterRule>,
    pub(crate) terminate: TerminateSignal,
}

impl Default for SessionCommon {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionCommon {
    pub fn new() -> Self {
        Self {
            id: new_session_id(),
            date_start: Utc::now(),
            date_end: OnceLock::new(),
            filter_rules: Vec::new(),
            terminate: TerminateSignal::new(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.date_end.get().is_some()
    }

    /// Record the end time; later calls keep the first value
    pub fn mark_finished(&self) {
        let _ = self.date_end.set(Utc::now());
    }

    /// Attributes common to both variants
    pub(crate) fn base_attributes(
        &self,
        conn: &dyn UserConnection,
        user: &User,
        system_user: &SystemUser,
    ) -> SessionAttributes {
        let date_end = self
            .date_end
            .get()
            .map(|end| json!(end.format(DATE_FORMAT).to_string()))
            .unwrap_or(Value::Null);

        let mut attributes = SessionAttributes::new();
        attributes.insert("id".to_string(), json!(self.id));
        attributes.insert("user".to_string(), json!(user.display_name()));
        attributes.insert("user_id".to_string(), json!(user.id));
        attributes.insert("system_user".to_string(), json!(system_user.username));
        attributes.insert("system_user_id".to_string(), json!(system_user.id));
        attributes.insert("login_from".to_string(), json!(conn.login_from().as_str()));
        attributes.insert("remote_addr".to_string(), json!(conn.remote_addr()));
        attributes.insert("is_finished".to_string(), json!(self.is_finished()));
        attributes.insert(
            "date_start".to_string(),
            json!(self.date_start.format(DATE_FORMAT).to_string()),
        );
        attributes.insert("date_end".to_string(), date_end);
        attributes
    }
}
