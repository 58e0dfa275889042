use super::database::DatabaseSession;
use super::shell::ShellSession;
use super::types::{SessionAttributes, SessionCommon, SessionKind};
use crate::model::FilterRule;
use crate::proxy::UserConnection;
use chrono::{DateTime, Utc};

/// A live proxied session.
///
/// Both variants share the same lifecycle capabilities: a stable id, a
/// terminate signal and attribute serialization. Once published into the
/// registry a session is only reachable through `Arc<Session>`, so its filter
/// rules can no longer change.
#[derive(Debug)]
pub enum Session {
    Shell(ShellSession),
    Database(DatabaseSession),
}

impl From<ShellSession> for Session {
    fn from(session: ShellSession) -> Self {
        Session::Shell(session)
    }
}

impl From<DatabaseSession> for Session {
    fn from(session: DatabaseSession) -> Self {
        Session::Database(session)
    }
}

impl Session {
    fn common(&self) -> &SessionCommon {
        match self {
            Session::Shell(session) => &session.common,
            Session::Database(session) => &session.common,
        }
    }

    pub fn id(&self) -> &str {
        &self.common().id
    }

    pub fn kind(&self) -> SessionKind {
        match self {
            Session::Shell(_) => SessionKind::Shell,
            Session::Database(_) => SessionKind::Database,
        }
    }

    pub fn user_conn(&self) -> &dyn UserConnection {
        match self {
            Session::Shell(session) => session.proxy().user_conn.as_ref(),
            Session::Database(session) => session.proxy().user_conn.as_ref(),
        }
    }

    /// Id of the transport connection that opened this session
    pub fn conn_id(&self) -> &str {
        self.user_conn().id()
    }

    pub fn system_user_id(&self) -> &str {
        match self {
            Session::Shell(session) => &session.proxy().system_user.id,
            Session::Database(session) => &session.proxy().system_user.id,
        }
    }

    pub fn date_start(&self) -> DateTime<Utc> {
        self.common().date_start
    }

    pub fn filter_rules(&self) -> &[FilterRule] {
        &self.common().filter_rules
    }

    /// Attach filter rules. Needs exclusive ownership, so it can only happen
    /// before the session is shared.
    pub fn set_filter_rules(&mut self, rules: Vec<FilterRule>) {
        match self {
            Session::Shell(session) => session.common.filter_rules = rules,
            Session::Database(session) => session.common.filter_rules = rules,
        }
    }

    /// Ask the owning connection to close. Returns immediately.
    pub fn terminate(&self) {
        self.common().terminate.trigger();
    }

    pub fn is_terminated(&self) -> bool {
        self.common().terminate.is_triggered()
    }

    /// Resolves once [`terminate`](Self::terminate) has been called
    pub async fn terminated(&self) {
        self.common().terminate.triggered().await
    }

    pub fn is_finished(&self) -> bool {
        self.common().is_finished()
    }

    pub fn mark_finished(&self) {
        self.common().mark_finished()
    }

    pub fn attributes(&self) -> SessionAttributes {
        match self {
            Session::Shell(session) => session.attributes(),
            Session::Database(session) => session.attributes(),
        }
    }
}
