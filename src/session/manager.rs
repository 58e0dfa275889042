use super::database::DatabaseSession;
use super::handle::Session;
use super::registry::SessionRegistry;
use super::shell::ShellSession;
use super::types::{SessionError, SessionId};
use crate::i18n::{Language, Message};
use crate::proxy::{DbProxyServer, ProxyServer};
use crate::service::{ControlPlane, RetryPolicy};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Configuration for the session manager
#[derive(Debug, Clone)]
pub struct SessionManagerConfig {
    /// Retry policy for registering a session with the core server
    pub retry: RetryPolicy,
    /// Language of the warnings written to users
    pub language: Language,
    /// Finish a session on the core server when it was registered there but
    /// its filter rules could not be fetched
    pub compensate_on_policy_failure: bool,
}

impl Default for SessionManagerConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            language: Language::default(),
            compensate_on_policy_failure: true,
        }
    }
}

/// Drives session creation and teardown against the registry and the core server
#[derive(Clone)]
pub struct SessionManager {
    registry: SessionRegistry,
    control_plane: Arc<dyn ControlPlane>,
    config: SessionManagerConfig,
}

impl SessionManager {
    pub fn new(
        registry: SessionRegistry,
        control_plane: Arc<dyn ControlPlane>,
        config: SessionManagerConfig,
    ) -> Self {
        Self {
            registry,
            control_plane,
            config,
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn control_plane(&self) -> &Arc<dyn ControlPlane> {
        &self.control_plane
    }

    pub fn config(&self) -> &SessionManagerConfig {
        &self.config
    }

    /// Create and publish a shell session for an authenticated connection
    pub async fn create_session(&self, proxy: ProxyServer) -> Result<Arc<Session>, SessionError> {
        let session = Session::from(ShellSession::new(proxy));
        info!("Conn[{}] create session {}", session.conn_id(), session.id());
        self.register_and_publish(session, Message::ConnectApiServerFailed)
            .await
    }

    /// Create and publish a database session for an authenticated connection
    pub async fn create_db_session(
        &self,
        proxy: DbProxyServer,
    ) -> Result<Arc<Session>, SessionError> {
        let session = Session::from(DatabaseSession::new(proxy));
        info!("Conn[{}] create DB session {}", session.conn_id(), session.id());
        self.register_and_publish(session, Message::CreateDatabaseSessionFailed)
            .await
    }

    /// Register with the core server, attach filter rules, then publish.
    ///
    /// The session becomes visible in the registry only when both remote
    /// steps succeeded.
    async fn register_and_publish(
        &self,
        mut session: Session,
        failure_message: Message,
    ) -> Result<Arc<Session>, SessionError> {
        let attributes = session.attributes();
        let retry = self.config.retry;

        let registered = retry
            .run(|_attempt| self.control_plane.create_session(&attributes))
            .await;

        if !registered {
            self.warn_user(&session, failure_message).await;
            error!(
                "Conn[{}] submit session {} to core server failed after {} attempts",
                session.conn_id(),
                session.id(),
                retry.max_attempts.max(1)
            );
            return Err(SessionError::RemoteRegistrationFailed {
                session_id: session.id().to_string(),
                attempts: retry.max_attempts.max(1),
            });
        }
        info!(
            "Conn[{}] submit session {} to core server success",
            session.conn_id(),
            session.id()
        );

        let rules = match self
            .control_plane
            .get_filter_rules(session.system_user_id())
            .await
        {
            Ok(rules) => rules,
            Err(e) => {
                self.warn_user(&session, failure_message).await;
                error!(
                    "Conn[{}] get filter rules from core server err: {}",
                    session.conn_id(),
                    e
                );
                if self.config.compensate_on_policy_failure {
                    self.finish_remote(&session).await;
                }
                return Err(SessionError::PolicyFetchFailed {
                    session_id: session.id().to_string(),
                    source: e,
                });
            }
        };
        info!(
            "Conn[{}] get {} filter rules from core server success",
            session.conn_id(),
            rules.len()
        );

        session.set_filter_rules(rules);
        let session = Arc::new(session);
        self.registry.insert(session.clone()).await;
        Ok(session)
    }

    /// Signal a published session to terminate.
    ///
    /// Returns once the signal is raised; the registry entry goes away later,
    /// when the session's connection runs [`remove_session`](Self::remove_session).
    pub async fn kill_session(&self, session_id: &str) -> Result<(), SessionError> {
        match self.registry.lookup(session_id).await {
            Some(session) => {
                session.terminate();
                info!("Session {} terminate signal sent", session_id);
                Ok(())
            }
            None => {
                warn!("Kill session {} failed: not found", session_id);
                Err(SessionError::SessionNotFound(session_id.to_string()))
            }
        }
    }

    /// Evict a session and tell the core server it finished.
    ///
    /// The remote finish is best-effort: one attempt, failures are logged and
    /// never retried, so teardown latency stays bounded by a single call.
    /// Calling this again for an already removed session does nothing.
    pub async fn remove_session(&self, session: &Session) {
        if self.registry.remove(session.id()).await.is_none() {
            debug!("Session {} already removed", session.id());
            return;
        }

        self.finish_remote(session).await;
        info!("{} session {} has finished", session.kind(), session.id());
    }

    /// Run a connection's I/O until it completes or the session is killed,
    /// then remove the session. Returns the I/O output if it completed.
    pub async fn serve<F>(&self, session: Arc<Session>, io: F) -> Option<F::Output>
    where
        F: Future,
    {
        let output = tokio::select! {
            output = io => Some(output),
            _ = session.terminated() => {
                info!("Conn[{}] session {} terminated", session.conn_id(), session.id());
                None
            }
        };

        self.remove_session(&session).await;
        output
    }

    /// Ids of all published sessions
    pub async fn alive_sessions(&self) -> Vec<SessionId> {
        self.registry.list_all().await
    }

    async fn finish_remote(&self, session: &Session) {
        session.mark_finished();
        if let Err(e) = self.control_plane.finish_session(&session.attributes()).await {
            warn!(
                "Conn[{}] finish session {} on core server failed: {}",
                session.conn_id(),
                session.id(),
                e
            );
        }
    }

    async fn warn_user(&self, session: &Session, message: Message) {
        let text = self.config.language.warning(message);
        if let Err(e) = session.user_conn().write_str(&text).await {
            debug!("Conn[{}] write warning failed: {}", session.conn_id(), e);
        }
    }
}
