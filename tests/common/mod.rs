//! In-memory stand-ins for the core server and user connections.

#![allow(dead_code)]

use async_trait::async_trait;
use bastion_sessions::model::{Asset, Database, FilterAction, FilterRule, SystemUser, User};
use bastion_sessions::proxy::{DbProxyServer, ProxyServer, UserConnection};
use bastion_sessions::service::{ControlPlane, RetryPolicy, ServiceError};
use bastion_sessions::session::{
    SessionAttributes, SessionManager, SessionManagerConfig, SessionRegistry,
};
use bastion_sessions::TerminalTask;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Core server stub recording every call
#[derive(Default)]
pub struct StubControlPlane {
    create_failures_left: AtomicU32,
    create_calls: AtomicU32,
    fail_rules: AtomicBool,
    fail_finish: AtomicBool,
    fail_heartbeat: AtomicBool,
    rules: Mutex<Vec<FilterRule>>,
    finished_sessions: Mutex<Vec<SessionAttributes>>,
    finished_tasks: Mutex<Vec<String>>,
    pending_tasks: Mutex<Vec<TerminalTask>>,
    heartbeats: Mutex<Vec<Vec<String>>>,
    created_ids: Mutex<Vec<String>>,
    create_started: Notify,
    create_gate: Mutex<Option<Arc<Notify>>>,
}

impl StubControlPlane {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Reject the next `count` create calls
    pub fn failing_creates(count: u32) -> Arc<Self> {
        let stub = Self::default();
        stub.create_failures_left.store(count, Ordering::SeqCst);
        Arc::new(stub)
    }

    pub fn always_failing_creates() -> Arc<Self> {
        Self::failing_creates(u32::MAX)
    }

    pub fn set_fail_rules(&self, fail: bool) {
        self.fail_rules.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_finish(&self, fail: bool) {
        self.fail_finish.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_heartbeat(&self, fail: bool) {
        self.fail_heartbeat.store(fail, Ordering::SeqCst);
    }

    pub fn set_rules(&self, rules: Vec<FilterRule>) {
        *self.rules.lock().unwrap() = rules;
    }

    pub fn push_task(&self, task: TerminalTask) {
        self.pending_tasks.lock().unwrap().push(task);
    }

    /// Park every create call until the returned gate is notified
    pub fn hold_creates(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.create_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Resolves once a create call has reached the stub
    pub async fn wait_for_create(&self) {
        self.create_started.notified().await;
    }

    /// Session ids seen by create calls, in call order
    pub fn created_ids(&self) -> Vec<String> {
        self.created_ids.lock().unwrap().clone()
    }

    pub fn create_calls(&self) -> u32 {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn finished_sessions(&self) -> Vec<SessionAttributes> {
        self.finished_sessions.lock().unwrap().clone()
    }

    pub fn finished_session_ids(&self) -> Vec<String> {
        self.finished_sessions()
            .iter()
            .filter_map(|attributes| attributes.get("id")?.as_str().map(str::to_string))
            .collect()
    }

    pub fn finished_tasks(&self) -> Vec<String> {
        self.finished_tasks.lock().unwrap().clone()
    }

    pub fn heartbeats(&self) -> Vec<Vec<String>> {
        self.heartbeats.lock().unwrap().clone()
    }
}

#[async_trait]
impl ControlPlane for StubControlPlane {
    async fn create_session(&self, attributes: &SessionAttributes) -> bool {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(id) = attributes.get("id").and_then(|id| id.as_str()) {
            self.created_ids.lock().unwrap().push(id.to_string());
        }
        self.create_started.notify_one();

        let gate = self.create_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.create_failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| {
                if left == 0 {
                    None
                } else if left == u32::MAX {
                    Some(left)
                } else {
                    Some(left - 1)
                }
            })
            .is_err()
    }

    async fn finish_session(&self, attributes: &SessionAttributes) -> Result<(), ServiceError> {
        self.finished_sessions
            .lock()
            .unwrap()
            .push(attributes.clone());
        if self.fail_finish.load(Ordering::SeqCst) {
            return Err(ServiceError::Unavailable("finish rejected".to_string()));
        }
        Ok(())
    }

    async fn get_filter_rules(
        &self,
        _system_user_id: &str,
    ) -> Result<Vec<FilterRule>, ServiceError> {
        if self.fail_rules.load(Ordering::SeqCst) {
            return Err(ServiceError::Unavailable("rules unavailable".to_string()));
        }
        Ok(self.rules.lock().unwrap().clone())
    }

    async fn finish_task(&self, task_id: &str) -> Result<(), ServiceError> {
        self.finished_tasks.lock().unwrap().push(task_id.to_string());
        Ok(())
    }

    async fn heartbeat(&self, alive_sessions: &[String]) -> Result<Vec<TerminalTask>, ServiceError> {
        if self.fail_heartbeat.load(Ordering::SeqCst) {
            return Err(ServiceError::Unavailable("heartbeat rejected".to_string()));
        }
        self.heartbeats.lock().unwrap().push(alive_sessions.to_vec());
        Ok(std::mem::take(&mut *self.pending_tasks.lock().unwrap()))
    }
}

/// User connection capturing everything written to it
pub struct RecordingConn {
    id: String,
    written: Mutex<Vec<String>>,
}

impl RecordingConn {
    pub fn new(id: &str) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            written: Mutex::new(Vec::new()),
        })
    }

    pub fn written(&self) -> Vec<String> {
        self.written.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserConnection for RecordingConn {
    fn id(&self) -> &str {
        &self.id
    }

    fn remote_addr(&self) -> String {
        "192.168.1.20:40022".to_string()
    }

    async fn write_str(&self, text: &str) -> std::io::Result<()> {
        self.written.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

pub fn manager_with(stub: Arc<StubControlPlane>) -> SessionManager {
    manager_with_config(
        stub,
        SessionManagerConfig {
            retry: RetryPolicy::immediate(5),
            ..Default::default()
        },
    )
}

pub fn manager_with_config(
    stub: Arc<StubControlPlane>,
    config: SessionManagerConfig,
) -> SessionManager {
    SessionManager::new(SessionRegistry::new(), stub, config)
}

pub fn system_user() -> SystemUser {
    SystemUser {
        id: "su-1".to_string(),
        name: "ops".to_string(),
        username: "root".to_string(),
        protocol: "ssh".to_string(),
    }
}

pub fn shell_proxy(conn: Arc<RecordingConn>) -> ProxyServer {
    ProxyServer {
        user_conn: conn,
        user: User {
            id: "u-1".to_string(),
            username: "alice".to_string(),
            name: "Alice".to_string(),
        },
        asset: Asset {
            id: "a-1".to_string(),
            hostname: "web-01".to_string(),
            ip: "10.1.0.1".to_string(),
            org_id: String::new(),
        },
        system_user: system_user(),
    }
}

pub fn db_proxy(conn: Arc<RecordingConn>) -> DbProxyServer {
    DbProxyServer {
        user_conn: conn,
        user: User {
            id: "u-2".to_string(),
            username: "bob".to_string(),
            name: "Bob".to_string(),
        },
        database: Database {
            id: "d-1".to_string(),
            name: "orders".to_string(),
            host: "db.internal".to_string(),
            port: 5432,
            db_type: "postgresql".to_string(),
            db_name: "orders".to_string(),
            org_id: String::new(),
        },
        system_user: system_user(),
    }
}

pub fn deny_rule(id: &str, content: &str) -> FilterRule {
    FilterRule {
        id: id.to_string(),
        priority: 50,
        rule_type: "command".to_string(),
        content: content.to_string(),
        action: FilterAction::Deny,
    }
}
