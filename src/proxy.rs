//! Proxy-server handles handed to the session core by the protocol layer.
//!
//! A handle represents a connection that has already been authenticated and
//! authorised for its target. The session core never re-checks that; it only
//! reads identity fields and writes warnings back to the user.

use crate::model::{Asset, Database, SystemUser, User};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Where a user connection came from, as recorded on the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFrom {
    /// SSH terminal
    Terminal,
    /// Web terminal
    Web,
}

impl LoginFrom {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginFrom::Terminal => "ST",
            LoginFrom::Web => "WT",
        }
    }
}

/// The user-facing side of a proxied connection
#[async_trait]
pub trait UserConnection: Send + Sync {
    /// Transport connection identifier, used for log correlation
    fn id(&self) -> &str;

    fn remote_addr(&self) -> String;

    fn login_from(&self) -> LoginFrom {
        LoginFrom::Terminal
    }

    /// Write raw text to the user's outbound stream
    async fn write_str(&self, text: &str) -> std::io::Result<()>;
}

/// Handle for an interactive shell connection
#[derive(Clone)]
pub struct ProxyServer {
    pub user_conn: Arc<dyn UserConnection>,
    pub user: User,
    pub asset: Asset,
    pub system_user: SystemUser,
}

impl fmt::Debug for ProxyServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyServer")
            .field("conn", &self.user_conn.id())
            .field("user", &self.user.username)
            .field("asset", &self.asset.hostname)
            .field("system_user", &self.system_user.username)
            .finish()
    }
}

/// Handle for a database connection
#[derive(Clone)]
pub struct DbProxyServer {
    pub user_conn: Arc<dyn UserConnection>,
    pub user: User,
    pub database: Database,
    pub system_user: SystemUser,
}

impl fmt::Debug for DbProxyServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbProxyServer")
            .field("conn", &self.user_conn.id())
            .field("user", &self.user.username)
            .field("database", &self.database.name)
            .field("system_user", &self.system_user.username)
            .finish()
    }
}
