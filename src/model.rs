//! Control-plane domain objects shared by the proxy layer and the session core.
//!
//! These mirror the JSON resources returned by the core API. Only the fields
//! the session lifecycle needs are modelled; unknown fields are ignored on
//! deserialization.

use serde::{Deserialize, Serialize};

/// Authenticated bastion user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub name: String,
}

impl User {
    /// Display form used in session records, e.g. `Alice (alice)`
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.username)
    }
}

/// Target host reached through a shell session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub hostname: String,
    pub ip: String,
    #[serde(default)]
    pub org_id: String,
}

/// Target database reached through a database session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    pub id: String,
    pub name: String,
    pub host: String,
    pub port: u16,
    /// Engine name, e.g. `mysql`
    pub db_type: String,
    pub db_name: String,
    #[serde(default)]
    pub org_id: String,
}

/// Account used on the target; filter rules are keyed by its id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemUser {
    pub id: String,
    pub name: String,
    pub username: String,
    pub protocol: String,
}

/// What the filter does when a rule matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterAction {
    Deny,
    Allow,
    Confirm,
}

/// Command filter rule attached to a session at creation.
///
/// Rules are evaluated by the protocol layer; the session core only stores
/// them in the order the control plane returned them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRule {
    pub id: String,
    pub priority: u32,
    #[serde(rename = "type")]
    pub rule_type: String,
    pub content: String,
    pub action: FilterAction,
}

/// Control task pushed by the control plane (e.g. `kill_session`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalTask {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub args: String,
}

impl TerminalTask {
    pub fn new(id: impl Into<String>, name: impl Into<String>, args: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            args: args.into(),
        }
    }
}
