//! # Bastion Sessions
//!
//! Session-lifecycle core of a multi-protocol bastion proxy. It tracks every
//! live terminal or database session the proxy layer opens on behalf of a
//! user, keeps the core server informed about each session's existence, and
//! offers safe concurrent kill, lookup and removal across all sessions of the
//! process.
//!
//! ## Architecture Overview
//!
//! - **[`session`]**: session variants, the registry and the lifecycle manager
//! - **[`service`]**: control-plane client trait, HTTP client and retry policy
//! - **[`control`]**: heartbeat poller and control-task dispatch
//! - **[`proxy`]**: handles the protocol layer passes in for new sessions
//! - **[`config`]**: TOML configuration and discovery
//!
//! ## Session Lifecycle
//!
//! ```text
//! connection handler ── create_session ──► register (retry) ─► filter rules ─► registry
//!        │                                                                     │
//!        │ serve() until I/O ends or kill                       kill_session ◄─┤ heartbeat task
//!        ▼                                                                     │
//!  remove_session ── evict ──────────────────────────────────────────────────►─┘
//!        └── finish on core server (best-effort)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bastion_sessions::config::BastionConfig;
//! use bastion_sessions::session::{SessionManager, SessionRegistry};
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = BastionConfig::default();
//! let manager = SessionManager::new(
//!     SessionRegistry::new(),
//!     Arc::new(config.control_plane()?),
//!     config.session_manager_config(),
//! );
//! # let _ = manager;
//! # Ok(())
//! # }
//! ```

/// Session variants, registry and lifecycle orchestration.
pub mod session;

/// Control-plane client abstraction and its HTTP implementation.
pub mod service;

/// Heartbeat poller and control-task dispatch.
pub mod control;

/// Proxy-server handles and the user connection trait.
pub mod proxy;

/// Core server domain objects.
pub mod model;

/// User-facing message catalogue.
pub mod i18n;

/// Configuration loading and discovery.
pub mod config;

/// Environment constants and path utilities.
pub mod env;

// CLI module for command-line interface
pub mod cli;

pub use config::BastionConfig;
pub use control::{Heartbeat, TaskOutcome, handle_session_task};
pub use model::{FilterRule, TerminalTask};
pub use proxy::{DbProxyServer, ProxyServer, UserConnection};
pub use service::{ControlPlane, HttpControlPlane, RetryPolicy, ServiceError};
pub use session::{
    Session, SessionError, SessionManager, SessionManagerConfig, SessionRegistry,
};
