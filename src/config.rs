//! Configuration loading and discovery
//!
//! Discovery hierarchy, first existing file wins:
//! 1. Current directory: ./bastion.toml or ./.bastion/config.toml
//! 2. User config: ~/.bastion/config.toml
//! 3. System config: /etc/bastion/config.toml
//! 4. Built-in defaults

use crate::control::DEFAULT_HEARTBEAT_INTERVAL;
use crate::env;
use crate::i18n::Language;
use crate::service::retry::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_INTERVAL};
use crate::service::{HttpControlPlane, RetryPolicy, ServiceError};
use crate::session::SessionManagerConfig;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::env as std_env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Log level used until a configuration is loaded
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Process configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BastionConfig {
    /// Base URL of the core API server
    pub core_host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    pub language: Language,
    pub request_timeout_secs: u64,
    pub heartbeat_interval_secs: u64,
    pub compensate_on_policy_failure: bool,
    /// Default log filter, overridden by `RUST_LOG`
    pub log_level: String,
    pub retry: RetryConfig,
}

/// Session registration retry settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub interval_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval_ms: DEFAULT_RETRY_INTERVAL.as_millis() as u64,
        }
    }
}

impl Default for BastionConfig {
    fn default() -> Self {
        Self {
            core_host: "http://127.0.0.1:8080".to_string(),
            access_token: None,
            language: Language::default(),
            request_timeout_secs: 10,
            heartbeat_interval_secs: DEFAULT_HEARTBEAT_INTERVAL.as_secs(),
            compensate_on_policy_failure: true,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            retry: RetryConfig::default(),
        }
    }
}

impl BastionConfig {
    /// Load configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_toml_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml_string()?;
        std::fs::write(path, content).context("Failed to write config file")
    }

    /// Convert configuration to a TOML string
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }

    pub fn validate(&self) -> Result<()> {
        if self.core_host.trim().is_empty() {
            bail!("core_host must not be empty");
        }
        if self.retry.max_attempts == 0 {
            bail!("retry.max_attempts must be at least 1");
        }
        if self.heartbeat_interval_secs == 0 {
            bail!("heartbeat_interval_secs must be at least 1");
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be at least 1");
        }
        Ok(())
    }

    /// Tracing filter directive for this crate at the configured level
    pub fn log_directive(&self) -> String {
        log_directive(&self.log_level)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry.max_attempts,
            Duration::from_millis(self.retry.interval_ms),
        )
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn session_manager_config(&self) -> SessionManagerConfig {
        SessionManagerConfig {
            retry: self.retry_policy(),
            language: self.language,
            compensate_on_policy_failure: self.compensate_on_policy_failure,
        }
    }

    /// HTTP client for the configured core server
    pub fn control_plane(&self) -> Result<HttpControlPlane, ServiceError> {
        HttpControlPlane::new(
            &self.core_host,
            self.access_token.clone(),
            self.request_timeout(),
        )
    }
}

pub fn log_directive(level: &str) -> String {
    format!("bastion_sessions={}", level)
}

/// Configuration discovery system
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Discover and load configuration using the hierarchy
    pub fn discover_config() -> Result<BastionConfig> {
        if let Some(config_path) = Self::find_config_file() {
            info!("Loading configuration from: {:?}", config_path);
            return BastionConfig::from_toml_file(config_path);
        }

        info!("No configuration file found, using defaults");
        Ok(BastionConfig::default())
    }

    /// Find configuration file using discovery hierarchy
    pub fn find_config_file() -> Option<PathBuf> {
        for candidate in Self::config_candidates() {
            debug!("Checking for config file: {:?}", candidate);
            if candidate.is_file() {
                debug!("Found config file: {:?}", candidate);
                return Some(candidate);
            }
        }

        debug!("No config file found in discovery hierarchy");
        None
    }

    /// Configuration file candidates in priority order
    pub fn config_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if let Ok(current_dir) = std_env::current_dir() {
            candidates.push(current_dir.join(env::LOCAL_CONFIG_FILE_NAME));
            candidates.push(env::local_config_file_path(&current_dir));
        }

        if let Some(home_dir) = Self::home_dir() {
            candidates.push(env::user_config_file_path(&home_dir));
        }

        #[cfg(unix)]
        candidates.push(PathBuf::from(env::SYSTEM_CONFIG_FILE));

        candidates
    }

    fn home_dir() -> Option<PathBuf> {
        std_env::var("HOME")
            .ok()
            .or_else(|| std_env::var("USERPROFILE").ok())
            .map(PathBuf::from)
    }

    /// Print the discovery hierarchy and which file is active
    pub fn show_discovery_info() {
        println!("Configuration Discovery Hierarchy:");
        println!();

        for (i, candidate) in Self::config_candidates().iter().enumerate() {
            let status = if candidate.is_file() {
                "✓ EXISTS"
            } else if candidate.exists() {
                "✗ NOT A FILE"
            } else {
                "✗ NOT FOUND"
            };

            println!("  {}. {:?} - {}", i + 1, candidate, status);
        }

        println!();
        match Self::find_config_file() {
            Some(found) => println!("Active configuration: {:?}", found),
            None => println!("Active configuration: Built-in defaults"),
        }
    }
}
