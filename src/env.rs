//! Environment constants and path utilities.
//!
//! Centralizes the configuration file locations and the core API routes so
//! the rest of the crate never hardcodes them.

use std::path::{Path, PathBuf};

/// Application directory name (hidden directory like .git)
pub const APP_DIR_NAME: &str = ".bastion";

/// Configuration file name inside the application directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Standalone configuration file name in the working directory
pub const LOCAL_CONFIG_FILE_NAME: &str = "bastion.toml";

/// System-wide configuration file (Unix-like systems)
pub const SYSTEM_CONFIG_FILE: &str = "/etc/bastion/config.toml";

/// Core API routes
pub mod api {
    /// Session collection; POST registers a session
    pub const SESSION_LIST: &str = "/api/v1/terminal/sessions/";

    /// Terminal status; POST reports live sessions and returns pending tasks
    pub const TERMINAL_STATUS: &str = "/api/v1/terminal/terminals/status/";

    /// Single session; PATCH marks it finished
    pub fn session_detail(session_id: &str) -> String {
        format!("/api/v1/terminal/sessions/{}/", session_id)
    }

    /// Single control task; PATCH acknowledges it
    pub fn task_detail(task_id: &str) -> String {
        format!("/api/v1/terminal/tasks/{}/", task_id)
    }

    /// Command filter rules of a system user
    pub fn system_user_filter_rules(system_user_id: &str) -> String {
        format!(
            "/api/v1/assets/system-users/{}/cmd-filter-rules/",
            system_user_id
        )
    }
}

/// Build the application directory path under `root`
pub fn app_dir_path(root: &Path) -> PathBuf {
    root.join(APP_DIR_NAME)
}

/// Build config file path in user's home directory
pub fn user_config_file_path(home_dir: &Path) -> PathBuf {
    app_dir_path(home_dir).join(CONFIG_FILE_NAME)
}

/// Build local config file path in current directory
pub fn local_config_file_path(current_dir: &Path) -> PathBuf {
    app_dir_path(current_dir).join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_paths() {
        let home_dir = Path::new("/home/user");
        let current_dir = Path::new("/current/project");

        assert_eq!(
            user_config_file_path(home_dir),
            Path::new("/home/user/.bastion/config.toml")
        );

        assert_eq!(
            local_config_file_path(current_dir),
            Path::new("/current/project/.bastion/config.toml")
        );
    }

    #[test]
    fn test_api_routes() {
        assert_eq!(
            api::session_detail("abc"),
            "/api/v1/terminal/sessions/abc/"
        );
        assert_eq!(api::task_detail("t-1"), "/api/v1/terminal/tasks/t-1/");
    }
}
