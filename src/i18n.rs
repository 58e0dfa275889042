//! User-facing message catalogue.
//!
//! Only the messages the session core writes to end users live here. They are
//! keyed by [`Message`] and rendered in the configured [`Language`].

use serde::{Deserialize, Serialize};

const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Zh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    ConnectApiServerFailed,
    CreateDatabaseSessionFailed,
}

impl Language {
    pub fn translate(&self, message: Message) -> &'static str {
        match (self, message) {
            (Language::En, Message::ConnectApiServerFailed) => "Connect with api server failed",
            (Language::En, Message::CreateDatabaseSessionFailed) => {
                "Create database session failed"
            }
            (Language::Zh, Message::ConnectApiServerFailed) => "连接API服务器失败",
            (Language::Zh, Message::CreateDatabaseSessionFailed) => "创建数据库会话失败",
        }
    }

    /// Translated message, marked as a terminal warning
    pub fn warning(&self, message: Message) -> String {
        wrap_warn(self.translate(message))
    }
}

/// Render `text` in yellow and terminate the line for a raw terminal
pub fn wrap_warn(text: &str) -> String {
    format!("{YELLOW}{text}{RESET}\r\n")
}
