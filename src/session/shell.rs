use super::types::{SessionAttributes, SessionCommon};
use crate::proxy::ProxyServer;
use serde_json::json;

/// Interactive terminal session wrapping a [`ProxyServer`] handle
#[derive(Debug)]
pub struct ShellSession {
    pub(crate) common: SessionCommon,
    proxy: ProxyServer,
}

impl ShellSession {
    pub fn new(proxy: ProxyServer) -> Self {
        Self {
            common: SessionCommon::new(),
            proxy,
        }
    }

    pub fn proxy(&self) -> &ProxyServer {
        &self.proxy
    }

    pub fn attributes(&self) -> SessionAttributes {
        let mut attributes = self.common.base_attributes(
            self.proxy.user_conn.as_ref(),
            &self.proxy.user,
            &self.proxy.system_user,
        );
        attributes.insert("asset".to_string(), json!(self.proxy.asset.hostname));
        attributes.insert("asset_id".to_string(), json!(self.proxy.asset.id));
        attributes.insert("org_id".to_string(), json!(self.proxy.asset.org_id));
        attributes.insert("protocol".to_string(), json!(self.proxy.system_user.protocol));
        attributes
    }
}
