use super::types::{SessionAttributes, SessionCommon};
use crate::proxy::DbProxyServer;
use serde_json::json;

/// Database session wrapping a [`DbProxyServer`] handle
#[derive(Debug)]
pub struct DatabaseSession {
    pub(crate) common: SessionCommon,
    proxy: DbProxyServer,
}

impl DatabaseSession {
    pub fn new(proxy: DbProxyServer) -> Self {
        Self {
            common: SessionCommon::new(),
            proxy,
        }
    }

    pub fn proxy(&self) -> &DbProxyServer {
        &self.proxy
    }

    pub fn attributes(&self) -> SessionAttributes {
        let database = &self.proxy.database;
        let mut attributes = self.common.base_attributes(
            self.proxy.user_conn.as_ref(),
            &self.proxy.user,
            &self.proxy.system_user,
        );
        // the core server lists database sessions under the asset column
        attributes.insert(
            "asset".to_string(),
            json!(format!("{}:{}/{}", database.host, database.port, database.db_name)),
        );
        attributes.insert("database".to_string(), json!(database.name));
        attributes.insert("database_id".to_string(), json!(database.id));
        attributes.insert("org_id".to_string(), json!(database.org_id));
        attributes.insert("protocol".to_string(), json!(database.db_type));
        attributes
    }
}
