//! HTTP implementation of [`ControlPlane`] against the core API.

use super::{ControlPlane, ServiceError};
use crate::env::api;
use crate::model::{FilterRule, TerminalTask};
use crate::session::SessionAttributes;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

/// Control-plane client speaking JSON over HTTP
#[derive(Debug, Clone)]
pub struct HttpControlPlane {
    client: Client,
    base_url: Url,
    access_token: Option<String>,
}

impl HttpControlPlane {
    pub fn new(
        core_host: &str,
        access_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ServiceError> {
        let base_url = Url::parse(core_host)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ServiceError::Request {
                url: base_url.to_string(),
                source,
            })?;

        Ok(Self {
            client,
            base_url,
            access_token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, ServiceError> {
        Ok(self.base_url.join(path)?)
    }

    async fn send(&self, request: RequestBuilder, url: &Url) -> Result<Response, ServiceError> {
        let request = match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|source| ServiceError::Request {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &Url,
    ) -> Result<T, ServiceError> {
        self.send(request, url)
            .await?
            .json::<T>()
            .await
            .map_err(|source| ServiceError::Request {
                url: url.to_string(),
                source,
            })
    }
}

#[async_trait]
impl ControlPlane for HttpControlPlane {
    async fn create_session(&self, attributes: &SessionAttributes) -> bool {
        let url = match self.url(api::SESSION_LIST) {
            Ok(url) => url,
            Err(e) => {
                error!("Create session failed: {}", e);
                return false;
            }
        };

        match self.send(self.client.post(url.clone()).json(attributes), &url).await {
            Ok(_) => true,
            Err(e) => {
                error!("Create session failed: {}", e);
                false
            }
        }
    }

    async fn finish_session(&self, attributes: &SessionAttributes) -> Result<(), ServiceError> {
        let session_id = attributes
            .get("id")
            .and_then(|id| id.as_str())
            .ok_or(ServiceError::MissingSessionId)?;
        let url = self.url(&api::session_detail(session_id))?;
        let payload = json!({
            "is_finished": true,
            "date_end": attributes.get("date_end"),
        });

        self.send(self.client.patch(url.clone()).json(&payload), &url)
            .await?;
        debug!("Finish session {} success", session_id);
        Ok(())
    }

    async fn get_filter_rules(
        &self,
        system_user_id: &str,
    ) -> Result<Vec<FilterRule>, ServiceError> {
        let url = self.url(&api::system_user_filter_rules(system_user_id))?;
        self.send_json(self.client.get(url.clone()), &url).await
    }

    async fn finish_task(&self, task_id: &str) -> Result<(), ServiceError> {
        let url = self.url(&api::task_detail(task_id))?;
        let payload = json!({ "is_finished": true });

        self.send(self.client.patch(url.clone()).json(&payload), &url)
            .await?;
        Ok(())
    }

    async fn heartbeat(&self, alive_sessions: &[String]) -> Result<Vec<TerminalTask>, ServiceError> {
        let url = self.url(api::TERMINAL_STATUS)?;
        let payload = json!({ "sessions": alive_sessions });

        self.send_json(self.client.post(url.clone()).json(&payload), &url)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_core_host() {
        let result = HttpControlPlane::new("not a url", None, Duration::from_secs(5));
        assert!(matches!(result, Err(ServiceError::InvalidUrl(_))));
    }

    #[test]
    fn test_endpoint_urls() {
        let client =
            HttpControlPlane::new("http://core.local:8080", None, Duration::from_secs(5)).unwrap();

        assert_eq!(
            client.url(api::SESSION_LIST).unwrap().as_str(),
            "http://core.local:8080/api/v1/terminal/sessions/"
        );
        assert_eq!(
            client
                .url(&api::system_user_filter_rules("su-1"))
                .unwrap()
                .as_str(),
            "http://core.local:8080/api/v1/assets/system-users/su-1/cmd-filter-rules/"
        );
    }

    #[tokio::test]
    async fn test_finish_session_requires_id() {
        let client =
            HttpControlPlane::new("http://127.0.0.1:9", None, Duration::from_millis(200)).unwrap();
        let attributes = SessionAttributes::new();

        let result = client.finish_session(&attributes).await;
        assert!(matches!(result, Err(ServiceError::MissingSessionId)));
    }

    #[tokio::test]
    async fn test_unreachable_core_reports_failure() {
        // port 9 (discard) is not expected to serve HTTP
        let client =
            HttpControlPlane::new("http://127.0.0.1:9", None, Duration::from_millis(200)).unwrap();

        assert!(!client.create_session(&SessionAttributes::new()).await);
        assert!(client.finish_task("t1").await.is_err());
    }
}
