/**
 * HTTP Gateway
 *
 * REST adapter for the finance backend. One resource per category:
 *
 *   GET    {base}/api/{resource}?user_id={user}
 *   PUT    {base}/api/{resource}/{id}
 *   DELETE {base}/api/{resource}/{id}?user_id={user}
 *
 * Requests carry the bearer token handed in by the identity provider and
 * are bounded by the configured request timeout.
 */

use crate::client::config::Config;
use crate::client::remote::{RemoteGateway, RemoteRecord};
use crate::shared::error::SyncError;
use crate::shared::finance::Category;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Serialize;

/// REST gateway
#[derive(Debug, Clone)]
pub struct HttpGateway {
    config: Config,
    client: Client,
}

#[derive(Serialize)]
struct UpsertBody<'a> {
    id: &'a str,
    user_id: &'a str,
    payload: &'a serde_json::Value,
}

impl HttpGateway {
    pub fn new(config: Config) -> Result<Self, SyncError> {
        let client = Client::builder()
            .timeout(config.app().request_timeout)
            .build()
            .map_err(|e| SyncError::gateway(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    fn collection_url(&self, category: Category) -> String {
        self.config.api_url(&format!("/api/{}", category.resource()))
    }

    /// Collection URL plus the record id as one percent-encoded path segment
    fn record_url(&self, category: Category, record_id: &str) -> Result<Url, SyncError> {
        let mut url = Url::parse(&self.collection_url(category))
            .map_err(|e| SyncError::gateway(format!("Invalid server URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| SyncError::gateway("Server URL cannot carry a path"))?
            .push(record_id);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.config.get_token() {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    async fn send(request: RequestBuilder, action: &str) -> Result<Response, SyncError> {
        let response = request
            .send()
            .await
            .map_err(|e| SyncError::gateway(format!("Network error: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            return Err(SyncError::gateway(format!(
                "{} failed: {} - {}",
                action, status, error_text
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn fetch(
        &self,
        category: Category,
        user_id: &str,
    ) -> Result<Vec<RemoteRecord>, SyncError> {
        let request = self
            .client
            .get(self.collection_url(category))
            .query(&[("user_id", user_id)]);
        let response = Self::send(self.authorize(request), "GET").await?;

        response
            .json::<Vec<RemoteRecord>>()
            .await
            .map_err(|e| SyncError::gateway(format!("Failed to parse response: {}", e)))
    }

    async fn upsert(
        &self,
        category: Category,
        user_id: &str,
        record_id: &str,
        payload: serde_json::Value,
    ) -> Result<(), SyncError> {
        let body = UpsertBody {
            id: record_id,
            user_id,
            payload: &payload,
        };
        let request = self
            .client
            .put(self.record_url(category, record_id)?)
            .json(&body);
        Self::send(self.authorize(request), "PUT").await?;
        Ok(())
    }

    async fn delete(
        &self,
        category: Category,
        user_id: &str,
        record_id: &str,
    ) -> Result<(), SyncError> {
        let request = self
            .client
            .delete(self.record_url(category, record_id)?)
            .query(&[("user_id", user_id)]);
        Self::send(self.authorize(request), "DELETE").await?;
        Ok(())
    }
}
