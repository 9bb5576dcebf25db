//! Repository Layer - HTTP Store
//!
//! `LinkStore` implementation against the Snack REST API. Every response
//! travels in a `{ success, data?, error? }` envelope; `success: false` and
//! a non-2xx transport status are treated identically as operation failures.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult, LinkItem};

use super::traits::{LinkPatch, LinkStore, NewLink};

/// Standard response envelope of the Snack API
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReorderBody<'a> {
    item_ids: &'a [String],
}

/// HTTP client for the remote list store
pub struct HttpLinkStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLinkStore {
    /// `base_url` without a trailing slash, e.g. `https://snack.example/api`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn links_url(&self, list_id: &str) -> String {
        format!("{}/lists/{}/links", self.base_url, list_id)
    }

    fn link_url(&self, list_id: &str, id: &str) -> String {
        format!("{}/lists/{}/links/{}", self.base_url, list_id, id)
    }

    /// Send a request and unwrap the envelope into a domain result
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> DomainResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| DomainError::Network(e.to_string()))?;
        let status = response.status();
        let envelope = response
            .json::<ApiEnvelope<T>>()
            .await
            .map_err(|e| DomainError::Network(e.to_string()))?;

        if !status.is_success() || !envelope.success {
            let message = envelope
                .error
                .unwrap_or_else(|| format!("request failed with status {}", status));
            log::warn!("list store request failed: {}", message);
            return Err(DomainError::Network(message));
        }
        envelope
            .data
            .ok_or_else(|| DomainError::Network("response envelope missing data".to_string()))
    }

    /// Like [`execute`](Self::execute) for endpoints whose success response
    /// carries no payload (delete, reorder). Tolerates an entirely empty
    /// 204-style body.
    async fn execute_unit(&self, request: reqwest::RequestBuilder) -> DomainResult<()> {
        let response = request
            .send()
            .await
            .map_err(|e| DomainError::Network(e.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| DomainError::Network(e.to_string()))?;

        let envelope = if body.is_empty() {
            None
        } else {
            serde_json::from_slice::<ApiEnvelope<serde_json::Value>>(&body).ok()
        };
        let succeeded =
            status.is_success() && envelope.as_ref().map_or(true, |env| env.success);
        if succeeded {
            return Ok(());
        }
        let message = envelope
            .and_then(|env| env.error)
            .unwrap_or_else(|| format!("request failed with status {}", status));
        log::warn!("list store request failed: {}", message);
        Err(DomainError::Network(message))
    }
}

#[async_trait]
impl LinkStore for HttpLinkStore {
    async fn create_link(&self, list_id: &str, link: NewLink) -> DomainResult<LinkItem> {
        self.execute(self.client.post(self.links_url(list_id)).json(&link))
            .await
    }

    async fn update_link(&self, list_id: &str, id: &str, patch: LinkPatch) -> DomainResult<LinkItem> {
        self.execute(self.client.patch(self.link_url(list_id, id)).json(&patch))
            .await
    }

    async fn delete_link(&self, list_id: &str, id: &str) -> DomainResult<()> {
        self.execute_unit(self.client.delete(self.link_url(list_id, id)))
            .await
    }

    async fn reorder_links(&self, list_id: &str, item_ids: &[String]) -> DomainResult<()> {
        let url = format!("{}/order", self.links_url(list_id));
        self.execute_unit(self.client.patch(url).json(&ReorderBody { item_ids }))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success_deserialization() {
        let env: ApiEnvelope<LinkItem> = serde_json::from_str(
            r#"{"success":true,"data":{"id":"l1","url":"https://a.com","title":"A",
                "description":null,"imageUrl":null,"faviconUrl":null,"position":0,
                "createdAt":null,"updatedAt":null}}"#,
        )
        .unwrap();
        assert!(env.success);
        assert_eq!(env.data.unwrap().id, "l1");
    }

    #[test]
    fn test_envelope_failure_deserialization() {
        let env: ApiEnvelope<LinkItem> =
            serde_json::from_str(r#"{"success":false,"error":"list is locked"}"#).unwrap();
        assert!(!env.success);
        assert_eq!(env.error.as_deref(), Some("list is locked"));
        assert!(env.data.is_none());
    }

    #[test]
    fn test_reorder_body_casing() {
        let ids = vec!["a".to_string(), "b".to_string()];
        let body = serde_json::to_string(&ReorderBody { item_ids: &ids }).unwrap();
        assert_eq!(body, r#"{"itemIds":["a","b"]}"#);
    }

    #[test]
    fn test_patch_skips_absent_fields() {
        let patch = LinkPatch {
            title: Some("T".to_string()),
            ..LinkPatch::default()
        };
        assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"title":"T"}"#);
    }
}
