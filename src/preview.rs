//! Link Preview Enrichment
//!
//! Fetches title/description/image/favicon metadata for a URL from the
//! enrichment service. This boundary never fails outward: any transport
//! error, timeout or malformed response degrades to a fallback preview
//! whose favicon is derived from the URL's hostname.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::Preview;
use crate::normalize::hostname_of;

/// Ceiling for one enrichment round-trip. A hung fetch must not keep an
/// item's "refreshing" flag set indefinitely.
const PREVIEW_TIMEOUT: Duration = Duration::from_secs(8);

/// Source of link previews
///
/// Safe to call concurrently, one call per item; implementations hold no
/// shared mutable state between calls.
#[async_trait]
pub trait PreviewFetcher: Send + Sync {
    /// Fetch enrichment metadata for `url`. Infallible: degrades to
    /// [`fallback_preview`] instead of erroring.
    async fn fetch_preview(&self, url: &str) -> Preview;
}

/// Best-effort preview when the enrichment service is unreachable:
/// favicon by domain, everything else unknown.
pub fn fallback_preview(url: &str) -> Preview {
    Preview {
        favicon_url: hostname_of(url)
            .map(|host| format!("https://www.google.com/s2/favicons?domain={}&sz=64", host)),
        ..Preview::default()
    }
}

#[derive(Serialize)]
struct PreviewRequest<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreviewResponse {
    title: Option<String>,
    description: Option<String>,
    image_url: Option<String>,
    favicon_url: Option<String>,
    #[allow(dead_code)]
    site_name: Option<String>,
}

/// Preview fetcher backed by the HTTP enrichment endpoint
pub struct HttpPreviewFetcher {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPreviewFetcher {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    async fn try_fetch(&self, url: &str) -> Option<PreviewResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&PreviewRequest { url })
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        response.json::<PreviewResponse>().await.ok()
    }
}

#[async_trait]
impl PreviewFetcher for HttpPreviewFetcher {
    async fn fetch_preview(&self, url: &str) -> Preview {
        match tokio::time::timeout(PREVIEW_TIMEOUT, self.try_fetch(url)).await {
            Ok(Some(resp)) => Preview {
                title: resp.title,
                description: resp.description,
                image_url: resp.image_url,
                favicon_url: resp.favicon_url.or_else(|| fallback_preview(url).favicon_url),
            },
            Ok(None) => {
                log::debug!("preview fetch failed for {}, using fallback", url);
                fallback_preview(url)
            }
            Err(_) => {
                log::debug!("preview fetch timed out for {}", url);
                fallback_preview(url)
            }
        }
    }
}
