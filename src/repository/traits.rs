//! Repository Layer - Core Traits
//!
//! Defines the abstract interface to the remote list store.
//! Implementations can use HTTP, in-memory fakes for tests, etc.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainResult, LinkItem};

/// Fields for creating a link
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLink {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Partial update of a link; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Remote store for one user's link lists
///
/// The store owns durable state and assigns ids and positions; the engine
/// only ever learns about them through these four operations.
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Create a link at the head of the list
    async fn create_link(&self, list_id: &str, link: NewLink) -> DomainResult<LinkItem>;

    /// Update fields of an existing link
    async fn update_link(&self, list_id: &str, id: &str, patch: LinkPatch) -> DomainResult<LinkItem>;

    /// Delete a link by id
    async fn delete_link(&self, list_id: &str, id: &str) -> DomainResult<()>;

    /// Replace the full ordering of the list's links
    async fn reorder_links(&self, list_id: &str, item_ids: &[String]) -> DomainResult<()>;
}
