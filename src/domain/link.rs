//! Link Entity
//!
//! A saved link inside a list, plus the placeholder/confirmed split used
//! while a newly added link is still waiting for the server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A link saved in a list
///
/// `position` is the zero-based rank among siblings; for N items the
/// positions always form a contiguous permutation of `0..N`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkItem {
    /// Server-assigned identifier, unique within a list
    pub id: String,
    /// Absolute, normalized URL
    pub url: String,
    /// Display label; falls back to the hostname until enrichment completes
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub favicon_url: Option<String>,
    /// Zero-based rank among siblings
    pub position: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl LinkItem {
    /// Create a new item as the server would return it at position 0
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            title: None,
            description: None,
            image_url: None,
            favicon_url: None,
            position: 0,
            created_at: None,
            updated_at: None,
        }
    }

    /// Label shown in the UI: title when present, hostname otherwise
    pub fn display_title(&self) -> String {
        self.title
            .clone()
            .or_else(|| crate::normalize::hostname_of(&self.url))
            .unwrap_or_else(|| self.url.clone())
    }
}

/// Enrichment metadata fetched for a URL
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub favicon_url: Option<String>,
}

/// One entry of the rendered list
///
/// A freshly added link is shown as a `Placeholder` until the server has
/// assigned it a permanent id; reconciliation replaces the placeholder with
/// the `Confirmed` item by matching the client-only `temp_id`.
#[derive(Debug, Clone, PartialEq)]
pub enum ListEntry {
    Placeholder { temp_id: u64, url: String },
    Confirmed(LinkItem),
}

impl ListEntry {
    /// Server id of a confirmed entry (placeholders have none yet)
    pub fn item_id(&self) -> Option<&str> {
        match self {
            ListEntry::Placeholder { .. } => None,
            ListEntry::Confirmed(item) => Some(&item.id),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            ListEntry::Placeholder { url, .. } => url,
            ListEntry::Confirmed(item) => &item.url,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ListEntry::Placeholder { .. })
    }

    pub fn as_confirmed(&self) -> Option<&LinkItem> {
        match self {
            ListEntry::Placeholder { .. } => None,
            ListEntry::Confirmed(item) => Some(item),
        }
    }
}
