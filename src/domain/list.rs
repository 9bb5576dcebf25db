//! List Entity
//!
//! A user-owned, ordered collection of links.

use serde::{Deserialize, Serialize};

use super::link::LinkItem;

/// Display mode for a list. Presentation only, no data semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Rows with title + favicon
    #[default]
    List,
    /// Cards with preview images
    Grid,
    /// Dense rows, URL only
    Compact,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::List => "list",
            ViewMode::Grid => "grid",
            ViewMode::Compact => "compact",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "grid" => ViewMode::Grid,
            "compact" => ViewMode::Compact,
            _ => ViewMode::List,
        }
    }
}

/// An ordered collection of links belonging to one owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkList {
    /// Internal identifier
    pub id: String,
    /// Shareable identifier used in public URLs
    pub public_id: String,
    pub title: String,
    pub view_mode: ViewMode,
    /// Items ordered by `position` ascending
    pub items: Vec<LinkItem>,
}
