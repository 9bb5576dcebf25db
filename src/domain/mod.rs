//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has NO external dependencies (except serde/chrono for serialization).

mod error;
mod link;
mod list;

pub use error::{DomainError, DomainResult};
pub use link::{LinkItem, ListEntry, Preview};
pub use list::{LinkList, ViewMode};
