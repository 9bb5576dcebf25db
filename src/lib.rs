//! Snack List Engine
//!
//! Client-side core for the Snack link-list editor. Layered architecture:
//! - domain: Core entities and business rules
//! - repository: Remote list store abstraction and HTTP implementation
//! - engine: Optimistic mutation engine (add / remove / refresh / reorder)
//! - editor: Glue between the drag tracker and the engine

pub mod domain;
pub mod normalize;
pub mod preview;
pub mod repository;
pub mod engine;
pub mod editor;

pub use domain::{DomainError, DomainResult, LinkItem, LinkList, ListEntry, Preview, ViewMode};
pub use editor::{EditorAction, ListEditor};
pub use engine::{AddOutcome, ListEngine};
pub use preview::{HttpPreviewFetcher, PreviewFetcher};
pub use repository::{HttpLinkStore, LinkPatch, LinkStore, NewLink};
