//! Repository Layer
//!
//! Abstraction over the remote list store plus its HTTP implementation.

mod http_store;
mod traits;

pub use http_store::HttpLinkStore;
pub use traits::{LinkPatch, LinkStore, NewLink};
