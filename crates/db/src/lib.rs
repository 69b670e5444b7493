//! JSON-file persistence: one document per resource kind, serialized per
//! kind by in-process guards, with typed repositories on top.

pub mod document;
pub mod error;
pub mod guard;
pub mod kind;
pub mod media;
pub mod migrate;
pub mod repositories;
pub mod store;

pub use document::Document;
pub use error::StoreError;
pub use kind::ResourceKind;
pub use store::{JsonStore, StoreConfig};
