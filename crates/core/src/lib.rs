//! # ERD Core
//!
//! Core types, traits, and error handling for ERD Studio.
//!
//! This crate provides the foundational building blocks used by the
//! diagram model and its front ends, including:
//!
//! - **Types**: identifiers, `Position`, `Cardinality`, `StorageKeys`
//! - **Traits**: `KeyValueStorage`, `EntityLookup`
//! - **Errors**: Unified error handling with `DiagramError` and `DiagramResult`
//!

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{DiagramError, DiagramResult};
pub use traits::{EntityLookup, KeyValueStorage};
pub use types::{
    AttributeId, Cardinality, DEFAULT_ENTITIES_KEY, DEFAULT_RELATIONSHIPS_KEY, EntityId,
    ParseCardinalityError, Position, RelationshipId, StorageKeys, new_id,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
