//! # ERD IR
//!
//! This crate provides the diagram model for ERD Studio: the records a
//! diagram is made of, the stores that own them, and their persistence.
//!
//! ## Core Concepts
//!
//! - **Entity**: A named box owning an ordered list of attributes
//! - **Attribute**: A named, typed field; may be flagged as primary
//! - **Relationship**: A named association between two entities with one
//!   cardinality per side
//! - **EntityStore / RelationshipStore**: Authoritative collections, each
//!   persisted under its own storage key
//! - **Diagram**: Both stores bound to a storage backend
//!

// Module declarations
pub mod diagram;
pub mod entity;
pub mod entity_store;
pub mod relationship;
pub mod relationship_store;
pub mod serialization;
pub mod storage;
pub mod validation;

// Re-export commonly used types at crate root
pub use diagram::{Diagram, LoadReport};
pub use entity::{Attribute, Entity};
pub use entity_store::EntityStore;
pub use relationship::Relationship;
pub use relationship_store::RelationshipStore;
pub use serialization::{DiagramFile, load_diagram, save_diagram};
pub use storage::{FileStorage, MemoryStorage};
pub use validation::{
    DiagramValidator, IssueCode, ValidationIssue, ValidationResult, ValidationRule,
};

// Re-export core types that are commonly used with the model
pub use erd_core::{
    Cardinality, DiagramError, DiagramResult, EntityLookup, KeyValueStorage, Position, StorageKeys,
};

/// Current schema version for snapshot files
pub const SCHEMA_VERSION: u32 = 1;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Prelude Module
// ============================================================================

/// Convenient re-exports for common usage
pub mod prelude {
    pub use crate::{
        Attribute, Cardinality, Diagram, DiagramError, DiagramResult, Entity, EntityLookup,
        EntityStore, FileStorage, KeyValueStorage, MemoryStorage, Position, Relationship,
        RelationshipStore, StorageKeys,
    };
}

// ============================================================================
// Tests
// ============================================================================
