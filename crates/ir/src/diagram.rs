//! A diagram session: both stores plus the storage they persist to
//!
//! `Diagram` is what a front end holds. It does not add any cross-store
//! transaction: `save` commits the entity key and then the relationship key,
//! each independently.

use crate::serialization::DiagramFile;
use crate::validation::{DiagramValidator, ValidationResult};
use crate::{EntityStore, Relationship, RelationshipStore};
use erd_core::{DiagramResult, KeyValueStorage, StorageKeys};

/// Which keys were found by [`Diagram::load`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub entities: bool,
    pub relationships: bool,
}

impl LoadReport {
    /// Neither key was present
    pub fn is_empty(&self) -> bool {
        !self.entities && !self.relationships
    }
}

/// Entity and relationship stores bound to one storage backend
#[derive(Debug)]
pub struct Diagram<S: KeyValueStorage> {
    storage: S,
    entities: EntityStore,
    relationships: RelationshipStore,
}

impl<S: KeyValueStorage> Diagram<S> {
    /// Create an empty diagram using the default storage keys
    pub fn new(storage: S) -> Self {
        Self::with_keys(storage, &StorageKeys::default())
    }

    /// Create an empty diagram with custom storage keys
    pub fn with_keys(storage: S, keys: &StorageKeys) -> Self {
        Self {
            storage,
            entities: EntityStore::with_key(keys.entities.clone()),
            relationships: RelationshipStore::with_key(keys.relationships.clone()),
        }
    }

    /// Create a diagram and load whatever is stored
    pub fn open(storage: S, keys: &StorageKeys) -> DiagramResult<Self> {
        let mut diagram = Self::with_keys(storage, keys);
        diagram.load()?;
        Ok(diagram)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn entities(&self) -> &EntityStore {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut EntityStore {
        &mut self.entities
    }

    pub fn relationships(&self) -> &RelationshipStore {
        &self.relationships
    }

    pub fn relationships_mut(&mut self) -> &mut RelationshipStore {
        &mut self.relationships
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Create a relationship, checking endpoints against this diagram's entities
    pub fn create_relationship(
        &mut self,
        source_id: &str,
        target_id: &str,
        source_cardinality: impl Into<String>,
        target_cardinality: impl Into<String>,
        name: impl Into<String>,
    ) -> DiagramResult<&Relationship> {
        self.relationships.create_relationship(
            &self.entities,
            source_id,
            target_id,
            source_cardinality,
            target_cardinality,
            name,
        )
    }

    /// Empty both in-memory collections
    pub fn clear(&mut self) {
        self.entities.init();
        self.relationships.init();
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Save entities, then relationships
    pub fn save(&mut self) -> DiagramResult<()> {
        self.entities.save_entities(&mut self.storage)?;
        self.relationships.save_relationships(&mut self.storage)?;
        Ok(())
    }

    /// Load entities, then relationships.
    ///
    /// A failure on the relationship key leaves the freshly loaded entities
    /// in place; there is no rollback across stores.
    pub fn load(&mut self) -> DiagramResult<LoadReport> {
        let entities = self.entities.load_entities(&self.storage)?;
        let relationships = self.relationships.load_relationships(&self.storage)?;
        Ok(LoadReport {
            entities,
            relationships,
        })
    }

    /// Copy both collections into a snapshot
    pub fn snapshot(&self) -> DiagramFile {
        DiagramFile::new(
            self.entities.entities().to_vec(),
            self.relationships.relationships().to_vec(),
        )
    }

    /// Replace both collections with a snapshot's contents
    ///
    /// A snapshot with duplicate ids is rejected and both stores are left
    /// untouched.
    pub fn restore(&mut self, file: DiagramFile) -> DiagramResult<()> {
        file.check_ids().inspect_err(|e| {
            tracing::warn!("Rejected snapshot: {}", e);
        })?;
        tracing::info!(
            "Restoring {} entities and {} relationships from snapshot",
            file.entities.len(),
            file.relationships.len()
        );
        self.entities.replace_all(file.entities);
        self.relationships.replace_all(file.relationships);
        Ok(())
    }

    /// Run the built-in validation rules
    pub fn validate(&self) -> ValidationResult {
        DiagramValidator::with_default_rules().validate(&self.entities, &self.relationships)
    }
}

// ============================================================================
// Tests
// ============================================================================
