//! Authoritative collection of entities
//!
//! `EntityStore` owns every [`Entity`] of a diagram, hands out fresh ids,
//! and persists the whole collection under a single storage key.

use crate::serialization::{decode_entities, encode_entities};
use crate::{Attribute, Entity};
use erd_core::{
    DEFAULT_ENTITIES_KEY, DiagramError, DiagramResult, EntityLookup, KeyValueStorage, new_id,
};

/// In-memory entity collection plus its persistence key
#[derive(Debug, Clone)]
pub struct EntityStore {
    entities: Vec<Entity>,
    key: String,
}

impl EntityStore {
    /// Create an empty store persisting under the default `entities` key
    pub fn new() -> Self {
        Self::with_key(DEFAULT_ENTITIES_KEY)
    }

    /// Create an empty store persisting under a custom key
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            entities: Vec::new(),
            key: key.into(),
        }
    }

    /// Storage key used by save and load
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reset the in-memory collection to empty. Storage is not touched.
    pub fn init(&mut self) {
        self.entities.clear();
    }

    // ========================================================================
    // Entity CRUD
    // ========================================================================

    /// Create an entity with a fresh id and append it to the collection
    pub fn create_entity(&mut self, name: impl Into<String>, x: f64, y: f64) -> &Entity {
        let mut entity = Entity::new(name, x, y);
        while self.contains_entity(&entity.id) {
            entity.id = new_id();
        }
        tracing::debug!("Created entity '{}' ({})", entity.name, entity.id);
        self.entities.push(entity);
        &self.entities[self.entities.len() - 1]
    }

    /// Append an attribute to an existing entity
    ///
    /// # Errors
    ///
    /// `EntityNotFound` if `entity_id` is not in the collection.
    pub fn add_attribute(
        &mut self,
        entity_id: &str,
        name: impl Into<String>,
        data_type: impl Into<String>,
        is_primary: bool,
    ) -> DiagramResult<&Attribute> {
        let entity = self
            .find_mut(entity_id)
            .ok_or_else(|| DiagramError::entity_not_found(entity_id))?;
        let attribute = entity.add_attribute(name, data_type, is_primary);
        tracing::debug!(
            "Added attribute '{}' to entity {}",
            attribute.name,
            entity_id
        );
        Ok(attribute)
    }

    /// Remove an attribute from an entity
    pub fn remove_attribute(
        &mut self,
        entity_id: &str,
        attribute_id: &str,
    ) -> DiagramResult<Attribute> {
        let entity = self
            .find_mut(entity_id)
            .ok_or_else(|| DiagramError::entity_not_found(entity_id))?;
        let removed =
            entity
                .remove_attribute(attribute_id)
                .ok_or_else(|| DiagramError::AttributeNotFound {
                    entity: entity.name.clone(),
                    attribute: attribute_id.to_string(),
                })?;
        tracing::debug!("Removed attribute {} from entity {}", attribute_id, entity_id);
        Ok(removed)
    }

    /// Set an entity's position. Unknown ids are ignored.
    pub fn move_entity(&mut self, entity_id: &str, x: f64, y: f64) {
        match self.find_mut(entity_id) {
            Some(entity) => {
                entity.set_position(x, y);
                tracing::debug!("Moved entity {} to ({}, {})", entity_id, x, y);
            }
            None => tracing::warn!("move_entity: unknown entity {}", entity_id),
        }
    }

    /// Change an entity's name. Unknown ids are ignored.
    pub fn rename_entity(&mut self, entity_id: &str, name: impl Into<String>) {
        match self.find_mut(entity_id) {
            Some(entity) => {
                entity.rename(name);
                tracing::debug!("Renamed entity {} to '{}'", entity_id, entity.name);
            }
            None => tracing::warn!("rename_entity: unknown entity {}", entity_id),
        }
    }

    /// Remove an entity if present. Relationships referencing it are kept.
    pub fn delete_entity(&mut self, entity_id: &str) -> Option<Entity> {
        let pos = self.entities.iter().position(|e| e.id == entity_id)?;
        tracing::debug!("Deleted entity {}", entity_id);
        Some(self.entities.remove(pos))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Get an entity by ID
    pub fn get_entity(&self, entity_id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == entity_id)
    }

    /// Get the first entity with this name
    pub fn get_entity_by_name(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// All entities in creation order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Get the number of entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn find_mut(&mut self, entity_id: &str) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == entity_id)
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Serialize the whole collection under this store's key, overwriting it
    pub fn save_entities<S: KeyValueStorage + ?Sized>(
        &self,
        storage: &mut S,
    ) -> DiagramResult<()> {
        let json = encode_entities(&self.entities)?;
        storage.set(&self.key, &json)?;
        tracing::info!("Saved {} entities to '{}'", self.entities.len(), self.key);
        Ok(())
    }

    /// Replace the collection with the stored one.
    ///
    /// Returns `Ok(false)` and keeps the current collection when the key is
    /// absent. Malformed data is reported as `Deserialization` and the
    /// current collection is kept as well.
    pub fn load_entities<S: KeyValueStorage + ?Sized>(
        &mut self,
        storage: &S,
    ) -> DiagramResult<bool> {
        let Some(json) = storage.get(&self.key)? else {
            tracing::debug!("No stored entities under '{}'", self.key);
            return Ok(false);
        };
        let entities = decode_entities(&self.key, &json).inspect_err(|e| {
            tracing::warn!("Keeping in-memory entities: {}", e);
        })?;
        tracing::info!("Loaded {} entities from '{}'", entities.len(), self.key);
        self.entities = entities;
        Ok(true)
    }

    /// Replace the collection wholesale; callers check id uniqueness first
    pub(crate) fn replace_all(&mut self, entities: Vec<Entity>) {
        self.entities = entities;
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityLookup for EntityStore {
    fn contains_entity(&self, id: &str) -> bool {
        self.entities.iter().any(|e| e.id == id)
    }
}

// ============================================================================
// Tests
// ============================================================================
