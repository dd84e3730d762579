//! Authoritative collection of relationships
//!
//! `RelationshipStore` mirrors [`EntityStore`](crate::EntityStore): it owns the
//! relationship records and persists them under its own key. Endpoint ids are
//! checked against an [`EntityLookup`] at creation time only.

use crate::Relationship;
use crate::serialization::{decode_relationships, encode_relationships};
use erd_core::{
    DEFAULT_RELATIONSHIPS_KEY, DiagramError, DiagramResult, EntityLookup, KeyValueStorage, new_id,
};

/// In-memory relationship collection plus its persistence key
#[derive(Debug, Clone)]
pub struct RelationshipStore {
    relationships: Vec<Relationship>,
    key: String,
}

impl RelationshipStore {
    /// Create an empty store persisting under the default `relationships` key
    pub fn new() -> Self {
        Self::with_key(DEFAULT_RELATIONSHIPS_KEY)
    }

    /// Create an empty store persisting under a custom key
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            relationships: Vec::new(),
            key: key.into(),
        }
    }

    /// Storage key used by save and load
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reset the in-memory collection to empty
    pub fn init(&mut self) {
        self.relationships.clear();
    }

    // ========================================================================
    // Relationship CRUD
    // ========================================================================

    /// Create a relationship between two known entities
    ///
    /// Cardinalities are stored as given.
    ///
    /// # Errors
    ///
    /// `UnknownEntity` naming the first endpoint `entities` does not know.
    /// The collection is left unchanged.
    pub fn create_relationship<L: EntityLookup + ?Sized>(
        &mut self,
        entities: &L,
        source_id: &str,
        target_id: &str,
        source_cardinality: impl Into<String>,
        target_cardinality: impl Into<String>,
        name: impl Into<String>,
    ) -> DiagramResult<&Relationship> {
        for endpoint in [source_id, target_id] {
            if !entities.contains_entity(endpoint) {
                tracing::warn!("create_relationship: unknown entity {}", endpoint);
                return Err(DiagramError::unknown_entity(endpoint));
            }
        }

        let mut relationship = Relationship::new(
            source_id,
            target_id,
            source_cardinality,
            target_cardinality,
            name,
        );
        while self.contains(&relationship.id) {
            relationship.id = new_id();
        }
        tracing::debug!(
            "Created relationship '{}' {} -> {} ({})",
            relationship.name,
            source_id,
            target_id,
            relationship.id
        );
        self.relationships.push(relationship);
        Ok(&self.relationships[self.relationships.len() - 1])
    }

    /// Replace cardinalities and name in place. Unknown ids are ignored.
    pub fn update_relationship(
        &mut self,
        relationship_id: &str,
        source_cardinality: impl Into<String>,
        target_cardinality: impl Into<String>,
        name: impl Into<String>,
    ) {
        match self
            .relationships
            .iter_mut()
            .find(|r| r.id == relationship_id)
        {
            Some(relationship) => {
                relationship.update(source_cardinality, target_cardinality, name);
                tracing::debug!("Updated relationship {}", relationship_id);
            }
            None => tracing::warn!(
                "update_relationship: unknown relationship {}",
                relationship_id
            ),
        }
    }

    /// Remove a relationship if present
    pub fn delete_relationship(&mut self, relationship_id: &str) -> Option<Relationship> {
        let pos = self
            .relationships
            .iter()
            .position(|r| r.id == relationship_id)?;
        tracing::debug!("Deleted relationship {}", relationship_id);
        Some(self.relationships.remove(pos))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Get a relationship by ID
    pub fn get_relationship(&self, relationship_id: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.id == relationship_id)
    }

    /// Check if a relationship with this ID exists
    pub fn contains(&self, relationship_id: &str) -> bool {
        self.relationships.iter().any(|r| r.id == relationship_id)
    }

    /// Relationships with `entity_id` on either side
    pub fn relationships_involving(&self, entity_id: &str) -> Vec<&Relationship> {
        self.relationships
            .iter()
            .filter(|r| r.involves_entity(entity_id))
            .collect()
    }

    /// Relationships with at least one endpoint `entities` does not know
    pub fn dangling<L: EntityLookup + ?Sized>(&self, entities: &L) -> Vec<&Relationship> {
        self.relationships
            .iter()
            .filter(|r| {
                !entities.contains_entity(&r.source_id) || !entities.contains_entity(&r.target_id)
            })
            .collect()
    }

    /// All relationships in creation order
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Get the number of relationships
    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Serialize the whole collection under this store's key, overwriting it
    pub fn save_relationships<S: KeyValueStorage + ?Sized>(
        &self,
        storage: &mut S,
    ) -> DiagramResult<()> {
        let json = encode_relationships(&self.relationships)?;
        storage.set(&self.key, &json)?;
        tracing::info!(
            "Saved {} relationships to '{}'",
            self.relationships.len(),
            self.key
        );
        Ok(())
    }

    /// Replace the collection with the stored one.
    ///
    /// Same contract as [`EntityStore::load_entities`](crate::EntityStore::load_entities).
    pub fn load_relationships<S: KeyValueStorage + ?Sized>(
        &mut self,
        storage: &S,
    ) -> DiagramResult<bool> {
        let Some(json) = storage.get(&self.key)? else {
            tracing::debug!("No stored relationships under '{}'", self.key);
            return Ok(false);
        };
        let relationships = decode_relationships(&self.key, &json).inspect_err(|e| {
            tracing::warn!("Keeping in-memory relationships: {}", e);
        })?;
        tracing::info!(
            "Loaded {} relationships from '{}'",
            relationships.len(),
            self.key
        );
        self.relationships = relationships;
        Ok(true)
    }

    /// Replace the collection wholesale; callers check id uniqueness first
    pub(crate) fn replace_all(&mut self, relationships: Vec<Relationship>) {
        self.relationships = relationships;
    }
}

impl Default for RelationshipStore {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EntityStore, MemoryStorage};
    use pretty_assertions::assert_eq;

    fn setup() -> (EntityStore, RelationshipStore, String, String) {
        let mut entities = EntityStore::new();
        let e1 = entities.create_entity("Client", 100.0, 100.0).id.clone();
        let e2 = entities.create_entity("Commande", 300.0, 100.0).id.clone();
        (entities, RelationshipStore::new(), e1, e2)
    }

    #[test]
    fn test_init_empty() {
        let (entities, mut store, e1, e2) = setup();
        assert!(store.is_empty());
        store
            .create_relationship(&entities, &e1, &e2, "1,1", "0,n", "Commande")
            .unwrap();
        store.init();
        assert!(store.relationships().is_empty());
    }

    #[test]
    fn test_create_relationship() {
        let (entities, mut store, e1, e2) = setup();
        let rel = store
            .create_relationship(&entities, &e1, &e2, "1,1", "0,n", "Commande")
            .unwrap()
            .clone();

        assert_eq!(rel.source_id, e1);
        assert_eq!(rel.target_id, e2);
        assert_eq!(rel.source_cardinality, "1,1");
        assert_eq!(rel.target_cardinality, "0,n");
        assert_eq!(rel.name, "Commande");
        assert_eq!(store.relationships(), &[rel]);
    }

    #[test]
    fn test_create_with_unknown_source() {
        let (entities, mut store, _e1, e2) = setup();
        let err = store
            .create_relationship(&entities, "ghost", &e2, "1,1", "0,n", "Commande")
            .unwrap_err();
        assert!(matches!(err, DiagramError::UnknownEntity(ref id) if id == "ghost"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_create_with_unknown_target() {
        let (entities, mut store, e1, _e2) = setup();
        let err = store
            .create_relationship(&entities, &e1, "ghost", "1,1", "0,n", "")
            .unwrap_err();
        assert!(matches!(err, DiagramError::UnknownEntity(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_cardinalities_not_validated() {
        let (entities, mut store, e1, e2) = setup();
        let rel = store
            .create_relationship(&entities, &e1, &e2, "whatever", "", "")
            .unwrap();
        assert_eq!(rel.source_cardinality, "whatever");
        assert_eq!(rel.target_cardinality, "");
    }

    #[test]
    fn test_update_relationship() {
        let (entities, mut store, e1, e2) = setup();
        let id = store
            .create_relationship(&entities, &e1, &e2, "1,1", "0,n", "Commande")
            .unwrap()
            .id
            .clone();

        store.update_relationship(&id, "0,1", "1,n", "CommandeClient");

        let updated = store.get_relationship(&id).unwrap();
        assert_eq!(updated.id, id);
        assert_eq!(updated.source_cardinality, "0,1");
        assert_eq!(updated.target_cardinality, "1,n");
        assert_eq!(updated.name, "CommandeClient");
        assert_eq!(updated.source_id, e1);
        assert_eq!(updated.target_id, e2);
    }

    #[test]
    fn test_update_unknown_is_noop() {
        let (entities, mut store, e1, e2) = setup();
        store
            .create_relationship(&entities, &e1, &e2, "1,1", "0,n", "Commande")
            .unwrap();
        let before = store.relationships().to_vec();
        store.update_relationship("missing", "0,1", "1,n", "X");
        assert_eq!(store.relationships(), before.as_slice());
    }

    #[test]
    fn test_delete_relationship() {
        let (entities, mut store, e1, e2) = setup();
        let id = store
            .create_relationship(&entities, &e1, &e2, "1,1", "0,n", "Commande")
            .unwrap()
            .id
            .clone();

        assert!(store.delete_relationship(&id).is_some());
        assert!(store.relationships().is_empty());
        assert!(store.delete_relationship(&id).is_none());
    }

    #[test]
    fn test_entity_delete_leaves_dangling() {
        let (mut entities, mut store, e1, e2) = setup();
        store
            .create_relationship(&entities, &e1, &e2, "1,1", "0,n", "Commande")
            .unwrap();
        assert!(store.dangling(&entities).is_empty());

        entities.delete_entity(&e1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.dangling(&entities).len(), 1);
    }

    #[test]
    fn test_relationships_involving() {
        let (mut entities, mut store, e1, e2) = setup();
        let e3 = entities.create_entity("Produit", 500.0, 100.0).id.clone();
        store
            .create_relationship(&entities, &e1, &e2, "1,1", "0,n", "Passe")
            .unwrap();
        store
            .create_relationship(&entities, &e2, &e3, "1,n", "0,n", "Contient")
            .unwrap();

        assert_eq!(store.relationships_involving(&e1).len(), 1);
        assert_eq!(store.relationships_involving(&e2).len(), 2);
        assert_eq!(store.relationships_involving(&e3)[0].name, "Contient");
    }

    #[test]
    fn test_save_writes_records() {
        let (entities, mut store, e1, e2) = setup();
        store
            .create_relationship(&entities, &e1, &e2, "1,1", "0,n", "Commande")
            .unwrap();

        let mut storage = MemoryStorage::new();
        store.save_relationships(&mut storage).unwrap();

        let raw = storage.get("relationships").unwrap().unwrap();
        let saved: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(saved.as_array().unwrap().len(), 1);
        assert_eq!(saved[0]["name"], "Commande");
        assert_eq!(saved[0]["sourceId"], e1.as_str());
    }

    #[test]
    fn test_round_trip() {
        let (entities, mut store, e1, e2) = setup();
        store
            .create_relationship(&entities, &e1, &e2, "1,1", "0,n", "Commande")
            .unwrap();
        store
            .create_relationship(&entities, &e2, &e1, "0,1", "1,n", "")
            .unwrap();
        let original = store.relationships().to_vec();

        let mut storage = MemoryStorage::new();
        store.save_relationships(&mut storage).unwrap();
        store.init();
        assert!(store.load_relationships(&storage).unwrap());

        assert_eq!(store.relationships(), original.as_slice());
        assert_eq!(store.relationships()[0].name, "Commande");
    }

    #[test]
    fn test_load_absent_key_keeps_state() {
        let (entities, mut store, e1, e2) = setup();
        store
            .create_relationship(&entities, &e1, &e2, "1,1", "0,n", "Commande")
            .unwrap();
        let before = store.relationships().to_vec();
        let storage = MemoryStorage::new();

        assert!(!store.load_relationships(&storage).unwrap());
        assert_eq!(store.relationships(), before.as_slice());
    }

    #[test]
    fn test_load_malformed_keeps_state() {
        let (entities, mut store, e1, e2) = setup();
        store
            .create_relationship(&entities, &e1, &e2, "1,1", "0,n", "Commande")
            .unwrap();
        let before = store.relationships().to_vec();

        let mut storage = MemoryStorage::new();
        storage.set("relationships", "[{\"id\": \"r1\"}]").unwrap();

        assert!(store.load_relationships(&storage).unwrap_err().is_deserialization());
        assert_eq!(store.relationships(), before.as_slice());
    }

    #[test]
    fn test_keys_independent() {
        let (entities, mut store, e1, e2) = setup();
        store
            .create_relationship(&entities, &e1, &e2, "1,1", "0,n", "Commande")
            .unwrap();

        let mut storage = MemoryStorage::new();
        store.save_relationships(&mut storage).unwrap();
        assert!(storage.get("entities").unwrap().is_none());

        entities.save_entities(&mut storage).unwrap();
        assert_eq!(storage.len(), 2);
    }
}
