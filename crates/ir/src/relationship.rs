//! Relationship definitions between entities
//!
//! A `Relationship` references two entities by id and carries one
//! cardinality string per side. Cardinalities are stored verbatim; use
//! [`Relationship::parsed_cardinalities`] to interpret them.

use erd_core::{Cardinality, EntityId, ParseCardinalityError, RelationshipId, new_id};
use serde::{Deserialize, Serialize};

// ============================================================================
// Relationship
// ============================================================================

/// A named association between two entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    /// Unique identifier for this relationship
    pub id: RelationshipId,

    /// ID of the source entity
    pub source_id: EntityId,

    /// ID of the target entity
    pub target_id: EntityId,

    /// Cardinality on the source side, e.g. `1,1`
    pub source_cardinality: String,

    /// Cardinality on the target side, e.g. `0,n`
    pub target_cardinality: String,

    /// Relationship label, may be empty
    #[serde(default)]
    pub name: String,
}

impl Relationship {
    /// Create a new relationship with a fresh id
    pub fn new(
        source_id: impl Into<EntityId>,
        target_id: impl Into<EntityId>,
        source_cardinality: impl Into<String>,
        target_cardinality: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            source_cardinality: source_cardinality.into(),
            target_cardinality: target_cardinality.into(),
            name: name.into(),
        }
    }

    /// Replace the mutable fields in place
    pub fn update(
        &mut self,
        source_cardinality: impl Into<String>,
        target_cardinality: impl Into<String>,
        name: impl Into<String>,
    ) {
        self.source_cardinality = source_cardinality.into();
        self.target_cardinality = target_cardinality.into();
        self.name = name.into();
    }

    // ========================================================================
    // Query methods
    // ========================================================================

    /// Check if a given entity is part of this relationship
    pub fn involves_entity(&self, entity_id: &str) -> bool {
        self.source_id == entity_id || self.target_id == entity_id
    }

    /// Get the other entity in the relationship
    pub fn other_entity(&self, entity_id: &str) -> Option<&str> {
        if self.source_id == entity_id {
            Some(self.target_id.as_str())
        } else if self.target_id == entity_id {
            Some(self.source_id.as_str())
        } else {
            None
        }
    }

    /// Check if both ends point to the same entity
    pub fn is_reflexive(&self) -> bool {
        self.source_id == self.target_id
    }

    /// Interpret both cardinality strings
    pub fn parsed_cardinalities(
        &self,
    ) -> Result<(Cardinality, Cardinality), ParseCardinalityError> {
        Ok((
            self.source_cardinality.parse()?,
            self.target_cardinality.parse()?,
        ))
    }

    /// Get display label for the relationship
    pub fn display_label(&self) -> String {
        if self.name.is_empty() {
            format!("({}) - ({})", self.source_cardinality, self.target_cardinality)
        } else {
            self.name.clone()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
