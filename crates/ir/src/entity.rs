//! Entity definitions for diagrams
//!
//! This module contains the `Entity` struct and its owned `Attribute`
//! records. The serde layout is the persisted record shape:
//! `{id, name, x, y, attributes: [{id, name, type, isPrimary}]}`.

use erd_core::{AttributeId, EntityId, Position, new_id};
use serde::{Deserialize, Serialize};

// ============================================================================
// Entity
// ============================================================================

/// A named box in the diagram, owning an ordered list of attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier, generated at creation and never changed
    pub id: EntityId,

    /// Display label
    pub name: String,

    /// Position on the canvas, persisted as top-level `x` / `y`
    #[serde(flatten)]
    pub position: Position,

    /// Attributes in insertion order
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl Entity {
    /// Create a new entity with a fresh id and no attributes
    pub fn new(name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            position: Position::new(x, y),
            attributes: Vec::new(),
        }
    }

    // ========================================================================
    // Attribute management
    // ========================================================================

    /// Append a new attribute and return it
    pub fn add_attribute(
        &mut self,
        name: impl Into<String>,
        data_type: impl Into<String>,
        is_primary: bool,
    ) -> &Attribute {
        let mut attribute = Attribute::new(name, data_type, is_primary);
        // ids only need to be unique within this entity
        while self.has_attribute(&attribute.id) {
            attribute.id = new_id();
        }
        self.attributes.push(attribute);
        &self.attributes[self.attributes.len() - 1]
    }

    /// Remove an attribute by ID, keeping the order of the others
    pub fn remove_attribute(&mut self, attribute_id: &str) -> Option<Attribute> {
        let pos = self.attributes.iter().position(|a| a.id == attribute_id)?;
        Some(self.attributes.remove(pos))
    }

    /// Get an attribute by ID
    pub fn get_attribute(&self, attribute_id: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.id == attribute_id)
    }

    /// Get an attribute by name
    pub fn get_attribute_by_name(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Check if an attribute with this ID exists
    pub fn has_attribute(&self, attribute_id: &str) -> bool {
        self.attributes.iter().any(|a| a.id == attribute_id)
    }

    /// All attributes flagged as primary
    pub fn primary_attributes(&self) -> Vec<&Attribute> {
        self.attributes.iter().filter(|a| a.is_primary).collect()
    }

    /// The first attribute, conventionally the primary key candidate
    pub fn primary_candidate(&self) -> Option<&Attribute> {
        self.attributes.first()
    }

    /// Get the number of attributes
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Set the position
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.position = Position::new(x, y);
    }

    /// Move the entity by a delta
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.position = self.position.offset(dx, dy);
    }

    /// Change the display label
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Horizontal position
    pub fn x(&self) -> f64 {
        self.position.x
    }

    /// Vertical position
    pub fn y(&self) -> f64 {
        self.position.y
    }
}

// ============================================================================
// Attribute
// ============================================================================

/// A named, typed field belonging to exactly one entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    /// Identifier, unique within the owning entity
    pub id: AttributeId,

    /// Attribute name
    pub name: String,

    /// Free-form type tag such as `int` or `varchar`
    #[serde(rename = "type")]
    pub data_type: String,

    /// Primary key candidate flag
    #[serde(default)]
    pub is_primary: bool,
}

impl Attribute {
    /// Create a new attribute with a fresh id
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, is_primary: bool) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            data_type: data_type.into(),
            is_primary,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
