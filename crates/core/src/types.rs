//! Core types used throughout ERD Studio
//!
//! This module contains identifiers, geometry, cardinalities and the storage
//! key configuration shared by the diagram model and its front ends.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Unique Identifiers
// ============================================================================

/// Type alias for entity identifiers
pub type EntityId = String;

/// Type alias for attribute identifiers (unique within the owning entity)
pub type AttributeId = String;

/// Type alias for relationship identifiers
pub type RelationshipId = String;

/// Generate a fresh opaque identifier.
///
/// Identifiers are random v4 UUIDs rendered as strings. Stored identifiers
/// are never parsed back, so any string loaded from storage is accepted.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// ============================================================================
// Geometry Types
// ============================================================================

/// Position on the 2D canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Create a new position
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Create a position at the origin (0, 0)
    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Add an offset to this position
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::zero()
    }
}

// ============================================================================
// Cardinality
// ============================================================================

/// Participation constraint for one side of a relationship.
///
/// Relationships store cardinalities as raw strings; this type only exists
/// to check and describe them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinality {
    /// `0,1`
    ZeroOne,
    /// `1,1`
    OneOne,
    /// `0,n`
    ZeroMany,
    /// `1,n`
    OneMany,
}

impl Cardinality {
    /// The canonical `"<min>,<max>"` notation
    pub fn as_str(&self) -> &'static str {
        match self {
            Cardinality::ZeroOne => "0,1",
            Cardinality::OneOne => "1,1",
            Cardinality::ZeroMany => "0,n",
            Cardinality::OneMany => "1,n",
        }
    }

    /// Minimum participation (0 or 1)
    pub fn min(&self) -> u8 {
        match self {
            Cardinality::ZeroOne | Cardinality::ZeroMany => 0,
            Cardinality::OneOne | Cardinality::OneMany => 1,
        }
    }

    /// Whether the maximum participation is unbounded (`n`)
    pub fn is_many(&self) -> bool {
        matches!(self, Cardinality::ZeroMany | Cardinality::OneMany)
    }

    /// Whether participation is mandatory (min = 1)
    pub fn is_mandatory(&self) -> bool {
        self.min() == 1
    }

    /// All cardinalities in display order
    pub fn all() -> &'static [Cardinality] {
        &[
            Cardinality::ZeroOne,
            Cardinality::OneOne,
            Cardinality::ZeroMany,
            Cardinality::OneMany,
        ]
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the four cardinalities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCardinalityError(pub String);

impl fmt::Display for ParseCardinalityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid cardinality '{}', expected one of 0,1 1,1 0,n 1,n",
            self.0
        )
    }
}

impl std::error::Error for ParseCardinalityError {}

impl FromStr for Cardinality {
    type Err = ParseCardinalityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        match normalized.to_ascii_lowercase().as_str() {
            "0,1" => Ok(Cardinality::ZeroOne),
            "1,1" => Ok(Cardinality::OneOne),
            "0,n" => Ok(Cardinality::ZeroMany),
            "1,n" => Ok(Cardinality::OneMany),
            _ => Err(ParseCardinalityError(s.to_string())),
        }
    }
}

// ============================================================================
// Storage Keys
// ============================================================================

/// Default storage key for the entity collection
pub const DEFAULT_ENTITIES_KEY: &str = "entities";

/// Default storage key for the relationship collection
pub const DEFAULT_RELATIONSHIPS_KEY: &str = "relationships";

/// Names of the two keys the stores persist under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageKeys {
    pub entities: String,
    pub relationships: String,
}

impl StorageKeys {
    /// Create a key set with custom names
    pub fn new(entities: impl Into<String>, relationships: impl Into<String>) -> Self {
        Self {
            entities: entities.into(),
            relationships: relationships.into(),
        }
    }

    /// Prefix both keys with a namespace (`<ns>.entities`, `<ns>.relationships`)
    pub fn namespaced(namespace: &str) -> Self {
        Self::new(
            format!("{}.{}", namespace, DEFAULT_ENTITIES_KEY),
            format!("{}.{}", namespace, DEFAULT_RELATIONSHIPS_KEY),
        )
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::new(DEFAULT_ENTITIES_KEY, DEFAULT_RELATIONSHIPS_KEY)
    }
}

// ============================================================================
// Tests
// ============================================================================
