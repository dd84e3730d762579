//! Serialization and deserialization for diagram records
//!
//! The stores persist each collection as a JSON array of flat records under
//! its own storage key. This module also provides a single-file snapshot
//! format carrying both collections with a schema version, used for export
//! and import.

use crate::{Entity, Relationship, SCHEMA_VERSION};
use erd_core::{DiagramError, DiagramResult};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::collections::HashSet;
use std::path::Path;

// ============================================================================
// Record Collections
// ============================================================================

/// Serialize a record collection to a compact JSON array
pub fn encode_records<T: Serialize>(records: &[T]) -> DiagramResult<String> {
    Ok(serde_json::to_string(records)?)
}

/// Parse a JSON array of records stored under `key`
pub fn decode_records<T: DeserializeOwned>(key: &str, json: &str) -> DiagramResult<Vec<T>> {
    serde_json::from_str(json).map_err(|e| DiagramError::deserialization(key, e.to_string()))
}

/// Serialize an entity collection
///
/// Fails with `Validation` when a position is NaN or infinite, since JSON
/// would store it as `null` and the collection could not be read back.
pub fn encode_entities(entities: &[Entity]) -> DiagramResult<String> {
    check_positions(entities)?;
    encode_records(entities)
}

/// Parse an entity collection, rejecting duplicate entity or attribute ids
pub fn decode_entities(key: &str, json: &str) -> DiagramResult<Vec<Entity>> {
    let entities: Vec<Entity> = decode_records(key, json)?;
    check_entity_ids(key, &entities)?;
    Ok(entities)
}

/// Serialize a relationship collection
pub fn encode_relationships(relationships: &[Relationship]) -> DiagramResult<String> {
    encode_records(relationships)
}

/// Parse a relationship collection, rejecting duplicate ids
pub fn decode_relationships(key: &str, json: &str) -> DiagramResult<Vec<Relationship>> {
    let relationships: Vec<Relationship> = decode_records(key, json)?;
    check_unique(key, "relationship", relationships.iter().map(|r| r.id.as_str()))?;
    Ok(relationships)
}

fn check_positions(entities: &[Entity]) -> DiagramResult<()> {
    match entities
        .iter()
        .find(|e| !e.x().is_finite() || !e.y().is_finite())
    {
        Some(entity) => Err(DiagramError::validation(format!(
            "entity '{}' ({}) has a non-finite position ({}, {})",
            entity.name,
            entity.id,
            entity.x(),
            entity.y()
        ))),
        None => Ok(()),
    }
}

fn check_entity_ids(key: &str, entities: &[Entity]) -> DiagramResult<()> {
    check_unique(key, "entity", entities.iter().map(|e| e.id.as_str()))?;
    for entity in entities {
        check_unique(
            key,
            "attribute",
            entity.attributes.iter().map(|a| a.id.as_str()),
        )?;
    }
    Ok(())
}

fn check_unique<'a>(
    key: &str,
    kind: &str,
    ids: impl Iterator<Item = &'a str>,
) -> DiagramResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(DiagramError::deserialization(
                key,
                format!("duplicate {} id '{}'", kind, id),
            ));
        }
    }
    Ok(())
}

// ============================================================================
// Snapshot File
// ============================================================================

/// Both collections in one document, with version information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramFile {
    /// Schema version for migration purposes
    pub schema_version: u32,

    #[serde(default)]
    pub entities: Vec<Entity>,

    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl DiagramFile {
    /// Create a snapshot from the two collections
    pub fn new(entities: Vec<Entity>, relationships: Vec<Relationship>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            entities,
            relationships,
        }
    }

    /// Check if migration is needed
    pub fn needs_migration(&self) -> bool {
        self.schema_version < SCHEMA_VERSION
    }

    /// Reject duplicate entity, attribute (per entity) or relationship ids
    pub fn check_ids(&self) -> DiagramResult<()> {
        check_entity_ids("snapshot", &self.entities)?;
        check_unique(
            "snapshot",
            "relationship",
            self.relationships.iter().map(|r| r.id.as_str()),
        )
    }
}

/// Serialize a snapshot to pretty JSON
pub fn save_diagram_to_string(file: &DiagramFile) -> DiagramResult<String> {
    check_positions(&file.entities)?;
    Ok(serde_json::to_string_pretty(file)?)
}

/// Parse a snapshot from JSON
pub fn load_diagram_from_string(json: &str) -> DiagramResult<DiagramFile> {
    let mut file: DiagramFile = decode_snapshot(json)?;
    if file.schema_version > SCHEMA_VERSION {
        return Err(DiagramError::deserialization(
            "snapshot",
            format!(
                "schema version {} is newer than supported version {}",
                file.schema_version, SCHEMA_VERSION
            ),
        ));
    }
    if file.needs_migration() {
        file.schema_version = SCHEMA_VERSION;
    }
    file.check_ids()?;
    Ok(file)
}

fn decode_snapshot(json: &str) -> DiagramResult<DiagramFile> {
    serde_json::from_str(json).map_err(|e| DiagramError::deserialization("snapshot", e.to_string()))
}

/// Save a snapshot to a file
///
/// # Example
///
/// ```rust,ignore
/// use erd_ir::serialization::{DiagramFile, save_diagram};
///
/// let file = DiagramFile::new(Vec::new(), Vec::new());
/// save_diagram(&file, "shop.erd.json").unwrap();
/// ```
pub fn save_diagram(file: &DiagramFile, path: impl AsRef<Path>) -> DiagramResult<()> {
    let path = path.as_ref();
    let json = save_diagram_to_string(file)?;

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| DiagramError::DirectoryCreate {
                path: parent.to_path_buf(),
                message: e.to_string(),
            })?;
        }
    }

    std::fs::write(path, json).map_err(|e| DiagramError::StorageWrite {
        key: path.display().to_string(),
        message: e.to_string(),
    })?;

    Ok(())
}

/// Load a snapshot from a file
pub fn load_diagram(path: impl AsRef<Path>) -> DiagramResult<DiagramFile> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|e| DiagramError::StorageRead {
        key: path.display().to_string(),
        message: e.to_string(),
    })?;
    load_diagram_from_string(&json)
}

// ============================================================================
// Tests
// ============================================================================
