//! Core traits for ERD Studio
//!
//! This module defines the capabilities the diagram stores depend on:
//! a durable key-value surface, a read-only entity lookup, and a
//! validation hook.

use crate::error::DiagramResult;

// ============================================================================
// KeyValueStorage Trait
// ============================================================================

/// Synchronous key-value persistence surface.
///
/// Each `set` fully overwrites the value under `key`; a `get` on an unknown
/// key returns `Ok(None)` rather than an error.
///
/// # Example
///
/// ```rust,ignore
/// use erd_core::{KeyValueStorage, DiagramResult};
/// use std::collections::HashMap;
///
/// struct Scratch(HashMap<String, String>);
///
/// impl KeyValueStorage for Scratch {
///     fn get(&self, key: &str) -> DiagramResult<Option<String>> {
///         Ok(self.0.get(key).cloned())
///     }
///     fn set(&mut self, key: &str, value: &str) -> DiagramResult<()> {
///         self.0.insert(key.to_string(), value.to_string());
///         Ok(())
///     }
///     fn remove(&mut self, key: &str) -> DiagramResult<()> {
///         self.0.remove(key);
///         Ok(())
///     }
/// }
/// ```
pub trait KeyValueStorage {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> DiagramResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> DiagramResult<()>;

    /// Remove `key` (no-op if absent)
    fn remove(&mut self, key: &str) -> DiagramResult<()>;

    /// Check whether a value is stored under `key`
    fn contains(&self, key: &str) -> DiagramResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for &mut S {
    fn get(&self, key: &str) -> DiagramResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> DiagramResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> DiagramResult<()> {
        (**self).remove(key)
    }
}

// ============================================================================
// EntityLookup Trait
// ============================================================================

/// Read-only "does this entity currently exist" capability.
///
/// Relationship logic receives this instead of the entity store itself so it
/// cannot mutate entities.
pub trait EntityLookup {
    /// Check whether an entity with this id is currently known
    fn contains_entity(&self, id: &str) -> bool;
}

// ============================================================================
// Tests
// ============================================================================
