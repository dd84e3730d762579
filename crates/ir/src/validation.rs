//! Consistency reporting for diagrams
//!
//! The stores are permissive: they accept any cardinality string, any number
//! of primary attributes, and keep relationships whose endpoints were deleted.
//! Rules in this module report those situations without changing the model.

use crate::{EntityStore, RelationshipStore};
use erd_core::{Cardinality, DiagramError, DiagramResult, EntityLookup};
use std::collections::HashSet;

// ============================================================================
// ValidationResult
// ============================================================================

/// Result of a validation operation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether the validation passed
    pub valid: bool,

    /// List of errors (empty if valid)
    pub errors: Vec<ValidationIssue>,

    /// List of warnings (non-fatal issues)
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Create a successful validation result
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, error: ValidationIssue) {
        self.valid = false;
        self.errors.push(error);
    }

    /// Add a warning to the result
    pub fn add_warning(&mut self, warning: ValidationIssue) {
        self.warnings.push(warning);
    }

    /// Merge another validation result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        if !other.valid {
            self.valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check whether any error or warning carries this code
    pub fn has_code(&self, code: IssueCode) -> bool {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .any(|i| i.code == code)
    }

    /// Convert to DiagramResult (fails if any errors)
    pub fn to_result(self) -> DiagramResult<()> {
        if self.valid {
            Ok(())
        } else {
            let msg = self
                .errors
                .iter()
                .map(|e| e.message.clone())
                .collect::<Vec<_>>()
                .join("; ");
            Err(DiagramError::validation(msg))
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

// ============================================================================
// ValidationIssue
// ============================================================================

/// A single finding, either an error or a warning
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Code for programmatic handling
    pub code: IssueCode,

    /// Human-readable message
    pub message: String,

    /// Path to the problematic element (e.g., "entities.Client.attributes.id")
    pub path: Option<String>,
}

impl ValidationIssue {
    /// Create a new issue
    pub fn new(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Add a path to the issue
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "[{}] {}", path, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

/// Issue codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueCode {
    // Entity issues
    EmptyEntityName,
    DuplicateEntityName,
    NoPrimaryAttribute,
    MultiplePrimaryAttributes,

    // Attribute issues
    EmptyAttributeName,

    // Relationship issues
    DanglingRelationship,
    InvalidCardinality,
}

// ============================================================================
// ValidationRule Trait
// ============================================================================

/// Borrowed view of both stores handed to each rule
#[derive(Clone, Copy)]
pub struct DiagramView<'a> {
    pub entities: &'a EntityStore,
    pub relationships: &'a RelationshipStore,
}

/// Trait for validation rules
pub trait ValidationRule {
    /// Get the rule name
    fn name(&self) -> &'static str;

    /// Get the rule description
    fn description(&self) -> &'static str;

    /// Check the diagram and return the findings
    fn validate(&self, diagram: DiagramView<'_>) -> ValidationResult;
}

// ============================================================================
// DiagramValidator
// ============================================================================

/// Validator that runs multiple rules over a diagram
#[derive(Default)]
pub struct DiagramValidator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl DiagramValidator {
    /// Create a validator without rules
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create a validator with the built-in rules
    pub fn with_default_rules() -> Self {
        let mut validator = Self::new();
        validator.add_rule(Box::new(EntityNamesRule));
        validator.add_rule(Box::new(PrimaryAttributesRule));
        validator.add_rule(Box::new(RelationshipEndpointsRule));
        validator.add_rule(Box::new(CardinalitiesRule));
        validator
    }

    /// Add a validation rule
    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    /// Names of the registered rules
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run every rule
    pub fn validate(
        &self,
        entities: &EntityStore,
        relationships: &RelationshipStore,
    ) -> ValidationResult {
        let view = DiagramView {
            entities,
            relationships,
        };
        let mut result = ValidationResult::ok();
        for rule in &self.rules {
            result.merge(rule.validate(view));
        }
        result
    }
}

// ============================================================================
// Built-in Validation Rules
// ============================================================================

/// Rule: entity and attribute names are present and entity names distinct
pub struct EntityNamesRule;

impl ValidationRule for EntityNamesRule {
    fn name(&self) -> &'static str {
        "entity_names"
    }

    fn description(&self) -> &'static str {
        "Warns about empty entity or attribute names and duplicate entity names"
    }

    fn validate(&self, diagram: DiagramView<'_>) -> ValidationResult {
        let mut result = ValidationResult::ok();
        let mut seen_names: HashSet<String> = HashSet::new();

        for entity in diagram.entities.entities() {
            if entity.name.trim().is_empty() {
                result.add_warning(
                    ValidationIssue::new(IssueCode::EmptyEntityName, "Entity name is empty")
                        .with_path(format!("entities.{}", entity.id)),
                );
            } else if !seen_names.insert(entity.name.to_lowercase()) {
                result.add_warning(
                    ValidationIssue::new(
                        IssueCode::DuplicateEntityName,
                        format!("Duplicate entity name: '{}'", entity.name),
                    )
                    .with_path(format!("entities.{}", entity.name)),
                );
            }

            for attribute in &entity.attributes {
                if attribute.name.trim().is_empty() {
                    result.add_warning(
                        ValidationIssue::new(
                            IssueCode::EmptyAttributeName,
                            format!("Entity '{}' has an attribute without a name", entity.name),
                        )
                        .with_path(format!(
                            "entities.{}.attributes.{}",
                            entity.name, attribute.id
                        )),
                    );
                }
            }
        }

        result
    }
}

/// Rule: each entity has exactly one primary attribute
pub struct PrimaryAttributesRule;

impl ValidationRule for PrimaryAttributesRule {
    fn name(&self) -> &'static str {
        "primary_attributes"
    }

    fn description(&self) -> &'static str {
        "Warns when an entity has no primary attribute or several"
    }

    fn validate(&self, diagram: DiagramView<'_>) -> ValidationResult {
        let mut result = ValidationResult::ok();

        for entity in diagram.entities.entities() {
            let path = format!("entities.{}", entity.name);
            match entity.primary_attributes().len() {
                0 => result.add_warning(
                    ValidationIssue::new(
                        IssueCode::NoPrimaryAttribute,
                        format!("Entity '{}' has no primary attribute", entity.name),
                    )
                    .with_path(path),
                ),
                1 => {}
                n => result.add_warning(
                    ValidationIssue::new(
                        IssueCode::MultiplePrimaryAttributes,
                        format!("Entity '{}' has {} primary attributes", entity.name, n),
                    )
                    .with_path(path),
                ),
            }
        }

        result
    }
}

/// Rule: relationship endpoints still exist
pub struct RelationshipEndpointsRule;

impl ValidationRule for RelationshipEndpointsRule {
    fn name(&self) -> &'static str {
        "relationship_endpoints"
    }

    fn description(&self) -> &'static str {
        "Reports relationships that reference deleted entities"
    }

    fn validate(&self, diagram: DiagramView<'_>) -> ValidationResult {
        let mut result = ValidationResult::ok();

        for rel in diagram.relationships.relationships() {
            for (side, id) in [("source", &rel.source_id), ("target", &rel.target_id)] {
                if !diagram.entities.contains_entity(id) {
                    result.add_error(
                        ValidationIssue::new(
                            IssueCode::DanglingRelationship,
                            format!(
                                "Relationship '{}' {} references unknown entity {}",
                                rel.display_label(),
                                side,
                                id
                            ),
                        )
                        .with_path(format!("relationships.{}", rel.id)),
                    );
                }
            }
        }

        result
    }
}

/// Rule: cardinalities are one of `0,1` `1,1` `0,n` `1,n`
pub struct CardinalitiesRule;

impl ValidationRule for CardinalitiesRule {
    fn name(&self) -> &'static str {
        "cardinalities"
    }

    fn description(&self) -> &'static str {
        "Reports cardinality strings outside the 0,1 / 1,1 / 0,n / 1,n domain"
    }

    fn validate(&self, diagram: DiagramView<'_>) -> ValidationResult {
        let mut result = ValidationResult::ok();

        for rel in diagram.relationships.relationships() {
            for (side, value) in [
                ("source", &rel.source_cardinality),
                ("target", &rel.target_cardinality),
            ] {
                if let Err(e) = value.parse::<Cardinality>() {
                    result.add_error(
                        ValidationIssue::new(
                            IssueCode::InvalidCardinality,
                            format!("Relationship '{}' {}: {}", rel.display_label(), side, e),
                        )
                        .with_path(format!("relationships.{}", rel.id)),
                    );
                }
            }
        }

        result
    }
}

// ============================================================================
// Tests
// ============================================================================
