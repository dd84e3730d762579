//! Command definitions and execution
//!
//! Every mutating command opens the diagram from storage, applies one
//! operation, and saves both keys back.

use crate::config::CliConfig;
use crate::output;
use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use erd_ir::serialization::{load_diagram, save_diagram};
use erd_ir::{Diagram, FileStorage};
use std::path::PathBuf;

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create empty entity and relationship collections in the storage directory
    Init,
    /// Entity operations
    #[command(subcommand)]
    Entity(EntityCommand),
    /// Attribute operations
    #[command(subcommand)]
    Attribute(AttributeCommand),
    /// Relationship operations
    #[command(subcommand)]
    Relationship(RelationshipCommand),
    /// List entities and relationships
    List(ListArgs),
    /// Report consistency problems (exits non-zero on errors)
    Validate,
    /// Write both collections to one snapshot file
    Export(PathArgs),
    /// Replace both collections with a snapshot file's contents
    Import(PathArgs),
}

#[derive(Debug, Subcommand)]
pub enum EntityCommand {
    /// Create an entity
    #[command(allow_negative_numbers = true)]
    Add {
        name: String,
        #[arg(long, default_value_t = 0.0, value_parser = parse_coordinate)]
        x: f64,
        #[arg(long, default_value_t = 0.0, value_parser = parse_coordinate)]
        y: f64,
    },
    /// Move an entity
    #[command(allow_negative_numbers = true)]
    Move {
        entity: String,
        #[arg(value_parser = parse_coordinate)]
        x: f64,
        #[arg(value_parser = parse_coordinate)]
        y: f64,
    },
    /// Rename an entity
    Rename { entity: String, name: String },
    /// Delete an entity (relationships referencing it are kept)
    Delete { entity: String },
}

#[derive(Debug, Subcommand)]
pub enum AttributeCommand {
    /// Append an attribute to an entity
    Add {
        entity: String,
        name: String,
        #[arg(value_name = "TYPE")]
        data_type: String,
        /// Flag the attribute as primary key candidate
        #[arg(long)]
        primary: bool,
    },
    /// Remove an attribute by id or name
    Remove { entity: String, attribute: String },
}

#[derive(Debug, Subcommand)]
pub enum RelationshipCommand {
    /// Create a relationship between two entities
    Add {
        source: String,
        target: String,
        #[arg(long = "source-card", default_value = "1,1")]
        source_cardinality: String,
        #[arg(long = "target-card", default_value = "0,n")]
        target_cardinality: String,
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Replace a relationship's cardinalities and name
    Update {
        id: String,
        source_cardinality: String,
        target_cardinality: String,
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Delete a relationship
    Delete { id: String },
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Print the snapshot JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct PathArgs {
    pub path: PathBuf,
}

type CliDiagram = Diagram<FileStorage>;

/// Parse a canvas coordinate; NaN and infinities cannot be stored
fn parse_coordinate(value: &str) -> std::result::Result<f64, String> {
    let parsed: f64 = value
        .parse()
        .map_err(|e| format!("invalid coordinate '{}': {}", value, e))?;
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(format!("coordinate must be a finite number, got '{}'", value))
    }
}

fn open(config: &CliConfig) -> Result<CliDiagram> {
    let storage = FileStorage::open(&config.storage_dir).with_context(|| {
        format!(
            "Failed to open storage directory {}",
            config.storage_dir.display()
        )
    })?;
    Diagram::open(storage, &config.keys).context("Failed to load diagram")
}

fn save(diagram: &mut CliDiagram) -> Result<()> {
    diagram.save().context("Failed to save diagram")
}

/// Resolve an entity reference given as id or exact name
fn resolve_entity(diagram: &CliDiagram, reference: &str) -> Option<String> {
    let entities = diagram.entities();
    entities
        .get_entity(reference)
        .or_else(|| entities.get_entity_by_name(reference))
        .map(|e| e.id.clone())
}

fn require_entity(diagram: &CliDiagram, reference: &str) -> Result<String> {
    match resolve_entity(diagram, reference) {
        Some(id) => Ok(id),
        None => bail!("Entity not found: {}", reference),
    }
}

/// Execute a command against the configured storage
pub fn execute(command: Commands, config: &CliConfig) -> Result<()> {
    match command {
        Commands::Init => {
            let mut diagram = open(config)?;
            save(&mut diagram)?;
            output::success(format!(
                "Initialized storage in {}",
                config.storage_dir.display()
            ));
            Ok(())
        }
        Commands::Entity(cmd) => execute_entity(cmd, config),
        Commands::Attribute(cmd) => execute_attribute(cmd, config),
        Commands::Relationship(cmd) => execute_relationship(cmd, config),
        Commands::List(args) => {
            let diagram = open(config)?;
            if args.json {
                let json = erd_ir::serialization::save_diagram_to_string(&diagram.snapshot())?;
                println!("{}", json);
            } else {
                print!(
                    "{}",
                    output::render_listing(
                        diagram.entities(),
                        diagram.relationships().relationships()
                    )
                );
            }
            Ok(())
        }
        Commands::Validate => {
            let diagram = open(config)?;
            let result = diagram.validate();
            print!("{}", output::render_validation(&result));
            if result.has_errors() {
                bail!("Diagram has {} error(s)", result.errors.len());
            }
            Ok(())
        }
        Commands::Export(args) => {
            let diagram = open(config)?;
            save_diagram(&diagram.snapshot(), &args.path)
                .with_context(|| format!("Failed to export to {}", args.path.display()))?;
            output::success(format!("Exported diagram to {}", args.path.display()));
            Ok(())
        }
        Commands::Import(args) => {
            let file = load_diagram(&args.path)
                .with_context(|| format!("Failed to import {}", args.path.display()))?;
            let mut diagram = open(config)?;
            diagram.restore(file)?;
            save(&mut diagram)?;
            output::success(format!(
                "Imported {} entities and {} relationships",
                diagram.entities().len(),
                diagram.relationships().len()
            ));
            Ok(())
        }
    }
}

fn execute_entity(cmd: EntityCommand, config: &CliConfig) -> Result<()> {
    let mut diagram = open(config)?;
    match cmd {
        EntityCommand::Add { name, x, y } => {
            let entity = diagram.entities_mut().create_entity(name, x, y);
            output::success(format!("Created entity '{}' {}", entity.name, entity.id));
        }
        EntityCommand::Move { entity, x, y } => match resolve_entity(&diagram, &entity) {
            Some(id) => {
                diagram.entities_mut().move_entity(&id, x, y);
                output::success(format!("Moved '{}' to ({}, {})", entity, x, y));
            }
            None => output::note(format!("No entity '{}', nothing moved", entity)),
        },
        EntityCommand::Rename { entity, name } => match resolve_entity(&diagram, &entity) {
            Some(id) => {
                diagram.entities_mut().rename_entity(&id, name.clone());
                output::success(format!("Renamed '{}' to '{}'", entity, name));
            }
            None => output::note(format!("No entity '{}', nothing renamed", entity)),
        },
        EntityCommand::Delete { entity } => {
            let removed = resolve_entity(&diagram, &entity)
                .and_then(|id| diagram.entities_mut().delete_entity(&id));
            match removed {
                Some(removed) => {
                    let dangling = diagram.relationships().relationships_involving(&removed.id);
                    output::success(format!("Deleted entity '{}'", removed.name));
                    if !dangling.is_empty() {
                        output::note(format!(
                            "{} relationship(s) still reference it",
                            dangling.len()
                        ));
                    }
                }
                None => output::note(format!("No entity '{}', nothing deleted", entity)),
            }
        }
    }
    save(&mut diagram)
}

fn execute_attribute(cmd: AttributeCommand, config: &CliConfig) -> Result<()> {
    let mut diagram = open(config)?;
    match cmd {
        AttributeCommand::Add {
            entity,
            name,
            data_type,
            primary,
        } => {
            let id = require_entity(&diagram, &entity)?;
            let attribute = diagram
                .entities_mut()
                .add_attribute(&id, name, data_type, primary)?;
            output::success(format!(
                "Added attribute '{}' to '{}' {}",
                attribute.name, entity, attribute.id
            ));
        }
        AttributeCommand::Remove { entity, attribute } => {
            let id = require_entity(&diagram, &entity)?;
            let attribute_id = diagram
                .entities()
                .get_entity(&id)
                .and_then(|e| {
                    e.get_attribute(&attribute)
                        .or_else(|| e.get_attribute_by_name(&attribute))
                })
                .map(|a| a.id.clone())
                .unwrap_or(attribute);
            let removed = diagram.entities_mut().remove_attribute(&id, &attribute_id)?;
            output::success(format!(
                "Removed attribute '{}' from '{}'",
                removed.name, entity
            ));
        }
    }
    save(&mut diagram)
}

fn execute_relationship(cmd: RelationshipCommand, config: &CliConfig) -> Result<()> {
    let mut diagram = open(config)?;
    match cmd {
        RelationshipCommand::Add {
            source,
            target,
            source_cardinality,
            target_cardinality,
            name,
        } => {
            // unresolved references are passed through so the store reports them
            let source_id = resolve_entity(&diagram, &source).unwrap_or(source);
            let target_id = resolve_entity(&diagram, &target).unwrap_or(target);
            let rel = diagram.create_relationship(
                &source_id,
                &target_id,
                source_cardinality,
                target_cardinality,
                name,
            )?;
            output::success(format!(
                "Created relationship '{}' {}",
                rel.display_label(),
                rel.id
            ));
        }
        RelationshipCommand::Update {
            id,
            source_cardinality,
            target_cardinality,
            name,
        } => {
            if diagram.relationships().contains(&id) {
                diagram.relationships_mut().update_relationship(
                    &id,
                    source_cardinality,
                    target_cardinality,
                    name,
                );
                output::success(format!("Updated relationship {}", id));
            } else {
                output::note(format!("No relationship {}, nothing updated", id));
            }
        }
        RelationshipCommand::Delete { id } => {
            match diagram.relationships_mut().delete_relationship(&id) {
                Some(rel) => output::success(format!(
                    "Deleted relationship '{}'",
                    rel.display_label()
                )),
                None => output::note(format!("No relationship {}, nothing deleted", id)),
            }
        }
    }
    save(&mut diagram)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(parse_coordinate("-20.5"), Ok(-20.5));
        assert_eq!(parse_coordinate("100"), Ok(100.0));
        assert!(parse_coordinate("NaN").is_err());
        assert!(parse_coordinate("inf").is_err());
        assert!(parse_coordinate("-infinity").is_err());
        assert!(parse_coordinate("left").is_err());
    }
}
