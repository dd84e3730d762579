//! Terminal output helpers

use colored::Colorize;
use erd_ir::{Entity, EntityStore, Relationship, ValidationResult};
use std::fmt::Write;

/// Print a success line
pub fn success(message: impl AsRef<str>) {
    println!("{} {}", "✓".green().bold(), message.as_ref());
}

/// Print a note for a tolerant no-op
pub fn note(message: impl AsRef<str>) {
    println!("{} {}", "•".yellow(), message.as_ref());
}

/// Human-readable listing of both collections
pub fn render_listing(entities: &EntityStore, relationships: &[Relationship]) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{} ({})", "Entities".bold(), entities.len());
    for entity in entities.entities() {
        render_entity(&mut out, entity);
    }

    let _ = writeln!(out, "{} ({})", "Relationships".bold(), relationships.len());
    for rel in relationships {
        let source = endpoint_label(entities, &rel.source_id);
        let target = endpoint_label(entities, &rel.target_id);
        let _ = writeln!(
            out,
            "  {}: {} ({}) -> ({}) {}  {}",
            rel.display_label().cyan(),
            source,
            rel.source_cardinality,
            rel.target_cardinality,
            target,
            rel.id.dimmed()
        );
    }

    out
}

fn render_entity(out: &mut String, entity: &Entity) {
    let _ = writeln!(
        out,
        "  {}  ({}, {})  {}",
        entity.name.bold(),
        entity.x(),
        entity.y(),
        entity.id.dimmed()
    );
    for attribute in &entity.attributes {
        let pk = if attribute.is_primary { " [PK]" } else { "" };
        let _ = writeln!(
            out,
            "    - {}: {}{}  {}",
            attribute.name, attribute.data_type, pk, attribute.id.dimmed()
        );
    }
}

fn endpoint_label(entities: &EntityStore, id: &str) -> String {
    match entities.get_entity(id) {
        Some(entity) => entity.name.clone(),
        None => format!("<missing {}>", id).red().to_string(),
    }
}

/// Human-readable validation report
pub fn render_validation(result: &ValidationResult) -> String {
    let mut out = String::new();
    for error in &result.errors {
        let _ = writeln!(out, "{} {}", "error:".red().bold(), error);
    }
    for warning in &result.warnings {
        let _ = writeln!(out, "{} {}", "warning:".yellow().bold(), warning);
    }
    if result.valid {
        let _ = writeln!(
            out,
            "{} diagram is consistent ({} warning(s))",
            "✓".green().bold(),
            result.warnings.len()
        );
    }
    out
}
