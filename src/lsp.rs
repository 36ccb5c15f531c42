//! Position-based queries over a built tree: the data contracts behind
//! go-to-definition, reference search, and breadcrumb display. No editor
//! types leak in here; consumers get spans and node references.

use crate::ast::{AamDocument, Declaration, SchemaField};
use miette::SourceSpan;

/// The most specific node covering a byte position.
#[derive(Debug, Clone, Copy)]
pub enum FoundNode<'a> {
    Declaration(&'a Declaration),
    Field(&'a SchemaField),
}

/// Finds the most specific node whose span contains `position`.
///
/// Schema fields win over their enclosing schema declaration.
pub fn find_node_at(document: &AamDocument, position: usize) -> Option<FoundNode<'_>> {
    for declaration in &document.declarations {
        if position < declaration.pos_start() || position >= declaration.pos_end() {
            continue;
        }
        if let Declaration::Schema(schema) = declaration {
            for field in &schema.fields {
                if position >= field.pos_start && position < field.pos_end {
                    return Some(FoundNode::Field(field));
                }
            }
        }
        return Some(FoundNode::Declaration(declaration));
    }
    None
}

/// Resolves an alias name to the span of its `@type` declaration name.
/// This is the core of "go to definition" for alias usages.
pub fn alias_definition(document: &AamDocument, alias_name: &str) -> Option<SourceSpan> {
    document
        .type_declarations()
        .find(|t| t.alias_name.as_deref() == Some(alias_name))
        .map(|t| t.alias_span)
}

/// Every place an alias is used as a type: schema field types and other
/// aliases' base types. The defining `@type` declaration is not a usage.
pub fn find_alias_usages(document: &AamDocument, alias_name: &str) -> Vec<SourceSpan> {
    let mut usages = Vec::new();
    for declaration in &document.declarations {
        match declaration {
            Declaration::Schema(schema) => {
                for field in &schema.fields {
                    if field.type_name.as_deref() == Some(alias_name) {
                        usages.push(field.type_span);
                    }
                }
            }
            Declaration::TypeAlias(t) => {
                if t.base_type.as_deref() == Some(alias_name) {
                    usages.push(t.base_span);
                }
            }
            _ => {}
        }
    }
    usages
}

/// Breadcrumb-style labels from the document root down to `position`.
pub fn path_to(document: &AamDocument, position: usize) -> Vec<String> {
    let mut path = Vec::new();
    let Some(found) = find_node_at(document, position) else {
        return path;
    };
    match found {
        FoundNode::Declaration(declaration) => path.push(declaration_label(declaration)),
        FoundNode::Field(field) => {
            // The field's parent is the schema containing the position.
            for declaration in &document.declarations {
                if let Declaration::Schema(schema) = declaration {
                    if schema.fields.iter().any(|f| std::ptr::eq(f, field)) {
                        path.push(declaration_label(declaration));
                    }
                }
            }
            path.push(field.name.clone());
        }
    }
    path
}

fn declaration_label(declaration: &Declaration) -> String {
    match declaration {
        Declaration::Property(p) => p.key.clone(),
        Declaration::Import(i) => format!("@import {}", i.path.as_deref().unwrap_or("?")),
        Declaration::Derive(d) => format!("@derive {}", d.path.as_deref().unwrap_or("?")),
        Declaration::Schema(s) => s.name.clone().unwrap_or_else(|| "unknown".to_string()),
        Declaration::TypeAlias(t) => t.alias_name.clone().unwrap_or_else(|| "?".to_string()),
    }
}
