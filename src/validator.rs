use crate::ast::{AamDocument, Declaration};
use crate::error::AamDiagnostic;
use crate::types::{is_known_type, TYPE_HINT};
use std::collections::HashSet;
use std::path::Path;

/// Expected extension for `@import`/`@derive` targets. A mismatch is only a
/// warning: non-`.aam` includes are tolerated, a missing file is not.
pub const AAM_EXTENSION: &str = ".aam";

/// Answers whether an import/derive target exists.
///
/// The real project index lives outside this crate; the validator only
/// consumes this boundary. Implementations must return `false` for a
/// missing path instead of failing.
pub trait FileLookup {
    fn file_exists(&self, base_dir: &Path, relative: &str) -> bool;
}

impl<F> FileLookup for F
where
    F: Fn(&Path, &str) -> bool,
{
    fn file_exists(&self, base_dir: &Path, relative: &str) -> bool {
        self(base_dir, relative)
    }
}

/// Filesystem-backed lookup: resolves the path relative to the document's
/// directory.
pub struct FsLookup;

impl FileLookup for FsLookup {
    fn file_exists(&self, base_dir: &Path, relative: &str) -> bool {
        base_dir.join(relative).is_file()
    }
}

/// Runs every validation pass over a built tree.
///
/// The passes are independent and each returns its own diagnostics; this
/// composes them in a fixed order (completeness, then types, then
/// references) so repeated runs over an unchanged tree yield an identical
/// list.
pub fn validate(
    document: &AamDocument,
    base_dir: &Path,
    lookup: &dyn FileLookup,
) -> Vec<AamDiagnostic> {
    let mut diagnostics = check_schema_completeness(document);
    diagnostics.extend(check_type_validity(document));
    diagnostics.extend(check_references(document, base_dir, lookup));
    log::debug!("validation produced {} diagnostics", diagnostics.len());
    diagnostics
}

/// Every field a schema declares must have a matching property definition
/// somewhere in the same document.
pub fn check_schema_completeness(document: &AamDocument) -> Vec<AamDiagnostic> {
    let defined_keys: HashSet<&str> = document.properties().map(|p| p.key.as_str()).collect();

    let mut diagnostics = Vec::new();
    for schema in document.schemas() {
        let schema_name = schema.name.as_deref().unwrap_or("unknown");
        let span = (schema.pos_start, schema.pos_end - schema.pos_start).into();
        for field in &schema.fields {
            if field.name.is_empty() {
                continue;
            }
            if !defined_keys.contains(field.name.as_str()) {
                diagnostics.push(AamDiagnostic::error(
                    format!(
                        "Schema '{schema_name}': required field '{}' is not defined in this file",
                        field.name
                    ),
                    span,
                ));
            }
        }
    }
    diagnostics
}

/// Every field type and alias base type must resolve through the type
/// catalogue, given the document-wide alias set.
pub fn check_type_validity(document: &AamDocument) -> Vec<AamDiagnostic> {
    let aliases = document.alias_names();

    let mut diagnostics = Vec::new();
    for declaration in &document.declarations {
        match declaration {
            Declaration::Schema(schema) => {
                for field in &schema.fields {
                    if let Some(type_name) = &field.type_name {
                        if !is_known_type(type_name, &aliases) {
                            diagnostics.push(AamDiagnostic::error(
                                format!("Unknown type '{type_name}'. {TYPE_HINT}"),
                                field.type_span,
                            ));
                        }
                    }
                }
            }
            Declaration::TypeAlias(decl) => {
                if let Some(base_type) = &decl.base_type {
                    if !is_known_type(base_type, &aliases) {
                        diagnostics.push(AamDiagnostic::error(
                            format!("Unknown base type '{base_type}'. {TYPE_HINT}"),
                            decl.base_span,
                        ));
                    }
                }
            }
            _ => {}
        }
    }
    diagnostics
}

/// Every `@import`/`@derive` path must be non-empty and resolvable. A path
/// the parser already flagged as missing is skipped here.
pub fn check_references(
    document: &AamDocument,
    base_dir: &Path,
    lookup: &dyn FileLookup,
) -> Vec<AamDiagnostic> {
    let mut diagnostics = Vec::new();
    for declaration in &document.declarations {
        let (directive, path, path_span, span) = match declaration {
            Declaration::Import(i) => ("@import", &i.path, i.path_span, declaration.span()),
            Declaration::Derive(d) => ("@derive", &d.path, d.path_span, declaration.span()),
            _ => continue,
        };
        let Some(raw) = path else { continue };

        // Quotes around the path are tolerated and stripped before checks.
        let path = raw.trim_matches('"');
        if path.trim().is_empty() {
            diagnostics.push(AamDiagnostic::error(
                format!("{directive}: file path cannot be empty"),
                span,
            ));
            continue;
        }
        if !path.ends_with(AAM_EXTENSION) {
            diagnostics.push(AamDiagnostic::warning(
                format!("{directive}: expected a '{AAM_EXTENSION}' file, got '{path}'"),
                path_span,
            ));
            continue;
        }
        if !lookup.file_exists(base_dir, path) {
            diagnostics.push(AamDiagnostic::error(
                format!("{directive}: file '{path}' not found"),
                path_span,
            ));
        }
    }
    diagnostics
}
