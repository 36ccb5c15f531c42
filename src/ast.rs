use miette::SourceSpan;
use std::collections::HashSet;

/// A parsed AAM document: an ordered sequence of top-level declarations.
///
/// Order is preserved for diagnostics and structure display; it carries no
/// semantic weight. In particular, `@type` aliases are visible to every
/// type-name check in the document regardless of where they are declared.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct AamDocument {
    pub declarations: Vec<Declaration>,
}

/// A top-level declaration. Closed set; every consumer matches exhaustively.
#[derive(Debug, PartialEq, Clone)]
pub enum Declaration {
    Property(Property),
    Import(ImportStatement),
    Derive(DeriveStatement),
    Schema(SchemaDeclaration),
    TypeAlias(TypeDeclaration),
}

/// A bare `key = value` pair. The value is optional: a lone key is legal.
#[derive(Debug, PartialEq, Clone)]
pub struct Property {
    pub key: String,
    pub value: Option<String>,
    pub pos_start: usize,
    pub pos_end: usize,
}

/// `@import path`: references another document by relative path.
///
/// `path` is `None` when the parser recorded a missing-path diagnostic;
/// `path_span` then falls back to the span of the whole statement.
#[derive(Debug, PartialEq, Clone)]
pub struct ImportStatement {
    pub path: Option<String>,
    pub path_span: SourceSpan,
    pub pos_start: usize,
    pub pos_end: usize,
}

/// `@derive path`: same shape and path rules as [`ImportStatement`].
#[derive(Debug, PartialEq, Clone)]
pub struct DeriveStatement {
    pub path: Option<String>,
    pub path_span: SourceSpan,
    pub pos_start: usize,
    pub pos_end: usize,
}

/// `@schema Name { field: type, ... }`
#[derive(Debug, PartialEq, Clone)]
pub struct SchemaDeclaration {
    pub name: Option<String>,
    pub fields: Vec<SchemaField>,
    pub pos_start: usize,
    pub pos_end: usize,
}

/// A single `field: type` entry inside a schema body. The type is optional
/// in malformed input; the field is kept rather than dropped.
#[derive(Debug, PartialEq, Clone)]
pub struct SchemaField {
    pub name: String,
    pub type_name: Option<String>,
    pub type_span: SourceSpan,
    pub pos_start: usize,
    pub pos_end: usize,
}

/// `@type alias = baseType`: defines `alias` as equivalent to `baseType`
/// for the whole document.
#[derive(Debug, PartialEq, Clone)]
pub struct TypeDeclaration {
    pub alias_name: Option<String>,
    pub alias_span: SourceSpan,
    pub base_type: Option<String>,
    pub base_span: SourceSpan,
    pub pos_start: usize,
    pub pos_end: usize,
}

impl Declaration {
    pub fn pos_start(&self) -> usize {
        match self {
            Declaration::Property(p) => p.pos_start,
            Declaration::Import(i) => i.pos_start,
            Declaration::Derive(d) => d.pos_start,
            Declaration::Schema(s) => s.pos_start,
            Declaration::TypeAlias(t) => t.pos_start,
        }
    }

    pub fn pos_end(&self) -> usize {
        match self {
            Declaration::Property(p) => p.pos_end,
            Declaration::Import(i) => i.pos_end,
            Declaration::Derive(d) => d.pos_end,
            Declaration::Schema(s) => s.pos_end,
            Declaration::TypeAlias(t) => t.pos_end,
        }
    }

    pub fn span(&self) -> SourceSpan {
        (self.pos_start(), self.pos_end() - self.pos_start()).into()
    }
}

impl AamDocument {
    /// All `@type` alias names declared anywhere in the document.
    ///
    /// Collected up front so forward references resolve: an alias declared
    /// after a schema still covers that schema's field types.
    pub fn alias_names(&self) -> HashSet<String> {
        self.declarations
            .iter()
            .filter_map(|d| match d {
                Declaration::TypeAlias(t) => t.alias_name.clone(),
                _ => None,
            })
            .collect()
    }

    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Property(p) => Some(p),
            _ => None,
        })
    }

    pub fn schemas(&self) -> impl Iterator<Item = &SchemaDeclaration> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Schema(s) => Some(s),
            _ => None,
        })
    }

    pub fn type_declarations(&self) -> impl Iterator<Item = &TypeDeclaration> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::TypeAlias(t) => Some(t),
            _ => None,
        })
    }
}
