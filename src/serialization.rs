use crate::ast::{AamDocument, Declaration};
use serde::Serialize;

/// A serializable view of one top-level declaration: the structure a
/// consumer needs to display or post-process a document without walking
/// the full tree. Spans are intentionally dropped here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutlineNode {
    Property {
        key: String,
        value: Option<String>,
    },
    Import {
        path: Option<String>,
    },
    Derive {
        path: Option<String>,
    },
    Schema {
        name: Option<String>,
        fields: Vec<OutlineField>,
    },
    TypeAlias {
        alias: Option<String>,
        base: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlineField {
    pub name: String,
    pub type_name: Option<String>,
}

pub(crate) fn to_outline(document: &AamDocument) -> Vec<OutlineNode> {
    document
        .declarations
        .iter()
        .map(|declaration| match declaration {
            Declaration::Property(p) => OutlineNode::Property {
                key: p.key.clone(),
                value: p.value.as_ref().map(|v| v.trim().to_string()),
            },
            Declaration::Import(i) => OutlineNode::Import {
                path: i.path.clone(),
            },
            Declaration::Derive(d) => OutlineNode::Derive {
                path: d.path.clone(),
            },
            Declaration::Schema(s) => OutlineNode::Schema {
                name: s.name.clone(),
                fields: s
                    .fields
                    .iter()
                    .map(|f| OutlineField {
                        name: f.name.clone(),
                        type_name: f.type_name.clone(),
                    })
                    .collect(),
            },
            Declaration::TypeAlias(t) => OutlineNode::TypeAlias {
                alias: t.alias_name.clone(),
                base: t.base_type.clone(),
            },
        })
        .collect()
}
