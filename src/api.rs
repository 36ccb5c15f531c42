use crate::ast::AamDocument;
use crate::error::{AamDiagnostic, Severity};
use crate::lexer::{Scanner, Token};
use crate::parser::Parser;
use crate::serialization::{to_outline, OutlineNode};
use crate::utils::line_col;
use crate::validator::{validate, FileLookup, FsLookup};
use miette::GraphicalReportHandler;
use serde::{Serialize, Serializer};
use std::path::Path;

/// The result of analyzing one AAM document.
///
/// Analysis never fails: malformed input produces a partial tree and
/// diagnostics instead of an error. The struct keeps the full token stream
/// (trivia included) for consumers that need to classify source ranges,
/// the built tree, and every diagnostic in a fixed order: structural
/// problems first, then validation findings.
pub struct Analysis {
    pub document: AamDocument,
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<AamDiagnostic>,
    file_name: String,
    source: String,
}

impl Serialize for Analysis {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        #[derive(Serialize)]
        struct Repr<'a> {
            declarations: Vec<OutlineNode>,
            diagnostics: &'a [AamDiagnostic],
        }

        Repr {
            declarations: to_outline(&self.document),
            diagnostics: &self.diagnostics,
        }
        .serialize(serializer)
    }
}

impl Analysis {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// True when at least one diagnostic has error severity. Warnings
    /// (e.g. a non-`.aam` include) do not count.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &AamDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    /// Serializes the document outline and diagnostics as pretty JSON.
    ///
    /// # Errors
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self)
    }

    /// Serializes the document outline and diagnostics as YAML.
    ///
    /// # Errors
    /// Returns a `serde_yaml::Error` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self)
    }

    /// One `file:line:col: severity: message` line per diagnostic.
    pub fn format_diagnostics(&self) -> String {
        let mut out = String::new();
        for diagnostic in &self.diagnostics {
            let (line, column) = line_col(&self.source, diagnostic.offset);
            let severity = match diagnostic.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };
            out.push_str(&format!(
                "{}:{line}:{column}: {severity}: {}\n",
                self.file_name, diagnostic.message
            ));
        }
        out
    }

    /// Renders every diagnostic as a graphical miette report, labeled
    /// against the source text.
    pub fn render_reports(&self) -> String {
        let handler = GraphicalReportHandler::new();
        let mut buffer = String::new();
        for diagnostic in &self.diagnostics {
            let report = diagnostic
                .clone()
                .into_report(&self.file_name, &self.source);
            // String formatting does not fail; ignore the fmt::Error.
            let _ = handler.render_report(&mut buffer, &report);
        }
        buffer
    }
}

/// Analyzes an AAM source string: scan, build the tree, validate.
///
/// Import and derive targets are resolved against the directory of
/// `file_name` on the real file system. Use [`analyze_with_lookup`] to
/// inject a different project index.
pub fn analyze(source: &str, file_name: &str) -> Analysis {
    analyze_with_lookup(source, file_name, &FsLookup)
}

/// Like [`analyze`], with an injected file-existence collaborator.
pub fn analyze_with_lookup(source: &str, file_name: &str, lookup: &dyn FileLookup) -> Analysis {
    let tokens = Scanner::new(source).scan();
    log::debug!("{file_name}: scanned {} tokens", tokens.len());

    let (document, mut diagnostics) = Parser::new(source).parse_document();

    let base_dir = Path::new(file_name).parent().unwrap_or_else(|| Path::new("."));
    diagnostics.extend(validate(&document, base_dir, lookup));

    Analysis {
        document,
        tokens,
        diagnostics,
        file_name: file_name.to_string(),
        source: source.to_string(),
    }
}
