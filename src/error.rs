use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::Serialize;
use thiserror::Error;

/// How bad a diagnostic is. There is no fatal class: any input, however
/// malformed, still yields a tree and a diagnostic list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single problem found while parsing or validating a document.
///
/// Plain data on purpose: passes return these as values instead of writing
/// into a shared sink, so each pass stays independently testable. Use
/// [`AamDiagnostic::into_report`] to get a renderable miette report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AamDiagnostic {
    pub severity: Severity,
    pub message: String,
    /// Byte offset of the source range this diagnostic points at.
    pub offset: usize,
    /// Byte length of that range. Zero-length spans mark a position.
    pub length: usize,
}

impl AamDiagnostic {
    pub fn error(message: impl Into<String>, span: SourceSpan) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            offset: span.offset(),
            length: span.len(),
        }
    }

    pub fn warning(message: impl Into<String>, span: SourceSpan) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            offset: span.offset(),
            length: span.len(),
        }
    }

    pub fn span(&self) -> SourceSpan {
        (self.offset, self.length).into()
    }

    /// Attaches the source text so the diagnostic can be rendered as a
    /// labeled report.
    pub fn into_report(self, file_name: &str, source: &str) -> DocumentDiagnostic {
        let src = NamedSource::new(file_name, source.to_string());
        let span = self.span();
        match self.severity {
            Severity::Error => DocumentDiagnostic::Error {
                src,
                span,
                message: self.message,
            },
            Severity::Warning => DocumentDiagnostic::Warning {
                src,
                span,
                message: self.message,
            },
        }
    }
}

/// An [`AamDiagnostic`] bound to its source text, in miette-renderable form.
#[derive(Error, Debug, Diagnostic)]
pub enum DocumentDiagnostic {
    #[error("{message}")]
    #[diagnostic(code(aam::diagnostic), severity(Error))]
    Error {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: SourceSpan,
        message: String,
    },

    #[error("{message}")]
    #[diagnostic(code(aam::diagnostic), severity(Warning))]
    Warning {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: SourceSpan,
        message: String,
    },
}
