use crate::ast::*;
use crate::error::AamDiagnostic;
use crate::lexer::{Scanner, Token, TokenKind};
use miette::SourceSpan;

/// A single-pass, error-tolerant tree builder for AAM documents.
///
/// Unlike a fail-fast parser, this one never aborts: a missing required
/// token is recorded as a diagnostic attached to the enclosing node and the
/// pass continues with the next token. Any input therefore produces exactly
/// one document plus an ordered diagnostic list; a document mid-edit is
/// perpetually malformed and still needs a best-effort tree.
#[derive(Debug)]
pub struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    position: usize,
    diagnostics: Vec<AamDiagnostic>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        // Whitespace is trivia to the tree builder; comments survive so the
        // top-level loop can discard them explicitly.
        let tokens: Vec<Token> = Scanner::new(source)
            .filter(|t| t.kind != TokenKind::Whitespace)
            .collect();
        log::trace!("tree builder starting over {} tokens", tokens.len());

        Self {
            source,
            tokens,
            position: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Consumes the parser, producing the document and every structural
    /// diagnostic in source order.
    pub fn parse_document(mut self) -> (AamDocument, Vec<AamDiagnostic>) {
        let mut declarations = Vec::new();
        while let Some(token) = self.current() {
            match token.kind {
                TokenKind::Key => {
                    declarations.push(Declaration::Property(self.parse_property(token)));
                }
                TokenKind::ImportKeyword => {
                    let (path, path_span, pos_end) = self.parse_path_directive(token, "@import");
                    declarations.push(Declaration::Import(ImportStatement {
                        path,
                        path_span,
                        pos_start: token.pos_start,
                        pos_end,
                    }));
                }
                TokenKind::DeriveKeyword => {
                    let (path, path_span, pos_end) = self.parse_path_directive(token, "@derive");
                    declarations.push(Declaration::Derive(DeriveStatement {
                        path,
                        path_span,
                        pos_start: token.pos_start,
                        pos_end,
                    }));
                }
                TokenKind::SchemaKeyword => {
                    declarations.push(Declaration::Schema(self.parse_schema(token)));
                }
                TokenKind::TypeKeyword => {
                    declarations.push(Declaration::TypeAlias(self.parse_type_declaration(token)));
                }
                TokenKind::Comment => self.advance(),
                // Stray structural tokens at top level produce no node; the
                // pass must keep progressing on arbitrary input.
                _ => self.advance(),
            }
        }
        log::debug!(
            "built {} declarations, {} diagnostics",
            declarations.len(),
            self.diagnostics.len()
        );
        (AamDocument { declarations }, self.diagnostics)
    }

    // === Declaration parsers ===

    fn parse_property(&mut self, key_token: Token) -> Property {
        self.advance();
        let mut value = None;
        let mut pos_end = key_token.pos_end;

        if self.at(TokenKind::Equals) {
            self.advance();
            pos_end = self.prev_end();
        }
        if let Some(token) = self.current() {
            if token.kind == TokenKind::Value {
                value = Some(token.text(self.source).to_string());
                self.advance();
                pos_end = token.pos_end;
            }
        }

        Property {
            key: key_token.text(self.source).to_string(),
            value,
            pos_start: key_token.pos_start,
            pos_end,
        }
    }

    /// Shared body of `@import` and `@derive`: both require one file path.
    /// A missing path closes the node anyway, with a `None` path.
    fn parse_path_directive(
        &mut self,
        keyword: Token,
        directive: &str,
    ) -> (Option<String>, SourceSpan, usize) {
        self.advance();
        match self.current() {
            Some(token) if token.kind == TokenKind::FilePath => {
                self.advance();
                (
                    Some(token.text(self.source).to_string()),
                    span_of(token),
                    token.pos_end,
                )
            }
            _ => {
                self.report(format!("Expected file path after {directive}"));
                (None, span_of(keyword), keyword.pos_end)
            }
        }
    }

    fn parse_schema(&mut self, keyword: Token) -> SchemaDeclaration {
        self.advance();
        let mut name = None;

        if let Some(token) = self.current() {
            if token.kind == TokenKind::SchemaName {
                name = Some(token.text(self.source).to_string());
                self.advance();
            }
        }
        if name.is_none() {
            self.report("Expected schema name after @schema");
        }

        let mut fields = Vec::new();
        if self.at(TokenKind::LBrace) {
            self.advance();
            while let Some(token) = self.current() {
                if token.kind == TokenKind::RBrace {
                    break;
                }
                if token.kind == TokenKind::FieldName {
                    fields.push(self.parse_schema_field(token));
                    if self.at(TokenKind::Comma) {
                        self.advance();
                    }
                } else {
                    // Anything else inside the body is skipped so the loop
                    // keeps progressing.
                    self.advance();
                }
            }
            if self.at(TokenKind::RBrace) {
                self.advance();
            } else {
                self.report("Expected '}' to close schema");
            }
        } else {
            self.report("Expected '{' after schema name");
        }

        SchemaDeclaration {
            name,
            fields,
            pos_start: keyword.pos_start,
            pos_end: self.prev_end().max(keyword.pos_end),
        }
    }

    fn parse_schema_field(&mut self, name_token: Token) -> SchemaField {
        self.advance();
        let mut type_name = None;
        let mut type_span = span_of(name_token);
        let mut pos_end = name_token.pos_end;

        if self.at(TokenKind::Colon) {
            self.advance();
            pos_end = self.prev_end();
        }
        if let Some(token) = self.current() {
            if token.kind == TokenKind::FieldType {
                type_name = Some(token.text(self.source).to_string());
                type_span = span_of(token);
                self.advance();
                pos_end = token.pos_end;
            }
        }

        SchemaField {
            name: name_token.text(self.source).to_string(),
            type_name,
            type_span,
            pos_start: name_token.pos_start,
            pos_end,
        }
    }

    fn parse_type_declaration(&mut self, keyword: Token) -> TypeDeclaration {
        self.advance();
        let mut alias_name = None;
        let mut alias_span = span_of(keyword);
        let mut base_type = None;
        let mut base_span = span_of(keyword);

        if let Some(token) = self.current() {
            if token.kind == TokenKind::TypeAlias {
                alias_name = Some(token.text(self.source).to_string());
                alias_span = span_of(token);
                self.advance();
            }
        }
        if alias_name.is_none() {
            self.report("Expected alias name after @type");
        }

        if self.at(TokenKind::TypeEquals) {
            self.advance();
        } else {
            self.report("Expected '=' after type alias name");
        }

        if let Some(token) = self.current() {
            if token.kind == TokenKind::TypeBase {
                base_type = Some(token.text(self.source).to_string());
                base_span = span_of(token);
                self.advance();
            }
        }
        if base_type.is_none() {
            self.report("Expected base type after '='");
        }

        TypeDeclaration {
            alias_name,
            alias_span,
            base_type,
            base_span,
            pos_start: keyword.pos_start,
            pos_end: self.prev_end().max(keyword.pos_end),
        }
    }

    // === Token cursor helpers ===

    fn current(&self) -> Option<Token> {
        self.tokens.get(self.position).copied()
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current().is_some_and(|t| t.kind == kind)
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    /// End offset of the last consumed token, or 0 before any consumption.
    fn prev_end(&self) -> usize {
        self.position
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(0, |t| t.pos_end)
    }

    /// Records a structural diagnostic at the current token, or at end of
    /// input when the stream is exhausted.
    fn report(&mut self, message: impl Into<String>) {
        let span: SourceSpan = match self.current() {
            Some(token) => span_of(token),
            None => (self.source.len(), 0).into(),
        };
        self.diagnostics.push(AamDiagnostic::error(message, span));
    }
}

fn span_of(token: Token) -> SourceSpan {
    (token.pos_start, token.pos_end - token.pos_start).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> (AamDocument, Vec<AamDiagnostic>) {
        Parser::new(source).parse_document()
    }

    fn parse_clean(source: &str) -> AamDocument {
        let (document, diagnostics) = parse(source);
        assert!(diagnostics.is_empty(), "unexpected: {diagnostics:?}");
        document
    }

    #[test]
    fn test_empty_document() {
        let document = parse_clean("");
        assert!(document.declarations.is_empty());
    }

    #[test]
    fn test_property_with_value() {
        let document = parse_clean("name = Arthur");
        match &document.declarations[0] {
            Declaration::Property(p) => {
                assert_eq!(p.key, "name");
                assert_eq!(p.value.as_deref(), Some(" Arthur"));
            }
            other => panic!("expected property, got {other:?}"),
        }
    }

    #[test]
    fn test_bare_key_property() {
        let document = parse_clean("flag");
        match &document.declarations[0] {
            Declaration::Property(p) => {
                assert_eq!(p.key, "flag");
                assert_eq!(p.value, None);
            }
            other => panic!("expected property, got {other:?}"),
        }
    }

    #[test]
    fn test_import_and_derive() {
        let document = parse_clean("@import other.aam\n@derive base.aam");
        assert_eq!(document.declarations.len(), 2);
        match &document.declarations[0] {
            Declaration::Import(i) => assert_eq!(i.path.as_deref(), Some("other.aam")),
            other => panic!("expected import, got {other:?}"),
        }
        match &document.declarations[1] {
            Declaration::Derive(d) => assert_eq!(d.path.as_deref(), Some("base.aam")),
            other => panic!("expected derive, got {other:?}"),
        }
    }

    #[test]
    fn test_import_missing_path_keeps_node() {
        let (document, diagnostics) = parse("@import");
        assert_eq!(document.declarations.len(), 1);
        match &document.declarations[0] {
            Declaration::Import(i) => assert_eq!(i.path, None),
            other => panic!("expected import, got {other:?}"),
        }
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("Expected file path after @import"));
    }

    #[test]
    fn test_schema_with_fields() {
        let document =
            parse_clean("@schema Player {\n  name: string,\n  pos: math::vector3,\n  vel: speed\n}");
        match &document.declarations[0] {
            Declaration::Schema(s) => {
                assert_eq!(s.name.as_deref(), Some("Player"));
                let fields: Vec<(&str, Option<&str>)> = s
                    .fields
                    .iter()
                    .map(|f| (f.name.as_str(), f.type_name.as_deref()))
                    .collect();
                assert_eq!(
                    fields,
                    vec![
                        ("name", Some("string")),
                        ("pos", Some("math::vector3")),
                        ("vel", Some("speed")),
                    ]
                );
            }
            other => panic!("expected schema, got {other:?}"),
        }
    }

    #[test]
    fn test_schema_field_without_type() {
        let (document, _) = parse("@schema S { a, b: i32 }");
        match &document.declarations[0] {
            Declaration::Schema(s) => {
                assert_eq!(s.fields.len(), 2);
                assert_eq!(s.fields[0].name, "a");
                assert_eq!(s.fields[0].type_name, None);
                assert_eq!(s.fields[1].type_name.as_deref(), Some("i32"));
            }
            other => panic!("expected schema, got {other:?}"),
        }
    }

    #[test]
    fn test_schema_missing_closing_brace() {
        let (document, diagnostics) = parse("@schema S { a: i32");
        match &document.declarations[0] {
            Declaration::Schema(s) => {
                assert_eq!(s.name.as_deref(), Some("S"));
                assert_eq!(s.fields.len(), 1);
            }
            other => panic!("expected schema, got {other:?}"),
        }
        assert!(diagnostics
            .iter()
            .any(|d| d.message.contains("Expected '}' to close schema")));
    }

    #[test]
    fn test_schema_missing_name_and_brace() {
        // The newline aborts the schema header, so both the name and the
        // brace are missing; the declaration node still exists.
        let (document, diagnostics) = parse("@schema\nkey = 1");
        assert_eq!(document.declarations.len(), 2);
        assert!(matches!(&document.declarations[0], Declaration::Schema(s) if s.name.is_none()));
        assert!(matches!(
            &document.declarations[1],
            Declaration::Property(p) if p.key == "key"
        ));
        let messages: Vec<&str> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert!(messages.contains(&"Expected schema name after @schema"));
        assert!(messages.contains(&"Expected '{' after schema name"));
    }

    #[test]
    fn test_type_declaration() {
        let document = parse_clean("@type speed = physics::meterPerSecond");
        match &document.declarations[0] {
            Declaration::TypeAlias(t) => {
                assert_eq!(t.alias_name.as_deref(), Some("speed"));
                assert_eq!(t.base_type.as_deref(), Some("physics::meterPerSecond"));
            }
            other => panic!("expected type alias, got {other:?}"),
        }
    }

    #[test]
    fn test_type_declaration_missing_pieces() {
        let (document, diagnostics) = parse("@type speed\n@type = i32\n@type");
        assert_eq!(document.declarations.len(), 3);
        let messages: Vec<&str> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert!(messages.contains(&"Expected '=' after type alias name"));
        assert!(messages.contains(&"Expected alias name after @type"));
        assert!(messages.contains(&"Expected base type after '='"));
    }

    #[test]
    fn test_comments_produce_no_nodes() {
        let document = parse_clean("# heading\nkey = 1 # trailing\n# footer");
        assert_eq!(document.declarations.len(), 1);
    }

    #[test]
    fn test_declaration_order_is_preserved() {
        let document = parse_clean(
            "first = 1\n@import a.aam\n@schema S { x: i32 }\n@type t = f64\nlast = 2",
        );
        let kinds: Vec<&str> = document
            .declarations
            .iter()
            .map(|d| match d {
                Declaration::Property(_) => "property",
                Declaration::Import(_) => "import",
                Declaration::Derive(_) => "derive",
                Declaration::Schema(_) => "schema",
                Declaration::TypeAlias(_) => "type",
            })
            .collect();
        assert_eq!(kinds, vec!["property", "import", "schema", "type", "property"]);
    }

    #[test]
    fn test_totality_on_garbage() {
        // Arbitrary hostile input must still yield one root and terminate.
        let inputs = [
            "} } { = = @schema { { , , : }",
            "@type = = =\n@import\n@derive #",
            "{}{}{}",
            "= \n=\n=",
            "@schema S {",
        ];
        for input in inputs {
            let (_, diagnostics) = parse(input);
            // No assertion on counts; reaching here without panic is the point.
            let _ = diagnostics;
        }
    }

    #[test]
    fn test_forward_alias_is_collected() {
        let document = parse_clean("@schema S { v: speed }\n@type speed = physics::meterPerSecond");
        assert!(document.alias_names().contains("speed"));
    }
}
