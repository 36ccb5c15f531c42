/// Represents the different kinds of tokens the scanner can produce.
/// Each token is a meaningful unit of the AAM language syntax.
///
/// The same character stream can lex to different kinds depending on the
/// active [`ScanMode`]: `other.aam` is a `Key` in default position but a
/// `FilePath` right after `@import`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    // == Content ==
    /// A bare property key, e.g. `name` in `name = value`.
    Key,
    /// Everything after `=` up to end of line or an unquoted `#`.
    Value,
    /// A relative file path following `@import` or `@derive`.
    FilePath,
    /// The identifier following `@schema`.
    SchemaName,
    /// A field name inside a schema body.
    FieldName,
    /// A field type inside a schema body; may contain `::` pairs.
    FieldType,
    /// The alias identifier following `@type`.
    TypeAlias,
    /// The base type at the end of a `@type name = base` declaration.
    TypeBase,
    /// A `#` line comment, consumed to end of line.
    Comment,

    // == Directive keywords ==
    /// The `@import` keyword.
    ImportKeyword,
    /// The `@derive` keyword.
    DeriveKeyword,
    /// The `@schema` keyword.
    SchemaKeyword,
    /// The `@type` keyword.
    TypeKeyword,

    // == Structural ==
    /// Left Brace: `{`
    LBrace,
    /// Right Brace: `}`
    RBrace,
    /// Colon: `:`
    Colon,
    /// Comma: `,`
    Comma,
    /// Equals in default position: `=`. The `=` of a `@type` declaration
    /// lexes as [`TokenKind::TypeEquals`] instead.
    Equals,
    /// Equals inside a `@type` declaration.
    TypeEquals,

    // == Trivia ==
    /// A run of whitespace characters. Malformed single characters inside a
    /// `@type` declaration are also swallowed under this kind.
    Whitespace,
}

/// A token with its kind and byte span in the source.
///
/// Tokens never own text; callers slice `source[pos_start..pos_end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos_start: usize,
    pub pos_end: usize,
}

impl Token {
    pub fn new(kind: TokenKind, pos_start: usize, pos_end: usize) -> Token {
        Token {
            kind,
            pos_start,
            pos_end,
        }
    }

    /// The source text this token covers.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.pos_start..self.pos_end]
    }
}

/// The scanner's context flag. Exactly one mode is active at any scan
/// position; transitions are deterministic in (mode, next characters).
///
/// The mode is an explicit value rather than hidden scanner state so a scan
/// can be restarted from any `(offset, mode)` pair previously observed,
/// which is what makes partial re-scans of a larger buffer possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    #[default]
    Default,
    /// After `=`: expect a value running to end of line.
    AfterEquals,
    /// After `@import` or `@derive`: expect a file path.
    AfterPathDirective,
    /// After `@schema`: expect a schema name, then `{`.
    AfterSchemaKeyword,
    /// Inside a schema body, expecting a field name.
    SchemaBodyExpectField,
    /// Inside a schema body, expecting a field type.
    SchemaBodyExpectType,
    /// After `@type`: expect the alias name.
    AfterTypeKeyword,
    /// After the alias name: expect `=`.
    AfterTypeAlias,
    /// After `@type name =`: expect the base type.
    AfterTypeEquals,
}

/// The AAM tokenizer.
///
/// A `Scanner` walks a byte range of the source and classifies every
/// character into exactly one token, so the emitted spans tile the range
/// with no gaps or overlaps regardless of how malformed the input is.
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    end: usize,
    mode: ScanMode,
}

impl<'a> Scanner<'a> {
    /// Scans the whole input starting in [`ScanMode::Default`].
    pub fn new(input: &'a str) -> Self {
        Self::with_mode(input, 0, input.len(), ScanMode::Default)
    }

    /// Restarts a scan at `start`, given the mode that was active there.
    ///
    /// `start` and `end` must lie on character boundaries of `input`.
    pub fn with_mode(input: &'a str, start: usize, end: usize, mode: ScanMode) -> Self {
        Self {
            input,
            pos: start,
            end: end.min(input.len()),
            mode,
        }
    }

    /// The mode that will classify the next token. Record this together
    /// with the current offset to make the scan restartable.
    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    /// Consumes the scanner and collects every remaining token.
    pub fn scan(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        tokens
    }

    pub fn next_token(&mut self) -> Option<Token> {
        if self.pos >= self.end {
            return None;
        }
        let start = self.pos;
        let kind = loop {
            // A mode can only fall back to Default without consuming input,
            // and Default always consumes, so this loop runs at most twice.
            let first = self.peek()?;
            match self.mode {
                ScanMode::Default => break self.scan_default(first),
                ScanMode::AfterEquals => match self.scan_value(first) {
                    Some(kind) => break kind,
                    None => continue,
                },
                ScanMode::AfterPathDirective => match self.scan_file_path(first) {
                    Some(kind) => break kind,
                    None => continue,
                },
                ScanMode::AfterSchemaKeyword => break self.scan_schema_header(first),
                ScanMode::SchemaBodyExpectField => break self.scan_field_name(first),
                ScanMode::SchemaBodyExpectType => break self.scan_field_type(first),
                ScanMode::AfterTypeKeyword => break self.scan_type_alias(first),
                ScanMode::AfterTypeAlias => break self.scan_type_equals(first),
                ScanMode::AfterTypeEquals => match self.scan_type_base(first) {
                    Some(kind) => break kind,
                    None => continue,
                },
            }
        };
        Some(Token::new(kind, start, self.pos))
    }

    // === Per-mode scan steps ===

    fn scan_default(&mut self, first: char) -> TokenKind {
        if first.is_whitespace() {
            self.bump();
            self.eat_whitespace(false);
            return TokenKind::Whitespace;
        }
        if first == '#' {
            self.bump();
            while let Some(c) = self.peek() {
                if c == '\n' {
                    break;
                }
                self.bump();
            }
            return TokenKind::Comment;
        }
        if first == '@' {
            let remaining = &self.input[self.pos..self.end];
            if remaining.starts_with("@import") {
                self.pos += "@import".len();
                self.mode = ScanMode::AfterPathDirective;
                return TokenKind::ImportKeyword;
            }
            if remaining.starts_with("@derive") {
                self.pos += "@derive".len();
                self.mode = ScanMode::AfterPathDirective;
                return TokenKind::DeriveKeyword;
            }
            if remaining.starts_with("@schema") {
                self.pos += "@schema".len();
                self.mode = ScanMode::AfterSchemaKeyword;
                return TokenKind::SchemaKeyword;
            }
            if remaining.starts_with("@type") {
                self.pos += "@type".len();
                self.mode = ScanMode::AfterTypeKeyword;
                return TokenKind::TypeKeyword;
            }
            // Unknown @-directive: falls through to plain key scanning.
        }
        if first == '=' {
            self.bump();
            self.mode = ScanMode::AfterEquals;
            return TokenKind::Equals;
        }
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == '=' || c == '#' {
                break;
            }
            self.bump();
        }
        TokenKind::Key
    }

    /// Value scanning honors single and double quote spans so a `#` inside
    /// a quoted string does not terminate the value. An unterminated quote
    /// at end of line is accepted as-is.
    ///
    /// Returns `None` when the mode aborts back to Default without
    /// consuming anything.
    fn scan_value(&mut self, first: char) -> Option<TokenKind> {
        if first == '\n' || first == '#' {
            self.mode = ScanMode::Default;
            return None;
        }
        let mut in_quote = false;
        let mut quote_char = '\0';
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            if c == '"' || c == '\'' {
                if !in_quote {
                    in_quote = true;
                    quote_char = c;
                } else if c == quote_char {
                    in_quote = false;
                }
            }
            if c == '#' && !in_quote {
                break;
            }
            self.bump();
        }
        self.mode = ScanMode::Default;
        Some(TokenKind::Value)
    }

    fn scan_file_path(&mut self, first: char) -> Option<TokenKind> {
        if first == '\n' || first == '#' {
            self.mode = ScanMode::Default;
            return None;
        }
        if first.is_whitespace() {
            self.bump();
            self.eat_whitespace(true);
            return Some(TokenKind::Whitespace);
        }
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == '#' {
                break;
            }
            self.bump();
        }
        self.mode = ScanMode::Default;
        Some(TokenKind::FilePath)
    }

    fn scan_schema_header(&mut self, first: char) -> TokenKind {
        if first == '\n' {
            // Malformed schema header: abort back to default.
            self.bump();
            self.mode = ScanMode::Default;
            return TokenKind::Whitespace;
        }
        if first.is_whitespace() {
            self.bump();
            self.eat_whitespace(true);
            return TokenKind::Whitespace;
        }
        if first == '{' {
            self.bump();
            self.mode = ScanMode::SchemaBodyExpectField;
            return TokenKind::LBrace;
        }
        self.bump();
        self.eat_identifier(false);
        // Stay in this mode to pick up the `{` next.
        TokenKind::SchemaName
    }

    fn scan_field_name(&mut self, first: char) -> TokenKind {
        if first.is_whitespace() {
            self.bump();
            self.eat_whitespace(false);
            return TokenKind::Whitespace;
        }
        match first {
            '}' => {
                self.bump();
                self.mode = ScanMode::Default;
                TokenKind::RBrace
            }
            ':' => {
                self.bump();
                TokenKind::Colon
            }
            ',' => {
                self.bump();
                TokenKind::Comma
            }
            _ => {
                self.bump();
                self.eat_identifier(false);
                self.mode = ScanMode::SchemaBodyExpectType;
                TokenKind::FieldName
            }
        }
    }

    fn scan_field_type(&mut self, first: char) -> TokenKind {
        if first.is_whitespace() {
            self.bump();
            self.eat_whitespace(false);
            return TokenKind::Whitespace;
        }
        match first {
            ':' => {
                self.bump();
                TokenKind::Colon
            }
            ',' => {
                self.bump();
                self.mode = ScanMode::SchemaBodyExpectField;
                TokenKind::Comma
            }
            '}' => {
                self.bump();
                self.mode = ScanMode::Default;
                TokenKind::RBrace
            }
            _ => {
                self.bump();
                self.eat_identifier(true);
                self.mode = ScanMode::SchemaBodyExpectField;
                TokenKind::FieldType
            }
        }
    }

    fn scan_type_alias(&mut self, first: char) -> TokenKind {
        if first == '\n' {
            self.bump();
            self.mode = ScanMode::Default;
            return TokenKind::Whitespace;
        }
        if first.is_whitespace() {
            self.bump();
            self.eat_whitespace(true);
            return TokenKind::Whitespace;
        }
        self.bump();
        self.eat_identifier(false);
        self.mode = ScanMode::AfterTypeAlias;
        TokenKind::TypeAlias
    }

    fn scan_type_equals(&mut self, first: char) -> TokenKind {
        if first == '\n' {
            self.bump();
            self.mode = ScanMode::Default;
            return TokenKind::Whitespace;
        }
        if first.is_whitespace() {
            self.bump();
            self.eat_whitespace(true);
            return TokenKind::Whitespace;
        }
        if first == '=' {
            self.bump();
            self.mode = ScanMode::AfterTypeEquals;
            return TokenKind::TypeEquals;
        }
        // Malformed: swallow the character as trivia and keep expecting `=`.
        self.bump();
        TokenKind::Whitespace
    }

    fn scan_type_base(&mut self, first: char) -> Option<TokenKind> {
        if first == '\n' || first == '#' {
            self.mode = ScanMode::Default;
            return None;
        }
        if first.is_whitespace() {
            self.bump();
            self.eat_whitespace(true);
            return Some(TokenKind::Whitespace);
        }
        self.bump();
        self.eat_identifier(true);
        self.mode = ScanMode::Default;
        Some(TokenKind::TypeBase)
    }

    // === Character helpers ===

    fn peek(&self) -> Option<char> {
        self.input[self.pos..self.end].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.input[self.pos..self.end].chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_whitespace(&mut self, stop_at_newline: bool) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() && !(stop_at_newline && c == '\n') {
                self.bump();
            } else {
                break;
            }
        }
    }

    /// Consumes the tail of an identifier: letters, digits, `_`, and when
    /// `namespaced` also embedded `::` pairs (`math::vector2`).
    fn eat_identifier(&mut self, namespaced: bool) {
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.bump();
            } else if namespaced && c == ':' && self.peek_second() == Some(':') {
                self.bump();
                self.bump();
            } else {
                break;
            }
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}
