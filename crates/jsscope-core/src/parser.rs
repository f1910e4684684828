//! Parser module for JavaScript/TypeScript source code
//!
//! Integrates with SWC for parsing source files into an AST module, which
//! the scope-building visitor then walks.

use swc_common::sync::Lrc;
use swc_common::{BytePos, FileName, SourceMap, Spanned};
use swc_ecma_parser::{
    EsSyntax, StringInput, Syntax, TsSyntax, error::Error as SwcError, lexer::Lexer,
    parse_file_as_module,
};

pub use swc_ecma_ast::{EsVersion, Module};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    JavaScript,
    TypeScript,
    Jsx,
    Tsx,
}

pub fn detect_language(filename: &str) -> Language {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();

    match ext.as_str() {
        "ts" | "mts" | "cts" => Language::TypeScript,
        "tsx" => Language::Tsx,
        "jsx" => Language::Jsx,
        _ => Language::JavaScript,
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message} at {line}:{column}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseError {
    fn from_swc(error: &SwcError, source_map: &SourceMap) -> Self {
        let loc = source_map.lookup_char_pos(error.span().lo);
        Self {
            line: loc.line,
            column: loc.col_display,
            message: error.kind().msg().to_string(),
        }
    }
}

#[derive(Debug)]
pub struct ParseResult {
    pub module: Option<Module>,
    pub errors: Vec<ParseError>,
    /// Position of the first source byte; spans in `module` are offset by it.
    pub start_pos: BytePos,
}

impl ParseResult {
    pub fn is_ok(&self) -> bool {
        self.module.is_some()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub filename: String,
    pub language: Language,
    pub line_count: usize,
    pub has_errors: bool,
}

pub struct ParsedFile {
    source: String,
    metadata: FileMetadata,
    ast_module: Option<Module>,
    errors: Vec<ParseError>,
    start_pos: BytePos,
}

impl std::fmt::Debug for ParsedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedFile")
            .field("metadata", &self.metadata)
            .field("has_module", &self.ast_module.is_some())
            .field("error_count", &self.errors.len())
            .finish()
    }
}

impl ParsedFile {
    pub fn from_source(filename: &str, source: &str) -> Self {
        let language = detect_language(filename);
        let parser = Parser::for_file(filename);
        let parse_result = parser.parse_module_recovering(source);

        let line_count = if source.is_empty() {
            0
        } else {
            source.lines().count()
        };

        let metadata = FileMetadata {
            filename: filename.to_string(),
            language,
            line_count,
            has_errors: parse_result.has_errors(),
        };

        Self {
            source: source.to_string(),
            metadata,
            ast_module: parse_result.module,
            errors: parse_result.errors,
            start_pos: parse_result.start_pos,
        }
    }

    pub fn metadata(&self) -> &FileMetadata {
        &self.metadata
    }

    pub fn module(&self) -> Option<&Module> {
        self.ast_module.as_ref()
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// 1-based line and column of `pos`, or `None` for positions outside
    /// the source (such as the dummy span of built-in symbols).
    pub fn location(&self, pos: BytePos) -> Option<(usize, usize)> {
        if pos == BytePos(0) || pos < self.start_pos {
            return None;
        }
        let offset = (pos.0 - self.start_pos.0) as usize;
        if offset > self.source.len() {
            return None;
        }

        let prefix = self.source.get(..offset)?;
        let line = prefix.matches('\n').count() + 1;
        let line_start = prefix.rfind('\n').map(|i| i + 1).unwrap_or(0);
        Some((line, offset - line_start + 1))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParserBuilder {
    jsx: bool,
    typescript: bool,
    decorators: bool,
}

impl ParserBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jsx(mut self, enabled: bool) -> Self {
        self.jsx = enabled;
        self
    }

    pub fn typescript(mut self, enabled: bool) -> Self {
        self.typescript = enabled;
        self
    }

    pub fn decorators(mut self, enabled: bool) -> Self {
        self.decorators = enabled;
        self
    }

    pub fn build(self) -> Parser {
        let syntax = if self.typescript {
            Syntax::Typescript(TsSyntax {
                tsx: self.jsx,
                decorators: self.decorators,
                ..Default::default()
            })
        } else {
            Syntax::Es(EsSyntax {
                jsx: self.jsx,
                decorators: self.decorators,
                ..Default::default()
            })
        };

        Parser { syntax }
    }
}

#[derive(Debug, Clone)]
pub struct Parser {
    syntax: Syntax,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            syntax: Syntax::Es(Default::default()),
        }
    }

    pub fn for_file(filename: &str) -> Self {
        match detect_language(filename) {
            Language::JavaScript => Self::new(),
            Language::TypeScript => Self::builder().typescript(true).build(),
            Language::Jsx => Self::builder().jsx(true).build(),
            Language::Tsx => Self::builder().typescript(true).jsx(true).build(),
        }
    }

    pub fn builder() -> ParserBuilder {
        ParserBuilder::new()
    }

    pub fn parse_module(&self, code: &str) -> Result<Module, ParseError> {
        let source_map: Lrc<SourceMap> = Default::default();
        let fm = source_map
            .new_source_file(FileName::Custom("input.js".into()).into(), code.to_string());

        let lexer = Lexer::new(
            self.syntax,
            Default::default(),
            StringInput::from(&*fm),
            None,
        );

        let mut parser = swc_ecma_parser::Parser::new_from(lexer);

        parser
            .parse_module()
            .map_err(|e| ParseError::from_swc(&e, &source_map))
    }

    pub fn parse_module_recovering(&self, code: &str) -> ParseResult {
        let source_map: Lrc<SourceMap> = Default::default();
        let fm = source_map
            .new_source_file(FileName::Custom("input.js".into()).into(), code.to_string());

        let mut recovered_errors = Vec::new();

        let result = parse_file_as_module(
            &fm,
            self.syntax,
            EsVersion::latest(),
            None,
            &mut recovered_errors,
        );

        let mut errors: Vec<ParseError> = recovered_errors
            .iter()
            .map(|e| ParseError::from_swc(e, &source_map))
            .collect();

        let module = match result {
            Ok(module) => Some(module),
            Err(e) => {
                errors.push(ParseError::from_swc(&e, &source_map));
                None
            }
        };

        ParseResult {
            module,
            errors,
            start_pos: fm.start_pos,
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
