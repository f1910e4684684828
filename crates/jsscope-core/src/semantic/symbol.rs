//! Symbol records
//!
//! A [`Symbol`] is a single named declaration bound to the scope that
//! declared it. Symbols are created by the model builder and are immutable
//! afterwards, except for the built-in flag which can only ever be set.

use std::fmt;

use id_arena::Id;
use serde::Serialize;
use swc_common::Span;

use super::scope::ScopeId;

pub type SymbolId = Id<Symbol>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SymbolKind {
    Variable,
    LetVariable,
    ConstVariable,
    Function,
    Parameter,
    Class,
    Method,
    Import,
    TypeAlias,
    Enum,
}

impl SymbolKind {
    pub const ALL: [SymbolKind; 10] = [
        SymbolKind::Variable,
        SymbolKind::LetVariable,
        SymbolKind::ConstVariable,
        SymbolKind::Function,
        SymbolKind::Parameter,
        SymbolKind::Class,
        SymbolKind::Method,
        SymbolKind::Import,
        SymbolKind::TypeAlias,
        SymbolKind::Enum,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Variable => "variable",
            SymbolKind::LetVariable => "let-variable",
            SymbolKind::ConstVariable => "const-variable",
            SymbolKind::Function => "function",
            SymbolKind::Parameter => "parameter",
            SymbolKind::Class => "class",
            SymbolKind::Method => "method",
            SymbolKind::Import => "import",
            SymbolKind::TypeAlias => "type-alias",
            SymbolKind::Enum => "enum",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct Symbol {
    id: SymbolId,
    name: String,
    kind: SymbolKind,
    built_in: bool,
    scope: ScopeId,
    span: Span,
}

impl Symbol {
    pub(crate) fn new(
        id: SymbolId,
        name: &str,
        kind: SymbolKind,
        scope: ScopeId,
        span: Span,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            kind,
            built_in: false,
            scope,
            span,
        }
    }

    pub(crate) fn mark_built_in(&mut self) {
        self.built_in = true;
    }

    pub fn id(&self) -> SymbolId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    pub fn is_built_in(&self) -> bool {
        self.built_in
    }

    /// The scope this symbol was declared in.
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    /// Declaration site. Built-ins carry `DUMMY_SP`.
    pub fn span(&self) -> Span {
        self.span
    }
}
