//! Output formatters for symbol listings

pub mod json;
pub mod pretty;

use jsscope_core::semantic::{ScopeKind, ScopeReport, SymbolReport};
use serde::Serialize;

/// Symbols listed for one analyzed file.
#[derive(Debug, Serialize)]
pub struct FileSymbols {
    pub file: String,
    #[serde(skip)]
    pub analyzed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    pub scopes: Vec<ScopeReport>,
    pub symbols: Vec<SymbolEntry>,
}

impl FileSymbols {
    pub fn failed(file: String, errors: Vec<String>) -> Self {
        Self {
            file,
            analyzed: false,
            errors,
            scopes: Vec::new(),
            symbols: Vec::new(),
        }
    }

    pub fn is_analyzed(&self) -> bool {
        self.analyzed
    }
}

#[derive(Debug, Serialize)]
pub struct SymbolEntry {
    #[serde(flatten)]
    pub symbol: SymbolReport,
    pub scope_kind: ScopeKind,
    pub line: Option<usize>,
    pub column: Option<usize>,
}
