//! JSON output formatter for symbol listings

use super::FileSymbols;
use serde::Serialize;

#[derive(Serialize)]
pub struct JsonOutput<'a> {
    pub version: &'static str,
    pub summary: JsonSummary,
    pub files: &'a [FileSymbols],
}

#[derive(Serialize)]
pub struct JsonSummary {
    pub total_files: usize,
    pub files_with_errors: usize,
    pub total_scopes: usize,
    pub total_symbols: usize,
}

#[derive(Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format(&self, files: &[FileSymbols]) -> String {
        let output = JsonOutput {
            version: env!("CARGO_PKG_VERSION"),
            summary: self.build_summary(files),
            files,
        };
        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }

    fn build_summary(&self, files: &[FileSymbols]) -> JsonSummary {
        JsonSummary {
            total_files: files.len(),
            files_with_errors: files.iter().filter(|f| !f.errors.is_empty()).count(),
            total_scopes: files.iter().map(|f| f.scopes.len()).sum(),
            total_symbols: files.iter().map(|f| f.symbols.len()).sum(),
        }
    }
}
