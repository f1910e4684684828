//! Human-readable symbol listing

use colored::Colorize;

use super::{FileSymbols, SymbolEntry};

#[derive(Default)]
pub struct PrettyFormatter;

impl PrettyFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format(&self, files: &[FileSymbols]) -> String {
        let mut output = String::new();

        for file in files {
            output.push_str(&self.format_file(file));
            output.push('\n');
        }

        output.push_str(&self.format_summary(files));
        output
    }

    fn format_file(&self, file: &FileSymbols) -> String {
        let mut lines = vec![file.file.bold().underline().to_string()];

        for error in &file.errors {
            lines.push(format!("  {} {}", "error:".red().bold(), error));
        }

        let location_width = file
            .symbols
            .iter()
            .map(|entry| location(entry).len())
            .max()
            .unwrap_or(0);

        for entry in &file.symbols {
            let name = if entry.symbol.built_in {
                entry.symbol.name.dimmed()
            } else {
                entry.symbol.name.normal()
            };
            lines.push(format!(
                "  {:<loc$}  {:<14}  {}  {}",
                location(entry).dimmed(),
                entry.symbol.kind.as_str().cyan(),
                name,
                format!("[{}]", entry.scope_kind.as_str()).dimmed(),
                loc = location_width,
            ));
        }

        lines.join("\n") + "\n"
    }

    fn format_summary(&self, files: &[FileSymbols]) -> String {
        let total: usize = files.iter().map(|f| f.symbols.len()).sum();
        format!(
            "{}\n",
            format!("{} symbol(s) in {} file(s)", total, files.len()).bold()
        )
    }
}

fn location(entry: &SymbolEntry) -> String {
    match (entry.line, entry.column) {
        (Some(line), Some(column)) => format!("{}:{}", line, column),
        _ => "<built-in>".to_string(),
    }
}
