//! Symbols command - builds the symbol model of each file and prints it

use crate::output::json::JsonFormatter;
use crate::output::pretty::PrettyFormatter;
use crate::output::{FileSymbols, SymbolEntry};
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use jsscope_core::config::{Config, find_config_file, load_config_with_warnings};
use jsscope_core::parser::ParsedFile;
use jsscope_core::semantic::{
    BuildOptions, ModelReport, Symbol, SymbolKind, SymbolModel, SymbolReport, SymbolVisitor,
};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const SUPPORTED_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "mjs", "cjs", "mts", "cts"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}

#[derive(Args, Debug)]
pub struct SymbolsArgs {
    /// Path to file or directory to analyze
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,

    /// Only list symbols of this kind (e.g. function, let-variable, parameter)
    #[arg(long, value_name = "KIND")]
    pub kind: Option<String>,

    /// Only list symbols with this exact name
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Include built-in globals and implicit `arguments` bindings
    #[arg(long)]
    pub built_ins: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Which symbols of a model end up in the output.
#[derive(Debug, Clone, Default)]
pub struct SymbolFilter {
    pub kind: Option<SymbolKind>,
    pub name: Option<String>,
    pub built_ins: bool,
}

impl SymbolFilter {
    /// Matching symbols in declaration order. Uses the model's kind and name
    /// indices rather than scanning every symbol.
    pub fn select<'m>(&self, model: &'m SymbolModel) -> Vec<&'m Symbol> {
        let candidates: Box<dyn Iterator<Item = &'m Symbol> + '_> =
            match (&self.name, self.kind) {
                (Some(name), _) => Box::new(model.symbols_named(name)),
                (None, Some(kind)) => Box::new(model.symbols_of_kind(kind)),
                (None, None) => Box::new(model.symbols()),
            };

        let mut selected: Vec<&Symbol> = candidates
            .filter(|s| self.kind.is_none_or(|kind| s.kind() == kind))
            .filter(|s| self.built_ins || !s.is_built_in())
            .collect();
        selected.sort_by_key(|s| s.id().index());
        selected
    }
}

impl SymbolsArgs {
    pub fn run(&self) -> Result<()> {
        self.configure_colors();

        let config = self.load_config()?;
        let filter = self.filter()?;
        let options = config.build_options();

        let files = discover_files(&self.path, &config)?;
        tracing::info!(files = files.len(), path = %self.path.display(), "discovered files");

        if files.is_empty() {
            println!("No JavaScript/TypeScript files found.");
            return Ok(());
        }

        let results: Vec<FileSymbols> = files
            .par_iter()
            .map(|file| analyze_file(file, &options, &filter))
            .collect();

        match self.format {
            OutputFormat::Json => println!("{}", JsonFormatter::new().format(&results)),
            OutputFormat::Pretty => print!("{}", PrettyFormatter::new().format(&results)),
        }

        let failed = results.iter().filter(|r| !r.is_analyzed()).count();
        if failed > 0 {
            anyhow::bail!("{} file(s) could not be analyzed", failed);
        }
        Ok(())
    }

    fn load_config(&self) -> Result<Config> {
        let Some(config_path) = find_config_file(&self.path) else {
            return Ok(Config::default());
        };

        tracing::debug!(path = %config_path.display(), "loading config");
        let result = load_config_with_warnings(&config_path)?;
        for warning in &result.warnings {
            tracing::warn!("{}", warning);
            eprintln!("{} {}", "warning:".yellow().bold(), warning);
        }
        Ok(result.config)
    }

    fn filter(&self) -> Result<SymbolFilter> {
        let kind = match self.kind.as_deref() {
            Some(value) => Some(SymbolKind::parse(value).with_context(|| {
                let valid: Vec<&str> = SymbolKind::ALL.iter().map(|k| k.as_str()).collect();
                format!(
                    "Invalid kind '{}'. Valid values: {}",
                    value,
                    valid.join(", ")
                )
            })?),
            None => None,
        };

        Ok(SymbolFilter {
            kind,
            name: self.name.clone(),
            built_ins: self.built_ins,
        })
    }

    fn configure_colors(&self) {
        let no_color_env = std::env::var("NO_COLOR").is_ok();
        if self.no_color || no_color_env || self.format == OutputFormat::Json {
            colored::control::set_override(false);
        }
    }
}

pub fn analyze_file(path: &Path, options: &BuildOptions, filter: &SymbolFilter) -> FileSymbols {
    let file = path.to_string_lossy().to_string();

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(file = %file, error = %e, "failed to read file");
            return FileSymbols::failed(file, vec![format!("failed to read file: {}", e)]);
        }
    };

    let parsed = ParsedFile::from_source(&file, &content);
    let errors: Vec<String> = parsed.errors().iter().map(|e| e.to_string()).collect();
    if !errors.is_empty() {
        tracing::warn!(file = %file, errors = errors.len(), "syntax errors");
    }

    let Some(module) = parsed.module() else {
        return FileSymbols::failed(file, errors);
    };

    let model = match SymbolVisitor::build(module, options) {
        Ok(model) => model,
        Err(e) => {
            tracing::error!(file = %file, error = %e, "failed to build symbol model");
            let mut errors = errors;
            errors.push(e.to_string());
            return FileSymbols::failed(file, errors);
        }
    };

    let symbols: Vec<SymbolEntry> = filter
        .select(&model)
        .into_iter()
        .map(|symbol| {
            let location = parsed.location(symbol.span().lo);
            SymbolEntry {
                symbol: SymbolReport::from(symbol),
                scope_kind: model.scope_of(symbol.id()).kind,
                line: location.map(|(line, _)| line),
                column: location.map(|(_, column)| column),
            }
        })
        .collect();

    tracing::debug!(
        file = %file,
        scopes = model.scope_count(),
        symbols = model.symbol_count(),
        listed = symbols.len(),
        "built symbol model"
    );

    FileSymbols {
        file,
        analyzed: true,
        errors,
        scopes: ModelReport::new(&model, filter.built_ins).scopes,
        symbols,
    }
}

fn discover_files(path: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    if path.is_file() {
        if is_supported_file(path) {
            return Ok(vec![path.to_path_buf()]);
        } else {
            return Ok(vec![]);
        }
    }

    let selector = FileSelector::new(config)?;
    let files: Vec<PathBuf> = WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| is_supported_file(e.path()))
        .filter(|e| selector.is_selected(&relative_path(path, e.path())))
        .map(|e| e.path().to_path_buf())
        .collect();

    Ok(files)
}

fn is_supported_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.') || name == "node_modules")
        .unwrap_or(false)
}

/// `/`-separated path of `path` below `root`.
fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Compiled `include` and `exclude` patterns of a [`Config`]. `*` and `?`
/// stay within one path segment, `**` spans directories.
struct FileSelector {
    include: Option<GlobSet>,
    exclude: GlobSet,
}

impl FileSelector {
    fn new(config: &Config) -> Result<Self> {
        let include = if config.include.is_empty() {
            None
        } else {
            Some(build_glob_set(&config.include)?)
        };
        Ok(Self {
            include,
            exclude: build_glob_set(&config.exclude)?,
        })
    }

    fn is_selected(&self, relative: &str) -> bool {
        self.include
            .as_ref()
            .is_none_or(|include| include.is_match(relative))
            && !self.exclude.is_match(relative)
    }
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .with_context(|| format!("Invalid file pattern '{}'", pattern))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsscope_core::semantic::ScopeKind;
    use std::fs::File;
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        fs::write(path, content).unwrap();
    }

    #[test]
    fn discover_files_finds_single_js_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.js");
        File::create(&file_path).unwrap();

        let files = discover_files(&file_path, &Config::default()).unwrap();

        assert_eq!(files, vec![file_path]);
    }

    #[test]
    fn discover_files_ignores_unsupported_extensions() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("test.js")).unwrap();
        File::create(dir.path().join("readme.md")).unwrap();
        File::create(dir.path().join("config.json")).unwrap();

        let files = discover_files(dir.path(), &Config::default()).unwrap();

        assert_eq!(files.len(), 1);
    }

    #[test]
    fn discover_files_skips_hidden_and_node_modules() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".cache")).unwrap();
        fs::create_dir(dir.path().join("node_modules")).unwrap();
        File::create(dir.path().join(".cache/hidden.js")).unwrap();
        File::create(dir.path().join("node_modules/dep.js")).unwrap();
        File::create(dir.path().join("visible.js")).unwrap();

        let files = discover_files(dir.path(), &Config::default()).unwrap();

        assert_eq!(files, vec![dir.path().join("visible.js")]);
    }

    #[test]
    fn discover_files_applies_include_and_exclude() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/generated")).unwrap();
        fs::create_dir(dir.path().join("scripts")).unwrap();
        File::create(dir.path().join("src/app.ts")).unwrap();
        File::create(dir.path().join("src/generated/api.ts")).unwrap();
        File::create(dir.path().join("scripts/build.js")).unwrap();

        let config = Config {
            include: vec!["src/**".to_string()],
            exclude: vec!["**/generated/**".to_string()],
            ..Default::default()
        };
        let files = discover_files(dir.path(), &config).unwrap();

        assert_eq!(files, vec![dir.path().join("src/app.ts")]);
    }

    #[test]
    fn discover_files_errors_on_missing_path() {
        let dir = tempdir().unwrap();

        let result = discover_files(&dir.path().join("missing"), &Config::default());

        assert!(result.is_err());
    }

    fn selector(include: &[&str], exclude: &[&str]) -> FileSelector {
        let config = Config {
            include: include.iter().map(|p| p.to_string()).collect(),
            exclude: exclude.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        };
        FileSelector::new(&config).unwrap()
    }

    #[test]
    fn include_patterns_match_relative_paths() {
        let selector = selector(&["src/**", "**/*.test.ts", "dist/*.js", "lib/?.js"], &[]);

        assert!(selector.is_selected("src/a/b.ts"));
        assert!(selector.is_selected("test/util.test.ts"));
        assert!(selector.is_selected("util.test.ts"));
        assert!(selector.is_selected("dist/main.js"));
        assert!(selector.is_selected("lib/a.js"));
        assert!(!selector.is_selected("dist/nested/main.js"));
        assert!(!selector.is_selected("test/a.ts"));
        assert!(!selector.is_selected("main.js"));
    }

    #[test]
    fn exclude_patterns_win_over_include() {
        let selector = selector(&["src/**"], &["**/generated/**"]);

        assert!(selector.is_selected("src/app.ts"));
        assert!(!selector.is_selected("src/generated/api.ts"));
    }

    #[test]
    fn repeated_wildcards_do_not_backtrack() {
        let selector = selector(&[], &["*a*a*a*a*a*a*a*a*a*a*b"]);
        let long_name = "a".repeat(200);

        assert!(selector.is_selected(&long_name));
        assert!(!selector.is_selected(&format!("{}b", long_name)));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let config = Config {
            include: vec!["src/[".to_string()],
            ..Default::default()
        };

        let err = FileSelector::new(&config).err().unwrap();

        assert!(err.to_string().contains("src/["));
    }

    #[test]
    fn analyze_file_lists_user_symbols_with_locations() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("app.js");
        write(&file_path, "function greet(name) {\n  const message = name;\n}\n");

        let result = analyze_file(&file_path, &BuildOptions::default(), &SymbolFilter::default());

        assert!(result.is_analyzed());
        assert!(result.errors.is_empty());
        let names: Vec<&str> = result.symbols.iter().map(|s| s.symbol.name.as_str()).collect();
        assert_eq!(names, vec!["greet", "name", "message"]);

        let message = &result.symbols[2];
        assert_eq!(message.scope_kind, ScopeKind::Function);
        assert_eq!((message.line, message.column), (Some(2), Some(9)));
        assert_eq!(result.scopes.len(), 2);
    }

    #[test]
    fn analyze_file_filters_by_kind_and_name() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("app.js");
        write(
            &file_path,
            "let a = 1;\nfunction f(a, b) { let c = a; }\nconst d = (a) => a;\n",
        );

        let by_kind = SymbolFilter {
            kind: Some(SymbolKind::Parameter),
            ..Default::default()
        };
        let result = analyze_file(&file_path, &BuildOptions::default(), &by_kind);
        let names: Vec<&str> = result.symbols.iter().map(|s| s.symbol.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "a"]);

        let by_name_and_kind = SymbolFilter {
            kind: Some(SymbolKind::LetVariable),
            name: Some("a".to_string()),
            built_ins: false,
        };
        let result = analyze_file(&file_path, &BuildOptions::default(), &by_name_and_kind);
        assert_eq!(result.symbols.len(), 1);
        assert_eq!(result.symbols[0].scope_kind, ScopeKind::Global);
    }

    #[test]
    fn analyze_file_includes_built_ins_on_request() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("app.js");
        write(&file_path, "function f() {}\n");

        let filter = SymbolFilter {
            name: Some("arguments".to_string()),
            built_ins: true,
            ..Default::default()
        };
        let result = analyze_file(&file_path, &BuildOptions::default(), &filter);

        assert_eq!(result.symbols.len(), 1);
        assert!(result.symbols[0].symbol.built_in);
        assert_eq!(result.symbols[0].line, None);
    }

    #[test]
    fn analyze_file_reports_fatal_parse_errors() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("broken.js");
        write(&file_path, "function {");

        let result = analyze_file(&file_path, &BuildOptions::default(), &SymbolFilter::default());

        assert!(!result.is_analyzed());
        assert!(!result.errors.is_empty());
        assert!(result.symbols.is_empty());
    }

    #[test]
    fn invalid_kind_is_rejected() {
        let args = SymbolsArgs {
            path: PathBuf::from("."),
            format: OutputFormat::Pretty,
            kind: Some("variable-ish".to_string()),
            name: None,
            built_ins: false,
            no_color: true,
        };

        let err = args.filter().unwrap_err();

        assert!(err.to_string().contains("let-variable"));
    }

    #[test]
    fn symbols_runs_on_directory() {
        let dir = tempdir().unwrap();
        write(&dir.path().join("a.js"), "var x = 1;\n");
        write(&dir.path().join("b.ts"), "type T = string;\n");

        let args = SymbolsArgs {
            path: dir.path().to_path_buf(),
            format: OutputFormat::Json,
            kind: None,
            name: None,
            built_ins: false,
            no_color: true,
        };

        assert!(args.run().is_ok());
    }

    #[test]
    fn symbols_fails_when_a_file_cannot_be_parsed() {
        let dir = tempdir().unwrap();
        write(&dir.path().join("broken.js"), "function {");

        let args = SymbolsArgs {
            path: dir.path().to_path_buf(),
            format: OutputFormat::Json,
            kind: None,
            name: None,
            built_ins: false,
            no_color: true,
        };

        assert!(args.run().is_err());
    }
}
