//! Serializable snapshot of a [`SymbolModel`]
//!
//! Used by the CLI output formats and by snapshot tests.

use serde::Serialize;

use super::model::SymbolModel;
use super::scope::ScopeKind;
use super::symbol::{Symbol, SymbolKind};
use super::tree::NodeId;

#[derive(Debug, Clone, Serialize)]
pub struct ScopeReport {
    pub id: usize,
    pub kind: ScopeKind,
    pub tree: NodeId,
    pub parent: Option<usize>,
    pub symbols: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SymbolReport {
    pub name: String,
    pub kind: SymbolKind,
    pub built_in: bool,
    pub scope: usize,
}

impl From<&Symbol> for SymbolReport {
    fn from(symbol: &Symbol) -> Self {
        Self {
            name: symbol.name().to_string(),
            kind: symbol.kind(),
            built_in: symbol.is_built_in(),
            scope: symbol.scope().index(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelReport {
    pub scopes: Vec<ScopeReport>,
    pub symbols: Vec<SymbolReport>,
}

impl ModelReport {
    /// Snapshot of `model`. Built-in symbols are left out unless
    /// `include_built_ins` is set.
    pub fn new(model: &SymbolModel, include_built_ins: bool) -> Self {
        let keep = |symbol: &Symbol| include_built_ins || !symbol.is_built_in();

        let scopes = model
            .scopes()
            .map(|scope| {
                let mut symbols: Vec<String> = scope
                    .symbols()
                    .map(|(_, id)| model.symbol(id))
                    .filter(|s| keep(s))
                    .map(|s| s.name().to_string())
                    .collect();
                symbols.sort();
                ScopeReport {
                    id: scope.id.index(),
                    kind: scope.kind,
                    tree: scope.tree(),
                    parent: scope.parent.map(|p| p.index()),
                    symbols,
                }
            })
            .collect();

        let symbols = model
            .symbols()
            .filter(|s| keep(s))
            .map(SymbolReport::from)
            .collect();

        Self { scopes, symbols }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::model::SymbolModelBuilder;
    use crate::semantic::scope::ScopeKind;
    use crate::semantic::tree::NodeId;
    use swc_common::DUMMY_SP;

    fn sample_model() -> SymbolModel {
        let mut builder = SymbolModelBuilder::new();
        let global = builder
            .add_scope(ScopeKind::Global, NodeId::from_raw(0), None, DUMMY_SP)
            .unwrap();
        let func = builder
            .add_scope(ScopeKind::Function, NodeId::from_raw(1), Some(global), DUMMY_SP)
            .unwrap();
        builder
            .declare_built_in_symbol("eval", SymbolKind::Function, global)
            .unwrap();
        builder
            .declare_symbol("main", SymbolKind::Function, global, DUMMY_SP)
            .unwrap();
        builder
            .declare_symbol("argv", SymbolKind::Parameter, func, DUMMY_SP)
            .unwrap();
        builder.finish().unwrap()
    }

    #[test]
    fn built_ins_are_filtered_by_default() {
        let report = ModelReport::new(&sample_model(), false);

        let names: Vec<&str> = report.symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["main", "argv"]);
        assert_eq!(report.scopes[0].symbols, vec!["main"]);
        assert_eq!(report.scopes[1].parent, Some(report.scopes[0].id));
    }

    #[test]
    fn built_ins_can_be_included() {
        let report = ModelReport::new(&sample_model(), true);

        assert_eq!(report.symbols.len(), 3);
        assert!(report.symbols[0].built_in);
        assert_eq!(report.scopes[0].symbols, vec!["eval", "main"]);
    }

    #[test]
    fn json_uses_kebab_case_kinds() {
        let report = ModelReport::new(&sample_model(), false);
        let json = serde_json::to_string_pretty(&report).unwrap();

        assert!(json.contains("\"kind\": \"function\""));
        assert!(json.contains("\"kind\": \"parameter\""));
        assert!(json.contains("\"built_in\": false"));
    }
}
