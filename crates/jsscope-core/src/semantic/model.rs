//! Symbol registry
//!
//! [`SymbolModelBuilder`] is the single writer: a scope-building traversal
//! registers scopes and declares names through it. [`SymbolModelBuilder::finish`]
//! consumes the builder and yields a [`SymbolModel`], the read-only view that
//! downstream analyses query.

use std::collections::HashMap;

use id_arena::Arena;
use swc_common::{BytePos, DUMMY_SP, Span};
use tracing::{debug, trace};

use super::scope::{AncestorIter, Scope, ScopeId, ScopeKind, ScopeTree};
use super::symbol::{Symbol, SymbolId, SymbolKind};
use super::tree::{NodeId, ScopeNode};

/// Contract violations by the code driving the builder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("no scope has been registered")]
    NoScopes,
    #[error("scope {index} is not registered in this model")]
    UnknownScope { index: usize },
    #[error("tree node {tree} already opened a scope")]
    DuplicateTree { tree: NodeId },
    #[error("'{name}' is already declared in the scope of tree node {tree}")]
    DuplicateSymbol { name: String, tree: NodeId },
}

#[derive(Default)]
struct SymbolIndex {
    by_kind: HashMap<SymbolKind, Vec<SymbolId>>,
    by_name: HashMap<String, Vec<SymbolId>>,
}

impl SymbolIndex {
    fn record(&mut self, symbol: &Symbol) {
        self.by_kind.entry(symbol.kind()).or_default().push(symbol.id());
        self.by_name
            .entry(symbol.name().to_string())
            .or_default()
            .push(symbol.id());
    }
}

pub struct SymbolModelBuilder {
    scopes: ScopeTree,
    symbols: Arena<Symbol>,
    index: SymbolIndex,
}

impl Default for SymbolModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolModelBuilder {
    pub fn new() -> Self {
        Self {
            scopes: ScopeTree::new(),
            symbols: Arena::new(),
            index: SymbolIndex::default(),
        }
    }

    /// Registers a scope opened by `tree`. The first scope registered becomes
    /// the global scope.
    pub fn add_scope(
        &mut self,
        kind: ScopeKind,
        tree: NodeId,
        parent: Option<ScopeId>,
        span: Span,
    ) -> Result<ScopeId, ModelError> {
        let id = self.scopes.create_scope(kind, tree, parent, span)?;
        trace!(scope = id.index(), kind = kind.as_str(), %tree, "registered scope");
        Ok(id)
    }

    pub fn global_scope(&self) -> Result<ScopeId, ModelError> {
        self.scopes.root().ok_or(ModelError::NoScopes)
    }

    /// Declares `name` directly in `scope`.
    ///
    /// If `scope` already holds a symbol with that name, it is returned
    /// unchanged and `kind` is ignored.
    pub fn declare_symbol(
        &mut self,
        name: &str,
        kind: SymbolKind,
        scope: ScopeId,
        span: Span,
    ) -> Result<SymbolId, ModelError> {
        self.declare(name, kind, scope, span, false)
    }

    /// Like [`declare_symbol`](Self::declare_symbol), but a newly created
    /// symbol is flagged built-in. An existing symbol keeps its flag.
    pub fn declare_built_in_symbol(
        &mut self,
        name: &str,
        kind: SymbolKind,
        scope: ScopeId,
    ) -> Result<SymbolId, ModelError> {
        self.declare(name, kind, scope, DUMMY_SP, true)
    }

    fn declare(
        &mut self,
        name: &str,
        kind: SymbolKind,
        scope: ScopeId,
        span: Span,
        built_in: bool,
    ) -> Result<SymbolId, ModelError> {
        if let Some(existing) = self.scopes.try_get(scope)?.get_symbol(name) {
            return Ok(existing);
        }

        let id = self.symbols.alloc_with_id(|id| {
            let mut symbol = Symbol::new(id, name, kind, scope, span);
            if built_in {
                symbol.mark_built_in();
            }
            symbol
        });
        self.scopes.try_get_mut(scope)?.add_symbol(name, id)?;
        self.index.record(&self.symbols[id]);

        trace!(
            symbol = name,
            kind = kind.as_str(),
            built_in,
            scope = scope.index(),
            "declared symbol"
        );
        Ok(id)
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        self.scopes.get(id)
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id]
    }

    pub fn ancestors(&self, id: ScopeId) -> AncestorIter<'_> {
        self.scopes.ancestors(id)
    }

    /// Freezes the model. Fails if no scope was ever registered.
    pub fn finish(self) -> Result<SymbolModel, ModelError> {
        let global = self.global_scope()?;
        debug!(
            scopes = self.scopes.len(),
            symbols = self.symbols.len(),
            "symbol model finished"
        );
        Ok(SymbolModel {
            scopes: self.scopes,
            symbols: self.symbols,
            index: self.index,
            global,
        })
    }
}

/// Read-only scope graph and symbol table.
pub struct SymbolModel {
    scopes: ScopeTree,
    symbols: Arena<Symbol>,
    index: SymbolIndex,
    global: ScopeId,
}

impl SymbolModel {
    pub fn global_scope(&self) -> &Scope {
        self.scopes.get(self.global)
    }

    /// All scopes in registration order.
    pub fn scopes(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter()
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        self.scopes.get(id)
    }

    pub fn scope_for_tree(&self, tree: NodeId) -> Option<&Scope> {
        self.scopes.by_tree(tree)
    }

    /// Scope that `node` opened while the model was built, if it opened one.
    pub fn scope_for_node<N: ScopeNode>(&self, node: &N) -> Option<&Scope> {
        self.scopes.by_node(N::KIND, node.scope_span())
    }

    /// Deepest scope whose span contains `pos`, or the global scope.
    pub fn innermost_scope_at(&self, pos: BytePos) -> &Scope {
        let mut current = self.global_scope();
        while let Some(child) = self
            .scopes
            .children(current.id)
            .find(|child| child.contains(pos))
        {
            current = child;
        }
        current
    }

    pub fn parent(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.parent(id)
    }

    pub fn children(&self, id: ScopeId) -> impl Iterator<Item = &Scope> {
        self.scopes.children(id)
    }

    pub fn ancestors(&self, id: ScopeId) -> AncestorIter<'_> {
        self.scopes.ancestors(id)
    }

    pub fn is_descendant_of(&self, scope: ScopeId, ancestor: ScopeId) -> bool {
        self.scopes.is_descendant_of(scope, ancestor)
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id]
    }

    /// Every declared symbol, in declaration order.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().map(|(_, s)| s)
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn symbols_of_kind(&self, kind: SymbolKind) -> impl Iterator<Item = &Symbol> {
        self.index
            .by_kind
            .get(&kind)
            .into_iter()
            .flat_map(move |ids| ids.iter().map(move |&id| &self.symbols[id]))
    }

    /// Symbols called `name` in any scope.
    pub fn symbols_named(&self, name: &str) -> impl Iterator<Item = &Symbol> {
        self.index
            .by_name
            .get(name)
            .into_iter()
            .flat_map(move |ids| ids.iter().map(move |&id| &self.symbols[id]))
    }

    pub fn scope_of(&self, symbol: SymbolId) -> &Scope {
        self.scopes.get(self.symbols[symbol].scope())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::tree::NodeIdGenerator;
    use std::collections::HashSet;

    struct Fixture {
        ids: NodeIdGenerator,
        builder: SymbolModelBuilder,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                ids: NodeIdGenerator::new(),
                builder: SymbolModelBuilder::new(),
            }
        }

        fn scope(&mut self, kind: ScopeKind, parent: Option<ScopeId>) -> ScopeId {
            let tree = self.ids.next_id();
            self.builder.add_scope(kind, tree, parent, DUMMY_SP).unwrap()
        }
    }

    #[test]
    fn redeclaring_returns_the_same_symbol() {
        let mut f = Fixture::new();
        let global = f.scope(ScopeKind::Global, None);

        let first = f
            .builder
            .declare_symbol("foo", SymbolKind::Variable, global, DUMMY_SP)
            .unwrap();
        let second = f
            .builder
            .declare_symbol("foo", SymbolKind::Variable, global, DUMMY_SP)
            .unwrap();
        let third = f
            .builder
            .declare_symbol("foo", SymbolKind::Function, global, DUMMY_SP)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first, third);
        assert_eq!(f.builder.symbol(first).kind(), SymbolKind::Variable);

        let model = f.builder.finish().unwrap();
        assert_eq!(model.symbol_count(), 1);
        assert_eq!(model.symbols_of_kind(SymbolKind::Function).count(), 0);
    }

    #[test]
    fn same_name_in_different_scopes_is_distinct() {
        let mut f = Fixture::new();
        let global = f.scope(ScopeKind::Global, None);
        let block = f.scope(ScopeKind::Block, Some(global));

        let outer = f
            .builder
            .declare_symbol("x", SymbolKind::LetVariable, global, DUMMY_SP)
            .unwrap();
        let inner = f
            .builder
            .declare_symbol("x", SymbolKind::LetVariable, block, DUMMY_SP)
            .unwrap();

        assert_ne!(outer, inner);
        let model = f.builder.finish().unwrap();
        assert_eq!(model.symbols_named("x").count(), 2);
        assert_eq!(model.scope_of(outer).id, global);
        assert_eq!(model.scope_of(inner).id, block);
    }

    #[test]
    fn ordinary_then_built_in_keeps_flag_unset() {
        let mut f = Fixture::new();
        let global = f.scope(ScopeKind::Global, None);

        let ordinary = f
            .builder
            .declare_symbol("x", SymbolKind::Variable, global, DUMMY_SP)
            .unwrap();
        let again = f
            .builder
            .declare_built_in_symbol("x", SymbolKind::Variable, global)
            .unwrap();

        assert_eq!(ordinary, again);
        assert!(!f.builder.symbol(ordinary).is_built_in());
    }

    #[test]
    fn built_in_then_ordinary_keeps_flag_set() {
        let mut f = Fixture::new();
        let global = f.scope(ScopeKind::Global, None);

        let built_in = f
            .builder
            .declare_built_in_symbol("x", SymbolKind::Variable, global)
            .unwrap();
        let again = f
            .builder
            .declare_symbol("x", SymbolKind::Variable, global, DUMMY_SP)
            .unwrap();

        assert_eq!(built_in, again);
        assert!(f.builder.symbol(built_in).is_built_in());
    }

    #[test]
    fn global_scope_is_first_registered() {
        let mut f = Fixture::new();
        let global = f.scope(ScopeKind::Global, None);
        let child = f.scope(ScopeKind::Function, Some(global));
        f.scope(ScopeKind::Block, Some(child));
        f.scope(ScopeKind::Block, None);

        assert_eq!(f.builder.global_scope(), Ok(global));

        let model = f.builder.finish().unwrap();
        assert_eq!(model.global_scope().id, global);
        assert_eq!(model.scope_count(), 4);
    }

    #[test]
    fn scopes_contains_every_registered_scope() {
        let mut f = Fixture::new();
        let global = f.scope(ScopeKind::Global, None);
        let child = f.scope(ScopeKind::Function, Some(global));

        let model = f.builder.finish().unwrap();
        let scopes: HashSet<ScopeId> = model.scopes().map(|s| s.id).collect();

        assert_eq!(scopes, HashSet::from([global, child]));
        assert_eq!(model.global_scope().id, global);
    }

    #[test]
    fn global_scope_before_registration_is_an_error() {
        let builder = SymbolModelBuilder::new();
        assert_eq!(builder.global_scope(), Err(ModelError::NoScopes));
        assert!(matches!(builder.finish(), Err(ModelError::NoScopes)));
    }

    #[test]
    fn declaring_into_unregistered_scope_is_an_error() {
        let mut other = Fixture::new();
        let foreign = other.scope(ScopeKind::Global, None);

        let mut f = Fixture::new();
        f.scope(ScopeKind::Global, None);
        let err = f
            .builder
            .declare_symbol("x", SymbolKind::Variable, foreign, DUMMY_SP)
            .unwrap_err();
        assert!(matches!(err, ModelError::UnknownScope { .. }));

        let err = f
            .builder
            .declare_built_in_symbol("x", SymbolKind::Variable, foreign)
            .unwrap_err();
        assert!(matches!(err, ModelError::UnknownScope { .. }));

        let model = f.builder.finish().unwrap();
        assert_eq!(model.symbol_count(), 0);
    }

    #[test]
    fn kind_and_name_filters_match_full_scan() {
        let mut f = Fixture::new();
        let global = f.scope(ScopeKind::Global, None);
        let func = f.scope(ScopeKind::Function, Some(global));

        let decls = [
            ("a", SymbolKind::Variable, global),
            ("b", SymbolKind::Function, global),
            ("a", SymbolKind::Parameter, func),
            ("c", SymbolKind::Variable, func),
            ("b", SymbolKind::Variable, func),
        ];
        for (name, kind, scope) in decls {
            f.builder.declare_symbol(name, kind, scope, DUMMY_SP).unwrap();
        }
        f.builder
            .declare_built_in_symbol("eval", SymbolKind::Function, global)
            .unwrap();

        let model = f.builder.finish().unwrap();

        for kind in SymbolKind::ALL {
            let indexed: HashSet<SymbolId> =
                model.symbols_of_kind(kind).map(|s| s.id()).collect();
            let scanned: HashSet<SymbolId> = model
                .symbols()
                .filter(|s| s.kind() == kind)
                .map(|s| s.id())
                .collect();
            assert_eq!(indexed, scanned, "kind {kind}");
        }

        for name in ["a", "b", "c", "eval", "missing"] {
            let indexed: HashSet<SymbolId> =
                model.symbols_named(name).map(|s| s.id()).collect();
            let scanned: HashSet<SymbolId> = model
                .symbols()
                .filter(|s| s.name() == name)
                .map(|s| s.id())
                .collect();
            assert_eq!(indexed, scanned, "name {name}");
        }
    }

    #[test]
    fn every_symbol_is_reachable_through_its_scope_tree() {
        let mut f = Fixture::new();
        let global = f.scope(ScopeKind::Global, None);
        let func = f.scope(ScopeKind::Function, Some(global));
        let block = f.scope(ScopeKind::Block, Some(func));

        f.builder
            .declare_symbol("x", SymbolKind::Variable, global, DUMMY_SP)
            .unwrap();
        f.builder
            .declare_symbol("y", SymbolKind::Parameter, func, DUMMY_SP)
            .unwrap();
        f.builder
            .declare_symbol("x", SymbolKind::ConstVariable, block, DUMMY_SP)
            .unwrap();

        let model = f.builder.finish().unwrap();
        for symbol in model.symbols() {
            let declaring = model.scope(symbol.scope());
            let by_tree = model.scope_for_tree(declaring.tree()).unwrap();
            assert_eq!(by_tree.get_symbol(symbol.name()), Some(symbol.id()));
        }
    }

    #[test]
    fn innermost_scope_follows_spans() {
        let mut ids = NodeIdGenerator::new();
        let mut builder = SymbolModelBuilder::new();
        let span = |lo, hi| Span::new(BytePos(lo), BytePos(hi));
        let global = builder
            .add_scope(ScopeKind::Global, ids.next_id(), None, span(0, 100))
            .unwrap();
        let func = builder
            .add_scope(ScopeKind::Function, ids.next_id(), Some(global), span(10, 50))
            .unwrap();
        let block = builder
            .add_scope(ScopeKind::Block, ids.next_id(), Some(func), span(20, 30))
            .unwrap();

        let model = builder.finish().unwrap();
        assert_eq!(model.innermost_scope_at(BytePos(5)).id, global);
        assert_eq!(model.innermost_scope_at(BytePos(15)).id, func);
        assert_eq!(model.innermost_scope_at(BytePos(25)).id, block);
        assert_eq!(model.innermost_scope_at(BytePos(60)).id, global);
        assert_eq!(model.innermost_scope_at(BytePos(500)).id, global);
    }

    #[test]
    fn empty_name_is_accepted() {
        let mut f = Fixture::new();
        let global = f.scope(ScopeKind::Global, None);

        let id = f
            .builder
            .declare_symbol("", SymbolKind::Variable, global, DUMMY_SP)
            .unwrap();
        assert_eq!(f.builder.symbol(id).name(), "");
    }

    #[test]
    fn frozen_model_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SymbolModel>();
    }
}
