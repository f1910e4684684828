//! Lexical scope graph
//!
//! This module provides the scope tree: nested program scopes (global,
//! function, block, ...) each keyed by the syntax-tree node that opened it
//! and each owning the table of names declared directly inside it.

use std::collections::HashMap;

use id_arena::{Arena, Id};
use serde::Serialize;
use swc_common::{BytePos, DUMMY_SP, Span};

use super::model::ModelError;
use super::symbol::SymbolId;
use super::tree::NodeId;

pub type ScopeId = Id<Scope>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScopeKind {
    Global,
    Function,
    ArrowFunction,
    Block,
    For,
    Switch,
    Catch,
    Class,
    StaticBlock,
}

impl ScopeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeKind::Global => "global",
            ScopeKind::Function => "function",
            ScopeKind::ArrowFunction => "arrow-function",
            ScopeKind::Block => "block",
            ScopeKind::For => "for",
            ScopeKind::Switch => "switch",
            ScopeKind::Catch => "catch",
            ScopeKind::Class => "class",
            ScopeKind::StaticBlock => "static-block",
        }
    }

    /// Whether `var` and function declarations hoist to this scope.
    pub fn is_hoisting_target(&self) -> bool {
        matches!(
            self,
            ScopeKind::Global
                | ScopeKind::Function
                | ScopeKind::ArrowFunction
                | ScopeKind::StaticBlock
        )
    }
}

#[derive(Debug)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    pub span: Span,
    tree: NodeId,
    symbols: HashMap<String, SymbolId>,
}

impl Scope {
    /// Identity key of the node that opened this scope.
    pub fn tree(&self) -> NodeId {
        self.tree
    }

    /// Looks `name` up among this scope's own declarations only.
    pub fn get_symbol(&self, name: &str) -> Option<SymbolId> {
        self.symbols.get(name).copied()
    }

    pub fn symbols(&self) -> impl Iterator<Item = (&str, SymbolId)> {
        self.symbols.iter().map(|(name, &id)| (name.as_str(), id))
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn contains(&self, pos: BytePos) -> bool {
        self.span.lo <= pos && pos < self.span.hi
    }

    pub(crate) fn add_symbol(&mut self, name: &str, id: SymbolId) -> Result<(), ModelError> {
        if self.symbols.contains_key(name) {
            return Err(ModelError::DuplicateSymbol {
                name: name.to_string(),
                tree: self.tree,
            });
        }
        self.symbols.insert(name.to_string(), id);
        Ok(())
    }
}

pub struct ScopeTree {
    arena: Arena<Scope>,
    root: Option<ScopeId>,
    by_tree: HashMap<NodeId, ScopeId>,
    by_node: HashMap<(ScopeKind, Span), ScopeId>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            by_tree: HashMap::new(),
            by_node: HashMap::new(),
        }
    }

    /// Registers a new scope. The first scope ever created becomes the root.
    pub fn create_scope(
        &mut self,
        kind: ScopeKind,
        tree: NodeId,
        parent: Option<ScopeId>,
        span: Span,
    ) -> Result<ScopeId, ModelError> {
        if let Some(parent_id) = parent {
            self.try_get(parent_id)?;
        }
        if self.by_tree.contains_key(&tree) {
            return Err(ModelError::DuplicateTree { tree });
        }

        let id = self.arena.alloc_with_id(|id| Scope {
            id,
            kind,
            parent,
            children: Vec::new(),
            span,
            tree,
            symbols: HashMap::new(),
        });

        if let Some(parent_id) = parent {
            self.arena[parent_id].children.push(id);
        }

        if self.root.is_none() {
            self.root = Some(id);
        }

        self.by_tree.insert(tree, id);
        // Synthesized nodes carry no position and cannot be told apart.
        if span != DUMMY_SP {
            self.by_node.entry((kind, span)).or_insert(id);
        }

        Ok(id)
    }

    pub fn root(&self) -> Option<ScopeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }

    /// Returns the scope, or `UnknownScope` when `id` comes from another tree.
    pub fn try_get(&self, id: ScopeId) -> Result<&Scope, ModelError> {
        self.arena.get(id).ok_or(ModelError::UnknownScope {
            index: id.index(),
        })
    }

    pub(crate) fn try_get_mut(&mut self, id: ScopeId) -> Result<&mut Scope, ModelError> {
        self.arena.get_mut(id).ok_or(ModelError::UnknownScope {
            index: id.index(),
        })
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.arena[id]
    }

    pub fn by_tree(&self, tree: NodeId) -> Option<&Scope> {
        self.by_tree.get(&tree).map(|&id| &self.arena[id])
    }

    /// Scope opened by a `kind` node located at `span`.
    pub fn by_node(&self, kind: ScopeKind, span: Span) -> Option<&Scope> {
        self.by_node.get(&(kind, span)).map(|&id| &self.arena[id])
    }

    /// All scopes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Scope> {
        self.arena.iter().map(|(_, scope)| scope)
    }

    pub fn parent(&self, id: ScopeId) -> Option<&Scope> {
        self.arena[id].parent.map(|p| &self.arena[p])
    }

    pub fn children(&self, id: ScopeId) -> impl Iterator<Item = &Scope> {
        self.arena[id].children.iter().map(|&c| &self.arena[c])
    }

    pub fn ancestors(&self, id: ScopeId) -> AncestorIter<'_> {
        AncestorIter {
            tree: self,
            current: Some(id),
        }
    }

    pub fn is_descendant_of(&self, scope: ScopeId, ancestor: ScopeId) -> bool {
        self.ancestors(scope).any(|s| s.id == ancestor)
    }
}

pub struct AncestorIter<'a> {
    tree: &'a ScopeTree,
    current: Option<ScopeId>,
}

impl<'a> Iterator for AncestorIter<'a> {
    type Item = &'a Scope;

    fn next(&mut self) -> Option<Self::Item> {
        let current_id = self.current?;
        let scope = &self.tree.arena[current_id];
        self.current = scope.parent;
        Some(scope)
    }
}
