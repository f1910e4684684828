//! Stable identity handles for syntax-tree nodes
//!
//! Scopes are keyed by the node that opened them. Spans are not unique
//! enough for that (a function and its body block can share one), so the
//! scope-building visitor hands out an opaque [`NodeId`] per scope-opening
//! node instead. [`ScopeNode`] maps an AST node back to its scope once the
//! model is built.

use std::fmt;

use serde::Serialize;
use swc_common::Span;
use swc_ecma_ast::{
    ArrowExpr, BlockStmt, CatchClause, Class, Constructor, ForInStmt, ForOfStmt, ForStmt,
    Function, GetterProp, Module, SetterProp, StaticBlock, SwitchStmt,
};

use super::scope::ScopeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic source of fresh [`NodeId`]s for one traversal.
#[derive(Debug, Default)]
pub struct NodeIdGenerator {
    next: u32,
}

impl NodeIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}

/// An AST node that opens a scope of kind [`ScopeNode::KIND`].
///
/// A function body is part of its function's scope, so a `BlockStmt` only
/// resolves when it stands on its own as a statement.
pub trait ScopeNode {
    const KIND: ScopeKind;

    fn scope_span(&self) -> Span;
}

macro_rules! impl_scope_node {
    ($($node:ty => $kind:ident),* $(,)?) => {
        $(
            impl ScopeNode for $node {
                const KIND: ScopeKind = ScopeKind::$kind;

                fn scope_span(&self) -> Span {
                    self.span
                }
            }
        )*
    };
}

impl_scope_node! {
    Module => Global,
    Function => Function,
    Constructor => Function,
    GetterProp => Function,
    SetterProp => Function,
    ArrowExpr => ArrowFunction,
    BlockStmt => Block,
    ForStmt => For,
    ForInStmt => For,
    ForOfStmt => For,
    SwitchStmt => Switch,
    CatchClause => Catch,
    Class => Class,
    StaticBlock => StaticBlock,
}
