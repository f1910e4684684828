//! Semantic analysis module
//!
//! Provides the scope graph, the symbol registry, and the visitor that
//! builds them from an AST.

pub mod globals;
pub mod model;
pub mod report;
pub mod scope;
pub mod symbol;
pub mod tree;
pub mod visitor;

pub use globals::Environment;
pub use model::{ModelError, SymbolModel, SymbolModelBuilder};
pub use report::{ModelReport, ScopeReport, SymbolReport};
pub use scope::{AncestorIter, Scope, ScopeId, ScopeKind, ScopeTree};
pub use symbol::{Symbol, SymbolId, SymbolKind};
pub use tree::{NodeId, NodeIdGenerator, ScopeNode};
pub use visitor::{BuildOptions, SymbolVisitor};
