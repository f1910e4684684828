//! Built-in global names
//!
//! Names the language or the host environment provides without a
//! declaration in the analyzed source. They are declared built-in in the
//! global scope before any user code is visited.

use serde::Deserialize;

use super::symbol::SymbolKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Browser,
    Node,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Browser => "browser",
            Environment::Node => "node",
        }
    }

    pub fn globals(&self) -> &'static [(&'static str, SymbolKind)] {
        match self {
            Environment::Browser => BROWSER_GLOBALS,
            Environment::Node => NODE_GLOBALS,
        }
    }
}

pub const ECMASCRIPT_GLOBALS: &[(&str, SymbolKind)] = &[
    ("undefined", SymbolKind::Variable),
    ("NaN", SymbolKind::Variable),
    ("Infinity", SymbolKind::Variable),
    ("globalThis", SymbolKind::Variable),
    ("eval", SymbolKind::Function),
    ("isFinite", SymbolKind::Function),
    ("isNaN", SymbolKind::Function),
    ("parseFloat", SymbolKind::Function),
    ("parseInt", SymbolKind::Function),
    ("decodeURI", SymbolKind::Function),
    ("decodeURIComponent", SymbolKind::Function),
    ("encodeURI", SymbolKind::Function),
    ("encodeURIComponent", SymbolKind::Function),
    ("Object", SymbolKind::Class),
    ("Function", SymbolKind::Class),
    ("Array", SymbolKind::Class),
    ("String", SymbolKind::Class),
    ("Boolean", SymbolKind::Class),
    ("Number", SymbolKind::Class),
    ("BigInt", SymbolKind::Function),
    ("Symbol", SymbolKind::Function),
    ("Date", SymbolKind::Class),
    ("RegExp", SymbolKind::Class),
    ("Error", SymbolKind::Class),
    ("TypeError", SymbolKind::Class),
    ("RangeError", SymbolKind::Class),
    ("SyntaxError", SymbolKind::Class),
    ("ReferenceError", SymbolKind::Class),
    ("Map", SymbolKind::Class),
    ("Set", SymbolKind::Class),
    ("WeakMap", SymbolKind::Class),
    ("WeakSet", SymbolKind::Class),
    ("Promise", SymbolKind::Class),
    ("Proxy", SymbolKind::Class),
    ("ArrayBuffer", SymbolKind::Class),
    ("DataView", SymbolKind::Class),
    ("Uint8Array", SymbolKind::Class),
    ("Int32Array", SymbolKind::Class),
    ("Float64Array", SymbolKind::Class),
    ("Math", SymbolKind::Variable),
    ("JSON", SymbolKind::Variable),
    ("Reflect", SymbolKind::Variable),
    ("Intl", SymbolKind::Variable),
];

pub const BROWSER_GLOBALS: &[(&str, SymbolKind)] = &[
    ("window", SymbolKind::Variable),
    ("self", SymbolKind::Variable),
    ("document", SymbolKind::Variable),
    ("navigator", SymbolKind::Variable),
    ("location", SymbolKind::Variable),
    ("history", SymbolKind::Variable),
    ("localStorage", SymbolKind::Variable),
    ("sessionStorage", SymbolKind::Variable),
    ("console", SymbolKind::Variable),
    ("alert", SymbolKind::Function),
    ("confirm", SymbolKind::Function),
    ("fetch", SymbolKind::Function),
    ("setTimeout", SymbolKind::Function),
    ("clearTimeout", SymbolKind::Function),
    ("setInterval", SymbolKind::Function),
    ("clearInterval", SymbolKind::Function),
    ("requestAnimationFrame", SymbolKind::Function),
    ("XMLHttpRequest", SymbolKind::Class),
    ("Event", SymbolKind::Class),
    ("HTMLElement", SymbolKind::Class),
];

pub const NODE_GLOBALS: &[(&str, SymbolKind)] = &[
    ("global", SymbolKind::Variable),
    ("process", SymbolKind::Variable),
    ("console", SymbolKind::Variable),
    ("module", SymbolKind::Variable),
    ("exports", SymbolKind::Variable),
    ("__dirname", SymbolKind::Variable),
    ("__filename", SymbolKind::Variable),
    ("require", SymbolKind::Function),
    ("setTimeout", SymbolKind::Function),
    ("clearTimeout", SymbolKind::Function),
    ("setInterval", SymbolKind::Function),
    ("clearInterval", SymbolKind::Function),
    ("setImmediate", SymbolKind::Function),
    ("clearImmediate", SymbolKind::Function),
    ("Buffer", SymbolKind::Class),
];

/// Implicit binding available inside every non-arrow function.
pub const ARGUMENTS: &str = "arguments";
