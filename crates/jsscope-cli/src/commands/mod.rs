//! CLI command implementations

pub mod init;
pub mod symbols;

pub use init::InitArgs;
pub use symbols::SymbolsArgs;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the symbols declared in JavaScript/TypeScript files
    Symbols(SymbolsArgs),

    /// Initialize jsscope configuration in a directory
    Init(InitArgs),
}
