//! jsscope CLI - inspect the scope and symbol model of JavaScript/TypeScript files

mod commands;
mod logging;
mod output;

use std::path::PathBuf;

use clap::Parser;
use commands::Commands;
use logging::LogLevel;

#[derive(Parser, Debug)]
#[command(
    name = "jsscope",
    author,
    version,
    about = "Scope and symbol model explorer for JavaScript/TypeScript",
    long_about = "jsscope builds the lexical scope graph and symbol registry of JavaScript and\n\
                  TypeScript files and prints the declared symbols.\n\n\
                  Configure logging with --log-level, --log-file and --log-json."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        long,
        global = true,
        value_enum,
        default_value = "warn",
        help = "Set the log level"
    )]
    pub log_level: LogLevel,

    #[arg(long, global = true, help = "Write logs to the specified file")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Output logs in JSON format")]
    pub log_json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init_logging(&cli);

    match cli.command {
        Commands::Symbols(args) => args.run(),
        Commands::Init(args) => args.run(),
    }
}
