//! Init command - writes a default jsscope configuration file

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use jsscope_core::config::CONFIG_FILENAME;
use std::fs;
use std::path::PathBuf;

const DEFAULT_CONFIG: &str = r#"# jsscope configuration file

# File patterns to include (all JavaScript/TypeScript files when empty)
# include = ["src/**"]

# File patterns to exclude
exclude = ["node_modules/**", "dist/**", "build/**"]

[globals]
# Host environments whose globals are declared as built-ins: "browser", "node"
environments = []

# Extra global names declared as built-in variables
names = []
"#;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Directory to write the configuration file into
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,
}

impl InitArgs {
    pub fn run(&self) -> Result<()> {
        let config_path = self.dir.join(CONFIG_FILENAME);

        if config_path.exists() && !self.force {
            anyhow::bail!(
                "Config file '{}' already exists. Use --force to overwrite.",
                config_path.display()
            );
        }

        fs::write(&config_path, DEFAULT_CONFIG)?;
        tracing::debug!(path = %config_path.display(), "wrote default config");
        println!(
            "{} Created {} configuration file",
            "✓".green().bold(),
            CONFIG_FILENAME.cyan()
        );
        Ok(())
    }
}
