//! CLI routing and command dispatch.

use crate::core::paths::ForgePaths;
use crate::models::config::ForgeConfig;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod credential;
pub mod generate;
pub mod init;

/// Shared context passed to all command handlers.
pub struct CliContext {
    pub paths: ForgePaths,
    pub config: ForgeConfig,
    pub non_interactive: bool,
    pub config_load_warning: Option<String>,
}

#[derive(Parser, Debug)]
#[command(name = "passforge", version, about = "Password generator with an encrypted credential store")]
pub struct Cli {
    /// Store root directory (default: auto-detect or user data dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// Run in non-interactive mode (no prompts, suitable for automation)
    #[arg(long, global = true, env = "PASSFORGE_NON_INTERACTIVE")]
    pub non_interactive: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let paths = ForgePaths::resolve(self.root)?;

        // Load config if it exists (best-effort). A broken config should
        // not block read-only commands; the warning is surfaced instead.
        let mut config_load_warning: Option<String> = None;
        let config = if paths.config_toml.exists() {
            match crate::core::config_io::load(&paths.config_toml) {
                Ok(config) => config,
                Err(e) => {
                    config_load_warning = Some(format!("cannot read forge.toml: {}", e));
                    ForgeConfig::default()
                }
            }
        } else {
            ForgeConfig::default()
        };

        let ctx = CliContext {
            paths,
            config,
            non_interactive: self.non_interactive,
            config_load_warning,
        };

        if let Some(warning) = &ctx.config_load_warning {
            eprintln!("warning: {}", warning);
        }

        match self.command {
            Commands::Init(args) => init::run(&ctx, args),
            Commands::Generate(args) => generate::run(&ctx, args),
            Commands::Save(args) => credential::run_save(&ctx, args),
            Commands::Get(args) => credential::run_get(&ctx, args),
            Commands::List(args) => credential::run_list(&ctx, args),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the store directory and config
    Init(init::InitArgs),
    /// Generate a random password, optionally saving it
    Generate(generate::GenerateArgs),
    /// Encrypt and store a provided secret
    Save(credential::SaveArgs),
    /// Decrypt and print a stored password
    Get(credential::GetArgs),
    /// List stored credentials (metadata only)
    List(credential::ListArgs),
}
