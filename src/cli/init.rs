use crate::cli::CliContext;
use crate::constants;
use crate::core::config_io;
use crate::models::config::BackendKind;
use crate::util::fs as forge_fs;
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Persistence backend for credential records
    #[arg(long, value_enum)]
    pub backend: Option<CliBackend>,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum CliBackend {
    Json,
    Sqlite,
}

impl From<CliBackend> for BackendKind {
    fn from(value: CliBackend) -> Self {
        match value {
            CliBackend::Json => BackendKind::Json,
            CliBackend::Sqlite => BackendKind::Sqlite,
        }
    }
}

pub fn run(ctx: &CliContext, args: InitArgs) -> Result<()> {
    let paths = &ctx.paths;
    forge_fs::ensure_dir(&paths.root, constants::STORE_DIR_MODE)?;

    let mut config = config_io::load(&paths.config_toml)?;
    if let Some(backend) = args.backend {
        config.store.backend = backend.into();
    }
    config_io::save(&paths.config_toml, &config)?;

    println!("store initialized at {}", paths.root.display());
    println!("backend: {:?}", config.store.backend);
    Ok(())
}
