//! ftsync CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;
use ftsync_cli::{Cli, Command, commands, logging};
use ftsync_core::MappingConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = MappingConfig::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::debug!(entities = config.entities.len(), "mapping file loaded");

    let output = match &cli.command {
        Command::Check => commands::cmd_check(&config)?,
        Command::Mappings => commands::cmd_mappings(&config)?,
        Command::Ddl { entity } => commands::cmd_ddl(&config, entity.as_deref())?,
        Command::Migrate { entity } => {
            commands::cmd_migrate(&config, entity.as_deref()).await?
        }
    };
    println!("{output}");
    Ok(())
}
