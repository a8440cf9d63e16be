//! Argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// ftsync - keep PostgreSQL tsvector columns in sync with entity fields
#[derive(Parser, Debug)]
#[command(name = "ftsync")]
#[command(about = "Validate ftsync mappings and manage search vector columns", long_about = None)]
pub struct Cli {
    /// Mapping file path
    #[arg(short, long, global = true, default_value = "ftsync.toml", env = "FTSYNC_CONFIG")]
    pub config: PathBuf,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Validate every entity's search vector declarations
    Check,
    /// Print resolved mappings as JSON
    Mappings,
    /// Print ALTER TABLE / CREATE INDEX statements
    Ddl {
        /// Only this entity
        #[arg(short, long)]
        entity: Option<String>,
    },
    /// Apply the DDL to the configured database
    Migrate {
        /// Only this entity
        #[arg(short, long)]
        entity: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::parse_from(["ftsync", "check"]);
        assert_eq!(cli.config, PathBuf::from("ftsync.toml"));
        assert!(!cli.verbose);
        assert_eq!(cli.command, Command::Check);
    }

    #[test]
    fn test_parse_ddl_with_entity() {
        let cli = Cli::parse_from([
            "ftsync", "-c", "blog.toml", "ddl", "--entity", "Article", "-v",
        ]);
        assert_eq!(cli.config, PathBuf::from("blog.toml"));
        assert!(cli.verbose);
        assert_eq!(
            cli.command,
            Command::Ddl {
                entity: Some("Article".to_string())
            }
        );
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
