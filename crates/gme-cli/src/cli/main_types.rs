use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gme-cli")]
#[command(about = "Delete a Maps Engine table together with the layers and maps built on it")]
#[command(version)]
#[command(after_help = "Examples:
  gme-cli delete 0123-4567 --dry-run     # Show what would be deleted
  gme-cli delete 0123-4567               # Delete table, layers and maps
  gme-cli delete 0123-4567 --format json # Machine readable report
  gme-cli config show                    # Show current configuration
  gme-cli config validate                # Check the access token

Environment Variables:
  GME_ACCESS_TOKEN   OAuth2 access token (required for API calls)
  GME_URL            Maps Engine API base URL
  RUST_LOG           Log filter, overrides --verbose")]
pub struct Cli {
    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Custom configuration directory path
    #[arg(long, global = true)]
    pub config_dir: Option<String>,

    /// OAuth2 access token for the Maps Engine API
    #[arg(long, global = true, env = "GME_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Delete a table with every layer and map that depends on it
    Delete(DeleteArgs),
    /// Configuration management (show, set, validate)
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,
    /// Set configuration values
    #[command(after_help = "Examples:
  gme-cli config set --url https://www.googleapis.com/mapsengine/v1")]
    Set {
        /// Maps Engine API base URL
        #[arg(long, env = "GME_URL")]
        url: Option<String>,
    },
    /// Validate the access token against the configured endpoint
    Validate,
}

/// Arguments for the cascading delete
#[derive(Args, Debug)]
#[command(after_help = "Published layers and maps are never deleted; un-publish them first.
Maps that still show layers from other tables stop the whole run.
Nothing is rolled back: if a step fails, the assets deleted before it stay deleted.")]
pub struct DeleteArgs {
    /// ID of the table to delete
    pub table_id: String,

    /// Run every check and list what would be deleted without deleting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Output format: table or json
    #[arg(short, long, default_value = "table")]
    pub format: String,
}
