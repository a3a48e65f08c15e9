//! savectl - restaurant saves and boards from the command line
//!
//! - `serve`: run the HTTP API over PostgreSQL or memory
//! - `tap`, `state`, `sheet`, `remove`: bookmark a restaurant and manage its boards
//! - `boards`: list and create boards
//! - `config`: inspect ~/.savectl/config.toml

use anyhow::Result;
use clap::{Parser, Subcommand};

use savectl_core::SavectlConfig;

mod commands;
mod tracing_setup;

use commands::boards::BoardsArgs;
use commands::client::{ClientOptions, OutputFormat};
use commands::config::ConfigArgs;
use commands::saves::{RemoveArgs, SheetArgs, StateArgs, TapArgs};
use commands::serve::ServeArgs;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "savectl",
    author,
    version,
    about = "Save restaurants to Quick Saves and custom boards",
    long_about = "One-tap bookmarking with Quick Saves, plus explicit multi-board selection. \
                  Every command re-reads state from the server; nothing is cached locally."
)]
struct Cli {
    /// API endpoint (default: [client].endpoint or http://127.0.0.1:3030)
    #[arg(long, env = "SAVECTL_ENDPOINT", global = true)]
    endpoint: Option<String>,

    /// Acting user ID
    #[arg(long, env = "SAVECTL_USER", global = true)]
    user: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Output format
    #[arg(long, short, value_enum, default_value = "human", global = true)]
    output: OutputFormat,

    /// Shorthand for --output json
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(ServeArgs),
    /// Board operations (list, create)
    Boards(BoardsArgs),
    /// Show whether a restaurant is saved
    State(StateArgs),
    /// Tap the bookmark: save to or remove from Quick Saves
    Tap(TapArgs),
    /// Show the membership sheet, or add to boards with --board
    Sheet(SheetArgs),
    /// Remove a restaurant from one board
    Remove(RemoveArgs),
    /// Manage savectl configuration (path, show, init)
    Config(ConfigArgs),
}

impl Cli {
    fn client_options(&self) -> ClientOptions {
        ClientOptions {
            endpoint: self.endpoint.clone(),
            user: self.user.clone(),
            format: if self.json {
                OutputFormat::Json
            } else {
                self.output
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // A broken config file must not block `config init --force`
    let loaded = SavectlConfig::load();
    let level = loaded.as_ref().ok().and_then(|c| c.log_level.clone());
    tracing_setup::init_tracing(&TracingConfig {
        debug: cli.debug,
        level,
    })
    .ok();

    let options = cli.client_options();
    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, &loaded?).await?,
        Commands::Boards(args) => commands::run_boards(args, &options).await?,
        Commands::State(args) => commands::run_state(args, &options).await?,
        Commands::Tap(args) => commands::run_tap(args, &options).await?,
        Commands::Sheet(args) => commands::run_sheet(args, &options).await?,
        Commands::Remove(args) => commands::run_remove(args, &options).await?,
        Commands::Config(args) => commands::run_config(args, options.format)?,
    }
    Ok(())
}
