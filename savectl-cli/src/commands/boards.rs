//! `savectl boards` - list and create boards

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use savectl_core::Board;

use super::client::{print_json, Api, ClientOptions, OutputFormat};

#[derive(Parser, Debug)]
pub struct BoardsArgs {
    #[command(subcommand)]
    pub command: BoardsCommands,
}

#[derive(Subcommand, Debug)]
pub enum BoardsCommands {
    /// List your boards (Quick Saves first once it exists)
    List,
    /// Create a custom board
    Create(CreateArgs),
}

#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// Board title (1-64 characters)
    pub title: String,

    /// Who can see the board
    #[arg(long, value_enum, default_value = "private")]
    pub visibility: VisibilityArg,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum VisibilityArg {
    Private,
    Public,
}

impl VisibilityArg {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Public => "public",
        }
    }
}

#[derive(Serialize)]
struct CreateBoardRequest<'a> {
    title: &'a str,
    visibility: &'a str,
}

pub async fn run_boards(args: BoardsArgs, options: &ClientOptions) -> Result<()> {
    let api = Api::connect(options)?;
    match args.command {
        BoardsCommands::List => run_list(&api, options.format).await,
        BoardsCommands::Create(args) => run_create(&api, args, options.format).await,
    }
}

async fn run_list(api: &Api, format: OutputFormat) -> Result<()> {
    let mut boards: Vec<Board> = api.get("/boards").await?;
    boards.sort_by_key(|b| !b.is_quick_saves());

    match format {
        OutputFormat::Json => print_json(&boards)?,
        OutputFormat::Quiet => {
            for board in &boards {
                println!("{}", board.id);
            }
        }
        OutputFormat::Human => {
            println!("┌─ boards");
            if boards.is_empty() {
                println!("└─ (no boards yet - tap a restaurant to create Quick Saves)");
            }
            for (i, board) in boards.iter().enumerate() {
                let prefix = if i + 1 == boards.len() { "└─" } else { "├─" };
                let marker = if board.is_quick_saves() { "★" } else { " " };
                println!(
                    "{} {} {} ({} saved, {}) {}",
                    prefix, marker, board.title, board.restaurant_count, board.visibility, board.id
                );
            }
        }
    }
    Ok(())
}

async fn run_create(api: &Api, args: CreateArgs, format: OutputFormat) -> Result<()> {
    let request = CreateBoardRequest {
        title: &args.title,
        visibility: args.visibility.as_str(),
    };
    let board: Board = api.post("/boards", &request).await?;

    match format {
        OutputFormat::Json => print_json(&board)?,
        OutputFormat::Quiet => println!("{}", board.id),
        OutputFormat::Human => println!("Created board '{}' ({})", board.title, board.id),
    }
    Ok(())
}
