//! Save commands: state, tap, sheet, remove
//!
//! ```bash
//! savectl tap 0b6e... --name "Tartine"       # one-tap bookmark
//! savectl sheet 0b6e...                      # show the membership sheet
//! savectl sheet 0b6e... --board 7f3a...      # add to a board
//! ```

use anyhow::{anyhow, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};

use savectl_core::indicator::Completion;
use savectl_core::{
    BoardId, CommitReport, IndicatorState, MembershipSheet, RestaurantId, SaveError,
    SaveIndicator, SaveState, ToggleOutcome,
};

use super::client::{print_json, Api, ClientOptions, OutputFormat};

#[derive(Parser, Debug)]
pub struct StateArgs {
    /// Restaurant ID
    pub restaurant: RestaurantId,
}

#[derive(Parser, Debug)]
pub struct TapArgs {
    /// Restaurant ID
    pub restaurant: RestaurantId,

    /// Restaurant name, shown in confirmations
    #[arg(long)]
    pub name: String,
}

#[derive(Parser, Debug)]
pub struct SheetArgs {
    /// Restaurant ID
    pub restaurant: RestaurantId,

    /// Board to add the restaurant to (repeatable); omit to only show the sheet
    #[arg(long = "board")]
    pub boards: Vec<BoardId>,
}

#[derive(Parser, Debug)]
pub struct RemoveArgs {
    /// Restaurant ID
    pub restaurant: RestaurantId,

    /// Board to remove the restaurant from
    #[arg(long)]
    pub board: BoardId,
}

#[derive(Debug, Serialize, Deserialize)]
struct StateView {
    state: SaveState,
    indicator: IndicatorState,
}

#[derive(Debug, Serialize, Deserialize)]
struct ToggleView {
    outcome: ToggleOutcome,
    #[serde(default)]
    reconciled: Option<StateView>,
}

#[derive(Serialize)]
struct ToggleRequest<'a> {
    restaurant_name: &'a str,
}

#[derive(Serialize)]
struct ConfirmRequest<'a> {
    board_ids: &'a [BoardId],
}

#[derive(Debug, Serialize, Deserialize)]
struct ConfirmView {
    report: CommitReport,
    close_sheet: bool,
}

fn icon(state: IndicatorState) -> &'static str {
    match state {
        IndicatorState::Saved => "★ saved",
        IndicatorState::Unsaved => "☆ not saved",
        IndicatorState::Loading {
            optimistic_saved: true,
        } => "★ saving…",
        IndicatorState::Loading {
            optimistic_saved: false,
        } => "☆ removing…",
    }
}

fn save_path(restaurant: RestaurantId, rest: &str) -> String {
    format!("/saves/{}{}", restaurant, rest)
}

pub async fn run_state(args: StateArgs, options: &ClientOptions) -> Result<()> {
    let api = Api::connect(options)?;
    let view: StateView = api.get(&save_path(args.restaurant, "")).await?;

    match options.format {
        OutputFormat::Json => print_json(&view)?,
        OutputFormat::Quiet => {
            for board in &view.state.boards {
                println!("{}", board);
            }
        }
        OutputFormat::Human => {
            println!("{}", icon(view.indicator));
            let custom = view.state.custom_boards().count();
            if custom > 0 {
                println!("  also on {} custom board(s)", custom);
            }
        }
    }
    Ok(())
}

/// Tap the bookmark: show the optimistic icon, then whatever the server settled on.
pub async fn run_tap(args: TapArgs, options: &ClientOptions) -> Result<()> {
    let api = Api::connect(options)?;
    let mut indicator = SaveIndicator::new(api.user, args.restaurant);

    // the revert target must be a state the server reported
    let current: StateView = api
        .get(&save_path(args.restaurant, ""))
        .await
        .map_err(|err| {
            err.context(format!("could not load current state of '{}'", args.name))
        })?;
    indicator.apply_state(&current.state);

    let ticket = indicator.begin_tap();
    if options.format == OutputFormat::Human {
        println!("{}", icon(indicator.state()));
    }

    let request = ToggleRequest {
        restaurant_name: &args.name,
    };
    let result: Result<ToggleView> = api
        .post(&save_path(args.restaurant, "/toggle"), &request)
        .await;

    let view = match result {
        Ok(view) => view,
        Err(err) => {
            let failed = ToggleOutcome::Failed {
                error: SaveError::Failed {
                    reason: err.to_string(),
                },
            };
            indicator.complete(ticket, &failed, None);
            if options.format == OutputFormat::Human {
                println!("{} (reverted)", icon(indicator.state()));
            }
            return Err(err.context(format!("could not update '{}'", args.name)));
        }
    };

    let reconciled = view.reconciled.as_ref().map(|r| &r.state);
    let completion = indicator.complete(ticket, &view.outcome, reconciled);

    match options.format {
        OutputFormat::Json => print_json(&view)?,
        OutputFormat::Quiet => {
            if let Completion::Applied(state) = completion {
                println!("{}", state.shows_saved());
            }
        }
        OutputFormat::Human => match &view.outcome {
            ToggleOutcome::Saved { .. } => {
                println!("{}", icon(indicator.state()));
                println!("Saved '{}' to Quick Saves", args.name);
            }
            ToggleOutcome::Unsaved { .. } => {
                println!("{}", icon(indicator.state()));
                println!("Removed '{}' from Quick Saves", args.name);
            }
            ToggleOutcome::NeedsBoardSelection { state } => {
                println!("{}", icon(indicator.state()));
                println!(
                    "'{}' is on {} board(s); choose boards with: savectl sheet {}",
                    args.name,
                    state.boards.len(),
                    args.restaurant
                );
            }
            ToggleOutcome::Failed { error } => {
                return Err(anyhow!("could not update '{}': {}", args.name, error));
            }
        },
    }
    Ok(())
}

pub async fn run_sheet(args: SheetArgs, options: &ClientOptions) -> Result<()> {
    let api = Api::connect(options)?;
    let path = save_path(args.restaurant, "/sheet");

    if args.boards.is_empty() {
        let sheet: MembershipSheet = api.get(&path).await?;
        return print_sheet(&sheet, options.format);
    }

    let request = ConfirmRequest {
        board_ids: &args.boards,
    };
    let view: ConfirmView = api.post(&path, &request).await?;

    match options.format {
        OutputFormat::Json => print_json(&view)?,
        OutputFormat::Quiet => {
            for board in view.report.committed() {
                println!("{}", board);
            }
        }
        OutputFormat::Human => print_report(&view.report),
    }

    if view.close_sheet {
        Ok(())
    } else {
        Err(anyhow!(
            "{} board(s) not updated",
            1 + view.report.skipped.len()
        ))
    }
}

fn print_sheet(sheet: &MembershipSheet, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(sheet)?,
        OutputFormat::Quiet => {
            for board in sheet.selectable() {
                println!("{}", board);
            }
        }
        OutputFormat::Human => {
            println!("┌─ save to boards");
            let options: Vec<_> = sheet.options().collect();
            for (i, option) in options.iter().enumerate() {
                let prefix = if i + 1 == options.len() { "└─" } else { "├─" };
                let check = if option.already_member { "[x]" } else { "[ ]" };
                println!(
                    "{} {} {} {}",
                    prefix, check, option.board.title, option.board.id
                );
            }
        }
    }
    Ok(())
}

fn print_report(report: &CommitReport) {
    for board in &report.added {
        println!("✓ added to {}", board);
    }
    for board in &report.already_present {
        println!("✓ already on {}", board);
    }
    if let Some(failure) = &report.failure {
        println!("✗ {}: {}", failure.board, failure.error);
    }
    for board in &report.skipped {
        println!("- skipped {}", board);
    }
}

pub async fn run_remove(args: RemoveArgs, options: &ClientOptions) -> Result<()> {
    let api = Api::connect(options)?;
    api.delete(&format!(
        "/boards/{}/restaurants/{}",
        args.board, args.restaurant
    ))
    .await?;

    if options.format == OutputFormat::Human {
        println!("Removed from board {}", args.board);
    }
    Ok(())
}
