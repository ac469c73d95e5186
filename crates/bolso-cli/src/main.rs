//! bolso CLI - Personal finance tracker
//!
//! Usage:
//!   bolso init                      Initialize database
//!   bolso import --file extrato.csv Import a bank statement
//!   bolso recurring materialize     Fill in the month's recurring bills
//!   bolso budget report             Budget-vs-actual for the month
//!   bolso serve --port 3000         Start web server

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let db_path = commands::resolve_db_path(cli.db)?;

    match cli.command {
        Commands::Init => commands::cmd_init(&db_path),
        Commands::Status => commands::cmd_status(&db_path),
        Commands::Import { file, month, no_ai } => {
            commands::cmd_import(&db_path, &file, month.as_deref(), no_ai).await
        }
        Commands::Transactions { action } => {
            let db = commands::open_db(&db_path)?;
            match action {
                TransactionsAction::List { limit } => commands::cmd_transactions_list(&db, limit),
                TransactionsAction::Add {
                    description,
                    amount,
                    kind,
                    category,
                    date,
                } => commands::cmd_transactions_add(
                    &db,
                    &description,
                    amount,
                    &kind,
                    category,
                    date.as_deref(),
                ),
                TransactionsAction::Pay { id, undo } => commands::cmd_transactions_pay(&db, id, undo),
                TransactionsAction::Delete { id } => commands::cmd_transactions_delete(&db, id),
            }
        }
        Commands::Installment {
            description,
            total,
            count,
            start,
            day,
            category,
        } => {
            let db = commands::open_db(&db_path)?;
            commands::cmd_installment(&db, &description, total, count, &start, day, category)
        }
        Commands::Recurring { action } => {
            let db = commands::open_db(&db_path)?;
            match action {
                RecurringAction::List => commands::cmd_recurring_list(&db),
                RecurringAction::Add {
                    name,
                    amount,
                    day,
                    kind,
                    category,
                } => commands::cmd_recurring_add(&db, &name, amount, day, &kind, category),
                RecurringAction::Remove { id } => commands::cmd_recurring_remove(&db, id),
                RecurringAction::Materialize { month } => {
                    commands::cmd_recurring_materialize(&db, month.as_deref())
                }
            }
        }
        Commands::Budget { action } => {
            let db = commands::open_db(&db_path)?;
            match action {
                BudgetAction::List => commands::cmd_budget_list(&db),
                BudgetAction::Set { category, percent } => {
                    commands::cmd_budget_set(&db, &category, percent)
                }
                BudgetAction::Remove { category } => commands::cmd_budget_remove(&db, &category),
                BudgetAction::Report { month, json } => {
                    commands::cmd_budget_report(&db, month.as_deref(), json)
                }
            }
        }
        Commands::Serve { port, host, token } => {
            commands::cmd_serve(&db_path, &host, port, token).await
        }
    }
}
