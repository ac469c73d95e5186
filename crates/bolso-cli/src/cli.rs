//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// bolso - Track income, expenses, bills and budgets
#[derive(Parser)]
#[command(name = "bolso")]
#[command(about = "Personal finance tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path (default: platform data dir)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Show database status
    Status,

    /// Import a bank statement (CSV or XLSX)
    Import {
        /// Statement file to import
        #[arg(short, long)]
        file: PathBuf,

        /// Reference month for year-less statement dates (YYYY-MM,
        /// default: current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Skip AI categorization even when a backend is configured
        #[arg(long)]
        no_ai: bool,
    },

    /// Manage transactions (list, add, pay, delete)
    Transactions {
        #[command(subcommand)]
        action: TransactionsAction,
    },

    /// Register an installment purchase (one buy, N monthly charges)
    Installment {
        /// What was bought
        #[arg(short, long)]
        description: String,

        /// Total purchase value
        #[arg(short, long)]
        total: f64,

        /// Number of monthly installments
        #[arg(short, long)]
        count: u32,

        /// First charge month (YYYY-MM)
        #[arg(short, long)]
        start: String,

        /// Charge day of month (clamped per month)
        #[arg(long, default_value = "1")]
        day: u32,

        /// Category label
        #[arg(long)]
        category: Option<String>,
    },

    /// Manage recurring bill/income templates
    Recurring {
        #[command(subcommand)]
        action: RecurringAction,
    },

    /// Manage budget goals and reports
    Budget {
        #[command(subcommand)]
        action: BudgetAction,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Require this bearer token on every request
        #[arg(long)]
        token: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum TransactionsAction {
    /// List transactions, newest first
    List {
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Add a one-off transaction
    Add {
        #[arg(short, long)]
        description: String,

        /// Non-negative magnitude; direction comes from --kind
        #[arg(short, long)]
        amount: f64,

        /// income or expense
        #[arg(short, long, default_value = "expense")]
        kind: String,

        /// Category label
        #[arg(long)]
        category: Option<String>,

        /// Date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Mark a transaction paid
    Pay {
        id: i64,

        /// Unmark instead
        #[arg(long)]
        undo: bool,
    },

    /// Delete a transaction
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum RecurringAction {
    /// List templates
    List,

    /// Add a template
    Add {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        amount: f64,

        /// Nominal day of month (1-31)
        #[arg(short, long)]
        day: u32,

        /// income or expense
        #[arg(short, long, default_value = "expense")]
        kind: String,

        /// Category label
        #[arg(long)]
        category: Option<String>,
    },

    /// Remove a template and its materialized transactions
    Remove { id: i64 },

    /// Materialize missing bills for a month (YYYY-MM, default: current)
    Materialize {
        #[arg(short, long)]
        month: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum BudgetAction {
    /// List goals
    List,

    /// Set the goal for a category (replaces any existing goal)
    Set {
        #[arg(short, long)]
        category: String,

        /// Share of monthly income (0-100)
        #[arg(short, long)]
        percent: f64,
    },

    /// Remove the goal for a category
    Remove { category: String },

    /// Budget-vs-actual report for a month (YYYY-MM, default: current)
    Report {
        #[arg(short, long)]
        month: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}
