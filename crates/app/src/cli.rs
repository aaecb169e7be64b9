use std::path::PathBuf;

use api_types::{EntryKind, MoneyCents, RecordId, YearMonth};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::settings::BackendKind;

#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(about = "Track transactions, budgets, categories and savings goals")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Where records are stored.
    #[arg(long, global = true, value_enum)]
    pub backend: Option<BackendKind>,
    /// Override the hosted service URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    /// Override the local snapshot file.
    #[arg(long, global = true)]
    pub state_path: Option<PathBuf>,
    /// Override the log level.
    #[arg(long, global = true)]
    pub level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(subcommand)]
    Transactions(TransactionCommand),
    #[command(subcommand)]
    Budgets(BudgetCommand),
    #[command(subcommand)]
    Categories(CategoryCommand),
    #[command(subcommand)]
    Goals(GoalCommand),
}

#[derive(Subcommand, Debug)]
pub enum TransactionCommand {
    /// List transactions, newest first.
    List {
        /// Only this month (`YYYY-MM`).
        #[arg(long, conflicts_with = "category")]
        month: Option<YearMonth>,
        #[arg(long)]
        category: Option<String>,
    },
    Show {
        id: RecordId,
    },
    Add(TransactionArgs),
    Edit {
        id: RecordId,
        #[command(flatten)]
        fields: TransactionArgs,
    },
    Delete {
        id: RecordId,
    },
}

#[derive(Args, Debug)]
pub struct TransactionArgs {
    #[arg(long)]
    pub description: String,
    /// Signed amount, e.g. `-12.50`.
    #[arg(long, allow_hyphen_values = true)]
    pub amount: MoneyCents,
    #[arg(long)]
    pub category: String,
    /// `income` or `expense`.
    #[arg(long = "type")]
    pub kind: EntryKind,
    /// `YYYY-MM-DD`.
    #[arg(long)]
    pub date: NaiveDate,
}

#[derive(Subcommand, Debug)]
pub enum BudgetCommand {
    List {
        #[arg(long)]
        month: Option<u32>,
        /// Requires `--month`.
        #[arg(long, requires = "month")]
        year: Option<i32>,
    },
    Show {
        id: RecordId,
    },
    /// Create or update the budget of a category for one month.
    Set(BudgetArgs),
    Edit {
        id: RecordId,
        #[command(flatten)]
        fields: BudgetArgs,
    },
    Delete {
        id: RecordId,
    },
}

#[derive(Args, Debug)]
pub struct BudgetArgs {
    #[arg(long)]
    pub category: String,
    #[arg(long)]
    pub limit: MoneyCents,
    #[arg(long)]
    pub month: u32,
    #[arg(long)]
    pub year: i32,
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    List {
        #[arg(long = "type")]
        kind: Option<EntryKind>,
    },
    Show {
        id: RecordId,
    },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long = "type")]
        kind: EntryKind,
    },
    Edit {
        id: RecordId,
        #[arg(long)]
        name: String,
        #[arg(long = "type")]
        kind: EntryKind,
        /// Mark the category as built-in.
        #[arg(long)]
        built_in: bool,
    },
    Delete {
        id: RecordId,
    },
}

#[derive(Subcommand, Debug)]
pub enum GoalCommand {
    /// List goals, nearest deadline first.
    List,
    Show {
        id: RecordId,
    },
    Add(GoalArgs),
    Edit {
        id: RecordId,
        #[command(flatten)]
        fields: GoalArgs,
    },
    /// Deposit (positive) or withdraw (negative) from a goal.
    Adjust {
        id: RecordId,
        #[arg(allow_hyphen_values = true)]
        delta: MoneyCents,
    },
    Delete {
        id: RecordId,
    },
}

#[derive(Args, Debug)]
pub struct GoalArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub target: MoneyCents,
    #[arg(long, default_value = "0")]
    pub current: MoneyCents,
    /// `YYYY-MM-DD`.
    #[arg(long)]
    pub deadline: NaiveDate,
}
