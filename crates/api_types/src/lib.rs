//! Normalized record shapes shared by the engine and its front-ends.
//!
//! These types never carry backend field names; the `backend` crate maps
//! them to and from the wire schema.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use money::MoneyCents;

mod money;

/// Identifier assigned by the backend to every record.
pub type RecordId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("invalid kind '{0}': expected 'income' or 'expense'")]
    InvalidKind(String),
    #[error("invalid month '{0}': expected YYYY-MM")]
    InvalidMonth(String),
}

/// Direction of money for transactions and categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    /// Canonical string used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(ParseError::InvalidKind(s.to_string())),
        }
    }
}

/// A calendar month, rendered as `YYYY-MM`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, ParseError> {
        if !(1..=12).contains(&month) {
            return Err(ParseError::InvalidMonth(format!("{year}-{month}")));
        }
        Ok(Self { year, month })
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Transaction {
        pub id: RecordId,
        pub description: String,
        /// Signed amount.
        pub amount: MoneyCents,
        /// Category name.
        pub category: String,
        #[serde(rename = "type")]
        pub kind: EntryKind,
        pub date: NaiveDate,
    }

    /// Fields accepted by create and update.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionInput {
        pub description: String,
        pub amount: MoneyCents,
        pub category: String,
        #[serde(rename = "type")]
        pub kind: EntryKind,
        pub date: NaiveDate,
    }
}

pub mod budget {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Budget {
        pub id: RecordId,
        pub category: String,
        pub monthly_limit: MoneyCents,
        /// Month number, `1..=12`.
        pub month: u32,
        pub year: i32,
    }

    /// Fields accepted by create, update and upsert.
    ///
    /// `(category, month, year)` is the business key of a budget.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetInput {
        pub category: String,
        pub monthly_limit: MoneyCents,
        pub month: u32,
        pub year: i32,
    }
}

pub mod category {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Category {
        pub id: RecordId,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: EntryKind,
        /// Built-in categories are `false` and cannot be deleted.
        pub is_custom: bool,
    }

    /// Fields accepted by create. New categories are always custom.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CategoryInput {
        pub name: String,
        #[serde(rename = "type")]
        pub kind: EntryKind,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryUpdate {
        pub name: String,
        #[serde(rename = "type")]
        pub kind: EntryKind,
        pub is_custom: bool,
    }
}

pub mod savings_goal {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SavingsGoal {
        pub id: RecordId,
        pub title: String,
        pub target_amount: MoneyCents,
        /// Never negative.
        pub current_amount: MoneyCents,
        pub deadline: NaiveDate,
    }

    impl SavingsGoal {
        /// Progress towards the target in percent, capped at 100.
        pub fn progress_percent(&self) -> u8 {
            if self.target_amount.cents() <= 0 {
                return 100;
            }
            let ratio = self.current_amount.cents().max(0) as f64
                / self.target_amount.cents() as f64;
            (ratio * 100.0).floor().min(100.0) as u8
        }

        /// Amount still missing to reach the target.
        pub fn remaining(&self) -> MoneyCents {
            self.target_amount
                .saturating_sub(self.current_amount)
                .floor_zero()
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SavingsGoalInput {
        pub title: String,
        pub target_amount: MoneyCents,
        /// Defaults to zero on create.
        #[serde(default)]
        pub current_amount: MoneyCents,
        pub deadline: NaiveDate,
    }
}
