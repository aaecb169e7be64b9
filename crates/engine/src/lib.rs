//! Finance record engine.
//!
//! The engine owns no state of its own: every operation is one or two
//! round trips to the injected [`Backend`]. Read operations never fail;
//! backend problems are logged and surface as empty results. Write
//! operations return [`EngineError`] on any failure.
//!
//! `upsert_budget` and `update_goal_amount` are read-then-write pairs with
//! no atomicity. Concurrent callers on the same key can create duplicate
//! budgets or lose balance updates; a single writer is assumed.

pub use api_types::{
    EntryKind, MoneyCents, ParseError, RecordId, YearMonth,
    budget::{Budget, BudgetInput},
    category::{Category, CategoryInput, CategoryUpdate},
    savings_goal::{SavingsGoal, SavingsGoalInput},
    transaction::{Transaction, TransactionInput},
};
pub use backend::Backend;
pub use error::{EngineError, Operation};
pub use ops::{Engine, EngineBuilder};

mod error;
mod ops;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
