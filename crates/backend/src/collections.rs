//! Mapping between backend rows and normalized records.
//!
//! The backend names every custom column with a `_c` suffix and returns
//! loosely typed values (numbers as text, `null` for unset columns). Each
//! collection here declares its table, its columns and a row type that
//! tolerates those quirks, then converts into the `api_types` shape.

use api_types::{
    EntryKind, MoneyCents, RecordId,
    budget::{Budget, BudgetInput},
    category::{Category, CategoryInput, CategoryUpdate},
    savings_goal::{SavingsGoal, SavingsGoalInput},
    transaction::{Transaction, TransactionInput},
};
use chrono::NaiveDate;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// A backend column.
pub trait WireField: Copy + 'static {
    fn wire_name(self) -> &'static str;
}

/// A record collection of the backend.
pub trait Collection {
    /// Backend table name.
    const TABLE: &'static str;
    /// Columns selected by every read.
    const FIELDS: &'static [Self::Field];

    type Field: WireField;
    type Row: DeserializeOwned;
    type Record: From<Self::Row>;

    /// Decodes one raw row into the normalized record.
    fn decode(value: Value) -> Result<Self::Record, serde_json::Error> {
        serde_json::from_value::<Self::Row>(value).map(Into::into)
    }
}

fn record<F: WireField>(fields: impl IntoIterator<Item = (F, Value)>) -> Value {
    let map: Map<String, Value> = fields
        .into_iter()
        .map(|(field, value)| (field.wire_name().to_string(), value))
        .collect();
    Value::Object(map)
}

fn money(amount: MoneyCents) -> Value {
    serde_json::to_value(amount).unwrap_or(Value::Null)
}

fn date(value: NaiveDate) -> Value {
    Value::String(value.format("%Y-%m-%d").to_string())
}

fn kind(value: EntryKind) -> Value {
    Value::String(value.as_str().to_string())
}

// ---------------------------------------------------------------- transactions

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransactionField {
    Id,
    Name,
    Description,
    Amount,
    Category,
    Kind,
    Date,
}

impl WireField for TransactionField {
    fn wire_name(self) -> &'static str {
        match self {
            Self::Id => "Id",
            Self::Name => "Name_c",
            Self::Description => "Description_c",
            Self::Amount => "Amount_c",
            Self::Category => "Category_c",
            Self::Kind => "Type_c",
            Self::Date => "Date_c",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TransactionRow {
    #[serde(rename = "Id")]
    id: RecordId,
    #[serde(rename = "Description_c", default, deserialize_with = "lenient::nullable")]
    description: String,
    #[serde(rename = "Amount_c", default, deserialize_with = "lenient::nullable")]
    amount: MoneyCents,
    #[serde(rename = "Category_c", default, deserialize_with = "lenient::nullable")]
    category: String,
    #[serde(rename = "Type_c")]
    kind: EntryKind,
    #[serde(rename = "Date_c", deserialize_with = "lenient::date")]
    date: NaiveDate,
}

impl From<TransactionRow> for Transaction {
    fn from(row: TransactionRow) -> Self {
        Self {
            id: row.id,
            description: row.description,
            amount: row.amount,
            category: row.category,
            kind: row.kind,
            date: row.date,
        }
    }
}

#[derive(Debug)]
pub struct TransactionTable;

impl Collection for TransactionTable {
    const TABLE: &'static str = "transaction_c";
    const FIELDS: &'static [TransactionField] = &[
        TransactionField::Id,
        TransactionField::Name,
        TransactionField::Description,
        TransactionField::Amount,
        TransactionField::Category,
        TransactionField::Kind,
        TransactionField::Date,
    ];

    type Field = TransactionField;
    type Row = TransactionRow;
    type Record = Transaction;
}

impl TransactionTable {
    pub fn create_record(input: &TransactionInput) -> Value {
        record(Self::columns(input))
    }

    pub fn update_record(id: RecordId, input: &TransactionInput) -> Value {
        let mut fields = vec![(TransactionField::Id, Value::from(id))];
        fields.extend(Self::columns(input));
        record(fields)
    }

    fn columns(input: &TransactionInput) -> Vec<(TransactionField, Value)> {
        vec![
            (
                TransactionField::Name,
                Value::String(format!("{} - {}", input.kind, input.description)),
            ),
            (
                TransactionField::Description,
                Value::String(input.description.clone()),
            ),
            (TransactionField::Amount, money(input.amount)),
            (
                TransactionField::Category,
                Value::String(input.category.clone()),
            ),
            (TransactionField::Kind, kind(input.kind)),
            (TransactionField::Date, date(input.date)),
        ]
    }
}

// ---------------------------------------------------------------- budgets

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BudgetField {
    Id,
    Name,
    Category,
    MonthlyLimit,
    Month,
    Year,
}

impl WireField for BudgetField {
    fn wire_name(self) -> &'static str {
        match self {
            Self::Id => "Id",
            Self::Name => "Name_c",
            Self::Category => "Category_c",
            Self::MonthlyLimit => "Monthly_Limit_c",
            Self::Month => "Month_c",
            Self::Year => "Year_c",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BudgetRow {
    #[serde(rename = "Id")]
    id: RecordId,
    #[serde(rename = "Category_c", default, deserialize_with = "lenient::nullable")]
    category: String,
    #[serde(rename = "Monthly_Limit_c", default, deserialize_with = "lenient::nullable")]
    monthly_limit: MoneyCents,
    #[serde(rename = "Month_c", deserialize_with = "lenient::integer")]
    month: u32,
    #[serde(rename = "Year_c", deserialize_with = "lenient::integer")]
    year: i32,
}

impl From<BudgetRow> for Budget {
    fn from(row: BudgetRow) -> Self {
        Self {
            id: row.id,
            category: row.category,
            monthly_limit: row.monthly_limit,
            month: row.month,
            year: row.year,
        }
    }
}

#[derive(Debug)]
pub struct BudgetTable;

impl Collection for BudgetTable {
    const TABLE: &'static str = "budget_c";
    const FIELDS: &'static [BudgetField] = &[
        BudgetField::Id,
        BudgetField::Name,
        BudgetField::Category,
        BudgetField::MonthlyLimit,
        BudgetField::Month,
        BudgetField::Year,
    ];

    type Field = BudgetField;
    type Row = BudgetRow;
    type Record = Budget;
}

impl BudgetTable {
    pub fn create_record(input: &BudgetInput) -> Value {
        record(Self::columns(input))
    }

    pub fn update_record(id: RecordId, input: &BudgetInput) -> Value {
        let mut fields = vec![(BudgetField::Id, Value::from(id))];
        fields.extend(Self::columns(input));
        record(fields)
    }

    fn columns(input: &BudgetInput) -> Vec<(BudgetField, Value)> {
        vec![
            (
                BudgetField::Name,
                Value::String(format!("{} Budget", input.category)),
            ),
            (BudgetField::Category, Value::String(input.category.clone())),
            (BudgetField::MonthlyLimit, money(input.monthly_limit)),
            (BudgetField::Month, Value::from(input.month)),
            (BudgetField::Year, Value::from(input.year)),
        ]
    }
}

// ---------------------------------------------------------------- categories

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CategoryField {
    Id,
    Name,
    Kind,
    IsCustom,
}

impl WireField for CategoryField {
    fn wire_name(self) -> &'static str {
        match self {
            Self::Id => "Id",
            Self::Name => "Name_c",
            Self::Kind => "Type_c",
            Self::IsCustom => "Is_Custom_c",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoryRow {
    #[serde(rename = "Id")]
    id: RecordId,
    #[serde(rename = "Name_c", default, deserialize_with = "lenient::nullable")]
    name: String,
    #[serde(rename = "Type_c")]
    kind: EntryKind,
    #[serde(rename = "Is_Custom_c", default, deserialize_with = "lenient::nullable")]
    is_custom: bool,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            kind: row.kind,
            is_custom: row.is_custom,
        }
    }
}

#[derive(Debug)]
pub struct CategoryTable;

impl Collection for CategoryTable {
    const TABLE: &'static str = "category_c";
    const FIELDS: &'static [CategoryField] = &[
        CategoryField::Id,
        CategoryField::Name,
        CategoryField::Kind,
        CategoryField::IsCustom,
    ];

    type Field = CategoryField;
    type Row = CategoryRow;
    type Record = Category;
}

impl CategoryTable {
    /// New categories are always custom.
    pub fn create_record(input: &CategoryInput) -> Value {
        record([
            (CategoryField::Name, Value::String(input.name.clone())),
            (CategoryField::Kind, kind(input.kind)),
            (CategoryField::IsCustom, Value::Bool(true)),
        ])
    }

    pub fn update_record(id: RecordId, input: &CategoryUpdate) -> Value {
        record([
            (CategoryField::Id, Value::from(id)),
            (CategoryField::Name, Value::String(input.name.clone())),
            (CategoryField::Kind, kind(input.kind)),
            (CategoryField::IsCustom, Value::Bool(input.is_custom)),
        ])
    }

    /// Row for a built-in category, used when seeding a local store.
    pub fn builtin_record(name: &str, entry_kind: EntryKind) -> Value {
        record([
            (CategoryField::Name, Value::String(name.to_string())),
            (CategoryField::Kind, kind(entry_kind)),
            (CategoryField::IsCustom, Value::Bool(false)),
        ])
    }
}

// ---------------------------------------------------------------- savings goals

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SavingsGoalField {
    Id,
    Name,
    Title,
    TargetAmount,
    CurrentAmount,
    Deadline,
}

impl WireField for SavingsGoalField {
    fn wire_name(self) -> &'static str {
        match self {
            Self::Id => "Id",
            Self::Name => "Name_c",
            Self::Title => "Title_c",
            Self::TargetAmount => "Target_Amount_c",
            Self::CurrentAmount => "Current_Amount_c",
            Self::Deadline => "Deadline_c",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SavingsGoalRow {
    #[serde(rename = "Id")]
    id: RecordId,
    #[serde(rename = "Title_c", default, deserialize_with = "lenient::nullable")]
    title: String,
    #[serde(rename = "Target_Amount_c", default, deserialize_with = "lenient::nullable")]
    target_amount: MoneyCents,
    #[serde(rename = "Current_Amount_c", default, deserialize_with = "lenient::nullable")]
    current_amount: MoneyCents,
    #[serde(rename = "Deadline_c", deserialize_with = "lenient::date")]
    deadline: NaiveDate,
}

impl From<SavingsGoalRow> for SavingsGoal {
    fn from(row: SavingsGoalRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            target_amount: row.target_amount,
            current_amount: row.current_amount,
            deadline: row.deadline,
        }
    }
}

#[derive(Debug)]
pub struct SavingsGoalTable;

impl Collection for SavingsGoalTable {
    const TABLE: &'static str = "savings_goal_c";
    const FIELDS: &'static [SavingsGoalField] = &[
        SavingsGoalField::Id,
        SavingsGoalField::Name,
        SavingsGoalField::Title,
        SavingsGoalField::TargetAmount,
        SavingsGoalField::CurrentAmount,
        SavingsGoalField::Deadline,
    ];

    type Field = SavingsGoalField;
    type Row = SavingsGoalRow;
    type Record = SavingsGoal;
}

impl SavingsGoalTable {
    pub fn create_record(input: &SavingsGoalInput) -> Value {
        record(Self::columns(input))
    }

    pub fn update_record(id: RecordId, input: &SavingsGoalInput) -> Value {
        let mut fields = vec![(SavingsGoalField::Id, Value::from(id))];
        fields.extend(Self::columns(input));
        record(fields)
    }

    /// Partial update touching only the current balance.
    pub fn amount_record(id: RecordId, current_amount: MoneyCents) -> Value {
        record([
            (SavingsGoalField::Id, Value::from(id)),
            (SavingsGoalField::CurrentAmount, money(current_amount)),
        ])
    }

    fn columns(input: &SavingsGoalInput) -> Vec<(SavingsGoalField, Value)> {
        vec![
            (SavingsGoalField::Name, Value::String(input.title.clone())),
            (SavingsGoalField::Title, Value::String(input.title.clone())),
            (SavingsGoalField::TargetAmount, money(input.target_amount)),
            (SavingsGoalField::CurrentAmount, money(input.current_amount)),
            (SavingsGoalField::Deadline, date(input.deadline)),
        ]
    }
}

mod lenient {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, de};

    /// Treats `null` like a missing column.
    pub(super) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrText {
        Int(i64),
        Text(String),
    }

    /// Accepts `2024` as well as `"2024"`.
    pub(super) fn integer<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<i64>,
    {
        let raw = match IntOrText::deserialize(deserializer)? {
            IntOrText::Int(value) => value,
            IntOrText::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| de::Error::custom(format!("invalid integer '{text}'")))?,
        };
        T::try_from(raw).map_err(|_| de::Error::custom(format!("integer {raw} out of range")))
    }

    /// Accepts `YYYY-MM-DD`, keeping only the date part of timestamps.
    pub(super) fn date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        let day = text.get(..10).unwrap_or(text.as_str());
        NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .map_err(|err| de::Error::custom(format!("invalid date '{text}': {err}")))
    }
}
