//! In-process record backend.
//!
//! Speaks the same envelopes as the hosted service and applies the same
//! field selection, filtering and ordering, so the engine runs unchanged on
//! top of it. The whole store can be written to and read back from a JSON
//! snapshot for local, offline use.

use std::{
    cmp::Ordering,
    collections::BTreeMap,
    fs,
    path::Path,
    sync::{Mutex, MutexGuard, PoisonError},
};

use api_types::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    Backend, Condition, DeleteParams, FetchParams, FetchResponse, Operator, OrderBy,
    RecordResponse, RecordResult, Result, SortType, WriteParams, WriteResponse,
};

const ID: &str = "Id";

type Row = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    next_id: RecordId,
    rows: BTreeMap<RecordId, Row>,
}

impl Table {
    fn insert(&mut self, mut row: Row) -> Row {
        self.next_id += 1;
        let id = self.next_id;
        row.insert(ID.to_string(), Value::from(id));
        self.rows.insert(id, row.clone());
        row
    }
}

/// Serializable content of a [`MemoryBackend`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tables: BTreeMap<String, Table>,
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: Mutex<BTreeMap<String, Table>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            tables: Mutex::new(snapshot.tables),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tables: self.tables().clone(),
        }
    }

    /// Loads a snapshot file; a missing file yields an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(Self::from_snapshot(serde_json::from_str(&content)?))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(&self.snapshot())?;
        fs::write(path, payload)?;
        Ok(())
    }

    /// Stores a raw row and returns its new id. Non-object values are ignored.
    pub fn insert(&self, table: &str, record: Value) -> Option<RecordId> {
        let Value::Object(row) = record else {
            return None;
        };
        let stored = self.tables().entry(table.to_string()).or_default().insert(row);
        stored.get(ID).and_then(Value::as_i64)
    }

    /// Number of rows stored in `table`.
    pub fn len(&self, table: &str) -> usize {
        self.tables().get(table).map_or(0, |table| table.rows.len())
    }

    pub fn is_empty(&self, table: &str) -> bool {
        self.len(table) == 0
    }

    fn tables(&self) -> MutexGuard<'_, BTreeMap<String, Table>> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Backend for MemoryBackend {
    async fn fetch_records(&self, table: &str, params: &FetchParams) -> Result<FetchResponse> {
        let tables = self.tables();
        let mut rows: Vec<&Row> = tables
            .get(table)
            .map(|table| {
                table
                    .rows
                    .values()
                    .filter(|row| params.conditions.iter().all(|cond| matches(row, cond)))
                    .collect()
            })
            .unwrap_or_default();

        rows.sort_by(|left, right| compare_rows(left, right, &params.order_by));

        let data = rows.into_iter().map(|row| project(row, params)).collect();
        Ok(FetchResponse::ok(data))
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: RecordId,
        params: &FetchParams,
    ) -> Result<RecordResponse> {
        let tables = self.tables();
        let response = match tables.get(table).and_then(|table| table.rows.get(&id)) {
            Some(row) => RecordResponse::ok(project(row, params)),
            None => RecordResponse::failed(format!("record {id} not found in {table}")),
        };
        Ok(response)
    }

    async fn create_records(&self, table: &str, params: &WriteParams) -> Result<WriteResponse> {
        let mut tables = self.tables();
        let table = tables.entry(table.to_string()).or_default();

        let results = params
            .records
            .iter()
            .map(|record| match record {
                Value::Object(fields) => {
                    let mut row = fields.clone();
                    row.remove(ID);
                    RecordResult::ok(Value::Object(table.insert(row)))
                }
                _ => RecordResult::failed("record must be an object"),
            })
            .collect();

        Ok(WriteResponse::ok(results))
    }

    async fn update_records(&self, table: &str, params: &WriteParams) -> Result<WriteResponse> {
        let mut tables = self.tables();
        let table = tables.entry(table.to_string()).or_default();

        let results = params
            .records
            .iter()
            .map(|record| {
                let Some(id) = record.get(ID).and_then(Value::as_i64) else {
                    return RecordResult::failed("record is missing its Id");
                };
                let (Some(existing), Some(fields)) = (table.rows.get_mut(&id), record.as_object())
                else {
                    return RecordResult::failed(format!("record {id} not found"));
                };
                for (key, value) in fields {
                    if key != ID {
                        existing.insert(key.clone(), value.clone());
                    }
                }
                RecordResult::ok(Value::Object(existing.clone()))
            })
            .collect();

        Ok(WriteResponse::ok(results))
    }

    async fn delete_records(&self, table: &str, params: &DeleteParams) -> Result<WriteResponse> {
        let mut tables = self.tables();
        let table = tables.entry(table.to_string()).or_default();

        let results = params
            .record_ids
            .iter()
            .map(|id| match table.rows.remove(id) {
                Some(row) => RecordResult::ok(Value::Object(row)),
                None => RecordResult::failed(format!("record {id} not found")),
            })
            .collect();

        Ok(WriteResponse::ok(results))
    }
}

/// Text form used for loose comparisons, so `2024` matches `"2024"`.
fn text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn matches(row: &Row, condition: &Condition) -> bool {
    let field = row.get(&condition.field_name).unwrap_or(&Value::Null);
    condition.values.iter().any(|expected| match condition.operator {
        Operator::EqualTo => field == expected || text(field) == text(expected),
        Operator::Contains => text(field).contains(&text(expected)),
    })
}

fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left.as_f64(), right.as_f64()) {
        (Some(l), Some(r)) => l.partial_cmp(&r).unwrap_or(Ordering::Equal),
        _ => text(left).cmp(&text(right)),
    }
}

fn compare_rows(left: &Row, right: &Row, order_by: &[OrderBy]) -> Ordering {
    for order in order_by {
        let l = left.get(&order.field_name).unwrap_or(&Value::Null);
        let r = right.get(&order.field_name).unwrap_or(&Value::Null);
        let ordering = match order.sort_type {
            SortType::Asc => compare_values(l, r),
            SortType::Desc => compare_values(r, l),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Keeps `Id` plus the selected fields; no selection returns the whole row.
fn project(row: &Row, params: &FetchParams) -> Value {
    if params.fields.is_empty() {
        return Value::Object(row.clone());
    }
    let mut out = Map::new();
    if let Some(id) = row.get(ID) {
        out.insert(ID.to_string(), id.clone());
    }
    for name in params.field_names() {
        if let Some(value) = row.get(name) {
            out.insert(name.to_string(), value.clone());
        }
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn params(conditions: Vec<Condition>, order_by: Vec<OrderBy>) -> FetchParams {
        FetchParams {
            fields: Vec::new(),
            conditions,
            order_by,
        }
    }

    fn equal(field: &str, value: Value) -> Condition {
        Condition {
            field_name: field.to_string(),
            operator: Operator::EqualTo,
            values: vec![value],
        }
    }

    #[tokio::test]
    async fn equal_to_matches_numbers_given_as_text() {
        let backend = MemoryBackend::new();
        backend.insert("budget_c", json!({"Year_c": 2024, "Month_c": 1}));
        backend.insert("budget_c", json!({"Year_c": 2025, "Month_c": 1}));

        let res = backend
            .fetch_records("budget_c", &params(vec![equal("Year_c", json!("2024"))], vec![]))
            .await
            .unwrap();
        let data = res.data.unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["Year_c"], 2024);
    }

    #[tokio::test]
    async fn contains_and_descending_order() {
        let backend = MemoryBackend::new();
        backend.insert("transaction_c", json!({"Date_c": "2024-01-03"}));
        backend.insert("transaction_c", json!({"Date_c": "2024-02-01"}));
        backend.insert("transaction_c", json!({"Date_c": "2024-01-20"}));

        let condition = Condition {
            field_name: "Date_c".to_string(),
            operator: Operator::Contains,
            values: vec![json!("2024-01")],
        };
        let order = OrderBy {
            field_name: "Date_c".to_string(),
            sort_type: SortType::Desc,
        };
        let res = backend
            .fetch_records("transaction_c", &params(vec![condition], vec![order]))
            .await
            .unwrap();

        let dates: Vec<_> = res
            .data
            .unwrap()
            .iter()
            .map(|row| row["Date_c"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(dates, vec!["2024-01-20", "2024-01-03"]);
    }

    #[tokio::test]
    async fn update_of_missing_record_reports_failed_result() {
        let backend = MemoryBackend::new();
        let res = backend
            .update_records(
                "category_c",
                &WriteParams::single(json!({"Id": 99, "Name_c": "X"})),
            )
            .await
            .unwrap();

        assert!(res.success);
        let results = res.results.unwrap();
        assert!(!results[0].success);
    }

    #[tokio::test]
    async fn update_merges_fields() {
        let backend = MemoryBackend::new();
        let id = backend
            .insert("savings_goal_c", json!({"Title_c": "Car", "Current_Amount_c": 10}))
            .unwrap();

        backend
            .update_records(
                "savings_goal_c",
                &WriteParams::single(json!({"Id": id, "Current_Amount_c": 25})),
            )
            .await
            .unwrap();

        let res = backend
            .get_record_by_id("savings_goal_c", id, &FetchParams::default())
            .await
            .unwrap();
        let data = res.data.unwrap();
        assert_eq!(data["Title_c"], "Car");
        assert_eq!(data["Current_Amount_c"], 25);
    }

    #[test]
    fn snapshot_survives_save_and_load() {
        let dir = std::env::temp_dir().join(format!("tally_snapshot_{}", std::process::id()));
        let path = dir.join("store.json");

        let backend = MemoryBackend::new();
        backend.insert("category_c", json!({"Name_c": "Food"}));
        backend.save(&path).unwrap();

        let loaded = MemoryBackend::load(&path).unwrap();
        assert_eq!(loaded.snapshot(), backend.snapshot());
        assert_eq!(loaded.len("category_c"), 1);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn missing_snapshot_is_empty() {
        let backend = MemoryBackend::load(Path::new("/nonexistent/tally/store.json")).unwrap();
        assert!(backend.is_empty("category_c"));
    }
}
