//! Adapter for the hosted record backend.
//!
//! Everything that knows about the backend's wire schema lives here: the
//! query and envelope shapes, the `_c` suffixed field names, and the two
//! transports (`HttpBackend` for the hosted service, `MemoryBackend` for
//! local use and tests). Callers only see the normalized shapes from
//! `api_types`.

use std::future::Future;

use api_types::RecordId;
use reqwest::StatusCode;

pub use collections::{
    BudgetField, BudgetTable, CategoryField, CategoryTable, Collection, SavingsGoalField,
    SavingsGoalTable, TransactionField, TransactionTable, WireField,
};
pub use envelope::{FetchResponse, RecordResponse, RecordResult, WriteResponse};
pub use http::{HttpBackend, HttpBackendBuilder};
pub use memory::{MemoryBackend, Snapshot};
pub use query::{
    Condition, DeleteParams, FetchParams, Field, FieldName, Operator, OrderBy, Query, SortType,
    WriteParams,
};

pub mod collections;
mod envelope;
mod http;
mod memory;
mod query;

pub type Result<T> = std::result::Result<T, BackendError>;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{status}: {message}")]
    Server { status: StatusCode, message: String },
    #[error("invalid base_url: {0}")]
    InvalidBaseUrl(String),
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),
    #[error("missing setting: {0}")]
    MissingSetting(&'static str),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Operations offered by the record backend.
///
/// Every call names one record collection (`transaction_c`, ...). A call
/// only fails with `Err` when the request could not be completed; a
/// completed request that the backend refused comes back as an envelope
/// with `success == false`.
pub trait Backend: Send + Sync {
    fn fetch_records(
        &self,
        table: &str,
        params: &FetchParams,
    ) -> impl Future<Output = Result<FetchResponse>> + Send;

    fn get_record_by_id(
        &self,
        table: &str,
        id: RecordId,
        params: &FetchParams,
    ) -> impl Future<Output = Result<RecordResponse>> + Send;

    fn create_records(
        &self,
        table: &str,
        params: &WriteParams,
    ) -> impl Future<Output = Result<WriteResponse>> + Send;

    fn update_records(
        &self,
        table: &str,
        params: &WriteParams,
    ) -> impl Future<Output = Result<WriteResponse>> + Send;

    fn delete_records(
        &self,
        table: &str,
        params: &DeleteParams,
    ) -> impl Future<Output = Result<WriteResponse>> + Send;
}
