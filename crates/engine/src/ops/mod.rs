use api_types::RecordId;
use backend::{Backend, Collection, DeleteParams, Query, WriteParams, WriteResponse};
use serde_json::Value;

use crate::{EngineError, Operation, ResultEngine};

mod budgets;
mod categories;
mod savings_goals;
mod transactions;

#[derive(Debug)]
pub struct Engine<B> {
    backend: B,
}

impl<B: Backend> Engine<B> {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder<B> {
        EngineBuilder { backend: None }
    }

    /// The injected backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Fetch and decode, propagating every failure.
    async fn fetch<C: Collection>(&self, query: Query<C>) -> ResultEngine<Vec<C::Record>> {
        let response = self
            .backend
            .fetch_records(C::TABLE, query.params())
            .await?;

        if !response.success {
            return Err(EngineError::Rejected {
                operation: Operation::Fetch,
                collection: C::TABLE,
                message: response.message.unwrap_or_default(),
            });
        }

        response
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|row| decode::<C>(row))
            .collect()
    }

    /// Fetch for read operations: failures are logged and yield an empty list.
    async fn list<C: Collection>(&self, query: Query<C>) -> Vec<C::Record> {
        match self.fetch(query).await {
            Ok(records) => records,
            Err(err) => {
                tracing::error!(collection = C::TABLE, "failed to fetch records: {err}");
                Vec::new()
            }
        }
    }

    /// Single-record read: missing records and failures yield `None`.
    async fn find<C: Collection>(&self, id: RecordId) -> Option<C::Record> {
        let query = Query::<C>::all();
        let response = match self
            .backend
            .get_record_by_id(C::TABLE, id, query.params())
            .await
        {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(collection = C::TABLE, id, "failed to fetch record: {err}");
                return None;
            }
        };

        let row = response.data?;
        match decode::<C>(row) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::error!(collection = C::TABLE, id, "{err}");
                None
            }
        }
    }

    /// Create one record and return it as stored by the backend.
    async fn create<C: Collection>(&self, record: Value) -> ResultEngine<C::Record> {
        let response = self
            .backend
            .create_records(C::TABLE, &WriteParams::single(record))
            .await;
        written::<C>(Operation::Create, response)
    }

    /// Update one record (the record carries its `Id`) and return it.
    async fn update<C: Collection>(&self, record: Value) -> ResultEngine<C::Record> {
        let response = self
            .backend
            .update_records(C::TABLE, &WriteParams::single(record))
            .await;
        written::<C>(Operation::Update, response)
    }

    /// Delete one record. Returns whether the backend reported a deletion.
    async fn remove<C: Collection>(&self, id: RecordId) -> ResultEngine<bool> {
        let params = DeleteParams {
            record_ids: vec![id],
        };
        let response = self.backend.delete_records(C::TABLE, &params).await;
        let response = log_failure::<C, _, _>(Operation::Delete, response)?;

        // No per-record results means the backend accepted the call as a whole.
        let has_results = response.results.is_some();
        let accepted = accepted_rows::<C>(Operation::Delete, response)?;
        Ok(!has_results || !accepted.is_empty())
    }
}

fn written<C: Collection>(
    operation: Operation,
    response: backend::Result<WriteResponse>,
) -> ResultEngine<C::Record> {
    let response = log_failure::<C, _, _>(operation, response)?;
    let accepted = accepted_rows::<C>(operation, response)?;
    let Some(row) = accepted.into_iter().find_map(|result| result.data) else {
        tracing::error!(collection = C::TABLE, "{operation} returned no data");
        return Err(EngineError::NoData {
            operation,
            collection: C::TABLE,
        });
    };
    decode::<C>(row)
}

fn decode<C: Collection>(row: Value) -> ResultEngine<C::Record> {
    C::decode(row).map_err(|source| EngineError::Decode {
        collection: C::TABLE,
        source,
    })
}

fn log_failure<C: Collection, T, E: Into<EngineError>>(
    operation: Operation,
    result: Result<T, E>,
) -> ResultEngine<T> {
    result.map_err(|err| {
        let err = err.into();
        tracing::error!(collection = C::TABLE, "failed to {operation} record: {err}");
        err
    })
}

/// Check the write envelope. Any failed entry fails the whole call.
fn accepted_rows<C: Collection>(
    operation: Operation,
    response: WriteResponse,
) -> ResultEngine<Vec<backend::RecordResult>> {
    if !response.success {
        let message = response.message.unwrap_or_default();
        tracing::error!(collection = C::TABLE, "{operation} rejected: {message}");
        return Err(EngineError::Rejected {
            operation,
            collection: C::TABLE,
            message,
        });
    }

    let results = response.results.unwrap_or_default();
    let (accepted, failed): (Vec<_>, Vec<_>) =
        results.into_iter().partition(|result| result.success);

    if !failed.is_empty() {
        tracing::error!(
            collection = C::TABLE,
            failed = failed.len(),
            "failed to {operation} records: {:?}",
            failed
        );
        return Err(EngineError::BatchFailed {
            operation,
            collection: C::TABLE,
            failed: failed.len(),
            message: failed.into_iter().find_map(|result| result.message),
        });
    }

    Ok(accepted)
}

/// The builder for `Engine`
#[derive(Debug)]
pub struct EngineBuilder<B> {
    backend: Option<B>,
}

impl<B: Backend> EngineBuilder<B> {
    /// Pass the required backend
    pub fn backend(mut self, backend: B) -> EngineBuilder<B> {
        self.backend = Some(backend);
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> ResultEngine<Engine<B>> {
        let backend = self
            .backend
            .ok_or_else(|| EngineError::Config("a backend is required".to_string()))?;
        Ok(Engine { backend })
    }
}
