#![allow(dead_code)]

use std::{
    io,
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use api_types::RecordId;
use backend::{
    Backend, BackendError, DeleteParams, FetchParams, FetchResponse, MemoryBackend,
    RecordResponse, RecordResult, WriteParams, WriteResponse,
};
use engine::Engine;
use serde_json::Value;

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Fetch(String, FetchParams),
    Get(String, RecordId),
    Create(String, Vec<Value>),
    Update(String, Vec<Value>),
    Delete(String, Vec<RecordId>),
}

/// Memory store that records every call and can be told to misbehave.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub inner: MemoryBackend,
    calls: Mutex<Vec<Call>>,
    reject_reads: AtomicBool,
    drop_reads: AtomicBool,
    fail_writes: AtomicBool,
    scripted_write: Mutex<Option<WriteResponse>>,
}

impl RecordingBackend {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Reads answer with `success: false`.
    pub fn reject_reads(&self) {
        self.reject_reads.store(true, Ordering::SeqCst);
    }

    /// Reads fail in transport, before any envelope.
    pub fn drop_reads(&self) {
        self.drop_reads.store(true, Ordering::SeqCst);
    }

    /// Writes answer with a failed entry per record.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    /// Every write answers with `response`, untouched.
    pub fn script_writes(&self, response: WriteResponse) {
        *self.scripted_write.lock().unwrap() = Some(response);
    }

    pub fn deletes(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Delete(..)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn read_outage(&self) -> Option<BackendError> {
        self.drop_reads
            .load(Ordering::SeqCst)
            .then(|| io::Error::from(io::ErrorKind::ConnectionRefused).into())
    }

    /// Canned answer for a write of `count` records, if one is configured.
    fn write_override(&self, count: usize) -> Option<WriteResponse> {
        if let Some(response) = self.scripted_write.lock().unwrap().clone() {
            return Some(response);
        }
        self.fail_writes.load(Ordering::SeqCst).then(|| {
            WriteResponse::ok(
                (0..count)
                    .map(|_| RecordResult::failed("validation failed"))
                    .collect(),
            )
        })
    }
}

impl Backend for RecordingBackend {
    async fn fetch_records(
        &self,
        table: &str,
        params: &FetchParams,
    ) -> backend::Result<FetchResponse> {
        self.record(Call::Fetch(table.to_string(), params.clone()));
        if let Some(err) = self.read_outage() {
            return Err(err);
        }
        if self.reject_reads.load(Ordering::SeqCst) {
            return Ok(FetchResponse::failed("service unavailable"));
        }
        self.inner.fetch_records(table, params).await
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: RecordId,
        params: &FetchParams,
    ) -> backend::Result<RecordResponse> {
        self.record(Call::Get(table.to_string(), id));
        if let Some(err) = self.read_outage() {
            return Err(err);
        }
        if self.reject_reads.load(Ordering::SeqCst) {
            return Ok(RecordResponse::failed("service unavailable"));
        }
        self.inner.get_record_by_id(table, id, params).await
    }

    async fn create_records(
        &self,
        table: &str,
        params: &WriteParams,
    ) -> backend::Result<WriteResponse> {
        self.record(Call::Create(table.to_string(), params.records.clone()));
        if let Some(response) = self.write_override(params.records.len()) {
            return Ok(response);
        }
        self.inner.create_records(table, params).await
    }

    async fn update_records(
        &self,
        table: &str,
        params: &WriteParams,
    ) -> backend::Result<WriteResponse> {
        self.record(Call::Update(table.to_string(), params.records.clone()));
        if let Some(response) = self.write_override(params.records.len()) {
            return Ok(response);
        }
        self.inner.update_records(table, params).await
    }

    async fn delete_records(
        &self,
        table: &str,
        params: &DeleteParams,
    ) -> backend::Result<WriteResponse> {
        self.record(Call::Delete(table.to_string(), params.record_ids.clone()));
        if let Some(response) = self.write_override(params.record_ids.len()) {
            return Ok(response);
        }
        self.inner.delete_records(table, params).await
    }
}

pub fn engine() -> Engine<RecordingBackend> {
    Engine::builder()
        .backend(RecordingBackend::default())
        .build()
        .unwrap()
}
