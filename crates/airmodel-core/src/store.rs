//! Record store abstraction.
//!
//! - [`Store`] - the single "fetch records matching these parameters"
//!   operation the query layer consumes
//! - [`StubStore`] - an in-process store returning canned records, for tests
//!   and demos
//!
//! Create/update/delete of individual records is not part of this contract.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::Result;
use crate::error::{Error, StoreError, StoreErrorKind};
use crate::model::TableRef;
use crate::params::FetchParams;
use crate::record::Record;

/// A remote store that can return the records of a table.
///
/// Implementations own transport, authentication, retries and timeouts.
/// Errors they return reach the caller of the enumerating query operation
/// unchanged.
pub trait Store: Send + Sync {
    /// Fetch the records of `table` matching `params`.
    fn fetch(&self, table: &TableRef, params: &FetchParams) -> Result<Vec<Record>>;
}

impl<S: Store + ?Sized> Store for &S {
    fn fetch(&self, table: &TableRef, params: &FetchParams) -> Result<Vec<Record>> {
        (**self).fetch(table, params)
    }
}

impl<S: Store + ?Sized> Store for std::sync::Arc<S> {
    fn fetch(&self, table: &TableRef, params: &FetchParams) -> Result<Vec<Record>> {
        (**self).fetch(table, params)
    }
}

/// A fetch call observed by [`StubStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCall {
    pub table: TableRef,
    pub params: FetchParams,
}

/// In-process [`Store`] that serves a fixed record list.
///
/// `offset` and `max_records` are applied to the canned list; `filter` and
/// `sort` are only recorded. Every call is logged for inspection.
///
/// # Example
///
/// ```
/// use airmodel_core::{FetchParams, Record, Store, StubStore, TableRef};
///
/// let store = StubStore::with_records(vec![Record::new("rec1"), Record::new("rec2")]);
/// let table = TableRef { base_key: None, table: "Users" };
/// let params = FetchParams { max_records: Some(1), ..FetchParams::default() };
///
/// assert_eq!(store.fetch(&table, &params).unwrap().len(), 1);
/// assert_eq!(store.call_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct StubStore {
    records: Mutex<Vec<Record>>,
    calls: Mutex<Vec<FetchCall>>,
    failure: Mutex<Option<(StoreErrorKind, String)>>,
    latency: Option<Duration>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl StubStore {
    /// Create a store with no records.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store serving `records`.
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    /// Sleep this long inside every fetch.
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Replace the served records.
    pub fn set_records(&self, records: Vec<Record>) {
        *lock(&self.records) = records;
    }

    /// Make every following fetch fail with the given error.
    pub fn fail_with(&self, kind: StoreErrorKind, message: impl Into<String>) {
        *lock(&self.failure) = Some((kind, message.into()));
    }

    /// Stop failing.
    pub fn recover(&self) {
        *lock(&self.failure) = None;
    }

    /// All calls received so far, oldest first.
    pub fn calls(&self) -> Vec<FetchCall> {
        lock(&self.calls).clone()
    }

    /// Number of fetch calls received.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Parameters of the most recent call.
    pub fn last_params(&self) -> Option<FetchParams> {
        lock(&self.calls).last().map(|call| call.params.clone())
    }
}

impl Store for StubStore {
    fn fetch(&self, table: &TableRef, params: &FetchParams) -> Result<Vec<Record>> {
        lock(&self.calls).push(FetchCall {
            table: *table,
            params: params.clone(),
        });

        if let Some(latency) = self.latency {
            std::thread::sleep(latency);
        }

        if let Some((kind, message)) = lock(&self.failure).clone() {
            return Err(Error::Store(StoreError {
                kind,
                message,
                source: None,
            }));
        }

        let records = lock(&self.records);
        let skip = params
            .offset
            .map_or(0, |n| usize::try_from(n).unwrap_or(usize::MAX));
        let take = params
            .max_records
            .map_or(usize::MAX, |n| usize::try_from(n).unwrap_or(usize::MAX));
        Ok(records.iter().skip(skip).take(take).cloned().collect())
    }
}
