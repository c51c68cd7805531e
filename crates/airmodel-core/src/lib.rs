//! Core types and traits for AirModel Rust.
//!
//! This crate provides the foundational abstractions shared by the query layer:
//!
//! - `Model` trait mapping structs onto remote tables
//! - `FieldMapping` for logical attribute → backend field names
//! - `Record` and `Value` for fetched data
//! - `Store` trait, the single fetch operation the query layer calls
//! - `FetchParams`, the compiled parameter bundle passed to a store

pub mod error;
pub mod field;
pub mod model;
pub mod params;
pub mod record;
pub mod store;
pub mod value;

pub use error::{
    Error, FieldError, NotFoundError, Result, ScopeError, StoreError, StoreErrorKind, TypeError,
};
pub use field::{FieldDef, FieldKind, FieldMapping};
pub use model::{Model, ModelConfig, TableRef};
pub use params::{FetchParams, SortDirection, SortField};
pub use record::Record;
pub use store::{FetchCall, Store, StubStore};
pub use value::Value;
