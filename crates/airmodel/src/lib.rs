//! AirModel Rust - lazy, chainable record queries over remote spreadsheet-style tables.
//!
//! AirModel maps structs with named attributes onto remote tables whose
//! columns carry human-readable names ("First Name", "Active?"). It provides:
//!
//! - Per-model field mappings from logical attribute to backend field name
//! - Immutable, lazily evaluated relations with cached results
//! - Formula compilation with escaped literals
//! - Named scopes isolated per model type
//!
//! # Quick Start
//!
//! ```
//! use std::sync::LazyLock;
//! use airmodel::prelude::*;
//!
//! #[derive(Debug)]
//! struct User {
//!     name: String,
//! }
//!
//! static USER_FIELDS: LazyLock<FieldMapping> = LazyLock::new(|| {
//!     FieldMapping::new()
//!         .field("name", "Name")
//!         .field("role", "Role")
//!         .field("active", "Active")
//! });
//!
//! impl Model for User {
//!     const TABLE_NAME: &'static str = "Users";
//!
//!     fn field_mapping() -> &'static FieldMapping {
//!         &USER_FIELDS
//!     }
//!
//!     fn from_record(record: Record) -> Result<Self> {
//!         Ok(User {
//!             name: record.get_as(Self::field_mapping(), "name")?,
//!         })
//!     }
//! }
//!
//! let admins = User::filter(conditions! { "role" => "admin" })
//!     .filter(conditions! { "active" => true })
//!     .order("name")
//!     .limit(10);
//!
//! assert_eq!(
//!     admins.to_json().unwrap(),
//!     r#"{"filter":"AND({Role} = 'admin', {Active} = TRUE())","sort":[{"field":"Name","direction":"asc"}],"max_records":10}"#
//! );
//!
//! // Nothing is fetched until the relation is enumerated.
//! let store = StubStore::with_records(vec![Record::new("rec1").with_field("Name", "Ada")]);
//! assert_eq!(store.call_count(), 0);
//! assert_eq!(admins.load(&store).unwrap()[0].name, "Ada");
//! assert_eq!(admins.count(&store).unwrap(), 1);
//! assert_eq!(store.call_count(), 1);
//! ```

// Re-export all public types from sub-crates
pub use airmodel_core::{
    // Errors
    Error,
    FetchCall,
    FetchParams,
    FieldDef,
    FieldError,
    FieldKind,
    // Field mapping
    FieldMapping,
    // Core types
    Model,
    ModelConfig,
    NotFoundError,
    Record,
    Result,
    ScopeError,
    SortDirection,
    SortField,
    // Storage collaborator
    Store,
    StoreError,
    StoreErrorKind,
    StubStore,
    TableRef,
    TypeError,
    Value,
};

pub use airmodel_query::{
    Condition, Conditions, Criterion, Filter, FormulaBuilder, Limit, ModelQuery, Offset, OrderBy,
    RESERVED_NAMES, Relation, ScopeFn, ScopeRegistry, Scoped, conditions, escape_text, query,
};

/// Prelude module for convenient imports.
///
/// ```ignore
/// use airmodel::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Condition,
        // Macros
        conditions,
        // Core traits and types
        Error,
        FieldDef,
        FieldMapping,
        Model,
        ModelConfig,
        // Query building
        ModelQuery,
        OrderBy,
        Record,
        Relation,
        Result,
        ScopeRegistry,
        Scoped,
        SortDirection,
        Store,
        StubStore,
        Value,
        query,
    };
}
