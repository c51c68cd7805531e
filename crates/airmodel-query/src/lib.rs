//! Lazy, chainable record queries for AirModel Rust.
//!
//! `airmodel-query` is the **query construction layer**. It turns structured
//! conditions and sort keys into the remote store's formula and parameter
//! format, resolving logical attribute names through each model's
//! `FieldMapping`.
//!
//! # Role In The Architecture
//!
//! - **Relations**: `Relation<M>` accumulates filters, sort keys and
//!   pagination, and fetches through a `Store` only when enumerated.
//! - **Formula compiler**: `FormulaBuilder` renders `Condition` trees into
//!   formula text with escaped literals.
//! - **Scopes**: `ScopeRegistry<M>` holds named query fragments owned by
//!   exactly one model type.
//!
//! Most users access these builders via the `airmodel` facade crate.

pub mod clause;
pub mod condition;
pub mod formula;
pub mod model_query;
pub mod relation;
pub mod scope;

pub use clause::{Limit, Offset, OrderBy};
pub use condition::{Condition, Conditions, Criterion, Filter};
pub use formula::{FormulaBuilder, escape_text};
pub use model_query::ModelQuery;
pub use relation::Relation;
pub use scope::{RESERVED_NAMES, ScopeFn, ScopeRegistry, Scoped};

/// Create a relation over every record of a model.
///
/// # Example
///
/// ```ignore
/// let admins = query!(User)
///     .filter(conditions! { "role" => "admin" })
///     .load(&store)?;
/// ```
#[macro_export]
macro_rules! query {
    ($model:ty) => {
        $crate::Relation::<$model>::new()
    };
}
