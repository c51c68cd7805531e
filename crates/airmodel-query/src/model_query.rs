//! Class-level query entry points for models.

use airmodel_core::{Model, Result, Store, Value};

use crate::clause::OrderBy;
use crate::condition::Filter;
use crate::relation::Relation;
use crate::scope::Scoped;

/// Query sugar available on every [`Model`].
///
/// Each method starts from [`all`](Self::all) and delegates to the
/// matching [`Relation`] method, so `User::filter(x)` is the same as
/// `User::all().filter(x)`.
pub trait ModelQuery: Model {
    /// A relation over every record of the table.
    fn all() -> Relation<Self> {
        Relation::new()
    }

    fn filter(filter: impl Into<Filter>) -> Relation<Self> {
        Self::all().filter(filter)
    }

    fn order(order: impl Into<OrderBy>) -> Relation<Self> {
        Self::all().order(order)
    }

    fn order_by<I>(keys: I) -> Relation<Self>
    where
        I: IntoIterator,
        I::Item: Into<OrderBy>,
    {
        Self::all().order_by(keys)
    }

    fn limit(n: u64) -> Relation<Self> {
        Self::all().limit(n)
    }

    fn offset(n: u64) -> Relation<Self> {
        Self::all().offset(n)
    }

    fn first<S: Store + ?Sized>(store: &S) -> Result<Option<Self>> {
        Self::all().first(store)
    }

    fn first_n<S: Store + ?Sized>(n: u64, store: &S) -> Result<Vec<Self>> {
        Self::all().first_n(n, store)
    }

    fn last<S: Store + ?Sized>(store: &S) -> Result<Option<Self>> {
        Self::all().last(store)
    }

    fn last_n<S: Store + ?Sized>(n: u64, store: &S) -> Result<Vec<Self>> {
        Self::all().last_n(n, store)
    }

    fn find_by<S: Store + ?Sized>(filter: impl Into<Filter>, store: &S) -> Result<Option<Self>> {
        Self::all().find_by(filter, store)
    }

    fn find_by_or_fail<S: Store + ?Sized>(filter: impl Into<Filter>, store: &S) -> Result<Self> {
        Self::all().find_by_or_fail(filter, store)
    }

    fn count<S: Store + ?Sized>(store: &S) -> Result<usize> {
        Self::all().count(store)
    }

    /// Start a relation from a named scope.
    fn scope(name: &str) -> Result<Relation<Self>>
    where
        Self: Scoped,
    {
        Self::all().scope(name)
    }

    /// Start a relation from a named scope with arguments.
    fn scope_with(name: &str, args: &[Value]) -> Result<Relation<Self>>
    where
        Self: Scoped,
    {
        Self::all().scope_with(name, args)
    }
}

impl<M: Model> ModelQuery for M {}
