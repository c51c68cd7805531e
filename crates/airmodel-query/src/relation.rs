//! Lazy, chainable relations.
//!
//! A [`Relation`] accumulates conditions, sort keys and pagination for one
//! model type. Chain methods never touch the store: each returns a new
//! relation holding a copy of the prior state plus the change, with an empty
//! result cache. Only the terminal operations (`load`, `each`, `count`,
//! `first`, `last`, `find_by`) fetch.

use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use airmodel_core::{Error, FetchParams, Model, NotFoundError, Result, Store, TableRef};

use crate::clause::{Limit, Offset, OrderBy};
use crate::condition::{Condition, Filter};
use crate::formula::FormulaBuilder;

/// An immutable, lazily evaluated query over the table of `M`.
///
/// # Example
///
/// ```
/// use airmodel_query::{Relation, conditions};
/// # use std::sync::LazyLock;
/// # use airmodel_core::{FieldMapping, Model, Record, Result};
/// # struct User;
/// # static FIELDS: LazyLock<FieldMapping> =
/// #     LazyLock::new(|| FieldMapping::new().field("role", "Role").field("name", "Name"));
/// # impl Model for User {
/// #     const TABLE_NAME: &'static str = "Users";
/// #     fn field_mapping() -> &'static FieldMapping { &FIELDS }
/// #     fn from_record(_: Record) -> Result<Self> { Ok(User) }
/// # }
///
/// let admins = Relation::<User>::new()
///     .filter(conditions! { "role" => "admin" })
///     .order("name")
///     .limit(10);
///
/// let params = admins.compile().unwrap();
/// assert_eq!(params.filter.as_deref(), Some("{Role} = 'admin'"));
/// assert_eq!(params.sort[0].field, "Name");
/// assert_eq!(params.max_records, Some(10));
/// ```
pub struct Relation<M: Model> {
    conditions: Vec<Condition>,
    order: Vec<OrderBy>,
    limit: Option<Limit>,
    offset: Option<Offset>,
    /// Materialized records, set at most once
    loaded: OnceLock<Arc<Vec<M>>>,
    /// Serializes the first fetch so concurrent loads issue one call
    fetch_lock: Mutex<()>,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> Relation<M> {
    /// Create a relation matching every record of the table.
    pub fn new() -> Self {
        Self {
            conditions: Vec::new(),
            order: Vec::new(),
            limit: None,
            offset: None,
            loaded: OnceLock::new(),
            fetch_lock: Mutex::new(()),
            _model: PhantomData,
        }
    }

    /// Copy the query state into a fresh relation with an empty cache.
    pub fn spawn(&self) -> Self {
        Self {
            conditions: self.conditions.clone(),
            order: self.order.clone(),
            limit: self.limit,
            offset: self.offset,
            ..Self::new()
        }
    }

    // ==================== Chain methods ====================

    /// Add a filter, combined with existing filters by `AND`.
    ///
    /// Accepts a raw formula (`&str`/`String`), a [`Conditions`](crate::Conditions)
    /// mapping, or a [`Condition`]. Blank formulas and empty mappings add
    /// nothing. Field names are checked when the relation is compiled.
    pub fn filter(&self, filter: impl Into<Filter>) -> Self {
        let mut next = self.spawn();
        if let Some(condition) = filter.into().into_condition() {
            next.conditions.push(condition);
        }
        next
    }

    /// Append a sort key. A bare field name sorts ascending.
    pub fn order(&self, order: impl Into<OrderBy>) -> Self {
        let mut next = self.spawn();
        next.order.push(order.into());
        next
    }

    /// Append several sort keys, keeping their order.
    pub fn order_by<I>(&self, keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<OrderBy>,
    {
        let mut next = self.spawn();
        next.order.extend(keys.into_iter().map(Into::into));
        next
    }

    /// Set the maximum number of records, replacing any earlier limit.
    pub fn limit(&self, n: u64) -> Self {
        let mut next = self.spawn();
        next.limit = Some(Limit(n));
        next
    }

    /// Set the number of records to skip, replacing any earlier offset.
    pub fn offset(&self, n: u64) -> Self {
        let mut next = self.spawn();
        next.offset = Some(Offset(n));
        next
    }

    // ==================== Accessors ====================

    /// Accumulated conditions, in the order they were added.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Accumulated sort keys, in the order they were added.
    pub fn order_values(&self) -> &[OrderBy] {
        &self.order
    }

    pub fn limit_value(&self) -> Option<u64> {
        self.limit.map(|Limit(n)| n)
    }

    pub fn offset_value(&self) -> Option<u64> {
        self.offset.map(|Offset(n)| n)
    }

    /// Check whether this relation has already fetched its records.
    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    // ==================== Compilation ====================

    /// Compile the accumulated state into store parameters.
    ///
    /// Field and sort names are resolved through the model's field mapping.
    /// Unset parts are omitted; no conditions means no `filter`.
    #[tracing::instrument(level = "trace", skip(self), fields(table = M::TABLE_NAME))]
    pub fn compile(&self) -> Result<FetchParams> {
        let mapping = M::field_mapping();
        let filter = FormulaBuilder::new(mapping).build(&self.conditions)?;
        if let Some(formula) = &filter {
            tracing::trace!(formula = %formula, "Compiled filter formula");
        }

        let sort = self
            .order
            .iter()
            .map(|key| key.compile(mapping))
            .collect::<Result<Vec<_>>>()?;

        Ok(FetchParams {
            filter,
            sort,
            max_records: self.limit_value(),
            offset: self.offset_value(),
        })
    }

    /// Render the compiled parameters as JSON.
    pub fn to_json(&self) -> Result<String> {
        let params = self.compile()?;
        Ok(serde_json::to_string(&params)?)
    }

    // ==================== Terminal operations ====================

    /// Fetch and materialize the records, caching them on this relation.
    ///
    /// The first call issues exactly one store fetch, even when several
    /// threads call concurrently; later calls return the cached records.
    /// A failed fetch is not cached.
    #[tracing::instrument(level = "debug", skip(self, store), fields(table = M::TABLE_NAME))]
    pub fn load<S: Store + ?Sized>(&self, store: &S) -> Result<Arc<Vec<M>>> {
        if let Some(records) = self.loaded.get() {
            tracing::trace!("Returning cached records");
            return Ok(Arc::clone(records));
        }

        let _guard = self
            .fetch_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // Another caller may have finished the fetch while we waited
        if let Some(records) = self.loaded.get() {
            tracing::trace!("Returning records loaded by a concurrent caller");
            return Ok(Arc::clone(records));
        }

        let records = Arc::new(self.fetch(store)?);
        let _ = self.loaded.set(Arc::clone(&records));
        Ok(records)
    }

    /// Call `f` for every record, loading first if needed.
    pub fn each<S, F>(&self, store: &S, mut f: F) -> Result<()>
    where
        S: Store + ?Sized,
        F: FnMut(&M),
    {
        for record in self.load(store)?.iter() {
            f(record);
        }
        Ok(())
    }

    /// Number of matching records. Uses the cache when present.
    pub fn count<S: Store + ?Sized>(&self, store: &S) -> Result<usize> {
        Ok(self.load(store)?.len())
    }

    /// The first matching record.
    pub fn first<S: Store + ?Sized>(&self, store: &S) -> Result<Option<M>> {
        Ok(self.first_n(1, store)?.into_iter().next())
    }

    /// Up to `n` records from the start of the relation.
    ///
    /// Without an explicit order, sorts ascending by the model's
    /// `created_field` when one is configured.
    pub fn first_n<S: Store + ?Sized>(&self, n: u64, store: &S) -> Result<Vec<M>> {
        if n == 0 {
            return Ok(Vec::new());
        }
        let mut query = self.spawn();
        if query.order.is_empty() {
            if let Some(created) = M::model_config().created_field {
                query.order.push(OrderBy::asc(created));
            }
        }
        query.limit = Some(Limit(query.limit_value().map_or(n, |l| l.min(n))));
        query.fetch(store)
    }

    /// The last matching record.
    pub fn last<S: Store + ?Sized>(&self, store: &S) -> Result<Option<M>> {
        Ok(self.last_n(1, store)?.pop())
    }

    /// Up to `n` records from the end of the relation, in relation order.
    ///
    /// With an explicit order and no pagination, every sort key is flipped,
    /// `n` records are fetched and the page is reversed back. A relation
    /// with a limit or offset is fetched as-is and its final `n` records
    /// are returned, so the result never leaves the relation's window.
    /// Without an order there is no defined "end" and the tail of the
    /// store's natural order is used.
    pub fn last_n<S: Store + ?Sized>(&self, n: u64, store: &S) -> Result<Vec<M>> {
        if n == 0 {
            return Ok(Vec::new());
        }

        if self.order.is_empty() {
            tracing::warn!(
                table = M::TABLE_NAME,
                "last() without an explicit order relies on the store's natural order"
            );
        }

        if self.order.is_empty() || self.limit.is_some() || self.offset.is_some() {
            let mut records = self.fetch(store)?;
            let n = usize::try_from(n).unwrap_or(usize::MAX);
            let start = records.len().saturating_sub(n);
            return Ok(records.split_off(start));
        }

        let mut query = self.spawn();
        query.order = self.order.iter().map(OrderBy::reversed).collect();
        query.limit = Some(Limit(n));
        let mut records = query.fetch(store)?;
        records.reverse();
        Ok(records)
    }

    /// The first record matching `filter` within this relation.
    pub fn find_by<S: Store + ?Sized>(
        &self,
        filter: impl Into<Filter>,
        store: &S,
    ) -> Result<Option<M>> {
        let query = self.filter(filter).limit(1);
        Ok(query.fetch(store)?.into_iter().next())
    }

    /// Like [`find_by`](Self::find_by), failing with `RecordNotFound` when
    /// nothing matches.
    pub fn find_by_or_fail<S: Store + ?Sized>(
        &self,
        filter: impl Into<Filter>,
        store: &S,
    ) -> Result<M> {
        let query = self.filter(filter).limit(1);
        match query.fetch(store)?.into_iter().next() {
            Some(record) => Ok(record),
            None => Err(Error::RecordNotFound(NotFoundError {
                table: M::TABLE_NAME,
                filter: query.compile()?.filter,
            })),
        }
    }

    /// Issue one uncached fetch with this relation's parameters.
    fn fetch<S: Store + ?Sized>(&self, store: &S) -> Result<Vec<M>> {
        let params = self.compile()?;
        let table = TableRef::of::<M>();

        tracing::debug!(
            table = M::TABLE_NAME,
            has_filter = params.filter.is_some(),
            sort_keys = params.sort.len(),
            max_records = ?params.max_records,
            "Fetching records"
        );

        let records = store.fetch(&table, &params)?;
        tracing::debug!(record_count = records.len(), "Materializing records");

        records.into_iter().map(M::from_record).collect()
    }
}

impl<M: Model> Default for Relation<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> Clone for Relation<M> {
    /// Copies the query state; the clone starts with an empty cache.
    fn clone(&self) -> Self {
        self.spawn()
    }
}

impl<M: Model> fmt::Debug for Relation<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relation")
            .field("table", &M::TABLE_NAME)
            .field("conditions", &self.conditions)
            .field("order", &self.order)
            .field("limit", &self.limit_value())
            .field("offset", &self.offset_value())
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
