//! Named, reusable query fragments.
//!
//! Every model type owns its own [`ScopeRegistry`]. Because the registry is
//! generic over the model, a scope registered for one model can only ever
//! transform relations of that model; asking another model's relation for
//! the same name fails with `UnknownScope`.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use airmodel_core::{Error, Model, Result, Value};

use crate::relation::Relation;

/// A registered scope body.
///
/// Bodies return `Result` so errors from nested scopes reach the caller.
pub type ScopeFn<M> = Arc<dyn Fn(&Relation<M>, &[Value]) -> Result<Relation<M>> + Send + Sync>;

/// Relation and model operations a scope may not shadow.
pub const RESERVED_NAMES: &[&str] = &[
    "all",
    "compile",
    "count",
    "each",
    "filter",
    "find_by",
    "find_by_or_fail",
    "first",
    "first_n",
    "last",
    "last_n",
    "limit",
    "load",
    "new",
    "offset",
    "order",
    "order_by",
    "scope",
    "scope_with",
    "spawn",
    "to_json",
    "where",
];

/// Models that carry named scopes.
///
/// Implement by returning a `static` registry dedicated to the model:
///
/// ```
/// use std::sync::LazyLock;
/// use airmodel_core::{FieldMapping, Model, Record, Result};
/// use airmodel_query::{Relation, ScopeRegistry, Scoped, conditions};
///
/// struct Task;
/// static FIELDS: LazyLock<FieldMapping> = LazyLock::new(FieldMapping::new);
/// static SCOPES: LazyLock<ScopeRegistry<Task>> = LazyLock::new(|| {
///     let scopes = ScopeRegistry::new();
///     scopes
///         .define("open", |r| Ok(r.filter(conditions! { "done" => false })))
///         .expect("valid scope");
///     scopes
/// });
///
/// impl Model for Task {
///     const TABLE_NAME: &'static str = "Tasks";
///     fn field_mapping() -> &'static FieldMapping { &FIELDS }
///     fn from_record(_: Record) -> Result<Self> { Ok(Task) }
/// }
///
/// impl Scoped for Task {
///     fn scopes() -> &'static ScopeRegistry<Self> { &SCOPES }
/// }
///
/// let open = Relation::<Task>::new().scope("open").unwrap();
/// assert_eq!(open.compile().unwrap().filter.as_deref(), Some("{done} = FALSE()"));
/// ```
pub trait Scoped: Model {
    /// This model's own scope registry.
    fn scopes() -> &'static ScopeRegistry<Self>;
}

/// Per-model table of scope name to relation transform.
pub struct ScopeRegistry<M: Model> {
    scopes: RwLock<HashMap<String, ScopeFn<M>>>,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> ScopeRegistry<M> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            scopes: RwLock::new(HashMap::new()),
            _model: PhantomData,
        }
    }

    /// Register a scope taking no arguments.
    pub fn define<F>(&self, name: &str, body: F) -> Result<()>
    where
        F: Fn(&Relation<M>) -> Result<Relation<M>> + Send + Sync + 'static,
    {
        self.insert(name, Arc::new(move |relation: &Relation<M>, _: &[Value]| body(relation)))
    }

    /// Register a scope that receives call-site arguments.
    pub fn define_with_args<F>(&self, name: &str, body: F) -> Result<()>
    where
        F: Fn(&Relation<M>, &[Value]) -> Result<Relation<M>> + Send + Sync + 'static,
    {
        self.insert(name, Arc::new(body))
    }

    /// Register a scope that adds a fixed raw formula.
    pub fn define_formula(&self, name: &str, formula: impl Into<String>) -> Result<()> {
        let formula = formula.into();
        if formula.trim().is_empty() {
            return Err(Error::invalid_scope(
                M::TABLE_NAME,
                name,
                "formula body is empty",
            ));
        }
        self.define(name, move |relation| Ok(relation.filter(formula.as_str())))
    }

    /// Check whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Registered scope names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Apply scope `name` to `relation`.
    ///
    /// The body runs outside the registry lock, so scopes may call other
    /// scopes. Errors raised by the body are returned unchanged.
    pub fn apply(&self, name: &str, relation: &Relation<M>, args: &[Value]) -> Result<Relation<M>> {
        let body = self
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownScope {
                model: M::TABLE_NAME,
                scope: name.to_string(),
            })?;
        tracing::trace!(table = M::TABLE_NAME, scope = name, "Applying scope");
        body(relation, args)
    }

    fn insert(&self, name: &str, body: ScopeFn<M>) -> Result<()> {
        validate_name::<M>(name)?;
        let previous = self.write().insert(name.to_string(), body);
        if previous.is_some() {
            tracing::warn!(
                table = M::TABLE_NAME,
                scope = name,
                "scope redefined; replacing earlier body"
            );
        } else {
            tracing::debug!(table = M::TABLE_NAME, scope = name, "Registered scope");
        }
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, ScopeFn<M>>> {
        self.scopes.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, ScopeFn<M>>> {
        self.scopes.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn validate_name<M: Model>(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(Error::invalid_scope(M::TABLE_NAME, name, "scope name is empty"));
    };
    if !(first.is_alphabetic() || first == '_') || !chars.all(|c| c.is_alphanumeric() || c == '_')
    {
        return Err(Error::invalid_scope(
            M::TABLE_NAME,
            name,
            "scope name must be an identifier",
        ));
    }
    if RESERVED_NAMES.contains(&name) {
        return Err(Error::invalid_scope(
            M::TABLE_NAME,
            name,
            "scope name shadows a built-in query operation",
        ));
    }
    Ok(())
}

impl<M: Model> Default for ScopeRegistry<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> fmt::Debug for ScopeRegistry<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeRegistry")
            .field("table", &M::TABLE_NAME)
            .field("scopes", &self.names())
            .finish()
    }
}

impl<M: Scoped> Relation<M> {
    /// Apply a scope registered on `M`.
    ///
    /// Fails with `UnknownScope` when `M`'s registry has no such name.
    pub fn scope(&self, name: &str) -> Result<Self> {
        M::scopes().apply(name, self, &[])
    }

    /// Apply a scope registered on `M`, passing arguments to its body.
    pub fn scope_with(&self, name: &str, args: &[Value]) -> Result<Self> {
        M::scopes().apply(name, self, args)
    }
}
