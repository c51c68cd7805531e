//! Structured filter conditions.
//!
//! A [`Condition`] is a node in a small expression tree that the formula
//! builder compiles into the backend's formula grammar. Field names held
//! here are *logical* attribute names; they are resolved to backend names
//! only when the relation is compiled.

use std::ops::Range;

use airmodel_core::Value;

/// A single structured predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `{field} = value`
    Equals { field: String, value: Value },

    /// `lower <= {field} < upper`
    Range {
        field: String,
        lower: Value,
        upper: Value,
    },

    /// `{field}` equals any of `values`
    OneOf { field: String, values: Vec<Value> },

    /// Pre-formed backend formula, emitted verbatim
    Raw(String),

    /// Conjunction, children kept in insertion order
    And(Vec<Condition>),
}

impl Condition {
    /// Create an equality condition.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Condition::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a half-open range condition.
    pub fn range(field: impl Into<String>, lower: impl Into<Value>, upper: impl Into<Value>) -> Self {
        Condition::Range {
            field: field.into(),
            lower: lower.into(),
            upper: upper.into(),
        }
    }

    /// Create a set-membership condition.
    pub fn one_of<T: Into<Value>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        Condition::OneOf {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a raw formula condition.
    ///
    /// The text is trusted: it is neither escaped nor field-mapped.
    pub fn raw(formula: impl Into<String>) -> Self {
        Condition::Raw(formula.into())
    }

    /// Check whether this condition filters nothing (blank raw formula,
    /// conjunction with no non-trivial children).
    pub fn is_trivial(&self) -> bool {
        match self {
            Condition::Raw(formula) => formula.trim().is_empty(),
            Condition::And(children) => children.iter().all(Condition::is_trivial),
            _ => false,
        }
    }

    /// Build a condition from a field and a polymorphic criterion.
    pub fn from_criterion(field: impl Into<String>, criterion: Criterion) -> Self {
        let field = field.into();
        match criterion {
            Criterion::Value(value) => Condition::Equals { field, value },
            Criterion::Range(lower, upper) => Condition::Range {
                field,
                lower,
                upper,
            },
            Criterion::OneOf(values) => Condition::OneOf { field, values },
        }
    }
}

impl From<&str> for Condition {
    fn from(formula: &str) -> Self {
        Condition::Raw(formula.to_string())
    }
}

impl From<String> for Condition {
    fn from(formula: String) -> Self {
        Condition::Raw(formula)
    }
}

/// The value side of a mapping-style condition.
///
/// The shape of the supplied value picks the condition variant once, at
/// the call boundary: a `Range` becomes a range test, a list becomes
/// set membership, anything else is an equality test.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    Value(Value),
    Range(Value, Value),
    OneOf(Vec<Value>),
}

impl From<Value> for Criterion {
    fn from(value: Value) -> Self {
        match value {
            Value::List(values) => Criterion::OneOf(values),
            other => Criterion::Value(other),
        }
    }
}

impl<T: Into<Value>> From<Range<T>> for Criterion {
    fn from(range: Range<T>) -> Self {
        Criterion::Range(range.start.into(), range.end.into())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Criterion {
    fn from(values: Vec<T>) -> Self {
        Criterion::OneOf(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Criterion {
    fn from(values: [T; N]) -> Self {
        Criterion::OneOf(values.into_iter().map(Into::into).collect())
    }
}

macro_rules! scalar_criterion {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Criterion {
                fn from(v: $ty) -> Self {
                    Criterion::Value(Value::from(v))
                }
            }
        )*
    };
}

scalar_criterion!(bool, i32, i64, u32, f64, String, &str, &String);

impl<T: Into<Value>> From<Option<T>> for Criterion {
    fn from(v: Option<T>) -> Self {
        Criterion::from(Value::from(v))
    }
}

/// An ordered mapping of logical field → criterion, the structured form
/// accepted by `Relation::filter`.
///
/// Usually built with the [`conditions!`](crate::conditions) macro.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    entries: Vec<(String, Criterion)>,
}

impl Conditions {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field criterion (builder style).
    pub fn with(mut self, field: impl Into<String>, criterion: impl Into<Criterion>) -> Self {
        self.entries.push((field.into(), criterion.into()));
        self
    }

    /// Number of field criteria.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no criteria were added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convert into a single condition: one entry stays bare, several are
    /// combined with `And` in insertion order. Empty mappings yield `None`.
    pub fn into_condition(self) -> Option<Condition> {
        let mut conditions: Vec<_> = self
            .entries
            .into_iter()
            .map(|(field, criterion)| Condition::from_criterion(field, criterion))
            .collect();
        match conditions.len() {
            0 => None,
            1 => conditions.pop(),
            _ => Some(Condition::And(conditions)),
        }
    }
}

impl<K: Into<String>, C: Into<Criterion>> FromIterator<(K, C)> for Conditions {
    fn from_iter<I: IntoIterator<Item = (K, C)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, c)| (k.into(), c.into()))
                .collect(),
        }
    }
}

/// Anything `Relation::filter` accepts: a raw formula, a mapping, or a
/// ready-made condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter(Option<Condition>);

impl Filter {
    /// The condition this filter contributes, if it filters anything.
    pub fn into_condition(self) -> Option<Condition> {
        self.0.filter(|c| !c.is_trivial())
    }
}

impl From<Condition> for Filter {
    fn from(condition: Condition) -> Self {
        Filter(Some(condition))
    }
}

impl From<Conditions> for Filter {
    fn from(conditions: Conditions) -> Self {
        Filter(conditions.into_condition())
    }
}

impl From<&str> for Filter {
    fn from(formula: &str) -> Self {
        Filter(Some(Condition::raw(formula)))
    }
}

impl From<String> for Filter {
    fn from(formula: String) -> Self {
        Filter(Some(Condition::Raw(formula)))
    }
}

/// Build a [`Conditions`] mapping from `field => value` pairs.
///
/// Values may be scalars, `a..b` ranges, or lists/arrays; each is
/// interpreted as equality, range or set membership respectively.
///
/// # Example
///
/// ```
/// use airmodel_query::{Condition, conditions};
///
/// let c = conditions! { "role" => "admin", "age" => 18..65 };
/// assert_eq!(c.len(), 2);
/// assert!(matches!(c.into_condition(), Some(Condition::And(_))));
/// ```
#[macro_export]
macro_rules! conditions {
    ($($field:expr => $value:expr),* $(,)?) => {
        $crate::Conditions::new()$(.with($field, $value))*
    };
}
