//! Formula compilation.
//!
//! Turns a sequence of [`Condition`]s into the backend formula grammar:
//! field references are wrapped as `{Field Name}`, text literals are single
//! quoted and escaped, several conditions are combined with `AND(...)`.
//! No state, no I/O.

use std::fmt::Write as _;
use std::sync::OnceLock;

use regex::Regex;

use airmodel_core::{Error, FieldMapping, Result, Value};

use crate::condition::Condition;

/// Characters that must be backslash-escaped inside a text literal.
fn escape_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"['"\\]"#).expect("formula escape pattern is valid"))
}

/// Escape a string for use inside a single-quoted formula literal.
///
/// `'`, `"` and `\` are each prefixed with a backslash in a single pass.
pub fn escape_text(text: &str) -> String {
    escape_pattern().replace_all(text, r"\$0").into_owned()
}

/// Render a value as a formula literal.
///
/// Lists have no literal form and are rejected with `InvalidField`.
pub fn literal(value: &Value, field: &str) -> Result<String> {
    match value {
        Value::Null => Ok("BLANK()".to_string()),
        Value::Bool(true) => Ok("TRUE()".to_string()),
        Value::Bool(false) => Ok("FALSE()".to_string()),
        Value::Int(n) => Ok(n.to_string()),
        Value::Float(f) if f.is_finite() => Ok(f.to_string()),
        Value::Float(f) => Err(Error::invalid_field(
            Some(field),
            format!("non-finite number {f} has no formula literal"),
        )),
        Value::Text(s) => Ok(format!("'{}'", escape_text(s))),
        Value::List(_) => Err(Error::invalid_field(
            Some(field),
            "a list cannot be used as a single comparison value",
        )),
    }
}

/// Compiles conditions against one model's field mapping.
#[derive(Debug, Clone, Copy)]
pub struct FormulaBuilder<'a> {
    mapping: &'a FieldMapping,
}

impl<'a> FormulaBuilder<'a> {
    /// Create a builder resolving field names through `mapping`.
    pub fn new(mapping: &'a FieldMapping) -> Self {
        Self { mapping }
    }

    /// Compile `conditions` into a single formula.
    ///
    /// Returns `Ok(None)` when nothing filters, so callers omit the filter
    /// parameter instead of sending an empty formula. One condition is
    /// emitted bare; several are wrapped in `AND(...)` in the given order.
    pub fn build(&self, conditions: &[Condition]) -> Result<Option<String>> {
        let mut terms = Vec::with_capacity(conditions.len());
        for condition in conditions {
            if let Some(term) = self.term(condition)? {
                terms.push(term);
            }
        }
        Ok(combine("AND", terms))
    }

    /// Wrap a logical field name in the backend's field-reference syntax.
    pub fn field_ref(&self, name: &str) -> Result<String> {
        if name.is_empty() {
            return Err(Error::invalid_field(None, "condition has an empty field key"));
        }
        let field_name = self.mapping.resolve(name);
        if field_name.is_empty() {
            return Err(Error::invalid_field(
                Some(name),
                "field maps to an empty backend name",
            ));
        }
        Ok(format!("{{{field_name}}}"))
    }

    fn term(&self, condition: &Condition) -> Result<Option<String>> {
        match condition {
            Condition::Equals { field, value } => {
                let field_ref = self.field_ref(field)?;
                Ok(Some(format!("{field_ref} = {}", literal(value, field)?)))
            }
            Condition::Range {
                field,
                lower,
                upper,
            } => {
                let field_ref = self.field_ref(field)?;
                let lower = literal(lower, field)?;
                let upper = literal(upper, field)?;
                Ok(Some(format!(
                    "AND({field_ref} >= {lower}, {field_ref} < {upper})"
                )))
            }
            Condition::OneOf { field, values } => {
                let field_ref = self.field_ref(field)?;
                if values.is_empty() {
                    return Err(Error::invalid_field(
                        Some(field),
                        "set-membership condition needs at least one value",
                    ));
                }
                let mut out = String::from("OR(");
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    let _ = write!(out, "{field_ref} = {}", literal(value, field)?);
                }
                out.push(')');
                Ok(Some(out))
            }
            Condition::Raw(formula) => {
                if formula.trim().is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(formula.clone()))
                }
            }
            Condition::And(children) => {
                let mut terms = Vec::with_capacity(children.len());
                for child in children {
                    if let Some(term) = self.term(child)? {
                        terms.push(term);
                    }
                }
                Ok(combine("AND", terms))
            }
        }
    }
}

fn combine(op: &str, mut terms: Vec<String>) -> Option<String> {
    match terms.len() {
        0 => None,
        1 => terms.pop(),
        _ => Some(format!("{op}({})", terms.join(", "))),
    }
}
