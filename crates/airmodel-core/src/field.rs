//! Field definitions and logical → backend name mapping.

use std::collections::HashMap;

/// How a field's value should be interpreted by attribute helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldKind {
    /// Checkbox column: an absent cell reads as `false`.
    Boolean,
    /// Anything else.
    #[default]
    Other,
}

/// Metadata about a single mapped field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Model attribute name
    pub name: String,
    /// Backend column name (may contain spaces and punctuation)
    pub field_name: String,
    /// Computed/lookup columns the store rejects on write
    pub readonly: bool,
    pub kind: FieldKind,
}

impl FieldDef {
    /// Create a new field definition.
    pub fn new(name: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_name: field_name.into(),
            readonly: false,
            kind: FieldKind::Other,
        }
    }

    /// Mark this field as read-only.
    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    /// Mark this field as a boolean (checkbox) field.
    pub fn boolean(mut self) -> Self {
        self.kind = FieldKind::Boolean;
        self
    }
}

/// Per-model table of logical attribute name → backend field name.
///
/// Lookups that miss fall back to the logical name itself, so models only
/// need to declare the fields whose backend names differ.
///
/// # Example
///
/// ```
/// use airmodel_core::FieldMapping;
///
/// let mapping = FieldMapping::new()
///     .field("first_name", "First Name")
///     .field("email", "Email Address");
///
/// assert_eq!(mapping.resolve("first_name"), "First Name");
/// assert_eq!(mapping.resolve("nickname"), "nickname");
/// assert_eq!(mapping.logical_name("Email Address"), Some("email"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FieldMapping {
    /// Definitions in declaration order
    defs: Vec<FieldDef>,
    /// Logical name -> index
    by_name: HashMap<String, usize>,
    /// Backend name -> index
    by_field: HashMap<String, usize>,
}

impl FieldMapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `name` to the backend column `field_name`.
    pub fn field(self, name: impl Into<String>, field_name: impl Into<String>) -> Self {
        self.define(FieldDef::new(name, field_name))
    }

    /// Register a full field definition.
    ///
    /// Redefining a logical name replaces the earlier definition in place.
    pub fn define(mut self, def: FieldDef) -> Self {
        if let Some(&idx) = self.by_name.get(&def.name) {
            tracing::warn!(
                name = %def.name,
                field = %def.field_name,
                "field redefined; replacing earlier mapping"
            );
            let old = std::mem::replace(&mut self.defs[idx], def);
            // The backend column may also be claimed by another logical name
            if self.by_field.get(&old.field_name) == Some(&idx) {
                self.by_field.remove(&old.field_name);
                if let Some(other) = self
                    .defs
                    .iter()
                    .rposition(|d| d.field_name == old.field_name)
                {
                    self.by_field.insert(old.field_name, other);
                }
            }
            self.by_field.insert(self.defs[idx].field_name.clone(), idx);
        } else {
            let idx = self.defs.len();
            self.by_name.insert(def.name.clone(), idx);
            self.by_field.insert(def.field_name.clone(), idx);
            self.defs.push(def);
        }
        self
    }

    /// Resolve a logical name to its backend field name, falling back to
    /// the logical name unchanged.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.get(name).map_or(name, |def| def.field_name.as_str())
    }

    /// Look up the definition for a logical name.
    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.by_name.get(name).map(|&idx| &self.defs[idx])
    }

    /// Reverse lookup: the logical name registered for a backend field.
    pub fn logical_name(&self, field_name: &str) -> Option<&str> {
        self.by_field
            .get(field_name)
            .map(|&idx| self.defs[idx].name.as_str())
    }

    /// Check whether a backend field is read-only.
    pub fn is_readonly(&self, field_name: &str) -> bool {
        self.by_field
            .get(field_name)
            .is_some_and(|&idx| self.defs[idx].readonly)
    }

    /// Iterate over all definitions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDef> {
        self.defs.iter()
    }

    /// Number of mapped fields.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Check if no fields are mapped.
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

impl<'a> IntoIterator for &'a FieldMapping {
    type Item = &'a FieldDef;
    type IntoIter = std::slice::Iter<'a, FieldDef>;

    fn into_iter(self) -> Self::IntoIter {
        self.defs.iter()
    }
}
