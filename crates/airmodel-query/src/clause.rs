//! Sort and pagination clauses held by a relation.

use airmodel_core::{Error, FieldMapping, Result, SortDirection, SortField};

/// One sort key, named by logical attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    field: String,
    direction: SortDirection,
}

impl OrderBy {
    /// Create an ascending sort key.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Create a descending sort key.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Logical attribute being sorted on.
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// The same key sorted the other way.
    pub fn reversed(&self) -> Self {
        Self {
            field: self.field.clone(),
            direction: self.direction.reverse(),
        }
    }

    /// Resolve the key to its backend field name.
    pub fn compile(&self, mapping: &FieldMapping) -> Result<SortField> {
        if self.field.is_empty() {
            return Err(Error::invalid_field(None, "sort key has an empty field name"));
        }
        let field_name = mapping.resolve(&self.field);
        if field_name.is_empty() {
            return Err(Error::invalid_field(
                Some(&self.field),
                "sort field maps to an empty backend name",
            ));
        }
        Ok(SortField::new(field_name, self.direction))
    }
}

impl From<&str> for OrderBy {
    fn from(field: &str) -> Self {
        OrderBy::asc(field)
    }
}

impl From<String> for OrderBy {
    fn from(field: String) -> Self {
        OrderBy::asc(field)
    }
}

impl<F: Into<String>> From<(F, SortDirection)> for OrderBy {
    fn from((field, direction): (F, SortDirection)) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// Maximum number of records to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit(pub u64);

/// Number of records to skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset(pub u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions() {
        assert_eq!(OrderBy::from("name"), OrderBy::asc("name"));
        assert_eq!(
            OrderBy::from(("name", SortDirection::Desc)),
            OrderBy::desc("name")
        );
    }

    #[test]
    fn compile_maps_field_name() {
        let mapping = FieldMapping::new().field("created_at", "Created At");
        let sort = OrderBy::desc("created_at").compile(&mapping).unwrap();
        assert_eq!(sort, SortField::new("Created At", SortDirection::Desc));

        let sort = OrderBy::asc("score").compile(&mapping).unwrap();
        assert_eq!(sort.field, "score");
    }

    #[test]
    fn empty_sort_field_is_invalid() {
        let err = OrderBy::asc("").compile(&FieldMapping::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidField(_)));
    }

    #[test]
    fn reversed_flips_only_direction() {
        let key = OrderBy::asc("name").reversed();
        assert_eq!(key.field(), "name");
        assert_eq!(key.direction(), SortDirection::Desc);
    }
}
