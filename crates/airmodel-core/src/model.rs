//! Model trait for mapping structs onto remote tables.
//!
//! The `Model` trait defines the contract for structs that can be
//! materialized from remote table records.

use crate::Result;
use crate::field::FieldMapping;
use crate::record::Record;

/// Model-level configuration.
///
/// # Example
///
/// ```
/// use airmodel_core::ModelConfig;
///
/// const CONFIG: ModelConfig = ModelConfig::new()
///     .base_key("appTest123")
///     .created_field("created_at");
/// assert_eq!(CONFIG.base_key, Some("appTest123"));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelConfig {
    /// Identifier of the remote base (workspace) holding the table.
    pub base_key: Option<&'static str>,

    /// Logical attribute holding the record creation time.
    ///
    /// When set, `first` orders by this attribute ascending if the relation
    /// carries no explicit order.
    pub created_field: Option<&'static str>,
}

impl ModelConfig {
    /// Create a new ModelConfig with all defaults.
    pub const fn new() -> Self {
        Self {
            base_key: None,
            created_field: None,
        }
    }

    /// Set the remote base identifier.
    pub const fn base_key(mut self, key: &'static str) -> Self {
        self.base_key = Some(key);
        self
    }

    /// Set the creation-time attribute used as the default ordering for `first`.
    pub const fn created_field(mut self, name: &'static str) -> Self {
        self.created_field = Some(name);
        self
    }
}

/// Address of a remote table, handed to the store on every fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableRef {
    pub base_key: Option<&'static str>,
    pub table: &'static str,
}

impl TableRef {
    /// Table address for a model type.
    pub fn of<M: Model>() -> Self {
        Self {
            base_key: M::model_config().base_key,
            table: M::TABLE_NAME,
        }
    }
}

/// Trait for types that can be materialized from remote records.
///
/// # Example
///
/// ```
/// use std::sync::LazyLock;
/// use airmodel_core::{FieldMapping, Model, Record, Result};
///
/// struct User {
///     first_name: String,
/// }
///
/// static USER_FIELDS: LazyLock<FieldMapping> =
///     LazyLock::new(|| FieldMapping::new().field("first_name", "First Name"));
///
/// impl Model for User {
///     const TABLE_NAME: &'static str = "Users";
///
///     fn field_mapping() -> &'static FieldMapping {
///         &USER_FIELDS
///     }
///
///     fn from_record(record: Record) -> Result<Self> {
///         Ok(User {
///             first_name: record.get_as(Self::field_mapping(), "first_name")?,
///         })
///     }
/// }
/// ```
pub trait Model: Sized + Send + Sync + 'static {
    /// The name of the remote table.
    const TABLE_NAME: &'static str;

    /// Logical → backend field mapping for this model.
    ///
    /// Each model owns its own table; mappings are never shared.
    fn field_mapping() -> &'static FieldMapping;

    /// Construct a model instance from a fetched record.
    fn from_record(record: Record) -> Result<Self>;

    /// Get the model configuration.
    fn model_config() -> ModelConfig {
        ModelConfig::new()
    }
}
