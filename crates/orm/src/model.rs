//! Model trait - the entity descriptor queries are parametrized by
//!
//! A model names its table and knows how to materialize itself from a row.
//! Queries never mutate it.

use serde::de::DeserializeOwned;

use crate::backends::DatabaseRow;
use crate::error::{OrmError, OrmResult};

/// Trait for persisted record types
pub trait Model: Send + Sync + DeserializeOwned {
    /// Table name for this model
    fn table_name() -> &'static str;

    /// Entity name used in diagnostics, defaults to the bare type name
    fn model_name() -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    /// Create a model instance from a database row
    fn from_row(row: &dyn DatabaseRow) -> OrmResult<Self> {
        let json = row.to_json()?;
        serde_json::from_value(json).map_err(|e| {
            OrmError::Serialization(format!(
                "Failed to build {} from row: {}",
                Self::model_name(),
                e
            ))
        })
    }
}
