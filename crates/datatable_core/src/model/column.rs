//! Column domain model.
//!
//! # Responsibility
//! - Define the typed field definition scoped to one table.
//! - Provide write-time validation for new columns and partial updates.
//!
//! # Invariants
//! - `name` is non-blank and stored trimmed.
//! - `kind` is one of the six supported column types.
//! - `options` keeps caller order; it is only meaningful for select kinds.
//! - `order` has no uniqueness constraint.

use crate::model::id::RecordId;
use crate::model::table::TableId;
use crate::model::{normalize_required_name, ModelValidationError};
use serde::{Deserialize, Serialize};

/// Identifier of a column record.
pub type ColumnId = RecordId;

/// Declared value type of a column.
///
/// Cell values are never checked against this type; it drives display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnType {
    Text,
    Email,
    Date,
    Select,
    MultiSelect,
    File,
}

impl ColumnType {
    /// Stable storage and wire spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Date => "date",
            Self::Select => "select",
            Self::MultiSelect => "multi-select",
            Self::File => "file",
        }
    }

    /// Parses the storage/wire spelling.
    pub fn parse(value: &str) -> Result<Self, ModelValidationError> {
        match value {
            "text" => Ok(Self::Text),
            "email" => Ok(Self::Email),
            "date" => Ok(Self::Date),
            "select" => Ok(Self::Select),
            "multi-select" => Ok(Self::MultiSelect),
            "file" => Ok(Self::File),
            other => Err(ModelValidationError::UnknownColumnType(other.to_string())),
        }
    }
}

/// One enumerated choice of a select/multi-select column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnOption {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
}

/// Typed field definition belonging to one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: ColumnId,
    pub table_id: TableId,
    pub name: String,
    /// Serialized as `type` to match external schema naming.
    #[serde(rename = "type")]
    pub kind: ColumnType,
    pub options: Vec<ColumnOption>,
    pub order: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Input for creating a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewColumn {
    pub table_id: TableId,
    pub name: String,
    pub kind: ColumnType,
    pub options: Vec<ColumnOption>,
    pub order: i64,
}

impl NewColumn {
    /// Creates a column draft with empty options and order 0.
    pub fn new(table_id: TableId, name: impl Into<String>, kind: ColumnType) -> Self {
        Self {
            table_id,
            name: name.into(),
            kind,
            options: Vec::new(),
            order: 0,
        }
    }

    /// Validates the draft and returns it with a normalized name.
    pub fn normalized(&self) -> Result<Self, ModelValidationError> {
        Ok(Self {
            name: normalize_column_name(&self.name)?,
            ..self.clone()
        })
    }
}

/// Partial update for an existing column. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnPatch {
    pub name: Option<String>,
    pub kind: Option<ColumnType>,
    pub options: Option<Vec<ColumnOption>>,
    pub order: Option<i64>,
}

impl ColumnPatch {
    /// Returns whether applying this patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.kind.is_none() && self.options.is_none() && self.order.is_none()
    }

    /// Applies the patch to `column`, validating any replaced name.
    pub fn apply_to(&self, column: &mut Column) -> Result<(), ModelValidationError> {
        if let Some(name) = &self.name {
            column.name = normalize_column_name(name)?;
        }
        if let Some(kind) = self.kind {
            column.kind = kind;
        }
        if let Some(options) = &self.options {
            column.options = options.clone();
        }
        if let Some(order) = self.order {
            column.order = order;
        }
        Ok(())
    }
}

/// Validates and normalizes a column name for persistence.
pub fn normalize_column_name(name: &str) -> Result<String, ModelValidationError> {
    normalize_required_name(name, ModelValidationError::BlankColumnName)
}

#[cfg(test)]
mod tests {
    use super::{ColumnOption, ColumnType, NewColumn};
    use crate::model::id::new_record_id;
    use crate::model::ModelValidationError;

    #[test]
    fn column_type_round_trips_through_wire_spelling() {
        for kind in [
            ColumnType::Text,
            ColumnType::Email,
            ColumnType::Date,
            ColumnType::Select,
            ColumnType::MultiSelect,
            ColumnType::File,
        ] {
            assert_eq!(ColumnType::parse(kind.as_str()).unwrap(), kind);
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn unknown_column_type_is_rejected() {
        let err = ColumnType::parse("number").unwrap_err();
        assert_eq!(err, ModelValidationError::UnknownColumnType("number".into()));
        assert!(err.to_string().starts_with("Unsupported column type `number`"));
    }

    #[test]
    fn draft_defaults_and_normalization() {
        let draft = NewColumn::new(new_record_id(), "  SKU ", ColumnType::Text);
        assert!(draft.options.is_empty());
        assert_eq!(draft.order, 0);
        assert_eq!(draft.normalized().unwrap().name, "SKU");

        let blank = NewColumn::new(new_record_id(), "   ", ColumnType::Text);
        assert_eq!(
            blank.normalized().unwrap_err(),
            ModelValidationError::BlankColumnName
        );
    }

    #[test]
    fn option_fields_default_when_missing() {
        let option: ColumnOption = serde_json::from_str(r#"{"label":"Red"}"#).unwrap();
        assert_eq!(option.id, "");
        assert_eq!(option.label, "Red");
    }
}
