//! Edit audit log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One tracked field change inside an audit entry.
///
/// Values are JSON scalars so quantity and text edits share one shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    pub old_value: serde_json::Value,
    pub new_value: serde_json::Value,
}

impl FieldChange {
    pub fn quantity(field: impl Into<String>, old: i32, new: i32) -> Self {
        Self {
            field: field.into(),
            old_value: old.into(),
            new_value: new.into(),
        }
    }

    pub fn text(field: impl Into<String>, old: &str, new: &str) -> Self {
        Self {
            field: field.into(),
            old_value: old.into(),
            new_value: new.into(),
        }
    }
}

/// Append-only record of one attributable mutation.
///
/// Written once per successful edit that changed at least one tracked field,
/// never updated afterwards. Bulk import deliberately writes none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: i64,
    pub order_id: i64,
    pub actor_name: String,
    pub changes: Vec<FieldChange>,
    pub created_at: DateTime<Utc>,
}
