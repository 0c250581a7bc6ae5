//! Record and field-level finding types.
//!
//! A [`Record`] is one row of imported tabular data: an ordered mapping from
//! field key to scalar cell. Validation annotates records with
//! [`FieldError`]s; it never rejects or drops them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Field Error
// =============================================================================

/// A non-fatal validation finding attached to one field of a record.
///
/// Multiple findings may accumulate on the same field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Key of the offending field.
    pub field: String,
    /// Message shown to the import operator.
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Record
// =============================================================================

/// One row of imported tabular data.
///
/// Field keys the schema declares but the row omits simply read as empty;
/// the validator must tolerate missing keys rather than fail. `errors` is
/// empty on ingest and omitted from JSON output while it stays empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    /// Field key to cell value, in sheet order.
    #[serde(flatten)]
    pub fields: Map<String, Value>,

    /// Findings accumulated by validation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from parsed row fields.
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            errors: Vec::new(),
        }
    }

    /// Raw cell value, if the key is present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Cell value coerced to a string.
    ///
    /// Source values may arrive as non-string scalars (a year column often
    /// parses as a number), so numbers and booleans stringify. Null cells,
    /// missing keys, and non-scalar values read as the empty string.
    pub fn text(&self, key: &str) -> String {
        match self.fields.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    /// Set (or overwrite) a field value.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    /// Attach a finding to a field.
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// True if any finding is attached.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Findings attached to one field.
    pub fn errors_for(&self, field: &str) -> Vec<&FieldError> {
        self.errors.iter().filter(|e| e.field == field).collect()
    }
}

/// An ordered batch of records, processed together.
pub type Batch = Vec<Record>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_coercion() {
        let record: Record = serde_json::from_value(json!({
            "Project name": "Project A",
            "Project start": 2021,
            "Handover": null,
            "Services": true
        }))
        .unwrap();

        assert_eq!(record.text("Project name"), "Project A");
        assert_eq!(record.text("Project start"), "2021");
        assert_eq!(record.text("Handover"), "");
        assert_eq!(record.text("Services"), "true");
        assert_eq!(record.text("No such key"), "");
    }

    #[test]
    fn test_non_scalar_cells_read_empty() {
        let record: Record = serde_json::from_value(json!({
            "Subcontractors": ["a", "b"],
            "Extra": {"nested": 1}
        }))
        .unwrap();

        assert_eq!(record.text("Subcontractors"), "");
        assert_eq!(record.text("Extra"), "");
    }

    #[test]
    fn test_errors_accumulate_per_field() {
        let mut record = Record::new();
        record.add_error("Email", "first");
        record.add_error("Email", "second");
        record.add_error("City", "other");

        assert!(record.has_errors());
        assert_eq!(record.errors_for("Email").len(), 2);
        assert_eq!(record.errors_for("City").len(), 1);
        assert_eq!(record.errors_for("Zip").len(), 0);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut record: Record = serde_json::from_value(json!({
            "Email": "a@b.co",
            "City": "Springfield"
        }))
        .unwrap();
        assert!(record.errors.is_empty());

        // Clean records serialize without an errors key
        let clean = serde_json::to_value(&record).unwrap();
        assert!(clean.get("errors").is_none());

        record.add_error("Email", "bad");
        let flagged = serde_json::to_value(&record).unwrap();
        assert_eq!(flagged["Email"], "a@b.co");
        assert_eq!(flagged["errors"][0]["field"], "Email");

        // And back again
        let parsed: Record = serde_json::from_value(flagged).unwrap();
        assert_eq!(parsed.text("City"), "Springfield");
        assert_eq!(parsed.errors.len(), 1);
    }
}
