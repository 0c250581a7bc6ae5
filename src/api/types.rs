//! REST API types for the validation endpoint.
//!
//! The response carries the annotated records themselves plus a findings
//! summary indexed by batch position, so the consumer can persist field
//! values and per-field messages without re-walking every record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::batch::BatchOutcome;
use crate::record::{FieldError, Record};

/// A batch submitted for validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    /// Import space whose namespace governs conditional rules.
    #[serde(default)]
    pub space_id: Option<String>,

    /// Explicit namespace; set, it skips the space lookup entirely.
    #[serde(default)]
    pub namespace: Option<String>,

    /// Records to validate, in sheet order.
    pub records: Vec<Record>,
}

/// Response sent back after a batch pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    /// Unique job identifier.
    pub job_id: String,

    /// "ok", "flagged", or "skipped".
    pub status: String,

    /// Records in input order, annotated when validation ran.
    pub records: Vec<Record>,

    /// Metadata about the batch pass.
    pub metadata: ResponseMetadata,
}

/// Metadata about one batch pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub total_records: usize,

    /// Records with no findings.
    pub valid: usize,

    /// Records with at least one finding.
    pub flagged: usize,

    /// False when the space lookup failed and validation was skipped.
    pub validated: bool,

    /// Namespace the conditional rules ran under.
    pub namespace: Option<String>,

    pub processed_at: DateTime<Utc>,

    /// Findings per flagged record, by batch position.
    pub findings: Vec<RecordFindings>,
}

/// Findings of one record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFindings {
    pub record_index: usize,
    pub errors: Vec<FieldError>,
}

impl From<BatchOutcome> for ValidateResponse {
    fn from(outcome: BatchOutcome) -> Self {
        let findings: Vec<RecordFindings> = outcome
            .records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.has_errors())
            .map(|(record_index, record)| RecordFindings {
                record_index,
                errors: record.errors.clone(),
            })
            .collect();

        let status = if !outcome.validated {
            "skipped"
        } else if outcome.flagged_count > 0 {
            "flagged"
        } else {
            "ok"
        };

        ValidateResponse {
            job_id: Uuid::new_v4().to_string(),
            status: status.to_string(),
            metadata: ResponseMetadata {
                total_records: outcome.records.len(),
                valid: outcome.valid_count,
                flagged: outcome.flagged_count,
                validated: outcome.validated,
                namespace: outcome.namespace.clone(),
                processed_at: Utc::now(),
                findings,
            },
            records: outcome.records,
        }
    }
}

/// Create an error response payload.
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
        "records": [],
    })
}
