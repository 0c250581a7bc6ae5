//! # Rowguard - record-level validation for tabular imports
//!
//! Rowguard takes a batch of user-submitted rows, resolves the namespace of
//! the import space they belong to, and annotates each record with
//! per-field findings (plus a computed address field) before the batch is
//! committed by the consumer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ JSON batch  │────▶│  Resolver   │────▶│  Validator  │────▶│  Annotated  │
//! │  (records)  │     │ (namespace) │     │ (per record)│     │    batch    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! A failed namespace lookup skips validation for the whole batch and
//! returns it untouched (fail-open): a metadata outage must not block the
//! import pipeline.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rowguard::{process_batch, BatchOptions, FixedNamespace, RuleSet};
//!
//! #[tokio::main]
//! async fn main() {
//!     let records = serde_json::from_str(r#"[{ "Email": "a@b.co" }]"#).unwrap();
//!     let resolver = FixedNamespace::new("Update Records");
//!     let outcome = process_batch(
//!         records,
//!         &resolver,
//!         "us_sp_123",
//!         &RuleSet::default(),
//!         &BatchOptions::default(),
//!     )
//!     .await;
//!     println!("{} of {} records flagged", outcome.flagged_count, outcome.total());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`record`] - Records and field-level findings
//! - [`dates`] - Month/year date tokens
//! - [`rules`] - Injected rule-set configuration
//! - [`validator`] - Per-record validation rules
//! - [`resolver`] - Namespace resolution clients
//! - [`batch`] - Batch orchestration and fail-open policy
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod record;

// Validation
pub mod dates;
pub mod rules;
pub mod validator;

// Orchestration
pub mod batch;
pub mod resolver;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    BatchError,
    BatchResult,
    LookupError,
    LookupResult,
    RulesError,
    RulesResult,
    ServerError,
    ServerResult,
};

// =============================================================================
// Re-exports - Records
// =============================================================================

pub use record::{Batch, FieldError, Record};

// =============================================================================
// Re-exports - Dates
// =============================================================================

pub use dates::{is_before_or_same, is_valid_date_token, to_comparable};

// =============================================================================
// Re-exports - Rules & Validator
// =============================================================================

pub use rules::{RuleSet, UPDATE_RECORDS_NAMESPACE};

pub use validator::{fields, validate_record, ValidationContext};

// =============================================================================
// Re-exports - Resolver
// =============================================================================

pub use resolver::{FixedNamespace, HttpSpaceResolver, NamespaceResolver};

// =============================================================================
// Re-exports - Batch
// =============================================================================

pub use batch::{process_batch, validate_batch, BatchOptions, BatchOutcome};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{
    error_response,
    RecordFindings,
    ResponseMetadata,
    ValidateRequest,
    ValidateResponse,
};

// Server
pub mod server {
    pub use crate::api::server::start_server;
}
