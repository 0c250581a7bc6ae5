//! Error types for the Rowguard validation pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`LookupError`] - namespace resolution errors
//! - [`RulesError`] - rule-set configuration errors
//! - [`BatchError`] - top-level orchestration errors
//! - [`ServerError`] - HTTP server errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! Validation findings are deliberately NOT part of this hierarchy: invalid
//! data becomes a [`crate::record::FieldError`] annotation on the record and
//! never aborts a batch.

use thiserror::Error;

// =============================================================================
// Namespace Lookup Errors
// =============================================================================

/// Errors while resolving an import space's namespace.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Resolver credentials are not configured.
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// The metadata API could not be reached.
    #[error("Space lookup request failed: {0}")]
    RequestFailed(String),

    /// The lookup did not complete within the client timeout.
    #[error("Space lookup timed out")]
    Timeout,

    /// The metadata API answered with something unparseable.
    #[error("Invalid space lookup response: {0}")]
    InvalidResponse(String),

    /// The space does not exist.
    #[error("Unknown space: {0}")]
    UnknownSpace(String),
}

// =============================================================================
// Rule-Set Errors
// =============================================================================

/// Errors while loading or saving the validation rule-set.
#[derive(Debug, Error)]
pub enum RulesError {
    /// Failed to read or write the rule-set file.
    #[error("Rule-set IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The rule-set file is not valid JSON.
    #[error("Invalid rule-set JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

// =============================================================================
// Batch Errors (top-level)
// =============================================================================

/// Top-level batch orchestration errors.
///
/// Returned by CLI and server entry points around
/// [`crate::batch::process_batch`]. Note that a failed namespace lookup does
/// NOT surface here: the batch boundary converts it into a logged fail-open
/// skip instead.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Namespace lookup error.
    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// Rule-set error.
    #[error("Rules error: {0}")]
    Rules(#[from] RulesError),

    /// Failed to read the input batch.
    #[error("Batch IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The input batch is not a JSON array of records.
    #[error("Batch JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Batch error.
    #[error("Batch error: {0}")]
    Batch(#[from] BatchError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for namespace lookups.
pub type LookupResult<T> = Result<T, LookupError>;

/// Result type for rule-set operations.
pub type RulesResult<T> = Result<T, RulesError>;

/// Result type for batch operations.
pub type BatchResult<T> = Result<T, BatchError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
