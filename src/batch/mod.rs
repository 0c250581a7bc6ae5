//! Batch orchestration.
//!
//! One namespace lookup per batch, then every record flows through the
//! validator independently, preserving input order. A failed lookup skips
//! validation for the whole batch and returns it untouched: a metadata
//! outage must not block the import pipeline (fail-open), at the cost of an
//! unvalidated batch.

use serde::{Deserialize, Serialize};

use crate::api::logs::{log_info, log_success, log_warning};
use crate::record::Record;
use crate::resolver::NamespaceResolver;
use crate::rules::RuleSet;
use crate::validator::{validate_record, ValidationContext};

/// Options for batch execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOptions {
    /// Records per dispatch unit.
    pub chunk_size: usize,

    /// Worker threads for chunk dispatch; 1 keeps everything sequential.
    pub parallelism: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            chunk_size: 100,
            parallelism: 2,
        }
    }
}

/// Outcome of one batch pass.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    /// Records in input order, annotated when validation ran.
    pub records: Vec<Record>,

    /// False when the lookup failed and validation was skipped entirely.
    pub validated: bool,

    /// Namespace the conditional rules ran under, when resolved.
    pub namespace: Option<String>,

    /// Records with no findings.
    pub valid_count: usize,

    /// Records with at least one finding.
    pub flagged_count: usize,
}

impl BatchOutcome {
    fn summarize(records: Vec<Record>, validated: bool, namespace: Option<String>) -> Self {
        let flagged_count = records.iter().filter(|r| r.has_errors()).count();
        let valid_count = records.len() - flagged_count;
        Self {
            records,
            validated,
            namespace,
            valid_count,
            flagged_count,
        }
    }

    /// Fail-open outcome: the input batch, untouched.
    pub(crate) fn skipped(records: Vec<Record>) -> Self {
        Self::summarize(records, false, None)
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }
}

/// Validate a whole batch against an already-resolved namespace.
///
/// The pure core: every record is annotated independently, and the output
/// has the same length and order as the input.
pub fn validate_batch(mut records: Vec<Record>, ctx: &ValidationContext) -> Vec<Record> {
    for record in &mut records {
        validate_record(record, ctx);
    }
    records
}

/// Chunk-dispatched validation on a bounded worker pool.
///
/// Per-record validation shares no mutable state, so chunks may run in any
/// order; the indexed collect restores input order.
fn validate_chunked(
    records: Vec<Record>,
    ctx: &ValidationContext,
    options: &BatchOptions,
) -> Vec<Record> {
    if options.parallelism <= 1 || records.len() <= options.chunk_size {
        return validate_batch(records, ctx);
    }

    match rayon::ThreadPoolBuilder::new()
        .num_threads(options.parallelism)
        .build()
    {
        Ok(pool) => pool.install(|| {
            use rayon::prelude::*;
            records
                .into_par_iter()
                .with_min_len(options.chunk_size.max(1))
                .map(|mut record| {
                    validate_record(&mut record, ctx);
                    record
                })
                .collect()
        }),
        Err(e) => {
            log_warning(format!("Worker pool unavailable, validating sequentially: {}", e));
            validate_batch(records, ctx)
        }
    }
}

/// Process one batch end to end: resolve the namespace, then validate.
///
/// Lookup failure is fail-open: it is logged and the input batch comes back
/// unchanged with `validated = false`. Validation findings never fail this
/// function; they ride on the returned records.
pub async fn process_batch(
    records: Vec<Record>,
    resolver: &dyn NamespaceResolver,
    space_id: &str,
    rules: &RuleSet,
    options: &BatchOptions,
) -> BatchOutcome {
    log_info(format!(
        "Processing batch of {} records (space {})",
        records.len(),
        space_id
    ));

    let namespace = match resolver.resolve(space_id).await {
        Ok(namespace) => namespace,
        Err(e) => {
            log_warning(format!(
                "Space lookup failed, skipping validation for this batch: {}",
                e
            ));
            return BatchOutcome::skipped(records);
        }
    };
    log_info(format!("Resolved namespace: {:?}", namespace));

    let ctx = ValidationContext::new(namespace.clone(), rules.clone());
    let records = validate_chunked(records, &ctx, options);

    let outcome = BatchOutcome::summarize(records, true, Some(namespace));
    if outcome.flagged_count == 0 {
        log_success(format!("All {} records valid", outcome.valid_count));
    } else {
        log_warning(format!(
            "{} of {} records flagged",
            outcome.flagged_count,
            outcome.total()
        ));
    }
    outcome
}
